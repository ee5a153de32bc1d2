//! Decision policies. The dealer follows a fixed house rule, the player follows basic strategy looked up
//! from three tables and insurance is a pluggable yes/no policy. Everything here is stateless, the same
//! hand and up card always produce the same decision.

use crate::card::{Card, ACE};
use crate::hand::Hand;
use crate::BlackjackGameError;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt::Display;

pub mod prelude {
    pub use super::{
        dealer_decision, AlwaysInsure, BasicStrategy, Decision, DecisionStrategy,
        InsuranceStrategy, NeverInsure, PlayerStrategy, Strategy,
    };
}

/// The ways a hand can be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Hit,
    Stand,
    Double,
    Split,
}

impl Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Decision::Hit => "hit",
            Decision::Stand => "stand",
            Decision::Double => "double down",
            Decision::Split => "split",
        };
        write!(f, "{}", s)
    }
}

/// The house rule: hit 16 or less and soft 17, stand on everything else.
pub fn dealer_decision(hand: &Hand) -> Decision {
    if hand.score() <= 16 || hand.is_soft_17() {
        Decision::Hit
    } else {
        Decision::Stand
    }
}

/// Trait for a player decision strategy. Takes the hand being played and the dealers face up card and
/// returns how the hand should be played.
pub trait DecisionStrategy {
    fn decide(&self, hand: &Hand, dealers_up_card: Card) -> Result<Decision, BlackjackGameError>;
}

/// Trait for deciding whether to take insurance when the dealer shows an ace.
pub trait InsuranceStrategy {
    fn take_insurance(&self, hand: &Hand, dealers_up_card: Card) -> bool;
}

/// Declines insurance every time.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverInsure;

impl InsuranceStrategy for NeverInsure {
    fn take_insurance(&self, _hand: &Hand, _dealers_up_card: Card) -> bool {
        false
    }
}

/// Takes insurance every time it is offered.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysInsure;

impl InsuranceStrategy for AlwaysInsure {
    fn take_insurance(&self, _hand: &Hand, _dealers_up_card: Card) -> bool {
        true
    }
}

type LookupTable = HashMap<(u8, u8), Decision>;

lazy_static! {
    /// Keyed by (hard total, dealers up card value)
    static ref HARD_TOTALS: LookupTable = build_hard_totals();
    /// Keyed by (value of the card next to the ace, dealers up card value)
    static ref SOFT_TOTALS: LookupTable = build_soft_totals();
    /// Keyed by (rank of the pair, dealers up card value)
    static ref PAIR_TOTALS: LookupTable = build_pair_totals();
}

// Dealer up cards are keyed by point value, 2 through 11 with the ace counted as 11.
const UP_CARDS: std::ops::RangeInclusive<u8> = 2..=11;

fn build_hard_totals() -> LookupTable {
    let mut hard_totals = HashMap::new();
    for total in 5..=20 {
        for up in UP_CARDS {
            let option = match total {
                5..=8 => Decision::Hit,
                9 => match up {
                    3..=6 => Decision::Double,
                    _ => Decision::Hit,
                },
                10 => match up {
                    2..=9 => Decision::Double,
                    _ => Decision::Hit,
                },
                11 => match up {
                    2..=10 => Decision::Double,
                    _ => Decision::Hit,
                },
                12 => match up {
                    4..=6 => Decision::Stand,
                    _ => Decision::Hit,
                },
                13..=16 => match up {
                    2..=6 => Decision::Stand,
                    _ => Decision::Hit,
                },
                _ => Decision::Stand,
            };
            hard_totals.insert((total, up), option);
        }
    }
    hard_totals
}

fn build_soft_totals() -> LookupTable {
    let mut soft_totals = HashMap::new();
    for other in 2..=10 {
        for up in UP_CARDS {
            let option = match other {
                2 | 3 => match up {
                    5 | 6 => Decision::Double,
                    _ => Decision::Hit,
                },
                4 | 5 => match up {
                    4..=6 => Decision::Double,
                    _ => Decision::Hit,
                },
                6 => match up {
                    3..=6 => Decision::Double,
                    _ => Decision::Hit,
                },
                7 => match up {
                    2 | 7 | 8 => Decision::Stand,
                    3..=6 => Decision::Double,
                    _ => Decision::Hit,
                },
                _ => Decision::Stand,
            };
            soft_totals.insert((other, up), option);
        }
    }
    soft_totals
}

fn build_pair_totals() -> LookupTable {
    let mut pair_totals = HashMap::new();
    for rank in 1..=13 {
        for up in UP_CARDS {
            let option = match rank {
                1 | 8 => Decision::Split,
                2 | 3 => match up {
                    4..=7 => Decision::Split,
                    _ => Decision::Hit,
                },
                4 => Decision::Hit,
                5 => match up {
                    2..=9 => Decision::Double,
                    _ => Decision::Hit,
                },
                6 => match up {
                    3..=6 => Decision::Split,
                    _ => Decision::Hit,
                },
                7 => match up {
                    2..=7 => Decision::Split,
                    _ => Decision::Hit,
                },
                9 => match up {
                    7 | 10 | 11 => Decision::Stand,
                    _ => Decision::Split,
                },
                _ => Decision::Stand,
            };
            pair_totals.insert((rank, up), option);
        }
    }
    pair_totals
}

/// A struct that implements the `DecisionStrategy` trait, plays every hand by strict basic strategy.
/// The decision only depends on the players cards and the dealers face up card, never on the count.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStrategy;

impl BasicStrategy {
    pub fn new() -> BasicStrategy {
        BasicStrategy
    }

    fn lookup(
        table: &LookupTable,
        key: u8,
        up: u8,
        kind: &str,
    ) -> Result<Decision, BlackjackGameError> {
        table.get(&(key, up)).copied().ok_or_else(|| {
            BlackjackGameError::invalid_operation(format!(
                "no {} entry for {} against {}",
                kind, key, up
            ))
        })
    }
}

impl DecisionStrategy for BasicStrategy {
    fn decide(&self, hand: &Hand, dealers_up_card: Card) -> Result<Decision, BlackjackGameError> {
        let up = dealers_up_card.point_value();

        if hand.is_pair() {
            let rank = hand.cards()[0].rank();
            // Aces are never resplit
            if rank == ACE && hand.split {
                return Ok(Decision::Hit);
            }
            return BasicStrategy::lookup(&PAIR_TOTALS, rank, up, "pair");
        }

        let aces = hand.cards().iter().filter(|c| c.is_ace()).count();
        if hand.card_count() == 2 && aces == 1 {
            let other = hand
                .cards()
                .iter()
                .find(|c| !c.is_ace())
                .map(|c| c.point_value())
                .unwrap_or_default();
            return BasicStrategy::lookup(&SOFT_TOTALS, other, up, "soft total");
        }

        let score = hand.score();
        if score > 20 {
            return Ok(Decision::Stand);
        }
        match BasicStrategy::lookup(&HARD_TOTALS, score, up, "hard total")? {
            Decision::Double if hand.card_count() > 2 => Ok(Decision::Hit),
            option => Ok(option),
        }
    }
}

impl InsuranceStrategy for BasicStrategy {
    /// Basic strategy never takes insurance.
    fn take_insurance(&self, _hand: &Hand, _dealers_up_card: Card) -> bool {
        false
    }
}

/// A trait for strategies that can be handed to the round engine, boxed or not.
pub trait Strategy {
    fn decide_option(
        &self,
        hand: &Hand,
        dealers_up_card: Card,
    ) -> Result<Decision, BlackjackGameError>;
    fn take_insurance(&self, hand: &Hand, dealers_up_card: Card) -> bool;
    fn label(&self) -> String;
}

/// A struct that pairs a decision strategy with an insurance strategy.
#[derive(Debug, Clone)]
pub struct PlayerStrategy<D, I>
where
    D: DecisionStrategy,
    I: InsuranceStrategy,
{
    decision_strategy: D,
    insurance_strategy: I,
    label: String,
}

impl<D, I> PlayerStrategy<D, I>
where
    D: DecisionStrategy,
    I: InsuranceStrategy,
{
    pub fn new(decision_strategy: D, insurance_strategy: I, label: impl Into<String>) -> Self {
        PlayerStrategy {
            decision_strategy,
            insurance_strategy,
            label: label.into(),
        }
    }
}

impl PlayerStrategy<BasicStrategy, BasicStrategy> {
    /// Basic strategy, insurance declined.
    pub fn basic() -> Self {
        PlayerStrategy::new(BasicStrategy, BasicStrategy, "basic strategy")
    }
}

impl<D, I> Strategy for PlayerStrategy<D, I>
where
    D: DecisionStrategy,
    I: InsuranceStrategy,
{
    fn decide_option(
        &self,
        hand: &Hand,
        dealers_up_card: Card,
    ) -> Result<Decision, BlackjackGameError> {
        self.decision_strategy.decide(hand, dealers_up_card)
    }

    fn take_insurance(&self, hand: &Hand, dealers_up_card: Card) -> bool {
        self.insurance_strategy.take_insurance(hand, dealers_up_card)
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn decide_option(
        &self,
        hand: &Hand,
        dealers_up_card: Card,
    ) -> Result<Decision, BlackjackGameError> {
        (**self).decide_option(hand, dealers_up_card)
    }

    fn take_insurance(&self, hand: &Hand, dealers_up_card: Card) -> bool {
        (**self).take_insurance(hand, dealers_up_card)
    }

    fn label(&self) -> String {
        (**self).label()
    }
}
