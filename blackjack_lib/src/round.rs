//! The round engine. One call to `play_round` deals, offers insurance, checks for naturals, plays every
//! player hand (splits included), plays the dealer and settles each hand.

use crate::card::Card;
use crate::hand::Hand;
use crate::outcome::HandOutcome;
use crate::shoe::Shoe;
use crate::strategy::{dealer_decision, Decision, Strategy};
use crate::BlackjackGameError;
use serde::Serialize;
use tracing::debug;

/// How the round came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundEnding {
    /// The dealer had a natural, nothing was played.
    DealerNatural,
    /// Every player hand was a natural, nothing was played.
    PlayerNatural,
    /// Every player hand busted, the dealer did not draw.
    AllBusted,
    /// Player and dealer both played their hands out.
    PlayedOut,
}

/// Final state of a single player hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandSummary {
    pub cards: Vec<Card>,
    pub score: u8,
    pub outcome: HandOutcome,
    pub bet: u32,
    pub wagered: f64,
    pub winnings: f64,
}

impl HandSummary {
    fn settle(hand: &Hand, dealer: &Hand) -> HandSummary {
        let outcome = HandOutcome::classify(hand, dealer);
        HandSummary {
            cards: hand.cards().to_vec(),
            score: hand.score(),
            outcome,
            bet: hand.bet(),
            wagered: outcome.wagered(hand.bet()),
            winnings: outcome.winnings(hand.bet()),
        }
    }

    /// The ranks of the cards without suits, e.g. `T6`.
    pub fn rank_symbols(&self) -> String {
        self.cards.iter().map(|c| c.rank_symbol()).collect()
    }
}

/// Everything recorded about one round. The shoe fields are captured before the first card is dealt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundResult {
    pub round: u32,
    pub shuffle: u32,
    pub cards_left: usize,
    pub running_count: i32,
    pub hands: Vec<HandSummary>,
    pub dealer_cards: Vec<Card>,
    pub dealer_score: u8,
    pub ending: RoundEnding,
}

impl RoundResult {
    pub fn num_hands(&self) -> usize {
        self.hands.len()
    }

    pub fn net_winnings(&self) -> f64 {
        self.hands.iter().map(|h| h.winnings).sum()
    }

    pub fn total_wagered(&self) -> f64 {
        self.hands.iter().map(|h| h.wagered).sum()
    }

    pub fn dealer_rank_symbols(&self) -> String {
        self.dealer_cards.iter().map(|c| c.rank_symbol()).collect()
    }
}

/// Plays a single round from `shoe` with one starting hand of `bet_unit`.
///
/// The shoe is the only thing mutated. Reshuffling between rounds is the callers business, see
/// `BlackjackTable`. An error means the strategy asked for an illegal play, the round is abandoned.
pub fn play_round<S: Strategy + ?Sized>(
    shoe: &mut Shoe,
    bet_unit: u32,
    strategy: &S,
    round: u32,
) -> Result<RoundResult, BlackjackGameError> {
    let shuffle = shoe.shuffles();
    let cards_left = shoe.cards_left();
    let running_count = shoe.running_count();

    // Dealers second card stays face down until the dealer plays
    let mut dealer = Hand::new(0);
    dealer.add_card(shoe.deal_card());
    dealer.add_card(shoe.deal_card());

    let mut hands = vec![Hand::new(bet_unit)];
    hands[0].add_card(shoe.deal_card());
    hands[0].add_card(shoe.deal_card());

    let up_card = dealer.cards()[0];
    debug!(round, player = %hands[0], up_card = %up_card, "dealt");

    // Insurance is only ever placed on the starting hand
    if up_card.is_ace() && strategy.take_insurance(&hands[0], up_card) {
        hands[0].insured = true;
        debug!(round, "insurance taken");
    }

    let ending = if dealer.score() == 21 {
        debug!(round, dealer = %dealer, "dealer natural");
        RoundEnding::DealerNatural
    } else if hands.iter().all(|h| h.score() == 21) {
        debug!(round, "player natural");
        RoundEnding::PlayerNatural
    } else {
        // Splitting appends hands, so the length is re-read on every pass
        let mut idx = 0;
        while idx < hands.len() {
            play_hand(shoe, &mut hands, idx, up_card, strategy)?;
            if hands[idx].is_busted() {
                debug!(round, hand = idx + 1, player = %hands[idx], "player busted");
            }
            idx += 1;
        }

        if hands.iter().all(Hand::is_busted) {
            RoundEnding::AllBusted
        } else {
            play_dealer(shoe, &mut dealer);
            RoundEnding::PlayedOut
        }
    };

    let summaries = hands
        .iter()
        .map(|hand| HandSummary::settle(hand, &dealer))
        .collect::<Vec<HandSummary>>();
    for (i, summary) in summaries.iter().enumerate() {
        debug!(
            round,
            hand = i + 1,
            outcome = %summary.outcome,
            winnings = summary.winnings,
            "settled"
        );
    }

    Ok(RoundResult {
        round,
        shuffle,
        cards_left,
        running_count,
        hands: summaries,
        dealer_cards: dealer.cards().to_vec(),
        dealer_score: dealer.score(),
        ending,
    })
}

/// Plays the hand at `idx` until it stands, doubles, busts or reaches 21.
fn play_hand<S: Strategy + ?Sized>(
    shoe: &mut Shoe,
    hands: &mut Vec<Hand>,
    idx: usize,
    up_card: Card,
    strategy: &S,
) -> Result<(), BlackjackGameError> {
    while hands[idx].score() < 21 {
        let hand = &hands[idx];
        // One card on each split ace, no further action
        if hand.split && hand.card(0).map_or(false, |c| c.is_ace()) {
            break;
        }

        let decision = strategy.decide_option(hand, up_card)?;
        debug!(hand = idx + 1, player = %hand, %decision, "player decision");
        match decision {
            Decision::Hit => hands[idx].add_card(shoe.deal_card()),
            Decision::Stand => break,
            Decision::Double => {
                if hands[idx].card_count() != 2 {
                    return Err(BlackjackGameError::invalid_operation(format!(
                        "cannot double down on a hand of {} cards",
                        hands[idx].card_count()
                    )));
                }
                hands[idx].doubled = true;
                hands[idx].add_card(shoe.deal_card());
                break;
            }
            Decision::Split => {
                if split_hand(shoe, hands, idx)? {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Splits the pair at `idx`. The second card moves to a new hand with the same bet at the end of
/// `hands`, and each of the two hands is dealt one card. Returns true when aces were split.
fn split_hand(
    shoe: &mut Shoe,
    hands: &mut Vec<Hand>,
    idx: usize,
) -> Result<bool, BlackjackGameError> {
    if !hands[idx].is_pair() {
        return Err(BlackjackGameError::invalid_operation(format!(
            "cannot split {}, not a pair",
            hands[idx]
        )));
    }

    let split_card = hands[idx].remove_card(1)?;
    let mut new_hand = Hand::new(hands[idx].bet());
    new_hand.add_card(split_card);
    new_hand.split = true;
    hands[idx].split = true;

    hands[idx].add_card(shoe.deal_card());
    new_hand.add_card(shoe.deal_card());
    hands.push(new_hand);

    Ok(split_card.is_ace())
}

fn play_dealer(shoe: &mut Shoe, dealer: &mut Hand) {
    while dealer.score() < 21 {
        match dealer_decision(dealer) {
            Decision::Hit => {
                let card = shoe.deal_card();
                debug!(%card, "dealer hits");
                dealer.add_card(card);
            }
            _ => break,
        }
    }
    debug!(dealer = %dealer, "dealer done");
}
