//! Settlement of a finished hand. The outcome is kept as a small record rather than a string code, the
//! payout is computed from it by rule.

use crate::hand::Hand;
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    Win,
    Loss,
    Push,
}

/// How a hand finished and the modifiers that change its payout. `natural` is set whenever a two card
/// 21 decided the hand: a player blackjack win, a push of two blackjacks, or a loss to a dealer blackjack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HandOutcome {
    pub outcome: Outcome,
    pub natural: bool,
    pub insured: bool,
    pub doubled: bool,
    pub split: bool,
}

impl HandOutcome {
    /// Classifies a finished player hand against the dealers final hand, first match wins.
    pub fn classify(player: &Hand, dealer: &Hand) -> HandOutcome {
        let (p, d) = (player.score(), dealer.score());
        let (pc, dc) = (player.card_count(), dealer.card_count());
        let player_natural = p == 21 && pc == 2 && !player.split;
        let dealer_natural = d == 21 && dc == 2;

        let (outcome, natural) = if p > 21 {
            (Outcome::Loss, false)
        } else if d > 21 {
            (Outcome::Win, false)
        } else if player_natural && dealer_natural {
            (Outcome::Push, true)
        } else if player_natural {
            (Outcome::Win, true)
        } else if dealer_natural {
            (Outcome::Loss, true)
        } else if p > d {
            (Outcome::Win, false)
        } else if p < d {
            (Outcome::Loss, false)
        } else {
            (Outcome::Push, false)
        };

        HandOutcome {
            outcome,
            natural,
            insured: player.insured,
            doubled: player.doubled,
            split: player.split,
        }
    }

    /// True when the dealer held a two card 21, which is exactly when an insurance bet pays.
    pub fn dealer_natural(&self) -> bool {
        self.natural && self.outcome != Outcome::Win
    }

    /// Net result of the hand as a multiple of its original bet.
    ///
    /// The main bet pays 1 (1.5 for a natural), pushes 0 and loses 1, all doubled when the hand was
    /// doubled down. An insurance wager of half the bet is settled separately: it pays 2 to 1 when the
    /// dealer had a natural (+1) and is lost otherwise (-0.5).
    pub fn multiplier(&self) -> f64 {
        let main = match (self.outcome, self.natural) {
            (Outcome::Win, true) => 1.5,
            (Outcome::Win, false) => 1.0,
            (Outcome::Push, _) => 0.0,
            (Outcome::Loss, _) => -1.0,
        };
        let main = if self.doubled { main * 2.0 } else { main };
        let insurance = match (self.insured, self.dealer_natural()) {
            (false, _) => 0.0,
            (true, true) => 1.0,
            (true, false) => -0.5,
        };
        main + insurance
    }

    /// Total money put on the table for the hand, as a multiple of its original bet.
    pub fn wager_multiplier(&self) -> f64 {
        let main = if self.doubled { 2.0 } else { 1.0 };
        if self.insured {
            main + 0.5
        } else {
            main
        }
    }

    pub fn winnings(&self, bet: u32) -> f64 {
        self.multiplier() * bet as f64
    }

    pub fn wagered(&self, bet: u32) -> f64 {
        self.wager_multiplier() * bet as f64
    }
}

impl Display for HandOutcome {
    /// Short code: W/L/P, then B for a natural, I insured, D doubled and S split.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut code = String::with_capacity(5);
        code.push(match self.outcome {
            Outcome::Win => 'W',
            Outcome::Loss => 'L',
            Outcome::Push => 'P',
        });
        for (flag, c) in [
            (self.natural, 'B'),
            (self.insured, 'I'),
            (self.doubled, 'D'),
            (self.split, 'S'),
        ] {
            if flag {
                code.push(c);
            }
        }
        write!(f, "{}", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::hand_of;

    fn outcome(outcome: Outcome, natural: bool) -> HandOutcome {
        HandOutcome {
            outcome,
            natural,
            insured: false,
            doubled: false,
            split: false,
        }
    }

    #[test]
    fn classification_precedence() {
        // player bust loses even when the dealer busts
        let o = HandOutcome::classify(&hand_of(1, &[10, 6, 9]), &hand_of(0, &[10, 6, 8]));
        assert_eq!((o.outcome, o.natural), (Outcome::Loss, false));

        let o = HandOutcome::classify(&hand_of(1, &[10, 6]), &hand_of(0, &[10, 6, 8]));
        assert_eq!((o.outcome, o.natural), (Outcome::Win, false));

        let o = HandOutcome::classify(&hand_of(1, &[1, 13]), &hand_of(0, &[12, 1]));
        assert_eq!((o.outcome, o.natural), (Outcome::Push, true));

        let o = HandOutcome::classify(&hand_of(1, &[1, 13]), &hand_of(0, &[10, 9]));
        assert_eq!((o.outcome, o.natural), (Outcome::Win, true));

        // a three card 21 still loses to a dealer natural
        let o = HandOutcome::classify(&hand_of(1, &[7, 7, 7]), &hand_of(0, &[10, 1]));
        assert_eq!((o.outcome, o.natural), (Outcome::Loss, true));

        let o = HandOutcome::classify(&hand_of(1, &[10, 8]), &hand_of(0, &[10, 7]));
        assert_eq!(o.outcome, Outcome::Win);
        let o = HandOutcome::classify(&hand_of(1, &[10, 7]), &hand_of(0, &[10, 8]));
        assert_eq!(o.outcome, Outcome::Loss);
        let o = HandOutcome::classify(&hand_of(1, &[10, 7]), &hand_of(0, &[9, 8]));
        assert_eq!((o.outcome, o.natural), (Outcome::Push, false));
    }

    #[test]
    fn split_21_is_not_a_natural() {
        let mut hand = hand_of(1, &[1, 10]);
        hand.split = true;
        let o = HandOutcome::classify(&hand, &hand_of(0, &[10, 9]));
        assert_eq!((o.outcome, o.natural, o.split), (Outcome::Win, false, true));
        assert_eq!(o.multiplier(), 1.0);
    }

    #[test]
    fn payout_multipliers() {
        assert_eq!(outcome(Outcome::Win, false).multiplier(), 1.0);
        assert_eq!(outcome(Outcome::Win, true).multiplier(), 1.5);
        assert_eq!(outcome(Outcome::Push, false).multiplier(), 0.0);
        assert_eq!(outcome(Outcome::Push, true).multiplier(), 0.0);
        assert_eq!(outcome(Outcome::Loss, false).multiplier(), -1.0);
        assert_eq!(outcome(Outcome::Loss, true).multiplier(), -1.0);

        let doubled = HandOutcome {
            doubled: true,
            ..outcome(Outcome::Win, false)
        };
        assert_eq!(doubled.multiplier(), 2.0);
        assert_eq!(doubled.wager_multiplier(), 2.0);
        assert_eq!(doubled.winnings(100), 200.0);
    }

    #[test]
    fn insurance_settles_separately() {
        let insured = |o: Outcome, natural: bool| HandOutcome {
            insured: true,
            ..outcome(o, natural)
        };
        // loss to a dealer natural is covered by the insurance
        assert_eq!(insured(Outcome::Loss, true).multiplier(), 0.0);
        // push of two naturals plus a winning insurance bet
        assert_eq!(insured(Outcome::Push, true).multiplier(), 1.0);
        // the insurance bet is lost whenever the dealer had no natural
        assert_eq!(insured(Outcome::Win, true).multiplier(), 1.0);
        assert_eq!(insured(Outcome::Win, false).multiplier(), 0.5);
        assert_eq!(insured(Outcome::Loss, false).multiplier(), -1.5);
        assert_eq!(insured(Outcome::Push, false).multiplier(), -0.5);
        assert_eq!(insured(Outcome::Loss, false).wager_multiplier(), 1.5);

        let doubled_loss = HandOutcome {
            doubled: true,
            ..insured(Outcome::Loss, false)
        };
        assert_eq!(doubled_loss.multiplier(), -2.5);
        assert_eq!(doubled_loss.wagered(100), 250.0);
    }

    #[test]
    fn codes() {
        assert_eq!(outcome(Outcome::Win, true).to_string(), "WB");
        let o = HandOutcome {
            outcome: Outcome::Loss,
            natural: false,
            insured: true,
            doubled: true,
            split: true,
        };
        assert_eq!(o.to_string(), "LIDS");
        assert_eq!(outcome(Outcome::Push, false).to_string(), "P");
    }
}
