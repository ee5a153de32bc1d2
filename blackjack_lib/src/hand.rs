use crate::card::{Card, ACE};
use crate::BlackjackGameError;
use std::fmt::Display;

/// A hand of blackjack: the cards in deal order, the bet riding on it and the flags that change how it
/// is paid. The score is never cached, it is recomputed from the cards on every call since a split
/// removes a card from the hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    cards: Vec<Card>,
    bet: u32,
    pub doubled: bool,
    pub split: bool,
    pub insured: bool,
}

impl Hand {
    /// Associated function to create a new empty `Hand` carrying `bet`.
    pub fn new(bet: u32) -> Hand {
        Hand {
            cards: Vec::new(),
            bet,
            doubled: false,
            split: false,
            insured: false,
        }
    }

    pub fn bet(&self) -> u32 {
        self.bet
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, position: usize) -> Option<Card> {
        self.cards.get(position).copied()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Removes and returns the card at `position`. Only ever used when a pair is split.
    pub fn remove_card(&mut self, position: usize) -> Result<Card, BlackjackGameError> {
        if position >= self.cards.len() {
            return Err(BlackjackGameError::invalid_operation(format!(
                "cannot remove card {} from a hand of {} cards",
                position,
                self.cards.len()
            )));
        }
        Ok(self.cards.remove(position))
    }

    /// The blackjack score of the hand. Every ace starts at 11 and is knocked down to 1, one at a time,
    /// while the total is over 21.
    pub fn score(&self) -> u8 {
        let mut aces = 0;
        let mut total: u32 = 0;
        for card in self.cards.iter() {
            if card.is_ace() {
                aces += 1;
            }
            total += card.point_value() as u32;
        }

        while total > 21 && aces > 0 {
            total -= 10;
            aces -= 1;
        }

        u8::try_from(total).unwrap_or(u8::MAX)
    }

    /// True for a two card 17 that leans on an ace counted as 11, i.e. ace-six.
    pub fn is_soft_17(&self) -> bool {
        self.cards.len() == 2 && self.score() == 17 && self.contains_rank(ACE)
    }

    pub fn is_pair(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].rank() == self.cards[1].rank()
    }

    /// A two card 21 that did not come out of a split.
    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && !self.split && self.score() == 21
    }

    pub fn is_busted(&self) -> bool {
        self.score() > 21
    }

    pub fn contains_rank(&self, rank: u8) -> bool {
        self.cards.iter().any(|c| c.rank() == rank)
    }

    /// Formats the ranks of the cards without suits, e.g. `A7T`.
    pub fn rank_symbols(&self) -> String {
        self.cards.iter().map(|c| c.rank_symbol()).collect()
    }
}

impl Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cards = self
            .cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "{} ({})", cards, self.score())
    }
}

#[cfg(test)]
pub(crate) fn hand_of(bet: u32, ranks: &[u8]) -> Hand {
    let mut hand = Hand::new(bet);
    for (i, rank) in ranks.iter().enumerate() {
        hand.add_card(Card::new(*rank, (i % 4) as u8).unwrap());
    }
    hand
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ace_six_is_soft_17() {
        let hand = hand_of(100, &[1, 6]);
        assert_eq!(hand.score(), 17);
        assert!(hand.is_soft_17());
    }

    #[test]
    fn three_card_soft_18_is_not_soft_17() {
        // 11 + 6 + 11 = 28, one ace drops to 1
        let hand = hand_of(100, &[1, 6, 1]);
        assert_eq!(hand.score(), 18);
        assert!(!hand.is_soft_17());
    }

    #[test]
    fn aces_reduce_one_at_a_time() {
        assert_eq!(hand_of(1, &[1, 1]).score(), 12);
        assert_eq!(hand_of(1, &[1, 1, 1, 1]).score(), 14);
        assert_eq!(hand_of(1, &[1, 13]).score(), 21);
        assert_eq!(hand_of(1, &[1, 9, 5]).score(), 15);
        assert_eq!(hand_of(1, &[10, 6, 1, 1]).score(), 18);
        // nothing left to reduce
        assert_eq!(hand_of(1, &[10, 12, 5]).score(), 25);
        assert_eq!(hand_of(1, &[1, 10, 12, 5]).score(), 26);
    }

    #[test]
    fn hard_17_is_not_soft() {
        assert!(!hand_of(1, &[10, 7]).is_soft_17());
        assert!(!hand_of(1, &[1, 6, 10]).is_soft_17());
    }

    #[test]
    fn pairs_compare_rank_not_points() {
        assert!(hand_of(1, &[8, 8]).is_pair());
        assert!(!hand_of(1, &[10, 13]).is_pair());
        assert!(!hand_of(1, &[8, 8, 8]).is_pair());
    }

    #[test]
    fn naturals_require_two_unsplit_cards() {
        let mut hand = hand_of(100, &[1, 13]);
        assert!(hand.is_natural());
        hand.split = true;
        assert!(!hand.is_natural());
        assert!(!hand_of(100, &[7, 7, 7]).is_natural());
    }

    #[test]
    fn remove_card_recomputes_score() {
        let mut hand = hand_of(100, &[1, 1]);
        assert_eq!(hand.score(), 12);
        let removed = hand.remove_card(1).unwrap();
        assert!(removed.is_ace());
        assert_eq!(hand.score(), 11);
        assert!(hand.remove_card(3).is_err());
    }

    #[test]
    fn rank_symbols_drop_suits() {
        assert_eq!(hand_of(1, &[1, 10, 12]).rank_symbols(), "ATQ");
    }
}
