use crate::card::{Card, ACE, CLUBS, KING, SPADES};
use crate::BlackjackGameError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

pub const CARDS_PER_DECK: usize = 52;

/// A multi-deck shoe. Cards are dealt from the front, `cursor` counts how many have been dealt since
/// the last shuffle. The shoe keeps the Hi-Lo running count of the dealt cards and the number of times
/// it has been shuffled.
pub struct Shoe {
    cards: Vec<Card>,
    cursor: usize,
    num_decks: usize,
    running_count: i32,
    shuffles: u32,
    rng: StdRng,
}

impl Shoe {
    /// Associated function for building an unshuffled shoe of `num_decks` decks, seeded from entropy.
    pub fn new(num_decks: usize) -> Shoe {
        Shoe::with_rng(num_decks, StdRng::from_entropy())
    }

    /// Same as `Shoe::new` but every shuffle is reproducible from `seed`.
    pub fn with_seed(num_decks: usize, seed: u64) -> Shoe {
        Shoe::with_rng(num_decks, StdRng::seed_from_u64(seed))
    }

    fn with_rng(num_decks: usize, rng: StdRng) -> Shoe {
        let mut cards = Vec::with_capacity(num_decks * CARDS_PER_DECK);
        for _ in 0..num_decks {
            for suit in SPADES..=CLUBS {
                for rank in ACE..=KING {
                    cards.push(Card { rank, suit });
                }
            }
        }

        Shoe {
            cards,
            cursor: 0,
            num_decks,
            running_count: 0,
            shuffles: 0,
            rng,
        }
    }

    /// Builds an ordered shoe whose first cards are `top`, in that order, followed by the rest of the
    /// `num_decks` decks unshuffled. Used to script the cards of a round.
    /// Fails if `top` asks for more copies of a card than the decks contain.
    pub fn stacked(num_decks: usize, top: &[Card]) -> Result<Shoe, BlackjackGameError> {
        let mut shoe = Shoe::with_seed(num_decks, 0);
        let mut rest = std::mem::take(&mut shoe.cards);
        let mut stacked = Vec::with_capacity(rest.len());
        for card in top {
            match rest.iter().position(|c| c == card) {
                Some(i) => stacked.push(rest.remove(i)),
                None => {
                    return Err(BlackjackGameError::invalid_operation(format!(
                        "cannot stack {} more than {} time(s)",
                        card, num_decks
                    )))
                }
            }
        }
        stacked.append(&mut rest);
        shoe.cards = stacked;
        Ok(shoe)
    }

    /// Shuffles every card in the shoe back together. Resets the cursor and the running count.
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
        self.cursor = 0;
        self.running_count = 0;
        self.shuffles += 1;
        debug!(shuffles = self.shuffles, "shoe shuffled");
    }

    /// Deals the next card. If the shoe has run dry it is reshuffled first, so this never fails.
    pub fn deal_card(&mut self) -> Card {
        if self.cursor == self.cards.len() {
            warn!(
                num_decks = self.num_decks,
                "shoe exhausted mid round, reshuffling"
            );
            self.shuffle();
        }
        let card = self.cards[self.cursor];
        self.cursor += 1;
        self.running_count += card.count_value();
        card
    }

    pub fn cards_left(&self) -> usize {
        self.cards.len() - self.cursor
    }

    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn num_decks(&self) -> usize {
        self.num_decks
    }

    /// Hi-Lo running count of the cards dealt since the last shuffle.
    pub fn running_count(&self) -> i32 {
        self.running_count
    }

    /// The number of shuffles performed since the shoe was built.
    pub fn shuffles(&self) -> u32 {
        self.shuffles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_shoe_is_ordered_and_full() {
        let shoe = Shoe::new(6);
        assert_eq!(shoe.total_cards(), 312);
        assert_eq!(shoe.cards_left(), 312);
        assert_eq!(shoe.running_count(), 0);
        assert_eq!(shoe.shuffles(), 0);
    }

    #[test]
    fn single_deck_deals_each_card_once() {
        let mut shoe = Shoe::with_seed(1, 7);
        shoe.shuffle();
        let mut seen = HashSet::new();
        for _ in 0..52 {
            assert!(seen.insert(shoe.deal_card()));
        }
        assert_eq!(seen.len(), 52);
        assert_eq!(shoe.cards_left(), 0);
        // a full deck counts back to zero
        assert_eq!(shoe.running_count(), 0);
        assert_eq!(shoe.shuffles(), 1);

        // the 53rd card reshuffles instead of failing
        let _ = shoe.deal_card();
        assert_eq!(shoe.shuffles(), 2);
        assert_eq!(shoe.cards_left(), 51);
    }

    #[test]
    fn running_count_tracks_dealt_cards() {
        let mut shoe = Shoe::with_seed(2, 11);
        shoe.shuffle();
        let mut expected = 0;
        for _ in 0..40 {
            expected += shoe.deal_card().count_value();
        }
        assert_eq!(shoe.running_count(), expected);
        assert_eq!(shoe.cards_left(), 64);

        shoe.shuffle();
        assert_eq!(shoe.running_count(), 0);
        assert_eq!(shoe.cards_left(), 104);
    }

    #[test]
    fn seeded_shoes_shuffle_identically() {
        let mut a = Shoe::with_seed(6, 42);
        let mut b = Shoe::with_seed(6, 42);
        a.shuffle();
        b.shuffle();
        let first: Vec<Card> = (0..20).map(|_| a.deal_card()).collect();
        let second: Vec<Card> = (0..20).map(|_| b.deal_card()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn stacked_shoe_deals_top_cards_first() {
        let top = [
            Card::new(5, 0).unwrap(),
            Card::new(6, 1).unwrap(),
            Card::new(5, 0).unwrap(),
        ];
        let mut shoe = Shoe::stacked(2, &top).unwrap();
        assert_eq!(shoe.total_cards(), 104);
        for card in top.iter() {
            assert_eq!(shoe.deal_card(), *card);
        }

        // a single deck only has one five of spades
        assert!(Shoe::stacked(1, &top).is_err());
    }
}
