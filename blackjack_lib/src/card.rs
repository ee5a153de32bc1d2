use crate::BlackjackGameError;
use serde::Serialize;
use std::fmt::Display;

pub const ACE: u8 = 1;
pub const JACK: u8 = 11;
pub const QUEEN: u8 = 12;
pub const KING: u8 = 13;

pub const SPADES: u8 = 0;
pub const HEARTS: u8 = 1;
pub const DIAMONDS: u8 = 2;
pub const CLUBS: u8 = 3;

const RANK_SYMBOLS: [char; 13] = [
    'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K',
];
const SUIT_SYMBOLS: [char; 4] = ['S', 'H', 'D', 'C'];

/// A single playing card. Cards are plain values, they are created once by the `Shoe` and copied into
/// whichever hand currently holds them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Card {
    pub(crate) rank: u8,
    pub(crate) suit: u8,
}

impl Card {
    /// Builds a card, `rank` must be in `1..=13` (ace low) and `suit` in `0..=3`.
    pub fn new(rank: u8, suit: u8) -> Result<Card, BlackjackGameError> {
        if !(ACE..=KING).contains(&rank) || suit > CLUBS {
            return Err(BlackjackGameError::InvalidCard { rank, suit });
        }
        Ok(Card { rank, suit })
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> u8 {
        self.suit
    }

    pub fn is_ace(&self) -> bool {
        self.rank == ACE
    }

    /// The number of points the card is worth. Face cards count 10 and an ace counts 11,
    /// hand scoring is responsible for reducing aces to 1.
    pub fn point_value(&self) -> u8 {
        match self.rank {
            ACE => 11,
            r if r > 10 => 10,
            r => r,
        }
    }

    /// Hi-Lo count value: +1 for 2-6, 0 for 7-9, -1 for tens, faces and aces.
    pub fn count_value(&self) -> i32 {
        match self.rank {
            2..=6 => 1,
            7..=9 => 0,
            _ => -1,
        }
    }

    pub fn rank_symbol(&self) -> char {
        RANK_SYMBOLS[(self.rank - 1) as usize]
    }

    pub fn suit_symbol(&self) -> char {
        SUIT_SYMBOLS[self.suit as usize]
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank_symbol(), self.suit_symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_cards() {
        assert_eq!(
            Card::new(0, SPADES),
            Err(BlackjackGameError::InvalidCard { rank: 0, suit: 0 })
        );
        assert!(Card::new(14, HEARTS).is_err());
        assert!(Card::new(5, 4).is_err());
        assert!(Card::new(KING, CLUBS).is_ok());
    }

    #[test]
    fn point_values() {
        let values: Vec<u8> = (1..=13)
            .map(|r| Card::new(r, SPADES).unwrap().point_value())
            .collect();
        assert_eq!(values, vec![11, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10]);
    }

    #[test]
    fn hi_lo_count_values() {
        let counts: Vec<i32> = (1..=13)
            .map(|r| Card::new(r, DIAMONDS).unwrap().count_value())
            .collect();
        assert_eq!(counts, vec![-1, 1, 1, 1, 1, 1, 0, 0, 0, -1, -1, -1, -1]);
        // A full deck counts to zero
        let total: i32 = (1..=13).map(|r| Card::new(r, 0).unwrap().count_value()).sum();
        assert_eq!(total, 0);
    }

    #[test]
    fn display_uses_one_char_symbols() {
        assert_eq!(Card::new(6, HEARTS).unwrap().to_string(), "6H");
        assert_eq!(Card::new(QUEEN, SPADES).unwrap().to_string(), "QS");
        assert_eq!(Card::new(10, CLUBS).unwrap().to_string(), "TC");
        assert_eq!(Card::new(ACE, DIAMONDS).unwrap().to_string(), "AD");
    }
}
