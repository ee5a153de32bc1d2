use crate::round::{play_round, RoundResult};
use crate::shoe::{Shoe, CARDS_PER_DECK};
use crate::strategy::Strategy;
use crate::BlackjackGameError;
use tracing::debug;

/// The parameters of a table, read only for the life of a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub num_decks: usize,
    /// Fraction of the shoe that must remain for a round to be dealt without reshuffling first.
    pub reshuffle_threshold: f64,
    pub bet_unit: u32,
}

impl TableConfig {
    /// The number of cards below which the shoe is reshuffled before a round.
    pub fn reshuffle_cards(&self) -> usize {
        ((self.num_decks * CARDS_PER_DECK) as f64 * self.reshuffle_threshold) as usize
    }
}

impl Default for TableConfig {
    /// Six decks, a cut card at 70% and a bet unit of 100.
    fn default() -> Self {
        TableConfig {
            num_decks: 6,
            reshuffle_threshold: 0.3,
            bet_unit: 100,
        }
    }
}

/// Struct for a simulated blackjack table. Owns the shoe, which lives for the whole simulation, and
/// applies the reshuffle policy between rounds.
pub struct BlackjackTable<S: Strategy> {
    shoe: Shoe,
    config: TableConfig,
    strategy: S,
    rounds_played: u32,
}

impl<S: Strategy> BlackjackTable<S> {
    /// Associated function to create a new table with a freshly shuffled shoe.
    pub fn new(config: TableConfig, strategy: S) -> Self {
        let mut shoe = Shoe::new(config.num_decks);
        shoe.shuffle();
        BlackjackTable::with_shoe(config, strategy, shoe)
    }

    /// Same as `BlackjackTable::new` but the shoe shuffles reproducibly from `seed`.
    pub fn with_seed(config: TableConfig, strategy: S, seed: u64) -> Self {
        let mut shoe = Shoe::with_seed(config.num_decks, seed);
        shoe.shuffle();
        BlackjackTable::with_shoe(config, strategy, shoe)
    }

    /// Uses `shoe` as is, it is not shuffled first.
    pub fn with_shoe(config: TableConfig, strategy: S, shoe: Shoe) -> Self {
        BlackjackTable {
            shoe,
            config,
            strategy,
            rounds_played: 0,
        }
    }

    /// Plays the next round, reshuffling first when the shoe has passed the cut card.
    pub fn play_round(&mut self) -> Result<RoundResult, BlackjackGameError> {
        if self.shoe.cards_left() < self.config.reshuffle_cards() {
            debug!(
                cards_left = self.shoe.cards_left(),
                threshold = self.config.reshuffle_cards(),
                "cut card reached"
            );
            self.shoe.shuffle();
        }
        self.rounds_played += 1;
        play_round(
            &mut self.shoe,
            self.config.bet_unit,
            &self.strategy,
            self.rounds_played,
        )
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn label(&self) -> String {
        self.strategy.label()
    }
}
