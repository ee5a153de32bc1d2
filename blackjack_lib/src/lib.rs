//! Round engine for a multi-deck blackjack simulation: cards, hands, the shoe, the decision policies and
//! the algorithm that plays and settles a single round.

pub mod card;
pub mod error;
pub mod hand;
pub mod outcome;
pub mod round;
pub mod shoe;
pub mod strategy;
pub mod table;

pub use card::Card;
pub use error::BlackjackGameError;
pub use hand::Hand;
pub use outcome::{HandOutcome, Outcome};
pub use round::{play_round, HandSummary, RoundEnding, RoundResult};
pub use shoe::Shoe;
pub use table::{BlackjackTable, TableConfig};

pub mod prelude {
    pub use super::strategy::prelude::*;
    pub use super::{
        play_round, BlackjackGameError, BlackjackTable, Card, Hand, HandOutcome, HandSummary,
        Outcome, RoundEnding, RoundResult, Shoe, TableConfig,
    };
}
