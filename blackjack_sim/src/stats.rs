use blackjack_lib::{Outcome, RoundResult};
use std::fmt::Display;

/// Win, loss and push tallies for one category of hands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u64,
    pub losses: u64,
    pub pushes: u64,
}

impl Tally {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Push => self.pushes += 1,
        }
    }

    fn merge(&mut self, other: &Tally) {
        self.wins += other.wins;
        self.losses += other.losses;
        self.pushes += other.pushes;
    }

    pub fn total(&self) -> u64 {
        self.wins + self.losses + self.pushes
    }
}

/// Running totals accumulated over every round of a simulation.
///
/// `net` classifies whole rounds by the sign of their net winnings, `overall` counts every hand. Each
/// hand is also counted in exactly one of `blackjack`, `doubled` and `plain`, and split hands are
/// additionally counted in `split`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlackjackStats {
    pub rounds: u64,
    pub hands: u64,
    pub net: Tally,
    pub overall: Tally,
    pub blackjack: Tally,
    pub doubled: Tally,
    pub split: Tally,
    pub plain: Tally,
    pub insurance_wins: u64,
    pub insurance_losses: u64,
    pub total_winnings: f64,
    pub total_wagered: f64,
}

impl BlackjackStats {
    pub fn new() -> Self {
        BlackjackStats::default()
    }

    pub fn record_round(&mut self, result: &RoundResult) {
        self.rounds += 1;
        let net = result.net_winnings();
        if net > 0.0 {
            self.net.wins += 1;
        } else if net < 0.0 {
            self.net.losses += 1;
        } else {
            self.net.pushes += 1;
        }

        for hand in result.hands.iter() {
            let outcome = hand.outcome;
            self.hands += 1;
            self.overall.record(outcome.outcome);
            if outcome.natural {
                self.blackjack.record(outcome.outcome);
            } else if outcome.doubled {
                self.doubled.record(outcome.outcome);
            } else {
                self.plain.record(outcome.outcome);
            }
            if outcome.split {
                self.split.record(outcome.outcome);
            }
            if outcome.insured {
                if outcome.dealer_natural() {
                    self.insurance_wins += 1;
                } else {
                    self.insurance_losses += 1;
                }
            }
        }

        self.total_winnings += net;
        self.total_wagered += result.total_wagered();
    }

    /// Folds the totals of `other` into `self`.
    pub fn merge(&mut self, other: &BlackjackStats) {
        self.rounds += other.rounds;
        self.hands += other.hands;
        self.net.merge(&other.net);
        self.overall.merge(&other.overall);
        self.blackjack.merge(&other.blackjack);
        self.doubled.merge(&other.doubled);
        self.split.merge(&other.split);
        self.plain.merge(&other.plain);
        self.insurance_wins += other.insurance_wins;
        self.insurance_losses += other.insurance_losses;
        self.total_winnings += other.total_winnings;
        self.total_wagered += other.total_wagered;
    }

    /// Net winnings as a fraction of the total amount put at risk.
    pub fn house_edge(&self) -> f64 {
        if self.total_wagered == 0.0 {
            0.0
        } else {
            -self.total_winnings / self.total_wagered
        }
    }

    pub fn average_winnings_per_round(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.total_winnings / self.rounds as f64
        }
    }
}

fn fraction(n: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        n as f64 / total as f64
    }
}

impl Display for BlackjackStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WIDTH: usize = 80;
        const TEXT_WIDTH: usize = "number of player blackjacks".len() + 20;
        const NUM_WIDTH: usize = WIDTH - TEXT_WIDTH;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "rounds played", self.rounds)?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "hands played", self.hands)?;
        let rows = [
            ("rounds", &self.net),
            ("hands", &self.overall),
            ("blackjack hands", &self.blackjack),
            ("doubled hands", &self.doubled),
            ("split hands", &self.split),
            ("other hands", &self.plain),
        ];
        for (name, tally) in rows.iter() {
            writeln!(
                f,
                "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}",
                format!("{} won/lost/pushed", name),
                format!("{}/{}/{}", tally.wins, tally.losses, tally.pushes)
            )?;
        }
        if self.insurance_wins + self.insurance_losses > 0 {
            writeln!(
                f,
                "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}",
                "insurance won/lost",
                format!("{}/{}", self.insurance_wins, self.insurance_losses)
            )?;
        }
        writeln!(
            f,
            "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.4}",
            "hand win percentage",
            fraction(self.overall.wins, self.overall.total())
        )?;
        writeln!(
            f,
            "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}",
            "total winnings", self.total_winnings
        )?;
        writeln!(
            f,
            "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}",
            "total wagered", self.total_wagered
        )?;
        writeln!(
            f,
            "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}",
            "average winnings per round",
            self.average_winnings_per_round()
        )?;
        writeln!(
            f,
            "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.4}",
            "house edge",
            self.house_edge()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_lib::prelude::*;

    fn round_from(top: &[Card], strategy: &dyn Strategy) -> RoundResult {
        let mut shoe = Shoe::stacked(1, top).unwrap();
        play_round(&mut shoe, 100, strategy, 1).unwrap()
    }

    /// Repeated ranks get successive suits so a single deck can hold them.
    fn cards(ranks: &[u8]) -> Vec<Card> {
        let mut used = std::collections::HashMap::new();
        ranks
            .iter()
            .map(|r| {
                let suit = used.entry(*r).or_insert(0u8);
                let card = Card::new(*r, *suit).unwrap();
                *suit += 1;
                card
            })
            .collect()
    }

    #[test]
    fn records_player_natural() {
        // dealer 9 7, player A K
        let result = round_from(&cards(&[9, 7, 1, 13]), &PlayerStrategy::basic());
        let mut stats = BlackjackStats::new();
        stats.record_round(&result);
        assert_eq!(stats.rounds, 1);
        assert_eq!(stats.hands, 1);
        assert_eq!(stats.net.wins, 1);
        assert_eq!(stats.blackjack.wins, 1);
        assert_eq!(stats.plain.total(), 0);
        assert_eq!(stats.total_winnings, 150.0);
        assert_eq!(stats.total_wagered, 100.0);
    }

    #[test]
    fn records_insurance_against_dealer_natural() {
        let strategy = PlayerStrategy::new(BasicStrategy, AlwaysInsure, "insure");
        // dealer A K, player 10 7
        let result = round_from(&cards(&[1, 13, 10, 7]), &strategy);
        let mut stats = BlackjackStats::new();
        stats.record_round(&result);
        assert_eq!(stats.insurance_wins, 1);
        assert_eq!(stats.insurance_losses, 0);
        assert_eq!(stats.overall.losses, 1);
        assert_eq!(stats.net.pushes, 1);
        assert_eq!(stats.total_winnings, 0.0);
        assert_eq!(stats.total_wagered, 150.0);
        assert!(stats.to_string().contains("insurance won/lost"));
    }

    #[test]
    fn records_split_hands() {
        // dealer 6 10, player 8 8 splits, the first hand draws 3 and doubles into a 10, the second draws 10
        let result = round_from(&cards(&[6, 10, 8, 8, 3, 10, 10]), &PlayerStrategy::basic());
        let mut stats = BlackjackStats::new();
        stats.record_round(&result);
        assert_eq!(stats.hands, 2);
        assert_eq!(stats.split.total(), 2);
        assert_eq!(stats.overall.total(), 2);
    }

    #[test]
    fn merge_adds_totals() {
        let result = round_from(&cards(&[9, 7, 1, 13]), &PlayerStrategy::basic());
        let mut a = BlackjackStats::new();
        a.record_round(&result);
        let mut b = a.clone();
        b.merge(&a);
        assert_eq!(b.rounds, 2);
        assert_eq!(b.blackjack.wins, 2);
        assert_eq!(b.total_winnings, 300.0);
    }

    #[test]
    fn empty_stats_display() {
        let stats = BlackjackStats::new();
        assert_eq!(stats.house_edge(), 0.0);
        let shown = format!("{}", stats);
        assert!(shown.contains("rounds played"));
        assert!(shown.contains("house edge"));
        assert!(!shown.contains("insurance"));
    }
}
