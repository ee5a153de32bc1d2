use crate::SimulationError;
use blackjack_lib::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Struct for configuring a simulation. Every field has a default, see `BlackjackSimulatorConfigBuilder::build`.
/// Can be deserialized from JSON, missing fields take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlackjackSimulatorConfig {
    pub num_decks: usize,
    pub reshuffle_threshold: f64,
    pub bet_unit: u32,
    pub total_rounds: u32,
    pub update_interval: u32,
    pub insurance: bool,
    pub flat_csv: bool,
    pub output: Option<PathBuf>,
    pub seed: Option<u64>,
    pub batches: u32,
}

impl BlackjackSimulatorConfig {
    /// Associated method for returning a new `BlackjackSimulatorConfigBuilder` object.
    pub fn new() -> BlackjackSimulatorConfigBuilder {
        BlackjackSimulatorConfigBuilder::default()
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(s: &str) -> Result<Self, SimulationError> {
        let config: BlackjackSimulatorConfig = serde_json::from_str(s)?;
        Ok(config)
    }

    /// Checks that the configuration describes a playable simulation.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.num_decks == 0 {
            return Err(SimulationError::Config(
                "number of decks must be at least 1".to_string(),
            ));
        }
        if !(self.reshuffle_threshold > 0.0 && self.reshuffle_threshold < 1.0) {
            return Err(SimulationError::Config(format!(
                "reshuffle threshold must be between 0 and 1, got {}",
                self.reshuffle_threshold
            )));
        }
        if self.bet_unit == 0 {
            return Err(SimulationError::Config(
                "bet unit must be positive".to_string(),
            ));
        }
        if self.total_rounds == 0 {
            return Err(SimulationError::Config(
                "total rounds must be positive".to_string(),
            ));
        }
        if self.batches == 0 {
            return Err(SimulationError::Config(
                "batches must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The part of the configuration the table itself reads.
    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            num_decks: self.num_decks,
            reshuffle_threshold: self.reshuffle_threshold,
            bet_unit: self.bet_unit,
        }
    }

    /// Basic strategy, taking insurance every time when `insurance` is set and never otherwise.
    pub fn strategy(&self) -> Box<dyn Strategy + Send> {
        if self.insurance {
            Box::new(PlayerStrategy::new(
                BasicStrategy,
                AlwaysInsure,
                "basic strategy, always insure",
            ))
        } else {
            Box::new(PlayerStrategy::basic())
        }
    }
}

impl Default for BlackjackSimulatorConfig {
    /// Returns the standard configuration: six decks, 70% penetration, 100,000 rounds.
    fn default() -> Self {
        BlackjackSimulatorConfig::new().build()
    }
}

/// Struct to implement builder pattern for `BlackjackSimulatorConfig`
#[derive(Debug, Clone, Default)]
pub struct BlackjackSimulatorConfigBuilder {
    num_decks: Option<usize>,
    reshuffle_threshold: Option<f64>,
    bet_unit: Option<u32>,
    total_rounds: Option<u32>,
    update_interval: Option<u32>,
    insurance: Option<bool>,
    flat_csv: Option<bool>,
    output: Option<PathBuf>,
    seed: Option<u64>,
    batches: Option<u32>,
}

impl BlackjackSimulatorConfigBuilder {
    /// Method for choosing the number of decks in the shoe
    pub fn num_decks(&mut self, decks: usize) -> &mut Self {
        self.num_decks = Some(decks);
        self
    }

    /// Method for setting the fraction of the shoe left when it gets reshuffled
    pub fn reshuffle_threshold(&mut self, fraction: f64) -> &mut Self {
        self.reshuffle_threshold = Some(fraction);
        self
    }

    /// Method for setting the bet placed on every starting hand
    pub fn bet_unit(&mut self, bet: u32) -> &mut Self {
        self.bet_unit = Some(bet);
        self
    }

    pub fn total_rounds(&mut self, rounds: u32) -> &mut Self {
        self.total_rounds = Some(rounds);
        self
    }

    /// Method for setting how many rounds pass between progress reports
    pub fn update_interval(&mut self, rounds: u32) -> &mut Self {
        self.update_interval = Some(rounds);
        self
    }

    /// Method for setting the flag that decides whether insurance is taken when the dealer shows an ace
    pub fn insurance(&mut self, insurance: bool) -> &mut Self {
        self.insurance = Some(insurance);
        self
    }

    /// Method for writing one CSV row per round instead of one per hand
    pub fn flat_csv(&mut self, flat: bool) -> &mut Self {
        self.flat_csv = Some(flat);
        self
    }

    pub fn output<P: Into<PathBuf>>(&mut self, path: P) -> &mut Self {
        self.output = Some(path.into());
        self
    }

    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// Method for setting the number of independent simulations run side by side
    pub fn batches(&mut self, batches: u32) -> &mut Self {
        self.batches = Some(batches);
        self
    }

    /// Method for building a `BlackjackSimulatorConfig` object from the given `BlackjackSimulatorConfigBuilder` object.
    pub fn build(&mut self) -> BlackjackSimulatorConfig {
        BlackjackSimulatorConfig {
            num_decks: self.num_decks.unwrap_or(6),
            reshuffle_threshold: self.reshuffle_threshold.unwrap_or(0.3),
            bet_unit: self.bet_unit.unwrap_or(100),
            total_rounds: self.total_rounds.unwrap_or(100_000),
            update_interval: self.update_interval.unwrap_or(10_000),
            insurance: self.insurance.unwrap_or(false),
            flat_csv: self.flat_csv.unwrap_or(false),
            output: self.output.take(),
            seed: self.seed,
            batches: self.batches.unwrap_or(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = BlackjackSimulatorConfig::default();
        assert_eq!(config.num_decks, 6);
        assert_eq!(config.reshuffle_threshold, 0.3);
        assert_eq!(config.bet_unit, 100);
        assert_eq!(config.total_rounds, 100_000);
        assert_eq!(config.update_interval, 10_000);
        assert!(!config.insurance);
        assert!(!config.flat_csv);
        assert_eq!(config.output, None);
        assert_eq!(config.batches, 1);
        assert!(config.validate().is_ok());
        assert_eq!(config.table_config(), TableConfig::default());
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = BlackjackSimulatorConfig::new()
            .num_decks(2)
            .reshuffle_threshold(0.5)
            .bet_unit(10)
            .total_rounds(500)
            .seed(7)
            .output("rounds.csv")
            .build();
        assert_eq!(config.num_decks, 2);
        assert_eq!(config.table_config().reshuffle_cards(), 52);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.output, Some(PathBuf::from("rounds.csv")));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            BlackjackSimulatorConfig::from_json_str(r#"{"num_decks": 8, "insurance": true}"#)
                .unwrap();
        assert_eq!(config.num_decks, 8);
        assert!(config.insurance);
        assert_eq!(config.bet_unit, 100);
        assert_eq!(config.strategy().label(), "basic strategy, always insure");
    }

    #[test]
    fn reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"total_rounds": 250, "flat_csv": true, "seed": 3}}"#).unwrap();
        let config = BlackjackSimulatorConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.total_rounds, 250);
        assert!(config.flat_csv);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(
            BlackjackSimulatorConfig::from_json_str("{\"num_decks\": \"six\"}"),
            Err(SimulationError::Json(_))
        ));
    }

    #[test]
    fn validation() {
        let bad = [
            BlackjackSimulatorConfig::new().num_decks(0).build(),
            BlackjackSimulatorConfig::new().reshuffle_threshold(0.0).build(),
            BlackjackSimulatorConfig::new().reshuffle_threshold(1.0).build(),
            BlackjackSimulatorConfig::new().bet_unit(0).build(),
            BlackjackSimulatorConfig::new().total_rounds(0).build(),
            BlackjackSimulatorConfig::new().batches(0).build(),
        ];
        for config in bad.iter() {
            assert!(matches!(config.validate(), Err(SimulationError::Config(_))));
        }
    }
}
