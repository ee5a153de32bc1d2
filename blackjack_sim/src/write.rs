use crate::{SimulationError, SimulationSummary};
use blackjack_lib::RoundResult;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::sync::mpsc::Receiver;

/// One CSV row per player hand.
#[derive(Debug, Serialize)]
struct HandRecord<'a> {
    round: u32,
    shuffle: u32,
    cards_left: usize,
    running_count: i32,
    hand: usize,
    player_cards: String,
    dealer_cards: &'a str,
    player_score: u8,
    dealer_score: u8,
    outcome: String,
    winnings: f64,
    wagered: f64,
}

/// One CSV row per round, the per hand columns joined with `/`.
#[derive(Debug, Serialize)]
struct RoundRecord {
    round: u32,
    shuffle: u32,
    cards_left: usize,
    running_count: i32,
    hands: usize,
    player_cards: String,
    dealer_cards: String,
    player_scores: String,
    dealer_score: u8,
    outcomes: String,
    winnings: String,
    wagered: String,
}

fn joined<T, F>(result: &RoundResult, f: F) -> String
where
    F: Fn(&blackjack_lib::HandSummary) -> T,
    T: std::fmt::Display,
{
    result
        .hands
        .iter()
        .map(|h| format!("{}/", f(h)))
        .collect()
}

/// Writes the record of every round as CSV to `W`.
pub struct RoundRecordWriter<W: Write> {
    writer: csv::Writer<W>,
    flat: bool,
}

impl<W: Write> RoundRecordWriter<W> {
    /// With `flat` set each round is a single row, otherwise each hand gets its own row.
    pub fn new(writer: W, flat: bool) -> Self {
        RoundRecordWriter {
            writer: csv::Writer::from_writer(writer),
            flat,
        }
    }

    pub fn write_round(&mut self, result: &RoundResult) -> Result<(), SimulationError> {
        if self.flat {
            self.writer.serialize(RoundRecord {
                round: result.round,
                shuffle: result.shuffle,
                cards_left: result.cards_left,
                running_count: result.running_count,
                hands: result.num_hands(),
                player_cards: joined(result, |h| h.rank_symbols()),
                dealer_cards: result.dealer_rank_symbols(),
                player_scores: joined(result, |h| h.score),
                dealer_score: result.dealer_score,
                outcomes: joined(result, |h| h.outcome),
                winnings: joined(result, |h| h.winnings),
                wagered: joined(result, |h| h.wagered),
            })?;
        } else {
            let dealer_cards = result.dealer_rank_symbols();
            for (i, hand) in result.hands.iter().enumerate() {
                self.writer.serialize(HandRecord {
                    round: result.round,
                    shuffle: result.shuffle,
                    cards_left: result.cards_left,
                    running_count: result.running_count,
                    hand: i + 1,
                    player_cards: hand.rank_symbols(),
                    dealer_cards: &dealer_cards,
                    player_score: hand.score,
                    dealer_score: result.dealer_score,
                    outcome: hand.outcome.to_string(),
                    winnings: hand.winnings,
                    wagered: hand.wagered,
                })?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SimulationError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and hands back the underlying writer.
    pub fn into_inner(self) -> Result<W, SimulationError> {
        self.writer
            .into_inner()
            .map_err(|e| SimulationError::Io(e.into_error()))
    }
}

fn format_summaries(summaries: BTreeMap<usize, SimulationSummary>) -> Vec<String> {
    const WIDTH: usize = 80;
    summaries
        .into_iter()
        .map(|(id, summary)| {
            let sim_num = format!("simulation #{}", id);
            let header = format!("{:-^WIDTH$}\n", sim_num);
            format!("{}{}{}\n", header, summary, "-".repeat(WIDTH))
        })
        .collect()
}

/// Receives summaries tagged with a simulation id until every id in `ids` has sent `None`, then writes
/// one block per simulation, in id order, to `writer`. Summaries sent under the same id are merged.
pub fn write_summaries(
    receiver: Receiver<(Option<SimulationSummary>, usize)>,
    mut ids: HashSet<usize>,
    mut writer: impl Write,
) -> Result<(), SimulationError> {
    let mut summaries: BTreeMap<usize, SimulationSummary> = BTreeMap::new();
    while !ids.is_empty() {
        let (cur_summary, id) = receiver
            .recv()
            .map_err(|e| SimulationError::Sending(e.to_string()))?;
        match cur_summary {
            Some(cur_sum) => {
                if let Some(summary) = summaries.get_mut(&id) {
                    summary.stats.merge(&cur_sum.stats);
                } else {
                    summaries.insert(id, cur_sum);
                }
            }
            None => {
                ids.remove(&id);
            }
        }
    }

    for formatted in format_summaries(summaries) {
        writer.write_all(formatted.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
