//! Domain models: divisor pairs, choices, questions, and round bookkeeping.

use serde::{Deserialize, Serialize};

/// A factor pair `(a, b)` with `a <= b` and `a >= 2`, whose product is the
/// number it was enumerated from. Serializes as a two-element array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DivisorPair(pub u64, pub u64);

impl DivisorPair {
  pub fn product(&self) -> u64 {
    self.0 * self.1
  }
}

/// One answer option shown to the player.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Choice {
  pub pair: DivisorPair,
  #[serde(rename = "isCorrect")]
  pub is_correct: bool,
}

/// A freshly assembled question: the target number plus four shuffled choices,
/// exactly one of which is correct. Immutable once built; discarded after the
/// answer is recorded into the round history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub number: u64,
  pub choices: Vec<Choice>,
}

impl Question {
  /// The choice flagged correct. Assembled questions always carry one.
  pub fn correct_choice(&self) -> Option<&Choice> {
    self.choices.iter().find(|c| c.is_correct)
  }
}

/// A question that has been handed out to a client and awaits an answer.
#[derive(Clone, Debug)]
pub struct IssuedQuestion {
  pub id: String,
  pub round_id: String,
  pub question: Question,
}

/// Outcome of a single answered question, copied out of the discarded
/// `Question` into the owning round's history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub number: u64,
  pub chosen: DivisorPair,
  pub expected: DivisorPair,
  pub correct: bool,
}

/// Mutable per-round state: counters and answer history. The generation core
/// never sees this; only the serving layer reads and writes it.
#[derive(Clone, Debug)]
pub struct Round {
  pub id: String,
  pub preset: String,
  pub max_questions: u32,
  pub correct_count: u32,
  pub wrong_count: u32,
  pub total_answered: u32,
  pub history: Vec<HistoryEntry>,
}

impl Round {
  pub fn new(id: String, preset: String, max_questions: u32) -> Self {
    Self {
      id,
      preset,
      max_questions,
      correct_count: 0,
      wrong_count: 0,
      total_answered: 0,
      history: Vec::new(),
    }
  }

  pub fn is_finished(&self) -> bool {
    self.total_answered >= self.max_questions
  }

  /// Fold one answered question into counters and history.
  pub fn record(&mut self, entry: HistoryEntry) {
    if entry.correct {
      self.correct_count += 1;
    } else {
      self.wrong_count += 1;
    }
    self.total_answered += 1;
    self.history.push(entry);
  }

  /// Percentage of correct answers, rounded to the nearest integer.
  pub fn rate(&self) -> u32 {
    if self.total_answered == 0 {
      return 0;
    }
    ((self.correct_count as f64 / self.total_answered as f64) * 100.0).round() as u32
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_records_and_rates() {
    let mut r = Round::new("r1".into(), "beginner".into(), 3);
    assert!(!r.is_finished());
    r.record(HistoryEntry { number: 12, chosen: DivisorPair(3, 4), expected: DivisorPair(3, 4), correct: true });
    r.record(HistoryEntry { number: 18, chosen: DivisorPair(2, 8), expected: DivisorPair(2, 9), correct: false });
    r.record(HistoryEntry { number: 36, chosen: DivisorPair(6, 6), expected: DivisorPair(6, 6), correct: true });
    assert!(r.is_finished());
    assert_eq!(r.correct_count, 2);
    assert_eq!(r.wrong_count, 1);
    assert_eq!(r.rate(), 67);
    assert_eq!(r.history.len(), 3);
  }
}
