//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Starting rounds against a named difficulty preset
//!   - Issuing fresh questions from the generation core
//!   - Evaluating submitted answers and folding them into round history
//!   - Producing the end-of-round summary
//!
//! Errors are descriptive strings surfaced to the client; the generation
//! core itself is total and never fails.

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{DivisorPair, HistoryEntry, IssuedQuestion, Round};
use crate::generate::generate_question;
use crate::state::AppState;

/// Everything a client needs to know after answering one question.
#[derive(Clone, Debug)]
pub struct AnswerOutcome {
  pub number: u64,
  pub chosen: DivisorPair,
  pub expected: DivisorPair,
  pub correct: bool,
  pub round: Round,
}

#[instrument(level = "info", skip(state), fields(%preset, max_questions))]
pub async fn start_round(state: &AppState, preset: &str, max_questions: u32) -> Result<Round, String> {
  if max_questions == 0 {
    return Err("maxQuestions must be at least 1".into());
  }
  if state.preset(preset).is_none() {
    let mut known: Vec<&str> = state.presets.keys().map(|k| k.as_str()).collect();
    known.sort_unstable();
    return Err(format!("Unknown preset '{}'; available: {}", preset, known.join(", ")));
  }

  let round = Round::new(Uuid::new_v4().to_string(), preset.to_string(), max_questions);
  state.insert_round(round.clone()).await;
  info!(target: "round", id = %round.id, %preset, max_questions, "Round started");
  Ok(round)
}

/// Generate and register the next question for a round. The question stays
/// in the issued store until an answer consumes it.
#[instrument(level = "info", skip(state), fields(%round_id))]
pub async fn next_question(state: &AppState, round_id: &str) -> Result<IssuedQuestion, String> {
  let round = state
    .get_round(round_id)
    .await
    .ok_or_else(|| format!("Unknown roundId: {}", round_id))?;
  if round.is_finished() {
    return Err(format!("Round {} is complete; request the summary instead", round_id));
  }

  let cfg = state
    .preset(&round.preset)
    .ok_or_else(|| format!("Round {} references missing preset '{}'", round_id, round.preset))?;

  let question = generate_question(cfg, &mut rand::thread_rng());
  let issued = IssuedQuestion {
    id: Uuid::new_v4().to_string(),
    round_id: round_id.to_string(),
    question,
  };
  state.insert_question(issued.clone()).await;
  info!(
    target: "question",
    id = %issued.id,
    %round_id,
    number = issued.question.number,
    choices = issued.question.choices.len(),
    "Question issued"
  );
  Ok(issued)
}

/// Check a submitted choice against the issued question, consume the
/// question, and record the outcome on its round.
#[instrument(level = "info", skip(state), fields(%question_id, choice_index))]
pub async fn evaluate_answer(state: &AppState, question_id: &str, choice_index: usize) -> Result<AnswerOutcome, String> {
  let issued = state
    .take_question(question_id)
    .await
    .ok_or_else(|| format!("Unknown or already answered questionId: {}", question_id))?;

  let question = &issued.question;
  let chosen = match question.choices.get(choice_index) {
    Some(c) => *c,
    None => {
      // put the question back so a malformed submit doesn't burn it
      let id = issued.id.clone();
      let len = question.choices.len();
      state.insert_question(issued).await;
      warn!(target: "question", %id, choice_index, "Choice index out of range");
      return Err(format!("choiceIndex {} out of range (question has {} choices)", choice_index, len));
    }
  };

  let expected = question
    .correct_choice()
    .map(|c| c.pair)
    // assembled questions always hold exactly one correct choice
    .unwrap_or(chosen.pair);

  let entry = HistoryEntry {
    number: question.number,
    chosen: chosen.pair,
    expected,
    correct: chosen.is_correct,
  };
  let round = state
    .record_answer(&issued.round_id, entry)
    .await
    .ok_or_else(|| format!("Round {} vanished before the answer landed", issued.round_id))?;

  info!(
    target: "round",
    round_id = %round.id,
    number = question.number,
    correct = chosen.is_correct,
    progress = format!("{}/{}", round.total_answered, round.max_questions),
    "Answer recorded"
  );
  Ok(AnswerOutcome {
    number: question.number,
    chosen: chosen.pair,
    expected,
    correct: chosen.is_correct,
    round,
  })
}

#[instrument(level = "info", skip(state), fields(%round_id))]
pub async fn round_summary(state: &AppState, round_id: &str) -> Result<(Round, &'static str), String> {
  let round = state
    .get_round(round_id)
    .await
    .ok_or_else(|| format!("Unknown roundId: {}", round_id))?;
  Ok((round.clone(), summary_message(round.rate())))
}

/// Rate-banded closing message, same bands the game has always used.
pub fn summary_message(rate: u32) -> &'static str {
  if rate == 100 {
    "Perfect score. Outstanding!"
  } else if rate >= 80 {
    "Excellent work!"
  } else if rate >= 50 {
    "Well done, keep it up!"
  } else if rate >= 30 {
    "Getting there. A little more practice!"
  } else {
    "Time to review your divisor pairs!"
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::presets::builtin_presets;

  fn test_state() -> AppState {
    AppState::with_presets(builtin_presets())
  }

  #[tokio::test]
  async fn full_round_lifecycle() {
    let state = test_state();
    let round = start_round(&state, "beginner", 2).await.expect("round");

    for expected_total in 1..=2u32 {
      let issued = next_question(&state, &round.id).await.expect("question");
      assert_eq!(issued.question.choices.len(), 4);
      let correct_idx = issued
        .question
        .choices
        .iter()
        .position(|c| c.is_correct)
        .expect("one correct choice");

      let outcome = evaluate_answer(&state, &issued.id, correct_idx).await.expect("outcome");
      assert!(outcome.correct);
      assert_eq!(outcome.round.total_answered, expected_total);
      assert_eq!(outcome.chosen, outcome.expected);
    }

    // finished rounds refuse further questions
    assert!(next_question(&state, &round.id).await.is_err());

    let (done, message) = round_summary(&state, &round.id).await.expect("summary");
    assert_eq!(done.correct_count, 2);
    assert_eq!(done.rate(), 100);
    assert_eq!(message, "Perfect score. Outstanding!");
    assert_eq!(done.history.len(), 2);
  }

  #[tokio::test]
  async fn wrong_answers_are_recorded_with_the_expected_pair() {
    let state = test_state();
    let round = start_round(&state, "intermediate", 5).await.expect("round");
    let issued = next_question(&state, &round.id).await.expect("question");
    let wrong_idx = issued
      .question
      .choices
      .iter()
      .position(|c| !c.is_correct)
      .expect("a wrong choice");

    let outcome = evaluate_answer(&state, &issued.id, wrong_idx).await.expect("outcome");
    assert!(!outcome.correct);
    assert_ne!(outcome.chosen, outcome.expected);
    assert_eq!(outcome.expected.product(), outcome.number);
    assert_eq!(outcome.round.wrong_count, 1);

    // answering consumed the question
    assert!(evaluate_answer(&state, &issued.id, wrong_idx).await.is_err());
  }

  #[tokio::test]
  async fn out_of_range_choice_keeps_the_question_alive() {
    let state = test_state();
    let round = start_round(&state, "beginner", 3).await.expect("round");
    let issued = next_question(&state, &round.id).await.expect("question");

    assert!(evaluate_answer(&state, &issued.id, 99).await.is_err());
    // still answerable afterwards
    assert!(evaluate_answer(&state, &issued.id, 0).await.is_ok());
  }

  #[tokio::test]
  async fn unknown_ids_and_presets_are_descriptive_errors() {
    let state = test_state();
    let err = start_round(&state, "nightmare", 10).await.unwrap_err();
    assert!(err.contains("nightmare"));
    assert!(err.contains("beginner"));

    assert!(start_round(&state, "beginner", 0).await.is_err());
    assert!(next_question(&state, "nope").await.is_err());
    assert!(round_summary(&state, "nope").await.is_err());
  }

  #[test]
  fn summary_messages_follow_the_rate_bands() {
    assert_eq!(summary_message(100), "Perfect score. Outstanding!");
    assert_eq!(summary_message(85), "Excellent work!");
    assert_eq!(summary_message(80), "Excellent work!");
    assert_eq!(summary_message(50), "Well done, keep it up!");
    assert_eq!(summary_message(30), "Getting there. A little more practice!");
    assert_eq!(summary_message(10), "Time to review your divisor pairs!");
  }
}
