//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; errors surface as JSON with a 4xx status.

use std::sync::Arc;

use axum::{
  extract::{Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::logic::*;
use crate::presets::{DEFAULT_MAX_QUESTIONS, DEFAULT_PRESET};
use crate::protocol::*;
use crate::state::AppState;

fn bad_request(message: String) -> Response {
  (StatusCode::BAD_REQUEST, Json(ErrorOut { message })).into_response()
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_presets(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let mut presets: Vec<PresetOut> = state
    .presets
    .iter()
    .map(|(name, cfg)| PresetOut {
      name: name.clone(),
      max_value: cfg.max_value,
      max_prime_factors: cfg.max_prime_factors,
    })
    .collect();
  presets.sort_by(|a, b| a.name.cmp(&b.name));
  Json(presets)
}

#[instrument(level = "info", skip(state, body), fields(preset = %body.preset.clone().unwrap_or_else(|| DEFAULT_PRESET.into())))]
pub async fn http_post_round(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartRoundIn>,
) -> Response {
  let preset = body.preset.unwrap_or_else(|| DEFAULT_PRESET.into());
  let max_questions = body.max_questions.unwrap_or(DEFAULT_MAX_QUESTIONS);
  match start_round(&state, &preset, max_questions).await {
    Ok(round) => {
      info!(target: "round", id = %round.id, %preset, "HTTP round started");
      Json(round_to_out(&round)).into_response()
    }
    Err(e) => bad_request(e),
  }
}

#[instrument(level = "info", skip(state), fields(%q.round_id))]
pub async fn http_get_question(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionQuery>,
) -> Response {
  match next_question(&state, &q.round_id).await {
    Ok(issued) => {
      info!(target: "question", id = %issued.id, number = issued.question.number, "HTTP question served");
      Json(question_to_out(&issued)).into_response()
    }
    Err(e) => bad_request(e),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.question_id, choice_index = body.choice_index))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswerIn>,
) -> Response {
  match evaluate_answer(&state, &body.question_id, body.choice_index).await {
    Ok(outcome) => {
      info!(target: "question", id = %body.question_id, correct = outcome.correct, "HTTP answer evaluated");
      Json(answer_to_out(&outcome)).into_response()
    }
    Err(e) => bad_request(e),
  }
}

#[instrument(level = "info", skip(state), fields(%q.round_id))]
pub async fn http_get_summary(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SummaryQuery>,
) -> Response {
  match round_summary(&state, &q.round_id).await {
    Ok((round, message)) => {
      info!(target: "round", id = %round.id, rate = round.rate(), "HTTP summary served");
      Json(summary_to_out(&round, message)).into_response()
    }
    Err(e) => bad_request(e),
  }
}
