//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::*;
use crate::presets::{DEFAULT_MAX_QUESTIONS, DEFAULT_PRESET};
use crate::protocol::{
  answer_to_out, question_to_out, round_to_out, summary_to_out, ClientWsMessage, ServerWsMessage,
};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "yakusu_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "yakusu_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target = "yakusu_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "yakusu_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "yakusu_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::StartRound { preset, max_questions } => {
      let preset = preset.unwrap_or_else(|| DEFAULT_PRESET.into());
      let max_questions = max_questions.unwrap_or(DEFAULT_MAX_QUESTIONS);
      match start_round(state, &preset, max_questions).await {
        Ok(round) => {
          tracing::info!(target: "round", id = %round.id, %preset, "WS round started");
          ServerWsMessage::RoundStarted { round: round_to_out(&round) }
        }
        Err(message) => ServerWsMessage::Error { message },
      }
    }

    ClientWsMessage::NextQuestion { round_id } => match next_question(state, &round_id).await {
      Ok(issued) => {
        tracing::info!(target: "question", id = %issued.id, %round_id, number = issued.question.number, "WS question served");
        ServerWsMessage::Question { question: question_to_out(&issued) }
      }
      Err(message) => ServerWsMessage::Error { message },
    },

    ClientWsMessage::SubmitAnswer { question_id, choice_index } => {
      match evaluate_answer(state, &question_id, choice_index).await {
        Ok(outcome) => {
          tracing::info!(target: "question", id = %question_id, correct = outcome.correct, "WS answer evaluated");
          ServerWsMessage::AnswerResult { result: answer_to_out(&outcome) }
        }
        Err(message) => ServerWsMessage::Error { message },
      }
    }

    ClientWsMessage::Summary { round_id } => match round_summary(state, &round_id).await {
      Ok((round, message)) => {
        tracing::info!(target: "round", id = %round.id, rate = round.rate(), "WS summary served");
        ServerWsMessage::Summary { summary: summary_to_out(&round, message) }
      }
      Err(message) => ServerWsMessage::Error { message },
    },
  }
}
