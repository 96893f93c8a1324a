//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! Issued questions cross the wire WITHOUT the correct flag; correctness is
//! only revealed when an answer is submitted.

use serde::{Deserialize, Serialize};

use crate::domain::{DivisorPair, HistoryEntry, IssuedQuestion, Round};
use crate::logic::AnswerOutcome;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartRound {
        preset: Option<String>,
        #[serde(rename = "maxQuestions")]
        max_questions: Option<u32>,
    },
    NextQuestion {
        #[serde(rename = "roundId")]
        round_id: String,
    },
    SubmitAnswer {
        #[serde(rename = "questionId")]
        question_id: String,
        #[serde(rename = "choiceIndex")]
        choice_index: usize,
    },
    Summary {
        #[serde(rename = "roundId")]
        round_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    RoundStarted {
        round: RoundOut,
    },
    Question {
        question: QuestionOut,
    },
    AnswerResult {
        result: AnswerOut,
    },
    Summary {
        summary: SummaryOut,
    },
    Error {
        message: String,
    },
}

/// DTO used by both WS and HTTP for question delivery. Choices are bare
/// pairs in display order; correctness is only ever revealed by answering.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub id: String,
    #[serde(rename = "roundId")]
    pub round_id: String,
    pub number: u64,
    pub choices: Vec<DivisorPair>,
}

/// Convert an issued question (internal, answer included) to the public DTO.
pub fn question_to_out(q: &IssuedQuestion) -> QuestionOut {
    QuestionOut {
        id: q.id.clone(),
        round_id: q.round_id.clone(),
        number: q.question.number,
        choices: q.question.choices.iter().map(|c| c.pair).collect(),
    }
}

/// Round progress DTO.
#[derive(Debug, Serialize)]
pub struct RoundOut {
    pub id: String,
    pub preset: String,
    #[serde(rename = "maxQuestions")]
    pub max_questions: u32,
    #[serde(rename = "correctCount")]
    pub correct_count: u32,
    #[serde(rename = "wrongCount")]
    pub wrong_count: u32,
    #[serde(rename = "totalAnswered")]
    pub total_answered: u32,
    pub finished: bool,
}

pub fn round_to_out(r: &Round) -> RoundOut {
    RoundOut {
        id: r.id.clone(),
        preset: r.preset.clone(),
        max_questions: r.max_questions,
        correct_count: r.correct_count,
        wrong_count: r.wrong_count,
        total_answered: r.total_answered,
        finished: r.is_finished(),
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerOut {
    pub correct: bool,
    pub number: u64,
    pub chosen: DivisorPair,
    pub expected: DivisorPair,
    pub round: RoundOut,
}

pub fn answer_to_out(o: &AnswerOutcome) -> AnswerOut {
    AnswerOut {
        correct: o.correct,
        number: o.number,
        chosen: o.chosen,
        expected: o.expected,
        round: round_to_out(&o.round),
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryOut {
    pub round: RoundOut,
    pub rate: u32,
    pub message: String,
    pub history: Vec<HistoryEntry>,
}

pub fn summary_to_out(r: &Round, message: &str) -> SummaryOut {
    SummaryOut {
        round: round_to_out(r),
        rate: r.rate(),
        message: message.to_string(),
        history: r.history.clone(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct StartRoundIn {
    pub preset: Option<String>,
    #[serde(rename = "maxQuestions")]
    pub max_questions: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
    #[serde(rename = "roundId")]
    pub round_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    #[serde(rename = "questionId")]
    pub question_id: String,
    #[serde(rename = "choiceIndex")]
    pub choice_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(rename = "roundId")]
    pub round_id: String,
}

/// One row of GET /api/v1/presets, enough for a client to build a picker.
#[derive(Debug, Serialize)]
pub struct PresetOut {
    pub name: String,
    #[serde(rename = "maxValue")]
    pub max_value: u64,
    #[serde(rename = "maxPrimeFactors")]
    pub max_prime_factors: u32,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Choice, Question};

    #[test]
    fn question_out_never_leaks_the_answer() {
        let issued = IssuedQuestion {
            id: "q".into(),
            round_id: "r".into(),
            question: Question {
                number: 12,
                choices: vec![
                    Choice { pair: DivisorPair(3, 4), is_correct: true },
                    Choice { pair: DivisorPair(2, 7), is_correct: false },
                ],
            },
        };
        let json = serde_json::to_string(&question_to_out(&issued)).expect("json");
        assert!(!json.contains("isCorrect"));
        assert!(json.contains("[3,4]"));
    }

    #[test]
    fn ws_messages_round_trip_their_tags() {
        let msg: ClientWsMessage =
            serde_json::from_str(r#"{"type":"submit_answer","questionId":"q1","choiceIndex":2}"#).expect("parse");
        match msg {
            ClientWsMessage::SubmitAnswer { question_id, choice_index } => {
                assert_eq!(question_id, "q1");
                assert_eq!(choice_index, 2);
            }
            other => panic!("unexpected message: {other:?}"),
        }

        let out = serde_json::to_string(&ServerWsMessage::Pong).expect("json");
        assert_eq!(out, r#"{"type":"pong"}"#);
    }
}
