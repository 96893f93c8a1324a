//! Application state: preset table, issued questions, and round stores.
//!
//! This module owns:
//!   - the validated difficulty presets (built-ins merged with TOML overrides)
//!   - the store of questions handed out and not yet answered (by id)
//!   - the store of active rounds (by id)
//!
//! The generation core in `generate.rs` stays pure; every mutable piece of
//! the game lives behind this state, which only the serving layer touches.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::config::{load_quiz_config_from_env, DifficultyConfig};
use crate::domain::{HistoryEntry, IssuedQuestion, Round};
use crate::presets::builtin_presets;

#[derive(Clone)]
pub struct AppState {
    pub presets: HashMap<String, DifficultyConfig>,
    pub rounds: Arc<RwLock<HashMap<String, Round>>>,
    pub questions: Arc<RwLock<HashMap<String, IssuedQuestion>>>,
}

impl AppState {
    /// Build state from env: built-in presets, TOML overrides, validation.
    /// Presets failing validation are rejected here so generation never sees
    /// a malformed config.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let mut presets = builtin_presets();

        if let Some(cfg) = load_quiz_config_from_env() {
            for (name, preset) in cfg.presets {
                match preset.validate() {
                    Ok(()) => {
                        let replaced = presets.insert(name.clone(), preset).is_some();
                        info!(target: "yakusu_backend", %name, replaced, "Loaded preset from config");
                    }
                    Err(e) => {
                        error!(target: "yakusu_backend", %name, error = %e, "Rejecting invalid preset");
                    }
                }
            }
        }

        for (name, cfg) in &presets {
            info!(
                target: "yakusu_backend",
                %name,
                max_value = cfg.max_value,
                max_prime_factors = cfg.max_prime_factors,
                primes = cfg.prime_weights.len(),
                "Startup preset inventory"
            );
        }

        Self {
            presets,
            rounds: Arc::new(RwLock::new(HashMap::new())),
            questions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Build state from an explicit preset table (no env access). Used by
    /// tests; `new` goes through the same insertion path.
    #[allow(dead_code)]
    pub fn with_presets(presets: HashMap<String, DifficultyConfig>) -> Self {
        Self {
            presets,
            rounds: Arc::new(RwLock::new(HashMap::new())),
            questions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn preset(&self, name: &str) -> Option<&DifficultyConfig> {
        self.presets.get(name)
    }

    #[instrument(level = "debug", skip(self, round), fields(id = %round.id))]
    pub async fn insert_round(&self, round: Round) {
        self.rounds.write().await.insert(round.id.clone(), round);
    }

    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_round(&self, id: &str) -> Option<Round> {
        self.rounds.read().await.get(id).cloned()
    }

    #[instrument(level = "debug", skip(self, q), fields(id = %q.id))]
    pub async fn insert_question(&self, q: IssuedQuestion) {
        self.questions.write().await.insert(q.id.clone(), q);
    }

    /// Remove and return an issued question; answering consumes it.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn take_question(&self, id: &str) -> Option<IssuedQuestion> {
        self.questions.write().await.remove(id)
    }

    /// Apply one answered question to its round and return the updated copy.
    /// `None` if the round id is unknown.
    #[instrument(level = "debug", skip(self, entry), fields(%round_id))]
    pub async fn record_answer(&self, round_id: &str, entry: HistoryEntry) -> Option<Round> {
        let mut rounds = self.rounds.write().await;
        let round = rounds.get_mut(round_id)?;
        round.record(entry);
        Some(round.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DivisorPair;

    #[tokio::test]
    async fn questions_are_consumed_on_take() {
        let state = AppState::with_presets(builtin_presets());
        let q = IssuedQuestion {
            id: "q1".into(),
            round_id: "r1".into(),
            question: crate::domain::Question { number: 12, choices: vec![] },
        };
        state.insert_question(q).await;
        assert!(state.take_question("q1").await.is_some());
        assert!(state.take_question("q1").await.is_none());
    }

    #[tokio::test]
    async fn record_answer_updates_the_stored_round() {
        let state = AppState::with_presets(builtin_presets());
        state.insert_round(Round::new("r1".into(), "beginner".into(), 10)).await;

        let entry = HistoryEntry {
            number: 12,
            chosen: DivisorPair(3, 4),
            expected: DivisorPair(3, 4),
            correct: true,
        };
        let updated = state.record_answer("r1", entry).await.expect("round");
        assert_eq!(updated.correct_count, 1);
        assert_eq!(updated.total_answered, 1);

        let stored = state.get_round("r1").await.expect("round");
        assert_eq!(stored.history.len(), 1);

        assert!(state.record_answer("missing", stored.history[0].clone()).await.is_none());
    }
}
