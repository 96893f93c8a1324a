//! Built-in difficulty presets and small utilities related to default content.

use std::collections::HashMap;

use crate::config::{DifficultyConfig, PrimeWeight, StopRule};

pub const DEFAULT_PRESET: &str = "intermediate";

/// Questions per round unless the client asks otherwise.
pub const DEFAULT_MAX_QUESTIONS: u32 = 10;

fn weights(entries: &[(u64, u32)]) -> Vec<PrimeWeight> {
  entries.iter().map(|&(prime, weight)| PrimeWeight { prime, weight }).collect()
}

fn stops(entries: &[(f64, u64)]) -> Vec<StopRule> {
  entries.iter().map(|&(probability, below)| StopRule { probability, below }).collect()
}

/// Named presets that guarantee the app is useful even without external
/// config. Each leaves headroom under `max_value` for the forced x2/x3
/// repair step, so generated numbers stay inside the ceiling in practice.
pub fn builtin_presets() -> HashMap<String, DifficultyConfig> {
  HashMap::from([
    (
      "beginner".to_string(),
      DifficultyConfig {
        max_prime_factors: 3,
        prime_weights: weights(&[(2, 100), (3, 80), (5, 40), (7, 20)]),
        stop_probability_table: stops(&[(0.3, 20), (0.7, 50)]),
        max_value: 50,
      },
    ),
    (
      "intermediate".to_string(),
      DifficultyConfig {
        max_prime_factors: 4,
        prime_weights: weights(&[(2, 80), (3, 70), (5, 50), (7, 30), (11, 10), (13, 10)]),
        stop_probability_table: stops(&[(0.2, 30), (0.5, 80), (0.8, 120)]),
        max_value: 120,
      },
    ),
    (
      "advanced".to_string(),
      DifficultyConfig {
        max_prime_factors: 5,
        prime_weights: weights(&[(2, 60), (3, 60), (5, 40), (7, 30), (11, 15), (13, 10), (17, 5), (19, 5)]),
        stop_probability_table: stops(&[(0.1, 50), (0.4, 120), (0.7, 200)]),
        max_value: 200,
      },
    ),
  ])
}
