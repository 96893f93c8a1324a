//! Loading difficulty presets from TOML and validating them before any
//! generation runs.
//!
//! See `DifficultyConfig` for the expected schema. Invalid presets are
//! rejected here, at load time, so the generators can assume every config
//! they receive is well-formed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::divisors::is_prime;

/// One weighted entry in the prime-sampling table. Heavier weights on small
/// primes bias rounds toward simpler answers; that is a preset choice, not an
/// engine behavior.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PrimeWeight {
  pub prime: u64,
  pub weight: u32,
}

/// One entry of the stopping schedule: while the running product is strictly
/// below `below`, accumulation stops with probability `probability`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StopRule {
  pub probability: f64,
  pub below: u64,
}

/// Immutable difficulty knobs for the target generator. Selecting a preset
/// replaces the active config wholesale; presets are never merged.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DifficultyConfig {
  pub max_prime_factors: u32,
  pub prime_weights: Vec<PrimeWeight>,
  pub stop_probability_table: Vec<StopRule>,
  pub max_value: u64,
}

impl DifficultyConfig {
  /// Structural checks plus the load-time invariant
  /// `min_prime * max_prime <= max_value`, which guarantees at least one
  /// multiplication step is possible from any starting prime.
  pub fn validate(&self) -> Result<(), String> {
    if self.max_prime_factors < 2 {
      return Err(format!("max_prime_factors must be >= 2, got {}", self.max_prime_factors));
    }
    if self.prime_weights.is_empty() {
      return Err("prime_weights must not be empty".into());
    }
    for pw in &self.prime_weights {
      if !is_prime(pw.prime) {
        return Err(format!("prime_weights key {} is not prime", pw.prime));
      }
      if pw.weight == 0 {
        return Err(format!("prime {} has zero weight", pw.prime));
      }
    }
    for rule in &self.stop_probability_table {
      if !(0.0..=1.0).contains(&rule.probability) {
        return Err(format!("stop probability {} outside [0, 1]", rule.probability));
      }
    }
    for w in self.stop_probability_table.windows(2) {
      if w[0].below >= w[1].below {
        return Err("stop_probability_table bounds must be strictly increasing".into());
      }
    }
    let product = self.min_prime().saturating_mul(self.max_prime());
    if product > self.max_value {
      return Err(format!(
        "min_prime * max_prime = {} exceeds max_value {}; some starting primes could never grow",
        product, self.max_value
      ));
    }
    Ok(())
  }

  pub fn min_prime(&self) -> u64 {
    self.prime_weights.iter().map(|pw| pw.prime).min().unwrap_or(0)
  }

  pub fn max_prime(&self) -> u64 {
    self.prime_weights.iter().map(|pw| pw.prime).max().unwrap_or(0)
  }

  /// First schedule entry whose bound is above the product wins; past the
  /// whole table the generator always stops.
  pub fn stop_probability(&self, product: u64) -> f64 {
    for rule in &self.stop_probability_table {
      if product < rule.below {
        return rule.probability;
      }
    }
    1.0
  }
}

/// TOML override file: a map of named presets. Loaded presets replace
/// built-ins of the same name.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub presets: HashMap<String, DifficultyConfig>,
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO
/// error, returns None and the built-in presets stand alone.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "yakusu_backend", %path, "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "yakusu_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "yakusu_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::presets::builtin_presets;

  fn small_config() -> DifficultyConfig {
    DifficultyConfig {
      max_prime_factors: 3,
      prime_weights: vec![
        PrimeWeight { prime: 2, weight: 100 },
        PrimeWeight { prime: 3, weight: 50 },
      ],
      stop_probability_table: vec![
        StopRule { probability: 0.3, below: 20 },
        StopRule { probability: 0.7, below: 50 },
      ],
      max_value: 50,
    }
  }

  #[test]
  fn builtin_presets_validate() {
    for (name, cfg) in builtin_presets() {
      assert!(cfg.validate().is_ok(), "preset {name} failed validation");
    }
  }

  #[test]
  fn ceiling_invariant_is_enforced() {
    let mut cfg = small_config();
    cfg.prime_weights.push(PrimeWeight { prime: 31, weight: 5 });
    // 2 * 31 = 62 > 50
    assert!(cfg.validate().is_err());
  }

  #[test]
  fn non_prime_and_zero_weight_entries_are_rejected() {
    let mut cfg = small_config();
    cfg.prime_weights[0].prime = 9;
    assert!(cfg.validate().is_err());

    let mut cfg = small_config();
    cfg.prime_weights[1].weight = 0;
    assert!(cfg.validate().is_err());
  }

  #[test]
  fn stop_table_must_be_ordered_with_sane_probabilities() {
    let mut cfg = small_config();
    cfg.stop_probability_table[0].probability = 1.5;
    assert!(cfg.validate().is_err());

    let mut cfg = small_config();
    cfg.stop_probability_table[1].below = 10;
    assert!(cfg.validate().is_err());
  }

  #[test]
  fn stop_probability_walks_the_schedule() {
    let cfg = small_config();
    assert_eq!(cfg.stop_probability(6), 0.3);
    assert_eq!(cfg.stop_probability(20), 0.7);
    assert_eq!(cfg.stop_probability(49), 0.7);
    assert_eq!(cfg.stop_probability(50), 1.0);
  }

  #[test]
  fn toml_presets_parse() {
    let toml_src = r#"
      [presets.custom]
      max_prime_factors = 3
      max_value = 60
      prime_weights = [
        { prime = 2, weight = 100 },
        { prime = 5, weight = 20 },
      ]
      stop_probability_table = [
        { probability = 0.4, below = 30 },
      ]
    "#;
    let cfg: QuizConfig = toml::from_str(toml_src).expect("parse");
    let custom = cfg.presets.get("custom").expect("custom preset");
    assert!(custom.validate().is_ok());
    assert_eq!(custom.max_value, 60);
    assert_eq!(custom.min_prime(), 2);
    assert_eq!(custom.max_prime(), 5);
  }
}
