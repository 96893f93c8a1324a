//! Question generation: weighted target synthesis, distractor selection, and
//! question assembly.
//!
//! Flow, once per question:
//! 1) `generate_answer_number` multiplies weighted-random primes under the
//!    preset's value ceiling and stopping schedule.
//! 2) `generate_wrong_choices` mines divisor pairs of nearby numbers for
//!    three plausible wrong answers.
//! 3) `generate_question` tags one true pair plus the distractors and
//!    shuffles the lineup.
//!
//! Everything takes the RNG as an argument; callers pass `thread_rng`, tests
//! pass a seeded `StdRng`.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::DifficultyConfig;
use crate::divisors::divisor_pairs;
use crate::domain::{Choice, DivisorPair, Question};
use crate::util::weighted_pick;

/// Distractor candidates come from `target +/- WINDOW`.
const DISTRACTOR_WINDOW: i64 = 10;

/// Primes used by the postcondition repair when no multiplication landed.
const REPAIR_PRIMES: [u64; 2] = [2, 3];

fn draw_prime(cfg: &DifficultyConfig, rng: &mut impl Rng) -> u64 {
  weighted_pick(&cfg.prime_weights, |pw| pw.weight, rng)
    .map(|pw| pw.prime)
    // validated configs always carry at least one positively weighted prime
    .unwrap_or(2)
}

/// Synthesize a target number for the given difficulty: always composite,
/// with a factor count capped by `max_prime_factors`.
///
/// A step whose tentative product would pass `max_value` abandons
/// accumulation outright; there is no retry with a smaller prime. After each
/// committed step the stopping schedule gets a chance to end the loop early,
/// which skews the distribution toward smaller products with fewer factors.
pub fn generate_answer_number(cfg: &DifficultyConfig, rng: &mut impl Rng) -> u64 {
  let mut product = draw_prime(cfg, rng);
  let mut committed = 1u32;

  for _ in 1..cfg.max_prime_factors {
    let prime = draw_prime(cfg, rng);
    let tentative = product.saturating_mul(prime);
    if tentative > cfg.max_value {
      break;
    }
    product = tentative;
    committed += 1;

    if rng.gen::<f64>() < cfg.stop_probability(product) {
      break;
    }
  }

  if committed == 1 {
    // A bare prime has no non-trivial pair. Force one more small factor,
    // ignoring the ceiling; presets keep enough headroom that this still
    // lands inside it.
    let bump = REPAIR_PRIMES.choose(rng).copied().unwrap_or(2);
    product *= bump;
  }

  product
}

/// Three mutually distinct wrong pairs whose products sit near, but never on,
/// the target. Candidate numbers are `target +/- 10` (skipping anything
/// below 4), shuffled, and — for odd targets — stably reordered so odd
/// candidates are tried first: an all-even lineup against an odd target would
/// give the answer away.
///
/// Distinctness comes for free: a pair determines its product, and every
/// candidate is a different number. For tiny targets the window can run out
/// of composites and return fewer than three pairs; it is not widened here,
/// since every target the generator can emit (a composite >= 4) has at least
/// three composite neighbours in range. Callers see the short list and decide.
pub fn generate_wrong_choices(target: u64, rng: &mut impl Rng) -> Vec<DivisorPair> {
  let mut pool: Vec<u64> = (-DISTRACTOR_WINDOW..=DISTRACTOR_WINDOW)
    .filter(|&off| off != 0)
    .filter_map(|off| {
      let candidate = target as i64 + off;
      (candidate > 3).then_some(candidate as u64)
    })
    .collect();
  pool.shuffle(rng);

  let pool = if target % 2 == 1 {
    let (mut odds, evens): (Vec<u64>, Vec<u64>) = pool.into_iter().partition(|&c| c % 2 == 1);
    odds.extend(evens);
    odds
  } else {
    pool
  };

  let mut picked = Vec::with_capacity(3);
  for candidate in pool {
    let pairs = divisor_pairs(candidate);
    if let Some(pair) = pairs.choose(rng) {
      picked.push(*pair);
      if picked.len() == 3 {
        break;
      }
    }
  }
  picked
}

/// Assemble one question: target, one true pair chosen uniformly, three
/// distractors, all shuffled. No retries and no extra validation; the
/// sub-generators already guarantee their contracts.
pub fn generate_question(cfg: &DifficultyConfig, rng: &mut impl Rng) -> Question {
  let number = generate_answer_number(cfg, rng);
  let correct_pairs = divisor_pairs(number);
  let correct = match correct_pairs.choose(rng) {
    Some(p) => *p,
    // unreachable: generate_answer_number never returns a prime
    None => DivisorPair(2, number),
  };

  let mut choices: Vec<Choice> = Vec::with_capacity(4);
  choices.push(Choice { pair: correct, is_correct: true });
  choices.extend(
    generate_wrong_choices(number, rng)
      .into_iter()
      .map(|pair| Choice { pair, is_correct: false }),
  );
  choices.shuffle(rng);

  Question { number, choices }
}
