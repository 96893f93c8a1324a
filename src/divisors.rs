//! Divisor-pair enumeration: the deterministic half of question generation.

use crate::domain::DivisorPair;

/// All factor pairs of `n` excluding the trivial factor 1, ascending by the
/// smaller factor. The scan bound keeps `a <= n / a`, so ordering and
/// deduplication fall out of the loop itself. Exact squares yield the
/// self-pair `(sqrt(n), sqrt(n))` once; it is kept as a valid choice.
///
/// Primes and anything below 4 produce an empty list.
pub fn divisor_pairs(n: u64) -> Vec<DivisorPair> {
  let mut pairs = Vec::new();
  let mut i = 2u64;
  while i * i <= n {
    if n % i == 0 {
      pairs.push(DivisorPair(i, n / i));
    }
    i += 1;
  }
  pairs
}

/// Trial-division primality check; config validation uses it to vet the
/// weighted-prime tables, so it only ever sees small numbers.
pub fn is_prime(n: u64) -> bool {
  if n < 2 {
    return false;
  }
  let mut i = 2u64;
  while i * i <= n {
    if n % i == 0 {
      return false;
    }
    i += 1;
  }
  true
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pairs_of_36_are_ascending_and_include_self_pair() {
    let pairs = divisor_pairs(36);
    assert_eq!(
      pairs,
      vec![DivisorPair(2, 18), DivisorPair(3, 12), DivisorPair(4, 9), DivisorPair(6, 6)]
    );
  }

  #[test]
  fn primes_and_tiny_inputs_have_no_pairs() {
    assert!(divisor_pairs(7).is_empty());
    for n in 0..4 {
      assert!(divisor_pairs(n).is_empty(), "n={n}");
    }
  }

  #[test]
  fn every_pair_multiplies_back_and_never_repeats() {
    for n in 1..=400u64 {
      let pairs = divisor_pairs(n);
      for (idx, p) in pairs.iter().enumerate() {
        assert_eq!(p.product(), n, "n={n}");
        assert!(p.0 >= 2, "n={n}");
        assert!(p.0 <= p.1, "n={n}");
        assert!(!pairs[idx + 1..].contains(p), "n={n} duplicate {p:?}");
      }
      // ascending by the smaller factor
      for w in pairs.windows(2) {
        assert!(w[0].0 < w[1].0, "n={n}");
      }
    }
  }

  #[test]
  fn composites_with_a_nontrivial_pair_are_nonempty() {
    for n in 4..=400u64 {
      if !is_prime(n) {
        assert!(!divisor_pairs(n).is_empty(), "n={n}");
      }
    }
  }

  #[test]
  fn enumeration_is_pure() {
    assert_eq!(divisor_pairs(360), divisor_pairs(360));
  }

  #[test]
  fn primality_spot_checks() {
    let primes = [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 97];
    for p in primes {
      assert!(is_prime(p), "{p}");
    }
    for c in [0u64, 1, 4, 9, 15, 21, 91, 100] {
      assert!(!is_prime(c), "{c}");
    }
  }
}
