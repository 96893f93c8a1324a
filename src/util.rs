//! Small utility helpers used across modules.

use rand::Rng;

/// Weighted selection over a slice: draw a uniform value in `[0, total)` and
/// walk the cumulative weights until it is covered. Returns `None` for an
/// empty slice or all-zero weights.
pub fn weighted_pick<'a, T>(items: &'a [T], weight_of: impl Fn(&T) -> u32, rng: &mut impl Rng) -> Option<&'a T> {
  let total: u64 = items.iter().map(|it| weight_of(it) as u64).sum();
  if total == 0 {
    return None;
  }
  let mut draw = rng.gen_range(0..total);
  for it in items {
    let w = weight_of(it) as u64;
    if draw < w {
      return Some(it);
    }
    draw -= w;
  }
  // draw < total guarantees coverage above
  None
}
