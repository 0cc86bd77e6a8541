//! Independent-draw random sampling over the catalog.
//!
//! Each slot of a drop is drawn independently and uniformly over the catalog
//! contents at call time, WITH replacement: the same card appearing in two
//! slots of one drop is a valid outcome, not a bug. This replaces the
//! shuffle-then-slice tricks floating around similar bots, whose behavior on
//! duplicates is accidental rather than documented.

use rand::Rng;

/// Draws `n` entries independently and uniformly with replacement.
///
/// Slot `i` of the result is draw `i`; no other ordering is meaningful.
/// An empty pool yields an empty result regardless of `n` - callers that
/// need `n > 0` draws must check the pool size first.
pub fn sample<T: Clone, R: Rng + ?Sized>(pool: &[T], n: usize, rng: &mut R) -> Vec<T> {
    if pool.is_empty() {
        return Vec::new();
    }
    (0..n)
        .map(|_| pool[rng.random_range(0..pool.len())].clone())
        .collect()
}

/// Draws a single entry uniformly, or `None` from an empty pool.
pub fn sample_one<T: Clone, R: Rng + ?Sized>(pool: &[T], rng: &mut R) -> Option<T> {
    if pool.is_empty() {
        None
    } else {
        Some(pool[rng.random_range(0..pool.len())].clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn returns_requested_length() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(sample(&["a", "b", "c"], 3, &mut rng).len(), 3);
        assert_eq!(sample(&["a"], 5, &mut rng).len(), 5);
        assert_eq!(sample(&["a", "b"], 0, &mut rng).len(), 0);
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        let drawn: Vec<&str> = sample(&[], 3, &mut rng);
        assert!(drawn.is_empty());
        assert_eq!(sample_one::<&str, _>(&[], &mut rng), None);
    }

    #[test]
    fn single_item_pool_repeats_it() {
        let mut rng = StdRng::seed_from_u64(7);
        let drawn = sample(&["only"], 3, &mut rng);
        assert_eq!(drawn, vec!["only", "only", "only"]);
    }

    #[test]
    fn draws_are_independent_and_uniform_per_slot() {
        // 1000 trials of drawing 3 slots from a 3-item pool. Per slot, each
        // item should land close to 1/3 of the time, and any fixed pair of
        // slots should collide close to 1/3 of the time - the signature of
        // sampling with replacement.
        let pool = ["a", "b", "c"];
        let trials = 1000;
        let mut rng = StdRng::seed_from_u64(42);

        let mut slot_counts = [[0u32; 3]; 3];
        let mut pair_collisions = 0u32;

        for _ in 0..trials {
            let drawn = sample(&pool, 3, &mut rng);
            for (slot, value) in drawn.iter().enumerate() {
                let idx = pool.iter().position(|p| p == value).unwrap();
                slot_counts[slot][idx] += 1;
            }
            if drawn[0] == drawn[1] {
                pair_collisions += 1;
            }
        }

        // Expected 333 per cell; 4 sigma is about 60
        for counts in &slot_counts {
            for &count in counts {
                assert!(
                    (270..=400).contains(&count),
                    "per-slot frequency out of tolerance: {slot_counts:?}"
                );
            }
        }
        // Expected 333 collisions; same tolerance
        assert!(
            (270..=400).contains(&pair_collisions),
            "pairwise duplicate rate out of tolerance: {pair_collisions}"
        );
    }
}
