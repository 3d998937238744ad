//! Random selection of last-dimension positions.

use rand::Rng;

/// Fill `numbers` with `n` distinct integers drawn uniformly from the closed
/// range `[0, m]`, in draw order.
///
/// `n` is capped at `m + 1`, the size of the range, so the rejection loop
/// always terminates.
pub fn sample_random<R: Rng>(rng: &mut R, n: usize, m: usize, numbers: &mut Vec<usize>) {
    numbers.clear();
    let n = n.min(m.saturating_add(1));
    numbers.reserve(n);
    while numbers.len() < n {
        let candidate = rng.gen_range(0..=m);
        if !numbers.contains(&candidate) {
            numbers.push(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_full_range_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut numbers = Vec::new();
        sample_random(&mut rng, 6, 5, &mut numbers);
        let mut sorted = numbers.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_request_capped_at_range_size() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut numbers = vec![42];
        sample_random(&mut rng, 10, 2, &mut numbers);
        assert_eq!(numbers.len(), 3);
        assert!(numbers.iter().all(|&v| v <= 2));
    }

    #[test]
    fn test_same_seed_same_draw() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        sample_random(&mut StdRng::seed_from_u64(9), 4, 19, &mut a);
        sample_random(&mut StdRng::seed_from_u64(9), 4, 19, &mut b);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_draws_are_distinct_and_in_range(
            seed in any::<u64>(),
            n in 0usize..40,
            m in 0usize..30,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut numbers = Vec::new();
            sample_random(&mut rng, n, m, &mut numbers);

            prop_assert_eq!(numbers.len(), n.min(m + 1));
            prop_assert!(numbers.iter().all(|&v| v <= m));
            let mut sorted = numbers.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), numbers.len());
        }
    }
}
