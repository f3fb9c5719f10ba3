use rand::Rng;

/// Uniform integer in `[min, max)`. A degenerate range yields `min`.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> usize {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// In-place shuffle: element `i` swaps with a random `j` in `[i, len)`.
/// Returns the same slice so calls can be chained.
pub fn shuffle<'a, T, R: Rng + ?Sized>(items: &'a mut [T], rng: &mut R) -> &'a mut [T] {
    let len = items.len();
    for i in 0..len {
        let j = random_int(rng, i, len);
        items.swap(i, j);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_int_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let v = random_int(&mut rng, 3, 9);
            assert!((3..9).contains(&v));
        }
    }

    #[test]
    fn test_random_int_hits_every_value() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 4];
        for _ in 0..1_000 {
            seen[random_int(&mut rng, 0, 4)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_random_int_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_int(&mut rng, 5, 5), 5);
        assert_eq!(random_int(&mut rng, 5, 2), 5);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in 1..20 {
            let original: Vec<usize> = (0..len).map(|i| i % 5).collect();
            let mut v = original.clone();
            shuffle(&mut v, &mut rng);
            assert_eq!(v.len(), original.len());

            let mut a = v.clone();
            let mut b = original.clone();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut empty: Vec<u8> = Vec::new();
        assert!(shuffle(&mut empty, &mut rng).is_empty());

        let mut one = vec!["a"];
        assert_eq!(shuffle(&mut one, &mut rng).to_vec(), vec!["a"]);
    }

    #[test]
    fn test_shuffle_reorders_eventually() {
        let mut rng = StdRng::seed_from_u64(99);
        let original: Vec<u32> = (0..10).collect();
        let moved = (0..20).any(|_| {
            let mut v = original.clone();
            shuffle(&mut v, &mut rng);
            v != original
        });
        assert!(moved);
    }
}
