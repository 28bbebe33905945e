//! Coprime partitions of a partition size m.
//!
//! Every decomposition m = a + b with a < b and gcd(a, b) = 1 proposes one
//! candidate ratio b/a for the rational-base search. Partition sizes are
//! small machine words; the orchestrator widens the pairs to arbitrary
//! precision where it mounts them as ratios.

use num_integer::Integer;

/// All pairs (a, b) with a + b = m, a < b and gcd(a, b) = 1, in increasing
/// order of a. Empty for m < 2.
pub fn coprime_partitions(m: u64) -> Vec<(u64, u64)> {
    let mut pairs = Vec::new();
    for a in 1..(m + 1) / 2 {
        let b = m - a;
        if a.gcd(&b) == 1 {
            pairs.push((a, b));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Euler's totient by trial factorization, for the count property.
    fn phi(mut m: u64) -> u64 {
        let mut result = m;
        let mut d = 2;
        while d * d <= m {
            if m % d == 0 {
                while m % d == 0 {
                    m /= d;
                }
                result -= result / d;
            }
            d += 1;
        }
        if m > 1 {
            result -= result / m;
        }
        result
    }

    #[test]
    fn test_partitions_of_10() {
        assert_eq!(coprime_partitions(10), vec![(1, 9), (3, 7)]);
    }

    #[test]
    fn test_partitions_of_25() {
        assert_eq!(
            coprime_partitions(25),
            vec![
                (1, 24),
                (2, 23),
                (3, 22),
                (4, 21),
                (6, 19),
                (7, 18),
                (8, 17),
                (9, 16),
                (11, 14),
                (12, 13),
            ]
        );
    }

    #[test]
    fn test_small_sizes() {
        assert!(coprime_partitions(0).is_empty());
        assert!(coprime_partitions(1).is_empty());
        assert!(coprime_partitions(2).is_empty(), "(1, 1) fails a < b");
        assert_eq!(coprime_partitions(3), vec![(1, 2)]);
        assert_eq!(coprime_partitions(4), vec![(1, 3)]);
    }

    #[test]
    fn test_pair_invariants() {
        for m in 2..=120u64 {
            let pairs = coprime_partitions(m);
            let mut previous_a = 0;
            for (a, b) in &pairs {
                assert_eq!(a + b, m, "pair ({}, {}) must sum to {}", a, b, m);
                assert!(a < b, "pair ({}, {}) must be ordered", a, b);
                assert_eq!(a.gcd(b), 1, "pair ({}, {}) must be coprime", a, b);
                assert!(*a > previous_a, "pairs must ascend in a");
                previous_a = *a;
            }
        }
    }

    #[test]
    fn test_count_is_half_totient() {
        for m in 3..=120u64 {
            assert_eq!(
                coprime_partitions(m).len() as u64,
                phi(m) / 2,
                "partition count for {} should be phi/2",
                m
            );
        }
    }
}
