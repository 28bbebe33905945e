//! Divide-and-probe trial of a single candidate base ratio.
//!
//! Given a candidate ratio a/b > 1, the trial repeatedly rescales a running
//! quotient q by b/a (truncating division), so q walks down from n toward 0.
//! If the smaller prime factor of n tracks c * (a/b)^e, some rescaled
//! quotient lands within a few units of a multiple of one of n's factors,
//! and gcd(q^2 - k^2, n) = gcd((q - k)(q + k), n) surfaces it. The probe
//! window widens logarithmically with the division count to absorb the
//! truncation error the rescaling accumulates.

use std::sync::atomic::{AtomicBool, Ordering};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// ceil(log2(d)) for d >= 1.
fn ceil_log2(d: u64) -> u32 {
    d.next_power_of_two().trailing_zeros()
}

/// Attempt to split n with the candidate ratio a/b.
///
/// Preconditions: n >= 2, a > b >= 1, gcd(a, b) = 1. Returns a nontrivial
/// divisor of n, or `None` once the quotient drops below 2, the expected
/// outcome for a base that does not match n's structure.
pub fn test_base(n: &BigUint, a: &BigUint, b: &BigUint) -> Option<BigUint> {
    test_base_stoppable(n, a, b, &AtomicBool::new(false))
}

/// `test_base` with a cooperative stop flag, polled once per division.
///
/// A tripped flag ends the trial with `None`; the caller distinguishes
/// cancellation from exhaustion by re-reading the flag.
pub fn test_base_stoppable(
    n: &BigUint,
    a: &BigUint,
    b: &BigUint,
    stop: &AtomicBool,
) -> Option<BigUint> {
    debug_assert!(a > b, "ratio must exceed 1");
    debug_assert!(!b.is_zero(), "denominator must be positive");

    let one = BigUint::one();
    let two = BigUint::from(2u32);

    let mut q = n.clone();
    let mut divisions: u64 = 0;
    let mut gcd_tests: u64 = 0;

    loop {
        if stop.load(Ordering::Relaxed) {
            return None;
        }

        divisions += 1;
        q = &q * b / a;
        if q < two {
            log::trace!("base {}/{} exhausted after {} divisions", a, b, divisions);
            return None;
        }

        let q_squared = &q * &q;
        let window = 1 + u64::from(ceil_log2(divisions));
        for k in 0..=window {
            gcd_tests += 1;
            let k_squared = BigUint::from(k * k);
            // |q^2 - k^2|; the quotient can sink below the window width.
            let delta = if q_squared >= k_squared {
                &q_squared - &k_squared
            } else {
                &k_squared - &q_squared
            };
            let g = delta.gcd(n);
            if g > one && g < *n {
                log::debug!(
                    "divisor {} at k = {}, q = {}, divisions = {}, gcd tests = {}",
                    g,
                    k,
                    q,
                    divisions,
                    gcd_tests
                );
                return Some(g);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn mersenne(e: u64) -> BigUint {
        (BigUint::one() << e) - 1u32
    }

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(4), 2);
        assert_eq!(ceil_log2(5), 3);
        assert_eq!(ceil_log2(107), 7);
    }

    #[test]
    fn test_known_structured_target() {
        // 301-bit semiprime whose smaller factor tracks (11/3)^e.
        let n = BigUint::from_str(
            "32910716859144836902319093071490228285161562532098591993504414537604089702286327911158801",
        )
        .unwrap();
        let expected =
            BigUint::from_str("123081930193807529345720357345999").unwrap();

        let divisor = test_base(&n, &BigUint::from(11u32), &BigUint::from(3u32))
            .expect("base 11/3 should split the structured target");
        assert_eq!(divisor, expected);
        assert!((&n % &divisor).is_zero(), "divisor must divide n exactly");
    }

    #[test]
    fn test_mersenne_product_base_two() {
        // (2^89 - 1)(2^107 - 1): the smaller factor is (2/1)^89 scaled by
        // 1 - 2^-89, so halving the quotient walks straight onto it.
        let p = mersenne(89);
        let q = mersenne(107);
        let n = &p * &q;

        let divisor = test_base(&n, &BigUint::from(2u32), &BigUint::one())
            .expect("base 2/1 should split the Mersenne product");
        assert_eq!(divisor, p);
    }

    #[test]
    fn test_non_matching_base_terminates() {
        // Unstructured 64-bit semiprime: the quotient must sink below 2 in
        // finitely many halvings rather than loop forever.
        let n = BigUint::from(4294967311u64) * BigUint::from(4294967357u64);
        let result = test_base(&n, &BigUint::from(2u32), &BigUint::one());
        if let Some(d) = result {
            assert!((&n % &d).is_zero(), "any divisor returned must divide n");
            assert!(d > BigUint::one() && d < n, "divisor must be nontrivial");
        }
    }

    #[test]
    fn test_tiny_target_exhausts_immediately() {
        // 6 * 1 / 7 truncates to 0 on the first division.
        let n = BigUint::from(6u32);
        assert_eq!(
            test_base(&n, &BigUint::from(7u32), &BigUint::one()),
            None
        );
    }

    #[test]
    fn test_pre_tripped_stop_flag() {
        let n = BigUint::from(4294967311u64) * BigUint::from(4294967357u64);
        let stop = AtomicBool::new(true);
        assert_eq!(
            test_base_stoppable(&n, &BigUint::from(2u32), &BigUint::one(), &stop),
            None
        );
    }
}
