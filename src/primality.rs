//! Probabilistic primality testing and semiprime target construction.
//!
//! The search screens its input with Miller-Rabin before doing any work.
//! The target constructors exist for the demo binary and the tests, which
//! need semiprimes with known factors: unstructured ones, and ones whose
//! smaller factor is planted on a rational-base curve.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Pow};
use rand::Rng;

/// Witness rounds used wherever this crate tests primality.
pub const DEFAULT_ROUNDS: u32 = 25;

/// Miller-Rabin probabilistic primality test with random witnesses.
pub fn is_probably_prime(n: &BigUint, rounds: u32) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    if n.is_even() {
        return *n == two;
    }
    if *n == BigUint::from(3u32) {
        return true;
    }

    // n - 1 = 2^r * d with d odd
    let n_minus_1 = n - 1u32;
    let r = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> r;

    let mut rng = rand::thread_rng();
    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 1..r {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Smallest probable prime strictly greater than n.
pub fn next_prime(n: &BigUint) -> BigUint {
    let two = BigUint::from(2u32);
    if *n < two {
        return two;
    }
    let mut candidate = n + 1u32;
    if candidate.is_even() {
        candidate += 1u32;
    }
    while !is_probably_prime(&candidate, DEFAULT_ROUNDS) {
        candidate += 2u32;
    }
    candidate
}

/// Random probable prime with exactly `bits` bits.
pub fn random_prime(bits: u64, rng: &mut impl Rng) -> BigUint {
    assert!(bits >= 2, "a prime needs at least 2 bits");
    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true); // full bit length
        candidate.set_bit(0, true); // odd
        if is_probably_prime(&candidate, DEFAULT_ROUNDS) {
            return candidate;
        }
    }
}

/// A semiprime with known prime factors, for exercising the search.
#[derive(Debug, Clone)]
pub struct Semiprime {
    pub n: BigUint,
    pub p: BigUint,
    pub q: BigUint,
}

impl Semiprime {
    /// True when d is one of the two prime factors.
    pub fn is_factor(&self, d: &BigUint) -> bool {
        *d == self.p || *d == self.q
    }
}

/// Random semiprime of roughly `bits` bits, with p <= q.
pub fn random_semiprime(bits: u64, rng: &mut impl Rng) -> Semiprime {
    let p = random_prime(bits / 2, rng);
    let q = random_prime(bits - bits / 2, rng);
    let n = &p * &q;
    let (p, q) = if p <= q { (p, q) } else { (q, p) };
    Semiprime { n, p, q }
}

/// Semiprime whose factor p is the next prime above c * (a/b)^e.
///
/// Pick e so that (a/b)^e comfortably exceeds 2^cofactor_bits; the product
/// then has exactly the structure the rational-base search exploits, and a
/// trial with ratio a/b splits it.
pub fn planted_semiprime(
    c: u64,
    a: u64,
    b: u64,
    e: u32,
    cofactor_bits: u64,
    rng: &mut impl Rng,
) -> Semiprime {
    assert!(a > b && b >= 1, "ratio a/b must exceed 1");
    let scaled = (BigUint::from(c) * BigUint::from(a).pow(e)) / BigUint::from(b).pow(e);
    let p = next_prime(&scaled);
    let q = random_prime(cofactor_bits, rng);
    let n = &p * &q;
    Semiprime { n, p, q }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn test_is_probably_prime_known_values() {
        for prime in [2u64, 3, 5, 7, 104729, 4294967311] {
            assert!(
                is_probably_prime(&BigUint::from(prime), DEFAULT_ROUNDS),
                "{} is prime",
                prime
            );
        }
        for composite in [0u64, 1, 4, 9, 100, 8051, 104729 * 104743] {
            assert!(
                !is_probably_prime(&BigUint::from(composite), DEFAULT_ROUNDS),
                "{} is not prime",
                composite
            );
        }
    }

    #[test]
    fn test_is_probably_prime_mersenne() {
        let m89 = (BigUint::one() << 89u32) - 1u32;
        assert!(is_probably_prime(&m89, DEFAULT_ROUNDS), "2^89 - 1 is prime");
        let m90 = (BigUint::one() << 90u32) - 1u32;
        assert!(!is_probably_prime(&m90, DEFAULT_ROUNDS), "2^90 - 1 is not");
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(&BigUint::zero()), BigUint::from(2u32));
        assert_eq!(next_prime(&BigUint::from(2u32)), BigUint::from(3u32));
        assert_eq!(next_prime(&BigUint::from(7u32)), BigUint::from(11u32));
        assert_eq!(next_prime(&BigUint::from(13u32)), BigUint::from(17u32));
        assert_eq!(
            next_prime(&BigUint::from(104728u32)),
            BigUint::from(104729u32)
        );
    }

    #[test]
    fn test_random_prime_bit_length() {
        let mut rng = rand::thread_rng();
        for bits in [16u64, 32, 64, 100] {
            let p = random_prime(bits, &mut rng);
            assert_eq!(p.bits(), bits, "random_prime({}) has wrong width", bits);
        }
    }

    #[test]
    fn test_random_semiprime_factors() {
        let mut rng = rand::thread_rng();
        let target = random_semiprime(64, &mut rng);
        assert_eq!(&target.p * &target.q, target.n);
        assert!(target.p <= target.q);
        assert!(target.is_factor(&target.p));
        assert!(!target.is_factor(&target.n));
    }

    #[test]
    fn test_planted_semiprime_structure() {
        let mut rng = rand::thread_rng();
        let target = planted_semiprime(5, 11, 3, 40, 64, &mut rng);
        assert_eq!(&target.p * &target.q, target.n);

        // p sits just above 5 * (11/3)^40
        let scaled =
            (BigUint::from(5u64) * BigUint::from(11u64).pow(40u32)) / BigUint::from(3u64).pow(40u32);
        assert!(target.p > scaled);
        assert!(is_probably_prime(&target.p, DEFAULT_ROUNDS));
    }
}
