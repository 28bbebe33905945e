//! Rational-base semiprime factoring.
//!
//! Factors N = p * q when the smaller prime factor tracks c * (a/b)^n for
//! some small coprime pair a > b, without knowledge of c or n. An
//! exhaustive search over coprime partitions proposes candidate ratios;
//! each trial repeatedly rescales a running quotient by b/a and probes a
//! slowly widening window around it with a difference-of-squares gcd test.
//! The search is incomplete by design: it succeeds only when the target
//! actually carries rational-base structure within the bases explored.

pub mod candidate;
pub mod partition;
pub mod primality;
pub mod search;

// Re-export the arbitrary-precision type for convenience
pub use num_bigint::BigUint;

pub use search::{
    factor, factor_parallel, factor_parallel_stoppable, factor_stoppable, BaseRatio, SearchError,
    SearchOutcome, SearchParams, MIN_PARTITION_SIZE,
};
