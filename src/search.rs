//! Search orchestration over candidate base ratios.
//!
//! Drives an outer loop over increasing partition sizes, mounts each
//! coprime partition as a ratio and hands it to the candidate trial, until
//! a divisor surfaces, the optional size bound is passed, or the caller
//! cancels. A fixed base can be tested directly, bypassing the search.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use num_bigint::BigUint;
use num_rational::BigRational;
use num_traits::One;
use rayon::prelude::*;

use crate::candidate;
use crate::partition::coprime_partitions;
use crate::primality::{is_probably_prime, DEFAULT_ROUNDS};

/// Smallest partition size a search may start from.
pub const MIN_PARTITION_SIZE: u64 = 3;

/// A candidate growth ratio a/b > 1 in lowest terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRatio {
    pub a: BigUint,
    pub b: BigUint,
}

impl BaseRatio {
    /// Mount a rational > 1 as a candidate ratio. `Ratio` already keeps the
    /// value reduced and the denominator positive.
    pub fn from_rational(r: &BigRational) -> Result<Self, SearchError> {
        if *r <= BigRational::one() {
            return Err(SearchError::InvalidBase(r.clone()));
        }
        let a = r
            .numer()
            .to_biguint()
            .ok_or_else(|| SearchError::InvalidBase(r.clone()))?;
        let b = r
            .denom()
            .to_biguint()
            .ok_or_else(|| SearchError::InvalidBase(r.clone()))?;
        Ok(Self { a, b })
    }

    fn from_partition(small: u64, large: u64) -> Self {
        Self {
            a: BigUint::from(large),
            b: BigUint::from(small),
        }
    }
}

impl fmt::Display for BaseRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.a, self.b)
    }
}

/// How a search ended. Exhaustion and cancellation are expected outcomes of
/// an algorithm that is incomplete by design, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A nontrivial divisor, together with the base that produced it.
    Found { base: BaseRatio, divisor: BigUint },
    /// Every base within the configured bound failed, or the single fixed
    /// base did.
    Exhausted,
    /// The stop flag was tripped before anything was found.
    Cancelled,
}

/// Input errors, reported before any trial runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("target must be an integer >= 2, got {0}")]
    InvalidInput(BigUint),

    #[error("{0} is prime, there is no composite structure to exploit")]
    PrimeInput(BigUint),

    #[error("candidate base {0} must be strictly greater than 1")]
    InvalidBase(BigRational),

    #[error("initial partition size must be at least 3, got {0}")]
    InvalidInitialSize(u64),
}

/// Search configuration.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// First partition size tried.
    pub initial_size: u64,
    /// Last partition size tried; 0 leaves the search unbounded.
    pub max_size: u64,
    /// Test exactly this ratio instead of searching.
    pub specific_base: Option<BigRational>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            initial_size: MIN_PARTITION_SIZE,
            max_size: 0,
            specific_base: None,
        }
    }
}

/// Boundary validation; returns the mounted fixed base, if one was given.
fn validate(n: &BigUint, params: &SearchParams) -> Result<Option<BaseRatio>, SearchError> {
    if *n < BigUint::from(2u32) {
        return Err(SearchError::InvalidInput(n.clone()));
    }
    let specific = match &params.specific_base {
        Some(r) => Some(BaseRatio::from_rational(r)?),
        None => None,
    };
    if specific.is_none() && params.initial_size < MIN_PARTITION_SIZE {
        return Err(SearchError::InvalidInitialSize(params.initial_size));
    }
    if is_probably_prime(n, DEFAULT_ROUNDS) {
        return Err(SearchError::PrimeInput(n.clone()));
    }
    Ok(specific)
}

fn run_trial(n: &BigUint, base: BaseRatio, stop: &AtomicBool) -> SearchOutcome {
    log::trace!("trying base {}", base);
    match candidate::test_base_stoppable(n, &base.a, &base.b, stop) {
        Some(divisor) => {
            log::info!("base {} splits off {}", base, divisor);
            SearchOutcome::Found { base, divisor }
        }
        None if stop.load(Ordering::Relaxed) => SearchOutcome::Cancelled,
        None => SearchOutcome::Exhausted,
    }
}

/// Search for a nontrivial divisor of n.
///
/// With `max_size == 0` the partition loop is unbounded and runs until a
/// divisor turns up; use [`factor_stoppable`] when the caller needs a way
/// out of an unsuccessful search.
pub fn factor(n: &BigUint, params: &SearchParams) -> Result<SearchOutcome, SearchError> {
    factor_stoppable(n, params, &AtomicBool::new(false))
}

/// [`factor`] with a cooperative stop flag, polled at every partition size
/// and every division within a trial.
pub fn factor_stoppable(
    n: &BigUint,
    params: &SearchParams,
    stop: &AtomicBool,
) -> Result<SearchOutcome, SearchError> {
    if let Some(base) = validate(n, params)? {
        log::debug!("testing fixed base {}", base);
        return Ok(run_trial(n, base, stop));
    }

    let mut m = params.initial_size;
    loop {
        if stop.load(Ordering::Relaxed) {
            return Ok(SearchOutcome::Cancelled);
        }
        log::debug!("partition size {}", m);
        for (small, large) in coprime_partitions(m) {
            match run_trial(n, BaseRatio::from_partition(small, large), stop) {
                SearchOutcome::Exhausted => {}
                done => return Ok(done),
            }
        }
        m += 1;
        if params.max_size > 0 && m > params.max_size {
            log::debug!("search exhausted at partition size {}", params.max_size);
            return Ok(SearchOutcome::Exhausted);
        }
    }
}

/// [`factor`] trying each partition size's bases concurrently.
///
/// Within one size the first success wins, so which of several matching
/// bases is reported depends on scheduling; sizes still advance in order.
pub fn factor_parallel(n: &BigUint, params: &SearchParams) -> Result<SearchOutcome, SearchError> {
    factor_parallel_stoppable(n, params, &AtomicBool::new(false))
}

/// [`factor_parallel`] with a cooperative stop flag.
pub fn factor_parallel_stoppable(
    n: &BigUint,
    params: &SearchParams,
    stop: &AtomicBool,
) -> Result<SearchOutcome, SearchError> {
    if let Some(base) = validate(n, params)? {
        log::debug!("testing fixed base {}", base);
        return Ok(run_trial(n, base, stop));
    }

    let mut m = params.initial_size;
    loop {
        if stop.load(Ordering::Relaxed) {
            return Ok(SearchOutcome::Cancelled);
        }
        log::debug!("partition size {}", m);

        // First success wins. The abort flag pulls sibling trials down once
        // a worker lands, and workers mirror the caller's stop flag into it
        // between trials.
        let abort = AtomicBool::new(false);
        let hit = coprime_partitions(m)
            .into_par_iter()
            .find_map_any(|(small, large)| {
                if stop.load(Ordering::Relaxed) {
                    abort.store(true, Ordering::Relaxed);
                    return None;
                }
                if abort.load(Ordering::Relaxed) {
                    return None;
                }
                let base = BaseRatio::from_partition(small, large);
                log::trace!("trying base {}", base);
                let divisor = candidate::test_base_stoppable(n, &base.a, &base.b, &abort)?;
                abort.store(true, Ordering::Relaxed);
                Some((base, divisor))
            });

        if let Some((base, divisor)) = hit {
            log::info!("base {} splits off {}", base, divisor);
            return Ok(SearchOutcome::Found { base, divisor });
        }
        if stop.load(Ordering::Relaxed) {
            return Ok(SearchOutcome::Cancelled);
        }
        m += 1;
        if params.max_size > 0 && m > params.max_size {
            log::debug!("search exhausted at partition size {}", params.max_size);
            return Ok(SearchOutcome::Exhausted);
        }
    }
}
