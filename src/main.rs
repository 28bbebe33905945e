//! rational-base CLI: factor semiprimes with rational-base structure.
//!
//! Modes:
//!   (no --n)              Sectioned demo on known structured targets
//!   --n=<decimal>         Factor one target
//!
//! Options:
//!   --base=<a/b>          Test one fixed base instead of searching
//!   --initial-size=<m>    First partition size (default: 3)
//!   --max-size=<m>        Stop after this partition size (0 = unbounded)
//!   --parallel            Try each size's bases concurrently
//!   --timeout-secs=<s>    Cancel the search after this many seconds
//!   --json                Emit the run report as JSON

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{One, Zero};
use serde::Serialize;

use rational_base::partition::coprime_partitions;
use rational_base::primality::{
    is_probably_prime, planted_semiprime, random_semiprime, DEFAULT_ROUNDS,
};
use rational_base::{
    factor, factor_parallel, factor_parallel_stoppable, factor_stoppable, SearchOutcome,
    SearchParams,
};

/// CLI configuration parsed from command-line arguments.
struct CliConfig {
    n: Option<BigUint>,
    base: Option<BigRational>,
    initial_size: u64,
    max_size: u64,
    parallel: bool,
    timeout_secs: Option<u64>,
    json: bool,
}

/// JSON run report for a single factorization.
#[derive(Serialize)]
struct RunReport {
    n: String,
    mode: &'static str,
    outcome: &'static str,
    base: Option<String>,
    divisor: Option<String>,
    cofactor: Option<String>,
    cofactor_probably_prime: Option<bool>,
    elapsed_secs: f64,
}

fn parse_ratio(s: &str) -> Result<BigRational, String> {
    let (num, den) = match s.split_once('/') {
        Some((n, d)) => (n, d),
        None => (s, "1"),
    };
    let num =
        BigInt::from_str(num.trim()).map_err(|e| format!("bad numerator in '{}': {}", s, e))?;
    let den =
        BigInt::from_str(den.trim()).map_err(|e| format!("bad denominator in '{}': {}", s, e))?;
    if den.is_zero() {
        return Err(format!("zero denominator in '{}'", s));
    }
    Ok(BigRational::new(num, den))
}

fn parse_args() -> Result<CliConfig, String> {
    let args: Vec<String> = std::env::args().collect();

    let n = args
        .iter()
        .find(|a| a.starts_with("--n="))
        .map(|a| {
            let s = a.strip_prefix("--n=").unwrap();
            BigUint::from_str(s).map_err(|e| format!("--n is not a decimal integer: {}", e))
        })
        .transpose()?;

    let base = args
        .iter()
        .find(|a| a.starts_with("--base="))
        .map(|a| parse_ratio(a.strip_prefix("--base=").unwrap()))
        .transpose()?;

    let initial_size = args
        .iter()
        .find(|a| a.starts_with("--initial-size="))
        .and_then(|a| a.strip_prefix("--initial-size=")?.parse::<u64>().ok())
        .unwrap_or(3);

    let max_size = args
        .iter()
        .find(|a| a.starts_with("--max-size="))
        .and_then(|a| a.strip_prefix("--max-size=")?.parse::<u64>().ok())
        .unwrap_or(0);

    let parallel = args.iter().any(|a| a == "--parallel");

    let timeout_secs = args
        .iter()
        .find(|a| a.starts_with("--timeout-secs="))
        .and_then(|a| a.strip_prefix("--timeout-secs=")?.parse::<u64>().ok());

    let json = args.iter().any(|a| a == "--json");

    Ok(CliConfig {
        n,
        base,
        initial_size,
        max_size,
        parallel,
        timeout_secs,
        json,
    })
}

fn main() {
    env_logger::init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match config.n.clone() {
        Some(n) => run_factor(&n, &config),
        None => run_demo(),
    }
}

// -------------------------------------------------------------------------
// Single-target mode
// -------------------------------------------------------------------------

fn run_factor(n: &BigUint, config: &CliConfig) {
    let params = SearchParams {
        initial_size: config.initial_size,
        max_size: config.max_size,
        specific_base: config.base.clone(),
    };

    let stop = Arc::new(AtomicBool::new(false));
    if let Some(secs) = config.timeout_secs {
        let stop = Arc::clone(&stop);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(secs));
            stop.store(true, Ordering::Relaxed);
        });
    }

    let mode = if config.base.is_some() {
        "specific-base"
    } else if config.parallel {
        "parallel-search"
    } else {
        "search"
    };

    let start = Instant::now();
    let result = if config.parallel {
        factor_parallel_stoppable(n, &params, &stop)
    } else {
        factor_stoppable(n, &params, &stop)
    };
    let elapsed = start.elapsed();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut report = RunReport {
        n: n.to_string(),
        mode,
        outcome: "exhausted",
        base: None,
        divisor: None,
        cofactor: None,
        cofactor_probably_prime: None,
        elapsed_secs: elapsed.as_secs_f64(),
    };

    match &outcome {
        SearchOutcome::Found { base, divisor } => {
            let cofactor = n / divisor;
            report.outcome = "found";
            report.base = Some(base.to_string());
            report.divisor = Some(divisor.to_string());
            report.cofactor = Some(cofactor.to_string());
            report.cofactor_probably_prime =
                Some(is_probably_prime(&cofactor, DEFAULT_ROUNDS));
        }
        SearchOutcome::Exhausted => report.outcome = "exhausted",
        SearchOutcome::Cancelled => report.outcome = "cancelled",
    }

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
        return;
    }

    println!("n = {}", report.n);
    match &outcome {
        SearchOutcome::Found { base, divisor } => {
            let cofactor = n / divisor;
            println!(
                "  {} = {} x {}   (base {}, {:?})",
                report.n, divisor, cofactor, base, elapsed
            );
            println!(
                "  cofactor probably prime: {}",
                report.cofactor_probably_prime.unwrap_or(false)
            );
        }
        SearchOutcome::Exhausted => {
            println!("  no divisor found ({:?})", elapsed);
        }
        SearchOutcome::Cancelled => {
            println!("  cancelled after {:?}", elapsed);
        }
    }
}

// -------------------------------------------------------------------------
// Demo mode
// -------------------------------------------------------------------------

fn run_demo() {
    println!("=== Rational-Base Semiprime Factoring ===\n");

    section_1_known_targets();
    section_2_partitions();
    section_3_specific_base();
    section_4_planted_targets();
    section_5_bounded_search();
}

/// Known semiprimes whose smaller factor carries rational-base structure.
fn section_1_known_targets() {
    println!("--- Section 1: Known Structured Targets ---\n");

    let mersenne_product =
        ((BigUint::one() << 89u32) - 1u32) * ((BigUint::one() << 107u32) - 1u32);

    let targets = vec![
        (
            BigUint::from_str("71182049442858712148942698958093").unwrap(),
            "~106-bit structured semiprime",
        ),
        (mersenne_product, "(2^89 - 1)(2^107 - 1)"),
    ];

    for (n, description) in &targets {
        let start = Instant::now();
        match factor(n, &SearchParams::default()) {
            Ok(SearchOutcome::Found { base, divisor }) => {
                let cofactor = n / &divisor;
                println!("  {} ({}):", n, description);
                println!(
                    "    {} x {}   base {}   in {:?}",
                    divisor,
                    cofactor,
                    base,
                    start.elapsed()
                );
                println!(
                    "    cofactor probably prime: {}",
                    is_probably_prime(&cofactor, DEFAULT_ROUNDS)
                );
            }
            Ok(other) => println!("  {} ({}): {:?}", n, description, other),
            Err(e) => println!("  {} ({}): error: {}", n, description, e),
        }
    }
    println!();
}

/// The candidate bases the search enumerates at each partition size.
fn section_2_partitions() {
    println!("--- Section 2: Coprime Partitions ---\n");

    for m in [3u64, 10, 25] {
        let pairs = coprime_partitions(m);
        let ratios: Vec<String> = pairs
            .iter()
            .map(|(small, large)| format!("{}/{}", large, small))
            .collect();
        println!("  m = {:>2}: {} ratios: {}", m, ratios.len(), ratios.join(", "));
    }
    println!();
}

/// Bypassing the search when the base is already known.
fn section_3_specific_base() {
    println!("--- Section 3: Specific-Base Mode ---\n");

    let n = BigUint::from_str(
        "32910716859144836902319093071490228285161562532098591993504414537604089702286327911158801",
    )
    .unwrap();
    let params = SearchParams {
        specific_base: Some(BigRational::new(BigInt::from(11), BigInt::from(3))),
        ..SearchParams::default()
    };

    let start = Instant::now();
    match factor(&n, &params) {
        Ok(SearchOutcome::Found { base, divisor }) => {
            println!("  301-bit target, fixed base {}:", base);
            println!("    divisor {}   in {:?}", divisor, start.elapsed());
        }
        Ok(other) => println!("  unexpected outcome: {:?}", other),
        Err(e) => println!("  error: {}", e),
    }
    println!();
}

/// Fresh targets planted on a rational-base curve.
fn section_4_planted_targets() {
    println!("--- Section 4: Planted Targets ---\n");

    let mut rng = rand::thread_rng();

    let configs: &[(u64, u64, u64, u32, u64)] = &[
        (5, 11, 3, 40, 64),
        (1, 7, 2, 32, 48),
        (3, 5, 4, 260, 80),
    ];

    for &(c, a, b, e, cofactor_bits) in configs {
        let target = planted_semiprime(c, a, b, e, cofactor_bits, &mut rng);
        println!(
            "  p = nextprime({} * ({}/{})^{}), q random {}-bit:",
            c, a, b, e, cofactor_bits
        );

        let start = Instant::now();
        match factor_parallel(&target.n, &SearchParams::default()) {
            Ok(SearchOutcome::Found { base, divisor }) => {
                println!(
                    "    split by base {} -> {}   (planted factor: {})   in {:?}",
                    base,
                    divisor,
                    target.is_factor(&divisor),
                    start.elapsed()
                );
            }
            Ok(other) => println!("    unexpected outcome: {:?}", other),
            Err(e) => println!("    error: {}", e),
        }
    }
    println!();
}

/// Unstructured targets exhaust the bounded search.
fn section_5_bounded_search() {
    println!("--- Section 5: Bounded Search on Unstructured Targets ---\n");

    let mut rng = rand::thread_rng();
    let target = random_semiprime(96, &mut rng);
    let params = SearchParams {
        max_size: 12,
        ..SearchParams::default()
    };

    println!("  n = {} ({} bits), partition sizes 3..=12:", target.n, target.n.bits());
    let start = Instant::now();
    match factor(&target.n, &params) {
        Ok(SearchOutcome::Exhausted) => {
            println!("    exhausted in {:?} (expected: no structure)", start.elapsed());
        }
        Ok(SearchOutcome::Found { base, divisor }) => {
            println!("    surprise divisor {} at base {}", divisor, base);
        }
        Ok(other) => println!("    unexpected outcome: {:?}", other),
        Err(e) => println!("    error: {}", e),
    }
    println!();
}
