//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Each function here
//! only parses its subcommand's arguments into library calls and formats the
//! result — no engine logic lives in this module.

use anyhow::{Context, Result};
use primpoly::bigint::BigInt;
use primpoly::factor::{factor, FactorMode};
use primpoly::polynomial::Polynomial;
use primpoly::polyorder::{PolyOrder, PrimitivityVerdict};
use tracing::info;

use super::FactorStrategy;

/// `primpoly test <poly>, p`: decide irreducibility and primitivity of one
/// candidate polynomial.
pub fn run_test(poly: &str) -> Result<()> {
    let f = Polynomial::parse(poly).with_context(|| format!("parsing polynomial {poly:?}"))?;
    info!(p = f.modulus(), n = f.degree(), "testing polynomial");
    let order = PolyOrder::new(f.clone());
    let verdict = order.test_primitivity()?;
    let report = serde_json::json!({
        "polynomial": f.to_string(),
        "modulus": f.modulus(),
        "degree": f.degree(),
        "verdict": match verdict {
            PrimitivityVerdict::NotIrreducible => "not_irreducible",
            PrimitivityVerdict::IrreducibleNotPrimitive => "irreducible_not_primitive",
            PrimitivityVerdict::Primitive => "primitive",
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// `primpoly search --p <p> --n <n> [--limit <limit>]`: enumerate trial
/// polynomials of degree `n` over `GF(p)` in lexicographic order, printing
/// each one found to be primitive, until `limit` have been found or every
/// candidate has been tried.
pub fn run_search(p: u64, n: usize, limit: usize) -> Result<()> {
    let mut candidate = Polynomial::initial_trial_poly(p, n)?;
    let first = candidate.clone();
    let mut found = 0usize;
    let mut tried = 0u64;
    let mut order = PolyOrder::new(candidate.clone());
    loop {
        order.reset_polynomial(candidate.clone());
        tried += 1;
        if order.test_primitivity()? == PrimitivityVerdict::Primitive {
            println!("{candidate}");
            found += 1;
            if limit != 0 && found >= limit {
                break;
            }
        }
        candidate = candidate.next_trial_poly();
        if candidate == first {
            break;
        }
    }
    info!(tried, found, "search complete");
    Ok(())
}

/// `primpoly factor <n> [--strategy ...] [--table-p P --table-m M]`: factor
/// an arbitrary non-negative integer and print the result.
pub fn run_factor(
    n: &str,
    strategy: FactorStrategy,
    table_p: Option<u64>,
    table_m: Option<u32>,
) -> Result<()> {
    let value = BigInt::from_decimal_str(n).with_context(|| format!("parsing integer {n:?}"))?;
    let mode = match strategy {
        FactorStrategy::Auto => FactorMode::Automatic {
            table_key: table_p.zip(table_m),
        },
        FactorStrategy::Trial => FactorMode::TrialDivision,
        FactorStrategy::Rho => FactorMode::PollardRho { c: 1 },
        FactorStrategy::Table => {
            let p = table_p.context("--table-p is required with --strategy table")?;
            let m = table_m.context("--table-m is required with --strategy table")?;
            FactorMode::FactorTable { p, m }
        }
    };
    let factorization = factor(&value, mode)?;
    let factors: Vec<serde_json::Value> = factorization
        .factors
        .iter()
        .map(|f| {
            serde_json::json!({
                "prime": f.prime.to_string(),
                "multiplicity": f.multiplicity,
            })
        })
        .collect();
    let report = serde_json::json!({
        "n": value.to_string(),
        "factors": factors,
        "trial_divisions": factorization.stats.trial_divisions,
        "gcd_computations": factorization.stats.gcd_computations,
        "primality_tests": factorization.stats.primality_tests,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// `primpoly count --p <p> --n <n>`: report the number of primitive
/// polynomials of degree `n` over `GF(p)`, via Euler's totient.
pub fn run_count(p: u64, n: usize) -> Result<()> {
    let count = PolyOrder::primitive_count(p, n)?;
    println!("{count}");
    Ok(())
}
