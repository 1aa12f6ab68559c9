//! Primality testing and integer factorization.
//!
//! Primality drives factorization (every candidate factor pulled out by
//! Pollard rho or trial division is confirmed prime before being accepted)
//! and factorization drives [`crate::polyorder`] (the order-of-x test needs
//! the distinct prime factors of `r = (p^n - 1)/(p - 1)`).
//!
//! `Automatic` mode tries, in order: the packaged factor table (if a table
//! key was supplied and a matching table is found), Pollard rho with c=1,
//! Pollard rho with c=5, and finally trial division, which always succeeds
//! and is the termination guarantee for the whole ladder.

use crate::bigint::BigInt;
use crate::error::{PrimitiveError, Result};
use crate::modmath::{gcd_bigint, pow_mod_bigint, uniform_random_bigint};
use tracing::{debug, trace};

/// A prime raised to a multiplicity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeFactor {
    pub prime: BigInt,
    pub multiplicity: u32,
}

/// Counters for trial divisions, gcd computations, squarings, and primality
/// tests performed while producing a [`Factorization`]. Reported for
/// diagnostics; never consulted for correctness.
#[derive(Clone, Debug, Default)]
pub struct FactorStats {
    pub trial_divisions: u64,
    pub gcd_computations: u64,
    pub squarings: u64,
    pub primality_tests: u64,
}

/// A sorted, deduplicated sequence of prime-power factors whose product
/// equals the factored value.
#[derive(Clone, Debug, Default)]
pub struct Factorization {
    pub factors: Vec<PrimeFactor>,
    pub stats: FactorStats,
}

impl Factorization {
    /// The distinct primes, ascending — the projection used by
    /// [`crate::polyorder`]'s order-of-x test.
    pub fn distinct_primes(&self) -> Vec<BigInt> {
        self.factors.iter().map(|f| f.prime.clone()).collect()
    }

    /// Number of distinct prime factors; always equals
    /// `distinct_primes().len()`.
    pub fn num_distinct_factors(&self) -> usize {
        self.factors.len()
    }

    /// Recompute the product `∏ pᵢ^eᵢ`, for verification.
    pub fn product(&self) -> BigInt {
        let mut acc = BigInt::from_u64(1);
        for f in &self.factors {
            acc = acc.mul(&pow_bigint(&f.prime, f.multiplicity));
        }
        acc
    }

    /// Sort ascending by prime, coalesce duplicate primes by summing
    /// multiplicities, and drop any factor with prime = 1 (a leftover unit
    /// placeholder seeded by some factoring strategies).
    fn normalize(mut factors: Vec<PrimeFactor>) -> Vec<PrimeFactor> {
        factors.sort_by(|a, b| a.prime.cmp(&b.prime));
        let mut out: Vec<PrimeFactor> = Vec::with_capacity(factors.len());
        for f in factors {
            if f.prime == BigInt::from_u64(1) {
                continue;
            }
            if let Some(last) = out.last_mut() {
                if last.prime == f.prime {
                    last.multiplicity += f.multiplicity;
                    continue;
                }
            }
            out.push(f);
        }
        out
    }
}

/// `base^exp` for a [`BigInt`] base and machine exponent, used when
/// recombining a factorization's prime powers.
fn pow_bigint(base: &BigInt, exp: u32) -> BigInt {
    let mut result = BigInt::from_u64(1);
    let mut b = base.clone();
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result = result.mul(&b);
        }
        e >>= 1;
        if e > 0 {
            b = b.mul(&b);
        }
    }
    result
}

/// Which strategy (or ladder of strategies) `factor` should use.
#[derive(Clone, Debug)]
pub enum FactorMode {
    /// Look the value up in a packaged factor table keyed by `(p, m)`
    /// (the value being factored must equal `p^m - 1`).
    FactorTable { p: u64, m: u32 },
    /// Exhaustive trial division. Always terminates.
    TrialDivision,
    /// Pollard's rho (Brent's variant) with constant `c`.
    PollardRho { c: u64 },
    /// Table, then rho(c=1), then rho(c=5), then trial division.
    Automatic { table_key: Option<(u64, u32)> },
}

/// Factor `n` according to `mode`.
pub fn factor(n: &BigInt, mode: FactorMode) -> Result<Factorization> {
    let mut stats = FactorStats::default();
    match mode {
        FactorMode::FactorTable { p, m } => {
            let found = crate::factor_table::lookup(p, m)?;
            match found {
                Some(f) if &f.product() == n => Ok(f),
                Some(_) => Err(PrimitiveError::FactorizationCorrupt(format!(
                    "table entry for p={p} m={m} does not match the requested value"
                ))),
                None => Err(PrimitiveError::FactorizationCorrupt(format!(
                    "no verified table entry for p={p} m={m}"
                ))),
            }
        }
        FactorMode::TrialDivision => Ok(trial_division(n, &mut stats)),
        FactorMode::PollardRho { c } => pollard_rho(n, c, &mut stats).map(|factors| Factorization {
            factors: Factorization::normalize(factors),
            stats,
        }).ok_or_else(|| {
            PrimitiveError::FactorizationCorrupt(format!("Pollard rho (c={c}) did not converge"))
        }),
        FactorMode::Automatic { table_key } => {
            if let Some((p, m)) = table_key {
                if let Ok(Some(f)) = crate::factor_table::lookup(p, m) {
                    if &f.product() == n {
                        debug!(p, m, "factor table hit");
                        return Ok(f);
                    }
                }
            }
            for c in [1u64, 5] {
                trace!(c, "attempting Pollard rho");
                if let Some(factors) = pollard_rho(n, c, &mut stats) {
                    return Ok(Factorization {
                        factors: Factorization::normalize(factors),
                        stats,
                    });
                }
            }
            debug!("falling back to trial division");
            Ok(trial_division(n, &mut stats))
        }
    }
}

// ---- Primality ----

/// Miller–Rabin with witness `x`. Handles the small cases (0, 1, 4
/// composite; 2, 3, 5 prime; divisible by 2, 3, or 5 composite) before
/// falling back to the general test.
pub fn is_probably_prime(n: &BigInt, x: &BigInt) -> Result<bool> {
    let zero = BigInt::zero();
    let one = BigInt::from_u64(1);
    for small in [0u64, 1, 4] {
        if n == &BigInt::from_u64(small) {
            return Ok(false);
        }
    }
    for small in [2u64, 3, 5] {
        if n == &BigInt::from_u64(small) {
            return Ok(true);
        }
    }
    for small in [2u64, 3, 5] {
        if n.rem(&BigInt::from_u64(small))? == zero {
            return Ok(false);
        }
    }

    let n_minus_1 = n.sub(&one)?;
    let mut q = n_minus_1.clone();
    let mut k = 0u64;
    while q.bit(0) == 0 {
        q = q.div_by_2().0;
        k += 1;
    }

    let mut y = pow_mod_bigint(x, &q, n)?;
    for j in 0..k {
        if j == 0 && y == one {
            return Ok(true);
        }
        if y == n_minus_1 {
            return Ok(true);
        }
        if j > 0 && y == one {
            return Ok(false);
        }
        y = y.mul(&y).rem(n)?;
    }
    Ok(false)
}

/// 14 independent Miller–Rabin trials with random witnesses (coerced to 3
/// when drawn as 0 or 1). Any composite verdict is conclusive; all trials
/// passing returns true.
pub fn is_almost_surely_prime(n: &BigInt) -> Result<bool> {
    let one = BigInt::from_u64(1);
    for _ in 0..14 {
        let mut x = uniform_random_bigint(n)?;
        if x.cmp(&one) != std::cmp::Ordering::Greater {
            x = BigInt::from_u64(3);
        }
        if !is_probably_prime(n, &x)? {
            return Ok(false);
        }
    }
    Ok(true)
}

// ---- Trial division ----

/// Remove powers of 2 and 3 individually, then walk divisors
/// `5, 7, 11, 13, 17, 19, ...` (alternating `+2`, `+4` to skip multiples of
/// 2 and 3), terminating when the remainder is 1 or the remaining quotient
/// itself is prime.
fn trial_division(n: &BigInt, stats: &mut FactorStats) -> Factorization {
    let mut factors = Vec::new();
    let mut remaining = n.clone();

    for small in [2u64, 3] {
        let divisor = BigInt::from_u64(small);
        let mut exp = 0u32;
        loop {
            stats.trial_divisions += 1;
            let (q, r) = remaining.div_rem(&divisor).expect("small divisor is non-zero");
            if r.is_zero() {
                remaining = q;
                exp += 1;
            } else {
                break;
            }
        }
        if exp > 0 {
            factors.push(PrimeFactor {
                prime: divisor,
                multiplicity: exp,
            });
        }
    }

    let mut d = 5u64;
    let mut gap_is_two = true;
    while remaining != BigInt::from_u64(1) {
        let divisor = BigInt::from_u64(d);
        stats.trial_divisions += 1;
        let (q, r) = remaining.div_rem(&divisor).expect("divisor is non-zero");
        if r.is_zero() {
            let mut exp = 1u32;
            remaining = q;
            loop {
                stats.trial_divisions += 1;
                let (q2, r2) = remaining.div_rem(&divisor).expect("divisor is non-zero");
                if r2.is_zero() {
                    remaining = q2;
                    exp += 1;
                } else {
                    break;
                }
            }
            factors.push(PrimeFactor {
                prime: divisor,
                multiplicity: exp,
            });
        } else if q.cmp(&divisor) == std::cmp::Ordering::Less {
            // floor(remaining/d) < d with a non-zero remainder: remaining
            // itself is prime.
            factors.push(PrimeFactor {
                prime: remaining.clone(),
                multiplicity: 1,
            });
            remaining = BigInt::from_u64(1);
            break;
        }
        d += if gap_is_two { 2 } else { 4 };
        gap_is_two = !gap_is_two;
    }

    Factorization {
        factors: Factorization::normalize(factors),
        stats: stats.clone(),
    }
}

// ---- Pollard rho (Brent's variant) ----

/// Fully factor `n` using Brent's variant of Pollard's rho with constant
/// `c`, returning `None` if the attempt fails to converge (the caller
/// should retry with a different `c`, then fall back to trial division).
fn pollard_rho(n: &BigInt, c: u64, stats: &mut FactorStats) -> Option<Vec<PrimeFactor>> {
    let mut factors = Vec::new();
    let mut n = n.clone();
    let one = BigInt::from_u64(1);

    if n == one {
        return Some(factors);
    }

    let mut x = BigInt::from_u64(5);
    let mut xp = BigInt::from_u64(2);
    let mut k: u64 = 1;
    let mut l: u64 = 1;

    loop {
        if n == one {
            break;
        }
        stats.primality_tests += 1;
        if is_almost_surely_prime(&n).ok()? {
            factors.push(PrimeFactor {
                prime: n.clone(),
                multiplicity: 1,
            });
            break;
        }

        let diff = if x.cmp(&xp) == std::cmp::Ordering::Less {
            xp.sub(&x).ok()?
        } else {
            x.sub(&xp).ok()?
        };
        stats.gcd_computations += 1;
        let g = gcd_bigint(&diff, &n);

        if g == one {
            k -= 1;
            if k == 0 {
                xp = x.clone();
                l *= 2;
                k = l;
            }
            stats.squarings += 1;
            x = x.mul(&x).add(&BigInt::from_u64(c)).rem(&n).ok()?;
            continue;
        }

        if g == n {
            return None;
        }

        stats.primality_tests += 1;
        if is_almost_surely_prime(&g).ok()? {
            factors.push(PrimeFactor {
                prime: g.clone(),
                multiplicity: 1,
            });
        } else {
            return None;
        }

        n = n.div(&g).ok()?;
        x = x.div(&g).unwrap_or_else(|_| BigInt::zero());
        xp = xp.div(&g).unwrap_or_else(|_| BigInt::zero());
    }

    Some(factors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(s: &str) -> BigInt {
        BigInt::from_decimal_str(s).unwrap()
    }

    #[test]
    fn small_prime_cases() {
        for p in [2u64, 3, 5] {
            assert!(is_probably_prime(&BigInt::from_u64(p), &BigInt::from_u64(3)).unwrap());
        }
        for c in [0u64, 1, 4] {
            assert!(!is_probably_prime(&BigInt::from_u64(c), &BigInt::from_u64(3)).unwrap());
        }
    }

    #[test]
    fn is_almost_surely_prime_matches_known_primes() {
        for p in [97u64, 65003, 104729] {
            assert!(is_almost_surely_prime(&BigInt::from_u64(p)).unwrap(), "{p}");
        }
        for c in [91u64, 65004, 104730] {
            assert!(!is_almost_surely_prime(&BigInt::from_u64(c)).unwrap(), "{c}");
        }
    }

    #[test]
    fn trial_division_337500() {
        let n = BigInt::from_u64(337500);
        let mut stats = FactorStats::default();
        let f = trial_division(&n, &mut stats);
        assert_eq!(f.product(), n);
        let expected = vec![(2u64, 2u32), (3, 3), (5, 5)];
        let got: Vec<(u64, u32)> = f
            .factors
            .iter()
            .map(|pf| (pf.prime.to_u64().unwrap(), pf.multiplicity))
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn pollard_rho_25852() {
        let n = BigInt::from_u64(25852);
        let mut stats = FactorStats::default();
        let f = pollard_rho(&n, 1, &mut stats)
            .map(|factors| Factorization {
                factors: Factorization::normalize(factors),
                stats,
            })
            .unwrap();
        assert_eq!(f.product(), n);
        let expected = vec![(2u64, 2u32), (23, 1), (281, 1)];
        let mut got: Vec<(u64, u32)> = f
            .factors
            .iter()
            .map(|pf| (pf.prime.to_u64().unwrap(), pf.multiplicity))
            .collect();
        got.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn factorization_product_matches_n_for_automatic_mode() {
        for n in [2u64, 12, 360, 999983, 1_048_576] {
            let f = factor(&BigInt::from_u64(n), FactorMode::Automatic { table_key: None }).unwrap();
            assert_eq!(f.product().to_u64().unwrap(), n);
            let primes: Vec<u64> = f.distinct_primes().iter().map(|p| p.to_u64().unwrap()).collect();
            let mut sorted = primes.clone();
            sorted.sort();
            assert_eq!(primes, sorted, "primes must be ascending");
            assert_eq!(f.num_distinct_factors(), f.distinct_primes().len());
        }
    }

    #[test]
    fn large_power_minus_one_is_nonzero() {
        // Sanity check that BigInt arithmetic at this scale still behaves;
        // full factorization of values this size is left to the slower
        // integration tests.
        let n = BigInt::pow(2, 1198).sub(&BigInt::from_u64(1)).unwrap();
        assert!(!n.is_zero());
        assert_eq!(big("1").to_u64().unwrap(), 1);
    }
}
