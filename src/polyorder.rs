//! Irreducibility and primitivity testing over `GF(p)`.
//!
//! Two independent tests, both grounded in standard finite-field theory:
//!
//! - **Irreducibility** via Berlekamp's Q−I matrix: row `i` holds `x^(p·i)
//!   mod f` for `i in [0, n)`; `f` is irreducible over `GF(p)` iff `Q − I`
//!   has nullity exactly 1 (the all-ones... more precisely, the constant
//!   polynomials always form a one-dimensional piece of the kernel, and
//!   irreducibility is exactly the statement that nothing else does).
//! - **Primitivity**, given irreducibility, via the order of `x` in
//!   `GF(p)[x]/(f)`'s multiplicative group: `x` is a generator iff its
//!   order is `p^n - 1`, checked by factoring `r = (p^n - 1)/(p - 1)` and
//!   confirming `x^(r/q) != 1` for every distinct prime `q | r`, plus
//!   `x^r == (-1)^n a_0` (the resolvent that pins down the remaining
//!   factor of `p - 1`).

use crate::bigint::BigInt;
use crate::error::Result;
use crate::factor::{factor, FactorMode};
use crate::polymod::PolyMod;
use crate::polynomial::Polynomial;
use tracing::{debug, instrument};

/// The outcome of testing one candidate polynomial for primitivity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrimitivityVerdict {
    /// Has a linear factor or the Q−I matrix has nullity >= 2.
    NotIrreducible,
    /// Irreducible, but the order of `x` is a proper divisor of `p^n - 1`.
    IrreducibleNotPrimitive,
    /// Irreducible and `x` generates the full multiplicative group.
    Primitive,
}

/// Bundles a candidate polynomial with the machinery to test it: the
/// precomputed reduction table (via [`PolyMod`]) and, once computed, the
/// order-related `BigInt`s shared between the irreducibility and
/// primitivity steps.
pub struct PolyOrder {
    f: Polynomial,
}

impl PolyOrder {
    pub fn new(f: Polynomial) -> Self {
        PolyOrder { f }
    }

    pub fn polynomial(&self) -> &Polynomial {
        &self.f
    }

    /// Replace the candidate polynomial in place (used by the enumeration
    /// driver walking `next_trial_poly` without reallocating a new
    /// `PolyOrder` each step).
    pub fn reset_polynomial(&mut self, f: Polynomial) {
        self.f = f;
    }

    /// Build the `Q - I` matrix: row `i`, column `j` is `(x^(p*i) mod f)`'s
    /// coefficient of `x^j`, minus 1 on the diagonal.
    fn build_q_minus_i(&self) -> Vec<Vec<u64>> {
        let p = self.f.modulus();
        let n = self.f.degree();
        let x = PolyMod::x(&self.f);
        let mut rows = Vec::with_capacity(n);
        for i in 0..n {
            let exp = BigInt::from_u64(p).mul(&BigInt::from_u64(i as u64));
            let xpi = x.power(&self.f, &exp);
            let mut row: Vec<u64> = xpi.coeffs().to_vec();
            row[i] = (row[i] + p - 1) % p;
            rows.push(row);
        }
        rows
    }

    /// Nullity of the `Q - I` matrix over `GF(p)`, via Gaussian elimination
    /// with row-swap pivoting and modular-inverse normalization.
    #[instrument(skip(self))]
    pub fn nullity(&self) -> u64 {
        let p = self.f.modulus();
        let mut m = self.build_q_minus_i();
        let n = m.len();
        let mut rank = 0usize;
        for col in 0..n {
            let pivot_row = (rank..n).find(|&r| m[r][col] != 0);
            let Some(pivot_row) = pivot_row else {
                continue;
            };
            m.swap(rank, pivot_row);
            let inv = crate::modmath::inverse_mod(m[rank][col], p).expect("nonzero has inverse");
            for v in m[rank].iter_mut() {
                *v = crate::modmath::mul_mod(*v, inv, p);
            }
            for r in 0..n {
                if r == rank || m[r][col] == 0 {
                    continue;
                }
                let scale = m[r][col];
                for c in 0..n {
                    let sub = crate::modmath::mul_mod(scale, m[rank][c], p);
                    m[r][c] = (m[r][c] + p - sub % p) % p;
                }
            }
            rank += 1;
            if rank == n {
                break;
            }
        }
        let nullity = (n - rank) as u64;
        debug!(nullity, rank, n, "Q-I nullity computed");
        nullity
    }

    /// True iff `f` is irreducible over `GF(p)`: no linear factor and
    /// `nullity(Q - I) == 1`. Checks the cheap linear-factor test first and
    /// short-circuits the matrix computation when it already disqualifies
    /// the candidate.
    pub fn is_irreducible(&self) -> bool {
        if self.f.degree() > 1 && self.f.has_linear_factor() {
            return false;
        }
        self.nullity() == 1
    }

    /// Order of `x` in the multiplicative group of `GF(p)[x]/(f)`, assuming
    /// `f` is irreducible: `p^n - 1` iff `x` is a primitive element.
    /// Computed by factoring `r = (p^n - 1)/(p - 1)` and testing
    /// `x^(r/q) != 1` for each distinct prime `q | r`, together with the
    /// resolvent `x^r == (-1)^n a_0`.
    #[instrument(skip(self))]
    pub fn test_primitivity(&self) -> Result<PrimitivityVerdict> {
        if !self.is_irreducible() {
            return Ok(PrimitivityVerdict::NotIrreducible);
        }
        let p = self.f.modulus();
        let n = self.f.degree();
        let order_of_group = BigInt::pow(p, n as u64).sub(&BigInt::from_u64(1))?;
        let r = order_of_group.div(&BigInt::from_u64(p - 1))?;

        let x = PolyMod::x(&self.f);
        let xr = x.power(&self.f, &r);

        let a0 = self.f.coeff(0);
        let expected = if n % 2 == 0 { a0 } else { (p - a0) % p };
        if !xr.is_constant(expected) {
            return Ok(PrimitivityVerdict::IrreducibleNotPrimitive);
        }

        let factorization = factor(&r, FactorMode::Automatic { table_key: None })?;
        for q in factorization.distinct_primes() {
            let exp = r.div(&q)?;
            let reduced = x.power(&self.f, &exp);
            if reduced.is_constant(1) {
                return Ok(PrimitivityVerdict::IrreducibleNotPrimitive);
            }
        }
        Ok(PrimitivityVerdict::Primitive)
    }

    /// The number of primitive polynomials of degree `n` over `GF(p)`:
    /// `φ(p^n - 1) / n`, via Euler's totient computed from the
    /// factorization of `p^n - 1`.
    pub fn primitive_count(p: u64, n: usize) -> Result<BigInt> {
        let order = BigInt::pow(p, n as u64).sub(&BigInt::from_u64(1))?;
        let factorization = factor(&order, FactorMode::Automatic { table_key: None })?;
        let mut totient = order.clone();
        for q in factorization.distinct_primes() {
            // totient *= (q - 1); totient /= q
            totient = totient.div(&q)?.mul(&q.sub(&BigInt::from_u64(1))?);
        }
        totient.div(&BigInt::from_u64(n as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qi_matrix_nullity_known_irreducible() {
        // x^4 + x^2 + 2x + 3 over GF(5), the worked example.
        let f = Polynomial::new(5, vec![3, 2, 1, 0, 1]).unwrap();
        let order = PolyOrder::new(f);
        assert_eq!(order.nullity(), 1);
        assert!(order.is_irreducible());
    }

    #[test]
    fn reducible_polynomial_has_nullity_at_least_two() {
        // x^2 + 1 over GF(5) factors as (x-2)(x-3): reducible.
        let f = Polynomial::new(5, vec![1, 0, 1]).unwrap();
        let order = PolyOrder::new(f);
        assert!(!order.is_irreducible());
    }

    #[test]
    fn gf2_x2_plus_x_plus_1_is_primitive() {
        let f = Polynomial::new(2, vec![1, 1, 1]).unwrap();
        let order = PolyOrder::new(f);
        assert_eq!(order.test_primitivity().unwrap(), PrimitivityVerdict::Primitive);
    }

    #[test]
    fn linear_factor_short_circuits_to_not_irreducible() {
        let f = Polynomial::new(5, vec![0, 0, 1]).unwrap(); // x^2, root at 0
        let order = PolyOrder::new(f);
        assert_eq!(order.test_primitivity().unwrap(), PrimitivityVerdict::NotIrreducible);
    }

    #[test]
    fn primitive_count_gf2_degree2_is_one() {
        // Only x^2+x+1 is primitive of degree 2 over GF(2): phi(3)/2 = 1.
        let count = PolyOrder::primitive_count(2, 2).unwrap();
        assert_eq!(count.to_u64().unwrap(), 1);
    }
}
