//! Residue classes modulo a fixed polynomial `f(x)` over `GF(p)`.
//!
//! `PolyMod` is the ring `GF(p)[x] / (f(x))` element used throughout the
//! primitivity engine: the Q−I irreducibility test builds rows of `x^(p·i)
//! mod f`, and the order-of-x test repeatedly computes `x^k mod f` for large
//! `BigInt` exponents `k`. Reduction is precomputed once per modulus: the
//! residues `x^n mod f, x^(n+1) mod f, ..., x^(2n-2) mod f` are table-driven
//! rather than recomputed on every multiply.

use crate::bigint::BigInt;
use crate::error::{PrimitiveError, Result};
use crate::polynomial::Polynomial;

/// An element of `GF(p)[x] / (f(x))`, represented by its `n` coefficients
/// (ascending degree) reduced mod `f`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolyMod {
    p: u64,
    n: usize,
    /// `coeffs[i]` is the coefficient of `x^i`, `i in [0, n)`.
    coeffs: Vec<u64>,
    /// `reduction[j]` is `x^(n+j) mod f` for `j in [0, n-1)`, used to fold
    /// convolution terms of degree `>= n` back into the residue.
    reduction: Vec<Vec<u64>>,
}

impl PolyMod {
    /// Build the element `g(x) mod f(x)` by ordinary polynomial long
    /// division, and precompute the reduction table for `f`.
    pub fn new(g: &Polynomial, f: &Polynomial) -> Result<Self> {
        if g.modulus() != f.modulus() {
            return Err(PrimitiveError::Range(
                "g and f must share the same modulus".into(),
            ));
        }
        let p = f.modulus();
        let n = f.degree();
        let reduction = build_reduction_table(f);

        let mut work: Vec<u64> = (0..=g.degree()).map(|i| g.coeff(i)).collect();
        for i in (n..work.len()).rev() {
            let c = work[i];
            if c == 0 {
                continue;
            }
            work[i] = 0;
            let j = i - n;
            for (k, &rc) in reduction[j].iter().enumerate() {
                let idx = j + k;
                work[idx] = crate::modmath::add_mod(
                    work[idx],
                    crate::modmath::mul_mod(c, rc, p),
                    p,
                );
            }
        }
        work.truncate(n);
        work.resize(n, 0);

        Ok(PolyMod {
            p,
            n,
            coeffs: work,
            reduction,
        })
    }

    /// The identity element `1`.
    pub fn one(f: &Polynomial) -> Self {
        let mut coeffs = vec![0u64; f.degree()];
        if !coeffs.is_empty() {
            coeffs[0] = 1;
        }
        PolyMod {
            p: f.modulus(),
            n: f.degree(),
            coeffs,
            reduction: build_reduction_table(f),
        }
    }

    /// The element `x mod f`.
    pub fn x(f: &Polynomial) -> Self {
        let n = f.degree();
        let mut coeffs = vec![0u64; n];
        if n > 1 {
            coeffs[1] = 1;
            PolyMod {
                p: f.modulus(),
                n,
                coeffs,
                reduction: build_reduction_table(f),
            }
        } else {
            // n == 1: x mod f is exactly the reduction of x^1, i.e. row 0.
            let reduction = build_reduction_table(f);
            PolyMod {
                p: f.modulus(),
                n,
                coeffs: reduction[0].clone(),
                reduction,
            }
        }
    }

    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    pub fn modulus(&self) -> u64 {
        self.p
    }

    /// Multiply by `x` and reduce: shift every coefficient up one degree,
    /// folding the degree-`n` term through the reduction table.
    pub fn times_x(&self) -> Self {
        let mut out = vec![0u64; self.n];
        if self.n == 0 {
            return self.clone();
        }
        let top = self.coeffs[self.n - 1];
        for i in (1..self.n).rev() {
            out[i] = self.coeffs[i - 1];
        }
        if top != 0 {
            for (k, &rc) in self.reduction[0].iter().enumerate() {
                out[k] = crate::modmath::add_mod(out[k], crate::modmath::mul_mod(top, rc, self.p), self.p);
            }
        }
        PolyMod {
            p: self.p,
            n: self.n,
            coeffs: out,
            reduction: self.reduction.clone(),
        }
    }

    /// `self * self mod f`.
    pub fn square(&self) -> Self {
        self.multiply(self)
    }

    /// `self * other mod f` via schoolbook convolution of the two
    /// length-`n` coefficient vectors, folding terms of degree `>= n`
    /// through the precomputed reduction table.
    pub fn multiply(&self, other: &Self) -> Self {
        let n = self.n;
        let mut conv = vec![0u64; 2 * n.max(1) - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in other.coeffs.iter().enumerate() {
                if b == 0 {
                    continue;
                }
                conv[i + j] = crate::modmath::add_mod(
                    conv[i + j],
                    crate::modmath::mul_mod(a, b, self.p),
                    self.p,
                );
            }
        }
        let mut out = vec![0u64; n];
        out[..n.min(conv.len())].copy_from_slice(&conv[..n.min(conv.len())]);
        for i in n..conv.len() {
            let c = conv[i];
            if c == 0 {
                continue;
            }
            let j = i - n;
            for (k, &rc) in self.reduction[j].iter().enumerate() {
                let idx = j + k;
                out[idx] = crate::modmath::add_mod(
                    out[idx],
                    crate::modmath::mul_mod(c, rc, self.p),
                    self.p,
                );
            }
        }
        PolyMod {
            p: self.p,
            n: self.n,
            coeffs: out,
            reduction: self.reduction.clone(),
        }
    }

    /// `self^exp mod f` via left-to-right binary exponentiation, driven by
    /// [`BigInt::bit`] since exponents here are `(p^n - 1)/(p - 1)`-sized.
    pub fn power(&self, f: &Polynomial, exp: &BigInt) -> Self {
        let bits = exp.ceil_lg2();
        let mut result = PolyMod::one(f);
        for i in (0..bits).rev() {
            result = result.square();
            if exp.bit(i as usize) == 1 {
                result = result.multiply(self);
            }
        }
        result
    }

    /// True when this residue equals the constant `c` (all higher
    /// coefficients zero).
    pub fn is_constant(&self, c: u64) -> bool {
        self.coeffs.first().copied().unwrap_or(0) == c % self.p
            && self.coeffs.iter().skip(1).all(|&x| x == 0)
    }
}

/// For each `j` in `[0, n-1)`, compute `x^(n+j) mod f` as a length-`n`
/// coefficient vector, by repeated reduction: `x^n mod f = -(c[0], ...,
/// c[n-1])` read off `f` itself (since `f(x) = x^n + sum c_i x^i = 0`
/// implies `x^n = -sum c_i x^i`), and each subsequent row is `x` times the
/// previous, reduced the same way.
fn build_reduction_table(f: &Polynomial) -> Vec<Vec<u64>> {
    let p = f.modulus();
    let n = f.degree();
    if n == 0 {
        return Vec::new();
    }
    let mut rows = Vec::with_capacity(n);
    // row 0: x^n mod f = sum_{i<n} (p - c_i) mod p * x^i
    let mut row: Vec<u64> = (0..n).map(|i| (p - f.coeff(i)) % p).collect();
    rows.push(row.clone());
    for _ in 1..n.max(1) {
        let top = row[n - 1];
        let mut next = vec![0u64; n];
        for i in (1..n).rev() {
            next[i] = row[i - 1];
        }
        if top != 0 {
            for (k, &rc) in rows[0].iter().enumerate() {
                next[k] = crate::modmath::add_mod(next[k], crate::modmath::mul_mod(top, rc, p), p);
            }
        }
        rows.push(next.clone());
        row = next;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_table_row_zero_matches_negated_f() {
        let f = Polynomial::new(5, vec![3, 2, 1, 0, 1]).unwrap(); // x^4+x^2+2x+3
        let table = build_reduction_table(&f);
        assert_eq!(table[0], vec![2, 3, 4, 0]); // -(3,2,1,0) mod 5
    }

    #[test]
    fn times_x_matches_multiply_by_x() {
        let f = Polynomial::new(5, vec![3, 2, 1, 0, 1]).unwrap();
        let x = PolyMod::x(&f);
        let one = PolyMod::one(&f);
        assert_eq!(one.times_x(), x);
    }

    #[test]
    fn square_of_one_is_one() {
        let f = Polynomial::new(5, vec![3, 2, 1, 0, 1]).unwrap();
        let one = PolyMod::one(&f);
        assert_eq!(one.square(), one);
    }

    #[test]
    fn power_zero_is_one() {
        let f = Polynomial::new(5, vec![3, 2, 1, 0, 1]).unwrap();
        let x = PolyMod::x(&f);
        let result = x.power(&f, &BigInt::zero());
        assert!(result.is_constant(1));
    }

    #[test]
    fn power_matches_repeated_multiply() {
        let f = Polynomial::new(3, vec![1, 0, 1]).unwrap(); // x^2 + 1
        let x = PolyMod::x(&f);
        let by_hand = x.multiply(&x).multiply(&x).multiply(&x); // x^4
        let by_power = x.power(&f, &BigInt::from_u64(4));
        assert_eq!(by_hand, by_power);
    }
}
