//! Polynomials over `GF(p)`: a dense coefficient vector indexed by exponent.
//!
//! `coeffs[i]` is the coefficient of `x^i`; degree is the highest index with
//! a non-zero coefficient (trailing zero coefficients are trimmed on every
//! construction and mutation, so degree is always exact). The zero
//! polynomial and other constants are degree 0, matching `isInteger`'s
//! definition. Monic candidates used by enumeration and [`crate::polyorder`]
//! are ordinary values of this type whose leading coefficient happens to be
//! 1 — nothing in the representation special-cases them.

use crate::error::{PrimitiveError, Result};
use std::fmt;

/// A polynomial over `GF(p)`, degree `n = coeffs.len() - 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    p: u64,
    /// Coefficients `c[0..=n]`, each in `[0, p)`, ascending degree;
    /// `coeffs[n]` (the leading coefficient) is always non-zero unless
    /// `n == 0` (the constant, possibly zero).
    coeffs: Vec<u64>,
}

impl Polynomial {
    /// Construct from the prime field modulus and the full coefficient
    /// vector (ascending degree, ending at the leading term). Fails if
    /// `p < 2`, if `coeffs` is empty, or if any coefficient is outside
    /// `[0, p)`. Trailing zero coefficients are trimmed so degree stays
    /// exact (but at least one coefficient — the constant term — is always
    /// kept, even when it too is zero).
    pub fn new(p: u64, coeffs: Vec<u64>) -> Result<Self> {
        if p < 2 {
            return Err(PrimitiveError::Range(format!("p must be >= 2, got {p}")));
        }
        if coeffs.is_empty() {
            return Err(PrimitiveError::Range("coefficient vector is empty".into()));
        }
        for &c in &coeffs {
            if c >= p {
                return Err(PrimitiveError::Range(format!(
                    "coefficient {c} out of range for p={p}"
                )));
            }
        }
        let mut coeffs = coeffs;
        while coeffs.len() > 1 && *coeffs.last().unwrap() == 0 {
            coeffs.pop();
        }
        Ok(Polynomial { p, coeffs })
    }

    /// `x^n` itself: the canonical starting point for trial-polynomial
    /// enumeration.
    pub fn monomial(p: u64, n: usize) -> Result<Self> {
        let mut coeffs = vec![0u64; n + 1];
        coeffs[n] = 1;
        Polynomial::new(p, coeffs)
    }

    pub fn modulus(&self) -> u64 {
        self.p
    }

    /// Degree: the highest exponent with a non-zero coefficient (0 for a
    /// constant, including the zero polynomial).
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficient of `x^i`, 0 for `i > degree()`.
    pub fn coeff(&self, i: usize) -> u64 {
        self.coeffs.get(i).copied().unwrap_or(0)
    }

    /// The full coefficient vector, ascending degree.
    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    /// True iff this is the monomial `x^n` for its own degree `n`: every
    /// coefficient below the leading term is zero.
    pub fn is_monomial(&self) -> bool {
        self.coeffs[..self.degree()].iter().all(|&c| c == 0)
    }

    /// True iff this polynomial has degree 0, i.e. it is just an integer
    /// (possibly 0) in `GF(p)`.
    pub fn is_integer(&self) -> bool {
        self.degree() == 0
    }

    /// Evaluate at `x` mod `p` via Horner's method.
    pub fn evaluate(&self, x: u64) -> u64 {
        let x = x % self.p;
        let n = self.degree();
        let mut result = self.coeffs[n];
        for i in (0..n).rev() {
            result = crate::modmath::mul_mod(result, x, self.p);
            result = crate::modmath::add_mod(result, self.coeffs[i], self.p);
        }
        result
    }

    /// True if some `a` in `[0, p)` is a root, i.e. `(x - a)` divides this
    /// polynomial (`a = 0` covers the case `p | f(0)`, i.e. `x` itself
    /// divides `f`). A primitive polynomial can never have a linear factor,
    /// so this rejects obviously-non-primitive candidates before the more
    /// expensive irreducibility test.
    pub fn has_linear_factor(&self) -> bool {
        (0..self.p).any(|a| self.evaluate(a) == 0)
    }

    /// Addition, coefficient-wise mod p, with degree recomputed afterward
    /// (a high-degree cancellation can lower it). Both operands must share
    /// a modulus.
    pub fn add(&self, other: &Self) -> Result<Self> {
        if self.p != other.p {
            return Err(PrimitiveError::Range(
                "polynomials must share a modulus".into(),
            ));
        }
        let n = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..n)
            .map(|i| crate::modmath::add_mod(self.coeff(i), other.coeff(i), self.p))
            .collect();
        Polynomial::new(self.p, coeffs)
    }

    /// Scalar multiplication mod p, with degree recomputed afterward (`k =
    /// 0` collapses to the zero polynomial).
    pub fn scalar_mul(&self, k: u64) -> Result<Self> {
        let coeffs = self
            .coeffs
            .iter()
            .map(|&c| crate::modmath::mul_mod(c, k, self.p))
            .collect();
        Polynomial::new(self.p, coeffs)
    }

    /// Successor in lexicographic order over the below-leading coefficients
    /// of a monic polynomial, treating them as a little-endian base-`p`
    /// counter (`coeff(0)` is least significant, the leading coefficient
    /// `coeff(degree())` held fixed at 1). Wraps back to `x^n` after the
    /// last candidate. Only meaningful when `self` is monic — the
    /// enumeration driver never calls it on anything else.
    pub fn next_trial_poly(&self) -> Self {
        let n = self.degree();
        let mut coeffs = self.coeffs.clone();
        for c in coeffs[..n].iter_mut() {
            if *c + 1 < self.p {
                *c += 1;
                return Polynomial { p: self.p, coeffs };
            }
            *c = 0;
        }
        Polynomial { p: self.p, coeffs }
    }

    /// The canonical first trial polynomial for enumeration: `x^n`.
    pub fn initial_trial_poly(p: u64, n: usize) -> Result<Self> {
        Polynomial::monomial(p, n)
    }

    /// Parse the external text form `"a_n x ^ n + ... + a_1 x + a_0, p"`
    /// (terms in descending degree, `x^1` written `x`, `x^0` omitted,
    /// coefficient `1` elided except on the constant term). Accepts loose
    /// whitespace and the operators `+`, `^`, `*` (e.g. `"2 * x ^ 2 + 1, 3"`
    /// parses the same as `"2x^2 + 1, 3"`); rejects `-`. A missing `, p`
    /// suffix defaults the modulus to 2. Negative coefficients are rejected
    /// with a range error rather than folded into `[0, p)`.
    pub fn parse(s: &str) -> Result<Self> {
        let (poly_part, p) = match s.rsplit_once(',') {
            Some((poly, p_part)) => {
                let p: u64 = p_part
                    .trim()
                    .parse()
                    .map_err(|_| PrimitiveError::Range(format!("bad modulus: {p_part:?}")))?;
                (poly, p)
            }
            None => (s, 2),
        };

        // Tokenize by splitting on top-level + / - while keeping the sign.
        let mut raw_terms: Vec<(i64, String)> = Vec::new();
        {
            let mut buf = String::new();
            let mut cur_sign = 1i64;
            for c in poly_part.trim().chars() {
                if (c == '+' || c == '-') && !buf.trim().is_empty() {
                    raw_terms.push((cur_sign, std::mem::take(&mut buf)));
                    cur_sign = if c == '-' { -1 } else { 1 };
                } else if (c == '+' || c == '-') && buf.trim().is_empty() {
                    cur_sign = if c == '-' { -1 } else { 1 };
                } else {
                    buf.push(c);
                }
            }
            if !buf.trim().is_empty() {
                raw_terms.push((cur_sign, buf));
            }
        }

        let mut max_degree = 0usize;
        let mut parsed: Vec<(usize, i64)> = Vec::new();
        for (term_sign, raw_term) in raw_terms {
            // `*` is just a multiplication separator and whitespace around
            // `^`/`x`/digits is cosmetic; collapse both away so `"2 * x ^ 2"`
            // and `"2x^2"` parse identically.
            let term: String = raw_term
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '*')
                .collect();
            let term = term.as_str();
            let (degree, coeff_str) = if let Some(rest) = term.strip_prefix("x^") {
                (
                    rest.trim().parse::<usize>().map_err(|_| {
                        PrimitiveError::Range(format!("bad exponent in term {term:?}"))
                    })?,
                    "1",
                )
            } else if let Some(idx) = term.find("x^") {
                let (coeff, rest) = term.split_at(idx);
                let degree = rest[2..]
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| PrimitiveError::Range(format!("bad exponent in {term:?}")))?;
                (degree, coeff.trim())
            } else if term.trim_end().ends_with('x') {
                (1, term.trim_end().trim_end_matches('x').trim())
            } else {
                (0, term)
            };
            let coeff: i64 = if coeff_str.trim().is_empty() {
                1
            } else {
                coeff_str
                    .trim()
                    .parse()
                    .map_err(|_| PrimitiveError::Range(format!("bad coefficient in {term:?}")))?
            };
            let signed = term_sign * coeff;
            if signed < 0 {
                return Err(PrimitiveError::Range(format!(
                    "negative coefficient {signed} in term {term:?}"
                )));
            }
            max_degree = max_degree.max(degree);
            parsed.push((degree, signed));
        }

        let mut coeffs = vec![0u64; max_degree + 1];
        for (degree, value) in parsed {
            coeffs[degree] = value as u64;
        }
        Polynomial::new(p, coeffs)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.degree();
        let mut terms = Vec::new();
        for i in (0..=n).rev() {
            let c = self.coeffs[i];
            if c == 0 && (i != 0 || n != 0) {
                continue;
            }
            let term = match i {
                0 => format!("{c}"),
                1 if c == 1 => "x".to_string(),
                1 => format!("{c} x"),
                _ if c == 1 => format!("x^{i}"),
                _ => format!("{c} x^{i}"),
            };
            terms.push(term);
        }
        if terms.is_empty() {
            terms.push("0".to_string());
        }
        write!(f, "{}, {}", terms.join(" + "), self.p)
    }
}
