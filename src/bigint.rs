//! Arbitrary-precision non-negative integer arithmetic in a process-wide radix.
//!
//! `BigInt` stores digits little-endian in a radix `B` that is a single
//! process-wide setting (see [`set_radix`]). The representation and every
//! operation below follow Knuth's treatment in TAOCP vol. 2 §4.3.1: addition
//! and subtraction ripple carries/borrows digit by digit, multiplication is
//! schoolbook, and division/modulus is Algorithm D (normalize, estimate,
//! multiply-and-subtract, correct by at most two add-backs, denormalize).
//!
//! # Radix
//!
//! The radix is read from a single `AtomicU64` rather than stored per-value:
//! the system has exactly one piece of process-wide mutable state (see the
//! crate's concurrency notes), and this is it. [`set_radix`] must only be
//! called before any long-lived `BigInt` is constructed — mixing radices
//! within one run is undefined, same as the source this module was modeled
//! on treats its own global configuration.

use crate::error::{PrimitiveError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Default radix: 10^9 keeps digit-by-digit products within a `u64`
/// intermediate before the carry is folded in, while still packing nine
/// decimal digits per limb.
const DEFAULT_RADIX: u64 = 1_000_000_000;

static RADIX: AtomicU64 = AtomicU64::new(DEFAULT_RADIX);

/// Install the process-wide radix `b`. Must be called before any `BigInt`
/// that is expected to survive the change is constructed; existing
/// `BigInt`s become invalid (their digits are no longer interpretable)
/// the moment this is called. Intended for use once at start-up, or around
/// dedicated test fixtures that restore the previous radix afterward.
pub fn set_radix(b: u64) -> Result<()> {
    if b < 2 {
        return Err(PrimitiveError::Range(format!(
            "radix must be >= 2, got {b}"
        )));
    }
    RADIX.store(b, AtomicOrdering::SeqCst);
    Ok(())
}

/// The currently installed process-wide radix.
pub fn radix() -> u64 {
    RADIX.load(AtomicOrdering::SeqCst)
}

/// A non-negative arbitrary-precision integer, represented as digits
/// `d0, d1, ..., d(k-1)` in the current [`radix`], least-significant first.
/// The top digit is always non-zero; zero itself is the empty digit vector.
#[derive(Clone, Debug, Default)]
pub struct BigInt {
    digits: Vec<u64>,
}

impl BigInt {
    /// The value zero.
    pub fn zero() -> Self {
        BigInt { digits: Vec::new() }
    }

    /// True if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Construct from a machine unsigned integer.
    pub fn from_u64(mut v: u64) -> Self {
        let b = radix();
        let mut digits = Vec::new();
        while v > 0 {
            digits.push(v % b);
            v /= b;
        }
        BigInt { digits }
    }

    /// Parse a decimal string of ASCII digits `'0'..='9'`. Rejects empty
    /// input, leading/trailing whitespace, and non-digit characters with a
    /// range error.
    pub fn from_decimal_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(PrimitiveError::Range("empty decimal string".into()));
        }
        let mut acc = BigInt::zero();
        for c in s.chars() {
            let d = c
                .to_digit(10)
                .ok_or_else(|| PrimitiveError::Range(format!("not a decimal digit: {c:?}")))?;
            acc = acc.mul_small(10).add_small(d as u64);
        }
        Ok(acc)
    }

    /// Number of digits `k` in the current radix (0 for zero).
    pub fn num_digits(&self) -> usize {
        self.digits.len()
    }

    /// Digit `i` (0 for `i >= num_digits()`).
    pub fn digit(&self, i: usize) -> u64 {
        self.digits.get(i).copied().unwrap_or(0)
    }

    /// Drop non-canonical trailing (most significant) zero digits.
    fn trim(mut digits: Vec<u64>) -> Vec<u64> {
        while digits.last() == Some(&0) {
            digits.pop();
        }
        digits
    }

    // ---- digit-vector primitives, reused by +, -, *, decimal I/O ----

    /// Multiply by an arbitrary non-negative machine value `m`, which need
    /// not be smaller than the radix (decimal parsing multiplies by 10 even
    /// when the radix has been set below 10).
    pub fn mul_small(&self, m: u64) -> Self {
        if m == 0 || self.is_zero() {
            return BigInt::zero();
        }
        let b = radix() as u128;
        let mut carry: u128 = 0;
        let mut out = Vec::with_capacity(self.digits.len() + 2);
        for &d in &self.digits {
            let p = d as u128 * m as u128 + carry;
            out.push((p % b) as u64);
            carry = p / b;
        }
        while carry > 0 {
            out.push((carry % b) as u64);
            carry /= b;
        }
        BigInt {
            digits: Self::trim(out),
        }
    }

    /// Add a small non-negative value, propagating carry beyond the current
    /// length if necessary.
    pub fn add_small(&self, a: u64) -> Self {
        if a == 0 {
            return self.clone();
        }
        let b = radix() as u128;
        let mut out = self.digits.clone();
        let mut carry = a as u128;
        let mut i = 0;
        while carry > 0 {
            let cur = out.get(i).copied().unwrap_or(0) as u128;
            let s = cur + carry;
            if out.len() <= i {
                out.resize(i + 1, 0);
            }
            out[i] = (s % b) as u64;
            carry = s / b;
            i += 1;
        }
        BigInt {
            digits: Self::trim(out),
        }
    }

    /// Divide by 2, returning the quotient and the remainder bit (0 or 1).
    /// Used by [`bit`](Self::bit) and [`ceil_lg2`](Self::ceil_lg2), which
    /// extract bits by repeatedly halving since the radix need not be a
    /// power of two.
    pub fn div_by_2(&self) -> (Self, u64) {
        self.div_by_small(2)
    }

    /// Divide by an arbitrary non-negative machine value `m > 0`, returning
    /// the quotient and remainder, processing digits from most significant
    /// to least.
    fn div_by_small(&self, m: u64) -> (Self, u64) {
        let b = radix() as u128;
        let mut out = vec![0u64; self.digits.len()];
        let mut rem: u128 = 0;
        for i in (0..self.digits.len()).rev() {
            let cur = rem * b + self.digits[i] as u128;
            out[i] = (cur / m as u128) as u64;
            rem = cur % m as u128;
        }
        (
            BigInt {
                digits: Self::trim(out),
            },
            rem as u64,
        )
    }

    /// Addition.
    pub fn add(&self, other: &Self) -> Self {
        let b = radix();
        let n = self.digits.len().max(other.digits.len());
        let mut out = Vec::with_capacity(n + 1);
        let mut carry = 0u64;
        for i in 0..n {
            let s = self.digit(i) + other.digit(i) + carry;
            if s >= b {
                out.push(s - b);
                carry = 1;
            } else {
                out.push(s);
                carry = 0;
            }
        }
        if carry > 0 {
            out.push(carry);
        }
        BigInt {
            digits: Self::trim(out),
        }
    }

    /// Subtraction. Fails with underflow when `self < other`.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        if self.cmp(other) == Ordering::Less {
            return Err(PrimitiveError::Underflow(
                "subtraction result would be negative".into(),
            ));
        }
        let b = radix();
        let n = self.digits.len();
        let mut out = Vec::with_capacity(n);
        let mut borrow = 0i64;
        for i in 0..n {
            let mut d = self.digit(i) as i64 - other.digit(i) as i64 - borrow;
            if d < 0 {
                d += b as i64;
                borrow = 1;
            } else {
                borrow = 0;
            }
            out.push(d as u64);
        }
        Ok(BigInt {
            digits: Self::trim(out),
        })
    }

    /// Schoolbook multiplication, O(k·m) in the number of digits of each
    /// operand. Leading zero digits are trimmed from the result.
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return BigInt::zero();
        }
        let b = radix() as u128;
        let n = self.digits.len();
        let m = other.digits.len();
        let mut out = vec![0u128; n + m];
        for (i, &da) in self.digits.iter().enumerate() {
            if da == 0 {
                continue;
            }
            let mut carry: u128 = 0;
            for (j, &db) in other.digits.iter().enumerate() {
                let idx = i + j;
                let p = out[idx] + da as u128 * db as u128 + carry;
                out[idx] = p % b;
                carry = p / b;
            }
            let mut idx = i + m;
            while carry > 0 {
                let p = out[idx] + carry;
                out[idx] = p % b;
                carry = p / b;
                idx += 1;
            }
        }
        let digits: Vec<u64> = out.into_iter().map(|d| d as u64).collect();
        BigInt {
            digits: Self::trim(digits),
        }
    }

    /// Division and modulus by Knuth's Algorithm D (TAOCP vol. 2 §4.3.1).
    /// Fails with a division-by-zero error when `other` is zero.
    pub fn div_rem(&self, other: &Self) -> Result<(Self, Self)> {
        if other.is_zero() {
            return Err(PrimitiveError::DivisionByZero);
        }
        if self.cmp(other) == Ordering::Less {
            return Ok((BigInt::zero(), self.clone()));
        }
        let n = other.digits.len();
        if n == 1 {
            let (q, r) = self.div_by_small(other.digits[0]);
            return Ok((q, BigInt::from_u64(r)));
        }
        let (q, r) = knuth_divide(&self.digits, &other.digits, radix());
        Ok((
            BigInt { digits: Self::trim(q) },
            BigInt { digits: Self::trim(r) },
        ))
    }

    /// `self / other`.
    pub fn div(&self, other: &Self) -> Result<Self> {
        Ok(self.div_rem(other)?.0)
    }

    /// `self % other`.
    pub fn rem(&self, other: &Self) -> Result<Self> {
        Ok(self.div_rem(other)?.1)
    }

    /// Cast to a machine word. Fails with overflow if the value exceeds
    /// `u64::MAX`.
    pub fn to_u64(&self) -> Result<u64> {
        let b = radix() as u128;
        let mut acc: u128 = 0;
        for &d in self.digits.iter().rev() {
            acc = acc * b + d as u128;
            if acc > u64::MAX as u128 {
                return Err(PrimitiveError::Overflow(
                    "BigInt exceeds u64::MAX".into(),
                ));
            }
        }
        Ok(acc as u64)
    }

    /// Bit `i` of the represented integer (0 or 1), extracted by repeatedly
    /// halving since the radix is not necessarily a power of two.
    pub fn bit(&self, i: usize) -> u64 {
        let mut cur = self.clone();
        for _ in 0..i {
            cur = cur.div_by_2().0;
        }
        cur.div_by_2().1
    }

    /// `⌈log2 N⌉`: the number of bits needed to represent `N` (0 for zero).
    /// Used to drive binary exponentiation loops from the top bit down.
    pub fn ceil_lg2(&self) -> u64 {
        if self.is_zero() {
            return 0;
        }
        let mut cur = self.clone();
        let mut count = 0u64;
        while !cur.is_zero() {
            cur = cur.div_by_2().0;
            count += 1;
        }
        count
    }

    /// Prefix increment: mutate in place.
    pub fn increment(&mut self) {
        *self = self.add_small(1);
    }

    /// Postfix increment: return the value before incrementing.
    pub fn post_increment(&mut self) -> Self {
        let old = self.clone();
        self.increment();
        old
    }

    /// Prefix decrement: mutate in place. Fails with underflow on zero.
    pub fn decrement(&mut self) -> Result<()> {
        if self.is_zero() {
            return Err(PrimitiveError::Underflow("decrement of zero".into()));
        }
        *self = self.sub(&BigInt::from_u64(1))?;
        Ok(())
    }

    /// Postfix decrement: return the value before decrementing.
    pub fn post_decrement(&mut self) -> Result<Self> {
        let old = self.clone();
        self.decrement()?;
        Ok(old)
    }

    /// Integer power `base^exp` for machine `base` and `exp`.
    pub fn pow(base: u64, exp: u64) -> Self {
        let mut result = BigInt::from_u64(1);
        let mut b = BigInt::from_u64(base);
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

    /// Decimal, shortest, no leading zeros; zero renders as `"0"`.
    pub fn to_decimal_string(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut digits = Vec::new();
        let mut cur = self.clone();
        while !cur.is_zero() {
            let (q, r) = cur.div_by_small(10);
            digits.push((b'0' + r as u8) as char);
            cur = q;
        }
        digits.iter().rev().collect()
    }
}

impl PartialEq for BigInt {
    fn eq(&self, other: &Self) -> bool {
        self.digits == other.digits
    }
}
impl Eq for BigInt {}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.digits.len().cmp(&other.digits.len()) {
            Ordering::Equal => {
                for i in (0..self.digits.len()).rev() {
                    match self.digits[i].cmp(&other.digits[i]) {
                        Ordering::Equal => continue,
                        ord => return ord,
                    }
                }
                Ordering::Equal
            }
            ord => ord,
        }
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}

impl FromStr for BigInt {
    type Err = PrimitiveError;
    fn from_str(s: &str) -> Result<Self> {
        BigInt::from_decimal_str(s)
    }
}

impl From<u64> for BigInt {
    fn from(v: u64) -> Self {
        BigInt::from_u64(v)
    }
}

/// Knuth's Algorithm D on little-endian digit vectors `u`, `v` (`v.len() >=
/// 2`), returning `(quotient, remainder)` digit vectors, untrimmed.
fn knuth_divide(u: &[u64], v: &[u64], b: u64) -> (Vec<u64>, Vec<u64>) {
    let n = v.len();
    let m = u.len() - n;
    let bb = b as u128;

    // D1: normalize so the divisor's top digit is >= b/2.
    let d = b / (v[n - 1] + 1);
    let d = d.max(1);
    let un_full = mul_digits(u, d, b);
    let vn = {
        let mut t = mul_digits(v, d, b);
        t.resize(n, 0);
        t
    };
    // un must have exactly m+n+1 digits (the extra leading digit from
    // normalization, zero-filled if the multiply didn't produce one).
    let mut un = un_full;
    un.resize(m + n + 1, 0);

    let mut q = vec![0u64; m + 1];

    // D2-D7: main loop, one quotient digit per iteration from the top down.
    for j in (0..=m).rev() {
        let top = un[j + n] as u128 * bb + un[j + n - 1] as u128;
        let mut qhat = top / vn[n - 1] as u128;
        let mut rhat = top % vn[n - 1] as u128;

        while qhat >= bb
            || (n >= 2 && qhat * vn[n - 2] as u128 > rhat * bb + un[j + n - 2] as u128)
        {
            qhat -= 1;
            rhat += vn[n - 1] as u128;
            if rhat >= bb {
                break;
            }
        }

        // D4: multiply and subtract.
        let mut borrow: i128 = 0;
        let mut carry: u128 = 0;
        for i in 0..n {
            let p = qhat * vn[i] as u128 + carry;
            carry = p / bb;
            let sub = un[j + i] as i128 - (p % bb) as i128 - borrow;
            if sub < 0 {
                un[j + i] = (sub + b as i128) as u64;
                borrow = 1;
            } else {
                un[j + i] = sub as u64;
                borrow = 0;
            }
        }
        let sub = un[j + n] as i128 - carry as i128 - borrow;
        let negative = sub < 0;
        un[j + n] = if negative {
            (sub + b as i128) as u64
        } else {
            sub as u64
        };

        if negative {
            // D6: add back once; qhat was one too large. The carry out of
            // this n-digit addition exactly cancels the borrow we folded
            // into un[j+n] above, so the top digit collapses back to 0 mod b.
            qhat -= 1;
            let mut carry = 0u64;
            for i in 0..n {
                let s = un[j + i] + vn[i] + carry;
                if s >= b {
                    un[j + i] = s - b;
                    carry = 1;
                } else {
                    un[j + i] = s;
                    carry = 0;
                }
            }
            un[j + n] = (un[j + n] + carry) % b;
        }

        q[j] = qhat as u64;
    }

    // D8: denormalize the remainder by dividing the (still-normalized)
    // remainder digits by the normalization factor d.
    let normalized_rem = BigInt {
        digits: BigInt::trim(un[0..n].to_vec()),
    };
    let rem = if d == 1 {
        normalized_rem.digits
    } else {
        normalized_rem.div_by_small(d).0.digits
    };

    (q, rem)
}

/// Multiply a little-endian digit vector by a small machine multiplier,
/// returning an untrimmed digit vector.
fn mul_digits(a: &[u64], m: u64, b: u64) -> Vec<u64> {
    if m == 0 {
        return vec![0; a.len()];
    }
    let bb = b as u128;
    let mut out = Vec::with_capacity(a.len() + 1);
    let mut carry: u128 = 0;
    for &d in a {
        let p = d as u128 * m as u128 + carry;
        out.push((p % bb) as u64);
        carry = p / bb;
    }
    while carry > 0 {
        out.push((carry % bb) as u64);
        carry /= bb;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> BigInt {
        BigInt::from_decimal_str(s).unwrap()
    }

    #[test]
    fn zero_is_empty() {
        assert!(BigInt::zero().is_zero());
        assert_eq!(BigInt::zero().to_decimal_string(), "0");
        assert_eq!(n("0").num_digits(), 0);
    }

    #[test]
    fn round_trip_decimal() {
        for s in ["0", "7", "1000000000", "123456789012345678901234567890"] {
            assert_eq!(n(s).to_decimal_string(), s);
        }
    }

    #[test]
    fn addition_matches_u64() {
        let a = BigInt::from_u64(123_456_789);
        let b = BigInt::from_u64(987_654_321);
        assert_eq!(a.add(&b).to_u64().unwrap(), 123_456_789 + 987_654_321);
    }

    #[test]
    fn subtraction_underflow() {
        let a = BigInt::from_u64(3);
        let b = BigInt::from_u64(5);
        assert!(a.sub(&b).is_err());
    }

    #[test]
    fn add_then_sub_round_trips() {
        let a = n("123456789012345678901234567890");
        let b = n("98765432109876543210");
        let sum = a.add(&b);
        assert_eq!(sum.sub(&b).unwrap(), a);
    }

    #[test]
    fn multiplication_matches_u64() {
        let a = BigInt::from_u64(999_999);
        let b = BigInt::from_u64(1_000_003);
        assert_eq!(a.mul(&b).to_u64().unwrap(), 999_999u64 * 1_000_003u64);
    }

    #[test]
    fn division_by_single_digit() {
        let a = n("1000000007");
        let b = BigInt::from_u64(7);
        let (q, r) = a.div_rem(&b).unwrap();
        assert_eq!(q.mul(&b).add(&r), a);
        assert!(r.cmp(&b) == Ordering::Less);
    }

    #[test]
    fn division_multi_digit_matches_schoolbook_check() {
        let a = n("123456789123456789123456789");
        let b = n("987654321987");
        let (q, r) = a.div_rem(&b).unwrap();
        assert_eq!(q.mul(&b).add(&r), a);
        assert!(r.cmp(&b) == Ordering::Less);
    }

    #[test]
    fn division_by_zero_fails() {
        let a = BigInt::from_u64(10);
        assert!(a.div_rem(&BigInt::zero()).is_err());
    }

    #[test]
    fn bit_extraction_matches_shifts() {
        let a = BigInt::from_u64(0b1011010);
        for i in 0..8 {
            let expected = (0b1011010u64 >> i) & 1;
            assert_eq!(a.bit(i as usize), expected, "bit {i}");
        }
    }

    #[test]
    fn ceil_lg2_matches_bit_length() {
        assert_eq!(BigInt::from_u64(0).ceil_lg2(), 0);
        assert_eq!(BigInt::from_u64(1).ceil_lg2(), 1);
        assert_eq!(BigInt::from_u64(7).ceil_lg2(), 3);
        assert_eq!(BigInt::from_u64(8).ceil_lg2(), 4);
        assert_eq!(BigInt::from_u64(1023).ceil_lg2(), 10);
        assert_eq!(BigInt::from_u64(1024).ceil_lg2(), 11);
    }

    #[test]
    fn decrement_of_zero_underflows() {
        let mut z = BigInt::zero();
        assert!(z.decrement().is_err());
    }

    #[test]
    fn increment_decrement_round_trip() {
        let mut a = BigInt::from_u64(41);
        a.increment();
        assert_eq!(a.to_u64().unwrap(), 42);
        a.decrement().unwrap();
        assert_eq!(a.to_u64().unwrap(), 41);
    }

    #[test]
    fn pow_matches_u64_pow() {
        assert_eq!(BigInt::pow(2, 10).to_u64().unwrap(), 1024);
        assert_eq!(BigInt::pow(3, 5).to_u64().unwrap(), 243);
        assert_eq!(BigInt::pow(7, 0).to_u64().unwrap(), 1);
    }

    #[test]
    fn to_u64_overflow() {
        let huge = n("99999999999999999999999999999999");
        assert!(huge.to_u64().is_err());
    }

    #[test]
    fn radix_independence_of_decimal_value() {
        let original = radix();
        let value = "123456789012345678901234567890";
        // Snapshot the decimal rendering before changing the radix: `a`
        // itself becomes invalid the instant the radix changes (digits are
        // only meaningful relative to the radix they were built under), so
        // comparing `a.to_decimal_string()` after `set_radix` would
        // reinterpret its digits in the new radix instead of checking that
        // the same decimal value parses the same way under both radixes.
        let a_str = n(value).to_decimal_string();
        set_radix(7).unwrap();
        let b = BigInt::from_decimal_str(value).unwrap();
        assert_eq!(a_str, b.to_decimal_string());
        set_radix(original).unwrap();
    }

    #[test]
    fn invalid_decimal_string_is_range_error() {
        assert!(BigInt::from_decimal_str("12a3").is_err());
        assert!(BigInt::from_decimal_str("").is_err());
    }
}
