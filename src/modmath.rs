//! Modular arithmetic primitives over machine integers and [`BigInt`].
//!
//! These are the dependency leaves shared by [`crate::factor`],
//! [`crate::polynomial`], and [`crate::polymod`]. The machine-integer path
//! is deliberately overflow-safe by construction rather than by widening to
//! a bigger integer type: `add_mod` never lets an intermediate sum exceed
//! `u64::MAX`, and `mul_mod` builds on it via Russian-peasant doubling
//! instead of a 128-bit product. This is the same "prove it can't overflow"
//! discipline the rest of the codebase applies to its own modular
//! exponentiation path.

use crate::bigint::BigInt;
use crate::error::{PrimitiveError, Result};

/// `((v mod p) + p) mod p` for a signed `v` and `p >= 1`. This is the only
/// surface in the kernel where negative numbers arise.
pub fn mod_p(v: i64, p: i64) -> Result<i64> {
    if p < 1 {
        return Err(PrimitiveError::Range(format!(
            "mod_p requires p >= 1, got {p}"
        )));
    }
    Ok(((v % p) + p) % p)
}

/// Euclidean GCD over machine integers.
pub fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Euclidean GCD over [`BigInt`]s.
pub fn gcd_bigint(a: &BigInt, b: &BigInt) -> BigInt {
    let mut a = a.clone();
    let mut b = b.clone();
    while !b.is_zero() {
        let r = a.rem(&b).expect("divisor checked non-zero by loop guard");
        a = b;
        b = r;
    }
    a
}

/// `a + b mod n`, safe even when `a` and `b` individually approach
/// `u64::MAX`: computes `n - b` once and compares rather than forming
/// `a + b` directly.
pub fn add_mod(a: u64, b: u64, n: u64) -> u64 {
    let b = b % n;
    let a = a % n;
    if a >= n - b {
        a - (n - b)
    } else {
        a + b
    }
}

/// `2a mod n`.
pub fn double_mod(a: u64, n: u64) -> u64 {
    add_mod(a, a, n)
}

/// `a * b mod n` via Russian-peasant doubling: at each of the `⌈log2 b⌉`
/// steps, double the running partial product mod `n` and conditionally fold
/// in `a mod n`, using only [`add_mod`] — no product ever needs more than
/// one machine word.
pub fn mul_mod(a: u64, b: u64, n: u64) -> u64 {
    let mut result = 0u64;
    let mut a = a % n;
    let mut b = b;
    while b > 0 {
        if b & 1 == 1 {
            result = add_mod(result, a, n);
        }
        a = double_mod(a, n);
        b >>= 1;
    }
    result
}

/// `a^k mod n` by left-to-right binary exponentiation using [`mul_mod`].
/// Fails on the domain error `0^0`.
pub fn pow_mod(a: u64, k: u64, n: u64) -> Result<u64> {
    if a == 0 && k == 0 {
        return Err(PrimitiveError::Range("0^0 is undefined".into()));
    }
    let mut result = 1u64 % n;
    let mut base = a % n;
    let mut exp = k;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, n);
        }
        base = mul_mod(base, base, n);
        exp >>= 1;
    }
    Ok(result)
}

/// Modular inverse of `a` mod `p`: brute-force search over `i` in `[1, p)`
/// for `i*a ≡ 1 (mod p)`. A reference implementation — correctness over
/// speed, as specified.
pub fn inverse_mod(a: u64, p: u64) -> Result<u64> {
    if p < 1 {
        return Err(PrimitiveError::Range(format!(
            "inverse_mod requires p >= 1, got {p}"
        )));
    }
    let a = a % p;
    for i in 1..p {
        if mul_mod(i, a, p) == 1 {
            return Ok(i);
        }
    }
    Err(PrimitiveError::Range(format!(
        "{a} has no inverse mod {p}"
    )))
}

/// True when the multiplicative order of `a` modulo `p` equals `p - 1`,
/// i.e. `a` generates the multiplicative group of `GF(p)`. Verified by
/// factoring `p - 1` once and checking `a^((p-1)/q) != 1` for every
/// distinct prime `q | p - 1`.
pub fn is_primitive_root(p: u64, a: u64) -> Result<bool> {
    if p < 2 {
        return Err(PrimitiveError::Range(format!(
            "is_primitive_root requires p >= 2, got {p}"
        )));
    }
    let order = p - 1;
    let factorization = crate::factor::factor(
        &BigInt::from_u64(order),
        crate::factor::FactorMode::Automatic { table_key: None },
    )?;
    for pf in factorization.distinct_primes() {
        let q = pf.to_u64()?;
        let exp = order / q;
        if pow_mod(a, exp, p)? == 1 {
            return Ok(false);
        }
    }
    Ok(true)
}

/// A uniform random integer in `[0, n)`. The concrete distribution is
/// unspecified beyond uniformity — this implementation uses `rand`'s
/// `Uniform` sampler — and determinism across runs is not required.
pub fn uniform_random(n: u64) -> u64 {
    use rand::Rng;
    rand::thread_rng().gen_range(0..n)
}

/// A uniform random [`BigInt`] in `[0, n)` via rejection sampling: draw a
/// value with the same digit count as `n` (each digit uniform in
/// `[0, radix)`) and retry until it lands below `n`. Fails when `n` is zero.
pub fn uniform_random_bigint(n: &BigInt) -> Result<BigInt> {
    use rand::Rng;
    if n.is_zero() {
        return Err(PrimitiveError::Range(
            "uniform_random_bigint requires n > 0".into(),
        ));
    }
    if let Ok(small) = n.to_u64() {
        return Ok(BigInt::from_u64(uniform_random(small)));
    }
    let digits = n.num_digits();
    let b = crate::bigint::radix();
    let mut rng = rand::thread_rng();
    loop {
        let mut candidate = BigInt::zero();
        for _ in 0..digits {
            candidate = candidate.mul_small(b).add_small(rng.gen_range(0..b));
        }
        if candidate.cmp(n) == std::cmp::Ordering::Less {
            return Ok(candidate);
        }
    }
}

/// `base^exp mod modulus` for [`BigInt`] operands, via left-to-right binary
/// exponentiation driven by [`BigInt::bit`] — the big-integer analogue of
/// [`pow_mod`], used by Miller–Rabin over big moduli.
pub fn pow_mod_bigint(base: &BigInt, exp: &BigInt, modulus: &BigInt) -> Result<BigInt> {
    if modulus.is_zero() {
        return Err(PrimitiveError::DivisionByZero);
    }
    let one = BigInt::from_u64(1);
    if modulus == &one {
        return Ok(BigInt::zero());
    }
    let mut result = one.clone();
    let b = base.rem(modulus)?;
    let bits = exp.ceil_lg2();
    for i in (0..bits).rev() {
        result = result.mul(&result).rem(modulus)?;
        if exp.bit(i as usize) == 1 {
            result = result.mul(&b).rem(modulus)?;
        }
    }
    Ok(result)
}
