//! # primpoly — Primitive Polynomials over GF(p)
//!
//! A finite-field number-theory kernel for deciding and enumerating
//! primitive polynomials over `GF(p)` for prime `p`.
//!
//! ## Module Organization
//!
//! **Arithmetic layer**:
//! - [`error`] — the shared error taxonomy (`PrimitiveError`)
//! - [`bigint`] — arbitrary-precision non-negative integers in a
//!   process-wide radix
//! - [`modmath`] — modular arithmetic primitives over machine integers and
//!   `BigInt`
//!
//! **Factorization layer**:
//! - [`factor`] — primality testing (Miller–Rabin) and integer
//!   factorization (Pollard rho, trial division)
//! - [`factor_table`] — packaged Cunningham-style factor table lookup
//!
//! **Polynomial layer**:
//! - [`polynomial`] — polynomials over `GF(p)`: parsing, formatting,
//!   evaluation, enumeration
//! - [`polymod`] — residue classes modulo a fixed polynomial
//! - [`polyorder`] — irreducibility (Berlekamp Q−I) and primitivity
//!   (order-of-x) testing
//!
//! ## Design Philosophy
//!
//! Every numeric type here is non-negative and arbitrary-precision by
//! construction; signed arithmetic and general polynomial factorization
//! over the integers are explicitly out of scope. The pipeline a caller
//! drives is: **parse/construct a candidate → reject on a linear factor →
//! test irreducibility (Q−I nullity) → test primitivity (order of x) →
//! report**.

pub mod bigint;
pub mod error;
pub mod factor;
pub mod factor_table;
pub mod modmath;
pub mod polymod;
pub mod polynomial;
pub mod polyorder;

pub use error::{PrimitiveError, Result};
