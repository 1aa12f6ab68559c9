//! Error taxonomy for the primitive-polynomial kernel.
//!
//! Collapses the error surface to the small set of kinds described by the
//! propagation policy: range/domain errors, arithmetic under/overflow,
//! factorization corruption, and I/O failure reading a factor table. All of
//! these propagate to the caller unchanged; the only error the kernel ever
//! recovers from internally is a Pollard rho retry exhaustion, which is not
//! represented here because it never reaches a caller.

use std::fmt;

/// The library's error type. Mirrors the hand-written `Display`/`Error`
/// pattern used elsewhere in this codebase rather than pulling in a derive
/// macro for a handful of variants.
#[derive(Debug, Clone)]
pub enum PrimitiveError {
    /// Malformed numeric or polynomial input, out-of-bounds index, negative
    /// coefficient, or any other value outside its documented domain.
    Range(String),
    /// Subtracting a larger value from a smaller one, or decrementing zero.
    Underflow(String),
    /// Casting a value to a narrower machine type lost information.
    Overflow(String),
    /// Division or modulus by zero.
    DivisionByZero,
    /// A factor table was found but failed verification, or no table exists
    /// for the requested prime.
    FactorizationCorrupt(String),
    /// Reading a factor table file failed.
    Io(String),
}

impl fmt::Display for PrimitiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveError::Range(msg) => write!(f, "range error: {msg}"),
            PrimitiveError::Underflow(msg) => write!(f, "arithmetic underflow: {msg}"),
            PrimitiveError::Overflow(msg) => write!(f, "arithmetic overflow: {msg}"),
            PrimitiveError::DivisionByZero => write!(f, "division by zero"),
            PrimitiveError::FactorizationCorrupt(msg) => {
                write!(f, "factorization error: {msg}")
            }
            PrimitiveError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for PrimitiveError {}

impl From<std::io::Error> for PrimitiveError {
    fn from(e: std::io::Error) -> Self {
        PrimitiveError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PrimitiveError>;
