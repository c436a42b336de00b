//! Amount parsing rules.
//!
//! Transfer amounts are lenient: anything that does not parse as a
//! non-negative decimal integer counts as zero, since a single odd
//! attribute must not fail the whole handler. Order prices and
//! quantities are strict: a malformed value would silently corrupt the
//! derived notional, so parsing failure is a hard error.

use crate::error::ProjectorError;
use num_bigint::{BigInt, Sign};
use num_traits::Zero;
use tracing::warn;

/// Lenient parse for transfer amounts. Malformed or negative input
/// degrades to zero with a warning.
pub fn parse_amount(raw: &str) -> BigInt {
    match raw.trim().parse::<BigInt>() {
        Ok(value) if value.sign() != Sign::Minus => value,
        Ok(_) => {
            warn!(amount = raw, "negative transfer amount, treating as zero");
            BigInt::zero()
        }
        Err(_) => {
            warn!(amount = raw, "unparseable transfer amount, treating as zero");
            BigInt::zero()
        }
    }
}

/// Strict parse for order prices and quantities.
pub fn parse_exact(field: &'static str, raw: &str) -> Result<BigInt, ProjectorError> {
    raw.trim()
        .parse::<BigInt>()
        .map_err(|_| ProjectorError::MalformedAmount {
            field,
            value: raw.to_string(),
        })
}
