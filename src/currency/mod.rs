//! Pre-decimal currency arithmetic: 1 pound = 20 shillings = 240 pence.

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

pub const PENCE_PER_SHILLING: i64 = 12;
pub const PENCE_PER_POUND: i64 = 240;

/// A pence total decomposed into pounds, shillings, and pence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lsd {
    pub l: i64,
    pub s: i64,
    pub d: i64,
}

/// Converts pounds, shillings, pence to a total pence count. Fails when any
/// component is negative.
pub fn to_pence(l: i64, s: i64, d: i64) -> Result<i64, DomainError> {
    if l < 0 || s < 0 || d < 0 {
        return Err(DomainError::NegativeComponent(l, s, d));
    }
    Ok(l * PENCE_PER_POUND + s * PENCE_PER_SHILLING + d)
}

/// Converts a non-negative pence total to pounds, shillings, pence. Exact
/// inverse of [`to_pence`].
pub fn from_pence(total: i64) -> Result<Lsd, DomainError> {
    if total < 0 {
        return Err(DomainError::NegativePence(total));
    }
    let l = total / PENCE_PER_POUND;
    let remainder = total % PENCE_PER_POUND;
    Ok(Lsd {
        l,
        s: remainder / PENCE_PER_SHILLING,
        d: remainder % PENCE_PER_SHILLING,
    })
}
