mod distribution;
mod index;
mod support;

pub use distribution::Distribution;
pub use index::SupportIndex;
pub(crate) use index::{ChebyshevEdge, ChebyshevIndex};
pub use support::Support;

use crate::error::InputError;

pub(crate) fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), InputError> {
    if expected != actual {
        return Err(InputError::LengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Every weight must be finite and non-negative.
pub(crate) fn check_weights(field: &'static str, weights: &[f64]) -> Result<(), InputError> {
    for (index, &value) in weights.iter().enumerate() {
        if !value.is_finite() {
            return Err(InputError::NonFiniteWeight { field, index });
        }
        if value < 0.0 {
            return Err(InputError::NegativeWeight {
                field,
                index,
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
