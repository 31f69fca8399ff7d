use std::ptr;

use crate::error::{InputError, KwdError};
use crate::problem::{Support, check_len, check_weights};
use crate::types::*;

/// Relative slack allowed between total masses when normalization is off.
const MASS_TOLERANCE: f64 = 1e-9;

/// Non-negative mass over the points of a borrowed support.
#[derive(Clone)]
pub struct Distribution<'s> {
    support: &'s Support,
    /// One weight per distinct point.
    weights: Vec<Mass>,
    mass: Mass,
}

impl<'s> Distribution<'s> {
    /// One weight per input coordinate of `support`; weights of merged coordinates are summed.
    pub fn new(support: &'s Support, weights: &[Mass]) -> Result<Self, InputError> {
        Self::named("weights", support, weights)
    }

    /// Like `new`, reporting problems against the given field name.
    pub fn named(
        field: &'static str,
        support: &'s Support,
        weights: &[Mass],
    ) -> Result<Self, InputError> {
        check_len(field, support.input_len(), weights.len())?;
        check_weights(field, weights)?;
        Self::from_point_weights(field, support, support.aggregate(weights.iter().copied()))
    }

    /// Weights already indexed by distinct point.
    pub(crate) fn from_point_weights(
        field: &'static str,
        support: &'s Support,
        weights: Vec<Mass>,
    ) -> Result<Self, InputError> {
        if weights.len() != support.len() {
            return Err(InputError::SupportMismatch {
                points: support.len(),
                len: weights.len(),
            });
        }
        let mass: Mass = weights.iter().sum();
        if mass <= 0.0 {
            return Err(InputError::ZeroMass { field });
        }
        Ok(Distribution {
            support,
            weights,
            mass,
        })
    }

    #[inline(always)]
    pub fn support(&self) -> &'s Support {
        self.support
    }

    #[inline(always)]
    pub fn weights(&self) -> &[Mass] {
        &self.weights
    }

    #[inline(always)]
    pub fn mass(&self) -> Mass {
        self.mass
    }

    /// Net supply of every point when moving `self` onto `other`.
    ///
    /// With `normalize`, both sides are scaled to unit mass first; without it
    /// the masses must already agree.
    pub fn balance(&self, other: &Distribution<'_>, normalize: bool) -> Result<Vec<Mass>, KwdError> {
        if !ptr::eq(self.support, other.support) {
            return Err(InputError::ForeignSupport.into());
        }

        let (scale_a, scale_b) = if normalize {
            (1.0 / self.mass, 1.0 / other.mass)
        } else {
            let slack = MASS_TOLERANCE * self.mass.max(other.mass);
            if (self.mass - other.mass).abs() > slack {
                return Err(KwdError::Infeasible {
                    supply: self.mass,
                    demand: other.mass,
                });
            }
            (1.0, 1.0)
        };

        Ok(self
            .weights
            .iter()
            .zip(&other.weights)
            .map(|(a, b)| a * scale_a - b * scale_b)
            .collect())
    }
}
