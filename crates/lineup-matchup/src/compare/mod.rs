// Comparator: lineup tensor vs opponent tensor -> per (date, category)
// win probabilities (predicted path) or binary wins (actual path).

pub mod actual;
pub mod distribution;
pub mod expected;

pub use actual::{actual_efficiency_categories_won, actual_sum_categories_won};
pub use distribution::{Cdf, StandardNormal};
pub use expected::{expected_efficiency_categories_won, expected_sum_categories_won};

use crate::error::MatchupError;
use serde::Deserialize;

/// What a predicted comparison returns when neither side carries any
/// uncertainty (total variance exactly zero).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// The outcome is known: 1.0 if the lineup's mean is higher, 0.0 if
    /// lower, NaN on an exact tie.
    #[default]
    Certain,
    /// Always NaN.
    Nan,
}

/// Normal-approximation comparator with an injectable CDF.
#[derive(Debug, Clone)]
pub struct Comparator<C = StandardNormal> {
    cdf: C,
    policy: DegeneratePolicy,
}

impl Comparator<StandardNormal> {
    pub fn new(policy: DegeneratePolicy) -> Self {
        Comparator {
            cdf: StandardNormal,
            policy,
        }
    }
}

impl Default for Comparator<StandardNormal> {
    fn default() -> Self {
        Self::new(DegeneratePolicy::default())
    }
}

impl<C: Cdf> Comparator<C> {
    pub fn with_cdf(cdf: C, policy: DegeneratePolicy) -> Self {
        Comparator { cdf, policy }
    }

    pub fn policy(&self) -> DegeneratePolicy {
        self.policy
    }

    /// `P(own > opp)` for two independent normal totals.
    ///
    /// Computes `z = (opp_mean - own_mean) / sqrt(own_var + opp_var)` and
    /// returns `1 - Φ(z)` from the distribution's upper tail. NaN or
    /// infinite moments and negative total variance give NaN; zero total
    /// variance is resolved by the policy.
    pub fn win_probability(&self, own_mean: f64, own_var: f64, opp_mean: f64, opp_var: f64) -> f64 {
        let variance = own_var + opp_var;
        if !(own_mean.is_finite() && opp_mean.is_finite() && variance.is_finite()) || variance < 0.0
        {
            return f64::NAN;
        }
        if variance == 0.0 {
            return self.degenerate(own_mean, opp_mean);
        }
        let z = (opp_mean - own_mean) / variance.sqrt();
        self.cdf.sf(z)
    }

    fn degenerate(&self, own_mean: f64, opp_mean: f64) -> f64 {
        match self.policy {
            DegeneratePolicy::Nan => f64::NAN,
            DegeneratePolicy::Certain => {
                if own_mean > opp_mean {
                    1.0
                } else if own_mean < opp_mean {
                    0.0
                } else {
                    f64::NAN
                }
            }
        }
    }
}

/// Lineup and opponent tensors must line up cell for cell.
pub(crate) fn ensure_same_shape(lineup: &[usize], opp: &[usize]) -> Result<(), MatchupError> {
    if lineup != opp {
        return Err(MatchupError::shape(format!(
            "lineup shape {lineup:?} does not match opponent shape {opp:?}"
        )));
    }
    Ok(())
}

/// The last axis of a lineup tensor must carry exactly `expected` fields.
pub(crate) fn ensure_fields(shape: &[usize], expected: usize, kind: &str) -> Result<(), MatchupError> {
    match shape.last() {
        Some(&fields) if fields == expected => Ok(()),
        _ => Err(MatchupError::shape(format!(
            "{kind} tensor needs {expected} fields per category, got shape {shape:?}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
