// Predicted category outcomes: z-test on aggregated lineup moments.
//
// Counting categories add up: team mean is the sum of player predictions and
// team variance the sum of player uncertainties (players independent).
// Percentage categories do not add up, so each player's rate is weighted by
// their share of the lineup's predicted attempts:
//
//   share_i = attempts_i / sum(attempts)
//   mean    = sum(pct_i * share_i)
//   var     = sum(pct_var_i * share_i^2)

use super::{ensure_fields, ensure_same_shape, Cdf, Comparator, DegeneratePolicy};
use crate::error::MatchupError;
use ndarray::{Array2, Array4, Axis, Zip};
use tracing::{debug, warn};

/// Team mean and variance per (date, category).
struct Moments {
    mean: Array2<f64>,
    variance: Array2<f64>,
}

fn summed_moments(lineup: &Array4<f64>) -> Moments {
    Moments {
        mean: lineup.index_axis(Axis(3), 0).sum_axis(Axis(1)),
        variance: lineup.index_axis(Axis(3), 1).sum_axis(Axis(1)),
    }
}

fn attempt_weighted_moments(lineup: &Array4<f64>) -> Moments {
    let pct = lineup.index_axis(Axis(3), 0);
    let pct_var = lineup.index_axis(Axis(3), 1);
    let attempts = lineup.index_axis(Axis(3), 2);

    let total = attempts.sum_axis(Axis(1)).insert_axis(Axis(1));
    let share = &attempts / &total;
    let share_sq = share.mapv(|s| s * s);

    Moments {
        mean: (&pct * &share).sum_axis(Axis(1)),
        variance: (&pct_var * &share_sq).sum_axis(Axis(1)),
    }
}

impl<C: Cdf> Comparator<C> {
    /// Win probability per (date, counting category).
    ///
    /// Both tensors are `[date, player, category, (prediction, uncertainty)]`.
    pub fn expected_sum(
        &self,
        lineup: &Array4<f64>,
        opp_lineup: &Array4<f64>,
    ) -> Result<Array2<f64>, MatchupError> {
        ensure_fields(lineup.shape(), 2, "predicted counting")?;
        ensure_same_shape(lineup.shape(), opp_lineup.shape())?;
        Ok(self.compare_moments(&summed_moments(lineup), &summed_moments(opp_lineup)))
    }

    /// Win probability per (date, efficiency category).
    ///
    /// Both tensors are
    /// `[date, player, category, (pct_prediction, pct_uncertainty, attempts_prediction)]`.
    /// A lineup with zero predicted attempts has no defined rate, so its
    /// cells come out NaN.
    pub fn expected_efficiency(
        &self,
        lineup: &Array4<f64>,
        opp_lineup: &Array4<f64>,
    ) -> Result<Array2<f64>, MatchupError> {
        ensure_fields(lineup.shape(), 3, "predicted efficiency")?;
        ensure_same_shape(lineup.shape(), opp_lineup.shape())?;
        Ok(self.compare_moments(
            &attempt_weighted_moments(lineup),
            &attempt_weighted_moments(opp_lineup),
        ))
    }

    fn compare_moments(&self, own: &Moments, opp: &Moments) -> Array2<f64> {
        let mut degenerate = 0usize;
        let probabilities = Zip::from(&own.mean)
            .and(&own.variance)
            .and(&opp.mean)
            .and(&opp.variance)
            .map_collect(|&own_mean, &own_var, &opp_mean, &opp_var| {
                if own_var + opp_var == 0.0 {
                    degenerate += 1;
                    debug!(own_mean, opp_mean, "zero total variance");
                }
                self.win_probability(own_mean, own_var, opp_mean, opp_var)
            });

        if degenerate > 0 {
            warn!(
                "{} of {} category cells had zero total variance; resolved as {:?}",
                degenerate,
                probabilities.len(),
                self.policy()
            );
        }
        probabilities
    }
}

/// [`Comparator::expected_sum`] with the standard normal and the default
/// degenerate policy.
pub fn expected_sum_categories_won(
    lineup: &Array4<f64>,
    opp_lineup: &Array4<f64>,
) -> Result<Array2<f64>, MatchupError> {
    Comparator::new(DegeneratePolicy::default()).expected_sum(lineup, opp_lineup)
}

/// [`Comparator::expected_efficiency`] with the standard normal and the
/// default degenerate policy.
pub fn expected_efficiency_categories_won(
    lineup_eff: &Array4<f64>,
    opp_lineup_eff: &Array4<f64>,
) -> Result<Array2<f64>, MatchupError> {
    Comparator::new(DegeneratePolicy::default()).expected_efficiency(lineup_eff, opp_lineup_eff)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
