// Realized category outcomes from actual box-score stats.
//
// Sums skip NaN so a player with missing stats contributes nothing. A tie
// is not a win: both sides get 0.

use super::{ensure_fields, ensure_same_shape};
use crate::error::MatchupError;
use ndarray::{Array, Array2, Array3, Array4, ArrayBase, Axis, Data, RemoveAxis, Zip};

/// Sum over the player axis, treating NaN as zero.
fn nansum_players<S, D>(values: &ArrayBase<S, D>) -> Array<f64, D::Smaller>
where
    S: Data<Elem = f64>,
    D: RemoveAxis,
{
    values.fold_axis(Axis(1), 0.0, |acc, &x| if x.is_nan() { *acc } else { *acc + x })
}

/// Attempt-weighted realized percentage per (date, category).
fn team_percentage(lineup: &Array4<f64>) -> Array2<f64> {
    let pct = lineup.index_axis(Axis(3), 0);
    let attempts = lineup.index_axis(Axis(3), 1);
    let total = nansum_players(&attempts).insert_axis(Axis(1));
    let share = &attempts / &total;
    nansum_players(&(&pct * &share))
}

fn strictly_greater(own: &Array2<f64>, opp: &Array2<f64>) -> Array2<u8> {
    Zip::from(own)
        .and(opp)
        .map_collect(|&own, &opp| u8::from(own > opp))
}

/// 1 where the lineup's realized total beats the opponent's, per
/// (date, counting category). Tensors are `[date, player, category]`.
pub fn actual_sum_categories_won(
    lineup: &Array3<f64>,
    opp_lineup: &Array3<f64>,
) -> Result<Array2<u8>, MatchupError> {
    ensure_same_shape(lineup.shape(), opp_lineup.shape())?;
    Ok(strictly_greater(
        &nansum_players(lineup),
        &nansum_players(opp_lineup),
    ))
}

/// 1 where the lineup's realized attempt-weighted percentage beats the
/// opponent's. Tensors are `[date, player, category, (pct, attempts)]`.
pub fn actual_efficiency_categories_won(
    lineup_eff: &Array4<f64>,
    opp_lineup_eff: &Array4<f64>,
) -> Result<Array2<u8>, MatchupError> {
    ensure_fields(lineup_eff.shape(), 2, "actual efficiency")?;
    ensure_same_shape(lineup_eff.shape(), opp_lineup_eff.shape())?;
    Ok(strictly_greater(
        &team_percentage(lineup_eff),
        &team_percentage(opp_lineup_eff),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
