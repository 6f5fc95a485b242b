// Orchestration: long tables -> per (date, category) matchup outcomes.
//
// Both paths produce `[n_dates, n_sum + n_eff]` with counting categories
// first, so a predicted probability and its realized outcome sit at the same
// index.

use crate::compare::{
    actual_efficiency_categories_won, actual_sum_categories_won, Cdf, Comparator,
    DegeneratePolicy, StandardNormal,
};
use crate::config::Config;
use crate::error::MatchupError;
use crate::evaluation::{self, EvaluationReport};
use crate::reshape::{
    eff_predictions_as_array, eff_stats_as_array, predictions_as_array, stats_as_array,
};
use crate::schema::{CategorySchema, Outcome};
use crate::table::LongTable;
use ndarray::{concatenate, Array2, Axis};
use tracing::{debug, info};

/// A category schema paired with the comparator that scores it.
#[derive(Debug, Clone)]
pub struct Matchup<C = StandardNormal> {
    schema: CategorySchema,
    comparator: Comparator<C>,
}

impl Matchup<StandardNormal> {
    pub fn from_config(config: &Config) -> Self {
        Matchup {
            schema: config.schema(),
            comparator: config.comparator(),
        }
    }
}

impl<C: Cdf> Matchup<C> {
    pub fn new(schema: CategorySchema, comparator: Comparator<C>) -> Self {
        Matchup { schema, comparator }
    }

    pub fn schema(&self) -> &CategorySchema {
        &self.schema
    }

    pub fn comparator(&self) -> &Comparator<C> {
        &self.comparator
    }

    /// Win probability per (date, category).
    pub fn expected(
        &self,
        lineups: &LongTable,
        opp_lineups: &LongTable,
    ) -> Result<Array2<f64>, MatchupError> {
        expected_with(&self.comparator, &self.schema, lineups, opp_lineups)
    }

    /// Realized win (1) or loss/tie (0) per (date, category).
    pub fn actual(
        &self,
        lineups: &LongTable,
        opp_lineups: &LongTable,
    ) -> Result<Array2<u8>, MatchupError> {
        actual_with(&self.schema, lineups, opp_lineups)
    }

    /// Both paths side by side, labelled by date and category.
    pub fn evaluate(
        &self,
        lineups: &LongTable,
        opp_lineups: &LongTable,
    ) -> Result<EvaluationReport, MatchupError> {
        evaluation::evaluate_with(&self.comparator, &self.schema, lineups, opp_lineups)
    }
}

fn validate_both(
    schema: &CategorySchema,
    lineups: &LongTable,
    opp_lineups: &LongTable,
    outcome: Outcome,
) -> Result<(), MatchupError> {
    schema.validate(lineups, outcome)?;
    schema.validate(opp_lineups, outcome)
}

fn join_categories<T: Clone>(
    sum: Array2<T>,
    efficiency: Array2<T>,
) -> Result<Array2<T>, MatchupError> {
    concatenate(Axis(1), &[sum.view(), efficiency.view()])
        .map_err(|e| MatchupError::shape(format!("cannot join category blocks: {e}")))
}

pub(crate) fn expected_with<C: Cdf>(
    comparator: &Comparator<C>,
    schema: &CategorySchema,
    lineups: &LongTable,
    opp_lineups: &LongTable,
) -> Result<Array2<f64>, MatchupError> {
    validate_both(schema, lineups, opp_lineups, Outcome::Predicted)?;

    let sum = comparator.expected_sum(
        &predictions_as_array(lineups, &schema.sum)?,
        &predictions_as_array(opp_lineups, &schema.sum)?,
    )?;
    let efficiency = comparator.expected_efficiency(
        &eff_predictions_as_array(lineups, &schema.efficiency)?,
        &eff_predictions_as_array(opp_lineups, &schema.efficiency)?,
    )?;
    debug!(
        sum_categories = schema.sum.len(),
        efficiency_categories = schema.efficiency.len(),
        "compared predicted lineups"
    );

    let result = join_categories(sum, efficiency)?;
    info!(
        "expected outcomes computed for {} dates x {} categories",
        result.nrows(),
        result.ncols()
    );
    Ok(result)
}

pub(crate) fn actual_with(
    schema: &CategorySchema,
    lineups: &LongTable,
    opp_lineups: &LongTable,
) -> Result<Array2<u8>, MatchupError> {
    validate_both(schema, lineups, opp_lineups, Outcome::Actual)?;

    let sum = actual_sum_categories_won(
        &stats_as_array(lineups, &schema.sum)?,
        &stats_as_array(opp_lineups, &schema.sum)?,
    )?;
    let efficiency = actual_efficiency_categories_won(
        &eff_stats_as_array(lineups, &schema.efficiency)?,
        &eff_stats_as_array(opp_lineups, &schema.efficiency)?,
    )?;

    let result = join_categories(sum, efficiency)?;
    info!(
        "actual outcomes computed for {} dates x {} categories",
        result.nrows(),
        result.ncols()
    );
    Ok(result)
}

/// Predicted win probability per (date, category) using the standard normal
/// and the default degenerate policy.
pub fn expected_categories_won(
    lineups: &LongTable,
    opp_lineups: &LongTable,
    schema: &CategorySchema,
) -> Result<Array2<f64>, MatchupError> {
    expected_with(
        &Comparator::new(DegeneratePolicy::default()),
        schema,
        lineups,
        opp_lineups,
    )
}

/// Realized binary outcome per (date, category).
pub fn actual_categories_won(
    lineups: &LongTable,
    opp_lineups: &LongTable,
    schema: &CategorySchema,
) -> Result<Array2<u8>, MatchupError> {
    actual_with(schema, lineups, opp_lineups)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
