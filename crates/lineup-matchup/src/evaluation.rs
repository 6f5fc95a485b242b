// Backtest evaluation: predicted win probabilities next to realized outcomes,
// with per-category calibration summaries.

use crate::compare::{Cdf, Comparator, DegeneratePolicy};
use crate::error::MatchupError;
use crate::matchup::{actual_with, expected_with};
use crate::reshape::group_by_date;
use crate::schema::CategorySchema;
use crate::table::LongTable;
use ndarray::Array2;
use serde::Serialize;
use std::io::Write;
use tracing::info;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Predicted and actual outcomes for the same (date, category) grid.
///
/// Only built by evaluation, so both matrices always have one row per date
/// and one column per category.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    dates: Vec<String>,
    categories: Vec<String>,
    predicted: Array2<f64>,
    actual: Array2<u8>,
}

/// Calibration of one category's predictions across all dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    /// Dates with a finite prediction; the other fields use only these.
    pub observations: usize,
    /// Mean squared error between probability and outcome. Lower is better.
    pub brier_score: f64,
    /// Share of dates where `p > 0.5` agreed with the outcome.
    pub accuracy: f64,
    pub mean_predicted: f64,
    pub win_rate: f64,
}

impl EvaluationReport {
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// `[n_dates, n_categories]` win probabilities.
    pub fn predicted(&self) -> &Array2<f64> {
        &self.predicted
    }

    /// `[n_dates, n_categories]` realized 0/1 outcomes.
    pub fn actual(&self) -> &Array2<u8> {
        &self.actual
    }

    /// `<cat>_predicted` for every category, then `<cat>_actual`.
    pub fn column_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| format!("{c}_predicted"))
            .chain(self.categories.iter().map(|c| format!("{c}_actual")))
            .collect()
    }

    /// Write one CSV row per date: `date`, the predicted columns, then the
    /// actual columns.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec!["date".to_string()];
        header.extend(self.column_names());
        wtr.write_record(&header)?;

        for (idx, date) in self.dates.iter().enumerate() {
            let mut record = Vec::with_capacity(1 + 2 * self.categories.len());
            record.push(date.clone());
            record.extend(self.predicted.row(idx).iter().map(|p| p.to_string()));
            record.extend(self.actual.row(idx).iter().map(|a| a.to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn summary(&self) -> Vec<CategorySummary> {
        self.categories
            .iter()
            .enumerate()
            .map(|(c, category)| {
                let pairs: Vec<(f64, f64)> = self
                    .predicted
                    .column(c)
                    .iter()
                    .zip(self.actual.column(c).iter())
                    .filter(|(p, _)| p.is_finite())
                    .map(|(&p, &won)| (p, f64::from(won)))
                    .collect();
                summarize(category, &pairs)
            })
            .collect()
    }
}

fn summarize(category: &str, pairs: &[(f64, f64)]) -> CategorySummary {
    let n = pairs.len();
    let mean = |f: &dyn Fn(&(f64, f64)) -> f64| {
        if n == 0 {
            f64::NAN
        } else {
            pairs.iter().map(f).sum::<f64>() / n as f64
        }
    };

    CategorySummary {
        category: category.to_string(),
        observations: n,
        brier_score: mean(&|&(p, won)| (p - won).powi(2)),
        accuracy: mean(&|&(p, won)| {
            if (p > 0.5) == (won > 0.5) {
                1.0
            } else {
                0.0
            }
        }),
        mean_predicted: mean(&|&(p, _)| p),
        win_rate: mean(&|&(_, won)| won),
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub(crate) fn evaluate_with<C: Cdf>(
    comparator: &Comparator<C>,
    schema: &CategorySchema,
    lineups: &LongTable,
    opp_lineups: &LongTable,
) -> Result<EvaluationReport, MatchupError> {
    let predicted = expected_with(comparator, schema, lineups, opp_lineups)?;
    let actual = actual_with(schema, lineups, opp_lineups)?;
    let dates = group_by_date(lineups)?.dates().to_vec();

    info!(
        "evaluated {} matchups over {} categories",
        dates.len(),
        schema.len()
    );
    Ok(EvaluationReport {
        dates,
        categories: schema
            .category_names()
            .into_iter()
            .map(String::from)
            .collect(),
        predicted,
        actual,
    })
}

/// Run both the predicted and actual paths with the standard normal and the
/// default degenerate policy.
pub fn evaluate_categories(
    lineups: &LongTable,
    opp_lineups: &LongTable,
    schema: &CategorySchema,
) -> Result<EvaluationReport, MatchupError> {
    evaluate_with(
        &Comparator::new(DegeneratePolicy::default()),
        schema,
        lineups,
        opp_lineups,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
