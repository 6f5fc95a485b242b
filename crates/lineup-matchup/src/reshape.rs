// Reshaper: long (date, player) rows -> rectangular lineup tensors indexed
// [date, player, category, field].
//
// Dates are ordered ascending by key; rows keep their input order within a
// date. Every date must hold the same number of players; a ragged table is
// rejected rather than truncated or padded.

use crate::error::MatchupError;
use crate::schema::{EfficiencyCategory, Outcome, SumCategory};
use crate::table::LongTable;
use ndarray::{Array3, Array4, Axis};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Rectangularization
// ---------------------------------------------------------------------------

/// Row indices of a table grouped by date, with a uniform group size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroups {
    dates: Vec<String>,
    rows: Vec<Vec<usize>>,
    players: usize,
}

impl DateGroups {
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    pub fn n_players(&self) -> usize {
        self.players
    }

    /// Table row indices for the lineup on the `idx`-th date.
    pub fn rows(&self, idx: usize) -> &[usize] {
        &self.rows[idx]
    }
}

/// Partition rows by date and check every date has the same lineup size.
pub fn group_by_date(table: &LongTable) -> Result<DateGroups, MatchupError> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (row, date) in table.dates().iter().enumerate() {
        groups.entry(date.as_str()).or_default().push(row);
    }

    let mut first: Option<(&str, usize)> = None;
    for (date, rows) in &groups {
        match first {
            None => first = Some((*date, rows.len())),
            Some((first_date, expected)) if rows.len() != expected => {
                return Err(MatchupError::shape(format!(
                    "date {date} has {} players but date {first_date} has {expected}",
                    rows.len()
                )));
            }
            Some(_) => {}
        }
    }

    let players = first.map_or(0, |(_, n)| n);
    let (dates, rows) = groups
        .into_iter()
        .map(|(date, rows)| (date.to_string(), rows))
        .unzip();
    Ok(DateGroups {
        dates,
        rows,
        players,
    })
}

/// Gather `fields[c][f]` columns into a `[date, player, c, f]` tensor.
fn stack_fields(
    table: &LongTable,
    groups: &DateGroups,
    fields: &[Vec<&str>],
    n_fields: usize,
) -> Result<Array4<f64>, MatchupError> {
    let columns = fields
        .iter()
        .map(|names| {
            names
                .iter()
                .map(|name| {
                    table.column(name).ok_or_else(|| MatchupError::MissingColumn {
                        column: name.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let shape = (groups.n_dates(), groups.n_players(), columns.len(), n_fields);
    let mut data = Vec::with_capacity(shape.0 * shape.1 * shape.2 * shape.3);
    for date_idx in 0..groups.n_dates() {
        for &row in groups.rows(date_idx) {
            for category in &columns {
                data.extend(category.iter().map(|column| column[row]));
            }
        }
    }

    Array4::from_shape_vec(shape, data).map_err(|e| MatchupError::shape(e.to_string()))
}

fn sum_fields<'a>(targets: &'a [SumCategory], outcome: Outcome) -> Vec<Vec<&'a str>> {
    targets.iter().map(|t| t.columns(outcome)).collect()
}

fn eff_fields<'a>(targets: &'a [EfficiencyCategory], outcome: Outcome) -> Vec<Vec<&'a str>> {
    targets.iter().map(|t| t.columns(outcome)).collect()
}

// ---------------------------------------------------------------------------
// Public reshapers
// ---------------------------------------------------------------------------

/// Realized counting stats, `[date, player, category]`.
pub fn stats_as_array(
    table: &LongTable,
    targets: &[SumCategory],
) -> Result<Array3<f64>, MatchupError> {
    let groups = group_by_date(table)?;
    let stacked = stack_fields(table, &groups, &sum_fields(targets, Outcome::Actual), 1)?;
    Ok(stacked.index_axis_move(Axis(3), 0))
}

/// Predicted counting stats, `[date, player, category, (prediction, uncertainty)]`.
pub fn predictions_as_array(
    table: &LongTable,
    targets: &[SumCategory],
) -> Result<Array4<f64>, MatchupError> {
    let groups = group_by_date(table)?;
    stack_fields(table, &groups, &sum_fields(targets, Outcome::Predicted), 2)
}

/// Predicted efficiency stats,
/// `[date, player, category, (pct_prediction, pct_uncertainty, attempts_prediction)]`.
pub fn eff_predictions_as_array(
    table: &LongTable,
    targets: &[EfficiencyCategory],
) -> Result<Array4<f64>, MatchupError> {
    let groups = group_by_date(table)?;
    stack_fields(table, &groups, &eff_fields(targets, Outcome::Predicted), 3)
}

/// Realized efficiency stats, `[date, player, category, (pct, attempts)]`.
pub fn eff_stats_as_array(
    table: &LongTable,
    targets: &[EfficiencyCategory],
) -> Result<Array4<f64>, MatchupError> {
    let groups = group_by_date(table)?;
    stack_fields(table, &groups, &eff_fields(targets, Outcome::Actual), 2)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
