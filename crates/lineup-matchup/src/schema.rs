// Category schema: maps each scoring category to the table columns it reads.
//
// Column naming is the contract with the data-preparation layer:
//
//   counting category `pts`    -> pts_prediction, pts_uncertainty, pts
//   efficiency category `ft`   -> ft_pct_prediction, ft_pct_uncertainty,
//                                 fta_prediction, ft_pct, fta

use crate::error::MatchupError;
use crate::table::LongTable;

/// Which side of a matchup evaluation a set of columns feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Predicted,
    Actual,
}

/// An additive counting category (points, rebounds, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumCategory {
    pub name: String,
    pub prediction: String,
    pub uncertainty: String,
    pub actual: String,
}

impl SumCategory {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        SumCategory {
            prediction: format!("{name}_prediction"),
            uncertainty: format!("{name}_uncertainty"),
            actual: name.clone(),
            name,
        }
    }

    /// Columns read for the given outcome, in tensor field order.
    pub fn columns(&self, outcome: Outcome) -> Vec<&str> {
        match outcome {
            Outcome::Predicted => vec![self.prediction.as_str(), self.uncertainty.as_str()],
            Outcome::Actual => vec![self.actual.as_str()],
        }
    }
}

/// A made-percentage category whose team value is attempt-weighted
/// (free-throw %, field-goal %).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EfficiencyCategory {
    pub name: String,
    pub pct_prediction: String,
    pub pct_uncertainty: String,
    pub attempts_prediction: String,
    pub pct: String,
    pub attempts: String,
}

impl EfficiencyCategory {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        EfficiencyCategory {
            pct_prediction: format!("{name}_pct_prediction"),
            pct_uncertainty: format!("{name}_pct_uncertainty"),
            attempts_prediction: format!("{name}a_prediction"),
            pct: format!("{name}_pct"),
            attempts: format!("{name}a"),
            name,
        }
    }

    /// Columns read for the given outcome, in tensor field order.
    pub fn columns(&self, outcome: Outcome) -> Vec<&str> {
        match outcome {
            Outcome::Predicted => vec![
                self.pct_prediction.as_str(),
                self.pct_uncertainty.as_str(),
                self.attempts_prediction.as_str(),
            ],
            Outcome::Actual => vec![self.pct.as_str(), self.attempts.as_str()],
        }
    }
}

/// The ordered set of categories a matchup is scored on. Output columns
/// follow this order: counting categories first, then efficiency categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySchema {
    pub sum: Vec<SumCategory>,
    pub efficiency: Vec<EfficiencyCategory>,
}

impl CategorySchema {
    pub fn new<S: AsRef<str>, E: AsRef<str>>(sum_targets: &[S], eff_targets: &[E]) -> Self {
        CategorySchema {
            sum: sum_targets
                .iter()
                .map(|t| SumCategory::new(t.as_ref()))
                .collect(),
            efficiency: eff_targets
                .iter()
                .map(|t| EfficiencyCategory::new(t.as_ref()))
                .collect(),
        }
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.sum
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.efficiency.iter().map(|c| c.name.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sum.len() + self.efficiency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sum.is_empty() && self.efficiency.is_empty()
    }

    /// Every column the given outcome reads, counting categories first.
    pub fn required_columns(&self, outcome: Outcome) -> Vec<&str> {
        self.sum
            .iter()
            .flat_map(|c| c.columns(outcome))
            .chain(self.efficiency.iter().flat_map(|c| c.columns(outcome)))
            .collect()
    }

    /// Check that `table` carries every column the outcome needs. Reports the
    /// first absent column in schema order.
    pub fn validate(&self, table: &LongTable, outcome: Outcome) -> Result<(), MatchupError> {
        match self
            .required_columns(outcome)
            .into_iter()
            .find(|column| !table.has_column(column))
        {
            Some(column) => Err(MatchupError::MissingColumn {
                column: column.to_string(),
            }),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
