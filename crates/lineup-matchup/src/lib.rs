// Library root: head-to-head category matchup engine for fantasy-basketball
// lineups. Re-exports the modules and the main entry points.

pub mod compare;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod matchup;
pub mod reshape;
pub mod schema;
pub mod table;

pub use compare::{Cdf, Comparator, DegeneratePolicy, StandardNormal};
pub use error::MatchupError;
pub use evaluation::{evaluate_categories, CategorySummary, EvaluationReport};
pub use matchup::{actual_categories_won, expected_categories_won, Matchup};
pub use schema::{CategorySchema, EfficiencyCategory, Outcome, SumCategory};
pub use table::{LongTable, TableError};
