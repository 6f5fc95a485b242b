// Precondition errors shared by the reshaper, comparator and orchestration.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MatchupError {
    /// Date groups of unequal size, or lineup/opponent tensors that disagree
    /// in shape.
    #[error("shape mismatch: {message}")]
    ShapeMismatch { message: String },

    /// A column required by the category schema is absent from the table.
    #[error("missing column `{column}`")]
    MissingColumn { column: String },
}

impl MatchupError {
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        MatchupError::ShapeMismatch {
            message: message.into(),
        }
    }
}
