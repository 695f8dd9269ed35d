//! Diagnostics for the no-op-on-invalid-input policy.
//!
//! Engine operations are total: when a request cannot be honoured (a column
//! that does not exist, a numeric fill over text, a cell outside the table)
//! the operation returns its input unchanged, or an empty table for group-by,
//! and attaches a [`Notice`] describing why. Callers decide whether to show
//! the notice; every notice is also logged at `warn` level when raised.

use thiserror::Error;

/// A non-fatal diagnostic raised by an engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Notice {
    #[error("{operation}: column '{column}' not found in available columns: {}", .available.join(", "))]
    MissingColumn {
        operation: &'static str,
        column: String,
        available: Vec<String>,
    },

    #[error("{operation}: columns not found: {}. Available columns: {}", .columns.join(", "), .available.join(", "))]
    MissingColumns {
        operation: &'static str,
        columns: Vec<String>,
        available: Vec<String>,
    },

    #[error("{operation}: column '{column}' has no numeric values")]
    NoNumericValues {
        operation: &'static str,
        column: String,
    },

    #[error("{operation}: column '{column}' has no spread to scale by")]
    DegenerateRange {
        operation: &'static str,
        column: String,
    },

    #[error("{operation}: table has no rows")]
    EmptyTable { operation: &'static str },

    #[error("{operation}: column '{column}' already exists")]
    DuplicateColumn {
        operation: &'static str,
        column: String,
    },

    #[error("invalid formula '{formula}': {reason}")]
    InvalidFormula { formula: String, reason: String },

    #[error("cell ({row}, '{column}') is outside the table")]
    CellOutOfRange { row: usize, column: String },

    #[error("clipboard is empty")]
    EmptyClipboard,
}

/// A result value paired with the notices raised while computing it.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Outcome<T> {
    pub value: T,
    pub notices: Vec<Notice>,
}

impl<T> Outcome<T> {
    /// A clean result.
    pub fn ok(value: T) -> Self {
        Outcome {
            value,
            notices: Vec::new(),
        }
    }

    /// A result carrying one notice. The notice is logged.
    pub fn with_notice(value: T, notice: Notice) -> Self {
        log::warn!("{}", notice);
        Outcome {
            value,
            notices: vec![notice],
        }
    }

    /// Attach another notice. The notice is logged.
    pub fn push_notice(&mut self, notice: Notice) {
        log::warn!("{}", notice);
        self.notices.push(notice);
    }

    /// True when no notice was raised.
    pub fn is_clean(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            notices: self.notices,
        }
    }
}
