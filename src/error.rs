//! Hard errors raised at construction and I/O boundaries.
//!
//! Engine operations never return these; they degrade to no-ops and report
//! a [`crate::Notice`] instead.

use thiserror::Error;

/// Errors building a [`crate::Table`] from collaborator data.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("row {row}: missing value for column '{column}'")]
    MissingCell { row: usize, column: String },

    #[error("row {row}: unknown column '{column}'")]
    UnknownColumn { row: usize, column: String },

    #[error("row {row} out of range [0, {len})")]
    RowOutOfRange { row: usize, len: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors rebuilding a [`crate::Workbook`] from saved data.
#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("workbook has no sheets")]
    NoSheets,

    #[error("duplicate sheet id '{0}'")]
    DuplicateSheetId(String),
}

/// Errors loading or saving [`crate::EngineSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
