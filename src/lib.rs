//! DataManip - Tabular Transformation Engine
//!
//! Pure table transforms (sort, filter, group-by, dedupe, fill, split,
//! transpose, search/replace, statistics) over text-valued cells, with a
//! bounded snapshot history for undo/redo. Every transform takes a table by
//! reference and returns a new one; invalid requests come back unchanged with
//! a [`Notice`] attached.

pub mod cell;
pub mod table;
pub mod error;
pub mod diagnostic;
pub mod sort;
pub mod filter;
pub mod transform;
pub mod formula;
pub mod aggregate;
pub mod stats;
pub mod search;
pub mod history;
pub mod clipboard;
pub mod settings;
pub mod workbook;

pub use cell::{format_number, parse_number, to_fixed, CellValue};
pub use table::{Row, Table};
pub use error::{SettingsError, TableError, WorkbookError};
pub use diagnostic::{Notice, Outcome};
pub use sort::{compare_cells, sort, SortOrder};
pub use filter::{apply_filter, FilterCondition, FilterOperator, FilterSet};
pub use transform::{
    add_calculated_column, fill_missing_values, merge_columns, normalize_column, remove_duplicates,
    round_column, split_column, split_column_into, transform_text, transpose, FillMethod,
    NormalizeMethod, TextOperation,
};
pub use formula::{parse_formula, Formula};
pub use aggregate::{group_by, AggregateOp, Aggregation};
pub use stats::{calculate_stats, ColumnKind, ColumnStats, NumericStats};
pub use search::{find, find_matches, replace_all, replace_single, ReplaceAllResult, ReplaceSingleResult, SearchMatch};
pub use history::History;
pub use clipboard::{CellRef, Clipboard};
pub use settings::EngineSettings;
pub use workbook::{ApplyMode, Sheet, Workbook};
