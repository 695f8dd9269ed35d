//! Descriptive statistics for a single column.

use crate::cell::CellValue;
use crate::diagnostic::{Notice, Outcome};
use crate::table::Table;
use crate::transform::{mean, median};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Whether any present value in the column parsed as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Numeric,
}

/// Statistics over the cells that parse as numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericStats {
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    /// Population variance.
    pub variance: f64,
}

/// Column profile returned by [`calculate_stats`].
///
/// Serializes flat, e.g.
/// `{"count":1,"unique":1,"empty":1,"type":"numeric","sum":30.0,...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Present (non-missing) values.
    pub count: usize,
    /// Distinct present values.
    pub unique: usize,
    /// Missing values.
    pub empty: usize,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    #[serde(flatten)]
    pub numeric: Option<NumericStats>,
}

impl ColumnStats {
    fn text(count: usize, unique: usize, empty: usize) -> Self {
        ColumnStats {
            count,
            unique,
            empty,
            kind: ColumnKind::Text,
            numeric: None,
        }
    }
}

impl NumericStats {
    /// `numbers` must be non-empty.
    fn compute(mut numbers: Vec<f64>) -> Self {
        let n = numbers.len() as f64;
        let sum: f64 = numbers.iter().sum();
        let mean = mean(&numbers);
        let variance = numbers.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
        let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let median = median(&mut numbers);

        NumericStats {
            sum,
            mean,
            median,
            min,
            max,
            std_dev: variance.sqrt(),
            variance,
        }
    }
}

/// Profile `column`.
///
/// Numeric statistics cover only the cells that parse; the counts cover every
/// present cell. A missing column yields an all-zero text profile.
///
/// # Examples
///
/// ```
/// use datamanip::{calculate_stats, ColumnKind};
/// use datamanip::table::table_of;
///
/// let table = table_of(&["name", "age"], &[&["bob", "30"], &["amy", ""]]);
/// let stats = calculate_stats(&table, "age").value;
///
/// assert_eq!((stats.count, stats.unique, stats.empty), (1, 1, 1));
/// assert_eq!(stats.kind, ColumnKind::Numeric);
/// assert_eq!(stats.numeric.unwrap().std_dev, 0.0);
/// ```
pub fn calculate_stats(table: &Table, column: &str) -> Outcome<ColumnStats> {
    if !table.has_column(column) {
        return Outcome::with_notice(
            ColumnStats::text(0, 0, table.len()),
            Notice::MissingColumn {
                operation: "statistics",
                column: column.to_string(),
                available: table.columns().to_vec(),
            },
        );
    }

    let present: Vec<&CellValue> = table.column_values(column).filter(|v| !v.is_missing()).collect();
    let count = present.len();
    let unique = present.iter().map(|v| v.as_str()).collect::<HashSet<_>>().len();
    let empty = table.len() - count;

    let numbers: Vec<f64> = present.iter().filter_map(|v| v.as_number()).collect();
    if numbers.is_empty() {
        return Outcome::ok(ColumnStats::text(count, unique, empty));
    }

    Outcome::ok(ColumnStats {
        count,
        unique,
        empty,
        kind: ColumnKind::Numeric,
        numeric: Some(NumericStats::compute(numbers)),
    })
}
