//! Group-by with per-group aggregation.
//!
//! Rows are bucketed by the tuple of their group-column values; buckets come
//! out in the order their key was first seen. Aggregations read only the
//! cells that parse as numbers, except `count`, which counts every row in the
//! bucket.

use crate::cell::{to_fixed, CellValue};
use crate::diagnostic::{Notice, Outcome};
use crate::table::{cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Aggregation function applied to one column of each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

impl AggregateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateOp::Sum => "sum",
            AggregateOp::Avg => "avg",
            AggregateOp::Count => "count",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
        }
    }

    /// Aggregate one group. `rows` is never empty.
    fn compute(&self, rows: &[&Row], column: &str) -> CellValue {
        if *self == AggregateOp::Count {
            return CellValue::text(rows.len().to_string());
        }

        let values: Vec<f64> = rows
            .iter()
            .filter_map(|row| cell(row, column).as_number())
            .collect();

        let result = match self {
            AggregateOp::Sum => Some(values.iter().sum::<f64>()),
            AggregateOp::Avg if values.is_empty() => return CellValue::from("0"),
            AggregateOp::Avg => Some(values.iter().sum::<f64>() / values.len() as f64),
            AggregateOp::Min => values.iter().copied().reduce(f64::min),
            AggregateOp::Max => values.iter().copied().reduce(f64::max),
            AggregateOp::Count => None,
        };

        match result {
            Some(v) => CellValue::text(to_fixed(v, 2)),
            None => CellValue::Empty,
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested output column: `operation` over `column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aggregation {
    pub column: String,
    pub operation: AggregateOp,
}

impl Aggregation {
    pub fn new(column: impl Into<String>, operation: AggregateOp) -> Self {
        Aggregation {
            column: column.into(),
            operation,
        }
    }

    /// Output column name, e.g. `sum(price)`.
    pub fn output_name(&self) -> String {
        format!("{}({})", self.operation, self.column)
    }
}

/// Group `table` by `group_columns` and compute `aggregations` per group.
///
/// Output columns are the group columns followed by one
/// [`Aggregation::output_name`] column per distinct aggregation. If any group
/// or aggregation column is missing the result is an empty table.
///
/// # Examples
///
/// ```
/// use datamanip::{group_by, AggregateOp, Aggregation};
/// use datamanip::table::table_of;
///
/// let table = table_of(&["name", "age"], &[&["a", "1"], &["a", "2"], &["b", "3"]]);
/// let grouped = group_by(&table, &["name".to_string()], &[Aggregation::new("age", AggregateOp::Sum)]).value;
///
/// assert_eq!(grouped.columns(), &["name", "sum(age)"]);
/// assert_eq!(grouped.get_value(0, "sum(age)").unwrap().as_str(), "3.00");
/// ```
pub fn group_by(table: &Table, group_columns: &[String], aggregations: &[Aggregation]) -> Outcome<Table> {
    let absent: Vec<String> = group_columns
        .iter()
        .chain(aggregations.iter().map(|a| &a.column))
        .filter(|c| !table.has_column(c))
        .cloned()
        .collect();
    if !absent.is_empty() {
        return Outcome::with_notice(
            Table::default(),
            Notice::MissingColumns {
                operation: "group by",
                columns: absent,
                available: table.columns().to_vec(),
            },
        );
    }

    let mut columns: Vec<String> = Vec::with_capacity(group_columns.len() + aggregations.len());
    for name in group_columns.iter().cloned().chain(aggregations.iter().map(Aggregation::output_name)) {
        if !columns.contains(&name) {
            columns.push(name);
        }
    }

    // Buckets in first-seen order, with an index from key to bucket.
    let mut buckets: Vec<(Vec<&str>, Vec<&Row>)> = Vec::new();
    let mut index: HashMap<Vec<&str>, usize> = HashMap::new();
    for row in table.iter_rows() {
        let key: Vec<&str> = group_columns.iter().map(|c| cell(row, c).as_str()).collect();
        match index.get(&key) {
            Some(&i) => buckets[i].1.push(row),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![row]));
            }
        }
    }

    let rows = buckets
        .iter()
        .map(|(key, members)| {
            let mut out = Row::with_capacity(columns.len());
            for (col, value) in group_columns.iter().zip(key) {
                out.insert(col.clone(), CellValue::from(*value));
            }
            for agg in aggregations {
                out.insert(agg.output_name(), agg.operation.compute(members, &agg.column));
            }
            out
        })
        .collect();

    Outcome::ok(Table::from_parts(columns, rows))
}
