//! Table Implementation
//!
//! A Table is an ordered list of unique column names plus an ordered list of
//! rows. Every row maps each column name to a [`CellValue`]; the key set of
//! every row is exactly the column list. Rows have no identity beyond their
//! position.
//!
//! Tables are plain values. Engine operations take `&Table` and return a new
//! table, so the previous state stays available for history and for
//! "apply to new sheet" handling.
//!
//! # Examples
//!
//! ```
//! use datamanip::{Table, CellValue};
//! use std::collections::HashMap;
//!
//! let mut table = Table::with_columns(vec!["name".to_string(), "age".to_string()]).unwrap();
//!
//! let mut row = HashMap::new();
//! row.insert("name".to_string(), CellValue::from("Alice"));
//! row.insert("age".to_string(), CellValue::from("30"));
//! table.append_row(row).unwrap();
//!
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.get_value(0, "name").unwrap().as_str(), "Alice");
//! ```

use crate::cell::CellValue;
use crate::error::TableError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One row: column name to cell.
pub type Row = HashMap<String, CellValue>;

/// Ordered rows over an ordered, duplicate-free column list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

#[derive(Deserialize)]
struct RawTable {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Row>,
}

impl TryFrom<RawTable> for Table {
    type Error = TableError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        Table::new(raw.columns, raw.rows)
    }
}

impl Table {
    /// Create a table, checking the column list and every row.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, TableError> {
        check_unique(&columns)?;

        for (i, row) in rows.iter().enumerate() {
            for col in &columns {
                if !row.contains_key(col) {
                    return Err(TableError::MissingCell {
                        row: i,
                        column: col.clone(),
                    });
                }
            }
            if row.len() != columns.len() {
                let known: HashSet<&str> = columns.iter().map(String::as_str).collect();
                if let Some(extra) = row.keys().find(|k| !known.contains(k.as_str())) {
                    return Err(TableError::UnknownColumn {
                        row: i,
                        column: extra.clone(),
                    });
                }
            }
        }

        Ok(Table { columns, rows })
    }

    /// Create a table with no rows.
    pub fn with_columns(columns: Vec<String>) -> Result<Self, TableError> {
        Self::new(columns, Vec::new())
    }

    /// Build a table from loose records, the shape import collaborators
    /// produce: absent cells become `Empty` and keys outside `columns` are
    /// dropped. Only a duplicated column name is an error.
    pub fn from_records(columns: Vec<String>, records: Vec<Row>) -> Result<Self, TableError> {
        check_unique(&columns)?;

        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|col| (col.clone(), record.remove(col).unwrap_or_default()))
                    .collect()
            })
            .collect();

        Ok(Table { columns, rows })
    }

    /// Construct without validation. Callers inside the crate uphold the
    /// row/column invariant themselves.
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get_value(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn get_row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    /// Values of one column top to bottom; absent cells read as `Empty`.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.rows.iter().map(move |row| cell(row, column))
    }

    /// Overwrite a single cell. Used by the orchestration layer for direct
    /// grid edits.
    pub fn set_value(&mut self, row: usize, column: &str, value: CellValue) -> Result<(), TableError> {
        if !self.has_column(column) {
            return Err(TableError::UnknownColumn {
                row,
                column: column.to_string(),
            });
        }
        let len = self.rows.len();
        let target = self
            .rows
            .get_mut(row)
            .ok_or(TableError::RowOutOfRange { row, len })?;
        target.insert(column.to_string(), value);
        Ok(())
    }

    pub fn append_row(&mut self, row: Row) -> Result<(), TableError> {
        let index = self.rows.len();
        for col in &self.columns {
            if !row.contains_key(col) {
                return Err(TableError::MissingCell {
                    row: index,
                    column: col.clone(),
                });
            }
        }
        if let Some(extra) = row.keys().find(|k| !self.has_column(k)) {
            return Err(TableError::UnknownColumn {
                row: index,
                column: extra.clone(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// A row with every column set to `Empty`.
    pub fn blank_row(&self) -> Row {
        self.columns
            .iter()
            .map(|c| (c.clone(), CellValue::Empty))
            .collect()
    }

    pub fn iter_rows(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.columns, self.rows)
    }

    // ========================================================================
    // Serialization Methods
    // ========================================================================

    /// Export as JSON `{"columns": [...], "rows": [{...}, ...]}`.
    ///
    /// ```
    /// use datamanip::Table;
    ///
    /// let table = Table::with_columns(vec!["id".to_string()]).unwrap();
    /// let json = table.to_json().unwrap();
    /// assert_eq!(Table::from_json(&json).unwrap(), table);
    /// ```
    pub fn to_json(&self) -> Result<String, TableError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse the JSON shape produced by [`Table::to_json`]. Rows must carry
    /// every column; numbers and booleans are stored as their text.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Cell lookup that reads absent keys as `Empty`.
pub(crate) fn cell<'a>(row: &'a Row, column: &str) -> &'a CellValue {
    const EMPTY: &CellValue = &CellValue::Empty;
    row.get(column).unwrap_or(EMPTY)
}

fn check_unique(columns: &[String]) -> Result<(), TableError> {
    let mut seen = HashSet::with_capacity(columns.len());
    for col in columns {
        if !seen.insert(col.as_str()) {
            return Err(TableError::DuplicateColumn(col.clone()));
        }
    }
    Ok(())
}

/// Return `base`, or `base (2)`, `base (3)`, … whichever is not taken.
pub(crate) fn unique_column_name(taken: &[String], base: &str) -> String {
    if !taken.iter().any(|c| c == base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{} ({})", base, n))
        .find(|candidate| !taken.iter().any(|c| c == candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Build a table from string literals. Test and doc helper.
///
/// ```
/// let table = datamanip::table::table_of(&["name", "age"], &[&["bob", "30"], &["amy", ""]]);
/// assert_eq!(table.len(), 2);
/// assert!(table.get_value(1, "age").unwrap().is_missing());
/// ```
pub fn table_of(columns: &[&str], rows: &[&[&str]]) -> Table {
    let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    let rows = rows
        .iter()
        .map(|values| {
            columns
                .iter()
                .enumerate()
                .map(|(i, c)| (c.clone(), CellValue::from(values.get(i).copied().unwrap_or(""))))
                .collect()
        })
        .collect();
    Table::from_parts(columns, rows)
}
