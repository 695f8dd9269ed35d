//! Single-cell cut, copy and paste.
//!
//! The clipboard is a value owned by the caller. Cut and paste return a new
//! table; copy only fills the clipboard.

use crate::cell::CellValue;
use crate::diagnostic::{Notice, Outcome};
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// Address of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub column: String,
}

impl CellRef {
    pub fn new(row: usize, column: impl Into<String>) -> Self {
        CellRef {
            row,
            column: column.into(),
        }
    }

    fn out_of_range(&self) -> Notice {
        Notice::CellOutOfRange {
            row: self.row,
            column: self.column.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clipboard {
    content: Option<CellValue>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The copied value. A copied empty cell is `Some(CellValue::Empty)`.
    pub fn content(&self) -> Option<&CellValue> {
        self.content.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    pub fn clear(&mut self) {
        self.content = None;
    }

    /// Copy the value at `at`. An address outside the table leaves the
    /// clipboard as it was.
    pub fn copy(&mut self, table: &Table, at: &CellRef) -> Outcome<()> {
        match table.get_value(at.row, &at.column) {
            Some(value) => {
                self.content = Some(value.clone());
                Outcome::ok(())
            }
            None => Outcome::with_notice((), at.out_of_range()),
        }
    }

    /// Copy the value at `at` and blank the cell.
    pub fn cut(&mut self, table: &Table, at: &CellRef) -> Outcome<Table> {
        let copied = self.copy(table, at);
        if !copied.is_clean() {
            return copied.map(|_| table.clone());
        }

        let mut table = table.clone();
        if table.set_value(at.row, &at.column, CellValue::Empty).is_err() {
            return Outcome::with_notice(table, at.out_of_range());
        }
        Outcome::ok(table)
    }

    /// Write the clipboard value into `at`.
    pub fn paste(&self, table: &Table, at: &CellRef) -> Outcome<Table> {
        let Some(value) = &self.content else {
            return Outcome::with_notice(table.clone(), Notice::EmptyClipboard);
        };

        let mut table = table.clone();
        if table.set_value(at.row, &at.column, value.clone()).is_err() {
            return Outcome::with_notice(table, at.out_of_range());
        }
        Outcome::ok(table)
    }
}
