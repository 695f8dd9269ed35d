//! Workbook of named sheets and the apply-to-sheet boundary.
//!
//! Engine operations return new tables; the workbook decides where a result
//! goes. [`ApplyMode::InPlace`] records the active sheet in the caller's
//! [`History`] and replaces it, [`ApplyMode::NewSheet`] appends a result sheet
//! and leaves the source untouched.
//!
//! # Examples
//!
//! ```
//! use datamanip::{sort, ApplyMode, History, SortOrder, Workbook};
//! use datamanip::table::table_of;
//!
//! let mut workbook = Workbook::with_table("people.csv", table_of(&["age"], &[&["30"], &["4"]]));
//! let mut history = History::new();
//!
//! let sorted = sort(workbook.active_table(), "age", SortOrder::Ascending).value;
//! workbook.apply(&mut history, sorted, ApplyMode::NewSheet, "Sort");
//!
//! assert_eq!(workbook.sheets().len(), 2);
//! assert_eq!(workbook.active_sheet().name, "Sort Result");
//! ```

use crate::cell::CellValue;
use crate::error::WorkbookError;
use crate::history::History;
use crate::settings::EngineSettings;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Where an operation's result is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyMode {
    InPlace,
    NewSheet,
}

impl ApplyMode {
    /// The mode a host should offer by default.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        if settings.in_place_mode || !settings.default_to_new_sheet {
            ApplyMode::InPlace
        } else {
            ApplyMode::NewSheet
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: String,
    pub name: String,
    pub table: Table,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawWorkbook")]
pub struct Workbook {
    pub file_name: String,
    sheets: Vec<Sheet>,
    active_sheet_id: String,
    next_id: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorkbook {
    #[serde(default)]
    file_name: String,
    sheets: Vec<Sheet>,
    #[serde(default)]
    active_sheet_id: String,
    #[serde(default)]
    next_id: u64,
}

impl TryFrom<RawWorkbook> for Workbook {
    type Error = WorkbookError;

    /// Requires at least one sheet and unique ids. An active id naming no
    /// sheet falls back to the first sheet, and the id counter is moved past
    /// every `sheet-N` already in use.
    fn try_from(raw: RawWorkbook) -> Result<Self, Self::Error> {
        let Some(first) = raw.sheets.first() else {
            return Err(WorkbookError::NoSheets);
        };
        let first_id = first.id.clone();

        let mut seen = HashSet::new();
        for sheet in &raw.sheets {
            if !seen.insert(sheet.id.as_str()) {
                return Err(WorkbookError::DuplicateSheetId(sheet.id.clone()));
            }
        }

        let active_sheet_id = if seen.contains(raw.active_sheet_id.as_str()) {
            raw.active_sheet_id
        } else {
            log::debug!("active sheet '{}' not found, activating '{}'", raw.active_sheet_id, first_id);
            first_id
        };

        let next_id = raw
            .sheets
            .iter()
            .filter_map(|s| s.id.strip_prefix("sheet-")?.parse::<u64>().ok())
            .map(|n| n.saturating_add(1))
            .fold(raw.next_id.max(1), u64::max);

        Ok(Workbook {
            file_name: raw.file_name,
            sheets: raw.sheets,
            active_sheet_id,
            next_id,
        })
    }
}

/// The three-by-three blank grid a new workbook opens with.
fn starter_table() -> Table {
    let columns: Vec<String> = (1..=3).map(|i| format!("Column {}", i)).collect();
    let rows = (0..3)
        .map(|_| columns.iter().map(|c| (c.clone(), CellValue::Empty)).collect())
        .collect();
    Table::from_parts(columns, rows)
}

impl Workbook {
    /// A workbook holding a blank `Sheet1`.
    pub fn new(file_name: impl Into<String>) -> Self {
        Workbook::with_table(file_name, starter_table())
    }

    /// A workbook whose `Sheet1` holds `table`.
    pub fn with_table(file_name: impl Into<String>, table: Table) -> Self {
        let mut workbook = Workbook {
            file_name: file_name.into(),
            sheets: Vec::new(),
            active_sheet_id: String::new(),
            next_id: 1,
        };
        workbook.push_sheet("Sheet1".to_string(), table);
        workbook
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, id: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id == id)
    }

    pub fn active_sheet_id(&self) -> &str {
        &self.active_sheet_id
    }

    pub fn active_sheet(&self) -> &Sheet {
        let i = self.active_index();
        &self.sheets[i]
    }

    pub fn active_table(&self) -> &Table {
        &self.active_sheet().table
    }

    /// Index of the active sheet. The active id always names a sheet and
    /// the list is never empty; index 0 is the fallback.
    fn active_index(&self) -> usize {
        self.sheets
            .iter()
            .position(|s| s.id == self.active_sheet_id)
            .unwrap_or(0)
    }

    /// Append a sheet, activate it and return its id.
    fn push_sheet(&mut self, name: String, table: Table) -> String {
        let id = format!("sheet-{}", self.next_id);
        self.next_id += 1;
        log::debug!("sheet {} '{}' created", id, name);
        self.sheets.push(Sheet {
            id: id.clone(),
            name,
            table,
        });
        self.active_sheet_id = id.clone();
        id
    }

    /// Add an empty `Sheet{n+1}` and activate it.
    pub fn add_sheet(&mut self) -> String {
        let name = format!("Sheet{}", self.sheets.len() + 1);
        self.push_sheet(name, Table::default())
    }

    /// Add a sheet holding `table` and activate it.
    pub fn add_sheet_with(&mut self, name: impl Into<String>, table: Table) -> String {
        self.push_sheet(name.into(), table)
    }

    pub fn rename_sheet(&mut self, id: &str, name: impl Into<String>) -> bool {
        match self.sheets.iter_mut().find(|s| s.id == id) {
            Some(sheet) => {
                sheet.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Remove a sheet. The last remaining sheet cannot be deleted. Deleting
    /// the active sheet activates the first one.
    pub fn delete_sheet(&mut self, id: &str) -> bool {
        if self.sheets.len() <= 1 {
            log::debug!("refusing to delete the only sheet");
            return false;
        }
        let Some(index) = self.sheets.iter().position(|s| s.id == id) else {
            return false;
        };
        self.sheets.remove(index);
        if self.active_sheet_id == id {
            self.active_sheet_id = self.sheets[0].id.clone();
        }
        true
    }

    /// Copy a sheet as `{name} Copy` and activate the copy.
    pub fn duplicate_sheet(&mut self, id: &str) -> Option<String> {
        let sheet = self.sheet(id)?;
        let name = format!("{} Copy", sheet.name);
        let table = sheet.table.clone();
        Some(self.push_sheet(name, table))
    }

    pub fn set_active(&mut self, id: &str) -> bool {
        if self.sheet(id).is_none() {
            return false;
        }
        self.active_sheet_id = id.to_string();
        true
    }

    /// Record the active table in `history` and replace it with `table`.
    pub fn commit(&mut self, history: &mut History, table: Table) {
        let i = self.active_index();
        history.save(&self.sheets[i].table);
        self.sheets[i].table = table;
    }

    /// Place an operation result according to `mode`. Returns the id of the
    /// sheet that received it.
    pub fn apply(&mut self, history: &mut History, table: Table, mode: ApplyMode, operation: &str) -> String {
        match mode {
            ApplyMode::InPlace => {
                self.commit(history, table);
                self.active_sheet_id.clone()
            }
            ApplyMode::NewSheet => self.push_sheet(format!("{} Result", operation), table),
        }
    }

    /// Replace the active table with the previous history snapshot.
    pub fn undo(&mut self, history: &mut History) {
        let i = self.active_index();
        self.sheets[i].table = history.undo(&self.sheets[i].table);
    }

    /// Replace the active table with the next history snapshot.
    pub fn redo(&mut self, history: &mut History) {
        let i = self.active_index();
        self.sheets[i].table = history.redo(&self.sheets[i].table);
    }
}
