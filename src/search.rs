//! Find and replace across a set of columns.
//!
//! Search text is always literal. Case-insensitive replacement goes through
//! an escaped [`regex`] pattern, and replacement text is inserted as-is with
//! [`NoExpand`], so neither side is ever read as pattern syntax.

use crate::cell::CellValue;
use crate::table::{cell, Table};
use regex::{NoExpand, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// One matching cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub row_index: usize,
    pub column: String,
    /// The cell text at the time of the search.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceAllResult {
    pub table: Table,
    /// Number of cells changed, not number of occurrences.
    pub replaced: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceSingleResult {
    pub table: Table,
    /// Match to visit next, or `None` when nothing matches any more.
    pub next_index: Option<usize>,
    pub total_matches: usize,
}

/// Literal substring matcher with optional case folding.
struct Matcher {
    needle: String,
    match_case: bool,
}

impl Matcher {
    fn new(text: &str, match_case: bool) -> Self {
        let needle = if match_case { text.to_string() } else { text.to_lowercase() };
        Matcher { needle, match_case }
    }

    fn is_match(&self, value: &str) -> bool {
        if self.match_case {
            value.contains(&self.needle)
        } else {
            value.to_lowercase().contains(&self.needle)
        }
    }
}

/// Case-insensitive pattern matching `text` literally.
fn literal_pattern(text: &str) -> Option<Regex> {
    match RegexBuilder::new(&regex::escape(text)).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("search text cannot be compiled to a pattern: {}", e);
            None
        }
    }
}

/// Every cell in `columns` containing `text`, row-major in `columns` order.
pub fn find_matches(table: &Table, columns: &[String], text: &str, match_case: bool) -> Vec<SearchMatch> {
    let matcher = Matcher::new(text, match_case);

    let mut matches = Vec::new();
    for (row_index, row) in table.iter_rows().enumerate() {
        for col in columns {
            let value = cell(row, col).as_str();
            if matcher.is_match(value) {
                matches.push(SearchMatch {
                    row_index,
                    column: col.clone(),
                    value: value.to_string(),
                });
            }
        }
    }
    matches
}

/// Number of matching cells.
pub fn find(table: &Table, columns: &[String], text: &str, match_case: bool) -> usize {
    find_matches(table, columns, text, match_case).len()
}

/// Replace every occurrence of `search` in every matching cell.
///
/// ```
/// use datamanip::replace_all;
/// use datamanip::table::table_of;
///
/// let table = table_of(&["a"], &[&["Cat cat"], &["dog"], &["a.b*c"], &["axbbc"]]);
/// let cols = vec!["a".to_string()];
///
/// let result = replace_all(&table, &cols, "CAT", "$1", false);
/// assert_eq!(result.replaced, 1);
/// assert_eq!(result.table.get_value(0, "a").unwrap().as_str(), "$1 $1");
///
/// let result = replace_all(&table, &cols, "a.b*c", "x", true);
/// assert_eq!(result.replaced, 1);
/// assert_eq!(result.table.get_value(3, "a").unwrap().as_str(), "axbbc");
/// ```
pub fn replace_all(table: &Table, columns: &[String], search: &str, replacement: &str, match_case: bool) -> ReplaceAllResult {
    let matcher = Matcher::new(search, match_case);
    let pattern = if match_case { None } else { literal_pattern(search) };
    if !match_case && pattern.is_none() {
        return ReplaceAllResult {
            table: table.clone(),
            replaced: 0,
        };
    }

    let mut replaced = 0;
    let rows = table
        .iter_rows()
        .map(|row| {
            let mut row = row.clone();
            for col in columns {
                let value = cell(&row, col).as_str();
                if !matcher.is_match(value) {
                    continue;
                }
                let updated = match &pattern {
                    Some(re) => re.replace_all(value, NoExpand(replacement)).into_owned(),
                    None => value.replace(search, replacement),
                };
                row.insert(col.clone(), CellValue::text(updated));
                replaced += 1;
            }
            row
        })
        .collect();

    ReplaceAllResult {
        table: Table::from_parts(table.columns().to_vec(), rows),
        replaced,
    }
}

/// Replace the first occurrence inside the `match_index`-th match, then
/// search again so the caller can step through the remaining matches.
pub fn replace_single(
    table: &Table,
    columns: &[String],
    search: &str,
    replacement: &str,
    match_case: bool,
    match_index: usize,
) -> ReplaceSingleResult {
    let unchanged = || ReplaceSingleResult {
        table: table.clone(),
        next_index: None,
        total_matches: 0,
    };

    let matches = find_matches(table, columns, search, match_case);
    let Some(target) = matches.get(match_index) else {
        return unchanged();
    };

    let updated = if match_case {
        target.value.replacen(search, replacement, 1)
    } else {
        match literal_pattern(search) {
            Some(re) => re.replace(&target.value, NoExpand(replacement)).into_owned(),
            None => return unchanged(),
        }
    };

    let mut table = table.clone();
    if let Err(e) = table.set_value(target.row_index, &target.column, CellValue::text(updated)) {
        // Only reachable when the match names a column the table lacks.
        log::warn!("replace skipped: {}", e);
    }

    let total_matches = find(&table, columns, search, match_case);
    let next_index = if total_matches > 0 {
        Some(match_index.min(total_matches - 1))
    } else {
        None
    };

    ReplaceSingleResult {
        table,
        next_index,
        total_matches,
    }
}
