//! Single-column sorting with spreadsheet comparison rules.
//!
//! Cells are compared as:
//! 1. missing values are greater than everything (last when ascending,
//!    first when descending);
//! 2. if both cells parse as numbers they compare numerically;
//! 3. otherwise they compare as text under Unicode collation, ignoring case
//!    but not accents, so `éclair` sorts beside `eclair` rather than after `z`.
//!
//! The sort is stable: rows with equal keys keep their relative order.

use crate::cell::CellValue;
use crate::diagnostic::{Notice, Outcome};
use crate::table::{cell, Table};
use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order (smallest first)
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Descending order (largest first)
    #[serde(rename = "desc")]
    Descending,
}

/// Pre-computed comparison key for one cell.
#[derive(Debug)]
enum SortValue {
    Missing,
    Value { number: Option<f64>, text: String },
}

impl SortValue {
    fn of(value: &CellValue) -> Self {
        match value {
            CellValue::Empty => SortValue::Missing,
            CellValue::Text(s) => SortValue::Value {
                number: value.as_number(),
                text: s.clone(),
            },
        }
    }
}

thread_local! {
    static COLLATOR: Option<Collator> = text_collator();
}

/// Root-locale collator at secondary strength (case-blind, accent-aware).
fn text_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            log::warn!("text collation unavailable, comparing lower-cased text: {}", e);
            None
        }
    }
}

/// Compare two text cells the way a spreadsheet user expects.
fn collate(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    })
}

/// Compare two cells under the sort rules for `order`.
pub fn compare_cells(a: &CellValue, b: &CellValue, order: SortOrder) -> Ordering {
    compare_keys(&SortValue::of(a), &SortValue::of(b), order)
}

fn compare_keys(a: &SortValue, b: &SortValue, order: SortOrder) -> Ordering {
    let base = match (a, b) {
        (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
        (SortValue::Missing, _) => Ordering::Greater,
        (_, SortValue::Missing) => Ordering::Less,
        (
            SortValue::Value { number: na, text: ta },
            SortValue::Value { number: nb, text: tb },
        ) => match (na, nb) {
            (Some(x), Some(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
            _ => collate(ta, tb),
        },
    };

    match order {
        SortOrder::Ascending => base,
        SortOrder::Descending => base.reverse(),
    }
}

/// Sort rows by `column`. An unknown column returns the table unchanged.
///
/// # Examples
///
/// ```
/// use datamanip::{sort, SortOrder};
/// use datamanip::table::table_of;
///
/// let table = table_of(&["name", "age"], &[&["bob", "30"], &["amy", ""], &["cy", "9"]]);
/// let sorted = sort(&table, "age", SortOrder::Ascending).value;
///
/// let names: Vec<&str> = sorted.column_values("name").map(|c| c.as_str()).collect();
/// assert_eq!(names, vec!["cy", "bob", "amy"]);
/// ```
pub fn sort(table: &Table, column: &str, order: SortOrder) -> Outcome<Table> {
    if !table.has_column(column) {
        return Outcome::with_notice(
            table.clone(),
            Notice::MissingColumn {
                operation: "sort",
                column: column.to_string(),
                available: table.columns().to_vec(),
            },
        );
    }

    let keys: Vec<SortValue> = table
        .iter_rows()
        .map(|row| SortValue::of(cell(row, column)))
        .collect();

    let order_index = stable_sort_indices(keys.len(), |a, b| compare_keys(&keys[a], &keys[b], order));

    let rows = order_index
        .into_iter()
        .map(|i| table.rows()[i].clone())
        .collect();

    Outcome::ok(Table::from_parts(table.columns().to_vec(), rows))
}

/// Bottom-up merge sort over row indices.
///
/// Mixed numeric and text cells can make the comparator intransitive; a
/// plain merge still terminates with every index present exactly once.
fn stable_sort_indices<F>(len: usize, mut cmp: F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    let mut src: Vec<usize> = (0..len).collect();
    let mut buf: Vec<usize> = vec![0; len];
    let mut width = 1;

    while width < len {
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut i, mut j, mut k) = (start, mid, start);

            while i < mid && j < end {
                // Right side wins only when strictly smaller, which keeps the sort stable.
                if cmp(src[j], src[i]) == Ordering::Less {
                    buf[k] = src[j];
                    j += 1;
                } else {
                    buf[k] = src[i];
                    i += 1;
                }
                k += 1;
            }

            let rest = mid - i;
            buf[k..k + rest].copy_from_slice(&src[i..mid]);
            k += rest;
            buf[k..end].copy_from_slice(&src[j..end]);

            start = end;
        }
        std::mem::swap(&mut src, &mut buf);
        width *= 2;
    }

    src
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::table_of;

    fn column<'a>(table: &'a Table, name: &'a str) -> Vec<&'a str> {
        table.column_values(name).map(|c| c.as_str()).collect()
    }

    #[test]
    fn test_empty_sorts_last_ascending() {
        let table = table_of(&["name", "age"], &[&["bob", "30"], &["amy", ""]]);
        let sorted = sort(&table, "age", SortOrder::Ascending).value;
        assert_eq!(column(&sorted, "name"), vec!["bob", "amy"]);
    }

    #[test]
    fn test_empty_sorts_first_descending() {
        let table = table_of(&["v"], &[&["1"], &[""], &["3"]]);
        let sorted = sort(&table, "v", SortOrder::Descending).value;
        assert_eq!(column(&sorted, "v"), vec!["", "3", "1"]);
    }

    #[test]
    fn test_numeric_before_lexicographic() {
        let table = table_of(&["v"], &[&["10"], &["9"], &["100"], &["-2"]]);
        let sorted = sort(&table, "v", SortOrder::Ascending).value;
        assert_eq!(column(&sorted, "v"), vec!["-2", "9", "10", "100"]);
    }

    #[test]
    fn test_text_is_case_insensitive() {
        let table = table_of(&["v"], &[&["banana"], &["Apple"], &["cherry"], &["apple"]]);
        let sorted = sort(&table, "v", SortOrder::Ascending).value;
        assert_eq!(column(&sorted, "v"), vec!["Apple", "apple", "banana", "cherry"]);

        let sorted = sort(&table, "v", SortOrder::Descending).value;
        assert_eq!(column(&sorted, "v"), vec!["cherry", "banana", "Apple", "apple"]);
    }

    #[test]
    fn test_accented_text_sorts_with_base_letter() {
        let table = table_of(&["v"], &[&["zebra"], &["éclair"], &["fig"], &["Eclair"]]);
        let sorted = sort(&table, "v", SortOrder::Ascending).value;
        assert_eq!(column(&sorted, "v"), vec!["Eclair", "éclair", "fig", "zebra"]);

        let sorted = sort(&table, "v", SortOrder::Descending).value;
        assert_eq!(column(&sorted, "v"), vec!["zebra", "fig", "éclair", "Eclair"]);
    }

    #[test]
    fn test_collation_ignores_case_only() {
        assert_eq!(compare_cells(&CellValue::from("ä"), &CellValue::from("b"), SortOrder::Ascending), Ordering::Less);
        assert_eq!(compare_cells(&CellValue::from("Ä"), &CellValue::from("ä"), SortOrder::Ascending), Ordering::Equal);
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let table = table_of(
            &["k", "id"],
            &[&["b", "1"], &["a", "2"], &["b", "3"], &["a", "4"], &["", "5"], &["", "6"]],
        );
        let sorted = sort(&table, "k", SortOrder::Ascending).value;
        assert_eq!(column(&sorted, "id"), vec!["2", "4", "1", "3", "5", "6"]);
    }

    #[test]
    fn test_unknown_column_is_noop() {
        let table = table_of(&["a"], &[&["2"], &["1"]]);
        let out = sort(&table, "b", SortOrder::Ascending);
        assert_eq!(out.value, table);
        assert_eq!(out.notices.len(), 1);
    }

    #[test]
    fn test_mixed_values_do_not_panic() {
        let values = ["10", "-", "9", "abc", "", "-a", "1e2", ".", "Z", "0"];
        let rows: Vec<&[&str]> = values.iter().map(std::slice::from_ref).collect();
        let table = table_of(&["v"], &rows);

        let sorted = sort(&table, "v", SortOrder::Ascending).value;
        assert_eq!(sorted.len(), values.len());
        assert_eq!(sorted.get_value(values.len() - 1, "v").unwrap(), &CellValue::Empty);
    }

    #[test]
    fn test_stable_sort_indices_small() {
        assert!(stable_sort_indices(0, |_, _| Ordering::Equal).is_empty());
        assert_eq!(stable_sort_indices(1, |_, _| Ordering::Equal), vec![0]);

        let data = [5, 3, 5, 1, 3];
        let idx = stable_sort_indices(data.len(), |a, b| data[a].cmp(&data[b]));
        assert_eq!(idx, vec![3, 1, 4, 0, 2]);
    }
}
