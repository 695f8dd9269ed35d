//! Row and column transforms.
//!
//! Every function takes the table by reference and returns a new table in an
//! [`Outcome`]. A transform that names a column the table does not have
//! returns its input unchanged along with a [`Notice`].

use crate::cell::{format_number, to_fixed, CellValue};
use crate::diagnostic::{Notice, Outcome};
use crate::formula;
use crate::table::{cell, unique_column_name, Row, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn missing_column(operation: &'static str, table: &Table, column: &str) -> Outcome<Table> {
    Outcome::with_notice(
        table.clone(),
        Notice::MissingColumn {
            operation,
            column: column.to_string(),
            available: table.columns().to_vec(),
        },
    )
}

/// Rewrite one column's cells, leaving every other cell untouched.
fn map_column<F>(table: &Table, column: &str, mut f: F) -> Table
where
    F: FnMut(&CellValue) -> CellValue,
{
    let rows = table
        .iter_rows()
        .map(|row| {
            let mut row = row.clone();
            let updated = f(cell(&row, column));
            row.insert(column.to_string(), updated);
            row
        })
        .collect();
    Table::from_parts(table.columns().to_vec(), rows)
}

// ============================================================================
// Deduplication
// ============================================================================

/// Drop rows whose key repeats an earlier row. The key is the tuple of
/// `key_columns` values (all columns when `None`); the first occurrence wins
/// and survivors keep their order.
pub fn remove_duplicates(table: &Table, key_columns: Option<&[String]>) -> Outcome<Table> {
    let keys: &[String] = key_columns.unwrap_or(table.columns());

    let mut outcome = Outcome::ok(());
    let absent: Vec<String> = keys.iter().filter(|k| !table.has_column(k)).cloned().collect();
    if !absent.is_empty() {
        outcome.push_notice(Notice::MissingColumns {
            operation: "remove duplicates",
            columns: absent,
            available: table.columns().to_vec(),
        });
    }

    let mut seen: HashSet<Vec<&str>> = HashSet::new();
    let rows = table
        .iter_rows()
        .filter(|&row| {
            let key: Vec<&str> = keys.iter().map(|k| cell(row, k).as_str()).collect();
            seen.insert(key)
        })
        .cloned()
        .collect();

    outcome.map(|_| Table::from_parts(table.columns().to_vec(), rows))
}

// ============================================================================
// Missing values
// ============================================================================

/// How [`fill_missing_values`] chooses replacements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "method", content = "value")]
pub enum FillMethod {
    /// Carry the last value seen scanning down.
    Forward,
    /// Carry the last value seen scanning up.
    Backward,
    /// Mean of the parseable values.
    Mean,
    /// Median of the parseable values.
    Median,
    /// The literal `"0"`.
    Zero,
    /// A caller-supplied literal.
    Custom(String),
}

/// Fill the missing cells of `column`.
///
/// Forward and backward fills start from an empty carry value, so a run of
/// missing cells at the start (forward) or end (backward) stays missing.
/// Mean and median are a no-op when no cell parses as a number.
pub fn fill_missing_values(table: &Table, column: &str, method: &FillMethod) -> Outcome<Table> {
    const OP: &str = "fill missing";

    if !table.has_column(column) {
        return missing_column(OP, table, column);
    }

    let fill = |value: &CellValue, with: &CellValue| {
        if value.is_missing() {
            with.clone()
        } else {
            value.clone()
        }
    };

    let table = match method {
        FillMethod::Forward => {
            let mut carry = CellValue::Empty;
            map_column(table, column, |value| {
                if value.is_missing() {
                    carry.clone()
                } else {
                    carry = value.clone();
                    value.clone()
                }
            })
        }
        FillMethod::Backward => {
            let mut rows: Vec<Row> = table.rows().to_vec();
            let mut carry = CellValue::Empty;
            for row in rows.iter_mut().rev() {
                let value = cell(row, column).clone();
                if value.is_missing() {
                    row.insert(column.to_string(), carry.clone());
                } else {
                    carry = value;
                }
            }
            Table::from_parts(table.columns().to_vec(), rows)
        }
        FillMethod::Mean | FillMethod::Median => {
            let mut numbers: Vec<f64> = table.column_values(column).filter_map(CellValue::as_number).collect();
            if numbers.is_empty() {
                return Outcome::with_notice(
                    table.clone(),
                    Notice::NoNumericValues {
                        operation: OP,
                        column: column.to_string(),
                    },
                );
            }
            let value = if *method == FillMethod::Mean {
                mean(&numbers)
            } else {
                median(&mut numbers)
            };
            let with = CellValue::text(format_number(value));
            map_column(table, column, |v| fill(v, &with))
        }
        FillMethod::Zero => {
            let with = CellValue::from("0");
            map_column(table, column, |v| fill(v, &with))
        }
        FillMethod::Custom(literal) => {
            let with = CellValue::text(literal.clone());
            map_column(table, column, |v| fill(v, &with))
        }
    };

    Outcome::ok(table)
}

pub(crate) fn mean(numbers: &[f64]) -> f64 {
    numbers.iter().sum::<f64>() / numbers.len() as f64
}

/// Median of a non-empty slice; sorts it in place.
pub(crate) fn median(numbers: &mut [f64]) -> f64 {
    numbers.sort_by(|a, b| a.total_cmp(b));
    let n = numbers.len();
    if n % 2 == 0 {
        (numbers[n / 2 - 1] + numbers[n / 2]) / 2.0
    } else {
        numbers[n / 2]
    }
}

// ============================================================================
// Text
// ============================================================================

/// Per-cell text operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextOperation {
    Uppercase,
    Lowercase,
    /// Title-case each space-separated word.
    Capitalize,
    Trim,
}

impl TextOperation {
    pub fn apply(&self, value: &str) -> String {
        match self {
            TextOperation::Uppercase => value.to_uppercase(),
            TextOperation::Lowercase => value.to_lowercase(),
            TextOperation::Capitalize => value
                .split(' ')
                .map(capitalize_word)
                .collect::<Vec<_>>()
                .join(" "),
            TextOperation::Trim => value.trim().to_string(),
        }
    }
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Apply `operation` to every cell of `column`.
pub fn transform_text(table: &Table, column: &str, operation: TextOperation) -> Outcome<Table> {
    if !table.has_column(column) {
        return missing_column("transform text", table, column);
    }
    Outcome::ok(map_column(table, column, |v| CellValue::text(operation.apply(v.as_str()))))
}

// ============================================================================
// Column splitting and merging
// ============================================================================

fn split_parts<'a>(value: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        value.char_indices().map(|(i, c)| &value[i..i + c.len_utf8()]).collect()
    } else {
        value.split(delimiter).collect()
    }
}

/// Split `column` on `delimiter` into `{column}_1..N`, inserted right after
/// the source column, which is kept.
///
/// N is the part count of the first row's value. Rows with fewer parts get
/// empty cells; rows with more parts lose the extras.
///
/// ```
/// use datamanip::split_column;
/// use datamanip::table::table_of;
///
/// let table = table_of(&["name", "id"], &[&["Ada Lovelace", "1"], &["Alan", "2"]]);
/// let split = split_column(&table, "name", " ").value;
///
/// assert_eq!(split.columns(), &["name", "name_1", "name_2", "id"]);
/// assert!(split.get_value(1, "name_2").unwrap().is_missing());
/// ```
pub fn split_column(table: &Table, column: &str, delimiter: &str) -> Outcome<Table> {
    split_column_into(table, column, delimiter, None)
}

/// [`split_column`] with explicit names for the new columns. When `names` is
/// given its length decides the part count.
pub fn split_column_into(
    table: &Table,
    column: &str,
    delimiter: &str,
    names: Option<&[String]>,
) -> Outcome<Table> {
    const OP: &str = "split column";

    let Some(index) = table.column_index(column) else {
        return missing_column(OP, table, column);
    };
    let Some(first) = table.rows().first() else {
        return Outcome::with_notice(table.clone(), Notice::EmptyTable { operation: OP });
    };

    let wanted: Vec<String> = match names {
        Some(names) => names.to_vec(),
        None => {
            let parts = split_parts(cell(first, column).as_str(), delimiter).len();
            (1..=parts).map(|i| format!("{}_{}", column, i)).collect()
        }
    };

    let mut taken = table.columns().to_vec();
    let mut new_columns = Vec::with_capacity(wanted.len());
    for name in &wanted {
        let name = unique_column_name(&taken, name);
        taken.push(name.clone());
        new_columns.push(name);
    }

    let mut columns = table.columns().to_vec();
    columns.splice(index + 1..index + 1, new_columns.iter().cloned());

    let rows = table
        .iter_rows()
        .map(|row| {
            let mut row = row.clone();
            let parts = split_parts(cell(&row, column).as_str(), delimiter)
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>();
            for (i, name) in new_columns.iter().enumerate() {
                let part = parts.get(i).cloned().unwrap_or_default();
                row.insert(name.clone(), CellValue::text(part));
            }
            row
        })
        .collect();

    Outcome::ok(Table::from_parts(columns, rows))
}

/// Replace `merge` columns with a single `new_column` holding their values
/// joined by `delimiter`. The new column is appended at the end.
pub fn merge_columns(table: &Table, merge: &[String], new_column: &str, delimiter: &str) -> Outcome<Table> {
    const OP: &str = "merge columns";

    let absent: Vec<String> = merge.iter().filter(|c| !table.has_column(c)).cloned().collect();
    if !absent.is_empty() {
        return Outcome::with_notice(
            table.clone(),
            Notice::MissingColumns {
                operation: OP,
                columns: absent,
                available: table.columns().to_vec(),
            },
        );
    }

    let mut columns: Vec<String> = table
        .columns()
        .iter()
        .filter(|c| !merge.contains(c))
        .cloned()
        .collect();
    if columns.iter().any(|c| c == new_column) {
        return Outcome::with_notice(
            table.clone(),
            Notice::DuplicateColumn {
                operation: OP,
                column: new_column.to_string(),
            },
        );
    }
    columns.push(new_column.to_string());

    let rows = table
        .iter_rows()
        .map(|row| {
            let joined = merge
                .iter()
                .map(|c| cell(row, c).as_str())
                .collect::<Vec<_>>()
                .join(delimiter);
            let mut out: Row = row
                .iter()
                .filter(|(k, _)| !merge.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            out.insert(new_column.to_string(), CellValue::text(joined));
            out
        })
        .collect();

    Outcome::ok(Table::from_parts(columns, rows))
}

// ============================================================================
// Transpose
// ============================================================================

/// Swap rows and columns. The result has a `Field` column naming the source
/// columns followed by `Row 1..N`, one per source row. A table without rows
/// transposes to an empty table.
pub fn transpose(table: &Table) -> Table {
    if table.is_empty() {
        return Table::default();
    }

    let row_labels: Vec<String> = (1..=table.len()).map(|i| format!("Row {}", i)).collect();
    let mut columns = Vec::with_capacity(row_labels.len() + 1);
    columns.push("Field".to_string());
    columns.extend(row_labels.iter().cloned());

    let rows = table
        .columns()
        .iter()
        .map(|col| {
            let mut row = Row::with_capacity(columns.len());
            row.insert("Field".to_string(), CellValue::text(col.clone()));
            for (label, source) in row_labels.iter().zip(table.iter_rows()) {
                row.insert(label.clone(), cell(source, col).clone());
            }
            row
        })
        .collect();

    Table::from_parts(columns, rows)
}

// ============================================================================
// Numeric columns
// ============================================================================

/// Scaling used by [`normalize_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizeMethod {
    /// `(v - min) / (max - min)`
    MinMax,
    /// `(v - mean) / stdDev`, population standard deviation.
    ZScore,
}

/// Rescale the parseable cells of `column`, written with 4 decimals.
/// Cells that do not parse are left alone.
pub fn normalize_column(table: &Table, column: &str, method: NormalizeMethod) -> Outcome<Table> {
    const OP: &str = "normalize";

    if !table.has_column(column) {
        return missing_column(OP, table, column);
    }

    let numbers: Vec<f64> = table.column_values(column).filter_map(CellValue::as_number).collect();
    if numbers.is_empty() {
        return Outcome::with_notice(
            table.clone(),
            Notice::NoNumericValues {
                operation: OP,
                column: column.to_string(),
            },
        );
    }

    let (offset, scale) = match method {
        NormalizeMethod::MinMax => {
            let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
            let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (min, max - min)
        }
        NormalizeMethod::ZScore => {
            let m = mean(&numbers);
            let variance = numbers.iter().map(|v| (v - m).powi(2)).sum::<f64>() / numbers.len() as f64;
            (m, variance.sqrt())
        }
    };

    if scale == 0.0 {
        return Outcome::with_notice(
            table.clone(),
            Notice::DegenerateRange {
                operation: OP,
                column: column.to_string(),
            },
        );
    }

    Outcome::ok(map_column(table, column, |v| match v.as_number() {
        Some(n) => CellValue::text(to_fixed((n - offset) / scale, 4)),
        None => v.clone(),
    }))
}

/// Round the parseable cells of `column` to `decimals` fixed decimals.
pub fn round_column(table: &Table, column: &str, decimals: usize) -> Outcome<Table> {
    if !table.has_column(column) {
        return missing_column("round", table, column);
    }

    Outcome::ok(map_column(table, column, |v| match v.as_number() {
        Some(n) => CellValue::text(to_fixed(n, decimals)),
        None => v.clone(),
    }))
}

/// Append `name` computed from `expression` for every row.
///
/// The expression is arithmetic over numbers and `[column]` references; see
/// [`crate::formula`]. Results that are not a number become empty cells. An
/// expression that cannot be parsed, or that references an unknown column,
/// writes `Error` into every row.
pub fn add_calculated_column(table: &Table, name: &str, expression: &str) -> Outcome<Table> {
    const OP: &str = "calculated column";

    if table.has_column(name) {
        return Outcome::with_notice(
            table.clone(),
            Notice::DuplicateColumn {
                operation: OP,
                column: name.to_string(),
            },
        );
    }

    let mut columns = table.columns().to_vec();
    columns.push(name.to_string());

    let parsed = formula::parse_formula(expression).and_then(|f| {
        match f.columns().into_iter().find(|c| !table.has_column(c)) {
            Some(unknown) => Err(format!("unknown column [{}]", unknown)),
            None => Ok(f),
        }
    });

    let mut outcome = Outcome::ok(());
    let rows = match parsed {
        Ok(f) => table
            .iter_rows()
            .map(|row| {
                let result = f.eval(&|col| cell(row, col).as_number().unwrap_or(0.0));
                let value = if result.is_nan() {
                    CellValue::Empty
                } else {
                    CellValue::text(format_number(result))
                };
                let mut row = row.clone();
                row.insert(name.to_string(), value);
                row
            })
            .collect(),
        Err(reason) => {
            outcome.push_notice(Notice::InvalidFormula {
                formula: expression.to_string(),
                reason,
            });
            table
                .iter_rows()
                .map(|row| {
                    let mut row = row.clone();
                    row.insert(name.to_string(), CellValue::from("Error"));
                    row
                })
                .collect()
        }
    };

    outcome.map(|_| Table::from_parts(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::table_of;

    fn column<'a>(table: &'a Table, name: &'a str) -> Vec<&'a str> {
        table.column_values(name).map(|c| c.as_str()).collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    // ---- remove_duplicates ----

    #[test]
    fn test_remove_duplicates_all_columns() {
        let table = table_of(&["a", "b"], &[&["1", "x"], &["1", "x"], &["1", "y"], &["2", "x"], &["1", "y"]]);
        let out = remove_duplicates(&table, None).value;
        assert_eq!(column(&out, "b"), vec!["x", "y", "x"]);
        assert_eq!(column(&out, "a"), vec!["1", "1", "2"]);
    }

    #[test]
    fn test_remove_duplicates_key_columns() {
        let table = table_of(&["a", "b"], &[&["1", "x"], &["1", "y"], &["2", "z"]]);
        let keys = strings(&["a"]);
        let out = remove_duplicates(&table, Some(&keys)).value;
        assert_eq!(column(&out, "b"), vec!["x", "z"]);
    }

    #[test]
    fn test_remove_duplicates_no_separator_collision() {
        let table = table_of(&["a", "b"], &[&["x|y", "z"], &["x", "y|z"]]);
        assert_eq!(remove_duplicates(&table, None).value.len(), 2);
    }

    // ---- fill_missing_values ----

    #[test]
    fn test_fill_zero() {
        let table = table_of(&["name", "age"], &[&["bob", "30"], &["amy", ""]]);
        let out = fill_missing_values(&table, "age", &FillMethod::Zero).value;
        assert_eq!(column(&out, "age"), vec!["30", "0"]);
        // input untouched
        assert!(table.get_value(1, "age").unwrap().is_missing());
    }

    #[test]
    fn test_fill_forward_and_backward() {
        let table = table_of(&["v"], &[&[""], &["a"], &[""], &["b"], &[""]]);

        let fwd = fill_missing_values(&table, "v", &FillMethod::Forward).value;
        assert_eq!(column(&fwd, "v"), vec!["", "a", "a", "b", "b"]);

        let back = fill_missing_values(&table, "v", &FillMethod::Backward).value;
        assert_eq!(column(&back, "v"), vec!["a", "a", "b", "b", ""]);
    }

    #[test]
    fn test_fill_mean_and_median() {
        let table = table_of(&["v"], &[&["1"], &[""], &["2"], &["x"], &["6"]]);

        let mean = fill_missing_values(&table, "v", &FillMethod::Mean).value;
        assert_eq!(column(&mean, "v"), vec!["1", "3", "2", "x", "6"]);

        let median = fill_missing_values(&table, "v", &FillMethod::Median).value;
        assert_eq!(column(&median, "v"), vec!["1", "2", "2", "x", "6"]);

        let even = table_of(&["v"], &[&["1"], &["2"], &[""]]);
        let median = fill_missing_values(&even, "v", &FillMethod::Median).value;
        assert_eq!(column(&median, "v"), vec!["1", "2", "1.5"]);
    }

    #[test]
    fn test_fill_mean_without_numbers_is_noop() {
        let table = table_of(&["v"], &[&["a"], &[""]]);
        let out = fill_missing_values(&table, "v", &FillMethod::Mean);
        assert_eq!(out.value, table);
        assert!(matches!(out.notices[0], Notice::NoNumericValues { .. }));
    }

    #[test]
    fn test_fill_custom_and_missing_column() {
        let table = table_of(&["v"], &[&[""], &["b"]]);
        let out = fill_missing_values(&table, "v", &FillMethod::Custom("n/a".to_string())).value;
        assert_eq!(column(&out, "v"), vec!["n/a", "b"]);

        let out = fill_missing_values(&table, "w", &FillMethod::Zero);
        assert_eq!(out.value, table);
        assert!(!out.is_clean());
    }

    #[test]
    fn test_fill_method_serde() {
        let m: FillMethod = serde_json::from_str(r#"{"method": "custom", "value": "?"}"#).unwrap();
        assert_eq!(m, FillMethod::Custom("?".to_string()));
        let m: FillMethod = serde_json::from_str(r#"{"method": "forward"}"#).unwrap();
        assert_eq!(m, FillMethod::Forward);
    }

    // ---- transform_text ----

    #[test]
    fn test_transform_text() {
        let table = table_of(&["t"], &[&["  hello WORLD  "], &["mIxEd  case"], &[""]]);

        let up = transform_text(&table, "t", TextOperation::Uppercase).value;
        assert_eq!(column(&up, "t"), vec!["  HELLO WORLD  ", "MIXED  CASE", ""]);

        let low = transform_text(&table, "t", TextOperation::Lowercase).value;
        assert_eq!(column(&low, "t")[1], "mixed  case");

        let cap = transform_text(&table, "t", TextOperation::Capitalize).value;
        assert_eq!(column(&cap, "t"), vec!["  Hello World  ", "Mixed  Case", ""]);

        let trim = transform_text(&table, "t", TextOperation::Trim).value;
        assert_eq!(column(&trim, "t")[0], "hello WORLD");
    }

    #[test]
    fn test_transform_text_missing_column() {
        let table = table_of(&["t"], &[&["a"]]);
        let out = transform_text(&table, "nope", TextOperation::Uppercase);
        assert_eq!(out.value, table);
        assert_eq!(out.notices.len(), 1);
    }

    // ---- split / merge ----

    #[test]
    fn test_split_uses_first_row_part_count() {
        let table = table_of(&["d", "z"], &[&["a-b", "1"], &["c", "2"], &["d-e-f", "3"]]);
        let out = split_column(&table, "d", "-").value;

        assert_eq!(out.columns(), &strings(&["d", "d_1", "d_2", "z"])[..]);
        assert_eq!(column(&out, "d_1"), vec!["a", "c", "d"]);
        assert_eq!(column(&out, "d_2"), vec!["b", "", "e"]);
        // source kept, extras dropped
        assert_eq!(column(&out, "d")[2], "d-e-f");
        assert!(out.get_value(2, "d_3").is_none());
    }

    #[test]
    fn test_split_avoids_duplicate_names() {
        let table = table_of(&["d", "d_1"], &[&["a b", "keep"]]);
        let out = split_column(&table, "d", " ").value;
        assert_eq!(out.columns(), &strings(&["d", "d_1 (2)", "d_2", "d_1"])[..]);
        assert_eq!(column(&out, "d_1"), vec!["keep"]);
        assert_eq!(column(&out, "d_1 (2)"), vec!["a"]);
    }

    #[test]
    fn test_split_empty_delimiter_and_named() {
        let table = table_of(&["code"], &[&["ab"]]);
        let out = split_column(&table, "code", "").value;
        assert_eq!(column(&out, "code_2"), vec!["b"]);

        let names = strings(&["first", "second", "third"]);
        let out = split_column_into(&table, "code", "", Some(&names)).value;
        assert_eq!(column(&out, "third"), vec![""]);
    }

    #[test]
    fn test_split_noops() {
        let empty = table_of(&["a"], &[]);
        assert!(matches!(split_column(&empty, "a", ",").notices[0], Notice::EmptyTable { .. }));

        let table = table_of(&["a"], &[&["x,y"]]);
        assert_eq!(split_column(&table, "b", ",").value, table);
    }

    #[test]
    fn test_merge_columns() {
        let table = table_of(&["first", "mid", "last"], &[&["Ada", "", "Lovelace"]]);
        let merge = strings(&["first", "last"]);
        let out = merge_columns(&table, &merge, "full", " ").value;

        assert_eq!(out.columns(), &strings(&["mid", "full"])[..]);
        assert_eq!(column(&out, "full"), vec!["Ada Lovelace"]);
        assert_eq!(out.rows()[0].len(), 2);

        let clash = merge_columns(&table, &merge, "mid", " ");
        assert_eq!(clash.value, table);
        assert!(matches!(clash.notices[0], Notice::DuplicateColumn { .. }));
    }

    // ---- transpose ----

    #[test]
    fn test_transpose() {
        let table = table_of(&["name", "age"], &[&["bob", "30"], &["amy", ""]]);
        let t = transpose(&table);

        assert_eq!(t.columns(), &strings(&["Field", "Row 1", "Row 2"])[..]);
        assert_eq!(column(&t, "Field"), vec!["name", "age"]);
        assert_eq!(column(&t, "Row 2"), vec!["amy", ""]);
    }

    #[test]
    fn test_transpose_empty() {
        let table = table_of(&["a", "b"], &[]);
        let t = transpose(&table);
        assert!(t.is_empty());
        assert_eq!(t.column_count(), 0);
    }

    // ---- numeric columns ----

    #[test]
    fn test_normalize_min_max() {
        let table = table_of(&["v"], &[&["10"], &["20"], &["n/a"], &["30"]]);
        let out = normalize_column(&table, "v", NormalizeMethod::MinMax).value;
        assert_eq!(column(&out, "v"), vec!["0.0000", "0.5000", "n/a", "1.0000"]);
    }

    #[test]
    fn test_normalize_z_score() {
        let table = table_of(&["v"], &[&["2"], &["4"], &["4"], &["4"], &["5"], &["5"], &["7"], &["9"]]);
        let out = normalize_column(&table, "v", NormalizeMethod::ZScore).value;
        assert_eq!(column(&out, "v")[0], "-1.5000");
        assert_eq!(column(&out, "v")[7], "2.0000");
    }

    #[test]
    fn test_normalize_constant_column_is_noop() {
        let table = table_of(&["v"], &[&["3"], &["3"]]);
        let out = normalize_column(&table, "v", NormalizeMethod::MinMax);
        assert_eq!(out.value, table);
        assert!(matches!(out.notices[0], Notice::DegenerateRange { .. }));
    }

    #[test]
    fn test_round_column() {
        let table = table_of(&["v"], &[&["3.14159"], &["x"], &["2"]]);
        let out = round_column(&table, "v", 2).value;
        assert_eq!(column(&out, "v"), vec!["3.14", "x", "2.00"]);
    }

    #[test]
    fn test_round_column_ties_round_up() {
        let table = table_of(&["v"], &[&["2.5"], &["0.5"], &["-1.5"]]);
        let out = round_column(&table, "v", 0).value;
        assert_eq!(column(&out, "v"), vec!["3", "1", "-2"]);
    }

    #[test]
    fn test_calculated_column() {
        let table = table_of(&["price", "qty"], &[&["2.5", "4"], &["x", "3"], &["1", "0"]]);
        let out = add_calculated_column(&table, "total", "[price] * [qty]").value;
        assert_eq!(column(&out, "total"), vec!["10", "0", "0"]);

        let ratio = add_calculated_column(&table, "ratio", "[price] / [qty]").value;
        assert_eq!(column(&ratio, "ratio")[2], "Infinity");
    }

    #[test]
    fn test_calculated_column_errors() {
        let table = table_of(&["a"], &[&["1"], &["2"]]);

        let out = add_calculated_column(&table, "b", "[a] +");
        assert_eq!(column(&out.value, "b"), vec!["Error", "Error"]);
        assert!(matches!(out.notices[0], Notice::InvalidFormula { .. }));

        let out = add_calculated_column(&table, "b", "[zzz] * 2");
        assert_eq!(column(&out.value, "b"), vec!["Error", "Error"]);

        let out = add_calculated_column(&table, "a", "1");
        assert_eq!(out.value, table);
    }
}
