//! Row filtering by AND-ed column conditions.
//!
//! Conditions compare the lower-cased text of a cell with the lower-cased
//! condition value. `GreaterThan`/`LessThan` need both sides to parse as
//! numbers; rows where either side does not parse are dropped rather than
//! treated as an error.
//!
//! # Examples
//!
//! ```
//! use datamanip::{apply_filter, FilterCondition, FilterOperator};
//! use datamanip::table::table_of;
//!
//! let table = table_of(&["name", "score"], &[&["Alice", "95"], &["Bob", "80"]]);
//! let cond = FilterCondition::new("score", FilterOperator::GreaterThan, "90");
//!
//! let filtered = apply_filter(&table, &[cond]).value;
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered.get_value(0, "name").unwrap().as_str(), "Alice");
//! ```

use crate::cell::parse_number;
use crate::diagnostic::{Notice, Outcome};
use crate::table::{cell, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison applied by a [`FilterCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "not-equals",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "starts-with",
            FilterOperator::EndsWith => "ends-with",
            FilterOperator::GreaterThan => "greater-than",
            FilterOperator::LessThan => "less-than",
            FilterOperator::IsEmpty => "is-empty",
            FilterOperator::IsNotEmpty => "is-not-empty",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = String;

    /// Accepts the kebab-case operator names used by form inputs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equals" => Ok(FilterOperator::Equals),
            "not-equals" => Ok(FilterOperator::NotEquals),
            "contains" => Ok(FilterOperator::Contains),
            "starts-with" => Ok(FilterOperator::StartsWith),
            "ends-with" => Ok(FilterOperator::EndsWith),
            "greater-than" => Ok(FilterOperator::GreaterThan),
            "less-than" => Ok(FilterOperator::LessThan),
            "is-empty" => Ok(FilterOperator::IsEmpty),
            "is-not-empty" => Ok(FilterOperator::IsNotEmpty),
            _ => Err(format!("Unknown filter operator: '{}'", s)),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One filter condition. `value` is ignored by the emptiness operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub column: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: String,
}

impl FilterCondition {
    pub fn new(column: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        FilterCondition {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Test a lower-cased cell against this condition. `needle` is the
    /// lower-cased condition value.
    fn matches(&self, cell_value: &str, needle: &str) -> bool {
        match self.operator {
            FilterOperator::Equals => cell_value == needle,
            FilterOperator::NotEquals => cell_value != needle,
            FilterOperator::Contains => cell_value.contains(needle),
            FilterOperator::StartsWith => cell_value.starts_with(needle),
            FilterOperator::EndsWith => cell_value.ends_with(needle),
            FilterOperator::GreaterThan => match (parse_number(cell_value), parse_number(needle)) {
                (Some(a), Some(b)) => a > b,
                _ => false,
            },
            FilterOperator::LessThan => match (parse_number(cell_value), parse_number(needle)) {
                (Some(a), Some(b)) => a < b,
                _ => false,
            },
            FilterOperator::IsEmpty => cell_value.is_empty(),
            FilterOperator::IsNotEmpty => !cell_value.is_empty(),
        }
    }
}

/// Keep the rows matching every condition. An empty condition list returns
/// the table unchanged.
pub fn apply_filter(table: &Table, conditions: &[FilterCondition]) -> Outcome<Table> {
    if conditions.is_empty() {
        return Outcome::ok(table.clone());
    }

    let mut outcome = Outcome::ok(());
    for cond in conditions {
        if !table.has_column(&cond.column) {
            outcome.push_notice(Notice::MissingColumn {
                operation: "filter",
                column: cond.column.clone(),
                available: table.columns().to_vec(),
            });
        }
    }

    let needles: Vec<String> = conditions.iter().map(|c| c.value.to_lowercase()).collect();

    let rows = table
        .iter_rows()
        .filter(|row| {
            conditions.iter().zip(&needles).all(|(cond, needle)| {
                let value = cell(row, &cond.column).as_str().to_lowercase();
                cond.matches(&value, needle)
            })
        })
        .cloned()
        .collect();

    outcome.map(|_| Table::from_parts(table.columns().to_vec(), rows))
}

/// The active filter conditions of one sheet, held by the caller rather than
/// in global state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    conditions: Vec<FilterCondition>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Append a condition and return the updated list.
    pub fn add(&mut self, condition: FilterCondition) -> &[FilterCondition] {
        self.conditions.push(condition);
        &self.conditions
    }

    /// Remove the condition at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<FilterCondition> {
        if index < self.conditions.len() {
            Some(self.conditions.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.conditions.clear();
    }

    /// Filter `table` with the current conditions.
    pub fn apply(&self, table: &Table) -> Outcome<Table> {
        apply_filter(table, &self.conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::table_of;

    fn people() -> Table {
        table_of(
            &["name", "city", "age"],
            &[
                &["Alice", "Boston", "34"],
                &["bob", "austin", "27"],
                &["Carol", "", "n/a"],
                &["dave", "BOSTON", "41"],
            ],
        )
    }

    fn names(table: &Table) -> Vec<&str> {
        table.column_values("name").map(|c| c.as_str()).collect()
    }

    #[test]
    fn test_empty_conditions_is_identity() {
        let table = people();
        let out = apply_filter(&table, &[]);
        assert!(out.is_clean());
        assert_eq!(out.value, table);
    }

    #[test]
    fn test_string_operators_ignore_case() {
        let table = people();

        let eq = FilterCondition::new("city", FilterOperator::Equals, "boston");
        assert_eq!(names(&apply_filter(&table, &[eq]).value), vec!["Alice", "dave"]);

        let ne = FilterCondition::new("city", FilterOperator::NotEquals, "Boston");
        assert_eq!(names(&apply_filter(&table, &[ne]).value), vec!["bob", "Carol"]);

        let starts = FilterCondition::new("name", FilterOperator::StartsWith, "B");
        assert_eq!(names(&apply_filter(&table, &[starts]).value), vec!["bob"]);

        let ends = FilterCondition::new("city", FilterOperator::EndsWith, "TIN");
        assert_eq!(names(&apply_filter(&table, &[ends]).value), vec!["bob"]);

        let contains = FilterCondition::new("name", FilterOperator::Contains, "A");
        assert_eq!(names(&apply_filter(&table, &[contains]).value), vec!["Alice", "Carol", "dave"]);
    }

    #[test]
    fn test_numeric_operators_skip_unparseable() {
        let table = people();

        let gt = FilterCondition::new("age", FilterOperator::GreaterThan, "30");
        assert_eq!(names(&apply_filter(&table, &[gt]).value), vec!["Alice", "dave"]);

        let lt = FilterCondition::new("age", FilterOperator::LessThan, "100");
        assert_eq!(names(&apply_filter(&table, &[lt]).value), vec!["Alice", "bob", "dave"]);

        let bad_value = FilterCondition::new("age", FilterOperator::LessThan, "old");
        assert!(apply_filter(&table, &[bad_value]).value.is_empty());
    }

    #[test]
    fn test_emptiness_ignores_value() {
        let table = people();

        let empty = FilterCondition::new("city", FilterOperator::IsEmpty, "ignored");
        assert_eq!(names(&apply_filter(&table, &[empty]).value), vec!["Carol"]);

        let not_empty = FilterCondition::new("city", FilterOperator::IsNotEmpty, "");
        assert_eq!(apply_filter(&table, &[not_empty]).value.len(), 3);
    }

    #[test]
    fn test_conditions_are_anded() {
        let table = people();
        let conds = vec![
            FilterCondition::new("city", FilterOperator::Equals, "boston"),
            FilterCondition::new("age", FilterOperator::GreaterThan, "40"),
        ];
        assert_eq!(names(&apply_filter(&table, &conds).value), vec!["dave"]);
    }

    #[test]
    fn test_missing_column_reads_as_empty() {
        let table = people();
        let cond = FilterCondition::new("zip", FilterOperator::IsEmpty, "");
        let out = apply_filter(&table, &[cond]);

        assert_eq!(out.value.len(), 4);
        assert!(matches!(out.notices[0], Notice::MissingColumn { ref column, .. } if column == "zip"));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let table = people();
        let before = table.clone();
        let cond = FilterCondition::new("name", FilterOperator::Equals, "bob");
        let _ = apply_filter(&table, &[cond]);
        assert_eq!(table, before);
    }

    #[test]
    fn test_filter_set() {
        let mut set = FilterSet::new();
        set.add(FilterCondition::new("city", FilterOperator::Equals, "boston"));
        set.add(FilterCondition::new("name", FilterOperator::StartsWith, "d"));
        assert_eq!(set.len(), 2);
        assert_eq!(names(&set.apply(&people()).value), vec!["dave"]);

        assert!(set.remove(5).is_none());
        let removed = set.remove(1).unwrap();
        assert_eq!(removed.column, "name");
        assert_eq!(set.apply(&people()).value.len(), 2);

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_operator_names() {
        assert_eq!("greater-than".parse::<FilterOperator>(), Ok(FilterOperator::GreaterThan));
        assert!("between".parse::<FilterOperator>().is_err());

        let json = serde_json::to_string(&FilterOperator::IsNotEmpty).unwrap();
        assert_eq!(json, "\"is-not-empty\"");
        assert_eq!(FilterOperator::StartsWith.to_string(), "starts-with");
    }
}
