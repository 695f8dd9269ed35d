// Property-based tests for the table transforms and history.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use datamanip::table::table_of;
use datamanip::*;
use proptest::prelude::*;
use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Sort keys drawn from a small pool so ties are common.
fn arb_key() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["1", "2", "10", "a", "B", "b", ""]).prop_map(str::to_string)
}

/// Arbitrary value: mostly numeric, sometimes text, sometimes empty.
fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => r"-?[0-9]{1,4}(\.[0-9]{1,2})?",
        1 => r"[a-zA-Z ]{0,8}",
        1 => Just("".to_string()),
    ]
}

/// Rows for the fixed columns `k, v, w`.
fn arb_rows(max: usize) -> impl Strategy<Value = Vec<[String; 3]>> {
    prop::collection::vec((arb_key(), arb_value(), arb_value()).prop_map(|(k, v, w)| [k, v, w]), 0..max)
}

fn build(rows: &[[String; 3]]) -> Table {
    let refs: Vec<Vec<&str>> = rows.iter().map(|r| r.iter().map(String::as_str).collect()).collect();
    let slices: Vec<&[&str]> = refs.iter().map(Vec::as_slice).collect();
    table_of(&["k", "v", "w"], &slices)
}

fn arb_condition() -> impl Strategy<Value = FilterCondition> {
    let ops = vec![
        FilterOperator::Equals,
        FilterOperator::NotEquals,
        FilterOperator::Contains,
        FilterOperator::StartsWith,
        FilterOperator::GreaterThan,
        FilterOperator::LessThan,
        FilterOperator::IsEmpty,
        FilterOperator::IsNotEmpty,
    ];
    (prop::sample::select(vec!["k", "v", "w"]), prop::sample::select(ops), arb_value())
        .prop_map(|(col, op, value)| FilterCondition::new(col, op, value))
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn sort_is_ordered_and_stable(rows in arb_rows(40), descending in any::<bool>()) {
        let order = if descending { SortOrder::Descending } else { SortOrder::Ascending };
        let table = build(&rows);
        // Tag each row with its original position.
        let mut tagged = add_calculated_column(&table, "id", "0").value;
        for i in 0..tagged.len() {
            tagged.set_value(i, "id", CellValue::text(i.to_string())).unwrap();
        }

        let sorted = sort(&tagged, "k", order).value;
        prop_assert_eq!(sorted.len(), table.len());

        for i in 1..sorted.len() {
            let a = sorted.get_value(i - 1, "k").unwrap();
            let b = sorted.get_value(i, "k").unwrap();
            let cmp = compare_cells(a, b, order);
            prop_assert_ne!(cmp, Ordering::Greater);
            if cmp == Ordering::Equal {
                let ia = sorted.get_value(i - 1, "id").unwrap().as_number().unwrap();
                let ib = sorted.get_value(i, "id").unwrap().as_number().unwrap();
                prop_assert!(ia < ib, "equal keys out of input order at {}", i);
            }
        }
    }

    #[test]
    fn filter_is_idempotent(rows in arb_rows(40), conditions in prop::collection::vec(arb_condition(), 0..3)) {
        let table = build(&rows);
        let once = apply_filter(&table, &conditions).value;
        let twice = apply_filter(&once, &conditions).value;
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn dedupe_is_idempotent(rows in arb_rows(40), by_key in any::<bool>()) {
        let table = build(&rows);
        let keys = vec!["k".to_string()];
        let key_columns = if by_key { Some(keys.as_slice()) } else { None };

        let once = remove_duplicates(&table, key_columns).value;
        let twice = remove_duplicates(&once, key_columns).value;
        prop_assert!(once.len() <= table.len());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn group_counts_cover_every_row(rows in arb_rows(40)) {
        let table = build(&rows);
        let grouped = group_by(&table, &["k".to_string()], &[Aggregation::new("v", AggregateOp::Count)]).value;

        let total: usize = grouped
            .column_values("count(v)")
            .map(|c| c.as_str().parse::<usize>().unwrap())
            .sum();
        prop_assert_eq!(total, table.len());
    }

    #[test]
    fn transpose_twice_restores_cells(rows in arb_rows(12).prop_filter("non-empty", |r| !r.is_empty())) {
        let table = build(&rows);
        let back = transpose(&transpose(&table));

        prop_assert_eq!(back.len(), table.len() + 1);
        for (i, col) in table.columns().iter().enumerate() {
            let label = format!("Row {}", i + 1);
            prop_assert_eq!(back.get_value(0, &label).unwrap().as_str(), col.as_str());
            for r in 0..table.len() {
                prop_assert_eq!(back.get_value(r + 1, &label), table.get_value(r, col));
            }
        }
    }

    #[test]
    fn history_stays_bounded(capacity in 1usize..20, saves in 1usize..60) {
        let mut history = History::with_capacity(capacity);
        for i in 0..saves {
            history.save(&table_of(&["v"], &[&[i.to_string().as_str()]]));
            prop_assert!(history.len() <= capacity);
        }

        let newest = history.current().cloned().unwrap();
        let current = table_of(&["v"], &[&["live"]]);
        let steps = history.len() - 1;
        for _ in 0..steps {
            history.undo(&current);
        }
        prop_assert_eq!(history.cursor(), Some(0));
        for _ in 0..steps {
            history.redo(&current);
        }
        prop_assert_eq!(history.current(), Some(&newest));
    }

    #[test]
    fn search_text_is_literal(
        cells in prop::collection::vec(r"[aAb.*()\[\]$]{0,8}", 1..20),
        needle in r"[aAb.*()\[\]$]{1,3}",
        match_case in any::<bool>(),
    ) {
        let refs: Vec<[&str; 1]> = cells.iter().map(|c| [c.as_str()]).collect();
        let rows: Vec<&[&str]> = refs.iter().map(|r| &r[..]).collect();
        let table = table_of(&["t"], &rows);
        let columns = vec!["t".to_string()];

        let fold = |s: &str| if match_case { s.to_string() } else { s.to_lowercase() };
        let expected = cells.iter().filter(|c| fold(c.as_str()).contains(&fold(needle.as_str()))).count();
        prop_assert_eq!(find(&table, &columns, &needle, match_case), expected);

        let result = replace_all(&table, &columns, &needle, "#", match_case);
        prop_assert_eq!(result.replaced, expected);
        prop_assert_eq!(find(&result.table, &columns, &needle, match_case), 0);
    }
}
