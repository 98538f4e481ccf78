use serde_json::{json, Value};

use crate::table::types::{FilterField, TableConfig};

/// `[{n: "Ana", d: false}, {n: "Beto", d: true}, {n: "Caro", d: false}]`
pub fn scenario_rows() -> Vec<Value> {
    vec![
        json!({ "n": "Ana", "d": false }),
        json!({ "n": "Beto", "d": true }),
        json!({ "n": "Caro", "d": false }),
    ]
}

/// Search on `n`, switch filter on `d`, both sortable.
pub fn scenario_config() -> TableConfig {
    TableConfig {
        search_fields: vec!["n".into()],
        filter_fields: vec![FilterField::switch("d", "Deleted")],
        sortable_columns: vec!["n".into(), "d".into()],
        ..Default::default()
    }
}

/// String values of `key` across `rows`, in order.
pub fn names<R: std::borrow::Borrow<Value>>(rows: &[R], key: &str) -> Vec<String> {
    rows.iter()
        .map(|row| row.borrow()[key].as_str().unwrap_or_default().to_string())
        .collect()
}
