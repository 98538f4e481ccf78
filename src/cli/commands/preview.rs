use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use crate::cli::utils::output_table;
use crate::cli::OutputFormat;
use crate::models;
use crate::services::EntityKind;
use crate::table::{Column, DataColumn, DataTable, DataTableProps, DataTableState, TableConfig, TableIntent, TableQuery};

#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[arg(help = "JSON file: an array of rows, or { \"config\": ..., \"rows\": [...] }")]
    pub file: PathBuf,

    #[arg(long, help = "Use the admin view of this content type (people, projects, topics, news, organizations)")]
    pub kind: Option<EntityKind>,

    #[arg(long, help = "Table state as a query string, e.g. 'search=ana&sort=full_name&dir=desc&f.role=alumni'")]
    pub query: Option<String>,

    #[arg(long = "intent", help = "Intent JSON applied after the query, e.g. '{\"intent\":\"sort\",\"column\":\"name\"}'")]
    pub intents: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PreviewFile {
    Rows(Vec<Value>),
    Configured {
        #[serde(default)]
        config: TableConfig,
        rows: Vec<Value>,
    },
}

pub fn handle(args: PreviewArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.file).with_context(|| format!("failed to read {}", args.file.display()))?;
    let file: PreviewFile = serde_json::from_str(&raw).with_context(|| format!("{} is not a rows file", args.file.display()))?;

    let (rows, file_config) = match file {
        PreviewFile::Rows(rows) => (rows, None),
        PreviewFile::Configured { config, rows } => (rows, Some(config)),
    };

    let (config, props) = match args.kind {
        Some(kind) => (
            file_config.unwrap_or_else(|| models::table_config(kind)),
            DataTableProps::new(models::admin_columns(kind)).title(kind.title()),
        ),
        None => {
            let config = file_config.unwrap_or_default();
            let columns = inferred_columns(&rows, &config);
            (config, DataTableProps::new(columns))
        }
    };

    let mut state = DataTableState::new(rows, config);

    if let Some(query) = &args.query {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();
        TableQuery::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?.apply(&mut state)?;
    }

    for raw_intent in &args.intents {
        let intent: TableIntent =
            serde_json::from_str(raw_intent).with_context(|| format!("invalid intent: {}", raw_intent))?;
        if !DataTable::dispatch(&props, &mut state, intent) {
            tracing::warn!("Ignored intent {}", raw_intent);
        }
    }

    let view = DataTable::render(&props, &state);
    output_table(&output_format, &view)
}

/// One plain column per key of the first row, in key order.
fn inferred_columns(rows: &[Value], config: &TableConfig) -> Vec<Column<Value>> {
    let Some(Value::Object(first)) = rows.first() else {
        return Vec::new();
    };
    first
        .keys()
        .map(|key| {
            let column = DataColumn::new(key.clone(), key.clone());
            if config.is_sortable(key) {
                column.sortable().into()
            } else {
                column.into()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preview_file_accepts_both_shapes() {
        let bare: PreviewFile = serde_json::from_value(json!([{ "name": "Ana" }])).unwrap();
        assert!(matches!(bare, PreviewFile::Rows(ref rows) if rows.len() == 1));

        let configured: PreviewFile = serde_json::from_value(json!({
            "config": { "searchFields": ["name"], "sortableColumns": ["name"] },
            "rows": [{ "name": "Ana", "year": 2020 }]
        }))
        .unwrap();
        match configured {
            PreviewFile::Configured { config, rows } => {
                let columns = inferred_columns(&rows, &config);
                assert_eq!(columns.iter().map(|c| c.key()).collect::<Vec<_>>(), vec!["name", "year"]);
                assert!(columns[0].is_sortable());
                assert!(!columns[1].is_sortable());
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }
}
