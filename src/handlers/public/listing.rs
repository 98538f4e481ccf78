// handlers/public/listing.rs - Shared list/show flow for public pages

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::ListOptions;
use crate::handlers::{parse_id, table_state};
use crate::services::{EntityKind, ServiceError};
use crate::table::row::present;
use crate::table::TableConfig;

/// One page of a public list.
#[derive(Debug, Clone, Serialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Visible rows of `kind` run through the engine, then projected to `T`.
pub(super) async fn list_public<T: DeserializeOwned>(
    state: &AppState,
    kind: EntityKind,
    options: ListOptions,
    config: TableConfig,
    pairs: &[(String, String)],
) -> Result<ListPage<T>, ApiError> {
    let rows = state.services.entity(kind).get_all(&options).await?;
    let table = table_state(rows, config, pairs, &state.table)?;

    let items = table
        .paginated_data()
        .into_iter()
        .map(|row| project(row.clone()))
        .collect::<Result<Vec<T>, _>>()?;

    tracing::debug!(kind = %kind, total = table.total_items(), page = table.current_page(), "Public list");
    Ok(ListPage {
        items,
        page: table.current_page(),
        page_size: table.page_size(),
        total_items: table.total_items(),
        total_pages: table.total_pages(),
    })
}

/// A single row, 404 unless live and flagged visible by `visible_flag`.
pub(super) async fn show_public<T: DeserializeOwned>(
    state: &AppState,
    kind: EntityKind,
    raw_id: &str,
    visible_flag: &str,
) -> Result<T, ApiError> {
    let id = parse_id(raw_id)?;
    let row = state.services.entity(kind).get_by_id(id).await?;

    let hidden = is_set(&row, "is_deleted") || !is_set(&row, visible_flag);
    if hidden {
        return Err(ServiceError::not_found(kind).into());
    }
    project(row)
}

/// True only for a boolean `true` flag; missing, null or other values are unset.
fn is_set(row: &Value, flag: &str) -> bool {
    present(row, flag) == Some(&Value::Bool(true))
}

pub(super) fn project<T: DeserializeOwned>(row: Value) -> Result<T, ApiError> {
    serde_json::from_value(row).map_err(|e| ServiceError::from(e).into())
}
