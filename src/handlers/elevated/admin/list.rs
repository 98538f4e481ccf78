// handlers/elevated/admin/list.rs - GET /api/admin/:kind handler

use axum::extract::{Path, Query, State};
use serde::Serialize;

use crate::app::AppState;
use crate::filter::ListOptions;
use crate::handlers::{parse_kind, table_state};
use crate::middleware::{ApiResponse, ApiResult};
use crate::models;
use crate::table::{DataTable, DataTableProps, EmptyState, TableQuery, TableView};

#[derive(Debug, Serialize)]
pub struct AdminList {
    pub table: TableView,
    /// Canonical query string for the rendered state, for URL sync.
    pub query: String,
}

/// Every row, deleted ones included; the deleted switch does the hiding.
pub async fn admin_list(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<AdminList> {
    let kind = parse_kind(&kind)?;
    let rows = state
        .services
        .entity(kind)
        .get_all(&ListOptions::new().include_deleted(true))
        .await?;
    let table = table_state(rows, models::table_config(kind), &pairs, &state.table)?;

    let add_href = format!("/api/admin/{}", kind.slug());
    let add_label = format!("New {}", kind.label().to_lowercase());
    let props = DataTableProps::new(models::admin_columns(kind))
        .title(kind.title())
        .on_add(add_href, add_label)
        .empty_state(EmptyState {
            description: format!("No {} match the current search or filters.", kind.title().to_lowercase()),
            ..EmptyState::default()
        })
        .page_sizes(state.table.page_sizes.clone());

    let view = DataTable::render(&props, &table);
    tracing::debug!(kind = %kind, total = table.total_items(), page = table.current_page(), "Admin list");

    Ok(ApiResponse::success(AdminList {
        table: view,
        query: TableQuery::from_state(&table).to_query_string(),
    }))
}
