// handlers/mod.rs - Three access tiers
//
// Public (no auth) → Protected (session optional, read from the request)
// → Elevated (admin role required, enforced by `require_admin`)

pub mod elevated;
pub mod protected;
pub mod public;

use serde_json::Value;
use uuid::Uuid;

use crate::config::TableDefaults;
use crate::error::ApiError;
use crate::services::EntityKind;
use crate::table::{DataTableState, TableConfig, TableQuery};

/// `:kind` path segment to an entity kind; unknown kinds are 404.
pub(crate) fn parse_kind(raw: &str) -> Result<EntityKind, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("Unknown content type '{}'", raw)))
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid id '{}'", raw)))
}

/// Engine over `rows` with the request's query string applied.
///
/// The deployment default page size fills in when the view declares none,
/// and requested page sizes are capped at the configured maximum.
pub(crate) fn table_state(
    rows: Vec<Value>,
    mut config: TableConfig,
    pairs: &[(String, String)],
    defaults: &TableDefaults,
) -> Result<DataTableState<Value>, ApiError> {
    let mut query = TableQuery::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    query.page_size = query.page_size.map(|n| n.min(defaults.max_page_size.max(1)));
    config.initial_page_size.get_or_insert(defaults.default_page_size);

    let mut state = DataTableState::new(rows, config);
    query.apply(&mut state)?;
    Ok(state)
}
