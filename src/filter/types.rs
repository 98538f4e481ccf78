use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::table::SortDirection;

/// Server-side list query handed to an entity service.
///
/// Rows come back whole; search, select filters and pagination for admin
/// views run in memory through the table engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListOptions {
    #[serde(default)]
    pub include_deleted: bool,
    /// Column equality, compared on the text form of the value. `null` means IS NULL.
    #[serde(default)]
    pub equals: BTreeMap<String, Value>,
    #[serde(default)]
    pub order: Vec<(String, SortDirection)>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_deleted(mut self, include: bool) -> Self {
        self.include_deleted = include;
        self
    }

    pub fn equals(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equals.insert(column.into(), value.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order.push((column.into(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    /// Positional text parameters, `$1` first.
    pub params: Vec<String>,
}
