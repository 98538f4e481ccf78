use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Sentinel value that disables a filter.
pub const ALL: &str = "all";

/// Seed keys every [`FilterState`] carries.
pub const SEARCH_KEY: &str = "search";
pub const SHOW_DELETED_KEY: &str = "showDeleted";

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(format!("invalid sort direction '{}'", s))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<String>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: Some(column.into()),
            direction,
        }
    }

    pub fn is_active(&self, column: &str) -> bool {
        self.column.as_deref() == Some(column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterKind {
    Select {
        #[serde(default)]
        options: Vec<SelectOption>,
    },
    Switch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FilterKind,
}

impl FilterField {
    pub fn select(key: impl Into<String>, label: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FilterKind::Select { options },
        }
    }

    pub fn switch(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FilterKind::Switch,
        }
    }
}

/// Current value of one filter.
///
/// An absent key behaves like `undefined`: the filter is bypassed, same as `All`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    All,
    Select(String),
    Switch(bool),
}

impl FilterValue {
    pub fn is_bypass(&self) -> bool {
        matches!(self, FilterValue::All)
    }

    /// JSON form of the value, used for strict equality on switch filters.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FilterValue::All => serde_json::Value::String(ALL.to_string()),
            FilterValue::Select(s) => serde_json::Value::String(s.clone()),
            FilterValue::Switch(b) => serde_json::Value::Bool(*b),
        }
    }

    /// `String(value)` form, used for select filters.
    pub fn to_filter_string(&self) -> String {
        match self {
            FilterValue::All => ALL.to_string(),
            FilterValue::Select(s) => s.clone(),
            FilterValue::Switch(b) => b.to_string(),
        }
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterValue::All => serializer.serialize_str(ALL),
            FilterValue::Select(s) => serializer.serialize_str(s),
            FilterValue::Switch(b) => serializer.serialize_bool(*b),
        }
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) if s == ALL => Ok(FilterValue::All),
            serde_json::Value::String(s) => Ok(FilterValue::Select(s)),
            serde_json::Value::Bool(b) => Ok(FilterValue::Switch(b)),
            serde_json::Value::Number(n) => Ok(FilterValue::Select(n.to_string())),
            other => Err(de::Error::custom(format!("unsupported filter value: {}", other))),
        }
    }
}

/// Filter values keyed by filter key, always seeded with `search` and `showDeleted`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub search: String,
    #[serde(rename = "showDeleted", default)]
    pub show_deleted: bool,
    #[serde(flatten)]
    values: BTreeMap<String, FilterValue>,
}

impl FilterState {
    pub fn seeded() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<FilterValue> {
        match key {
            SEARCH_KEY => Some(FilterValue::Select(self.search.clone())),
            SHOW_DELETED_KEY => Some(FilterValue::Switch(self.show_deleted)),
            _ => self.values.get(key).cloned(),
        }
    }

    /// Shallow merge: each patched key replaces the previous value.
    pub fn merge<I>(&mut self, patch: I)
    where
        I: IntoIterator<Item = (String, FilterValue)>,
    {
        for (key, value) in patch {
            match (key.as_str(), value) {
                (SEARCH_KEY, FilterValue::Select(s)) => self.search = s,
                (SEARCH_KEY, FilterValue::All) => self.search.clear(),
                (SHOW_DELETED_KEY, FilterValue::Switch(b)) => self.show_deleted = b,
                // seed keys keep their own types
                (SEARCH_KEY | SHOW_DELETED_KEY, value) => {
                    tracing::debug!(key = %key, ?value, "ignoring mistyped filter patch");
                }
                (_, value) => {
                    self.values.insert(key, value);
                }
            }
        }
    }

    pub fn values(&self) -> &BTreeMap<String, FilterValue> {
        &self.values
    }
}

/// Declarative description of one list view.
///
/// The row collection itself is handed to [`DataTableState::new`](super::DataTableState::new)
/// next to this config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(default)]
    pub initial_filters: BTreeMap<String, FilterValue>,
    #[serde(default)]
    pub initial_sort: Option<SortState>,
    #[serde(default)]
    pub initial_page_size: Option<usize>,
    #[serde(default)]
    pub search_fields: Vec<String>,
    #[serde(default)]
    pub filter_fields: Vec<FilterField>,
    #[serde(default)]
    pub sortable_columns: Vec<String>,
    #[serde(default)]
    pub default_sort: Option<SortState>,
}

impl TableConfig {
    pub fn filter_field(&self, key: &str) -> Option<&FilterField> {
        self.filter_fields.iter().find(|f| f.key == key)
    }

    pub fn is_sortable(&self, column: &str) -> bool {
        self.sortable_columns.iter().any(|c| c == column)
    }

    pub(crate) fn starting_sort(&self) -> SortState {
        self.initial_sort
            .clone()
            .or_else(|| self.default_sort.clone())
            .unwrap_or_default()
    }

    pub(crate) fn starting_page_size(&self) -> usize {
        self.initial_page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }
}
