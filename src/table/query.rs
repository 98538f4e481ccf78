use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::row::TableRow;
use super::state::DataTableState;
use super::types::{FilterKind, FilterValue, SortDirection, SortState, ALL};

/// Prefix for filter keys in a query string: `f.role=alumni`.
pub const FILTER_PREFIX: &str = "f.";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableQueryError {
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Invalid value '{value}' for filter '{key}'")]
    InvalidFilterValue { key: String, value: String },

    #[error("Column '{0}' is not sortable")]
    UnsortableColumn(String),

    #[error("Invalid sort direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Table state as carried in a URL query string.
///
/// `search`, `sort`, `dir`, `page`, `page_size` and one `f.<key>` entry per
/// filter. Filter values stay raw until [`TableQuery::apply`] checks them
/// against the table's declared filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<SortDirection>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub filters: BTreeMap<String, String>,
}

impl TableQuery {
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, TableQueryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = TableQuery::default();
        for (key, value) in pairs {
            match key {
                "search" | "q" => query.search = Some(value.to_string()),
                "sort" if !value.is_empty() => query.sort = Some(value.to_string()),
                "dir" if !value.is_empty() => {
                    let dir = value
                        .parse()
                        .map_err(|_| TableQueryError::InvalidDirection(value.to_string()))?;
                    query.dir = Some(dir);
                }
                "page" => query.page = Some(parse_positive("page", value)?),
                "page_size" | "pageSize" => query.page_size = Some(parse_positive("page_size", value)?),
                other => {
                    if let Some(filter_key) = other.strip_prefix(FILTER_PREFIX) {
                        query.filters.insert(filter_key.to_string(), value.to_string());
                    }
                }
            }
        }
        Ok(query)
    }

    /// Applies the query to an engine.
    ///
    /// Order matters: filters, search, sort and page size all reset the page,
    /// so the requested page goes last.
    pub fn apply<R: TableRow>(&self, state: &mut DataTableState<R>) -> Result<(), TableQueryError> {
        let patch = self.typed_filters(state)?;
        if !patch.is_empty() {
            state.set_filters(patch);
        }
        if let Some(search) = &self.search {
            state.set_search(search.clone());
        }
        if let Some(column) = &self.sort {
            if !state.config().is_sortable(column) {
                return Err(TableQueryError::UnsortableColumn(column.clone()));
            }
            state.set_sort_state(SortState::by(column.clone(), self.dir.unwrap_or_default()));
        }
        if let Some(page_size) = self.page_size {
            state.set_page_size(page_size);
        }
        if let Some(page) = self.page {
            state.set_current_page(page);
        }
        Ok(())
    }

    fn typed_filters<R: TableRow>(&self, state: &DataTableState<R>) -> Result<Vec<(String, FilterValue)>, TableQueryError> {
        let config = state.config();
        self.filters
            .iter()
            .map(|(key, raw)| {
                let field = config
                    .filter_field(key)
                    .ok_or_else(|| TableQueryError::UnknownFilter(key.clone()))?;
                let invalid = || TableQueryError::InvalidFilterValue {
                    key: key.clone(),
                    value: raw.clone(),
                };
                let value = if raw == ALL {
                    FilterValue::All
                } else {
                    match &field.kind {
                        FilterKind::Switch => FilterValue::Switch(raw.parse().map_err(|_| invalid())?),
                        FilterKind::Select { options } => {
                            if !options.is_empty() && !options.iter().any(|o| &o.value == raw) {
                                return Err(invalid());
                            }
                            FilterValue::Select(raw.clone())
                        }
                    }
                };
                Ok((key.clone(), value))
            })
            .collect()
    }

    /// Query string for this state, `&`-joined and percent-encoded.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            serializer.append_pair("search", search);
        }
        if let Some(sort) = &self.sort {
            serializer.append_pair("sort", sort);
            serializer.append_pair("dir", self.dir.unwrap_or_default().as_str());
        }
        if let Some(page_size) = self.page_size {
            serializer.append_pair("page_size", &page_size.to_string());
        }
        if let Some(page) = self.page {
            serializer.append_pair("page", &page.to_string());
        }
        for (key, value) in &self.filters {
            serializer.append_pair(&format!("{}{}", FILTER_PREFIX, key), value);
        }
        serializer.finish()
    }

    /// Snapshot of an engine's current inputs.
    pub fn from_state<R: TableRow>(state: &DataTableState<R>) -> Self {
        let filters = state
            .config()
            .filter_fields
            .iter()
            .filter_map(|field| {
                state
                    .filters()
                    .get(&field.key)
                    .map(|value| (field.key.clone(), value.to_filter_string()))
            })
            .collect();
        Self {
            search: Some(state.search().to_string()).filter(|s| !s.is_empty()),
            sort: state.sort().column.clone(),
            dir: state.sort().column.as_ref().map(|_| state.sort().direction),
            page: Some(state.current_page()),
            page_size: Some(state.page_size()),
            filters,
        }
    }
}

fn parse_positive(field: &'static str, value: &str) -> Result<usize, TableQueryError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TableQueryError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::types::{FilterField, SelectOption, TableConfig};
    use crate::testing::names;
    use serde_json::json;

    fn people_state() -> DataTableState<serde_json::Value> {
        let config = TableConfig {
            search_fields: vec!["name".into()],
            filter_fields: vec![
                FilterField::select(
                    "role",
                    "Role",
                    vec![SelectOption::new("student", "Student"), SelectOption::new("alumni", "Alumni")],
                ),
                FilterField::switch("is_deleted", "Deleted"),
            ],
            sortable_columns: vec!["name".into()],
            ..Default::default()
        };
        let rows = vec![
            json!({ "name": "Ana", "role": "student", "is_deleted": false }),
            json!({ "name": "Beto", "role": "alumni", "is_deleted": false }),
            json!({ "name": "Carla", "role": "alumni", "is_deleted": true }),
            json!({ "name": "Dario", "role": "alumni", "is_deleted": false }),
        ];
        DataTableState::new(rows, config)
    }

    #[test]
    fn parses_pairs() {
        let query = TableQuery::from_pairs([
            ("search", "an"),
            ("sort", "name"),
            ("dir", "DESC"),
            ("page", "2"),
            ("page_size", "25"),
            ("f.role", "alumni"),
            ("ignored", "x"),
        ])
        .unwrap();
        assert_eq!(query.search.as_deref(), Some("an"));
        assert_eq!(query.dir, Some(SortDirection::Desc));
        assert_eq!(query.page, Some(2));
        assert_eq!(query.page_size, Some(25));
        assert_eq!(query.filters.get("role").map(String::as_str), Some("alumni"));
    }

    #[test]
    fn rejects_bad_numbers_and_directions() {
        assert!(matches!(
            TableQuery::from_pairs([("page", "0")]),
            Err(TableQueryError::InvalidNumber { field: "page", .. })
        ));
        assert!(matches!(
            TableQuery::from_pairs([("page_size", "ten")]),
            Err(TableQueryError::InvalidNumber { .. })
        ));
        assert!(matches!(
            TableQuery::from_pairs([("dir", "up")]),
            Err(TableQueryError::InvalidDirection(_))
        ));
    }

    #[test]
    fn requested_page_survives_the_reset_rule() {
        let mut state = people_state();
        let query = TableQuery::from_pairs([
            ("f.role", "alumni"),
            ("f.is_deleted", "false"),
            ("sort", "name"),
            ("dir", "desc"),
            ("page_size", "1"),
            ("page", "2"),
        ])
        .unwrap();
        query.apply(&mut state).unwrap();

        assert_eq!(state.current_page(), 2);
        assert_eq!(names(&state.sorted_data(), "name"), vec!["Dario", "Beto"]);
        assert_eq!(names(&state.paginated_data(), "name"), vec!["Beto"]);
    }

    #[test]
    fn validates_filters_and_sort_against_config() {
        let mut state = people_state();
        let unknown = TableQuery::from_pairs([("f.colour", "red")]).unwrap();
        assert_eq!(unknown.apply(&mut state), Err(TableQueryError::UnknownFilter("colour".into())));

        let bad_option = TableQuery::from_pairs([("f.role", "teacher")]).unwrap();
        assert!(matches!(bad_option.apply(&mut state), Err(TableQueryError::InvalidFilterValue { .. })));

        let bad_switch = TableQuery::from_pairs([("f.is_deleted", "yes")]).unwrap();
        assert!(matches!(bad_switch.apply(&mut state), Err(TableQueryError::InvalidFilterValue { .. })));

        let unsortable = TableQuery::from_pairs([("sort", "role")]).unwrap();
        assert_eq!(unsortable.apply(&mut state), Err(TableQueryError::UnsortableColumn("role".into())));

        let all = TableQuery::from_pairs([("f.role", "all")]).unwrap();
        assert!(all.apply(&mut state).is_ok());
        assert_eq!(state.total_items(), 4);
    }

    #[test]
    fn round_trips_through_query_string() {
        let mut state = people_state();
        state.set_filters([("role".to_string(), FilterValue::Select("alumni".into()))]);
        state.set_search("a b");
        state.set_sort("name");

        let query = TableQuery::from_state(&state);
        let encoded = query.to_query_string();
        assert_eq!(encoded, "search=a+b&sort=name&dir=asc&page_size=10&page=1&f.role=alumni");
    }
}
