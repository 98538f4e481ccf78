use serde_json::Value;

use super::error::FilterError;
use super::types::{ListOptions, SqlResult};
use crate::database::DatabaseManager;
use crate::table::row::stringify;
use crate::table::SortDirection;

/// Alias of the projected row in generated SQL.
const ROW_ALIAS: &str = "t";

/// Builds `SELECT` statements over one entity table.
///
/// Every row is projected as JSON with a computed `is_deleted` column, so the
/// same shape comes back from reads and from `RETURNING` clauses.
pub struct Filter {
    table_name: String,
    include_deleted: bool,
    equals: Vec<(String, Value)>,
    order: Vec<(String, SortDirection)>,
    limit: Option<usize>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        if !DatabaseManager::is_valid_identifier(&table_name) {
            return Err(FilterError::InvalidTableName(table_name));
        }
        Ok(Self {
            table_name,
            include_deleted: false,
            equals: vec![],
            order: vec![],
            limit: None,
        })
    }

    pub fn assign(&mut self, options: &ListOptions) -> Result<&mut Self, FilterError> {
        self.include_deleted = options.include_deleted;
        for (column, value) in &options.equals {
            self.where_equals(column, value.clone())?;
        }
        for (column, direction) in &options.order {
            self.order(column, *direction)?;
        }
        if let Some(limit) = options.limit {
            self.limit(limit)?;
        }
        Ok(self)
    }

    pub fn where_equals(&mut self, column: &str, value: Value) -> Result<&mut Self, FilterError> {
        Self::validate_column(column)?;
        self.equals.push((column.to_string(), value));
        Ok(self)
    }

    pub fn order(&mut self, column: &str, direction: SortDirection) -> Result<&mut Self, FilterError> {
        Self::validate_column(column)?;
        self.order.push((column.to_string(), direction));
        Ok(self)
    }

    pub fn limit(&mut self, limit: usize) -> Result<&mut Self, FilterError> {
        self.limit = Some(capped_limit(limit)?);
        Ok(self)
    }

    pub fn include_deleted(&mut self, include: bool) -> &mut Self {
        self.include_deleted = include;
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, params) = self.build_where_clause();
        let query = [
            format!("SELECT row_to_json({alias}) AS row", alias = ROW_ALIAS),
            format!("FROM {}", projected_source(&DatabaseManager::quote_identifier(&self.table_name))),
            where_clause,
            self.build_order_clause(),
            self.limit.map(|l| format!("LIMIT {}", l)).unwrap_or_default(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }

    fn build_where_clause(&self) -> (String, Vec<String>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if !self.include_deleted {
            conditions.push(format!("{}.\"deleted_at\" IS NULL", ROW_ALIAS));
        }
        for (column, value) in &self.equals {
            let column = format!("{}.{}", ROW_ALIAS, DatabaseManager::quote_identifier(column));
            match stringify(value) {
                None => conditions.push(format!("{} IS NULL", column)),
                Some(text) => {
                    params.push(text);
                    conditions.push(format!("{}::text = ${}", column, params.len()));
                }
            }
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), params)
        }
    }

    fn build_order_clause(&self) -> String {
        if self.order.is_empty() {
            return String::new();
        }
        let terms = self
            .order
            .iter()
            .map(|(column, direction)| {
                format!(
                    "{}.{} {} NULLS LAST",
                    ROW_ALIAS,
                    DatabaseManager::quote_identifier(column),
                    direction.to_sql()
                )
            })
            .collect::<Vec<_>>();
        format!("ORDER BY {}", terms.join(", "))
    }

    fn validate_column(column: &str) -> Result<(), FilterError> {
        if DatabaseManager::is_valid_identifier(column) {
            Ok(())
        } else {
            Err(FilterError::InvalidColumn(column.to_string()))
        }
    }
}

/// Row limit after applying `TABLE_MAX_PAGE_SIZE`. Both storage backends use it.
pub fn capped_limit(limit: usize) -> Result<usize, FilterError> {
    if limit == 0 {
        return Err(FilterError::InvalidLimit("Limit must be positive".to_string()));
    }
    let table = &crate::config::config().table;
    if limit > table.max_page_size {
        if table.debug_logging {
            tracing::warn!("Limit {} exceeds max {}, capping to max", limit, table.max_page_size);
        }
        return Ok(table.max_page_size);
    }
    Ok(limit)
}

/// `source` wrapped so each row carries `is_deleted`, aliased as the filter row.
pub(crate) fn projected_source(source: &str) -> String {
    format!(
        "(SELECT *, (\"deleted_at\" IS NOT NULL) AS \"is_deleted\" FROM {}) {}",
        source, ROW_ALIAS
    )
}

/// Selects the JSON form of every row produced by `source`.
pub(crate) fn select_json(source: &str) -> String {
    format!("SELECT row_to_json({}) AS row FROM {}", ROW_ALIAS, projected_source(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hides_deleted_rows_by_default() {
        let filter = Filter::new("people").unwrap();
        let sql = filter.to_sql();
        assert_eq!(
            sql.query,
            "SELECT row_to_json(t) AS row FROM (SELECT *, (\"deleted_at\" IS NOT NULL) AS \"is_deleted\" FROM \"people\") t WHERE t.\"deleted_at\" IS NULL"
        );
        assert!(sql.params.is_empty());
    }

    #[test]
    fn equality_binds_text_parameters() {
        let mut filter = Filter::new("news").unwrap();
        filter
            .assign(
                &ListOptions::new()
                    .equals("is_published", true)
                    .equals("author_id", Value::Null)
                    .order_by("published_at", SortDirection::Desc)
                    .limit(5),
            )
            .unwrap();
        let sql = filter.to_sql();
        assert!(sql
            .query
            .contains("WHERE t.\"deleted_at\" IS NULL AND t.\"author_id\" IS NULL AND t.\"is_published\"::text = $1"));
        assert!(sql.query.ends_with("ORDER BY t.\"published_at\" DESC NULLS LAST LIMIT 5"));
        assert_eq!(sql.params, vec!["true"]);
    }

    #[test]
    fn including_deleted_drops_the_guard() {
        let mut filter = Filter::new("topics").unwrap();
        filter.include_deleted(true);
        let sql = filter.to_sql();
        assert!(!sql.query.contains("WHERE"));
    }

    #[test]
    fn limits_are_capped_at_the_max_page_size() {
        let max = crate::config::config().table.max_page_size;
        assert_eq!(capped_limit(3).unwrap(), 3);
        assert_eq!(capped_limit(max + 1).unwrap(), max);
        assert_eq!(capped_limit(usize::MAX).unwrap(), max);

        let mut filter = Filter::new("news").unwrap();
        filter.limit(usize::MAX).unwrap();
        assert!(filter.to_sql().query.ends_with(&format!("LIMIT {}", max)));
    }

    #[test]
    fn rejects_unsafe_identifiers() {
        assert!(matches!(Filter::new("people;--"), Err(FilterError::InvalidTableName(_))));
        let mut filter = Filter::new("people").unwrap();
        assert!(matches!(
            filter.where_equals("role\" OR 1=1", json!("x")),
            Err(FilterError::InvalidColumn(_))
        ));
        assert!(matches!(filter.limit(0), Err(FilterError::InvalidLimit(_))));
    }
}
