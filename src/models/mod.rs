// models/mod.rs - Per-entity inputs, list views and public projections
//
// Each entity module declares:
//   * an input struct deserialized from the admin form and validated into field errors
//   * the admin list TableConfig and columns
//   * the public projection (where the entity has a public page)

pub mod news;
pub mod organizations;
pub mod people;
pub mod projects;
pub mod topics;
pub mod validate;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::services::{EntityKind, FieldErrors, Fields, ServiceError};
use crate::table::{ActionButton, ActionColumn, ActionKind, Cell, Column, DataColumn, TableConfig, Tone};

pub use news::{NewsInput, PublicNews};
pub use organizations::OrganizationInput;
pub use people::{PersonInput, PublicPerson};
pub use projects::{ProjectInput, PublicProject};
pub use topics::TopicInput;
pub use validate::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

impl Mode {
    pub fn creating(&self) -> bool {
        matches!(self, Mode::Create)
    }
}

pub trait EntityInput: DeserializeOwned {
    fn validate(&self, mode: Mode) -> FieldErrors;

    /// Column map with only the fields that were sent. Blank text becomes `null`.
    fn into_fields(self, mode: Mode) -> Fields;
}

pub fn parse_input<I: EntityInput>(body: Value, mode: Mode) -> Result<Fields, ServiceError> {
    let input: I = serde_json::from_value(body).map_err(|e| ServiceError::Validation {
        message: format!("Invalid input: {}", e),
        field_errors: FieldErrors::new(),
    })?;
    let errors = input.validate(mode);
    if !errors.is_empty() {
        return Err(ServiceError::validation(errors));
    }
    Ok(input.into_fields(mode))
}

/// Validated column map for `kind` from a JSON request body.
pub fn parse_fields(kind: EntityKind, body: Value, mode: Mode) -> Result<Fields, ServiceError> {
    match kind {
        EntityKind::People => parse_input::<PersonInput>(body, mode),
        EntityKind::Projects => parse_input::<ProjectInput>(body, mode),
        EntityKind::Topics => parse_input::<TopicInput>(body, mode),
        EntityKind::News => parse_input::<NewsInput>(body, mode),
        EntityKind::Organizations => parse_input::<OrganizationInput>(body, mode),
    }
}

/// Admin list config for `kind`.
pub fn table_config(kind: EntityKind) -> TableConfig {
    match kind {
        EntityKind::People => people::table_config(),
        EntityKind::Projects => projects::table_config(),
        EntityKind::Topics => topics::table_config(),
        EntityKind::News => news::table_config(),
        EntityKind::Organizations => organizations::table_config(),
    }
}

/// Admin list columns for `kind`, action column last.
pub fn admin_columns(kind: EntityKind) -> Vec<Column<Value>> {
    let mut columns = match kind {
        EntityKind::People => people::columns(),
        EntityKind::Projects => projects::columns(),
        EntityKind::Topics => topics::columns(),
        EntityKind::News => news::columns(),
        EntityKind::Organizations => organizations::columns(),
    };
    columns.push(status_column());
    columns.push(action_column(kind));
    columns
}

pub fn admin_href(kind: EntityKind, id: &str) -> String {
    format!("/api/admin/{}/{}", kind.slug(), id)
}

/// View and edit, then delete or restore depending on the row.
pub fn action_column(kind: EntityKind) -> Column<Value> {
    ActionColumn::new("actions", "Actions", move |row: &Value| {
        let id = row["id"].as_str().unwrap_or_default();
        let href = admin_href(kind, id);
        let mut actions = vec![
            ActionButton {
                kind: ActionKind::View,
                label: "View".to_string(),
                method: "GET",
                href: href.clone(),
            },
            ActionButton {
                kind: ActionKind::Edit,
                label: "Edit".to_string(),
                method: "PUT",
                href: href.clone(),
            },
        ];
        if row["is_deleted"] == Value::Bool(true) {
            actions.push(ActionButton {
                kind: ActionKind::Restore,
                label: "Restore".to_string(),
                method: "POST",
                href: format!("{}/restore", href),
            });
        } else {
            actions.push(ActionButton {
                kind: ActionKind::Delete,
                label: "Delete".to_string(),
                method: "DELETE",
                href,
            });
        }
        Cell::Actions { actions }
    })
    .into()
}

fn status_column() -> Column<Value> {
    DataColumn::new("is_deleted", "Status")
        .render(|value, _| match value {
            Some(Value::Bool(true)) => Cell::badge("Deleted", Tone::Danger),
            _ => Cell::badge("Active", Tone::Success),
        })
        .into()
}

pub(crate) fn yes_no(value: Option<&Value>) -> Cell {
    match value {
        Some(Value::Bool(true)) => Cell::badge("Yes", Tone::Success),
        _ => Cell::badge("No", Tone::Neutral),
    }
}

/// Builds the sent-fields map for [`EntityInput::into_fields`].
#[derive(Debug, Default)]
pub(crate) struct FieldsBuilder(Fields);

impl FieldsBuilder {
    pub fn text(mut self, key: &str, value: Option<String>) -> Self {
        if let Some(v) = value {
            let trimmed = v.trim();
            let value = if trimmed.is_empty() {
                Value::Null
            } else {
                Value::String(trimmed.to_string())
            };
            self.0.insert(key.to_string(), value);
        }
        self
    }

    pub fn value<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.0.insert(key.to_string(), v.into());
        }
        self
    }

    pub fn build(self) -> Fields {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_column_offers_restore_for_deleted_rows() {
        let column = action_column(EntityKind::People);
        let live = column.cell(&json!({ "id": "42", "is_deleted": false }));
        let deleted = column.cell(&json!({ "id": "42", "is_deleted": true }));

        match (live, deleted) {
            (Cell::Actions { actions: live }, Cell::Actions { actions: deleted }) => {
                assert_eq!(live[2].kind, ActionKind::Delete);
                assert_eq!(live[2].href, "/api/admin/people/42");
                assert_eq!(deleted[2].kind, ActionKind::Restore);
                assert_eq!(deleted[2].href, "/api/admin/people/42/restore");
            }
            other => panic!("unexpected cells: {:?}", other),
        }
    }

    #[test]
    fn every_kind_has_a_consistent_admin_view() {
        for kind in EntityKind::ALL {
            let config = table_config(kind);
            let columns = admin_columns(kind);
            assert!(config.filter_field("is_deleted").is_some(), "{} lacks deleted switch", kind);
            assert_eq!(config.initial_filters.get("is_deleted"), Some(&crate::table::FilterValue::Switch(false)));
            for column in columns.iter().filter(|c| c.is_sortable()) {
                assert!(config.is_sortable(column.key()), "{}.{} not in sortable columns", kind, column.key());
            }
            assert_eq!(columns.last().map(|c| c.key()), Some("actions"));
        }
    }

    #[test]
    fn malformed_bodies_are_validation_errors() {
        let err = parse_fields(EntityKind::Topics, json!({ "name": 3 }), Mode::Create).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));

        let err = parse_fields(EntityKind::Topics, json!({ "name": "x", "id": "forged" }), Mode::Create).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[test]
    fn blank_text_clears_the_column() {
        let fields = FieldsBuilder::default()
            .text("bio", Some("  ".into()))
            .text("city", Some(" Viedma ".into()))
            .text("skipped", None)
            .value("year", Some(2024))
            .build();
        assert_eq!(Value::Object(fields), json!({ "bio": null, "city": "Viedma", "year": 2024 }));
    }
}
