use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{yes_no, EntityInput, FieldsBuilder, Mode, Validator};
use crate::filter::ListOptions;
use crate::services::{FieldErrors, Fields};
use crate::table::{Cell, Column, DataColumn, FilterField, FilterValue, SelectOption, SortDirection, SortState, TableConfig, Tone};

pub const STATUSES: [&str; 4] = ["idea", "in_progress", "completed", "archived"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectInput {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub year: Option<i32>,
    pub topic_id: Option<String>,
    pub organization_id: Option<String>,
    pub repository_url: Option<String>,
    pub is_featured: Option<bool>,
    pub is_published: Option<bool>,
}

impl EntityInput for ProjectInput {
    fn validate(&self, mode: Mode) -> FieldErrors {
        let creating = mode.creating();
        let mut v = Validator::new();
        v.required("title", self.title.as_deref(), creating)
            .max_len("title", self.title.as_deref(), 160)
            .max_len("summary", self.summary.as_deref(), 300)
            .max_len("description", self.description.as_deref(), 5000)
            .required("status", self.status.as_deref(), creating)
            .one_of("status", self.status.as_deref(), &STATUSES)
            .range("year", self.year, 2000, 2100)
            .uuid("topic_id", self.topic_id.as_deref())
            .uuid("organization_id", self.organization_id.as_deref())
            .url("repository_url", self.repository_url.as_deref());
        v.finish()
    }

    fn into_fields(self, mode: Mode) -> Fields {
        let (is_featured, is_published) = match mode {
            Mode::Create => (self.is_featured.or(Some(false)), self.is_published.or(Some(false))),
            Mode::Update => (self.is_featured, self.is_published),
        };
        FieldsBuilder::default()
            .text("title", self.title)
            .text("summary", self.summary)
            .text("description", self.description)
            .text("status", self.status)
            .value("year", self.year)
            .text("topic_id", self.topic_id)
            .text("organization_id", self.organization_id)
            .text("repository_url", self.repository_url)
            .value("is_featured", is_featured)
            .value("is_published", is_published)
            .build()
    }
}

fn status_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("idea", "Idea"),
        SelectOption::new("in_progress", "In progress"),
        SelectOption::new("completed", "Completed"),
        SelectOption::new("archived", "Archived"),
    ]
}

fn status_tone(status: &str) -> Tone {
    match status {
        "completed" => Tone::Success,
        "in_progress" => Tone::Warning,
        "archived" => Tone::Danger,
        _ => Tone::Neutral,
    }
}

pub fn table_config() -> TableConfig {
    TableConfig {
        initial_filters: [("is_deleted".to_string(), FilterValue::Switch(false))].into_iter().collect(),
        search_fields: vec!["title".into(), "summary".into()],
        filter_fields: vec![
            FilterField::select("status", "Status", status_options()),
            FilterField::select(
                "is_published",
                "Visibility",
                vec![SelectOption::new("true", "Published"), SelectOption::new("false", "Draft")],
            ),
            FilterField::switch("is_deleted", "Deleted"),
        ],
        sortable_columns: vec!["title".into(), "status".into(), "year".into(), "created_at".into()],
        default_sort: Some(SortState::by("year", SortDirection::Desc)),
        ..Default::default()
    }
}

pub fn columns() -> Vec<Column<Value>> {
    vec![
        DataColumn::new("title", "Title").sortable().into(),
        DataColumn::new("status", "Status")
            .sortable()
            .render(|value, _| {
                let status = value.and_then(Value::as_str).unwrap_or_default();
                match status_options().into_iter().find(|o| o.value == status) {
                    Some(option) => Cell::badge(option.label, status_tone(status)),
                    None => Cell::text("-"),
                }
            })
            .into(),
        DataColumn::new("year", "Year").sortable().into(),
        DataColumn::new("is_featured", "Featured").render(|value, _| yes_no(value)).into(),
        DataColumn::new("is_published", "Published").render(|value, _| yes_no(value)).into(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProject {
    pub id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub year: Option<i32>,
    pub topic_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub repository_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

pub fn public_options() -> ListOptions {
    ListOptions::new().equals("is_published", true)
}

pub fn public_config() -> TableConfig {
    TableConfig {
        search_fields: vec!["title".into(), "summary".into()],
        filter_fields: vec![FilterField::select("status", "Status", status_options())],
        sortable_columns: vec!["title".into(), "year".into()],
        default_sort: Some(SortState::by("year", SortDirection::Desc)),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_input;
    use serde_json::json;

    #[test]
    fn new_projects_start_unpublished() {
        let fields = parse_input::<ProjectInput>(json!({ "title": "Huerta hidropónica", "status": "idea" }), Mode::Create).unwrap();
        assert_eq!(fields["is_published"], false);
        assert_eq!(fields["is_featured"], false);
    }

    #[test]
    fn rejects_unknown_status_and_bad_links() {
        let err = parse_input::<ProjectInput>(
            json!({ "title": "x", "status": "shipped", "repository_url": "github.com/x" }),
            Mode::Create,
        )
        .unwrap_err();
        match err {
            crate::services::ServiceError::Validation { field_errors, .. } => {
                assert!(field_errors.contains_key("status"));
                assert!(field_errors.contains_key("repository_url"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn status_badges_follow_progress() {
        let column = &columns()[1];
        assert_eq!(column.cell(&json!({ "status": "completed" })), Cell::badge("Completed", Tone::Success));
        assert_eq!(column.cell(&json!({ "status": "nope" })), Cell::text("-"));
    }
}
