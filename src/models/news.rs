use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{EntityInput, FieldsBuilder, Mode, Validator};
use crate::filter::ListOptions;
use crate::services::{FieldErrors, Fields};
use crate::table::{Cell, Column, DataColumn, FilterField, FilterValue, SelectOption, SortDirection, SortState, TableConfig, Tone};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewsInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub is_published: Option<bool>,
    pub published_at: Option<String>,
    pub author_id: Option<String>,
}

impl EntityInput for NewsInput {
    fn validate(&self, mode: Mode) -> FieldErrors {
        let creating = mode.creating();
        let mut v = Validator::new();
        v.required("title", self.title.as_deref(), creating)
            .max_len("title", self.title.as_deref(), 200)
            .required("slug", self.slug.as_deref(), creating)
            .slug("slug", self.slug.as_deref())
            .max_len("summary", self.summary.as_deref(), 400)
            .required("body", self.body.as_deref(), creating)
            .max_len("body", self.body.as_deref(), 20000)
            .timestamp("published_at", self.published_at.as_deref())
            .uuid("author_id", self.author_id.as_deref());
        v.finish()
    }

    fn into_fields(self, mode: Mode) -> Fields {
        let is_published = match mode {
            Mode::Create => self.is_published.or(Some(false)),
            Mode::Update => self.is_published,
        };
        // publishing on create without a date stamps it now
        let undated = self.published_at.as_deref().map_or(true, |d| d.trim().is_empty());
        let published_at = if mode.creating() && is_published == Some(true) && undated {
            Some(Utc::now().to_rfc3339())
        } else {
            self.published_at
        };
        FieldsBuilder::default()
            .text("title", self.title)
            .text("slug", self.slug)
            .text("summary", self.summary)
            .text("body", self.body)
            .value("is_published", is_published)
            .text("published_at", published_at)
            .text("author_id", self.author_id)
            .build()
    }
}

pub fn table_config() -> TableConfig {
    TableConfig {
        initial_filters: [("is_deleted".to_string(), FilterValue::Switch(false))].into_iter().collect(),
        search_fields: vec!["title".into(), "summary".into(), "slug".into()],
        filter_fields: vec![
            FilterField::select(
                "is_published",
                "Status",
                vec![SelectOption::new("true", "Published"), SelectOption::new("false", "Draft")],
            ),
            FilterField::switch("is_deleted", "Deleted"),
        ],
        sortable_columns: vec!["title".into(), "published_at".into(), "created_at".into()],
        default_sort: Some(SortState::by("published_at", SortDirection::Desc)),
        ..Default::default()
    }
}

pub fn columns() -> Vec<Column<Value>> {
    vec![
        DataColumn::new("title", "Title").sortable().into(),
        DataColumn::new("is_published", "Status")
            .render(|value, _| match value {
                Some(Value::Bool(true)) => Cell::badge("Published", Tone::Success),
                _ => Cell::badge("Draft", Tone::Warning),
            })
            .into(),
        DataColumn::new("published_at", "Published")
            .sortable()
            .render(|value, _| {
                let date = value
                    .and_then(Value::as_str)
                    .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
                    .map(|d| d.format("%Y-%m-%d").to_string());
                Cell::text(date.unwrap_or_else(|| "-".to_string()))
            })
            .into(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicNews {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub published_at: Option<String>,
    pub author_id: Option<Uuid>,
}

pub fn public_options() -> ListOptions {
    ListOptions::new()
        .equals("is_published", true)
        .order_by("published_at", SortDirection::Desc)
}

pub fn public_config() -> TableConfig {
    TableConfig {
        search_fields: vec!["title".into(), "summary".into()],
        sortable_columns: vec!["published_at".into(), "title".into()],
        default_sort: Some(SortState::by("published_at", SortDirection::Desc)),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_input;
    use serde_json::json;

    #[test]
    fn publishing_stamps_the_date() {
        let fields = parse_input::<NewsInput>(
            json!({ "title": "Feria", "slug": "feria", "body": "...", "is_published": true }),
            Mode::Create,
        )
        .unwrap();
        let stamped = fields["published_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamped).is_ok());

        let draft = parse_input::<NewsInput>(json!({ "title": "Feria", "slug": "feria", "body": "..." }), Mode::Create).unwrap();
        assert_eq!(draft["is_published"], false);
        assert!(!draft.contains_key("published_at"));
    }

    #[test]
    fn explicit_date_is_kept() {
        let fields = parse_input::<NewsInput>(
            json!({ "title": "Feria", "slug": "feria", "body": "...", "is_published": true, "published_at": "2024-05-01T10:00:00Z" }),
            Mode::Create,
        )
        .unwrap();
        assert_eq!(fields["published_at"], "2024-05-01T10:00:00Z");

        let fields = parse_input::<NewsInput>(json!({ "is_published": true }), Mode::Update).unwrap();
        assert!(!fields.contains_key("published_at"));
    }

    #[test]
    fn date_column_shows_day_only() {
        let column = &columns()[2];
        assert_eq!(column.cell(&json!({ "published_at": "2024-05-01T10:00:00+00:00" })), Cell::text("2024-05-01"));
        assert_eq!(column.cell(&json!({ "published_at": null })), Cell::text("-"));
    }
}
