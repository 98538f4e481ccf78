use serde::Deserialize;
use serde_json::Value;

use super::{EntityInput, FieldsBuilder, Mode, Validator};
use crate::services::{FieldErrors, Fields};
use crate::table::{Cell, Column, DataColumn, FilterField, FilterValue, SelectOption, SortDirection, SortState, TableConfig};

pub const KINDS: [&str; 5] = ["company", "ngo", "government", "school", "other"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrganizationInput {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
}

impl EntityInput for OrganizationInput {
    fn validate(&self, mode: Mode) -> FieldErrors {
        let creating = mode.creating();
        let mut v = Validator::new();
        v.required("name", self.name.as_deref(), creating)
            .max_len("name", self.name.as_deref(), 160)
            .required("kind", self.kind.as_deref(), creating)
            .one_of("kind", self.kind.as_deref(), &KINDS)
            .url("website", self.website.as_deref())
            .max_len("city", self.city.as_deref(), 120)
            .max_len("description", self.description.as_deref(), 2000);
        v.finish()
    }

    fn into_fields(self, _mode: Mode) -> Fields {
        FieldsBuilder::default()
            .text("name", self.name)
            .text("kind", self.kind)
            .text("website", self.website)
            .text("city", self.city)
            .text("description", self.description)
            .build()
    }
}

fn kind_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("company", "Company"),
        SelectOption::new("ngo", "NGO"),
        SelectOption::new("government", "Government"),
        SelectOption::new("school", "School"),
        SelectOption::new("other", "Other"),
    ]
}

pub fn table_config() -> TableConfig {
    TableConfig {
        initial_filters: [("is_deleted".to_string(), FilterValue::Switch(false))].into_iter().collect(),
        initial_sort: Some(SortState::by("name", SortDirection::Asc)),
        search_fields: vec!["name".into(), "city".into()],
        filter_fields: vec![
            FilterField::select("kind", "Type", kind_options()),
            FilterField::switch("is_deleted", "Deleted"),
        ],
        sortable_columns: vec!["name".into(), "kind".into(), "city".into(), "created_at".into()],
        ..Default::default()
    }
}

pub fn columns() -> Vec<Column<Value>> {
    vec![
        DataColumn::new("name", "Name").sortable().into(),
        DataColumn::new("kind", "Type")
            .sortable()
            .render(|value, _| {
                let kind = value.and_then(Value::as_str).unwrap_or_default();
                let label = kind_options()
                    .into_iter()
                    .find(|o| o.value == kind)
                    .map(|o| o.label)
                    .unwrap_or_else(|| "-".to_string());
                Cell::text(label)
            })
            .into(),
        DataColumn::new("city", "City").sortable().into(),
        DataColumn::new("website", "Website")
            .render(|value, _| match value.and_then(Value::as_str) {
                Some(href) if !href.is_empty() => Cell::Link {
                    label: href.trim_start_matches("https://").trim_start_matches("http://").to_string(),
                    href: href.to_string(),
                },
                _ => Cell::text("-"),
            })
            .into(),
    ]
}
