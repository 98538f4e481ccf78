use serde::Deserialize;
use serde_json::Value;

use super::{EntityInput, FieldsBuilder, Mode, Validator};
use crate::services::{FieldErrors, Fields};
use crate::table::{Column, DataColumn, FilterField, FilterValue, SortDirection, SortState, TableConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopicInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl EntityInput for TopicInput {
    fn validate(&self, mode: Mode) -> FieldErrors {
        let creating = mode.creating();
        let mut v = Validator::new();
        v.required("name", self.name.as_deref(), creating)
            .max_len("name", self.name.as_deref(), 80)
            .slug("slug", self.slug.as_deref())
            .max_len("slug", self.slug.as_deref(), 80)
            .max_len("description", self.description.as_deref(), 500);
        v.finish()
    }

    fn into_fields(self, mode: Mode) -> Fields {
        // slug falls back to the name on create
        let slug = match mode {
            Mode::Create if self.slug.is_none() => self.name.as_deref().map(slugify),
            _ => self.slug,
        };
        FieldsBuilder::default()
            .text("name", self.name)
            .text("slug", slug)
            .text("description", self.description)
            .build()
    }
}

/// Lowercase ASCII slug: accents folded, runs of other characters become one hyphen.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        let folded = match c {
            'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => 'a',
            'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'u',
            'ñ' | 'Ñ' => 'n',
            'ç' | 'Ç' => 'c',
            other => other.to_ascii_lowercase(),
        };
        if folded.is_ascii_alphanumeric() {
            slug.push(folded);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

pub fn table_config() -> TableConfig {
    TableConfig {
        initial_filters: [("is_deleted".to_string(), FilterValue::Switch(false))].into_iter().collect(),
        initial_sort: Some(SortState::by("name", SortDirection::Asc)),
        search_fields: vec!["name".into(), "slug".into(), "description".into()],
        filter_fields: vec![FilterField::switch("is_deleted", "Deleted")],
        sortable_columns: vec!["name".into(), "slug".into(), "created_at".into()],
        ..Default::default()
    }
}

pub fn columns() -> Vec<Column<Value>> {
    vec![
        DataColumn::new("name", "Name").sortable().into(),
        DataColumn::new("slug", "Slug").sortable().into(),
        DataColumn::new("description", "Description").into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_input;
    use serde_json::json;

    #[test]
    fn slugify_folds_accents_and_punctuation() {
        assert_eq!(slugify("Energías Renovables"), "energias-renovables");
        assert_eq!(slugify("  Robótica & IA!! "), "robotica-ia");
        assert_eq!(slugify("Año 2024"), "ano-2024");
    }

    #[test]
    fn slug_defaults_from_name_on_create_only() {
        let fields = parse_input::<TopicInput>(json!({ "name": "Programación" }), Mode::Create).unwrap();
        assert_eq!(fields["slug"], "programacion");

        let fields = parse_input::<TopicInput>(json!({ "name": "Programación" }), Mode::Update).unwrap();
        assert!(!fields.contains_key("slug"));
    }
}
