use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{yes_no, EntityInput, FieldsBuilder, Mode, Validator};
use crate::filter::ListOptions;
use crate::services::{FieldErrors, Fields};
use crate::table::{Cell, Column, DataColumn, FilterField, FilterValue, SelectOption, SortDirection, SortState, TableConfig, Tone};

pub const ROLES: [&str; 4] = ["student", "alumni", "teacher", "staff"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub specialty: Option<String>,
    pub cohort_year: Option<i32>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub organization_id: Option<String>,
    pub is_verified: Option<bool>,
    pub is_public: Option<bool>,
}

impl EntityInput for PersonInput {
    fn validate(&self, mode: Mode) -> FieldErrors {
        let creating = mode.creating();
        let mut v = Validator::new();
        v.required("full_name", self.full_name.as_deref(), creating)
            .max_len("full_name", self.full_name.as_deref(), 120)
            .required("email", self.email.as_deref(), creating)
            .email("email", self.email.as_deref())
            .required("role", self.role.as_deref(), creating)
            .one_of("role", self.role.as_deref(), &ROLES)
            .max_len("specialty", self.specialty.as_deref(), 120)
            .range("cohort_year", self.cohort_year, 1950, 2100)
            .max_len("bio", self.bio.as_deref(), 2000)
            .url("avatar_url", self.avatar_url.as_deref())
            .uuid("organization_id", self.organization_id.as_deref());
        v.finish()
    }

    fn into_fields(self, mode: Mode) -> Fields {
        let is_public = match mode {
            Mode::Create => self.is_public.or(Some(true)),
            Mode::Update => self.is_public,
        };
        FieldsBuilder::default()
            .text("full_name", self.full_name)
            .text("email", self.email.map(|e| e.trim().to_lowercase()))
            .text("role", self.role)
            .text("specialty", self.specialty)
            .value("cohort_year", self.cohort_year)
            .text("bio", self.bio)
            .text("avatar_url", self.avatar_url)
            .text("organization_id", self.organization_id)
            .value("is_verified", self.is_verified)
            .value("is_public", is_public)
            .build()
    }
}

fn role_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("student", "Student"),
        SelectOption::new("alumni", "Alumni"),
        SelectOption::new("teacher", "Teacher"),
        SelectOption::new("staff", "Staff"),
    ]
}

pub fn table_config() -> TableConfig {
    TableConfig {
        initial_filters: [("is_deleted".to_string(), FilterValue::Switch(false))].into_iter().collect(),
        initial_sort: Some(SortState::by("full_name", SortDirection::Asc)),
        search_fields: vec!["full_name".into(), "email".into(), "specialty".into()],
        filter_fields: vec![
            FilterField::select("role", "Role", role_options()),
            FilterField::switch("is_deleted", "Deleted"),
        ],
        sortable_columns: vec![
            "full_name".into(),
            "email".into(),
            "role".into(),
            "cohort_year".into(),
            "created_at".into(),
        ],
        ..Default::default()
    }
}

pub fn columns() -> Vec<Column<Value>> {
    vec![
        DataColumn::new("full_name", "Name").sortable().into(),
        DataColumn::new("email", "Email").sortable().into(),
        DataColumn::new("role", "Role")
            .sortable()
            .render(|value, _| {
                let role = value.and_then(Value::as_str).unwrap_or_default();
                let label = role_options()
                    .into_iter()
                    .find(|o| o.value == role)
                    .map(|o| o.label)
                    .unwrap_or_else(|| "-".to_string());
                Cell::badge(label, Tone::Neutral)
            })
            .into(),
        DataColumn::new("cohort_year", "Cohort").sortable().into(),
        DataColumn::new("is_verified", "Verified").render(|value, _| yes_no(value)).into(),
    ]
}

/// Directory entry. Email stays private.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicPerson {
    pub id: Uuid,
    pub full_name: String,
    pub role: String,
    pub specialty: Option<String>,
    pub cohort_year: Option<i32>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub organization_id: Option<Uuid>,
    #[serde(default)]
    pub is_verified: bool,
}

pub fn public_options() -> ListOptions {
    ListOptions::new().equals("is_public", true)
}

pub fn public_config() -> TableConfig {
    TableConfig {
        initial_sort: Some(SortState::by("full_name", SortDirection::Asc)),
        search_fields: vec!["full_name".into(), "specialty".into()],
        filter_fields: vec![FilterField::select("role", "Role", role_options())],
        sortable_columns: vec!["full_name".into(), "cohort_year".into()],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_input;
    use crate::services::ServiceError;
    use serde_json::json;

    #[test]
    fn create_requires_identity_fields() {
        let err = parse_input::<PersonInput>(json!({ "bio": "hola" }), Mode::Create).unwrap_err();
        match err {
            ServiceError::Validation { field_errors, .. } => {
                assert_eq!(
                    field_errors.keys().collect::<Vec<_>>(),
                    vec!["email", "full_name", "role"]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn create_normalizes_and_defaults() {
        let fields = parse_input::<PersonInput>(
            json!({ "full_name": " Ana Paz ", "email": "Ana@Escuela.EDU.ar", "role": "alumni", "cohort_year": 2019 }),
            Mode::Create,
        )
        .unwrap();
        assert_eq!(fields["full_name"], "Ana Paz");
        assert_eq!(fields["email"], "ana@escuela.edu.ar");
        assert_eq!(fields["is_public"], true);
        assert!(!fields.contains_key("bio"));
    }

    #[test]
    fn update_validates_only_sent_fields() {
        let fields = parse_input::<PersonInput>(json!({ "specialty": "Electromecánica" }), Mode::Update).unwrap();
        assert_eq!(fields.len(), 1);

        let err = parse_input::<PersonInput>(json!({ "role": "principal" }), Mode::Update).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field_errors, .. } if field_errors.contains_key("role")));
    }

    #[test]
    fn public_projection_hides_email() {
        let row = json!({
            "id": Uuid::new_v4(),
            "full_name": "Ana",
            "email": "ana@escuela.edu.ar",
            "role": "student",
            "is_public": true,
            "is_deleted": false
        });
        let person: PublicPerson = serde_json::from_value(row).unwrap();
        let wire = serde_json::to_value(&person).unwrap();
        assert!(wire.get("email").is_none());
        assert_eq!(wire["full_name"], "Ana");
    }
}
