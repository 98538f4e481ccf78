use uuid::Uuid;

use crate::services::FieldErrors;

const EMAIL_MAX: usize = 254;
const SLUG_HINT: &str = "Use lowercase letters, digits and single hyphens";

/// Collects the first error per field.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Required on create; on update only when the field was sent.
    pub fn required(&mut self, field: &str, value: Option<&str>, creating: bool) -> &mut Self {
        match value {
            Some(v) if v.trim().is_empty() => self.fail(field, "This field is required"),
            None if creating => self.fail(field, "This field is required"),
            _ => {}
        }
        self
    }

    pub fn max_len(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(v) = value {
            if v.trim().chars().count() > max {
                self.fail(field, format!("Must be at most {} characters", max));
            }
        }
        self
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = non_blank(value) {
            if !is_email(v) {
                self.fail(field, "Invalid email address");
            }
        }
        self.max_len(field, value, EMAIL_MAX)
    }

    pub fn url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = non_blank(value) {
            match url::Url::parse(v) {
                Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
                _ => self.fail(field, "Must be an http(s) URL"),
            }
        }
        self
    }

    pub fn slug(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = non_blank(value) {
            if !is_slug(v) {
                self.fail(field, SLUG_HINT);
            }
        }
        self
    }

    pub fn one_of(&mut self, field: &str, value: Option<&str>, allowed: &[&str]) -> &mut Self {
        if let Some(v) = non_blank(value) {
            if !allowed.contains(&v) {
                self.fail(field, format!("Must be one of: {}", allowed.join(", ")));
            }
        }
        self
    }

    pub fn range(&mut self, field: &str, value: Option<i32>, min: i32, max: i32) -> &mut Self {
        if let Some(v) = value {
            if v < min || v > max {
                self.fail(field, format!("Must be between {} and {}", min, max));
            }
        }
        self
    }

    pub fn uuid(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = non_blank(value) {
            if v.parse::<Uuid>().is_err() {
                self.fail(field, "Invalid id");
            }
        }
        self
    }

    pub fn timestamp(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = non_blank(value) {
            if chrono::DateTime::parse_from_rfc3339(v).is_err() {
                self.fail(field, "Invalid timestamp, expected RFC 3339");
            }
        }
        self
    }

    pub fn finish(self) -> FieldErrors {
        self.errors
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

fn is_slug(value: &str) -> bool {
    !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
        && value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_depends_on_mode() {
        let mut v = Validator::new();
        v.required("name", None, true).required("city", None, false).required("kind", Some("  "), false);
        let errors = v.finish();
        assert!(errors.contains_key("name"));
        assert!(!errors.contains_key("city"));
        assert!(errors.contains_key("kind"));
    }

    #[test]
    fn keeps_first_error_per_field() {
        let mut v = Validator::new();
        v.required("email", Some(""), true).email("email", Some(""));
        assert_eq!(v.finish()["email"], "This field is required");
    }

    #[test]
    fn shapes() {
        assert!(is_email("ana@escuela.edu.ar"));
        assert!(!is_email("ana@localhost"));
        assert!(!is_email("ana escuela@x.org"));
        assert!(!is_email("@x.org"));

        assert!(is_slug("feria-de-ciencias-2024"));
        assert!(!is_slug("Feria"));
        assert!(!is_slug("feria--ciencias"));
        assert!(!is_slug("-feria"));

        let mut v = Validator::new();
        v.url("website", Some("ftp://x.org"))
            .range("year", Some(1899), 1950, 2100)
            .uuid("topic_id", Some("nope"))
            .timestamp("published_at", Some("2024-05-01T10:00:00Z"))
            .one_of("kind", Some("club"), &["company", "ngo"]);
        let errors = v.finish();
        assert_eq!(errors.len(), 4);
        assert!(!errors.contains_key("published_at"));
    }
}
