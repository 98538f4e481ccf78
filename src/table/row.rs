use serde_json::{Map, Value};

/// Anything the table engine can read named fields from.
///
/// A `None` return and a JSON `null` are treated the same: the field has no value.
pub trait TableRow {
    fn field(&self, key: &str) -> Option<&Value>;
}

impl TableRow for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl TableRow for Map<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl<T: TableRow> TableRow for &T {
    fn field(&self, key: &str) -> Option<&Value> {
        (*self).field(key)
    }
}

/// Field value with `null` collapsed into `None`.
pub fn present<'a, R: TableRow + ?Sized>(row: &'a R, key: &str) -> Option<&'a Value> {
    row.field(key).filter(|v| !v.is_null())
}

/// Text form of a value as JavaScript's `String(v)` would produce it.
/// Returns `None` for `null`.
pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(number_to_string(n)),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|v| stringify(v).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some("[object Object]".to_string()),
    }
}

fn number_to_string(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        // 3.0 prints as "3", like JS
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// JavaScript truthiness: `null`, missing, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stringify_follows_js_string_conversion() {
        assert_eq!(stringify(&json!("Ana")), Some("Ana".into()));
        assert_eq!(stringify(&json!(2024)), Some("2024".into()));
        assert_eq!(stringify(&json!(3.0)), Some("3".into()));
        assert_eq!(stringify(&json!(0.5)), Some("0.5".into()));
        assert_eq!(stringify(&json!(true)), Some("true".into()));
        assert_eq!(stringify(&json!(["a", null, 1])), Some("a,,1".into()));
        assert_eq!(stringify(&json!({ "a": 1 })), Some("[object Object]".into()));
        assert_eq!(stringify(&Value::Null), None);
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(is_truthy(Some(&json!("x"))));
        assert!(is_truthy(Some(&json!(7))));
        assert!(is_truthy(Some(&json!([]))));
    }

    #[test]
    fn present_hides_nulls() {
        let row = json!({ "a": null, "b": 1 });
        assert!(present(&row, "a").is_none());
        assert!(present(&row, "missing").is_none());
        assert_eq!(present(&row, "b"), Some(&json!(1)));
    }
}
