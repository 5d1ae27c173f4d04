//! Field-level diffs for audit entries

use serde_json::Value;

/// Fields that change on every write and would only add noise
const IGNORED_FIELDS: &[&str] = &["updated_at"];

/// Summarize top-level field changes between two snapshots
///
/// Returns `None` when nothing but ignored fields changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return (before != after)
            .then(|| format!("{} -> {}", format_value(before), format_value(after)));
    };

    let mut changes = Vec::new();

    for (key, before_val) in before_obj {
        if IGNORED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        match after_obj.get(key) {
            Some(after_val) if after_val == before_val => {}
            Some(after_val) => changes.push(format!(
                "{}: {} -> {}",
                key,
                format_value(before_val),
                format_value(after_val)
            )),
            None => changes.push(format!("{}: {} -> (removed)", key, format_value(before_val))),
        }
    }

    for (key, after_val) in after_obj {
        if !before_obj.contains_key(key) && !IGNORED_FIELDS.contains(&key.as_str()) {
            changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
        }
    }

    (!changes.is_empty()).then(|| changes.join(", "))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_fields_only() {
        let before = json!({"description": "Water", "total": 8000, "due_date": "2025-03-10"});
        let after = json!({"description": "Water", "total": 9000, "due_date": "2025-03-12"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("total: 8000 -> 9000"));
        assert!(diff.contains(r#"due_date: "2025-03-10" -> "2025-03-12""#));
        assert!(!diff.contains("description"));
    }

    #[test]
    fn test_share_list_summarized() {
        let before = json!({"shares": [{"amount": 5000}, {"amount": 5000}]});
        let after = json!({"shares": [{"amount": 3333}, {"amount": 3333}, {"amount": 3334}]});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "shares: [2 items] -> [3 items]");
    }

    #[test]
    fn test_added_and_removed() {
        let before = json!({"name": "Ana", "email": "ana@example.com"});
        let after = json!({"name": "Ana", "pix_key": "ana-pix"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains(r#"email: "ana@example.com" -> (removed)"#));
        assert!(diff.contains(r#"pix_key: (added) -> "ana-pix""#));
    }

    #[test]
    fn test_timestamp_only_change_is_none() {
        let before = json!({"name": "Ana", "updated_at": "2025-01-01T00:00:00Z"});
        let after = json!({"name": "Ana", "updated_at": "2025-02-01T00:00:00Z"});
        assert!(generate_diff(&before, &after).is_none());
    }

    #[test]
    fn test_long_string_truncated() {
        let before = json!({"description": "a".repeat(80)});
        let after = json!({"description": "short"});
        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(generate_diff(&json!(true), &json!(false)).unwrap(), "true -> false");
        assert!(generate_diff(&json!(null), &json!(null)).is_none());
    }
}
