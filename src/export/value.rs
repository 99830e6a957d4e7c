//! Field value rendering
//!
//! Jira returns every field in its own JSON shape: users as objects with
//! `displayName`/`accountId`, select options as objects with `value`,
//! versions and components as arrays of named objects, labels as plain
//! string arrays. This module reduces each shape to the single CSV cell
//! string the export writes.

use serde_json::Value;

use crate::config::DecimalSeparator;

/// Join rendered list items the way the original export format does:
/// `'a'|'b'|'c'`, empty string for an empty list.
fn quoted_pipe_join(items: &[String]) -> String {
    if items.is_empty() {
        String::new()
    } else {
        format!("'{}'", items.join("'|'"))
    }
}

/// Plain text and scalar fallback.
pub fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Objects carrying a human-readable `name` (issue type, priority,
/// resolution, status, ...).
pub fn id_name(value: Option<&Value>) -> String {
    text(value.and_then(|v| v.get("name")))
}

/// Select-option objects carrying a `value`.
pub fn option_value(value: Option<&Value>) -> String {
    text(value.and_then(|v| v.get("value")))
}

/// User display name (`displayName`), empty for unassigned.
pub fn user_display_name(value: Option<&Value>) -> String {
    text(value.and_then(|v| v.get("displayName")))
}

/// User account id (`accountId`), empty for unassigned.
pub fn user_account_id(value: Option<&Value>) -> String {
    text(value.and_then(|v| v.get("accountId")))
}

/// Parent issue reference, rendered as its key.
pub fn parent_key(value: Option<&Value>) -> String {
    text(value.and_then(|v| v.get("key")))
}

/// String arrays (labels).
pub fn string_array(value: Option<&Value>) -> String {
    let items: Vec<String> = match value {
        Some(Value::Array(values)) => values.iter().map(|v| text(Some(v))).collect(),
        _ => Vec::new(),
    };
    quoted_pipe_join(&items)
}

/// Arrays of named objects (components, affected/fixed versions).
pub fn named_array(value: Option<&Value>) -> String {
    let items: Vec<String> = match value {
        Some(Value::Array(values)) => values.iter().map(|v| id_name(Some(v))).collect(),
        _ => Vec::new(),
    };
    quoted_pipe_join(&items)
}

/// Numbers, formatted with the configured decimal separator.
pub fn number(value: Option<&Value>, separator: DecimalSeparator) -> String {
    match value {
        Some(Value::Number(n)) => {
            let rendered = n.to_string();
            match separator {
                DecimalSeparator::Comma => rendered.replace('.', ","),
                DecimalSeparator::Point => rendered,
            }
        }
        _ => String::new(),
    }
}

/// The Flagged field is an impediment marker: any non-null payload means
/// the flag is set.
pub fn flagged(value: Option<&Value>) -> String {
    let is_flagged = !matches!(value, None | Some(Value::Null));
    is_flagged.to_string()
}

/// Custom fields of unknown schema, dispatched by JSON shape.
pub fn custom(value: Option<&Value>, separator: DecimalSeparator) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Number(_)) => number(value, separator),
        Some(Value::Array(values)) => {
            let items: Vec<String> = values.iter().map(|v| custom(Some(v), separator)).collect();
            quoted_pipe_join(&items)
        }
        Some(Value::Object(object)) => {
            // Option objects carry `value`, users `displayName`, most other
            // references `name`.
            if let Some(v) = object.get("value") {
                text(Some(v))
            } else if let Some(v) = object.get("displayName") {
                text(Some(v))
            } else if let Some(v) = object.get("name") {
                text(Some(v))
            } else {
                Value::Object(object.clone()).to_string()
            }
        }
        other => text(other),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn users_render_name_and_account_id() {
        let user = json!({"accountId": "5b10a2844c20165700ede21g", "displayName": "Jane Doe"});

        assert_eq!(user_display_name(Some(&user)), "Jane Doe");
        assert_eq!(user_account_id(Some(&user)), "5b10a2844c20165700ede21g");
        assert_eq!(user_display_name(None), "");
        assert_eq!(user_account_id(Some(&Value::Null)), "");
    }

    #[test]
    fn labels_join_with_quoted_pipes() {
        let labels = json!(["backend", "tech-debt"]);

        assert_eq!(string_array(Some(&labels)), "'backend'|'tech-debt'");
        assert_eq!(string_array(Some(&json!([]))), "");
        assert_eq!(string_array(None), "");
    }

    #[test]
    fn versions_render_their_names() {
        let versions = json!([{"id": "1", "name": "1.0"}, {"id": "2", "name": "2.0"}]);

        assert_eq!(named_array(Some(&versions)), "'1.0'|'2.0'");
    }

    #[test]
    fn numbers_follow_the_decimal_separator() {
        let points = json!(3.5);

        assert_eq!(number(Some(&points), DecimalSeparator::Comma), "3,5");
        assert_eq!(number(Some(&points), DecimalSeparator::Point), "3.5");
        assert_eq!(number(Some(&json!(5)), DecimalSeparator::Comma), "5");
        assert_eq!(number(None, DecimalSeparator::Point), "");
    }

    #[test]
    fn flagged_is_presence_based() {
        assert_eq!(flagged(Some(&json!([{"value": "Impediment"}]))), "true");
        assert_eq!(flagged(Some(&Value::Null)), "false");
        assert_eq!(flagged(None), "false");
    }

    #[test]
    fn custom_values_dispatch_on_shape() {
        assert_eq!(custom(Some(&json!("free text")), DecimalSeparator::Point), "free text");
        assert_eq!(custom(Some(&json!({"value": "Q3"})), DecimalSeparator::Point), "Q3");
        assert_eq!(custom(Some(&json!({"displayName": "Jane"})), DecimalSeparator::Point), "Jane");
        assert_eq!(custom(Some(&json!([{"value": "a"}, {"value": "b"}])), DecimalSeparator::Point), "'a'|'b'");
        assert_eq!(custom(Some(&json!(1.25)), DecimalSeparator::Comma), "1,25");
        assert_eq!(custom(None, DecimalSeparator::Point), "");
    }
}
