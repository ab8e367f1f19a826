use super::ast::{BinaryOp, Expr, FieldPath, Literal, UnaryOp};
use crate::record::Record;
use serde_json::Value;
use std::borrow::Cow;

/// Decide whether `record` satisfies `expr`.
///
/// Total over every tree: missing fields resolve to null, a leaf in boolean
/// position counts by its truthiness, and a predicate in value position
/// yields a JSON boolean.
pub fn evaluate(expr: &Expr, record: &Record) -> bool {
    match expr {
        Expr::Binary { op, left, right } => match op {
            BinaryOp::And => evaluate(left, record) && evaluate(right, record),
            BinaryOp::Or => evaluate(left, record) || evaluate(right, record),
            BinaryOp::Equals => {
                let (l, r) = (value_of(left, record), value_of(right, record));
                values_equal(&l, &r)
            }
            BinaryOp::Contains => {
                let l = stringify(&value_of(left, record)).to_lowercase();
                let r = stringify(&value_of(right, record)).to_lowercase();
                l.contains(&r)
            }
        },
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => !evaluate(operand, record),
        Expr::Field(_) | Expr::Literal(_) => is_truthy(&value_of(expr, record)),
    }
}

/// Resolve a dotted path against a record, or `None` if any segment is absent
pub fn resolve_field<'r>(path: &FieldPath, record: &'r Record) -> Option<&'r Value> {
    let (first, rest) = path.segments().split_first()?;
    let mut current = record.get(first)?;
    for segment in rest {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn value_of<'r>(expr: &Expr, record: &'r Record) -> Cow<'r, Value> {
    match expr {
        Expr::Field(path) => match resolve_field(path, record) {
            Some(value) => Cow::Borrowed(value),
            None => Cow::Owned(Value::Null),
        },
        Expr::Literal(Literal::String(s)) => Cow::Owned(Value::String(s.clone())),
        Expr::Literal(Literal::Number(n)) => Cow::Owned(Value::from(*n)),
        Expr::Binary { .. } | Expr::Unary { .. } => Cow::Owned(Value::Bool(evaluate(expr, record))),
    }
}

/// Strict equality first, then case-insensitive comparison of the string forms
fn values_equal(left: &Value, right: &Value) -> bool {
    if strictly_equal(left, right) {
        return true;
    }
    stringify(left).to_lowercase() == stringify(right).to_lowercase()
}

fn strictly_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_u64(), b.as_u64()) {
            (Some(x), Some(y)) => x == y,
            _ => match (a.as_i64(), b.as_i64()) {
                (Some(x), Some(y)) => x == y,
                _ => a.as_f64() == b.as_f64(),
            },
        },
        // Arrays and objects have identity semantics; two distinct values never match
        _ => false,
    }
}

/// Text form of a value used by `=` fallback and `contains`
pub fn stringify(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed("null"),
        Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
                // Negative zero prints as plain 0
                let f = if f == 0.0 { 0.0 } else { f };
                Cow::Owned(format!("{f:.0}"))
            }
            _ => Cow::Owned(n.to_string()),
        },
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::compile;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("test record must be an object, got {other}"),
        }
    }

    fn check(filter: &str, value: Value) -> bool {
        evaluate(&compile(filter).unwrap(), &record(value))
    }

    #[test]
    fn test_equality_is_case_insensitive() {
        assert!(check("level = ERROR", json!({"level": "error"})));
        assert!(check("level = Error", json!({"level": "error"})));
        assert!(!check("level = WARN", json!({"level": "error"})));
    }

    #[test]
    fn test_numbers_compare_across_types() {
        assert!(check("status = 404", json!({"status": 404})));
        assert!(check("status = 404", json!({"status": "404"})));
        assert!(check("status = 404", json!({"status": 404.0})));
        assert!(check(r#"status = "404""#, json!({"status": 404})));
        assert!(!check("status = 500", json!({"status": 404})));
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        assert!(check("delta contains 0", json!({"delta": -0.0})));
        assert!(!check("delta contains \"-\"", json!({"delta": -0.0})));
    }

    #[test]
    fn test_booleans_compare_as_text() {
        assert!(check("ok = true", json!({"ok": true})));
        assert!(check("ok = TRUE", json!({"ok": true})));
        assert!(!check("ok = false", json!({"ok": true})));
    }

    #[test]
    fn test_missing_field_is_null() {
        assert!(!check(r#"service = "auth""#, json!({"level": "ERROR"})));
        assert!(!check(r#"service contains "a""#, json!({"level": "ERROR"})));
        assert!(check(
            r#"service = "auth" or level = ERROR"#,
            json!({"level": "ERROR"})
        ));
        // The text form of null is "null"
        assert!(check("service = null", json!({})));
    }

    #[test]
    fn test_nested_fields() {
        let user = json!({"user": {"name": "john", "id": 7}});
        assert!(check(r#"user.name = "john""#, user.clone()));
        assert!(check("user.id = 7", user.clone()));
        assert!(!check(r#"user.role = "admin""#, user.clone()));
        assert!(!check(r#"user.name.first = "john""#, user));
    }

    #[test]
    fn test_contains_is_case_insensitive_substring() {
        let rec = json!({"message": "Request Timeout Occurred"});
        assert!(check(r#"message contains "timeout""#, rec.clone()));
        assert!(check("message contains REQUEST", rec.clone()));
        assert!(!check(r#"message contains "error""#, rec));
    }

    #[test]
    fn test_contains_on_numbers_and_objects() {
        assert!(check("code contains 40", json!({"code": 404})));
        assert!(check(r#"tags contains "beta""#, json!({"tags": ["alpha", "beta"]})));
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        let rec = json!({"service": "auth", "level": "WARN"});
        assert!(check(
            r#"service = "auth" and (level = WARN or level = ERROR)"#,
            rec.clone()
        ));
        assert!(!check(
            r#"service = "api" and (level = WARN or level = ERROR)"#,
            rec
        ));
    }

    #[test]
    fn test_not() {
        assert!(check("not level = DEBUG", json!({"level": "INFO"})));
        assert!(!check("not level = DEBUG", json!({"level": "debug"})));
    }

    #[test]
    fn test_leaf_in_boolean_position_uses_truthiness() {
        assert!(check("error", json!({"error": "boom"})));
        assert!(!check("error", json!({"error": ""})));
        assert!(!check("error", json!({})));
        assert!(!check("retries", json!({"retries": 0})));
        assert!(check("not error", json!({"ok": true})));
    }

    #[test]
    fn test_predicate_in_value_position_is_boolean() {
        assert!(check("(level = ERROR) = true", json!({"level": "error"})));
        assert!(check("(level = ERROR) = false", json!({"level": "info"})));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let expr = compile("level = ERROR and message contains timeout").unwrap();
        let rec = record(json!({"level": "ERROR", "message": "db timeout"}));
        let first = evaluate(&expr, &rec);
        for _ in 0..10 {
            assert_eq!(evaluate(&expr, &rec), first);
        }
        assert!(first);
    }

    #[test]
    fn test_stringify_forms() {
        assert_eq!(stringify(&json!(null)), "null");
        assert_eq!(stringify(&json!(42)), "42");
        assert_eq!(stringify(&json!(-3)), "-3");
        assert_eq!(stringify(&json!(42.0)), "42");
        assert_eq!(stringify(&json!(-0.0)), "0");
        assert_eq!(stringify(&json!(-2.0)), "-2");
        assert_eq!(stringify(&json!(1.5)), "1.5");
        assert_eq!(stringify(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
