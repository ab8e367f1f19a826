use crate::config::InputRules;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// A structured log entry: field name to JSON value
pub type Record = Map<String, Value>;

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("valid integer regex"));
static FLOAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+\.\d+$").expect("valid float regex"));
static EDGE_QUOTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^["']|["']$"#).expect("valid quote regex"));

/// Parse one input line into a record.
///
/// JSON objects are taken as-is; anything else is read as whitespace
/// separated `key=value` pairs. Returns `None` for blank lines and lines
/// with nothing usable in them.
pub fn parse_record(line: &str, rules: &InputRules) -> Option<Record> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if rules.json {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => return Some(map),
            // Valid JSON that is not an object is not a log record
            Ok(_) => return None,
            Err(_) => {}
        }
    }

    if rules.key_value {
        return parse_key_value(line, rules.coerce_scalars);
    }

    None
}

fn parse_key_value(line: &str, coerce: bool) -> Option<Record> {
    let mut record = Record::new();

    for pair in line.split_whitespace() {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let value = value.trim();
        let value = if coerce {
            coerce_scalar(value)
        } else {
            Value::String(value.to_string())
        };
        record.insert(key.to_string(), value);
    }

    (!record.is_empty()).then_some(record)
}

fn coerce_scalar(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if INTEGER_RE.is_match(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::from(n);
        }
        if let Ok(n) = raw.parse::<u64>() {
            return Value::from(n);
        }
    }

    if (INTEGER_RE.is_match(raw) || FLOAT_RE.is_match(raw))
        && let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
    {
        return Value::Number(n);
    }

    Value::String(EDGE_QUOTES_RE.replace_all(raw, "").into_owned())
}
