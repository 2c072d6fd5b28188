//! Flattening of loosely typed argument lists read from config files.

use crate::args::composite::Arguments;
use crate::args::value::{KeyValue, Value};

/// Build [`Arguments`] from a list of TOML values.
///
/// Strings, numbers and booleans become literal tokens of their text, and
/// inline tables become one `key=value` node per entry in the order they
/// were written. Arrays, datetimes and nested tables are skipped with a
/// warning, the rest of the list is still used.
pub fn flatten_loose(items: &[toml::Value]) -> Arguments {
    let mut args = Arguments::new();
    for (index, item) in items.iter().enumerate() {
        match item {
            toml::Value::String(token) => args.push(token.as_str()),
            toml::Value::Integer(i) => args.push(i.to_string()),
            toml::Value::Float(x) => args.push(x.to_string()),
            toml::Value::Boolean(b) => args.push(b.to_string()),
            toml::Value::Table(table) => {
                for (key, value) in table {
                    match scalar(value) {
                        Some(value) => args.push(KeyValue::new(key.as_str(), value)),
                        None => tracing::warn!(
                            index,
                            key = %key,
                            kind = value.type_str(),
                            "Skipping unsupported argument value"
                        ),
                    }
                }
            }
            other => tracing::warn!(
                index,
                kind = other.type_str(),
                "Skipping unsupported argument item"
            ),
        }
    }
    args
}

fn scalar(value: &toml::Value) -> Option<Value> {
    match value {
        toml::Value::String(s) => Some(Value::Str(s.clone())),
        toml::Value::Integer(i) => Some(Value::Int(*i)),
        toml::Value::Float(x) => Some(Value::Float(*x)),
        toml::Value::Boolean(b) => Some(Value::Int(i64::from(*b))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(src: &str) -> Vec<toml::Value> {
        #[derive(serde::Deserialize)]
        struct Doc {
            args: Vec<toml::Value>,
        }
        toml::from_str::<Doc>(src).unwrap().args
    }

    #[test]
    fn strings_and_tables() {
        let args = flatten_loose(&items(
            r#"args = ["iterations=1000", { target_error = 0.1, optimal_raid = true }]"#,
        ));
        assert_eq!(
            args.flattened(),
            vec!["iterations=1000", "target_error=0.1", "optimal_raid=1"]
        );
    }

    #[test]
    fn table_entries_keep_written_order() {
        let args = flatten_loose(&items(r#"args = [{ b = 1, a = 2 }]"#));
        assert_eq!(args.flattened(), vec!["b=1", "a=2"]);
    }

    #[test]
    fn scalars_become_literal_tokens() {
        let args = flatten_loose(&items(r#"args = ["a", 42, 0.5, true]"#));
        assert_eq!(args.flattened(), vec!["a", "42", "0.5", "true"]);
    }

    #[test]
    fn unsupported_items_are_skipped() {
        let args = flatten_loose(&items(
            r#"args = ["a", ["nested"], 1979-05-27, { bad = [1, 2], inner = { x = 1 }, ok = "yes" }, "b"]"#,
        ));
        assert_eq!(args.flattened(), vec!["a", "ok=yes", "b"]);
    }
}
