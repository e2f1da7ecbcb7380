//! TOML catalog parser
//!
//! Supported value types: strings, integers, booleans, arrays and tables
//! (nested tables become nested objects). Floats and datetimes have no
//! frame representation and are rejected.

use std::path::PathBuf;

use feeder_core::Catalog;
use feeder_protocol::{FrameDescriptor, Value};
use tracing::warn;

/// Key holding the frame array
const FRAME_KEY: &str = "frame";

/// Catalog configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read catalog file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog TOML")]
    Parse(#[from] ::toml::de::Error),

    #[error("`frame` must be an array of tables")]
    NotFrameArray,

    #[error("frame {frame}: field `{field}` has unsupported {kind} value")]
    UnsupportedValue {
        frame: usize,
        field: String,
        kind: &'static str,
    },

    #[error("catalog has no frames")]
    Empty,
}

/// Parse a catalog document
pub fn parse_catalog(input: &str) -> Result<Catalog, ConfigError> {
    let document: ::toml::Table = input.parse()?;

    for key in document.keys().filter(|key| *key != FRAME_KEY) {
        warn!("Ignoring unknown catalog key `{}`", key);
    }

    let items = match document.get(FRAME_KEY) {
        None => return Err(ConfigError::Empty),
        Some(::toml::Value::Array(items)) => items,
        Some(_) => return Err(ConfigError::NotFrameArray),
    };

    let frames = items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            ::toml::Value::Table(table) => convert_table(index, table),
            _ => Err(ConfigError::NotFrameArray),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Catalog::new(frames).map_err(|_| ConfigError::Empty)
}

fn convert_table(frame: usize, table: &::toml::Table) -> Result<FrameDescriptor, ConfigError> {
    table
        .iter()
        .map(|(field, value)| {
            convert_value(frame, field, value).map(|value| (field.as_str(), value))
        })
        .collect()
}

fn convert_value(frame: usize, field: &str, value: &::toml::Value) -> Result<Value, ConfigError> {
    let unsupported = |kind| ConfigError::UnsupportedValue {
        frame,
        field: field.to_owned(),
        kind,
    };

    match value {
        ::toml::Value::String(s) => Ok(Value::Text(s.clone())),
        ::toml::Value::Integer(n) => Ok(Value::Integer(*n)),
        ::toml::Value::Boolean(b) => Ok(Value::Bool(*b)),
        ::toml::Value::Array(items) => items
            .iter()
            .map(|item| convert_value(frame, field, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        ::toml::Value::Table(table) => convert_table(frame, table).map(Value::Object),
        ::toml::Value::Float(_) => Err(unsupported("float")),
        ::toml::Value::Datetime(_) => Err(unsupported("datetime")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feeder_core::catalog;
    use feeder_protocol::encode_line;

    const SHIPPED: &str = include_str!("../../catalog.toml");

    #[test]
    fn test_shipped_catalog_matches_builtin() {
        let shipped = parse_catalog(SHIPPED).unwrap();
        let builtin = catalog::builtin();
        assert_eq!(shipped, builtin);
        for (file, code) in shipped.frames().iter().zip(builtin.frames()) {
            assert_eq!(encode_line(file).unwrap(), encode_line(code).unwrap());
        }
    }

    #[test]
    fn test_preserves_key_order() {
        let catalog = parse_catalog(
            r#"
            [[frame]]
            page_timeout_ms = 1000
            line2 = "second"
            line1 = "first"
            "#,
        )
        .unwrap();

        let names: Vec<_> = catalog.frame_at(0).field_names().collect();
        assert_eq!(names, ["page_timeout_ms", "line2", "line1"]);
        assert_eq!(
            encode_line(catalog.frame_at(0)).unwrap(),
            b"{\"page_timeout_ms\":1000,\"line2\":\"second\",\"line1\":\"first\"}\n"
        );
    }

    #[test]
    fn test_nested_values() {
        let catalog = parse_catalog(
            r#"
            [[frame]]
            icons = ["bell", 3]
            meta = { page = 2 }
            "#,
        )
        .unwrap();

        let expected = FrameDescriptor::new()
            .with("icons", vec![Value::from("bell"), Value::from(3)])
            .with("meta", FrameDescriptor::new().with("page", 2));
        assert_eq!(catalog.frame_at(0), &expected);
        assert_eq!(
            encode_line(catalog.frame_at(0)).unwrap(),
            b"{\"icons\":[\"bell\",3],\"meta\":{\"page\":2}}\n"
        );
    }

    #[test]
    fn test_missing_frames_is_empty() {
        assert!(matches!(parse_catalog(""), Err(ConfigError::Empty)));
        assert!(matches!(
            parse_catalog("frame = []"),
            Err(ConfigError::Empty)
        ));
    }

    #[test]
    fn test_frame_must_be_table_array() {
        assert!(matches!(
            parse_catalog("frame = \"hello\""),
            Err(ConfigError::NotFrameArray)
        ));
        assert!(matches!(
            parse_catalog("frame = [1, 2]"),
            Err(ConfigError::NotFrameArray)
        ));
    }

    #[test]
    fn test_float_rejected() {
        let err = parse_catalog(
            r#"
            [[frame]]
            line1 = "ok"

            [[frame]]
            bar_value = 0.5
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::UnsupportedValue { frame, field, kind } => {
                assert_eq!(frame, 1);
                assert_eq!(field, "bar_value");
                assert_eq!(kind, "float");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            parse_catalog("[[frame]\nline1 = "),
            Err(ConfigError::Parse(_))
        ));
    }
}
