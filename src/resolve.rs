//! Load path: rebuild a typed section from a decoded YAML mapping.
//!
//! Operates on already-parsed data with no I/O. Starts from `C::default()` and
//! overwrites every field whose key is present:
//!
//! - Nested mappings recurse into the field's section type.
//! - Scalars are assigned without coercion (integers widen to floats, nothing
//!   else converts). A kind or range mismatch fails the whole load.
//! - A mapping where a scalar is declared, or a scalar where a section is
//!   declared, is logged and the field keeps its default.
//! - Missing keys and `null` values keep the default.

use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::ConfigError;
use crate::path::KeyPath;
use crate::schema::{FieldKind, Schema, Section};
use crate::types::{Scalar, yaml_kind};

/// Build a `C` from the top-level mapping of a config document.
pub fn resolve<C: Section>(mapping: &Mapping) -> Result<C, ConfigError> {
    resolve_at(mapping, &KeyPath::root())
}

/// Build a `C` from the mapping found at `at`. `at` is only used to report
/// full key paths.
pub(crate) fn resolve_at<C: Section>(mapping: &Mapping, at: &KeyPath) -> Result<C, ConfigError> {
    let schema = Schema::<C>::of()?;
    let mut output = C::default();

    for field in schema.fields() {
        let key = field.key();
        let Some(value) = mapping.get(key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        let mut path = at.clone();
        path.push(key);

        match (field.kind(), value) {
            (FieldKind::Nested { write, .. }, Value::Mapping(nested)) => {
                write(&mut output, nested, &path)?;
            }
            (FieldKind::Nested { .. }, other) => {
                warn!(key = %path, found = %yaml_kind(other), "expected a section, keeping default");
            }
            (FieldKind::Scalar { .. }, Value::Mapping(_)) => {
                warn!(key = %path, "expected a scalar, found a section, keeping default");
            }
            (FieldKind::Scalar { expected, write, .. }, other) => {
                let scalar = Scalar::from_yaml(other).ok_or_else(|| ConfigError::TypeMismatch {
                    key: path.to_string(),
                    expected: *expected,
                    found: yaml_kind(other),
                })?;
                if !write(&mut output, &scalar) {
                    return Err(ConfigError::TypeMismatch {
                        key: path.to_string(),
                        expected: *expected,
                        found: describe(&scalar),
                    });
                }
            }
        }
    }

    for key in mapping.keys() {
        let known = key.as_str().is_some_and(|k| schema.get(k).is_some());
        if !known {
            warn!(section = %at, key = ?key, "unknown key ignored");
        }
    }

    Ok(output)
}

fn describe(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Int(i) => format!("integer {i}"),
        other => other.kind().to_string(),
    }
}
