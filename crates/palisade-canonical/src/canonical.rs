//! Canonical JSON encoding

use crate::error::CanonicalError;
use serde::Serialize;
use serde_json::Value;

/// Encode a value as canonical JSON text.
///
/// Object keys are sorted lexicographically by their UTF-8 bytes at every
/// nesting level, arrays keep their order, and no whitespace is emitted.
/// Two semantically equal values always encode to the same string,
/// regardless of the order their fields were inserted in.
///
/// # Errors
///
/// Returns [`CanonicalError::FloatNotAllowed`] if the value contains a
/// float anywhere, and [`CanonicalError::Serialization`] if it cannot be
/// converted to JSON at all. Both are caller errors: signed payloads must
/// be built from canonicalizable data.
///
/// # Example
///
/// ```rust
/// use palisade_canonical::canonical_string;
///
/// let value = serde_json::json!({"z": 1, "a": {"y": 2, "x": 3}});
/// assert_eq!(
///     canonical_string(&value).unwrap(),
///     r#"{"a":{"x":3,"y":2},"z":1}"#
/// );
/// ```
pub fn canonical_string<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let value = serde_json::to_value(value)?;
    let mut out = String::new();
    write_value(&mut out, &value)?;
    Ok(out)
}

/// Encode a value as canonical JSON bytes.
///
/// This is the form signatures are computed over.
pub fn canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CanonicalError> {
    canonical_string(value).map(String::into_bytes)
}

fn write_value(out: &mut String, value: &Value) -> Result<(), CanonicalError> {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_scalar(out, &Value::String((*key).clone()))?;
                out.push(':');
                write_value(out, item)?;
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item)?;
            }
            out.push(']');
        }
        scalar => write_scalar(out, scalar)?,
    }
    Ok(())
}

/// Render a leaf value through serde_json so escaping and integer
/// formatting never diverge from the rest of the ecosystem.
fn write_scalar(out: &mut String, value: &Value) -> Result<(), CanonicalError> {
    if let Value::Number(n) = value {
        if !n.is_i64() && !n.is_u64() {
            return Err(CanonicalError::FloatNotAllowed);
        }
    }
    let rendered = serde_json::to_string(value)?;
    out.push_str(&rendered);
    Ok(())
}
