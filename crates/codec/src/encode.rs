//! Value → interchange encoding.
//!
//! With a descriptor the encoder is type-directed and rejects values
//! that do not conform; without one it is value-directed, mirroring the
//! loosely-typed peers this codec interoperates with. Record fields are
//! written as Text-wrapped fully serialized sub-documents so each field
//! can later be decoded independently of its siblings.

use crate::base85;
use crate::descriptor::{Descriptor, PrimitiveKind, RecordDescriptor, TARGET_TYPE_KEY};
use crate::error::EncodeError;
use crate::temporal;
use crate::value::{RecordValue, Scalar, StreamValue, Value};

/// Encode a runtime value as an interchange tree.
pub fn encode(
    value: &Value,
    descriptor: Option<&Descriptor>,
) -> Result<serde_json::Value, EncodeError> {
    match descriptor {
        Some(d) => encode_typed(value, d),
        None => encode_untyped(value),
    }
}

/// Encode a runtime value as interchange text.
pub fn encode_document(
    value: &Value,
    descriptor: Option<&Descriptor>,
) -> Result<String, EncodeError> {
    let tree = encode(value, descriptor)?;
    serde_json::to_string(&tree).map_err(|e| EncodeError::Document {
        message: e.to_string(),
    })
}

fn encode_typed(value: &Value, descriptor: &Descriptor) -> Result<serde_json::Value, EncodeError> {
    if let Descriptor::Optional(inner) = descriptor {
        return match value {
            Value::Null => Ok(serde_json::Value::Null),
            other => encode_typed(other, inner),
        };
    }
    if value.is_null() {
        return Err(EncodeError::ShapeMismatch {
            expected: descriptor.type_name(),
            got: "Null".to_string(),
        });
    }
    match (descriptor, value) {
        (Descriptor::Primitive(PrimitiveKind::Bool), Value::Bool(b)) => Ok(serde_json::json!(b)),
        (Descriptor::Primitive(PrimitiveKind::Int), Value::Int(i)) => Ok(serde_json::json!(i)),
        (Descriptor::Primitive(PrimitiveKind::Float), Value::Float(x)) => float_node(*x),
        (Descriptor::Primitive(PrimitiveKind::Text), Value::Text(t)) => Ok(serde_json::json!(t)),
        (Descriptor::Decimal, Value::Decimal(d)) => Ok(serde_json::json!(d.to_string())),
        (Descriptor::Timestamp, Value::Timestamp(ts)) => {
            let text = temporal::format_timestamp(*ts).map_err(|e| EncodeError::UnsupportedValue {
                message: format!("unformattable timestamp: {}", e),
            })?;
            Ok(serde_json::json!(text))
        }
        (Descriptor::Date, Value::Date(d)) => {
            let text = temporal::format_date(*d).map_err(|e| EncodeError::UnsupportedValue {
                message: format!("unformattable date: {}", e),
            })?;
            Ok(serde_json::json!(text))
        }
        (Descriptor::Enum(ed), Value::Enum(ev)) => {
            let member = ed.member_named(&ev.member).ok_or_else(|| EncodeError::ShapeMismatch {
                expected: descriptor.type_name(),
                got: format!("Enum member {}", ev.member),
            })?;
            scalar_node(&member.value)
        }
        (Descriptor::Bytes, Value::Bytes(b)) => Ok(serde_json::json!(base85::encode(b))),
        (Descriptor::Stream, Value::Stream(s)) => Ok(stream_node(s)),
        (Descriptor::List(element), Value::List(items)) => {
            let encoded: Result<Vec<_>, _> =
                items.iter().map(|item| encode_typed(item, element)).collect();
            Ok(serde_json::Value::Array(encoded?))
        }
        (Descriptor::Tuple(slots), Value::Tuple(items)) => {
            if slots.len() != items.len() {
                return Err(EncodeError::ShapeMismatch {
                    expected: descriptor.type_name(),
                    got: format!("Tuple of {} elements", items.len()),
                });
            }
            let encoded: Result<Vec<_>, _> = slots
                .iter()
                .zip(items)
                .map(|(slot, item)| encode_typed(item, slot))
                .collect();
            Ok(serde_json::Value::Array(encoded?))
        }
        (Descriptor::Mapping(value_descriptor), Value::Map(entries)) => {
            let mut object = serde_json::Map::new();
            for (key, entry) in entries {
                object.insert(key.clone(), encode(entry, value_descriptor.as_deref())?);
            }
            Ok(serde_json::Value::Object(object))
        }
        (Descriptor::Union(members), v) => {
            let member = members.iter().find(|m| m.admits(v)).ok_or_else(|| {
                EncodeError::ShapeMismatch {
                    expected: descriptor.type_name(),
                    got: v.type_name().to_string(),
                }
            })?;
            encode_typed(v, member)
        }
        (Descriptor::Record(rd), Value::Record(rv)) => {
            if !rv.name.is_empty() && rv.name != rd.name {
                return Err(EncodeError::ShapeMismatch {
                    expected: descriptor.type_name(),
                    got: format!("Record({})", rv.name),
                });
            }
            encode_record(rd, rv)
        }
        (d, v) => Err(EncodeError::ShapeMismatch {
            expected: d.type_name(),
            got: v.type_name().to_string(),
        }),
    }
}

fn encode_record(
    descriptor: &RecordDescriptor,
    record: &RecordValue,
) -> Result<serde_json::Value, EncodeError> {
    let mut object = serde_json::Map::new();
    object.insert(
        TARGET_TYPE_KEY.to_string(),
        serde_json::json!(descriptor.name),
    );
    for (name, field_descriptor) in &descriptor.fields {
        let field_value = record.get(name).unwrap_or(&Value::Null);
        let node = if field_value.is_null() {
            // Absent fields serialize as null documents whatever their
            // declared shape; decode restores the zero value.
            serde_json::Value::Null
        } else {
            encode_typed(field_value, field_descriptor)?
        };
        let document = serde_json::to_string(&node).map_err(|e| EncodeError::Document {
            message: e.to_string(),
        })?;
        object.insert(name.clone(), serde_json::Value::String(document));
    }
    Ok(serde_json::Value::Object(object))
}

fn encode_untyped(value: &Value) -> Result<serde_json::Value, EncodeError> {
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::json!(b)),
        Value::Int(i) => Ok(serde_json::json!(i)),
        Value::Float(x) => float_node(*x),
        Value::Text(t) => Ok(serde_json::json!(t)),
        Value::Decimal(d) => Ok(serde_json::json!(d.to_string())),
        Value::Timestamp(ts) => {
            let text = temporal::format_timestamp(*ts).map_err(|e| EncodeError::UnsupportedValue {
                message: format!("unformattable timestamp: {}", e),
            })?;
            Ok(serde_json::json!(text))
        }
        Value::Date(d) => {
            let text = temporal::format_date(*d).map_err(|e| EncodeError::UnsupportedValue {
                message: format!("unformattable date: {}", e),
            })?;
            Ok(serde_json::json!(text))
        }
        Value::Enum(ev) => scalar_node(&ev.value),
        Value::Bytes(b) => Ok(serde_json::json!(base85::encode(b))),
        Value::Stream(s) => Ok(stream_node(s)),
        Value::List(items) | Value::Tuple(items) => {
            let encoded: Result<Vec<_>, _> = items.iter().map(encode_untyped).collect();
            Ok(serde_json::Value::Array(encoded?))
        }
        Value::Map(entries) => {
            let mut object = serde_json::Map::new();
            for (key, entry) in entries {
                object.insert(key.clone(), encode_untyped(entry)?);
            }
            Ok(serde_json::Value::Object(object))
        }
        Value::Record(rv) => {
            let mut object = serde_json::Map::new();
            object.insert(TARGET_TYPE_KEY.to_string(), serde_json::json!(rv.name));
            for (name, field_value) in &rv.fields {
                let node = encode_untyped(field_value)?;
                let document = serde_json::to_string(&node).map_err(|e| EncodeError::Document {
                    message: e.to_string(),
                })?;
                object.insert(name.clone(), serde_json::Value::String(document));
            }
            Ok(serde_json::Value::Object(object))
        }
    }
}

fn scalar_node(scalar: &Scalar) -> Result<serde_json::Value, EncodeError> {
    match scalar {
        Scalar::Bool(b) => Ok(serde_json::json!(b)),
        Scalar::Int(i) => Ok(serde_json::json!(i)),
        Scalar::Float(x) => float_node(*x),
        Scalar::Text(t) => Ok(serde_json::json!(t)),
    }
}

fn float_node(x: f64) -> Result<serde_json::Value, EncodeError> {
    serde_json::Number::from_f64(x)
        .map(serde_json::Value::Number)
        .ok_or_else(|| EncodeError::UnsupportedValue {
            message: format!("non-finite float {}", x),
        })
}

fn stream_node(stream: &StreamValue) -> serde_json::Value {
    serde_json::json!({
        "encoding": stream.encoding().tag(),
        "content": base85::encode(stream.contents()),
    })
}
