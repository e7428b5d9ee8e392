//! Interchange → value decoding.
//!
//! Decoding resolves the concrete shape first: `Optional` unwraps
//! before anything else, unions resolve by the `target_type` tag, and
//! only then does type-specific conversion run. Record fields arrive as
//! Text-wrapped sub-documents and are decoded independently, with
//! missing fields restored to the zero value of their declared shape.

use std::collections::BTreeMap;

use crate::base85;
use crate::descriptor::{Descriptor, PrimitiveKind, RecordDescriptor, TARGET_TYPE_KEY};
use crate::error::DecodeError;
use crate::temporal;
use crate::value::{RecordValue, Scalar, StreamValue, Value};

/// Decode interchange text against an optional descriptor.
pub fn decode_document(
    document: &str,
    descriptor: Option<&Descriptor>,
) -> Result<Value, DecodeError> {
    let tree: serde_json::Value =
        serde_json::from_str(document).map_err(|e| DecodeError::MalformedDocument {
            message: e.to_string(),
        })?;
    decode(&tree, descriptor)
}

/// Decode an interchange tree against an optional descriptor.
///
/// Without a descriptor, decoding is best-effort structural inference:
/// objects become generic maps, arrays become lists, and bare text is
/// opportunistically sniffed for ISO-8601 timestamps.
pub fn decode(
    input: &serde_json::Value,
    descriptor: Option<&Descriptor>,
) -> Result<Value, DecodeError> {
    match descriptor {
        Some(d) => decode_typed(input, d),
        None => Ok(decode_untyped(input, true)),
    }
}

fn decode_typed(input: &serde_json::Value, descriptor: &Descriptor) -> Result<Value, DecodeError> {
    if let Descriptor::Optional(inner) = descriptor {
        return if input.is_null() {
            Ok(Value::Null)
        } else {
            decode_typed(input, inner)
        };
    }
    if input.is_null() {
        return Err(DecodeError::UnexpectedNull {
            expected: descriptor.type_name(),
        });
    }
    match descriptor {
        Descriptor::Optional(inner) => decode_typed(input, inner),
        Descriptor::Primitive(kind) => decode_primitive(input, *kind),
        Descriptor::Decimal => decode_decimal(input),
        Descriptor::Timestamp => {
            let text = expect_text(input, "Timestamp")?;
            temporal::parse_timestamp(text)
                .map(Value::Timestamp)
                .ok_or_else(|| DecodeError::MalformedPrimitive {
                    expected: "ISO-8601 timestamp",
                    message: text.to_string(),
                })
        }
        Descriptor::Date => {
            let text = expect_text(input, "Date")?;
            temporal::parse_date(text)
                .map(Value::Date)
                .ok_or_else(|| DecodeError::MalformedPrimitive {
                    expected: "ISO-8601 date",
                    message: text.to_string(),
                })
        }
        Descriptor::Enum(ed) => {
            let scalar = scalar_from_node(input).ok_or_else(|| DecodeError::TypeMismatch {
                expected: descriptor.type_name(),
                got: node_kind(input),
            })?;
            let member =
                ed.member_for_value(&scalar)
                    .ok_or_else(|| DecodeError::UnknownEnumValue {
                        enumeration: ed.name.clone(),
                        value: scalar.to_string(),
                    })?;
            Ok(Value::Enum(crate::value::EnumValue {
                enumeration: ed.name.clone(),
                member: member.name.clone(),
                value: member.value.clone(),
            }))
        }
        Descriptor::Bytes => {
            let text = expect_text(input, "Bytes")?;
            base85::decode(text)
                .map(Value::Bytes)
                .map_err(|e| DecodeError::MalformedPrimitive {
                    expected: "base-85 text",
                    message: e.to_string(),
                })
        }
        Descriptor::Stream => decode_stream(input),
        Descriptor::List(element) => {
            let items = expect_array(input, descriptor)?;
            let decoded: Result<Vec<_>, _> =
                items.iter().map(|item| decode_typed(item, element)).collect();
            Ok(Value::List(decoded?))
        }
        Descriptor::Tuple(slots) => {
            let items = expect_array(input, descriptor)?;
            if items.len() != slots.len() {
                return Err(DecodeError::ArityMismatch {
                    expected: slots.len(),
                    got: items.len(),
                });
            }
            let decoded: Result<Vec<_>, _> = slots
                .iter()
                .zip(items)
                .map(|(slot, item)| decode_typed(item, slot))
                .collect();
            Ok(Value::Tuple(decoded?))
        }
        Descriptor::Mapping(value_descriptor) => {
            let object = expect_object(input, descriptor)?;
            let mut entries = BTreeMap::new();
            for (key, node) in object {
                entries.insert(key.clone(), decode(node, value_descriptor.as_deref())?);
            }
            Ok(Value::Map(entries))
        }
        Descriptor::Union(members) => decode_union(input, descriptor, members),
        Descriptor::Record(rd) => decode_record(input, rd),
    }
}

fn decode_primitive(input: &serde_json::Value, kind: PrimitiveKind) -> Result<Value, DecodeError> {
    match kind {
        PrimitiveKind::Bool => input
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| DecodeError::TypeMismatch {
                expected: "Bool".to_string(),
                got: node_kind(input),
            }),
        PrimitiveKind::Int => {
            if let Some(i) = input.as_i64() {
                return Ok(Value::Int(i));
            }
            if let Some(text) = input.as_str() {
                return text
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|e| DecodeError::MalformedPrimitive {
                        expected: "integer",
                        message: format!("'{}': {}", text, e),
                    });
            }
            Err(DecodeError::TypeMismatch {
                expected: "Int".to_string(),
                got: node_kind(input),
            })
        }
        PrimitiveKind::Float => {
            if let Some(x) = input.as_f64() {
                return Ok(Value::Float(x));
            }
            if let Some(text) = input.as_str() {
                return text
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|e| DecodeError::MalformedPrimitive {
                        expected: "float",
                        message: format!("'{}': {}", text, e),
                    });
            }
            Err(DecodeError::TypeMismatch {
                expected: "Float".to_string(),
                got: node_kind(input),
            })
        }
        PrimitiveKind::Text => input
            .as_str()
            .map(|t| Value::Text(t.to_string()))
            .ok_or_else(|| DecodeError::TypeMismatch {
                expected: "Text".to_string(),
                got: node_kind(input),
            }),
    }
}

fn decode_decimal(input: &serde_json::Value) -> Result<Value, DecodeError> {
    let rendered = match input {
        serde_json::Value::String(s) => s.clone(),
        // Numeric nodes are accepted through their exact decimal
        // rendering so loosely produced payloads still decode.
        serde_json::Value::Number(n) => n.to_string(),
        other => {
            return Err(DecodeError::TypeMismatch {
                expected: "Decimal".to_string(),
                got: node_kind(other),
            })
        }
    };
    rendered
        .parse::<rust_decimal::Decimal>()
        .map(Value::Decimal)
        .map_err(|e| DecodeError::MalformedPrimitive {
            expected: "decimal",
            message: format!("'{}': {}", rendered, e),
        })
}

fn decode_stream(input: &serde_json::Value) -> Result<Value, DecodeError> {
    let object = input
        .as_object()
        .ok_or_else(|| DecodeError::TypeMismatch {
            expected: "Stream".to_string(),
            got: node_kind(input),
        })?;
    let encoding = object
        .get("encoding")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DecodeError::MalformedPrimitive {
            expected: "stream object",
            message: "missing 'encoding' field".to_string(),
        })?;
    let content = object
        .get("content")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DecodeError::MalformedPrimitive {
            expected: "stream object",
            message: "missing 'content' field".to_string(),
        })?;
    let bytes = base85::decode(content).map_err(|e| DecodeError::MalformedPrimitive {
        expected: "base-85 stream content",
        message: e.to_string(),
    })?;
    match encoding {
        "bytes" => Ok(Value::Stream(StreamValue::from_bytes(bytes))),
        "utf-8" => {
            let text = String::from_utf8(bytes).map_err(|e| DecodeError::MalformedPrimitive {
                expected: "utf-8 stream content",
                message: e.to_string(),
            })?;
            Ok(Value::Stream(StreamValue::from_text(text)))
        }
        other => Err(DecodeError::UnsupportedStreamEncoding {
            encoding: other.to_string(),
        }),
    }
}

fn decode_union(
    input: &serde_json::Value,
    descriptor: &Descriptor,
    members: &[Descriptor],
) -> Result<Value, DecodeError> {
    if let Some(object) = input.as_object() {
        if let Some(tag) = object.get(TARGET_TYPE_KEY).and_then(|t| t.as_str()) {
            for member in members {
                if let Descriptor::Record(rd) = member {
                    if rd.name == tag {
                        return decode_record(input, rd);
                    }
                }
            }
            return Err(DecodeError::UnresolvedUnionMember {
                union: descriptor.type_name(),
                tag: tag.to_string(),
            });
        }
        // An untagged object cannot satisfy any record member, so an
        // all-record union has nothing to fall back to.
        if members.iter().all(|m| matches!(m, Descriptor::Record(_))) {
            return Err(DecodeError::MissingDiscriminator {
                union: descriptor.type_name(),
            });
        }
        return Ok(decode_untyped(input, false));
    }
    Ok(infer_from_shape(input))
}

fn decode_record(input: &serde_json::Value, rd: &RecordDescriptor) -> Result<Value, DecodeError> {
    let object = input
        .as_object()
        .ok_or_else(|| DecodeError::TypeMismatch {
            expected: format!("Record({})", rd.name),
            got: node_kind(input),
        })?;
    let mut fields = BTreeMap::new();
    for (name, field_descriptor) in &rd.fields {
        let value = match object.get(name) {
            None | Some(serde_json::Value::Null) => field_descriptor.zero_value(),
            Some(serde_json::Value::String(document)) => {
                let node: serde_json::Value = serde_json::from_str(document).map_err(|e| {
                    DecodeError::MalformedDocument {
                        message: format!("field '{}': {}", name, e),
                    }
                })?;
                if node.is_null() && !matches!(field_descriptor, Descriptor::Optional(_)) {
                    field_descriptor.zero_value()
                } else {
                    decode_typed(&node, field_descriptor)?
                }
            }
            Some(other) => {
                return Err(DecodeError::TypeMismatch {
                    expected: format!("text-wrapped document for field '{}'", name),
                    got: node_kind(other),
                })
            }
        };
        fields.insert(name.clone(), value);
    }
    Ok(Value::Record(RecordValue {
        name: rd.name.clone(),
        fields,
    }))
}

/// Structural inference for non-object nodes reaching an unresolved
/// union: scalars map to their matching primitive, arrays to generic
/// lists. No timestamp sniffing here; a declared union member should
/// have said so.
fn infer_from_shape(input: &serde_json::Value) -> Value {
    match input {
        serde_json::Value::String(s) => Value::Text(s.clone()),
        other => decode_untyped(other, false),
    }
}

fn decode_untyped(input: &serde_json::Value, sniff: bool) -> Value {
    match input {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => {
            if sniff {
                if let Some(ts) = temporal::sniff_timestamp(s) {
                    return Value::Timestamp(ts);
                }
            }
            Value::Text(s.clone())
        }
        serde_json::Value::Array(items) => {
            Value::List(items.iter().map(|item| decode_untyped(item, sniff)).collect())
        }
        serde_json::Value::Object(object) => {
            // The reserved discriminator is metadata, not payload. Field
            // values stay as whatever they are on the wire, including
            // Text-wrapped sub-documents; inference cannot unwrap them
            // without a declared shape.
            let mut entries = BTreeMap::new();
            for (key, node) in object {
                if key == TARGET_TYPE_KEY {
                    continue;
                }
                entries.insert(key.clone(), decode_untyped(node, sniff));
            }
            Value::Map(entries)
        }
    }
}

fn scalar_from_node(input: &serde_json::Value) -> Option<Scalar> {
    match input {
        serde_json::Value::Bool(b) => Some(Scalar::Bool(*b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Some(Scalar::Int(i)),
            None => n.as_f64().map(Scalar::Float),
        },
        serde_json::Value::String(s) => Some(Scalar::Text(s.clone())),
        _ => None,
    }
}

fn expect_text<'a>(
    input: &'a serde_json::Value,
    expected: &str,
) -> Result<&'a str, DecodeError> {
    input.as_str().ok_or_else(|| DecodeError::TypeMismatch {
        expected: expected.to_string(),
        got: node_kind(input),
    })
}

fn expect_array<'a>(
    input: &'a serde_json::Value,
    descriptor: &Descriptor,
) -> Result<&'a Vec<serde_json::Value>, DecodeError> {
    input.as_array().ok_or_else(|| DecodeError::TypeMismatch {
        expected: descriptor.type_name(),
        got: node_kind(input),
    })
}

fn expect_object<'a>(
    input: &'a serde_json::Value,
    descriptor: &Descriptor,
) -> Result<&'a serde_json::Map<String, serde_json::Value>, DecodeError> {
    input.as_object().ok_or_else(|| DecodeError::TypeMismatch {
        expected: descriptor.type_name(),
        got: node_kind(input),
    })
}

fn node_kind(input: &serde_json::Value) -> &'static str {
    match input {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "text",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
