//! Static type descriptors driving encode and decode.
//!
//! Descriptors are plain immutable data built in code at registration
//! time (one per record shape / hook signature), never discovered by
//! runtime reflection. They are cheap to clone and safe to share across
//! threads.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::value::{EnumValue, RecordValue, Scalar, StreamValue, Value};

/// Reserved interchange key naming the concrete shape of an encoded
/// record or union member.
pub const TARGET_TYPE_KEY: &str = "target_type";

// ──────────────────────────────────────────────
// Primitive kinds
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Bool,
    Int,
    Float,
    Text,
}

impl PrimitiveKind {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "Bool",
            PrimitiveKind::Int => "Int",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Text => "Text",
        }
    }
}

// ──────────────────────────────────────────────
// Enumerations
// ──────────────────────────────────────────────

/// One named constant of an enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: Scalar,
}

/// A closed set of named constants with primitive underlying values.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    pub name: String,
    pub members: Vec<EnumMember>,
}

impl EnumDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        EnumDescriptor {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Builder-style member registration.
    pub fn member(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.members.push(EnumMember {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn member_named(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn member_for_value(&self, value: &Scalar) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.value.matches(value))
    }

    /// Construct the runtime value for a member, by name.
    pub fn value_of(&self, member: &str) -> Option<EnumValue> {
        self.member_named(member).map(|m| EnumValue {
            enumeration: self.name.clone(),
            member: m.name.clone(),
            value: m.value.clone(),
        })
    }
}

// ──────────────────────────────────────────────
// Records
// ──────────────────────────────────────────────

/// A named composite shape with an ordered field list.
///
/// The name doubles as the union discriminator, so it must be stable
/// across the processes that exchange payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDescriptor {
    pub name: String,
    pub fields: Vec<(String, Descriptor)>,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        RecordDescriptor {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field registration; declaration order is the
    /// decode order.
    pub fn field(mut self, name: impl Into<String>, descriptor: Descriptor) -> Self {
        self.fields.push((name.into(), descriptor));
        self
    }

    pub fn field_descriptor(&self, name: &str) -> Option<&Descriptor> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }

    /// The instance with every field at its zero value.
    pub fn zero_instance(&self) -> RecordValue {
        let mut fields = BTreeMap::new();
        for (name, descriptor) in &self.fields {
            fields.insert(name.clone(), descriptor.zero_value());
        }
        RecordValue {
            name: self.name.clone(),
            fields,
        }
    }
}

// ──────────────────────────────────────────────
// Descriptors
// ──────────────────────────────────────────────

/// The closed set of shapes the codec understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Primitive(PrimitiveKind),
    Decimal,
    Timestamp,
    Date,
    Enum(EnumDescriptor),
    Bytes,
    Stream,
    Optional(Box<Descriptor>),
    Union(Vec<Descriptor>),
    List(Box<Descriptor>),
    Tuple(Vec<Descriptor>),
    /// Keys are always Text; `None` leaves values dynamically typed.
    Mapping(Option<Box<Descriptor>>),
    Record(RecordDescriptor),
}

impl Descriptor {
    pub fn bool() -> Self {
        Descriptor::Primitive(PrimitiveKind::Bool)
    }

    pub fn int() -> Self {
        Descriptor::Primitive(PrimitiveKind::Int)
    }

    pub fn float() -> Self {
        Descriptor::Primitive(PrimitiveKind::Float)
    }

    pub fn text() -> Self {
        Descriptor::Primitive(PrimitiveKind::Text)
    }

    pub fn optional(inner: Descriptor) -> Self {
        Descriptor::Optional(Box::new(inner))
    }

    pub fn list(element: Descriptor) -> Self {
        Descriptor::List(Box::new(element))
    }

    pub fn mapping(value: Descriptor) -> Self {
        Descriptor::Mapping(Some(Box::new(value)))
    }

    pub fn dynamic_mapping() -> Self {
        Descriptor::Mapping(None)
    }

    /// A human-readable shape name for error messages.
    pub fn type_name(&self) -> String {
        match self {
            Descriptor::Primitive(kind) => kind.name().to_string(),
            Descriptor::Decimal => "Decimal".to_string(),
            Descriptor::Timestamp => "Timestamp".to_string(),
            Descriptor::Date => "Date".to_string(),
            Descriptor::Enum(e) => format!("Enum({})", e.name),
            Descriptor::Bytes => "Bytes".to_string(),
            Descriptor::Stream => "Stream".to_string(),
            Descriptor::Optional(inner) => format!("Optional<{}>", inner.type_name()),
            Descriptor::Union(members) => {
                let names: Vec<String> = members.iter().map(|m| m.type_name()).collect();
                format!("Union<{}>", names.join(" | "))
            }
            Descriptor::List(element) => format!("List<{}>", element.type_name()),
            Descriptor::Tuple(slots) => {
                let names: Vec<String> = slots.iter().map(|s| s.type_name()).collect();
                format!("Tuple[{}]", names.join(", "))
            }
            Descriptor::Mapping(value) => match value {
                Some(v) => format!("Mapping<Text, {}>", v.type_name()),
                None => "Mapping<Text, any>".to_string(),
            },
            Descriptor::Record(r) => format!("Record({})", r.name),
        }
    }

    /// Whether a runtime value structurally conforms to this shape.
    /// Collection elements are checked shallowly; encode and decode do
    /// the deep work.
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (Descriptor::Optional(_), Value::Null) => true,
            (Descriptor::Optional(inner), v) => inner.admits(v),
            (Descriptor::Primitive(PrimitiveKind::Bool), Value::Bool(_)) => true,
            (Descriptor::Primitive(PrimitiveKind::Int), Value::Int(_)) => true,
            (Descriptor::Primitive(PrimitiveKind::Float), Value::Float(_)) => true,
            (Descriptor::Primitive(PrimitiveKind::Text), Value::Text(_)) => true,
            (Descriptor::Decimal, Value::Decimal(_)) => true,
            (Descriptor::Timestamp, Value::Timestamp(_)) => true,
            (Descriptor::Date, Value::Date(_)) => true,
            (Descriptor::Enum(e), Value::Enum(v)) => e.name == v.enumeration,
            (Descriptor::Bytes, Value::Bytes(_)) => true,
            (Descriptor::Stream, Value::Stream(_)) => true,
            (Descriptor::List(_), Value::List(_)) => true,
            (Descriptor::Tuple(slots), Value::Tuple(items)) => slots.len() == items.len(),
            (Descriptor::Mapping(_), Value::Map(_)) => true,
            (Descriptor::Record(r), Value::Record(v)) => {
                v.name.is_empty() || r.name == v.name
            }
            (Descriptor::Union(members), v) => members.iter().any(|m| m.admits(v)),
            _ => false,
        }
    }

    /// The zero value used for missing record fields and empty-object
    /// record decoding.
    pub fn zero_value(&self) -> Value {
        match self {
            Descriptor::Primitive(PrimitiveKind::Bool) => Value::Bool(false),
            Descriptor::Primitive(PrimitiveKind::Int) => Value::Int(0),
            Descriptor::Primitive(PrimitiveKind::Float) => Value::Float(0.0),
            Descriptor::Primitive(PrimitiveKind::Text) => Value::Text(String::new()),
            Descriptor::Decimal => Value::Decimal(Decimal::ZERO),
            // Calendar shapes and enumerations have no meaningful zero.
            Descriptor::Timestamp | Descriptor::Date | Descriptor::Enum(_) => Value::Null,
            Descriptor::Bytes => Value::Bytes(Vec::new()),
            Descriptor::Stream => Value::Stream(StreamValue::from_bytes(Vec::new())),
            Descriptor::Optional(_) | Descriptor::Union(_) => Value::Null,
            Descriptor::List(_) => Value::List(Vec::new()),
            Descriptor::Tuple(slots) => {
                Value::Tuple(slots.iter().map(Descriptor::zero_value).collect())
            }
            Descriptor::Mapping(_) => Value::Map(BTreeMap::new()),
            Descriptor::Record(r) => Value::Record(r.zero_instance()),
        }
    }

    /// A diagnostic JSON rendering, used by signature listings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Descriptor::Primitive(kind) => serde_json::json!({ "base": kind.name() }),
            Descriptor::Decimal => serde_json::json!({ "base": "Decimal" }),
            Descriptor::Timestamp => serde_json::json!({ "base": "Timestamp" }),
            Descriptor::Date => serde_json::json!({ "base": "Date" }),
            Descriptor::Enum(e) => {
                let members: Vec<serde_json::Value> = e
                    .members
                    .iter()
                    .map(|m| serde_json::json!({ "name": m.name, "value": scalar_json(&m.value) }))
                    .collect();
                serde_json::json!({ "base": "Enum", "name": e.name, "members": members })
            }
            Descriptor::Bytes => serde_json::json!({ "base": "Bytes" }),
            Descriptor::Stream => serde_json::json!({ "base": "Stream" }),
            Descriptor::Optional(inner) => {
                serde_json::json!({ "base": "Optional", "inner": inner.to_json() })
            }
            Descriptor::Union(members) => {
                let members: Vec<serde_json::Value> = members.iter().map(|m| m.to_json()).collect();
                serde_json::json!({ "base": "Union", "members": members })
            }
            Descriptor::List(element) => {
                serde_json::json!({ "base": "List", "element_type": element.to_json() })
            }
            Descriptor::Tuple(slots) => {
                let slots: Vec<serde_json::Value> = slots.iter().map(|s| s.to_json()).collect();
                serde_json::json!({ "base": "Tuple", "elements": slots })
            }
            Descriptor::Mapping(value) => match value {
                Some(v) => serde_json::json!({ "base": "Mapping", "value_type": v.to_json() }),
                None => serde_json::json!({ "base": "Mapping" }),
            },
            Descriptor::Record(r) => {
                let fields: Vec<serde_json::Value> = r
                    .fields
                    .iter()
                    .map(|(name, d)| serde_json::json!({ "name": name, "type": d.to_json() }))
                    .collect();
                serde_json::json!({ "base": "Record", "name": r.name, "fields": fields })
            }
        }
    }
}

fn scalar_json(scalar: &Scalar) -> serde_json::Value {
    match scalar {
        Scalar::Bool(b) => serde_json::json!(b),
        Scalar::Int(i) => serde_json::json!(i),
        Scalar::Float(x) => serde_json::json!(x),
        Scalar::Text(t) => serde_json::json!(t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> RecordDescriptor {
        RecordDescriptor::new("Point")
            .field("x", Descriptor::int())
            .field("y", Descriptor::int())
    }

    #[test]
    fn zero_instance_fills_every_field() {
        let zero = point().zero_instance();
        assert_eq!(zero.get("x"), Some(&Value::Int(0)));
        assert_eq!(zero.get("y"), Some(&Value::Int(0)));
    }

    #[test]
    fn union_admits_by_record_name() {
        let union = Descriptor::Union(vec![
            Descriptor::Record(point()),
            Descriptor::Record(RecordDescriptor::new("Label").field("text", Descriptor::text())),
        ]);
        let value = Value::Record(RecordValue::new("Label").field("text", Value::Text("hi".into())));
        assert!(union.admits(&value));
        assert!(!Descriptor::Record(point()).admits(&value));
    }

    #[test]
    fn enum_lookup_by_value_is_numeric_aware() {
        let level = EnumDescriptor::new("Level").member("LOW", 1i64).member("HIGH", 2i64);
        assert_eq!(
            level.member_for_value(&Scalar::Float(2.0)).map(|m| m.name.as_str()),
            Some("HIGH")
        );
        assert!(level.member_for_value(&Scalar::Int(3)).is_none());
    }
}
