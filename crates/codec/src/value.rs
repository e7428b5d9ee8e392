//! Runtime value types carried across the hook boundary.

use std::collections::BTreeMap;
use std::io;

use rust_decimal::Decimal;
use time::{Date, PrimitiveDateTime};

// ──────────────────────────────────────────────
// Scalars
// ──────────────────────────────────────────────

/// The underlying primitive of an enumeration member.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Numeric-aware equality: an integer underlying value matches a float
    /// of the same magnitude, so payloads produced by loosely-typed peers
    /// still resolve.
    pub fn matches(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Int(a), Scalar::Float(b)) | (Scalar::Float(b), Scalar::Int(a)) => {
                *a as f64 == *b
            }
            (a, b) => a == b,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(t) => write!(f, "{}", t),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

// ──────────────────────────────────────────────
// Enumeration members
// ──────────────────────────────────────────────

/// A resolved member of a named enumeration.
///
/// Carries its underlying primitive so encoding does not need the
/// enumeration descriptor at hand.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    /// Name of the enumeration this member belongs to.
    pub enumeration: String,
    /// Member name (e.g. `FEMALE`).
    pub member: String,
    /// Underlying primitive value (e.g. `"Female"`).
    pub value: Scalar,
}

// ──────────────────────────────────────────────
// Streams
// ──────────────────────────────────────────────

/// Whether a stream buffer holds opaque bytes or UTF-8 text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEncoding {
    Bytes,
    Utf8,
}

impl StreamEncoding {
    /// The wire tag written into the stream's interchange object.
    pub fn tag(self) -> &'static str {
        match self {
            StreamEncoding::Bytes => "bytes",
            StreamEncoding::Utf8 => "utf-8",
        }
    }
}

/// An in-memory byte or text buffer with a read cursor.
///
/// Encoding captures the ENTIRE buffer, not the unread remainder: a
/// stream that has been partially consumed still serializes to its full
/// content, and decoding always produces a fresh stream with the cursor
/// at the start. Equality therefore ignores the cursor.
#[derive(Debug, Clone)]
pub struct StreamValue {
    encoding: StreamEncoding,
    buf: Vec<u8>,
    pos: usize,
}

impl StreamValue {
    /// A binary-backed stream.
    pub fn from_bytes(buf: Vec<u8>) -> Self {
        StreamValue {
            encoding: StreamEncoding::Bytes,
            buf,
            pos: 0,
        }
    }

    /// A text-backed stream.
    pub fn from_text(text: impl Into<String>) -> Self {
        StreamValue {
            encoding: StreamEncoding::Utf8,
            buf: text.into().into_bytes(),
            pos: 0,
        }
    }

    pub fn encoding(&self) -> StreamEncoding {
        self.encoding
    }

    /// The full buffered content, regardless of how much has been read.
    pub fn contents(&self) -> &[u8] {
        &self.buf
    }

    /// The full content as text, when this is a UTF-8 stream.
    pub fn utf8_contents(&self) -> Option<&str> {
        match self.encoding {
            StreamEncoding::Utf8 => std::str::from_utf8(&self.buf).ok(),
            StreamEncoding::Bytes => None,
        }
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl PartialEq for StreamValue {
    fn eq(&self, other: &Self) -> bool {
        // The cursor is transient state; the wire format never carries it.
        self.encoding == other.encoding && self.buf == other.buf
    }
}

impl io::Read for StreamValue {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let start = self.pos.min(self.buf.len());
        let remaining = &self.buf[start..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos = start + n;
        Ok(n)
    }
}

// ──────────────────────────────────────────────
// Records
// ──────────────────────────────────────────────

/// An instance of a named record shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    /// The record type name, matching its descriptor's registered name.
    pub name: String,
    pub fields: BTreeMap<String, Value>,
}

impl RecordValue {
    pub fn new(name: impl Into<String>) -> Self {
        RecordValue {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field assignment.
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

/// A runtime value exchanged across the hook boundary.
///
/// Exact numerics use [`rust_decimal::Decimal`]; `Float` exists only for
/// shapes that genuinely are floating point.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Decimal(Decimal),
    Timestamp(PrimitiveDateTime),
    Date(Date),
    Enum(EnumValue),
    Bytes(Vec<u8>),
    Stream(StreamValue),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Record(RecordValue),
}

impl Value {
    /// A human-readable shape name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Text(_) => "Text",
            Value::Decimal(_) => "Decimal",
            Value::Timestamp(_) => "Timestamp",
            Value::Date(_) => "Date",
            Value::Enum(_) => "Enum",
            Value::Bytes(_) => "Bytes",
            Value::Stream(_) => "Stream",
            Value::List(_) => "List",
            Value::Tuple(_) => "Tuple",
            Value::Map(_) => "Map",
            Value::Record(_) => "Record",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<PrimitiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<Date> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<&StreamValue> {
        match self {
            Value::Stream(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn stream_read_advances_cursor_but_not_contents() {
        let mut stream = StreamValue::from_bytes(vec![1, 2, 3, 4]);
        let mut first = [0u8; 2];
        stream.read(&mut first).unwrap();
        assert_eq!(first, [1, 2]);
        assert_eq!(stream.position(), 2);
        assert_eq!(stream.contents(), &[1, 2, 3, 4]);
    }

    #[test]
    fn stream_equality_ignores_cursor() {
        let mut consumed = StreamValue::from_bytes(vec![9, 9]);
        let mut sink = [0u8; 1];
        consumed.read(&mut sink).unwrap();
        assert_eq!(consumed, StreamValue::from_bytes(vec![9, 9]));
    }

    #[test]
    fn scalar_numeric_match() {
        assert!(Scalar::Int(2).matches(&Scalar::Float(2.0)));
        assert!(!Scalar::Int(2).matches(&Scalar::Float(2.5)));
        assert!(Scalar::Text("a".into()).matches(&Scalar::from("a")));
    }
}
