//! Typed codec failures.
//!
//! Encode and decode are deterministic, so every failure is a local
//! fault reported synchronously to the caller; nothing is retried.

use std::fmt;

// ──────────────────────────────────────────────
// Encode errors
// ──────────────────────────────────────────────

/// Errors produced while encoding a runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The value does not conform to the declared descriptor.
    ShapeMismatch { expected: String, got: String },
    /// The value has no interchange representation (e.g. a non-finite
    /// float).
    UnsupportedValue { message: String },
    /// Serializing the interchange tree to text failed.
    Document { message: String },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::ShapeMismatch { expected, got } => {
                write!(f, "cannot encode {} where {} is declared", got, expected)
            }
            EncodeError::UnsupportedValue { message } => {
                write!(f, "unsupported value: {}", message)
            }
            EncodeError::Document { message } => {
                write!(f, "failed to serialize interchange document: {}", message)
            }
        }
    }
}

impl std::error::Error for EncodeError {}

// ──────────────────────────────────────────────
// Decode errors
// ──────────────────────────────────────────────

/// Errors produced while decoding interchange data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The raw text is not a well-formed interchange document.
    MalformedDocument { message: String },
    /// The interchange node has the wrong JSON kind for the descriptor.
    TypeMismatch { expected: String, got: &'static str },
    /// Null where the descriptor is neither Optional nor absent.
    UnexpectedNull { expected: String },
    /// The node has the right kind but unparseable content.
    MalformedPrimitive { expected: &'static str, message: String },
    /// The underlying value is not a member of the enumeration.
    UnknownEnumValue { enumeration: String, value: String },
    /// A stream object carries an encoding tag the codec does not know.
    UnsupportedStreamEncoding { encoding: String },
    /// A tuple array with the wrong number of elements.
    ArityMismatch { expected: usize, got: usize },
    /// An object decoded against an all-record union carries no
    /// `target_type` tag.
    MissingDiscriminator { union: String },
    /// The `target_type` tag names no member of the union.
    UnresolvedUnionMember { union: String, tag: String },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MalformedDocument { message } => {
                write!(f, "malformed interchange document: {}", message)
            }
            DecodeError::TypeMismatch { expected, got } => {
                write!(f, "expected {}, got {} node", expected, got)
            }
            DecodeError::UnexpectedNull { expected } => {
                write!(f, "null is not valid where {} is declared", expected)
            }
            DecodeError::MalformedPrimitive { expected, message } => {
                write!(f, "malformed {}: {}", expected, message)
            }
            DecodeError::UnknownEnumValue { enumeration, value } => {
                write!(f, "'{}' is not a member of enumeration {}", value, enumeration)
            }
            DecodeError::UnsupportedStreamEncoding { encoding } => {
                write!(f, "unsupported stream encoding '{}'", encoding)
            }
            DecodeError::ArityMismatch { expected, got } => {
                write!(f, "tuple arity mismatch: expected {} elements, got {}", expected, got)
            }
            DecodeError::MissingDiscriminator { union } => {
                write!(f, "object for {} carries no target_type discriminator", union)
            }
            DecodeError::UnresolvedUnionMember { union, tag } => {
                write!(f, "target_type '{}' names no member of {}", tag, union)
            }
        }
    }
}

impl std::error::Error for DecodeError {}
