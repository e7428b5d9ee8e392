//! gantry-codec: type-directed interchange codec for hook payloads.
//!
//! Converts richly-typed runtime values -- decimals, timestamps,
//! enumerations, byte buffers, streams, collections, optionals, tagged
//! unions, and nested records -- to and from a textual interchange
//! format, driven by explicit type descriptors rather than a shared
//! schema compiler. The codec is a pure, stateless function family:
//! descriptors are immutable data supplied per call, so concurrent
//! encode/decode needs no locking.
//!
//! Record fields are serialized as Text-wrapped sub-documents, making
//! every nesting level self-describing: a field can be decoded with
//! only its own declared shape, without parsing the parent first.

pub mod base85;
pub mod decode;
pub mod descriptor;
pub mod encode;
pub mod error;
mod temporal;
pub mod value;

pub use decode::{decode, decode_document};
pub use descriptor::{
    Descriptor, EnumDescriptor, EnumMember, PrimitiveKind, RecordDescriptor, TARGET_TYPE_KEY,
};
pub use encode::{encode, encode_document};
pub use error::{DecodeError, EncodeError};
pub use value::{EnumValue, RecordValue, Scalar, StreamEncoding, StreamValue, Value};

/// Crate version, reported by the host's index route.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
