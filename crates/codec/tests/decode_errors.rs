//! Failure-path suite: every malformed input maps to a typed decode
//! error, never a silent default.

use gantry_codec::{
    decode, decode_document, encode, DecodeError, Descriptor, EncodeError, EnumDescriptor,
    RecordDescriptor, RecordValue, Value, TARGET_TYPE_KEY,
};

fn gender() -> EnumDescriptor {
    EnumDescriptor::new("Gender")
        .member("MALE", "Male")
        .member("FEMALE", "Female")
}

#[test]
fn unknown_enum_value_is_an_error_not_a_default() {
    let descriptor = Descriptor::Enum(gender());
    let err = decode(&serde_json::json!("Other"), Some(&descriptor)).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnknownEnumValue {
            enumeration: "Gender".to_string(),
            value: "Other".to_string(),
        }
    );
}

#[test]
fn malformed_decimal_is_rejected() {
    let err = decode(&serde_json::json!("12.4x5"), Some(&Descriptor::Decimal)).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedPrimitive { expected: "decimal", .. }));
}

#[test]
fn malformed_timestamp_and_date_are_rejected() {
    let err = decode(&serde_json::json!("yesterday"), Some(&Descriptor::Timestamp)).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedPrimitive { .. }));

    let err = decode(&serde_json::json!("2024-13-01"), Some(&Descriptor::Date)).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedPrimitive { .. }));
}

#[test]
fn malformed_base85_is_rejected() {
    let err = decode(&serde_json::json!("abc de"), Some(&Descriptor::Bytes)).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedPrimitive { expected: "base-85 text", .. }));
}

#[test]
fn unknown_stream_encoding_is_rejected() {
    let node = serde_json::json!({ "encoding": "utf-16", "content": "" });
    let err = decode(&node, Some(&Descriptor::Stream)).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnsupportedStreamEncoding {
            encoding: "utf-16".to_string(),
        }
    );
}

#[test]
fn stream_without_content_is_rejected() {
    let node = serde_json::json!({ "encoding": "bytes" });
    let err = decode(&node, Some(&Descriptor::Stream)).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedPrimitive { expected: "stream object", .. }));
}

#[test]
fn tuple_arity_is_checked() {
    let descriptor = Descriptor::Tuple(vec![Descriptor::int(), Descriptor::int()]);
    let err = decode(&serde_json::json!([1, 2, 3]), Some(&descriptor)).unwrap_err();
    assert_eq!(err, DecodeError::ArityMismatch { expected: 2, got: 3 });
}

#[test]
fn null_is_illegal_outside_optional() {
    let err = decode(&serde_json::Value::Null, Some(&Descriptor::int())).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnexpectedNull {
            expected: "Int".to_string(),
        }
    );
}

#[test]
fn union_with_unknown_tag_is_rejected() {
    let union = Descriptor::Union(vec![Descriptor::Record(
        RecordDescriptor::new("Cat").field("name", Descriptor::text()),
    )]);
    let node = serde_json::json!({ TARGET_TYPE_KEY: "Sloth", "name": "\"x\"" });
    let err = decode(&node, Some(&union)).unwrap_err();
    assert!(matches!(err, DecodeError::UnresolvedUnionMember { ref tag, .. } if tag == "Sloth"));
}

#[test]
fn untagged_object_against_all_record_union_is_rejected() {
    let union = Descriptor::Union(vec![
        Descriptor::Record(RecordDescriptor::new("Cat").field("name", Descriptor::text())),
        Descriptor::Record(RecordDescriptor::new("Dog").field("name", Descriptor::text())),
    ]);
    let err = decode(&serde_json::json!({ "name": "\"x\"" }), Some(&union)).unwrap_err();
    assert!(matches!(err, DecodeError::MissingDiscriminator { .. }));
}

#[test]
fn union_with_scalar_member_falls_back_to_shape_inference() {
    let union = Descriptor::Union(vec![
        Descriptor::Record(RecordDescriptor::new("Cat").field("name", Descriptor::text())),
        Descriptor::int(),
    ]);
    assert_eq!(decode(&serde_json::json!(5), Some(&union)).unwrap(), Value::Int(5));
    // Inference keeps bare text as Text; no opportunistic sniffing once
    // a union was declared.
    assert_eq!(
        decode(&serde_json::json!("2024-03-01"), Some(&union)).unwrap(),
        Value::Text("2024-03-01".into())
    );
}

#[test]
fn wrong_node_kind_is_a_type_mismatch() {
    let err = decode(&serde_json::json!(true), Some(&Descriptor::text())).unwrap_err();
    assert_eq!(
        err,
        DecodeError::TypeMismatch {
            expected: "Text".to_string(),
            got: "boolean",
        }
    );

    let err = decode(&serde_json::json!("not a list"), Some(&Descriptor::list(Descriptor::int())))
        .unwrap_err();
    assert!(matches!(err, DecodeError::TypeMismatch { .. }));
}

#[test]
fn record_field_with_inline_structure_is_rejected() {
    // Field values must be Text-wrapped documents; an inline object is
    // a producer bug worth surfacing.
    let descriptor = Descriptor::Record(
        RecordDescriptor::new("Holder").field("inner", Descriptor::text()),
    );
    let node = serde_json::json!({ "inner": { "oops": true } });
    let err = decode(&node, Some(&descriptor)).unwrap_err();
    assert!(matches!(err, DecodeError::TypeMismatch { .. }));
}

#[test]
fn garbage_document_text_is_rejected() {
    let err = decode_document("{not json", Some(&Descriptor::int())).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedDocument { .. }));
}

#[test]
fn encode_rejects_nonconforming_values() {
    let err = encode(&Value::Int(1), Some(&Descriptor::text())).unwrap_err();
    assert_eq!(
        err,
        EncodeError::ShapeMismatch {
            expected: "Text".to_string(),
            got: "Int".to_string(),
        }
    );

    let err = encode(&Value::Null, Some(&Descriptor::int())).unwrap_err();
    assert!(matches!(err, EncodeError::ShapeMismatch { .. }));
}

#[test]
fn encode_rejects_non_finite_floats() {
    let err = encode(&Value::Float(f64::NAN), Some(&Descriptor::float())).unwrap_err();
    assert!(matches!(err, EncodeError::UnsupportedValue { .. }));
}

#[test]
fn encode_rejects_record_name_mismatch() {
    let descriptor = Descriptor::Record(RecordDescriptor::new("Cat").field("name", Descriptor::text()));
    let value = Value::Record(RecordValue::new("Dog").field("name", Value::Text("x".into())));
    let err = encode(&value, Some(&descriptor)).unwrap_err();
    assert!(matches!(err, EncodeError::ShapeMismatch { .. }));
}
