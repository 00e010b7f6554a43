//! Serializer output, byte for byte.

use alloc::{string::String, string::ToString, vec, vec::Vec};

use insta::assert_snapshot;

use super::fixtures::{Counter, Event, Id, Mixed, Note, Probe, Reading, ReadingValue};
use crate::{
    serialize_array, to_vec, EightBitMode, Field, IntWidth, Kind, SerializeOptions,
};

fn rendered<T: crate::JsonBind>(value: &T, options: &SerializeOptions) -> String {
    String::from_utf8(to_vec(value, options).unwrap()).unwrap()
}

fn rendered_value(kind: &Kind, field: &Field, options: &SerializeOptions) -> String {
    let mut out = Vec::new();
    crate::ser::value(kind, field, options, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn members_render_in_description_order() {
    let p = Probe { a: -7, b: true };
    assert_snapshot!(rendered(&p, &Default::default()), @r#"{"a":-7,"b":true}"#);
}

#[test]
fn escaping_follows_the_eight_bit_mode() {
    let n = Note {
        s: "a\"b\n\u{FF}".to_string(),
    };
    assert_eq!(
        rendered(
            &n,
            &SerializeOptions {
                eight_bit: EightBitMode::DisallowHigh
            }
        ),
        "{\"s\":\"a\\\"b\\n\\u00FF\"}"
    );
    assert_eq!(
        rendered(
            &n,
            &SerializeOptions {
                eight_bit: EightBitMode::AllowFull
            }
        )
        .as_bytes(),
        b"{\"s\":\"a\\\"b\\n\xC3\xBF\"}"
    );
}

#[test]
fn dates_render_iso_8601() {
    assert_eq!(
        rendered_value(&Kind::Date, &Field::Date(97_445_006), &Default::default()),
        "\"1970-01-02T03:04:05.006Z\""
    );
    // Milliseconds omitted when zero.
    assert_eq!(
        rendered_value(&Kind::Date, &Field::Date(97_445_000), &Default::default()),
        "\"1970-01-02T03:04:05Z\""
    );
    assert_eq!(
        rendered_value(&Kind::Date, &Field::Date(0), &Default::default()),
        "\"1970-01-01T00:00:00Z\""
    );
    // Pre-epoch times carry into the previous civil day.
    assert_eq!(
        rendered_value(&Kind::Date, &Field::Date(-1), &Default::default()),
        "\"1969-12-31T23:59:59.999Z\""
    );
}

#[test]
fn empty_nullable_members_are_omitted() {
    assert_snapshot!(rendered(&Counter { x: None }, &Default::default()), @"{}");
    assert_snapshot!(
        rendered(&Counter { x: Some(42) }, &Default::default()),
        @r#"{"x":42}"#
    );
}

#[test]
fn whole_aggregate_renders_compact() {
    let event = Event {
        name: "launch".to_string(),
        at: 97_445_006,
        sizes: vec![1, 2],
        attrs: vec![("k".to_string(), "v".to_string())],
        note: Some("ok".to_string()),
    };
    assert_snapshot!(
        rendered(&event, &Default::default()),
        @r#"{"name":"launch","at":"1970-01-02T03:04:05.006Z","sizes":[1,2],"attrs":{"k":"v"},"note":"ok"}"#
    );
}

#[test]
fn serialized_output_is_valid_json() {
    let event = Event {
        name: "x/y \"q\"".to_string(),
        at: 0,
        sizes: vec![u64::MAX],
        attrs: vec![("a b".to_string(), "c\nd".to_string())],
        note: None,
    };
    let bytes = to_vec(&event, &Default::default()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["name"], "x/y \"q\"");
    assert_eq!(value["attrs"]["a b"], "c\nd");
    assert_eq!(value["sizes"][0], serde_json::json!(u64::MAX));
    assert!(value.get("note").is_none());
}

#[test]
fn tagged_variant_emits_the_tag_once() {
    let r = Reading {
        v: ReadingValue::Temp(21.5),
    };
    assert_snapshot!(rendered(&r, &Default::default()), @r#"{"t":0,"v":21.5}"#);
    let r = Reading {
        v: ReadingValue::Label("high".to_string()),
    };
    assert_snapshot!(rendered(&r, &Default::default()), @r#"{"t":1,"v":"high"}"#);
}

#[test]
fn untagged_variant_renders_its_active_branch() {
    assert_snapshot!(
        rendered(&Mixed { id: Id::Num(12) }, &Default::default()),
        @r#"{"id":12}"#
    );
    assert_snapshot!(
        rendered(&Mixed { id: Id::Name("n".to_string()) }, &Default::default()),
        @r#"{"id":"n"}"#
    );
}

#[test]
fn slices_render_as_arrays() {
    let probes = [Probe { a: 1, b: false }, Probe { a: 2, b: true }];
    let mut out = Vec::new();
    serialize_array(&probes, &mut out, &Default::default()).unwrap();
    assert_eq!(out, br#"[{"a":1,"b":false},{"a":2,"b":true}]"#);
}

#[test]
fn key_value_array_renders_fixed_member_names() {
    let kind = Kind::KeyValueArray {
        key_name: "k",
        key: Kind::StringEscaped.into(),
        value_name: "v",
        value: Kind::Real.into(),
    };
    let field = Field::Entries(vec![
        (Field::Str("a".to_string()), Field::Real(1.5)),
        (Field::Str("b".to_string()), Field::Real(-2.0)),
    ]);
    assert_eq!(
        rendered_value(&kind, &field, &Default::default()),
        r#"[{"k":"a","v":1.5},{"k":"b","v":-2}]"#
    );
}

#[test]
fn numeric_map_keys_stay_quoted() {
    let kind = Kind::KeyValue {
        key: Kind::Unsigned(IntWidth::W64).into(),
        value: Kind::Bool.into(),
    };
    let field = Field::Entries(vec![(Field::Unsigned(7), Field::Bool(true))]);
    assert_eq!(
        rendered_value(&kind, &field, &Default::default()),
        r#"{"7":true}"#
    );
}

#[test]
fn non_finite_reals_render_null() {
    assert_eq!(
        rendered_value(&Kind::Real, &Field::Real(f64::NAN), &Default::default()),
        "null"
    );
    assert_eq!(
        rendered_value(
            &Kind::Real,
            &Field::Real(f64::INFINITY),
            &Default::default()
        ),
        "null"
    );
}

#[test]
fn raw_strings_pass_escapes_through() {
    // The raw form keeps whatever escapes the value already carries.
    assert_eq!(
        rendered_value(
            &Kind::StringRaw,
            &Field::Str("a\\u0041b".to_string()),
            &Default::default()
        ),
        "\"a\\u0041b\""
    );
}

#[test]
fn field_shape_mismatch_is_reported() {
    let mut out = Vec::new();
    let err = crate::ser::value(
        &Kind::Bool,
        &Field::Signed(1),
        &Default::default(),
        &mut out,
    )
    .unwrap_err();
    assert_eq!(err, crate::SerializeError::FieldMismatch);
}
