//! End-to-end binding behavior over the public API.

use alloc::{string::ToString, vec, vec::Vec};

use super::fixtures::{Counter, Event, Id, Mixed, Note, Probe, Reading, ReadingValue};
use crate::{
    parse, parse_array, parse_value, to_vec, CommentMode, ErrorReason, Field, IntWidth, Kind,
    ParseOptions, TrustMode, WhitespaceMode,
};

fn checked() -> ParseOptions {
    ParseOptions::default()
}

fn unchecked() -> ParseOptions {
    ParseOptions {
        trust: TrustMode::Unchecked,
        ..Default::default()
    }
}

#[test]
fn binds_members_in_any_input_order() {
    let p: Probe = parse(br#"{"b":true,"a":-7}"#, &checked()).unwrap();
    assert_eq!(p, Probe { a: -7, b: true });
    let p: Probe = parse(br#"{"a":-7,"b":true}"#, &checked()).unwrap();
    assert_eq!(p, Probe { a: -7, b: true });
}

#[test]
fn nullable_member_absent_null_or_present() {
    let c: Counter = parse(b"{}", &checked()).unwrap();
    assert_eq!(c.x, None);
    let c: Counter = parse(br#"{"x":null}"#, &checked()).unwrap();
    assert_eq!(c.x, None);
    let c: Counter = parse(br#"{"x":42}"#, &checked()).unwrap();
    assert_eq!(c.x, Some(42));
}

#[test]
fn nullable_value_without_enclosing_object() {
    let kind = Kind::Null(Kind::Signed(IntWidth::W32).into());
    assert_eq!(
        parse_value(b"5,", &kind, &unchecked()).unwrap(),
        Field::Signed(5)
    );
    assert_eq!(
        parse_value(b"null,", &kind, &unchecked()).unwrap(),
        Field::Null
    );
}

#[test]
fn path_option_selects_a_sub_document() {
    let options = ParseOptions {
        path: Some("a[2]".to_string()),
        ..Default::default()
    };
    let n: Note = parse(br#"{"a":[10,20,{"s":"hi"}]}"#, &options).unwrap();
    assert_eq!(n.s, "hi");
}

#[test]
fn unknown_members_are_tolerated() {
    let with_extras = br#"{"junk":[{"deep":1}],"a":-7,"more":"x","b":true}"#;
    let p: Probe = parse(with_extras, &checked()).unwrap();
    assert_eq!(p, parse::<Probe>(br#"{"a":-7,"b":true}"#, &checked()).unwrap());
}

#[test]
fn unknown_members_rejected_in_strict_mode() {
    let options = ParseOptions {
        deny_unknown_members: true,
        ..Default::default()
    };
    let err = parse::<Probe>(br#"{"a":1,"zz":2,"b":true}"#, &options).unwrap_err();
    assert_eq!(err.reason, ErrorReason::UnknownMember("zz".to_string()));
}

#[test]
fn missing_non_nullable_member_errors() {
    let err = parse::<Probe>(br#"{"a":1}"#, &checked()).unwrap_err();
    assert_eq!(err.reason, ErrorReason::MissingMember("b".to_string()));
}

#[test]
fn missing_separator_errors() {
    let err = parse::<Probe>(br#"{"a":1 "b":true}"#, &checked()).unwrap_err();
    assert!(err.to_string().contains("Expected"));
}

#[test]
fn overflow_reports_numeric_overflow() {
    let err = parse::<Probe>(br#"{"a":3000000000,"b":true}"#, &checked()).unwrap_err();
    assert_eq!(err.reason, ErrorReason::NumericOverflow);
}

#[test]
fn unsigned_rejects_minus() {
    let err = parse::<Counter>(br#"{"x":-1}"#, &checked()).unwrap_err();
    assert_eq!(err.reason, ErrorReason::InvalidNumber);
}

#[test]
fn most_negative_signed_round_trips() {
    let kind = Kind::Signed(IntWidth::W64);
    let parsed = parse_value(b"-9223372036854775808", &kind, &checked()).unwrap();
    assert_eq!(parsed, Field::Signed(i64::MIN));
}

#[test]
fn comments_skipped_when_enabled() {
    let options = ParseOptions {
        comments: CommentMode::CStyle,
        ..Default::default()
    };
    let p: Probe = parse(
        b"{ // leading\n \"a\": /* inline */ 1, \"b\": true }",
        &options,
    )
    .unwrap();
    assert_eq!(p, Probe { a: 1, b: true });

    let options = ParseOptions {
        comments: CommentMode::Hash,
        ..Default::default()
    };
    let p: Probe = parse(b"{ # note\n \"a\":1, \"b\":false }", &options).unwrap();
    assert_eq!(p, Probe { a: 1, b: false });
}

#[test]
fn whitespace_disallow_rejects_padding() {
    let options = ParseOptions {
        whitespace: WhitespaceMode::Disallow,
        ..Default::default()
    };
    assert!(parse::<Probe>(br#"{"a":1,"b":true}"#, &options).is_ok());
    assert!(parse::<Probe>(br#"{ "a":1,"b":true}"#, &options).is_err());
}

#[test]
fn parses_arrays_of_aggregates() {
    let probes: Vec<Probe> =
        parse_array(br#" [ {"a":1,"b":true} , {"b":false,"a":2} ] "#, &checked()).unwrap();
    assert_eq!(
        probes,
        vec![Probe { a: 1, b: true }, Probe { a: 2, b: false }]
    );
    let empty: Vec<Probe> = parse_array(b"[]", &checked()).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn tagged_variant_resolves_tag_before_variant() {
    let r: Reading = parse(br#"{"t":0,"v":21.5}"#, &checked()).unwrap();
    assert_eq!(r.v, ReadingValue::Temp(21.5));
    let r: Reading = parse(br#"{"t":1,"v":"high"}"#, &checked()).unwrap();
    assert_eq!(r.v, ReadingValue::Label("high".to_string()));
}

#[test]
fn tagged_variant_resolves_variant_before_tag() {
    // The raw range is buffered and re-parsed once the tag is known.
    let r: Reading = parse(br#"{"v":"high","t":1}"#, &checked()).unwrap();
    assert_eq!(r.v, ReadingValue::Label("high".to_string()));
    let r: Reading = parse(br#"{"v":21.5,"t":0}"#, &checked()).unwrap();
    assert_eq!(r.v, ReadingValue::Temp(21.5));
}

#[test]
fn tagged_variant_missing_tag_errors() {
    let err = parse::<Reading>(br#"{"v":21.5}"#, &checked()).unwrap_err();
    assert_eq!(err.reason, ErrorReason::MissingMember("t".to_string()));
}

#[test]
fn untagged_variant_dispatches_on_first_byte() {
    let m: Mixed = parse(br#"{"id":12}"#, &checked()).unwrap();
    assert_eq!(m.id, Id::Num(12));
    let m: Mixed = parse(br#"{"id":"twelve"}"#, &checked()).unwrap();
    assert_eq!(m.id, Id::Name("twelve".to_string()));
}

#[test]
fn round_trip_preserves_values() {
    let event = Event {
        name: "deploy \"v2\"\n".to_string(),
        at: 97_445_006,
        sizes: vec![0, 1, u64::MAX],
        attrs: vec![
            ("region".to_string(), "eu".to_string()),
            ("ok".to_string(), "yes".to_string()),
        ],
        note: None,
    };
    let bytes = to_vec(&event, &Default::default()).unwrap();
    let back: Event = parse(&bytes, &checked()).unwrap();
    assert_eq!(back, event);
    // Serialization is idempotent byte-for-byte.
    assert_eq!(to_vec(&back, &Default::default()).unwrap(), bytes);
}

#[test]
fn empty_object_and_empty_array_members() {
    let event: Event = parse(
        br#"{"name":"","at":"1970-01-01T00:00:00Z","sizes":[],"attrs":{}}"#,
        &checked(),
    )
    .unwrap();
    assert_eq!(event.sizes, Vec::<u64>::new());
    assert_eq!(event.attrs, Vec::new());
    assert_eq!(event.note, None);
}

#[test]
fn unexpected_end_reports_offset() {
    let err = parse::<Probe>(br#"{"a":1,"#, &checked()).unwrap_err();
    assert_eq!(err.reason, ErrorReason::UnexpectedEnd);
    assert_eq!(err.offset, 7);
}

#[test]
fn invalid_escape_is_reported() {
    let err = parse::<Note>(br#"{"s":"a\q"}"#, &checked()).unwrap_err();
    assert_eq!(err.reason, ErrorReason::InvalidEscape);
}

#[test]
fn surrogate_pairs_decode_to_one_code_point() {
    let n: Note = parse(br#"{"s":"\uD800\uDC00 \uDBFF\uDFFF"}"#, &checked()).unwrap();
    assert_eq!(n.s, "\u{10000} \u{10FFFF}");
}

#[test]
fn lone_surrogate_is_an_invalid_escape() {
    let err = parse::<Note>(br#"{"s":"\uD800"}"#, &checked()).unwrap_err();
    assert_eq!(err.reason, ErrorReason::InvalidEscape);
}

#[test]
fn key_value_array_binds_fixed_member_names() {
    let kind = Kind::KeyValueArray {
        key_name: "k",
        key: Kind::StringEscaped.into(),
        value_name: "v",
        value: Kind::Signed(IntWidth::W32).into(),
    };
    let parsed = parse_value(
        br#"[ {"k":"a","v":1} , {"v":-2,"k":"b"} ]"#,
        &kind,
        &checked(),
    )
    .unwrap();
    assert_eq!(
        parsed,
        Field::Entries(vec![
            (Field::Str("a".to_string()), Field::Signed(1)),
            (Field::Str("b".to_string()), Field::Signed(-2)),
        ])
    );

    let err = parse_value(br#"[{"k":"a"}]"#, &kind, &checked()).unwrap_err();
    assert_eq!(err.reason, ErrorReason::MissingMember("v".to_string()));
}

#[test]
fn path_not_found_is_its_own_error() {
    let options = ParseOptions {
        path: Some("missing.member".to_string()),
        ..Default::default()
    };
    let err = parse::<Probe>(br#"{"a":1,"b":true}"#, &options).unwrap_err();
    assert_eq!(err.reason, ErrorReason::PathNotFound);
}
