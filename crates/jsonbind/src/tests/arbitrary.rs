//! Quickcheck generators for JSON documents.

use alloc::string::String;

use quickcheck::{Arbitrary, Gen};

/// A finite `f64`; JSON has no NaN or infinities.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct JsonNumber(pub f64);

impl Arbitrary for JsonNumber {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        Self(value)
    }
}

/// An arbitrary JSON document, carried as a `serde_json::Value` so tests
/// can render and cross-check it.
#[derive(Debug, Clone)]
pub(crate) struct Doc(pub serde_json::Value);

fn gen_value(g: &mut Gen, depth: usize) -> serde_json::Value {
    use serde_json::Value;
    let choices = if depth == 0 { 4 } else { 6 };
    match usize::arbitrary(g) % choices {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => {
            let n = JsonNumber::arbitrary(g).0;
            serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
        }
        3 => Value::String(String::arbitrary(g)),
        4 => {
            let len = usize::arbitrary(g) % 4;
            Value::Array((0..len).map(|_| gen_value(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            Value::Object(
                (0..len)
                    .map(|_| (String::arbitrary(g), gen_value(g, depth - 1)))
                    .collect(),
            )
        }
    }
}

impl Arbitrary for Doc {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(gen_value(g, 2))
    }
}

/// Iteration counts scaled the way CI expects.
pub(crate) fn test_count() -> u64 {
    if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}
