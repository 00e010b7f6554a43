//! Member descriptions: the static shape of an aggregate.
//!
//! A [`Description`] is an ordered list of [`Member`] entries, each naming a
//! JSON member, its expected [`Kind`], and whether it may be absent or
//! `null`. Descriptions are plain values built per type (usually inside
//! [`JsonBind::description`](crate::JsonBind::description)); nothing is
//! registered globally.

use alloc::{boxed::Box, vec::Vec};

use crate::{error::JsonError, field::Field};

/// Storage width of an integer member, for overflow checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    pub(crate) fn holds_signed(self, v: i64) -> bool {
        match self {
            Self::W8 => i8::try_from(v).is_ok(),
            Self::W16 => i16::try_from(v).is_ok(),
            Self::W32 => i32::try_from(v).is_ok(),
            Self::W64 => true,
        }
    }

    pub(crate) fn holds_unsigned(self, v: u64) -> bool {
        match self {
            Self::W8 => u8::try_from(v).is_ok(),
            Self::W16 => u16::try_from(v).is_ok(),
            Self::W32 => u32::try_from(v).is_ok(),
            Self::W64 => true,
        }
    }
}

/// A tag value a [`Kind::VariantTagged`] branch is selected by.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Str(&'static str),
}

impl TagValue {
    /// Whether a parsed tag member selects this branch.
    pub(crate) fn matches(&self, field: &Field) -> bool {
        match (self, field) {
            (Self::Bool(t), Field::Bool(f)) => t == f,
            (Self::Signed(t), Field::Signed(f)) => t == f,
            (Self::Signed(t), Field::Unsigned(f)) => u64::try_from(*t) == Ok(*f),
            (Self::Unsigned(t), Field::Unsigned(f)) => t == f,
            (Self::Unsigned(t), Field::Signed(f)) => i64::try_from(*t) == Ok(*f),
            (Self::Str(t), Field::Str(f)) => t.as_bytes() == f.as_bytes(),
            _ => false,
        }
    }
}

/// Converter pair for [`Kind::Custom`] members.
///
/// `from_json` receives the raw bytes of the value: for `as_string`
/// members, the undecoded contents between the quotes; otherwise the whole
/// value as skipped. `to_json` renders the field back to those same bytes.
#[derive(Clone, Copy)]
pub struct CustomConverter {
    pub from_json: fn(&[u8]) -> Result<Field, JsonError>,
    pub to_json: fn(&Field) -> Option<Vec<u8>>,
    /// Whether the JSON form is a quoted string.
    pub as_string: bool,
}

impl core::fmt::Debug for CustomConverter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CustomConverter")
            .field("as_string", &self.as_string)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomConverter {
    fn eq(&self, other: &Self) -> bool {
        // Function pointer identity; good enough for description equality.
        self.from_json as usize == other.from_json as usize
            && self.to_json as usize == other.to_json as usize
            && self.as_string == other.as_string
    }
}

/// The JSON-side interpretation of a member.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    /// `true` or `false`.
    Bool,
    /// `-?[0-9]+`, bound to a signed integer of the given width.
    Signed(IntWidth),
    /// `[0-9]+`, bound to an unsigned integer of the given width.
    Unsigned(IntWidth),
    /// Any JSON number, bound to a float.
    Real,
    /// A string captured verbatim, escapes preserved.
    StringRaw,
    /// A string decoded to UTF-8, escapes and surrogate pairs processed.
    StringEscaped,
    /// `"YYYY-MM-DDTHH:MM:SS(.fff)?Z"`, bound to epoch milliseconds.
    Date,
    /// An object parsed against a nested description.
    Class(Description),
    /// An array of homogeneous elements.
    Array(Box<Kind>),
    /// An object treated as a mapping; input member names are the keys.
    KeyValue { key: Box<Kind>, value: Box<Kind> },
    /// `[{"k":…, "v":…}, …]`: a mapping with fixed key/value member names
    /// inside each element object.
    KeyValueArray {
        key_name: &'static str,
        key: Box<Kind>,
        value_name: &'static str,
        value: Box<Kind>,
    },
    /// Untagged union: the first non-whitespace byte of the value selects
    /// the first structurally compatible branch.
    Variant(Vec<Kind>),
    /// Tagged union: a sibling member named `tag`, described earlier in the
    /// same parent, carries the discriminator.
    VariantTagged {
        tag: &'static str,
        branches: Vec<(TagValue, Kind)>,
    },
    /// User-defined conversion from/to the raw byte form.
    Custom(CustomConverter),
    /// Literal `null` or the wrapped kind.
    Null(Box<Kind>),
}

/// One described member of an aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: &'static str,
    pub kind: Kind,
    pub nullable: bool,
}

impl Member {
    #[must_use]
    pub fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    /// Marks the member as allowed to be absent or literal `null`.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// The static shape of an aggregate: an ordered list of members.
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    members: Vec<Member>,
}

impl Description {
    /// Builds a description, validating its invariants.
    ///
    /// # Panics
    ///
    /// Descriptions are program constants, so violations are programmer
    /// errors rather than input errors:
    ///
    /// - a duplicate member name;
    /// - a `VariantTagged` member whose tag does not name an *earlier*
    ///   sibling;
    /// - a `Null` kind wrapping another `Null`.
    #[must_use]
    pub fn new(members: Vec<Member>) -> Self {
        for (i, m) in members.iter().enumerate() {
            assert!(
                members[..i].iter().all(|p| p.name != m.name),
                "duplicate member name '{}'",
                m.name
            );
            if let Kind::VariantTagged { tag, .. } = &m.kind {
                assert!(
                    members[..i].iter().any(|p| p.name == *tag),
                    "tag '{tag}' must name an earlier sibling of '{}'",
                    m.name
                );
            }
            if let Kind::Null(inner) = &m.kind {
                assert!(
                    !matches!(**inner, Kind::Null(_)),
                    "Null wraps exactly one non-null kind"
                );
            }
        }
        Self { members }
    }

    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Look up a member by its raw (undecoded) input name.
    pub(crate) fn find(&self, name: &[u8]) -> Option<(usize, &Member)> {
        self.members
            .iter()
            .enumerate()
            .find(|(_, m)| m.name.as_bytes() == name)
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{boxed::Box, vec};

    use super::{Description, IntWidth, Kind, Member, TagValue};
    use crate::field::Field;

    #[test]
    fn widths_bound_integers() {
        assert!(IntWidth::W8.holds_signed(-128));
        assert!(!IntWidth::W8.holds_signed(128));
        assert!(IntWidth::W16.holds_unsigned(65_535));
        assert!(!IntWidth::W16.holds_unsigned(65_536));
        assert!(IntWidth::W64.holds_signed(i64::MIN));
    }

    #[test]
    fn tag_values_match_across_sign() {
        assert!(TagValue::Unsigned(3).matches(&Field::Signed(3)));
        assert!(TagValue::Signed(3).matches(&Field::Unsigned(3)));
        assert!(!TagValue::Signed(-1).matches(&Field::Unsigned(u64::MAX)));
        assert!(TagValue::Str("a").matches(&Field::Str("a".into())));
    }

    #[test]
    #[should_panic(expected = "duplicate member name")]
    fn rejects_duplicate_names() {
        let _ = Description::new(vec![
            Member::new("a", Kind::Bool),
            Member::new("a", Kind::Real),
        ]);
    }

    #[test]
    #[should_panic(expected = "must name an earlier sibling")]
    fn rejects_tag_after_variant() {
        let _ = Description::new(vec![
            Member::new(
                "v",
                Kind::VariantTagged {
                    tag: "t",
                    branches: vec![(TagValue::Unsigned(0), Kind::Bool)],
                },
            ),
            Member::new("t", Kind::Unsigned(IntWidth::W32)),
        ]);
    }

    #[test]
    #[should_panic(expected = "non-null kind")]
    fn rejects_nested_null() {
        let _ = Description::new(vec![Member::new(
            "x",
            Kind::Null(Box::new(Kind::Null(Box::new(Kind::Bool)))),
        )]);
    }
}
