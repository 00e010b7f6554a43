//! Dynamically typed field values and the per-type glue contract.
//!
//! Parsing a described aggregate produces one [`Field`] per member, in
//! description order; [`JsonBind::from_fields`] turns them into the user's
//! type and [`JsonBind::to_fields`] projects the type back for
//! serialization. The pair replaces reflective setter/getter registration
//! with two pure functions per type.

use alloc::{boxed::Box, string::String, vec::Vec};

use crate::{
    describe::Description,
    error::{ErrorReason, JsonError},
};

/// The fields of one aggregate, in description order.
pub type Fields = Vec<Field>;

/// A parsed member value.
///
/// Integers widen to 64 bits on the wire; the described
/// [`IntWidth`](crate::IntWidth) bounds what a checked parse accepts, and
/// [`Field::into_signed`]-style accessors hand the value back for
/// narrowing in `from_fields`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Literal `null`, or an absent nullable member.
    Null,
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Real(f64),
    /// Decoded text (`StringEscaped`) or the verbatim quoted contents
    /// (`StringRaw`, `Custom`).
    Str(String),
    /// Epoch milliseconds, UTC.
    Date(i64),
    /// A nested aggregate's fields, in its description order.
    Class(Fields),
    Array(Vec<Field>),
    /// `KeyValue` / `KeyValueArray` pairs in input order.
    Entries(Vec<(Field, Field)>),
    /// Active branch index into the variant's element list, plus payload.
    Variant(usize, Box<Field>),
}

impl Default for Field {
    fn default() -> Self {
        Self::Null
    }
}

macro_rules! take_as {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        /// Consume the field, expecting the corresponding shape.
        ///
        /// # Errors
        ///
        /// `FieldMismatch` when the field holds something else.
        pub fn $fn_name(self) -> Result<$ty, JsonError> {
            match self {
                Self::$variant(v) => Ok(v),
                _ => Err(JsonError::new(ErrorReason::FieldMismatch, 0)),
            }
        }
    };
}

impl Field {
    /// Returns `true` if the field is [`Null`].
    ///
    /// [`Null`]: Field::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    take_as!(into_bool, Bool, bool);
    take_as!(into_signed, Signed, i64);
    take_as!(into_unsigned, Unsigned, u64);
    take_as!(into_real, Real, f64);
    take_as!(into_str, Str, String);
    take_as!(into_date, Date, i64);
    take_as!(into_class, Class, Fields);
    take_as!(into_array, Array, Vec<Field>);
    take_as!(into_entries, Entries, Vec<(Field, Field)>);

    /// Consume a nullable field: `Null` becomes `None`, anything else is
    /// handed to `f`.
    ///
    /// # Errors
    ///
    /// Whatever `f` reports.
    pub fn into_option<T>(
        self,
        f: impl FnOnce(Self) -> Result<T, JsonError>,
    ) -> Result<Option<T>, JsonError> {
        match self {
            Self::Null => Ok(None),
            other => f(other).map(Some),
        }
    }
}

/// The per-type binding contract.
///
/// Implementations supply the static shape once and two projections between
/// the shape's [`Fields`] and the concrete type.
///
/// # Examples
///
/// ```rust
/// use jsonbind::{Description, Field, Fields, IntWidth, JsonBind, JsonError, Kind, Member};
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl JsonBind for Point {
///     fn description() -> Description {
///         Description::new(vec![
///             Member::new("x", Kind::Signed(IntWidth::W32)),
///             Member::new("y", Kind::Signed(IntWidth::W32)),
///         ])
///     }
///
///     fn from_fields(fields: Fields) -> Result<Self, JsonError> {
///         let mut it = fields.into_iter();
///         Ok(Point {
///             x: it.next().unwrap().into_signed()? as i32,
///             y: it.next().unwrap().into_signed()? as i32,
///         })
///     }
///
///     fn to_fields(&self) -> Fields {
///         vec![
///             Field::Signed(self.x.into()),
///             Field::Signed(self.y.into()),
///         ]
///     }
/// }
///
/// let p: Point = jsonbind::parse(br#"{"y":2,"x":1}"#, &Default::default()).unwrap();
/// assert_eq!(p, Point { x: 1, y: 2 });
/// ```
pub trait JsonBind: Sized {
    /// The static shape of the type's JSON form.
    fn description() -> Description;

    /// Construct an instance from parsed fields in description order.
    ///
    /// # Errors
    ///
    /// `FieldMismatch` (via the [`Field`] accessors) when a field's shape
    /// disagrees with what the implementation expects.
    fn from_fields(fields: Fields) -> Result<Self, JsonError>;

    /// Project the instance into fields in description order.
    fn to_fields(&self) -> Fields;
}
