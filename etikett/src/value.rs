//! Typed field values. Text and byte data are held in a `Cow` so that decoding can borrow from the input buffer
//! and encoding can borrow from the record, while records themselves own their data.

use std::borrow::Cow;

/// The possible values of a field according to the `etikett` data model. Which variant a field holds is decided by
/// its `FieldKind`: all signed kinds use `Int`, all unsigned ones `UInt`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
    Text(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
}

impl<'a> FieldValue<'a> {

    pub fn typename(&self) -> &'static str {
        match *self {
            Self::Bool(_)  => "bool",
            Self::Int(_)   => "signed integer",
            Self::UInt(_)  => "unsigned integer",
            Self::F32(_)   => "f32",
            Self::F64(_)   => "f64",
            Self::Text(_)  => "text",
            Self::Bytes(_) => "bytes",
        }
    }

    /// Defaults are omitted on wire. Only positive zero counts as the default for floats, so that `-0.0` survives a
    /// round trip.
    pub fn is_default(&self) -> bool {
        match self {
            Self::Bool(v)  => !*v,
            Self::Int(v)   => *v == 0,
            Self::UInt(v)  => *v == 0,
            Self::F32(v)   => v.to_bits() == 0,
            Self::F64(v)   => v.to_bits() == 0,
            Self::Text(v)  => v.is_empty(),
            Self::Bytes(v) => v.is_empty(),
        }
    }

    /// A copy of this value which borrows any text or byte data from `self`
    pub fn borrowed(&self) -> FieldValue<'_> {
        match self {
            Self::Bool(v)  => FieldValue::Bool(*v),
            Self::Int(v)   => FieldValue::Int(*v),
            Self::UInt(v)  => FieldValue::UInt(*v),
            Self::F32(v)   => FieldValue::F32(*v),
            Self::F64(v)   => FieldValue::F64(*v),
            Self::Text(v)  => FieldValue::Text(Cow::Borrowed(v)),
            Self::Bytes(v) => FieldValue::Bytes(Cow::Borrowed(v)),
        }
    }

    pub fn into_owned(self) -> FieldValue<'static> {
        match self {
            Self::Bool(v)  => FieldValue::Bool(v),
            Self::Int(v)   => FieldValue::Int(v),
            Self::UInt(v)  => FieldValue::UInt(v),
            Self::F32(v)   => FieldValue::F32(v),
            Self::F64(v)   => FieldValue::F64(v),
            Self::Text(v)  => FieldValue::Text(Cow::Owned(v.into_owned())),
            Self::Bytes(v) => FieldValue::Bytes(Cow::Owned(v.into_owned())),
        }
    }

}

impl From<bool> for FieldValue<'_> {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i32> for FieldValue<'_> {
    fn from(v: i32) -> Self {
        FieldValue::Int(i64::from(v))
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<u32> for FieldValue<'_> {
    fn from(v: u32) -> Self {
        FieldValue::UInt(u64::from(v))
    }
}

impl From<u64> for FieldValue<'_> {
    fn from(v: u64) -> Self {
        FieldValue::UInt(v)
    }
}

impl From<f32> for FieldValue<'_> {
    fn from(v: f32) -> Self {
        FieldValue::F32(v)
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(v: f64) -> Self {
        FieldValue::F64(v)
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(v: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(v))
    }
}

impl From<String> for FieldValue<'_> {
    fn from(v: String) -> Self {
        FieldValue::Text(Cow::Owned(v))
    }
}

impl<'a> From<&'a [u8]> for FieldValue<'a> {
    fn from(v: &'a [u8]) -> Self {
        FieldValue::Bytes(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for FieldValue<'_> {
    fn from(v: Vec<u8>) -> Self {
        FieldValue::Bytes(Cow::Owned(v))
    }
}
