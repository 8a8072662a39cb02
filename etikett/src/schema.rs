//! A `Schema` is the table which gives the fields of a message their meaning: for every tag it records a name and
//! a `FieldKind`. The kind fixes the wire type and selects how a `FieldValue` is turned into a `WireValue` and back,
//! so a single generic loop in the codec can handle every record type.
//!
//! Schemas are plain values. Build one per record type, hand it to a `Codec`, and build another one for the next
//! type; nothing is registered globally.

use crate::error::{DecodeError, EncodeError, SchemaError};
use crate::field::WireValue;
use crate::header::{WireType, MAX_TAG};
use crate::limits::Limits;
use crate::value::FieldValue;
use crate::varint::{zigzag_decode, zigzag_encode};
use std::borrow::Cow;
use std::collections::HashSet;
use std::str::from_utf8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Bool,
    Fixed32,
    Fixed64,
    Float,
    Double,
    String,
    Bytes,
}

impl FieldKind {

    pub fn name(&self) -> &'static str {
        match *self {
            FieldKind::Int32   => "int32",
            FieldKind::Int64   => "int64",
            FieldKind::UInt32  => "uint32",
            FieldKind::UInt64  => "uint64",
            FieldKind::SInt32  => "sint32",
            FieldKind::SInt64  => "sint64",
            FieldKind::Bool    => "bool",
            FieldKind::Fixed32 => "fixed32",
            FieldKind::Fixed64 => "fixed64",
            FieldKind::Float   => "float",
            FieldKind::Double  => "double",
            FieldKind::String  => "string",
            FieldKind::Bytes   => "bytes",
        }
    }

    pub fn wire_type(&self) -> WireType {
        match *self {
            FieldKind::Int32
                | FieldKind::Int64
                | FieldKind::UInt32
                | FieldKind::UInt64
                | FieldKind::SInt32
                | FieldKind::SInt64
                | FieldKind::Bool     => WireType::Varint,
            FieldKind::Fixed64
                | FieldKind::Double   => WireType::I64,
            FieldKind::Fixed32
                | FieldKind::Float    => WireType::I32,
            FieldKind::String
                | FieldKind::Bytes    => WireType::Len,
        }
    }

    /// The value a field of this kind holds when it is absent on wire
    pub fn default_value(&self) -> FieldValue<'static> {
        match *self {
            FieldKind::Int32 | FieldKind::Int64 | FieldKind::SInt32 | FieldKind::SInt64 => FieldValue::Int(0),
            FieldKind::UInt32 | FieldKind::UInt64 | FieldKind::Fixed32 | FieldKind::Fixed64 => FieldValue::UInt(0),
            FieldKind::Bool   => FieldValue::Bool(false),
            FieldKind::Float  => FieldValue::F32(0.0),
            FieldKind::Double => FieldValue::F64(0.0),
            FieldKind::String => FieldValue::Text(Cow::Borrowed("")),
            FieldKind::Bytes  => FieldValue::Bytes(Cow::Borrowed(&[])),
        }
    }

    /// Whether `value` is the variant this kind is represented by in memory. Range is not checked.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        std::mem::discriminant(value) == std::mem::discriminant(&self.default_value())
    }

    /// Converts a value into its wire representation. Text and bytes are borrowed from `value`.
    pub fn encode_value<'v>(&self, tag: u32, value: &'v FieldValue<'_>, limits: &Limits) -> Result<WireValue<'v>, EncodeError> {
        let range = |v: &dyn std::fmt::Display| EncodeError::Range { tag, value: v.to_string(), kind: self.name() };
        Ok(match (*self, value) {
            (FieldKind::Int32, FieldValue::Int(v)) => {
                // negative values are sign extended to ten bytes
                i32::try_from(*v).map_err(|_| range(v))?;
                WireValue::Varint(*v as u64)
            },
            (FieldKind::Int64, FieldValue::Int(v))    => WireValue::Varint(*v as u64),
            (FieldKind::SInt32, FieldValue::Int(v))   => {
                i32::try_from(*v).map_err(|_| range(v))?;
                WireValue::Varint(zigzag_encode(*v))
            },
            (FieldKind::SInt64, FieldValue::Int(v))   => WireValue::Varint(zigzag_encode(*v)),
            (FieldKind::UInt32, FieldValue::UInt(v))  => {
                u32::try_from(*v).map_err(|_| range(v))?;
                WireValue::Varint(*v)
            },
            (FieldKind::UInt64, FieldValue::UInt(v))  => WireValue::Varint(*v),
            (FieldKind::Bool, FieldValue::Bool(v))    => WireValue::Varint(u64::from(*v)),
            (FieldKind::Fixed32, FieldValue::UInt(v)) => WireValue::I32(u32::try_from(*v).map_err(|_| range(v))?),
            (FieldKind::Fixed64, FieldValue::UInt(v)) => WireValue::I64(*v),
            (FieldKind::Float, FieldValue::F32(v))    => WireValue::I32(v.to_bits()),
            (FieldKind::Double, FieldValue::F64(v))   => WireValue::I64(v.to_bits()),
            (FieldKind::String, FieldValue::Text(v))  => {
                check_len(tag, v.len(), limits)?;
                WireValue::Len(Cow::Borrowed(v.as_bytes()))
            },
            (FieldKind::Bytes, FieldValue::Bytes(v))  => {
                check_len(tag, v.len(), limits)?;
                WireValue::Len(Cow::Borrowed(&**v))
            },
            (kind, other) => {
                return Err(EncodeError::Kind { tag, expected: kind.name(), found: other.typename() });
            },
        })
    }

    /// Interprets a wire value as this kind. 32 bit kinds read from a varint keep the low 32 bits only.
    pub fn decode_value<'a>(&self, tag: u32, value: WireValue<'a>) -> Result<FieldValue<'a>, DecodeError> {
        Ok(match (*self, value) {
            (FieldKind::Int32, WireValue::Varint(v))   => FieldValue::Int(i64::from(v as i32)),
            (FieldKind::Int64, WireValue::Varint(v))   => FieldValue::Int(v as i64),
            (FieldKind::SInt32, WireValue::Varint(v))  => FieldValue::Int(i64::from(zigzag_decode(v & u32::MAX as u64) as i32)),
            (FieldKind::SInt64, WireValue::Varint(v))  => FieldValue::Int(zigzag_decode(v)),
            (FieldKind::UInt32, WireValue::Varint(v))  => FieldValue::UInt(u64::from(v as u32)),
            (FieldKind::UInt64, WireValue::Varint(v))  => FieldValue::UInt(v),
            (FieldKind::Bool, WireValue::Varint(v))    => FieldValue::Bool(v != 0),
            (FieldKind::Fixed32, WireValue::I32(v))    => FieldValue::UInt(u64::from(v)),
            (FieldKind::Fixed64, WireValue::I64(v))    => FieldValue::UInt(v),
            (FieldKind::Float, WireValue::I32(v))      => FieldValue::F32(f32::from_bits(v)),
            (FieldKind::Double, WireValue::I64(v))     => FieldValue::F64(f64::from_bits(v)),
            (FieldKind::String, WireValue::Len(v))     => FieldValue::Text(match v {
                Cow::Borrowed(b) => Cow::Borrowed(from_utf8(b)?),
                Cow::Owned(b)    => Cow::Owned(String::from_utf8(b).map_err(|e| e.utf8_error())?),
            }),
            (FieldKind::Bytes, WireValue::Len(v))      => FieldValue::Bytes(v),
            (kind, other) => {
                return Err(DecodeError::Kind { tag, expected: kind.name(), found: other.wire_type().name() });
            },
        })
    }

}

#[inline]
fn check_len(tag: u32, len: usize, limits: &Limits) -> Result<(), EncodeError> {
    if len > limits.max_len {
        Err(EncodeError::Length { tag, len, max: limits.max_len })
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    tag: u32,
    name: String,
    kind: FieldKind,
}

impl FieldDescriptor {

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

}

/// An immutable, validated field table. Fields are ordered by ascending tag, which is also the order in which they
/// are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl Schema {

    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder { name: name.into(), fields: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn get(&self, tag: u32) -> Option<&FieldDescriptor> {
        self.fields.binary_search_by_key(&tag, |f| f.tag).ok().map(|i| &self.fields[i])
    }

    pub fn by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

}

pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {

    pub fn field(mut self, tag: u32, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor { tag, name: name.into(), kind });
        self
    }

    pub fn build(mut self) -> Result<Schema, SchemaError> {
        if let Some(f) = self.fields.iter().find(|f| f.tag == 0 || f.tag > MAX_TAG) {
            return Err(SchemaError::InvalidTag(f.tag));
        }
        let mut names = HashSet::new();
        if let Some(f) = self.fields.iter().find(|f| !names.insert(f.name.as_str())) {
            return Err(SchemaError::DuplicateName(f.name.clone()));
        }
        self.fields.sort_by_key(|f| f.tag);
        if let Some(w) = self.fields.windows(2).find(|w| w[0].tag == w[1].tag) {
            return Err(SchemaError::DuplicateTag(w[0].tag));
        }
        Ok(Schema { name: self.name, fields: self.fields })
    }

}

#[cfg(test)]
mod tests {
    use super::{FieldKind, Schema};
    use crate::error::{DecodeError, EncodeError, SchemaError};
    use crate::field::WireValue;
    use crate::header::MAX_TAG;
    use crate::limits::Limits;
    use crate::value::FieldValue;
    use std::borrow::Cow;

    const ALL: [FieldKind; 13] = [
        FieldKind::Int32, FieldKind::Int64, FieldKind::UInt32, FieldKind::UInt64, FieldKind::SInt32,
        FieldKind::SInt64, FieldKind::Bool, FieldKind::Fixed32, FieldKind::Fixed64, FieldKind::Float,
        FieldKind::Double, FieldKind::String, FieldKind::Bytes,
    ];

    fn encode(kind: FieldKind, value: FieldValue) -> Result<WireValue<'static>, EncodeError> {
        kind.encode_value(1, &value, &Limits::default()).map(WireValue::into_owned)
    }

    #[test]
    fn sorted_by_tag() {
        let schema = Schema::builder("Scrambled")
            .field(9, "c", FieldKind::Bool)
            .field(1, "a", FieldKind::String)
            .field(4, "b", FieldKind::Int32)
            .build()
            .unwrap();
        assert_eq!(vec![1, 4, 9], schema.fields().iter().map(|f| f.tag()).collect::<Vec<_>>());
        assert_eq!("b", schema.get(4).unwrap().name());
        assert_eq!(9, schema.by_name("c").unwrap().tag());
        assert!(schema.get(2).is_none());
    }

    #[test]
    fn invalid_schemas() {
        assert_eq!(Err(SchemaError::InvalidTag(0)), Schema::builder("S").field(0, "a", FieldKind::Bool).build());
        assert_eq!(
            Err(SchemaError::InvalidTag(MAX_TAG + 1)),
            Schema::builder("S").field(MAX_TAG + 1, "a", FieldKind::Bool).build()
        );
        assert_eq!(
            Err(SchemaError::DuplicateTag(3)),
            Schema::builder("S").field(3, "a", FieldKind::Bool).field(3, "b", FieldKind::Bool).build()
        );
        assert_eq!(
            Err(SchemaError::DuplicateName("a".into())),
            Schema::builder("S").field(1, "a", FieldKind::Bool).field(2, "a", FieldKind::Bool).build()
        );
    }

    #[test]
    fn defaults_are_accepted() {
        for kind in ALL {
            assert!(kind.accepts(&kind.default_value()), "{}", kind.name());
            assert!(kind.default_value().is_default(), "{}", kind.name());
        }
    }

    #[test]
    fn every_kind_roundtrips() {
        let samples: [(FieldKind, FieldValue); 13] = [
            (FieldKind::Int32, FieldValue::Int(i32::MIN as i64)),
            (FieldKind::Int64, FieldValue::Int(i64::MIN)),
            (FieldKind::UInt32, FieldValue::UInt(u32::MAX as u64)),
            (FieldKind::UInt64, FieldValue::UInt(u64::MAX)),
            (FieldKind::SInt32, FieldValue::Int(-1)),
            (FieldKind::SInt64, FieldValue::Int(i64::MAX)),
            (FieldKind::Bool, FieldValue::Bool(true)),
            (FieldKind::Fixed32, FieldValue::UInt(0xdead_beef)),
            (FieldKind::Fixed64, FieldValue::UInt(u64::MAX - 1)),
            (FieldKind::Float, FieldValue::F32(std::f32::consts::PI)),
            (FieldKind::Double, FieldValue::F64(std::f64::consts::PI)),
            (FieldKind::String, FieldValue::Text(Cow::Borrowed("Üben von Xylophon"))),
            (FieldKind::Bytes, FieldValue::Bytes(Cow::Borrowed(&[1, 2, 3, 4, 255]))),
        ];
        for (kind, value) in samples {
            let wire = encode(kind, value.clone()).unwrap();
            assert_eq!(kind.wire_type(), wire.wire_type());
            assert_eq!(value, kind.decode_value(1, wire).unwrap());
        }
    }

    #[test]
    fn negative_int32_is_sign_extended() {
        assert_eq!(WireValue::Varint(u64::MAX), encode(FieldKind::Int32, FieldValue::Int(-1)).unwrap());
        assert_eq!(WireValue::Varint(1), encode(FieldKind::SInt32, FieldValue::Int(-1)).unwrap());
    }

    #[test]
    fn out_of_range() {
        assert!(matches!(
            encode(FieldKind::Int32, FieldValue::Int(1 << 40)),
            Err(EncodeError::Range { tag: 1, kind: "int32", .. })
        ));
        assert!(matches!(encode(FieldKind::UInt32, FieldValue::UInt(1 << 32)), Err(EncodeError::Range { .. })));
        assert!(matches!(encode(FieldKind::Fixed32, FieldValue::UInt(1 << 32)), Err(EncodeError::Range { .. })));
        assert!(matches!(encode(FieldKind::SInt32, FieldValue::Int(i64::MIN)), Err(EncodeError::Range { .. })));
    }

    #[test]
    fn wrong_variant() {
        assert!(matches!(
            encode(FieldKind::String, FieldValue::Int(1)),
            Err(EncodeError::Kind { expected: "string", found: "signed integer", .. })
        ));
        assert_eq!(
            Err(DecodeError::Kind { tag: 1, expected: "int32", found: "Len" }),
            FieldKind::Int32.decode_value(1, WireValue::Len(Cow::Borrowed(b"x")))
        );
    }

    #[test]
    fn text_length_limit() {
        let value = FieldValue::from("Gopher");
        let limits = Limits::with_max_len(5);
        assert!(matches!(
            FieldKind::String.encode_value(7, &value, &limits),
            Err(EncodeError::Length { tag: 7, len: 6, max: 5 })
        ));
        assert!(FieldKind::String.encode_value(7, &value, &Limits::with_max_len(6)).is_ok());
    }

    #[test]
    fn wide_varints_are_truncated_to_32_bits() {
        assert_eq!(FieldValue::Int(-1), FieldKind::Int32.decode_value(1, WireValue::Varint(u64::MAX)).unwrap());
        assert_eq!(FieldValue::UInt(1), FieldKind::UInt32.decode_value(1, WireValue::Varint((1 << 32) + 1)).unwrap());
    }

    #[test]
    fn invalid_utf8() {
        assert!(matches!(
            FieldKind::String.decode_value(1, WireValue::Len(Cow::Borrowed(&[0xc3, 0x28]))),
            Err(DecodeError::Utf8(_))
        ));
        assert!(matches!(
            FieldKind::String.decode_value(1, WireValue::Len(Cow::Owned(vec![0xc3, 0x28]))),
            Err(DecodeError::Utf8(_))
        ));
    }

}
