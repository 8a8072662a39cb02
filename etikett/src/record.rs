//! The in-memory side of a message. A `Record` exposes its fields by tag so that the `Codec` can read them for
//! encoding and write them while decoding; the `Schema` decides which tags exist and what kind they are.
//!
//! Presence is not tracked: a field which is absent on wire simply keeps its default value.

use crate::error::{DecodeError, SchemaError};
use crate::schema::{FieldKind, Schema};
use crate::value::FieldValue;
use std::borrow::Cow;
use std::collections::BTreeMap;

pub trait Record {

    /// Returns the current value of the field with the given tag, borrowing text and byte data. `None` means this
    /// record has no such field; the codec then writes nothing for it.
    fn field(&self, tag: u32) -> Option<FieldValue<'_>>;

    /// Stores a decoded value. Unknown tags are ignored.
    fn set_field(&mut self, tag: u32, value: FieldValue<'_>) -> Result<(), DecodeError>;

}

/// Record types which know their own layout
pub trait HasSchema: Record + Default {
    fn schema() -> Result<Schema, SchemaError>;
}

/// The single record type of the demo
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct User {
    pub name: String,
    pub id: i32,
}

impl User {

    pub const NAME: u32 = 1;
    pub const ID: u32 = 2;

    pub fn new(name: impl Into<String>, id: i32) -> Self {
        Self { name: name.into(), id }
    }

}

impl Record for User {

    fn field(&self, tag: u32) -> Option<FieldValue<'_>> {
        match tag {
            Self::NAME => Some(FieldValue::Text(Cow::Borrowed(self.name.as_str()))),
            Self::ID   => Some(FieldValue::from(self.id)),
            _          => None,
        }
    }

    fn set_field(&mut self, tag: u32, value: FieldValue<'_>) -> Result<(), DecodeError> {
        match (tag, value) {
            (Self::NAME, FieldValue::Text(v)) => self.name = v.into_owned(),
            (Self::ID, FieldValue::Int(v))    => self.id = i32::try_from(v).map_err(|_| DecodeError::Range(tag))?,
            (Self::NAME, other)               => return Err(mismatch(tag, FieldKind::String, &other)),
            (Self::ID, other)                 => return Err(mismatch(tag, FieldKind::Int32, &other)),
            _                                 => {},
        }
        Ok(())
    }

}

impl HasSchema for User {
    fn schema() -> Result<Schema, SchemaError> {
        Schema::builder("User")
            .field(Self::NAME, "name", FieldKind::String)
            .field(Self::ID, "id", FieldKind::Int32)
            .build()
    }
}

fn mismatch(tag: u32, kind: FieldKind, found: &FieldValue) -> DecodeError {
    DecodeError::Kind { tag, expected: kind.name(), found: found.typename() }
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    name: String,
    kind: FieldKind,
    value: FieldValue<'static>,
}

/// A record for any schema, for when no Rust type describes the message. Every field of the schema is present
/// from construction on, holding its kind's default.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    slots: BTreeMap<u32, Slot>,
}

impl DynamicRecord {

    pub fn new(schema: &Schema) -> Self {
        let slots = schema.fields().iter()
            .map(|f| (f.tag(), Slot { name: f.name().to_owned(), kind: f.kind(), value: f.kind().default_value() }))
            .collect();
        Self { slots }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue<'static>> {
        self.slots.values().find(|s| s.name == name).map(|s| &s.value)
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue<'static>>) -> Result<(), SchemaError> {
        let value = value.into();
        let slot = self.slots.values_mut().find(|s| s.name == name).ok_or_else(|| SchemaError::UnknownField(name.to_owned()))?;
        if !slot.kind.accepts(&value) {
            return Err(SchemaError::Kind { field: name.to_owned(), expected: slot.kind.name(), found: value.typename() });
        }
        slot.value = value;
        Ok(())
    }

    /// Field names and values in ascending tag order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue<'static>)> {
        self.slots.values().map(|s| (s.name.as_str(), &s.value))
    }

}

impl Record for DynamicRecord {

    fn field(&self, tag: u32) -> Option<FieldValue<'_>> {
        self.slots.get(&tag).map(|s| s.value.borrowed())
    }

    fn set_field(&mut self, tag: u32, value: FieldValue<'_>) -> Result<(), DecodeError> {
        if let Some(slot) = self.slots.get_mut(&tag) {
            if !slot.kind.accepts(&value) {
                return Err(mismatch(tag, slot.kind, &value));
            }
            slot.value = value.into_owned();
        }
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::{DynamicRecord, HasSchema, Record, User};
    use crate::error::{DecodeError, SchemaError};
    use crate::value::FieldValue;

    #[test]
    fn equality_is_structural() {
        assert_eq!(User::new("Gopher", 101), User::new(String::from("Gopher"), 101));
        assert_ne!(User::new("Gopher", 101), User::new("Gopher", 102));
        assert_ne!(User::new("Gopher", 101), User::new("gopher", 101));
        assert_eq!(User::new("", 0), User::default());
    }

    #[test]
    fn user_fields() {
        let mut user = User::default();
        user.set_field(User::NAME, FieldValue::from("Pythonista")).unwrap();
        user.set_field(User::ID, FieldValue::from(42i32)).unwrap();
        user.set_field(99, FieldValue::from(true)).unwrap();
        assert_eq!(User::new("Pythonista", 42), user);
        assert_eq!(Some(FieldValue::from("Pythonista")), user.field(User::NAME));
        assert_eq!(None, user.field(3));
        assert_eq!(Err(DecodeError::Range(User::ID)), user.set_field(User::ID, FieldValue::Int(1 << 40)));
        assert!(matches!(user.set_field(User::NAME, FieldValue::Bool(true)), Err(DecodeError::Kind { .. })));
    }

    #[test]
    fn user_schema() {
        let schema = User::schema().unwrap();
        assert_eq!("User", schema.name());
        assert_eq!(2, schema.fields().len());
        assert_eq!("name", schema.get(User::NAME).unwrap().name());
        assert_eq!("id", schema.get(User::ID).unwrap().name());
    }

    #[test]
    fn dynamic_starts_with_defaults() {
        let record = DynamicRecord::new(&User::schema().unwrap());
        assert_eq!(
            vec![("name", &FieldValue::from("")), ("id", &FieldValue::Int(0))],
            record.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn dynamic_set_checks_kind() {
        let mut record = DynamicRecord::new(&User::schema().unwrap());
        record.set("name", "Alex").unwrap();
        record.set("id", 101i32).unwrap();
        assert_eq!(Some(&FieldValue::from("Alex")), record.get("name"));
        assert_eq!(Err(SchemaError::UnknownField("email".into())), record.set("email", "a@b"));
        assert!(matches!(record.set("id", "101"), Err(SchemaError::Kind { .. })));
        assert!(matches!(record.set_field(User::ID, FieldValue::from(1u32)), Err(DecodeError::Kind { .. })));
    }
}
