use crate::error::{DecoderError, EncodeError, SchemaError};
use crate::field::{Field, FieldReader};
use crate::limits::Limits;
use crate::record::{DynamicRecord, HasSchema, Record};
use crate::schema::Schema;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, trace};

/// Encodes and decodes records according to one `Schema`. Cloning is cheap: the schema is shared.
#[derive(Debug, Clone)]
pub struct Codec {
    schema: Arc<Schema>,
    limits: Limits,
}

impl Codec {

    pub fn new(schema: Schema) -> Self {
        Self::with_limits(schema, Limits::default())
    }

    pub fn with_limits(schema: Schema, limits: Limits) -> Self {
        Self { schema: Arc::new(schema), limits }
    }

    pub fn for_record<R: HasSchema>() -> Result<Self, SchemaError> {
        Ok(Self::new(R::schema()?))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn encode<R: Record + ?Sized>(&self, record: &R) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        self.encode_to(record, &mut buf)?;
        Ok(buf)
    }

    /// Writes the record's fields in ascending tag order, leaving out fields which hold their default value.
    /// Returns the number of written bytes.
    pub fn encode_to<R: Record + ?Sized, W: Write + ?Sized>(&self, record: &R, w: &mut W) -> Result<usize, EncodeError> {
        let mut c = 0;
        for desc in self.schema.fields() {
            let value = match record.field(desc.tag()) {
                Some(value) => value,
                None        => continue,
            };
            let wire = desc.kind().encode_value(desc.tag(), &value, &self.limits)?;
            if value.is_default() {
                continue;
            }
            c += Field::new(desc.tag(), wire).encode(w)?;
        }
        trace!(schema = self.schema.name(), bytes = c, "encoded record");
        Ok(c)
    }

    pub fn decode<R: Record + Default>(&self, buf: &[u8]) -> Result<R, DecoderError> {
        let mut record = R::default();
        self.decode_into(buf, &mut record)?;
        Ok(record)
    }

    pub fn decode_dynamic(&self, buf: &[u8]) -> Result<DynamicRecord, DecoderError> {
        let mut record = DynamicRecord::new(&self.schema);
        self.decode_into(buf, &mut record)?;
        Ok(record)
    }

    /// Merges the fields found in `buf` into `record`. Fields which do not occur keep their current value, fields
    /// which occur more than once end up with the last occurrence. Unknown tags and fields whose wire type does not
    /// match the schema are skipped.
    pub fn decode_into<R: Record + ?Sized>(&self, buf: &[u8], record: &mut R) -> Result<(), DecoderError> {
        let mut reader = FieldReader::with_limits(buf, self.limits);
        loop {
            let start = reader.position();
            let field = match reader.next() {
                Some(field) => field?,
                None        => break,
            };
            match self.schema.get(field.tag) {
                Some(desc) if desc.kind().wire_type() == field.value.wire_type() => {
                    let value = desc.kind().decode_value(field.tag, field.value).map_err(|e| e.at(start))?;
                    record.set_field(field.tag, value).map_err(|e| e.at(start))?;
                },
                Some(desc) => {
                    debug!(
                        schema = self.schema.name(),
                        tag = field.tag,
                        expected = desc.kind().wire_type().name(),
                        found = field.value.wire_type().name(),
                        "skipping field with mismatched wire type"
                    );
                },
                None => {
                    debug!(
                        schema = self.schema.name(),
                        tag = field.tag,
                        wire_type = field.value.wire_type().name(),
                        "skipping unknown field"
                    );
                },
            }
        }
        trace!(schema = self.schema.name(), bytes = buf.len(), "decoded record");
        Ok(())
    }

}
