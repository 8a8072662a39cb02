//! Schemaless access to the fields of a message. A message is nothing but a sequence of fields, each consisting of a
//! `Header` and a value whose extent is determined by the header's wire type. Fields may appear in any order and
//! any number of times; interpreting them is left to the `Codec` and its `Schema`.

use crate::error::{DecodeError, DecoderError, EncodeError};
use crate::header::{Header, WireType};
use crate::limits::Limits;
use crate::varint;
use std::borrow::Cow;
use std::io::Write;

/// A value as it appears on wire, before any schema gave it meaning.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue<'a> {
    Varint(u64),
    I64(u64),
    Len(Cow<'a, [u8]>),
    I32(u32),
}

impl<'a> WireValue<'a> {

    pub fn wire_type(&self) -> WireType {
        match *self {
            WireValue::Varint(_) => WireType::Varint,
            WireValue::I64(_)    => WireType::I64,
            WireValue::Len(_)    => WireType::Len,
            WireValue::I32(_)    => WireType::I32,
        }
    }

    pub fn into_owned(self) -> WireValue<'static> {
        match self {
            WireValue::Varint(v) => WireValue::Varint(v),
            WireValue::I64(v)    => WireValue::I64(v),
            WireValue::Len(v)    => WireValue::Len(Cow::Owned(v.into_owned())),
            WireValue::I32(v)    => WireValue::I32(v),
        }
    }

}

#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    pub tag: u32,
    pub value: WireValue<'a>,
}

impl<'a> Field<'a> {

    pub fn new(tag: u32, value: WireValue<'a>) -> Self {
        Self { tag, value }
    }

    pub fn header(&self) -> Header {
        Header::new(self.tag, self.value.wire_type())
    }

    /// Returns the number of written bytes
    pub fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        let c = self.header().encode(w)?;
        match &self.value {
            WireValue::Varint(v) => Ok(c + varint::encode(*v, w)?),
            WireValue::I64(v)    => {
                w.write_all(&v.to_le_bytes())?;
                Ok(c + 8)
            },
            WireValue::I32(v)    => {
                w.write_all(&v.to_le_bytes())?;
                Ok(c + 4)
            },
            WireValue::Len(v)    => {
                let l = varint::encode(v.len() as u64, w)?;
                w.write_all(v)?;
                Ok(c + l + v.len())
            },
        }
    }

    /// Returns the number of bytes `encode` would write
    pub fn encoded_len(&self) -> usize {
        self.header().encoded_len() + match &self.value {
            WireValue::Varint(v) => varint::encoded_len(*v),
            WireValue::I64(_)    => 8,
            WireValue::I32(_)    => 4,
            WireValue::Len(v)    => varint::encoded_len(v.len() as u64) + v.len(),
        }
    }

}

/// Iterates over the fields of a buffer in a single forward pass. Length-delimited values are borrowed from the
/// buffer. After the first error the iterator is exhausted.
pub struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
    limits: Limits,
    failed: bool,
}

impl<'a> FieldReader<'a> {

    pub fn new<B: ?Sized + AsRef<[u8]>>(buf: &'a B) -> Self {
        Self::with_limits(buf, Limits::default())
    }

    pub fn with_limits<B: ?Sized + AsRef<[u8]>>(buf: &'a B, limits: Limits) -> Self {
        Self { buf: buf.as_ref(), pos: 0, limits, failed: false }
    }

    /// The number of bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    fn decode_field(&mut self) -> Result<Field<'a>, DecodeError> {
        let (header, c) = Header::decode(&self.buf[self.pos..])?;
        self.pos += c;
        let value = match header.wire_type {
            WireType::Varint => WireValue::Varint(self.decode_varint()?),
            WireType::I64    => {
                let mut tmp = [0u8; 8];
                tmp.copy_from_slice(self.decode_slice(8)?);
                WireValue::I64(u64::from_le_bytes(tmp))
            },
            WireType::I32    => {
                let mut tmp = [0u8; 4];
                tmp.copy_from_slice(self.decode_slice(4)?);
                WireValue::I32(u32::from_le_bytes(tmp))
            },
            WireType::Len    => {
                let len = self.decode_varint()?;
                if len > self.limits.max_len as u64 {
                    return Err(DecodeError::Length(len, self.limits.max_len));
                }
                WireValue::Len(Cow::Borrowed(self.decode_slice(len as usize)?))
            },
        };
        Ok(Field { tag: header.tag, value })
    }

    fn decode_varint(&mut self) -> Result<u64, DecodeError> {
        let (v, c) = varint::decode(&self.buf[self.pos..])?;
        self.pos += c;
        Ok(v)
    }

    fn decode_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.buf[self.pos..].len() < len {
            Err(DecodeError::Eof)
        } else {
            self.pos += len;
            Ok(&self.buf[self.pos - len .. self.pos])
        }
    }

}

impl<'a> Iterator for FieldReader<'a> {
    type Item = Result<Field<'a>, DecoderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }
        let start = self.pos;
        let field = self.decode_field().map_err(|e| e.at(start));
        self.failed = field.is_err();
        Some(field)
    }
}

/// Writes all fields in order and returns the number of written bytes
pub fn encode_fields<'r, 'f: 'r, W, I>(fields: I, w: &mut W) -> Result<usize, EncodeError>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = &'r Field<'f>>,
{
    let mut c = 0;
    for field in fields {
        c += field.encode(w)?;
    }
    Ok(c)
}
