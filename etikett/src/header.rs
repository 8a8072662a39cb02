//! Every field on wire starts with a header: a single varint which holds the field's tag in its upper bits and the
//! wire type in the lowest three bits. The wire type tells a decoder how many bytes the value occupies, so fields
//! with unknown tags can be skipped without any knowledge of the schema.

use crate::error::{DecodeError, EncodeError};
use crate::varint;
use std::io::Write;

/// The largest tag which fits into a header alongside the wire type
pub const MAX_TAG: u32 = (1 << 29) - 1;

const TYPE_BITS: u32 = 3;
const TYPE_MASK: u64 = (1 << TYPE_BITS) - 1;

/// Group delimiters (3 and 4) and the values 6 and 7 are not supported.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WireType {
    /// A base-128 varint follows
    Varint = 0,
    /// Eight bytes in little endian order follow
    I64 = 1,
    /// A varint length follows, then that many bytes
    Len = 2,
    /// Four bytes in little endian order follow
    I32 = 5,
}

impl WireType {

    /// Returns the mnemonic of the wire type. This is useful for error messages.
    pub fn name(&self) -> &'static str {
        match *self {
            WireType::Varint => "Varint",
            WireType::I64    => "I64",
            WireType::Len    => "Len",
            WireType::I32    => "I32",
        }
    }

}

impl TryFrom<u8> for WireType {
    type Error = DecodeError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            x if x == WireType::Varint as u8 => Ok(WireType::Varint),
            x if x == WireType::I64 as u8    => Ok(WireType::I64),
            x if x == WireType::Len as u8    => Ok(WireType::Len),
            x if x == WireType::I32 as u8    => Ok(WireType::I32),
            x                                => Err(DecodeError::WireType(x)),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Header {
    pub tag: u32,
    pub wire_type: WireType,
}

impl Header {

    pub fn new(tag: u32, wire_type: WireType) -> Self {
        Self { tag, wire_type }
    }

    /// Returns the number of written bytes. Tags outside of `1..=MAX_TAG` are refused, nothing is written then.
    pub fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        if self.tag == 0 || self.tag > MAX_TAG {
            return Err(EncodeError::InvalidTag(self.tag));
        }
        Ok(varint::encode(self.key(), w)?)
    }

    /// Returns the decoded header and the number of consumed bytes
    pub fn decode<B: ?Sized + AsRef<[u8]>>(buf: &B) -> Result<(Self, usize), DecodeError> {
        let (key, c) = varint::decode(buf.as_ref())?;
        let tag = key >> TYPE_BITS;
        if tag == 0 || tag > MAX_TAG as u64 {
            return Err(DecodeError::InvalidTag(tag));
        }
        let wire_type = WireType::try_from((key & TYPE_MASK) as u8)?;
        Ok((Header { tag: tag as u32, wire_type }, c))
    }

    /// Returns the number of bytes `encode` would write
    #[inline]
    pub fn encoded_len(&self) -> usize {
        varint::encoded_len(self.key())
    }

    #[inline]
    fn key(&self) -> u64 {
        (self.tag as u64) << TYPE_BITS | self.wire_type as u64
    }

}
