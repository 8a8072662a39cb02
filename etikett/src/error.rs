use thiserror::Error;

/// A `DecodeError` together with the input position at which it occurred.
#[derive(Debug, PartialEq, Error)]
#[error("{inner} at input position {at}")]
pub struct DecoderError {
    #[source]
    inner: DecodeError,
    at: usize,
}

impl DecoderError {
    pub fn into_inner(self) -> DecodeError {
        self.inner
    }

    /// Offset into the input buffer where decoding failed
    pub fn position(&self) -> usize {
        self.at
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum DecodeError {
    #[error("Unexpected end of buffer while decoding")]
    Eof,
    #[error("Varint exceeds 64 bits")]
    VarintOverflow,
    #[error("Invalid field tag {0}")]
    InvalidTag(u64),
    #[error("Unsupported wire type {0}")]
    WireType(u8),
    #[error("Length {0} exceeds maximum {1}")]
    Length(u64, usize),
    #[error("String slice was not valid Utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("Field {tag} expects a {expected} value, found {found}")]
    Kind { tag: u32, expected: &'static str, found: &'static str },
    #[error("Value of field {0} is out of range for its target")]
    Range(u32),
}

impl DecodeError {
    pub fn at(self, at: usize) -> DecoderError {
        DecoderError { inner: self, at }
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("IO error {0}")]
    Io(#[from] std::io::Error),
    #[error("Tag {0} is outside of 1..={max}", max = crate::header::MAX_TAG)]
    InvalidTag(u32),
    #[error("Field {tag} has length {len} which exceeds maximum {max}")]
    Length { tag: u32, len: usize, max: usize },
    #[error("Field {tag} holds {value} which does not fit into {kind}")]
    Range { tag: u32, value: String, kind: &'static str },
    #[error("Field {tag} expects a {expected} value, found {found}")]
    Kind { tag: u32, expected: &'static str, found: &'static str },
}

#[derive(Debug, PartialEq, Error)]
pub enum SchemaError {
    #[error("Tag {0} is outside of 1..={max}", max = crate::header::MAX_TAG)]
    InvalidTag(u32),
    #[error("Tag {0} is declared twice")]
    DuplicateTag(u32),
    #[error("Field name `{0}` is declared twice")]
    DuplicateName(String),
    #[error("No field named `{0}`")]
    UnknownField(String),
    #[error("Field `{field}` expects a {expected} value, found {found}")]
    Kind { field: String, expected: &'static str, found: &'static str },
}
