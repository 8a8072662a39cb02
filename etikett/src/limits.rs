/// Upper bounds the codec enforces so that neither side of the wire can be made to allocate without bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum byte length of a single length-delimited value, applied when encoding and when decoding
    pub max_len: usize,
}

impl Limits {
    pub const DEFAULT_MAX_LEN: usize = 16 * 1024 * 1024;

    pub fn with_max_len(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_len: Self::DEFAULT_MAX_LEN }
    }
}
