//! Base-128 variable length integers. Every byte carries seven bits of payload, least significant group first; the
//! high bit is set on all bytes but the last. A `u64` therefore occupies between one and ten bytes.
//!
//! Signed values which are expected to be small in magnitude can be mapped onto unsigned ones with zig-zag encoding
//! (`0, -1, 1, -2, 2, ...` becomes `0, 1, 2, 3, 4, ...`) so that negative numbers stay short on wire.

use crate::error::DecodeError;
use std::io::Write;

/// The longest valid varint in bytes
pub const MAX_LEN: usize = 10;

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7f;

/// Returns the number of written bytes
pub fn encode<W: Write + ?Sized>(mut value: u64, w: &mut W) -> std::io::Result<usize> {
    let mut buf = [0u8; MAX_LEN];
    let mut i = 0;
    while value >= CONTINUATION as u64 {
        buf[i] = value as u8 | CONTINUATION;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;
    w.write_all(&buf[..=i])?;
    Ok(i + 1)
}

/// Returns the decoded value and the number of consumed bytes. Only the first `MAX_LEN` bytes are ever inspected;
/// a tenth byte carrying more than the single remaining bit is rejected instead of silently truncated.
pub fn decode(buf: &[u8]) -> Result<(u64, usize), DecodeError> {
    let mut value = 0u64;
    for (i, &byte) in buf.iter().take(MAX_LEN).enumerate() {
        if i == MAX_LEN - 1 && byte > 1 {
            return Err(DecodeError::VarintOverflow);
        }
        value |= ((byte & PAYLOAD) as u64) << (7 * i);
        if byte & CONTINUATION == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(DecodeError::Eof)
}

/// Returns the number of bytes `encode` would write for this value
#[inline]
pub fn encoded_len(value: u64) -> usize {
    // one byte per started group of seven bits, at least one
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_encodings() {
        let cases: &[(u64, &[u8])] = &[
            (0, &[0x00]),
            (1, &[0x01]),
            (101, &[0x65]),
            (127, &[0x7f]),
            (128, &[0x80, 0x01]),
            (300, &[0xac, 0x02]),
            (u64::MAX, &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]),
        ];
        let mut buf = Vec::new();
        for (value, bytes) in cases {
            buf.clear();
            assert_eq!(bytes.len(), encode(*value, &mut buf).unwrap());
            assert_eq!(*bytes, &buf[..]);
            assert_eq!(bytes.len(), encoded_len(*value));
            assert_eq!((*value, bytes.len()), decode(bytes).unwrap());
        }
    }

    #[test]
    fn trailing_bytes_are_not_consumed() {
        assert_eq!((300, 2), decode(&[0xac, 0x02, 0xff, 0xff]).unwrap());
    }

    #[test]
    fn inefficient_encoding() {
        assert_eq!((1, 3), decode(&[0x81, 0x80, 0x00]).unwrap());
    }

    #[test]
    fn truncated() {
        assert_eq!(Err(DecodeError::Eof), decode(&[]));
        assert_eq!(Err(DecodeError::Eof), decode(&[0x80]));
        assert_eq!(Err(DecodeError::Eof), decode(&[0xff; 9]));
    }

    #[test]
    fn overflow() {
        assert_eq!(Err(DecodeError::VarintOverflow), decode(&[0xff; 10]));
        assert_eq!(Err(DecodeError::VarintOverflow), decode(&[0xff; 32]));
        let mut too_big = [0xff; 10];
        too_big[9] = 0x02;
        assert_eq!(Err(DecodeError::VarintOverflow), decode(&too_big));
    }

    #[test]
    fn zigzag_known_values() {
        assert_eq!(0, zigzag_encode(0));
        assert_eq!(1, zigzag_encode(-1));
        assert_eq!(2, zigzag_encode(1));
        assert_eq!(3, zigzag_encode(-2));
        assert_eq!(u64::MAX - 1, zigzag_encode(i64::MAX));
        assert_eq!(u64::MAX, zigzag_encode(i64::MIN));
    }

    proptest! {
        #[test]
        fn roundtrip(value: u64) {
            let mut buf = Vec::new();
            let written = encode(value, &mut buf).unwrap();
            prop_assert_eq!(written, encoded_len(value));
            prop_assert_eq!((value, written), decode(&buf).unwrap());
        }

        #[test]
        fn zigzag_roundtrip(value: i64) {
            prop_assert_eq!(value, zigzag_decode(zigzag_encode(value)));
        }

        #[test]
        fn arbitrary_input_never_panics(buf in proptest::collection::vec(any::<u8>(), 0..16)) {
            let _ = decode(&buf);
        }
    }
}
