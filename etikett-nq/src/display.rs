use etikett::{Field, WireValue};
use std::fmt;
use std::str::from_utf8;

/// Renders one field as a line of the textual representation which `parser::parse` reads back.
pub struct Line<'f, 'a>(pub &'f Field<'a>);

impl fmt::Display for Line<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.0.tag)?;
        match &self.0.value {
            WireValue::Varint(v) => write!(f, "{}", v),
            // NaN payloads do not survive a trip through their decimal form
            WireValue::I32(v) if f32::from_bits(*v).is_nan() => write!(f, "$0x{:08x}", v),
            WireValue::I64(v) if f64::from_bits(*v).is_nan() => write!(f, "$$0x{:016x}", v),
            WireValue::I32(v)    => write!(f, "${}", f32::from_bits(*v)),
            WireValue::I64(v)    => write!(f, "$${}", f64::from_bits(*v)),
            WireValue::Len(v)    => match from_utf8(v) {
                Ok(s)  => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")),
                Err(_) => write!(f, ":{}", base64::encode(v)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Line;
    use etikett::{Field, WireValue};
    use std::borrow::Cow;

    #[test]
    fn lines() {
        let cases = [
            (Field::new(2, WireValue::Varint(101)), "2: 101"),
            (Field::new(1, WireValue::Len(Cow::Borrowed(b"Gopher"))), "1: \"Gopher\""),
            (Field::new(1, WireValue::Len(Cow::Borrowed(b"say \"hi\"\n"))), "1: \"say \\\"hi\\\"\\n\""),
            (Field::new(3, WireValue::Len(Cow::Borrowed(&[0xff, 0x00, 0x01]))), "3: :/wAB"),
            (Field::new(4, WireValue::I32(1.5f32.to_bits())), "4: $1.5"),
            (Field::new(5, WireValue::I64((-0.25f64).to_bits())), "5: $$-0.25"),
            (Field::new(6, WireValue::I32(0xffff_ffff)), "6: $0xffffffff"),
            (Field::new(7, WireValue::I64(0x7ff0_0000_0000_0001)), "7: $$0x7ff0000000000001"),
            (Field::new(8, WireValue::I32(f32::INFINITY.to_bits())), "8: $inf"),
        ];
        for (field, expected) in cases.iter() {
            assert_eq!(*expected, Line(field).to_string());
        }
    }
}
