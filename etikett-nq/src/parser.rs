use nom::{
    character::complete::{char, digit1, hex_digit1, multispace0, none_of, space0},
    Finish,
    IResult,
    combinator::{all_consuming, map, map_res, opt, value},
    multi::many0,
    sequence::{delimited, preceded, terminated, tuple},
    branch::alt,
    bytes::complete::{tag, take_while, take_while1, escaped_transform},
};
use etikett::{Field, WireValue, MAX_TAG};
use anyhow::{anyhow, bail, Result};
use base64::decode;
use std::borrow::Cow;

const B64_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";

fn float_chars(i: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || "+-.".contains(c))(i)
}

fn float32(i: &str) -> IResult<&str, f32> {
    map_res(preceded(tag("$"), float_chars), |n: &str| n.parse())(i)
}

fn float64(i: &str) -> IResult<&str, f64> {
    map_res(preceded(tag("$$"), float_chars), |n: &str| n.parse())(i)
}

fn bits32(i: &str) -> IResult<&str, u32> {
    map_res(preceded(tag("$0x"), hex_digit1), |n: &str| u32::from_str_radix(n, 16))(i)
}

fn bits64(i: &str) -> IResult<&str, u64> {
    map_res(preceded(tag("$$0x"), hex_digit1), |n: &str| u64::from_str_radix(n, 16))(i)
}

fn intn(i: &str) -> IResult<&str, i64> {
    map_res(preceded(tag("-"), digit1), |n: &str| format!("-{}", n).parse())(i)
}

fn intp(i: &str) -> IResult<&str, u64> {
    map_res(digit1, |n: &str| n.parse())(i)
}

fn bytes(i: &str) -> IResult<&str, Vec<u8>> {
    map_res(preceded(tag(":"), take_while(|c: char| B64_CHARS.contains(c))), decode)(i)
}

fn string(i: &str) -> IResult<&str, String> {
    delimited(
            tag("\""),
            map(opt(escaped_transform(
                none_of("\\\""),
                '\\',
                alt((
                        value("\\", tag("\\")),
                        value("\"", tag("\"")),
                        value("\n", tag("n")),
                )))), |c| c.unwrap_or_default()),
            tag("\"")
    )(i)
}

fn wire_value(i: &str) -> IResult<&str, WireValue<'static>> {
    alt((
        map(string, |s| WireValue::Len(Cow::Owned(s.into_bytes()))),
        map(bytes, |b| WireValue::Len(Cow::Owned(b))),
        map(bits64, WireValue::I64),
        map(float64, |f| WireValue::I64(f.to_bits())),
        map(bits32, WireValue::I32),
        map(float32, |f| WireValue::I32(f.to_bits())),
        map(intn, |i| WireValue::Varint(i as u64)),
        map(intp, WireValue::Varint),
    ))(i)
}

fn field(i: &str) -> IResult<&str, (u64, WireValue<'static>)> {
    map(
        tuple((multispace0, map_res(digit1, |n: &str| n.parse::<u64>()), space0, char(':'), space0, wire_value)),
        |(_, tag, _, _, _, value)| (tag, value),
    )(i)
}

/// Parses one `tag: value` pair per line
pub fn parse(i: &str) -> Result<Vec<Field<'static>>> {
    let (_, raw) = all_consuming(terminated(many0(field), multispace0))(i).finish().map_err(|e| anyhow!("{}", e))?;
    raw.into_iter().map(|(tag, value)| {
        if tag == 0 || tag > MAX_TAG as u64 {
            bail!("tag {} is outside of 1..={}", tag, MAX_TAG);
        }
        Ok(Field::new(tag as u32, value))
    }).collect()
}
