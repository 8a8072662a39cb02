mod display;
mod parser;

use etikett::*;
use display::Line;
use std::io::{self, Read, Write};
use anyhow::{Context, Result};
use structopt::StructOpt;
use std::str::from_utf8;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Decode and print etikett messages without a schema
#[derive(StructOpt)]
#[structopt(name = "etq", author = "Liv Fischer")]
struct Opt {
    /// parse a textual representation and encode it into a binary message instead
    #[structopt(short, long)]
    encode: bool,
    /// read and write binary messages as base64 text
    #[structopt(short, long)]
    base64: bool,
    /// maximum length in bytes of a single length-delimited value
    #[structopt(long, default_value = "16777216")]
    max_len: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let opt = Opt::from_args();
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer).context("Failed to read stdin")?;
    debug!(bytes = buffer.len(), encode = opt.encode, "read input");
    if opt.encode {
        encode(&buffer, &opt)
    } else {
        print(&buffer, &opt)
    }
}

fn print(buffer: &[u8], opt: &Opt) -> Result<()> {
    let decoded;
    let buffer = if opt.base64 {
        decoded = base64::decode(from_utf8(buffer).context("input is not utf-8")?.trim()).context("input is not base64")?;
        &decoded[..]
    } else {
        buffer
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for field in FieldReader::with_limits(buffer, Limits::with_max_len(opt.max_len)) {
        let field = field.context("Decoding error")?;
        writeln!(out, "{}", Line(&field))?;
    }
    Ok(())
}

fn encode(buffer: &[u8], opt: &Opt) -> Result<()> {
    let string = from_utf8(buffer).context("input is not utf-8")?;
    let fields = parser::parse(string)?;
    let mut bytes = Vec::new();
    encode_fields(&fields, &mut bytes).context("Encoding error")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if opt.base64 {
        writeln!(out, "{}", base64::encode(&bytes))?;
    } else {
        out.write_all(&bytes)?;
    }
    Ok(())
}
