//! `etikett` encodes records as a flat sequence of tagged fields. Every field starts with a varint header which
//! combines the field's tag with a three bit wire type, followed by the value: a varint, four or eight little endian
//! bytes, or a varint length and that many bytes. Since the wire type alone determines the extent of a value, a
//! decoder can skip fields it does not know, which lets writers and readers evolve their schemas independently.
//!
//! Fields holding their default value (zero, `false`, empty) are not written at all, and a decoder fills in the
//! default for every field it does not encounter. Consequently the default record encodes to zero bytes.
//!
//! All encoding functions return the amount of written bytes. All decoding functions borrow from the input buffer
//! where possible and report failures together with the input position.
//!
//! # A note on integers
//!
//! 32 bit kinds are encoded like their 64 bit counterparts; negative `int32` values therefore always occupy ten
//! bytes. Use `sint32` for fields which are frequently negative. When decoding, only the low 32 bits of a varint
//! are kept for 32 bit kinds.
//!
//! # Examples
//!
//! ```
//! use etikett::*;
//!
//! let codec = Codec::for_record::<User>().unwrap();
//! let user = User::new("Gopher", 101);
//! let buf = codec.encode(&user).unwrap();
//! assert_eq!(buf, [
//!     0x0a,                               // tag 1, length-delimited
//!     0x06,                               // length 6
//!     0x47, 0x6f, 0x70, 0x68, 0x65, 0x72, // 'Gopher'
//!     0x10,                               // tag 2, varint
//!     0x65,                               // 101
//! ]);
//! assert_eq!(user, codec.decode::<User>(&buf).unwrap());
//! ```
//!
//! Records without a Rust type can be handled with a hand-built schema:
//!
//! ```
//! use etikett::*;
//!
//! let schema = Schema::builder("Point")
//!     .field(1, "x", FieldKind::SInt64)
//!     .field(2, "y", FieldKind::SInt64)
//!     .build()
//!     .unwrap();
//! let mut point = DynamicRecord::new(&schema);
//! point.set("x", -1i64).unwrap();
//! let codec = Codec::new(schema);
//! let buf = codec.encode(&point).unwrap();
//! assert_eq!(buf, [0x08, 0x01]);
//! assert_eq!(point, codec.decode_dynamic(&buf).unwrap());
//! ```

mod codec;
mod error;
mod field;
mod header;
mod limits;
mod record;
mod schema;
mod value;
pub mod varint;

pub use codec::*;
pub use error::*;
pub use field::*;
pub use header::*;
pub use limits::*;
pub use record::*;
pub use schema::*;
pub use value::*;
