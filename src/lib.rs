//! # binkv: tagged key/value section codec
//!
//! Encoder/decoder for a self-describing binary format used to exchange RPC
//! payloads with a peer that expects an exact byte layout: a fixed header,
//! variable-length integers, type-tagged primitives, arrays and nested sections.
//!
//! ## Wire layout
//!
//! - **Frame**: signature A (4 bytes), signature B (4 bytes), format version (1 byte),
//!   then the root section.
//! - **Section**: varint field count, then per field: name length (1 byte), name,
//!   tag (1 byte), payload.
//! - **Tags**: `0x01..=0x04` i64/i32/i16/i8, `0x05..=0x08` u64/u32/u16/u8, `0x09` f64,
//!   `0x0a` byte string, `0x0b` bool, `0x0c` section. `tag | 0x80` is an array:
//!   varint count followed by untagged element payloads.
//! - **Varint**: 1/2/4/8 bytes, size class in the two low bits of the first byte.
//!
//! ## Usage
//!
//! ```
//! use binkv::messages::GetHashesFastRequest;
//!
//! let mut req = GetHashesFastRequest { start_height: 1000, ..Default::default() };
//! req.set_hashes(&[[0xab; 32]]);
//!
//! let bytes = binkv::frame::to_bytes(&req).unwrap();
//! let back: GetHashesFastRequest = binkv::frame::from_slice(&bytes).unwrap();
//! assert_eq!(back, req);
//! ```
//!
//! Without a schema, any frame decodes into a [`Section`] tree:
//!
//! ```
//! let bytes = binkv::frame::to_bytes(&binkv::messages::TxOutputIndices { indices: vec![4, 2] }).unwrap();
//! let section = binkv::frame::read_section(&mut bytes.as_slice()).unwrap();
//! print!("{}", binkv::dump::dump_section(&section, Default::default()));
//! ```

pub mod codec;
pub mod dump;
pub mod frame;
pub mod messages;
pub mod primitive;
pub mod record;
pub mod schema;
pub mod value;
pub mod varint;

pub use codec::{Codec, CodecError, Limits, Result};
pub use frame::{from_slice, read, to_bytes, write};
pub use primitive::{Tag, WireType};
pub use record::{ArrayElement, Record, WireField};
pub use schema::{ElementType, FieldSpec, FieldType, Schema};
pub use value::{Field, Section, Value};
pub use varint::{decode_varint, encode_varint, read_varint, write_varint};
