//! Type tags and scalar payloads.
//!
//! Every value on the wire is a one-byte tag followed by its payload. Multi-byte
//! scalars are little-endian; byte strings are a varint length plus raw bytes.
//! Setting [`ARRAY_FLAG`] on a tag turns it into "array of that type": a varint
//! element count followed by untagged element payloads.

use crate::codec::{CodecError, Result};
use crate::varint::{read_count, write_varint};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{Read, Write};

/// High bit of a tag byte: "array of the base type".
pub const ARRAY_FLAG: u8 = 0x80;

/// Caps pre-allocation driven by counts read off the wire.
pub(crate) const MAX_PREALLOC: usize = 4096;

/// Base wire type (tag without the array flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    I64 = 0x01,
    I32 = 0x02,
    I16 = 0x03,
    I8 = 0x04,
    U64 = 0x05,
    U32 = 0x06,
    U16 = 0x07,
    U8 = 0x08,
    F64 = 0x09,
    String = 0x0a,
    Bool = 0x0b,
    Section = 0x0c,
}

impl WireType {
    pub fn from_u8(b: u8) -> Option<Self> {
        Some(match b {
            0x01 => WireType::I64,
            0x02 => WireType::I32,
            0x03 => WireType::I16,
            0x04 => WireType::I8,
            0x05 => WireType::U64,
            0x06 => WireType::U32,
            0x07 => WireType::U16,
            0x08 => WireType::U8,
            0x09 => WireType::F64,
            0x0a => WireType::String,
            0x0b => WireType::Bool,
            0x0c => WireType::Section,
            _ => return None,
        })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Integers, f64 and bool; not byte strings or sections.
    pub fn is_fixed_width(self) -> bool {
        !matches!(self, WireType::String | WireType::Section)
    }

    pub fn name(self) -> &'static str {
        match self {
            WireType::I64 => "i64",
            WireType::I32 => "i32",
            WireType::I16 => "i16",
            WireType::I8 => "i8",
            WireType::U64 => "u64",
            WireType::U32 => "u32",
            WireType::U16 => "u16",
            WireType::U8 => "u8",
            WireType::F64 => "f64",
            WireType::String => "string",
            WireType::Bool => "bool",
            WireType::Section => "section",
        }
    }
}

/// A full tag byte: base type plus array flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    pub ty: WireType,
    pub array: bool,
}

impl Tag {
    pub fn scalar(ty: WireType) -> Self {
        Tag { ty, array: false }
    }

    pub fn array(ty: WireType) -> Self {
        Tag { ty, array: true }
    }

    /// Parse a tag byte. Unknown base types are a format error.
    pub fn from_u8(b: u8) -> Result<Self> {
        let ty = WireType::from_u8(b & !ARRAY_FLAG)
            .ok_or_else(|| CodecError::Format(format!("unknown type tag 0x{:02x}", b)))?;
        Ok(Tag { ty, array: b & ARRAY_FLAG != 0 })
    }

    pub fn as_u8(self) -> u8 {
        if self.array {
            self.ty.as_u8() | ARRAY_FLAG
        } else {
            self.ty.as_u8()
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.array {
            write!(f, "array<{}> (0x{:02x})", self.ty.name(), self.as_u8())
        } else {
            write!(f, "{} (0x{:02x})", self.ty.name(), self.as_u8())
        }
    }
}

pub fn read_tag<R: Read + ?Sized>(r: &mut R) -> Result<Tag> {
    Tag::from_u8(r.read_u8()?)
}

pub fn write_tag<W: Write + ?Sized>(w: &mut W, tag: Tag) -> Result<()> {
    w.write_u8(tag.as_u8())?;
    Ok(())
}

// Tagged scalar writers: tag byte followed by the payload.

pub fn write_i64<W: Write + ?Sized>(w: &mut W, v: i64) -> Result<()> {
    write_tag(w, Tag::scalar(WireType::I64))?;
    w.write_i64::<LittleEndian>(v)?;
    Ok(())
}

pub fn write_i32<W: Write + ?Sized>(w: &mut W, v: i32) -> Result<()> {
    write_tag(w, Tag::scalar(WireType::I32))?;
    w.write_i32::<LittleEndian>(v)?;
    Ok(())
}

pub fn write_i16<W: Write + ?Sized>(w: &mut W, v: i16) -> Result<()> {
    write_tag(w, Tag::scalar(WireType::I16))?;
    w.write_i16::<LittleEndian>(v)?;
    Ok(())
}

pub fn write_i8<W: Write + ?Sized>(w: &mut W, v: i8) -> Result<()> {
    write_tag(w, Tag::scalar(WireType::I8))?;
    w.write_i8(v)?;
    Ok(())
}

pub fn write_u64<W: Write + ?Sized>(w: &mut W, v: u64) -> Result<()> {
    write_tag(w, Tag::scalar(WireType::U64))?;
    w.write_u64::<LittleEndian>(v)?;
    Ok(())
}

pub fn write_u32<W: Write + ?Sized>(w: &mut W, v: u32) -> Result<()> {
    write_tag(w, Tag::scalar(WireType::U32))?;
    w.write_u32::<LittleEndian>(v)?;
    Ok(())
}

pub fn write_u16<W: Write + ?Sized>(w: &mut W, v: u16) -> Result<()> {
    write_tag(w, Tag::scalar(WireType::U16))?;
    w.write_u16::<LittleEndian>(v)?;
    Ok(())
}

pub fn write_u8<W: Write + ?Sized>(w: &mut W, v: u8) -> Result<()> {
    write_tag(w, Tag::scalar(WireType::U8))?;
    w.write_u8(v)?;
    Ok(())
}

pub fn write_f64<W: Write + ?Sized>(w: &mut W, v: f64) -> Result<()> {
    write_tag(w, Tag::scalar(WireType::F64))?;
    w.write_f64::<LittleEndian>(v)?;
    Ok(())
}

pub fn write_bool<W: Write + ?Sized>(w: &mut W, v: bool) -> Result<()> {
    write_tag(w, Tag::scalar(WireType::Bool))?;
    w.write_u8(v as u8)?;
    Ok(())
}

pub fn write_string<W: Write + ?Sized>(w: &mut W, v: &[u8]) -> Result<()> {
    write_tag(w, Tag::scalar(WireType::String))?;
    write_string_payload(w, v)
}

/// Length-prefixed string body without the tag.
pub fn write_string_payload<W: Write + ?Sized>(w: &mut W, v: &[u8]) -> Result<()> {
    write_varint(w, v.len() as u64)?;
    w.write_all(v)?;
    Ok(())
}

// Untagged payload readers: the caller has already consumed the tag.

pub fn read_i64<R: Read + ?Sized>(r: &mut R) -> Result<i64> {
    Ok(r.read_i64::<LittleEndian>()?)
}

pub fn read_i32<R: Read + ?Sized>(r: &mut R) -> Result<i32> {
    Ok(r.read_i32::<LittleEndian>()?)
}

pub fn read_i16<R: Read + ?Sized>(r: &mut R) -> Result<i16> {
    Ok(r.read_i16::<LittleEndian>()?)
}

pub fn read_i8<R: Read + ?Sized>(r: &mut R) -> Result<i8> {
    Ok(r.read_i8()?)
}

pub fn read_u64<R: Read + ?Sized>(r: &mut R) -> Result<u64> {
    Ok(r.read_u64::<LittleEndian>()?)
}

pub fn read_u32<R: Read + ?Sized>(r: &mut R) -> Result<u32> {
    Ok(r.read_u32::<LittleEndian>()?)
}

pub fn read_u16<R: Read + ?Sized>(r: &mut R) -> Result<u16> {
    Ok(r.read_u16::<LittleEndian>()?)
}

pub fn read_u8<R: Read + ?Sized>(r: &mut R) -> Result<u8> {
    Ok(r.read_u8()?)
}

pub fn read_f64<R: Read + ?Sized>(r: &mut R) -> Result<f64> {
    Ok(r.read_f64::<LittleEndian>()?)
}

/// Only 0x00 and 0x01 are valid.
pub fn read_bool<R: Read + ?Sized>(r: &mut R) -> Result<bool> {
    match r.read_u8()? {
        0x00 => Ok(false),
        0x01 => Ok(true),
        b => Err(CodecError::Format(format!("invalid bool byte 0x{:02x}", b))),
    }
}

/// Length-prefixed byte string. A body shorter than its declared length is truncated.
pub fn read_string<R: Read + ?Sized>(r: &mut R) -> Result<Vec<u8>> {
    let len = read_count(r)?;
    let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
    (&mut *r).take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(CodecError::Truncated);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_byte_layout() {
        assert_eq!(Tag::from_u8(0x8c).unwrap(), Tag::array(WireType::Section));
        assert_eq!(Tag::from_u8(0x05).unwrap(), Tag::scalar(WireType::U64));
        assert_eq!(Tag::array(WireType::String).as_u8(), 0x8a);
        assert!(matches!(Tag::from_u8(0x0d), Err(CodecError::Format(_))));
        assert!(matches!(Tag::from_u8(0x80), Err(CodecError::Format(_))));
    }

    #[test]
    fn string_body_too_short() {
        // Declares 11 bytes, carries 3.
        let mut r: &[u8] = &[0x2c, b'a', b'b', b'c'];
        assert!(matches!(read_string(&mut r), Err(CodecError::Truncated)));
    }
}
