//! Variable-length unsigned integers (1, 2, 4 or 8 bytes).
//!
//! The two low bits of the first byte select the size class; the remaining
//! bits of the little-endian group hold the value, so the raw group equals
//! `(value << 2) | class`.
//!
//! | class | bytes | max value |
//! |-------|-------|-----------|
//! | `0b00` | 1 | 63 |
//! | `0b01` | 2 | 16383 |
//! | `0b10` | 4 | 1073741823 |
//! | `0b11` | 8 | 4611686018427387903 |

use crate::codec::{CodecError, Result};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Largest value a varint can carry (2^62 - 1).
pub const VARINT_MAX: u64 = (1 << 62) - 1;

const CLASS_1: u8 = 0b00;
const CLASS_2: u8 = 0b01;
const CLASS_4: u8 = 0b10;
const CLASS_8: u8 = 0b11;

/// Number of bytes `value` occupies on the wire, or `None` if it cannot be represented.
pub fn varint_len(value: u64) -> Option<usize> {
    match value {
        0..=63 => Some(1),
        64..=16383 => Some(2),
        16384..=1073741823 => Some(4),
        1073741824..=VARINT_MAX => Some(8),
        _ => None,
    }
}

/// Write `value` using the smallest size class. Returns the number of bytes written.
pub fn write_varint<W: Write + ?Sized>(w: &mut W, value: u64) -> Result<usize> {
    let len = varint_len(value).ok_or(CodecError::Overflow(value))?;
    match len {
        1 => w.write_u8(((value as u8) << 2) | CLASS_1)?,
        2 => w.write_u16::<LittleEndian>(((value as u16) << 2) | CLASS_2 as u16)?,
        4 => w.write_u32::<LittleEndian>(((value as u32) << 2) | CLASS_4 as u32)?,
        _ => w.write_u64::<LittleEndian>((value << 2) | CLASS_8 as u64)?,
    }
    Ok(len)
}

/// Encode `value` into a fresh buffer.
pub fn encode_varint(value: u64) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(8);
    write_varint(&mut out, value)?;
    Ok(out)
}

/// Read one varint. Returns `(value, bytes_consumed)`.
pub fn read_varint<R: Read + ?Sized>(r: &mut R) -> Result<(u64, usize)> {
    let first = r.read_u8()?;
    let len = match first & 0b11 {
        CLASS_1 => 1,
        CLASS_2 => 2,
        CLASS_4 => 4,
        _ => 8,
    };
    let mut buf = [0u8; 8];
    buf[0] = first;
    r.read_exact(&mut buf[1..len])?;
    let raw = match len {
        1 => first as u64,
        2 => LittleEndian::read_u16(&buf[..2]) as u64,
        4 => LittleEndian::read_u32(&buf[..4]) as u64,
        _ => LittleEndian::read_u64(&buf),
    };
    Ok((raw >> 2, len))
}

/// Decode one varint from the front of `bytes`.
pub fn decode_varint(mut bytes: &[u8]) -> Result<(u64, usize)> {
    read_varint(&mut bytes)
}

/// Read a varint count and convert it to `usize`.
pub(crate) fn read_count<R: Read + ?Sized>(r: &mut R) -> Result<usize> {
    let (n, _) = read_varint(r)?;
    usize::try_from(n).map_err(|_| CodecError::Format(format!("count {} does not fit in memory", n)))
}
