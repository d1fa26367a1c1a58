//! Frame handling: the fixed header in front of every top-level section.
//!
//! A frame is two 4-byte signatures and a format-version byte, followed by the
//! root section. The header is verified byte for byte; any difference is a
//! [`CodecError::Header`] and nothing past the header is read.
//!
//! The free functions use [`Codec::default`]; the `Codec` methods of the same name
//! honour its [`Limits`](crate::codec::Limits).

use crate::codec::{Codec, CodecError, Result};
use crate::record::Record;
use crate::schema::Schema;
use crate::value::Section;
use std::io::{Read, Write};
use tracing::debug;

pub const SIGNATURE_A: [u8; 4] = [0x01, 0x11, 0x01, 0x01];
pub const SIGNATURE_B: [u8; 4] = [0x01, 0x01, 0x02, 0x01];
pub const FORMAT_VERSION: u8 = 1;
pub const HEADER_LEN: usize = 9;

/// `SIGNATURE_A`, `SIGNATURE_B`, `FORMAT_VERSION`.
pub const HEADER: [u8; HEADER_LEN] = [
    SIGNATURE_A[0],
    SIGNATURE_A[1],
    SIGNATURE_A[2],
    SIGNATURE_A[3],
    SIGNATURE_B[0],
    SIGNATURE_B[1],
    SIGNATURE_B[2],
    SIGNATURE_B[3],
    FORMAT_VERSION,
];

pub fn write_header<W: Write + ?Sized>(w: &mut W) -> Result<()> {
    w.write_all(&HEADER)?;
    Ok(())
}

/// Read and verify the 9 header bytes.
pub fn read_header<R: Read + ?Sized>(r: &mut R) -> Result<()> {
    let mut found = [0u8; HEADER_LEN];
    r.read_exact(&mut found)?;
    if found != HEADER {
        debug!(found = ?found, "rejecting frame header");
        return Err(CodecError::Header { found });
    }
    Ok(())
}

impl Codec {
    /// Write a framed typed record.
    pub fn write<W: Write + ?Sized, R: Record>(&self, w: &mut W, record: &R) -> Result<()> {
        write_header(w)?;
        self.write_record(w, record)
    }

    /// Read a framed typed record.
    pub fn read<S: Read + ?Sized, R: Record>(&self, r: &mut S) -> Result<R> {
        read_header(r)?;
        self.read_record(r)
    }

    /// Write a framed section as-is.
    pub fn write_frame<W: Write + ?Sized>(&self, w: &mut W, section: &Section) -> Result<()> {
        write_header(w)?;
        self.write_section(w, section)
    }

    /// Read a framed section without a schema.
    pub fn read_frame<R: Read + ?Sized>(&self, r: &mut R) -> Result<Section> {
        read_header(r)?;
        self.read_section(r)
    }

    /// Write a framed section as a record of `schema`.
    pub fn write_frame_with<W: Write + ?Sized>(
        &self,
        w: &mut W,
        section: &Section,
        schema: &Schema,
    ) -> Result<()> {
        write_header(w)?;
        self.write_section_with(w, section, schema)
    }

    /// Read a framed section against `schema`.
    pub fn read_frame_with<R: Read + ?Sized>(&self, r: &mut R, schema: &Schema) -> Result<Section> {
        read_header(r)?;
        self.read_section_with(r, schema)
    }

    pub fn encode<R: Record>(&self, record: &R) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(&mut out, record)?;
        Ok(out)
    }

    /// Decode a framed record from the front of `bytes`; trailing bytes are not inspected.
    pub fn decode<R: Record>(&self, mut bytes: &[u8]) -> Result<R> {
        self.read(&mut bytes)
    }
}

pub fn write<W: Write + ?Sized, R: Record>(w: &mut W, record: &R) -> Result<()> {
    Codec::default().write(w, record)
}

pub fn read<S: Read + ?Sized, R: Record>(r: &mut S) -> Result<R> {
    Codec::default().read(r)
}

pub fn write_section<W: Write + ?Sized>(w: &mut W, section: &Section) -> Result<()> {
    Codec::default().write_frame(w, section)
}

/// Schema-less frame read; see [`Codec::read_section`] for name handling.
pub fn read_section<R: Read + ?Sized>(r: &mut R) -> Result<Section> {
    Codec::default().read_frame(r)
}

pub fn write_with_schema<W: Write + ?Sized>(w: &mut W, section: &Section, schema: &Schema) -> Result<()> {
    Codec::default().write_frame_with(w, section, schema)
}

pub fn read_with_schema<R: Read + ?Sized>(r: &mut R, schema: &Schema) -> Result<Section> {
    Codec::default().read_frame_with(r, schema)
}

pub fn to_bytes<R: Record>(record: &R) -> Result<Vec<u8>> {
    Codec::default().encode(record)
}

pub fn from_slice<R: Record>(bytes: &[u8]) -> Result<R> {
    Codec::default().decode(bytes)
}
