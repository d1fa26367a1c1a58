//! Section engine: encode/decode sections of named, tagged fields.
//!
//! A section is a varint field count followed by that many fields; each field is a
//! one-byte name length, the name bytes, a tag byte and the payload for that tag.
//! Three ways in:
//!
//! - **Schema-less** ([`Codec::read_section`]): the wire is self-describing, so any
//!   well-formed section decodes into a [`Section`] tree. Unknown fields of a
//!   schema-guided decode are walked the same way but discarded, names included, so
//!   their names need not be UTF-8.
//! - **Schema-guided** ([`Codec::read_section_with`]): fields are checked against a
//!   [`Schema`]; unknown names are parsed and dropped, absent fields keep their zero
//!   value, the result is in schema order whatever the wire order was.
//! - **Typed** ([`Codec::read_record`] / [`Codec::write_record`]) for types declared
//!   with [`wire_record!`](crate::wire_record).
//!
//! On encode, empty byte strings and empty arrays of a schema-described record are
//! omitted; scalars are always written.

use crate::frame::HEADER_LEN;
use crate::primitive::{
    read_bool, read_f64, read_i16, read_i32, read_i64, read_i8, read_string, read_tag, read_u16,
    read_u32, read_u64, read_u8, write_string_payload, write_tag, Tag, WireType, MAX_PREALLOC,
};
use crate::record::Record;
use crate::schema::{ElementType, FieldSpec, FieldType, Schema};
use crate::value::{Section, Value};
use crate::varint::{read_count, write_varint};
use byteorder::{LittleEndian, WriteBytesExt};
use std::collections::HashSet;
use std::io::{Read, Write};
use tracing::{debug, trace};

/// Longest field name the one-byte length prefix can describe.
pub const MAX_NAME_LEN: usize = 255;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO: {0}")]
    Io(#[source] std::io::Error),
    #[error("Overflow: {0} does not fit in a varint (max 2^62 - 1)")]
    Overflow(u64),
    #[error("Truncated: stream ended inside a value")]
    Truncated,
    #[error("Format: {0}")]
    Format(String),
    #[error("Type mismatch: field {field}: expected {expected}, found {found}")]
    TypeMismatch { field: String, expected: Tag, found: Tag },
    #[error("Header: unexpected magic/version {found:02x?}")]
    Header { found: [u8; HEADER_LEN] },
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            CodecError::Truncated
        } else {
            CodecError::Io(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Decoder limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum section nesting, the root section counting as 1.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { max_depth: 100 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Codec {
    limits: Limits,
}

impl Codec {
    pub fn new(limits: Limits) -> Self {
        Codec { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Encode a typed record as a section body (no frame header).
    pub fn write_record<W: Write + ?Sized, R: Record>(&self, w: &mut W, record: &R) -> Result<()> {
        self.write_section(w, &record.to_section())
    }

    /// Decode a section body into a typed record.
    pub fn read_record<S: Read + ?Sized, R: Record>(&self, r: &mut S) -> Result<R> {
        let section = self.read_section_with(r, R::schema())?;
        R::from_section(section)
    }

    /// Write `section` exactly as given: every field, in order. A repeated name is a
    /// format error.
    pub fn write_section<W: Write + ?Sized>(&self, w: &mut W, section: &Section) -> Result<()> {
        write_varint(w, section.len() as u64)?;
        let mut seen = HashSet::with_capacity(section.len());
        for field in section.iter() {
            if !seen.insert(field.name.as_str()) {
                return Err(CodecError::Format(format!("duplicate field name {:?}", field.name)));
            }
            write_name(w, &field.name)?;
            self.write_value(w, &field.value)?;
        }
        Ok(())
    }

    /// Write `section` as a record of `schema`: schema order, missing scalars as zero,
    /// empty byte strings and arrays omitted.
    pub fn write_section_with<W: Write + ?Sized>(
        &self,
        w: &mut W,
        section: &Section,
        schema: &Schema,
    ) -> Result<()> {
        let conformed = conform(section, schema)?;
        self.write_section(w, &conformed)
    }

    /// Tag byte followed by the payload.
    pub fn write_value<W: Write + ?Sized>(&self, w: &mut W, value: &Value) -> Result<()> {
        write_tag(w, value.tag())?;
        self.write_payload(w, value)
    }

    fn write_payload<W: Write + ?Sized>(&self, w: &mut W, value: &Value) -> Result<()> {
        match value {
            Value::I64(x) => w.write_i64::<LittleEndian>(*x)?,
            Value::I32(x) => w.write_i32::<LittleEndian>(*x)?,
            Value::I16(x) => w.write_i16::<LittleEndian>(*x)?,
            Value::I8(x) => w.write_i8(*x)?,
            Value::U64(x) => w.write_u64::<LittleEndian>(*x)?,
            Value::U32(x) => w.write_u32::<LittleEndian>(*x)?,
            Value::U16(x) => w.write_u16::<LittleEndian>(*x)?,
            Value::U8(x) => w.write_u8(*x)?,
            Value::F64(x) => w.write_f64::<LittleEndian>(*x)?,
            Value::Bool(b) => w.write_u8(*b as u8)?,
            Value::String(b) => write_string_payload(w, b)?,
            Value::Section(s) => self.write_section(w, s)?,
            Value::Array { elem, items } => {
                write_varint(w, items.len() as u64)?;
                let expected = Tag::scalar(*elem);
                for item in items {
                    if item.tag() != expected {
                        return Err(CodecError::Format(format!(
                            "array of {} holds an element of type {}",
                            elem.name(),
                            item.tag()
                        )));
                    }
                    self.write_payload(w, item)?;
                }
            }
        }
        Ok(())
    }

    /// Decode a section body without a schema.
    ///
    /// Field names must be UTF-8 here, since [`Section`] names are `String`s. Repeated
    /// names are kept as they appear, so [`Codec::write_section`] rejects such a
    /// section if it is written back.
    pub fn read_section<R: Read + ?Sized>(&self, r: &mut R) -> Result<Section> {
        self.read_section_at(r, 1)
    }

    /// Decode a section body against `schema`.
    pub fn read_section_with<R: Read + ?Sized>(&self, r: &mut R, schema: &Schema) -> Result<Section> {
        self.read_section_with_at(r, schema, 1)
    }

    /// Decode the payload for an already-consumed tag, without a schema.
    pub fn read_value<R: Read + ?Sized>(&self, r: &mut R, tag: Tag) -> Result<Value> {
        self.read_payload(r, tag, 1)
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.limits.max_depth {
            debug!(depth, max_depth = self.limits.max_depth, "section nesting limit exceeded");
            return Err(CodecError::Format(format!(
                "sections nested deeper than {}",
                self.limits.max_depth
            )));
        }
        Ok(())
    }

    fn read_section_at<R: Read + ?Sized>(&self, r: &mut R, depth: usize) -> Result<Section> {
        self.check_depth(depth)?;
        let n = read_count(r)?;
        let mut section = Section { fields: Vec::with_capacity(n.min(MAX_PREALLOC)) };
        for _ in 0..n {
            let name = read_name(r)?;
            let tag = read_tag(r)?;
            let value = self.read_payload(r, tag, depth)?;
            section.push(name, value);
        }
        Ok(section)
    }

    fn read_payload<R: Read + ?Sized>(&self, r: &mut R, tag: Tag, depth: usize) -> Result<Value> {
        if !tag.array {
            return self.read_element(r, tag.ty, depth);
        }
        let n = read_count(r)?;
        let mut items = Vec::with_capacity(n.min(MAX_PREALLOC));
        for _ in 0..n {
            items.push(self.read_element(r, tag.ty, depth)?);
        }
        Ok(Value::Array { elem: tag.ty, items })
    }

    fn read_element<R: Read + ?Sized>(&self, r: &mut R, ty: WireType, depth: usize) -> Result<Value> {
        Ok(match ty {
            WireType::I64 => Value::I64(read_i64(r)?),
            WireType::I32 => Value::I32(read_i32(r)?),
            WireType::I16 => Value::I16(read_i16(r)?),
            WireType::I8 => Value::I8(read_i8(r)?),
            WireType::U64 => Value::U64(read_u64(r)?),
            WireType::U32 => Value::U32(read_u32(r)?),
            WireType::U16 => Value::U16(read_u16(r)?),
            WireType::U8 => Value::U8(read_u8(r)?),
            WireType::F64 => Value::F64(read_f64(r)?),
            WireType::Bool => Value::Bool(read_bool(r)?),
            WireType::String => Value::String(read_string(r)?),
            WireType::Section => Value::Section(self.read_section_at(r, depth + 1)?),
        })
    }

    fn read_section_with_at<R: Read + ?Sized>(
        &self,
        r: &mut R,
        schema: &Schema,
        depth: usize,
    ) -> Result<Section> {
        self.check_depth(depth)?;
        let n = read_count(r)?;
        let mut out = schema.zero_section();
        for _ in 0..n {
            let name = read_name_bytes(r)?;
            let tag = read_tag(r)?;
            match schema.field_by_bytes(&name) {
                Some(spec) => {
                    check_field_type(schema, spec)?;
                    let expected = spec.ty.tag();
                    if tag != expected {
                        return Err(CodecError::TypeMismatch {
                            field: spec.name.to_string(),
                            expected,
                            found: tag,
                        });
                    }
                    let value = self.read_typed(r, &spec.ty, depth)?;
                    out.insert(spec.name, value);
                }
                None => {
                    trace!(
                        schema = schema.name,
                        field = %String::from_utf8_lossy(&name),
                        tag = %tag,
                        "skipping unknown field"
                    );
                    self.skip_payload(r, tag, depth)?;
                }
            }
        }
        Ok(out)
    }

    /// Parse and discard a payload. Names inside skipped sections stay raw bytes.
    fn skip_payload<R: Read + ?Sized>(&self, r: &mut R, tag: Tag, depth: usize) -> Result<()> {
        let n = if tag.array { read_count(r)? } else { 1 };
        for _ in 0..n {
            if tag.ty == WireType::Section {
                self.skip_section(r, depth + 1)?;
            } else {
                self.read_element(r, tag.ty, depth)?;
            }
        }
        Ok(())
    }

    fn skip_section<R: Read + ?Sized>(&self, r: &mut R, depth: usize) -> Result<()> {
        self.check_depth(depth)?;
        let n = read_count(r)?;
        for _ in 0..n {
            read_name_bytes(r)?;
            let tag = read_tag(r)?;
            self.skip_payload(r, tag, depth)?;
        }
        Ok(())
    }

    fn read_typed<R: Read + ?Sized>(&self, r: &mut R, ty: &FieldType, depth: usize) -> Result<Value> {
        match ty {
            FieldType::Scalar(t) => self.read_element(r, *t, depth),
            FieldType::Bytes => Ok(Value::String(read_string(r)?)),
            FieldType::Object(schema) => {
                Ok(Value::Section(self.read_section_with_at(r, schema(), depth + 1)?))
            }
            FieldType::Array(elem) => {
                let n = read_count(r)?;
                let mut items = Vec::with_capacity(n.min(MAX_PREALLOC));
                for _ in 0..n {
                    let item = match elem {
                        ElementType::Scalar(t) => self.read_element(r, *t, depth)?,
                        ElementType::Bytes => Value::String(read_string(r)?),
                        ElementType::Object(schema) => {
                            Value::Section(self.read_section_with_at(r, schema(), depth + 1)?)
                        }
                    };
                    items.push(item);
                }
                Ok(Value::Array { elem: elem.wire_type(), items })
            }
        }
    }
}

fn write_name<W: Write + ?Sized>(w: &mut W, name: &str) -> Result<()> {
    if name.len() > MAX_NAME_LEN {
        return Err(CodecError::Format(format!(
            "field name is {} bytes, at most {} allowed",
            name.len(),
            MAX_NAME_LEN
        )));
    }
    w.write_u8(name.len() as u8)?;
    w.write_all(name.as_bytes())?;
    Ok(())
}

fn read_name_bytes<R: Read + ?Sized>(r: &mut R) -> Result<Vec<u8>> {
    let len = read_u8(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_name<R: Read + ?Sized>(r: &mut R) -> Result<String> {
    String::from_utf8(read_name_bytes(r)?)
        .map_err(|e| CodecError::Format(format!("field name is not UTF-8: {}", e)))
}

fn check_field_type(schema: &Schema, spec: &FieldSpec) -> Result<()> {
    if spec.ty.is_well_formed() {
        return Ok(());
    }
    Err(CodecError::Format(format!(
        "schema {} declares field {:?} as scalar {}; use Bytes or Object",
        schema.name,
        spec.name,
        spec.ty.tag()
    )))
}

/// Empty byte strings and empty arrays are left off the wire.
fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::String(b) => b.is_empty(),
        Value::Array { items, .. } => items.is_empty(),
        _ => false,
    }
}

/// Rebuild `section` in `schema` order with the omission rule applied.
fn conform(section: &Section, schema: &Schema) -> Result<Section> {
    if let Some(f) = section.iter().find(|f| schema.field(&f.name).is_none()) {
        return Err(CodecError::Format(format!(
            "field {:?} is not declared in schema {}",
            f.name, schema.name
        )));
    }
    let mut out = Section::new();
    for spec in schema.fields {
        check_field_type(schema, spec)?;
        let value = match section.get(spec.name) {
            Some(v) => v.clone(),
            None => spec.ty.zero_value(),
        };
        let expected = spec.ty.tag();
        if value.tag() != expected {
            return Err(CodecError::TypeMismatch {
                field: spec.name.to_string(),
                expected,
                found: value.tag(),
            });
        }
        if spec.ty.is_container() && is_empty_container(&value) {
            continue;
        }
        let value = match (spec.ty, value) {
            (FieldType::Object(inner), Value::Section(s)) => Value::Section(conform(&s, inner())?),
            (FieldType::Array(ElementType::Object(inner)), Value::Array { elem, items }) => {
                let items = items
                    .iter()
                    .map(|item| match item {
                        Value::Section(s) => Ok(Value::Section(conform(s, inner())?)),
                        other => Err(CodecError::TypeMismatch {
                            field: spec.name.to_string(),
                            expected: Tag::scalar(WireType::Section),
                            found: other.tag(),
                        }),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Value::Array { elem, items }
            }
            (_, v) => v,
        };
        out.push(spec.name, value);
    }
    Ok(out)
}
