//! Static record descriptors: field names, wire types and container-ness.
//!
//! Schemas are plain `'static` data, usually generated by [`wire_record!`](crate::wire_record).
//! Nested record types are referenced through a function returning their schema,
//! which lets a schema refer to itself.

use crate::primitive::{Tag, WireType};
use crate::value::{Section, Value};

/// Returns the schema of a nested record type.
pub type SchemaFn = fn() -> &'static Schema;

/// Ordered list of fields describing one record type.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    /// Case-sensitive exact lookup by wire name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.field_by_bytes(name.as_bytes())
    }

    /// Lookup by the raw name bytes read off the wire, which need not be UTF-8.
    pub fn field_by_bytes(&self, name: &[u8]) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name.as_bytes() == name)
    }

    /// A section holding every field of this schema at its zero value, in schema order.
    pub fn zero_section(&self) -> Section {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.ty.zero_value()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire name; at most 255 bytes.
    pub name: &'static str,
    pub ty: FieldType,
}

/// Declared type of a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    /// Fixed-width integer, float or bool. Always written.
    Scalar(WireType),
    /// Byte string. Omitted when empty.
    Bytes,
    /// Nested record.
    Object(SchemaFn),
    /// Array of elements. Omitted when empty.
    Array(ElementType),
}

/// Element type of an array field.
#[derive(Debug, Clone, Copy)]
pub enum ElementType {
    Scalar(WireType),
    Bytes,
    Object(SchemaFn),
}

impl FieldType {
    /// Tag a value of this type carries on the wire.
    pub fn tag(&self) -> Tag {
        match self {
            FieldType::Scalar(ty) => Tag::scalar(*ty),
            FieldType::Bytes => Tag::scalar(WireType::String),
            FieldType::Object(_) => Tag::scalar(WireType::Section),
            FieldType::Array(elem) => Tag::array(elem.wire_type()),
        }
    }

    /// Byte strings and arrays may be left off the wire when empty.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            FieldType::Bytes | FieldType::Array(_) | FieldType::Scalar(WireType::String)
        )
    }

    /// `Scalar` and `ElementType::Scalar` hold fixed-width types only; byte strings
    /// and sections are declared with `Bytes` and `Object`.
    pub fn is_well_formed(&self) -> bool {
        match self {
            FieldType::Scalar(ty) | FieldType::Array(ElementType::Scalar(ty)) => ty.is_fixed_width(),
            _ => true,
        }
    }

    /// Value a field keeps when it is absent from the wire.
    pub fn zero_value(&self) -> Value {
        match self {
            FieldType::Scalar(ty) => zero_scalar(*ty),
            FieldType::Bytes => Value::String(Vec::new()),
            FieldType::Object(_) => Value::Section(Section::new()),
            FieldType::Array(elem) => Value::array(elem.wire_type(), Vec::new()),
        }
    }
}

impl ElementType {
    pub fn wire_type(&self) -> WireType {
        match self {
            ElementType::Scalar(ty) => *ty,
            ElementType::Bytes => WireType::String,
            ElementType::Object(_) => WireType::Section,
        }
    }
}

fn zero_scalar(ty: WireType) -> Value {
    match ty {
        WireType::I64 => Value::I64(0),
        WireType::I32 => Value::I32(0),
        WireType::I16 => Value::I16(0),
        WireType::I8 => Value::I8(0),
        WireType::U64 => Value::U64(0),
        WireType::U32 => Value::U32(0),
        WireType::U16 => Value::U16(0),
        WireType::U8 => Value::U8(0),
        WireType::F64 => Value::F64(0.0),
        WireType::Bool => Value::Bool(false),
        WireType::String => Value::String(Vec::new()),
        WireType::Section => Value::Section(Section::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner() -> &'static Schema {
        static INNER: Schema = Schema {
            name: "Inner",
            fields: &[FieldSpec { name: "indices", ty: FieldType::Array(ElementType::Scalar(WireType::U64)) }],
        };
        &INNER
    }

    static OUTER: Schema = Schema {
        name: "Outer",
        fields: &[
            FieldSpec { name: "height", ty: FieldType::Scalar(WireType::U64) },
            FieldSpec { name: "status", ty: FieldType::Bytes },
            FieldSpec { name: "entries", ty: FieldType::Array(ElementType::Object(inner)) },
        ],
    };

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(OUTER.field("height").is_some());
        assert!(OUTER.field("Height").is_none());
    }

    #[test]
    fn tags_follow_declared_types() {
        assert_eq!(OUTER.fields[0].ty.tag().as_u8(), 0x05);
        assert_eq!(OUTER.fields[1].ty.tag().as_u8(), 0x0a);
        assert_eq!(OUTER.fields[2].ty.tag().as_u8(), 0x8c);
        assert!(!OUTER.fields[0].ty.is_container());
        assert!(OUTER.fields[2].ty.is_container());
    }

    #[test]
    fn scalar_holds_fixed_width_types_only() {
        assert!(FieldType::Scalar(WireType::Bool).is_well_formed());
        assert!(FieldType::Array(ElementType::Bytes).is_well_formed());
        assert!(!FieldType::Scalar(WireType::String).is_well_formed());
        assert!(!FieldType::Scalar(WireType::Section).is_well_formed());
        assert!(!FieldType::Array(ElementType::Scalar(WireType::Section)).is_well_formed());
        // A misdeclared byte string is still a container for omission.
        assert!(FieldType::Scalar(WireType::String).is_container());
        assert!(OUTER.field_by_bytes(&[0xff, 0xfe]).is_none());
    }

    #[test]
    fn zero_section_in_schema_order() {
        let z = OUTER.zero_section();
        assert_eq!(z.len(), 3);
        assert_eq!(z.get("height"), Some(&Value::U64(0)));
        assert_eq!(z.get("status"), Some(&Value::String(vec![])));
        assert_eq!(z.get("entries"), Some(&Value::array(WireType::Section, vec![])));
    }
}
