//! Runtime value tree (tagged values, fields and sections).

use crate::primitive::{Tag, WireType};

/// A single tagged value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I64(i64),
    I32(i32),
    I16(i16),
    I8(i8),
    U64(u64),
    U32(u32),
    U16(u16),
    U8(u8),
    F64(f64),
    Bool(bool),
    /// Raw byte string (not necessarily UTF-8).
    String(Vec<u8>),
    /// Homogeneous array; every item must have base type `elem` and none may be an array.
    Array { elem: WireType, items: Vec<Value> },
    Section(Section),
}

impl Value {
    /// Base wire type of this value (the element type for arrays).
    pub fn wire_type(&self) -> WireType {
        match self {
            Value::I64(_) => WireType::I64,
            Value::I32(_) => WireType::I32,
            Value::I16(_) => WireType::I16,
            Value::I8(_) => WireType::I8,
            Value::U64(_) => WireType::U64,
            Value::U32(_) => WireType::U32,
            Value::U16(_) => WireType::U16,
            Value::U8(_) => WireType::U8,
            Value::F64(_) => WireType::F64,
            Value::Bool(_) => WireType::Bool,
            Value::String(_) => WireType::String,
            Value::Array { elem, .. } => *elem,
            Value::Section(_) => WireType::Section,
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            Value::Array { elem, .. } => Tag::array(*elem),
            v => Tag::scalar(v.wire_type()),
        }
    }

    pub fn array(elem: WireType, items: Vec<Value>) -> Self {
        Value::Array { elem, items }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Value::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array { items, .. } => Some(items),
            _ => None,
        }
    }
}

/// One named entry of a section.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

/// Ordered list of fields; the wire form of a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub fields: Vec<Field>,
}

impl Section {
    pub fn new() -> Self {
        Section { fields: Vec::new() }
    }

    /// Append a field. Use [`Section::insert`] to replace an existing one.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push(Field { name: name.into(), value });
    }

    /// Builder-style [`Section::push`].
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.push(name, value);
        self
    }

    /// Set `name` to `value`, replacing an existing field of that name in place.
    pub fn insert(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(f) => f.value = value,
            None => self.push(name, value),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }
}

impl FromIterator<(String, Value)> for Section {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Section {
            fields: iter.into_iter().map(|(name, value)| Field { name, value }).collect(),
        }
    }
}
