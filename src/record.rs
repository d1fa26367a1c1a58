//! Typed records bound to static schemas.
//!
//! A record type is a plain struct whose fields implement [`WireField`]. The
//! [`wire_record!`](crate::wire_record) macro declares the struct together with its
//! [`Schema`] and the get/set accessors that move each field in and out of a
//! [`Section`]:
//!
//! ```
//! binkv::wire_record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Ping {
//!         pub height: u64 => "height",
//!         pub status: Vec<u8> => "status",
//!     }
//! }
//!
//! let bytes = binkv::frame::to_bytes(&Ping { height: 7, status: vec![] }).unwrap();
//! let back: Ping = binkv::frame::from_slice(&bytes).unwrap();
//! assert_eq!(back.height, 7);
//! ```
//!
//! Field type mapping:
//!
//! | Rust | wire |
//! |------|------|
//! | `i64` `i32` `i16` `i8` `u64` `u32` `u16` `u8` `f64` `bool` | scalar, always written |
//! | `Vec<u8>` | byte string, omitted when empty |
//! | `Vec<T>` (`T`: scalar except `u8`, `Vec<u8>`, record) | array, omitted when empty |
//! | record type | nested section |

use crate::codec::{CodecError, Result};
use crate::primitive::{Tag, WireType};
use crate::schema::{ElementType, FieldType, Schema};
use crate::value::{Section, Value};

/// A struct with a static schema and per-field accessors.
pub trait Record: Default {
    fn schema() -> &'static Schema;

    /// Fields in schema order, with empty byte strings and arrays left out.
    fn to_section(&self) -> Section;

    /// Store `value` into the field with wire name `name`. Unknown names are ignored.
    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;

    fn from_section(section: Section) -> Result<Self> {
        let mut record = Self::default();
        for field in section.fields {
            record.set_field(&field.name, field.value)?;
        }
        Ok(record)
    }
}

/// A Rust type that can be stored in a record field.
pub trait WireField: Sized {
    const TYPE: FieldType;

    fn to_value(&self) -> Value;

    fn from_value(value: Value, field: &str) -> Result<Self>;

    /// Only containers (byte strings, arrays) are ever empty for the wire.
    fn is_empty_for_wire(&self) -> bool {
        false
    }
}

/// A Rust type that can be an element of an array field.
pub trait ArrayElement: Sized {
    const ELEMENT: ElementType;

    fn to_element(&self) -> Value;

    fn from_element(value: Value, field: &str) -> Result<Self>;
}

/// Error for a value whose type does not match the declared field type.
pub fn mismatch(field: &str, expected: Tag, found: &Value) -> CodecError {
    CodecError::TypeMismatch { field: field.to_string(), expected, found: found.tag() }
}

macro_rules! scalar_field {
    ($($ty:ty => $wire:ident, $variant:ident);* $(;)?) => {
        $(
            impl WireField for $ty {
                const TYPE: FieldType = FieldType::Scalar(WireType::$wire);

                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }

                fn from_value(value: Value, field: &str) -> Result<Self> {
                    match value {
                        Value::$variant(x) => Ok(x),
                        other => Err(mismatch(field, Tag::scalar(WireType::$wire), &other)),
                    }
                }
            }
        )*
    };
}

scalar_field! {
    i64 => I64, I64;
    i32 => I32, I32;
    i16 => I16, I16;
    i8 => I8, I8;
    u64 => U64, U64;
    u32 => U32, U32;
    u16 => U16, U16;
    u8 => U8, U8;
    f64 => F64, F64;
    bool => Bool, Bool;
}

// u8 is deliberately absent: `Vec<u8>` is a byte string, not an array.
macro_rules! scalar_element {
    ($($ty:ty => $wire:ident, $variant:ident);* $(;)?) => {
        $(
            impl ArrayElement for $ty {
                const ELEMENT: ElementType = ElementType::Scalar(WireType::$wire);

                fn to_element(&self) -> Value {
                    Value::$variant(*self)
                }

                fn from_element(value: Value, field: &str) -> Result<Self> {
                    match value {
                        Value::$variant(x) => Ok(x),
                        other => Err(mismatch(field, Tag::scalar(WireType::$wire), &other)),
                    }
                }
            }
        )*
    };
}

scalar_element! {
    i64 => I64, I64;
    i32 => I32, I32;
    i16 => I16, I16;
    i8 => I8, I8;
    u64 => U64, U64;
    u32 => U32, U32;
    u16 => U16, U16;
    f64 => F64, F64;
    bool => Bool, Bool;
}

impl WireField for Vec<u8> {
    const TYPE: FieldType = FieldType::Bytes;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value, field: &str) -> Result<Self> {
        match value {
            Value::String(b) => Ok(b),
            other => Err(mismatch(field, Tag::scalar(WireType::String), &other)),
        }
    }

    fn is_empty_for_wire(&self) -> bool {
        self.is_empty()
    }
}

impl ArrayElement for Vec<u8> {
    const ELEMENT: ElementType = ElementType::Bytes;

    fn to_element(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_element(value: Value, field: &str) -> Result<Self> {
        <Vec<u8> as WireField>::from_value(value, field)
    }
}

impl<T: ArrayElement> WireField for Vec<T> {
    const TYPE: FieldType = FieldType::Array(T::ELEMENT);

    fn to_value(&self) -> Value {
        Value::Array {
            elem: T::ELEMENT.wire_type(),
            items: self.iter().map(ArrayElement::to_element).collect(),
        }
    }

    fn from_value(value: Value, field: &str) -> Result<Self> {
        let elem = T::ELEMENT.wire_type();
        match value {
            Value::Array { elem: found, items } if found == elem => {
                items.into_iter().map(|item| T::from_element(item, field)).collect()
            }
            other => Err(mismatch(field, Tag::array(elem), &other)),
        }
    }

    fn is_empty_for_wire(&self) -> bool {
        self.is_empty()
    }
}

/// Declare a record struct, its [`Schema`](crate::schema::Schema) and its accessors.
///
/// Each field is written `vis name: Type => "wire_name"`. Fields are encoded in
/// declaration order.
#[macro_export]
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty => $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::record::Record for $name {
            fn schema() -> &'static $crate::schema::Schema {
                static SCHEMA: $crate::schema::Schema = $crate::schema::Schema {
                    name: stringify!($name),
                    fields: &[
                        $(
                            $crate::schema::FieldSpec {
                                name: $wire,
                                ty: <$ty as $crate::record::WireField>::TYPE,
                            },
                        )*
                    ],
                };
                &SCHEMA
            }

            fn to_section(&self) -> $crate::value::Section {
                #[allow(unused_mut)]
                let mut section = $crate::value::Section::new();
                $(
                    if !$crate::record::WireField::is_empty_for_wire(&self.$field) {
                        section.push($wire, $crate::record::WireField::to_value(&self.$field));
                    }
                )*
                section
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                name: &str,
                value: $crate::value::Value,
            ) -> $crate::codec::Result<()> {
                match name {
                    $(
                        $wire => {
                            self.$field = <$ty as $crate::record::WireField>::from_value(value, $wire)?;
                        }
                    )*
                    _ => {}
                }
                Ok(())
            }
        }

        impl $crate::record::WireField for $name {
            const TYPE: $crate::schema::FieldType =
                $crate::schema::FieldType::Object(<$name as $crate::record::Record>::schema);

            fn to_value(&self) -> $crate::value::Value {
                $crate::value::Value::Section($crate::record::Record::to_section(self))
            }

            fn from_value(value: $crate::value::Value, field: &str) -> $crate::codec::Result<Self> {
                match value {
                    $crate::value::Value::Section(section) => {
                        <$name as $crate::record::Record>::from_section(section)
                    }
                    other => Err($crate::record::mismatch(
                        field,
                        $crate::primitive::Tag::scalar($crate::primitive::WireType::Section),
                        &other,
                    )),
                }
            }
        }

        impl $crate::record::ArrayElement for $name {
            const ELEMENT: $crate::schema::ElementType =
                $crate::schema::ElementType::Object(<$name as $crate::record::Record>::schema);

            fn to_element(&self) -> $crate::value::Value {
                $crate::record::WireField::to_value(self)
            }

            fn from_element(value: $crate::value::Value, field: &str) -> $crate::codec::Result<Self> {
                <$name as $crate::record::WireField>::from_value(value, field)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::wire_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Leaf {
            indices: Vec<u64> => "indices",
        }
    }

    crate::wire_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Node {
            flag: bool => "flag",
            label: Vec<u8> => "label",
            leaves: Vec<Leaf> => "leaves",
            names: Vec<Vec<u8>> => "names",
        }
    }

    #[test]
    fn schema_matches_declaration() {
        let schema = Node::schema();
        assert_eq!(schema.name, "Node");
        let names: Vec<_> = schema.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["flag", "label", "leaves", "names"]);
        assert_eq!(schema.fields[2].ty.tag(), Tag::array(WireType::Section));
        assert_eq!(schema.fields[3].ty.tag(), Tag::array(WireType::String));
    }

    #[test]
    fn empty_containers_are_left_out() {
        let node = Node::default();
        let section = node.to_section();
        assert_eq!(section.len(), 1);
        assert_eq!(section.get("flag"), Some(&Value::Bool(false)));
    }

    #[test]
    fn section_round_trip() {
        let node = Node {
            flag: true,
            label: b"x".to_vec(),
            leaves: vec![Leaf { indices: vec![1, 2] }, Leaf::default()],
            names: vec![b"a".to_vec(), Vec::new()],
        };
        let back = Node::from_section(node.to_section()).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn wrong_value_type_is_a_mismatch() {
        let mut node = Node::default();
        let err = node.set_field("flag", Value::U8(1)).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { ref field, .. } if field == "flag"));
        // Unknown names are ignored.
        node.set_field("other", Value::U8(1)).unwrap();
    }
}
