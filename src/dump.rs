//! Format decoded sections for display (indented text tree).

use crate::value::{Section, Value};
use std::fmt::Write;

/// How byte strings are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BytesStyle {
    /// Quoted text when the bytes are printable UTF-8, hex otherwise.
    #[default]
    Auto,
    /// Always hex.
    Hex,
}

/// Render `section` one field per line, nested sections indented by two spaces.
pub fn dump_section(section: &Section, style: BytesStyle) -> String {
    let mut out = String::new();
    write_section(&mut out, section, style, 0);
    out
}

/// Render a single value on one line (nested sections inline as `{...}` with field count).
pub fn format_value(value: &Value, style: BytesStyle) -> String {
    match value {
        Value::I64(x) => x.to_string(),
        Value::I32(x) => x.to_string(),
        Value::I16(x) => x.to_string(),
        Value::I8(x) => x.to_string(),
        Value::U64(x) => x.to_string(),
        Value::U32(x) => x.to_string(),
        Value::U16(x) => x.to_string(),
        Value::U8(x) => x.to_string(),
        Value::F64(x) => format!("{:?}", x),
        Value::Bool(b) => b.to_string(),
        Value::String(b) => format_bytes(b, style),
        Value::Section(s) => format!("{{{} fields}}", s.len()),
        Value::Array { items, .. } => {
            let parts: Vec<String> = items.iter().map(|v| format_value(v, style)).collect();
            format!("[{}]", parts.join(", "))
        }
    }
}

pub fn format_bytes(bytes: &[u8], style: BytesStyle) -> String {
    if style == BytesStyle::Auto {
        if let Ok(s) = std::str::from_utf8(bytes) {
            if s.chars().all(|c| !c.is_control()) {
                return format!("{:?}", s);
            }
        }
    }
    let mut hex = String::with_capacity(2 + bytes.len() * 2);
    hex.push_str("0x");
    for b in bytes {
        let _ = write!(hex, "{:02x}", b);
    }
    hex
}

fn write_section(out: &mut String, section: &Section, style: BytesStyle, depth: usize) {
    for field in section.iter() {
        write_field(out, &field.name, &field.value, style, depth);
    }
}

fn write_field(out: &mut String, name: &str, value: &Value, style: BytesStyle, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Section(s) => {
            let _ = writeln!(out, "{}{}: section ({} fields)", indent, name, s.len());
            write_section(out, s, style, depth + 1);
        }
        Value::Array { elem, items } if items.iter().any(|v| matches!(v, Value::Section(_))) => {
            let _ = writeln!(out, "{}{}: array<{}> ({} items)", indent, name, elem.name(), items.len());
            for (i, item) in items.iter().enumerate() {
                write_field(out, &format!("[{}]", i), item, style, depth + 1);
            }
        }
        Value::Array { elem, .. } => {
            let _ = writeln!(out, "{}{}: array<{}> = {}", indent, name, elem.name(), format_value(value, style));
        }
        _ => {
            let _ = writeln!(
                out,
                "{}{}: {} = {}",
                indent,
                name,
                value.wire_type().name(),
                format_value(value, style)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::WireType;

    #[test]
    fn nested_tree() {
        let inner = Section::new().with("indices", Value::array(WireType::U64, vec![Value::U64(1), Value::U64(2)]));
        let root = Section::new()
            .with("status", Value::String(b"OK".to_vec()))
            .with("blocks", Value::array(WireType::Section, vec![Value::Section(inner)]))
            .with("untrusted", Value::Bool(false));
        let text = dump_section(&root, BytesStyle::Auto);
        assert_eq!(
            text,
            "status: string = \"OK\"\n\
             blocks: array<section> (1 items)\n\
             \x20 [0]: section (1 fields)\n\
             \x20   indices: array<u64> = [1, 2]\n\
             untrusted: bool = false\n"
        );
    }

    #[test]
    fn binary_bytes_as_hex() {
        assert_eq!(format_bytes(&[0x00, 0xff], BytesStyle::Auto), "0x00ff");
        assert_eq!(format_bytes(b"ab", BytesStyle::Hex), "0x6162");
    }
}
