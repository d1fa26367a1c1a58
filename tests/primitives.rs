//! Varint and primitive codec tests against fixed byte vectors from the reference peer.

use binkv::primitive::{
    read_bool, read_f64, read_i16, read_i32, read_i64, read_i8, read_string, read_u16, read_u32,
    read_u64, read_u8, write_bool, write_f64, write_i16, write_i32, write_i64, write_i8, write_string,
    write_u16, write_u32, write_u64, write_u8,
};
use binkv::varint::{decode_varint, encode_varint, read_varint, write_varint, VARINT_MAX};
use binkv::{Codec, CodecError, Tag, Value, WireType};

const VARINT_VECTORS: &[(u64, &[u8])] = &[
    (0, &[0x00]),
    (1, &[0x04]),
    (2, &[0x08]),
    (63, &[0xfc]),
    (64, &[0x01, 0x01]),
    (16383, &[0xfd, 0xff]),
    (16384, &[0x02, 0x00, 0x01, 0x00]),
    (31337, &[0xa6, 0xe9, 0x01, 0x00]),
    (1073741823, &[0xfe, 0xff, 0xff, 0xff]),
    (1073741824, &[0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]),
    (4611686018427387903, &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
];

#[test]
fn test_varint_encode_vectors() {
    for (value, expected) in VARINT_VECTORS {
        let mut out = Vec::new();
        let n = write_varint(&mut out, *value).expect("encode");
        assert_eq!(&out[..], *expected, "value {}", value);
        assert_eq!(n, expected.len());
    }
}

#[test]
fn test_varint_decode_vectors() {
    for (expected, bytes) in VARINT_VECTORS {
        let mut r = *bytes;
        let (value, consumed) = read_varint(&mut r).expect("decode");
        assert_eq!(value, *expected);
        assert_eq!(consumed, bytes.len());
        assert!(r.is_empty());
    }
}

#[test]
fn test_varint_overflow() {
    assert_eq!(VARINT_MAX, (1 << 62) - 1);
    let err = encode_varint(1 << 62).unwrap_err();
    assert!(matches!(err, CodecError::Overflow(v) if v == 1 << 62));
    assert!(matches!(encode_varint(u64::MAX), Err(CodecError::Overflow(_))));
}

#[test]
fn test_varint_overflow_writes_nothing() {
    let mut out = Vec::new();
    assert!(write_varint(&mut out, 1 << 62).is_err());
    assert!(out.is_empty());
}

#[test]
fn test_varint_truncated() {
    assert!(matches!(decode_varint(&[0x03, 0x00, 0x00]), Err(CodecError::Truncated)));
    assert!(matches!(decode_varint(&[0x01]), Err(CodecError::Truncated)));
}

#[test]
fn test_unsigned_writers() {
    let mut out = Vec::new();
    write_u64(&mut out, 0xdeadbeefdeadbeef).unwrap();
    assert_eq!(out, [0x05, 0xef, 0xbe, 0xad, 0xde, 0xef, 0xbe, 0xad, 0xde]);

    out.clear();
    write_u32(&mut out, 0xabadbabe).unwrap();
    assert_eq!(out, [0x06, 0xbe, 0xba, 0xad, 0xab]);

    out.clear();
    write_u32(&mut out, 0xbabe).unwrap();
    assert_eq!(out, [0x06, 0xbe, 0xba, 0x00, 0x00]);

    out.clear();
    write_u16(&mut out, 0xdead).unwrap();
    assert_eq!(out, [0x07, 0xad, 0xde]);

    out.clear();
    write_u8(&mut out, 0xad).unwrap();
    assert_eq!(out, [0x08, 0xad]);
}

#[test]
fn test_unsigned_readers() {
    assert_eq!(read_u64(&mut &[0xef, 0xbe, 0xad, 0xde, 0xef, 0xbe, 0xad, 0xde][..]).unwrap(), 0xdeadbeefdeadbeef);
    assert_eq!(read_u32(&mut &[0xbe, 0xba, 0xad, 0xab][..]).unwrap(), 0xabadbabe);
    assert_eq!(read_u32(&mut &[0xbe, 0xba, 0x00, 0x00][..]).unwrap(), 0xbabe);
    assert_eq!(read_u16(&mut &[0xad, 0xde][..]).unwrap(), 0xdead);
    assert_eq!(read_u8(&mut &[0xad][..]).unwrap(), 0xad);
}

#[test]
fn test_signed_writers() {
    let mut out = Vec::new();
    write_i64(&mut out, 0x7eadbeefdeadbeef).unwrap();
    assert_eq!(out, [0x01, 0xef, 0xbe, 0xad, 0xde, 0xef, 0xbe, 0xad, 0x7e]);

    out.clear();
    write_i32(&mut out, 0x7badbabe).unwrap();
    assert_eq!(out, [0x02, 0xbe, 0xba, 0xad, 0x7b]);

    out.clear();
    write_i32(&mut out, -10000).unwrap();
    assert_eq!(out, [0x02, 0xf0, 0xd8, 0xff, 0xff]);

    out.clear();
    write_i16(&mut out, 0x7ead).unwrap();
    assert_eq!(out, [0x03, 0xad, 0x7e]);

    out.clear();
    write_i8(&mut out, 0x7d).unwrap();
    assert_eq!(out, [0x04, 0x7d]);
}

#[test]
fn test_signed_readers() {
    assert_eq!(read_i64(&mut &[0xef, 0xbe, 0xad, 0xde, 0xef, 0xbe, 0xad, 0x7e][..]).unwrap(), 0x7eadbeefdeadbeef);
    assert_eq!(read_i32(&mut &[0xbe, 0xba, 0xad, 0x7b][..]).unwrap(), 0x7badbabe);
    assert_eq!(read_i32(&mut &[0xf0, 0xd8, 0xff, 0xff][..]).unwrap(), -10000);
    assert_eq!(read_i16(&mut &[0xad, 0x7e][..]).unwrap(), 0x7ead);
    assert_eq!(read_i8(&mut &[0x7d][..]).unwrap(), 0x7d);
}

#[test]
fn test_bool() {
    let mut out = Vec::new();
    write_bool(&mut out, true).unwrap();
    assert_eq!(out, [0x0b, 0x01]);
    out.clear();
    write_bool(&mut out, false).unwrap();
    assert_eq!(out, [0x0b, 0x00]);

    assert!(read_bool(&mut &[0x01][..]).unwrap());
    assert!(!read_bool(&mut &[0x00][..]).unwrap());
    assert!(matches!(read_bool(&mut &[0x02][..]), Err(CodecError::Format(_))));
}

#[test]
fn test_double() {
    let mut out = Vec::new();
    write_f64(&mut out, 0.5772156649).unwrap();
    assert_eq!(out, [0x09, 0x2a, 0x80, 0x6f, 0xfc, 0x8c, 0x78, 0xe2, 0x3f]);
    assert_eq!(read_f64(&mut &out[1..]).unwrap(), 0.5772156649);
}

#[test]
fn test_binary_string() {
    let mut out = Vec::new();
    write_string(&mut out, b"say my name").unwrap();
    assert_eq!(out, [0x0a, 0x2c, 0x73, 0x61, 0x79, 0x20, 0x6d, 0x79, 0x20, 0x6e, 0x61, 0x6d, 0x65]);
    assert_eq!(read_string(&mut &out[1..]).unwrap(), b"say my name");
}

#[test]
fn test_fixed_width_truncated() {
    assert!(matches!(read_u64(&mut &[0x01, 0x02, 0x03][..]), Err(CodecError::Truncated)));
    assert!(matches!(read_i16(&mut &[0x01][..]), Err(CodecError::Truncated)));
    assert!(matches!(read_f64(&mut &[0u8; 0][..]), Err(CodecError::Truncated)));
}

#[test]
fn test_value_writer_matches_scalar_writers() {
    let codec = Codec::default();
    let mut via_value = Vec::new();
    codec.write_value(&mut via_value, &Value::U64(0xdeadbeefdeadbeef)).unwrap();
    let mut via_scalar = Vec::new();
    write_u64(&mut via_scalar, 0xdeadbeefdeadbeef).unwrap();
    assert_eq!(via_value, via_scalar);
}

#[test]
fn test_string_array_layout() {
    let codec = Codec::default();
    let value = Value::array(
        WireType::String,
        vec![Value::String(b"tx1".to_vec()), Value::String(b"tx2".to_vec())],
    );
    let mut out = Vec::new();
    codec.write_value(&mut out, &value).unwrap();
    // Shared tag, count, then untagged elements.
    assert_eq!(out, [0x8a, 0x08, 0x0c, b't', b'x', b'1', 0x0c, b't', b'x', b'2']);

    let mut r = &out[1..];
    let back = codec.read_value(&mut r, Tag::array(WireType::String)).unwrap();
    assert_eq!(back, value);
    assert!(r.is_empty());
}

#[test]
fn test_empty_array_payload() {
    let codec = Codec::default();
    let mut r: &[u8] = &[0x00];
    let back = codec.read_value(&mut r, Tag::array(WireType::U64)).unwrap();
    assert_eq!(back, Value::array(WireType::U64, vec![]));
}

#[test]
fn test_heterogeneous_array_rejected() {
    let codec = Codec::default();
    let value = Value::array(WireType::U64, vec![Value::U64(1), Value::U32(2)]);
    let err = codec.write_value(&mut Vec::new(), &value).unwrap_err();
    assert!(matches!(err, CodecError::Format(_)));

    let nested = Value::array(WireType::U64, vec![Value::array(WireType::U64, vec![])]);
    assert!(matches!(codec.write_value(&mut Vec::new(), &nested), Err(CodecError::Format(_))));
}
