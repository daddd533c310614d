use std::sync::Arc;

use msgpack_codec::{
    Extension, Packer, PackingError, TransformError, TransformerCollection, TypeTransformer, Value,
};

fn pack(value: &Value) -> Vec<u8> {
    Packer::new()
        .pack(value)
        .unwrap_or_else(|e| panic!("pack failed for {value:?}: {e}"))
}

fn ints(n: usize) -> Vec<Value> {
    (0..n).map(|i| Value::from(i % 100)).collect()
}

#[test]
fn packer_wire_matrix() {
    let cases: Vec<(&str, Value, Vec<u8>)> = vec![
        ("nil", Value::Nil, vec![0xc0]),
        ("false", Value::Bool(false), vec![0xc2]),
        ("true", Value::Bool(true), vec![0xc3]),
        ("7-bit uint #1", Value::from(0), vec![0x00]),
        ("7-bit uint #2", Value::from(0x10), vec![0x10]),
        ("7-bit uint #3", Value::from(0x7f), vec![0x7f]),
        ("5-bit sint #1", Value::from(-1), vec![0xff]),
        ("5-bit sint #2", Value::from(-16), vec![0xf0]),
        ("5-bit sint #3", Value::from(-32), vec![0xe0]),
        ("8-bit uint #1", Value::from(128), vec![0xcc, 0x80]),
        ("8-bit uint #2", Value::from(0xf0), vec![0xcc, 0xf0]),
        ("8-bit uint #3", Value::from(0xff), vec![0xcc, 0xff]),
        ("16-bit uint #1", Value::from(0x100), vec![0xcd, 0x01, 0x00]),
        ("16-bit uint #2", Value::from(0x2000), vec![0xcd, 0x20, 0x00]),
        ("16-bit uint #3", Value::from(0xffff), vec![0xcd, 0xff, 0xff]),
        (
            "32-bit uint #1",
            Value::from(0x10000),
            vec![0xce, 0x00, 0x01, 0x00, 0x00],
        ),
        (
            "32-bit uint #2",
            Value::from(0x200000),
            vec![0xce, 0x00, 0x20, 0x00, 0x00],
        ),
        (
            "32-bit uint #3",
            Value::from(0xffffffffu32),
            vec![0xce, 0xff, 0xff, 0xff, 0xff],
        ),
        (
            "64-bit uint #1",
            Value::from(0x100000000u64),
            vec![0xcf, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00],
        ),
        (
            "64-bit uint #2",
            Value::from(0x7fffffffffffffffu64),
            vec![0xcf, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
        ),
        ("8-bit int #1", Value::from(-33), vec![0xd0, 0xdf]),
        ("8-bit int #2", Value::from(-100), vec![0xd0, 0x9c]),
        ("8-bit int #3", Value::from(-128), vec![0xd0, 0x80]),
        ("16-bit int #1", Value::from(-129), vec![0xd1, 0xff, 0x7f]),
        ("16-bit int #2", Value::from(-2000), vec![0xd1, 0xf8, 0x30]),
        ("16-bit int #3", Value::from(-32768), vec![0xd1, 0x80, 0x00]),
        (
            "32-bit int #1",
            Value::from(-32769),
            vec![0xd2, 0xff, 0xff, 0x7f, 0xff],
        ),
        (
            "32-bit int #2",
            Value::from(-1000000000),
            vec![0xd2, 0xc4, 0x65, 0x36, 0x00],
        ),
        (
            "32-bit int #3",
            Value::from(-2147483648i64),
            vec![0xd2, 0x80, 0x00, 0x00, 0x00],
        ),
        (
            "64-bit int #1",
            Value::from(-2147483649i64),
            vec![0xd3, 0xff, 0xff, 0xff, 0xff, 0x7f, 0xff, 0xff, 0xff],
        ),
        (
            "64-bit int #2",
            Value::from(-1000000000000000002i64),
            vec![0xd3, 0xf2, 0x1f, 0x49, 0x4c, 0x58, 0x9b, 0xff, 0xfe],
        ),
        (
            "64-bit float #1",
            Value::Float64(0.0),
            vec![0xcb, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        ),
        (
            "64-bit float #2",
            Value::Float64(2.5),
            vec![0xcb, 0x40, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        ),
        (
            "64-bit float #3",
            Value::Float64(1e100),
            vec![0xcb, 0x54, 0xb2, 0x49, 0xad, 0x25, 0x94, 0xc3, 0x7d],
        ),
        (
            "32-bit float",
            Value::Float32(-0.5),
            vec![0xca, 0xbf, 0x00, 0x00, 0x00],
        ),
        ("empty string", Value::from(""), vec![0xa0]),
        ("1-char string", Value::from("a"), vec![0xa1, b'a']),
        (
            "utf-8 string",
            Value::from("Кириллица"),
            [&[0xb2u8][..], "Кириллица".as_bytes()].concat(),
        ),
        ("empty array", Value::Array(vec![]), vec![0x90]),
        (
            "nested array",
            Value::from(vec![Value::from(vec![Value::Nil])]),
            vec![0x91, 0x91, 0xc0],
        ),
        ("empty map", Value::Map(vec![]), vec![0x80]),
        (
            "int-keyed map",
            Value::Map(vec![(Value::from(1), Value::from(2))]),
            vec![0x81, 0x01, 0x02],
        ),
        (
            "duplicate keys kept",
            Value::Map(vec![
                (Value::from("a"), Value::from(1)),
                (Value::from("a"), Value::from(2)),
            ]),
            vec![0x82, 0xa1, b'a', 0x01, 0xa1, b'a', 0x02],
        ),
        ("empty bin", Value::Bin(vec![]), vec![0xc4, 0x00]),
        (
            "fixext 1",
            Value::Ext(Extension::new(5, vec![0x80])),
            vec![0xd4, 0x05, 0x80],
        ),
    ];

    for (title, value, expected) in cases {
        assert_eq!(pack(&value), expected, "{title}");
    }
}

#[test]
fn length_headers_are_minimal() {
    let s31 = "x".repeat(31);
    let s32 = "x".repeat(32);
    let s255 = "x".repeat(255);
    let s256 = "x".repeat(256);
    let s65536 = "x".repeat(65536);
    assert_eq!(pack(&Value::from(s31.as_str()))[0], 0xbf);
    assert_eq!(&pack(&Value::from(s32.as_str()))[..2], &[0xd9, 32]);
    assert_eq!(&pack(&Value::from(s255.as_str()))[..2], &[0xd9, 0xff]);
    assert_eq!(&pack(&Value::from(s256.as_str()))[..3], &[0xda, 0x01, 0x00]);
    assert_eq!(
        &pack(&Value::from(s65536.as_str()))[..5],
        &[0xdb, 0x00, 0x01, 0x00, 0x00]
    );

    assert_eq!(&pack(&Value::Bin(vec![0; 255]))[..2], &[0xc4, 0xff]);
    assert_eq!(&pack(&Value::Bin(vec![0; 256]))[..3], &[0xc5, 0x01, 0x00]);
    assert_eq!(
        &pack(&Value::Bin(vec![0; 65536]))[..5],
        &[0xc6, 0x00, 0x01, 0x00, 0x00]
    );

    let arr15 = pack(&Value::Array(ints(15)));
    assert_eq!(arr15[0], 0x9f);
    assert_eq!(arr15.len(), 16);
    let arr16 = pack(&Value::Array(ints(16)));
    assert_eq!(&arr16[..3], &[0xdc, 0x00, 0x10]);
    assert_eq!(arr16.len(), 19);
    assert_eq!(
        &pack(&Value::Array(ints(65536)))[..5],
        &[0xdd, 0x00, 0x01, 0x00, 0x00]
    );

    let map = |n: usize| Value::Map((0..n).map(|i| (Value::from(i), Value::Nil)).collect());
    assert_eq!(pack(&map(15))[0], 0x8f);
    assert_eq!(&pack(&map(16))[..3], &[0xde, 0x00, 0x10]);
    assert_eq!(&pack(&map(65536))[..5], &[0xdf, 0x00, 0x01, 0x00, 0x00]);

    let ext = |n: usize| pack(&Value::Ext(Extension::new(1, vec![0; n])));
    assert_eq!(&ext(17)[..3], &[0xc7, 17, 0x01]);
    assert_eq!(&ext(65535)[..4], &[0xc8, 0xff, 0xff, 0x01]);
    assert_eq!(&ext(65536)[..6], &[0xc9, 0x00, 0x01, 0x00, 0x00, 0x01]);
}

#[test]
fn unsupported_custom_value_fails_whole_call() {
    #[derive(Debug, PartialEq)]
    struct Opaque;

    let packer = Packer::new();
    let err = packer.pack(&Value::custom(Opaque)).unwrap_err();
    assert_eq!(err, PackingError::UnsupportedType("custom"));
    assert_eq!(err.to_string(), "Unsupported type.");

    let nested = Value::Map(vec![(
        Value::from("k"),
        Value::from(vec![Value::from(1), Value::custom(Opaque)]),
    )]);
    assert!(packer.pack(&nested).is_err());
}

struct Noop;

impl TypeTransformer for Noop {
    fn tag(&self) -> i8 {
        0
    }

    fn pack(&self, _value: &Value) -> Option<Vec<u8>> {
        None
    }

    fn unpack(&self, _payload: &[u8]) -> Result<Value, TransformError> {
        Err(TransformError::new("noop"))
    }
}

#[test]
fn set_get_transformers() {
    let mut packer = Packer::new();
    assert!(packer.transformers().is_none());

    let coll = Arc::new(TransformerCollection::new().with(Noop));
    packer.set_transformers(coll.clone());
    let got = packer.transformers().expect("transformers set");
    assert!(Arc::ptr_eq(got, &coll));

    // A transformer that claims nothing leaves core encoding alone.
    assert_eq!(packer.pack(&Value::from(1)).unwrap(), [0x01]);
}
