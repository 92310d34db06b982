#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;
use typesupport_codec::{
    Config, Encode, Endianness, Error, FieldKind, Primitive, RawString, Record, Shape, Value,
};

#[derive(Arbitrary, Debug)]
struct Sample {
    stamp: u64,
    value: f32,
    level: i16,
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    big_endian: bool,
    origin: u8,
    code: u8,
    message: Vec<u8>,
    samples: Vec<Sample>,
    grid: [u16; 3],
}

fn sample_shape() -> Arc<Shape> {
    Shape::builder("fuzz", "Sample")
        .scalar("stamp", Primitive::U64)
        .scalar("value", Primitive::F32)
        .scalar("level", Primitive::I16)
        .build()
        .unwrap()
}

fn status_shape(sample: Arc<Shape>) -> Arc<Shape> {
    Shape::builder("fuzz", "Status")
        .scalar("code", Primitive::U8)
        .string("message")
        .field("samples", FieldKind::sequence(FieldKind::Nested(sample)))
        .field("grid", FieldKind::array(FieldKind::Scalar(Primitive::U16), 3))
        .build()
        .unwrap()
}

fn fuzz(input: FuzzInput) {
    let endianness = if input.big_endian {
        Endianness::Big
    } else {
        Endianness::Little
    };
    let cfg = Config::new(endianness).with_origin(input.origin as usize);
    let sample = sample_shape();
    let shape = status_shape(sample.clone());

    let mut message = RawString::new();
    let has_nul = input.message.contains(&0);
    match message.assign(&input.message) {
        Ok(()) => assert!(!has_nul),
        Err(Error::AssignFailure { .. }) => {
            assert!(has_nul);
            return;
        }
        Err(err) => panic!("unexpected assign error: {err}"),
    }

    let samples = input
        .samples
        .iter()
        .map(|s| {
            let record = Record::new(sample.clone())
                .with("stamp", s.stamp)
                .unwrap()
                .with("value", s.value)
                .unwrap()
                .with("level", s.level)
                .unwrap();
            Value::Record(record)
        })
        .collect();
    let grid = input.grid.iter().map(|v| Value::U16(*v)).collect();
    let record = Record::new(shape.clone())
        .with("code", input.code)
        .unwrap()
        .with("message", message)
        .unwrap()
        .with("samples", Value::Sequence(samples))
        .unwrap()
        .with("grid", Value::Array(grid))
        .unwrap();

    let encoded = record.encode_cfg(&cfg).expect("failed to encode record");
    assert_eq!(encoded.len(), record.exact_size(cfg.origin));
    let encoded: Bytes = encoded.freeze();
    let decoded = shape
        .decode(encoded.clone(), &cfg)
        .expect("failed to decode record");

    // NaN never compares equal; compare the re-encoded bytes instead.
    let reencoded = decoded.encode_cfg(&cfg).expect("failed to re-encode record");
    assert_eq!(encoded, reencoded.freeze());

    // Every strict prefix is truncated.
    for len in 0..encoded.len() {
        assert!(matches!(
            shape.decode(encoded.slice(..len), &cfg),
            Err(Error::TruncatedBuffer { .. })
        ));
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
