#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;
use typesupport_codec::{Config, Encode, Endianness, FieldKind, Primitive, Shape};

#[derive(Arbitrary, Debug)]
struct FuzzInput<'a> {
    big_endian: bool,
    origin: u8,
    data: &'a [u8],
}

fn shapes() -> Vec<Arc<Shape>> {
    let sample = Shape::builder("fuzz", "Sample")
        .scalar("stamp", Primitive::U64)
        .scalar("valid", Primitive::Bool)
        .build()
        .unwrap();
    vec![
        Shape::builder("fuzz", "Empty").build().unwrap(),
        Shape::builder("fuzz", "Text").string("data").build().unwrap(),
        Shape::builder("fuzz", "Mixed")
            .scalar("flag", Primitive::Bool)
            .field("name", FieldKind::bounded_string(16))
            .field("ids", FieldKind::array(FieldKind::Scalar(Primitive::I32), 2))
            .field("tags", FieldKind::sequence(FieldKind::string()))
            .field(
                "samples",
                FieldKind::bounded_sequence(FieldKind::Nested(sample.clone()), 4),
            )
            .scalar("total", Primitive::F64)
            .build()
            .unwrap(),
        Shape::builder("fuzz", "Grid")
            .field(
                "rows",
                FieldKind::sequence(FieldKind::sequence(FieldKind::Nested(sample))),
            )
            .build()
            .unwrap(),
    ]
}

fn fuzz(input: FuzzInput) {
    let endianness = if input.big_endian {
        Endianness::Big
    } else {
        Endianness::Little
    };
    let cfg = Config::new(endianness).with_origin(input.origin as usize);
    for shape in shapes() {
        let Ok(record) = shape.decode(input.data, &cfg) else {
            continue;
        };

        // Padding and missing terminators are normalized, so compare re-encodings.
        let encoded = record.encode_cfg(&cfg).expect("decoded record must encode");
        assert_eq!(encoded.len(), record.exact_size(cfg.origin));
        let decoded = shape
            .decode(encoded.clone(), &cfg)
            .expect("encoded record must decode");
        let reencoded = decoded.encode_cfg(&cfg).expect("decoded record must encode");
        assert_eq!(encoded, reencoded);
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
