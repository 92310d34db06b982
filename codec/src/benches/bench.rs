use criterion::criterion_main;
use std::sync::Arc;
use typesupport_codec::{FieldKind, Primitive, Record, Shape, Value};

mod encode;

criterion_main!(encode::benches, classify::benches);

/// A telemetry-like shape mixing scalars, strings and a nested sequence.
fn telemetry() -> Arc<Shape> {
    let sample = Shape::builder("bench", "Sample")
        .scalar("stamp", Primitive::U64)
        .scalar("value", Primitive::F32)
        .scalar("valid", Primitive::Bool)
        .build()
        .unwrap();
    Shape::builder("bench", "Telemetry")
        .scalar("id", Primitive::U16)
        .string("source")
        .field("samples", FieldKind::sequence(FieldKind::Nested(sample)))
        .build()
        .unwrap()
}

/// Returns a telemetry record holding `samples` entries.
fn telemetry_record(shape: &Arc<Shape>, samples: usize) -> Record {
    let FieldKind::Sequence { element, .. } = shape.fields()[2].kind() else {
        unreachable!("samples is a sequence");
    };
    let FieldKind::Nested(sample) = element.as_ref() else {
        unreachable!("samples hold records");
    };
    let entries: Vec<Value> = (0..samples)
        .map(|i| {
            let entry = Record::new(sample.clone())
                .with("stamp", i as u64)
                .unwrap()
                .with("value", i as f32 * 0.5)
                .unwrap()
                .with("valid", i % 2 == 0)
                .unwrap();
            Value::Record(entry)
        })
        .collect();
    Record::new(shape.clone())
        .with("id", 7u16)
        .unwrap()
        .with("source", "imu/front")
        .unwrap()
        .with("samples", Value::Sequence(entries))
        .unwrap()
}
