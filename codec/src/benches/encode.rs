use super::{telemetry, telemetry_record};
use criterion::{black_box, criterion_group, Criterion};
use typesupport_codec::{Config, Encode, EncodeSize, Endianness};

fn bench_encode(c: &mut Criterion) {
    let shape = telemetry();
    for samples in [1, 64, 1024] {
        let record = telemetry_record(&shape, samples);
        for endianness in [Endianness::Little, Endianness::Big] {
            let cfg = Config::new(endianness);
            c.bench_function(
                &format!("{}/samples={} endianness={:?}", module_path!(), samples, endianness),
                |b| b.iter(|| black_box(record.encode_cfg(&cfg).unwrap())),
            );
        }
        c.bench_function(
            &format!("{}/exact_size samples={}", module_path!(), samples),
            |b| b.iter(|| black_box(record.encode_size(black_box(0)))),
        );

        let encoded = record.encode().unwrap().freeze();
        c.bench_function(
            &format!("{}/decode samples={}", module_path!(), samples),
            |b| {
                b.iter(|| {
                    black_box(shape.decode(encoded.clone(), &Config::default()).unwrap())
                })
            },
        );
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_encode
}
