use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use recload_codec::{CompressionFormat, EncodeConfig, PayloadDecoder, PayloadEncoder};
use recload_worker::{DecodeRequest, DecodeTask};
use serde_json::{Value, json};

fn records(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                json!({
                    "latitude": 46.0 + (i % 1000) as f64 * 0.0001,
                    "longitude": 14.5 + (i % 777) as f64 * 0.0001,
                    "year": 2015 + i % 10,
                    "KlasifikacijaNesrece": "Z MATERIALNO ŠKODO",
                    "TipNesrece": "NALETNO VOŽNJA",
                    "VNaselju": "DA",
                })
            })
            .collect(),
    )
}

fn bench_decode_sizes(c: &mut Criterion) {
    let decoder = PayloadDecoder::default();
    let mut group = c.benchmark_group("decode_records");

    for n in [100usize, 10_000, 100_000] {
        let payload = PayloadEncoder::default().encode(&records(n)).unwrap();
        group.throughput(Throughput::Bytes(payload.json_size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &payload.bytes, |b, bytes| {
            b.iter(|| decoder.decode(bytes).unwrap());
        });
    }

    group.finish();
}

fn bench_decode_formats(c: &mut Criterion) {
    let value = records(10_000);
    let decoder = PayloadDecoder::default();
    let mut group = c.benchmark_group("decode_format");

    for format in [CompressionFormat::Gzip, CompressionFormat::Zlib] {
        let encoder = PayloadEncoder::new(EncodeConfig::default().with_format(format));
        let payload = encoder.encode(&value).unwrap();
        group.bench_function(format.to_string(), |b| {
            b.iter(|| decoder.decode(&payload.bytes).unwrap());
        });
    }

    group.finish();
}

fn bench_encode_levels(c: &mut Criterion) {
    let value = records(10_000);
    let mut group = c.benchmark_group("encode_level");

    for level in [1u32, 6, 9] {
        let encoder = PayloadEncoder::new(EncodeConfig::default().with_level(level));
        group.bench_with_input(BenchmarkId::from_parameter(level), &value, |b, value| {
            b.iter(|| encoder.encode(value).unwrap());
        });
    }

    group.finish();
}

fn bench_task_dispatch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let payload = PayloadEncoder::default().encode(&records(10_000)).unwrap().bytes;
    let task = DecodeTask::default();

    c.bench_function("task_run", |b| {
        b.iter(|| task.run(DecodeRequest::new(payload.clone())));
    });

    c.bench_function("task_dispatch", |b| {
        b.iter(|| runtime.block_on(task.dispatch(DecodeRequest::new(payload.clone()))));
    });
}

criterion_group!(
    benches,
    bench_decode_sizes,
    bench_decode_formats,
    bench_encode_levels,
    bench_task_dispatch
);
criterion_main!(benches);
