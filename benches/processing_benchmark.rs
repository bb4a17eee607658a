use brc_aggregator::generator::STATIONS;
use brc_aggregator::models::Chunk;
use brc_aggregator::processors::{ChunkAggregator, MergeReducer};
use brc_aggregator::readers::TemperatureDecoder;
use brc_aggregator::{EngineConfig, ParallelProcessor};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// Deterministic measurement text without pulling in an RNG
fn create_test_measurements(rows: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(rows * 16);
    for row in 0..rows {
        let (name, mean) = STATIONS[(row * 7919) % STATIONS.len()];
        let offset = ((row * 31) % 400) as f64 / 10.0 - 20.0;
        data.extend_from_slice(format!("{};{:.1}\n", name, mean + offset).as_bytes());
    }
    data
}

fn benchmark_decoder(c: &mut Criterion) {
    let decoder = TemperatureDecoder::default();
    let samples: Vec<String> = (-999..=999).map(|t| format!("{:.1}", t as f64 / 10.0)).collect();

    c.bench_function("temperature_decoder", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for sample in &samples {
                total += decoder.decode(black_box(sample.as_bytes())).unwrap_or(0.0);
            }
            black_box(total)
        })
    });
}

fn benchmark_chunk_aggregator(c: &mut Criterion) {
    let aggregator = ChunkAggregator::default();
    let mut group = c.benchmark_group("chunk_aggregator");

    for rows in [10_000, 100_000] {
        let data = create_test_measurements(rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        let chunk = Chunk::new(0, data).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(rows), &chunk, |b, chunk| {
            b.iter(|| black_box(aggregator.aggregate(chunk).unwrap().len()))
        });
    }

    group.finish();
}

fn benchmark_merge_reducer(c: &mut Criterion) {
    let aggregator = ChunkAggregator::default();
    let partials: Vec<_> = (0..32)
        .map(|_| {
            let chunk = Chunk::new(0, create_test_measurements(2_000)).unwrap();
            aggregator.aggregate(&chunk).unwrap()
        })
        .collect();

    c.bench_function("merge_reducer", |b| {
        b.iter(|| {
            let mut reducer = MergeReducer::new();
            for partial in partials.iter().cloned() {
                reducer.merge(partial);
            }
            black_box(reducer.finish().len())
        })
    });
}

fn benchmark_pipeline(c: &mut Criterion) {
    let data = create_test_measurements(500_000);
    let mut group = c.benchmark_group("parallel_processor");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(20);

    for workers in [1, 4] {
        let processor = ParallelProcessor::new(EngineConfig {
            block_size: 256 * 1024,
            workers,
            ..EngineConfig::default()
        });

        group.bench_with_input(BenchmarkId::new("workers", workers), &data, |b, data| {
            b.iter(|| {
                let (measurements, _) = processor.process_reader(data.as_slice()).unwrap();
                black_box(measurements.len())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_decoder,
    benchmark_chunk_aggregator,
    benchmark_merge_reducer,
    benchmark_pipeline
);
criterion_main!(benches);
