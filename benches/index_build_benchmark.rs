//! Index build and lookup benchmarks.
//!
//! # Benchmarks
//!
//! - `scan_layouts`: Indexes a run of synthetic series files into a fresh session
//! - `scan_large_batch`: Same, for a run of several thousand files
//! - `lookup_detector_field`: Looks up per-detector locations in a built index
//! - `resolve_last_used`: Resolves calls that lean on last-used state
//!
//! # Running
//!
//! ```bash
//! cargo bench --bench index_build_benchmark
//! ```

use std::hint::black_box;
use std::path::PathBuf;
use std::time::Instant;

use criterion::{Criterion, criterion_group, criterion_main};
use fieldindex_core::{
    CollectionLayout, ContainerLayout, DetectorId, FieldKind, IndexConfig, RecordLayout, Session,
};

const FIELDS_PER_RECORD: usize = 40;

/// Build one series file layout: a canonical event record plus one record per detector.
fn series_layout(rng: &mut fastrand::Rng, detectors: u32) -> ContainerLayout {
    let event = CollectionLayout::new("calibevent").with_record(RecordLayout::new(
        "calibevent",
        ["EventNumber", "SeriesNumber", "EventTime", "TriggerMask"],
    ));
    let mut rq = CollectionLayout::new("rqDir");
    for zip in 1..=detectors {
        let fields: Vec<String> = (0..FIELDS_PER_RECORD)
            .map(|i| format!("PT{}{i}", ["OF", "NF", "WK"][rng.usize(..3)]))
            .collect();
        rq = rq.with_record(RecordLayout::new(format!("zip{zip}"), fields));
    }
    ContainerLayout::new().with_collection(event).with_collection(rq)
}

fn synthetic_run(files: usize) -> Vec<(PathBuf, ContainerLayout)> {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let layout = series_layout(&mut rng, 15);
    (0..files)
        .map(|i| (PathBuf::from(format!("series_{i:05}.json")), layout.clone()))
        .collect()
}

fn built_session(files: usize) -> Session {
    let mut session = Session::new(IndexConfig::default()).unwrap();
    for (path, layout) in synthetic_run(files) {
        session.scan_layout(&path, FieldKind::Data, &layout).unwrap();
    }
    session
}

fn bench_scan(c: &mut Criterion) {
    let run = synthetic_run(200);

    c.bench_function("scan_layouts", |b| {
        b.iter_custom(|iters| {
            let mut total = std::time::Duration::ZERO;
            for _ in 0..iters {
                let mut session = Session::new(IndexConfig::default()).unwrap();
                let start = Instant::now();
                for (path, layout) in &run {
                    session.scan_layout(path, FieldKind::Data, layout).unwrap();
                }
                total += start.elapsed();
                black_box(session.index().len(FieldKind::Data));
            }
            total
        });
    });
}

fn bench_scan_large_batch(c: &mut Criterion) {
    let run = synthetic_run(4000);
    let mut group = c.benchmark_group("scan_large_batch");
    group.sample_size(10);
    group.bench_function("4000_files", |b| {
        b.iter_custom(|iters| {
            let mut total = std::time::Duration::ZERO;
            for _ in 0..iters {
                let mut session = Session::new(IndexConfig::default()).unwrap();
                let start = Instant::now();
                for (path, layout) in &run {
                    session.scan_layout(path, FieldKind::Data, layout).unwrap();
                }
                total += start.elapsed();
                black_box(session.index().scanned_files(FieldKind::Data).len());
            }
            total
        });
    });
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let session = built_session(200);
    let names: Vec<String> = session
        .index()
        .names_of(FieldKind::Data)
        .map(str::to_string)
        .collect();
    let mut rng = fastrand::Rng::with_seed(7);

    c.bench_function("lookup_detector_field", |b| {
        b.iter(|| {
            let name = &names[rng.usize(..names.len())];
            let detector = DetectorId::new(rng.u32(1101..=1115));
            black_box(session.index().lookup(FieldKind::Data, name, detector).ok());
        });
    });
}

fn bench_resolve(c: &mut Criterion) {
    let mut session = built_session(10);
    session.state_mut().set_last_detector(1104).unwrap();
    session.state_mut().set_last_filter("cGoodEv");

    c.bench_function("resolve_last_used", |b| {
        b.iter(|| {
            black_box(session.resolve("EventTime", Vec::new()).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_scan,
    bench_scan_large_batch,
    bench_lookup,
    bench_resolve
);
criterion_main!(benches);
