use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use geo::polygon;
use tilestats::{
    Buffer, Configuration, GeometryRoi, MemoryTileSource, RoiTest, StatKind, StatisticsEngine,
};

const SIZE: (usize, usize) = (2048, 2048);
const TILE: (usize, usize) = (256, 256);

fn source() -> MemoryTileSource {
    let (width, height) = SIZE;
    let data = (0..width * height)
        .map(|idx| ((idx % width) ^ (idx / width)) as u16)
        .collect();
    let buffer = Buffer::from_vec([1, height, width], data).unwrap();
    MemoryTileSource::new((0, 0), buffer, TILE)
}

fn config() -> Configuration {
    Configuration::new(
        [0],
        &[StatKind::Histogram, StatKind::Mode, StatKind::Median],
        &[0., 0., 0.],
        &[4096., 4096., 4096.],
        &[256, 256, 256],
    )
    .unwrap()
}

fn bench_statistics(c: &mut Criterion) {
    let engine = StatisticsEngine::new(source(), config(), None).unwrap();
    c.bench_function("statistics", |b| {
        b.iter(|| {
            engine.clear();
            engine.statistics().unwrap()
        })
    });
}

fn bench_statistics_decimated_roi(c: &mut Criterion) {
    let config = config()
        .with_period(4, 4)
        .unwrap()
        .with_roi_test(RoiTest::Geometric);
    // lower left triangle of the image
    let roi = GeometryRoi::new(polygon![
        (x: 0., y: 0.),
        (x: 0., y: 2048.),
        (x: 2048., y: 2048.),
    ]);
    let engine = StatisticsEngine::new(source(), config, Some(Arc::new(roi))).unwrap();
    c.bench_function("statistics_decimated_roi", |b| {
        b.iter(|| {
            engine.clear();
            engine.statistics().unwrap()
        })
    });
}

criterion_group!(benches, bench_statistics, bench_statistics_decimated_roi);
criterion_main!(benches);
