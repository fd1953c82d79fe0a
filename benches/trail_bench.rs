//! 轨迹性能基准测试
//!
//! 测试样本摄入与画布光栅化的性能。
//! 运行: `cargo bench --bench trail_bench`

use std::time::{Duration, Instant};

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use mouse_path::export::surface;
use mouse_path::trail::TrailManager;
use mouse_path::types::{CursorSample, TrackedBounds};

/// 测试样本摄入的性能
fn bench_handle_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sample Ingestion");

    for sample_count in [100, 1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(sample_count),
            &sample_count,
            |b, &count| {
                b.iter(|| {
                    let mut trail = TrailManager::new(TrackedBounds::new(0, 0, 1920, 1080));
                    let t0 = Instant::now();
                    for i in 0..count {
                        trail.handle_sample(
                            black_box(CursorSample::new(i % 1920, (i * 7) % 1080)),
                            t0 + Duration::from_millis(i as u64 * 2),
                        );
                    }
                    black_box(trail.segments().len())
                });
            },
        );
    }

    group.finish();
}

/// 测试画布光栅化的性能
fn bench_rasterize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Surface Rasterization");
    group.sample_size(20);

    for segment_count in [100, 1_000, 5_000] {
        let mut trail = TrailManager::new(TrackedBounds::new(0, 0, 1920, 1080));
        let t0 = Instant::now();
        for i in 0..=segment_count {
            trail.handle_sample(
                CursorSample::new(i % 1920, (i * 13) % 1080),
                t0 + Duration::from_millis(i as u64 * 2),
            );
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(segment_count),
            &segment_count,
            |b, _| {
                b.iter(|| {
                    let pixmap =
                        surface::rasterize(trail.segments(), trail.markers(), 1920, 1080).unwrap();
                    black_box(pixmap.width())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_handle_sample, bench_rasterize);
criterion_main!(benches);
