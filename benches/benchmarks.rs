//! Performance benchmarks for Ghostcursor.
//!
//! This module contains benchmarks for:
//! - Validating plugin roots of increasing size
//! - Module path resolution
//! - Polling-loop ticks through the change detectors
//!
//! Run with: `cargo bench`

use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ghostcursor::bridge::{
    BridgeEvent, ChangeDetector, GhostPoller, Poller, PointerPoller, SharedSampler, ShortcutPoller,
};
use ghostcursor::plugin::{validate_plugin_directory, ModuleResolver};
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

mod fixtures {
    use super::*;

    /// Create `count` plugins, alternating between the single-entry and
    /// legacy layouts, with every fifth one broken.
    pub fn plugin_root(count: usize) -> TempDir {
        let root = TempDir::new().unwrap();

        for i in 0..count {
            let dir = root.path().join(format!("ghost-{i:04}"));
            std::fs::create_dir_all(dir.join("dist")).unwrap();

            let manifest = format!(
                r#"{{"id":"ghost-{i}","name":"Ghost {i}","version":"1.0.0","icon":"icon.png"}}"#
            );
            std::fs::write(dir.join("manifest.json"), manifest).unwrap();
            std::fs::create_dir_all(dir.join("assets")).unwrap();
            std::fs::write(dir.join("assets/icon.png"), b"png").unwrap();

            if i % 5 == 4 {
                std::fs::write(dir.join("content.ts"), "// content").unwrap();
            } else if i % 2 == 0 {
                std::fs::write(dir.join("dist/index.js"), "// entry").unwrap();
            } else {
                std::fs::write(dir.join("dist/content.js"), "// content").unwrap();
                std::fs::write(dir.join("background.ts"), "// background").unwrap();
            }
        }

        root
    }
}

// ============================================================================
// Plugin Benchmarks
// ============================================================================

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    for count in [10, 50, 200] {
        let root = fixtures::plugin_root(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("directory", count), root.path(), |b, path| {
            b.iter(|| validate_plugin_directory(black_box(path)));
        });
    }

    group.finish();
}

fn bench_module_resolution(c: &mut Criterion) {
    let root = fixtures::plugin_root(2);
    let entry = root.path().join("ghost-0000");
    let legacy = root.path().join("ghost-0001");

    let mut group = c.benchmark_group("module_resolution");
    group.bench_function("index", |b| {
        b.iter(|| ModuleResolver.locate(black_box(&entry), "index"));
    });
    group.bench_function("legacy_fallthrough", |b| {
        b.iter(|| ModuleResolver.locate(black_box(&legacy), "background"));
    });
    group.bench_function("missing", |b| {
        b.iter(|| ModuleResolver.locate(black_box(Path::new("/nonexistent")), "content"));
    });
    group.finish();
}

// ============================================================================
// Bridge Benchmarks
// ============================================================================

fn bench_change_detector(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_detector");

    group.bench_function("steady_pointer", |b| {
        let mut detector = ChangeDetector::new();
        b.iter(|| detector.observe(black_box((512.0_f64, 384.0_f64))));
    });

    group.bench_function("ghost_id", |b| {
        let mut detector = ChangeDetector::new();
        let ids = ["cat".to_string(), "dog".to_string()];
        let mut i = 0;
        b.iter(|| {
            i += 1;
            detector.observe(black_box(ids[i % 2].clone()))
        });
    });

    group.finish();
}

fn bench_poll_tick(c: &mut Criterion) {
    let sampler = SharedSampler::new();
    sampler.select_ghost("cat");
    let mut pollers: Vec<Box<dyn Poller>> = vec![
        Box::new(PointerPoller::new(40.0)),
        Box::new(ShortcutPoller::new()),
        Box::new(GhostPoller::new()),
    ];

    c.bench_function("poll_tick_all_loops", |b| {
        let mut x = 0.0;
        b.iter(|| {
            x += 1.0;
            sampler.set_pointer(x, 300.0);
            let mut emitted = 0usize;
            let mut emit = |_event: BridgeEvent| emitted += 1;
            for poller in &mut pollers {
                poller.poll(&sampler, &mut emit);
            }
            black_box(emitted)
        });
    });
}

criterion_group!(plugin_benches, bench_validation, bench_module_resolution);
criterion_group!(bridge_benches, bench_change_detector, bench_poll_tick);
criterion_main!(plugin_benches, bridge_benches);
