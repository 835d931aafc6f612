//! Benchmarks for the geometry hot paths.
//!
//! Run with: `cargo bench -p casement`
//!
//! Results are saved to `target/criterion/` with HTML reports.
//!
//! ## Benchmark Groups
//!
//! - `constraints`: size hint resolution with and without increments
//! - `move_resize`: pointer steps of an interactive session
//! - `quick_tile`: tile geometry and electric border hit testing
//! - `transients`: graph traversals on chains of transients

use std::hint::black_box;
use std::sync::Arc;

use casement_lib::config::CasementConfig;
use casement_lib::window::{
    ClientCapabilities, Environment, ForceGeometry, ManualClock, MoveResizeRequest, Point,
    QuickTileMode, Rect, Screen, Screens, Size, SizeHints, SizeMode, Window, WindowId,
    WindowIdentity, WindowTable, adjusted_size,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

// ============================================================================
// Test Data
// ============================================================================

fn environment() -> Environment {
    let screens = Screens::new(
        vec![
            Screen::new(0, "left".to_string(), Rect::new(0, 0, 1920, 1080)),
            Screen::new(1, "right".to_string(), Rect::new(1920, 0, 2560, 1440)),
        ],
        4,
    );
    Environment::new(Arc::new(screens), ManualClock::new(), Arc::new(CasementConfig::default()))
}

fn window(env: &Environment, id: u32) -> Window {
    let caps = ClientCapabilities {
        hints: SizeHints { min: Size::new(100, 100), increments: Size::new(8, 16), ..Default::default() },
        ..Default::default()
    };
    Window::new(
        WindowId(id),
        WindowIdentity::new("org.example.Terminal", "shell"),
        Box::new(caps),
        Rect::new(400, 300, 800, 600),
        env,
    )
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_constraints(c: &mut Criterion) {
    let mut group = c.benchmark_group("constraints");
    let plain = SizeHints::default();
    let stepped = SizeHints {
        min: Size::new(80, 40),
        max: Some(Size::new(1600, 1200)),
        increments: Size::new(7, 13),
    };

    for (name, hints) in [("plain", plain), ("increments", stepped)] {
        for mode in [SizeMode::Any, SizeMode::FixedWidth, SizeMode::MaxBound] {
            group.bench_with_input(BenchmarkId::new(name, format!("{mode:?}")), &mode, |b, mode| {
                b.iter(|| adjusted_size(black_box(Size::new(1234, 987)), *mode, &hints));
            });
        }
    }

    group.finish();
}

fn bench_move_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_resize");
    let env = environment();

    group.bench_function("move_step", |b| {
        let mut window = window(&env, 1);
        window.start_move_resize(MoveResizeRequest::at(Point::new(800, 320)));
        let mut x = 0;
        b.iter(|| {
            x = (x + 7) % 1000;
            window.handle_move_resize(black_box(Point::new(600 + x, 400)))
        });
    });

    group.bench_function("resize_step", |b| {
        let mut window = window(&env, 1);
        window.start_move_resize(MoveResizeRequest::at(Point::new(1199, 899)));
        let mut d = 0;
        b.iter(|| {
            d = (d + 5) % 400;
            window.handle_move_resize(black_box(Point::new(1000 + d, 700 + d)))
        });
    });

    group.bench_function("blocked_requests", |b| {
        let mut window = window(&env, 1);
        b.iter(|| {
            let mut blocker = window.geometry_updates_blocker();
            for step in 0..16 {
                blocker.request_geometry(Rect::new(step, step, 800, 600), ForceGeometry::Normal);
            }
        });
    });

    group.finish();
}

fn bench_quick_tile(c: &mut Criterion) {
    let mut group = c.benchmark_group("quick_tile");
    let env = environment();
    let window = window(&env, 1);

    group.bench_function("tile_geometry", |b| {
        b.iter(|| window.quick_tile_geometry(black_box(QuickTileMode::RIGHT | QuickTileMode::TOP)));
    });

    group.bench_function("electric_hit_test", |b| {
        b.iter(|| window.electric_border_mode_at(black_box(Point::new(4479, 20))));
    });

    group.finish();
}

fn bench_transients(c: &mut Criterion) {
    let mut group = c.benchmark_group("transients");
    let env = environment();

    for depth in [4u32, 32, 128] {
        let mut table = WindowTable::new();
        for id in 1..=depth {
            table.insert(window(&env, id));
        }
        for id in 2..=depth {
            table.set_transient_for(WindowId(id), Some(WindowId(id - 1)));
        }

        group.bench_with_input(BenchmarkId::new("has_transient", depth), &depth, |b, depth| {
            b.iter(|| table.has_transient(WindowId(1), black_box(WindowId(*depth)), true));
        });
        group.bench_with_input(BenchmarkId::new("all_transients", depth), &depth, |b, _| {
            b.iter(|| table.all_transients(black_box(WindowId(1))));
        });
    }

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_constraints, bench_move_resize, bench_quick_tile, bench_transients);

criterion_main!(benches);
