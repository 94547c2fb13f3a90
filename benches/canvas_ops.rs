//! Benchmarks for canvas engine hot paths
//!
//! Run with: cargo bench

use brainstorm_board::board::{Board, Point, Viewport};
use brainstorm_board::canvas::{
    to_world, BoardController, GraphStore, HitTarget, InputEvent, Modifiers, PointerButton,
    ViewportModel,
};
use brainstorm_board::config::CanvasSettings;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn board_with(nodes: usize) -> Board {
    let mut board = Board::default();
    let mut previous = None;
    for i in 0..nodes {
        let position = Point::new((i % 50) as f64 * 250.0, (i / 50) as f64 * 120.0);
        let (next, id) = GraphStore::add_node(board, format!("idea {}", i), position, None);
        board = next;
        if let Some(prev) = previous {
            board = GraphStore::add_edge(board, prev, id);
        }
        previous = Some(id);
    }
    board
}

fn bench_viewport_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport");
    let model = ViewportModel::default();
    let vp = Viewport {
        pan: Point::new(-320.0, 140.0),
        zoom: 1.7,
    };

    group.bench_function("to_world", |b| {
        b.iter(|| black_box(to_world(black_box(&vp), black_box(Point::new(512.0, 384.0)))))
    });

    group.bench_function("wheel_zoom", |b| {
        b.iter(|| black_box(model.wheel_zoom(black_box(vp), Point::new(512.0, 384.0), -1.0)))
    });

    group.finish();
}

fn bench_drag_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_step");

    for size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("pointer_move", size), size, |b, &size| {
            let mut board = board_with(size);
            let node = board.nodes[size / 2].id;
            let mut ctl = BoardController::seeded(CanvasSettings::default(), 1);
            ctl.handle_event(
                &mut board,
                &InputEvent::PointerDown {
                    pos: Point::ZERO,
                    button: PointerButton::Primary,
                    modifiers: Modifiers::default(),
                    target: HitTarget::NodeBody(node),
                },
            );

            let mut i = 0u64;
            b.iter(|| {
                let pos = Point::new((i % 400) as f64, (i % 300) as f64);
                ctl.handle_event(&mut board, black_box(&InputEvent::PointerMove { pos }));
                i = i.wrapping_add(1);
            });
        });
    }

    group.finish();
}

fn bench_graph_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph");

    for size in [100, 1000].iter() {
        let board = board_with(*size);
        let victim = board.nodes[size / 2].id;

        group.bench_with_input(BenchmarkId::new("delete_node", size), &board, |b, board| {
            b.iter(|| black_box(GraphStore::delete_node(board.clone(), victim)))
        });

        let (first, last) = (board.nodes[0].id, board.nodes[size - 1].id);
        group.bench_with_input(BenchmarkId::new("add_edge", size), &board, |b, board| {
            b.iter(|| black_box(GraphStore::add_edge(board.clone(), first, last)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_viewport_transforms,
    bench_drag_step,
    bench_graph_mutations,
);

criterion_main!(benches);
