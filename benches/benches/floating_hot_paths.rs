// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_floating::context::Side;
use understory_floating::get_children;
use understory_floating::intent::{CloseIntent, PointerSample, TrackContext, TrackStart};
use understory_floating::safe_polygon::SafePolygon;
use understory_floating::tree::{NodeId, TreeNode};

fn bottom_cx() -> TrackContext {
    TrackContext {
        placement: Side::Bottom,
        reference_rect: Some(Rect::new(100.0, 100.0, 140.0, 120.0)),
        floating_rect: Some(Rect::new(80.0, 140.0, 200.0, 200.0)),
        open_descendant: false,
    }
}

/// A diagonal path from the reference's right edge toward the floating element.
fn diagonal_path(steps: usize) -> Vec<PointerSample> {
    (0..steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            PointerSample {
                position: Point::new(140.0 + 40.0 * t, 115.0 + 24.0 * t),
                pointer_type: None,
                over_floating: false,
                over_reference: false,
                related_in_floating: false,
                is_leave: false,
            }
        })
        .collect()
}

/// `width` roots, each with a chain of `depth` descendants.
fn forest(width: u64, depth: u64) -> Vec<TreeNode<u32>> {
    let mut nodes = Vec::new();
    for root in 0..width {
        let base = root * (depth + 1);
        nodes.push(TreeNode::new(NodeId(base), None));
        for d in 1..=depth {
            nodes.push(TreeNode::new(NodeId(base + d), Some(NodeId(base + d - 1))));
        }
    }
    nodes
}

fn bench_safe_polygon(c: &mut Criterion) {
    let mut group = c.benchmark_group("safe_polygon");
    let cx = bottom_cx();
    for &steps in &[16usize, 64, 256] {
        let path = diagonal_path(steps);
        group.throughput(Throughput::Elements(steps as u64));
        group.bench_function(format!("track_diagonal_{}", steps), |b| {
            b.iter_batched(
                || {
                    SafePolygon::default().track(TrackStart {
                        origin: Point::new(140.0, 115.0),
                        leave: false,
                    })
                },
                |mut tracker| {
                    for sample in &path {
                        black_box(tracker.pointer_move(&cx, sample));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_get_children(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_children");
    for &(width, depth) in &[(4u64, 4u64), (16, 8), (64, 4)] {
        let nodes = forest(width, depth);
        group.throughput(Throughput::Elements(nodes.len() as u64));
        group.bench_function(format!("forest_{}x{}", width, depth), |b| {
            b.iter(|| black_box(get_children(&nodes, NodeId(0)).len()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_safe_polygon, bench_get_children);
criterion_main!(benches);
