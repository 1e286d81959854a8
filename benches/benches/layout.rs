// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_layout::LayoutEngine;
use canopy_tree::{NodeContent, NodeId, NodeTree, Side};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;

/// A map with `fanout` children per node down to `depth`, split across both root sides.
fn gen_balanced_tree(fanout: usize, depth: usize) -> (NodeTree, Vec<NodeId>) {
    let mut tree = NodeTree::new(NodeContent::new("Central topic"));
    let mut ids = vec![tree.root()];
    let mut frontier = vec![tree.root()];
    for level in 0..depth {
        let mut next = Vec::with_capacity(frontier.len() * fanout);
        for &parent in &frontier {
            for i in 0..fanout {
                let side = if level == 0 && i % 2 == 1 {
                    Side::Left
                } else {
                    Side::Right
                };
                let text = format!("Node {level}.{i} with a few words of text");
                let (id, _) = tree
                    .push_child(parent, side, NodeContent::new(text))
                    .unwrap();
                next.push(id);
                ids.push(id);
            }
        }
        frontier = next;
    }
    (tree, ids)
}

fn bench_full_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_layout");
    for &(fanout, depth) in &[(4usize, 3usize), (6, 4), (10, 4)] {
        let (tree, ids) = gen_balanced_tree(fanout, depth);
        group.throughput(Throughput::Elements(ids.len() as u64));
        group.bench_function(format!("fanout{fanout}_depth{depth}"), |b| {
            b.iter_batched(
                LayoutEngine::default,
                |mut layout| {
                    let damage = layout.ensure_current(&tree);
                    black_box(damage);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_incremental_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_layout");
    let (mut tree, ids) = gen_balanced_tree(10, 4);
    let mut layout = LayoutEngine::default();
    layout.ensure_current(&tree);
    let leaf = *ids.last().unwrap();
    let mut flip = false;
    group.bench_function("set_text_leaf", |b| {
        b.iter(|| {
            flip = !flip;
            let text = if flip { "short" } else { "a somewhat longer label" };
            let invalidation = tree.set_text(leaf, text).unwrap();
            layout.invalidate(&invalidation);
            black_box(layout.ensure_current(&tree));
        });
    });
    group.bench_function("toggle_fold_first_child", |b| {
        b.iter(|| {
            tree.toggle_fold(ids[1]).unwrap();
            black_box(layout.ensure_current(&tree));
        });
    });
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let (tree, ids) = gen_balanced_tree(10, 4);
    let mut layout = LayoutEngine::default();
    layout.ensure_current(&tree);
    let points: Vec<Point> = ids
        .iter()
        .step_by(37)
        .filter_map(|&id| layout.cell(id))
        .map(|cell| cell.frame().center())
        .collect();
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("cell_at", |b| {
        b.iter(|| {
            let hits = points
                .iter()
                .filter(|&&p| layout.cell_at(p).is_some())
                .count();
            black_box(hits);
        });
    });
    group.bench_function("region_of", |b| {
        b.iter(|| {
            for &p in &points {
                if let Some(hit) = layout.cell_at(p) {
                    black_box(layout.region_of(hit.node, p));
                }
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_full_layout, bench_incremental_edit, bench_queries);
criterion_main!(benches);
