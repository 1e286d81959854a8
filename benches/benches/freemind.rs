// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_freemind::{Document, read_document, write_document};
use canopy_tree::{NodeContent, NodeTree, Side};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

fn gen_document(fanout: usize, depth: usize) -> String {
    let mut tree = NodeTree::new(NodeContent::new("Central topic"));
    let mut frontier = vec![tree.root()];
    for level in 0..depth {
        let mut next = Vec::new();
        for &parent in &frontier {
            for i in 0..fanout {
                let side = if level == 0 && i % 2 == 1 {
                    Side::Left
                } else {
                    Side::Right
                };
                let mut content = NodeContent::new(format!("Node {level}.{i} & friends"));
                content.icons = vec!["idea".to_owned()];
                content
                    .attributes
                    .push(("ID".to_owned(), format!("ID_{level}_{i}")));
                let (id, _) = tree.push_child(parent, side, content).unwrap();
                next.push(id);
            }
        }
        frontier = next;
    }
    write_document(&Document::new(tree))
}

fn bench_read_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("freemind");
    for &(fanout, depth) in &[(6usize, 3usize), (10, 4)] {
        let source = gen_document(fanout, depth);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(format!("read_fanout{fanout}_depth{depth}"), |b| {
            b.iter(|| black_box(read_document(&source).unwrap()));
        });
        let document = read_document(&source).unwrap();
        group.bench_function(format!("write_fanout{fanout}_depth{depth}"), |b| {
            b.iter(|| black_box(write_document(&document)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_read_write);
criterion_main!(benches);
