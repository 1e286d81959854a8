// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a small map, lay it out, fold a branch and save it as FreeMind XML.
//!
//! This example shows how to combine:
//! - `canopy_tree` for structure and content,
//! - `canopy_layout` for geometry and repaint damage,
//! - `canopy_freemind` for persistence.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p canopy_demos --example basic_layout`

use canopy_freemind::{Document, read_document, write_document};
use canopy_layout::LayoutEngine;
use canopy_tree::{NodeContent, NodeTree, Side};

fn main() {
    env_logger::init();

    let mut tree = NodeTree::new(NodeContent::new("Trip planning"));
    let root = tree.root();
    let (travel, _) = tree
        .push_child(root, Side::Right, NodeContent::new("Travel"))
        .unwrap();
    tree.push_child(travel, Side::Right, NodeContent::new("Train tickets"))
        .unwrap();
    tree.push_child(travel, Side::Right, NodeContent::new("Rental car"))
        .unwrap();
    let (packing, _) = tree
        .push_child(root, Side::Left, NodeContent::new("Packing"))
        .unwrap();
    let mut clothes = NodeContent::new("Clothes for a week of mixed weather");
    clothes.icons.push("attach".to_owned());
    tree.push_child(packing, Side::Right, clothes).unwrap();

    let mut layout = LayoutEngine::default();
    layout.ensure_current(&tree);
    println!("Initial layout:");
    for id in tree.subtree(root) {
        if let Some(cell) = layout.cell(id) {
            let depth = tree.depth(id).unwrap_or(0);
            println!(
                "{:indent$}{:<40} frame {:?}",
                "",
                tree.node(id).map(|n| n.text()).unwrap_or_default(),
                cell.frame(),
                indent = depth * 2,
            );
        }
    }

    // Folding hides the children from layout but keeps them in the tree.
    let invalidation = tree.toggle_fold(travel).unwrap();
    layout.invalidate(&invalidation);
    let damage = layout.ensure_current(&tree);
    println!(
        "\nFolded \"Travel\": {} dirty rects, union {:?}, {} cells visible",
        damage.dirty_rects.len(),
        damage.union_rect(),
        layout.len(),
    );

    let xml = write_document(&Document::new(tree));
    println!("\n{xml}");

    let reread = read_document(&xml).unwrap();
    println!(
        "Read back {} nodes (version {}).",
        reread.tree.node_count(),
        reread.version
    );
}
