// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-driven editing: select, drag onto another node, drop, then undo.
//!
//! This example shows how to combine:
//! - `canopy_selection` for the selected and dragged sets,
//! - `canopy_layout` spatial queries to turn a pointer position into a drop direction,
//! - `canopy_tree::Edit` to apply the move and keep its inverse for undo.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p canopy_demos --example drag_and_drop`

use canopy_layout::LayoutEngine;
use canopy_selection::{Modifiers, Selection};
use canopy_tree::{Edit, NodeContent, NodeId, NodeTree, Side};
use kurbo::Point;

fn outline(tree: &NodeTree) -> String {
    let mut out = String::new();
    for id in tree.subtree(tree.root()) {
        let depth = tree.depth(id).unwrap_or(0);
        let side = if tree.is_root(id) {
            ""
        } else {
            match tree.side_of(id) {
                Some(Side::Left) => "[L] ",
                _ => "",
            }
        };
        let text = tree.node(id).map(|n| n.text()).unwrap_or_default();
        out.push_str(&format!("{:indent$}{side}{text}\n", "", indent = depth * 2));
    }
    out
}

fn main() {
    env_logger::init();

    let mut tree = NodeTree::new(NodeContent::new("Project"));
    let root = tree.root();
    let mut topics = Vec::new();
    for (text, side) in [
        ("Design", Side::Right),
        ("Build", Side::Right),
        ("Ship", Side::Right),
        ("Risks", Side::Left),
    ] {
        let (id, _) = tree.push_child(root, side, NodeContent::new(text)).unwrap();
        topics.push(id);
    }
    let [design, build, ship, risks] = topics[..] else {
        unreachable!("four topics were inserted");
    };

    let mut layout = LayoutEngine::default();
    layout.ensure_current(&tree);
    println!("Before:\n{}", outline(&tree));

    // Press on "Build", shift-click "Ship", then start dragging.
    let mut selection: Selection<NodeId> = Selection::new();
    let press = |layout: &LayoutEngine, id: NodeId| -> Point {
        layout.cell(id).map(|c| c.frame().center()).unwrap_or_default()
    };
    for (node, modifiers) in [(build, Modifiers::empty()), (ship, Modifiers::SHIFT)] {
        let hit = layout.cell_at(press(&layout, node)).map(|h| h.node);
        selection.set_mouse_down_hit(hit);
        if let Some(hit) = hit {
            selection.add(hit, modifiers);
        }
    }
    selection.begin_drag();

    // Hover over the outer edge of "Design": the east band of a right-side node means
    // "make it a child".
    let design_frame = layout.cell(design).map(|c| c.frame()).unwrap_or_default();
    let pointer = Point::new(design_frame.x1 - 1.0, design_frame.center().y);
    let target = layout.cell_at(pointer).map(|h| h.node);
    selection.set_drag_target(target);

    let drop = target.and_then(|t| {
        let region = layout.region_of(t, pointer)?;
        let direction = layout.drop_direction(t, region)?;
        println!("Dropping onto {:?} in region {region:?} as {direction:?}", t);
        Some((t, direction))
    });
    let nodes = selection.end_drag();
    let Some((target, direction)) = drop else {
        println!("Nothing to drop onto.");
        return;
    };

    let applied = Edit::Move {
        nodes,
        target,
        direction,
    }
    .apply(&mut tree)
    .unwrap();
    layout.invalidate(&applied.invalidation);
    let damage = layout.ensure_current(&tree);
    println!(
        "After move ({} dirty rects):\n{}",
        damage.dirty_rects.len(),
        outline(&tree)
    );

    let undone = applied.inverse.apply(&mut tree).unwrap();
    layout.invalidate(&undone.invalidation);
    layout.ensure_current(&tree);
    println!("After undo:\n{}", outline(&tree));

    // Deleting a node: prune the selection first, then detach.
    selection.add(risks, Modifiers::empty());
    selection.retain(|&k| k != risks);
    let removed = Edit::Detach { nodes: vec![risks] }.apply(&mut tree).unwrap();
    layout.ensure_current(&tree);
    println!(
        "After deleting \"Risks\" ({} cells):\n{}",
        layout.len(),
        outline(&tree)
    );
    removed.inverse.apply(&mut tree).unwrap();
}
