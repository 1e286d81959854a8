// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for the layout engine.
//!
//! 1. A family box is at least as large as its cell, and equal for leaves and folded cells.
//! 2. Sibling family boxes do not overlap and keep the vertical gap.
//! 3. Recomputing an unchanged tree yields identical geometry.
//! 4. Point queries miss outside the map and find every cell at its own centre.
//! 5. Incremental passes agree with a fresh layout.

use canopy_layout::{Cell, LayoutEngine, LayoutSettings};
use canopy_tree::{NodeContent, NodeId, NodeTree, Side};
use kurbo::Point;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct NodePlan {
    parent: usize,
    left: bool,
    text: String,
    icons: usize,
    folded: bool,
}

fn plan_strategy() -> impl Strategy<Value = NodePlan> {
    (any::<usize>(), any::<bool>(), "[a-z ]{0,40}", 0_usize..3, prop::bool::weighted(0.15))
        .prop_map(|(parent, left, text, icons, folded)| NodePlan {
            parent,
            left,
            text,
            icons,
            folded,
        })
}

fn build(plans: &[NodePlan]) -> (NodeTree, Vec<NodeId>) {
    let mut tree = NodeTree::new(NodeContent::new("Central topic"));
    let mut ids = vec![tree.root()];
    for plan in plans {
        let parent = ids[plan.parent % ids.len()];
        let side = if plan.left && parent == tree.root() {
            Side::Left
        } else {
            Side::Right
        };
        let mut content = NodeContent::new(plan.text.clone());
        content.icons = (0..plan.icons).map(|i| format!("icon{i}")).collect();
        content.folded = plan.folded;
        let (id, _) = tree.push_child(parent, side, content).unwrap();
        ids.push(id);
    }
    (tree, ids)
}

fn geometry(layout: &LayoutEngine) -> Vec<(NodeId, [f64; 8])> {
    let mut all: Vec<(NodeId, [f64; 8])> = layout
        .cells()
        .map(|c| {
            let f = c.frame();
            let g = c.family_frame();
            (c.node(), [f.x0, f.y0, f.x1, f.y1, g.x0, g.y0, g.x1, g.y1])
        })
        .collect();
    all.sort_by_key(|entry| entry.0);
    all
}

fn siblings(cell: &Cell) -> [&[NodeId]; 2] {
    [cell.children(), cell.left_children()]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Family boxes contain their cell
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn family_at_least_own_size(plans in prop::collection::vec(plan_strategy(), 0..30)) {
        let (tree, _) = build(&plans);
        let mut layout = LayoutEngine::default();
        layout.ensure_current(&tree);
        for cell in layout.cells() {
            let own = cell.size();
            let family = cell.family_size();
            prop_assert!(family.width >= own.width && family.height >= own.height);
            let leaf = cell.children().is_empty() && cell.left_children().is_empty();
            if leaf {
                prop_assert_eq!(family, own, "leaf or folded family equals own size");
            }
            if cell.is_folded() {
                prop_assert!(leaf, "folded cells expose no children");
            }
            let g = cell.family_frame();
            let f = cell.frame();
            prop_assert!(g.x0 <= f.x0 + 1e-9 && f.x1 <= g.x1 + 1e-9);
            prop_assert!(g.y0 <= f.y0 + 1e-9 && f.y1 <= g.y1 + 1e-9);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Siblings keep their distance
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sibling_families_are_separated(plans in prop::collection::vec(plan_strategy(), 0..30)) {
        let (tree, _) = build(&plans);
        let settings = LayoutSettings::default();
        let gap = settings.internode_vertical_distance;
        let mut layout = LayoutEngine::new(settings);
        layout.ensure_current(&tree);
        for cell in layout.cells() {
            for list in siblings(cell) {
                for pair in list.windows(2) {
                    let upper = layout.cell(pair[0]).unwrap().family_frame();
                    let lower = layout.cell(pair[1]).unwrap().family_frame();
                    prop_assert!(
                        lower.y0 - upper.y1 >= gap - 1e-9,
                        "siblings {:?} and {:?} closer than the gap",
                        pair[0],
                        pair[1]
                    );
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn recompute_is_bit_identical(plans in prop::collection::vec(plan_strategy(), 0..30)) {
        let (tree, _) = build(&plans);
        let mut layout = LayoutEngine::default();
        layout.ensure_current(&tree);
        let first = geometry(&layout);
        prop_assert!(layout.ensure_current(&tree).is_empty());
        layout.invalidate_all();
        layout.ensure_current(&tree);
        prop_assert_eq!(geometry(&layout), first);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Point queries
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn point_queries(
        plans in prop::collection::vec(plan_strategy(), 0..30),
        dx in 0.5_f64..500.0,
        dy in 0.5_f64..500.0,
    ) {
        let (tree, _) = build(&plans);
        let mut layout = LayoutEngine::default();
        layout.ensure_current(&tree);
        let map = layout.cell(tree.root()).unwrap().family_frame();

        prop_assert!(layout.cell_at(Point::new(map.x1 + dx, map.y0 + dy)).is_none());
        prop_assert!(layout.cell_at(Point::new(map.x0 - dx, map.y0)).is_none());
        prop_assert!(layout.cell_at(Point::new(map.x0, map.y1 + dy)).is_none());

        for cell in layout.cells() {
            let hit = layout.cell_at(cell.frame().center()).unwrap();
            prop_assert_eq!(hit.node, cell.node());
            prop_assert_eq!(hit.path.first().copied(), Some(tree.root()));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Incremental passes agree with fresh layouts
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn incremental_matches_fresh(
        plans in prop::collection::vec(plan_strategy(), 1..30),
        edit in any::<usize>(),
        text in "[a-z ]{0,60}",
    ) {
        let (mut tree, ids) = build(&plans);
        let mut incremental = LayoutEngine::default();
        incremental.ensure_current(&tree);

        let node = ids[edit % ids.len()];
        tree.set_text(node, text).unwrap();
        tree.toggle_fold(ids[(edit / 7) % ids.len()]).unwrap();
        incremental.ensure_current(&tree);

        let mut fresh = LayoutEngine::default();
        fresh.ensure_current(&tree);
        prop_assert_eq!(geometry(&incremental), geometry(&fresh));
    }
}
