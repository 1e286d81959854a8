// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only spatial queries over computed geometry.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::ControlFlow;

use canopy_tree::{Direction, NodeId, Side};
use kurbo::{Point, Rect};

use crate::LayoutEngine;
use crate::cell::Cell;
use crate::util::overlaps;

/// One of the zones of a cell's frame used to interpret a drop.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DragRegion {
    /// Neither band; dropping here does nothing.
    Center,
    /// The upper band.
    North,
    /// The lower band.
    South,
    /// The right band. Wins over north/south in the corners.
    East,
    /// The left band. Wins over north/south in the corners.
    West,
}

/// Result of a point query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hit {
    /// The innermost cell whose own frame contains the point.
    pub node: NodeId,
    /// Path from the search root to `node`, inclusive.
    pub path: Vec<NodeId>,
}

impl<M> LayoutEngine<M> {
    /// Find the innermost cell whose own frame contains `point`, searching the whole map.
    ///
    /// Returns `None` outside the root's family box and in the gaps between cells.
    pub fn cell_at(&self, point: Point) -> Option<Hit> {
        self.cell_at_within(point, self.root?)
    }

    /// Like [`LayoutEngine::cell_at`] but restricted to the family of `family_root`.
    ///
    /// Subtrees whose family box misses the point are skipped without visiting their cells.
    pub fn cell_at_within(&self, point: Point, family_root: NodeId) -> Option<Hit> {
        debug_assert!(!self.pending, "geometry queried before ensure_current");
        let mut current = self.cells.get(&family_root)?;
        if !current.family_frame().contains(point) {
            return None;
        }
        let mut path = Vec::new();
        loop {
            path.push(current.node);
            if current.frame().contains(point) {
                return Some(Hit {
                    node: current.node,
                    path,
                });
            }
            current = current
                .all_children()
                .filter_map(|c| self.cells.get(&c))
                .find(|c| c.family_frame().contains(point))?;
        }
    }

    /// Classify `point` against the drag bands of a cell's frame.
    ///
    /// East and west cover the outer [`drag_region_fraction`] of the width, north and south
    /// the outer fraction of the height. Corners resolve to east/west. Returns `None` for
    /// points outside the frame and for nodes without a cell.
    ///
    /// [`drag_region_fraction`]: crate::LayoutSettings::drag_region_fraction
    pub fn region_of(&self, node: NodeId, point: Point) -> Option<DragRegion> {
        let frame = self.cells.get(&node)?.frame();
        if !frame.contains(point) {
            return None;
        }
        let (band_w, band_h) = self.bands(frame);
        let region = if point.x < frame.x0 + band_w {
            DragRegion::West
        } else if point.x >= frame.x1 - band_w {
            DragRegion::East
        } else if point.y < frame.y0 + band_h {
            DragRegion::North
        } else if point.y >= frame.y1 - band_h {
            DragRegion::South
        } else {
            DragRegion::Center
        };
        Some(region)
    }

    /// The rectangle covered by one region of a cell, consistent with
    /// [`LayoutEngine::region_of`]. Useful for drawing drop indicators.
    pub fn region_frame(&self, node: NodeId, region: DragRegion) -> Option<Rect> {
        let f = self.cells.get(&node)?.frame();
        let (w, h) = self.bands(f);
        Some(match region {
            DragRegion::West => Rect::new(f.x0, f.y0, f.x0 + w, f.y1),
            DragRegion::East => Rect::new(f.x1 - w, f.y0, f.x1, f.y1),
            DragRegion::North => Rect::new(f.x0 + w, f.y0, f.x1 - w, f.y0 + h),
            DragRegion::South => Rect::new(f.x0 + w, f.y1 - h, f.x1 - w, f.y1),
            DragRegion::Center => Rect::new(f.x0 + w, f.y0 + h, f.x1 - w, f.y1 - h),
        })
    }

    fn bands(&self, frame: Rect) -> (f64, f64) {
        let fraction = self.settings.drag_region_fraction;
        (frame.width() * fraction, frame.height() * fraction)
    }

    /// What dropping onto `region` of `node` means for a move or copy.
    ///
    /// North and south insert before and after the node. The band facing away from the root
    /// drops as the first child; on the root, east and west pick the side. Everything else,
    /// including sibling drops on the root, means no drop.
    pub fn drop_direction(&self, node: NodeId, region: DragRegion) -> Option<Direction> {
        let cell = self.cells.get(&node)?;
        if cell.is_root() {
            return match region {
                DragRegion::East => Some(Direction::Child(Side::Right)),
                DragRegion::West => Some(Direction::Child(Side::Left)),
                _ => None,
            };
        }
        match (region, cell.side) {
            (DragRegion::North, _) => Some(Direction::PreviousSibling),
            (DragRegion::South, _) => Some(Direction::NextSibling),
            (DragRegion::East, Side::Right) | (DragRegion::West, Side::Left) => {
                Some(Direction::Child(Side::Right))
            }
            _ => None,
        }
    }

    /// Every cell whose own frame overlaps `rect`, in pre-order.
    ///
    /// Touching edges do not count as overlap.
    pub fn cells_in_rect(&self, rect: Rect) -> Vec<NodeId> {
        debug_assert!(!self.pending, "geometry queried before ensure_current");
        let mut found = Vec::new();
        let Some(root) = self.root else {
            return found;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(cell) = self.cells.get(&id) else {
                continue;
            };
            if !overlaps(cell.family_frame(), rect) {
                continue;
            }
            if overlaps(cell.frame(), rect) {
                found.push(id);
            }
            stack.extend(cell.left_children.iter().rev());
            stack.extend(cell.children.iter().rev());
        }
        found
    }

    /// Find the cell of `id` below (or at) `search_root`, by identity only.
    ///
    /// Hidden nodes have no cell and are not found.
    pub fn cell_with_identifier(&self, id: NodeId, search_root: NodeId) -> Option<&Cell> {
        let mut found = None;
        let _ = self.traverse(search_root, |cell| {
            if cell.node == id {
                found = Some(cell);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        found
    }

    /// Visit `search_root` and its visible descendants in pre-order until `f` breaks.
    ///
    /// The root's right children are visited before its left children.
    pub fn traverse<'a, B>(
        &'a self,
        search_root: NodeId,
        mut f: impl FnMut(&'a Cell) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        let mut stack = vec![search_root];
        while let Some(id) = stack.pop() {
            let Some(cell) = self.cells.get(&id) else {
                continue;
            };
            f(cell)?;
            stack.extend(cell.left_children.iter().rev());
            stack.extend(cell.children.iter().rev());
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedAdvance, LayoutSettings};
    use canopy_tree::{NodeContent, NodeTree};

    struct Map {
        tree: NodeTree,
        layout: LayoutEngine,
        root: NodeId,
        a: NodeId,
        a1: NodeId,
        b: NodeId,
    }

    fn map() -> Map {
        let mut tree = NodeTree::new(NodeContent::new("Root"));
        let root = tree.root();
        let (a, _) = tree.push_child(root, Side::Right, NodeContent::new("Hello")).unwrap();
        let (a1, _) = tree.push_child(a, Side::Right, NodeContent::new("World")).unwrap();
        let (b, _) = tree.push_child(root, Side::Left, NodeContent::new("Hi")).unwrap();
        let settings = LayoutSettings {
            cell_horizontal_padding: 0.0,
            cell_vertical_padding: 0.0,
            node_min_height: 30.0,
            ..LayoutSettings::default()
        };
        let mut layout = LayoutEngine::with_measure(
            settings,
            FixedAdvance {
                default_font_size: 10.0,
                advance: 1.0,
                line_height: 1.0,
            },
        );
        layout.ensure_current(&tree);
        Map {
            tree,
            layout,
            root,
            a,
            a1,
            b,
        }
    }

    #[test]
    fn cell_at_returns_innermost_cell_and_path() {
        let m = map();
        let f = m.layout.cell(m.a1).unwrap().frame();
        let hit = m.layout.cell_at(f.center()).unwrap();
        assert_eq!(hit.node, m.a1);
        assert_eq!(hit.path, vec![m.root, m.a, m.a1]);

        let f = m.layout.cell(m.b).unwrap().frame();
        assert_eq!(m.layout.cell_at(f.center()).unwrap().node, m.b);
        let f = m.layout.cell(m.root).unwrap().frame();
        assert_eq!(m.layout.cell_at(f.center()).unwrap().path, vec![m.root]);
    }

    #[test]
    fn cell_at_misses_outside_and_in_gaps() {
        let m = map();
        let family = m.layout.cell(m.root).unwrap().family_frame();
        assert!(m.layout.cell_at(Point::new(family.x1 + 1.0, 0.0)).is_none());
        assert!(m.layout.cell_at(Point::new(-1.0, -1.0)).is_none());
        // Between the root and A.
        let root = m.layout.cell(m.root).unwrap().frame();
        assert!(m.layout.cell_at(Point::new(root.x1 + 1.0, root.center().y)).is_none());
    }

    #[test]
    fn cell_at_within_restricts_search() {
        let m = map();
        let f = m.layout.cell(m.b).unwrap().frame();
        assert!(m.layout.cell_at_within(f.center(), m.a).is_none());
        let f = m.layout.cell(m.a1).unwrap().frame();
        assert_eq!(
            m.layout.cell_at_within(f.center(), m.a).unwrap().path,
            vec![m.a, m.a1]
        );
    }

    #[test]
    fn regions_split_by_thirds_with_horizontal_corners() {
        let m = map();
        // "Hello": 50 x 30
        let f = m.layout.cell(m.a).unwrap().frame();
        let at = |dx: f64, dy: f64| m.layout.region_of(m.a, Point::new(f.x0 + dx, f.y0 + dy));
        assert_eq!(at(25.0, 15.0), Some(DragRegion::Center));
        assert_eq!(at(25.0, 2.0), Some(DragRegion::North));
        assert_eq!(at(25.0, 28.0), Some(DragRegion::South));
        assert_eq!(at(2.0, 15.0), Some(DragRegion::West));
        assert_eq!(at(48.0, 15.0), Some(DragRegion::East));
        assert_eq!(at(1.0, 1.0), Some(DragRegion::West), "corner goes horizontal");
        assert_eq!(at(49.0, 29.0), Some(DragRegion::East), "corner goes horizontal");
        assert_eq!(at(60.0, 15.0), None);

        for region in [
            DragRegion::Center,
            DragRegion::North,
            DragRegion::South,
            DragRegion::East,
            DragRegion::West,
        ] {
            let r = m.layout.region_frame(m.a, region).unwrap();
            assert_eq!(
                m.layout.region_of(m.a, r.center()),
                Some(region),
                "region frame and classification agree"
            );
        }
    }

    #[test]
    fn drop_directions() {
        let m = map();
        let l = &m.layout;
        assert_eq!(
            l.drop_direction(m.a, DragRegion::East),
            Some(Direction::Child(Side::Right))
        );
        assert_eq!(l.drop_direction(m.a, DragRegion::West), None);
        assert_eq!(
            l.drop_direction(m.b, DragRegion::West),
            Some(Direction::Child(Side::Right))
        );
        assert_eq!(
            l.drop_direction(m.a, DragRegion::North),
            Some(Direction::PreviousSibling)
        );
        assert_eq!(
            l.drop_direction(m.a, DragRegion::South),
            Some(Direction::NextSibling)
        );
        assert_eq!(l.drop_direction(m.a, DragRegion::Center), None);
        assert_eq!(
            l.drop_direction(m.root, DragRegion::West),
            Some(Direction::Child(Side::Left))
        );
        assert_eq!(l.drop_direction(m.root, DragRegion::North), None);
    }

    #[test]
    fn identifier_lookup_ignores_geometry() {
        let mut m = map();
        assert_eq!(
            m.layout.cell_with_identifier(m.a1, m.root).map(Cell::node),
            Some(m.a1)
        );
        assert!(m.layout.cell_with_identifier(m.a1, m.b).is_none());

        let inv = m.tree.toggle_fold(m.a).unwrap();
        m.layout.invalidate(&inv);
        m.layout.ensure_current(&m.tree);
        assert!(
            m.layout.cell_with_identifier(m.a1, m.root).is_none(),
            "folded-away nodes have no cell"
        );
    }

    #[test]
    fn rect_query_and_traversal() {
        let m = map();
        let whole = m.layout.cell(m.root).unwrap().family_frame();
        let all = m.layout.cells_in_rect(whole);
        assert_eq!(all, vec![m.root, m.a, m.a1, m.b]);

        let only_b = m.layout.cells_in_rect(m.layout.cell(m.b).unwrap().frame());
        assert_eq!(only_b, vec![m.b]);

        let mut visited = Vec::new();
        let flow = m.layout.traverse(m.root, |cell| {
            visited.push(cell.node());
            if cell.node() == m.a {
                ControlFlow::Break(cell.node())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(m.a));
        assert_eq!(visited, vec![m.root, m.a]);
    }
}
