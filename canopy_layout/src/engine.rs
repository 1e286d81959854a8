// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout engine: cell synchronisation, bottom-up sizing and top-down placement.

use alloc::vec;
use alloc::vec::Vec;
use canopy_tree::{Invalidation, NodeContent, NodeId, NodeTree, Side};
use hashbrown::HashMap;
use kurbo::{CubicBez, Point, Size, Vec2};
use log::{debug, trace};

use crate::cell::Cell;
use crate::damage::Damage;
use crate::measure::{FixedAdvance, Measure};
use crate::settings::LayoutSettings;
use crate::util::{side_midpoint, stack_size};

/// Computes and caches the geometry of every visible node of a [`NodeTree`].
///
/// The engine never mutates the tree. Call [`LayoutEngine::ensure_current`] after edits and
/// before any geometry query; it only redoes work for cells whose node changed (detected via
/// node revisions) or that were explicitly [invalidated](LayoutEngine::invalidate).
///
/// ## Geometry
///
/// Coordinates are y-down. The root's family box starts at
/// [`root_origin`](LayoutEngine::set_root_origin). The root sits between its left and right
/// stacks; every other cell is vertically centred against the stack of its visible children,
/// which starts one horizontal gap further out. Left-side subtrees are mirror images of
/// right-side ones.
///
/// ```rust
/// use canopy_layout::{LayoutEngine, LayoutSettings};
/// use canopy_tree::{NodeContent, NodeTree, Side};
///
/// let mut tree = NodeTree::new(NodeContent::new("Root"));
/// let root = tree.root();
/// let (a, _) = tree.push_child(root, Side::Right, NodeContent::new("Hello")).unwrap();
///
/// let mut layout = LayoutEngine::new(LayoutSettings::default());
/// layout.ensure_current(&tree);
/// let root_cell = layout.cell(root).unwrap();
/// let a_cell = layout.cell(a).unwrap();
/// assert!(a_cell.origin().x > root_cell.frame().x1);
/// assert!(a_cell.connector().is_some());
/// ```
pub struct LayoutEngine<M = FixedAdvance> {
    pub(crate) settings: LayoutSettings,
    measure: M,
    pub(crate) cells: HashMap<NodeId, Cell>,
    pub(crate) root: Option<NodeId>,
    /// [`NodeTree::identity`] of the last laid-out tree.
    tree: Option<u64>,
    root_origin: Point,
    /// Explicit invalidations or an origin change not yet folded into a pass.
    pub(crate) pending: bool,
    pass: u64,
}

impl<M> core::fmt::Debug for LayoutEngine<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let dirty = self.cells.values().filter(|c| c.dirty).count();
        f.debug_struct("LayoutEngine")
            .field("settings", &self.settings)
            .field("tree", &self.tree)
            .field("root", &self.root)
            .field("root_origin", &self.root_origin)
            .field("cells", &self.cells.len())
            .field("dirty", &dirty)
            .field("pending", &self.pending)
            .field("pass", &self.pass)
            .finish_non_exhaustive()
    }
}

impl Default for LayoutEngine<FixedAdvance> {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

impl LayoutEngine<FixedAdvance> {
    /// Create an engine that measures text with [`FixedAdvance`].
    pub fn new(settings: LayoutSettings) -> Self {
        Self::with_measure(settings, FixedAdvance::default())
    }
}

/// Sizes produced by measuring one node's content.
struct Measured {
    size: Size,
    text_size: Size,
    icon_size: Size,
}

/// A cell waiting for placement.
struct Placement {
    node: NodeId,
    family_origin: Point,
    side: Side,
    anchor: Point,
}

/// Everything the placement pass writes into a cell.
struct Geometry {
    family_origin: Point,
    origin: Point,
    children_family_origin: Point,
    left_children_family_origin: Point,
    connector: Option<CubicBez>,
}

impl<M> LayoutEngine<M> {
    /// Create an engine with a custom measurer.
    pub fn with_measure(settings: LayoutSettings, measure: M) -> Self {
        Self {
            settings,
            measure,
            cells: HashMap::new(),
            root: None,
            tree: None,
            root_origin: Point::ZERO,
            pending: false,
            pass: 0,
        }
    }

    /// The constants this engine lays out with.
    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// The text measurer.
    pub fn measure(&self) -> &M {
        &self.measure
    }

    /// The root of the last laid-out tree.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Top-left corner of the root's family box.
    pub fn root_origin(&self) -> Point {
        self.root_origin
    }

    /// Move the whole map so that the root's family box starts at `origin`.
    ///
    /// Takes effect on the next [`LayoutEngine::ensure_current`].
    pub fn set_root_origin(&mut self, origin: Point) {
        if origin != self.root_origin {
            self.root_origin = origin;
            self.pending = true;
        }
    }

    /// The cell of a visible node.
    pub fn cell(&self, id: NodeId) -> Option<&Cell> {
        self.cells.get(&id)
    }

    /// All cells, in unspecified order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.values()
    }

    /// Number of cells (visible nodes).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` before the first pass.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Mark the cells of the given nodes dirty.
    ///
    /// Ids without a cell (hidden or new nodes) are ignored; new cells start out dirty anyway.
    pub fn invalidate(&mut self, invalidation: &Invalidation) {
        for id in invalidation.nodes() {
            if let Some(cell) = self.cells.get_mut(id) {
                cell.dirty = true;
            }
        }
        self.pending = true;
    }

    /// Mark every cell dirty, forcing a full re-measure on the next pass.
    pub fn invalidate_all(&mut self) {
        for cell in self.cells.values_mut() {
            cell.dirty = true;
        }
        self.pending = true;
    }

    /// Returns `true` if a pass ran and no invalidation arrived since.
    ///
    /// This does not look at the tree; see [`LayoutEngine::is_current_for`].
    pub fn is_current(&self) -> bool {
        self.root.is_some() && !self.pending
    }

    /// Returns `true` if the geometry reflects `tree` as it is now.
    ///
    /// Every mutation stamps the root of the tree with a new revision, so comparing the
    /// tree identity and the root's revision is enough.
    pub fn is_current_for(&self, tree: &NodeTree) -> bool {
        let root = tree.root();
        self.is_current()
            && self.tree == Some(tree.identity())
            && self.root == Some(root)
            && self
                .cells
                .get(&root)
                .is_some_and(|c| c.revision == tree.revision(root))
    }
}

impl<M: Measure> LayoutEngine<M> {
    /// Bring the geometry up to date with `tree` and report what changed.
    ///
    /// Running this twice without a mutation in between is a no-op that returns empty damage.
    pub fn ensure_current(&mut self, tree: &NodeTree) -> Damage {
        let mut damage = Damage::default();
        if self.is_current_for(tree) {
            return damage;
        }
        self.pass += 1;
        let root = tree.root();
        // Ids and revisions of another tree say nothing about this one.
        if self.tree != Some(tree.identity()) || self.root != Some(root) {
            for cell in self.cells.values().filter(|c| c.placed) {
                damage.push(cell.frame());
            }
            self.cells.clear();
        }
        self.root = Some(root);
        self.tree = Some(tree.identity());

        let order = self.sync(tree, &mut damage);
        let remeasured = self.size_bottom_up(tree, &order);
        self.place(root, &mut damage);
        for id in &order {
            if let Some(cell) = self.cells.get_mut(id) {
                cell.dirty = false;
            }
        }
        self.pending = false;
        debug!(
            pass = self.pass,
            cells = order.len(),
            remeasured,
            dirty_rects = damage.dirty_rects.len();
            "Layout pass"
        );
        damage
    }

    /// Create, update and drop cells so they match the visible nodes.
    ///
    /// Returns the visible nodes in pre-order.
    fn sync(&mut self, tree: &NodeTree, damage: &mut Damage) -> Vec<NodeId> {
        let pass = self.pass;
        let mut order = Vec::with_capacity(self.cells.len().max(1));
        let mut stack = vec![(tree.root(), None, Side::Right)];
        while let Some((id, parent, side)) = stack.pop() {
            let Some(node) = tree.node(id) else {
                continue;
            };
            let folded = node.is_folded();
            let (children, left_children): (&[NodeId], &[NodeId]) = if folded {
                (&[], &[])
            } else {
                (node.children(), node.left_children())
            };

            let cell = self.cells.entry(id).or_insert_with(|| Cell::new(id));
            if cell.revision != Some(node.revision())
                || cell.folded != folded
                || cell.parent != parent
                || cell.children != children
                || cell.left_children != left_children
            {
                cell.dirty = true;
            }
            cell.revision = Some(node.revision());
            cell.parent = parent;
            cell.side = side;
            cell.folded = folded;
            cell.children.clear();
            cell.children.extend_from_slice(children);
            cell.left_children.clear();
            cell.left_children.extend_from_slice(left_children);
            cell.pass = pass;
            order.push(id);

            for &child in left_children.iter().rev() {
                stack.push((child, Some(id), Side::Left));
            }
            let child_side = if parent.is_none() { Side::Right } else { side };
            for &child in children.iter().rev() {
                stack.push((child, Some(id), child_side));
            }
        }

        self.cells.retain(|id, cell| {
            if cell.pass == pass {
                return true;
            }
            trace!(node:? = id; "Dropped cell");
            if cell.placed {
                damage.push(cell.frame());
            }
            false
        });
        order
    }

    /// Measure dirty cells and recompute family sizes on dirty paths, leaves first.
    fn size_bottom_up(&mut self, tree: &NodeTree, order: &[NodeId]) -> usize {
        let hgap = self.settings.internode_horizontal_distance;
        let vgap = self.settings.internode_vertical_distance;
        let mut remeasured = 0;
        for &id in order.iter().rev() {
            let Some(cell) = self.cells.get(&id) else {
                continue;
            };
            let children_dirty = cell
                .all_children()
                .any(|c| self.cells.get(&c).is_some_and(|c| c.dirty));
            if !cell.dirty && !children_dirty {
                continue;
            }
            let family_of = |ids: &[NodeId]| {
                stack_size(
                    ids.iter()
                        .filter_map(|c| self.cells.get(c))
                        .map(|c| c.family_size),
                    vgap,
                )
            };
            let right = family_of(&cell.children);
            let left = family_of(&cell.left_children);
            let has_right = !cell.children.is_empty();
            let has_left = !cell.left_children.is_empty();
            let is_root = cell.parent.is_none();
            let Some(node) = tree.node(id) else {
                continue;
            };
            let measured = self.measure_content(node.content(), is_root);
            remeasured += 1;

            let Some(cell) = self.cells.get_mut(&id) else {
                continue;
            };
            let size = measured.size;
            cell.dirty = true;
            cell.size = size;
            cell.text_size = measured.text_size;
            cell.icon_size = measured.icon_size;
            cell.children_family_size = right;
            cell.left_children_family_size = left;
            cell.family_size = if is_root {
                let mut width = size.width;
                if has_right {
                    width += hgap + right.width;
                }
                if has_left {
                    width += hgap + left.width;
                }
                Size::new(width, size.height.max(right.height).max(left.height))
            } else if has_right {
                Size::new(
                    size.width + hgap + right.width,
                    size.height.max(right.height),
                )
            } else {
                size
            };
        }
        remeasured
    }

    fn measure_content(&self, content: &NodeContent, is_root: bool) -> Measured {
        let s = &self.settings;
        let max_width = if is_root {
            s.max_root_cell_text_width
        } else {
            s.max_text_node_width
        };
        let raw = self
            .measure
            .text_size(&content.text, content.font.as_ref(), max_width);
        let text_size = Size::new(
            raw.width.max(s.node_min_width),
            raw.height.max(s.node_min_height),
        );
        let icon_size = match content.icons.len() {
            0 => Size::ZERO,
            n => Size::new(
                n as f64 * s.icon_draw_size + (n - 1) as f64 * s.inter_icon_distance,
                s.icon_draw_size,
            ),
        };
        let gap = if content.icons.is_empty() {
            0.0
        } else {
            s.icon_text_distance
        };
        let size = Size::new(
            icon_size.width + gap + text_size.width + 2.0 * s.cell_horizontal_padding,
            icon_size.height.max(text_size.height) + 2.0 * s.cell_vertical_padding,
        );
        Measured {
            size,
            text_size,
            icon_size,
        }
    }
}

impl<M> LayoutEngine<M> {
    /// Position every visible cell top-down, starting at the root.
    fn place(&mut self, root: NodeId, damage: &mut Damage) {
        let hgap = self.settings.internode_horizontal_distance;
        let Some(cell) = self.cells.get(&root) else {
            return;
        };
        let family_origin = self.root_origin;
        let size = cell.size;
        let family = cell.family_size;
        let right = cell.children_family_size;
        let left = cell.left_children_family_size;
        let left_part = if cell.left_children.is_empty() {
            0.0
        } else {
            left.width + hgap
        };
        let origin = Point::new(
            family_origin.x + left_part,
            family_origin.y + (family.height - size.height) / 2.0,
        );
        let right_origin = Point::new(
            origin.x + size.width + hgap,
            family_origin.y + (family.height - right.height) / 2.0,
        );
        let left_origin = Point::new(
            origin.x - hgap - left.width,
            family_origin.y + (family.height - left.height) / 2.0,
        );
        let frame = kurbo::Rect::from_origin_size(origin, size);

        let mut pending = Vec::new();
        self.enqueue(
            &mut pending,
            &cell.children,
            right_origin,
            right.width,
            Side::Right,
            side_midpoint(frame.x1, frame),
        );
        self.enqueue(
            &mut pending,
            &cell.left_children,
            left_origin,
            left.width,
            Side::Left,
            side_midpoint(frame.x0, frame),
        );
        self.apply(
            root,
            Geometry {
                family_origin,
                origin,
                children_family_origin: right_origin,
                left_children_family_origin: left_origin,
                connector: None,
            },
            damage,
        );

        while let Some(Placement {
            node,
            family_origin,
            side,
            anchor,
        }) = pending.pop()
        {
            let Some(cell) = self.cells.get(&node) else {
                continue;
            };
            let size = cell.size;
            let family = cell.family_size;
            let stack = cell.children_family_size;
            let x = match side {
                Side::Right => family_origin.x,
                Side::Left => family_origin.x + family.width - size.width,
            };
            let origin = Point::new(x, family_origin.y + (family.height - size.height) / 2.0);
            let bottom = origin.y + size.height;
            let (inner, outer) = match side {
                Side::Right => (
                    Point::new(origin.x, bottom),
                    Point::new(origin.x + size.width, bottom),
                ),
                Side::Left => (
                    Point::new(origin.x + size.width, bottom),
                    Point::new(origin.x, bottom),
                ),
            };
            let stack_x = match side {
                Side::Right => origin.x + size.width + hgap,
                Side::Left => origin.x - hgap - stack.width,
            };
            let stack_origin = Point::new(
                stack_x,
                family_origin.y + (family.height - stack.height) / 2.0,
            );
            let connector = self.connector(anchor, inner, side);

            self.enqueue(
                &mut pending,
                &cell.children,
                stack_origin,
                stack.width,
                side,
                outer,
            );
            self.apply(
                node,
                Geometry {
                    family_origin,
                    origin,
                    children_family_origin: stack_origin,
                    left_children_family_origin: stack_origin,
                    connector: Some(connector),
                },
                damage,
            );
        }
    }

    /// Queue the family boxes of a stack of children.
    ///
    /// Right stacks are left-aligned at the stack origin, left stacks right-aligned at its far
    /// edge.
    fn enqueue(
        &self,
        pending: &mut Vec<Placement>,
        children: &[NodeId],
        stack_origin: Point,
        stack_width: f64,
        side: Side,
        anchor: Point,
    ) {
        let vgap = self.settings.internode_vertical_distance;
        let mut y = stack_origin.y;
        for &child in children {
            let Some(cell) = self.cells.get(&child) else {
                continue;
            };
            let family = cell.family_size;
            let x = match side {
                Side::Right => stack_origin.x,
                Side::Left => stack_origin.x + stack_width - family.width,
            };
            pending.push(Placement {
                node: child,
                family_origin: Point::new(x, y),
                side,
                anchor,
            });
            y += family.height + vgap;
        }
    }

    fn connector(&self, start: Point, end: Point, side: Side) -> CubicBez {
        let mirror = |v: Vec2| {
            if side.is_left() {
                Vec2::new(-v.x, v.y)
            } else {
                v
            }
        };
        CubicBez::new(
            start,
            start + mirror(self.settings.bezier_control_point_1),
            end + mirror(self.settings.bezier_control_point_2),
            end,
        )
    }

    fn apply(&mut self, node: NodeId, geometry: Geometry, damage: &mut Damage) {
        let s = &self.settings;
        let Some(cell) = self.cells.get_mut(&node) else {
            return;
        };
        let old = cell.frame();
        let was_placed = cell.placed;

        cell.family_origin = geometry.family_origin;
        cell.origin = geometry.origin;
        cell.children_family_origin = geometry.children_family_origin;
        cell.left_children_family_origin = geometry.left_children_family_origin;
        cell.connector = geometry.connector;

        let content_height = cell.size.height - 2.0 * s.cell_vertical_padding;
        let left = cell.origin.x + s.cell_horizontal_padding;
        let top = cell.origin.y + s.cell_vertical_padding;
        cell.icon_origin = Point::new(left, top + (content_height - cell.icon_size.height) / 2.0);
        let gap = if cell.icon_size.width > 0.0 {
            s.icon_text_distance
        } else {
            0.0
        };
        cell.text_origin = Point::new(
            left + cell.icon_size.width + gap,
            top + (content_height - cell.text_size.height) / 2.0,
        );
        cell.placed = true;

        let new = cell.frame();
        if was_placed && old != new {
            damage.push(old);
        }
        if !was_placed || old != new || cell.dirty {
            damage.push(new);
        }
    }
}
