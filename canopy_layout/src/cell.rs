// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node geometry.

use alloc::vec::Vec;
use canopy_tree::{NodeId, Side};
use kurbo::{CubicBez, Point, Rect, Size};

/// The geometry of one visible node.
///
/// A cell refers to its node and parent by id only. All values are in the engine's
/// coordinate space (y grows downwards) and are valid after the last
/// [`LayoutEngine::ensure_current`](crate::LayoutEngine::ensure_current).
#[derive(Clone, Debug)]
pub struct Cell {
    pub(crate) node: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) side: Side,
    pub(crate) folded: bool,
    /// Visible right children; empty while folded.
    pub(crate) children: Vec<NodeId>,
    /// Visible left children; only the root has any.
    pub(crate) left_children: Vec<NodeId>,

    pub(crate) size: Size,
    pub(crate) text_size: Size,
    pub(crate) icon_size: Size,
    pub(crate) family_size: Size,
    pub(crate) children_family_size: Size,
    pub(crate) left_children_family_size: Size,

    pub(crate) origin: Point,
    pub(crate) family_origin: Point,
    pub(crate) children_family_origin: Point,
    pub(crate) left_children_family_origin: Point,
    pub(crate) text_origin: Point,
    pub(crate) icon_origin: Point,
    pub(crate) connector: Option<CubicBez>,

    /// Revision of the node this cell was last computed from.
    pub(crate) revision: Option<u64>,
    pub(crate) dirty: bool,
    pub(crate) placed: bool,
    pub(crate) pass: u64,
}

impl Cell {
    pub(crate) fn new(node: NodeId) -> Self {
        Self {
            node,
            parent: None,
            side: Side::Right,
            folded: false,
            children: Vec::new(),
            left_children: Vec::new(),
            size: Size::ZERO,
            text_size: Size::ZERO,
            icon_size: Size::ZERO,
            family_size: Size::ZERO,
            children_family_size: Size::ZERO,
            left_children_family_size: Size::ZERO,
            origin: Point::ZERO,
            family_origin: Point::ZERO,
            children_family_origin: Point::ZERO,
            left_children_family_origin: Point::ZERO,
            text_origin: Point::ZERO,
            icon_origin: Point::ZERO,
            connector: None,
            revision: None,
            dirty: true,
            placed: false,
            pass: 0,
        }
    }

    /// The node this cell projects.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The parent cell's node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The side of the map the cell is on. The root reports [`Side::Right`].
    pub fn side(&self) -> Side {
        self.side
    }

    /// Returns `true` for the root cell.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether the node was folded when the cell was laid out.
    pub fn is_folded(&self) -> bool {
        self.folded
    }

    /// Visible children on the right (or only) side, in order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Visible left children of the root, in order.
    pub fn left_children(&self) -> &[NodeId] {
        &self.left_children
    }

    /// Size of the cell itself: content plus padding.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Size of the wrapped text block.
    pub fn text_size(&self) -> Size {
        self.text_size
    }

    /// Size of the icon strip, zero without icons.
    pub fn icon_size(&self) -> Size {
        self.icon_size
    }

    /// Size of the bounding box of the cell and all of its visible descendants.
    ///
    /// For the root this is the bounding box of the whole map.
    pub fn family_size(&self) -> Size {
        self.family_size
    }

    /// Size of the stack of visible children (the right stack for the root).
    pub fn children_family_size(&self) -> Size {
        self.children_family_size
    }

    /// Size of the root's left stack; zero for other cells.
    pub fn left_children_family_size(&self) -> Size {
        self.left_children_family_size
    }

    /// Top-left corner of the cell.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Top-left corner of the family box.
    pub fn family_origin(&self) -> Point {
        self.family_origin
    }

    /// Top-left corner of the children stack (the right stack for the root).
    pub fn children_family_origin(&self) -> Point {
        self.children_family_origin
    }

    /// Top-left corner of the root's left stack.
    pub fn left_children_family_origin(&self) -> Point {
        self.left_children_family_origin
    }

    /// Top-left corner of the text block.
    pub fn text_origin(&self) -> Point {
        self.text_origin
    }

    /// Top-left corner of the icon strip.
    pub fn icon_origin(&self) -> Point {
        self.icon_origin
    }

    /// The curve from the parent to this cell, `None` for the root.
    pub fn connector(&self) -> Option<CubicBez> {
        self.connector
    }

    /// The cell's own rectangle.
    pub fn frame(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    /// The family rectangle.
    pub fn family_frame(&self) -> Rect {
        Rect::from_origin_size(self.family_origin, self.family_size)
    }

    /// Visible children of both sides, right first.
    pub(crate) fn all_children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().chain(&self.left_children).copied()
    }
}
