// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the node tree: identifiers, placement, and node content.

use alloc::string::String;
use alloc::vec::Vec;

/// Identifier for a node in the tree.
///
/// This is a small, copyable handle that stays stable across edits but becomes
/// invalid when the node is discarded.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - Detaching a node (for example with [`NodeTree::remove_child`](crate::NodeTree::remove_child))
///   keeps its id live so it can be re-attached.
/// - On [`NodeTree::discard`](crate::NodeTree::discard), the slots of the subtree are freed;
///   existing `NodeId`s that pointed to them are now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`NodeTree::is_alive`](crate::NodeTree::is_alive) to check whether a `NodeId` still refers
/// to a live node. Stale `NodeId`s never alias a different live node because the generation must
/// match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// The slot index of this id.
    ///
    /// Only meaningful together with [`NodeId::generation`].
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// The generation of the slot at the time this id was handed out.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

/// Placement side relative to the root.
///
/// Only the root partitions its children. Every other node has a single child
/// list, addressed as [`Side::Right`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Side {
    /// The left half of the map.
    Left,
    /// The right half of the map, and the only list of non-root nodes.
    #[default]
    Right,
}

impl Side {
    /// Returns `true` for [`Side::Left`].
    pub const fn is_left(self) -> bool {
        matches!(self, Self::Left)
    }
}

/// Where a set of moved or copied nodes lands relative to a target node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Directly after the target, in the list that holds the target.
    NextSibling,
    /// Directly before the target, in the list that holds the target.
    PreviousSibling,
    /// As the first children of the target, on the given side.
    ///
    /// [`Side::Left`] is only valid when the target is the root.
    Child(Side),
}

/// The position of an attached node: its parent, the list within the parent, and the index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Location {
    /// The node owning the list.
    pub parent: NodeId,
    /// Which of the parent's lists. Always [`Side::Right`] unless `parent` is the root.
    pub side: Side,
    /// Index within that list.
    pub index: usize,
}

/// A font override in FreeMind terms.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Family name, for example `"SansSerif"`.
    pub family: String,
    /// Point size.
    pub size: f64,
    /// Bold face.
    pub bold: bool,
    /// Italic face.
    pub italic: bool,
}

impl Font {
    /// A regular (neither bold nor italic) font.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }
}

/// An opaque, verbatim serialized fragment the core does not interpret.
///
/// Readers store the exact source text of elements they do not understand here and
/// writers emit it unchanged.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct RawFragment(pub String);

impl RawFragment {
    /// The fragment's text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Per-node content.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeContent {
    /// Plain text value.
    pub text: String,
    /// Font override. `None` means the default font.
    pub font: Option<Font>,
    /// Icon codes, in display order.
    pub icons: Vec<String>,
    /// Whether the node's children are hidden from layout.
    pub folded: bool,
    /// Serialized attributes that are carried along without interpretation, in document order.
    pub attributes: Vec<(String, String)>,
    /// Unsupported substructures, in document order.
    pub unsupported: Vec<RawFragment>,
}

impl NodeContent {
    /// Content with the given text and nothing else.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}
