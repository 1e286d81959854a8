// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, mutations, queries.

use alloc::string::String;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};
use log::trace;

use crate::error::TreeError;
use crate::invalidation::Invalidation;
use crate::types::{Direction, Font, Location, NodeContent, NodeId, RawFragment, Side};

/// The mind-map document model.
///
/// Nodes live in generational slots. The root is created with the tree and can never be
/// detached or discarded. Nodes created with [`NodeTree::insert`] start out detached; they
/// become part of the map once attached with [`NodeTree::add_child`] or one of the
/// convenience constructors.
///
/// Every mutation validates all of its preconditions first and returns an
/// [`Invalidation`] listing the nodes whose geometry went stale. Each node also carries a
/// [revision](NodeTree::revision) stamp that is bumped for the touched node and all of its
/// ancestors, so layout code can detect changes it was not told about.
///
/// ## Example
///
/// ```rust
/// use canopy_tree::{Direction, NodeContent, NodeTree, Side};
///
/// let mut tree = NodeTree::new(NodeContent::new("Root"));
/// let root = tree.root();
/// let (a, _) = tree.push_child(root, Side::Right, NodeContent::new("A")).unwrap();
/// let (b, _) = tree.push_child(root, Side::Left, NodeContent::new("B")).unwrap();
///
/// // Move B under A.
/// tree.move_nodes(&[b], a, Direction::Child(Side::Right)).unwrap();
/// assert_eq!(tree.parent_of(b), Some(a));
/// assert_eq!(tree.side_of(b), Some(Side::Right));
///
/// // A cannot be moved below its own child.
/// assert!(tree.move_nodes(&[a], b, Direction::NextSibling).is_err());
/// ```
pub struct NodeTree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    epoch: u64,
    root: NodeId,
    identity: u64,
}

/// Source of [`NodeTree::identity`] values.
static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

impl core::fmt::Debug for NodeTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("NodeTree")
            .field("identity", &self.identity)
            .field("root", &self.root)
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

/// A node of the map: content plus structural links.
#[derive(Clone, Debug)]
pub struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    left_children: Vec<NodeId>,
    content: NodeContent,
    revision: u64,
}

impl Node {
    fn new(generation: u32, content: NodeContent, revision: u64) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            left_children: Vec::new(),
            content,
            revision,
        }
    }

    /// The full content record.
    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    /// Plain text value.
    pub fn text(&self) -> &str {
        &self.content.text
    }

    /// Font override, `None` for the default font.
    pub fn font(&self) -> Option<&Font> {
        self.content.font.as_ref()
    }

    /// Icon codes.
    pub fn icons(&self) -> &[String] {
        &self.content.icons
    }

    /// Whether the node's children are hidden from layout.
    pub fn is_folded(&self) -> bool {
        self.content.folded
    }

    /// Attributes carried along without interpretation.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.content.attributes
    }

    /// Unsupported substructures.
    pub fn unsupported(&self) -> &[RawFragment] {
        &self.content.unsupported
    }

    /// The parent, or `None` for the root and detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The right (or only) children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The left children. Always empty for nodes other than the root.
    pub fn left_children(&self) -> &[NodeId] {
        &self.left_children
    }

    /// Returns `true` when the node has no children in either list.
    ///
    /// Folding does not make a node a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.left_children.is_empty()
    }

    /// The tree epoch at which this node or one of its descendants last changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn list(&self, side: Side) -> &Vec<NodeId> {
        match side {
            Side::Left => &self.left_children,
            Side::Right => &self.children,
        }
    }

    fn list_mut(&mut self, side: Side) -> &mut Vec<NodeId> {
        match side {
            Side::Left => &mut self.left_children,
            Side::Right => &mut self.children,
        }
    }
}

/// A node taken out of the tree together with the place it was taken from.
///
/// The subtree stays intact and live; pass the record to [`NodeTree::restore`] to undo the
/// removal, or to [`NodeTree::discard`] (via [`Removal::node`]) to free it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Removal {
    /// The removed node (root of the removed subtree).
    pub node: NodeId,
    /// Where the node used to be attached.
    pub location: Location,
    /// Nodes whose geometry went stale.
    pub invalidation: Invalidation,
}

impl NodeTree {
    /// Create a tree holding only a root with the given content.
    pub fn new(root: NodeContent) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            epoch: 0,
            root: NodeId::new(0, 1),
            identity: NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed),
        };
        tree.root = tree.allocate(root);
        tree
    }

    /// A value unique to this tree among all trees created by the process.
    ///
    /// Node ids and revisions are only meaningful within one tree; two fresh trees share
    /// the same root id and epoch. Caches keyed on either must also compare this.
    pub fn identity(&self) -> u64 {
        self.identity
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached node.
    ///
    /// The node is live but not part of the map until it is attached.
    pub fn insert(&mut self, content: NodeContent) -> NodeId {
        let id = self.allocate(content);
        trace!(id:?; "Created detached node");
        id
    }

    fn allocate(&mut self, content: NodeContent) -> NodeId {
        let revision = self.epoch;
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, content, revision));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, content, revision)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    // --- queries ---

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// The node for a live id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn get(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.node(id).ok_or(TreeError::UnknownIdentifier(id))
    }

    /// Access a node; panics if `id` is stale. Only used after validation.
    fn slot(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale. Only used after validation.
    fn slot_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// The current mutation epoch. Increases with every mutation.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The revision stamp of a live node.
    ///
    /// See [`Node::revision`].
    pub fn revision(&self, id: NodeId) -> Option<u64> {
        self.node(id).map(Node::revision)
    }

    /// Returns `true` if `id` is the root.
    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root
    }

    /// Returns the parent of a node if live, or `None` for the root, detached nodes and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Get one child list of a node, or an empty slice if the node is stale.
    ///
    /// [`Side::Left`] yields an empty slice for every node other than the root.
    pub fn children_of(&self, id: NodeId, side: Side) -> &[NodeId] {
        match self.node(id) {
            Some(n) => n.list(side),
            None => &[],
        }
    }

    /// The side of the map a node belongs to.
    ///
    /// Returns `None` for the root, for detached nodes and for stale ids.
    pub fn side_of(&self, id: NodeId) -> Option<Side> {
        let mut current = id;
        loop {
            let parent = self.parent_of(current)?;
            if parent == self.root {
                return self.location_of(current).map(|loc| loc.side);
            }
            current = parent;
        }
    }

    /// Where a node is attached, or `None` for the root, detached nodes and stale ids.
    pub fn location_of(&self, id: NodeId) -> Option<Location> {
        let parent = self.parent_of(id)?;
        let p = self.node(parent)?;
        if let Some(index) = p.children.iter().position(|&c| c == id) {
            return Some(Location {
                parent,
                side: Side::Right,
                index,
            });
        }
        p.left_children
            .iter()
            .position(|&c| c == id)
            .map(|index| Location {
                parent,
                side: Side::Left,
                index,
            })
    }

    /// The topmost ancestor of a node (the node itself when it has no parent).
    fn top_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            current = parent;
        }
        current
    }

    /// Returns `true` if the node is live and reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_alive(id) && self.top_of(id) == self.root
    }

    /// Distance from the topmost ancestor; `0` for the root.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        let mut current = self.node(id)?;
        let mut depth = 0;
        while let Some(parent) = current.parent {
            depth += 1;
            current = self.slot(parent);
        }
        Some(depth)
    }

    /// Returns `true` if `candidate` lies strictly below `of`.
    ///
    /// A node is not its own descendant. Stale ids are never descendants.
    pub fn is_descendant(&self, candidate: NodeId, of: NodeId) -> bool {
        if !self.is_alive(of) {
            return false;
        }
        let mut current = self.parent_of(candidate);
        while let Some(id) = current {
            if id == of {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    /// Pre-order iterator over a node and all of its descendants.
    ///
    /// Folded nodes are descended into; folding only affects layout. For the root, the right
    /// children come before the left children.
    pub fn subtree(&self, id: NodeId) -> Subtree<'_> {
        let mut stack = Vec::new();
        if self.is_alive(id) {
            stack.push(id);
        }
        Subtree { tree: self, stack }
    }

    /// Get the next node in depth-first traversal order.
    ///
    /// Returns `None` if no next node exists or if the current node is stale.
    /// This is a standard tree traversal that does not wrap around.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        let node = self.node(current)?;
        if let Some(&first) = node.children.iter().chain(&node.left_children).next() {
            return Some(first);
        }
        let mut id = current;
        while let Some(parent) = self.parent_of(id) {
            if let Some(next) = self.next_sibling(id) {
                return Some(next);
            }
            id = parent;
        }
        None
    }

    /// Get the previous node in reverse depth-first traversal order.
    ///
    /// Returns `None` if no previous node exists or if the current node is stale.
    pub fn prev_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        match self.prev_sibling(current) {
            Some(prev) => Some(self.last_in_subtree(prev)),
            None => self.parent_of(current),
        }
    }

    fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(self.parent_of(id)?)?;
        let mut siblings = parent.children.iter().chain(&parent.left_children);
        siblings.position(|&c| c == id)?;
        siblings.next().copied()
    }

    fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(self.parent_of(id)?)?;
        let mut prev = None;
        for &c in parent.children.iter().chain(&parent.left_children) {
            if c == id {
                return prev;
            }
            prev = Some(c);
        }
        None
    }

    fn last_in_subtree(&self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            let node = self.slot(current);
            match node.left_children.last().or(node.children.last()) {
                Some(&last) => current = last,
                None => return current,
            }
        }
    }

    // --- structural mutations ---

    fn check_insertion(&self, parent: NodeId, side: Side, index: usize) -> Result<(), TreeError> {
        let p = self.get(parent)?;
        if side.is_left() && parent != self.root {
            return Err(TreeError::OnlyRootHasSides);
        }
        let len = p.list(side).len();
        if index > len {
            return Err(TreeError::InvalidIndex { index, len });
        }
        Ok(())
    }

    /// Attach a detached node to `parent` at `index` of the list selected by `side`.
    ///
    /// `parent` may itself be detached, which lets callers assemble a subtree before attaching it.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownIdentifier`] if either id is stale.
    /// - [`TreeError::StillAttached`] if `child` is the root or already has a parent.
    /// - [`TreeError::OnlyRootHasSides`] for [`Side::Left`] on a non-root parent.
    /// - [`TreeError::InvalidIndex`] if `index` is past the end of the list.
    /// - [`TreeError::CycleRejected`] if `parent` lies inside `child`'s own subtree.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        side: Side,
        index: usize,
    ) -> Result<Invalidation, TreeError> {
        let c = self.get(child)?;
        if child == self.root || c.parent.is_some() {
            return Err(TreeError::StillAttached(child));
        }
        self.check_insertion(parent, side, index)?;
        if parent == child || self.is_descendant(parent, child) {
            return Err(TreeError::CycleRejected);
        }
        self.link(
            child,
            Location {
                parent,
                side,
                index,
            },
        );
        trace!(parent:?, child:?, side:?, index; "Attached child");
        Ok(self.touch(&[child]))
    }

    /// Create a node and attach it in one step.
    ///
    /// The insertion point is validated before the node is allocated, so a failed call
    /// leaves no orphan behind.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        side: Side,
        index: usize,
        content: NodeContent,
    ) -> Result<(NodeId, Invalidation), TreeError> {
        self.check_insertion(parent, side, index)?;
        let child = self.insert(content);
        let invalidation = self.add_child(parent, child, side, index)?;
        Ok((child, invalidation))
    }

    /// Create a node and append it to the end of a child list.
    pub fn push_child(
        &mut self,
        parent: NodeId,
        side: Side,
        content: NodeContent,
    ) -> Result<(NodeId, Invalidation), TreeError> {
        let p = self.get(parent)?;
        let index = p.list(side).len();
        self.insert_child(parent, side, index, content)
    }

    /// Create a node directly after `sibling`.
    pub fn insert_next_sibling(
        &mut self,
        sibling: NodeId,
        content: NodeContent,
    ) -> Result<(NodeId, Invalidation), TreeError> {
        let location = self.sibling_location(sibling)?;
        self.insert_child(location.parent, location.side, location.index + 1, content)
    }

    /// Create a node directly before `sibling`.
    pub fn insert_previous_sibling(
        &mut self,
        sibling: NodeId,
        content: NodeContent,
    ) -> Result<(NodeId, Invalidation), TreeError> {
        let location = self.sibling_location(sibling)?;
        self.insert_child(location.parent, location.side, location.index, content)
    }

    fn sibling_location(&self, sibling: NodeId) -> Result<Location, TreeError> {
        self.get(sibling)?;
        if sibling == self.root {
            return Err(TreeError::RootHasNoSiblings);
        }
        self.location_of(sibling).ok_or(TreeError::NoParent(sibling))
    }

    /// Detach `child` from `parent`, keeping its subtree intact.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownIdentifier`] if either id is stale.
    /// - [`TreeError::NotAChild`] if `child` is not in one of `parent`'s lists.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<Removal, TreeError> {
        self.get(parent)?;
        if self.get(child)?.parent != Some(parent) {
            return Err(TreeError::NotAChild { parent, child });
        }
        self.detach(child)
    }

    /// Detach a node from whichever list holds it, keeping its subtree intact.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownIdentifier`] if the id is stale.
    /// - [`TreeError::NoParent`] for the root and for nodes that are already detached.
    pub fn detach(&mut self, node: NodeId) -> Result<Removal, TreeError> {
        self.get(node)?;
        let location = self.location_of(node).ok_or(TreeError::NoParent(node))?;
        self.unlink(node, location);
        trace!(node:?, location:?; "Detached node");
        let invalidation = self.touch(&[location.parent]);
        Ok(Removal {
            node,
            location,
            invalidation,
        })
    }

    /// Re-attach a removed node where it used to be.
    pub fn restore(&mut self, removal: &Removal) -> Result<Invalidation, TreeError> {
        let Location {
            parent,
            side,
            index,
        } = removal.location;
        self.add_child(parent, removal.node, side, index)
    }

    /// Free a detached subtree. Its ids become stale.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownIdentifier`] if the id is stale.
    /// - [`TreeError::StillAttached`] for the root and for nodes that have a parent.
    pub fn discard(&mut self, node: NodeId) -> Result<(), TreeError> {
        if node == self.root || self.get(node)?.parent.is_some() {
            return Err(TreeError::StillAttached(node));
        }
        let doomed: Vec<NodeId> = self.subtree(node).collect();
        for id in &doomed {
            self.nodes[id.idx()] = None;
            self.free_list.push(id.idx());
        }
        trace!(node:?, count = doomed.len(); "Discarded subtree");
        Ok(())
    }

    /// Move a set of nodes relative to `target`.
    ///
    /// Nodes keep the order they are given in. A node whose ancestor is also in the set
    /// travels with that ancestor; duplicates are ignored.
    ///
    /// # Errors
    ///
    /// All preconditions are checked before anything moves:
    /// - [`TreeError::NothingToMove`] for an empty set.
    /// - [`TreeError::UnknownIdentifier`] / [`TreeError::NotAttached`] for stale or detached ids.
    /// - [`TreeError::CycleRejected`] if the target is one of the nodes or lies below one of
    ///   them, or if the root is in the set.
    /// - [`TreeError::OnlyRootHasSides`] for `Child(Side::Left)` on a non-root target.
    /// - [`TreeError::RootHasNoSiblings`] for sibling directions relative to the root.
    pub fn move_nodes(
        &mut self,
        nodes: &[NodeId],
        target: NodeId,
        direction: Direction,
    ) -> Result<Invalidation, TreeError> {
        let nodes = self.check_transfer(nodes, target, direction)?;
        let mut touched = Vec::with_capacity(nodes.len() * 2);
        for &id in &nodes {
            if let Some(location) = self.location_of(id) {
                self.unlink(id, location);
                touched.push(location.parent);
            }
        }
        let Location {
            parent,
            side,
            index,
        } = self.insertion_point(target, direction)?;
        for (offset, &id) in nodes.iter().enumerate() {
            self.link(
                id,
                Location {
                    parent,
                    side,
                    index: index + offset,
                },
            );
        }
        trace!(target:?, direction:?, count = nodes.len(); "Moved nodes");
        touched.extend(nodes.iter().copied());
        Ok(self.touch(&touched))
    }

    /// Deep-copy a set of nodes relative to `target`.
    ///
    /// Copies get fresh ids and keep content and fold state. Validation is identical to
    /// [`NodeTree::move_nodes`]. Returns the ids of the copies in insertion order.
    pub fn copy_nodes(
        &mut self,
        nodes: &[NodeId],
        target: NodeId,
        direction: Direction,
    ) -> Result<(Vec<NodeId>, Invalidation), TreeError> {
        let nodes = self.check_transfer(nodes, target, direction)?;
        let Location {
            parent,
            side,
            index,
        } = self.insertion_point(target, direction)?;
        let copies: Vec<NodeId> = nodes.iter().map(|&id| self.clone_subtree(id)).collect();
        for (offset, &id) in copies.iter().enumerate() {
            self.link(
                id,
                Location {
                    parent,
                    side,
                    index: index + offset,
                },
            );
        }
        trace!(target:?, direction:?, count = copies.len(); "Copied nodes");
        let invalidation = self.touch(&copies);
        Ok((copies, invalidation))
    }

    fn check_transfer(
        &self,
        nodes: &[NodeId],
        target: NodeId,
        direction: Direction,
    ) -> Result<Vec<NodeId>, TreeError> {
        if nodes.is_empty() {
            return Err(TreeError::NothingToMove);
        }
        self.get(target)?;
        if !self.is_attached(target) {
            return Err(TreeError::NotAttached(target));
        }
        for &id in nodes {
            self.get(id)?;
            if id == self.root {
                return Err(TreeError::CycleRejected);
            }
            if !self.is_attached(id) {
                return Err(TreeError::NotAttached(id));
            }
            if id == target || self.is_descendant(target, id) {
                return Err(TreeError::CycleRejected);
            }
        }
        match direction {
            Direction::Child(Side::Left) if target != self.root => {
                return Err(TreeError::OnlyRootHasSides);
            }
            Direction::NextSibling | Direction::PreviousSibling if target == self.root => {
                return Err(TreeError::RootHasNoSiblings);
            }
            _ => {}
        }

        let mut normalized: Vec<NodeId> = Vec::with_capacity(nodes.len());
        for &id in nodes {
            if normalized.contains(&id) {
                continue;
            }
            if nodes.iter().any(|&other| self.is_descendant(id, other)) {
                continue;
            }
            normalized.push(id);
        }
        Ok(normalized)
    }

    fn insertion_point(&self, target: NodeId, direction: Direction) -> Result<Location, TreeError> {
        match direction {
            Direction::Child(side) => Ok(Location {
                parent: target,
                side,
                index: 0,
            }),
            Direction::NextSibling => {
                let location = self.sibling_location(target)?;
                Ok(Location {
                    index: location.index + 1,
                    ..location
                })
            }
            Direction::PreviousSibling => self.sibling_location(target),
        }
    }

    fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let content = self.slot(id).content.clone();
        let children = self.slot(id).children.clone();
        let copy = self.allocate(content);
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.slot_mut(copy).children.push(child_copy);
            self.slot_mut(child_copy).parent = Some(copy);
        }
        copy
    }

    /// Flip the folded flag of a node.
    ///
    /// Children stay in the model; only their visibility to layout changes.
    pub fn toggle_fold(&mut self, node: NodeId) -> Result<Invalidation, TreeError> {
        let folded = !self.get(node)?.content.folded;
        self.set_folded(node, folded)
    }

    /// Set the folded flag of a node.
    pub fn set_folded(&mut self, node: NodeId, folded: bool) -> Result<Invalidation, TreeError> {
        trace!(node:?, folded; "Set folding");
        self.update_content(node, |c| c.folded = folded)
    }

    // --- content mutations ---

    /// Replace the text of a node.
    pub fn set_text(
        &mut self,
        node: NodeId,
        text: impl Into<String>,
    ) -> Result<Invalidation, TreeError> {
        let text = text.into();
        self.update_content(node, |c| c.text = text)
    }

    /// Replace the font override of a node.
    pub fn set_font(&mut self, node: NodeId, font: Option<Font>) -> Result<Invalidation, TreeError> {
        self.update_content(node, |c| c.font = font)
    }

    /// Append an icon code.
    pub fn push_icon(
        &mut self,
        node: NodeId,
        icon: impl Into<String>,
    ) -> Result<Invalidation, TreeError> {
        let icon = icon.into();
        self.update_content(node, |c| c.icons.push(icon))
    }

    /// Insert an icon code at `index`.
    pub fn insert_icon(
        &mut self,
        node: NodeId,
        index: usize,
        icon: impl Into<String>,
    ) -> Result<Invalidation, TreeError> {
        let len = self.get(node)?.content.icons.len();
        if index > len {
            return Err(TreeError::InvalidIndex { index, len });
        }
        let icon = icon.into();
        self.update_content(node, |c| c.icons.insert(index, icon))
    }

    /// Remove the icon code at `index`.
    pub fn remove_icon(&mut self, node: NodeId, index: usize) -> Result<Invalidation, TreeError> {
        let len = self.get(node)?.content.icons.len();
        if index >= len {
            return Err(TreeError::InvalidIndex { index, len });
        }
        self.update_content(node, |c| {
            c.icons.remove(index);
        })
    }

    /// Replace all icon codes.
    pub fn set_icons(&mut self, node: NodeId, icons: Vec<String>) -> Result<Invalidation, TreeError> {
        self.update_content(node, |c| c.icons = icons)
    }

    /// Remove all icon codes.
    pub fn clear_icons(&mut self, node: NodeId) -> Result<Invalidation, TreeError> {
        self.update_content(node, |c| c.icons.clear())
    }

    /// Replace the uninterpreted attributes of a node.
    pub fn set_attributes(
        &mut self,
        node: NodeId,
        attributes: Vec<(String, String)>,
    ) -> Result<Invalidation, TreeError> {
        self.update_content(node, |c| c.attributes = attributes)
    }

    /// Replace the unsupported substructures of a node.
    pub fn set_unsupported(
        &mut self,
        node: NodeId,
        unsupported: Vec<RawFragment>,
    ) -> Result<Invalidation, TreeError> {
        self.update_content(node, |c| c.unsupported = unsupported)
    }

    fn update_content(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut NodeContent),
    ) -> Result<Invalidation, TreeError> {
        self.get(node)?;
        f(&mut self.slot_mut(node).content);
        Ok(self.touch(&[node]))
    }

    // --- internals ---

    fn link(&mut self, id: NodeId, location: Location) {
        self.slot_mut(location.parent)
            .list_mut(location.side)
            .insert(location.index, id);
        self.slot_mut(id).parent = Some(location.parent);
    }

    fn unlink(&mut self, id: NodeId, location: Location) {
        self.slot_mut(location.parent)
            .list_mut(location.side)
            .remove(location.index);
        self.slot_mut(id).parent = None;
    }

    /// Bump the epoch and stamp the given nodes and all of their ancestors.
    ///
    /// A node stamped with the new epoch is already listed, so an ancestor walk stops at
    /// the first one it meets. Each node is visited once.
    fn touch(&mut self, ids: &[NodeId]) -> Invalidation {
        self.epoch += 1;
        let epoch = self.epoch;
        let mut invalidation = Invalidation::new();
        for &id in ids {
            if self.is_alive(id) && self.slot(id).revision != epoch {
                self.slot_mut(id).revision = epoch;
                invalidation.push_unique(id);
            }
        }
        for &id in ids {
            let mut current = self.parent_of(id);
            while let Some(parent) = current {
                let node = self.slot_mut(parent);
                if node.revision == epoch {
                    break;
                }
                node.revision = epoch;
                current = node.parent;
                invalidation.push_unique(parent);
            }
        }
        invalidation
    }
}

/// Pre-order iterator returned by [`NodeTree::subtree`].
#[derive(Debug)]
pub struct Subtree<'a> {
    tree: &'a NodeTree,
    stack: Vec<NodeId>,
}

impl Iterator for Subtree<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let node = self.tree.slot(id);
        self.stack.extend(node.left_children.iter().rev());
        self.stack.extend(node.children.iter().rev());
        Some(id)
    }
}
