// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invalidation summaries returned from mutations.

use smallvec::SmallVec;

use crate::types::NodeId;

/// The nodes whose geometry a mutation made stale.
///
/// Touched nodes come first, followed by their ancestors up to the root. Each id
/// appears once. Layout engines mark the corresponding cells dirty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Invalidation {
    nodes: SmallVec<[NodeId; 8]>,
}

impl Invalidation {
    /// An empty invalidation.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, id: NodeId) {
        if !self.nodes.contains(&id) {
            self.nodes.push(id);
        }
    }

    /// Append an id the caller knows is not listed yet.
    pub(crate) fn push_unique(&mut self, id: NodeId) {
        debug_assert!(!self.nodes.contains(&id), "{id:?} listed twice");
        self.nodes.push(id);
    }

    /// Merge another invalidation into this one, keeping first-seen order.
    pub fn extend(&mut self, other: &Self) {
        for &id in &other.nodes {
            self.push(id);
        }
    }

    /// The affected nodes.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Returns `true` if the id is part of this invalidation.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Returns `true` if nothing was invalidated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of affected nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
