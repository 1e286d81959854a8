// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by tree mutations.

use thiserror::Error;

use crate::types::NodeId;

/// Why a tree operation was rejected.
///
/// Every operation validates all of its preconditions before touching the tree,
/// so receiving an error means nothing changed.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TreeError {
    /// An insertion or removal index past the end of the list.
    #[error("index {index} is out of bounds for a list of {len} children")]
    InvalidIndex {
        /// The requested index.
        index: usize,
        /// The length of the list at the time of the request.
        len: usize,
    },
    /// A left-side operation on a node that is not the root.
    #[error("only the root node has a left side")]
    OnlyRootHasSides,
    /// The operation would make a node its own ancestor, or targets one of the nodes it moves.
    #[error("a node cannot be moved or copied into itself or one of its descendants")]
    CycleRejected,
    /// The id does not refer to a live node.
    #[error("no live node for {0:?}")]
    UnknownIdentifier(NodeId),
    /// A sibling operation relative to the root.
    #[error("the root node has no siblings")]
    RootHasNoSiblings,
    /// Attaching a node that already has a parent, or that is the root.
    #[error("{0:?} is already attached")]
    StillAttached(NodeId),
    /// The node is not reachable from the root.
    #[error("{0:?} is not attached to the tree")]
    NotAttached(NodeId),
    /// The node has no parent to be removed from (the root, or an already detached node).
    #[error("{0:?} has no parent")]
    NoParent(NodeId),
    /// The node is not a direct child of the given parent.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The presumed parent.
        parent: NodeId,
        /// The presumed child.
        child: NodeId,
    },
    /// A move or copy with an empty set of nodes.
    #[error("no nodes to move or copy")]
    NothingToMove,
}
