// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edit commands with inverses, for hosts that keep an undo history.
//!
//! Every [`Edit`] is a plain value describing one forward operation. Applying it returns the
//! [`Edit`] that undoes it, so an undo manager only has to store pairs and never needs to
//! reach into the tree itself.

use alloc::string::String;
use alloc::vec::Vec;
use log::debug;

use crate::error::TreeError;
use crate::invalidation::Invalidation;
use crate::tree::NodeTree;
use crate::types::{Direction, Font, Location, NodeContent, NodeId};

/// A forward operation on a [`NodeTree`].
#[derive(Clone, Debug, PartialEq)]
pub enum Edit {
    /// Attach a detached node at a location.
    Attach {
        /// The node to attach.
        node: NodeId,
        /// Where to attach it.
        location: Location,
    },
    /// Detach nodes from their parents, keeping their subtrees live.
    Detach {
        /// The nodes to detach.
        nodes: Vec<NodeId>,
    },
    /// Move nodes relative to a target. See [`NodeTree::move_nodes`].
    Move {
        /// Nodes to move.
        nodes: Vec<NodeId>,
        /// Reference node.
        target: NodeId,
        /// Placement relative to `target`.
        direction: Direction,
    },
    /// Copy nodes relative to a target. See [`NodeTree::copy_nodes`].
    Copy {
        /// Nodes to copy.
        nodes: Vec<NodeId>,
        /// Reference node.
        target: NodeId,
        /// Placement relative to `target`.
        direction: Direction,
    },
    /// Put nodes at exact locations.
    ///
    /// Every listed node is detached first; the ones with a location are then attached in
    /// ascending index order, the others stay detached. This is the inverse recorded for
    /// detaches and moves. Ids are validated up front, but an index that only turns out to be
    /// out of bounds once earlier placements are done leaves the tree partially relocated.
    Relocate {
        /// Nodes and their destinations.
        placements: Vec<(NodeId, Option<Location>)>,
    },
    /// Replace a node's text.
    SetText {
        /// The node.
        node: NodeId,
        /// New text.
        text: String,
    },
    /// Replace a node's font override.
    SetFont {
        /// The node.
        node: NodeId,
        /// New font override.
        font: Option<Font>,
    },
    /// Replace a node's icon codes.
    SetIcons {
        /// The node.
        node: NodeId,
        /// New icon codes.
        icons: Vec<String>,
    },
    /// Set a node's folded flag.
    SetFolded {
        /// The node.
        node: NodeId,
        /// New fold state.
        folded: bool,
    },
}

/// The outcome of [`Edit::apply`].
#[derive(Clone, Debug, PartialEq)]
pub struct Applied {
    /// Applying this edit restores the state before the forward edit.
    pub inverse: Edit,
    /// Nodes whose geometry went stale.
    pub invalidation: Invalidation,
}

impl Edit {
    /// Apply this edit to `tree`.
    ///
    /// # Errors
    ///
    /// Propagates the [`TreeError`] of the underlying tree operation. Apart from the caveat
    /// documented on [`Edit::Relocate`], a failed edit leaves the tree unchanged.
    pub fn apply(self, tree: &mut NodeTree) -> Result<Applied, TreeError> {
        let applied = match self {
            Self::Attach { node, location } => {
                let invalidation =
                    tree.add_child(location.parent, node, location.side, location.index)?;
                Applied {
                    inverse: Self::Detach { nodes: [node].into() },
                    invalidation,
                }
            }
            Self::Detach { nodes } => {
                for &id in &nodes {
                    if tree.location_of(id).is_none() {
                        tree.node(id).ok_or(TreeError::UnknownIdentifier(id))?;
                        return Err(TreeError::NoParent(id));
                    }
                }
                relocate(tree, nodes.iter().map(|&id| (id, None)).collect())?
            }
            Self::Move {
                nodes,
                target,
                direction,
            } => {
                let before = current_locations(tree, &nodes)?;
                let invalidation = tree.move_nodes(&nodes, target, direction)?;
                Applied {
                    inverse: Self::Relocate { placements: before },
                    invalidation,
                }
            }
            Self::Copy {
                nodes,
                target,
                direction,
            } => {
                let (copies, invalidation) = tree.copy_nodes(&nodes, target, direction)?;
                Applied {
                    inverse: Self::Detach { nodes: copies },
                    invalidation,
                }
            }
            Self::Relocate { placements } => relocate(tree, placements)?,
            Self::SetText { node, text } => {
                let old = content_of(tree, node)?.text.clone();
                Applied {
                    invalidation: tree.set_text(node, text)?,
                    inverse: Self::SetText { node, text: old },
                }
            }
            Self::SetFont { node, font } => {
                let old = content_of(tree, node)?.font.clone();
                Applied {
                    invalidation: tree.set_font(node, font)?,
                    inverse: Self::SetFont { node, font: old },
                }
            }
            Self::SetIcons { node, icons } => {
                let old = content_of(tree, node)?.icons.clone();
                Applied {
                    invalidation: tree.set_icons(node, icons)?,
                    inverse: Self::SetIcons { node, icons: old },
                }
            }
            Self::SetFolded { node, folded } => {
                let old = content_of(tree, node)?.folded;
                Applied {
                    invalidation: tree.set_folded(node, folded)?,
                    inverse: Self::SetFolded { node, folded: old },
                }
            }
        };
        debug!(touched = applied.invalidation.len(); "Applied edit");
        Ok(applied)
    }
}

fn content_of(tree: &NodeTree, node: NodeId) -> Result<&NodeContent, TreeError> {
    tree.node(node)
        .map(|n| n.content())
        .ok_or(TreeError::UnknownIdentifier(node))
}

fn current_locations(
    tree: &NodeTree,
    nodes: &[NodeId],
) -> Result<Vec<(NodeId, Option<Location>)>, TreeError> {
    let mut placements: Vec<(NodeId, Option<Location>)> = Vec::with_capacity(nodes.len());
    for &id in nodes {
        tree.node(id).ok_or(TreeError::UnknownIdentifier(id))?;
        if placements.iter().all(|&(seen, _)| seen != id) {
            placements.push((id, tree.location_of(id)));
        }
    }
    Ok(placements)
}

fn relocate(
    tree: &mut NodeTree,
    placements: Vec<(NodeId, Option<Location>)>,
) -> Result<Applied, TreeError> {
    for &(id, location) in &placements {
        tree.node(id).ok_or(TreeError::UnknownIdentifier(id))?;
        if let Some(location) = location {
            tree.node(location.parent)
                .ok_or(TreeError::UnknownIdentifier(location.parent))?;
        }
    }
    let ids: Vec<NodeId> = placements.iter().map(|&(id, _)| id).collect();
    let before = current_locations(tree, &ids)?;

    let mut invalidation = Invalidation::new();
    for &(id, _) in &before {
        if tree.parent_of(id).is_some() {
            invalidation.extend(&tree.detach(id)?.invalidation);
        }
    }

    let mut targets: Vec<(NodeId, Location)> = placements
        .into_iter()
        .filter_map(|(id, location)| location.map(|l| (id, l)))
        .collect();
    targets.sort_by_key(|&(_, location)| location.index);
    for (id, location) in targets {
        let inv = tree.add_child(location.parent, id, location.side, location.index)?;
        invalidation.extend(&inv);
    }

    Ok(Applied {
        inverse: Edit::Relocate { placements: before },
        invalidation,
    })
}
