// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Tree: the document model of a mind map.
//!
//! A mind map is a rooted tree whose root splits its children into a left and a right list.
//! Every other node has a single, ordered child list and inherits its side from the root
//! child it descends from.
//!
//! - Nodes live in a generational arena and are addressed by copyable [`NodeId`]s.
//! - Structural mutations validate every precondition before touching state, so an `Err`
//!   means nothing changed.
//! - Every mutation returns an [`Invalidation`] naming the nodes whose geometry went stale
//!   (touched nodes and all of their ancestors). Layout engines consume it; see
//!   `canopy_layout`.
//! - Removed subtrees stay live until [discarded](NodeTree::discard), so they can be
//!   re-attached by an undo history. [`Edit`] packages operations with their inverses.
//!
//! ## API overview
//!
//! - [`NodeTree::new`], [`NodeTree::insert`], [`NodeTree::add_child`] and the convenience
//!   constructors [`NodeTree::push_child`], [`NodeTree::insert_next_sibling`],
//!   [`NodeTree::insert_previous_sibling`].
//! - [`NodeTree::remove_child`] / [`NodeTree::restore`] / [`NodeTree::discard`].
//! - [`NodeTree::move_nodes`] and [`NodeTree::copy_nodes`] with a [`Direction`].
//! - [`NodeTree::toggle_fold`] and the content setters ([`NodeTree::set_text`],
//!   [`NodeTree::set_font`], icon mutators).
//! - Queries: [`NodeTree::is_descendant`], [`NodeTree::side_of`], [`NodeTree::location_of`],
//!   [`NodeTree::subtree`], [`NodeTree::next_depth_first`] / [`NodeTree::prev_depth_first`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod edit;
mod error;
mod invalidation;
mod tree;
mod types;

pub use edit::{Applied, Edit};
pub use error::TreeError;
pub use invalidation::Invalidation;
pub use tree::{Node, NodeTree, Removal, Subtree};
pub use types::{Direction, Font, Location, NodeContent, NodeId, RawFragment, Side};
