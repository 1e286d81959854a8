// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Layout: geometry for mind maps.
//!
//! Turns a [`canopy_tree::NodeTree`] into concrete geometry: the size and origin of every
//! visible node, the bounding box of every family, and a cubic connector per edge. On top of
//! that geometry it answers the spatial queries an editor needs for pointer interaction.
//!
//! - [`LayoutEngine::ensure_current`] runs the two passes (bottom-up sizing, top-down
//!   placement) for whatever changed and returns a [`Damage`] summary.
//! - [`LayoutEngine::cell_at`], [`LayoutEngine::region_of`] and
//!   [`LayoutEngine::drop_direction`] resolve a pointer to a node and a drop gesture to a
//!   [`canopy_tree::Direction`].
//! - [`LayoutEngine::cell_with_identifier`] and [`LayoutEngine::traverse`] walk the visible
//!   cells by identity.
//!
//! Layout is a pure function of the tree, the [`LayoutSettings`] and the [`Measure`]
//! implementation; it never fails and never mutates the tree. Folded nodes keep their
//! children in the tree but those children get no cells.
//!
//! ## Incremental updates
//!
//! Cells remember the node revision they were computed from. A pass re-measures only cells
//! whose node changed, recomputes family sizes along the changed paths, and re-places the
//! visible cells. Explicit [`LayoutEngine::invalidate`] calls with the
//! [`canopy_tree::Invalidation`] returned by a mutation are supported but not required.
//!
//! ## Features
//!
//! - `std` (default) / `libm`: numeric backend for `kurbo`.
//! - `serde`: (de)serialize [`LayoutSettings`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cell;
mod damage;
mod engine;
mod measure;
mod settings;
mod spatial;
mod util;

pub use cell::Cell;
pub use damage::Damage;
pub use engine::LayoutEngine;
pub use measure::{FixedAdvance, Measure};
pub use settings::LayoutSettings;
pub use spatial::{DragRegion, Hit};
