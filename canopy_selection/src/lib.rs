// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Selection: which nodes are selected, dragged and targeted.
//!
//! [`Selection`] keeps an insertion-ordered set of selected keys, a frozen snapshot of the
//! keys being dragged, the current drop target and the key hit by the last pointer press.
//! It is generic over the key type and knows nothing about geometry or the tree; callers
//! keep it consistent with the document by removing keys before deleting their nodes (or by
//! calling [`Selection::retain`] afterwards).
//!
//! ## Usage
//!
//! ```
//! use canopy_selection::{Modifiers, Selection};
//!
//! let mut selection: Selection<u32> = Selection::new();
//! selection.add(1, Modifiers::empty());
//! selection.add(2, Modifiers::SHIFT);
//! assert_eq!(selection.iter().copied().collect::<Vec<_>>(), [1, 2]);
//!
//! // Without a modifier, adding replaces.
//! selection.add(3, Modifiers::empty());
//! assert_eq!(selection.len(), 1);
//!
//! // Dragging freezes the selection.
//! selection.begin_drag();
//! selection.add(4, Modifiers::COMMAND);
//! assert!(selection.is_being_dragged(&3));
//! assert!(!selection.is_being_dragged(&4));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::hash::Hash;

use bitflags::bitflags;
use hashbrown::DefaultHashBuilder;
use indexmap::IndexSet;

bitflags! {
    /// Keyboard modifiers held during a selection gesture.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 1 << 0;
        /// Command (macOS) or Control key.
        const COMMAND = 1 << 1;
    }
}

impl Modifiers {
    /// Returns `true` if the gesture extends the selection instead of replacing it.
    pub fn extends(self) -> bool {
        self.intersects(Self::SHIFT | Self::COMMAND)
    }
}

/// Selection and drag state for one editor view.
#[derive(Clone, Debug)]
pub struct Selection<K> {
    selected: IndexSet<K, DefaultHashBuilder>,
    dragged: Vec<K>,
    drag_target: Option<K>,
    mouse_down_hit: Option<K>,
}

impl<K> Default for Selection<K> {
    fn default() -> Self {
        Self {
            selected: IndexSet::with_hasher(DefaultHashBuilder::default()),
            dragged: Vec::new(),
            drag_target: None,
            mouse_down_hit: None,
        }
    }
}

impl<K> Selection<K> {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selected keys.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The key at `index` in selection order.
    pub fn get(&self, index: usize) -> Option<&K> {
        self.selected.get_index(index)
    }

    /// The earliest selected key.
    pub fn first(&self) -> Option<&K> {
        self.selected.first()
    }

    /// The most recently selected key.
    pub fn last(&self) -> Option<&K> {
        self.selected.last()
    }

    /// Selected keys in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.selected.iter()
    }

    /// Empty the selection and forget the drop target.
    ///
    /// A running drag keeps its snapshot until [`Selection::end_drag`].
    pub fn clear(&mut self) {
        self.selected.clear();
        self.drag_target = None;
    }

    /// Keys frozen by the last [`Selection::begin_drag`], in selection order.
    pub fn dragged(&self) -> &[K] {
        &self.dragged
    }

    /// Returns `true` while a drag is running.
    pub fn is_dragging(&self) -> bool {
        !self.dragged.is_empty()
    }

    /// The cell currently under a drag, if any.
    pub fn drag_target(&self) -> Option<&K> {
        self.drag_target.as_ref()
    }

    /// Set or clear the drop target.
    pub fn set_drag_target(&mut self, target: Option<K>) {
        self.drag_target = target;
    }

    /// The key hit by the last pointer press.
    pub fn mouse_down_hit(&self) -> Option<&K> {
        self.mouse_down_hit.as_ref()
    }

    /// Record the key under a pointer press (`None` for a press on the background).
    pub fn set_mouse_down_hit(&mut self, hit: Option<K>) {
        self.mouse_down_hit = hit;
    }

    /// Finish a drag: returns the dragged keys and clears the drop target.
    pub fn end_drag(&mut self) -> Vec<K> {
        self.drag_target = None;
        core::mem::take(&mut self.dragged)
    }
}

impl<K: Hash + Eq + Clone> Selection<K> {
    /// Select `key`.
    ///
    /// With an extending modifier the key is appended (an already selected key keeps its
    /// position); otherwise the selection becomes exactly `{key}`.
    pub fn add(&mut self, key: K, modifiers: Modifiers) {
        if !modifiers.extends() {
            self.selected.clear();
        }
        self.selected.insert(key);
    }

    /// Deselect `key`, keeping the order of the rest. Returns `true` if it was selected.
    ///
    /// The modifiers do not change the outcome; they are accepted so gesture handlers can
    /// forward them unchanged.
    pub fn remove(&mut self, key: &K, _modifiers: Modifiers) -> bool {
        self.selected.shift_remove(key)
    }

    /// Select `key` if it is not selected, deselect it otherwise, leaving the rest alone.
    pub fn toggle(&mut self, key: K) {
        if !self.selected.shift_remove(&key) {
            self.selected.insert(key);
        }
    }

    /// Returns `true` if `key` is selected.
    pub fn contains(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// Freeze the current selection as the dragged set.
    pub fn begin_drag(&mut self) {
        self.dragged = self.selected.iter().cloned().collect();
    }

    /// Returns `true` if `key` was selected when the running drag began.
    pub fn is_being_dragged(&self, key: &K) -> bool {
        self.dragged.contains(key)
    }

    /// Drop every key for which `keep` returns `false` from the selection, the drag snapshot,
    /// the drop target and the press record.
    ///
    /// Hosts call this after deleting nodes.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.selected.retain(|k| keep(k));
        self.dragged.retain(|k| keep(k));
        if self.drag_target.as_ref().is_some_and(|k| !keep(k)) {
            self.drag_target = None;
        }
        if self.mouse_down_hit.as_ref().is_some_and(|k| !keep(k)) {
            self.mouse_down_hit = None;
        }
    }
}
