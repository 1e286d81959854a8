// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary types returned from a layout pass.

use alloc::vec::Vec;
use kurbo::Rect;

/// Rectangles whose contents changed during [`crate::LayoutEngine::ensure_current`].
///
/// For every cell whose frame moved or resized, both the old and the new frame are listed.
/// Cells that appeared contribute their new frame, cells that disappeared (removed or folded
/// away) their old one. Connectors are not tracked separately; they lie within the family
/// box of their parent.
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// Rectangles that should be repainted.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    pub(crate) fn push(&mut self, rect: Rect) {
        if rect.width() > 0.0 && rect.height() > 0.0 {
            self.dirty_rects.push(rect);
        }
    }

    /// Returns `true` if nothing needs repainting.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }
}
