// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size};

/// Returns `true` if the rectangles share interior area. Touching edges do not count.
pub(crate) fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Size of a vertical stack of boxes separated by `gap`.
pub(crate) fn stack_size(sizes: impl IntoIterator<Item = Size>, gap: f64) -> Size {
    let mut stack = Size::ZERO;
    let mut count = 0_usize;
    for size in sizes {
        stack.width = stack.width.max(size.width);
        stack.height += size.height;
        count += 1;
    }
    if count > 1 {
        stack.height += (count - 1) as f64 * gap;
    }
    stack
}

/// Midpoint of the vertical edge at `x` of a box.
pub(crate) fn side_midpoint(x: f64, frame: Rect) -> Point {
    Point::new(x, (frame.y0 + frame.y1) * 0.5)
}
