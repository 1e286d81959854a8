// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement.

use canopy_tree::Font;
use kurbo::Size;

/// Measures the block a text occupies when wrapped to a maximum width.
///
/// Hosts plug their text shaping in here. The engine calls it once per re-measured cell and
/// expects a pure function: equal inputs must give equal sizes, otherwise layout is no
/// longer idempotent.
pub trait Measure {
    /// The size of `text` in `font` (`None` for the default font), wrapped at `max_width`.
    fn text_size(&self, text: &str, font: Option<&Font>, max_width: f64) -> Size;
}

impl<M: Measure + ?Sized> Measure for &M {
    fn text_size(&self, text: &str, font: Option<&Font>, max_width: f64) -> Size {
        (**self).text_size(text, font, max_width)
    }
}

/// A measurer that assumes every character has the same advance.
///
/// Words wrap greedily; a word longer than a line is broken between characters. Explicit
/// newlines always start a new line. Useful for tests and headless tooling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    /// Point size used when a node has no font override.
    pub default_font_size: f64,
    /// Character advance as a multiple of the point size.
    pub advance: f64,
    /// Line height as a multiple of the point size.
    pub line_height: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self {
            default_font_size: 12.0,
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl Measure for FixedAdvance {
    fn text_size(&self, text: &str, font: Option<&Font>, max_width: f64) -> Size {
        let font_size = font.map_or(self.default_font_size, |f| f.size);
        let advance = font_size * self.advance;
        if text.is_empty() || advance <= 0.0 {
            return Size::ZERO;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Whole characters per line; the width is small and non-negative."
        )]
        let max_chars = ((max_width / advance) as usize).max(1);

        let mut lines = 0;
        let mut widest = 0;
        for paragraph in text.split('\n') {
            let (n, width) = wrap(paragraph, max_chars);
            lines += n;
            widest = widest.max(width);
        }
        Size::new(
            widest as f64 * advance,
            lines as f64 * font_size * self.line_height,
        )
    }
}

/// Returns `(line count, widest line in chars)` for one paragraph.
fn wrap(paragraph: &str, max_chars: usize) -> (usize, usize) {
    let mut lines = 1;
    let mut current = 0;
    let mut widest = 0;
    for word in paragraph.split_whitespace() {
        let mut len = word.chars().count();
        let needed = if current == 0 { len } else { current + 1 + len };
        if needed <= max_chars {
            current = needed;
            continue;
        }
        if current > 0 {
            widest = widest.max(current);
            lines += 1;
        }
        while len > max_chars {
            widest = max_chars;
            lines += 1;
            len -= max_chars;
        }
        current = len;
    }
    (lines, widest.max(current))
}
