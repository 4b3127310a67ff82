//! Content measurement.
//!
//! The engine never shapes text itself. Reservations that size to content ask
//! a [`ContentMeasure`] for intrinsic sizes. [`MonospaceMeasure`] is a
//! grid-cell approximation good enough for terminals, tests and tooling.

use unicode_width::UnicodeWidthChar;

use crate::layout::style::LayoutStyle;
use crate::primitives::Size;

/// Width of one monospace cell at the base font size.
pub const CHAR_WIDTH: f32 = 8.4;

/// Height of one line of text.
pub const LINE_HEIGHT: f32 = 18.0;

/// Intrinsic sizing of content drawn with a style.
///
/// All results include the style's padding.
pub trait ContentMeasure {
    /// Natural size of `text`. A non-zero `max.width` wraps the text to fit;
    /// a non-zero `max.height` caps the height.
    fn size(&self, style: &LayoutStyle, text: &str, max: Size) -> Size;

    /// Narrowest usable width (the longest unbreakable word) and natural
    /// width (the longest line).
    fn min_max_width(&self, style: &LayoutStyle, text: &str) -> (f32, f32);

    /// Height of `text` wrapped to `width`.
    fn height_for_width(&self, style: &LayoutStyle, text: &str, width: f32) -> f32;
}

/// Display width of `text` in terminal columns.
#[inline]
pub(crate) fn unicode_display_width(text: &str) -> f32 {
    text.chars()
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0) as f32)
        .sum()
}

/// Fixed-cell measurer using `unicode-width` column counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            char_width: CHAR_WIDTH,
            line_height: LINE_HEIGHT,
        }
    }
}

impl MonospaceMeasure {
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self { char_width, line_height }
    }

    /// Number of lines after greedy word wrapping at `max_cols` columns.
    /// Words longer than a line are left unbroken.
    fn wrapped_lines(text: &str, max_cols: f32) -> usize {
        let mut lines = 0;
        for paragraph in text.split('\n') {
            lines += 1;
            let mut line = 0.0f32;
            let mut empty = true;
            for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
                let w = unicode_display_width(word);
                if empty {
                    line = w;
                    empty = false;
                } else if line + 1.0 + w <= max_cols {
                    line += 1.0 + w;
                } else {
                    lines += 1;
                    line = w;
                }
            }
        }
        lines
    }

    fn longest_line(text: &str) -> f32 {
        text.split('\n').map(unicode_display_width).fold(0.0, f32::max)
    }

    fn longest_word(text: &str) -> f32 {
        text.split(['\n', ' ']).map(unicode_display_width).fold(0.0, f32::max)
    }
}

impl ContentMeasure for MonospaceMeasure {
    fn size(&self, style: &LayoutStyle, text: &str, max: Size) -> Size {
        let pad_w = style.padding.horizontal() as f32;
        let pad_h = style.padding.vertical() as f32;
        let lines = text.split('\n').count() as f32;

        let mut width = Self::longest_line(text) * self.char_width + pad_w;
        let mut height = lines * self.line_height + pad_h;

        if max.width > 0.0 && width > max.width {
            width = max.width;
            height = self.height_for_width(style, text, width);
        }
        if max.height > 0.0 {
            height = height.min(max.height);
        }
        if style.fixed_width != 0.0 {
            width = style.fixed_width;
        }
        if style.fixed_height != 0.0 {
            height = style.fixed_height;
        }
        Size::new(width, height)
    }

    fn min_max_width(&self, style: &LayoutStyle, text: &str) -> (f32, f32) {
        if style.fixed_width != 0.0 {
            return (style.fixed_width, style.fixed_width);
        }
        let pad = style.padding.horizontal() as f32;
        (
            Self::longest_word(text) * self.char_width + pad,
            Self::longest_line(text) * self.char_width + pad,
        )
    }

    fn height_for_width(&self, style: &LayoutStyle, text: &str, width: f32) -> f32 {
        if style.fixed_height != 0.0 {
            return style.fixed_height;
        }
        let inner = width - style.padding.horizontal() as f32;
        let max_cols = (inner / self.char_width).floor().max(1.0);
        Self::wrapped_lines(text, max_cols) as f32 * self.line_height + style.padding.vertical() as f32
    }
}
