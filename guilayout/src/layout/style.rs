//! The style handle each node owns.
//!
//! Only the parts of a visual style that influence sizing live here: margin,
//! padding, fixed sizes and stretch defaults. Colors, fonts and borders are
//! the renderer's business.

use serde::{Deserialize, Serialize};

use super::constraints::Axis;
use crate::primitives::RectOffset;

/// What kind of style a node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleKind {
    /// Transparent: a group forwards its children's edge margins outward.
    #[default]
    None,
    /// Spacer marker: skips margin collapsing so `space(1)` adds one pixel.
    Space,
    /// A drawn box: margins are resolved against the padding.
    Visual,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutStyle {
    pub kind: StyleKind,
    pub margin: RectOffset,
    pub padding: RectOffset,
    /// Non-zero pins the width regardless of content or options.
    pub fixed_width: f32,
    pub fixed_height: f32,
    pub stretch_width: bool,
    pub stretch_height: bool,
    /// Content height depends on the resolved width.
    pub word_wrap: bool,
}

impl LayoutStyle {
    pub const NONE: Self = Self {
        kind: StyleKind::None,
        margin: RectOffset::ZERO,
        padding: RectOffset::ZERO,
        fixed_width: 0.0,
        fixed_height: 0.0,
        stretch_width: false,
        stretch_height: false,
        word_wrap: false,
    };

    /// Used internally for `space()` entries.
    pub const SPACE: Self = Self {
        kind: StyleKind::Space,
        ..Self::NONE
    };

    /// A transparent style.
    pub const fn none() -> Self {
        Self::NONE
    }

    /// A visual style with no margin or padding yet.
    pub const fn visual() -> Self {
        Self {
            kind: StyleKind::Visual,
            ..Self::NONE
        }
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn margin(mut self, margin: RectOffset) -> Self {
        self.margin = margin;
        self
    }

    pub fn padding(mut self, padding: RectOffset) -> Self {
        self.padding = padding;
        self
    }

    pub fn fixed_width(mut self, width: f32) -> Self {
        self.fixed_width = width;
        self
    }

    pub fn fixed_height(mut self, height: f32) -> Self {
        self.fixed_height = height;
        self
    }

    pub fn stretch_width(mut self, stretch: bool) -> Self {
        self.stretch_width = stretch;
        self
    }

    pub fn stretch_height(mut self, stretch: bool) -> Self {
        self.stretch_height = stretch;
        self
    }

    pub fn word_wrap(mut self, wrap: bool) -> Self {
        self.word_wrap = wrap;
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    pub fn is_space(&self) -> bool {
        self.kind == StyleKind::Space
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.kind == StyleKind::None
    }

    /// The fixed size on `axis`, 0 when unset.
    #[inline]
    pub fn fixed(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.fixed_width,
            Axis::Vertical => self.fixed_height,
        }
    }

    /// Default stretch weight for nodes created with this style. A fixed size
    /// on the axis cancels the stretch flag.
    #[inline]
    pub fn default_stretch(&self, axis: Axis) -> f32 {
        let flag = match axis {
            Axis::Horizontal => self.stretch_width,
            Axis::Vertical => self.stretch_height,
        };
        if flag && self.fixed(axis) == 0.0 { 1.0 } else { 0.0 }
    }
}
