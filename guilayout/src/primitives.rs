//! Core primitive types for the layout engine.
//!
//! Geometry only: rectangles, sizes, points and the integer edge offsets used
//! for margins and padding. No layout logic lives here.

use serde::{Deserialize, Serialize};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Returned by reservations during the Layout pass, before anything is
    /// resolved.
    pub const PLACEHOLDER: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Get the right edge X coordinate.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge Y coordinate.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Move the left edge, keeping the right edge in place.
    #[inline]
    pub fn set_left(&mut self, left: f32) {
        let right = self.right();
        self.x = left;
        self.width = right - left;
    }

    /// Move the right edge, keeping the left edge in place.
    #[inline]
    pub fn set_right(&mut self, right: f32) {
        self.width = right - self.x;
    }

    /// Move the top edge, keeping the bottom edge in place.
    #[inline]
    pub fn set_top(&mut self, top: f32) {
        let bottom = self.bottom();
        self.y = top;
        self.height = bottom - top;
    }

    /// Move the bottom edge, keeping the top edge in place.
    #[inline]
    pub fn set_bottom(&mut self, bottom: f32) {
        self.height = bottom - self.y;
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

/// Integer offsets from each edge of a rectangle.
///
/// Used as a node's margin (distance to its siblings) and as a group style's
/// padding (distance from the group walls to its children).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RectOffset {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl RectOffset {
    pub const ZERO: Self = Self {
        left: 0,
        right: 0,
        top: 0,
        bottom: 0,
    };

    pub const fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self { left, right, top, bottom }
    }

    /// Uniform offset on all sides.
    pub const fn all(value: i32) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }

    /// Symmetric offset (horizontal, vertical).
    pub const fn symmetric(horizontal: i32, vertical: i32) -> Self {
        Self {
            left: horizontal,
            right: horizontal,
            top: vertical,
            bottom: vertical,
        }
    }

    /// Total horizontal offset.
    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Total vertical offset.
    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// Grow `rect` outward by these offsets.
    pub fn add(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x - self.left as f32,
            rect.y - self.top as f32,
            rect.width + self.horizontal() as f32,
            rect.height + self.vertical() as f32,
        )
    }

    /// Shrink `rect` inward by these offsets.
    pub fn remove(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x + self.left as f32,
            rect.y + self.top as f32,
            rect.width - self.horizontal() as f32,
            rect.height - self.vertical() as f32,
        )
    }
}
