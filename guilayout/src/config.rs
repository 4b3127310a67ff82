//! Engine configuration.
//!
//! Everything the solver needs from the skin that is not per-control:
//! scrollbar metrics, the minimum scroll viewport, and the indentation and
//! prefix-label conventions. Loadable from JSON; missing fields take the
//! defaults below.

use serde::{Deserialize, Serialize};

use crate::error::LayoutResult;
use crate::indent::LabelSide;

/// Size a scrollbar takes away from the content viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarMetrics {
    /// Bar thickness across the scrolling direction.
    pub thickness: f32,
    /// Gap between the bar and the content.
    pub margin: f32,
}

impl Default for ScrollbarMetrics {
    fn default() -> Self {
        Self {
            thickness: 15.0,
            margin: 1.0,
        }
    }
}

impl ScrollbarMetrics {
    /// Total space reserved when the bar is shown.
    #[inline]
    pub fn reserve(&self) -> f32 {
        self.thickness + self.margin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub horizontal_scrollbar: ScrollbarMetrics,
    pub vertical_scrollbar: ScrollbarMetrics,
    /// A scroll view never asks its parent for more than this as its
    /// minimum on a scrollable axis, unless the caller sets a minimum.
    pub min_scroll_viewport: f32,
    /// Pixels per indent level.
    pub indent_width: f32,
    pub prefix_label_width: f32,
    pub prefix_label_side: LabelSide,
    /// Label extent used when labels sit above or below their control.
    pub label_line_height: f32,
    /// Fade toggles progress this much per second.
    pub fade_speed: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_scrollbar: ScrollbarMetrics::default(),
            vertical_scrollbar: ScrollbarMetrics::default(),
            min_scroll_viewport: 32.0,
            indent_width: 16.0,
            prefix_label_width: 100.0,
            prefix_label_side: LabelSide::Left,
            label_line_height: crate::measure::LINE_HEIGHT,
            fade_speed: 2.5,
        }
    }
}

impl LayoutConfig {
    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> LayoutResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> LayoutResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
