//! Indentation and prefix-label geometry.
//!
//! Controls may carry a prefix label on one side. The label takes
//! `label_width` pixels along that side; indentation shifts both by
//! `level * indent_width`. When the label runs along the open group's
//! stacking axis it cannot be carved out of the control's rect, so a spacer
//! of the label's width is reserved in front of the control instead.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::{LayoutError, LayoutResult};
use crate::primitives::Rect;

/// Which controls indentation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentPolicy {
    /// Only labelled controls.
    Label,
    /// Labelled and unlabelled controls.
    #[default]
    Widgets,
    /// Every control is prefixed, with or without a label.
    Full,
    /// No indentation.
    None,
    /// Keep the enclosing policy. Only meaningful for `begin_indent`.
    Inherit,
}

/// Side of the control a prefix label sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSide {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
    /// Keep the enclosing side. Only meaningful for `begin_label_option`.
    Inherit,
}

impl LabelSide {
    /// Labels above or below stack vertically with their control.
    #[inline]
    pub fn is_stacked(self) -> bool {
        matches!(self, LabelSide::Top | LabelSide::Bottom)
    }
}

/// Result of prefixing a control's rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrefixPlan {
    /// Where the control goes.
    pub rect: Rect,
    /// Spacer to reserve before the control, when the label could not be
    /// carved out of its rect.
    pub space: Option<f32>,
}

/// Indent level, policy and prefix-label settings with their save stacks.
#[derive(Debug, Clone)]
pub struct IndentState {
    level: u32,
    policy: IndentPolicy,
    label_width: f32,
    label_side: LabelSide,
    indent_width: f32,
    label_line_height: f32,
    defaults: (f32, LabelSide),
    indents: Vec<(u32, IndentPolicy)>,
    labels: Vec<(f32, LabelSide)>,
}

impl IndentState {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            level: 0,
            policy: IndentPolicy::Widgets,
            label_width: config.prefix_label_width,
            label_side: config.prefix_label_side,
            indent_width: config.indent_width,
            label_line_height: config.label_line_height,
            defaults: (config.prefix_label_width, config.prefix_label_side),
            indents: Vec::new(),
            labels: Vec::new(),
        }
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn policy(&self) -> IndentPolicy {
        self.policy
    }

    #[inline]
    pub fn label_width(&self) -> f32 {
        self.label_width
    }

    #[inline]
    pub fn label_side(&self) -> LabelSide {
        self.label_side
    }

    /// Current indentation in pixels.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.level as f32 * self.indent_width
    }

    /// Push the current settings and indent. `None` goes one level deeper;
    /// `Some(level)` sets the level outright.
    pub fn begin_indent(&mut self, level: Option<u32>, policy: IndentPolicy) {
        self.indents.push((self.level, self.policy));
        self.level = level.unwrap_or(self.level + 1);
        if policy != IndentPolicy::Inherit {
            self.policy = policy;
        }
    }

    pub fn end_indent(&mut self) -> LayoutResult<()> {
        let (level, policy) = self.indents.pop().ok_or(LayoutError::NoOpenGroup)?;
        self.level = level;
        self.policy = policy;
        Ok(())
    }

    /// Push the current label settings and override them. Labels above or
    /// below a control default to one line of text in height.
    pub fn begin_label_option(&mut self, width: Option<f32>, side: LabelSide) {
        self.labels.push((self.label_width, self.label_side));
        if side != LabelSide::Inherit {
            self.label_side = side;
        }
        self.label_width = match width {
            Some(w) => w.max(0.0),
            None if side.is_stacked() => self.label_line_height,
            None => self.label_width,
        };
    }

    pub fn end_label_option(&mut self) -> LayoutResult<()> {
        let (width, side) = self.labels.pop().ok_or(LayoutError::NoOpenGroup)?;
        self.label_width = width;
        self.label_side = side;
        Ok(())
    }

    /// Open indent and label scopes.
    pub fn depths(&self) -> (usize, usize) {
        (self.indents.len(), self.labels.len())
    }

    /// Shift `rect`'s left edge by the indentation, as the policy says.
    pub fn indent_rect(&self, mut rect: Rect, ignore_policy: bool) -> Rect {
        if ignore_policy || self.policy == IndentPolicy::Widgets {
            rect.set_left(rect.x + self.offset());
        } else if self.policy == IndentPolicy::Full {
            rect.set_left(rect.x + self.label_width);
        }
        rect
    }

    /// Whether the label would run along the stacking axis of a group with
    /// the given direction, so it has to be carved out of the control.
    #[inline]
    fn eats(&self, is_vertical: bool) -> bool {
        is_vertical != self.label_side.is_stacked()
    }

    /// Where a prefix label for `total` is drawn.
    ///
    /// `container` is the open group's content rect and `container_unpacked`
    /// the same rect with padding included.
    pub fn label_rect(&self, total: Rect, is_vertical: bool, container: Rect, container_unpacked: Rect) -> Rect {
        let eats = self.eats(is_vertical);
        let indent = if self.policy == IndentPolicy::None { 0.0 } else { self.offset() };
        let mut r = total;
        match self.label_side {
            LabelSide::Left | LabelSide::Inherit => {
                r.x += indent;
                if !eats {
                    r.height = container_unpacked.height;
                }
                r.width = self.label_width - indent;
            }
            LabelSide::Right => {
                if !eats {
                    r.height = container_unpacked.height;
                    r.width = self.label_width;
                }
                r.x += r.width - self.label_width;
                r.width = self.label_width - indent;
            }
            LabelSide::Top => {
                if !eats {
                    r.width = container.width;
                    r.height = self.label_width;
                }
                r.set_left(r.x + indent);
            }
            LabelSide::Bottom => {
                r.y += r.height;
                if !eats {
                    r.width = container.width;
                    r.height = self.label_width;
                }
                r.set_left(r.x + indent);
            }
        }
        r
    }

    /// Make room for a prefix label in front of a control occupying `total`.
    pub fn prefix_plan(&self, total: Rect, has_label: bool, is_vertical: bool) -> PrefixPlan {
        let mut plan = PrefixPlan { rect: total, space: None };
        if !matches!(self.policy, IndentPolicy::Widgets | IndentPolicy::Full) {
            return plan;
        }

        let eats = self.eats(is_vertical);
        let offset = self.offset();
        let width = if has_label || self.policy == IndentPolicy::Full {
            self.label_width
        } else {
            offset
        };
        if !eats && width > 0.0 {
            plan.space = Some(width);
        }

        let r = &mut plan.rect;
        match self.label_side {
            LabelSide::Left | LabelSide::Inherit => {
                if eats {
                    r.set_left(r.x + width);
                } else {
                    r.x += width;
                }
            }
            LabelSide::Right => {
                if eats {
                    r.set_right(r.right() - width);
                }
            }
            LabelSide::Top => {
                if eats {
                    r.set_top(r.y + width);
                } else {
                    r.y += width;
                }
                r.set_left(r.x + offset);
            }
            LabelSide::Bottom => {
                if eats {
                    r.set_bottom(r.bottom() - width);
                }
                r.set_left(r.x + offset);
            }
        }
        plan
    }

    /// Drop every open scope, returning how many indent and label scopes
    /// were still open.
    pub fn force_close(&mut self) -> (usize, usize) {
        let open = self.depths();
        while self.end_indent().is_ok() {}
        while self.end_label_option().is_ok() {}
        open
    }

    /// Back to the configured defaults.
    pub fn reset(&mut self) {
        self.indents.clear();
        self.labels.clear();
        self.level = 0;
        self.policy = IndentPolicy::Widgets;
        (self.label_width, self.label_side) = self.defaults;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> IndentState {
        IndentState::new(&LayoutConfig::default())
    }

    #[test]
    fn test_indent_nesting_restores() {
        let mut s = state();
        s.begin_indent(None, IndentPolicy::Inherit);
        s.begin_indent(None, IndentPolicy::Full);
        assert_eq!(s.level(), 2);
        assert_eq!(s.policy(), IndentPolicy::Full);
        s.begin_indent(Some(0), IndentPolicy::Inherit);
        assert_eq!(s.level(), 0);

        s.end_indent().unwrap();
        s.end_indent().unwrap();
        assert_eq!(s.level(), 1);
        assert_eq!(s.policy(), IndentPolicy::Widgets);
        s.end_indent().unwrap();
        assert!(matches!(s.end_indent(), Err(LayoutError::NoOpenGroup)));
    }

    #[test]
    fn test_indent_rect_by_policy() {
        let mut s = state();
        let r = Rect::new(0.0, 0.0, 200.0, 20.0);
        s.begin_indent(Some(2), IndentPolicy::Inherit);
        assert_eq!(s.indent_rect(r, false), Rect::new(32.0, 0.0, 168.0, 20.0));

        s.begin_indent(None, IndentPolicy::Full);
        assert_eq!(s.indent_rect(r, false).x, 100.0);

        s.begin_indent(None, IndentPolicy::Label);
        assert_eq!(s.indent_rect(r, false), r);
        assert_eq!(s.indent_rect(r, true).x, 64.0);
    }

    #[test]
    fn test_label_option_stacked_sides_use_line_height() {
        let mut s = state();
        s.begin_label_option(None, LabelSide::Top);
        assert_eq!(s.label_width(), crate::measure::LINE_HEIGHT);
        s.begin_label_option(Some(40.0), LabelSide::Inherit);
        assert_eq!(s.label_side(), LabelSide::Top);
        assert_eq!(s.label_width(), 40.0);
        assert_eq!(s.force_close(), (0, 2));
        assert_eq!(s.label_width(), 100.0);
        assert_eq!(s.label_side(), LabelSide::Left);
    }

    #[test]
    fn test_prefix_left_in_vertical_group_eats_width() {
        let s = state();
        let plan = s.prefix_plan(Rect::new(0.0, 0.0, 300.0, 20.0), true, true);
        assert_eq!(plan.rect, Rect::new(100.0, 0.0, 200.0, 20.0));
        assert_eq!(plan.space, None);
    }

    #[test]
    fn test_prefix_left_in_horizontal_group_reserves_space() {
        let s = state();
        let plan = s.prefix_plan(Rect::new(0.0, 0.0, 50.0, 20.0), true, false);
        assert_eq!(plan.space, Some(100.0));
        assert_eq!(plan.rect.x, 100.0);
        assert_eq!(plan.rect.width, 50.0);
    }

    #[test]
    fn test_unlabelled_prefix_uses_indent() {
        let mut s = state();
        s.begin_indent(Some(1), IndentPolicy::Inherit);
        let plan = s.prefix_plan(Rect::new(0.0, 0.0, 100.0, 20.0), false, true);
        assert_eq!(plan.rect.x, 16.0);
        assert_eq!(plan.rect.width, 84.0);

        s.begin_indent(None, IndentPolicy::Label);
        let plan = s.prefix_plan(Rect::new(0.0, 0.0, 100.0, 20.0), true, true);
        assert_eq!(plan.rect.x, 0.0);
    }

    #[test]
    fn test_prefix_top_in_vertical_group() {
        let mut s = state();
        s.begin_label_option(Some(18.0), LabelSide::Top);
        s.begin_indent(Some(1), IndentPolicy::Inherit);
        let plan = s.prefix_plan(Rect::new(0.0, 0.0, 100.0, 20.0), true, true);
        // Top labels stack with a vertical group, so a spacer goes first.
        assert_eq!(plan.space, Some(18.0));
        assert_eq!(plan.rect, Rect::new(16.0, 18.0, 84.0, 20.0));
    }

    #[test]
    fn test_label_rect_left() {
        let mut s = state();
        s.begin_indent(Some(1), IndentPolicy::Inherit);
        let container = Rect::new(0.0, 0.0, 300.0, 80.0);
        let r = s.label_rect(Rect::new(0.0, 10.0, 300.0, 20.0), true, container, container);
        assert_eq!(r, Rect::new(16.0, 10.0, 84.0, 20.0));
    }

    #[test]
    fn test_label_rect_bottom_outside_group_axis() {
        let mut s = state();
        s.begin_label_option(Some(18.0), LabelSide::Bottom);
        let container = Rect::new(0.0, 0.0, 300.0, 80.0);
        let r = s.label_rect(Rect::new(0.0, 10.0, 50.0, 20.0), true, container, container);
        assert_eq!(r, Rect::new(0.0, 30.0, 300.0, 18.0));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut s = state();
        s.begin_indent(Some(3), IndentPolicy::None);
        s.begin_label_option(Some(10.0), LabelSide::Right);
        s.reset();
        assert_eq!(s.depths(), (0, 0));
        assert_eq!(s.level(), 0);
        assert_eq!(s.label_width(), 100.0);
    }
}
