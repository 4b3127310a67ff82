//! Scroll groups.
//!
//! A scroll group measures its content unconstrained on each scrollable axis,
//! then reports a small minimum to its parent so it can shrink and scroll.
//! Arranging decides per axis whether a scrollbar is needed and takes the
//! bar's thickness from the other axis. A vertical bar discovered while
//! arranging heights narrows the content, so widths are arranged again and
//! heights re-measured before the vertical arrange continues.

use super::constraints::{Axis, AxisConstraint};
use super::group::Solver;
use super::node::{GroupVariant, Node, NodeId, NodeKind};
use crate::error::{LayoutError, LayoutResult};
use crate::primitives::{Rect, Size};

/// How a scroll view may scroll and when its bars are forced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSettings {
    pub always_show_horizontal: bool,
    pub always_show_vertical: bool,
    pub allow_horizontal: bool,
    pub allow_vertical: bool,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            always_show_horizontal: false,
            always_show_vertical: false,
            allow_horizontal: true,
            allow_vertical: true,
        }
    }
}

impl ScrollSettings {
    pub fn always_show_horizontal(mut self, show: bool) -> Self {
        self.always_show_horizontal = show;
        self
    }

    pub fn always_show_vertical(mut self, show: bool) -> Self {
        self.always_show_vertical = show;
        self
    }

    pub fn allow_horizontal(mut self, allow: bool) -> Self {
        self.allow_horizontal = allow;
        self
    }

    pub fn allow_vertical(mut self, allow: bool) -> Self {
        self.allow_vertical = allow;
        self
    }

    #[inline]
    pub fn allows(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.allow_horizontal,
            Axis::Vertical => self.allow_vertical,
        }
    }
}

/// Resolved state of a scroll group after layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub settings: ScrollSettings,
    pub needs_horizontal: bool,
    pub needs_vertical: bool,
    /// Visible viewport, scrollbars subtracted.
    pub client_width: f32,
    pub client_height: f32,
    /// Scrollable extent of the content.
    pub content_width: f32,
    pub content_height: f32,
    /// Content bounds measured without the group's own constraints.
    pub(crate) calc_min: [f32; 2],
    pub(crate) calc_max: [f32; 2],
}

impl ScrollState {
    pub fn new(settings: ScrollSettings) -> Self {
        Self {
            settings,
            needs_horizontal: settings.always_show_horizontal,
            needs_vertical: settings.always_show_vertical,
            ..Default::default()
        }
    }

    pub fn client_size(&self) -> Size {
        Size::new(self.client_width, self.client_height)
    }

    pub fn content_size(&self) -> Size {
        Size::new(self.content_width, self.content_height)
    }

    /// How far the content can scroll on each axis.
    pub fn scroll_range(&self) -> Size {
        Size::new(
            (self.content_width - self.client_width).max(0.0),
            (self.content_height - self.client_height).max(0.0),
        )
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            settings: ScrollSettings::default(),
            needs_horizontal: false,
            needs_vertical: false,
            client_width: 0.0,
            client_height: 0.0,
            content_width: 0.0,
            content_height: 0.0,
            calc_min: [0.0; 2],
            calc_max: [0.0; 2],
        }
    }
}

/// Mutable views into a scroll node.
fn scroll_parts(node: &mut Node) -> LayoutResult<(&mut Rect, &mut ScrollState)> {
    let Node { rect, kind, .. } = node;
    match kind {
        NodeKind::Group(group) => match &mut group.variant {
            GroupVariant::Scroll(state) => Ok((rect, state)),
            _ => Err(LayoutError::NotAScrollGroup),
        },
        _ => Err(LayoutError::NotAScrollGroup),
    }
}

impl Node {
    pub(crate) fn scroll_state(&self) -> LayoutResult<&ScrollState> {
        match self.as_group().map(|g| &g.variant) {
            Some(GroupVariant::Scroll(state)) => Ok(state),
            _ => Err(LayoutError::NotAScrollGroup),
        }
    }
}

impl Solver<'_> {
    pub(super) fn measure_scroll(&mut self, id: NodeId, axis: Axis) -> LayoutResult<()> {
        let node = self.arena.get_mut(id)?;
        let declared = *node.declared.axis(axis);
        let (_, state) = scroll_parts(node)?;
        if axis == Axis::Horizontal {
            // A fresh run starts from the forced bars only.
            state.needs_horizontal = state.settings.always_show_horizontal;
            state.needs_vertical = state.settings.always_show_vertical;
        }
        let scrollable = state.settings.allows(axis);

        let inner = if scrollable {
            AxisConstraint {
                min: 0.0,
                max: 0.0,
                stretch: declared.stretch,
            }
        } else {
            declared
        };
        self.measure_group(id, axis, inner)?;

        let min_viewport = self.config.min_scroll_viewport;
        let h_bar = self.config.horizontal_scrollbar.reserve();
        let node = self.arena.get_mut(id)?;
        let mut c = *node.size.axis(axis);
        let (_, state) = scroll_parts(node)?;
        state.calc_min[axis.index()] = c.min;
        state.calc_max[axis.index()] = c.max;

        // A known horizontal bar claims its height now, or the view would
        // grow a vertical bar with dead space below.
        if axis == Axis::Vertical && state.needs_horizontal {
            c.min += h_bar;
            c.max += h_bar;
        }

        if scrollable {
            c.min = c.min.min(min_viewport);
            if declared.min != 0.0 {
                c.min = declared.min;
            }
            if declared.max != 0.0 {
                c.max = declared.max;
                c.stretch = 0.0;
            }
            c.max = c.max.max(c.min);
        }
        *node.size.axis_mut(axis) = c;
        Ok(())
    }

    pub(super) fn arrange_scroll(&mut self, id: NodeId, axis: Axis, pos: f32, size: f32) -> LayoutResult<()> {
        match axis {
            Axis::Horizontal => self.arrange_scroll_horizontal(id, pos, size),
            Axis::Vertical => self.arrange_scroll_vertical(id, pos, size),
        }
    }

    fn arrange_scroll_horizontal(&mut self, id: NodeId, x: f32, width: f32) -> LayoutResult<()> {
        let v_bar = self.config.vertical_scrollbar.reserve();
        let state = *self.arena.get(id)?.scroll_state()?;

        let client = if state.needs_vertical { width - v_bar } else { width }.max(0.0);
        let natural = state.calc_min[Axis::Horizontal.index()];
        let overflow = state.settings.allow_horizontal && client < natural;
        let content = if overflow { natural } else { client };

        self.arrange_group(id, Axis::Horizontal, x, content)?;

        let (rect, state) = scroll_parts(self.arena.get_mut(id)?)?;
        rect.width = width;
        state.needs_horizontal = overflow || state.settings.always_show_horizontal;
        state.client_width = client;
        state.content_width = content;
        Ok(())
    }

    fn arrange_scroll_vertical(&mut self, id: NodeId, y: f32, height: f32) -> LayoutResult<()> {
        let v_bar = self.config.vertical_scrollbar.reserve();
        let h_bar = self.config.horizontal_scrollbar.reserve();
        let state = *self.arena.get(id)?.scroll_state()?;

        let available = if state.needs_horizontal { height - h_bar } else { height }.max(0.0);
        let overflow = state.settings.allow_vertical && available < state.calc_min[Axis::Vertical.index()];

        if overflow && !state.needs_horizontal && !state.needs_vertical {
            // The new vertical bar narrows the content; widths change and
            // wrapped heights with them. This cannot grow the group.
            let rect = self.arena.get(id)?.rect;
            let viewport = (rect.width - v_bar).max(state.calc_min[Axis::Horizontal.index()]);
            self.arrange_scroll_horizontal(id, rect.x, viewport)?;
            self.measure_scroll(id, Axis::Vertical)?;

            let (node_rect, state) = scroll_parts(self.arena.get_mut(id)?)?;
            node_rect.width = rect.width;
            state.client_width = viewport;
        }

        let natural = self.arena.get(id)?.scroll_state()?.calc_min[Axis::Vertical.index()];
        let content = if overflow { natural } else { available };
        self.arrange_group(id, Axis::Vertical, y, content)?;

        let (rect, state) = scroll_parts(self.arena.get_mut(id)?)?;
        rect.height = height;
        if overflow {
            state.needs_vertical = true;
        }
        state.client_height = available;
        state.content_height = content;
        Ok(())
    }
}
