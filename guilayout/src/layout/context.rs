//! The two-pass driver.
//!
//! A frame runs one Layout pass followed by any number of Replay passes. The
//! Layout pass records every reservation as a node and hands back
//! placeholder rects; [`LayoutContext::layout`] then resolves the tree. Each
//! Replay pass issues the same calls in the same order and gets the resolved
//! rects back through a per-group cursor.
//!
//! ```
//! use guilayout::{LayoutContext, LayoutOption, LayoutStyle, MonospaceMeasure, PassKind};
//!
//! let mut ctx = LayoutContext::new();
//! let measure = MonospaceMeasure::default();
//! for pass in [PassKind::Layout, PassKind::Replay] {
//!     ctx.begin_context(1, pass).unwrap();
//!     let r = ctx.reserve_size(40.0, 20.0, LayoutStyle::none(), &[LayoutOption::ExpandWidth(true)]).unwrap();
//!     ctx.end_context().unwrap();
//!     if pass == PassKind::Layout {
//!         ctx.layout_fill(200.0, 100.0, &measure).unwrap();
//!     } else {
//!         assert_eq!(r.width, 200.0);
//!     }
//! }
//! ```

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use super::cache::LayoutCache;
use super::constraints::{LayoutOption, SizeConstraint};
use super::entry;
use super::group::Solver;
use super::node::{Group, GroupVariant, Node, NodeArena, NodeId, NodeKind};
use super::scroll::{ScrollSettings, ScrollState};
use super::style::LayoutStyle;
use crate::config::LayoutConfig;
use crate::error::{LayoutError, LayoutResult};
use crate::fade::FadeAnimator;
use crate::indent::{IndentPolicy, IndentState, LabelSide};
use crate::measure::ContentMeasure;
use crate::primitives::Rect;

/// Handle to an open or resolved group.
pub type GroupHandle = NodeId;

/// What a pass does with the calls it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Build a fresh tree; reservations return placeholders.
    Layout,
    /// Walk the tree built by the last Layout pass.
    Replay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CacheKey {
    Owner(u64),
    Window(u64),
}

/// A plain group to open.
#[derive(Debug, Clone, Copy)]
pub struct GroupSpec<'a> {
    pub style: LayoutStyle,
    pub options: &'a [LayoutOption],
    pub is_vertical: bool,
}

impl<'a> GroupSpec<'a> {
    pub fn vertical(style: LayoutStyle) -> Self {
        Self {
            style,
            options: &[],
            is_vertical: true,
        }
    }

    pub fn horizontal(style: LayoutStyle) -> Self {
        Self {
            style,
            options: &[],
            is_vertical: false,
        }
    }

    pub fn options(mut self, options: &'a [LayoutOption]) -> Self {
        self.options = options;
        self
    }
}

/// An open scroll view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollView {
    pub handle: GroupHandle,
    /// Outer rect of the view, scrollbars included.
    pub rect: Rect,
    pub state: ScrollState,
}

/// Scopes still open when a context ended. They were closed by force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EndReport {
    pub unclosed_groups: usize,
    pub unclosed_indents: usize,
    pub unclosed_label_options: usize,
    pub unclosed_layout_options: usize,
}

impl EndReport {
    pub fn is_balanced(&self) -> bool {
        *self == Self::default()
    }
}

/// Layout state for every owner and window, and the entry points of both
/// passes.
#[derive(Debug)]
pub struct LayoutContext {
    arena: NodeArena,
    stored: HashMap<u64, LayoutCache>,
    stored_windows: HashMap<u64, LayoutCache>,
    active: Option<CacheKey>,
    pass: PassKind,
    config: LayoutConfig,
    /// Options applied to every reservation before its own.
    default_options: Vec<Vec<LayoutOption>>,
    scratch: Vec<LayoutOption>,
    /// Whether each open fade scope created a group.
    fade_stack: Vec<bool>,
    indent: IndentState,
    fades: FadeAnimator,
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new()
    }
}

fn cache_entry<'a>(
    stored: &'a mut HashMap<u64, LayoutCache>,
    stored_windows: &'a mut HashMap<u64, LayoutCache>,
    key: CacheKey,
) -> &'a mut LayoutCache {
    match key {
        CacheKey::Owner(id) => stored.entry(id).or_default(),
        CacheKey::Window(id) => stored_windows.entry(id).or_default(),
    }
}

fn is_entry(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Entry)
}

fn is_content(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Entry | NodeKind::WordWrap { .. })
}

fn is_aspect(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Aspect { .. })
}

fn is_grid(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Grid { .. })
}

impl LayoutContext {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            arena: NodeArena::new(),
            stored: HashMap::new(),
            stored_windows: HashMap::new(),
            active: None,
            pass: PassKind::Layout,
            indent: IndentState::new(&config),
            config,
            default_options: Vec::new(),
            scratch: Vec::new(),
            fade_stack: Vec::new(),
            fades: FadeAnimator::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[inline]
    pub fn pass(&self) -> PassKind {
        self.pass
    }

    #[inline]
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    #[inline]
    pub fn indent(&self) -> &IndentState {
        &self.indent
    }

    fn cache(&self) -> LayoutResult<&LayoutCache> {
        match self.active.ok_or(LayoutError::NoContext)? {
            CacheKey::Owner(id) => self.stored.get(&id),
            CacheKey::Window(id) => self.stored_windows.get(&id),
        }
        .ok_or(LayoutError::NoContext)
    }

    fn cache_mut(&mut self) -> LayoutResult<&mut LayoutCache> {
        match self.active.ok_or(LayoutError::NoContext)? {
            CacheKey::Owner(id) => self.stored.get_mut(&id),
            CacheKey::Window(id) => self.stored_windows.get_mut(&id),
        }
        .ok_or(LayoutError::NoContext)
    }

    /// Innermost open group.
    fn current_group(&self) -> LayoutResult<NodeId> {
        self.cache()?.current()
    }

    // ========================================================================
    // Contexts
    // ========================================================================

    /// Select `owner`'s cache for a pass. A Layout pass replaces the owner's
    /// trees; a Replay pass rewinds their cursors.
    pub fn begin_context(&mut self, owner: u64, pass: PassKind) -> LayoutResult<()> {
        self.select(CacheKey::Owner(owner), pass, LayoutStyle::none(), &[])
    }

    /// Like [`begin_context`](Self::begin_context) for a window. The window
    /// root is laid out as a floating group within its declared bounds.
    pub fn begin_window(
        &mut self,
        window_id: u64,
        pass: PassKind,
        style: LayoutStyle,
        options: &[LayoutOption],
    ) -> LayoutResult<()> {
        self.select(CacheKey::Window(window_id), pass, style, options)
    }

    /// Switch to `key`'s cache. A failed Replay leaves the current
    /// selection untouched.
    fn select(&mut self, key: CacheKey, pass: PassKind, style: LayoutStyle, options: &[LayoutOption]) -> LayoutResult<()> {
        match pass {
            PassKind::Layout => {
                let mut root = Group::new(self.arena.child_list(), true, GroupVariant::Plain);
                if let CacheKey::Window(id) = key {
                    root.window_id = Some(id);
                }
                root.apply_options(options);
                let top_level = self
                    .arena
                    .alloc(Node::new(style, SizeConstraint::ZERO, options, NodeKind::Group(root)));
                let windows = Group::new(self.arena.child_list(), true, GroupVariant::Plain);
                let windows = self.arena.alloc(Node::new(
                    LayoutStyle::none(),
                    SizeConstraint::ZERO,
                    &[],
                    NodeKind::Group(windows),
                ));

                let cache = cache_entry(&mut self.stored, &mut self.stored_windows, key);
                let released = cache.replace(&mut self.arena, top_level, windows);
                debug!(?key, released, "layout pass started");
            }
            PassKind::Replay => {
                let cache = match key {
                    CacheKey::Owner(id) => self.stored.get_mut(&id),
                    CacheKey::Window(id) => self.stored_windows.get_mut(&id),
                }
                .ok_or(LayoutError::NoContext)?;
                cache.rewind(&mut self.arena)?;
                trace!(?key, "replay pass started");
            }
        }
        self.pass = pass;
        self.active = Some(key);
        self.fade_stack.clear();
        Ok(())
    }

    /// Close whatever the caller left open. The context stays selected so
    /// [`layout`](Self::layout) can run afterwards.
    pub fn end_context(&mut self) -> LayoutResult<EndReport> {
        let unclosed_groups = self.cache_mut()?.close_all();
        let (unclosed_indents, unclosed_label_options) = self.indent.force_close();
        let unclosed_layout_options = self.default_options.len();
        self.default_options.clear();
        self.fade_stack.clear();

        let report = EndReport {
            unclosed_groups,
            unclosed_indents,
            unclosed_label_options,
            unclosed_layout_options,
        };
        if !report.is_balanced() {
            warn!(
                groups = unclosed_groups,
                indents = unclosed_indents,
                labels = unclosed_label_options,
                options = unclosed_layout_options,
                "more scopes were opened than closed; closing them"
            );
        }
        Ok(report)
    }

    /// Discard every cached tree for every owner and window.
    pub fn reset_all(&mut self) {
        let mut released = 0;
        for (_, mut cache) in self.stored.drain() {
            released += cache.release(&mut self.arena);
        }
        for (_, mut cache) in self.stored_windows.drain() {
            released += cache.release(&mut self.arena);
        }
        self.active = None;
        self.default_options.clear();
        self.fade_stack.clear();
        self.indent.reset();
        self.fades.clear();
        debug!(released, "discarded every cached layout");
    }

    // ========================================================================
    // Groups
    // ========================================================================

    pub fn begin_vertical(&mut self, style: LayoutStyle, options: &[LayoutOption]) -> LayoutResult<GroupHandle> {
        self.open_group(style, options, true, GroupVariant::Plain, false)
    }

    pub fn begin_horizontal(&mut self, style: LayoutStyle, options: &[LayoutOption]) -> LayoutResult<GroupHandle> {
        self.open_group(style, options, false, GroupVariant::Plain, false)
    }

    pub fn begin_group(&mut self, spec: GroupSpec<'_>) -> LayoutResult<GroupHandle> {
        self.open_group(spec.style, spec.options, spec.is_vertical, GroupVariant::Plain, false)
    }

    pub fn end_group(&mut self) -> LayoutResult<()> {
        self.cache_mut()?.pop().map(|_| ())
    }

    fn open_group(
        &mut self,
        style: LayoutStyle,
        options: &[LayoutOption],
        is_vertical: bool,
        variant: GroupVariant,
        reset_coords: bool,
    ) -> LayoutResult<NodeId> {
        let parent = self.current_group()?;
        let id = match self.pass {
            PassKind::Layout => {
                let mut group = Group::new(self.arena.child_list(), is_vertical, variant);
                group.reset_coords = reset_coords;
                group.apply_options(options);
                let id = self
                    .arena
                    .alloc(Node::new(style, SizeConstraint::ZERO, options, NodeKind::Group(group)));
                self.arena.group_mut(parent)?.children.push(id);
                id
            }
            PassKind::Replay => {
                let id = self.arena.group_mut(parent)?.next()?;
                let node = self.arena.get_mut(id)?;
                let found = node.kind.name();
                match node.as_group_mut() {
                    Some(group) if group.variant.same_kind(&variant) => group.reset_cursor(),
                    _ => {
                        return Err(LayoutError::Mismatched {
                            expected: variant.name(),
                            found,
                        });
                    }
                }
                id
            }
        };
        self.cache_mut()?.push(id);
        Ok(id)
    }

    /// Open a vertical scroll view that stretches both ways unless options
    /// say otherwise.
    pub fn begin_scroll_view(&mut self, settings: ScrollSettings, options: &[LayoutOption]) -> LayoutResult<ScrollView> {
        let style = LayoutStyle::none().stretch_width(true).stretch_height(true);
        let variant = GroupVariant::Scroll(ScrollState::new(settings));
        let handle = self.with_defaults(options, |ctx, merged| ctx.open_group(style, merged, true, variant, true))?;
        let node = self.arena.get(handle)?;
        let rect = match self.pass {
            PassKind::Layout => Rect::PLACEHOLDER,
            PassKind::Replay => node.rect,
        };
        Ok(ScrollView {
            handle,
            rect,
            state: *node.scroll_state()?,
        })
    }

    pub fn end_scroll_view(&mut self) -> LayoutResult<()> {
        let node = self.arena.get(self.current_group()?)?;
        if !matches!(node.as_group().map(Group::variant), Some(GroupVariant::Scroll(_))) {
            return Err(LayoutError::Mismatched {
                expected: "scroll group",
                found: node.kind.name(),
            });
        }
        self.end_group()
    }

    /// Open a fade group whose height is scaled by `value`. Fully closed and
    /// fully open values add no group; returns whether content should be
    /// emitted.
    pub fn begin_fade_group(&mut self, value: f32) -> LayoutResult<bool> {
        if value.is_nan() || value <= 0.0 {
            self.fade_stack.push(false);
            return Ok(false);
        }
        if value >= 1.0 {
            self.fade_stack.push(false);
            return Ok(true);
        }
        self.open_group(LayoutStyle::none(), &[], true, GroupVariant::Fade { value }, true)?;
        self.fade_stack.push(true);
        Ok(true)
    }

    /// Fade group animated towards `visible`. Progress advances by `dt`
    /// seconds on Layout passes only.
    pub fn begin_fade_toggle(&mut self, id: u64, visible: bool, dt: f32) -> LayoutResult<bool> {
        let advance = self.pass == PassKind::Layout;
        let step = self.fades.step(id, visible, dt, advance, self.config.fade_speed);
        self.begin_fade_group(step.value)?;
        Ok(step.open)
    }

    pub fn end_fade_group(&mut self) -> LayoutResult<()> {
        match self.fade_stack.pop() {
            Some(true) => self.end_group(),
            Some(false) => Ok(()),
            None => Err(LayoutError::NoOpenGroup),
        }
    }

    /// Open a floating group at a fixed screen rect. It is laid out on its
    /// own after the main tree.
    pub fn begin_area(&mut self, rect: Rect) -> LayoutResult<GroupHandle> {
        let windows = self.cache()?.windows.ok_or(LayoutError::NoContext)?;
        let id = match self.pass {
            PassKind::Layout => {
                let mut group = Group::new(self.arena.child_list(), true, GroupVariant::Plain);
                group.reset_coords = true;
                let bounds = SizeConstraint::new(rect.width, rect.width, rect.height, rect.height);
                let mut node = Node::new(LayoutStyle::none(), bounds, &[], NodeKind::Group(group));
                node.rect = rect;
                let id = self.arena.alloc(node);
                self.arena.group_mut(windows)?.children.push(id);
                id
            }
            PassKind::Replay => {
                let id = self.arena.group_mut(windows)?.next()?;
                self.arena.group_mut(id)?.reset_cursor();
                id
            }
        };
        self.cache_mut()?.push(id);
        Ok(id)
    }

    pub fn end_area(&mut self) -> LayoutResult<()> {
        self.end_group()
    }

    // ========================================================================
    // Reservations
    // ========================================================================

    /// Run `f` with the default options followed by `options`.
    fn with_defaults<R>(&mut self, options: &[LayoutOption], f: impl FnOnce(&mut Self, &[LayoutOption]) -> R) -> R {
        let mut merged = std::mem::take(&mut self.scratch);
        merged.clear();
        if let Some(defaults) = self.default_options.last() {
            merged.extend_from_slice(defaults);
        }
        merged.extend_from_slice(options);
        let out = f(self, &merged);
        self.scratch = merged;
        out
    }

    /// Append a leaf built by `build` (Layout) or fetch the next one and
    /// check its kind (Replay).
    fn reserve_node(
        &mut self,
        expected: &'static str,
        accepts: fn(&NodeKind) -> bool,
        build: impl FnOnce(&mut NodeArena) -> Node,
    ) -> LayoutResult<Rect> {
        let parent = self.current_group()?;
        match self.pass {
            PassKind::Layout => {
                let node = build(&mut self.arena);
                let id = self.arena.alloc(node);
                self.arena.group_mut(parent)?.children.push(id);
                Ok(Rect::PLACEHOLDER)
            }
            PassKind::Replay => {
                let id = self.arena.group_mut(parent)?.next()?;
                let node = self.arena.get(id)?;
                if !accepts(&node.kind) {
                    return Err(LayoutError::Mismatched {
                        expected,
                        found: node.kind.name(),
                    });
                }
                Ok(node.rect)
            }
        }
    }

    /// Reserve a rect with the given bounds.
    pub fn reserve(
        &mut self,
        min_width: f32,
        max_width: f32,
        min_height: f32,
        max_height: f32,
        style: LayoutStyle,
        options: &[LayoutOption],
    ) -> LayoutResult<Rect> {
        let bounds = SizeConstraint::new(min_width, max_width, min_height, max_height);
        self.with_defaults(options, |ctx, merged| {
            ctx.reserve_node("entry", is_entry, |_| Node::new(style, bounds, merged, NodeKind::Entry))
        })
    }

    /// Reserve a rect of exactly `width` x `height`, before options.
    pub fn reserve_size(&mut self, width: f32, height: f32, style: LayoutStyle, options: &[LayoutOption]) -> LayoutResult<Rect> {
        self.reserve(width, width, height, height, style, options)
    }

    /// Reserve room for `text` drawn with `style`. Word-wrapping styles get
    /// a height that follows the resolved width.
    pub fn reserve_content(
        &mut self,
        text: &str,
        style: LayoutStyle,
        options: &[LayoutOption],
        measure: &dyn ContentMeasure,
    ) -> LayoutResult<Rect> {
        self.with_defaults(options, |ctx, merged| {
            ctx.reserve_node("entry", is_content, |arena| {
                if style.word_wrap {
                    let text = arena.string(text);
                    Node::new(style, SizeConstraint::ZERO, merged, NodeKind::WordWrap { text })
                } else {
                    let bounds = entry::content_bounds(text, &style, merged, measure);
                    Node::new(style, bounds, merged, NodeKind::Entry)
                }
            })
        })
    }

    /// Reserve a rect whose height is its width divided by `aspect`.
    pub fn reserve_aspect(&mut self, aspect: f32, options: &[LayoutOption]) -> LayoutResult<Rect> {
        self.with_defaults(options, |ctx, merged| {
            ctx.reserve_node("aspect", is_aspect, |_| {
                Node::new(LayoutStyle::none(), SizeConstraint::ZERO, merged, NodeKind::Aspect { aspect })
            })
        })
    }

    /// Reserve a grid of `items` laid out `x_count` per row.
    pub fn reserve_grid(
        &mut self,
        items: &[&str],
        x_count: usize,
        style: LayoutStyle,
        options: &[LayoutOption],
        measure: &dyn ContentMeasure,
    ) -> LayoutResult<Rect> {
        self.with_defaults(options, |ctx, merged| {
            ctx.reserve_node("grid", is_grid, |_| {
                let kind = NodeKind::Grid {
                    count: items.len(),
                    x_count,
                };
                let mut node = Node::new(style, SizeConstraint::ZERO, merged, kind);
                entry::init_grid(&mut node, items, x_count, measure);
                node
            })
        })
    }

    /// Fixed gap of `pixels` along the current group's direction. Spacers
    /// do not take part in margin collapsing.
    pub fn space(&mut self, pixels: f32) -> LayoutResult<Rect> {
        let vertical = self.is_vertical()?;
        let (bounds, option) = if vertical {
            (SizeConstraint::new(0.0, 0.0, pixels, pixels), LayoutOption::Height(pixels))
        } else {
            (SizeConstraint::new(pixels, pixels, 0.0, 0.0), LayoutOption::Width(pixels))
        };
        self.reserve_node("entry", is_entry, |_| {
            Node::new(LayoutStyle::SPACE, bounds, &[option], NodeKind::Entry)
        })
    }

    /// Gap that soaks up the remaining space along the current group's
    /// direction.
    pub fn flexible_space(&mut self) -> LayoutResult<Rect> {
        let option = if self.is_vertical()? {
            LayoutOption::ExpandHeight(true)
        } else {
            LayoutOption::ExpandWidth(true)
        };
        self.reserve_node("entry", is_entry, |_| {
            Node::new(LayoutStyle::none(), SizeConstraint::ZERO, &[option], NodeKind::Entry)
        })
    }

    /// Push options applied to every reservation until the matching
    /// [`end_layout_option`](Self::end_layout_option).
    pub fn begin_layout_option(&mut self, options: &[LayoutOption]) {
        self.default_options.push(options.to_vec());
    }

    pub fn end_layout_option(&mut self) -> LayoutResult<()> {
        self.default_options.pop().map(|_| ()).ok_or(LayoutError::NoOpenGroup)
    }

    // ========================================================================
    // Solving
    // ========================================================================

    /// Resolve the tree, the root no larger than its max, then every
    /// floating area.
    pub fn layout(&mut self, width: f32, height: f32, measure: &dyn ContentMeasure) -> LayoutResult<()> {
        self.solve(measure, |solver, root, floating| {
            if floating {
                solver.solve_floating(root)
            } else {
                solver.solve_clamped(root, width, height)
            }
        })
    }

    /// Resolve the tree so the root fills exactly `width` x `height`.
    pub fn layout_fill(&mut self, width: f32, height: f32, measure: &dyn ContentMeasure) -> LayoutResult<()> {
        self.solve(measure, |solver, root, _| solver.solve_fill(root, width, height))
    }

    /// Resolve the tree at `width` and return the height it needs.
    pub fn layout_inspector(&mut self, width: f32, measure: &dyn ContentMeasure) -> LayoutResult<f32> {
        self.solve(measure, |solver, root, floating| {
            if floating {
                solver.solve_floating(root).map(|_| 0.0)
            } else {
                solver.solve_for_width(root, width)
            }
        })
    }

    fn solve<R>(
        &mut self,
        measure: &dyn ContentMeasure,
        f: impl FnOnce(&mut Solver<'_>, NodeId, bool) -> LayoutResult<R>,
    ) -> LayoutResult<R> {
        let cache = self.cache()?;
        let (Some(root), Some(windows)) = (cache.top_level, cache.windows) else {
            return Err(LayoutError::NoContext);
        };
        let floating = self.arena.group(root)?.window_id.is_some();

        let mut solver = Solver::new(&mut self.arena, measure, &self.config);
        let out = f(&mut solver, root, floating)?;
        let areas = solver.arena.group(windows)?.len();
        for i in 0..areas {
            let area = solver.arena.group(windows)?.children[i];
            solver.solve_floating(area)?;
        }
        self.arena.group_mut(windows)?.reset_cursor();

        debug!(nodes = self.arena.live(), areas, "layout resolved");
        if tracing::enabled!(tracing::Level::TRACE) {
            trace!("layout tree:\n{}", self.dump_tree()?);
        }
        Ok(out)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Direction of the innermost open group.
    pub fn is_vertical(&self) -> LayoutResult<bool> {
        Ok(self.arena.group(self.current_group()?)?.is_vertical)
    }

    /// Rect of the control most recently fetched in the current group.
    pub fn last_rect(&self) -> LayoutResult<Rect> {
        let group = self.current_group()?;
        if self.pass == PassKind::Layout {
            return Ok(Rect::PLACEHOLDER);
        }
        let id = self.arena.group(group)?.last()?;
        Ok(self.arena.get(id)?.rect)
    }

    /// Rect the next reservation will get, without consuming it.
    pub fn peek_next(&self) -> LayoutResult<Rect> {
        let group = self.current_group()?;
        if self.pass == PassKind::Layout {
            return Ok(Rect::PLACEHOLDER);
        }
        let id = self.arena.group(group)?.peek()?;
        Ok(self.arena.get(id)?.rect)
    }

    /// Rect of the innermost open group, in the coordinates its children
    /// use. `unpacked` grows it by the group's margin.
    pub fn container_rect(&self, unpacked: bool) -> LayoutResult<Rect> {
        let id = self.current_group()?;
        if self.pass == PassKind::Layout {
            return Ok(Rect::PLACEHOLDER);
        }
        let node = self.arena.get(id)?;
        let mut r = node.rect;
        if node.as_group().is_some_and(|g| g.reset_coords) {
            r.x = 0.0;
            r.y = 0.0;
        }
        if unpacked {
            r = node.margin.add(r);
        }
        Ok(r)
    }

    /// Resolved rect of any live node.
    pub fn rect(&self, handle: NodeId) -> LayoutResult<Rect> {
        Ok(self.arena.get(handle)?.rect)
    }

    pub fn scroll_state(&self, handle: GroupHandle) -> LayoutResult<ScrollState> {
        self.arena.get(handle)?.scroll_state().copied()
    }

    /// Both trees of the active context, one node per line.
    pub fn dump_tree(&self) -> LayoutResult<String> {
        let cache = self.cache()?;
        let mut out = String::new();
        if let Some(root) = cache.top_level {
            self.arena.dump(root, &mut out)?;
        }
        if let Some(windows) = cache.windows {
            for &area in self.arena.group(windows)?.children() {
                self.arena.dump(area, &mut out)?;
            }
        }
        Ok(out)
    }

    // ========================================================================
    // Indentation and prefix labels
    // ========================================================================

    pub fn begin_indent(&mut self, level: Option<u32>, policy: IndentPolicy) {
        self.indent.begin_indent(level, policy);
    }

    pub fn end_indent(&mut self) -> LayoutResult<()> {
        self.indent.end_indent()
    }

    pub fn begin_label_option(&mut self, width: Option<f32>, side: LabelSide) {
        self.indent.begin_label_option(width, side);
    }

    pub fn end_label_option(&mut self) -> LayoutResult<()> {
        self.indent.end_label_option()
    }

    pub fn indent_rect(&self, rect: Rect, ignore_policy: bool) -> Rect {
        self.indent.indent_rect(rect, ignore_policy)
    }

    /// Make room for a prefix label in front of a control at `total`,
    /// returning the control's rect. May reserve a spacer in the current
    /// group, so call it in every pass.
    pub fn prefixed_rect(&mut self, total: Rect, has_label: bool) -> LayoutResult<Rect> {
        let plan = self.indent.prefix_plan(total, has_label, self.is_vertical()?);
        if let Some(width) = plan.space {
            self.space(width)?;
        }
        Ok(plan.rect)
    }

    /// Where the prefix label of a control at `total` is drawn.
    pub fn label_rect(&self, total: Rect) -> LayoutResult<Rect> {
        let container = self.container_rect(false)?;
        let unpacked = self.container_rect(true)?;
        Ok(self.indent.label_rect(total, self.is_vertical()?, container, unpacked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::MonospaceMeasure;

    fn frame(ctx: &mut LayoutContext, pass: PassKind, build: impl Fn(&mut LayoutContext) -> Vec<Rect>) -> Vec<Rect> {
        ctx.begin_context(1, pass).unwrap();
        let rects = build(ctx);
        ctx.end_context().unwrap();
        if pass == PassKind::Layout {
            ctx.layout_fill(300.0, 200.0, &MonospaceMeasure::default()).unwrap();
        }
        rects
    }

    #[test]
    fn test_calls_without_context_fail() {
        let mut ctx = LayoutContext::new();
        assert!(matches!(ctx.reserve_size(1.0, 1.0, LayoutStyle::none(), &[]), Err(LayoutError::NoContext)));
        assert!(matches!(ctx.end_context(), Err(LayoutError::NoContext)));
        assert!(matches!(ctx.begin_context(9, PassKind::Replay), Err(LayoutError::NoContext)));
    }

    #[test]
    fn test_failed_replay_keeps_selection() {
        let mut ctx = LayoutContext::new();
        ctx.begin_context(1, PassKind::Layout).unwrap();
        ctx.reserve_size(10.0, 10.0, LayoutStyle::none(), &[]).unwrap();

        assert!(matches!(ctx.begin_context(9, PassKind::Replay), Err(LayoutError::NoContext)));
        assert!(!ctx.stored.contains_key(&9));
        assert_eq!(ctx.active, Some(CacheKey::Owner(1)));
        assert_eq!(ctx.pass(), PassKind::Layout);
        // Still building owner 1.
        ctx.reserve_size(10.0, 10.0, LayoutStyle::none(), &[]).unwrap();
        ctx.end_context().unwrap();
        let root = ctx.cache().unwrap().top_level.unwrap();
        assert_eq!(ctx.arena.group(root).unwrap().len(), 2);
    }

    #[test]
    fn test_scroll_view_placeholder_in_layout_pass() {
        let mut ctx = LayoutContext::new();
        let build = |ctx: &mut LayoutContext| {
            let view = ctx.begin_scroll_view(ScrollSettings::default(), &[]).unwrap();
            ctx.reserve_size(10.0, 10.0, LayoutStyle::none(), &[]).unwrap();
            ctx.end_scroll_view().unwrap();
            vec![view.rect]
        };
        let placeholder = frame(&mut ctx, PassKind::Layout, build);
        assert_eq!(placeholder[0], Rect::PLACEHOLDER);
        let resolved = frame(&mut ctx, PassKind::Replay, build);
        assert_eq!(resolved[0], Rect::new(0.0, 0.0, 300.0, 200.0));
    }

    #[test]
    fn test_layout_pass_returns_placeholders() {
        let mut ctx = LayoutContext::new();
        ctx.begin_context(1, PassKind::Layout).unwrap();
        let r = ctx.reserve_size(10.0, 10.0, LayoutStyle::none(), &[]).unwrap();
        assert_eq!(r, Rect::PLACEHOLDER);
        assert_eq!(ctx.last_rect().unwrap(), Rect::PLACEHOLDER);
    }

    #[test]
    fn test_default_options_apply_before_own() {
        let mut ctx = LayoutContext::new();
        let build = |ctx: &mut LayoutContext| {
            ctx.begin_layout_option(&[LayoutOption::Height(30.0), LayoutOption::Width(50.0)]);
            let a = ctx.reserve_size(10.0, 10.0, LayoutStyle::none(), &[]).unwrap();
            let b = ctx.reserve_size(10.0, 10.0, LayoutStyle::none(), &[LayoutOption::Width(70.0)]).unwrap();
            ctx.end_layout_option().unwrap();
            let c = ctx.reserve_size(10.0, 10.0, LayoutStyle::none(), &[]).unwrap();
            vec![a, b, c]
        };
        frame(&mut ctx, PassKind::Layout, build);
        let rects = frame(&mut ctx, PassKind::Replay, build);
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 50.0, 30.0));
        assert_eq!(rects[1], Rect::new(0.0, 30.0, 70.0, 30.0));
        assert_eq!(rects[2], Rect::new(0.0, 60.0, 10.0, 10.0));
    }

    #[test]
    fn test_space_follows_group_direction() {
        let mut ctx = LayoutContext::new();
        let build = |ctx: &mut LayoutContext| {
            ctx.begin_horizontal(LayoutStyle::none(), &[]).unwrap();
            let a = ctx.reserve_size(10.0, 10.0, LayoutStyle::none(), &[]).unwrap();
            ctx.space(15.0).unwrap();
            let b = ctx.reserve_size(10.0, 10.0, LayoutStyle::none(), &[]).unwrap();
            ctx.flexible_space().unwrap();
            let c = ctx.reserve_size(10.0, 10.0, LayoutStyle::none(), &[]).unwrap();
            ctx.end_group().unwrap();
            vec![a, b, c]
        };
        frame(&mut ctx, PassKind::Layout, build);
        let rects = frame(&mut ctx, PassKind::Replay, build);
        assert_eq!(rects[1].x, 25.0);
        // The flexible space pushes the last control to the right edge.
        assert_eq!(rects[2].x, 290.0);
    }

    #[test]
    fn test_replay_kind_mismatch() {
        let mut ctx = LayoutContext::new();
        frame(&mut ctx, PassKind::Layout, |ctx| {
            ctx.reserve_size(10.0, 10.0, LayoutStyle::none(), &[]).unwrap();
            vec![]
        });
        ctx.begin_context(1, PassKind::Replay).unwrap();
        let err = ctx.begin_vertical(LayoutStyle::none(), &[]).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Mismatched {
                expected: "group",
                found: "entry"
            }
        ));
    }

    #[test]
    fn test_end_scroll_view_requires_scroll_group() {
        let mut ctx = LayoutContext::new();
        ctx.begin_context(1, PassKind::Layout).unwrap();
        ctx.begin_vertical(LayoutStyle::none(), &[]).unwrap();
        assert!(matches!(ctx.end_scroll_view(), Err(LayoutError::Mismatched { .. })));
        ctx.end_group().unwrap();
        assert!(matches!(ctx.end_group(), Err(LayoutError::NoOpenGroup)));
    }

    #[test]
    fn test_fade_scopes_balance() {
        let mut ctx = LayoutContext::new();
        ctx.begin_context(1, PassKind::Layout).unwrap();
        assert!(!ctx.begin_fade_group(0.0).unwrap());
        ctx.end_fade_group().unwrap();
        assert!(ctx.begin_fade_group(1.0).unwrap());
        ctx.end_fade_group().unwrap();
        assert!(ctx.begin_fade_group(0.5).unwrap());
        assert_eq!(ctx.cache().unwrap().open_groups(), 1);
        ctx.end_fade_group().unwrap();
        assert_eq!(ctx.cache().unwrap().open_groups(), 0);
        assert!(matches!(ctx.end_fade_group(), Err(LayoutError::NoOpenGroup)));
    }

    #[test]
    fn test_end_context_reports_open_scopes() {
        let mut ctx = LayoutContext::new();
        ctx.begin_context(1, PassKind::Layout).unwrap();
        ctx.begin_vertical(LayoutStyle::none(), &[]).unwrap();
        ctx.begin_horizontal(LayoutStyle::none(), &[]).unwrap();
        ctx.begin_indent(None, IndentPolicy::Inherit);
        ctx.begin_layout_option(&[LayoutOption::Height(4.0)]);
        let report = ctx.end_context().unwrap();
        assert_eq!(
            report,
            EndReport {
                unclosed_groups: 2,
                unclosed_indents: 1,
                unclosed_label_options: 0,
                unclosed_layout_options: 1,
            }
        );
        assert!(ctx.end_context().unwrap().is_balanced());
    }

    #[test]
    fn test_container_rect_in_reset_group() {
        let mut ctx = LayoutContext::new();
        let build = |ctx: &mut LayoutContext| {
            ctx.reserve_size(10.0, 40.0, LayoutStyle::none(), &[]).unwrap();
            ctx.begin_scroll_view(ScrollSettings::default(), &[]).unwrap();
            ctx.reserve_size(10.0, 10.0, LayoutStyle::none(), &[]).unwrap();
            let r = ctx.container_rect(false).unwrap();
            ctx.end_scroll_view().unwrap();
            vec![r]
        };
        frame(&mut ctx, PassKind::Layout, build);
        let rects = frame(&mut ctx, PassKind::Replay, build);
        assert_eq!(rects[0].origin(), crate::primitives::Point::ORIGIN);
    }
}
