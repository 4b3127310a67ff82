//! Layout nodes and the arena that owns them.
//!
//! Every reservation and group becomes a [`Node`] in a [`NodeArena`]. Nodes
//! are addressed by generation-checked [`NodeId`] handles, so a handle kept
//! across a Layout pass that replaced its tree resolves to
//! [`LayoutError::StaleHandle`] instead of someone else's node.

use std::fmt::Write as _;

use super::constraints::{Axis, AxisConstraint, LayoutOption, SizeConstraint};
use super::scroll::ScrollState;
use super::style::LayoutStyle;
use crate::error::{LayoutError, LayoutResult};
use crate::pool::Pool;
use crate::primitives::{Rect, RectOffset};

/// Handle to a node in a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

// ============================================================================
// Node
// ============================================================================

/// What a node measures.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain leaf with caller-supplied bounds.
    Entry,
    /// Height follows the resolved width.
    Aspect { aspect: f32 },
    /// Height depends on wrapping `text` at the resolved width.
    WordWrap { text: String },
    /// A button grid; bounds are computed once at reservation time.
    Grid { count: usize, x_count: usize },
    Group(Group),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Entry => "entry",
            NodeKind::Aspect { .. } => "aspect",
            NodeKind::WordWrap { .. } => "word-wrap",
            NodeKind::Grid { .. } => "grid",
            NodeKind::Group(group) => group.variant.name(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    /// Bounds after style defaults and options. Never touched by measuring.
    pub(crate) declared: SizeConstraint,
    /// Working bounds, rebuilt from `declared` on every measure.
    pub(crate) size: SizeConstraint,
    pub(crate) rect: Rect,
    pub(crate) style: LayoutStyle,
    /// Starts as the style margin; transparent groups overwrite it with the
    /// edge margins of their children.
    pub(crate) margin: RectOffset,
    pub(crate) kind: NodeKind,
}

impl Node {
    /// Build a node: style defaults first, then `options` in order.
    pub(crate) fn new(style: LayoutStyle, bounds: SizeConstraint, options: &[LayoutOption], kind: NodeKind) -> Self {
        let mut declared = bounds;
        for axis in Axis::BOTH {
            declared.axis_mut(axis).stretch = style.default_stretch(axis);
        }
        super::constraints::apply_options(&mut declared, options);
        Self {
            declared,
            size: declared,
            rect: Rect::ZERO,
            style,
            margin: style.margin,
            kind,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Bounds as of the last measure.
    #[inline]
    pub fn size(&self) -> &SizeConstraint {
        &self.size
    }

    #[inline]
    pub fn declared(&self) -> &SizeConstraint {
        &self.declared
    }

    #[inline]
    pub fn style(&self) -> &LayoutStyle {
        &self.style
    }

    #[inline]
    pub fn margin(&self) -> RectOffset {
        self.margin
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            NodeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut Group> {
        match &mut self.kind {
            NodeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    /// The group payload, or a mismatch error naming what was found.
    pub(crate) fn kind_group_mut(&mut self) -> LayoutResult<&mut Group> {
        let found = self.kind.name();
        self.as_group_mut().ok_or(LayoutError::Mismatched {
            expected: "group",
            found,
        })
    }

    pub(crate) fn set_axis(&mut self, axis: Axis, pos: f32, size: f32) {
        match axis {
            Axis::Horizontal => {
                self.rect.x = pos;
                self.rect.width = size;
            }
            Axis::Vertical => {
                self.rect.y = pos;
                self.rect.height = size;
            }
        }
    }
}

// ============================================================================
// Group
// ============================================================================

/// Behaviour layered on top of the plain group solver.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupVariant {
    Plain,
    Scroll(ScrollState),
    /// Measured height is scaled by `value` in (0, 1).
    Fade { value: f32 },
}

impl GroupVariant {
    pub fn name(&self) -> &'static str {
        match self {
            GroupVariant::Plain => "group",
            GroupVariant::Scroll(_) => "scroll group",
            GroupVariant::Fade { .. } => "fade group",
        }
    }

    /// Same variant, ignoring payload.
    pub(crate) fn same_kind(&self, other: &GroupVariant) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Ordered children plus the solver's per-axis bookkeeping.
#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) children: Vec<NodeId>,
    pub(crate) is_vertical: bool,
    /// Children are positioned relative to the group instead of the screen.
    pub(crate) reset_coords: bool,
    pub(crate) spacing: f32,
    pub(crate) window_id: Option<u64>,
    pub(crate) cursor: usize,
    /// Child sums (stacking axis) or maxima (cross axis), without spacing.
    pub(crate) child_min: [f32; 2],
    pub(crate) child_max: [f32; 2],
    pub(crate) stretchable: [f32; 2],
    /// A size option on this axis makes a transparent group pad like a
    /// visual one.
    pub(crate) user_specified: [bool; 2],
    pub(crate) variant: GroupVariant,
}

impl Group {
    pub(crate) fn new(children: Vec<NodeId>, is_vertical: bool, variant: GroupVariant) -> Self {
        Self {
            children,
            is_vertical,
            reset_coords: false,
            spacing: 0.0,
            window_id: None,
            cursor: 0,
            child_min: [0.0; 2],
            child_max: [0.0; 2],
            stretchable: [0.0; 2],
            user_specified: [false; 2],
            variant,
        }
    }

    /// Record spacing and which axes the caller sized explicitly.
    pub(crate) fn apply_options(&mut self, options: &[LayoutOption]) {
        for option in options {
            match option {
                LayoutOption::Spacing(v) => self.spacing = v.round(),
                o if o.is_size_bound() => {
                    if let Some(axis) = o.axis() {
                        self.user_specified[axis.index()] = true;
                    }
                }
                _ => {}
            }
        }
    }

    /// The axis children are stacked along.
    #[inline]
    pub fn stacking_axis(&self) -> Axis {
        if self.is_vertical { Axis::Vertical } else { Axis::Horizontal }
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.is_vertical
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn variant(&self) -> &GroupVariant {
        &self.variant
    }

    #[inline]
    pub(crate) fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// The child at the cursor, advancing it.
    pub(crate) fn next(&mut self) -> LayoutResult<NodeId> {
        let id = self.peek()?;
        self.cursor += 1;
        Ok(id)
    }

    /// The child at the cursor.
    pub(crate) fn peek(&self) -> LayoutResult<NodeId> {
        self.children
            .get(self.cursor)
            .copied()
            .ok_or(LayoutError::CursorOverrun {
                index: self.cursor,
                count: self.children.len(),
            })
    }

    /// The child most recently returned by [`Group::next`].
    pub(crate) fn last(&self) -> LayoutResult<NodeId> {
        if self.cursor == 0 {
            return Err(LayoutError::NoPreviousControl);
        }
        self.children
            .get(self.cursor - 1)
            .copied()
            .ok_or(LayoutError::CursorOverrun {
                index: self.cursor,
                count: self.children.len(),
            })
    }
}

// ============================================================================
// Arena
// ============================================================================

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Slot storage for every node of every cached tree.
///
/// Released slots go on a free list and their generation is bumped. Child
/// lists and word-wrap strings of released nodes are parked in pools.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    child_lists: Pool<Vec<NodeId>>,
    strings: Pool<String>,
    release_stack: Vec<NodeId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId { index, generation: 0 }
    }

    pub fn get(&self, id: NodeId) -> LayoutResult<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(LayoutError::StaleHandle)
    }

    pub fn get_mut(&mut self, id: NodeId) -> LayoutResult<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(LayoutError::StaleHandle)
    }

    pub fn group(&self, id: NodeId) -> LayoutResult<&Group> {
        let node = self.get(id)?;
        node.as_group().ok_or(LayoutError::Mismatched {
            expected: "group",
            found: node.kind.name(),
        })
    }

    pub fn group_mut(&mut self, id: NodeId) -> LayoutResult<&mut Group> {
        self.get_mut(id)?.kind_group_mut()
    }

    /// Whether `id` still refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_ok()
    }

    /// Release `root` and its whole subtree. Returns how many nodes were
    /// freed; a stale `root` frees nothing.
    pub fn release(&mut self, root: NodeId) -> usize {
        if !self.contains(root) {
            tracing::warn!(?root, "ignoring release of a stale layout handle");
            return 0;
        }

        let mut stack = std::mem::take(&mut self.release_stack);
        stack.push(root);
        let mut released = 0;
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slots.get_mut(id.index as usize) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            released += 1;

            match node.kind {
                NodeKind::Group(group) => {
                    stack.extend_from_slice(&group.children);
                    self.child_lists.put(group.children);
                }
                NodeKind::WordWrap { text } => self.strings.put(text),
                _ => {}
            }
        }
        self.release_stack = stack;
        released
    }

    /// An empty child list, recycled when possible.
    pub(crate) fn child_list(&mut self) -> Vec<NodeId> {
        self.child_lists.get()
    }

    /// An owned copy of `text` in a recycled buffer.
    pub(crate) fn string(&mut self, text: &str) -> String {
        let mut out = self.strings.get();
        out.push_str(text);
        out
    }

    /// Number of live nodes.
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of slots ever allocated.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Append a human-readable dump of `root`'s subtree to `out`.
    pub fn dump(&self, root: NodeId, out: &mut String) -> LayoutResult<()> {
        self.dump_node(root, 0, out)
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) -> LayoutResult<()> {
        let node = self.get(id)?;
        let r = node.rect;
        let w = &node.size.width;
        let h = &node.size.height;
        let _ = writeln!(
            out,
            "{:indent$}{} (x:{}-{}, y:{}-{})   -   W: {}-{}{}, H: {}-{}{}",
            "",
            node.kind.name(),
            r.x,
            r.right(),
            r.y,
            r.bottom(),
            w.min,
            w.max,
            stretch_marker(w),
            h.min,
            h.max,
            stretch_marker(h),
            indent = depth * 4,
        );
        if let Some(group) = node.as_group() {
            for &child in &group.children {
                self.dump_node(child, depth + 1, out)?;
            }
        }
        Ok(())
    }
}

fn stretch_marker(c: &AxisConstraint) -> &'static str {
    if c.stretch != 0.0 { "+" } else { "" }
}
