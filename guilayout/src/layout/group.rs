//! The group solver.
//!
//! Measuring runs bottom-up per axis (`measure`), arranging runs top-down
//! (`arrange`). Width is measured and arranged for the whole tree before any
//! height is measured, so width-dependent leaves see their final width.
//!
//! Along the stacking axis children are summed with collapsed margins; along
//! the cross axis the widest child (margins included) wins. Spare space is
//! first used to grow children from min towards max, then handed to
//! stretchable children by weight. Children with an unbounded max count at
//! their min until that last step.

use super::constraints::{clamp, lerp, ratio, Axis, AxisConstraint};
use super::entry;
use super::node::{GroupVariant, NodeArena, NodeId, NodeKind};
use crate::config::LayoutConfig;
use crate::error::LayoutResult;
use crate::measure::ContentMeasure;

/// How a node is measured and arranged.
#[derive(Debug, Clone, Copy)]
enum Dispatch {
    Leaf,
    Plain,
    Scroll,
    Fade(f32),
}

/// Aggregate of a group's children along one axis.
#[derive(Debug, Clone, Copy, Default)]
struct Extent {
    child_min: f32,
    child_max: f32,
    stretch: f32,
    /// Margins at the group's edges, not part of the child sums.
    lead: i32,
    trail: i32,
}

/// One measure/arrange run over a tree in the arena.
pub(crate) struct Solver<'a> {
    pub(super) arena: &'a mut NodeArena,
    pub(super) content: &'a dyn ContentMeasure,
    pub(super) config: &'a LayoutConfig,
}

impl<'a> Solver<'a> {
    pub(crate) fn new(arena: &'a mut NodeArena, content: &'a dyn ContentMeasure, config: &'a LayoutConfig) -> Self {
        Self { arena, content, config }
    }

    fn dispatch(&self, id: NodeId) -> LayoutResult<Dispatch> {
        Ok(match &self.arena.get(id)?.kind {
            NodeKind::Group(group) => match group.variant {
                GroupVariant::Plain => Dispatch::Plain,
                GroupVariant::Scroll(_) => Dispatch::Scroll,
                GroupVariant::Fade { value } => Dispatch::Fade(value),
            },
            _ => Dispatch::Leaf,
        })
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Lay out `root` at the origin, no larger than its own max.
    pub(crate) fn solve_clamped(&mut self, root: NodeId, width: f32, height: f32) -> LayoutResult<()> {
        self.measure(root, Axis::Horizontal)?;
        let w = width.min(self.arena.get(root)?.size.width.max);
        self.arrange(root, Axis::Horizontal, 0.0, w)?;
        self.measure(root, Axis::Vertical)?;
        let h = height.min(self.arena.get(root)?.size.height.max);
        self.arrange(root, Axis::Vertical, 0.0, h)
    }

    /// Lay out `root` at the origin, filling exactly `width` x `height`.
    pub(crate) fn solve_fill(&mut self, root: NodeId, width: f32, height: f32) -> LayoutResult<()> {
        self.measure(root, Axis::Horizontal)?;
        self.arrange(root, Axis::Horizontal, 0.0, width)?;
        self.measure(root, Axis::Vertical)?;
        self.arrange(root, Axis::Vertical, 0.0, height)
    }

    /// Lay out `root` at `width`, returning the height it needs. It is
    /// arranged at that height.
    pub(crate) fn solve_for_width(&mut self, root: NodeId, width: f32) -> LayoutResult<f32> {
        self.measure(root, Axis::Horizontal)?;
        self.arrange(root, Axis::Horizontal, 0.0, width)?;
        self.measure(root, Axis::Vertical)?;
        let h = self.arena.get(root)?.size.height.min;
        self.arrange(root, Axis::Vertical, 0.0, h)?;
        Ok(h)
    }

    /// Lay out a floating group at its own position, as large as its
    /// content allows within its declared bounds.
    pub(crate) fn solve_floating(&mut self, id: NodeId) -> LayoutResult<()> {
        for axis in Axis::BOTH {
            let declared = *self.arena.get(id)?.declared.axis(axis);
            let upper = if declared.max == 0.0 { f32::INFINITY } else { declared.max };
            self.measure(id, axis)?;
            let node = self.arena.get(id)?;
            let size = clamp(node.size.axis(axis).max, declared.min, upper);
            let pos = match axis {
                Axis::Horizontal => node.rect.x,
                Axis::Vertical => node.rect.y,
            };
            self.arrange(id, axis, pos, size)?;
        }
        Ok(())
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Recompute `id`'s working bounds on `axis` from its content.
    pub(crate) fn measure(&mut self, id: NodeId, axis: Axis) -> LayoutResult<()> {
        match self.dispatch(id)? {
            Dispatch::Leaf => {
                let node = self.arena.get_mut(id)?;
                entry::measure_leaf(node, axis, self.content);
                Ok(())
            }
            Dispatch::Plain => {
                let declared = *self.arena.get(id)?.declared.axis(axis);
                self.measure_group(id, axis, declared)
            }
            Dispatch::Scroll => self.measure_scroll(id, axis),
            Dispatch::Fade(value) => {
                let declared = *self.arena.get(id)?.declared.axis(axis);
                self.measure_group(id, axis, declared)?;
                if axis == Axis::Vertical {
                    let c = &mut self.arena.get_mut(id)?.size.height;
                    c.min *= value;
                    c.max *= value;
                }
                Ok(())
            }
        }
    }

    /// Place `id` at `pos` with extent `size` on `axis`.
    pub(crate) fn arrange(&mut self, id: NodeId, axis: Axis, pos: f32, size: f32) -> LayoutResult<()> {
        match self.dispatch(id)? {
            Dispatch::Leaf => {
                self.arena.get_mut(id)?.set_axis(axis, pos, size);
                Ok(())
            }
            Dispatch::Plain | Dispatch::Fade(_) => self.arrange_group(id, axis, pos, size),
            Dispatch::Scroll => self.arrange_scroll(id, axis, pos, size),
        }
    }

    // ========================================================================
    // Measure
    // ========================================================================

    /// Measure a group's children and derive its own bounds, using
    /// `declared` as the caller-imposed bounds.
    pub(super) fn measure_group(&mut self, id: NodeId, axis: Axis, declared: AxisConstraint) -> LayoutResult<()> {
        let count = self.arena.group(id)?.len();
        for i in 0..count {
            let child = self.arena.group(id)?.children[i];
            self.measure(child, axis)?;
        }

        let group = self.arena.group(id)?;
        let stacking = group.stacking_axis() == axis;
        let extent = if stacking {
            self.stack_extent(&group.children, axis)?
        } else {
            self.cross_extent(&group.children, axis)?
        };
        let spacing = if stacking && count > 0 {
            group.spacing * (count - 1) as f32
        } else {
            0.0
        };

        let node = self.arena.get_mut(id)?;
        let style = node.style;

        if count == 0 {
            let pad = axis.total(&style.padding) as f32;
            *node.size.axis_mut(axis) = AxisConstraint {
                min: pad,
                max: pad,
                stretch: declared.stretch,
            };
            return Ok(());
        }

        let group = node.kind_group_mut()?;
        let i = axis.index();
        group.child_min[i] = extent.child_min;
        group.child_max[i] = extent.child_max;
        group.stretchable[i] = extent.stretch;
        let padded = !style.is_transparent() || group.user_specified[i];

        let edges = if padded {
            axis.leading(&style.padding).max(extent.lead) + axis.trailing(&style.padding).max(extent.trail)
        } else {
            axis.set_leading(&mut node.margin, extent.lead);
            axis.set_trailing(&mut node.margin, extent.trail);
            0
        } as f32;

        let mut c = AxisConstraint {
            min: declared.min.max(extent.child_min + spacing + edges),
            max: declared.max,
            stretch: 0.0,
        };
        if declared.is_open() {
            c.max = extent.child_max + spacing + edges;
            c.stretch = declared.stretch + extent.stretch;
        }
        c.max = c.max.max(c.min);

        let fixed = style.fixed(axis);
        if fixed != 0.0 {
            c = AxisConstraint::fixed(fixed);
        }
        *node.size.axis_mut(axis) = c;
        Ok(())
    }

    /// Sum along the stacking axis with collapsed margins between
    /// neighbours. Spacers add their size but leave the running margin alone.
    fn stack_extent(&self, children: &[NodeId], axis: Axis) -> LayoutResult<Extent> {
        let mut e = Extent::default();
        let mut first_lead = None;
        let mut last_margin = 0;
        for &child in children {
            let node = self.arena.get(child)?;
            let c = node.size.axis(axis);
            if node.style.is_space() {
                e.child_min += c.min;
                e.child_max += c.max;
            } else {
                let lead = axis.leading(&node.margin);
                let gap = match first_lead {
                    None => {
                        first_lead = Some(lead);
                        0
                    }
                    Some(_) => last_margin.max(lead),
                };
                e.child_min += c.min + gap as f32;
                e.child_max += c.max + gap as f32;
                last_margin = axis.trailing(&node.margin);
            }
            e.stretch += c.stretch;
        }
        e.lead = first_lead.unwrap_or(0);
        e.trail = last_margin;
        Ok(e)
    }

    /// Largest child along the cross axis. Margins are included per child,
    /// then the smallest leading and trailing margins are taken back out
    /// and become the edge margins.
    fn cross_extent(&self, children: &[NodeId], axis: Axis) -> LayoutResult<Extent> {
        let mut e = Extent::default();
        let mut edges: Option<(i32, i32)> = None;
        for &child in children {
            let node = self.arena.get(child)?;
            let c = node.size.axis(axis);
            if !node.style.is_space() {
                let lead = axis.leading(&node.margin);
                let trail = axis.trailing(&node.margin);
                edges = Some(match edges {
                    None => (lead, trail),
                    Some((l, t)) => (l.min(lead), t.min(trail)),
                });
                let margins = (lead + trail) as f32;
                e.child_min = e.child_min.max(c.min + margins);
                e.child_max = e.child_max.max(c.max + margins);
            }
            e.stretch += c.stretch;
        }
        if let Some((lead, trail)) = edges {
            e.child_min -= (lead + trail) as f32;
            e.child_max -= (lead + trail) as f32;
            e.lead = lead;
            e.trail = trail;
        }
        Ok(e)
    }

    // ========================================================================
    // Arrange
    // ========================================================================

    pub(super) fn arrange_group(&mut self, id: NodeId, axis: Axis, pos: f32, size: f32) -> LayoutResult<()> {
        let node = self.arena.get_mut(id)?;
        node.set_axis(axis, pos, size);
        let style = node.style;
        let margin = node.margin;
        let group = node.kind_group_mut()?;
        let count = group.len();
        if count == 0 {
            return Ok(());
        }

        let i = axis.index();
        let stacking = group.stacking_axis() == axis;
        let spacing = group.spacing;
        let (child_min, child_max, stretchable) = (group.child_min[i], group.child_max[i], group.stretchable[i]);
        let padded = !style.is_transparent() || group.user_specified[i];
        let mut pos = if group.reset_coords { 0.0 } else { pos };

        if stacking {
            let mut size = size;
            if padded {
                let (first, last) = self.stack_edges(id, axis)?;
                let lead = axis.leading(&style.padding).max(first) as f32;
                let trail = axis.trailing(&style.padding).max(last) as f32;
                pos += lead;
                size -= lead + trail;
            }

            // Unbounded children count at their min while interpolating and
            // share the surplus when nothing stretches.
            let mut finite_max = child_min;
            let mut unbounded = 0.0;
            for &child in &self.arena.group(id)?.children {
                let c = self.arena.get(child)?.size.axis(axis);
                if c.max.is_finite() {
                    finite_max += c.max - c.min;
                } else {
                    unbounded += 1.0;
                }
            }

            let to_distribute = size - spacing * (count - 1) as f32;
            let t = ratio(to_distribute, child_min, finite_max);
            let surplus = (to_distribute - finite_max).max(0.0);
            let (per_stretch, per_unbounded) = if surplus > 0.0 && stretchable > 0.0 {
                (surplus / stretchable, 0.0)
            } else if surplus > 0.0 && unbounded > 0.0 {
                (0.0, surplus / unbounded)
            } else {
                (0.0, 0.0)
            };

            let mut last_margin = 0;
            let mut first = true;
            for k in 0..count {
                let child = self.arena.group(id)?.children[k];
                let node = self.arena.get(child)?;
                let c = *node.size.axis(axis);
                let extent = if c.max.is_finite() {
                    lerp(c.min, c.max, t) + per_stretch * c.stretch
                } else {
                    c.min + per_stretch * c.stretch + per_unbounded
                };
                if !node.style.is_space() {
                    let lead = if first { 0 } else { axis.leading(&node.margin) };
                    first = false;
                    pos += last_margin.max(lead) as f32;
                    last_margin = axis.trailing(&node.margin);
                }
                self.arrange(child, axis, pos.round(), extent.round())?;
                pos += extent + spacing;
            }
        } else {
            for k in 0..count {
                let child = self.arena.group(id)?.children[k];
                let node = self.arena.get(child)?;
                let c = *node.size.axis(axis);
                let m = node.margin;
                let (p, s) = if padded {
                    let lead = axis.leading(&m).max(axis.leading(&style.padding)) as f32;
                    let trail = axis.trailing(&m).max(axis.trailing(&style.padding)) as f32;
                    (pos + lead, size - lead - trail)
                } else {
                    // Part of the children's margins was forwarded to us.
                    let outer = pos - axis.leading(&margin) as f32;
                    let outer_size = size + axis.total(&margin) as f32;
                    (outer + axis.leading(&m) as f32, outer_size - axis.total(&m) as f32)
                };
                let s = if c.stretch != 0.0 { s.max(0.0) } else { clamp(s, c.min, c.max) };
                self.arrange(child, axis, p, s)?;
            }
        }
        Ok(())
    }

    /// Leading margin of the first and trailing margin of the last
    /// non-spacer child.
    fn stack_edges(&self, id: NodeId, axis: Axis) -> LayoutResult<(i32, i32)> {
        let mut edges: Option<(i32, i32)> = None;
        for &child in &self.arena.group(id)?.children {
            let node = self.arena.get(child)?;
            if node.style.is_space() {
                continue;
            }
            let lead = axis.leading(&node.margin);
            let trail = axis.trailing(&node.margin);
            edges = Some(match edges {
                None => (lead, trail),
                Some((l, _)) => (l, trail),
            });
        }
        Ok(edges.unwrap_or((0, 0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::constraints::{LayoutOption, SizeConstraint};
    use crate::layout::node::{Group, Node};
    use crate::layout::style::LayoutStyle;
    use crate::measure::MonospaceMeasure;
    use crate::primitives::{Rect, RectOffset};

    struct Tree {
        arena: NodeArena,
        config: LayoutConfig,
        measure: MonospaceMeasure,
    }

    impl Tree {
        fn new() -> Self {
            Self {
                arena: NodeArena::new(),
                config: LayoutConfig::default(),
                measure: MonospaceMeasure::default(),
            }
        }

        fn leaf(&mut self, min_w: f32, max_w: f32, min_h: f32, max_h: f32, style: LayoutStyle, options: &[LayoutOption]) -> NodeId {
            self.arena.alloc(Node::new(
                style,
                SizeConstraint::new(min_w, max_w, min_h, max_h),
                options,
                NodeKind::Entry,
            ))
        }

        fn group(&mut self, vertical: bool, style: LayoutStyle, options: &[LayoutOption], children: &[NodeId]) -> NodeId {
            let mut list = self.arena.child_list();
            list.extend_from_slice(children);
            let mut group = Group::new(list, vertical, GroupVariant::Plain);
            group.apply_options(options);
            self.arena
                .alloc(Node::new(style, SizeConstraint::ZERO, options, NodeKind::Group(group)))
        }

        fn solver(&mut self) -> Solver<'_> {
            Solver::new(&mut self.arena, &self.measure, &self.config)
        }

        fn rect(&self, id: NodeId) -> Rect {
            self.arena.get(id).unwrap().rect
        }

        fn size(&self, id: NodeId) -> SizeConstraint {
            self.arena.get(id).unwrap().size
        }
    }

    #[test]
    fn test_stretch_surplus_split_by_weight() {
        let mut t = Tree::new();
        let a = t.leaf(10.0, 10.0, 10.0, 10.0, LayoutStyle::none(), &[]);
        let b = t.leaf(10.0, 10.0, 10.0, 10.0, LayoutStyle::none(), &[LayoutOption::ExpandWidth(true)]);
        let c = t.leaf(10.0, 10.0, 10.0, 10.0, LayoutStyle::none(), &[LayoutOption::ExpandWidth(true)]);
        let row = t.group(false, LayoutStyle::none(), &[], &[a, b, c]);

        t.solver().solve_fill(row, 50.0, 10.0).unwrap();
        assert_eq!(t.rect(a), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(t.rect(b), Rect::new(10.0, 0.0, 20.0, 10.0));
        assert_eq!(t.rect(c), Rect::new(30.0, 0.0, 20.0, 10.0));

        t.solver().solve_fill(row, 40.0, 10.0).unwrap();
        assert_eq!(t.rect(b).width, 15.0);
        assert_eq!(t.rect(c).width, 15.0);
    }

    #[test]
    fn test_unbounded_child_does_not_freeze_row() {
        let mut t = Tree::new();
        let a = t.leaf(10.0, 100.0, 10.0, 10.0, LayoutStyle::none(), &[]);
        let b = t.leaf(0.0, 0.0, 10.0, 10.0, LayoutStyle::none(), &[LayoutOption::MinWidth(50.0)]);
        let flex = t.leaf(0.0, 0.0, 0.0, 0.0, LayoutStyle::none(), &[LayoutOption::ExpandWidth(true)]);
        let row = t.group(false, LayoutStyle::none(), &[], &[a, b, flex]);

        t.solver().solve_fill(row, 300.0, 10.0).unwrap();
        assert_eq!(t.rect(a).width, 100.0);
        assert_eq!(t.rect(b), Rect::new(100.0, 0.0, 50.0, 10.0));
        assert_eq!(t.rect(flex), Rect::new(150.0, 0.0, 150.0, 0.0));
    }

    #[test]
    fn test_unbounded_child_takes_surplus_without_stretch() {
        let mut t = Tree::new();
        let a = t.leaf(10.0, 40.0, 10.0, 10.0, LayoutStyle::none(), &[]);
        let b = t.leaf(0.0, 0.0, 10.0, 10.0, LayoutStyle::none(), &[LayoutOption::MinWidth(50.0)]);
        let row = t.group(false, LayoutStyle::none(), &[], &[a, b]);

        t.solver().solve_fill(row, 200.0, 10.0).unwrap();
        assert_eq!(t.rect(a).width, 40.0);
        assert_eq!(t.rect(b), Rect::new(40.0, 0.0, 160.0, 10.0));

        // Below the finite total the unbounded child stays at its min.
        t.solver().solve_fill(row, 75.0, 10.0).unwrap();
        assert_eq!(t.rect(a).width, 25.0);
        assert_eq!(t.rect(b).width, 50.0);
    }

    #[test]
    fn test_stretching_child_never_gets_negative_cross_size() {
        let mut t = Tree::new();
        let leaf = t.leaf(10.0, 10.0, 10.0, 10.0, LayoutStyle::none(), &[LayoutOption::ExpandWidth(true)]);
        let padded = LayoutStyle::visual().padding(RectOffset::all(5));
        let column = t.group(true, padded, &[], &[leaf]);

        t.solver().solve_fill(column, 4.0, 100.0).unwrap();
        assert_eq!(t.rect(leaf), Rect::new(5.0, 5.0, 0.0, 10.0));
    }

    #[test]
    fn test_min_max_interpolation() {
        let mut t = Tree::new();
        let a = t.leaf(10.0, 30.0, 5.0, 5.0, LayoutStyle::none(), &[]);
        let b = t.leaf(10.0, 50.0, 5.0, 5.0, LayoutStyle::none(), &[]);
        let row = t.group(false, LayoutStyle::none(), &[], &[a, b]);

        // Halfway between sum of mins (20) and sum of maxes (80).
        t.solver().solve_fill(row, 50.0, 5.0).unwrap();
        assert_eq!(t.rect(a).width, 20.0);
        assert_eq!(t.rect(b).width, 30.0);
        assert_eq!(t.rect(b).x, 20.0);
    }

    #[test]
    fn test_margins_collapse_to_max_plus_spacing() {
        let mut t = Tree::new();
        let a = t.leaf(10.0, 10.0, 10.0, 10.0, LayoutStyle::visual().margin(RectOffset::all(4)), &[]);
        let b = t.leaf(10.0, 10.0, 10.0, 10.0, LayoutStyle::visual().margin(RectOffset::all(6)), &[]);
        let col = t.group(true, LayoutStyle::none(), &[LayoutOption::Spacing(3.0)], &[a, b]);

        t.solver().solve_fill(col, 100.0, 100.0).unwrap();
        let gap = t.rect(b).y - t.rect(a).bottom();
        assert_eq!(gap, 9.0);
        // Stacking min: 10 + 6 + 10 + spacing 3, edge margins forwarded.
        assert_eq!(t.size(col).height.min, 29.0);
        let margin = t.arena.get(col).unwrap().margin;
        assert_eq!((margin.top, margin.bottom), (4, 6));
    }

    #[test]
    fn test_spacer_does_not_block_collapse() {
        let mut t = Tree::new();
        let m = LayoutStyle::visual().margin(RectOffset::all(5));
        let a = t.leaf(10.0, 10.0, 10.0, 10.0, m, &[]);
        let space = t.leaf(0.0, 0.0, 2.0, 2.0, LayoutStyle::SPACE, &[LayoutOption::Height(2.0)]);
        let b = t.leaf(10.0, 10.0, 10.0, 10.0, m, &[]);
        let col = t.group(true, LayoutStyle::none(), &[], &[a, space, b]);

        t.solver().solve_fill(col, 50.0, 100.0).unwrap();
        assert_eq!(t.rect(space).y, 10.0);
        assert_eq!(t.rect(b).y, 17.0);
        assert_eq!(t.size(col).height.min, 27.0);
    }

    #[test]
    fn test_cross_axis_uses_edge_margins() {
        let mut t = Tree::new();
        let a = t.leaf(20.0, 20.0, 5.0, 5.0, LayoutStyle::visual().margin(RectOffset::new(2, 2, 0, 0)), &[]);
        let b = t.leaf(30.0, 30.0, 5.0, 5.0, LayoutStyle::visual().margin(RectOffset::new(8, 1, 0, 0)), &[]);
        let col = t.group(true, LayoutStyle::none(), &[], &[a, b]);

        t.solver().measure(col, Axis::Horizontal).unwrap();
        // max(20 + 4, 30 + 9) - (2 + 1)
        assert_eq!(t.size(col).width.min, 36.0);
        let margin = t.arena.get(col).unwrap().margin;
        assert_eq!((margin.left, margin.right), (2, 1));

        let mut t = Tree::new();
        let a = t.leaf(5.0, 5.0, 20.0, 20.0, LayoutStyle::visual().margin(RectOffset::new(0, 0, 2, 2)), &[]);
        let b = t.leaf(5.0, 5.0, 30.0, 30.0, LayoutStyle::visual().margin(RectOffset::new(0, 0, 8, 1)), &[]);
        let row = t.group(false, LayoutStyle::none(), &[], &[a, b]);
        t.solver().measure(row, Axis::Vertical).unwrap();
        assert_eq!(t.size(row).height.min, 36.0);
    }

    #[test]
    fn test_visual_group_pads_with_max_of_padding_and_margin() {
        let mut t = Tree::new();
        let a = t.leaf(10.0, 10.0, 10.0, 10.0, LayoutStyle::visual().margin(RectOffset::all(2)), &[]);
        let style = LayoutStyle::visual().padding(RectOffset::all(5));
        let col = t.group(true, style, &[], &[a]);

        t.solver().solve_fill(col, 100.0, 100.0).unwrap();
        assert_eq!(t.size(col).width.min, 20.0);
        assert_eq!(t.size(col).height.min, 20.0);
        assert_eq!(t.rect(a), Rect::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn test_empty_group_is_its_padding() {
        let mut t = Tree::new();
        let style = LayoutStyle::visual().padding(RectOffset::new(3, 4, 1, 2));
        let col = t.group(true, style, &[], &[]);
        t.solver().measure(col, Axis::Horizontal).unwrap();
        t.solver().measure(col, Axis::Vertical).unwrap();
        assert_eq!(t.size(col).width, AxisConstraint::fixed(7.0));
        assert_eq!(t.size(col).height, AxisConstraint::fixed(3.0));
    }

    #[test]
    fn test_declared_max_disables_group_stretch() {
        let mut t = Tree::new();
        let a = t.leaf(10.0, 10.0, 10.0, 10.0, LayoutStyle::none(), &[LayoutOption::ExpandWidth(true)]);
        let row = t.group(false, LayoutStyle::none(), &[LayoutOption::MaxWidth(40.0)], &[a]);
        t.solver().measure(row, Axis::Horizontal).unwrap();
        assert_eq!(t.size(row).width.max, 40.0);
        assert_eq!(t.size(row).width.stretch, 0.0);

        let row = t.group(false, LayoutStyle::none(), &[], &[a]);
        t.solver().measure(row, Axis::Horizontal).unwrap();
        assert_eq!(t.size(row).width.stretch, 1.0);
    }

    #[test]
    fn test_fixed_style_overrides_children() {
        let mut t = Tree::new();
        let a = t.leaf(50.0, 50.0, 10.0, 10.0, LayoutStyle::none(), &[]);
        let style = LayoutStyle::visual().fixed_width(30.0);
        let row = t.group(false, style, &[], &[a]);
        t.solver().measure(row, Axis::Horizontal).unwrap();
        assert_eq!(t.size(row).width, AxisConstraint::fixed(30.0));
    }

    #[test]
    fn test_remeasure_is_idempotent() {
        let mut t = Tree::new();
        let a = t.leaf(10.0, 20.0, 10.0, 10.0, LayoutStyle::visual().margin(RectOffset::all(3)), &[]);
        let b = t.leaf(10.0, 10.0, 10.0, 10.0, LayoutStyle::none(), &[LayoutOption::ExpandWidth(true)]);
        let row = t.group(false, LayoutStyle::none(), &[], &[a, b]);

        t.solver().solve_clamped(row, 200.0, 100.0).unwrap();
        let first = (t.rect(row), t.rect(a), t.rect(b), t.size(row));
        t.solver().solve_clamped(row, 200.0, 100.0).unwrap();
        assert_eq!(first, (t.rect(row), t.rect(a), t.rect(b), t.size(row)));
    }

    #[test]
    fn test_cross_axis_clamps_non_stretching_children() {
        let mut t = Tree::new();
        let a = t.leaf(10.0, 40.0, 10.0, 10.0, LayoutStyle::none(), &[]);
        let b = t.leaf(10.0, 10.0, 10.0, 10.0, LayoutStyle::none(), &[LayoutOption::ExpandWidth(true)]);
        let col = t.group(true, LayoutStyle::none(), &[], &[a, b]);
        t.solver().solve_fill(col, 100.0, 50.0).unwrap();
        assert_eq!(t.rect(a).width, 40.0);
        assert_eq!(t.rect(b).width, 100.0);
    }

    #[test]
    fn test_fade_scales_height() {
        let mut t = Tree::new();
        let a = t.leaf(10.0, 10.0, 40.0, 40.0, LayoutStyle::none(), &[]);
        let mut list = t.arena.child_list();
        list.push(a);
        let fade = t.arena.alloc(Node::new(
            LayoutStyle::none(),
            SizeConstraint::ZERO,
            &[],
            NodeKind::Group(Group::new(list, true, GroupVariant::Fade { value: 0.25 })),
        ));
        t.solver().measure(fade, Axis::Vertical).unwrap();
        assert_eq!(t.size(fade).height, AxisConstraint::fixed(10.0));
    }

    #[test]
    fn test_floating_group_respects_declared_size() {
        let mut t = Tree::new();
        let a = t.leaf(10.0, 10.0, 10.0, 10.0, LayoutStyle::none(), &[LayoutOption::ExpandWidth(true)]);
        let area = t.group(true, LayoutStyle::none(), &[LayoutOption::Width(60.0), LayoutOption::Height(30.0)], &[a]);
        t.arena.get_mut(area).unwrap().rect = Rect::new(5.0, 7.0, 0.0, 0.0);

        t.solver().solve_floating(area).unwrap();
        assert_eq!(t.rect(area), Rect::new(5.0, 7.0, 60.0, 30.0));
        assert_eq!(t.rect(a).x, 5.0);
        assert_eq!(t.rect(a).width, 60.0);
    }
}
