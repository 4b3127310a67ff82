//! Leaf nodes: plain entries, aspect sizers, word-wrap sizers and grids.

use super::constraints::{Axis, AxisConstraint, LayoutOption, SizeConstraint};
use super::node::{Node, NodeKind};
use super::style::LayoutStyle;
use crate::measure::ContentMeasure;
use crate::primitives::Size;

/// Rebuild a leaf's working bounds on `axis` from its declared bounds.
pub(crate) fn measure_leaf(node: &mut Node, axis: Axis, measure: &dyn ContentMeasure) {
    let declared = *node.declared.axis(axis);
    let c = match (&node.kind, axis) {
        (NodeKind::Aspect { aspect }, Axis::Vertical) => {
            let h = if *aspect > 0.0 { node.rect.width / aspect } else { 0.0 };
            AxisConstraint {
                min: h,
                max: h,
                stretch: declared.stretch,
            }
        }
        (NodeKind::WordWrap { text }, Axis::Horizontal) => {
            let mut c = declared;
            if c.min == 0.0 || c.max == 0.0 {
                let (min, max) = measure.min_max_width(&node.style, text);
                if c.min == 0.0 {
                    c.min = min;
                }
                if c.max == 0.0 {
                    c.max = max;
                }
                c.heal();
            }
            c
        }
        // Declared height stays the user-forced part; scroll groups may ask
        // twice with different widths.
        (NodeKind::WordWrap { text }, Axis::Vertical) => {
            let mut c = declared;
            if c.min == 0.0 || c.max == 0.0 {
                let h = measure.height_for_width(&node.style, text, node.rect.width);
                if c.min == 0.0 {
                    c.min = h;
                }
                if c.max == 0.0 {
                    c.max = h;
                }
                c.heal();
            }
            c
        }
        _ => declared,
    };
    *node.size.axis_mut(axis) = c;
}

/// Bounds for a non-wrapping content reservation: the content's natural
/// size, measured against any max options.
pub(crate) fn content_bounds(
    text: &str,
    style: &LayoutStyle,
    options: &[LayoutOption],
    measure: &dyn ContentMeasure,
) -> SizeConstraint {
    let mut max = Size::ZERO;
    for option in options {
        match *option {
            LayoutOption::MaxWidth(v) => max.width = v,
            LayoutOption::MaxHeight(v) => max.height = v,
            _ => {}
        }
    }
    let size = measure.size(style, text, max);
    SizeConstraint::new(size.width, size.width, size.height, size.height)
}

/// Resolve a grid's bounds from its cell sizes.
///
/// Cell sizes come from the style's fixed size first, then from size options
/// divided per cell, and finally from the widest/tallest item.
pub(crate) fn init_grid(node: &mut Node, items: &[&str], x_count: usize, measure: &dyn ContentMeasure) {
    let count = items.len();
    if x_count == 0 || count == 0 {
        return;
    }
    let rows = count.div_ceil(x_count);
    let style = node.style;
    let cols_f = x_count as f32;
    let rows_f = rows as f32;
    let h_gap = style.margin.left.max(style.margin.right) as f32 * (cols_f - 1.0);
    let v_gap = style.margin.top.max(style.margin.bottom) as f32 * (rows_f - 1.0);

    let (min_w, max_w) = cell_bounds(style.fixed_width, &node.declared.width, h_gap, cols_f);
    let (min_h, max_h) = cell_bounds(style.fixed_height, &node.declared.height, v_gap, rows_f);

    let (calc_w, calc_h) = if min_w.is_none() || max_w.is_none() || min_h.is_none() || max_h.is_none() {
        items.iter().fold((0.0f32, 0.0f32), |(w, h), item| {
            let size = measure.size(&style, item, Size::ZERO);
            (w.max(size.width), h.max(size.height))
        })
    } else {
        (0.0, 0.0)
    };

    let min_w = min_w.unwrap_or_else(|| max_w.map_or(calc_w, |m| calc_w.min(m)));
    let max_w = max_w.unwrap_or(calc_w.max(min_w));
    let min_h = min_h.unwrap_or_else(|| max_h.map_or(calc_h, |m| calc_h.min(m)));
    let max_h = max_h.unwrap_or(calc_h.max(min_h));

    let d = &mut node.declared;
    d.width.min = min_w * cols_f + h_gap;
    d.width.max = max_w * cols_f + h_gap;
    d.height.min = min_h * rows_f + v_gap;
    d.height.max = max_h * rows_f + v_gap;
    node.size = node.declared;
}

/// Per-cell (min, max) along one axis, `None` where still unknown.
fn cell_bounds(fixed: f32, declared: &AxisConstraint, gap: f32, cells: f32) -> (Option<f32>, Option<f32>) {
    if fixed != 0.0 {
        return (Some(fixed), Some(fixed));
    }
    let per_cell = |total: f32| (total != 0.0).then(|| (total - gap) / cells);
    (per_cell(declared.min), per_cell(declared.max))
}
