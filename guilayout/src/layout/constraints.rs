//! Size constraints and the options that shape them.
//!
//! Every node carries a min/max/stretch triple per axis. Options supplied by
//! the caller are folded into those triples in declaration order, with the
//! minimum always winning over a smaller maximum.

use crate::primitives::RectOffset;

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// The other axis.
    #[inline]
    pub fn cross(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Stable index for per-axis arrays.
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Axis::Horizontal => 0,
            Axis::Vertical => 1,
        }
    }

    /// Offset on the side where this axis starts (left or top).
    #[inline]
    pub fn leading(self, offset: &RectOffset) -> i32 {
        match self {
            Axis::Horizontal => offset.left,
            Axis::Vertical => offset.top,
        }
    }

    /// Offset on the side where this axis ends (right or bottom).
    #[inline]
    pub fn trailing(self, offset: &RectOffset) -> i32 {
        match self {
            Axis::Horizontal => offset.right,
            Axis::Vertical => offset.bottom,
        }
    }

    /// Sum of both offsets along this axis.
    #[inline]
    pub fn total(self, offset: &RectOffset) -> i32 {
        self.leading(offset) + self.trailing(offset)
    }

    pub(crate) fn set_leading(self, offset: &mut RectOffset, value: i32) {
        match self {
            Axis::Horizontal => offset.left = value,
            Axis::Vertical => offset.top = value,
        }
    }

    pub(crate) fn set_trailing(self, offset: &mut RectOffset, value: i32) {
        match self {
            Axis::Horizontal => offset.right = value,
            Axis::Vertical => offset.bottom = value,
        }
    }
}

/// Min/max/stretch bounds along one axis.
///
/// `max == 0.0` on a group means "compute from children"; `max == INFINITY`
/// means unbounded. `stretch` is 0 or 1 on leaves and an accumulated weight
/// on groups.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisConstraint {
    pub min: f32,
    pub max: f32,
    pub stretch: f32,
}

impl AxisConstraint {
    pub const ZERO: Self = Self {
        min: 0.0,
        max: 0.0,
        stretch: 0.0,
    };

    /// A range with no stretch.
    #[inline]
    pub const fn range(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            stretch: 0.0,
        }
    }

    /// Exactly `value`, no stretch.
    #[inline]
    pub const fn fixed(value: f32) -> Self {
        Self::range(value, value)
    }

    /// Whether the upper bound is left for the children to decide.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.max == 0.0
    }

    /// Raise a set max to the min. An unset max (0) is left alone.
    #[inline]
    pub fn heal(&mut self) {
        if self.max != 0.0 && self.max < self.min {
            self.max = self.min;
        }
    }
}

/// Bounds for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeConstraint {
    pub width: AxisConstraint,
    pub height: AxisConstraint,
}

impl SizeConstraint {
    pub const ZERO: Self = Self {
        width: AxisConstraint::ZERO,
        height: AxisConstraint::ZERO,
    };

    pub fn new(min_width: f32, max_width: f32, min_height: f32, max_height: f32) -> Self {
        Self {
            width: AxisConstraint::range(min_width, max_width),
            height: AxisConstraint::range(min_height, max_height),
        }
    }

    #[inline]
    pub fn axis(&self, axis: Axis) -> &AxisConstraint {
        match axis {
            Axis::Horizontal => &self.width,
            Axis::Vertical => &self.height,
        }
    }

    #[inline]
    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisConstraint {
        match axis {
            Axis::Horizontal => &mut self.width,
            Axis::Vertical => &mut self.height,
        }
    }
}

/// Per-control sizing hints supplied at reservation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutOption {
    /// Exact width; disables horizontal stretch.
    Width(f32),
    /// Minimum width. A max left unset becomes unbounded.
    MinWidth(f32),
    /// Maximum width; disables horizontal stretch.
    MaxWidth(f32),
    /// Exact height; disables vertical stretch.
    Height(f32),
    MinHeight(f32),
    MaxHeight(f32),
    ExpandWidth(bool),
    ExpandHeight(bool),
    /// Gap between children. Only meaningful on groups.
    Spacing(f32),
}

impl LayoutOption {
    /// The axis this option sizes, if any.
    pub fn axis(&self) -> Option<Axis> {
        match self {
            LayoutOption::Width(_)
            | LayoutOption::MinWidth(_)
            | LayoutOption::MaxWidth(_)
            | LayoutOption::ExpandWidth(_) => Some(Axis::Horizontal),
            LayoutOption::Height(_)
            | LayoutOption::MinHeight(_)
            | LayoutOption::MaxHeight(_)
            | LayoutOption::ExpandHeight(_) => Some(Axis::Vertical),
            LayoutOption::Spacing(_) => None,
        }
    }

    /// Whether this option pins a size bound (as opposed to a stretch flag).
    pub fn is_size_bound(&self) -> bool {
        !matches!(
            self,
            LayoutOption::ExpandWidth(_) | LayoutOption::ExpandHeight(_) | LayoutOption::Spacing(_)
        )
    }
}

/// Fold `options` into `constraint`, in order.
pub fn apply_options(constraint: &mut SizeConstraint, options: &[LayoutOption]) {
    for option in options {
        let Some(axis) = option.axis() else {
            continue;
        };
        let c = constraint.axis_mut(axis);
        match *option {
            LayoutOption::Width(v) | LayoutOption::Height(v) => {
                c.min = v;
                c.max = v;
                c.stretch = 0.0;
            }
            LayoutOption::MinWidth(v) | LayoutOption::MinHeight(v) => {
                c.min = v;
                if c.max == 0.0 {
                    c.max = f32::INFINITY;
                }
            }
            LayoutOption::MaxWidth(v) | LayoutOption::MaxHeight(v) => {
                c.max = v;
                c.stretch = 0.0;
            }
            LayoutOption::ExpandWidth(b) | LayoutOption::ExpandHeight(b) => {
                c.stretch = if b { 1.0 } else { 0.0 };
            }
            LayoutOption::Spacing(_) => {}
        }
        c.heal();
    }
}

/// Clamp that does not panic when `min > max`, unlike `f32::clamp`.
#[inline]
pub(crate) fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Linear interpolation with `t` clamped to [0, 1]. The endpoints are
/// returned exactly so an infinite `b` is never multiplied by zero.
#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}

/// `(value - min) / (max - min)` clamped to [0, 1]; 0 when the range is
/// empty or not finite.
#[inline]
pub(crate) fn ratio(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    let t = (value - min) / span;
    if t.is_nan() { 0.0 } else { clamp(t, 0.0, 1.0) }
}
