//! guilayout: two-pass immediate-mode layout
//!
//! Immediate-mode GUIs declare their controls every frame. This crate turns
//! those declarations into rectangles:
//! - Nested horizontal, vertical, scroll and fade groups
//! - Min/max/stretch constraints with collapsing margins
//! - Aspect-locked, word-wrapped and grid reservations
//! - Floating areas, windows, indentation and prefix labels
//!
//! # Usage
//!
//! Every frame runs a Layout pass, resolves it, then replays the same calls
//! to read back rects:
//!
//! ```
//! use guilayout::{LayoutContext, LayoutStyle, MonospaceMeasure, PassKind};
//!
//! let mut ctx = LayoutContext::new();
//! let measure = MonospaceMeasure::default();
//!
//! ctx.begin_context(7, PassKind::Layout).unwrap();
//! ctx.reserve_content("hello", LayoutStyle::none(), &[], &measure).unwrap();
//! ctx.end_context().unwrap();
//! ctx.layout(640.0, 480.0, &measure).unwrap();
//!
//! ctx.begin_context(7, PassKind::Replay).unwrap();
//! let rect = ctx.reserve_content("hello", LayoutStyle::none(), &[], &measure).unwrap();
//! ctx.end_context().unwrap();
//! assert_eq!(rect.height, 18.0);
//! ```

// Core primitives
pub mod primitives;
pub mod error;
pub mod config;

// Intrinsic content sizes
pub mod measure;

// Slot recycling
pub mod pool;

// Layout engine
pub mod layout;

// Conventions layered on top of the engine
pub mod indent;
pub mod fade;

pub use config::{LayoutConfig, ScrollbarMetrics};
pub use error::{LayoutError, LayoutResult};
pub use fade::{FadeAnimator, FadeStep};
pub use indent::{IndentPolicy, IndentState, LabelSide, PrefixPlan};
pub use layout::{
    Axis, AxisConstraint, EndReport, GroupHandle, GroupSpec, LayoutContext, LayoutOption, LayoutStyle, NodeId,
    PassKind, ScrollSettings, ScrollState, ScrollView, SizeConstraint, StyleKind,
};
pub use measure::{ContentMeasure, MonospaceMeasure};
pub use primitives::{Point, Rect, RectOffset, Size};
