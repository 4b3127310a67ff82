//! Two-pass layout.
//!
//! # Architecture
//!
//! ```text
//! Layout pass: begin/reserve/end calls -> node tree in the arena
//! layout():    measure width -> arrange width -> measure height -> arrange height
//! Replay pass: same calls -> resolved rects read back through group cursors
//! ```
//!
//! Width is resolved for the whole tree before any height is measured, so
//! word-wrapped text and aspect-locked rects know their final width.

pub mod constraints;
pub mod style;

pub mod node;
pub mod entry;
pub mod cache;

// group must come before scroll (scroll extends the solver)
pub mod group;
pub mod scroll;

pub mod context;

// Re-export core types
pub use cache::LayoutCache;
pub use constraints::{apply_options, Axis, AxisConstraint, LayoutOption, SizeConstraint};
pub use context::{EndReport, GroupHandle, GroupSpec, LayoutContext, PassKind, ScrollView};
pub use node::{Group, GroupVariant, Node, NodeArena, NodeId, NodeKind};
pub use scroll::{ScrollSettings, ScrollState};
pub use style::{LayoutStyle, StyleKind};
