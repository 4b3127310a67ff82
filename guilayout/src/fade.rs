//! Animated fade toggles.
//!
//! Each toggle id keeps a raw progress in `[0, 1]` that moves towards the
//! target by `speed * dt` per Layout pass. Replay passes read the stored
//! value unchanged, so every pass of a frame sees the same fade.

use std::collections::HashMap;

/// Outcome of one fade step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeStep {
    /// Eased value handed to the fade group.
    pub value: f32,
    /// Whether the caller should emit the group's content.
    pub open: bool,
}

#[derive(Debug, Default)]
pub struct FadeAnimator {
    progress: HashMap<u64, f32>,
}

impl FadeAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance toggle `id` towards `visible`. Progress only moves when
    /// `advance` is set.
    pub fn step(&mut self, id: u64, visible: bool, dt: f32, advance: bool, speed: f32) -> FadeStep {
        let fade = self.progress.entry(id).or_insert(if visible { 1.0 } else { 0.0 });

        if !visible && *fade <= 0.0 {
            return FadeStep { value: 0.0, open: false };
        }
        if visible && *fade >= 1.0 {
            return FadeStep { value: 1.0, open: true };
        }

        if advance {
            let direction = if visible { 1.0 } else { -1.0 };
            *fade = (*fade + direction * dt.max(0.0) * speed).clamp(0.0, 1.0);
        }

        let value = if visible {
            let f = 1.0 - *fade;
            1.0 - f * f * f * f
        } else {
            fade.powi(4)
        };
        FadeStep { value, open: *fade > 0.0 }
    }

    /// Raw progress of `id`, if it was ever stepped.
    pub fn progress(&self, id: u64) -> Option<f32> {
        self.progress.get(&id).copied()
    }

    pub fn clear(&mut self) {
        self.progress.clear();
    }
}
