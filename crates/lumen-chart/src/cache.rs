//! Dirty tracking and per-point animation state carried between measures.

use ahash::HashMap;

use crate::animation::Transition;

bitflags::bitflags! {
    /// What changed since the last measure pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChartDirtyFlags: u16 {
        /// Series membership, values or series properties changed.
        const DATA_CHANGED = 0b0000_0001;
        /// Axis membership or axis properties changed.
        const AXES_CHANGED = 0b0000_0010;
        /// Zoom or pan moved the visible range.
        const VIEW_CHANGED = 0b0000_0100;
        /// The control was resized.
        const BOUNDS_CHANGED = 0b0000_1000;
        /// Visual elements changed.
        const VISUALS_CHANGED = 0b0001_0000;
    }
}

impl ChartDirtyFlags {
    /// Whether point geometry must be recomputed.
    pub fn needs_measure(&self) -> bool {
        self.intersects(
            Self::DATA_CHANGED | Self::AXES_CHANGED | Self::VIEW_CHANGED | Self::BOUNDS_CHANGED,
        )
    }
}

/// Transitions of the previous measure pass, keyed by series identity and
/// value index, so new targets animate from what is on screen.
#[derive(Debug, Default)]
pub struct TransitionCache {
    entries: HashMap<(usize, usize), Transition>,
}

impl TransitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series_key: usize, index: usize, transition: Transition) {
        self.entries.insert((series_key, index), transition);
    }

    pub fn get(&self, series_key: usize, index: usize) -> Option<&Transition> {
        self.entries.get(&(series_key, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_changes_skip_measure() {
        assert!(!ChartDirtyFlags::VISUALS_CHANGED.needs_measure());
        let mixed = ChartDirtyFlags::VISUALS_CHANGED | ChartDirtyFlags::BOUNDS_CHANGED;
        assert!(mixed.needs_measure());
    }
}
