//! Selection state and navigation planning.
//!
//! The pure half of the top-level state machine: bounding a requested index,
//! deriving the travel direction, and recording the applied navigation. The
//! effectful half (cancelling and restarting the clock, narration and
//! orientation) lives in [`crate::engine`].

/// A navigation the engine should carry out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub bounded_index: usize,
    /// -1 backward, +1 forward. Never 0: a same-index request is a no-op
    /// and produces no Navigation at all.
    pub direction: i8,
}

/// Mutable selection state; changes only through [`SelectionState::plan`] +
/// [`SelectionState::apply`].
#[derive(Clone, Copy, Debug)]
pub struct SelectionState {
    pub current_index: usize,
    /// Direction of the most recent navigation, 0 before any.
    pub direction: i8,
    /// Decorative spin applied by the most recent navigation, in turns.
    pub extra_rotation_turns: f64,
}

impl SelectionState {
    pub fn new() -> Self {
        SelectionState {
            current_index: 0,
            direction: 0,
            extra_rotation_turns: 0.0,
        }
    }

    /// Decide what `select_index(requested, explicit_direction)` should do.
    ///
    /// Any integer is accepted; the index wraps into `[0, n)`. Returns None
    /// when the bounded index equals the current one.
    pub fn plan(&self, requested: i64, explicit_direction: Option<i8>, n: usize) -> Option<Navigation> {
        let bounded_index = requested.rem_euclid(n as i64) as usize;
        if bounded_index == self.current_index {
            return None;
        }
        let direction = match explicit_direction {
            Some(d) if d != 0 => d.signum(),
            _ => {
                if bounded_index > self.current_index {
                    1
                } else {
                    -1
                }
            }
        };
        Some(Navigation {
            bounded_index,
            direction,
        })
    }

    pub fn apply(&mut self, navigation: Navigation, extra_rotation_turns: f64) {
        self.current_index = navigation.bounded_index;
        self.direction = navigation.direction;
        self.extra_rotation_turns = extra_rotation_turns;
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState::new()
    }
}
