//! Transition clock for the travel effect between two events.
//!
//! A bounded-duration window that interpolates the displayed year and gates
//! narration. There is never a queue of windows: a new navigation cancels the
//! running one outright and a fresh clock begins atomically.

use log::debug;

/// Length of the travel effect, seconds.
pub const TRANSITION_DURATION: f64 = 2.6;

/// Pause after the clock completes before the window deactivates and
/// narration is unblocked.
pub const SETTLE_DELAY: f64 = 0.35;

/// One active travel effect.
#[derive(Clone, Copy, Debug)]
pub struct TransitionWindow {
    pub from_year: i32,
    pub to_year: i32,
    started_at: f64,
    duration: f64,
    generation: u64,
}

impl TransitionWindow {
    pub fn progress(&self, now: f64) -> f64 {
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0)
    }

    /// Year value shown by the overlay while traveling.
    pub fn display_year(&self, now: f64) -> i32 {
        let progress = self.progress(now);
        let span = (self.to_year - self.from_year) as f64;
        (self.from_year as f64 + span * progress).round() as i32
    }

    /// Identifies which clock start produced this window; a superseded
    /// window's generation never matches the clock's again.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn settled(&self, now: f64) -> bool {
        now >= self.started_at + self.duration + SETTLE_DELAY
    }
}

/// Owns the at-most-one active [`TransitionWindow`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TransitionClock {
    window: Option<TransitionWindow>,
    generation: u64,
}

impl TransitionClock {
    pub fn new() -> Self {
        TransitionClock::default()
    }

    /// Cancel any running window and start a fresh one. Returns the new
    /// window's generation.
    pub fn start(&mut self, from_year: i32, to_year: i32, now: f64) -> u64 {
        if self.window.is_some() {
            debug!("transition superseded mid-flight ({} -> {})", from_year, to_year);
        }
        self.generation += 1;
        self.window = Some(TransitionWindow {
            from_year,
            to_year,
            started_at: now,
            duration: TRANSITION_DURATION,
            generation: self.generation,
        });
        self.generation
    }

    /// Stop the running window immediately. Safe to call when idle.
    pub fn cancel(&mut self) {
        self.window = None;
    }

    /// Force the running window to completion; the settle delay still runs
    /// before deactivation.
    pub fn skip(&mut self, now: f64) {
        if let Some(window) = &mut self.window {
            window.started_at = now - window.duration;
        }
    }

    /// Per-frame drive. Returns true on the tick where the window
    /// deactivates, which is the edge that unblocks narration.
    pub fn tick(&mut self, now: f64) -> bool {
        match &self.window {
            Some(window) if window.settled(now) => {
                self.window = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.window.is_some()
    }

    pub fn window(&self) -> Option<&TransitionWindow> {
        self.window.as_ref()
    }

    pub fn progress(&self, now: f64) -> Option<f64> {
        self.window.as_ref().map(|w| w.progress(now))
    }

    pub fn display_year(&self, now: f64) -> Option<i32> {
        self.window.as_ref().map(|w| w.display_year(now))
    }

    pub fn current_generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_and_display_year() {
        let mut clock = TransitionClock::new();
        clock.start(1950, 1997, 10.0);
        let halfway = 10.0 + TRANSITION_DURATION / 2.0;
        let progress = clock.progress(halfway).unwrap();
        assert!((progress - 0.5).abs() < 1e-9);
        // round(1950 + 47 * 0.5)
        assert_eq!(clock.display_year(halfway), Some(1974));
        assert_eq!(clock.display_year(10.0), Some(1950));
        assert_eq!(clock.display_year(10.0 + TRANSITION_DURATION), Some(1997));
    }

    #[test]
    fn test_progress_clamped() {
        let mut clock = TransitionClock::new();
        clock.start(1950, 1966, 5.0);
        assert_eq!(clock.progress(4.0), Some(0.0));
        assert_eq!(clock.progress(5.0 + TRANSITION_DURATION * 3.0), Some(1.0));
    }

    #[test]
    fn test_settle_delay_gates_deactivation() {
        let mut clock = TransitionClock::new();
        clock.start(1950, 1966, 0.0);
        assert!(!clock.tick(TRANSITION_DURATION));
        assert!(clock.is_active());
        // Deactivates only after the settle delay, and exactly once.
        assert!(clock.tick(TRANSITION_DURATION + SETTLE_DELAY));
        assert!(!clock.is_active());
        assert!(!clock.tick(TRANSITION_DURATION + SETTLE_DELAY + 1.0));
    }

    #[test]
    fn test_replacement_kills_prior_window() {
        let mut clock = TransitionClock::new();
        let first = clock.start(1950, 1966, 0.0);
        let second = clock.start(1966, 1997, 0.5);
        assert_ne!(first, second);
        // Only the replacement is alive; its years are the current ones.
        let window = clock.window().unwrap();
        assert_eq!((window.from_year, window.to_year), (1966, 1997));
        assert_eq!(window.generation(), second);
        // The first window's completion time passes without any deactivation
        // edge; only the second window's timeline matters now.
        assert!(!clock.tick(TRANSITION_DURATION + SETTLE_DELAY));
        assert!(clock.tick(0.5 + TRANSITION_DURATION + SETTLE_DELAY));
    }

    #[test]
    fn test_skip_forces_completion() {
        let mut clock = TransitionClock::new();
        clock.start(1950, 2024, 0.0);
        clock.skip(0.1);
        assert_eq!(clock.progress(0.1), Some(1.0));
        assert_eq!(clock.display_year(0.1), Some(2024));
        // Settle delay still applies from the skip instant.
        assert!(!clock.tick(0.1));
        assert!(clock.tick(0.1 + SETTLE_DELAY));
    }

    #[test]
    fn test_cancel_is_silent() {
        let mut clock = TransitionClock::new();
        clock.start(1950, 1966, 0.0);
        clock.cancel();
        assert!(!clock.is_active());
        // No deactivation edge fires for a cancelled window.
        assert!(!clock.tick(100.0));
    }
}
