//! Top-level navigation engine.
//!
//! Single owner of all mutable presentation state. Accepts navigation
//! intents, cancels in-flight work before starting replacements, and is
//! driven by one frame tick; speech callbacks are polled on the same thread,
//! so no locking is needed anywhere.

use log::debug;

use crate::ambient::{AmbientPool, Comet};
use crate::animator::OrientationAnimator;
use crate::events::{Timeline, TimelineEvent};
use crate::narration::{split_sentences, Narrator};
use crate::rotation::{compute_target, extra_rotation_turns};
use crate::selection::SelectionState;
use crate::speech::{SpeechSynth, VoiceParams};
use crate::transition::TransitionClock;

#[derive(Clone, Copy, Debug)]
pub struct EngineOptions {
    pub reduced_motion: bool,
    pub narration_enabled: bool,
    pub voice: VoiceParams,
    pub ambient_seed: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            reduced_motion: false,
            narration_enabled: true,
            voice: VoiceParams::default(),
            ambient_seed: 0,
        }
    }
}

pub struct Engine {
    timeline: Timeline,
    selection: SelectionState,
    clock: TransitionClock,
    animator: OrientationAnimator,
    narrator: Narrator,
    speech: Box<dyn SpeechSynth>,
    ambient: AmbientPool,
    visited: Vec<bool>,
    narration_enabled: bool,
    reduced_motion: bool,
    /// Narration for the current event should start once no transition is
    /// active.
    narration_pending: bool,
}

impl Engine {
    pub fn new(timeline: Timeline, speech: Box<dyn SpeechSynth>, options: EngineOptions) -> Self {
        // Initial load: raw bearing, no continuity, no spin, and the
        // animator starts already settled so there is no opening flourish.
        let first = timeline.get(0);
        let target = compute_target(
            0.0,
            first.longitude.to_radians(),
            first.latitude.to_radians(),
            0,
            0.0,
            options.reduced_motion,
            true,
        );
        let animator = OrientationAnimator::new(target.angle_x, target.accumulated_angle_y);

        let mut visited = vec![false; timeline.len()];
        visited[0] = true;

        Engine {
            selection: SelectionState::new(),
            clock: TransitionClock::new(),
            animator,
            narrator: Narrator::new(options.voice),
            speech,
            ambient: AmbientPool::new(options.ambient_seed),
            visited,
            narration_enabled: options.narration_enabled,
            reduced_motion: options.reduced_motion,
            narration_pending: true,
            timeline,
        }
    }

    /// The single navigation entry point.
    ///
    /// Accepts any integer; the index wraps into range. Re-selecting the
    /// current event changes nothing. Otherwise all in-flight work is
    /// cancelled before its replacement is created.
    pub fn select_index(&mut self, requested: i64, explicit_direction: Option<i8>, now: f64) {
        let Some(navigation) = self
            .selection
            .plan(requested, explicit_direction, self.timeline.len())
        else {
            return;
        };

        // Cancel before replace: no stale callback may outlive this point.
        self.narrator.cancel(self.speech.as_mut());
        self.clock.cancel();
        self.narration_pending = false;

        let from = self.timeline.get(self.selection.current_index);
        let to = self.timeline.get(navigation.bounded_index);
        let turns = extra_rotation_turns(
            (to.year - from.year) as f64,
            self.timeline.max_adjacent_gap() as f64,
            self.reduced_motion,
        );
        let target = compute_target(
            self.animator.spin.target(),
            to.longitude.to_radians(),
            to.latitude.to_radians(),
            navigation.direction,
            turns,
            self.reduced_motion,
            false,
        );
        debug!(
            "navigate {} -> {} (direction {}, {:.2} extra turns)",
            from.year, to.year, navigation.direction, turns
        );

        self.clock.start(from.year, to.year, now);
        self.animator
            .set_targets(target.angle_x, target.accumulated_angle_y);
        self.selection.apply(navigation, turns);
        self.visited[navigation.bounded_index] = true;
        self.narration_pending = true;
    }

    pub fn select_next(&mut self, now: f64) {
        self.select_index(self.selection.current_index as i64 + 1, Some(1), now);
    }

    pub fn select_prev(&mut self, now: f64) {
        self.select_index(self.selection.current_index as i64 - 1, Some(-1), now);
    }

    /// Complete the running travel effect immediately.
    pub fn skip_transition(&mut self, now: f64) {
        self.clock.skip(now);
    }

    pub fn set_narration_enabled(&mut self, enabled: bool, _now: f64) {
        if self.narration_enabled == enabled {
            return;
        }
        self.narration_enabled = enabled;
        if enabled {
            // Restart the current event from the top, or after the running
            // transition settles.
            self.narration_pending = true;
        } else {
            // Keep any pending start: the post-transition start still has to
            // swap in the new event's text, fully revealed.
            self.narrator.cancel(self.speech.as_mut());
        }
    }

    /// Per-frame drive: transition clock, narration gating, speech events,
    /// orientation smoothing, ambient pool.
    pub fn tick(&mut self, now: f64, dt: f64) {
        self.clock.tick(now);

        if self.narration_pending && !self.clock.is_active() {
            self.narration_pending = false;
            let texts = split_sentences(&self.timeline.get(self.selection.current_index).text);
            self.narrator
                .start(texts, self.narration_enabled, self.speech.as_mut());
        }

        let events = self.speech.poll(now);
        for event in events {
            self.narrator.handle_event(event, self.speech.as_mut());
        }

        self.animator.advance(dt);
        self.ambient.tick(now);
    }

    /// Cancel everything and drop all scheduled decorative work.
    pub fn teardown(&mut self) {
        self.narrator.cancel(self.speech.as_mut());
        self.clock.cancel();
        self.narration_pending = false;
        self.ambient.clear();
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn current_event(&self) -> &TimelineEvent {
        self.timeline.get(self.selection.current_index)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Current (tilt, spin) for the renderer.
    pub fn orientation(&self) -> (f64, f64) {
        self.animator.orientation()
    }

    pub fn transition_progress(&self, now: f64) -> Option<f64> {
        self.clock.progress(now)
    }

    pub fn is_transitioning(&self) -> bool {
        self.clock.is_active()
    }

    /// Year shown by the overlay: the interpolated travel year while a
    /// window is active, else the current event's year.
    pub fn displayed_year(&self, now: f64) -> i32 {
        self.clock
            .display_year(now)
            .unwrap_or_else(|| self.current_event().year)
    }

    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    pub fn narration_enabled(&self) -> bool {
        self.narration_enabled
    }

    pub fn is_speaking(&self) -> bool {
        self.narrator.is_speaking()
    }

    pub fn mouth_openness(&self, now: f64) -> f64 {
        self.narrator.mouth_openness(now)
    }

    pub fn visited(&self) -> &[bool] {
        &self.visited
    }

    /// Quiz availability gate.
    pub fn all_visited(&self) -> bool {
        self.visited.iter().all(|&v| v)
    }

    pub fn comets(&self) -> &[Comet] {
        self.ambient.comets()
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}
