//! Frame-driven damped smoothing of the globe orientation.
//!
//! Exponential approach toward a target, rate-independent of frame timing:
//! the same wall-clock interval converges the same amount whether it arrives
//! as one large step or many small ones.

/// Smoothing rate in 1/seconds. Higher settles faster.
pub const SMOOTHING_RATE: f64 = 4.5;

/// Below this combined delta both axes snap exactly onto their targets,
/// ending perpetual micro-drift from the exponential tail.
pub const SNAP_EPSILON: f64 = 1e-4;

/// One damped scalar.
#[derive(Clone, Copy, Debug)]
pub struct DampedValue {
    current: f64,
    target: f64,
}

impl DampedValue {
    pub fn new(value: f64) -> Self {
        DampedValue {
            current: value,
            target: value,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Place both current and target at `value` with no animation.
    pub fn jump_to(&mut self, value: f64) {
        self.current = value;
        self.target = value;
    }

    pub fn delta(&self) -> f64 {
        self.target - self.current
    }

    fn step(&mut self, blend: f64) {
        self.current += (self.target - self.current) * blend;
    }

    fn snap(&mut self) {
        self.current = self.target;
    }
}

/// The two globe angles, advanced together every rendered frame.
#[derive(Clone, Copy, Debug)]
pub struct OrientationAnimator {
    /// Tilt about the view X axis (latitude).
    pub tilt: DampedValue,
    /// Accumulated spin about the Y axis (longitude).
    pub spin: DampedValue,
}

impl OrientationAnimator {
    pub fn new(tilt: f64, spin: f64) -> Self {
        OrientationAnimator {
            tilt: DampedValue::new(tilt),
            spin: DampedValue::new(spin),
        }
    }

    pub fn set_targets(&mut self, tilt: f64, spin: f64) {
        self.tilt.set_target(tilt);
        self.spin.set_target(spin);
    }

    /// Advance both axes by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        let blend = 1.0 - (-SMOOTHING_RATE * dt).exp();
        self.tilt.step(blend);
        self.spin.step(blend);
        if self.tilt.delta().abs() < SNAP_EPSILON && self.spin.delta().abs() < SNAP_EPSILON {
            self.tilt.snap();
            self.spin.snap();
        }
    }

    /// Current (tilt, spin) pair for the renderer.
    pub fn orientation(&self) -> (f64, f64) {
        (self.tilt.current(), self.spin.current())
    }
}
