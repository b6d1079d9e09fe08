//! Orientation targeting for the globe.
//!
//! Converts an event's geographic coordinates plus the direction of travel
//! into an accumulated rotation target. The Y angle is deliberately allowed
//! to leave [0, 2pi) so repeated navigation produces one continuous spin
//! instead of snapping backward across the seam.

use std::f64::consts::TAU;

/// Smallest decorative spin, in full turns.
pub const MIN_EXTRA_TURNS: f64 = 0.25;
/// Largest decorative spin, in full turns.
pub const MAX_EXTRA_TURNS: f64 = 1.75;

/// Target orientation for the globe, in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationTarget {
    /// Tilt toward the event's latitude. Single-valued.
    pub angle_x: f64,
    /// Spin toward the event's longitude, accumulated across navigations.
    pub accumulated_angle_y: f64,
}

/// Decorative spin for a navigation, in full turns.
///
/// Zero under reduced motion; otherwise the year gap normalized by the
/// largest adjacent gap in the timeline, clamped to
/// [`MIN_EXTRA_TURNS`, `MAX_EXTRA_TURNS`].
pub fn extra_rotation_turns(year_gap: f64, max_adjacent_gap: f64, reduced_motion: bool) -> f64 {
    if reduced_motion || max_adjacent_gap <= 0.0 {
        return 0.0;
    }
    (year_gap.abs() / max_adjacent_gap).clamp(MIN_EXTRA_TURNS, MAX_EXTRA_TURNS)
}

/// Compute the orientation target for an event at (`longitude`, `latitude`),
/// both in radians.
///
/// The first call returns the raw bearing with no continuity or spin, so the
/// initial load settles without a flourish. Later calls pick the
/// representative of the bearing's equivalence class (mod 2pi) nearest to
/// `previous_accumulated_y`, then add `direction * extra_turns` full turns
/// when motion is not reduced. The extra term intentionally overrides
/// shortest-path: the sweep conveys elapsed time.
pub fn compute_target(
    previous_accumulated_y: f64,
    longitude: f64,
    latitude: f64,
    direction: i8,
    extra_turns: f64,
    reduced_motion: bool,
    first_call: bool,
) -> OrientationTarget {
    let base_target = -longitude;
    let angle_x = -latitude;

    if first_call {
        return OrientationTarget {
            angle_x,
            accumulated_angle_y: base_target,
        };
    }

    // Integer k minimizing |previous - (base + k*2pi)|.
    let k = ((previous_accumulated_y - base_target) / TAU).round();
    let mut adjusted = base_target + k * TAU;

    if !reduced_motion && direction != 0 && extra_turns > 0.0 {
        adjusted += direction as f64 * extra_turns * TAU;
    }

    OrientationTarget {
        angle_x,
        accumulated_angle_y: adjusted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_first_call_returns_raw_bearing() {
        let target = compute_target(123.0, 1.2, 0.4, 1, 1.5, false, true);
        assert!((target.accumulated_angle_y - (-1.2)).abs() < EPS);
        assert!((target.angle_x - (-0.4)).abs() < EPS);
    }

    #[test]
    fn test_nearest_representative() {
        // Previous accumulated value several turns out; without extra spin
        // the result must be the representative of -lon nearest to it.
        let lon = 0.5;
        for &prev in &[0.0, 3.0, -3.0, 10.0 * TAU + 1.0, -7.0 * TAU - 2.0] {
            let target = compute_target(prev, lon, 0.0, 0, 0.0, false, false);
            let distance = (target.accumulated_angle_y - prev).abs();
            // No other representative is closer.
            assert!(distance <= TAU / 2.0 + EPS);
            // Still the same bearing mod 2pi.
            let residue = (target.accumulated_angle_y - (-lon)).rem_euclid(TAU);
            assert!(residue < EPS || (TAU - residue) < EPS);
        }
    }

    #[test]
    fn test_extra_turns_added_after_continuity() {
        let lon = 0.5;
        let prev = 0.0;
        let base = compute_target(prev, lon, 0.0, 0, 0.0, false, false).accumulated_angle_y;
        let forward = compute_target(prev, lon, 0.0, 1, 1.0, false, false).accumulated_angle_y;
        let backward = compute_target(prev, lon, 0.0, -1, 1.0, false, false).accumulated_angle_y;
        assert!((forward - (base + TAU)).abs() < EPS);
        assert!((backward - (base - TAU)).abs() < EPS);
    }

    #[test]
    fn test_reduced_motion_suppresses_spin() {
        let with_motion = compute_target(0.0, 0.5, 0.0, 1, 1.5, false, false);
        let reduced = compute_target(0.0, 0.5, 0.0, 1, 1.5, true, false);
        assert!((with_motion.accumulated_angle_y - reduced.accumulated_angle_y).abs() > 1.0);
        let residue =
            (reduced.accumulated_angle_y - (-0.5_f64)).rem_euclid(TAU);
        assert!(residue < EPS || (TAU - residue) < EPS);
    }

    #[test]
    fn test_extra_rotation_turns_bounds() {
        assert_eq!(extra_rotation_turns(10.0, 30.0, true), 0.0);
        // Tiny gap clamps up to the floor.
        assert!((extra_rotation_turns(1.0, 30.0, false) - MIN_EXTRA_TURNS).abs() < EPS);
        // Gap larger than the max adjacent gap clamps to the ceiling.
        assert!((extra_rotation_turns(90.0, 30.0, false) - MAX_EXTRA_TURNS).abs() < EPS);
        // In-range gaps scale linearly.
        assert!((extra_rotation_turns(15.0, 30.0, false) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_zero_direction_never_spins() {
        let target = compute_target(7.0 * TAU, 0.5, 0.0, 0, 1.75, false, false);
        let residue = (target.accumulated_angle_y - (-0.5_f64)).rem_euclid(TAU);
        assert!(residue < EPS || (TAU - residue) < EPS);
        assert!((target.accumulated_angle_y - 7.0 * TAU).abs() < TAU / 2.0 + EPS);
    }
}
