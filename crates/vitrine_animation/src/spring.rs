//! Spring physics
//!
//! A damped spring pulls a displayed value toward its target:
//!
//! ```text
//! a  = k·(target − x)/m − c·v/m      c = ζ·2·√(k·m)
//! v += a·dt
//! x += v·dt
//! ```
//!
//! `damping` in [`SpringConfig`] is the ratio ζ, so `1.0` is critically
//! damped regardless of stiffness and mass.

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};

/// Distance and speed below which a spring counts as settled
pub const DEFAULT_EPSILON: f64 = 0.01;

/// Relative settle tolerance. Counters in the trillions (bytes) cannot
/// resolve a fixed epsilon once `velocity·dt` drops below an ulp.
const RELATIVE_TOLERANCE: f64 = 1e-12;

/// A frame that leaves `current` bit-identical settles within this fraction
/// of the target
const STAGNANT_TOLERANCE: f64 = 1e-9;

/// Largest integration step; longer frames are split into substeps
const MAX_SUBSTEP: f64 = 1.0 / 60.0;

/// Frames longer than this (a backgrounded tab) only advance this far
const MAX_FRAME_DT: f64 = 2.0;

/// Spring tuning parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f64,
    /// Damping ratio (1.0 = critical)
    pub damping: f64,
    pub mass: f64,
}

impl SpringConfig {
    /// Create a validated spring config
    pub fn new(stiffness: f64, damping: f64, mass: f64) -> Result<Self> {
        let config = Self {
            stiffness,
            damping,
            mass,
        };
        config.validate()?;
        Ok(config)
    }

    /// Slow, critically damped counter (block height)
    pub fn gentle() -> Self {
        Self {
            stiffness: 2.0,
            damping: 1.0,
            mass: 1.0,
        }
    }

    /// Quicker counter for rates that jump every poll
    pub fn brisk() -> Self {
        Self {
            stiffness: 3.0,
            damping: 1.0,
            mass: 1.0,
        }
    }

    /// Heavy counter for large values refreshed rarely
    pub fn heavy() -> Self {
        Self {
            stiffness: 3.0,
            damping: 1.0,
            mass: 3.0,
        }
    }

    /// Check every parameter is positive and finite
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("stiffness", self.stiffness),
            ("damping", self.damping),
            ("mass", self.mass),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnimationError::InvalidSpring { name, value });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Viscous damping coefficient `c` derived from the ratio
    pub fn damping_coefficient(&self) -> f64 {
        self.damping * 2.0 * (self.stiffness * self.mass).sqrt()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::gentle()
    }
}

/// The animated state of one displayed number
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatedValue {
    pub current: f64,
    pub target: f64,
    pub velocity: f64,
}

impl AnimatedValue {
    /// A value at rest on itself
    pub fn new(initial: f64) -> Self {
        Self {
            current: initial,
            target: initial,
            velocity: 0.0,
        }
    }

    pub fn with_target(initial: f64, target: f64) -> Self {
        Self {
            current: initial,
            target,
            velocity: 0.0,
        }
    }

    /// Within `epsilon` of the target with near-zero velocity.
    ///
    /// Both thresholds grow with the target's magnitude (one part in 10¹²)
    /// so large counters settle too.
    pub fn is_settled(&self, epsilon: f64) -> bool {
        let tolerance = self.tolerance(epsilon);
        (self.target - self.current).abs() < tolerance && self.velocity.abs() < tolerance
    }

    fn tolerance(&self, epsilon: f64) -> f64 {
        epsilon.max(self.target.abs() * RELATIVE_TOLERANCE)
    }

    fn snapped(self) -> Self {
        Self {
            current: self.target,
            velocity: 0.0,
            ..self
        }
    }
}

/// Outcome of one spring step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpringStatus {
    /// Still moving, keep scheduling frames
    #[default]
    Animating,
    /// At rest on the target, frames can stop
    Settled,
    /// Holding the last valid value because the target is not a number
    Stalled,
}

/// State and status returned by [`advance`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Advance {
    pub state: AnimatedValue,
    pub status: SpringStatus,
}

/// Advance `state` toward `target` by `dt` seconds using [`DEFAULT_EPSILON`]
pub fn advance(state: AnimatedValue, target: f64, dt: f64, config: SpringConfig) -> Advance {
    advance_with_epsilon(state, target, dt, config, DEFAULT_EPSILON)
}

/// Advance `state` toward `target` by `dt` seconds.
///
/// A non-finite `target` (or an invalid config) leaves the state untouched
/// and reports [`SpringStatus::Stalled`]. A non-positive `dt` applies the new
/// target without moving.
pub fn advance_with_epsilon(
    state: AnimatedValue,
    target: f64,
    dt: f64,
    config: SpringConfig,
    epsilon: f64,
) -> Advance {
    if !target.is_finite() || !config.is_valid() {
        return Advance {
            state,
            status: SpringStatus::Stalled,
        };
    }

    let next = AnimatedValue { target, ..state };
    if next.is_settled(epsilon) {
        return Advance {
            state: next.snapped(),
            status: SpringStatus::Settled,
        };
    }

    if !(dt.is_finite() && dt > 0.0) {
        return Advance {
            state: next,
            status: SpringStatus::Animating,
        };
    }

    let mut moved = next;
    let mut remaining = dt.min(MAX_FRAME_DT);
    while remaining > 0.0 {
        let h = remaining.min(MAX_SUBSTEP);
        moved = integrate(moved, h, &config);
        remaining -= h;
    }

    if !(moved.current.is_finite() && moved.velocity.is_finite()) {
        tracing::warn!(?state, target, dt, "spring diverged, holding last value");
        return Advance {
            state,
            status: SpringStatus::Stalled,
        };
    }

    // Steps below half an ulp of `current` no longer move it
    let stagnant = moved.current == next.current
        && (moved.target - moved.current).abs() <= moved.target.abs() * STAGNANT_TOLERANCE;

    if stagnant || moved.is_settled(epsilon) {
        Advance {
            state: moved.snapped(),
            status: SpringStatus::Settled,
        }
    } else {
        Advance {
            state: moved,
            status: SpringStatus::Animating,
        }
    }
}

/// One semi-implicit Euler step
#[inline]
fn integrate(state: AnimatedValue, dt: f64, config: &SpringConfig) -> AnimatedValue {
    let spring_force = config.stiffness * (state.target - state.current);
    let damping_force = config.damping_coefficient() * state.velocity;
    let acceleration = (spring_force - damping_force) / config.mass;

    let velocity = state.velocity + acceleration * dt;
    AnimatedValue {
        current: state.current + velocity * dt,
        velocity,
        ..state
    }
}

/// A stateful spring that keeps its config and last status
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    state: AnimatedValue,
    /// Target as last requested, possibly not a number
    requested: f64,
    epsilon: f64,
    status: SpringStatus,
}

impl Spring {
    /// Create a spring at rest on `initial`
    pub fn new(config: SpringConfig, initial: f64) -> Self {
        Self {
            config,
            state: AnimatedValue::new(initial),
            requested: initial,
            epsilon: DEFAULT_EPSILON,
            status: SpringStatus::Settled,
        }
    }

    /// Override the settle threshold
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.abs();
        self
    }

    /// Point the spring at a new target. Non-finite targets stall the spring.
    pub fn set_target(&mut self, target: f64) {
        self.requested = target;
        if !target.is_finite() {
            if self.status != SpringStatus::Stalled {
                tracing::debug!(target, value = self.state.current, "spring stalled");
            }
            self.status = SpringStatus::Stalled;
            return;
        }

        self.state.target = target;
        self.status = if self.state.is_settled(self.epsilon) {
            SpringStatus::Settled
        } else {
            SpringStatus::Animating
        };
    }

    /// Advance by `dt` seconds
    pub fn step(&mut self, dt: f64) -> SpringStatus {
        let result =
            advance_with_epsilon(self.state, self.requested, dt, self.config, self.epsilon);
        self.state = result.state;
        self.status = result.status;
        self.status
    }

    /// Jump to `value` at rest
    pub fn snap_to(&mut self, value: f64) {
        if value.is_finite() {
            self.state = AnimatedValue::new(value);
            self.requested = value;
            self.status = SpringStatus::Settled;
        }
    }

    pub fn value(&self) -> f64 {
        self.state.current
    }

    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }

    /// The last finite target
    pub fn target(&self) -> f64 {
        self.state.target
    }

    pub fn state(&self) -> AnimatedValue {
        self.state
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn status(&self) -> SpringStatus {
        self.status
    }

    pub fn is_settled(&self) -> bool {
        self.status == SpringStatus::Settled
    }

    pub fn is_stalled(&self) -> bool {
        self.status == SpringStatus::Stalled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 0.016;

    #[test]
    fn test_converges_within_budget() {
        let config = SpringConfig::new(3.0, 1.0, 1.0).unwrap();
        let mut state = AnimatedValue::with_target(0.0, 100.0);

        for _ in 0..300 {
            state = advance(state, 100.0, FRAME, config).state;
        }

        assert!((state.current - 100.0).abs() < 0.5, "got {}", state.current);
    }

    #[test]
    fn test_critical_spring_settles_without_overshoot() {
        let config = SpringConfig::brisk();
        let mut state = AnimatedValue::with_target(0.0, 100.0);
        let mut last_distance = f64::INFINITY;
        let mut settled_after = None;

        for frame in 0..10_000 {
            let result = advance(state, 100.0, FRAME, config);
            state = result.state;

            let distance = (100.0 - state.current).abs();
            assert!(state.current <= 100.0, "overshoot at frame {frame}");
            assert!(distance <= last_distance);
            last_distance = distance;

            if result.status == SpringStatus::Settled {
                settled_after = Some(frame);
                break;
            }
        }

        assert!(settled_after.is_some());
        assert_eq!(state.current, 100.0);
        assert_eq!(state.velocity, 0.0);
    }

    #[test]
    fn test_terabyte_counter_settles() {
        // State size in bytes: heavy spring from 0 to 4 TB
        let config = SpringConfig::heavy();
        let target = 4e12;
        let mut state = AnimatedValue::with_target(0.0, target);
        let mut settled_after = None;

        for frame in 0..20_000 {
            let result = advance(state, target, 1.0 / 60.0, config);
            state = result.state;
            if result.status == SpringStatus::Settled {
                settled_after = Some(frame);
                break;
            }
        }

        assert!(settled_after.is_some(), "stuck at {} v={}", state.current, state.velocity);
        assert_eq!(state.current, target);
        assert_eq!(state.velocity, 0.0);
    }

    #[test]
    fn test_huge_targets_settle() {
        for (config, target) in [
            (SpringConfig::brisk(), 5.5e12),
            (SpringConfig::heavy(), 5.5e12),
            (SpringConfig::heavy(), 1e15),
        ] {
            let mut spring = Spring::new(config, 0.0);
            spring.set_target(target);
            for _ in 0..20_000 {
                if spring.step(1.0 / 60.0) != SpringStatus::Animating {
                    break;
                }
            }
            assert!(spring.is_settled(), "{config:?} never settled on {target}");
            assert_eq!(spring.value(), target);
        }
    }

    #[test]
    fn test_tolerance_scales_with_target() {
        // Where a 4 TB counter used to get stuck
        let stuck = AnimatedValue {
            current: 3_999_999_999_999.9873,
            target: 4e12,
            velocity: 0.0063,
        };
        assert!(stuck.is_settled(DEFAULT_EPSILON));

        let small = AnimatedValue {
            current: 99.98,
            target: 100.0,
            velocity: 0.0,
        };
        assert!(!small.is_settled(DEFAULT_EPSILON));
    }

    #[test]
    fn test_stagnant_step_settles() {
        // Soft spring whose steps vanish below an ulp before the relative band
        let config = SpringConfig {
            stiffness: 1e-4,
            damping: 1.0,
            mass: 1.0,
        };
        let target = 1e15;
        let state = AnimatedValue {
            current: target - 5000.0,
            target,
            velocity: 1e-6,
        };
        let result = advance_with_epsilon(state, target, 1.0 / 60.0, config, 1e-9);

        assert_eq!(result.status, SpringStatus::Settled);
        assert_eq!(result.state.current, target);
    }

    #[test]
    fn test_at_rest_is_idempotent() {
        let state = AnimatedValue::new(42.0);
        let result = advance(state, 42.0, FRAME, SpringConfig::default());

        assert_eq!(result.state, state);
        assert_eq!(result.status, SpringStatus::Settled);
    }

    #[test]
    fn test_non_finite_target_stalls() {
        let state = AnimatedValue {
            current: 10.0,
            target: 20.0,
            velocity: 3.0,
        };

        for target in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = advance(state, target, FRAME, SpringConfig::default());
            assert_eq!(result.status, SpringStatus::Stalled);
            assert_eq!(result.state, state);
        }
    }

    #[test]
    fn test_zero_dt_only_retargets() {
        let state = AnimatedValue::new(0.0);
        let result = advance(state, 50.0, 0.0, SpringConfig::default());

        assert_eq!(result.status, SpringStatus::Animating);
        assert_eq!(result.state.current, 0.0);
        assert_eq!(result.state.target, 50.0);
    }

    #[test]
    fn test_long_frame_is_substepped() {
        // A single 0.5s frame should land where 30 small frames land
        let config = SpringConfig::brisk();
        let start = AnimatedValue::with_target(0.0, 100.0);

        let long = advance(start, 100.0, 0.5, config).state;
        let mut short = start;
        for _ in 0..30 {
            short = advance(short, 100.0, 0.5 / 30.0, config).state;
        }

        assert!((long.current - short.current).abs() < 1e-9);
        assert!(long.current.is_finite());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(SpringConfig::new(0.0, 1.0, 1.0).is_err());
        assert!(SpringConfig::new(1.0, -1.0, 1.0).is_err());
        assert!(matches!(
            SpringConfig::new(1.0, 1.0, f64::NAN),
            Err(AnimationError::InvalidSpring { name: "mass", .. })
        ));
        assert!(SpringConfig::new(3.0, 1.0, 3.0).is_ok());
    }

    #[test]
    fn test_invalid_config_stalls() {
        let config = SpringConfig {
            stiffness: 3.0,
            damping: 1.0,
            mass: 0.0,
        };
        let state = AnimatedValue::with_target(0.0, 100.0);
        let result = advance(state, 100.0, FRAME, config);

        assert_eq!(result.status, SpringStatus::Stalled);
        assert_eq!(result.state, state);
    }

    #[test]
    fn test_spring_retargets_mid_flight() {
        let mut spring = Spring::new(SpringConfig::brisk(), 0.0);
        spring.set_target(100.0);

        for _ in 0..30 {
            spring.step(FRAME);
        }
        let midway = spring.value();
        assert!(midway > 0.0 && midway < 100.0);

        spring.set_target(-50.0);
        for _ in 0..2000 {
            if spring.step(FRAME) == SpringStatus::Settled {
                break;
            }
        }

        assert!(spring.is_settled());
        assert_eq!(spring.value(), -50.0);
    }

    #[test]
    fn test_spring_stall_and_recover() {
        let mut spring = Spring::new(SpringConfig::brisk(), 0.0);
        spring.set_target(100.0);
        for _ in 0..10 {
            spring.step(FRAME);
        }
        let held = spring.value();

        spring.set_target(f64::NAN);
        assert!(spring.is_stalled());
        assert_eq!(spring.step(FRAME), SpringStatus::Stalled);
        assert_eq!(spring.value(), held);
        assert_eq!(spring.target(), 100.0);

        spring.set_target(100.0);
        assert_eq!(spring.step(FRAME), SpringStatus::Animating);
        assert!(spring.value() > held);
    }

    #[test]
    fn test_snap_to() {
        let mut spring = Spring::new(SpringConfig::default(), 0.0);
        spring.set_target(10.0);
        spring.step(FRAME);

        spring.snap_to(7.0);
        assert_eq!(spring.value(), 7.0);
        assert_eq!(spring.target(), 7.0);
        assert!(spring.is_settled());
    }
}
