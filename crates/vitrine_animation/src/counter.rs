//! Continuous counters
//!
//! A counter is a [`Spring`] chasing the latest polled value plus a pure
//! formatter that turns the animated number into display text.

use std::fmt;
use std::sync::Arc;

use crate::spring::{Spring, SpringConfig, SpringStatus};

/// Pure display formatter shared between counters
pub type Formatter = Arc<dyn Fn(f64) -> String + Send + Sync>;

/// A displayed number that springs toward each new target
#[derive(Clone)]
pub struct ContinuousCounter {
    spring: Spring,
    format: Formatter,
}

impl ContinuousCounter {
    /// Create a counter showing `initial_value` and already heading for
    /// `initial_target`.
    ///
    /// A non-finite `initial_value` falls back to the target (or zero), so
    /// the first rendered frame is always a number.
    pub fn new<F>(initial_value: f64, initial_target: f64, config: SpringConfig, format: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        Self::with_formatter(initial_value, initial_target, config, Arc::new(format))
    }

    pub fn with_formatter(
        initial_value: f64,
        initial_target: f64,
        config: SpringConfig,
        format: Formatter,
    ) -> Self {
        let start = if initial_value.is_finite() {
            initial_value
        } else if initial_target.is_finite() {
            initial_target
        } else {
            0.0
        };

        let mut spring = Spring::new(config, start);
        spring.set_target(initial_target);
        Self { spring, format }
    }

    /// Feed a freshly polled value
    pub fn set_target(&mut self, target: f64) {
        self.spring.set_target(target);
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f64) -> SpringStatus {
        self.spring.step(dt)
    }

    /// Current text for display
    pub fn display(&self) -> String {
        (self.format)(self.spring.value())
    }

    pub fn value(&self) -> f64 {
        self.spring.value()
    }

    pub fn target(&self) -> f64 {
        self.spring.target()
    }

    pub fn status(&self) -> SpringStatus {
        self.spring.status()
    }

    pub fn is_settled(&self) -> bool {
        self.spring.is_settled()
    }

    pub fn is_stalled(&self) -> bool {
        self.spring.is_stalled()
    }

    /// Whether the host still needs to schedule frames for this counter
    pub fn is_animating(&self) -> bool {
        self.spring.status() == SpringStatus::Animating
    }

    pub fn spring(&self) -> &Spring {
        &self.spring
    }
}

impl fmt::Debug for ContinuousCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinuousCounter")
            .field("spring", &self.spring)
            .field("display", &self.display())
            .finish()
    }
}
