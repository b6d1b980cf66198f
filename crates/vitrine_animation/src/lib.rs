//! Vitrine Animation System
//!
//! Spring-driven counters and scroll-driven interpolation.
//!
//! # Features
//!
//! - **Spring Physics**: damped springs with stiffness, damping ratio, mass
//! - **Continuous Counters**: springs that chase polled values and format them
//! - **Breakpoint Interpolation**: clamped piecewise-linear maps for scroll effects
//! - **Scroll Transforms**: element-relative scroll ranges feeding named channels

pub mod counter;
pub mod error;
pub mod interpolate;
pub mod scheduler;
pub mod spring;

pub use counter::{ContinuousCounter, Formatter};
pub use error::{AnimationError, Result};
pub use interpolate::{
    interpolate, lerp, Breakpoints, EdgeOffset, ElementRect, ScrollOffsets, ScrollRange,
    ScrollTransform,
};
pub use scheduler::{AnimationScheduler, CounterId};
pub use spring::{advance, Advance, AnimatedValue, Spring, SpringConfig, SpringStatus};
