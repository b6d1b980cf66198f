//! Animation error types

use thiserror::Error;

/// Errors raised when building animation inputs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Spring parameter was zero, negative, or not finite
    #[error("spring {name} must be positive and finite, got {value}")]
    InvalidSpring { name: &'static str, value: f64 },

    /// Breakpoint list was empty
    #[error("at least one breakpoint is required")]
    NoBreakpoints,

    /// Breakpoint fraction or value was not finite
    #[error("breakpoint {index} is not finite: ({fraction}, {value})")]
    NonFiniteBreakpoint {
        index: usize,
        fraction: f64,
        value: f64,
    },

    /// Breakpoint fractions went backwards
    #[error("breakpoint {index} at {fraction} precedes the previous fraction {previous}")]
    UnorderedBreakpoints {
        index: usize,
        fraction: f64,
        previous: f64,
    },
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
