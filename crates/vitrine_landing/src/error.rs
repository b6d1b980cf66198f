//! Landing page error types

use thiserror::Error;
use vitrine_animation::AnimationError;

use crate::stats::StatKind;

/// Invalid landing page configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("hero {channel}: {source}")]
    Hero {
        channel: &'static str,
        #[source]
        source: AnimationError,
    },

    #[error("{kind} spring: {source}")]
    Spring {
        kind: StatKind,
        #[source]
        source: AnimationError,
    },

    #[error("{kind} poll interval must be positive")]
    ZeroPollInterval { kind: StatKind },

    #[error("header height must be finite and non-negative, got {0}")]
    HeaderHeight(f64),

    #[error("newsletter post url is empty")]
    MissingPostUrl,

    #[error("newsletter form has no fields")]
    NoFields,
}

/// Newsletter submission rejected before sending
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("required field {0} is missing")]
    MissingField(String),
}

/// A statistic could not be fetched
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("{kind} is unavailable: {reason}")]
    Unavailable { kind: StatKind, reason: String },

    #[error("{kind} returned a non-numeric value")]
    NotANumber { kind: StatKind },
}
