//! Landing page configuration (vitrine.toml)
//!
//! Every section has defaults matching the production page, so an empty
//! file is a valid configuration.

use serde::{Deserialize, Serialize};
use vitrine_animation::{Breakpoints, SpringConfig};

use crate::error::ConfigError;
use crate::newsletter::{FieldKind, FormField};
use crate::stats::{StatFormat, StatKind};

/// Top-level landing page configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LandingConfig {
    #[serde(default)]
    pub hero: HeroConfig,
    #[serde(default)]
    pub header: HeaderConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub newsletter: NewsletterConfig,
}

impl LandingConfig {
    /// Check every section, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hero.opacity_breakpoints()?;
        self.hero.blur_breakpoints()?;

        if !(self.header.height.is_finite() && self.header.height >= 0.0) {
            return Err(ConfigError::HeaderHeight(self.header.height));
        }

        for kind in StatKind::ALL {
            let stat = self.stats.get(kind);
            if stat.poll_interval_ms == Some(0) {
                return Err(ConfigError::ZeroPollInterval { kind });
            }
            if let Some(spring) = &stat.spring {
                spring
                    .validate()
                    .map_err(|source| ConfigError::Spring { kind, source })?;
            }
        }

        if self.newsletter.post_url.trim().is_empty() {
            return Err(ConfigError::MissingPostUrl);
        }
        if self.newsletter.fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        Ok(())
    }
}

/// Hero scroll effects
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HeroConfig {
    /// Blob and headline opacity over headline scroll progress
    #[serde(default = "default_opacity")]
    pub opacity: Vec<(f64, f64)>,
    /// Particle blur radius (px) over headline scroll progress
    #[serde(default = "default_blur")]
    pub blur: Vec<(f64, f64)>,
    /// Height of the statistics block below the headline, in px
    #[serde(default = "default_stats_height")]
    pub stats_height: f64,
}

fn default_opacity() -> Vec<(f64, f64)> {
    vec![(0.0, 1.0), (0.5, 0.0)]
}

fn default_blur() -> Vec<(f64, f64)> {
    vec![(0.3, 0.0), (0.66, 50.0)]
}

fn default_stats_height() -> f64 {
    1600.0
}

impl HeroConfig {
    pub fn opacity_breakpoints(&self) -> Result<Breakpoints, ConfigError> {
        Breakpoints::new(self.opacity.iter().copied()).map_err(|source| ConfigError::Hero {
            channel: "opacity",
            source,
        })
    }

    pub fn blur_breakpoints(&self) -> Result<Breakpoints, ConfigError> {
        Breakpoints::new(self.blur.iter().copied()).map_err(|source| ConfigError::Hero {
            channel: "blur",
            source,
        })
    }
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            opacity: default_opacity(),
            blur: default_blur(),
            stats_height: default_stats_height(),
        }
    }
}

/// Navigation header
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HeaderConfig {
    /// Measured navbar height in px
    #[serde(default = "default_header_height")]
    pub height: f64,
    /// Dead band around the theme threshold in px (0 = strict comparison)
    #[serde(default)]
    pub hysteresis: f64,
}

fn default_header_height() -> f64 {
    64.0
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            height: default_header_height(),
            hysteresis: 0.0,
        }
    }
}

/// One statistic's polling and display
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatConfig {
    /// Refetch interval; absent means fetch once
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    /// Start the counter this far below the first sample instead of at zero
    #[serde(default)]
    pub lead_in: Option<f64>,
    pub format: StatFormat,
    /// Spring for the animated counter; absent means show the raw value
    #[serde(default)]
    pub spring: Option<SpringConfig>,
}

/// All four network statistics
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatsConfig {
    #[serde(default = "default_blocks")]
    pub blocks: StatConfig,
    #[serde(default = "default_subnets")]
    pub subnets: StatConfig,
    #[serde(default = "default_transactions")]
    pub transactions: StatConfig,
    #[serde(default = "default_state_size")]
    pub state_size: StatConfig,
}

fn default_blocks() -> StatConfig {
    StatConfig {
        poll_interval_ms: Some(1000),
        spring: Some(SpringConfig::gentle()),
        lead_in: Some(30.0),
        format: StatFormat::Grouped,
    }
}

fn default_subnets() -> StatConfig {
    StatConfig {
        poll_interval_ms: None,
        spring: None,
        lead_in: None,
        format: StatFormat::Plain,
    }
}

fn default_transactions() -> StatConfig {
    StatConfig {
        poll_interval_ms: Some(1000),
        spring: Some(SpringConfig::brisk()),
        lead_in: None,
        format: StatFormat::Grouped,
    }
}

fn default_state_size() -> StatConfig {
    StatConfig {
        poll_interval_ms: Some(10_000),
        spring: Some(SpringConfig::heavy()),
        lead_in: None,
        format: StatFormat::Terabytes,
    }
}

impl StatsConfig {
    pub fn get(&self, kind: StatKind) -> &StatConfig {
        match kind {
            StatKind::BlocksProcessed => &self.blocks,
            StatKind::SubnetCount => &self.subnets,
            StatKind::TransactionRate => &self.transactions,
            StatKind::StateSize => &self.state_size,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            blocks: default_blocks(),
            subnets: default_subnets(),
            transactions: default_transactions(),
            state_size: default_state_size(),
        }
    }
}

/// Newsletter sign-up section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewsletterConfig {
    #[serde(default = "default_post_url")]
    pub post_url: String,
    #[serde(default = "default_cta_label")]
    pub cta_label: String,
    #[serde(default = "default_fields")]
    pub fields: Vec<FormField>,
}

fn default_post_url() -> String {
    "https://dfinity.us16.list-manage.com/subscribe/post?u=33c727489e01ff5b6e1fb6cc6&id=2117910e55&f_id=0052c2e1f0".to_string()
}

fn default_cta_label() -> String {
    "Get updates!".to_string()
}

fn default_fields() -> Vec<FormField> {
    vec![FormField {
        name: "EMAIL".to_string(),
        placeholder: "Email".to_string(),
        kind: FieldKind::Email,
        required: true,
    }]
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            post_url: default_post_url(),
            cta_label: default_cta_label(),
            fields: default_fields(),
        }
    }
}
