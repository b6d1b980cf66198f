//! Vitrine Landing Page
//!
//! Headless model of the landing page sections:
//!
//! - **Hero**: scroll-driven blob opacity and blur, particle start/stop
//! - **Header**: dark/light theme flip once the hero scrolls away
//! - **Network statistics**: polled values shown through spring counters
//! - **Newsletter**: sign-up form producing a mailing-list submission
//!
//! A [`LandingPage`] composes the sections, listens to frame and scroll
//! sources, and produces a serializable [`PageFrame`] per frame.

pub mod config;
pub mod error;
pub mod format;
pub mod header;
pub mod hero;
pub mod newsletter;
pub mod page;
pub mod stats;
pub mod viewport;

pub use config::LandingConfig;
pub use error::{ConfigError, FormError, StatsError};
pub use header::{HeaderTheme, HeaderThemeController};
pub use hero::{HeroFrame, HeroLayout, HeroSection};
pub use newsletter::{FieldKind, FormField, NewsletterForm, Submission};
pub use page::{LandingPage, MountedPage, PageFrame, PageLayout};
pub use stats::{StatKind, StatView, StatsPanel, StatsSource};
pub use viewport::Viewport;
