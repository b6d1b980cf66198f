//! Hero section scroll effects
//!
//! Two scroll trackers drive the hero:
//!
//! - the headline, tracked from its bottom edge resting on the viewport
//!   bottom until it leaves at the top, fades the blob and blurs the
//!   particles;
//! - the statistics block below the headline, tracked from entering to
//!   leaving the viewport, pauses the particle animation once it has fully
//!   scrolled out.

use serde::{Deserialize, Serialize};
use vitrine_animation::{ElementRect, ScrollOffsets, ScrollRange, ScrollTransform};
use vitrine_core::fsm::{StateMachine, Transition};

use crate::config::HeroConfig;
use crate::error::ConfigError;
use crate::viewport::Viewport;

const OPACITY: &str = "opacity";
const BLUR: &str = "blur";

/// Particle animation playback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleState {
    Running,
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HeroEdge {
    ScrolledOut,
    ScrolledIn,
}

/// Hero styling for one scroll position
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeroFrame {
    /// Opacity of the blob, headline and scroll button
    pub blob_opacity: f64,
    /// Particle blur radius in px
    pub blur_px: f64,
    /// CSS filter applied to the particle layer
    pub blur_filter: String,
    pub particles_running: bool,
    pub headline_progress: f64,
    pub hero_progress: f64,
}

impl Default for HeroFrame {
    fn default() -> Self {
        Self {
            blob_opacity: 1.0,
            blur_px: 0.0,
            blur_filter: blur_filter(0.0),
            particles_running: true,
            headline_progress: 0.0,
            hero_progress: 0.0,
        }
    }
}

/// CSS blur filter text
pub fn blur_filter(px: f64) -> String {
    format!("blur({px}px)")
}

/// Measured geometry of the hero elements
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroLayout {
    pub headline: ElementRect,
    pub hero: ElementRect,
}

pub struct HeroSection {
    headline: ScrollTransform,
    hero_range: ScrollRange,
    particles: StateMachine<ParticleState, HeroEdge>,
    layout: HeroLayout,
    viewport_height: f64,
}

impl HeroSection {
    pub fn new(
        config: &HeroConfig,
        layout: HeroLayout,
        viewport_height: f64,
    ) -> Result<Self, ConfigError> {
        let headline = ScrollTransform::new(ScrollRange::default())
            .channel(OPACITY, config.opacity_breakpoints()?)
            .channel(BLUR, config.blur_breakpoints()?);

        let particles = StateMachine::new(
            ParticleState::Running,
            [
                Transition::new(
                    ParticleState::Running,
                    HeroEdge::ScrolledOut,
                    ParticleState::Paused,
                ),
                Transition::new(
                    ParticleState::Paused,
                    HeroEdge::ScrolledIn,
                    ParticleState::Running,
                ),
            ],
        );

        let mut section = Self {
            headline,
            hero_range: ScrollRange::default(),
            particles,
            layout,
            viewport_height,
        };
        section.relayout(layout, viewport_height);
        Ok(section)
    }

    /// Recompute scroll ranges after a resize or re-measure
    pub fn relayout(&mut self, layout: HeroLayout, viewport_height: f64) {
        self.layout = layout;
        self.viewport_height = viewport_height;
        self.headline.set_range(ScrollRange::for_offsets(
            layout.headline,
            viewport_height,
            ScrollOffsets::BOTTOM_ALIGNED_TO_EXIT,
        ));
        self.hero_range =
            ScrollRange::for_offsets(layout.hero, viewport_height, ScrollOffsets::ENTER_TO_EXIT);
        tracing::debug!(
            headline = ?self.headline.range(),
            hero = ?self.hero_range,
            "hero relayout"
        );
    }

    /// Styling for the viewport's scroll position
    pub fn on_scroll(&mut self, viewport: &Viewport) -> HeroFrame {
        if viewport.height != self.viewport_height {
            self.relayout(self.layout, viewport.height);
        }

        let scroll_y = viewport.scroll_y;
        let blob_opacity = self.headline.value(OPACITY, scroll_y).unwrap_or(1.0);
        let blur_px = self.headline.value(BLUR, scroll_y).unwrap_or(0.0);

        let hero_progress = self.hero_range.progress(scroll_y).clamp(0.0, 1.0);
        if hero_progress >= 1.0 {
            self.particles.send(HeroEdge::ScrolledOut);
        } else {
            self.particles.send(HeroEdge::ScrolledIn);
        }

        HeroFrame {
            blob_opacity,
            blur_px,
            blur_filter: blur_filter(blur_px),
            particles_running: self.particles_running(),
            headline_progress: self.headline.progress(scroll_y),
            hero_progress,
        }
    }

    pub fn particles_running(&self) -> bool {
        self.particles.is_in(ParticleState::Running)
    }

    pub fn layout(&self) -> HeroLayout {
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VH: f64 = 1000.0;

    fn section() -> HeroSection {
        // Full-screen headline at the top, 1500px statistics block below it
        let layout = HeroLayout {
            headline: ElementRect::new(0.0, VH),
            hero: ElementRect::new(VH, 1500.0),
        };
        HeroSection::new(&HeroConfig::default(), layout, VH).unwrap()
    }

    #[test]
    fn test_top_of_page() {
        let frame = section().on_scroll(&Viewport::new(0.0, VH));
        assert_eq!(frame.blob_opacity, 1.0);
        assert_eq!(frame.blur_px, 0.0);
        assert_eq!(frame.blur_filter, "blur(0px)");
        assert!(frame.particles_running);
    }

    #[test]
    fn test_fade_and_blur_with_scroll() {
        let mut hero = section();

        // Headline range is [0, 1000], so scroll == progress * 1000
        let quarter = hero.on_scroll(&Viewport::new(250.0, VH));
        assert!((quarter.blob_opacity - 0.5).abs() < 1e-9);
        assert_eq!(quarter.blur_px, 0.0);

        let mid = hero.on_scroll(&Viewport::new(480.0, VH));
        assert_eq!(mid.blob_opacity, 0.0);
        assert!((mid.blur_px - 25.0).abs() < 1e-9);
        assert_eq!(mid.blur_filter, format!("blur({}px)", mid.blur_px));

        let past = hero.on_scroll(&Viewport::new(5000.0, VH));
        assert_eq!(past.blur_px, 50.0);
        assert_eq!(past.headline_progress, 1.0);
    }

    #[test]
    fn test_overscroll_clamps() {
        let frame = section().on_scroll(&Viewport::new(-300.0, VH));
        assert_eq!(frame.blob_opacity, 1.0);
        assert_eq!(frame.headline_progress, 0.0);
    }

    #[test]
    fn test_particles_pause_once_hero_scrolled_out() {
        let mut hero = section();

        // Hero range runs from 0 (entering) to 2500 (leaving)
        assert!(hero.on_scroll(&Viewport::new(2499.0, VH)).particles_running);
        let out = hero.on_scroll(&Viewport::new(2500.0, VH));
        assert_eq!(out.hero_progress, 1.0);
        assert!(!out.particles_running);

        assert!(!hero.on_scroll(&Viewport::new(4000.0, VH)).particles_running);
        assert!(hero.on_scroll(&Viewport::new(2400.0, VH)).particles_running);
    }

    #[test]
    fn test_resize_recomputes_ranges() {
        let mut hero = section();
        // Headline stays 1000px tall, but a 500px viewport shifts the range to [500, 1000]
        let frame = hero.on_scroll(&Viewport::new(500.0, 500.0));
        assert_eq!(frame.blob_opacity, 1.0);
        assert_eq!(frame.headline_progress, 0.0);
    }

    #[test]
    fn test_rejects_bad_breakpoints() {
        let config = HeroConfig {
            opacity: vec![],
            ..HeroConfig::default()
        };
        let err = HeroSection::new(&config, HeroLayout::default(), VH).err();
        assert!(matches!(err, Some(ConfigError::Hero { channel: "opacity", .. })));
    }
}
