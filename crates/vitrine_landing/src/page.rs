//! Landing page composition
//!
//! [`LandingPage`] owns every section and recomputes the derived display
//! state from the latest viewport, samples and frame ticks. [`LandingPage::mount`]
//! wires it to host event sources and returns the handle that unmounts it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vitrine_animation::ElementRect;
use vitrine_core::events::{EventSource, FrameTick, Subscription};

use crate::config::LandingConfig;
use crate::error::{ConfigError, FormError};
use crate::header::{HeaderTheme, HeaderThemeController};
use crate::hero::{HeroFrame, HeroLayout, HeroSection};
use crate::newsletter::{NewsletterForm, Submission};
use crate::stats::{StatKind, StatView, StatsPanel, StatsSource};
use crate::viewport::Viewport;

/// Measured page geometry in document pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub header_height: f64,
    /// Full-screen headline with the blob
    pub headline: ElementRect,
    /// Statistics block below the headline; particles pause once it has
    /// scrolled out
    pub hero: ElementRect,
}

impl PageLayout {
    /// Headline filling the first screen, statistics block right below it
    pub fn default_for(viewport_height: f64, header_height: f64, stats_height: f64) -> Self {
        Self {
            header_height,
            headline: ElementRect::new(0.0, viewport_height),
            hero: ElementRect::new(viewport_height, stats_height),
        }
    }

    pub fn hero_layout(&self) -> HeroLayout {
        HeroLayout {
            headline: self.headline,
            hero: self.hero,
        }
    }
}

/// Everything the host renders for one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageFrame {
    pub header_theme: HeaderTheme,
    pub hero: HeroFrame,
    pub stats: Vec<StatView>,
    /// Whether another frame is needed for the counters
    pub animating: bool,
    pub newsletter_cta: String,
}

pub struct LandingPage {
    layout: PageLayout,
    viewport: Viewport,
    hero: HeroSection,
    hero_frame: HeroFrame,
    header: HeaderThemeController,
    stats: StatsPanel,
    newsletter: NewsletterForm,
    source: Option<Box<dyn StatsSource>>,
    elapsed: Duration,
}

impl LandingPage {
    /// Build with the default layout for `viewport`
    pub fn new(config: &LandingConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        let layout = PageLayout::default_for(
            viewport.height,
            config.header.height,
            config.hero.stats_height,
        );
        Self::with_layout(config, viewport, layout)
    }

    pub fn with_layout(
        config: &LandingConfig,
        viewport: Viewport,
        layout: PageLayout,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let hero = HeroSection::new(&config.hero, layout.hero_layout(), viewport.height)?;
        let mut page = Self {
            layout,
            viewport,
            hero,
            hero_frame: HeroFrame::default(),
            header: HeaderThemeController::new(layout.header_height, config.header.hysteresis),
            stats: StatsPanel::new(&config.stats),
            newsletter: NewsletterForm::new(&config.newsletter),
            source: None,
            elapsed: Duration::ZERO,
        };
        page.on_scroll(viewport);
        Ok(page)
    }

    /// Producer polled for statistics on each frame
    pub fn set_stats_source(&mut self, source: impl StatsSource + 'static) {
        self.source = Some(Box::new(source));
    }

    /// Apply new geometry after elements were measured again
    pub fn set_layout(&mut self, layout: PageLayout) {
        self.layout = layout;
        self.header.set_header_height(layout.header_height);
        self.hero.relayout(layout.hero_layout(), self.viewport.height);
        self.on_scroll(self.viewport);
    }

    /// Scroll or resize
    pub fn on_scroll(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.header.on_scroll(&viewport);
        self.hero_frame = self.hero.on_scroll(&viewport);
    }

    /// Poll due statistics and advance counters by `dt` seconds.
    /// Returns whether another frame is needed.
    pub fn on_frame(&mut self, dt: f64) -> bool {
        self.poll_stats();
        let animating = self.stats.tick(dt);
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += Duration::try_from_secs_f64(dt).unwrap_or_default();
        }
        animating
    }

    /// Fetch the statistics due now from the installed source
    pub fn poll_stats(&mut self) -> usize {
        match self.source.as_mut() {
            Some(source) => self.stats.poll(self.elapsed, &mut **source),
            None => 0,
        }
    }

    /// Push a sample without a source
    pub fn apply_sample(&mut self, kind: StatKind, value: f64) -> bool {
        self.stats.apply_sample(kind, value)
    }

    pub fn submit_newsletter<K, V>(
        &self,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Submission, FormError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.newsletter.submit(values)
    }

    pub fn frame(&self) -> PageFrame {
        PageFrame {
            header_theme: self.header.theme(),
            hero: self.hero_frame.clone(),
            stats: self.stats.snapshot(),
            animating: self.stats.has_active_animations(),
            newsletter_cta: self.newsletter.cta_label().to_string(),
        }
    }

    pub fn header_theme(&self) -> HeaderTheme {
        self.header.theme()
    }

    pub fn hero_frame(&self) -> &HeroFrame {
        &self.hero_frame
    }

    pub fn stats(&self) -> &StatsPanel {
        &self.stats
    }

    pub fn newsletter(&self) -> &NewsletterForm {
        &self.newsletter
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    /// Time advanced by frame ticks since the page was built
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Subscribe `page` to the host's frame and scroll sources
    pub fn mount(
        page: &Rc<RefCell<LandingPage>>,
        frames: &EventSource<FrameTick>,
        scroll: &EventSource<Viewport>,
    ) -> MountedPage {
        let weak = Rc::downgrade(page);
        let frame_sub = frames.subscribe(move |tick: &FrameTick| {
            with_page(&weak, |page| {
                page.on_frame(tick.dt);
            });
        });

        let weak = Rc::downgrade(page);
        let scroll_sub = scroll.subscribe(move |viewport: &Viewport| {
            with_page(&weak, |page| page.on_scroll(*viewport));
        });

        tracing::debug!("landing page mounted");
        MountedPage {
            page: Rc::clone(page),
            subscriptions: Some([frame_sub, scroll_sub]),
        }
    }
}

fn with_page(weak: &Weak<RefCell<LandingPage>>, f: impl FnOnce(&mut LandingPage)) {
    let Some(page) = weak.upgrade() else {
        return;
    };
    // Re-entrant emit while the host holds the page: drop the event
    let Ok(mut page) = page.try_borrow_mut() else {
        tracing::trace!("landing page busy, event dropped");
        return;
    };
    f(&mut page);
}

/// A page listening to host events until unmounted
pub struct MountedPage {
    page: Rc<RefCell<LandingPage>>,
    subscriptions: Option<[Subscription; 2]>,
}

impl MountedPage {
    pub fn page(&self) -> &Rc<RefCell<LandingPage>> {
        &self.page
    }

    pub fn is_mounted(&self) -> bool {
        self.subscriptions.is_some()
    }

    /// Cancel both subscriptions. Returns false if already unmounted.
    pub fn unmount(&mut self) -> bool {
        let Some(subscriptions) = self.subscriptions.take() else {
            return false;
        };
        for subscription in subscriptions {
            subscription.cancel();
        }
        tracing::debug!("landing page unmounted");
        true
    }
}

impl std::fmt::Debug for MountedPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedPage")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
