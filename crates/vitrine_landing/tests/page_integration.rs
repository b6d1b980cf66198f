//! Integration tests for the mounted landing page
//!
//! These tests verify that:
//! - Host frame and scroll sources drive every section through one mount
//! - Statistics polled from a source flow into formatted counters
//! - A page built from TOML behaves like the defaults it overrides
//! - Unmounting stops all further updates

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vitrine_core::events::{EventSource, FrameTick};
use vitrine_landing::stats::PENDING_PLACEHOLDER;
use vitrine_landing::{
    HeaderTheme, LandingConfig, LandingPage, PageFrame, StatKind, StatsError, Viewport,
};

const VIEWPORT_HEIGHT: f64 = 900.0;

fn stat_text(frame: &PageFrame, kind: StatKind) -> &str {
    &frame
        .stats
        .iter()
        .find(|view| view.kind == kind)
        .expect("every statistic has a view")
        .text
}

/// Network source whose block height grows by 2 every fetch
fn growing_chain() -> impl FnMut(StatKind) -> Result<f64, StatsError> {
    let mut height = 1_000_000.0;
    move |kind| match kind {
        StatKind::BlocksProcessed => {
            height += 2.0;
            Ok(height)
        }
        StatKind::SubnetCount => Ok(37.0),
        StatKind::TransactionRate => Ok(11_500.0),
        StatKind::StateSize => Ok(3_456_789_000_000.0),
    }
}

#[test]
fn test_mounted_page_full_session() {
    let mut page = LandingPage::new(&LandingConfig::default(), Viewport::new(0.0, VIEWPORT_HEIGHT))
        .expect("default config is valid");
    page.set_stats_source(growing_chain());
    let page = Rc::new(RefCell::new(page));

    let frames = EventSource::<FrameTick>::new();
    let scroll = EventSource::<Viewport>::new();
    let mut mounted = LandingPage::mount(&page, &frames, &scroll);

    // First frame fetches everything; counters start animating
    frames.emit(&FrameTick::new(0.5));
    {
        let frame = page.borrow().frame();
        assert!(frame.animating);
        assert_eq!(stat_text(&frame, StatKind::SubnetCount), "37");
        assert_ne!(stat_text(&frame, StatKind::BlocksProcessed), PENDING_PLACEHOLDER);
    }

    // Let the counters catch up with the chain
    for _ in 0..120 {
        frames.emit(&FrameTick::new(0.5));
    }
    {
        let frame = page.borrow().frame();
        assert_eq!(stat_text(&frame, StatKind::TransactionRate), "11\u{2019}500");
        assert_eq!(stat_text(&frame, StatKind::StateSize), "3.46 TB");
        let latest = page.borrow().stats().latest(StatKind::BlocksProcessed);
        assert!(latest.is_some_and(|blocks| blocks > 1_000_100.0));
    }

    // Scroll through the hero
    scroll.emit(&Viewport::new(VIEWPORT_HEIGHT, VIEWPORT_HEIGHT));
    {
        let frame = page.borrow().frame();
        assert_eq!(frame.header_theme, HeaderTheme::Light);
        assert_eq!(frame.hero.blob_opacity, 0.0);
        assert_eq!(frame.hero.blur_filter, "blur(50px)");
        assert!(frame.hero.particles_running);
    }

    scroll.emit(&Viewport::new(10_000.0, VIEWPORT_HEIGHT));
    assert!(!page.borrow().hero_frame().particles_running);

    assert!(mounted.unmount());
    scroll.emit(&Viewport::new(0.0, VIEWPORT_HEIGHT));
    assert_eq!(page.borrow().header_theme(), HeaderTheme::Light);
}

#[test]
fn test_subnet_fetch_retried_until_success() {
    let attempts = Rc::new(Cell::new(0));
    let attempts_in_source = Rc::clone(&attempts);

    let mut page = LandingPage::new(&LandingConfig::default(), Viewport::new(0.0, VIEWPORT_HEIGHT))
        .expect("default config is valid");
    page.set_stats_source(move |kind: StatKind| -> Result<f64, StatsError> {
        match kind {
            StatKind::SubnetCount => {
                attempts_in_source.set(attempts_in_source.get() + 1);
                if attempts_in_source.get() < 3 {
                    Err(StatsError::Unavailable {
                        kind,
                        reason: "gateway timeout".to_string(),
                    })
                } else {
                    Ok(40.0)
                }
            }
            _ => Ok(1.0),
        }
    });

    for _ in 0..20 {
        page.on_frame(0.25);
    }

    assert_eq!(attempts.get(), 3);
    assert_eq!(stat_text(&page.frame(), StatKind::SubnetCount), "40");
}

#[test]
fn test_page_from_toml() {
    let config: LandingConfig = toml::from_str(
        r#"
        [header]
        height = 100.0

        [newsletter]
        cta_label = "Subscribe"
        "#,
    )
    .expect("valid toml");

    let mut page =
        LandingPage::new(&config, Viewport::new(0.0, VIEWPORT_HEIGHT)).expect("valid config");

    // Threshold is now 900 - 100
    page.on_scroll(Viewport::new(801.0, VIEWPORT_HEIGHT));
    assert_eq!(page.header_theme(), HeaderTheme::Light);
    page.on_scroll(Viewport::new(800.0, VIEWPORT_HEIGHT));
    assert_eq!(page.header_theme(), HeaderTheme::Light);
    page.on_scroll(Viewport::new(799.0, VIEWPORT_HEIGHT));
    assert_eq!(page.header_theme(), HeaderTheme::Dark);

    let frame = page.frame();
    assert_eq!(frame.newsletter_cta, "Subscribe");

    let submission = page
        .submit_newsletter([("EMAIL", "dev@example.org")])
        .expect("email provided");
    assert_eq!(submission.body, "EMAIL=dev%40example.org");
}

#[test]
fn test_frame_serializes_for_host() {
    let page = LandingPage::new(&LandingConfig::default(), Viewport::new(0.0, VIEWPORT_HEIGHT))
        .expect("default config is valid");

    let json = serde_json::to_value(page.frame()).expect("frame serializes");
    assert_eq!(json["header_theme"], "dark");
    assert_eq!(json["hero"]["blur_filter"], "blur(0px)");
    assert_eq!(json["stats"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["stats"][0]["kind"], "blocks_processed");
    assert_eq!(json["stats"][0]["text"], PENDING_PLACEHOLDER);
}
