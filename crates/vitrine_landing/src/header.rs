//! Header theme
//!
//! The navigation header is styled dark while the hero fills the screen and
//! flips to light once the page scrolls past `viewport height − header height`.

use serde::{Deserialize, Serialize};
use vitrine_core::fsm::{StateMachine, Transition};

use crate::viewport::Viewport;

/// Header styling
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderTheme {
    Dark,
    Light,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Crossing {
    ScrolledPast,
    ScrolledBack,
}

/// Flips the header theme as the hero scrolls away
pub struct HeaderThemeController {
    machine: StateMachine<HeaderTheme, Crossing>,
    header_height: f64,
    hysteresis: f64,
}

impl HeaderThemeController {
    /// `hysteresis` is a dead band in px on both sides of the threshold;
    /// zero keeps the comparison strict.
    pub fn new(header_height: f64, hysteresis: f64) -> Self {
        Self {
            machine: StateMachine::new(
                HeaderTheme::Dark,
                [
                    Transition::new(HeaderTheme::Dark, Crossing::ScrolledPast, HeaderTheme::Light),
                    Transition::new(HeaderTheme::Light, Crossing::ScrolledBack, HeaderTheme::Dark),
                ],
            ),
            header_height,
            hysteresis: hysteresis.abs(),
        }
    }

    /// Update after the navbar was measured again
    pub fn set_header_height(&mut self, header_height: f64) {
        self.header_height = header_height;
    }

    /// Scroll offset at which the theme flips
    pub fn threshold(&self, viewport_height: f64) -> f64 {
        viewport_height - self.header_height
    }

    /// Re-evaluate for a new scroll position
    pub fn on_scroll(&mut self, viewport: &Viewport) -> HeaderTheme {
        let threshold = self.threshold(viewport.height);
        if viewport.scroll_y > threshold + self.hysteresis {
            self.machine.send(Crossing::ScrolledPast);
        } else if viewport.scroll_y < threshold - self.hysteresis {
            self.machine.send(Crossing::ScrolledBack);
        }
        self.machine.current_state()
    }

    pub fn theme(&self) -> HeaderTheme {
        self.machine.current_state()
    }

    pub fn is_dark(&self) -> bool {
        self.machine.is_in(HeaderTheme::Dark)
    }

    /// Number of flips so far
    pub fn flips(&self) -> u64 {
        self.machine.transition_count()
    }
}

impl Default for HeaderThemeController {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: f64 = 900.0;
    const HEADER: f64 = 64.0;

    fn at(scroll_y: f64) -> Viewport {
        Viewport::new(scroll_y, VIEWPORT)
    }

    #[test]
    fn test_starts_dark() {
        let header = HeaderThemeController::new(HEADER, 0.0);
        assert!(header.is_dark());
        assert_eq!(header.threshold(VIEWPORT), 836.0);
    }

    #[test]
    fn test_flips_past_threshold_and_back() {
        let mut header = HeaderThemeController::new(HEADER, 0.0);

        assert_eq!(header.on_scroll(&at(100.0)), HeaderTheme::Dark);
        assert_eq!(header.on_scroll(&at(837.0)), HeaderTheme::Light);
        assert_eq!(header.on_scroll(&at(2000.0)), HeaderTheme::Light);
        assert_eq!(header.on_scroll(&at(835.0)), HeaderTheme::Dark);
        assert_eq!(header.flips(), 2);
    }

    #[test]
    fn test_exact_threshold_keeps_theme() {
        let mut header = HeaderThemeController::new(HEADER, 0.0);
        assert_eq!(header.on_scroll(&at(836.0)), HeaderTheme::Dark);

        header.on_scroll(&at(900.0));
        assert_eq!(header.on_scroll(&at(836.0)), HeaderTheme::Light);
    }

    #[test]
    fn test_hysteresis_band_suppresses_flicker() {
        let mut header = HeaderThemeController::new(HEADER, 5.0);

        for scroll_y in [834.0, 838.0, 833.0, 840.0, 832.0] {
            header.on_scroll(&at(scroll_y));
        }
        assert_eq!(header.flips(), 0);

        header.on_scroll(&at(842.0));
        assert_eq!(header.theme(), HeaderTheme::Light);
        header.on_scroll(&at(832.0));
        assert_eq!(header.theme(), HeaderTheme::Light);
        header.on_scroll(&at(830.0));
        assert_eq!(header.theme(), HeaderTheme::Dark);
    }

    #[test]
    fn test_flip_count_survives_long_sessions() {
        let mut header = HeaderThemeController::new(HEADER, 0.0);
        for _ in 0..5_000 {
            header.on_scroll(&at(2000.0));
            header.on_scroll(&at(0.0));
        }
        assert_eq!(header.flips(), 10_000);
        assert!(header.is_dark());
    }

    #[test]
    fn test_resize_moves_threshold() {
        let mut header = HeaderThemeController::new(HEADER, 0.0);
        header.on_scroll(&at(700.0));
        assert!(header.is_dark());

        // Shorter window: same scroll is now past the hero
        header.on_scroll(&Viewport::new(700.0, 600.0));
        assert_eq!(header.theme(), HeaderTheme::Light);
    }
}
