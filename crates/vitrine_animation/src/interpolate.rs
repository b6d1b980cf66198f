//! Scroll-driven interpolation
//!
//! Scroll effects are described as breakpoints `(fraction, value)` over a
//! progress ratio. Progress is always clamped to `[0, 1]` and values never
//! extrapolate past the first or last breakpoint.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{AnimationError, Result};

/// Linear interpolation between `start` and `end`
#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Sample piecewise-linear `breakpoints` at `progress`.
///
/// `progress` is clamped to `[0, 1]` (NaN counts as 0). Breakpoints must be
/// ordered by fraction; where two share a fraction the later one wins from
/// that fraction on. An empty slice yields `0.0`.
pub fn interpolate(progress: f64, breakpoints: &[(f64, f64)]) -> f64 {
    let Some(&(first_fraction, first_value)) = breakpoints.first() else {
        return 0.0;
    };

    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };

    if progress < first_fraction {
        return first_value;
    }

    // First breakpoint strictly after `progress`
    let upper = breakpoints.partition_point(|&(fraction, _)| fraction <= progress);
    // Only reachable with a NaN first fraction
    if upper == 0 {
        return first_value;
    }
    if upper == breakpoints.len() {
        return breakpoints[upper - 1].1;
    }

    let (f0, v0) = breakpoints[upper - 1];
    let (f1, v1) = breakpoints[upper];
    lerp(v0, v1, (progress - f0) / (f1 - f0))
}

/// A validated, ordered breakpoint sequence
#[derive(Clone, Debug, PartialEq)]
pub struct Breakpoints {
    points: SmallVec<[(f64, f64); 4]>,
}

impl Breakpoints {
    /// Build from `(fraction, value)` pairs, rejecting empty, non-finite, or
    /// out-of-order input.
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let points: SmallVec<[(f64, f64); 4]> = points.into_iter().collect();
        if points.is_empty() {
            return Err(AnimationError::NoBreakpoints);
        }

        for (index, &(fraction, value)) in points.iter().enumerate() {
            if !(fraction.is_finite() && value.is_finite()) {
                return Err(AnimationError::NonFiniteBreakpoint {
                    index,
                    fraction,
                    value,
                });
            }
            if index > 0 {
                let previous = points[index - 1].0;
                if fraction < previous {
                    return Err(AnimationError::UnorderedBreakpoints {
                        index,
                        fraction,
                        previous,
                    });
                }
            }
        }

        Ok(Self { points })
    }

    /// Two-point ramp from `(from, start)` to `(to, end)`
    pub fn ramp(from: f64, start: f64, to: f64, end: f64) -> Result<Self> {
        Self::new([(from, start), (to, end)])
    }

    pub fn sample(&self, progress: f64) -> f64 {
        interpolate(progress, &self.points)
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn first_value(&self) -> f64 {
        self.points[0].1
    }

    pub fn last_value(&self) -> f64 {
        self.points[self.points.len() - 1].1
    }
}

// ============================================================================
// Scroll ranges
// ============================================================================

/// An element edge or viewport edge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOffset {
    Start,
    End,
}

impl EdgeOffset {
    /// Position of this edge along a box of `length`
    pub fn along(self, length: f64) -> f64 {
        match self {
            EdgeOffset::Start => 0.0,
            EdgeOffset::End => length,
        }
    }
}

/// Where tracking starts and ends: each pair is `(element edge, viewport edge)`
/// and marks the scroll position at which those two edges line up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollOffsets {
    pub from: (EdgeOffset, EdgeOffset),
    pub to: (EdgeOffset, EdgeOffset),
}

impl ScrollOffsets {
    /// From the element entering at the bottom to leaving at the top
    pub const ENTER_TO_EXIT: Self = Self {
        from: (EdgeOffset::Start, EdgeOffset::End),
        to: (EdgeOffset::End, EdgeOffset::Start),
    };

    /// From the element's bottom resting on the viewport bottom to it leaving at the top
    pub const BOTTOM_ALIGNED_TO_EXIT: Self = Self {
        from: (EdgeOffset::End, EdgeOffset::End),
        to: (EdgeOffset::End, EdgeOffset::Start),
    };
}

/// Element geometry in document coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
    pub top: f64,
    pub height: f64,
}

impl ElementRect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Scroll input domain in document pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollRange {
    pub start: f64,
    pub end: f64,
}

impl ScrollRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Range tracked by `offsets` for `element` in a viewport of `viewport_height`
    pub fn for_offsets(element: ElementRect, viewport_height: f64, offsets: ScrollOffsets) -> Self {
        let aligned = |(element_edge, viewport_edge): (EdgeOffset, EdgeOffset)| {
            element.top + element_edge.along(element.height) - viewport_edge.along(viewport_height)
        };
        Self {
            start: aligned(offsets.from),
            end: aligned(offsets.to),
        }
    }

    /// Unclamped progress of `scroll_offset` through the range.
    ///
    /// A zero-length range behaves as a step at `end`.
    pub fn progress(&self, scroll_offset: f64) -> f64 {
        let length = self.end - self.start;
        if !length.is_finite() || length.abs() < f64::EPSILON {
            return if scroll_offset >= self.end { 1.0 } else { 0.0 };
        }
        (scroll_offset - self.start) / length
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// A scroll range feeding named output channels
#[derive(Clone, Debug, Default)]
pub struct ScrollTransform {
    range: ScrollRange,
    channels: SmallVec<[(String, Breakpoints); 2]>,
}

impl ScrollTransform {
    pub fn new(range: ScrollRange) -> Self {
        Self {
            range,
            channels: SmallVec::new(),
        }
    }

    /// Add (or replace) a channel
    pub fn channel(mut self, name: impl Into<String>, breakpoints: Breakpoints) -> Self {
        let name = name.into();
        match self.channels.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = breakpoints,
            None => self.channels.push((name, breakpoints)),
        }
        self
    }

    /// Replace the range, e.g. after a resize
    pub fn set_range(&mut self, range: ScrollRange) {
        self.range = range;
    }

    pub fn range(&self) -> ScrollRange {
        self.range
    }

    /// Clamped progress for `scroll_offset`
    pub fn progress(&self, scroll_offset: f64) -> f64 {
        self.range.progress(scroll_offset).clamp(0.0, 1.0)
    }

    /// Value of one channel at `scroll_offset`
    pub fn value(&self, name: &str, scroll_offset: f64) -> Option<f64> {
        let progress = self.progress(scroll_offset);
        self.channels
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bp)| bp.sample(progress))
    }

    /// Every channel at `scroll_offset`, in insertion order
    pub fn sample(&self, scroll_offset: f64) -> SmallVec<[(&str, f64); 2]> {
        let progress = self.progress(scroll_offset);
        self.channels
            .iter()
            .map(|(name, bp)| (name.as_str(), bp.sample(progress)))
            .collect()
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|(name, _)| name.as_str())
    }
}
