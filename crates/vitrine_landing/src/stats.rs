//! Network statistics panel
//!
//! Four read-only statistics are polled from an external source at their
//! own intervals. Animated ones are shown through a [`ContinuousCounter`];
//! until the first sample arrives a slot renders a non-breaking space.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use vitrine_animation::{
    AnimationScheduler, ContinuousCounter, CounterId, Formatter, SpringConfig, SpringStatus,
};

use crate::config::StatsConfig;
use crate::error::StatsError;
use crate::format::{format_grouped, format_plain, format_terabytes};

/// Rendered before a statistic has been fetched
pub const PENDING_PLACEHOLDER: &str = "\u{a0}";

/// How long a fetch-once statistic waits before retrying a failure
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// The statistics shown on the page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    BlocksProcessed,
    SubnetCount,
    TransactionRate,
    StateSize,
}

impl StatKind {
    pub const ALL: [StatKind; 4] = [
        StatKind::BlocksProcessed,
        StatKind::SubnetCount,
        StatKind::TransactionRate,
        StatKind::StateSize,
    ];

    /// Caption shown under the number
    pub fn label(self) -> &'static str {
        match self {
            StatKind::BlocksProcessed => "Blocks processed",
            StatKind::SubnetCount => "parallel subnets",
            StatKind::TransactionRate => "Transactions/s",
            StatKind::StateSize => "Actual blockchain state",
        }
    }

    fn key(self) -> &'static str {
        match self {
            StatKind::BlocksProcessed => "blocks_processed",
            StatKind::SubnetCount => "subnet_count",
            StatKind::TransactionRate => "transaction_rate",
            StatKind::StateSize => "state_size",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Display rule for a statistic
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatFormat {
    /// Whole number grouped with `’`
    Grouped,
    /// Bytes shown as terabytes
    Terabytes,
    /// Raw number
    Plain,
}

impl StatFormat {
    pub fn formatter(self) -> Formatter {
        match self {
            StatFormat::Grouped => Arc::new(format_grouped),
            StatFormat::Terabytes => Arc::new(format_terabytes),
            StatFormat::Plain => Arc::new(format_plain),
        }
    }
}

/// External producer of statistic values (network fetches live outside)
pub trait StatsSource {
    fn fetch(&mut self, kind: StatKind) -> Result<f64, StatsError>;
}

impl<F> StatsSource for F
where
    F: FnMut(StatKind) -> Result<f64, StatsError>,
{
    fn fetch(&mut self, kind: StatKind) -> Result<f64, StatsError> {
        self(kind)
    }
}

#[derive(Clone, Copy, Debug)]
struct PollEntry {
    kind: StatKind,
    interval: Option<Duration>,
    last_attempt: Option<Duration>,
    succeeded: bool,
}

/// Decides which statistics are due for a fetch
#[derive(Clone, Debug, Default)]
pub struct PollSchedule {
    entries: SmallVec<[PollEntry; 4]>,
}

impl PollSchedule {
    pub fn new(intervals: impl IntoIterator<Item = (StatKind, Option<Duration>)>) -> Self {
        Self {
            entries: intervals
                .into_iter()
                .map(|(kind, interval)| PollEntry {
                    kind,
                    interval,
                    last_attempt: None,
                    succeeded: false,
                })
                .collect(),
        }
    }

    /// Statistics due at `now` (time since the page mounted)
    pub fn due(&self, now: Duration) -> SmallVec<[StatKind; 4]> {
        self.entries
            .iter()
            .filter(|entry| {
                let Some(last) = entry.last_attempt else {
                    return true;
                };
                let since = now.saturating_sub(last);
                match entry.interval {
                    Some(interval) => since >= interval,
                    None => !entry.succeeded && since >= RETRY_DELAY,
                }
            })
            .map(|entry| entry.kind)
            .collect()
    }

    /// Record a fetch attempt for `kind`
    pub fn record(&mut self, kind: StatKind, now: Duration, succeeded: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.kind == kind) {
            entry.last_attempt = Some(now);
            entry.succeeded |= succeeded;
        }
    }
}

struct StatSlot {
    kind: StatKind,
    format: StatFormat,
    spring: Option<SpringConfig>,
    lead_in: Option<f64>,
    counter: Option<CounterId>,
    latest: Option<f64>,
}

/// What one statistic shows this frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatView {
    pub kind: StatKind,
    pub label: &'static str,
    pub text: String,
    pub fetched: bool,
    /// Counter status, absent for statistics shown raw
    pub status: Option<SpringStatus>,
}

/// The statistics block of the hero section
pub struct StatsPanel {
    slots: SmallVec<[StatSlot; 4]>,
    scheduler: AnimationScheduler,
    schedule: PollSchedule,
}

impl StatsPanel {
    pub fn new(config: &StatsConfig) -> Self {
        let slots = StatKind::ALL
            .iter()
            .map(|&kind| {
                let stat = config.get(kind);
                StatSlot {
                    kind,
                    format: stat.format,
                    spring: stat.spring,
                    lead_in: stat.lead_in,
                    counter: None,
                    latest: None,
                }
            })
            .collect();

        let schedule = PollSchedule::new(StatKind::ALL.iter().map(|&kind| {
            let interval = config.get(kind).poll_interval_ms.map(Duration::from_millis);
            (kind, interval)
        }));

        Self {
            slots,
            scheduler: AnimationScheduler::new(),
            schedule,
        }
    }

    /// Fetch every statistic due at `now`. Returns how many samples were applied.
    pub fn poll(&mut self, now: Duration, source: &mut dyn StatsSource) -> usize {
        let mut applied = 0;
        for kind in self.schedule.due(now) {
            let ok = match source.fetch(kind) {
                Ok(value) => self.apply_sample(kind, value),
                Err(err) => {
                    tracing::warn!(%kind, error = %err, "statistic fetch failed");
                    false
                }
            };
            self.schedule.record(kind, now, ok);
            applied += usize::from(ok);
        }
        applied
    }

    /// Apply a sample pushed by the host. Returns whether it was accepted.
    ///
    /// A non-finite first sample is ignored; once a counter exists, a
    /// non-finite sample stalls it on its last value.
    pub fn apply_sample(&mut self, kind: StatKind, value: f64) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|s| s.kind == kind) else {
            return false;
        };

        if !value.is_finite() && slot.latest.is_none() {
            let err = StatsError::NotANumber { kind };
            tracing::warn!(%kind, error = %err, "ignoring first sample");
            return false;
        }

        let Some(spring) = slot.spring else {
            if value.is_finite() {
                slot.latest = Some(value);
            }
            return value.is_finite();
        };

        match slot.counter {
            Some(id) => {
                self.scheduler.set_target(id, value);
            }
            None => {
                let initial = slot.lead_in.map_or(0.0, |lead_in| value - lead_in);
                let counter = ContinuousCounter::with_formatter(
                    initial,
                    value,
                    spring,
                    slot.format.formatter(),
                );
                slot.counter = Some(self.scheduler.add_counter(counter));
                tracing::debug!(%kind, value, "statistic fetched");
            }
        }
        if value.is_finite() {
            slot.latest = Some(value);
        }
        value.is_finite()
    }

    /// Advance counters by `dt` seconds. Returns whether any still animate.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.scheduler.tick(dt)
    }

    pub fn has_active_animations(&self) -> bool {
        self.scheduler.has_active_animations()
    }

    pub fn is_fetched(&self, kind: StatKind) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.kind == kind && slot.latest.is_some())
    }

    /// Latest accepted sample for `kind`
    pub fn latest(&self, kind: StatKind) -> Option<f64> {
        self.slots
            .iter()
            .find(|slot| slot.kind == kind)
            .and_then(|slot| slot.latest)
    }

    /// Current text for every statistic
    pub fn snapshot(&self) -> Vec<StatView> {
        self.slots.iter().map(|slot| self.view(slot)).collect()
    }

    fn view(&self, slot: &StatSlot) -> StatView {
        let counter = slot
            .counter
            .and_then(|id| self.scheduler.get_counter(id));

        let (text, status) = match (counter, slot.latest) {
            (Some(counter), _) => (counter.display(), Some(counter.status())),
            (None, Some(value)) => ((slot.format.formatter())(value), None),
            (None, None) => (PENDING_PLACEHOLDER.to_string(), None),
        };

        StatView {
            kind: slot.kind,
            label: slot.kind.label(),
            text,
            fetched: slot.latest.is_some(),
            status,
        }
    }
}
