//! Animation scheduler
//!
//! Owns the live counters of a page and ticks them each frame. Once every
//! counter is settled or stalled the host can stop requesting frames.

use crate::counter::ContinuousCounter;
use crate::spring::SpringStatus;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct CounterId;
}

/// The scheduler that ticks all live counters
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    counters: SlotMap<CounterId, ContinuousCounter>,
    frames: u64,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            counters: SlotMap::with_key(),
            frames: 0,
        }
    }

    pub fn add_counter(&mut self, counter: ContinuousCounter) -> CounterId {
        self.counters.insert(counter)
    }

    pub fn get_counter(&self, id: CounterId) -> Option<&ContinuousCounter> {
        self.counters.get(id)
    }

    pub fn get_counter_mut(&mut self, id: CounterId) -> Option<&mut ContinuousCounter> {
        self.counters.get_mut(id)
    }

    pub fn remove_counter(&mut self, id: CounterId) -> Option<ContinuousCounter> {
        self.counters.remove(id)
    }

    /// Feed a new target to one counter. Returns false for unknown ids.
    pub fn set_target(&mut self, id: CounterId, target: f64) -> bool {
        match self.counters.get_mut(id) {
            Some(counter) => {
                counter.set_target(target);
                true
            }
            None => false,
        }
    }

    /// Tick every animating counter by `dt` seconds.
    ///
    /// Returns whether any counter still needs frames.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.frames += 1;
        let mut active = false;
        for (id, counter) in self.counters.iter_mut() {
            if !counter.is_animating() {
                continue;
            }
            match counter.tick(dt) {
                SpringStatus::Animating => active = true,
                SpringStatus::Settled => {
                    tracing::trace!(?id, value = counter.value(), "counter settled")
                }
                SpringStatus::Stalled => {
                    tracing::debug!(?id, value = counter.value(), "counter stalled")
                }
            }
        }
        active
    }

    /// Check if any counter is still moving
    pub fn has_active_animations(&self) -> bool {
        self.counters.values().any(ContinuousCounter::is_animating)
    }

    pub fn counters_iter(&self) -> impl Iterator<Item = (CounterId, &ContinuousCounter)> {
        self.counters.iter()
    }

    pub fn counter_count(&self) -> usize {
        self.counters.len()
    }

    /// Frames ticked since creation
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
