//! Typed state machines
//!
//! Small typed state machines for visual flips driven by scalar comparisons
//! (dark/light header, running/paused particles). Supports:
//! - Flat transitions `(from, event, to)`
//! - Entry actions per state
//! - Transition history

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;

/// Most recent transitions kept in [`StateMachine::history`]
pub const HISTORY_LIMIT: usize = 32;

/// An action executed when a state is entered
pub type Action<S> = Box<dyn FnMut(S)>;

/// `from_state --event--> to_state`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub from_state: S,
    pub event: E,
    pub to_state: S,
}

impl<S, E> Transition<S, E> {
    pub fn new(from: S, event: E, to: S) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
        }
    }
}

/// Flat state machine over `Copy` state and event enums
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: SmallVec<[Transition<S, E>; 4]>,
    entry_callbacks: FxHashMap<S, Vec<Action<S>>>,
    /// Last [`HISTORY_LIMIT`] transitions, oldest first
    history: Vec<(S, E, S)>,
    taken: u64,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Debug,
{
    /// Start in `initial_state` with the given transition table
    pub fn new(initial_state: S, transitions: impl IntoIterator<Item = Transition<S, E>>) -> Self {
        Self {
            current_state: initial_state,
            transitions: transitions.into_iter().collect(),
            entry_callbacks: FxHashMap::default(),
            history: Vec::new(),
            taken: 0,
        }
    }

    /// Builder form of adding one transition
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    pub fn current_state(&self) -> S {
        self.current_state
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Most recent transitions as `(from, event, to)`, at most [`HISTORY_LIMIT`]
    pub fn history(&self) -> &[(S, E, S)] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Total transitions taken, unaffected by the history cap
    pub fn transition_count(&self) -> u64 {
        self.taken
    }

    /// Whether `event` has a transition out of the current state
    pub fn can_send(&self, event: E) -> bool {
        self.find(event).is_some()
    }

    /// Send an event. Returns the new state if a transition fired.
    pub fn send(&mut self, event: E) -> Option<S> {
        let from = self.current_state;
        let to = self.find(event)?.to_state;

        self.current_state = to;
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push((from, event, to));
        self.taken += 1;
        tracing::debug!(?from, ?event, ?to, "state transition");

        if let Some(callbacks) = self.entry_callbacks.get_mut(&to) {
            for callback in callbacks.iter_mut() {
                callback(to);
            }
        }

        Some(to)
    }

    /// Run `callback` whenever `state` is entered
    pub fn on_enter<F: FnMut(S) + 'static>(&mut self, state: S, callback: F) {
        self.entry_callbacks
            .entry(state)
            .or_default()
            .push(Box::new(callback));
    }

    fn find(&self, event: E) -> Option<&Transition<S, E>> {
        self.transitions
            .iter()
            .find(|t| t.from_state == self.current_state && t.event == event)
    }
}
