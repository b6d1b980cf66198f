//! Vitrine Core Runtime
//!
//! Foundational primitives shared by the Vitrine presentation crates:
//!
//! - **Event Sources**: frame and scroll callbacks with explicit subscribe/cancel handles
//! - **State Machines**: small typed machines for two-state visual flips
//!
//! # Example
//!
//! ```rust
//! use vitrine_core::events::{EventSource, FrameTick};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let frames = EventSource::<FrameTick>::new();
//! let seen = Rc::new(Cell::new(0));
//!
//! let seen_in_listener = seen.clone();
//! let subscription = frames.subscribe(move |_tick| {
//!     seen_in_listener.set(seen_in_listener.get() + 1);
//! });
//!
//! frames.emit(&FrameTick::new(1.0 / 60.0));
//! subscription.cancel();
//! frames.emit(&FrameTick::new(1.0 / 60.0));
//!
//! assert_eq!(seen.get(), 1);
//! ```

pub mod events;
pub mod fsm;

pub use events::{EventSource, FrameTick, ListenerId, Subscription};
pub use fsm::{StateMachine, Transition};
