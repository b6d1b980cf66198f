//! Integration tests for spring counters + scheduler + event sources
//!
//! These tests verify that:
//! - Frame ticks from an event source drive scheduled counters
//! - State machine transitions can retarget a counter
//! - Scroll transforms and counters can be sampled from the same frame loop

use std::cell::RefCell;
use std::rc::Rc;

use vitrine_animation::{
    AnimationScheduler, Breakpoints, ContinuousCounter, ElementRect, ScrollOffsets, ScrollRange,
    ScrollTransform, Spring, SpringConfig, SpringStatus,
};
use vitrine_core::events::{EventSource, FrameTick};
use vitrine_core::fsm::StateMachine;

fn whole(x: f64) -> String {
    format!("{}", x.round())
}

/// The reference scenario: {3, 1, 1} from 0 to 100 at 16ms per frame
#[test]
fn test_counter_reaches_target_in_300_frames() {
    let config = SpringConfig::new(3.0, 1.0, 1.0).unwrap();
    let mut spring = Spring::new(config, 0.0);
    spring.set_target(100.0);

    for _ in 0..300 {
        spring.step(0.016);
    }

    assert!((spring.value() - 100.0).abs() < 0.5);
}

/// Frame ticks emitted by the host drive every counter in the scheduler
#[test]
fn test_frame_source_drives_scheduler() {
    let scheduler = Rc::new(RefCell::new(AnimationScheduler::new()));
    let blocks = scheduler.borrow_mut().add_counter(ContinuousCounter::new(
        970.0,
        1000.0,
        SpringConfig::gentle(),
        whole,
    ));
    let rate = scheduler.borrow_mut().add_counter(ContinuousCounter::new(
        0.0,
        5000.0,
        SpringConfig::brisk(),
        whole,
    ));

    let frames = EventSource::<FrameTick>::new();
    let active = Rc::new(RefCell::new(true));

    let scheduler_in_listener = Rc::clone(&scheduler);
    let active_in_listener = Rc::clone(&active);
    let subscription = frames.subscribe(move |tick: &FrameTick| {
        *active_in_listener.borrow_mut() = scheduler_in_listener.borrow_mut().tick(tick.dt);
    });

    let mut frames_sent = 0;
    while *active.borrow() && frames_sent < 10_000 {
        frames.emit(&FrameTick::at_fps(60));
        frames_sent += 1;
    }
    subscription.cancel();

    let scheduler = scheduler.borrow();
    assert!(!scheduler.has_active_animations());
    assert_eq!(scheduler.get_counter(blocks).unwrap().display(), "1000");
    assert_eq!(scheduler.get_counter(rate).unwrap().display(), "5000");
    assert_eq!(scheduler.frame_count(), frames_sent);
}

/// A new sample arriving mid-flight continues from the current value
#[test]
fn test_retarget_mid_flight_is_continuous() {
    let mut counter = ContinuousCounter::new(0.0, 100.0, SpringConfig::brisk(), whole);
    for _ in 0..30 {
        counter.tick(1.0 / 60.0);
    }
    let before = counter.value();
    assert!(before > 0.0 && before < 100.0);

    counter.set_target(200.0);
    counter.tick(1.0 / 60.0);
    assert!((counter.value() - before).abs() < 10.0);
    assert_eq!(counter.status(), SpringStatus::Animating);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Feed {
    Live,
    Offline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FeedEvent {
    Lost,
    Restored,
}

/// State machine transitions retarget a counter: losing the feed stalls it
#[test]
fn test_fsm_transition_stalls_counter() {
    let mut feed = StateMachine::new(Feed::Live, [])
        .on(Feed::Live, FeedEvent::Lost, Feed::Offline)
        .on(Feed::Offline, FeedEvent::Restored, Feed::Live);
    let mut counter = ContinuousCounter::new(0.0, 50.0, SpringConfig::brisk(), whole);

    for _ in 0..600 {
        counter.tick(1.0 / 60.0);
    }
    assert!(counter.is_settled());

    if feed.send(FeedEvent::Lost) == Some(Feed::Offline) {
        counter.set_target(f64::NAN);
    }
    counter.tick(1.0 / 60.0);
    assert!(counter.is_stalled());
    assert_eq!(counter.display(), "50");

    if feed.send(FeedEvent::Restored) == Some(Feed::Live) {
        counter.set_target(80.0);
    }
    assert!(counter.is_animating());
}

/// Hero-style scroll channels sampled while scrolling in large jumps
#[test]
fn test_scroll_transform_over_element_range() {
    let headline = ElementRect::new(0.0, 900.0);
    let range = ScrollRange::for_offsets(headline, 900.0, ScrollOffsets::BOTTOM_ALIGNED_TO_EXIT);
    assert_eq!(range, ScrollRange::new(0.0, 900.0));

    let transform = ScrollTransform::new(range)
        .channel("opacity", Breakpoints::new([(0.0, 1.0), (0.5, 0.0)]).unwrap())
        .channel("blur", Breakpoints::new([(0.3, 0.0), (0.66, 50.0)]).unwrap());

    let mut last_opacity = f64::INFINITY;
    for scroll_y in (-200..=2000).step_by(150) {
        let opacity = transform.value("opacity", scroll_y as f64).unwrap();
        let blur = transform.value("blur", scroll_y as f64).unwrap();
        assert!((0.0..=1.0).contains(&opacity));
        assert!((0.0..=50.0).contains(&blur));
        assert!(opacity <= last_opacity);
        last_opacity = opacity;
    }
    assert_eq!(transform.value("blur", 2000.0), Some(50.0));
}
