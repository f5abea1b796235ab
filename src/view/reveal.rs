//! Scroll-triggered reveal and stat counters.
//!
//! Animatable elements (see [`hooks::ANIMATED`](super::hooks::ANIMATED))
//! get the `fade-in` class the first time at least 10% of them is inside
//! the viewport, with the viewport's bottom edge pulled up by 50px so
//! elements just peeking in don't count yet. Each one gets an
//! `animation-delay` of 100ms per position among its siblings, which
//! staggers cards in the same grid.
//!
//! Stat counters start the first time any part of them is visible and
//! count from zero to the number they were rendered with.
//!
//! Both are one-shot. Hosts without an intersection primitive reveal every
//! animatable element at mount and leave counters at their final value.

use super::hooks::FADE_IN;
use super::timers::Timer;
use super::{Ctx, Node};
use crate::config::TimingConfig;
use std::time::Duration;

/// Fraction of an animatable element that must be visible.
pub const REVEAL_THRESHOLD: f64 = 0.1;
/// Pixels cut from the bottom of the viewport for reveal checks.
pub const REVEAL_BOTTOM_MARGIN: f64 = 50.0;
/// Stagger step per sibling position.
pub const STAGGER_STEP_MS: u64 = 100;

/// Element geometry relative to the top of the viewport, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

/// Fraction of `rect` inside `[0, viewport_height - bottom_margin]`.
///
/// A zero-height element counts as fully visible when it lies inside the
/// shrunk viewport.
pub fn intersection_ratio(rect: Rect, viewport_height: f64, bottom_margin: f64) -> f64 {
    let bottom_edge = viewport_height - bottom_margin;
    if rect.height <= 0.0 {
        return if rect.top >= 0.0 && rect.top <= bottom_edge { 1.0 } else { 0.0 };
    }
    let visible = (rect.top + rect.height).min(bottom_edge) - rect.top.max(0.0);
    (visible / rect.height).clamp(0.0, 1.0)
}

/// Leading-integer parse of a counter's text: `"500+"` → 500, `"98%"` → 98,
/// `"Top"` → `None`.
pub fn parse_counter_target(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<i64>().ok().map(|n| sign * n)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterState {
    /// Not yet scrolled into view.
    Waiting,
    Running,
    Done,
    /// Text isn't a number; never animated.
    Static,
}

#[derive(Debug, Clone)]
struct Counter {
    target: Option<i64>,
    value: f64,
    state: CounterState,
}

#[derive(Debug, Clone, Copy)]
struct Animated {
    sibling_index: usize,
    revealed: bool,
}

#[derive(Debug)]
pub struct Reveal {
    animated: Vec<Animated>,
    counters: Vec<Counter>,
    /// Added to a running counter on every tick.
    step_fraction: f64,
    tick: Duration,
}

impl Reveal {
    /// `animated` holds each animatable element's index among its siblings,
    /// `counters` the rendered text of each stat number.
    pub fn new(animated: Vec<usize>, counters: Vec<String>, timing: &TimingConfig) -> Self {
        Self {
            animated: animated
                .into_iter()
                .map(|sibling_index| Animated {
                    sibling_index,
                    revealed: false,
                })
                .collect(),
            counters: counters
                .iter()
                .map(|text| {
                    let target = parse_counter_target(text);
                    Counter {
                        target,
                        value: 0.0,
                        state: if target.is_some() {
                            CounterState::Waiting
                        } else {
                            CounterState::Static
                        },
                    }
                })
                .collect(),
            step_fraction: timing.counter_tick as f64 / timing.counter_duration as f64,
            tick: timing.counter_tick(),
        }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.animated.get(index).is_some_and(|a| a.revealed)
    }

    pub fn counter_state(&self, index: usize) -> Option<CounterState> {
        self.counters.get(index).map(|c| c.state)
    }

    /// Without an intersection primitive nothing would ever reveal, so show
    /// everything now.
    pub fn mount(&mut self, observer_supported: bool, cx: &mut Ctx<'_>) {
        if observer_supported {
            return;
        }
        tracing::debug!(
            elements = self.animated.len(),
            "no intersection observer; revealing everything"
        );
        for index in 0..self.animated.len() {
            self.reveal(index, cx);
        }
    }

    /// The host reports the current geometry of an observed node.
    pub fn on_visibility(&mut self, node: &Node, rect: Rect, viewport_height: f64, cx: &mut Ctx<'_>) {
        match *node {
            Node::Animated(index) => {
                let ratio = intersection_ratio(rect, viewport_height, REVEAL_BOTTOM_MARGIN);
                if ratio >= REVEAL_THRESHOLD {
                    self.reveal(index, cx);
                }
            }
            Node::Counter(index) => {
                if intersection_ratio(rect, viewport_height, 0.0) > 0.0 {
                    self.start_counter(index, cx);
                }
            }
            _ => {}
        }
    }

    fn reveal(&mut self, index: usize, cx: &mut Ctx<'_>) {
        let Some(element) = self.animated.get_mut(index) else {
            return;
        };
        if element.revealed {
            return;
        }
        element.revealed = true;
        let node = Node::Animated(index);
        cx.view.set_class(&node, FADE_IN, true);
        let delay = element.sibling_index as u64 * STAGGER_STEP_MS;
        cx.view
            .set_property(&node, "animation-delay", &format!("{delay}ms"));
    }

    fn start_counter(&mut self, index: usize, cx: &mut Ctx<'_>) {
        let Some(counter) = self.counters.get_mut(index) else {
            return;
        };
        if counter.state != CounterState::Waiting {
            return;
        }
        counter.state = CounterState::Running;
        tracing::trace!(counter = index, target = ?counter.target, "counter started");
        cx.timers
            .schedule(self.tick, Timer::CounterTick { counter: index });
    }

    pub fn on_timer(&mut self, timer: &Timer, cx: &mut Ctx<'_>) {
        let Timer::CounterTick { counter: index } = *timer else {
            return;
        };
        let Some(counter) = self.counters.get_mut(index) else {
            return;
        };
        let (CounterState::Running, Some(target)) = (counter.state, counter.target) else {
            return;
        };
        let target = target as f64;
        counter.value += target * self.step_fraction;
        let node = Node::Counter(index);
        if counter.value >= target {
            counter.state = CounterState::Done;
            cx.view.set_text(&node, &format!("{target}"));
        } else {
            cx.view
                .set_text(&node, &format!("{}", counter.value.floor()));
            cx.timers
                .schedule(self.tick, Timer::CounterTick { counter: index });
        }
    }
}
