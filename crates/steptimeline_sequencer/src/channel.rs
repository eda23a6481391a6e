// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animated progress channels.
//!
//! Every item owns four independent progress values in `[0, 1]`, one per
//! slot. A channel holds at most one transition: scheduling a new one
//! freezes the channel where it currently is and replaces whatever was
//! pending or running.

use crate::config::Millis;
use serde::{Deserialize, Serialize};

/// One of the four per-item channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Step marker
    Node,
    /// Step title
    Label,
    /// Connector towards the next step
    Line,
    /// Free-form content of the active step
    Render,
}

impl ChannelKind {
    /// All channels in slot order
    pub const ALL: [ChannelKind; 4] = [
        ChannelKind::Node,
        ChannelKind::Label,
        ChannelKind::Line,
        ChannelKind::Render,
    ];

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Label => "label",
            Self::Line => "line",
            Self::Render => "render",
        }
    }
}

/// Easing curve applied to transition progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Quadratic S-curve
    #[default]
    EaseInOutQuad,
    /// Cubic acceleration
    EaseIn,
    /// Cubic deceleration
    EaseOut,
    /// Cubic S-curve
    EaseInOutCubic,
}

impl Easing {
    /// Map linear progress to eased progress; input is clamped to `[0, 1]`
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

/// A pending or running interpolation
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    from: f32,
    to: f32,
    start: Millis,
    duration: Millis,
    easing: Easing,
}

impl Transition {
    fn end(&self) -> Millis {
        self.start + self.duration
    }

    fn value_at(&self, now: Millis) -> f32 {
        if now < self.start {
            return self.from;
        }
        if now >= self.end() {
            return self.to;
        }
        let elapsed = now.saturating_sub(self.start).as_u64() as f32;
        let t = elapsed / self.duration.as_u64() as f32;
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

/// A single progress value with at most one scheduled transition
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedValue {
    value: f32,
    transition: Option<Transition>,
}

impl AnimatedValue {
    /// Create a settled value
    pub fn new(initial: f32) -> Self {
        Self {
            value: initial.clamp(0.0, 1.0),
            transition: None,
        }
    }

    /// Value as of the last sample
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Where the channel is heading
    pub fn target(&self) -> f32 {
        self.transition.map_or(self.value, |t| t.to)
    }

    /// Whether a transition is pending or running at `now`
    pub fn is_animating(&self, now: Millis) -> bool {
        self.transition.is_some_and(|t| now < t.end())
    }

    /// Advance to `now` and return the current value
    pub fn sample(&mut self, now: Millis) -> f32 {
        if let Some(transition) = self.transition {
            self.value = transition.value_at(now).clamp(0.0, 1.0);
            if now >= transition.end() {
                self.transition = None;
            }
        }
        self.value
    }

    /// Begin interpolating to `target` once `delay` has elapsed after `now`.
    ///
    /// Supersedes any transition already on this channel.
    pub fn schedule(&mut self, now: Millis, target: f32, delay: Millis, duration: Millis, easing: Easing) {
        let from = self.sample(now);
        self.transition = Some(Transition {
            from,
            to: target.clamp(0.0, 1.0),
            start: now + delay,
            duration,
            easing,
        });
    }
}

/// The four channels of one item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemChannels {
    /// Node channel
    pub node: AnimatedValue,
    /// Label channel
    pub label: AnimatedValue,
    /// Line channel
    pub line: AnimatedValue,
    /// Render channel
    pub render: AnimatedValue,
}

impl ItemChannels {
    /// All four channels settled at `initial`
    pub fn uniform(initial: f32) -> Self {
        Self {
            node: AnimatedValue::new(initial),
            label: AnimatedValue::new(initial),
            line: AnimatedValue::new(initial),
            render: AnimatedValue::new(initial),
        }
    }

    /// Get a channel
    pub fn get(&self, kind: ChannelKind) -> &AnimatedValue {
        match kind {
            ChannelKind::Node => &self.node,
            ChannelKind::Label => &self.label,
            ChannelKind::Line => &self.line,
            ChannelKind::Render => &self.render,
        }
    }

    /// Get a mutable channel
    pub fn get_mut(&mut self, kind: ChannelKind) -> &mut AnimatedValue {
        match kind {
            ChannelKind::Node => &mut self.node,
            ChannelKind::Label => &mut self.label,
            ChannelKind::Line => &mut self.line,
            ChannelKind::Render => &mut self.render,
        }
    }
}

/// Channel arena indexed by item position
#[derive(Debug, Clone, Default)]
pub struct ChannelStore {
    items: Vec<ItemChannels>,
}

impl ChannelStore {
    /// Items up to and including `initial_index` start revealed, the rest hidden
    pub fn seeded(len: usize, initial_index: usize) -> Self {
        let items = (0..len)
            .map(|i| ItemChannels::uniform(if i <= initial_index { 1.0 } else { 0.0 }))
            .collect();
        Self { items }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Channels of one item
    pub fn channels(&self, item: usize) -> Option<&ItemChannels> {
        self.items.get(item)
    }

    /// Last sampled value of one channel
    pub fn value(&self, item: usize, kind: ChannelKind) -> Option<f32> {
        self.items.get(item).map(|c| c.get(kind).value())
    }

    /// Schedule a transition on one channel. Returns `false` if `item` does not exist.
    pub fn schedule(
        &mut self,
        now: Millis,
        item: usize,
        kind: ChannelKind,
        target: f32,
        delay: Millis,
        duration: Millis,
        easing: Easing,
    ) -> bool {
        let Some(channels) = self.items.get_mut(item) else {
            return false;
        };
        channels.get_mut(kind).schedule(now, target, delay, duration, easing);
        true
    }

    /// Advance every channel to `now`
    pub fn sample_all(&mut self, now: Millis) {
        for channels in &mut self.items {
            for kind in ChannelKind::ALL {
                channels.get_mut(kind).sample(now);
            }
        }
    }

    /// Whether no channel is pending or running at `now`
    pub fn is_settled(&self, now: Millis) -> bool {
        self.items
            .iter()
            .all(|c| ChannelKind::ALL.iter().all(|k| !c.get(*k).is_animating(now)))
    }

    /// Iterate over all items' channels
    pub fn iter(&self) -> impl Iterator<Item = &ItemChannels> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseInOutQuad,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOutCubic,
        ] {
            assert!(easing.apply(0.0).abs() < EPS);
            assert!((easing.apply(1.0) - 1.0).abs() < EPS);
            assert!((easing.apply(2.0) - 1.0).abs() < EPS);
            assert!(easing.apply(-1.0).abs() < EPS);
        }
        assert!((Easing::EaseInOutQuad.apply(0.5) - 0.5).abs() < EPS);
        assert!((Easing::EaseInOutQuad.apply(0.25) - 0.125).abs() < EPS);
    }

    #[test]
    fn test_seeding() {
        let store = ChannelStore::seeded(5, 2);
        for item in 0..5 {
            let expected = if item <= 2 { 1.0 } else { 0.0 };
            for kind in ChannelKind::ALL {
                assert_eq!(store.value(item, kind), Some(expected));
            }
        }
        assert_eq!(store.value(5, ChannelKind::Node), None);
    }

    #[test]
    fn test_delayed_linear_transition() {
        let mut value = AnimatedValue::new(0.0);
        value.schedule(Millis(0), 1.0, Millis(100), Millis(200), Easing::Linear);

        assert_eq!(value.sample(Millis(50)), 0.0);
        assert_eq!(value.sample(Millis(100)), 0.0);
        assert!((value.sample(Millis(200)) - 0.5).abs() < EPS);
        assert!(value.is_animating(Millis(200)));
        assert_eq!(value.sample(Millis(300)), 1.0);
        assert!(!value.is_animating(Millis(300)));
    }

    #[test]
    fn test_new_schedule_supersedes() {
        let mut value = AnimatedValue::new(0.0);
        value.schedule(Millis(0), 1.0, Millis::ZERO, Millis(100), Easing::Linear);
        value.sample(Millis(50));

        // Reverse half way: freezes at 0.5, then heads back to 0
        value.schedule(Millis(50), 0.0, Millis(100), Millis(100), Easing::Linear);
        assert_eq!(value.target(), 0.0);
        assert!((value.sample(Millis(120)) - 0.5).abs() < EPS);
        assert!((value.sample(Millis(200)) - 0.25).abs() < EPS);
        assert_eq!(value.sample(Millis(250)), 0.0);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut value = AnimatedValue::new(1.0);
        value.schedule(Millis(10), 0.0, Millis(30), Millis::ZERO, Easing::EaseInOutQuad);
        assert_eq!(value.sample(Millis(39)), 1.0);
        assert_eq!(value.sample(Millis(40)), 0.0);
    }

    #[test]
    fn test_target_is_clamped() {
        let mut value = AnimatedValue::new(3.0);
        assert_eq!(value.value(), 1.0);
        value.schedule(Millis(0), -2.0, Millis::ZERO, Millis(10), Easing::Linear);
        assert_eq!(value.target(), 0.0);
    }

    #[test]
    fn test_store_settles() {
        let mut store = ChannelStore::seeded(3, 0);
        assert!(store.is_settled(Millis(0)));
        assert!(store.schedule(Millis(0), 1, ChannelKind::Label, 1.0, Millis(50), Millis(50), Easing::Linear));
        assert!(!store.schedule(Millis(0), 7, ChannelKind::Label, 1.0, Millis(50), Millis(50), Easing::Linear));
        assert!(!store.is_settled(Millis(99)));
        store.sample_all(Millis(100));
        assert!(store.is_settled(Millis(100)));
        assert_eq!(store.value(1, ChannelKind::Label), Some(1.0));
        assert_eq!(store.value(1, ChannelKind::Node), Some(0.0));
    }
}
