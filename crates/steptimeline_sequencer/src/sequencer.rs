// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cascade planning.
//!
//! Given the settled step and a requested step, the sequencer produces
//! every channel transition of the cascade together with the delay after
//! which the new step is committed. Planning is pure; the mounted
//! [`Timeline`](crate::Timeline) issues the plan against its channel store.
//!
//! With `D = duration` and `G = delay_between`, moving forward by `k` steps
//! reveals each item as node, label, line at `D` intervals, and starts the
//! next item `G + 3D` later. Moving backward hides line, label, node in
//! that order, from the active item down. In both directions the outgoing
//! step's render slot fades immediately, the incoming step's render slot
//! reveals at `G*k + 3D`, and the commit fires at `G*k + 4D`.
//!
//! The render reveal delay deliberately does not follow the accumulated
//! cascade delay: for `k > 1` it starts before the last line has finished.

use crate::channel::ChannelKind;
use crate::config::{Millis, TimelineOptions};
use crate::error::{Result, TimelineError};
use serde::Serialize;

/// Timing parameters of a cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timing {
    /// Stagger gap between consecutive items
    pub delay_between: Millis,
    /// Length of each channel transition
    pub duration: Millis,
}

impl Timing {
    /// Create timing parameters
    pub fn new(delay_between: impl Into<Millis>, duration: impl Into<Millis>) -> Self {
        Self {
            delay_between: delay_between.into(),
            duration: duration.into(),
        }
    }

    /// `m` multiples of the base duration
    fn d(&self, m: u64) -> Millis {
        self.duration * m
    }
}

impl From<&TimelineOptions> for Timing {
    fn from(options: &TimelineOptions) -> Self {
        Self::new(options.delay_between, options.duration)
    }
}

/// Traversal direction of a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// Towards higher indices, revealing items
    Forward,
    /// Towards lower indices, concealing items
    Backward,
}

/// One channel transition of a cascade
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledTransition {
    /// Item position
    pub item: usize,
    /// Channel on that item
    pub channel: ChannelKind,
    /// Value the channel moves to
    pub target: f32,
    /// Delay from the navigation call
    pub delay: Millis,
    /// Transition length
    pub duration: Millis,
}

/// Everything one navigation schedules
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationPlan {
    /// Settled step when the navigation was requested
    pub from: usize,
    /// Clamped target step
    pub to: usize,
    /// Traversal direction
    pub direction: Direction,
    /// Number of steps travelled
    pub distance: usize,
    /// Channel transitions in issue order
    pub transitions: Vec<ScheduledTransition>,
    /// Delay after which `to` becomes the settled step
    pub commit_delay: Millis,
}

impl NavigationPlan {
    /// Nominal length of the whole sequence
    pub fn total_duration(&self) -> Millis {
        self.commit_delay
    }

    /// Transitions touching one item, in issue order
    pub fn transitions_for(&self, item: usize) -> impl Iterator<Item = &ScheduledTransition> {
        self.transitions.iter().filter(move |t| t.item == item)
    }

    /// Transition for one channel of one item
    pub fn transition(&self, item: usize, channel: ChannelKind) -> Option<&ScheduledTransition> {
        self.transitions
            .iter()
            .find(|t| t.item == item && t.channel == channel)
    }
}

/// Clamp a requested step into `[0, len - 1]`
pub fn clamp_index(requested: isize, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(TimelineError::EmptyTimeline);
    }
    let last = len - 1;
    Ok(usize::try_from(requested).map_or(0, |i| i.min(last)))
}

/// Plan the cascade from the settled step `active` towards `requested`.
///
/// Returns `Ok(None)` when the clamped target equals `active`.
pub fn plan_navigation(
    active: usize,
    requested: isize,
    len: usize,
    timing: Timing,
) -> Result<Option<NavigationPlan>> {
    let to = clamp_index(requested, len)?;
    if to == active {
        return Ok(None);
    }

    let direction = if to > active {
        Direction::Forward
    } else {
        Direction::Backward
    };
    let distance = active.abs_diff(to);
    let step = timing.delay_between + timing.d(3);
    let stagger = timing.delay_between * distance as u64;

    let mut transitions = Vec::with_capacity(3 * distance + 2);
    let mut push = |item: usize, channel: ChannelKind, target: f32, delay: Millis| {
        transitions.push(ScheduledTransition {
            item,
            channel,
            target,
            delay,
            duration: timing.duration,
        });
    };

    // Outgoing step's free-form slot fades without waiting for the cascade
    push(active, ChannelKind::Render, 0.0, Millis::ZERO);

    let mut base = Millis::ZERO;
    match direction {
        Direction::Forward => {
            for item in active + 1..=to {
                push(item, ChannelKind::Node, 1.0, base);
                push(item, ChannelKind::Label, 1.0, base + timing.d(1));
                push(item, ChannelKind::Line, 1.0, base + timing.d(2));
                base += step;
            }
        }
        Direction::Backward => {
            for item in (to + 1..=active).rev() {
                push(item, ChannelKind::Line, 0.0, base);
                push(item, ChannelKind::Label, 0.0, base + timing.d(1));
                push(item, ChannelKind::Node, 0.0, base + timing.d(2));
                base += step;
            }
        }
    }

    push(to, ChannelKind::Render, 1.0, stagger + timing.d(3));

    Ok(Some(NavigationPlan {
        from: active,
        to,
        direction,
        distance,
        transitions,
        commit_delay: stagger + timing.d(4),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> Timing {
        Timing::new(100, 200)
    }

    fn expect(plan: &NavigationPlan, item: usize, channel: ChannelKind, target: f32, delay: u64) {
        let t = plan
            .transition(item, channel)
            .unwrap_or_else(|| panic!("no {} transition for item {item}", channel.name()));
        assert_eq!(t.target, target, "target of item {item} {}", channel.name());
        assert_eq!(t.delay, Millis(delay), "delay of item {item} {}", channel.name());
        assert_eq!(t.duration, Millis(200));
    }

    #[test]
    fn test_clamping() {
        assert_eq!(clamp_index(-3, 4).unwrap(), 0);
        assert_eq!(clamp_index(2, 4).unwrap(), 2);
        assert_eq!(clamp_index(4, 4).unwrap(), 3);
        assert_eq!(clamp_index(isize::MAX, 4).unwrap(), 3);
        assert!(matches!(clamp_index(0, 0), Err(TimelineError::EmptyTimeline)));
    }

    #[test]
    fn test_empty_timeline_rejected() {
        assert!(matches!(
            plan_navigation(0, 1, 0, timing()),
            Err(TimelineError::EmptyTimeline)
        ));
    }

    #[test]
    fn test_noop_when_target_is_active() {
        assert!(plan_navigation(2, 2, 5, timing()).unwrap().is_none());
        // Clamped targets that land on the active step are no-ops too
        assert!(plan_navigation(0, -1, 5, timing()).unwrap().is_none());
        assert!(plan_navigation(4, 9, 5, timing()).unwrap().is_none());
    }

    #[test]
    fn test_out_of_range_matches_clamped() {
        let low = plan_navigation(3, -7, 5, timing()).unwrap();
        let zero = plan_navigation(3, 0, 5, timing()).unwrap();
        assert_eq!(low, zero);

        let high = plan_navigation(1, 42, 5, timing()).unwrap();
        let last = plan_navigation(1, 4, 5, timing()).unwrap();
        assert_eq!(high, last);
    }

    #[test]
    fn test_forward_scenario() {
        let plan = plan_navigation(0, 3, 4, timing()).unwrap().unwrap();
        assert_eq!(plan.direction, Direction::Forward);
        assert_eq!(plan.distance, 3);
        assert_eq!(plan.transitions.len(), 3 * 3 + 2);

        expect(&plan, 0, ChannelKind::Render, 0.0, 0);
        expect(&plan, 1, ChannelKind::Node, 1.0, 0);
        expect(&plan, 1, ChannelKind::Label, 1.0, 200);
        expect(&plan, 1, ChannelKind::Line, 1.0, 400);
        expect(&plan, 2, ChannelKind::Node, 1.0, 700);
        expect(&plan, 2, ChannelKind::Label, 1.0, 900);
        expect(&plan, 2, ChannelKind::Line, 1.0, 1100);
        expect(&plan, 3, ChannelKind::Node, 1.0, 1400);
        expect(&plan, 3, ChannelKind::Label, 1.0, 1600);
        expect(&plan, 3, ChannelKind::Line, 1.0, 1800);
        expect(&plan, 3, ChannelKind::Render, 1.0, 900);
        assert_eq!(plan.commit_delay, Millis(1100));
    }

    #[test]
    fn test_backward_scenario() {
        let plan = plan_navigation(3, 0, 4, timing()).unwrap().unwrap();
        assert_eq!(plan.direction, Direction::Backward);
        assert_eq!(plan.transitions.len(), 3 * 3 + 2);

        expect(&plan, 3, ChannelKind::Render, 0.0, 0);
        expect(&plan, 3, ChannelKind::Line, 0.0, 0);
        expect(&plan, 3, ChannelKind::Label, 0.0, 200);
        expect(&plan, 3, ChannelKind::Node, 0.0, 400);
        expect(&plan, 2, ChannelKind::Line, 0.0, 700);
        expect(&plan, 2, ChannelKind::Label, 0.0, 900);
        expect(&plan, 2, ChannelKind::Node, 0.0, 1100);
        expect(&plan, 1, ChannelKind::Line, 0.0, 1400);
        expect(&plan, 1, ChannelKind::Label, 0.0, 1600);
        expect(&plan, 1, ChannelKind::Node, 0.0, 1800);
        expect(&plan, 0, ChannelKind::Render, 1.0, 900);
        assert_eq!(plan.commit_delay, Millis(1100));

        // Item 0 only gets its render reveal
        assert_eq!(plan.transitions_for(0).count(), 1);
    }

    #[test]
    fn test_issue_order() {
        let plan = plan_navigation(1, 3, 5, timing()).unwrap().unwrap();
        let order: Vec<_> = plan.transitions.iter().map(|t| (t.item, t.channel)).collect();
        assert_eq!(
            order,
            vec![
                (1, ChannelKind::Render),
                (2, ChannelKind::Node),
                (2, ChannelKind::Label),
                (2, ChannelKind::Line),
                (3, ChannelKind::Node),
                (3, ChannelKind::Label),
                (3, ChannelKind::Line),
                (3, ChannelKind::Render),
            ]
        );
    }

    #[test]
    fn test_cascade_stagger_uses_default_timing() {
        let timing = Timing::from(&TimelineOptions::default());
        let plan = plan_navigation(0, 2, 3, timing).unwrap().unwrap();
        assert_eq!(plan.transition(1, ChannelKind::Node).unwrap().delay, Millis::ZERO);
        assert_eq!(
            plan.transition(2, ChannelKind::Node).unwrap().delay,
            Millis(120 + 3 * 300)
        );
    }

    #[test]
    fn test_commit_delay_independent_of_direction() {
        for (from, to) in [(0, 1), (1, 0), (0, 4), (4, 0), (2, 3), (3, 1)] {
            let plan = plan_navigation(from, to as isize, 5, timing()).unwrap().unwrap();
            let distance = from.abs_diff(to) as u64;
            assert_eq!(plan.commit_delay, Millis(100 * distance + 4 * 200));
            assert_eq!(plan.total_duration(), plan.commit_delay);
            assert_eq!(plan.transitions.len(), 3 * distance as usize + 2);
        }
    }

    #[test]
    fn test_single_step_render_follows_line() {
        let plan = plan_navigation(0, 1, 2, timing()).unwrap().unwrap();
        // k = 1: render reveal starts G after the line finished its delay slot
        expect(&plan, 1, ChannelKind::Line, 1.0, 400);
        expect(&plan, 1, ChannelKind::Render, 1.0, 700);
        assert_eq!(plan.commit_delay, Millis(900));
    }

    #[test]
    fn test_huge_timing_saturates() {
        let plan = plan_navigation(0, 1, 2, Timing::new(1, u64::MAX / 3)).unwrap().unwrap();
        assert_eq!(plan.commit_delay, Millis(u64::MAX));
        assert_eq!(plan.transition(1, ChannelKind::Line).unwrap().delay, Millis(u64::MAX / 3 * 2));
        assert_eq!(plan.transition(1, ChannelKind::Render).unwrap().delay, Millis(u64::MAX));

        let plan = plan_navigation(0, 3, 4, Timing::new(u64::MAX, 1)).unwrap().unwrap();
        assert_eq!(plan.transition(3, ChannelKind::Node).unwrap().delay, Millis(u64::MAX));
    }
}
