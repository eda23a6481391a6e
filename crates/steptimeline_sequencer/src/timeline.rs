// SPDX-License-Identifier: MIT OR Apache-2.0
//! Mounted timeline state and its navigation surface.
//!
//! A [`Timeline`] owns the channel store, the logical clock and the settled
//! active step. `goto` never blocks: it issues the cascade against the
//! channels, queues the commit and returns. The owner drives time forward
//! with [`Timeline::advance`], which applies due commits and samples every
//! channel.
//!
//! ## Overlapping navigation
//!
//! Each scheduled navigation takes a fresh token. When a commit fires but a
//! newer navigation was issued in the meantime, the commit is dropped and a
//! [`TimelineEvent::StaleCommitDropped`] is reported instead. Cascades are
//! still planned from the settled step, so integrators that need strict
//! sequencing should disable navigation while [`Timeline::is_settling`].

use crate::channel::{ChannelKind, ChannelStore, ItemChannels};
use crate::config::{ItemDescriptor, ItemId, Millis, TimelineOptions};
use crate::error::{Result, TimelineError};
use crate::scheduler::{LogicalClock, TimerQueue};
use crate::sequencer::{plan_navigation, NavigationPlan, Timing};
use indexmap::IndexMap;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Progress above which a channel counts as revealed
pub const REVEAL_THRESHOLD: f32 = 0.5;

/// Identifies one scheduled navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NavigationToken(pub u64);

/// A navigation whose commit has not fired yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingNavigation {
    /// Token of this navigation
    pub token: NavigationToken,
    /// Settled step when it was issued
    pub from: usize,
    /// Step that will be committed
    pub to: usize,
    /// Clock time of the commit
    pub commit_at: Millis,
}

/// Result of a `goto` call
#[derive(Debug, Clone, PartialEq)]
pub enum GotoOutcome {
    /// Target equals the settled step; nothing was scheduled
    NoOp,
    /// A cascade was issued
    Scheduled {
        /// The pending commit
        navigation: PendingNavigation,
        /// Every transition that was issued
        plan: NavigationPlan,
    },
}

impl GotoOutcome {
    /// Whether anything was scheduled
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// The pending commit, if any
    pub fn navigation(&self) -> Option<PendingNavigation> {
        match self {
            Self::NoOp => None,
            Self::Scheduled { navigation, .. } => Some(*navigation),
        }
    }
}

/// Something that happened while advancing the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimelineEvent {
    /// A navigation committed its target as the settled step
    Settled {
        /// Navigation that completed
        token: NavigationToken,
        /// New settled step
        index: usize,
        /// Clock time of the commit
        at: Millis,
    },
    /// A commit fired after a newer navigation had been issued
    StaleCommitDropped {
        /// Navigation whose commit was dropped
        token: NavigationToken,
        /// Step it would have committed
        index: usize,
        /// Clock time it fired
        at: Millis,
    },
}

/// Deferred effects on the timer queue
#[derive(Debug, Clone, Copy)]
enum Effect {
    Commit { token: NavigationToken, index: usize },
}

/// Per-item view of the timeline at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFrame {
    /// Item position
    pub index: usize,
    /// Identity key
    pub id: ItemId,
    /// Disabled flag
    pub disabled: bool,
    /// Derived from the settled step
    pub is_active: bool,
    /// Channel values in [`ChannelKind::ALL`] order
    pub values: [f32; 4],
}

impl ItemFrame {
    /// Value of one channel
    pub fn value(&self, kind: ChannelKind) -> f32 {
        match kind {
            ChannelKind::Node => self.values[0],
            ChannelKind::Label => self.values[1],
            ChannelKind::Line => self.values[2],
            ChannelKind::Render => self.values[3],
        }
    }
}

/// Whole-timeline view at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineFrame {
    /// Clock time
    pub now: Millis,
    /// Settled step
    pub active_index: usize,
    /// Whether a navigation or transition is still in flight
    pub settling: bool,
    /// Items in order
    pub items: Vec<ItemFrame>,
}

struct TimelineState {
    options: TimelineOptions,
    items: IndexMap<ItemId, ItemDescriptor>,
    channels: ChannelStore,
    clock: LogicalClock,
    timers: TimerQueue<Effect>,
    active_index: usize,
    next_token: u64,
    pending: Option<PendingNavigation>,
    events: Vec<TimelineEvent>,
}

impl TimelineState {
    fn goto(&mut self, requested: isize) -> Result<GotoOutcome> {
        let now = self.clock.now();
        let timing = Timing::from(&self.options);
        let Some(plan) = plan_navigation(self.active_index, requested, self.items.len(), timing)? else {
            tracing::debug!(requested, active = self.active_index, "goto is a no-op");
            return Ok(GotoOutcome::NoOp);
        };

        for t in &plan.transitions {
            let issued = self.channels.schedule(
                now,
                t.item,
                t.channel,
                t.target,
                t.delay,
                t.duration,
                self.options.easing,
            );
            if !issued {
                tracing::warn!(item = t.item, channel = t.channel.name(), "transition for unknown item skipped");
                continue;
            }
            tracing::trace!(
                item = t.item,
                channel = t.channel.name(),
                target = t.target,
                delay = t.delay.as_u64(),
                "channel transition issued"
            );
        }

        let token = NavigationToken(self.next_token);
        self.next_token += 1;
        let commit_at = now + plan.commit_delay;
        self.timers.push(commit_at, Effect::Commit { token, index: plan.to });

        let navigation = PendingNavigation {
            token,
            from: plan.from,
            to: plan.to,
            commit_at,
        };
        if let Some(previous) = self.pending.replace(navigation) {
            tracing::debug!(
                superseded = previous.token.0,
                by = token.0,
                "navigation issued before previous commit"
            );
        }

        tracing::debug!(
            from = plan.from,
            to = plan.to,
            distance = plan.distance,
            transitions = plan.transitions.len(),
            commit_at = commit_at.as_u64(),
            "navigation scheduled"
        );

        Ok(GotoOutcome::Scheduled { navigation, plan })
    }

    fn advance_to(&mut self, time: Millis) {
        let now = self.clock.advance_to(time);
        while let Some((at, effect)) = self.timers.pop_due(now) {
            match effect {
                Effect::Commit { token, index } => self.commit(token, index, at),
            }
        }
        self.channels.sample_all(now);
    }

    fn commit(&mut self, token: NavigationToken, index: usize, at: Millis) {
        let latest = self.pending.is_some_and(|p| p.token == token);
        if !latest {
            tracing::warn!(token = token.0, index, at = at.as_u64(), "dropping stale commit");
            self.events.push(TimelineEvent::StaleCommitDropped { token, index, at });
            return;
        }
        self.active_index = index;
        self.pending = None;
        tracing::info!(index, at = at.as_u64(), "active step committed");
        self.events.push(TimelineEvent::Settled { token, index, at });
    }

    fn is_settling(&self) -> bool {
        self.pending.is_some() || !self.channels.is_settled(self.clock.now())
    }
}

/// A mounted step timeline.
///
/// Clones share the same state, so a clone serves as the navigation handle
/// handed to renderers and controls.
#[derive(Clone)]
pub struct Timeline {
    inner: Rc<RefCell<TimelineState>>,
}

impl Timeline {
    /// Validate the items and options and seed the channels
    pub fn mount(items: impl IntoIterator<Item = ItemDescriptor>, options: TimelineOptions) -> Result<Self> {
        let mut by_id = IndexMap::new();
        for item in items {
            if by_id.contains_key(&item.id) {
                return Err(TimelineError::DuplicateItemId(item.id));
            }
            by_id.insert(item.id.clone(), item);
        }

        let len = by_id.len();
        if len == 0 {
            return Err(TimelineError::EmptyTimeline);
        }
        if options.initial_index >= len {
            return Err(TimelineError::InitialIndexOutOfRange {
                index: options.initial_index,
                len,
            });
        }

        tracing::debug!(
            items = len,
            initial_index = options.initial_index,
            delay_between = options.delay_between.as_u64(),
            duration = options.duration.as_u64(),
            "timeline mounted"
        );

        let state = TimelineState {
            channels: ChannelStore::seeded(len, options.initial_index),
            active_index: options.initial_index,
            options,
            items: by_id,
            clock: LogicalClock::new(),
            timers: TimerQueue::new(),
            next_token: 0,
            pending: None,
            events: Vec::new(),
        };

        Ok(Self {
            inner: Rc::new(RefCell::new(state)),
        })
    }

    /// Another handle to the same timeline
    pub fn handle(&self) -> Timeline {
        self.clone()
    }

    /// Navigate to `index`, clamped into range. Returns immediately.
    pub fn goto(&self, index: isize) -> Result<GotoOutcome> {
        self.inner.borrow_mut().goto(index)
    }

    /// Navigate to the item with identity `id`
    pub fn goto_id(&self, id: &ItemId) -> Result<GotoOutcome> {
        let index = self
            .index_of(id)
            .ok_or_else(|| TimelineError::UnknownItem(id.clone()))?;
        self.goto(index as isize)
    }

    /// Navigate one step past the settled step
    pub fn next(&self) -> Result<GotoOutcome> {
        self.goto(self.active_index() as isize + 1)
    }

    /// Navigate one step before the settled step
    pub fn previous(&self) -> Result<GotoOutcome> {
        self.goto(self.active_index() as isize - 1)
    }

    /// Advance the clock by `delta`
    pub fn advance(&self, delta: Millis) {
        let mut state = self.inner.borrow_mut();
        let target = state.clock.now() + delta;
        state.advance_to(target);
    }

    /// Advance the clock to `time`; earlier times only resample
    pub fn advance_to(&self, time: Millis) {
        self.inner.borrow_mut().advance_to(time);
    }

    /// Events collected since the last call
    pub fn take_events(&self) -> Vec<TimelineEvent> {
        std::mem::take(&mut self.inner.borrow_mut().events)
    }

    /// Current clock time
    pub fn now(&self) -> Millis {
        self.inner.borrow().clock.now()
    }

    /// Settled step
    pub fn active_index(&self) -> usize {
        self.inner.borrow().active_index
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Always false for a mounted timeline
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    /// Whether `index` is at or before the settled step
    pub fn is_active(&self, index: usize) -> bool {
        index <= self.active_index()
    }

    /// Whether one channel of `index` has progressed past the reveal threshold
    pub fn is_revealed(&self, index: usize, kind: ChannelKind) -> bool {
        self.channel_value(index, kind)
            .is_some_and(|v| v >= REVEAL_THRESHOLD)
    }

    /// Last sampled value of one channel
    pub fn channel_value(&self, index: usize, kind: ChannelKind) -> Option<f32> {
        self.inner.borrow().channels.value(index, kind)
    }

    /// All four channels of one item
    pub fn channels(&self, index: usize) -> Option<ItemChannels> {
        self.inner.borrow().channels.channels(index).cloned()
    }

    /// Descriptor of one item
    pub fn item(&self, index: usize) -> Option<ItemDescriptor> {
        self.inner
            .borrow()
            .items
            .get_index(index)
            .map(|(_, item)| item.clone())
    }

    /// Position of the item with identity `id`
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.inner.borrow().items.get_index_of(id)
    }

    /// Options the timeline was mounted with
    pub fn options(&self) -> TimelineOptions {
        self.inner.borrow().options.clone()
    }

    /// The navigation whose commit is still outstanding
    pub fn pending(&self) -> Option<PendingNavigation> {
        self.inner.borrow().pending
    }

    /// Whether a commit or any channel transition is still in flight
    pub fn is_settling(&self) -> bool {
        self.inner.borrow().is_settling()
    }

    /// Clock time of the next queued effect
    pub fn next_deadline(&self) -> Option<Millis> {
        self.inner.borrow().timers.next_deadline()
    }

    /// Copy out the current state of every item
    pub fn frame(&self) -> TimelineFrame {
        let state = self.inner.borrow();
        let items = state
            .items
            .values()
            .zip(state.channels.iter())
            .enumerate()
            .map(|(index, (item, channels))| ItemFrame {
                index,
                id: item.id.clone(),
                disabled: item.disabled,
                is_active: index <= state.active_index,
                values: ChannelKind::ALL.map(|k| channels.get(k).value()),
            })
            .collect();

        TimelineFrame {
            now: state.clock.now(),
            active_index: state.active_index,
            settling: state.is_settling(),
            items,
        }
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Timeline")
            .field("len", &state.items.len())
            .field("active_index", &state.active_index)
            .field("now", &state.clock.now())
            .field("pending", &state.pending)
            .finish()
    }
}
