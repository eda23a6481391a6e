// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step-indicator timeline with staggered reveal sequencing.
//!
//! This crate provides:
//! - Per-item animated channels (node, label, line, render)
//! - Cascade planning between the settled step and a target step
//! - A mounted timeline driven by a logical clock
//! - Slot renderer contract and layout plan
//! - An egui panel with default renderers
//!
//! ## Architecture
//!
//! The timeline is built on:
//! - A channel arena indexed by item position
//! - A timer queue for deferred commits
//! - Pure navigation plans issued against the channels
//! - Settled state that changes once per navigation

pub mod channel;
pub mod config;
pub mod error;
pub mod layout;
pub mod scheduler;
pub mod sequencer;
pub mod slot;
pub mod timeline;
pub mod ui;

pub use channel::{AnimatedValue, ChannelKind, ChannelStore, Easing, ItemChannels};
pub use config::{ItemDescriptor, ItemId, Millis, TimelineOptions};
pub use error::{Result, TimelineError};
pub use layout::{ContainerLayout, ItemLayout, RowDirection, RowKind, RowLayout};
pub use scheduler::{LogicalClock, TimerQueue};
pub use sequencer::{plan_navigation, Direction, NavigationPlan, ScheduledTransition, Timing};
pub use slot::{SlotProps, SlotRenderer, TimelineItem, TimelineView};
pub use timeline::{
    GotoOutcome, ItemFrame, NavigationToken, PendingNavigation, Timeline, TimelineEvent,
    TimelineFrame,
};
pub use ui::{ConnectorLine, NodeDot, RenderText, TextLabel, TimelinePanel};
