// SPDX-License-Identifier: MIT OR Apache-2.0
//! Slot renderers and the timeline view.
//!
//! The four visual slots of an item are supplied by the caller. A renderer
//! only reads its channel value and the settled state; it may navigate
//! through [`SlotProps::goto`], never write channels directly.

use crate::channel::ChannelKind;
use crate::config::{ItemDescriptor, ItemId, TimelineOptions};
use crate::error::Result;
use crate::layout::{ContainerLayout, ItemLayout, RowKind};
use crate::timeline::{GotoOutcome, Timeline, TimelineFrame};
use std::any::Any;
use std::rc::Rc;

/// Everything a slot renderer receives
#[derive(Clone, Copy)]
pub struct SlotProps<'a> {
    /// Item position
    pub item_index: usize,
    /// Which slot is drawn
    pub kind: ChannelKind,
    /// Channel progress in `[0, 1]`
    pub value: f32,
    /// Whether the item is at or before the settled step
    pub is_active: bool,
    /// Settled step
    pub active_index: usize,
    /// Navigation handle
    pub timeline: &'a Timeline,
    /// Caller-supplied props shared by every slot
    pub shared: Option<&'a dyn Any>,
}

impl SlotProps<'_> {
    /// Navigate the timeline
    pub fn goto(&self, index: isize) -> Result<GotoOutcome> {
        self.timeline.goto(index)
    }

    /// Shared props downcast to `T`
    pub fn shared<T: Any>(&self) -> Option<&T> {
        self.shared?.downcast_ref::<T>()
    }
}

/// Draws one slot onto a surface of type `S`
pub trait SlotRenderer<S: ?Sized> {
    /// Draw the slot
    fn render(&self, surface: &mut S, props: &SlotProps<'_>);
}

impl<S: ?Sized, F> SlotRenderer<S> for F
where
    F: Fn(&mut S, &SlotProps<'_>),
{
    fn render(&self, surface: &mut S, props: &SlotProps<'_>) {
        self(surface, props);
    }
}

/// A timeline item with its four renderers
pub struct TimelineItem<S: ?Sized> {
    /// Identity key
    pub id: ItemId,
    /// Disabled flag
    pub disabled: bool,
    /// Node renderer
    pub node: Box<dyn SlotRenderer<S>>,
    /// Label renderer
    pub label: Box<dyn SlotRenderer<S>>,
    /// Line renderer
    pub line: Box<dyn SlotRenderer<S>>,
    /// Render slot renderer
    pub render: Box<dyn SlotRenderer<S>>,
}

impl<S: ?Sized> TimelineItem<S> {
    /// Create an enabled item
    pub fn new(
        id: impl Into<ItemId>,
        node: impl SlotRenderer<S> + 'static,
        label: impl SlotRenderer<S> + 'static,
        line: impl SlotRenderer<S> + 'static,
        render: impl SlotRenderer<S> + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            disabled: false,
            node: Box::new(node),
            label: Box::new(label),
            line: Box::new(line),
            render: Box::new(render),
        }
    }

    /// Set the disabled flag
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Renderer for one slot
    pub fn renderer(&self, kind: ChannelKind) -> &dyn SlotRenderer<S> {
        match kind {
            ChannelKind::Node => self.node.as_ref(),
            ChannelKind::Label => self.label.as_ref(),
            ChannelKind::Line => self.line.as_ref(),
            ChannelKind::Render => self.render.as_ref(),
        }
    }

    /// Renderer-free descriptor
    pub fn descriptor(&self) -> ItemDescriptor {
        ItemDescriptor::new(self.id.clone()).with_disabled(self.disabled)
    }
}

/// A mounted timeline together with its renderers
pub struct TimelineView<S: ?Sized> {
    timeline: Timeline,
    items: Vec<TimelineItem<S>>,
    shared: Option<Rc<dyn Any>>,
    layout: ContainerLayout,
}

impl<S: ?Sized> TimelineView<S> {
    /// Mount the timeline for `items`
    pub fn mount(items: Vec<TimelineItem<S>>, options: TimelineOptions) -> Result<Self> {
        let layout = ContainerLayout::from_options(&options);
        let timeline = Timeline::mount(items.iter().map(TimelineItem::descriptor), options)?;
        Ok(Self {
            timeline,
            items,
            shared: None,
            layout,
        })
    }

    /// Attach props handed to every renderer
    pub fn with_shared(mut self, shared: Rc<dyn Any>) -> Self {
        self.shared = Some(shared);
        self
    }

    /// The underlying timeline
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Container arrangement
    pub fn layout(&self) -> &ContainerLayout {
        &self.layout
    }

    /// Decoration of one item
    pub fn item_layout(&self, index: usize) -> Option<ItemLayout> {
        self.items.get(index).map(|i| ItemLayout::for_item(i.disabled))
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a mounted view
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot to draw from
    pub fn frame(&self) -> TimelineFrame {
        self.timeline.frame()
    }

    /// Draw one slot of one item from `frame`. Returns `false` if `index` is out of range.
    pub fn render_slot(&self, frame: &TimelineFrame, index: usize, kind: ChannelKind, surface: &mut S) -> bool {
        let (Some(item), Some(item_frame)) = (self.items.get(index), frame.items.get(index)) else {
            return false;
        };
        let props = SlotProps {
            item_index: index,
            kind,
            value: item_frame.value(kind),
            is_active: item_frame.is_active,
            active_index: frame.active_index,
            timeline: &self.timeline,
            shared: self.shared.as_deref(),
        };
        item.renderer(kind).render(surface, &props);
        true
    }

    /// Draw both slots of one row in visual left-to-right order, mirrored for
    /// right-to-left timelines. `between` runs after the first slot.
    pub fn render_row(
        &self,
        frame: &TimelineFrame,
        index: usize,
        row: RowKind,
        surface: &mut S,
        mut between: impl FnMut(&mut S),
    ) -> bool {
        let [first, second] = self.layout.row.arrange(row);
        if !self.render_slot(frame, index, first, surface) {
            return false;
        }
        between(surface);
        self.render_slot(frame, index, second, surface)
    }
}
