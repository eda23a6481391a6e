// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layout plan for composing a timeline.
//!
//! Each item is drawn as two rows: the node next to the label, then the
//! line next to the render slot. The second slot of a row takes the
//! remaining width. Rows are mirrored for right-to-left locales; the
//! sequencing is not affected by any of this.

use crate::channel::ChannelKind;
use crate::config::TimelineOptions;

/// Opacity applied to disabled items
pub const DISABLED_OPACITY: f32 = 0.6;

/// Overlay drawn over disabled items (black at 5%)
pub const DISABLED_OVERLAY_RGBA: [u8; 4] = [0, 0, 0, 13];

/// Direction slots flow along a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowDirection {
    /// First slot on the left
    #[default]
    LeftToRight,
    /// First slot on the right
    RightToLeft,
}

impl RowDirection {
    /// Direction for the given RTL flag
    pub fn from_rtl(is_rtl: bool) -> Self {
        if is_rtl {
            Self::RightToLeft
        } else {
            Self::LeftToRight
        }
    }

    /// Whether rows are mirrored
    pub fn is_reversed(self) -> bool {
        self == Self::RightToLeft
    }
}

/// One of the two rows of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Node and label
    Header,
    /// Line and render slot
    Body,
}

impl RowKind {
    /// Rows in drawing order
    pub const ALL: [RowKind; 2] = [RowKind::Header, RowKind::Body];

    /// The fixed-size slot and the slot that fills the rest of the row
    pub fn slots(self) -> (ChannelKind, ChannelKind) {
        match self {
            Self::Header => (ChannelKind::Node, ChannelKind::Label),
            Self::Body => (ChannelKind::Line, ChannelKind::Render),
        }
    }
}

/// Row arrangement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowLayout {
    /// Slot flow direction
    pub direction: RowDirection,
    /// Gap between the two slots
    pub gap: f32,
}

impl RowLayout {
    /// Slots of `row` in visual left-to-right order
    pub fn arrange(&self, row: RowKind) -> [ChannelKind; 2] {
        let (fixed, fill) = row.slots();
        match self.direction {
            RowDirection::LeftToRight => [fixed, fill],
            RowDirection::RightToLeft => [fill, fixed],
        }
    }
}

/// Arrangement of the whole timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerLayout {
    /// Padding around the timeline
    pub padding: f32,
    /// Gap between items and between an item's rows
    pub gap_vert: f32,
    /// Row arrangement shared by every item
    pub row: RowLayout,
}

impl ContainerLayout {
    /// Derive the layout from timeline options
    pub fn from_options(options: &TimelineOptions) -> Self {
        Self {
            padding: options.space_out,
            gap_vert: options.gap_vert,
            row: RowLayout {
                direction: RowDirection::from_rtl(options.is_rtl),
                gap: options.gap_hor,
            },
        }
    }
}

impl Default for ContainerLayout {
    fn default() -> Self {
        Self::from_options(&TimelineOptions::default())
    }
}

/// Per-item decoration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemLayout {
    /// Item opacity
    pub opacity: f32,
    /// Whether the dimming overlay is drawn
    pub overlay: bool,
}

impl ItemLayout {
    /// Decoration for an item with the given disabled flag
    pub fn for_item(disabled: bool) -> Self {
        if disabled {
            Self {
                opacity: DISABLED_OPACITY,
                overlay: true,
            }
        } else {
            Self {
                opacity: 1.0,
                overlay: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtl_mirrors_rows() {
        let ltr = ContainerLayout::from_options(&TimelineOptions::default());
        assert_eq!(ltr.row.arrange(RowKind::Header), [ChannelKind::Node, ChannelKind::Label]);
        assert_eq!(ltr.row.arrange(RowKind::Body), [ChannelKind::Line, ChannelKind::Render]);

        let rtl = ContainerLayout::from_options(&TimelineOptions::new().with_rtl(true));
        assert!(rtl.row.direction.is_reversed());
        assert_eq!(rtl.row.arrange(RowKind::Header), [ChannelKind::Label, ChannelKind::Node]);
        assert_eq!(rtl.row.arrange(RowKind::Body), [ChannelKind::Render, ChannelKind::Line]);
    }

    #[test]
    fn test_spacing_from_options() {
        let layout = ContainerLayout::from_options(&TimelineOptions::new().with_spacing(4.0, 6.0, 8.0));
        assert_eq!(layout.padding, 4.0);
        assert_eq!(layout.row.gap, 6.0);
        assert_eq!(layout.gap_vert, 8.0);
    }

    #[test]
    fn test_disabled_items_are_dimmed() {
        assert_eq!(ItemLayout::for_item(false), ItemLayout { opacity: 1.0, overlay: false });
        let dimmed = ItemLayout::for_item(true);
        assert_eq!(dimmed.opacity, DISABLED_OPACITY);
        assert!(dimmed.overlay);
    }
}
