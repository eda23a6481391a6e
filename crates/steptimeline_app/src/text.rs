// SPDX-License-Identifier: MIT OR Apache-2.0
//! Plain-text slot renderers and frame composition.

use steptimeline_sequencer::{
    ItemId, RowKind, SlotProps, SlotRenderer, TimelineFrame, TimelineItem, TimelineView,
};

/// Layout units per text column
const CELL_WIDTH: f32 = 4.0;

/// Channel progress as a percentage suffix while it is moving
fn progress_suffix(value: f32) -> String {
    if value > 0.0 && value < 1.0 {
        format!(" {:>3.0}%", value * 100.0)
    } else {
        String::new()
    }
}

/// Step marker: hollow, half or filled
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNode;

impl SlotRenderer<String> for TextNode {
    fn render(&self, out: &mut String, props: &SlotProps<'_>) {
        let glyph = match props.value {
            v if v >= 1.0 => '●',
            v if v > 0.0 => '◐',
            _ => '○',
        };
        out.push(glyph);
    }
}

/// Step title, blanked while hidden
#[derive(Debug, Clone)]
pub struct TextTitle {
    /// Title text
    pub title: String,
}

impl SlotRenderer<String> for TextTitle {
    fn render(&self, out: &mut String, props: &SlotProps<'_>) {
        if props.value > 0.0 {
            out.push_str(&self.title);
        } else {
            out.push_str(&".".repeat(self.title.chars().count()));
        }
        if props.is_active {
            out.push_str(" *");
        }
        out.push_str(&progress_suffix(props.value));
    }
}

/// Connector below the marker
#[derive(Debug, Clone, Copy, Default)]
pub struct TextConnector;

impl SlotRenderer<String> for TextConnector {
    fn render(&self, out: &mut String, props: &SlotProps<'_>) {
        let glyph = match props.value {
            v if v >= 1.0 => '┃',
            v if v > 0.0 => '╎',
            _ => ' ',
        };
        out.push(glyph);
    }
}

/// Step body, shown while its render channel is up
#[derive(Debug, Clone)]
pub struct TextBody {
    /// Body text
    pub body: String,
}

impl SlotRenderer<String> for TextBody {
    fn render(&self, out: &mut String, props: &SlotProps<'_>) {
        if props.value > 0.0 {
            out.push_str(&self.body);
            out.push_str(&progress_suffix(props.value));
        }
    }
}

/// A step drawn with the text renderers
pub fn text_item(id: impl Into<ItemId>, title: &str, body: &str) -> TimelineItem<String> {
    TimelineItem::new(
        id,
        TextNode,
        TextTitle {
            title: title.to_string(),
        },
        TextConnector,
        TextBody {
            body: body.to_string(),
        },
    )
}

/// Compose every item of `frame` into lines of text
pub fn compose(view: &TimelineView<String>, frame: &TimelineFrame) -> String {
    let layout = *view.layout();
    let padding = " ".repeat((layout.padding / CELL_WIDTH).round().max(0.0) as usize);
    let gap = " ".repeat((layout.row.gap / CELL_WIDTH).round().max(1.0) as usize);
    let mut text = String::new();

    for index in 0..frame.items.len() {
        let decoration = view.item_layout(index);
        for row in RowKind::ALL {
            let mut line = padding.clone();
            view.render_row(frame, index, row, &mut line, |line| line.push_str(&gap));

            if row == RowKind::Header && decoration.is_some_and(|d| d.overlay) {
                line.push_str("  [disabled]");
            }
            text.push_str(line.trim_end());
            text.push('\n');
        }
    }
    text
}
