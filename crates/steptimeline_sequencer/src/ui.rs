// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline panel for egui.
//!
//! Features:
//! - Drives the timeline clock from the frame delta
//! - Two rows per item, mirrored for right-to-left
//! - Dimmed overlay over disabled items
//! - Default slot renderers (dot, label, connector, text)

use crate::config::{ItemId, Millis};
use crate::layout::{ItemLayout, RowKind, DISABLED_OVERLAY_RGBA};
use crate::slot::{SlotProps, SlotRenderer, TimelineItem, TimelineView};
use crate::timeline::TimelineFrame;
use egui::{Align, Color32, Layout, RichText, Sense, Stroke, Vec2};

const NODE_RADIUS: f32 = 9.0;
const LINE_WIDTH: f32 = 2.0;
const LINE_LENGTH: f32 = 28.0;
const ACCENT: Color32 = Color32::from_rgb(100, 150, 255);

/// Draws a [`TimelineView`] and keeps its clock in step with egui
#[derive(Debug, Default)]
pub struct TimelinePanel {
    /// Sub-millisecond remainder of frame deltas
    carry: f32,
}

impl TimelinePanel {
    /// Create a new panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the timeline by this frame's delta and draw it
    pub fn ui(&mut self, ui: &mut egui::Ui, view: &TimelineView<egui::Ui>) {
        let dt_ms = ui.input(|i| i.stable_dt) * 1000.0 + self.carry;
        let whole = dt_ms.floor();
        self.carry = dt_ms - whole;
        view.timeline().advance(Millis(whole as u64));

        let frame = view.frame();
        let layout = *view.layout();

        egui::Frame::none()
            .inner_margin(layout.padding)
            .show(ui, |ui| {
                ui.spacing_mut().item_spacing.y = layout.gap_vert;
                for index in 0..frame.items.len() {
                    self.item_ui(ui, view, &frame, index);
                }
            });

        if frame.settling {
            ui.ctx().request_repaint();
        }
    }

    fn item_ui(&self, ui: &mut egui::Ui, view: &TimelineView<egui::Ui>, frame: &TimelineFrame, index: usize) {
        let decoration = view.item_layout(index).unwrap_or(ItemLayout::for_item(false));
        let layout = *view.layout();

        let response = ui
            .scope(|ui| {
                ui.multiply_opacity(decoration.opacity);
                ui.vertical(|ui| {
                    for row in RowKind::ALL {
                        // Slots come pre-mirrored; always place them left to right
                        ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                            ui.spacing_mut().item_spacing.x = layout.row.gap;
                            view.render_row(frame, index, row, ui, |_| {});
                        });
                    }
                });
            })
            .response;

        if decoration.overlay {
            let [r, g, b, a] = DISABLED_OVERLAY_RGBA;
            ui.painter()
                .rect_filled(response.rect, 0.0, Color32::from_rgba_unmultiplied(r, g, b, a));
        }
    }
}

/// Filled dot that grows with its channel; click navigates to the item
#[derive(Debug, Clone, Copy)]
pub struct NodeDot {
    /// Dot radius
    pub radius: f32,
    /// Fill color
    pub color: Color32,
}

impl Default for NodeDot {
    fn default() -> Self {
        Self {
            radius: NODE_RADIUS,
            color: ACCENT,
        }
    }
}

impl SlotRenderer<egui::Ui> for NodeDot {
    fn render(&self, ui: &mut egui::Ui, props: &SlotProps<'_>) {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(self.radius * 2.0), Sense::click());
        let painter = ui.painter();
        let center = rect.center();
        painter.circle_stroke(center, self.radius - 0.5, Stroke::new(1.0, ui.visuals().weak_text_color()));
        painter.circle_filled(center, self.radius * props.value, self.color);
        if response.clicked() {
            if let Err(e) = props.goto(props.item_index as isize) {
                tracing::warn!("Navigation from node failed: {e}");
            }
        }
    }
}

/// Text that fades with its channel
#[derive(Debug, Clone)]
pub struct TextLabel {
    /// Label text
    pub text: String,
}

impl TextLabel {
    /// Create a label
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl SlotRenderer<egui::Ui> for TextLabel {
    fn render(&self, ui: &mut egui::Ui, props: &SlotProps<'_>) {
        let base = if props.is_active {
            ui.visuals().strong_text_color()
        } else {
            ui.visuals().weak_text_color()
        };
        let alpha = 0.3 + 0.7 * props.value;
        ui.label(RichText::new(&self.text).color(base.gamma_multiply(alpha)));
    }
}

/// Vertical connector drawn down to its channel's progress
#[derive(Debug, Clone, Copy)]
pub struct ConnectorLine {
    /// Width of the column the connector sits in
    pub column: f32,
    /// Full connector length
    pub length: f32,
    /// Stroke color
    pub color: Color32,
}

impl Default for ConnectorLine {
    fn default() -> Self {
        Self {
            column: NODE_RADIUS * 2.0,
            length: LINE_LENGTH,
            color: ACCENT,
        }
    }
}

impl SlotRenderer<egui::Ui> for ConnectorLine {
    fn render(&self, ui: &mut egui::Ui, props: &SlotProps<'_>) {
        let (rect, _) = ui.allocate_exact_size(Vec2::new(self.column, self.length), Sense::hover());
        let top = rect.center_top();
        let painter = ui.painter();
        painter.line_segment(
            [top, top + Vec2::new(0.0, self.length)],
            Stroke::new(LINE_WIDTH, ui.visuals().faint_bg_color),
        );
        if props.value > 0.0 {
            painter.line_segment(
                [top, top + Vec2::new(0.0, self.length * props.value)],
                Stroke::new(LINE_WIDTH, self.color),
            );
        }
    }
}

/// Body text of a step, shown while its render channel is up
#[derive(Debug, Clone)]
pub struct RenderText {
    /// Body text
    pub text: String,
}

impl RenderText {
    /// Create a body text slot
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl SlotRenderer<egui::Ui> for RenderText {
    fn render(&self, ui: &mut egui::Ui, props: &SlotProps<'_>) {
        if props.value <= 0.0 {
            return;
        }
        let color = ui.visuals().text_color().gamma_multiply(props.value);
        ui.label(RichText::new(&self.text).color(color));
    }
}

/// A step drawn with the default egui renderers
pub fn default_item(id: impl Into<ItemId>, title: &str, body: &str) -> TimelineItem<egui::Ui> {
    TimelineItem::new(
        id,
        NodeDot::default(),
        TextLabel::new(title),
        ConnectorLine::default(),
        RenderText::new(body),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineOptions;

    fn run_frames(panel: &mut TimelinePanel, view: &TimelineView<egui::Ui>, frames: usize) {
        let ctx = egui::Context::default();
        for _ in 0..frames {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| panel.ui(ui, view));
            });
        }
    }

    #[test]
    fn test_panel_draws_and_advances() {
        let items = vec![
            default_item("a", "Ordered", "We got your order"),
            default_item("b", "Packed", "Boxed and labelled").with_disabled(true),
            default_item("c", "Shipped", "On its way"),
        ];
        let options = TimelineOptions::new().with_rtl(true);
        let view = TimelineView::mount(items, options).unwrap();
        view.timeline().goto(2).unwrap();

        let mut panel = TimelinePanel::new();
        run_frames(&mut panel, &view, 3);

        assert!(view.timeline().now() > Millis::ZERO);
        assert_eq!(view.timeline().active_index(), 0);
        assert!(view.timeline().is_settling());
    }
}
