// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene files: timeline options, steps and a navigation script.

use crate::text::text_item;
use serde::{Deserialize, Serialize};
use std::path::Path;
use steptimeline_sequencer::{ItemId, Millis, TimelineItem, TimelineOptions};

/// One step of the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneItem {
    /// Identity key; generated when omitted
    #[serde(default)]
    pub id: ItemId,
    /// Label text
    pub title: String,
    /// Render slot text
    #[serde(default)]
    pub body: String,
    /// Draw dimmed
    #[serde(default)]
    pub disabled: bool,
}

/// A navigation request at a point on the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Clock time of the request
    pub at: Millis,
    /// Requested step (clamped by the timeline)
    pub goto: isize,
}

/// A complete scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Timeline options
    #[serde(default)]
    pub options: TimelineOptions,
    /// Steps in order
    pub items: Vec<SceneItem>,
    /// Navigation requests, applied in time order
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

impl Scene {
    /// Parse a scene from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        let mut scene: Scene = ron::from_str(text)?;
        scene.script.sort_by_key(|s| s.at);
        Ok(scene)
    }

    /// Load a scene from a RON file
    pub fn load(path: &Path) -> Result<Self, crate::error::AppError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_ron_str(&text)?)
    }

    /// Order-tracking demo: forward, overlapping, then back to the start
    pub fn demo() -> Self {
        let step = |id: &str, title: &str, body: &str| SceneItem {
            id: ItemId::new(id),
            title: title.to_string(),
            body: body.to_string(),
            disabled: false,
        };
        Self {
            options: TimelineOptions::new().with_delay_between(100).with_duration(200),
            items: vec![
                step("ordered", "Ordered", "We received your order"),
                step("packed", "Packed", "Boxed and labelled"),
                step("shipped", "Shipped", "Handed to the carrier"),
                SceneItem {
                    disabled: true,
                    ..step("delivered", "Delivered", "At your door")
                },
            ],
            script: vec![
                ScriptStep { at: Millis(0), goto: 2 },
                ScriptStep { at: Millis(2000), goto: 3 },
                ScriptStep { at: Millis(2300), goto: 1 },
                ScriptStep { at: Millis(4000), goto: -1 },
            ],
        }
    }

    /// Build renderable items for the text surface
    pub fn text_items(&self) -> Vec<TimelineItem<String>> {
        self.items
            .iter()
            .map(|item| text_item(item.id.clone(), &item.title, &item.body).with_disabled(item.disabled))
            .collect()
    }
}
