// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline configuration.
//!
//! Options are fixed for the lifetime of a mounted timeline:
//! - Sequencing timing (`delay_between`, `duration`, easing)
//! - Starting step (`initial_index`)
//! - Layout-only settings (RTL mirroring, spacing)
//!
//! Options can be stored as RON next to the rest of an app's settings.

use crate::channel::Easing;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul};
use std::path::Path;
use uuid::Uuid;

/// Default stagger gap between consecutive items
pub const DEFAULT_DELAY_BETWEEN: Millis = Millis(120);

/// Default base transition length
pub const DEFAULT_DURATION: Millis = Millis(300);

/// A span or instant on the logical clock, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    /// Zero milliseconds
    pub const ZERO: Millis = Millis(0);

    /// Raw millisecond count
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Difference, saturating at zero
    pub fn saturating_sub(self, other: Millis) -> Millis {
        Millis(self.0.saturating_sub(other.0))
    }
}

// Clock arithmetic saturates; a deadline past `u64::MAX` never fires
impl Add for Millis {
    type Output = Millis;

    fn add(self, rhs: Millis) -> Millis {
        Millis(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Millis {
    fn add_assign(&mut self, rhs: Millis) {
        *self = *self + rhs;
    }
}

impl Mul<u64> for Millis {
    type Output = Millis;

    fn mul(self, rhs: u64) -> Millis {
        Millis(self.0.saturating_mul(rhs))
    }
}

impl From<u64> for Millis {
    fn from(value: u64) -> Self {
        Millis(value)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Stable identity key of a timeline item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create an id from a caller-chosen key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Create a fresh, unique id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Renderer-free part of a timeline item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    /// Identity key, never reused for a different step
    #[serde(default)]
    pub id: ItemId,
    /// Whether the item is drawn dimmed behind an overlay
    #[serde(default)]
    pub disabled: bool,
}

impl ItemDescriptor {
    /// Create an enabled item
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            disabled: false,
        }
    }

    /// Set the disabled flag
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Options recognized by a timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineOptions {
    /// Mirror rows for right-to-left locales (layout only)
    pub is_rtl: bool,
    /// Stagger gap between consecutive items' sequences
    pub delay_between: Millis,
    /// Base transition length
    pub duration: Millis,
    /// Step that is active at mount
    pub initial_index: usize,
    /// Easing curve used by every channel transition
    pub easing: Easing,
    /// Padding around the whole timeline
    pub space_out: f32,
    /// Gap between slots on one row
    pub gap_hor: f32,
    /// Gap between rows and between items
    pub gap_vert: f32,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            is_rtl: false,
            delay_between: DEFAULT_DELAY_BETWEEN,
            duration: DEFAULT_DURATION,
            initial_index: 0,
            easing: Easing::default(),
            space_out: 0.0,
            gap_hor: 10.0,
            gap_vert: 10.0,
        }
    }
}

impl TimelineOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set right-to-left mirroring
    pub fn with_rtl(mut self, is_rtl: bool) -> Self {
        self.is_rtl = is_rtl;
        self
    }

    /// Set the stagger gap
    pub fn with_delay_between(mut self, delay_between: impl Into<Millis>) -> Self {
        self.delay_between = delay_between.into();
        self
    }

    /// Set the base transition length
    pub fn with_duration(mut self, duration: impl Into<Millis>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Set the step active at mount
    pub fn with_initial_index(mut self, initial_index: usize) -> Self {
        self.initial_index = initial_index;
        self
    }

    /// Set the easing curve
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set spacing (padding, horizontal gap, vertical gap)
    pub fn with_spacing(mut self, space_out: f32, gap_hor: f32, gap_vert: f32) -> Self {
        self.space_out = space_out;
        self.gap_hor = gap_hor;
        self.gap_vert = gap_vert;
        self
    }

    /// Parse options from RON text
    pub fn from_ron_str(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Serialize options to pretty RON
    pub fn to_ron_string(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load options from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Save options to a RON file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TimelineOptions::default();
        assert!(!options.is_rtl);
        assert_eq!(options.delay_between, Millis(120));
        assert_eq!(options.duration, Millis(300));
        assert_eq!(options.initial_index, 0);
        assert_eq!(options.easing, Easing::EaseInOutQuad);
        assert_eq!(options.gap_hor, 10.0);
        assert_eq!(options.gap_vert, 10.0);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let options = TimelineOptions::from_ron_str("(duration: 200, is_rtl: true)").unwrap();
        assert_eq!(options.duration, Millis(200));
        assert!(options.is_rtl);
        assert_eq!(options.delay_between, DEFAULT_DELAY_BETWEEN);
    }

    #[test]
    fn test_ron_round_trip() {
        let options = TimelineOptions::new()
            .with_delay_between(100)
            .with_initial_index(2)
            .with_easing(Easing::Linear);
        let text = options.to_ron_string().unwrap();
        assert_eq!(TimelineOptions::from_ron_str(&text).unwrap(), options);
    }

    #[test]
    fn test_bad_ron_is_config_error() {
        let err = TimelineOptions::from_ron_str("(duration: \"slow\")").unwrap_err();
        assert!(matches!(err, crate::TimelineError::Config(_)));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ItemId::generate(), ItemId::generate());
        assert_eq!(ItemId::from("intro").as_str(), "intro");
    }

    #[test]
    fn test_millis_arithmetic() {
        let d = Millis(200);
        assert_eq!(Millis(100) * 3 + d * 3, Millis(900));
        assert_eq!(Millis(5).saturating_sub(Millis(9)), Millis::ZERO);
        assert_eq!(d.to_string(), "200ms");
    }

    #[test]
    fn test_millis_saturates() {
        let huge = Millis(u64::MAX / 3);
        assert_eq!(huge * 4, Millis(u64::MAX));
        assert_eq!(huge * 3 + Millis(10), Millis(u64::MAX));

        let mut t = Millis(u64::MAX - 1);
        t += Millis(5);
        assert_eq!(t, Millis(u64::MAX));
    }
}
