//! Board calibration for the video pipeline.

use emu_core::Rect;
use konami_k053246::Variant;
use serde::{Deserialize, Serialize};

use crate::error::VideoError;

/// Which sprite chip sits behind the 053246.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteChip {
    K053247,
    #[default]
    K055673,
}

impl From<SpriteChip> for Variant {
    fn from(chip: SpriteChip) -> Self {
        match chip {
            SpriteChip::K053247 => Variant::K053247,
            SpriteChip::K055673 => Variant::K055673,
        }
    }
}

/// Video configuration. Every field has a default, so a JSON file only
/// needs the values a board changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Plane width in pixels.
    pub width: usize,
    /// Plane height in pixels.
    pub height: usize,
    /// Rectangle rendered each frame. Must lie inside the planes.
    pub visible: Rect,
    pub sprite_chip: SpriteChip,
    /// Offset from sprite coordinates to plane coordinates.
    pub sprite_offset_x: i32,
    pub sprite_offset_y: i32,
    /// Solid background used when no layer is visible.
    pub background_color: u16,
    pub background_attr: u16,
}

impl VideoConfig {
    pub fn from_json(text: &str) -> Result<Self, VideoError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, VideoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 384,
            height: 224,
            visible: Rect::from_size(384, 224),
            sprite_chip: SpriteChip::default(),
            sprite_offset_x: 0,
            sprite_offset_y: 0,
            background_color: 0,
            background_attr: 0,
        }
    }
}
