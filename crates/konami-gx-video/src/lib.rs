//! Konami GX-style video pipeline.
//!
//! Glues the 053246 sprite generator to the 055555 priority encoder. Each
//! frame the sprite planes are redrawn from a sprite RAM snapshot and handed
//! to the mixer alongside the caller's tilemap planes. The result is the
//! mixer's front/back colour and attribute planes, ready for a blend stage.

mod config;
mod error;
mod gx;

pub use config::{SpriteChip, VideoConfig};
pub use error::VideoError;
pub use gx::{FrameSources, GxVideo};
