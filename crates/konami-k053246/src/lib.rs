//! Konami 053246 sprite generator, paired with a 053247 or 055673.
//!
//! The 053246 walks sprite RAM once per frame. Sprites are sorted into 256
//! priority buckets (one sprite per bucket, last in memory order wins), then
//! drawn bucket by bucket into a colour plane and an attribute plane. Each
//! sprite may be zoomed, flipped, or mirrored per axis; the per-axis span
//! layout lives in [`layout`].
//!
//! The planes feed a priority encoder (see the `konami-k055555` crate) as its
//! OBJ input.

mod draw;
mod error;
mod k053246;
pub mod layout;
mod regs;
mod source;
mod sprite;

pub use draw::{ShadowDetect, TileBlit, WriteMode, draw_tile};
pub use error::SpriteError;
pub use k053246::{FrameStats, K053246};
pub use layout::{TileLayout, TileLayouts, ZOOM_UNITY};
pub use regs::{AttributeBlock, ObjRegisters, Variant};
pub use source::{
    ColorWiring, DecodedTiles, LinearWiring, TILE_SIZE, TilePixels, TileSource, WiredColor,
};
pub use sprite::{SPRITE_COUNT, SPRITE_RAM_WORDS, SpriteRecord, SpriteSnapshot, WORDS_PER_SPRITE};
