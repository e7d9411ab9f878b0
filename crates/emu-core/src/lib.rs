//! Core types shared by the video chip crates.
//!
//! Every chip renders into plain 16-bit raster planes clipped by an inclusive
//! rectangle, and every chip exposes its decoded register state for
//! inspection. Nothing here knows about a particular chip.

mod bitmap;
mod observable;
mod rect;

pub use bitmap::Bitmap16;
pub use observable::{Observable, Value};
pub use rect::Rect;
