//! Caller contract violations for the sprite pass.

use emu_core::Rect;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpriteError {
    /// Sprite RAM snapshot does not hold exactly 256 records.
    #[error("sprite snapshot has {actual} units, expected {expected}")]
    SnapshotShape { expected: usize, actual: usize },

    /// The visible rectangle reaches outside the sprite planes.
    #[error("clip {clip:?} exceeds {width}x{height} sprite planes")]
    ClipOutOfBounds {
        clip: Rect,
        width: usize,
        height: usize,
    },
}
