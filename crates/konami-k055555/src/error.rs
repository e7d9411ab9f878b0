use emu_core::Rect;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MixerError {
    #[error("clip {clip:?} exceeds {width}x{height} output planes")]
    ClipOutOfBounds {
        clip: Rect,
        width: usize,
        height: usize,
    },

    /// An input plane does not cover the clip rectangle.
    #[error("{layer} plane is {width}x{height}, too small for clip {clip:?}")]
    PlaneSize {
        layer: &'static str,
        width: usize,
        height: usize,
        clip: Rect,
    },
}
