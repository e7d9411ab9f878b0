//! Konami 055555 priority encoder.
//!
//! The 055555 takes eight input layers (tilemaps A-D, the sprite layer and
//! three auxiliary layers) plus a background, and for every pixel keeps the
//! two frontmost visible inputs. Priority keys are the 8-bit layer priority
//! with the layer index as tie-break, so equal priorities resolve in favour
//! of the earlier layer. The front/back pair goes on to a blend stage
//! together with brightness, mix and shadow bits.
//!
//! Shadow signalling uses three threshold tables, one per shadow group; the
//! group of a pixel comes from the sprite attribute plane.

mod error;
mod k055555;
mod layer;
mod regs;
mod shadow;

pub use error::MixerError;
pub use k055555::{K055555, LayerInputs, LayerPlanes};
pub use layer::{FieldSelect, LAYER_COUNT, Layer, LayerConfig, OverrideLayer, PriorityOverride};
pub use regs::MixerRegisters;
pub use shadow::{SHADOW_GROUPS, ShadowMode, ShadowValueTable};
