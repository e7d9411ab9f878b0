//! Mixer inputs and their decoded per-layer configuration.

use std::fmt;

/// The eight mixer inputs, in evaluation order.
///
/// A-D are tilemap layers, `Obj` is the sprite generator, `Sub1`-`Sub3` are
/// auxiliary layers (ROZ planes and the like).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    A,
    B,
    C,
    D,
    Obj,
    Sub1,
    Sub2,
    Sub3,
}

/// Number of mixer inputs, not counting the background.
pub const LAYER_COUNT: usize = 8;

impl Layer {
    pub const ALL: [Self; LAYER_COUNT] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::Obj,
        Self::Sub1,
        Self::Sub2,
        Self::Sub3,
    ];

    /// Position in evaluation order; also the tie-break bits of the key.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bit of this layer in the display and shadow enable registers.
    #[must_use]
    pub const fn bit(self) -> u8 {
        1 << self.index()
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
            Self::Obj => "obj",
            Self::Sub1 => "sub1",
            Self::Sub2 => "sub2",
            Self::Sub3 => "sub3",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.name() == name)
    }

    /// Tilemap layers with 10-bit colour and register-only brightness.
    #[must_use]
    pub const fn is_tilemap(self) -> bool {
        matches!(self, Self::A | Self::B | Self::C | Self::D)
    }

    /// Slot of the layers that read priority, brightness and mix from an
    /// attribute plane (OBJ, SUB1-3).
    #[must_use]
    pub const fn attr_slot(self) -> Option<usize> {
        match self {
            Self::Obj => Some(0),
            Self::Sub1 => Some(1),
            Self::Sub2 => Some(2),
            Self::Sub3 => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The two tilemap layers with a per-tile priority override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideLayer {
    A,
    B,
}

impl OverrideLayer {
    #[must_use]
    pub const fn layer(self) -> Layer {
        match self {
            Self::A => Layer::A,
            Self::B => Layer::B,
        }
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    /// Enable bit in the colour-change register.
    pub(crate) const fn enable_bit(self) -> u8 {
        match self {
            Self::A => 0x08,
            Self::B => 0x02,
        }
    }
}

/// Alternate priority used when a pixel's colour exceeds `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityOverride {
    pub priority: u8,
    pub threshold: u8,
}

/// A 2-bit output field picked per bit from a register or from the pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSelect {
    /// Register value.
    pub value: u8,
    /// Bits taken from `value`; the rest come from the pixel.
    pub on: u8,
}

impl FieldSelect {
    /// Always the register value.
    #[must_use]
    pub const fn fixed(value: u8) -> Self {
        Self {
            value: value & 3,
            on: 3,
        }
    }

    #[must_use]
    pub const fn resolve(self, pixel: u16) -> u16 {
        let on = self.on as u16 & 3;
        ((self.value as u16 & on) | (pixel & !on)) & 3
    }
}

/// Everything the mixer needs to know about one input for a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerConfig {
    pub layer: Layer,
    pub display: bool,
    pub priority: u8,
    /// A and B only.
    pub priority_override: Option<PriorityOverride>,
    /// Colour bits that must be non-zero for a pixel to be opaque.
    pub color_mask: u8,
    /// OBJ/SUB: priority bits taken from the register; the rest come from
    /// the attribute plane.
    pub input_priority: u8,
    pub color_block: u8,
    /// SUB2/SUB3: colour bits 10+ kept from the input instead of the block.
    pub color_block_keep: u8,
    pub shadow: bool,
    pub brightness: FieldSelect,
    pub mix: FieldSelect,
}

impl LayerConfig {
    /// Priority for a pixel of this layer, before the tie-break bits.
    #[must_use]
    pub fn pixel_priority(&self, color: u16, attr: u16) -> u8 {
        if self.layer.is_tilemap() {
            let mask = u16::from(self.color_mask);
            return match self.priority_override {
                Some(o) if (color & mask) > (u16::from(o.threshold) & mask) => o.priority,
                _ => self.priority,
            };
        }
        let on = u16::from(self.input_priority);
        ((attr & !on) | (u16::from(self.priority) & on)) as u8
    }

    /// Colour presented at the output for a pixel of this layer.
    #[must_use]
    pub fn output_color(&self, color: u16, attr: u16) -> u16 {
        let block = u16::from(self.color_block);
        match self.layer {
            Layer::A | Layer::B | Layer::C | Layer::D => color | (block << 10),
            Layer::Obj => {
                let on = u16::from(self.input_priority);
                color | (((attr & on) | ((block << 2) & !on)) << 8)
            }
            Layer::Sub1 | Layer::Sub2 | Layer::Sub3 => {
                let keep = u16::from(self.color_block_keep);
                (color & (0x3ff | (keep << 10))) | ((block & !keep) << 10)
            }
        }
    }

    /// Attribute word: present flag, shadow eligibility, brightness, mix.
    #[must_use]
    pub fn output_attr(&self, color: u16, attr: u16) -> u16 {
        let (bri_in, mix_in) = if self.layer.is_tilemap() {
            (0, color >> 8)
        } else {
            (attr >> 10, attr >> 12)
        };
        0x8000
            | u16::from(self.shadow)
            | (self.brightness.resolve(bri_in) << 2)
            | (self.mix.resolve(mix_in) << 4)
    }

    /// Mask the raw input colour to this layer's width.
    #[must_use]
    pub const fn input_color(&self, raw: u16) -> u16 {
        match self.layer {
            Layer::A | Layer::B | Layer::C | Layer::D => raw & 0x3ff,
            Layer::Obj => raw & 0xff,
            Layer::Sub1 | Layer::Sub2 | Layer::Sub3 => raw,
        }
    }

    #[must_use]
    pub const fn is_opaque(&self, color: u16) -> bool {
        color & self.color_mask as u16 != 0
    }
}
