//! Sprite generator register block.
//!
//! Register writes arrive already decoded from the bus; setters mask every
//! value to its hardware width so no later computation sees stray bits.

/// Which sprite generator is paired with the 053246.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// 4 bpp chunky tiles, no tile banks, no attribute blocks.
    K053247,
    /// 4-8 bpp planar tiles, banked tile codes, per-block attributes.
    #[default]
    K055673,
}

/// Decoded view of one attribute block register (12 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeBlock(u16);

impl AttributeBlock {
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Write-enable bit, compared against the write-invert mode.
    #[must_use]
    pub const fn write_flag(self) -> bool {
        self.0 & 0x800 != 0
    }

    /// Number of low colour bits ignored by the transparency test.
    #[must_use]
    pub const fn transparency_shift(self) -> u32 {
        ((self.0 >> 8) & 7) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjRegisters {
    hscr: u16,
    vscr: u16,
    oms: u8,
    atrbk: [AttributeBlock; 4],
    vrcbk: [u8; 4],
    coreg: u8,
    opset: u8,
}

impl ObjRegisters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_hscroll(&mut self, value: u16) {
        self.hscr = value;
    }

    pub fn set_vscroll(&mut self, value: u16) {
        self.vscr = value;
    }

    /// Mode register: bit 0 flip X, bit 1 flip Y, bit 4 DMA enable,
    /// bit 5 shadow keep.
    pub fn write_oms(&mut self, value: u8) {
        self.oms = value & 0x3f;
    }

    pub fn set_attribute_block(&mut self, block: usize, value: u16) {
        self.atrbk[block & 3] = AttributeBlock(value & 0xfff);
    }

    /// Upper tile code bits for tile codes whose top two bits select `bank`.
    pub fn set_tile_bank(&mut self, bank: usize, value: u8) {
        self.vrcbk[bank & 3] = value & 0x0f;
    }

    /// Colour offset OR'd above the sprite colour at the active bit depth.
    pub fn set_color_offset(&mut self, value: u8) {
        self.coreg = value & 0x0f;
    }

    /// Option register: bits 0-2 depth, bit 3 write invert, bit 4 priority
    /// order, bit 5 priority select, bit 6 wrap, bit 7 ROM readback.
    pub fn write_opset(&mut self, value: u8) {
        let old_depth = self.depth_select();
        self.opset = value;
        if self.depth_select() != old_depth {
            tracing::trace!(depth_select = self.depth_select(), "sprite depth select changed");
        }
    }

    /// Raw depth select field (opset bits 0-2). Only the 055673 decodes it.
    #[must_use]
    pub const fn depth_select(&self) -> u8 {
        self.opset & 0x07
    }

    #[must_use]
    pub const fn hscroll(&self) -> u16 {
        self.hscr & 0x3ff
    }

    #[must_use]
    pub const fn vscroll(&self) -> u16 {
        self.vscr & 0x3ff
    }

    #[must_use]
    pub const fn flip_x(&self) -> bool {
        self.oms & 0x01 != 0
    }

    #[must_use]
    pub const fn flip_y(&self) -> bool {
        self.oms & 0x02 != 0
    }

    #[must_use]
    pub const fn dma_enabled(&self) -> bool {
        self.oms & 0x10 != 0
    }

    /// Sprites OR into existing attribute bits instead of replacing them.
    #[must_use]
    pub const fn shadow_keep(&self) -> bool {
        self.oms & 0x20 != 0
    }

    #[must_use]
    pub const fn attribute_block(&self, block: usize) -> AttributeBlock {
        self.atrbk[block & 3]
    }

    #[must_use]
    pub const fn tile_bank(&self, bank: usize) -> u8 {
        self.vrcbk[bank & 3]
    }

    #[must_use]
    pub const fn color_offset(&self) -> u8 {
        self.coreg
    }

    #[must_use]
    pub const fn opset(&self) -> u8 {
        self.opset
    }

    #[must_use]
    pub const fn oms(&self) -> u8 {
        self.oms
    }

    /// Bits per pixel of tile data.
    #[must_use]
    pub const fn bpp(&self, variant: Variant) -> u32 {
        match variant {
            Variant::K053247 => 4,
            Variant::K055673 => {
                if self.opset & 0x04 != 0 {
                    8
                } else {
                    4 | (self.opset & 0x03) as u32
                }
            }
        }
    }

    /// XOR applied to a sprite's priority to pick its bucket.
    #[must_use]
    pub const fn priority_xor(&self) -> u8 {
        if self.opset & 0x10 != 0 { 0x00 } else { 0xff }
    }

    /// Attribute blocks with the write flag equal to this are drawn.
    #[must_use]
    pub const fn write_invert(&self) -> bool {
        self.opset & 0x08 != 0
    }

    #[must_use]
    pub const fn priority_select(&self) -> bool {
        self.opset & 0x20 != 0
    }

    /// Coordinate wrap in pixels.
    #[must_use]
    pub const fn wrap(&self) -> u16 {
        if self.opset & 0x40 != 0 { 512 } else { 1024 }
    }

    #[must_use]
    pub const fn rom_readback(&self) -> bool {
        self.opset & 0x80 != 0
    }
}
