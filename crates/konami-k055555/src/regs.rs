//! 055555 register block.
//!
//! Setters take the raw register value and mask it to the implemented bits.
//! The shadow tables are rebuilt inside the setters that drive them, so a
//! pass never sees a half-updated table.

use crate::layer::{FieldSelect, LAYER_COUNT, Layer, LayerConfig, OverrideLayer, PriorityOverride};
use crate::shadow::{SHADOW_GROUPS, ShadowMode, ShadowValueTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixerRegisters {
    bgc_cblk: u8,
    bgc_set: u8,
    colset: [u8; 4],
    colchg_on: u8,
    pri: [u8; LAYER_COUNT],
    alt_pri: [u8; 2],
    colpri: [u8; 2],
    inpri_on: [u8; 4],
    cblk: [u8; LAYER_COUNT],
    cblk_on: [u8; 2],
    v_inmix: u8,
    v_inmix_on: u8,
    os_inmix: u8,
    os_inmix_on: u8,
    v_inbri: u8,
    os_inbri: u8,
    os_inbri_on: u8,
    shd_pri: [u8; SHADOW_GROUPS],
    shd_on: u8,
    shd_pri_sel: u8,
    disp: u8,
    shadow: [ShadowValueTable; SHADOW_GROUPS + 1],
}

impl MixerRegisters {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bgc_cblk: 0,
            bgc_set: 0,
            colset: [0; 4],
            colchg_on: 0,
            pri: [0; LAYER_COUNT],
            alt_pri: [0; 2],
            colpri: [0; 2],
            inpri_on: [0; 4],
            cblk: [0; LAYER_COUNT],
            cblk_on: [0; 2],
            v_inmix: 0,
            v_inmix_on: 0,
            os_inmix: 0,
            os_inmix_on: 0,
            v_inbri: 0,
            os_inbri: 0,
            os_inbri_on: 0,
            shd_pri: [0; SHADOW_GROUPS],
            shd_on: 0,
            shd_pri_sel: 0,
            disp: 0,
            shadow: [
                ShadowValueTable::unflagged(0),
                ShadowValueTable::unflagged(1),
                ShadowValueTable::unflagged(2),
                ShadowValueTable::unflagged(3),
            ],
        }
    }

    /// Power-on state: everything zero, all layers hidden, no shadow flags.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn write_background_block(&mut self, value: u8) {
        self.bgc_cblk = value & 0x0f;
    }

    /// Bit 0 gradient orientation, bit 1 gradient on, bit 2 front priority,
    /// bit 3 priority invert.
    pub fn write_background_set(&mut self, value: u8) {
        self.bgc_set = value & 0x0f;
    }

    /// Colour depth select for a layer pair: register 0 = A/B, 1 = C/D,
    /// 2 = OBJ/SUB1, 3 = SUB2/SUB3. Low nibble is the first layer.
    pub fn write_color_select(&mut self, reg: usize, value: u8) {
        self.colset[reg & 3] = value & 0x77;
    }

    /// Bits 3 (A) and 1 (B) enable the per-tile priority override.
    pub fn write_color_change(&mut self, value: u8) {
        self.colchg_on = value & 0x0f;
    }

    pub fn set_priority(&mut self, layer: Layer, value: u8) {
        self.pri[layer.index()] = value;
    }

    pub fn set_override_priority(&mut self, layer: OverrideLayer, value: u8) {
        self.alt_pri[layer.slot()] = value;
    }

    pub fn set_override_threshold(&mut self, layer: OverrideLayer, value: u8) {
        self.colpri[layer.slot()] = value;
    }

    /// Priority bits forced from the register for OBJ and SUB layers.
    /// Ignored for tilemap layers, which have no attribute input.
    pub fn set_input_priority(&mut self, layer: Layer, value: u8) {
        if let Some(slot) = layer.attr_slot() {
            self.inpri_on[slot] = value;
        }
    }

    pub fn set_color_block(&mut self, layer: Layer, value: u8) {
        self.cblk[layer.index()] = value & 0x7f;
    }

    /// SUB2 and SUB3 only: block bits replaced by input colour bits.
    pub fn set_color_block_keep(&mut self, layer: Layer, value: u8) {
        match layer {
            Layer::Sub2 => self.cblk_on[0] = value & 0x7f,
            Layer::Sub3 => self.cblk_on[1] = value & 0x7f,
            _ => {}
        }
    }

    pub fn write_v_inmix(&mut self, value: u8) {
        self.v_inmix = value;
    }

    pub fn write_v_inmix_on(&mut self, value: u8) {
        self.v_inmix_on = value;
    }

    pub fn write_os_inmix(&mut self, value: u8) {
        self.os_inmix = value;
    }

    pub fn write_os_inmix_on(&mut self, value: u8) {
        self.os_inmix_on = value;
    }

    pub fn write_v_inbri(&mut self, value: u8) {
        self.v_inbri = value;
    }

    pub fn write_os_inbri(&mut self, value: u8) {
        self.os_inbri = value;
    }

    pub fn write_os_inbri_on(&mut self, value: u8) {
        self.os_inbri_on = value;
    }

    /// Threshold for shadow group 1-3. Other group numbers are ignored.
    pub fn set_shadow_threshold(&mut self, group: usize, value: u8) {
        if !(1..=SHADOW_GROUPS).contains(&group) {
            return;
        }
        self.shd_pri[group - 1] = value;
        self.rebuild_shadow(group);
    }

    /// Two bits of comparison mode per group, group 1 in bits 0-1.
    pub fn write_shadow_select(&mut self, value: u8) {
        self.shd_pri_sel = value & 0x3f;
        for group in 1..=SHADOW_GROUPS {
            self.rebuild_shadow(group);
        }
    }

    /// Per-layer shadow eligibility, one bit per layer.
    pub fn write_shadow_enable(&mut self, value: u8) {
        self.shd_on = value;
    }

    /// Per-layer display enable, one bit per layer.
    pub fn write_display(&mut self, value: u8) {
        self.disp = value;
    }

    fn rebuild_shadow(&mut self, group: usize) {
        let mode = self.shadow_mode(group);
        let threshold = self.shd_pri[group - 1];
        self.shadow[group] = ShadowValueTable::build(group as u8, mode, threshold);
        tracing::trace!(
            group,
            mode = mode.name(),
            threshold,
            flagged = self.shadow[group].flagged_count(),
            "shadow table rebuilt"
        );
    }

    #[must_use]
    pub const fn background_block(&self) -> u8 {
        self.bgc_cblk
    }

    #[must_use]
    pub const fn gradient(&self) -> bool {
        self.bgc_set & 0x02 != 0
    }

    #[must_use]
    pub const fn gradient_horizontal(&self) -> bool {
        self.bgc_set & 0x01 != 0
    }

    /// Higher priority values win instead of lower ones.
    #[must_use]
    pub const fn priority_invert(&self) -> bool {
        self.bgc_set & 0x08 != 0
    }

    /// XOR applied to every 11-bit priority key. The layer index is part of
    /// the key, so under invert equal priorities go to the later layer.
    #[must_use]
    pub const fn key_xor(&self) -> u16 {
        if self.priority_invert() { 0x7ff } else { 0 }
    }

    /// Opacity mask for a layer's colour from its depth nibble.
    #[must_use]
    pub const fn color_mask(&self, layer: Layer) -> u8 {
        let index = layer.index();
        let nibble = (self.colset[index >> 1] >> ((index & 1) * 4)) & 0x0f;
        if nibble & 0x04 != 0 {
            0xff
        } else {
            0xff >> (4 - (nibble & 3))
        }
    }

    /// Bits per pixel implied by the colour select nibble.
    #[must_use]
    pub const fn color_depth(&self, layer: Layer) -> u32 {
        self.color_mask(layer).count_ones()
    }

    #[must_use]
    pub const fn priority(&self, layer: Layer) -> u8 {
        self.pri[layer.index()]
    }

    #[must_use]
    pub const fn priority_override(&self, layer: OverrideLayer) -> Option<PriorityOverride> {
        if self.colchg_on & layer.enable_bit() == 0 {
            return None;
        }
        Some(PriorityOverride {
            priority: self.alt_pri[layer.slot()],
            threshold: self.colpri[layer.slot()],
        })
    }

    #[must_use]
    pub const fn displayed(&self, layer: Layer) -> bool {
        self.disp & layer.bit() != 0
    }

    #[must_use]
    pub const fn shadow_enabled(&self, layer: Layer) -> bool {
        self.shd_on & layer.bit() != 0
    }

    #[must_use]
    pub const fn shadow_threshold(&self, group: usize) -> u8 {
        self.shd_pri[group.saturating_sub(1) % SHADOW_GROUPS]
    }

    #[must_use]
    pub const fn shadow_mode(&self, group: usize) -> ShadowMode {
        let shift = 2 * (group.saturating_sub(1) % SHADOW_GROUPS);
        ShadowMode::from_bits(self.shd_pri_sel >> shift)
    }

    /// Table for shadow group 0-3; group 0 never flags.
    #[must_use]
    pub const fn shadow_table(&self, group: usize) -> &ShadowValueTable {
        &self.shadow[group & 3]
    }

    /// Decode everything the mixer needs for one layer.
    #[must_use]
    pub fn layer_config(&self, layer: Layer) -> LayerConfig {
        let index = layer.index();
        let (brightness, mix, input_priority) = match layer.attr_slot() {
            None => {
                // A-D use two bits each, A lowest.
                let shift = 2 * index;
                (
                    FieldSelect::fixed(self.v_inbri >> shift),
                    FieldSelect {
                        value: (self.v_inmix >> shift) & 3,
                        on: (self.v_inmix_on >> shift) & 3,
                    },
                    0,
                )
            }
            Some(slot) => {
                let shift = 2 * slot;
                (
                    FieldSelect {
                        value: (self.os_inbri >> shift) & 3,
                        on: (self.os_inbri_on >> shift) & 3,
                    },
                    FieldSelect {
                        value: (self.os_inmix >> shift) & 3,
                        on: (self.os_inmix_on >> shift) & 3,
                    },
                    self.inpri_on[slot],
                )
            }
        };
        let priority_override = match layer {
            Layer::A => self.priority_override(OverrideLayer::A),
            Layer::B => self.priority_override(OverrideLayer::B),
            _ => None,
        };
        let color_block_keep = match layer {
            Layer::Sub2 => self.cblk_on[0],
            Layer::Sub3 => self.cblk_on[1],
            _ => 0,
        };
        LayerConfig {
            layer,
            display: self.displayed(layer),
            priority: self.pri[index],
            priority_override,
            color_mask: self.color_mask(layer),
            input_priority,
            color_block: self.cblk[index],
            color_block_keep,
            shadow: self.shadow_enabled(layer),
            brightness,
            mix,
        }
    }
}

impl Default for MixerRegisters {
    fn default() -> Self {
        Self::new()
    }
}
