//! The sprite pass: bucket, lay out, and draw one frame of sprites.

use emu_core::{Bitmap16, Observable, Rect, Value};

use crate::draw::{ShadowDetect, TileBlit, WriteMode, draw_tile};
use crate::error::SpriteError;
use crate::layout::{AxisParams, generate};
use crate::regs::{ObjRegisters, Variant};
use crate::source::{ColorWiring, TileSource};
use crate::sprite::{SpriteRecord, SpriteSnapshot};

/// Tile id offsets of successive sub-tiles along X, repeated so a start
/// offset of up to 7 can be applied by slicing.
const X_TILE_STEPS: [u32; 16] = [0, 1, 4, 5, 16, 17, 20, 21, 0, 1, 4, 5, 16, 17, 20, 21];
/// Same for Y.
const Y_TILE_STEPS: [u32; 16] = [0, 2, 8, 10, 32, 34, 40, 42, 0, 2, 8, 10, 32, 34, 40, 42];
/// Start sub-tile for the low bits of a tile code.
const UNWRAP: [usize; 32] = [
    0, 1, 0, 1, 2, 3, 2, 3, 0, 1, 0, 1, 2, 3, 2, 3, 4, 5, 4, 5, 6, 7, 6, 7, 4, 5, 4, 5, 6, 7, 6, 7,
];

/// One drawable sprite per level.
const PRIORITY_LEVELS: usize = 256;

/// Attribute bits preserved by keep-mode writes (shadow group).
const KEEP_MASK: u16 = 0x0300;

/// What happened during one sprite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Sprites that produced at least one span on both axes.
    pub sprites_drawn: usize,
    /// Active sprites that landed in an already occupied priority bucket.
    pub bucket_collisions: usize,
    /// Sprites dropped because their attribute block is write protected.
    pub write_protected: usize,
}

/// The 053246 paired with a 053247 or 055673.
pub struct K053246 {
    pub regs: ObjRegisters,
    variant: Variant,
    offset_x: i32,
    offset_y: i32,
    color: Bitmap16,
    attr: Bitmap16,
}

impl K053246 {
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self {
            regs: ObjRegisters::new(),
            variant,
            offset_x: 0,
            offset_y: 0,
            color: Bitmap16::new(0, 0),
            attr: Bitmap16::new(0, 0),
        }
    }

    pub fn reset(&mut self) {
        self.regs.reset();
    }

    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Board-specific offset from sprite coordinates to plane coordinates.
    pub fn set_display_offset(&mut self, offset_x: i32, offset_y: i32) {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
    }

    #[must_use]
    pub const fn display_offset(&self) -> (i32, i32) {
        (self.offset_x, self.offset_y)
    }

    /// Size the colour/attribute planes. Reallocates (and clears) only when
    /// the size changes.
    pub fn set_plane_size(&mut self, width: usize, height: usize) -> bool {
        let changed = self.color.resize(width, height);
        self.attr.resize(width, height);
        changed
    }

    #[must_use]
    pub fn color_plane(&self) -> &Bitmap16 {
        &self.color
    }

    #[must_use]
    pub fn attr_plane(&self) -> &Bitmap16 {
        &self.attr
    }

    /// Bucket active sprites by priority. Only one sprite per level is drawn:
    /// the last one in memory order.
    fn bucket(
        &self,
        snapshot: &SpriteSnapshot,
        stats: &mut FrameStats,
    ) -> [Option<usize>; PRIORITY_LEVELS] {
        let prixor = self.regs.priority_xor();
        let mut buckets = [None; PRIORITY_LEVELS];
        for (index, record) in snapshot.records().enumerate() {
            if !record.active() {
                continue;
            }
            let level = usize::from(record.priority() ^ prixor);
            if let Some(previous) = buckets[level] {
                stats.bucket_collisions += 1;
                tracing::debug!(
                    level = record.priority(),
                    previous,
                    sprite = index,
                    "sprite priority collision"
                );
            }
            buckets[level] = Some(index);
        }
        buckets
    }

    /// Render all sprites of `snapshot` into the planes, clipped to `clip`.
    pub fn render(
        &mut self,
        snapshot: &SpriteSnapshot,
        tiles: &dyn TileSource,
        wiring: &dyn ColorWiring,
        clip: Rect,
    ) -> Result<FrameStats, SpriteError> {
        if !clip.fits_within(self.color.width(), self.color.height()) {
            return Err(SpriteError::ClipOutOfBounds {
                clip,
                width: self.color.width(),
                height: self.color.height(),
            });
        }

        self.color.fill(0, clip);
        self.attr.fill(0, clip);

        let mut stats = FrameStats::default();
        if clip.is_empty() {
            return Ok(stats);
        }

        let buckets = self.bucket(snapshot, &mut stats);
        for index in buckets.into_iter().flatten() {
            let record = snapshot.record(index);
            match self.draw_sprite(&record, tiles, wiring, clip) {
                SpriteOutcome::Drawn => stats.sprites_drawn += 1,
                SpriteOutcome::WriteProtected => stats.write_protected += 1,
                SpriteOutcome::Offscreen => {}
            }
        }
        Ok(stats)
    }

    fn draw_sprite(
        &mut self,
        record: &SpriteRecord,
        tiles: &dyn TileSource,
        wiring: &dyn ColorWiring,
        clip: Rect,
    ) -> SpriteOutcome {
        let is_053247 = self.variant == Variant::K053247;
        let regs = &self.regs;

        let block = if is_053247 {
            crate::regs::AttributeBlock::default()
        } else {
            regs.attribute_block(record.attribute_block())
        };
        if block.write_flag() != regs.write_invert() {
            return SpriteOutcome::WriteProtected;
        }

        let mut tile_base = u32::from(record.tile());
        if !is_053247 {
            let bank = regs.tile_bank(usize::from(record.tile() >> 14));
            tile_base = (tile_base & 0x3fff) | (u32::from(bank) << 14);
        }
        let dx = UNWRAP[(tile_base & 0x1f) as usize];
        let dy = UNWRAP[((tile_base >> 1) & 0x1f) as usize];
        tile_base &= !0x3f;

        let ly = generate(
            &AxisParams {
                scan_min: clip.min_y - self.offset_y,
                scan_max: clip.max_y - self.offset_y,
                screen_center: (0u16.wrapping_sub(record.y()).wrapping_sub(regs.vscroll())) & 0x3ff,
                size_order: record.size_order_y(),
                zoom: record.zoom_y(),
                flip: record.flip_y(),
                mirror: record.mirror_y(),
                global_flip: regs.flip_y(),
            },
            &Y_TILE_STEPS[dy..],
        );
        if ly.is_empty() {
            return SpriteOutcome::Offscreen;
        }

        let lx = generate(
            &AxisParams {
                scan_min: clip.min_x - self.offset_x,
                scan_max: clip.max_x - self.offset_x,
                screen_center: record.x().wrapping_sub(regs.hscroll()) & 0x3ff,
                size_order: record.size_order_x(),
                zoom: record.zoom_x(),
                flip: record.flip_x(),
                mirror: record.mirror_x(),
                global_flip: regs.flip_x(),
            },
            &X_TILE_STEPS[dx..],
        );
        if lx.is_empty() {
            return SpriteOutcome::Offscreen;
        }

        let bpp = regs.bpp(self.variant);
        let top_code = ((1u32 << bpp) - 1) as u8;
        let attributes = u32::from(record.attributes());
        let (info_shadow, info_plain, trans_mask) = if is_053247 {
            let info = (attributes & 0xfff) << 4;
            let plain_mask = if regs.shadow_keep() { 0x3fff } else { 0x7fff };
            (info, info & plain_mask, top_code)
        } else {
            let coreg = (u32::from(regs.color_offset()) << 12) & (0xf00 << bpp);
            let info = ((attributes & 0xf00) << 8) | (u32::from(record.color()) << bpp) | coreg;
            let plain_mask = if regs.shadow_keep() { 0x3ffff } else { 0x7ffff };
            let trans = ((0xffu32 << block.transparency_shift()) & u32::from(top_code)) as u8;
            (info, info & plain_mask, trans)
        };

        let plain = wiring.wire(info_plain);
        let shadowed = wiring.wire(info_shadow);

        let write = if regs.priority_select() || !regs.shadow_keep() {
            WriteMode::Force
        } else {
            WriteMode::Keep { mask: KEEP_MASK }
        };
        let shadow = if record.shadow_mode() != 0 {
            ShadowDetect::Detect {
                top_code,
                shadow_palette: shadowed.palette,
                shadow_attr: shadowed.attr,
            }
        } else {
            ShadowDetect::Plain
        };
        let blit = TileBlit {
            palette: plain.palette,
            attr: plain.attr,
            trans_mask,
            write,
            shadow,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        };

        for sy in ly.iter() {
            for sx in lx.iter() {
                // Deltas occupy disjoint bits below the cleared base bits.
                let id = tile_base | sx.tile_id_delta | sy.tile_id_delta;
                draw_tile(&mut self.color, &mut self.attr, tiles.tile(id), &blit, sx, sy);
            }
        }
        SpriteOutcome::Drawn
    }
}

enum SpriteOutcome {
    Drawn,
    WriteProtected,
    Offscreen,
}

impl Default for K053246 {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}

impl Observable for K053246 {
    fn query(&self, path: &str) -> Option<Value> {
        let regs = &self.regs;
        if let Some(rest) = path.strip_prefix("tile_bank.") {
            let bank: usize = rest.parse().ok()?;
            return (bank < 4).then(|| regs.tile_bank(bank).into());
        }
        if let Some(rest) = path.strip_prefix("attribute_block.") {
            let block: usize = rest.parse().ok()?;
            return (block < 4).then(|| regs.attribute_block(block).raw().into());
        }
        match path {
            "variant" => Some(
                match self.variant {
                    Variant::K053247 => "053247",
                    Variant::K055673 => "055673",
                }
                .into(),
            ),
            "hscroll" => Some(regs.hscroll().into()),
            "vscroll" => Some(regs.vscroll().into()),
            "flip_x" => Some(regs.flip_x().into()),
            "flip_y" => Some(regs.flip_y().into()),
            "dma" => Some(regs.dma_enabled().into()),
            "shadow_keep" => Some(regs.shadow_keep().into()),
            "bpp" => Some(regs.bpp(self.variant).into()),
            "priority_xor" => Some(regs.priority_xor().into()),
            "write_invert" => Some(regs.write_invert().into()),
            "priority_select" => Some(regs.priority_select().into()),
            "wrap" => Some(regs.wrap().into()),
            "rom_readback" => Some(regs.rom_readback().into()),
            "color_offset" => Some(regs.color_offset().into()),
            "offset" => Some(Value::Array(vec![self.offset_x.into(), self.offset_y.into()])),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "variant",
            "hscroll",
            "vscroll",
            "flip_x",
            "flip_y",
            "dma",
            "shadow_keep",
            "bpp",
            "priority_xor",
            "write_invert",
            "priority_select",
            "wrap",
            "rom_readback",
            "color_offset",
            "offset",
            "tile_bank.<0-3>",
            "attribute_block.<0-3>",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observable_decodes_registers() {
        let mut chip = K053246::new(Variant::K055673);
        chip.regs.write_opset(0x14);
        chip.regs.set_tile_bank(2, 0x1f);
        assert_eq!(chip.query("bpp"), Some(Value::U32(8)));
        assert_eq!(chip.query("priority_xor"), Some(Value::U8(0)));
        assert_eq!(chip.query("tile_bank.2"), Some(Value::U8(0x0f)));
        assert_eq!(chip.query("tile_bank.4"), None);
        assert_eq!(chip.query("variant"), Some(Value::String("055673".into())));

        let old = K053246::new(Variant::K053247);
        assert_eq!(old.query("bpp"), Some(Value::U32(4)));
    }

    #[test]
    fn plane_resize_reports_change_once() {
        let mut chip = K053246::default();
        assert!(chip.set_plane_size(64, 32));
        assert!(!chip.set_plane_size(64, 32));
        assert_eq!(chip.attr_plane().width(), 64);
        assert_eq!(chip.color_plane().height(), 32);
    }
}
