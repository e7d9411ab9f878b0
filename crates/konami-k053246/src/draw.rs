//! Tile blitter: one source tile, one X span, one Y span.

use emu_core::Bitmap16;

use crate::layout::{TEXEL_FRAC_BITS, TileLayout};
use crate::source::{TILE_SIZE, TilePixels};

/// How an opaque pixel treats the attribute already in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the attribute word.
    Force,
    /// Keep the masked bits of the existing attribute and OR the new one in,
    /// so shadow bits laid down by an earlier sprite survive.
    Keep { mask: u16 },
}

/// How the top colour code is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowDetect {
    /// Only the transparency mask matters.
    Plain,
    /// Pixels whose index has every `top_code` bit set become shadow pixels:
    /// `shadow_palette` with no detail and `shadow_attr`, always forced.
    Detect {
        top_code: u8,
        shadow_palette: u16,
        shadow_attr: u16,
    },
}

/// Per-sprite constants shared by every tile of the sprite.
#[derive(Debug, Clone, Copy)]
pub struct TileBlit {
    pub palette: u16,
    pub attr: u16,
    pub trans_mask: u8,
    pub write: WriteMode,
    pub shadow: ShadowDetect,
    /// Screen-to-plane offset.
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Draw the part of `pixels` described by `lx` x `ly`.
///
/// Span coordinates plus the blit offset must land inside both planes; the
/// sprite pass guarantees this by deriving spans from the clip rectangle.
pub fn draw_tile(
    color: &mut Bitmap16,
    attr: &mut Bitmap16,
    pixels: &TilePixels,
    blit: &TileBlit,
    lx: &TileLayout,
    ly: &TileLayout,
) {
    let x0 = (lx.screen_min + blit.offset_x) as usize;
    let width = lx.len() as usize;

    let mut typ = ly.texel_start;
    for y in ly.screen_min..=ly.screen_max {
        let row_start = TILE_SIZE * (typ >> TEXEL_FRAC_BITS) as usize;
        let src = &pixels[row_start..row_start + TILE_SIZE];
        let py = (y + blit.offset_y) as usize;
        let dst_color = &mut color.row_mut(py)[x0..x0 + width];
        let dst_attr = &mut attr.row_mut(py)[x0..x0 + width];

        let mut txp = lx.texel_start;
        for (bc, ba) in dst_color.iter_mut().zip(dst_attr.iter_mut()) {
            let col = src[(txp >> TEXEL_FRAC_BITS) as usize];
            txp += lx.step;

            if let ShadowDetect::Detect {
                top_code,
                shadow_palette,
                shadow_attr,
            } = blit.shadow
            {
                if col & top_code == top_code {
                    *bc = shadow_palette;
                    *ba = shadow_attr;
                    continue;
                }
            }

            if col & blit.trans_mask == 0 {
                continue;
            }
            *bc = blit.palette | u16::from(col);
            *ba = match blit.write {
                WriteMode::Force => blit.attr,
                WriteMode::Keep { mask } => (*ba & mask) | blit.attr,
            };
        }
        typ += ly.step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ZOOM_UNITY;

    fn span(min: i32, max: i32) -> TileLayout {
        TileLayout {
            screen_min: min,
            screen_max: max,
            texel_start: 0,
            step: i32::from(ZOOM_UNITY),
            tile_id_delta: 0,
        }
    }

    fn blit(write: WriteMode, shadow: ShadowDetect) -> TileBlit {
        TileBlit {
            palette: 0x100,
            attr: 0x0040,
            trans_mask: 0x0f,
            write,
            shadow,
            offset_x: 0,
            offset_y: 0,
        }
    }

    fn ramp() -> TilePixels {
        let mut t = [0u8; 256];
        for (i, p) in t.iter_mut().enumerate() {
            *p = (i % 16) as u8;
        }
        t
    }

    #[test]
    fn transparent_pixels_leave_planes_untouched() {
        let mut color = Bitmap16::new(16, 1);
        let mut attr = Bitmap16::new(16, 1);
        color.set_pix(0, 0, 0xaaaa);
        attr.set_pix(0, 0, 0xbbbb);
        draw_tile(
            &mut color,
            &mut attr,
            &ramp(),
            &blit(WriteMode::Force, ShadowDetect::Plain),
            &span(0, 15),
            &span(0, 0),
        );
        assert_eq!(color.pix(0, 0), 0xaaaa);
        assert_eq!(attr.pix(0, 0), 0xbbbb);
        assert_eq!(color.pix(5, 0), 0x105);
        assert_eq!(attr.pix(5, 0), 0x0040);
    }

    #[test]
    fn keep_mode_preserves_masked_attribute_bits() {
        let mut color = Bitmap16::new(16, 1);
        let mut attr = Bitmap16::new(16, 1);
        attr.row_mut(0).fill(0x0f0f);
        draw_tile(
            &mut color,
            &mut attr,
            &ramp(),
            &blit(WriteMode::Keep { mask: 0x0300 }, ShadowDetect::Plain),
            &span(0, 15),
            &span(0, 0),
        );
        assert_eq!(attr.pix(3, 0), 0x0340);
        assert_eq!(attr.pix(0, 0), 0x0f0f);
    }

    #[test]
    fn detect_mode_turns_top_code_into_shadow() {
        let mut color = Bitmap16::new(16, 1);
        let mut attr = Bitmap16::new(16, 1);
        attr.row_mut(0).fill(0x0300);
        draw_tile(
            &mut color,
            &mut attr,
            &ramp(),
            &blit(
                WriteMode::Keep { mask: 0x0300 },
                ShadowDetect::Detect {
                    top_code: 0x0f,
                    shadow_palette: 0x200,
                    shadow_attr: 0x0100,
                },
            ),
            &span(0, 15),
            &span(0, 0),
        );
        assert_eq!(color.pix(15, 0), 0x200);
        assert_eq!(attr.pix(15, 0), 0x0100);
        assert_eq!(color.pix(14, 0), 0x10e);
        assert_eq!(attr.pix(14, 0), 0x0340);
    }

    #[test]
    fn negative_step_reads_tile_backwards() {
        let mut color = Bitmap16::new(16, 1);
        let mut attr = Bitmap16::new(16, 1);
        let lx = TileLayout {
            screen_min: 0,
            screen_max: 15,
            texel_start: 0x3ff,
            step: -i32::from(ZOOM_UNITY),
            tile_id_delta: 0,
        };
        draw_tile(
            &mut color,
            &mut attr,
            &ramp(),
            &blit(WriteMode::Force, ShadowDetect::Plain),
            &lx,
            &span(0, 0),
        );
        assert_eq!(color.pix(0, 0), 0x10f);
        assert_eq!(color.pix(14, 0), 0x101);
    }

    #[test]
    fn offsets_shift_destination() {
        let mut color = Bitmap16::new(20, 4);
        let mut attr = Bitmap16::new(20, 4);
        let mut b = blit(WriteMode::Force, ShadowDetect::Plain);
        b.offset_x = 4;
        b.offset_y = 2;
        draw_tile(&mut color, &mut attr, &ramp(), &b, &span(0, 15), &span(0, 0));
        assert_eq!(color.pix(5, 2), 0x101);
        assert_eq!(color.pix(1, 0), 0);
    }
}
