//! Per-axis tile layout generation for zoomed sprites.
//!
//! A sprite is `16 << size_order` texels wide on each axis. The hardware
//! walks a fixed-point texel cursor (6 fractional bits) one screen pixel at a
//! time, adding the zoom value per pixel, and starts a new span every time the
//! cursor crosses into the next 16-texel source tile. Zoom need not divide a
//! tile evenly, so the crossings are found by stepping rather than computed.

use std::ops::Deref;

/// Fractional bits of the texel cursor.
pub const TEXEL_FRAC_BITS: u32 = 6;

/// Zoom value that maps one screen pixel to one texel.
pub const ZOOM_UNITY: u16 = 1 << TEXEL_FRAC_BITS;

/// Upper bound on spans per axis.
pub const MAX_SEGMENTS: usize = 16;

/// Screen coordinates wrap at this value (10-bit position registers).
pub const SCREEN_WRAP: i32 = 1024;

const TILE_SHIFT: u32 = 4 + TEXEL_FRAC_BITS;
const TILE_TEXEL_MASK: i32 = (1 << TILE_SHIFT) - 1;

/// One span of screen pixels that reads from a single source tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileLayout {
    /// First screen pixel of the span (inclusive).
    pub screen_min: i32,
    /// Last screen pixel of the span (inclusive).
    pub screen_max: i32,
    /// Texel cursor inside the tile at `screen_min`, 4.6 fixed point.
    pub texel_start: i32,
    /// Signed cursor advance per screen pixel.
    pub step: i32,
    /// Tile id offset of this span's sub-tile within the sprite.
    pub tile_id_delta: u32,
}

impl TileLayout {
    /// Number of screen pixels covered.
    #[must_use]
    pub const fn len(&self) -> i32 {
        self.screen_max - self.screen_min + 1
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.screen_max < self.screen_min
    }
}

/// Inputs for one axis of one sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisParams {
    /// First visible screen coordinate (inclusive).
    pub scan_min: i32,
    /// Last visible screen coordinate (inclusive).
    pub scan_max: i32,
    /// Screen position of the sprite's centre, 10 bits.
    pub screen_center: u16,
    /// 0..=3, giving 1, 2, 4 or 8 tiles on this axis.
    pub size_order: u8,
    /// Texel advance per screen pixel, 10 bits, [`ZOOM_UNITY`] is 1:1.
    pub zoom: u16,
    pub flip: bool,
    /// Second half of the sprite reads the first half backwards.
    pub mirror: bool,
    /// Screen-wide flip for this axis.
    pub global_flip: bool,
}

/// Fixed-capacity, ordered list of spans for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayouts {
    items: [TileLayout; MAX_SEGMENTS],
    len: usize,
}

impl TileLayouts {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: [TileLayout {
                screen_min: 0,
                screen_max: 0,
                texel_start: 0,
                step: 0,
                tile_id_delta: 0,
            }; MAX_SEGMENTS],
            len: 0,
        }
    }

    fn push(&mut self, layout: TileLayout) {
        debug_assert!(self.len < MAX_SEGMENTS, "tile layout overflow");
        if self.len < MAX_SEGMENTS {
            self.items[self.len] = layout;
            self.len += 1;
        }
    }

    /// Total screen pixels covered by all spans.
    #[must_use]
    pub fn covered(&self) -> i32 {
        self.iter().map(TileLayout::len).sum()
    }
}

impl Default for TileLayouts {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TileLayouts {
    type Target = [TileLayout];

    fn deref(&self) -> &Self::Target {
        &self.items[..self.len]
    }
}

/// Texel addressing regime for the two halves of a sprite.
struct Addressing {
    xor: [i32; 2],
    step: [i32; 2],
}

impl Addressing {
    fn select(order: u32, zoom: i32, flip: bool, mirror: bool) -> Self {
        let full = (1 << (order + TILE_SHIFT)) - 1;
        if mirror {
            Self {
                xor: [0, full],
                step: [zoom, -zoom],
            }
        } else if flip {
            Self {
                xor: [full, full],
                step: [-zoom, -zoom],
            }
        } else {
            Self {
                xor: [0, 0],
                step: [zoom, zoom],
            }
        }
    }
}

/// Split one axis of a sprite into tile-aligned spans.
///
/// `tile_id_steps` maps a sub-tile position (0..`1 << size_order`) to the
/// tile id offset for that position. The result is empty when the sprite is
/// entirely outside `scan_min..=scan_max`.
#[must_use]
pub fn generate(params: &AxisParams, tile_id_steps: &[u32]) -> TileLayouts {
    let mut out = TileLayouts::new();

    let order = u32::from(params.size_order & 3);
    let zoom = i32::from(params.zoom & 0x3ff);
    let half_bit = 1i32 << (order + TILE_SHIFT - 1);
    let limit = 1i32 << (order + TILE_SHIFT);

    let mut center = i32::from(params.screen_center & 0x3ff);
    let mut flip = params.flip;
    if params.global_flip {
        center = SCREEN_WRAP - 1 - center;
        flip = !flip;
    }
    let addressing = Addressing::select(order, zoom, flip, params.mirror);

    let open = |tpos: i32, spos: i32| {
        let half = usize::from(tpos & half_bit != 0);
        let pp = tpos ^ addressing.xor[half];
        TileLayout {
            screen_min: spos,
            screen_max: spos,
            texel_start: pp & TILE_TEXEL_MASK,
            step: addressing.step[half],
            tile_id_delta: tile_id_steps[(pp >> TILE_SHIFT) as usize],
        }
    };

    // The cursor starts at the sprite centre; move it to the first visible pixel.
    let mut tpos = half_bit;
    let mut spos = center;
    if spos < params.scan_min {
        while tpos < limit && spos < params.scan_min {
            spos += 1;
            tpos += zoom;
        }
        if tpos >= limit {
            return out;
        }
    } else {
        while tpos > 0 && spos > params.scan_min {
            spos -= 1;
            tpos -= zoom;
        }
        if tpos < 0 {
            tpos += zoom;
            spos += 1;
        }
    }
    if spos > params.scan_max {
        return out;
    }

    let mut current = open(tpos, spos);
    let mut tile = tpos >> TILE_SHIFT;
    loop {
        tpos += zoom;
        if tpos >= limit || spos == params.scan_max {
            current.screen_max = spos;
            out.push(current);
            break;
        }
        spos += 1;
        let next_tile = tpos >> TILE_SHIFT;
        if next_tile != tile {
            current.screen_max = spos - 1;
            out.push(current);
            tile = next_tile;
            current = open(tpos, spos);
        }
    }

    out
}
