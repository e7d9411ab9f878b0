//! Capabilities the sprite pass borrows from its installation.

/// Pixels per tile edge.
pub const TILE_SIZE: usize = 16;

/// Decoded pixels of one tile, row-major, one colour index per byte.
pub type TilePixels = [u8; TILE_SIZE * TILE_SIZE];

/// Source of decoded tile pixel data.
///
/// ROM unpacking (planar for the 055673, chunky for the 053247) belongs to the
/// implementor; the sprite pass only ever sees decoded indices.
pub trait TileSource {
    fn tile(&self, id: u32) -> &TilePixels;
}

/// Palette base and attribute word produced for a sprite colour code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WiredColor {
    pub palette: u16,
    pub attr: u16,
}

/// Board-specific routing of the sprite chip's colour outputs.
///
/// The chip emits a combined colour/attribute code; how those lines reach the
/// palette and the mixer differs between boards.
pub trait ColorWiring {
    fn wire(&self, info: u32) -> WiredColor;
}

impl<F> ColorWiring for F
where
    F: Fn(u32) -> WiredColor,
{
    fn wire(&self, info: u32) -> WiredColor {
        self(info)
    }
}

/// Tile store over an in-memory list of decoded tiles.
///
/// Ids past the end wrap, as a ROM address decoder would.
#[derive(Debug, Clone, Default)]
pub struct DecodedTiles {
    tiles: Vec<TilePixels>,
}

impl DecodedTiles {
    const BLANK: TilePixels = [0; TILE_SIZE * TILE_SIZE];

    #[must_use]
    pub fn new(tiles: Vec<TilePixels>) -> Self {
        Self { tiles }
    }

    /// A single tile filled with one colour index, repeated `count` times.
    #[must_use]
    pub fn solid(count: usize, index: u8) -> Self {
        Self {
            tiles: vec![[index; TILE_SIZE * TILE_SIZE]; count],
        }
    }

    pub fn push(&mut self, tile: TilePixels) {
        self.tiles.push(tile);
    }

    pub fn tile_mut(&mut self, id: usize) -> Option<&mut TilePixels> {
        self.tiles.get_mut(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl TileSource for DecodedTiles {
    fn tile(&self, id: u32) -> &TilePixels {
        if self.tiles.is_empty() {
            return &Self::BLANK;
        }
        &self.tiles[id as usize % self.tiles.len()]
    }
}

/// Straight-through wiring: the low 16 info bits address the palette and the
/// shadow-mode lines (info bits 18-19) drive the mixer's shadow group bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearWiring;

impl ColorWiring for LinearWiring {
    fn wire(&self, info: u32) -> WiredColor {
        WiredColor {
            palette: info as u16,
            attr: (((info >> 18) & 3) << 8) as u16,
        }
    }
}
