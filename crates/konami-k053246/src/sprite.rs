//! Sprite RAM records and the per-frame snapshot.
//!
//! Sprite RAM holds 256 records of eight 16-bit words:
//!
//! ```text
//! w0  A Z Fy Fx  Sy Sy Sx Sx  P P P P P P P P    A active, Z X-zoom uses Y-zoom,
//!                                                 F flip, S size order, P priority
//! w1  tile code
//! w2  Y position (screen Y grows as w2 shrinks)
//! w3  X position
//! w4  Y zoom (10 bits)
//! w5  X zoom (10 bits)
//! w6  My Mx . .  Sh Sh B B  C C C C C C C C       M mirror, Sh shadow mode,
//!                                                 B attribute block, C colour
//! w7  unused
//! ```

use crate::error::SpriteError;

pub const SPRITE_COUNT: usize = 256;
pub const WORDS_PER_SPRITE: usize = 8;
pub const SPRITE_RAM_WORDS: usize = SPRITE_COUNT * WORDS_PER_SPRITE;

/// One decoded view over an 8-word sprite record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteRecord {
    pub words: [u16; WORDS_PER_SPRITE],
}

impl SpriteRecord {
    #[must_use]
    pub const fn from_words(words: [u16; WORDS_PER_SPRITE]) -> Self {
        Self { words }
    }

    #[must_use]
    pub const fn active(&self) -> bool {
        self.words[0] & 0x8000 != 0
    }

    #[must_use]
    pub const fn priority(&self) -> u8 {
        (self.words[0] & 0xff) as u8
    }

    #[must_use]
    pub const fn size_order_x(&self) -> u8 {
        ((self.words[0] >> 8) & 3) as u8
    }

    #[must_use]
    pub const fn size_order_y(&self) -> u8 {
        ((self.words[0] >> 10) & 3) as u8
    }

    #[must_use]
    pub const fn flip_x(&self) -> bool {
        self.words[0] & 0x1000 != 0
    }

    #[must_use]
    pub const fn flip_y(&self) -> bool {
        self.words[0] & 0x2000 != 0
    }

    /// X reuses the Y zoom value.
    #[must_use]
    pub const fn zoom_locked(&self) -> bool {
        self.words[0] & 0x4000 != 0
    }

    #[must_use]
    pub const fn tile(&self) -> u16 {
        self.words[1]
    }

    #[must_use]
    pub const fn y(&self) -> u16 {
        self.words[2]
    }

    #[must_use]
    pub const fn x(&self) -> u16 {
        self.words[3]
    }

    #[must_use]
    pub const fn zoom_y(&self) -> u16 {
        self.words[4] & 0x3ff
    }

    #[must_use]
    pub const fn zoom_x(&self) -> u16 {
        if self.zoom_locked() {
            self.zoom_y()
        } else {
            self.words[5] & 0x3ff
        }
    }

    #[must_use]
    pub const fn attributes(&self) -> u16 {
        self.words[6]
    }

    #[must_use]
    pub const fn color(&self) -> u8 {
        (self.words[6] & 0xff) as u8
    }

    #[must_use]
    pub const fn attribute_block(&self) -> usize {
        ((self.words[6] >> 8) & 3) as usize
    }

    /// Non-zero selects shadow-colour detection for this sprite.
    #[must_use]
    pub const fn shadow_mode(&self) -> u8 {
        ((self.words[6] >> 10) & 3) as u8
    }

    #[must_use]
    pub const fn mirror_x(&self) -> bool {
        self.words[6] & 0x4000 != 0
    }

    #[must_use]
    pub const fn mirror_y(&self) -> bool {
        self.words[6] & 0x8000 != 0
    }
}

/// Immutable copy of sprite RAM taken by the capture step before a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSnapshot {
    words: Vec<u16>,
}

impl SpriteSnapshot {
    /// All-inactive snapshot (what sprite RAM reads as with DMA off).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            words: vec![0; SPRITE_RAM_WORDS],
        }
    }

    /// Snapshot from a 16-bit wide sprite RAM.
    pub fn from_words(words: &[u16]) -> Result<Self, SpriteError> {
        if words.len() != SPRITE_RAM_WORDS {
            return Err(SpriteError::SnapshotShape {
                expected: SPRITE_RAM_WORDS,
                actual: words.len(),
            });
        }
        Ok(Self {
            words: words.to_vec(),
        })
    }

    /// Snapshot from an 8-bit wide sprite RAM, big-endian word pairs.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, SpriteError> {
        if bytes.len() != SPRITE_RAM_WORDS * 2 {
            return Err(SpriteError::SnapshotShape {
                expected: SPRITE_RAM_WORDS * 2,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            words: bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect(),
        })
    }

    /// Snapshot from a 32-bit wide sprite RAM, high half first.
    pub fn from_u32_words(longs: &[u32]) -> Result<Self, SpriteError> {
        if longs.len() != SPRITE_RAM_WORDS / 2 {
            return Err(SpriteError::SnapshotShape {
                expected: SPRITE_RAM_WORDS / 2,
                actual: longs.len(),
            });
        }
        Ok(Self {
            words: longs
                .iter()
                .flat_map(|&l| [(l >> 16) as u16, l as u16])
                .collect(),
        })
    }

    #[must_use]
    pub fn record(&self, index: usize) -> SpriteRecord {
        let base = index * WORDS_PER_SPRITE;
        let mut words = [0u16; WORDS_PER_SPRITE];
        words.copy_from_slice(&self.words[base..base + WORDS_PER_SPRITE]);
        SpriteRecord::from_words(words)
    }

    /// Records in memory order.
    pub fn records(&self) -> impl Iterator<Item = SpriteRecord> + '_ {
        (0..SPRITE_COUNT).map(|i| self.record(i))
    }

    /// Overwrite one record. Used by drivers that build snapshots directly.
    pub fn set_record(&mut self, index: usize, record: SpriteRecord) {
        let base = (index % SPRITE_COUNT) * WORDS_PER_SPRITE;
        self.words[base..base + WORDS_PER_SPRITE].copy_from_slice(&record.words);
    }

    #[must_use]
    pub fn words(&self) -> &[u16] {
        &self.words
    }
}

impl Default for SpriteSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
