//! One video frame: sprite pass, then mixer pass.

use emu_core::{Observable, Value};
use konami_k053246::{ColorWiring, FrameStats, K053246, SpriteSnapshot, TileSource};
use konami_k055555::{K055555, Layer, LayerInputs};

use crate::config::VideoConfig;
use crate::error::VideoError;

/// Capabilities the sprite pass needs from the board.
#[derive(Clone, Copy, Default)]
pub struct FrameSources<'a> {
    pub tiles: Option<&'a dyn TileSource>,
    pub wiring: Option<&'a dyn ColorWiring>,
}

impl<'a> FrameSources<'a> {
    #[must_use]
    pub fn new(tiles: &'a dyn TileSource, wiring: &'a dyn ColorWiring) -> Self {
        Self {
            tiles: Some(tiles),
            wiring: Some(wiring),
        }
    }
}

/// The sprite generator and priority encoder of a Konami GX-style board.
pub struct GxVideo {
    config: VideoConfig,
    sprites: K053246,
    mixer: K055555,
    frames: u32,
}

impl GxVideo {
    #[must_use]
    pub fn new(config: VideoConfig) -> Self {
        let mut video = Self {
            sprites: K053246::new(config.sprite_chip.into()),
            mixer: K055555::new(),
            config,
            frames: 0,
        };
        video.apply_config();
        video
    }

    fn apply_config(&mut self) {
        let c = &self.config;
        self.sprites.set_display_offset(c.sprite_offset_x, c.sprite_offset_y);
        self.mixer.set_background(c.background_color, c.background_attr);
    }

    /// Reset both chips to power-on register state. Calibration stays.
    pub fn reset(&mut self) {
        self.sprites.reset();
        self.mixer.reset();
        self.apply_config();
        self.frames = 0;
    }

    #[must_use]
    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    #[must_use]
    pub fn sprites(&self) -> &K053246 {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut K053246 {
        &mut self.sprites
    }

    #[must_use]
    pub fn mixer(&self) -> &K055555 {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut K055555 {
        &mut self.mixer
    }

    #[must_use]
    pub const fn frames(&self) -> u32 {
        self.frames
    }

    /// Render one frame. `layers` carries the tilemap and auxiliary planes;
    /// the sprite planes are plugged in as the OBJ layer.
    pub fn render_frame(
        &mut self,
        snapshot: &SpriteSnapshot,
        sources: &FrameSources<'_>,
        layers: LayerInputs<'_>,
    ) -> Result<FrameStats, VideoError> {
        let tiles = sources.tiles.ok_or(VideoError::MissingTileSource)?;
        let wiring = sources.wiring.ok_or(VideoError::MissingColorWiring)?;

        let (width, height) = (self.config.width, self.config.height);
        let resized = self.sprites.set_plane_size(width, height);
        if self.mixer.set_plane_size(width, height) || resized {
            tracing::debug!(width, height, "video planes reallocated");
        }

        let visible = self.config.visible;
        let stats = self.sprites.render(snapshot, tiles, wiring, visible)?;

        let mut inputs = layers;
        inputs.set_layer(
            Layer::Obj,
            self.sprites.color_plane(),
            Some(self.sprites.attr_plane()),
        );
        self.mixer.mix(&inputs, visible)?;

        self.frames = self.frames.wrapping_add(1);
        tracing::trace!(
            frame = self.frames,
            sprites = stats.sprites_drawn,
            collisions = stats.bucket_collisions,
            "frame rendered"
        );
        Ok(stats)
    }
}

impl Observable for GxVideo {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("sprite.") {
            return self.sprites.query(rest);
        }
        if let Some(rest) = path.strip_prefix("mixer.") {
            return self.mixer.query(rest);
        }
        match path {
            "frames" => Some(self.frames.into()),
            "width" => Some((self.config.width as u32).into()),
            "height" => Some((self.config.height as u32).into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &["frames", "width", "height", "sprite.<path>", "mixer.<path>"]
    }
}
