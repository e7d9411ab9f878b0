//! The mixing pass: eight inputs in, front and back planes out.

use emu_core::{Bitmap16, Observable, Rect, Value};

use crate::error::MixerError;
use crate::layer::{LAYER_COUNT, Layer, LayerConfig};
use crate::regs::MixerRegisters;

/// Colour plane of one input and, for OBJ/SUB layers, its attribute plane.
#[derive(Debug, Clone, Copy)]
pub struct LayerPlanes<'a> {
    pub color: &'a Bitmap16,
    pub attr: Option<&'a Bitmap16>,
}

/// Borrowed input planes for one pass. Absent layers are fully transparent.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerInputs<'a> {
    layers: [Option<LayerPlanes<'a>>; LAYER_COUNT],
    background: Option<(&'a Bitmap16, &'a Bitmap16)>,
}

impl<'a> LayerInputs<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layer(mut self, layer: Layer, color: &'a Bitmap16, attr: Option<&'a Bitmap16>) -> Self {
        self.set_layer(layer, color, attr);
        self
    }

    pub fn set_layer(&mut self, layer: Layer, color: &'a Bitmap16, attr: Option<&'a Bitmap16>) {
        self.layers[layer.index()] = Some(LayerPlanes { color, attr });
    }

    /// Per-pixel background (e.g. a scanline gradient) replacing the solid
    /// background colour.
    #[must_use]
    pub fn with_background(mut self, color: &'a Bitmap16, attr: &'a Bitmap16) -> Self {
        self.background = Some((color, attr));
        self
    }

    #[must_use]
    pub fn layer(&self, layer: Layer) -> Option<LayerPlanes<'a>> {
        self.layers[layer.index()]
    }

    fn check(&self, clip: Rect) -> Result<(), MixerError> {
        let fits = |layer: &'static str, plane: &Bitmap16| {
            if clip.fits_within(plane.width(), plane.height()) {
                Ok(())
            } else {
                Err(MixerError::PlaneSize {
                    layer,
                    width: plane.width(),
                    height: plane.height(),
                    clip,
                })
            }
        };
        for layer in Layer::ALL {
            if let Some(planes) = self.layer(layer) {
                fits(layer.name(), planes.color)?;
                if let Some(attr) = planes.attr {
                    fits(layer.name(), attr)?;
                }
            }
        }
        if let Some((color, attr)) = self.background {
            fits("background", color)?;
            fits("background", attr)?;
        }
        Ok(())
    }
}

/// A layer pixel competing for front or back.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    key: u16,
    color: u16,
    attr: u16,
}

/// Front/back pair for one pixel. Front always holds the lower key.
#[derive(Debug, Clone, Copy, Default)]
struct Selection {
    front: Option<Candidate>,
    back: Option<Candidate>,
}

impl Selection {
    /// Cannot displace anything: ties go to the earlier layer.
    fn rejects(&self, key: u16) -> bool {
        self.back.is_some_and(|b| key >= b.key)
    }

    fn insert(&mut self, candidate: Candidate) {
        match self.front {
            Some(front) if candidate.key >= front.key => {
                if self.back.is_none_or(|b| candidate.key < b.key) {
                    self.back = Some(candidate);
                }
            }
            _ => {
                self.back = self.front;
                self.front = Some(candidate);
            }
        }
    }
}

/// The 055555 priority encoder.
pub struct K055555 {
    pub regs: MixerRegisters,
    background: (u16, u16),
    front_color: Bitmap16,
    front_attr: Bitmap16,
    back_color: Bitmap16,
    back_attr: Bitmap16,
}

impl K055555 {
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: MixerRegisters::new(),
            background: (0, 0),
            front_color: Bitmap16::new(0, 0),
            front_attr: Bitmap16::new(0, 0),
            back_color: Bitmap16::new(0, 0),
            back_attr: Bitmap16::new(0, 0),
        }
    }

    pub fn reset(&mut self) {
        self.regs.reset();
    }

    /// Solid background shown wherever no layer is visible. The background
    /// colour block supplies colour bits 10 and up.
    pub fn set_background(&mut self, color: u16, attr: u16) {
        self.background = (color, attr);
    }

    #[must_use]
    pub const fn background(&self) -> (u16, u16) {
        self.background
    }

    /// Size the output planes. Reallocates (and clears) only when the size
    /// changes.
    pub fn set_plane_size(&mut self, width: usize, height: usize) -> bool {
        let changed = self.front_color.resize(width, height);
        self.front_attr.resize(width, height);
        self.back_color.resize(width, height);
        self.back_attr.resize(width, height);
        changed
    }

    #[must_use]
    pub fn front_color(&self) -> &Bitmap16 {
        &self.front_color
    }

    #[must_use]
    pub fn front_attr(&self) -> &Bitmap16 {
        &self.front_attr
    }

    #[must_use]
    pub fn back_color(&self) -> &Bitmap16 {
        &self.back_color
    }

    #[must_use]
    pub fn back_attr(&self) -> &Bitmap16 {
        &self.back_attr
    }

    /// Mix `inputs` into the front/back planes over `clip`.
    pub fn mix(&mut self, inputs: &LayerInputs<'_>, clip: Rect) -> Result<(), MixerError> {
        let (width, height) = (self.front_color.width(), self.front_color.height());
        if !clip.fits_within(width, height) {
            return Err(MixerError::ClipOutOfBounds { clip, width, height });
        }
        inputs.check(clip)?;
        if clip.is_empty() {
            return Ok(());
        }

        let configs: [LayerConfig; LAYER_COUNT] = Layer::ALL.map(|l| self.regs.layer_config(l));
        let key_xor = self.regs.key_xor();
        let obj_attr = inputs.layer(Layer::Obj).and_then(|p| p.attr);
        let solid = (
            self.background.0 | (u16::from(self.regs.background_block()) << 10),
            self.background.1,
        );

        for y in clip.min_y as usize..=clip.max_y as usize {
            for x in clip.min_x as usize..=clip.max_x as usize {
                let mut sel = Selection::default();
                for config in configs.iter().filter(|c| c.display) {
                    let Some(planes) = inputs.layer(config.layer) else {
                        continue;
                    };
                    let color = config.input_color(planes.color.pix(x, y));
                    if !config.is_opaque(color) {
                        continue;
                    }
                    let attr = planes.attr.map_or(0, |a| a.pix(x, y));
                    let priority = config.pixel_priority(color, attr);
                    let key = ((u16::from(priority) << 3) | config.layer.index() as u16) ^ key_xor;
                    if sel.rejects(key) {
                        continue;
                    }
                    sel.insert(Candidate {
                        key,
                        color: config.output_color(color, attr),
                        attr: config.output_attr(color, attr),
                    });
                }

                // Shadow group comes from the sprite attribute plane.
                let group = obj_attr.map_or(0, |a| (a.pix(x, y) >> 8) & 3) as usize;
                let table = self.regs.shadow_table(group);
                let resolve = |c: Candidate| {
                    let mut attr = c.attr;
                    if attr & 1 != 0 {
                        attr ^= table.xor_value(((c.key ^ key_xor) >> 3) as u8);
                    }
                    (c.color, attr)
                };
                let background = match inputs.background {
                    Some((color, attr)) => (color.pix(x, y), attr.pix(x, y)),
                    None => solid,
                };
                let front = sel.front.map_or(background, resolve);
                let back = sel.back.map_or(background, resolve);

                self.front_color.set_pix(x, y, front.0);
                self.front_attr.set_pix(x, y, front.1);
                self.back_color.set_pix(x, y, back.0);
                self.back_attr.set_pix(x, y, back.1);
            }
        }
        Ok(())
    }
}

impl Default for K055555 {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable for K055555 {
    fn query(&self, path: &str) -> Option<Value> {
        let regs = &self.regs;
        if let Some(rest) = path.strip_prefix("layer.") {
            let (name, field) = rest.split_once('.')?;
            let config = regs.layer_config(Layer::from_name(name)?);
            return match field {
                "priority" => Some(config.priority.into()),
                "display" => Some(config.display.into()),
                "shadow" => Some(config.shadow.into()),
                "color_mask" => Some(config.color_mask.into()),
                "color_block" => Some(config.color_block.into()),
                "override" => Some(match config.priority_override {
                    Some(o) => Value::Array(vec![o.priority.into(), o.threshold.into()]),
                    None => false.into(),
                }),
                _ => None,
            };
        }
        if let Some(rest) = path.strip_prefix("shadow.") {
            let (group, field) = rest.split_once('.')?;
            let group: usize = group.parse().ok()?;
            if !(1..=3).contains(&group) {
                return None;
            }
            return match field {
                "mode" => Some(regs.shadow_mode(group).name().into()),
                "threshold" => Some(regs.shadow_threshold(group).into()),
                "flagged" => Some((regs.shadow_table(group).flagged_count() as u32).into()),
                _ => None,
            };
        }
        match path {
            "priority_invert" => Some(regs.priority_invert().into()),
            "gradient" => Some(regs.gradient().into()),
            "gradient_horizontal" => Some(regs.gradient_horizontal().into()),
            "background_block" => Some(regs.background_block().into()),
            "background" => Some(Value::Array(vec![
                self.background.0.into(),
                self.background.1.into(),
            ])),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "priority_invert",
            "gradient",
            "gradient_horizontal",
            "background_block",
            "background",
            "layer.<name>.priority",
            "layer.<name>.display",
            "layer.<name>.shadow",
            "layer.<name>.color_mask",
            "layer.<name>.color_block",
            "layer.<name>.override",
            "shadow.<1-3>.mode",
            "shadow.<1-3>.threshold",
            "shadow.<1-3>.flagged",
        ]
    }
}
