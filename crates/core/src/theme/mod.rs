use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::figure::{NamedColor, ShapeKind};

/// Chooses shapes, colors and fonts for new figures.
pub trait ThemeProvider: Send {
    fn pick_shape(&mut self) -> ShapeKind;
    fn pick_color(&mut self) -> NamedColor;
    fn pick_font(&mut self) -> String;
    /// Whether this theme's shapes can carry a face.
    fn supports_faces(&self) -> bool;
}

/// Serialisable description of a palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSettings {
    pub shapes: Vec<ShapeKind>,
    pub colors: Vec<NamedColor>,
    pub fonts: Vec<String>,
    pub faces: bool,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            shapes: ShapeKind::ALL.to_vec(),
            colors: NamedColor::ALL.to_vec(),
            fonts: vec![
                "Arial Rounded MT Bold".to_string(),
                "Comic Sans MS".to_string(),
                "Chalkboard".to_string(),
            ],
            faces: true,
        }
    }
}

/// Default theme: uniform choice over the enabled shapes, colors and fonts.
/// Empty sets fall back to a circle, red and the system font.
#[derive(Debug)]
pub struct Palette {
    settings: PaletteSettings,
    rng: StdRng,
}

impl Palette {
    pub fn new(settings: PaletteSettings) -> Self {
        Self {
            settings,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(settings: PaletteSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &PaletteSettings {
        &self.settings
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(PaletteSettings::default())
    }
}

fn choose<T: Clone, R: Rng>(rng: &mut R, items: &[T]) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    Some(items[rng.gen_range(0..items.len())].clone())
}

impl ThemeProvider for Palette {
    fn pick_shape(&mut self) -> ShapeKind {
        choose(&mut self.rng, &self.settings.shapes).unwrap_or(ShapeKind::Circle)
    }

    fn pick_color(&mut self) -> NamedColor {
        choose(&mut self.rng, &self.settings.colors).unwrap_or(NamedColor::Red)
    }

    fn pick_font(&mut self) -> String {
        choose(&mut self.rng, &self.settings.fonts).unwrap_or_else(|| "system".to_string())
    }

    fn supports_faces(&self) -> bool {
        self.settings.faces
    }
}
