//! Textures: colors as a function of surface coordinates and position.

use crate::noise::{NoiseSource, Perlin, ValueNoise, TURBULENCE_DEPTH};
use lumen_core::Bitmap;
use lumen_math::{Color, Vec3};
use std::sync::Arc;

/// Every texture a material can sample.
#[derive(Clone)]
pub enum Texture {
    Constant(Color),
    Checker(CheckerTexture),
    Noise(NoiseTexture),
    Image(ImageTexture),
}

impl Texture {
    /// Color at texture coordinates `(u, v)` and world point `p`.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Constant(color) => *color,
            Texture::Checker(checker) => checker.value(u, v, p),
            Texture::Noise(noise) => noise.value(p),
            Texture::Image(image) => image.value(u, v),
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Constant(color)
    }
}

impl From<CheckerTexture> for Texture {
    fn from(value: CheckerTexture) -> Self {
        Texture::Checker(value)
    }
}

impl From<NoiseTexture> for Texture {
    fn from(value: NoiseTexture) -> Self {
        Texture::Noise(value)
    }
}

impl From<ImageTexture> for Texture {
    fn from(value: ImageTexture) -> Self {
        Texture::Image(value)
    }
}

/// 3D checkerboard alternating between two textures.
#[derive(Clone)]
pub struct CheckerTexture {
    even: Box<Texture>,
    odd: Box<Texture>,
}

impl CheckerTexture {
    pub fn new(even: impl Into<Texture>, odd: impl Into<Texture>) -> Self {
        Self {
            even: Box::new(even.into()),
            odd: Box::new(odd.into()),
        }
    }

    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Shared noise tables. Cloning a basis shares the tables.
#[derive(Clone)]
pub enum NoiseBasis {
    Value(Arc<ValueNoise>),
    Perlin(Arc<Perlin>),
}

impl NoiseSource for NoiseBasis {
    fn noise(&self, p: Vec3) -> f32 {
        match self {
            NoiseBasis::Value(n) => n.noise(p),
            NoiseBasis::Perlin(n) => n.noise(p),
        }
    }
}

impl From<ValueNoise> for NoiseBasis {
    fn from(value: ValueNoise) -> Self {
        NoiseBasis::Value(Arc::new(value))
    }
}

impl From<Perlin> for NoiseBasis {
    fn from(value: Perlin) -> Self {
        NoiseBasis::Perlin(Arc::new(value))
    }
}

/// How a noise texture turns the field into a gray level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseFlavor {
    /// `noise(scale * p)`
    #[default]
    Raw,
    /// `turb(scale * p)`, a netting-like pattern
    Turbulence,
    /// Sine along z with turbulence in the phase: veined marble
    Marble,
}

/// Gray procedural texture driven by lattice noise.
#[derive(Clone)]
pub struct NoiseTexture {
    basis: NoiseBasis,
    scale: f32,
    flavor: NoiseFlavor,
}

impl NoiseTexture {
    /// `scale` is the spatial frequency.
    pub fn new(basis: impl Into<NoiseBasis>, scale: f32, flavor: NoiseFlavor) -> Self {
        Self {
            basis: basis.into(),
            scale,
            flavor,
        }
    }

    fn value(&self, p: Vec3) -> Color {
        let level = match self.flavor {
            NoiseFlavor::Raw => self.basis.noise(self.scale * p),
            NoiseFlavor::Turbulence => self.basis.turb(self.scale * p, TURBULENCE_DEPTH),
            NoiseFlavor::Marble => {
                0.5 * (1.0 + (self.scale * p.z + 10.0 * self.basis.turb(p, TURBULENCE_DEPTH)).sin())
            }
        };
        Color::splat(level)
    }
}

/// Lookup into a decoded bitmap. `v = 1` is the top row.
#[derive(Clone)]
pub struct ImageTexture {
    bitmap: Arc<Bitmap>,
}

impl ImageTexture {
    pub fn new(bitmap: impl Into<Arc<Bitmap>>) -> Self {
        Self {
            bitmap: bitmap.into(),
        }
    }

    fn value(&self, u: f32, v: f32) -> Color {
        let nx = self.bitmap.width();
        let ny = self.bitmap.height();

        // Float-to-int casts saturate, so negatives land on 0
        let i = ((u * nx as f32) as u32).min(nx.saturating_sub(1));
        // Nudged down so v = 0 lands on the last row
        let j = (((1.0 - v) * ny as f32 - 0.001) as u32).min(ny.saturating_sub(1));

        let [r, g, b] = self.bitmap.rgb(i, j);
        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}
