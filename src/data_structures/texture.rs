//! Synthesized raster textures.
//!
//! This module provides [`Texture`], an immutable RGBA8 buffer produced once by a
//! generator in [`crate::synthesis`], together with the sampling hints (wrap mode,
//! repeat counts, color space) the rendering collaborator needs to bind it.

use std::path::Path;

use anyhow::Context;
use image::RgbaImage;

/// Index into the texture table of a scene context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    #[default]
    ClampToEdge,
    Repeat,
}

/// Color maps are sampled as sRGB; normal and roughness maps carry linear data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorSpace {
    #[default]
    Srgb,
    Linear,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub label: String,
    image: RgbaImage,
    pub wrap: WrapMode,
    /// How many times the image tiles across a surface's uv range.
    pub repeat: [f32; 2],
    pub color_space: ColorSpace,
}

impl Texture {
    pub fn new(label: &str, image: RgbaImage) -> Self {
        Self {
            label: label.to_string(),
            image,
            wrap: WrapMode::default(),
            repeat: [1.0, 1.0],
            color_space: ColorSpace::default(),
        }
    }

    /// Tiles `u` by `v` times with repeat wrapping.
    pub fn tiled(mut self, u: f32, v: f32) -> Self {
        self.wrap = WrapMode::Repeat;
        self.repeat = [u, v];
        self
    }

    pub fn linear(mut self) -> Self {
        self.color_space = ColorSpace::Linear;
        self
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes, row-major, 4 bytes per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("writing texture `{}` to {}", self.label, path.display()))
    }
}
