//! Procedural texture synthesis.
//!
//! Every generator is a free function taking the raster size, plus a
//! [`crate::noise::NoiseEngine`] when it samples noise and an RNG when it scatters
//! decoration, and returns a [`Texture`](crate::data_structures::texture::Texture).
//! A zero width or height is rejected with
//! [`BuildError::InvalidDimensions`](crate::error::BuildError::InvalidDimensions).
//!
//! Feature sizes are authored against a reference raster size and scaled with the
//! requested width, so shrunken textures keep the same look.
//!
//! - `canvas` is the painter every generator draws with
//! - `post` holds grain, bloom, blur and tone passes
//! - `terrain` has noise ground maps and the tech floor set
//! - `tech` has grids, hexagons and circuitry
//! - `metal` has hull plating and bump normals
//! - `atmosphere` has clouds and the space panorama
//! - `sprites` has particle point sprites

pub mod atmosphere;
pub mod canvas;
pub mod metal;
pub mod post;
pub mod sprites;
pub mod tech;
pub mod terrain;

use instant::Instant;
use rand::Rng;

use crate::{data_structures::texture::Texture, error::Result, noise::NoiseEngine};

/// Ratio between the requested width and the width a pattern was authored for.
pub(crate) fn scale_of(width: u32, reference: u32) -> f32 {
    width as f32 / reference as f32
}

/// Runs one generator and logs how long it took.
pub fn timed<T>(label: &str, generate: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    let result = generate();
    match &result {
        Ok(_) => log::debug!("synthesized {label} in {:?}", start.elapsed()),
        Err(e) => log::warn!("synthesizing {label} failed: {e}"),
    }
    result
}

/**
 * Every generator that no material samples, each at `size` squared: terrain and
 * noise studies, sky rasters, decals and sprites. Used for texture export.
 */
pub fn catalog(size: u32, noise: &NoiseEngine, rng: &mut impl Rng) -> Result<Vec<Texture>> {
    Ok(vec![
        timed("terrain", || terrain::terrain_color(size, size, noise, rng))?,
        timed("fractal noise", || terrain::fractal_noise(size, size, noise))?,
        timed("perlin normal", || terrain::perlin_normal_map(size, size, noise))?,
        timed("fractal roughness", || terrain::fractal_roughness(size, size, noise))?,
        timed("hexagon", || tech::hexagon(size, size))?,
        timed("circuit nano", || tech::circuit_nano(size, size, rng))?,
        timed("hyper fan", || tech::hyper_fan(size, size))?,
        timed("tech sprayer", || tech::tech_sprayer(size, size, rng))?,
        timed("missile", || metal::missile(size, size, rng))?,
        timed("cloud", || atmosphere::cloud(size, size, rng))?,
        timed("noise alpha", || atmosphere::noise_alpha(size, size, rng))?,
        timed("soft cloud", || atmosphere::soft_cloud(size, size, rng))?,
        timed("space panorama", || atmosphere::space_panorama(size * 2, size, rng))?,
        timed("particle sprite", || sprites::particle_sprite(size))?,
    ])
}
