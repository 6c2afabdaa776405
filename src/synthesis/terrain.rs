//! Noise-driven ground, normal and roughness maps.

use image::{Rgba, RgbaImage};
use rand::Rng;

use crate::{
    data_structures::texture::Texture,
    error::Result,
    noise::{Fractal, NoiseEngine},
    synthesis::{
        canvas::{Canvas, Paint},
        post, scale_of,
    },
};

/// Surface buckets of the terrain color map, by fractal noise value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Soil,
    Grass,
    Rock,
    Sand,
}

impl Surface {
    /// Thresholds `[0, .3) [.3, .6) [.6, .8) [.8, 1]`.
    pub fn classify(value: f64) -> Surface {
        if value < 0.3 {
            Surface::Soil
        } else if value < 0.6 {
            Surface::Grass
        } else if value < 0.8 {
            Surface::Rock
        } else {
            Surface::Sand
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            Surface::Soil => [0x2d, 0x5a, 0x27],
            Surface::Grass => [0x3d, 0x7e, 0x35],
            Surface::Rock => [0x3d, 0x3d, 0x3d],
            Surface::Sand => [0x8b, 0x73, 0x55],
        }
    }
}

fn new_image(width: u32, height: u32) -> Result<RgbaImage> {
    Ok(Canvas::new(width, height)?.into_image())
}

/// Eight-octave grayscale noise with a `pow 1.5` contrast curve.
pub fn fractal_noise(width: u32, height: u32, noise: &NoiseEngine) -> Result<Texture> {
    let mut image = new_image(width, height)?;
    let params = Fractal::new(8, 1.0);
    for (x, y, px) in image.enumerate_pixels_mut() {
        let u = x as f64 / width as f64;
        let v = y as f64 / height as f64;
        let c = (noise.fractal01(u, v, &params) * 255.0).round() as u8;
        *px = Rgba([c, c, c, 255]);
    }
    post::contrast(&mut image, 1.5);
    Ok(Texture::new("fractal noise", image).tiled(1.0, 1.0))
}

/**
 * Natural terrain: six-octave noise thresholded into soil, grass, rock and sand, each
 * pixel jittered by up to ±10 per channel.
 */
pub fn terrain_color(
    width: u32,
    height: u32,
    noise: &NoiseEngine,
    rng: &mut impl Rng,
) -> Result<Texture> {
    let mut image = new_image(width, height)?;
    // one lattice cell per 1000 px at the 2048 reference size
    let params = Fractal::new(6, 2048.0 / 1000.0);
    for (x, y, px) in image.enumerate_pixels_mut() {
        let u = x as f64 / width as f64;
        let v = y as f64 / height as f64;
        let value = noise.fractal01(u, v, &params);
        let [r, g, b] = Surface::classify(value).rgb();
        let variation: f32 = rng.random_range(-10.0..10.0);
        let jitter = |c: u8| (c as f32 + variation).clamp(0.0, 255.0) as u8;
        *px = Rgba([jitter(r), jitter(g), jitter(b), 255]);
    }
    Ok(Texture::new("terrain", image).tiled(1.0, 1.0))
}

/// Normal map from two decorrelated noise samples per pixel, `nz` fixed at 1.
pub fn perlin_normal_map(width: u32, height: u32, noise: &NoiseEngine) -> Result<Texture> {
    let mut image = new_image(width, height)?;
    let cells = 2048.0 / 100.0;
    for (x, y, px) in image.enumerate_pixels_mut() {
        let u = x as f64 / width as f64 * cells;
        let v = y as f64 / height as f64 * cells;
        let nx = noise.noise(u, v);
        let ny = noise.noise(u + 1.0, v + 1.0);
        *px = encode_normal(nx, ny, 1.0);
    }
    Ok(Texture::new("perlin normal", image).linear().tiled(1.0, 1.0))
}

/// Four-octave grayscale roughness.
pub fn fractal_roughness(width: u32, height: u32, noise: &NoiseEngine) -> Result<Texture> {
    let mut image = new_image(width, height)?;
    let params = Fractal::new(4, 2048.0 / 200.0);
    for (x, y, px) in image.enumerate_pixels_mut() {
        let u = x as f64 / width as f64;
        let v = y as f64 / height as f64;
        let c = (noise.fractal01(u, v, &params) * 255.0) as u8;
        *px = Rgba([c, c, c, 255]);
    }
    Ok(Texture::new("fractal roughness", image).linear().tiled(1.0, 1.0))
}

/// Remaps a surface vector from `[-1, 1]` to `[0, 255]` per channel after normalizing it.
pub fn encode_normal(nx: f64, ny: f64, nz: f64) -> Rgba<u8> {
    let len = (nx * nx + ny * ny + nz * nz).sqrt();
    let (nx, ny, nz) = if len > f64::EPSILON {
        (nx / len, ny / len, nz / len)
    } else {
        (0.0, 0.0, 1.0)
    };
    let enc = |c: f64| ((c * 0.5 + 0.5) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba([enc(nx), enc(ny), enc(nz), 255])
}

/// Inverse of [`encode_normal`], without renormalizing.
pub fn decode_normal(px: Rgba<u8>) -> [f64; 3] {
    let dec = |c: u8| c as f64 / 255.0 * 2.0 - 1.0;
    [dec(px[0]), dec(px[1]), dec(px[2])]
}

/// Restores unit length after a pass that averaged encoded normals, such as a blur.
pub fn renormalize(image: &mut RgbaImage) {
    for px in image.pixels_mut() {
        let [nx, ny, nz] = decode_normal(*px);
        *px = encode_normal(nx, ny, nz);
    }
}

/**
 * Dark tech floor: speckled gray base, a 64 px grid with cells dropped at random,
 * small outlined squares and rings, cyan glow points and faint energy lines.
 * Tiles 4x4.
 */
pub fn ground(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    let s = scale_of(width, 1024);
    let (w, h) = (width as f32, height as f32);

    for px in canvas.image_mut().pixels_mut() {
        let c = (26.0 + rng.random::<f32>() * 0.15 * 50.0) as u8;
        *px = Rgba([c, c, c, 255]);
    }

    let cyan = Paint::rgb(0.0, 255.0, 255.0);
    let grid = 64.0 * s;
    let mut y = 0.0;
    while y < h {
        let mut x = 0.0;
        while x < w {
            if rng.random::<f32>() < 0.7 {
                canvas.stroke_rect(x, y, grid, grid, 1.0, cyan.with_alpha(0.1));
            }
            x += grid;
        }
        y += grid;
    }

    for _ in 0..1000 {
        let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let size = (rng.random::<f32>() * 4.0 + 2.0) * s;
        if rng.random::<f32>() < 0.5 {
            canvas.stroke_rect(x, y, size, size, 1.0, cyan.with_alpha(0.15));
        } else {
            canvas.stroke_circle(x, y, size / 2.0, 1.0, cyan.with_alpha(0.15));
        }
    }

    for _ in 0..200 {
        let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let size = (rng.random::<f32>() * 3.0 + 1.0) * s;
        canvas.fill_circle(x, y, size, cyan.with_alpha(0.2));
    }

    for _ in 0..50 {
        let (x1, y1) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let x2 = x1 + (rng.random::<f32>() - 0.5) * 200.0 * s;
        let y2 = y1 + (rng.random::<f32>() - 0.5) * 200.0 * s;
        canvas.line(x1, y1, x2, y2, 1.0, cyan.with_alpha(0.1));
    }

    Ok(Texture::new("ground", canvas.into_image()).tiled(4.0, 4.0))
}

/// Gentle random normals (`±0.2` in x and y) blurred by 2 px. Tiles 4x4.
pub fn ground_normal(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut image = new_image(width, height)?;
    for px in image.pixels_mut() {
        let bump = rng.random::<f64>() * 0.1;
        let nx = (rng.random::<f64>() - 0.5) * 0.4;
        let ny = (rng.random::<f64>() - 0.5) * 0.4;
        *px = encode_normal(nx, ny, 1.0 - 2.0 * bump);
    }
    let mut image = post::blur(&image, 2.0 * scale_of(width, 1024));
    renormalize(&mut image);
    Ok(Texture::new("ground normal", image).linear().tiled(4.0, 4.0))
}

/// Roughness between 0.7 and 1.0 with a hundred smoother dark blotches. Tiles 4x4.
pub fn ground_roughness(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    let s = scale_of(width, 1024);
    for px in canvas.image_mut().pixels_mut() {
        let c = ((0.7 + rng.random::<f32>() * 0.3) * 255.0) as u8;
        *px = Rgba([c, c, c, 255]);
    }
    let (w, h) = (width as f32, height as f32);
    for _ in 0..100 {
        let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let size = (rng.random::<f32>() * 50.0 + 20.0) * s;
        canvas.fill_circle(x, y, size, Paint::gray(0.0).with_alpha(0.4));
    }
    Ok(Texture::new("ground roughness", canvas.into_image())
        .linear()
        .tiled(4.0, 4.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_follow_thresholds() {
        assert_eq!(Surface::classify(0.0), Surface::Soil);
        assert_eq!(Surface::classify(0.299), Surface::Soil);
        assert_eq!(Surface::classify(0.3), Surface::Grass);
        assert_eq!(Surface::classify(0.6), Surface::Rock);
        assert_eq!(Surface::classify(0.8), Surface::Sand);
        assert_eq!(Surface::classify(1.0), Surface::Sand);
    }

    #[test]
    fn flat_normal_encodes_to_blue() {
        assert_eq!(encode_normal(0.0, 0.0, 1.0).0, [128, 128, 255, 255]);
    }

    #[test]
    fn renormalize_restores_unit_length() {
        let mut image = RgbaImage::from_pixel(2, 2, Rgba([160, 100, 200, 255]));
        renormalize(&mut image);
        for px in image.pixels() {
            let [x, y, z] = decode_normal(*px);
            assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 0.02);
            assert_eq!(px[3], 255);
        }
    }
}
