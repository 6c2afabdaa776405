//! Small radial point sprites for particle materials.

use crate::{
    data_structures::texture::Texture,
    error::Result,
    synthesis::canvas::{Canvas, Gradient, Paint},
};

fn radial_sprite(label: &str, size: u32, gradient: &Gradient) -> Result<Texture> {
    let mut canvas = Canvas::new(size, size)?;
    let half = size as f32 / 2.0;
    canvas.radial_gradient(half, half, half, gradient);
    Ok(Texture::new(label, canvas.into_image()))
}

/// White core fading out by the edge, half alpha at 30% of the radius.
pub fn spray_sprite(size: u32) -> Result<Texture> {
    let white = Paint::gray(255.0);
    radial_sprite(
        "spray sprite",
        size,
        &Gradient::new(&[
            (0.0, white),
            (0.3, white.with_alpha(0.5)),
            (1.0, white.with_alpha(0.0)),
        ]),
    )
}

/// White core through lavender to transparent blue.
pub fn particle_sprite(size: u32) -> Result<Texture> {
    radial_sprite(
        "particle sprite",
        size,
        &Gradient::new(&[
            (0.0, Paint::gray(255.0)),
            (0.5, Paint::rgba(128.0, 128.0, 255.0, 0.5)),
            (1.0, Paint::rgba(0.0, 0.0, 255.0, 0.0)),
        ]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_is_dense_in_the_middle_and_clear_in_the_corner() {
        let sprite = spray_sprite(64).unwrap();
        assert!(sprite.image().get_pixel(32, 32)[3] > 200);
        assert_eq!(sprite.image().get_pixel(0, 0)[3], 0);
    }
}
