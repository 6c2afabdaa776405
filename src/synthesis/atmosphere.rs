//! Sky-side rasters: layered clouds, soft alpha noise and the space panorama.

use std::f32::consts::TAU;

use image::Rgba;
use rand::Rng;

use crate::{
    data_structures::texture::Texture,
    error::Result,
    synthesis::{
        canvas::{Canvas, Gradient, Paint},
        post, scale_of,
    },
};

/**
 * Eight layers of cloud clusters on black. Each cluster is a large soft radial
 * gradient with jittered detail puffs around its center; every layer also adds a
 * sprinkle of faint dots. Finished with grain and a bloom on pixels brighter than 180.
 */
pub fn cloud(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    let s = scale_of(width, 2048);
    let (w, h) = (width as f32, height as f32);
    canvas.fill(Paint::gray(0.0));
    let white = Paint::gray(255.0);

    for layer in 0..8 {
        let layer_f = layer as f32;
        let alpha = (0.15 - layer_f * 0.02) * (1.0 - layer_f / 8.0);
        for _ in 0..15 {
            let cx = w / 2.0 + (rng.random::<f32>() - 0.5) * 0.78 * w;
            let cy = h / 2.0 + (rng.random::<f32>() - 0.5) * 0.78 * h;
            let radius = (300.0 + rng.random::<f32>() * 200.0) * s;
            canvas.radial_gradient(
                cx,
                cy,
                radius,
                &Gradient::new(&[
                    (0.0, white.with_alpha(alpha * 1.2)),
                    (0.4, white.with_alpha(alpha)),
                    (0.7, white.with_alpha(alpha * 0.5)),
                    (1.0, white.with_alpha(0.0)),
                ]),
            );

            let details = 80 - layer * 8;
            for _ in 0..details {
                let angle = rng.random::<f32>() * TAU;
                let distance = rng.random::<f32>() * 200.0 * s;
                let x = cx + angle.cos() * distance;
                let y = cy + angle.sin() * distance;
                // slightly irregular outline
                let size = (20.0 + rng.random::<f32>() * 80.0) * s * (0.9 + rng.random::<f32>() * 0.2);
                let detail_alpha = (0.1 - layer_f * 0.01) * rng.random::<f32>();
                canvas.radial_gradient(
                    x,
                    y,
                    size,
                    &Gradient::new(&[
                        (0.0, white.with_alpha(detail_alpha * 1.5)),
                        (0.5, white.with_alpha(detail_alpha)),
                        (1.0, white.with_alpha(0.0)),
                    ]),
                );
            }
        }

        for _ in 0..200 {
            let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
            let size = (5.0 + rng.random::<f32>() * 15.0) * s;
            canvas.fill_circle(x, y, size, white.with_alpha(0.02 + rng.random::<f32>() * 0.03));
        }
    }

    let mut image = canvas.into_image();
    post::grain(&mut image, rng, 7.5);
    post::bloom(&mut image, 180.0, 1.2);
    Ok(Texture::new("cloud", image))
}

/// White with a random alpha per pixel. Tiles.
pub fn noise_alpha(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    for px in canvas.image_mut().pixels_mut() {
        *px = Rgba([255, 255, 255, (rng.random::<f32>() * 255.0) as u8]);
    }
    Ok(Texture::new("noise alpha", canvas.into_image()).tiled(1.0, 1.0))
}

/// White with alpha between 0.5 and 1, blurred into soft puffs. Tiles.
pub fn soft_cloud(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    for px in canvas.image_mut().pixels_mut() {
        let a = (rng.random::<f32>() * 0.5 + 0.5) * 255.0;
        *px = Rgba([255, 255, 255, a as u8]);
    }
    let image = post::blur(canvas.image(), 8.0 * scale_of(width, 256));
    Ok(Texture::new("soft cloud", image).tiled(1.0, 1.0))
}

/**
 * Equirectangular night sky: a deep blue vertical gradient, a thousand stars (some
 * with halos), blue-violet nebulae and faint cyan energy streaks.
 */
pub fn space_panorama(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    let s = scale_of(width, 1024);
    let (w, h) = (width as f32, height as f32);
    canvas.linear_gradient(
        0.0,
        0.0,
        0.0,
        h,
        &Gradient::new(&[
            (0.0, Paint::hex(0x000033)),
            (0.5, Paint::hex(0x000066)),
            (1.0, Paint::hex(0x000044)),
        ]),
    );

    let star = Paint::gray(255.0).with_alpha(0.8);
    let halo = Gradient::new(&[
        (0.0, Paint::gray(255.0).with_alpha(0.3)),
        (1.0, Paint::gray(255.0).with_alpha(0.0)),
    ]);
    for _ in 0..1000 {
        let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let size = (rng.random::<f32>() * 2.0 + 0.5) * s;
        canvas.fill_circle(x, y, size, star);
        if rng.random::<f32>() < 0.3 {
            canvas.radial_gradient(x, y, size * 3.0, &halo);
        }
    }

    for _ in 0..20 {
        let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let radius = (rng.random::<f32>() * 100.0 + 50.0) * s;
        let hue = rng.random::<f32>() * 60.0 + 200.0;
        canvas.radial_gradient(
            x,
            y,
            radius,
            &Gradient::new(&[
                (0.0, Paint::hsla(hue, 1.0, 0.5, 0.1)),
                (1.0, Paint::TRANSPARENT),
            ]),
        );
    }

    for _ in 0..30 {
        let (x1, y1) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let length = (rng.random::<f32>() * 200.0 + 100.0) * s;
        let angle = rng.random::<f32>() * TAU;
        canvas.line(
            x1,
            y1,
            x1 + angle.cos() * length,
            y1 + angle.sin() * length,
            2.0,
            Paint::rgb(0.0, 255.0, 255.0).with_alpha(0.1),
        );
    }

    Ok(Texture::new("space panorama", canvas.into_image()))
}
