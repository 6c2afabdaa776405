//! Brushed metal, missile hull plating and random bump normals.

use std::f32::consts::TAU;

use image::Rgba;
use rand::Rng;

use crate::{
    data_structures::texture::Texture,
    error::Result,
    synthesis::{
        canvas::{Canvas, Gradient, Paint},
        post, scale_of,
        terrain::{encode_normal, renormalize},
    },
};

/// Diagonal gray sheen with faint scratches and bright specks. Tiles 2x2.
pub fn metal(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    let s = scale_of(width, 256);
    let (w, h) = (width as f32, height as f32);
    canvas.linear_gradient(
        0.0,
        0.0,
        w,
        h,
        &Gradient::new(&[
            (0.0, Paint::hex(0x666666)),
            (0.5, Paint::hex(0x888888)),
            (1.0, Paint::hex(0x666666)),
        ]),
    );

    for _ in 0..50 {
        let alpha = rng.random::<f32>() * 0.2;
        let width = rng.random::<f32>() * 2.0;
        let (x1, y1) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let length = (20.0 + rng.random::<f32>() * 40.0) * s;
        let angle = rng.random::<f32>() * TAU;
        canvas.line(
            x1,
            y1,
            x1 + angle.cos() * length,
            y1 + angle.sin() * length,
            width,
            Paint::gray(100.0).with_alpha(alpha),
        );
    }

    for _ in 0..1000 {
        let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let size = rng.random::<f32>() * 2.0 * s;
        let speck = Paint::rgba(
            150.0 + rng.random::<f32>() * 50.0,
            150.0 + rng.random::<f32>() * 50.0,
            150.0 + rng.random::<f32>() * 50.0,
            rng.random::<f32>() * 0.3,
        );
        canvas.fill_rect(x, y, size, size, speck);
    }

    Ok(Texture::new("metal", canvas.into_image()).tiled(2.0, 2.0))
}

/**
 * Missile hull: noisy dark plating, worn yellow hazard stripes, white marking plates
 * where stencil text would go, an inspection grid, grime, scratches and red status
 * lights with halos.
 */
pub fn missile(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    let s = scale_of(width, 512);
    let (w, h) = (width as f32, height as f32);

    for px in canvas.image_mut().pixels_mut() {
        let c = (42.0 + rng.random::<f32>() * 0.1 * 40.0) as u8;
        *px = Rgba([c, c, c, 255]);
    }

    let stripe = (32.0 * s).max(1.0);
    let mut y = 0.0;
    while y < h {
        canvas.fill_rect(0.0, y, w, stripe, Paint::rgb(255.0, 255.0, 0.0).with_alpha(0.7));
        for _ in 0..100 {
            let x = rng.random::<f32>() * w;
            let wear = (rng.random::<f32>() * 5.0 + 2.0) * s;
            canvas.fill_rect(x, y, 2.0 * s, wear, Paint::gray(0.0).with_alpha(0.2));
        }
        y += stripe * 2.0;
    }

    // serial and caution plates, one pair every 128 px
    let plate = Paint::gray(255.0).with_alpha(0.8);
    let mut y = 16.0 * s;
    while y < h {
        let serial_width = (60.0 + rng.random::<f32>() * 20.0) * s;
        canvas.fill_rect(w / 2.0 - serial_width / 2.0, y - 12.0 * s, serial_width, 14.0 * s, plate);
        let caution_width = 200.0 * s;
        canvas.fill_rect(w / 2.0 - caution_width / 2.0, y + 20.0 * s, caution_width, 14.0 * s, plate);
        y += 128.0 * s;
    }

    let cell = (64.0 * s).max(1.0);
    let mut gy = 0.0;
    while gy < h {
        let mut gx = 0.0;
        while gx < w {
            if rng.random::<f32>() < 0.7 {
                let grid = Paint::gray(255.0).with_alpha(0.3);
                canvas.stroke_rect(gx, gy, cell, cell, 1.0, grid);
                if rng.random::<f32>() < 0.5 {
                    canvas.stroke_circle(gx + cell / 2.0, gy + cell / 2.0, cell / 4.0, 1.0, grid);
                }
            }
            gx += cell;
        }
        gy += cell;
    }

    for _ in 0..200 {
        let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let size = (rng.random::<f32>() * 4.0 + 2.0) * s;
        canvas.fill_rect(x, y, size, size, Paint::gray(0.0).with_alpha(0.3));
    }

    for _ in 0..50 {
        let (x1, y1) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let length = (rng.random::<f32>() * 30.0 + 10.0) * s;
        let angle = rng.random::<f32>() * TAU;
        canvas.line(
            x1,
            y1,
            x1 + angle.cos() * length,
            y1 + angle.sin() * length,
            1.0,
            Paint::gray(255.0).with_alpha(0.1),
        );
    }

    let red = Paint::rgb(255.0, 0.0, 0.0);
    let halo = Gradient::new(&[(0.0, red.with_alpha(0.3)), (1.0, red.with_alpha(0.0))]);
    for _ in 0..20 {
        let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let size = (rng.random::<f32>() * 4.0 + 2.0) * s;
        canvas.fill_circle(x, y, size, red.with_alpha(0.8));
        canvas.radial_gradient(x, y, size * 2.0, &halo);
    }

    Ok(Texture::new("missile", canvas.into_image()).tiled(1.0, 1.0))
}

/// Random per-pixel normals softened by a 2 px blur. Tiles.
pub fn random_normal_map(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    for px in canvas.image_mut().pixels_mut() {
        let nx = rng.random::<f64>() * 2.0 - 1.0;
        let ny = rng.random::<f64>() * 2.0 - 1.0;
        let nz = rng.random::<f64>();
        *px = encode_normal(nx, ny, nz);
    }
    let mut image = post::blur(canvas.image(), 2.0 * scale_of(width, 256));
    renormalize(&mut image);
    Ok(Texture::new("random normal", image).linear().tiled(1.0, 1.0))
}
