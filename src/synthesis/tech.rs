//! Circuit, grid and hexagon patterns on dark backgrounds.

use std::f32::consts::{PI, TAU};

use rand::Rng;

use crate::{
    data_structures::texture::Texture,
    error::Result,
    synthesis::{
        canvas::{Canvas, Gradient, Paint},
        post, scale_of,
    },
};

const CYAN: Paint = Paint::rgb(0.0, 255.0, 255.0);

/// 32 px cells: most outlined, some with a centered ring.
pub fn tech_grid(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    canvas.fill(Paint::gray(0.0));
    let cell = 32.0 * scale_of(width, 256);
    let stroke = CYAN.with_alpha(0.4);
    for (x, y) in cells(width, height, cell) {
        if rng.random::<f32>() < 0.7 {
            canvas.stroke_rect(x, y, cell, cell, 1.0, stroke);
        }
        if rng.random::<f32>() < 0.3 {
            canvas.stroke_circle(x + cell / 2.0, y + cell / 2.0, cell / 4.0, 1.0, stroke);
        }
    }
    Ok(Texture::new("tech grid", canvas.into_image()).tiled(1.0, 1.0))
}

/// Offset rows of outlined hexagons, white at 30%.
pub fn hexagon(width: u32, height: u32) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    canvas.fill(Paint::gray(0.0));
    let size = 32.0 * scale_of(width, 512);
    let row_height = size * 3f32.sqrt();
    let (w, h) = (width as f32, height as f32);
    let rows = (h / row_height) as usize + 1;
    let cols = (w / (size * 3.0)) as usize + 1;
    let paint = Paint::gray(255.0).with_alpha(0.3);
    for row in 0..=rows {
        for col in 0..=cols {
            let offset = if row % 2 == 1 { size * 1.5 } else { 0.0 };
            let cx = col as f32 * size * 3.0 + offset;
            let cy = row as f32 * row_height;
            let corners: Vec<(f32, f32)> = (0..6)
                .map(|i| {
                    let angle = i as f32 * PI / 3.0;
                    (cx + size * angle.cos(), cy + size * angle.sin())
                })
                .collect();
            canvas.polyline(&corners, true, 2.0, paint);
        }
    }
    Ok(Texture::new("hexagon", canvas.into_image()).tiled(1.0, 1.0))
}

/**
 * Nano circuitry: a 32 px trace grid, chips and pads, short glowing traces, energy
 * points and horizontal data streams carrying packets. Tiles 2x2.
 */
pub fn nano(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    let s = scale_of(width, 512);
    let (w, h) = (width as f32, height as f32);
    canvas.fill(Paint::hex(0x1a1a1a));

    let cell = 32.0 * s;
    for (x, y) in cells(width, height, cell) {
        if rng.random::<f32>() < 0.8 {
            canvas.line(x, y, x + cell, y, 1.0, CYAN.with_alpha(0.3));
            canvas.line(x, y, x, y + cell, 1.0, CYAN.with_alpha(0.3));
        }
    }

    for _ in 0..200 {
        let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let size = (rng.random::<f32>() * 4.0 + 2.0) * s;
        if rng.random::<f32>() < 0.5 {
            canvas.fill_rect(x, y, size, size, CYAN.with_alpha(0.4));
        } else {
            canvas.fill_circle(x, y, size / 2.0, CYAN.with_alpha(0.4));
        }
    }

    for _ in 0..50 {
        let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let length = (rng.random::<f32>() * 30.0 + 10.0) * s;
        let angle = rng.random::<f32>() * TAU;
        canvas.line(
            x,
            y,
            x + angle.cos() * length,
            y + angle.sin() * length,
            1.0,
            CYAN.with_alpha(0.5),
        );
    }

    for _ in 0..100 {
        let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
        let size = (rng.random::<f32>() * 2.0 + 1.0) * s;
        canvas.fill_circle(x, y, size, CYAN.with_alpha(0.8));
    }

    let stream_gap = (64.0 * s).max(1.0);
    let mut y = 0.0;
    while y < h {
        if rng.random::<f32>() < 0.3 {
            canvas.fill_rect(0.0, y, w, 2.0 * s, CYAN.with_alpha(0.1));
            let mut x = 0.0;
            while x < w {
                canvas.fill_rect(x, y, 4.0 * s, 2.0 * s, CYAN.with_alpha(0.5));
                x += (rng.random::<f32>() * 30.0 + 20.0) * s;
            }
        }
        y += stream_gap;
    }

    Ok(Texture::new("nano", canvas.into_image()).tiled(2.0, 2.0))
}

/// A 50x50 lattice of jittered node rings, 30% of them linked diagonally.
pub fn circuit_nano(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    let s = scale_of(width, 512);
    canvas.fill(Paint::hex(0x1a1a1a));
    let pitch = 10.0 * s;
    for i in 0..50 {
        for j in 0..50 {
            let x = i as f32 * pitch + rng.random::<f32>() * 5.0 * s;
            let y = j as f32 * pitch + rng.random::<f32>() * 5.0 * s;
            canvas.stroke_circle(x, y, s.max(0.5), 0.5, CYAN);
            if rng.random::<f32>() < 0.3 {
                canvas.line(x, y, x + pitch, y + pitch, 0.5, CYAN);
            }
        }
    }
    Ok(Texture::new("circuit nano", canvas.into_image()))
}

/// Concentric fading rings, twelve spokes and a ring of 36 dots.
pub fn hyper_fan(width: u32, height: u32) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    let s = scale_of(width, 512);
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    canvas.fill(Paint::hex(0x1a1a1a));

    for i in 0..5 {
        let radius = (100.0 + i as f32 * 30.0) * s;
        canvas.stroke_circle(cx, cy, radius, 2.0, CYAN.with_alpha(0.3 - i as f32 * 0.05));
    }
    for i in 0..12 {
        let angle = i as f32 / 12.0 * TAU;
        let r = 240.0 * s;
        canvas.line(cx, cy, cx + angle.cos() * r, cy + angle.sin() * r, 2.0, CYAN.with_alpha(0.2));
    }
    for i in 0..36 {
        let angle = i as f32 / 36.0 * TAU;
        let r = 200.0 * s;
        canvas.fill_circle(cx + angle.cos() * r, cy + angle.sin() * r, 5.0 * s, CYAN.with_alpha(0.15));
    }
    Ok(Texture::new("hyper fan", canvas.into_image()))
}

/**
 * Particle field for the sprayers: three layers of cyan-to-blue glows with hot
 * centers over a near-black base, a faint 20-line grid, then grain and bloom.
 */
pub fn tech_sprayer(width: u32, height: u32, rng: &mut impl Rng) -> Result<Texture> {
    let mut canvas = Canvas::new(width, height)?;
    let s = scale_of(width, 1024);
    let (w, h) = (width as f32, height as f32);
    canvas.fill(Paint::rgb(10.0, 12.0, 18.0));

    for layer in 0..3 {
        let layer_f = layer as f32;
        let count = 200 - layer * 30;
        for _ in 0..count {
            let (x, y) = (rng.random::<f32>() * w, rng.random::<f32>() * h);
            let size = (2.0 + rng.random::<f32>() * 6.0) * s;
            let hue = 180.0 + rng.random::<f32>() * 60.0;
            let glow = Gradient::new(&[
                (0.0, Paint::hsla(hue, 1.0, 0.7, 0.7 - layer_f * 0.2)),
                (0.5, Paint::hsla(hue, 1.0, 0.5, 0.3 - layer_f * 0.1)),
                (1.0, Paint::TRANSPARENT),
            ]);
            canvas.radial_gradient(x, y, size * 3.0, &glow);
            canvas.fill_circle(x, y, size * 0.5, Paint::hsla(hue, 1.0, 0.9, 0.9 - layer_f * 0.2));
        }
    }

    for i in 0..20 {
        let pos = i as f32 * w / 20.0;
        canvas.line(0.0, pos, w, pos, 0.5, CYAN.with_alpha(0.1));
        canvas.line(pos, 0.0, pos, h, 0.5, CYAN.with_alpha(0.1));
    }

    let mut image = canvas.into_image();
    post::grain(&mut image, rng, 5.0);
    post::bloom(&mut image, 200.0, 1.2);
    Ok(Texture::new("tech sprayer", image))
}

/// Top-left corners of square cells of side `cell` covering the canvas.
fn cells(width: u32, height: u32, cell: f32) -> impl Iterator<Item = (f32, f32)> {
    let cell = cell.max(1.0);
    let cols = (width as f32 / cell).ceil() as usize;
    let rows = (height as f32 / cell).ceil() as usize;
    (0..cols).flat_map(move |i| (0..rows).map(move |j| (i as f32 * cell, j as f32 * cell)))
}
