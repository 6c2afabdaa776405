//! A minimal 2D painter over an RGBA8 image.
//!
//! Every primitive composites with straight-alpha source-over, so a fully opaque
//! background stays at alpha 255 no matter what is drawn on top of it. Coordinates
//! are in pixels with the origin at the top-left corner; shapes are sampled at
//! pixel centers.

use image::{Rgba, RgbaImage};

use crate::error::{BuildError, Result};

/// A color with a fractional alpha, the unit every drawing call takes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// `0.0..=1.0`
    pub a: f32,
}

impl Paint {
    pub const TRANSPARENT: Paint = Paint::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// `0xRRGGBB`, opaque.
    pub const fn hex(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xff) as f32,
            ((hex >> 8) & 0xff) as f32,
            (hex & 0xff) as f32,
        )
    }

    pub const fn gray(v: f32) -> Self {
        Self::rgb(v, v, v)
    }

    /// Hue in degrees, saturation and lightness in `0.0..=1.0`.
    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s == 0.0 {
            return Self::rgba(l * 255.0, l * 255.0, l * 255.0, a);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let channel = |t: f32| {
            let t = t.rem_euclid(1.0);
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            v * 255.0
        };
        Self::rgba(
            channel(h + 1.0 / 3.0),
            channel(h),
            channel(h - 1.0 / 3.0),
            a,
        )
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    fn lerp(self, other: Paint, t: f32) -> Paint {
        Paint {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Color stops along a gradient, offsets ascending in `0.0..=1.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient(Vec<(f32, Paint)>);

impl Gradient {
    pub fn new(stops: &[(f32, Paint)]) -> Self {
        let mut stops = stops.to_vec();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self(stops)
    }

    pub fn sample(&self, t: f32) -> Paint {
        let Some(&(first_offset, first)) = self.0.first() else {
            return Paint::TRANSPARENT;
        };
        if t <= first_offset {
            return first;
        }
        for pair in self.0.windows(2) {
            let (o0, p0) = pair[0];
            let (o1, p1) = pair[1];
            if t <= o1 {
                let span = o1 - o0;
                let local = if span > 0.0 { (t - o0) / span } else { 1.0 };
                return p0.lerp(p1, local);
            }
        }
        self.0.last().map(|&(_, p)| p).unwrap_or(first)
    }
}

#[derive(Clone, Debug)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// A transparent canvas. Zero-sized canvases are rejected.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BuildError::InvalidDimensions { width, height });
        }
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
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

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Overwrites a pixel without blending. Out-of-bounds writes are dropped.
    pub fn put(&mut self, x: i64, y: i64, paint: Paint) {
        if let Some(px) = self.pixel_mut(x, y) {
            *px = to_rgba(paint);
        }
    }

    /// Source-over composite of `paint` onto one pixel.
    pub fn blend(&mut self, x: i64, y: i64, paint: Paint) {
        if paint.a <= 0.0 {
            return;
        }
        if let Some(px) = self.pixel_mut(x, y) {
            *px = source_over(*px, paint);
        }
    }

    fn pixel_mut(&mut self, x: i64, y: i64) -> Option<&mut Rgba<u8>> {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return None;
        }
        Some(self.image.get_pixel_mut(x as u32, y as u32))
    }

    pub fn fill(&mut self, paint: Paint) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        if paint.a >= 1.0 {
            let px = to_rgba(paint);
            self.image.pixels_mut().for_each(|p| *p = px);
        } else {
            self.fill_rect(0.0, 0.0, w, h, paint);
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        let (x0, x1) = span(x, x + w);
        let (y0, y1) = span(y, y + h);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, paint);
            }
        }
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, width: f32, paint: Paint) {
        self.line(x, y, x + w, y, width, paint);
        self.line(x + w, y, x + w, y + h, width, paint);
        self.line(x + w, y + h, x, y + h, width, paint);
        self.line(x, y + h, x, y, width, paint);
    }

    /// Anti-aliasing free segment of the given stroke width.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, paint: Paint) {
        let half = (width * 0.5).max(0.5);
        let (bx0, bx1) = span(x0.min(x1) - half, x0.max(x1) + half);
        let (by0, by1) = span(y0.min(y1) - half, y0.max(y1) + half);
        let (dx, dy) = (x1 - x0, y1 - y0);
        let len2 = dx * dx + dy * dy;
        for py in by0..by1 {
            for px in bx0..bx1 {
                let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
                let t = if len2 > 0.0 {
                    (((cx - x0) * dx + (cy - y0) * dy) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (nx, ny) = (x0 + t * dx - cx, y0 + t * dy - cy);
                if nx * nx + ny * ny <= half * half {
                    self.blend(px, py, paint);
                }
            }
        }
    }

    /// Connected segments through `points`, closed back to the first when `close` is set.
    pub fn polyline(&mut self, points: &[(f32, f32)], close: bool, width: f32, paint: Paint) {
        for pair in points.windows(2) {
            self.line(pair[0].0, pair[0].1, pair[1].0, pair[1].1, width, paint);
        }
        if close && points.len() > 2 {
            if let (Some(&(lx, ly)), Some(&(fx, fy))) = (points.last(), points.first()) {
                self.line(lx, ly, fx, fy, width, paint);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, paint: Paint) {
        self.for_each_in_disc(cx, cy, r, |canvas, px, py, _| canvas.blend(px, py, paint));
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32, width: f32, paint: Paint) {
        let half = (width * 0.5).max(0.5);
        self.for_each_in_disc(cx, cy, r + half, |canvas, px, py, d| {
            if (d - r).abs() <= half {
                canvas.blend(px, py, paint);
            }
        });
    }

    /// Fills the disc of `radius` around `(cx, cy)` with a gradient over the distance.
    pub fn radial_gradient(&mut self, cx: f32, cy: f32, radius: f32, gradient: &Gradient) {
        if !(radius > 0.0) {
            return;
        }
        self.for_each_in_disc(cx, cy, radius, |canvas, px, py, d| {
            canvas.blend(px, py, gradient.sample(d / radius));
        });
    }

    /// Fills the whole canvas with a gradient running from `(x0, y0)` to `(x1, y1)`.
    pub fn linear_gradient(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, gradient: &Gradient) {
        let (dx, dy) = (x1 - x0, y1 - y0);
        let len2 = dx * dx + dy * dy;
        for py in 0..self.height() as i64 {
            for px in 0..self.width() as i64 {
                let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
                let t = if len2 > 0.0 {
                    ((cx - x0) * dx + (cy - y0) * dy) / len2
                } else {
                    0.0
                };
                self.blend(px, py, gradient.sample(t.clamp(0.0, 1.0)));
            }
        }
    }

    fn for_each_in_disc(
        &mut self,
        cx: f32,
        cy: f32,
        r: f32,
        mut f: impl FnMut(&mut Canvas, i64, i64, f32),
    ) {
        if !(r > 0.0) || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let (x0, x1) = span(cx - r, cx + r);
        let (y0, y1) = span(cy - r, cy + r);
        for py in y0..y1 {
            for px in x0..x1 {
                let (dx, dy) = (px as f32 + 0.5 - cx, py as f32 + 0.5 - cy);
                let d = (dx * dx + dy * dy).sqrt();
                if d <= r {
                    f(self, px, py, d);
                }
            }
        }
    }
}

/// Pixel index range covering `[a, b)`.
fn span(a: f32, b: f32) -> (i64, i64) {
    let lo = a.min(b);
    let hi = a.max(b);
    (lo.round() as i64, hi.round() as i64)
}

fn to_rgba(paint: Paint) -> Rgba<u8> {
    Rgba([
        channel(paint.r),
        channel(paint.g),
        channel(paint.b),
        channel(paint.a * 255.0),
    ])
}

fn channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn source_over(dst: Rgba<u8>, src: Paint) -> Rgba<u8> {
    let sa = src.a.clamp(0.0, 1.0);
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mix = |s: f32, d: u8| (s * sa + d as f32 * da * (1.0 - sa)) / out_a;
    Rgba([
        channel(mix(src.r, dst[0])),
        channel(mix(src.g, dst[1])),
        channel(mix(src.b, dst[2])),
        channel(out_a * 255.0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blending_over_opaque_keeps_alpha() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.fill(Paint::hex(0x1a1a1a));
        canvas.fill_circle(2.0, 2.0, 2.0, Paint::rgb(0.0, 255.0, 255.0).with_alpha(0.3));
        assert!(canvas.image().pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn half_alpha_over_black_is_half_bright() {
        let mut canvas = Canvas::new(1, 1).unwrap();
        canvas.fill(Paint::gray(0.0));
        canvas.blend(0, 0, Paint::gray(200.0).with_alpha(0.5));
        assert_eq!(canvas.image().get_pixel(0, 0).0, [100, 100, 100, 255]);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(
            Canvas::new(0, 8).err(),
            Some(BuildError::InvalidDimensions { width: 0, height: 8 })
        );
    }

    #[test]
    fn hsl_primaries() {
        let cyan = Paint::hsla(180.0, 1.0, 0.5, 1.0);
        assert_eq!((cyan.r.round(), cyan.g.round(), cyan.b.round()), (0.0, 255.0, 255.0));
        let red = Paint::hsla(0.0, 1.0, 0.5, 1.0);
        assert_eq!((red.r.round(), red.g.round(), red.b.round()), (255.0, 0.0, 0.0));
    }

    #[test]
    fn gradient_interpolates_between_stops() {
        let g = Gradient::new(&[(0.0, Paint::gray(0.0)), (1.0, Paint::gray(100.0))]);
        assert_eq!(g.sample(0.5).r, 50.0);
        assert_eq!(g.sample(2.0).r, 100.0);
    }
}
