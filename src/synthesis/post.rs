//! Whole-image post passes: grain, threshold bloom, blur and a tone curve.
//!
//! All passes leave the alpha channel alone except [`blur`], which filters all four
//! channels.

use image::{RgbaImage, imageops};
use rand::Rng;

/// Adds an independent symmetric offset in `[-amplitude, amplitude]` to every RGB channel.
pub fn grain(image: &mut RgbaImage, rng: &mut impl Rng, amplitude: f32) {
    if !(amplitude > 0.0) {
        return;
    }
    for px in image.pixels_mut() {
        for c in 0..3 {
            let offset = rng.random_range(-amplitude..=amplitude);
            px[c] = (px[c] as f32 + offset).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Brightens pixels whose channel average exceeds `threshold` by `gain`, clamped to 255.
pub fn bloom(image: &mut RgbaImage, threshold: f32, gain: f32) {
    for px in image.pixels_mut() {
        let brightness = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
        if brightness > threshold {
            for c in 0..3 {
                px[c] = (px[c] as f32 * gain).min(255.0) as u8;
            }
        }
    }
}

/// Gaussian blur of all four channels.
pub fn blur(image: &RgbaImage, sigma: f32) -> RgbaImage {
    if !(sigma > 0.0) {
        return image.clone();
    }
    imageops::blur(image, sigma)
}

/// Maps each RGB channel through `255 * (v / 255)^exponent`.
pub fn contrast(image: &mut RgbaImage, exponent: f32) {
    for px in image.pixels_mut() {
        for c in 0..3 {
            px[c] = ((px[c] as f32 / 255.0).powf(exponent) * 255.0).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn bloom_only_touches_bright_pixels() {
        let mut image = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([100, 100, 100, 255])
            } else {
                Rgba([220, 220, 220, 255])
            }
        });
        bloom(&mut image, 200.0, 1.2);
        assert_eq!(image.get_pixel(0, 0).0, [100, 100, 100, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn contrast_darkens_midtones_and_keeps_extremes() {
        let mut image = RgbaImage::from_fn(3, 1, |x, _| {
            let c = [0, 128, 255][x as usize];
            Rgba([c, c, c, 200])
        });
        contrast(&mut image, 1.5);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 200]);
        assert_eq!(image.get_pixel(1, 0).0, [91, 91, 91, 200]);
        assert_eq!(image.get_pixel(2, 0).0, [255, 255, 255, 200]);
    }

    #[test]
    fn grain_stays_within_amplitude_and_keeps_alpha() {
        let mut image = RgbaImage::from_pixel(8, 8, Rgba([128, 128, 128, 255]));
        let mut rng = StdRng::seed_from_u64(1);
        grain(&mut image, &mut rng, 5.0);
        for px in image.pixels() {
            assert!(px.0[..3].iter().all(|&c| (123..=133).contains(&c)));
            assert_eq!(px[3], 255);
        }
    }
}
