//! Timed interpolation between two positions.

use cgmath::{Vector3, VectorSpace};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    /// Fast start, decelerating into the end value.
    QuadraticOut,
}

impl Easing {
    /// Maps linear progress `k` in `[0, 1]` onto the curve.
    pub fn apply(self, k: f64) -> f64 {
        let k = k.clamp(0.0, 1.0);
        match self {
            Easing::Linear => k,
            Easing::QuadraticOut => k * (2.0 - k),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: Vector3<f32>,
    to: Vector3<f32>,
    start: f64,
    duration: f64,
    easing: Easing,
}

impl Tween {
    /// A tween from `from` to `to` starting at `start` seconds. A non-positive
    /// duration finishes immediately.
    pub fn new(from: Vector3<f32>, to: Vector3<f32>, start: f64, duration: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration: duration.max(0.0),
            easing,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Linear progress at `t`, clamped to `[0, 1]`.
    pub fn progress(&self, t: f64) -> f64 {
        if self.duration == 0.0 {
            return 1.0;
        }
        ((t - self.start) / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, t: f64) -> bool {
        self.progress(t) >= 1.0
    }

    pub fn sample(&self, t: f64) -> Vector3<f32> {
        let k = self.easing.apply(self.progress(t)) as f32;
        self.from.lerp(self.to, k)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::InnerSpace;

    use super::*;

    #[test]
    fn quadratic_out_hits_both_ends_and_leads_linear() {
        assert_eq!(Easing::QuadraticOut.apply(0.0), 0.0);
        assert_eq!(Easing::QuadraticOut.apply(1.0), 1.0);
        assert!(Easing::QuadraticOut.apply(0.5) > 0.5);
        assert_eq!(Easing::QuadraticOut.apply(3.0), 1.0);
    }

    #[test]
    fn sample_follows_the_curve_and_holds_the_end() {
        let tween = Tween::new(
            Vector3::new(0.0, 0.6, 0.0),
            Vector3::new(0.0, 20.6, 0.0),
            10.0,
            1.0,
            Easing::QuadraticOut,
        );
        assert!((tween.sample(9.0) - Vector3::new(0.0, 0.6, 0.0)).magnitude() < 1e-6);
        assert!((tween.sample(10.5).y - 15.6).abs() < 1e-4);
        assert!(!tween.is_finished(10.99));
        assert!(tween.is_finished(11.0));
        assert!((tween.sample(12.0).y - 20.6).abs() < 1e-4);
    }

    #[test]
    fn zero_duration_is_already_finished() {
        let tween = Tween::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0), 0.0, 0.0, Easing::Linear);
        assert!(tween.is_finished(0.0));
        assert_eq!(tween.sample(0.0), Vector3::new(1.0, 0.0, 0.0));
    }
}
