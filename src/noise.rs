//! Deterministic 2D gradient noise.
//!
//! A classic Perlin lattice: a shuffled permutation of `0..=255`, duplicated to
//! 512 entries so corner hashes never need wrapping, a quintic fade curve and a
//! bilinear blend of the four corner gradient contributions.
//!
//! Every texture generator samples the same table. [`NoiseEngine::shared`]
//! builds it once per process; [`NoiseEngine::from_seed`] gives an owned table
//! for callers that need isolation.

use std::sync::OnceLock;

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

static SHARED: OnceLock<NoiseEngine> = OnceLock::new();

#[derive(Clone)]
pub struct NoiseEngine {
    perm: [u8; 512],
}

impl std::fmt::Debug for NoiseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseEngine")
            .field("perm[..8]", &&self.perm[..8])
            .finish()
    }
}

impl NoiseEngine {
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut table: Vec<u8> = (0..=255u8).collect();
        table.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    /// The process-wide table. The seed of the first call wins; later seeds are ignored.
    pub fn shared(seed: u64) -> &'static NoiseEngine {
        SHARED.get_or_init(|| {
            log::debug!("noise permutation table seeded with {seed:#x}");
            Self::from_seed(seed)
        })
    }

    /// Gradient noise at `(x, y)`, in `[-1, 1]`. Integer lattice points map to 0.
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        if !x.is_finite() || !y.is_finite() {
            return 0.0;
        }
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let x = x - xf;
        let y = y - yf;

        let u = fade(x);
        let v = fade(y);

        let a = self.perm[xi] as usize + yi;
        let b = self.perm[xi + 1] as usize + yi;

        let value = lerp(
            v,
            lerp(
                u,
                grad(self.perm[a], x, y),
                grad(self.perm[b], x - 1.0, y),
            ),
            lerp(
                u,
                grad(self.perm[a + 1], x, y - 1.0),
                grad(self.perm[b + 1], x - 1.0, y - 1.0),
            ),
        );
        value.clamp(-1.0, 1.0)
    }

    /// Multi-octave sum normalized by the total amplitude, so the result stays in `[-1, 1]`.
    pub fn fractal(&self, x: f64, y: f64, params: &Fractal) -> f64 {
        let mut total = 0.0;
        let mut frequency = params.frequency;
        let mut amplitude = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..params.octaves.max(1) {
            total += self.noise(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            frequency *= params.lacunarity;
            amplitude *= params.persistence;
        }

        (total / max_amplitude).clamp(-1.0, 1.0)
    }

    /// Fractal value remapped from `[-1, 1]` to `[0, 1]`.
    pub fn fractal01(&self, x: f64, y: f64, params: &Fractal) -> f64 {
        (self.fractal(x, y, params) + 1.0) * 0.5
    }
}

/// Octave accumulation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fractal {
    pub octaves: u32,
    /// Frequency of the first octave, in lattice cells per input unit.
    pub frequency: f64,
    pub lacunarity: f64,
    pub persistence: f64,
}

impl Fractal {
    pub const fn new(octaves: u32, frequency: f64) -> Self {
        Self {
            octaves,
            frequency,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

impl Default for Fractal {
    fn default() -> Self {
        Self::new(4, 1.0)
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_hits_endpoints_with_flat_tangents() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < 1e-12);
        let eps = 1e-6;
        assert!((fade(eps) - fade(0.0)) / eps < 1e-6);
    }

    #[test]
    fn lattice_points_are_zero() {
        let engine = NoiseEngine::from_seed(3);
        for i in -4..4 {
            assert_eq!(engine.noise(i as f64, (i * 7) as f64), 0.0);
        }
    }

    #[test]
    fn permutation_is_duplicated() {
        let engine = NoiseEngine::from_seed(11);
        assert_eq!(engine.perm[..256], engine.perm[256..]);
        let mut sorted = engine.perm[..256].to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..=255u8).collect::<Vec<_>>());
    }
}
