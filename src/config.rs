//! Layout and animation configuration for the defense base.
//!
//! All constants that shape the scene live here so that callers (and tests) can
//! shrink textures or change ring sizes without touching the builders.

use std::f32::consts::PI;

/// `count` instances evenly spaced on a circle of `radius`, lifted by `height`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingLayout {
    pub count: usize,
    pub radius: f32,
    pub height: f32,
}

impl RingLayout {
    pub const fn new(count: usize, radius: f32, height: f32) -> Self {
        Self {
            count,
            radius,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomeConfig {
    pub layers: usize,
    pub base_radius: f32,
    pub spacing: f32,
    /// Width and height segments of each hemisphere.
    pub segments: u32,
}

/// Raster sizes (square) used for every generated texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureSizes {
    pub nano: u32,
    pub tech: u32,
    pub metal: u32,
    pub normal: u32,
    pub ground: u32,
    pub missile: u32,
    pub sprite: u32,
}

impl TextureSizes {
    /// Tiny rasters, handy when only the scene graph matters.
    pub const fn thumbnails() -> Self {
        Self {
            nano: 32,
            tech: 32,
            metal: 32,
            normal: 16,
            ground: 32,
            missile: 32,
            sprite: 8,
        }
    }
}

impl Default for TextureSizes {
    fn default() -> Self {
        Self {
            nano: 512,
            tech: 256,
            metal: 256,
            normal: 256,
            ground: 1024,
            missile: 512,
            sprite: 64,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationConfig {
    /// Radians per frame a turret turns toward its target.
    pub rotation_speed: f32,
    /// Per-frame chance that a turret picks a new target angle.
    pub retarget_probability: f64,
    /// Half-width of the arc new targets are drawn from, around the resting aim.
    pub aim_spread: f32,
    /// Per-frame, per-cell chance that a ready missile launches.
    pub fire_probability: f64,
    /// Seconds a turret waits after a launch before another cell may fire.
    pub shot_interval: f64,
    /// Seconds the launch tween runs.
    pub launch_duration: f64,
    pub launch_height: f32,
    pub blade_spin_per_frame: f32,
    /// Angular frequency of the weapon pod sway, rad/s.
    pub pod_sway_frequency: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 0.02,
            retarget_probability: 0.005,
            aim_spread: 0.15 * PI,
            fire_probability: 0.001,
            shot_interval: 2.0,
            launch_duration: 1.0,
            launch_height: 20.0,
            blade_spin_per_frame: 0.3,
            pod_sway_frequency: 1.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BaseConfig {
    pub seed: u64,
    pub turrets: RingLayout,
    pub outer_fans: RingLayout,
    pub inner_fans: RingLayout,
    pub sprayers: RingLayout,
    pub dome: DomeConfig,
    pub magnet_offset: f32,
    pub magnet_min_distance: f32,
    pub ground_size: f32,
    pub textures: TextureSizes,
    pub animation: AnimationConfig,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_ba5e,
            turrets: RingLayout::new(12, 220.0, 5.0),
            outer_fans: RingLayout::new(24, 180.0, 0.5),
            inner_fans: RingLayout::new(24, 145.0, 0.5),
            sprayers: RingLayout::new(24, 170.0, 0.0),
            dome: DomeConfig {
                layers: 3,
                base_radius: 170.0,
                spacing: 3.0,
                segments: 128,
            },
            magnet_offset: 12.0,
            magnet_min_distance: 5.0,
            ground_size: 2000.0,
            textures: TextureSizes::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl BaseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_textures(mut self, textures: TextureSizes) -> Self {
        self.textures = textures;
        self
    }

    pub fn with_turrets(mut self, turrets: RingLayout) -> Self {
        self.turrets = turrets;
        self
    }

    pub fn with_fans(mut self, outer: RingLayout, inner: RingLayout) -> Self {
        self.outer_fans = outer;
        self.inner_fans = inner;
        self
    }

    pub fn with_sprayers(mut self, sprayers: RingLayout) -> Self {
        self.sprayers = sprayers;
        self
    }

    pub fn with_dome(mut self, dome: DomeConfig) -> Self {
        self.dome = dome;
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }
}
