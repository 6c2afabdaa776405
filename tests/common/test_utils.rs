#![allow(dead_code)]

use bastion::{
    assembly::base::DefenseBase,
    config::{BaseConfig, DomeConfig, TextureSizes},
    context::SceneContext,
    flow::{RenderHost, TerrainProvider},
    render::Render,
};

pub const SEED: u64 = 7;

/// Full layout with thumbnail rasters and coarse dome spheres.
pub fn small_config() -> BaseConfig {
    BaseConfig::default()
        .with_seed(SEED)
        .with_textures(TextureSizes::thumbnails())
        .with_dome(DomeConfig {
            layers: 3,
            base_radius: 170.0,
            spacing: 3.0,
            segments: 12,
        })
}

pub fn build_base(config: &BaseConfig) -> (SceneContext, DefenseBase) {
    let mut ctx = SceneContext::new(config.seed);
    let base = DefenseBase::build(&mut ctx, config, None).expect("base builds");
    (ctx, base)
}

/// Ground that rises linearly toward +x.
pub struct Slope {
    pub rise: f32,
}

impl TerrainProvider for Slope {
    fn height_at(&self, x: f32, _z: f32) -> f32 {
        x * self.rise
    }
}

pub struct NanTerrain;

impl TerrainProvider for NanTerrain {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        f32::NAN
    }
}

/// Host that runs a fixed number of frames and remembers what it was handed.
pub struct RecordingHost {
    pub remaining: u32,
    pub batches: Vec<usize>,
    pub instances: Vec<usize>,
    pub fail_on: Option<usize>,
}

impl RecordingHost {
    pub fn new(frames: u32) -> Self {
        Self {
            remaining: frames,
            batches: Vec::new(),
            instances: Vec::new(),
            fail_on: None,
        }
    }

    pub fn rendered(&self) -> usize {
        self.batches.len()
    }
}

impl RenderHost for RecordingHost {
    fn render(&mut self, _ctx: &SceneContext, render: &Render) -> anyhow::Result<()> {
        if self.fail_on == Some(self.batches.len()) {
            anyhow::bail!("surface lost");
        }
        self.batches.push(render.batch_count());
        self.instances.push(render.instance_count());
        Ok(())
    }

    fn request_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

pub fn assert_close(a: f32, b: f32, what: &str) {
    assert!((a - b).abs() < 1e-3, "{what}: {a} != {b}");
}
