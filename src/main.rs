//! Headless demo: builds the full base, animates it against a host that only logs
//! what it would draw, and optionally exports every texture as PNG.
//!
//! Environment:
//! - `BASTION_FRAMES` number of frames to run (default 600, at 60 fps simulated time)
//! - `BASTION_SEED` scene seed
//! - `BASTION_EXPORT_DIR` directory to write textures to
//! - `RUST_LOG` log filter (default `info`)

use std::{env, fs, path::PathBuf};

use anyhow::Context;
use log::info;

use bastion::{
    animation::driver::AnimationDriver,
    assembly::base::DefenseBase,
    config::BaseConfig,
    context::SceneContext,
    flow::{FlatTerrain, FrameLoop, RenderHost, init_logging},
    render::Render,
    synthesis,
};

const FRAME_RATE: f64 = 60.0;

/// Stands in for a real renderer and reports the batch sizes now and then.
struct LoggingHost {
    remaining: u64,
    drawn: u64,
}

impl RenderHost for LoggingHost {
    fn render(&mut self, ctx: &SceneContext, render: &Render) -> anyhow::Result<()> {
        if self.drawn % 120 == 0 {
            info!(
                "frame {}: {} opaque + {} blended batches, {} instances, {} meshes",
                self.drawn,
                render.opaque.len(),
                render.transparent.len(),
                render.instance_count(),
                ctx.meshes().len()
            );
        }
        self.drawn += 1;
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

fn env_number(name: &str, default: u64) -> anyhow::Result<u64> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{name} must be a whole number, got `{value}`")),
        Err(_) => Ok(default),
    }
}

fn export_textures(ctx: &mut SceneContext, dir: &PathBuf) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let extra = synthesis::catalog(512, ctx.noise, &mut ctx.rng)?;
    for (i, texture) in ctx.textures().iter().chain(extra.iter()).enumerate() {
        let file = format!("{i:02}_{}.png", texture.label.replace(' ', "_"));
        texture.save_png(dir.join(file))?;
    }
    info!("textures written to {}", dir.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let frames = env_number("BASTION_FRAMES", 600)?;
    let config = BaseConfig::default().with_seed(env_number("BASTION_SEED", BaseConfig::default().seed)?);

    let mut ctx = SceneContext::new(config.seed);
    let mut base = DefenseBase::build(&mut ctx, &config, Some(&FlatTerrain::default()))?;
    ctx.apply_daylight();

    if let Ok(dir) = env::var("BASTION_EXPORT_DIR") {
        export_textures(&mut ctx, &PathBuf::from(dir))?;
    }

    let mut driver = AnimationDriver::new(config.animation, config.seed);
    let mut frame_loop = FrameLoop::new();
    let mut host = LoggingHost {
        remaining: frames,
        drawn: 0,
    };
    while host.request_frame() {
        let t = frame_loop.frames() as f64 / FRAME_RATE;
        frame_loop.frame(t, &mut base, &mut ctx, &mut driver, &mut host)?;
    }
    info!("rendered {} frames of simulated time", frame_loop.frames());
    Ok(())
}
