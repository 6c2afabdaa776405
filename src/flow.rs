//! Frame loop and the external collaborators.
//!
//! The core never owns a window, camera or lights. A [`RenderHost`] provides those and
//! decides when the next frame runs; a [`TerrainProvider`] optionally answers ground
//! heights during assembly. [`FrameLoop`] ties them together:
//!
//! 1. Ask the host for a frame
//! 2. Advance the animation driver to the elapsed time
//! 3. Refresh world transforms
//! 4. Batch the tree and hand it to the host

use std::fmt::Debug;

use instant::{Duration, Instant};

use crate::{
    animation::driver::AnimationDriver, assembly::base::DefenseBase, context::SceneContext,
    render::Render,
};

/// Ground height lookup used when placing ring slots.
pub trait TerrainProvider {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

/// Level ground at a constant height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatTerrain {
    pub height: f32,
}

impl TerrainProvider for FlatTerrain {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }
}

/// The rendering side: owns the surface, camera and lights, and schedules frames.
pub trait RenderHost {
    /// Draws one frame from the batched scene.
    fn render(&mut self, ctx: &SceneContext, render: &Render) -> anyhow::Result<()>;

    /// Called before every frame. Returning `false` ends the loop.
    fn request_frame(&mut self) -> bool;
}

impl Debug for dyn RenderHost + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RenderHost")
    }
}

/// Drives update-and-render passes against a host.
#[derive(Debug)]
pub struct FrameLoop {
    started: Instant,
    frames: u64,
    time_since_report: Duration,
    last_frame: Instant,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            frames: 0,
            time_since_report: Duration::ZERO,
            last_frame: now,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One pass at absolute time `t` seconds.
    pub fn frame(
        &mut self,
        t: f64,
        base: &mut DefenseBase,
        ctx: &mut SceneContext,
        driver: &mut AnimationDriver,
        host: &mut dyn RenderHost,
    ) -> anyhow::Result<()> {
        driver.update(base, ctx, t);
        ctx.root.update_world_transform_all();
        let render = Render::collect(ctx);
        if let Err(e) = host.render(ctx, &render) {
            log::error!("render host failed on frame {}: {e}", self.frames);
            return Err(e);
        }
        self.frames += 1;

        let now = Instant::now();
        self.time_since_report += now - self.last_frame;
        self.last_frame = now;
        if self.time_since_report >= Duration::from_secs(1) {
            log::debug!(
                "frame {}: {} batches, {} instances",
                self.frames,
                render.batch_count(),
                render.instance_count()
            );
            self.time_since_report = Duration::ZERO;
        }
        Ok(())
    }

    /// Runs frames on the wall clock until the host stops requesting them.
    pub fn run(
        &mut self,
        base: &mut DefenseBase,
        ctx: &mut SceneContext,
        driver: &mut AnimationDriver,
        host: &mut dyn RenderHost,
    ) -> anyhow::Result<u64> {
        while host.request_frame() {
            let t = self.started.elapsed().as_secs_f64();
            self.frame(t, base, ctx, driver, host)?;
        }
        log::info!("frame loop stopped after {} frames", self.frames);
        Ok(self.frames)
    }
}

/// Installs the platform logger: `env_logger` natively, the browser console on WASM.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .try_init()
        {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            log::warn!("could not initialize console logger: {e}");
        }
    }
}
