//! The per-frame update.
//!
//! One call to [`AnimationDriver::update`] per rendered frame. Oscillations are
//! evaluated from the absolute time `t`, so they stay correct at any frame rate.
//! Aim tracking, blade spin and launch trials step once per call. A node that cannot
//! be found is logged and skipped for that frame only; finished launches land even
//! then.

use cgmath::Rad;
use log::{debug, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    assembly::base::{DefenseBase, TurretInstance},
    config::AnimationConfig,
    context::SceneContext,
    data_structures::scene_graph::{Node, NodePath},
    parts::spoke,
};

#[derive(Debug)]
pub struct AnimationDriver {
    config: AnimationConfig,
    rng: StdRng,
    frames: u64,
}

/// Runs `update` on the node at `path`, or warns and does nothing.
fn with_node(root: &mut Node, path: &NodePath, what: &str, update: impl FnOnce(&mut Node)) -> bool {
    match root.get_mut(path) {
        Some(node) => {
            update(node);
            true
        }
        None => {
            warn!("{what} not found at {path:?}, skipped this frame");
            false
        }
    }
}

impl AnimationDriver {
    pub fn new(config: AnimationConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advances the whole base to time `t` seconds.
    pub fn update(&mut self, base: &mut DefenseBase, ctx: &mut SceneContext, t: f64) {
        self.frames += 1;
        ctx.sync_time(t as f32);

        for (i, turret) in base.turrets.iter_mut().enumerate() {
            self.animate_turret(turret, i, &mut ctx.root, t);
        }
        self.animate_fans(base, &mut ctx.root);
        animate_dome(base, &mut ctx.root, t as f32);
        animate_magnets(base, ctx, t as f32);
    }

    fn animate_turret(&mut self, turret: &mut TurretInstance, index: usize, root: &mut Node, t: f64) {
        let cfg = self.config;
        let tf = t as f32;
        let phase = index as f32;

        if self.rng.random_bool(cfg.retarget_probability.clamp(0.0, 1.0)) {
            turret.state.retarget(&mut self.rng, cfg.aim_spread);
        }
        let aim = turret.state.step_aim();

        // landing runs even when the turret node is missing
        let mut landed = vec![false; turret.state.cells.len()];
        for (slot, cell) in turret.state.cells.iter_mut().enumerate() {
            if cell.launch_finished(t) {
                match cell.land() {
                    Ok(()) => landed[slot] = true,
                    Err(e) => warn!("turret {index} cell {slot}: {e}"),
                }
            }
        }

        if !with_node(root, &turret.root, "turret", |n| n.transform.rotation.y = Rad(aim)) {
            return;
        }

        let base = turret.path(&turret.anchors.base);
        with_node(root, &base, "turret base", |n| {
            n.transform.rotation.y = Rad((tf * 0.5 + phase).sin() * 0.1);
        });
        let pivot = turret.path(&turret.anchors.gun_pivot);
        with_node(root, &pivot, "gun pivot", |n| {
            n.transform.rotation.x = Rad((tf * 0.7 + phase).sin() * 0.15);
        });
        let guns = turret.path(&turret.anchors.main_guns);
        with_node(root, &guns, "main guns", |n| {
            n.transform.rotation.x = Rad(tf.sin() * 0.05);
        });

        let pod_count = turret.anchors.pods.len();
        for (k, pod) in turret.anchors.pods.iter().enumerate() {
            let offset = spoke(k, pod_count);
            let path = turret.root.join(pod);
            with_node(root, &path, "weapon pod", |n| {
                n.transform.rotation.z = Rad((cfg.pod_sway_frequency * tf + offset).sin() * 0.1);
                n.transform.rotation.x = Rad((tf * 0.3 + k as f32 + phase).sin() * 0.2);
            });
        }

        for slot in 0..turret.state.cells.len() {
            let Some(missile) = turret.anchors.missiles.get(slot) else {
                warn!("turret {index} has no missile anchor for cell {slot}");
                continue;
            };
            let path = turret.root.join(missile);
            let interval_elapsed = turret.state.interval_elapsed(t);
            let cell = &mut turret.state.cells[slot];

            if cell.is_ready()
                && !landed[slot]
                && interval_elapsed
                && self.rng.random_bool(cfg.fire_probability.clamp(0.0, 1.0))
            {
                match cell.fire(t, cfg.launch_height, cfg.launch_duration) {
                    Ok(()) => {
                        turret.state.last_shot_time = Some(t);
                        debug!("turret {index} launched cell {slot} at t={t:.2}");
                    }
                    Err(e) => warn!("turret {index} cell {slot}: {e}"),
                }
            }
            let position = cell.position(t);
            with_node(root, &path, "missile", |n| n.transform.position = position);
        }
    }

    fn animate_fans(&self, base: &DefenseBase, root: &mut Node) {
        let spin = self.config.blade_spin_per_frame;
        for fan in &base.fans {
            let blades = fan.root.join(&fan.anchors.blades);
            with_node(root, &blades, "fan blades", |n| n.transform.rotation.y += Rad(spin));
        }
    }
}

fn animate_dome(base: &DefenseBase, root: &mut Node, t: f32) {
    for layer in &base.dome {
        let i = layer.index as f32;
        with_node(root, &layer.root, "dome layer", |n| {
            n.transform.rotation.y = Rad(t * (0.1 - i * 0.02));
            n.transform.position.y = (t * 0.5 + i).sin() * 0.5;
        });
    }
}

/// Shared magnet materials pulse once per frame; every mesh in every system spins.
fn animate_magnets(base: &DefenseBase, ctx: &mut SceneContext, t: f32) {
    let opacity = 0.6 + (t * 2.0).sin() * 0.2;
    let glow = 0.5 + (t * 3.0).sin() * 0.3;
    let materials = base.magnets.materials;
    for id in [materials.ring, materials.beam] {
        let Some(material) = ctx.material_mut(id) else {
            warn!("magnet material {id:?} missing, skipped this frame");
            continue;
        };
        if let Some(o) = material.opacity_mut() {
            *o = opacity;
        }
        if let Some(e) = material.emissive_intensity_mut() {
            *e = glow;
        }
    }

    let spin = Rad(t * 0.5);
    for system in &base.magnets.systems {
        with_node(&mut ctx.root, system, "magnet", |n| {
            for part in n.get_children_mut() {
                if part.drawable.is_some() {
                    part.transform.rotation.y = spin;
                }
            }
        });
    }
}
