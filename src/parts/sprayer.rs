//! Particle sprayer column: bolted base, finned barrel, indicator rings, nozzle and a
//! point cloud that the spray shader advances with `time`.

use std::f32::consts::FRAC_PI_2;

use cgmath::Vector3;
use rand::Rng;

use crate::{
    context::SceneContext,
    data_structures::{
        mesh::{Mesh, ParticleVertex},
        scene_graph::{Node, NodePath},
    },
    error::Result,
    parts::{materials::SprayerMaterials, solid, spoke},
    primitives::solids::{cylinder, torus},
};

pub const SPRAY: &str = "spray";

pub const PARTICLE_COUNT: usize = 50;
/// Particles leave from the top of the barrel.
pub const EMIT_HEIGHT: f32 = 14.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SprayerAnchors {
    pub spray: NodePath,
}

/// Fresh cloud of `PARTICLE_COUNT` particles with random drift, phase and size.
pub fn spray_particles(rng: &mut impl Rng) -> Mesh {
    let points = (0..PARTICLE_COUNT)
        .map(|_| ParticleVertex {
            position: [0.0, EMIT_HEIGHT, 0.0],
            velocity: [
                (rng.random::<f32>() - 0.5) * 0.05,
                0.6 + rng.random::<f32>() * 0.2,
                (rng.random::<f32>() - 0.5) * 0.05,
            ],
            lifetime: rng.random(),
            size: 1.5 + rng.random::<f32>(),
        })
        .collect();
    Mesh::points("spray particles", points)
}

pub fn build_sprayer(ctx: &mut SceneContext, m: &SprayerMaterials) -> Result<(Node, SprayerAnchors)> {
    let mut base = solid(ctx, cylinder(2.5, 3.0, 4.0, 8, 1, false), m.metal);
    base.add_child(solid(ctx, cylinder(3.2, 3.2, 0.5, 8, 1, false), m.metal).at(0.0, 1.5, 0.0));
    let bolt = solid(ctx, cylinder(0.2, 0.2, 0.6, 6, 1, false), m.metal);
    for b in 0..8 {
        let angle = spoke(b, 8);
        base.add_child(bolt.clone().at(angle.cos() * 2.8, 1.5, angle.sin() * 2.8));
    }

    let mut barrel = solid(ctx, cylinder(1.5, 1.8, 12.0, 8, 1, false), m.pipe).at(0.0, 8.0, 0.0);
    let fin = solid(ctx, cylinder(2.0, 2.0, 0.3, 8, 1, false), m.metal);
    for j in 0..6 {
        barrel.add_child(fin.clone().at(0.0, 4.0 + j as f32 * 1.5, 0.0));
    }

    let mut indicator = solid(ctx, torus(1.6, 0.1, 16, 32), m.glow);
    indicator.transform.scale = Vector3::new(0.98, 0.98, 1.0);
    let ring = Node::default()
        .rotated(FRAC_PI_2, 0.0, 0.0)
        .with_child(solid(ctx, torus(1.6, 0.2, 16, 32), m.metal))
        .with_child(indicator);

    let particles = spray_particles(&mut ctx.rng);
    let spray = solid(ctx, particles, m.spray).named(SPRAY);

    let mut sprayer = Node::group("sprayer").with_child(base).with_child(barrel);
    for j in 0..3 {
        sprayer.add_child(ring.clone().at(0.0, 6.0 + j as f32 * 3.0, 0.0));
    }
    sprayer.add_child(solid(ctx, cylinder(1.2, 1.5, 2.0, 8, 1, false), m.metal).at(0.0, 15.0, 0.0));
    sprayer.add_child(spray);

    let spray = sprayer.anchors()?.require(SPRAY)?;
    Ok((sprayer, SprayerAnchors { spray }))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn particles_rise_from_the_nozzle() {
        let mesh = spray_particles(&mut StdRng::seed_from_u64(3));
        let crate::data_structures::mesh::Geometry::Points(points) = &mesh.geometry else {
            panic!("expected a point cloud");
        };
        assert_eq!(points.len(), PARTICLE_COUNT);
        for p in points {
            assert_eq!(p.position, [0.0, EMIT_HEIGHT, 0.0]);
            assert!((0.6..=0.8).contains(&p.velocity[1]));
            assert!(p.velocity[0].abs() <= 0.025 && p.velocity[2].abs() <= 0.025);
            assert!((0.0..1.0).contains(&p.lifetime));
            assert!((1.5..2.5).contains(&p.size));
        }
    }
}
