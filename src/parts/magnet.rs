//! Magnetic grid systems that sit just inside each inner fan.

use std::f32::consts::FRAC_PI_2;

use cgmath::Vector3;

use crate::{
    context::SceneContext,
    data_structures::scene_graph::{Node, Transform},
    parts::{materials::MagnetMaterials, solid},
    primitives::solids::{cuboid, torus},
};

/// Side of the square laser lattice.
pub const GRID_SIZE: f32 = 8.0;
pub const GRID_DIVISIONS: usize = 8;

/// A flat magnetic ring with a `(divisions + 1)²` lattice of laser beam cubes.
pub fn build_magnet(ctx: &mut SceneContext, m: &MagnetMaterials) -> Node {
    let mut system = Node::group("magnet");
    system.add_child(solid(ctx, torus(4.0, 0.4, 32, 64), m.ring).rotated(FRAC_PI_2, 0.0, 0.0));

    let beam = solid(ctx, cuboid(0.05, 0.05, 0.05), m.beam);
    let step = GRID_SIZE / GRID_DIVISIONS as f32;
    let start = -GRID_SIZE / 2.0;
    for i in 0..=GRID_DIVISIONS {
        for j in 0..=GRID_DIVISIONS {
            let (x, z) = (start + i as f32 * step, start + j as f32 * step);
            system.add_child(beam.clone().at(x, 0.0, z));
        }
    }
    system
}

/**
 * Places a magnet `offset` closer to the center than `fan`, at the fan's height,
 * facing the fan. Returns `None` when the fan sits closer than `min_distance` to the
 * center, where the inward direction is not meaningful.
 */
pub fn place_before(fan: Vector3<f32>, offset: f32, min_distance: f32) -> Option<Transform> {
    let distance = (fan.x * fan.x + fan.z * fan.z).sqrt();
    if !(distance > min_distance) {
        return None;
    }
    let angle = fan.z.atan2(fan.x);
    let mut transform = Transform {
        position: Vector3::new(fan.x - angle.cos() * offset, fan.y, fan.z - angle.sin() * offset),
        ..Default::default()
    };
    transform.look_at(fan);
    Some(transform)
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Rotation};

    use super::*;

    #[test]
    fn magnet_sits_inward_and_faces_its_fan() {
        let fan = Vector3::new(0.0, 0.5, 145.0);
        let placed = place_before(fan, 12.0, 5.0).expect("fan is far from the center");
        assert!((placed.position - Vector3::new(0.0, 0.5, 133.0)).magnitude() < 1e-3);
        let forward = placed.quaternion().rotate_vector(Vector3::unit_z());
        assert!((forward - Vector3::unit_z()).magnitude() < 1e-4);
    }

    #[test]
    fn fans_near_the_center_get_no_magnet() {
        assert!(place_before(Vector3::new(1.0, 0.0, 1.0), 12.0, 5.0).is_none());
    }
}
