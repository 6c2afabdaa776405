//! Ground plane.

use std::f32::consts::FRAC_PI_2;

use crate::{
    context::SceneContext,
    data_structures::{material::MaterialId, scene_graph::Node},
    parts::solid,
    primitives::solids::plane,
};

/// Square plane of side `size` laid flat, facing up.
pub fn build_ground(ctx: &mut SceneContext, size: f32, material: MaterialId) -> Node {
    solid(ctx, plane(size, size), material)
        .named("ground")
        .rotated(-FRAC_PI_2, 0.0, 0.0)
}
