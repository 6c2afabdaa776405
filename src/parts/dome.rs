//! Hemispherical shield layers.

use crate::{
    context::SceneContext,
    data_structures::scene_graph::Node,
    parts::{materials::dome_layer_material, solid},
    primitives::solids::{SphereSweep, sphere},
};

pub fn layer_name(index: usize) -> String {
    format!("domeLayer_{index}")
}

/// Upper hemisphere of `radius` with the energy material of layer `index`.
pub fn build_dome_layer(ctx: &mut SceneContext, index: usize, radius: f32, segments: u32) -> Node {
    let material = dome_layer_material(ctx, index);
    solid(ctx, sphere(radius, segments, segments, SphereSweep::HEMISPHERE), material)
        .named(&layer_name(index))
}
