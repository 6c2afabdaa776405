//! Part builders for the mechanical sub-assemblies of the base.
//!
//! Every builder takes the [`SceneContext`] (to register meshes) and a material set,
//! and returns an unplaced root [`Node`] together with handles to the sub-nodes the
//! animation driver moves. Handles are resolved from anchor names right after
//! construction; a missing or duplicated anchor fails the whole build.
//!
//! Repeated features are laid out by index with closed-form spacing. A part that has
//! to rotate about a point other than its own origin is wrapped with
//! [`Node::into_pivot`]. Overall scale is set on the returned root only.
//!
//! - `materials` synthesizes the shared textures and every material set
//! - `turret` is the anti-air turret with its pods, guns and missile cells
//! - `fan` has the tilted outer fans and the vertical inner fans
//! - `sprayer` is the particle sprayer column
//! - `dome` is one hemispherical shield layer
//! - `magnet` is the magnetic ring and laser lattice placed next to inner fans
//! - `ground` is the textured ground plane

pub mod dome;
pub mod fan;
pub mod ground;
pub mod magnet;
pub mod materials;
pub mod sprayer;
pub mod turret;

use std::f32::consts::TAU;

use crate::{
    context::SceneContext,
    data_structures::{material::MaterialId, mesh::Mesh, scene_graph::Node},
};

/// Registers `mesh` and returns a node drawing it with `material`.
pub(crate) fn solid(ctx: &mut SceneContext, mesh: Mesh, material: MaterialId) -> Node {
    Node::mesh(ctx.add_mesh(mesh), material)
}

/// Angle of slot `i` out of `count` evenly spaced slots.
pub(crate) fn spoke(i: usize, count: usize) -> f32 {
    i as f32 / count as f32 * TAU
}
