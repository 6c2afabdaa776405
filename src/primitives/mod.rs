//! Parametric mesh generators.
//!
//! Shapes follow the usual scene-editor conventions so part layouts read naturally:
//! cylinders and cones stand on the Y axis centered on the origin, tori, rings,
//! circles and planes lie in the XY plane facing +Z, spheres are parameterized by
//! azimuth `phi` and polar `theta` ranges.
//!
//! Degenerate parameters (non-positive sizes, too few segments) are clamped with a
//! warning. Vertices that come out non-finite are dropped, together with every
//! triangle touching them, so NaN never reaches the scene.
//!
//! - `solids` has boxes, cylinders, cones, tori, spheres and flat shapes
//! - `sweep` has extruded outlines, tubes along curves and vertex twists

pub mod solids;
pub mod sweep;

use cgmath::{Vector2, Vector3};
use log::warn;

use crate::data_structures::mesh::{Mesh, ModelVertex};

/// Accumulates vertices and triangles, skipping anything non-finite.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<ModelVertex>,
    indices: Vec<u32>,
    /// Maps a caller's vertex slot to its stored index, `None` when it was dropped.
    slots: Vec<Option<u32>>,
    dropped: usize,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex and returns its slot. Slots stay dense even when a vertex is dropped.
    pub fn add_vertex(&mut self, position: Vector3<f32>, normal: Vector3<f32>, uv: Vector2<f32>) -> u32 {
        let vertex = ModelVertex::new(position, normal, uv);
        let slot = self.slots.len() as u32;
        if vertex.is_finite() {
            self.vertices.push(vertex);
            self.slots.push(Some(self.vertices.len() as u32 - 1));
        } else {
            self.dropped += 1;
            self.slots.push(None);
        }
        slot
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        let resolve = |slot: u32| self.slots.get(slot as usize).copied().flatten();
        if let (Some(a), Some(b), Some(c)) = (resolve(a), resolve(b), resolve(c)) {
            self.indices.extend_from_slice(&[a, b, c]);
        }
    }

    /// Two triangles `a b d` and `b c d`.
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.add_triangle(a, b, d);
        self.add_triangle(b, c, d);
    }

    pub fn vertex_count(&self) -> usize {
        self.slots.len()
    }

    pub fn build(self, name: &str) -> Mesh {
        if self.dropped > 0 {
            warn!("{name}: dropped {} non-finite vertices", self.dropped);
        }
        Mesh::triangles(name, self.vertices, self.indices)
    }
}

pub(crate) fn positive(shape: &str, what: &str, value: f32) -> f32 {
    if value > 0.0 && value.is_finite() {
        value
    } else {
        warn!("{shape}: {what} must be > 0.0, clamping {value} to 0.001");
        0.001
    }
}

pub(crate) fn non_negative(shape: &str, what: &str, value: f32) -> f32 {
    if value >= 0.0 && value.is_finite() {
        value
    } else {
        warn!("{shape}: {what} must be >= 0.0, clamping {value} to 0.0");
        0.0
    }
}

pub(crate) fn segments(shape: &str, value: u32, min: u32) -> u32 {
    if value < min {
        warn!("{shape}: needs at least {min} segments, got {value}");
    }
    value.clamp(min, 512)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_vertices_drop_their_triangles() {
        let mut builder = MeshBuilder::new();
        let n = Vector3::unit_z();
        let uv = Vector2::new(0.0, 0.0);
        let a = builder.add_vertex(Vector3::new(0.0, 0.0, 0.0), n, uv);
        let b = builder.add_vertex(Vector3::new(f32::NAN, 0.0, 0.0), n, uv);
        let c = builder.add_vertex(Vector3::new(0.0, 1.0, 0.0), n, uv);
        let d = builder.add_vertex(Vector3::new(1.0, 1.0, 0.0), n, uv);
        builder.add_triangle(a, b, c);
        builder.add_triangle(a, d, c);
        let mesh = builder.build("partial");
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices(), &[0, 2, 1]);
    }
}
