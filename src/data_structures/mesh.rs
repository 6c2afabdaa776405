//! CPU-side triangle and point meshes.
//!
//! Meshes are produced by the generators in [`crate::primitives`] and stored once in
//! the [`crate::context::SceneContext`] mesh table. Nodes refer to them by [`MeshId`].
//! The vertex layout is `Pod` so a renderer can upload it unchanged.

use cgmath::{InnerSpace, Vector2, Vector3};

/// Index into the mesh table of a scene context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl ModelVertex {
    pub fn new(position: Vector3<f32>, normal: Vector3<f32>, uv: Vector2<f32>) -> Self {
        Self {
            position: position.into(),
            tex_coords: uv.into(),
            normal: normal.into(),
            ..Default::default()
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position
            .iter()
            .chain(self.normal.iter())
            .chain(self.tex_coords.iter())
            .all(|c| c.is_finite())
    }
}

/// Per-point attributes of a particle cloud.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub lifetime: f32,
    pub size: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Triangles {
        vertices: Vec<ModelVertex>,
        indices: Vec<u32>,
    },
    Points(Vec<ParticleVertex>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub geometry: Geometry,
}

impl Mesh {
    pub fn triangles(name: &str, vertices: Vec<ModelVertex>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            name: name.to_string(),
            geometry: Geometry::Triangles { vertices, indices },
        };
        mesh.compute_tangents();
        mesh
    }

    pub fn points(name: &str, points: Vec<ParticleVertex>) -> Self {
        Self {
            name: name.to_string(),
            geometry: Geometry::Points(points),
        }
    }

    pub fn vertex_count(&self) -> usize {
        match &self.geometry {
            Geometry::Triangles { vertices, .. } => vertices.len(),
            Geometry::Points(points) => points.len(),
        }
    }

    pub fn vertices(&self) -> &[ModelVertex] {
        match &self.geometry {
            Geometry::Triangles { vertices, .. } => vertices,
            Geometry::Points(_) => &[],
        }
    }

    pub fn indices(&self) -> &[u32] {
        match &self.geometry {
            Geometry::Triangles { indices, .. } => indices,
            Geometry::Points(_) => &[],
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices().len() / 3
    }

    /// Smooth normals: each vertex gets the normalized sum of its triangles' face normals.
    pub fn compute_vertex_normals(&mut self) {
        let Geometry::Triangles { vertices, indices } = &mut self.geometry else {
            return;
        };
        let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
        for c in indices.chunks_exact(3) {
            let [i0, i1, i2] = [c[0] as usize, c[1] as usize, c[2] as usize];
            let p0: Vector3<f32> = vertices[i0].position.into();
            let p1: Vector3<f32> = vertices[i1].position.into();
            let p2: Vector3<f32> = vertices[i2].position.into();
            let face = (p1 - p0).cross(p2 - p0);
            for i in [i0, i1, i2] {
                sums[i] += face;
            }
        }
        for (vertex, sum) in vertices.iter_mut().zip(sums) {
            vertex.normal = normalize_or_zero(sum).into();
        }
    }

    /**
     * Generated meshes carry positions, normals and uvs only, so tangents and bitangents
     * are solved per triangle from the uv deltas and averaged per vertex.
     * Triangles with a degenerate uv mapping contribute nothing.
     */
    pub fn compute_tangents(&mut self) {
        let Geometry::Triangles { vertices, indices } = &mut self.geometry else {
            return;
        };
        let mut triangles_included = vec![0u32; vertices.len()];
        let mut tangents = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
        let mut bitangents = tangents.clone();

        for c in indices.chunks_exact(3) {
            let [i0, i1, i2] = [c[0] as usize, c[1] as usize, c[2] as usize];
            let pos0: Vector3<f32> = vertices[i0].position.into();
            let pos1: Vector3<f32> = vertices[i1].position.into();
            let pos2: Vector3<f32> = vertices[i2].position.into();
            let uv0: Vector2<f32> = vertices[i0].tex_coords.into();
            let uv1: Vector2<f32> = vertices[i1].tex_coords.into();
            let uv2: Vector2<f32> = vertices[i2].tex_coords.into();

            let delta_pos1 = pos1 - pos0;
            let delta_pos2 = pos2 - pos0;
            let delta_uv1 = uv1 - uv0;
            let delta_uv2 = uv2 - uv0;

            let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
            if det.abs() < f32::EPSILON {
                continue;
            }
            let r = 1.0 / det;
            let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
            // flipped for right-handed normal maps
            let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

            for i in [i0, i1, i2] {
                tangents[i] += tangent;
                bitangents[i] += bitangent;
                triangles_included[i] += 1;
            }
        }

        for (i, n) in triangles_included.into_iter().enumerate() {
            if n == 0 {
                continue;
            }
            let t = tangents[i] / n as f32;
            let b = bitangents[i] / n as f32;
            vertices[i].tangent = normalize_or_zero(t).into();
            vertices[i].bitangent = normalize_or_zero(b).into();
        }
    }
}

pub(crate) fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    let len = v.magnitude();
    if len > f32::EPSILON && len.is_finite() {
        v / len
    } else {
        Vector3::new(0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tangent_follows_u_direction() {
        let n = Vector3::new(0.0, 0.0, 1.0);
        let vertices = vec![
            ModelVertex::new(Vector3::new(0.0, 0.0, 0.0), n, Vector2::new(0.0, 0.0)),
            ModelVertex::new(Vector3::new(1.0, 0.0, 0.0), n, Vector2::new(1.0, 0.0)),
            ModelVertex::new(Vector3::new(0.0, 1.0, 0.0), n, Vector2::new(0.0, 1.0)),
        ];
        let mesh = Mesh::triangles("quad", vertices, vec![0, 1, 2]);
        let t: Vector3<f32> = mesh.vertices()[0].tangent.into();
        assert!((t - Vector3::new(1.0, 0.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn degenerate_uvs_leave_tangents_zeroed() {
        let n = Vector3::new(0.0, 1.0, 0.0);
        let uv = Vector2::new(0.5, 0.5);
        let vertices = vec![
            ModelVertex::new(Vector3::new(0.0, 0.0, 0.0), n, uv),
            ModelVertex::new(Vector3::new(1.0, 0.0, 0.0), n, uv),
            ModelVertex::new(Vector3::new(0.0, 0.0, 1.0), n, uv),
        ];
        let mesh = Mesh::triangles("flat", vertices, vec![0, 1, 2]);
        assert!(mesh.vertices().iter().all(|v| v.tangent == [0.0; 3]));
    }
}
