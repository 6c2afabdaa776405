//! The explicit scene context handed to every builder.
//!
//! [`SceneContext`] owns the mesh, material and texture tables plus the scene root.
//! Builders register resources here and get typed ids back; nodes only store those
//! ids. The noise table and the scatter RNG ride along so that synthesis calls made
//! through the context are reproducible for a given seed.

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    data_structures::{
        material::{Material, MaterialId},
        mesh::{Mesh, MeshId},
        scene_graph::Node,
        texture::{Texture, TextureId},
    },
    noise::NoiseEngine,
};

/// Lengths of the resource tables at some point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableMarks {
    pub meshes: usize,
    pub materials: usize,
    pub textures: usize,
}

#[derive(Debug)]
pub struct SceneContext {
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    textures: Vec<Texture>,
    pub root: Node,
    pub noise: &'static NoiseEngine,
    pub rng: StdRng,
}

impl SceneContext {
    pub fn new(seed: u64) -> Self {
        Self {
            meshes: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            root: Node::group("scene"),
            noise: NoiseEngine::shared(seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn materials_mut(&mut self) -> &mut [Material] {
        &mut self.materials
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn marks(&self) -> TableMarks {
        TableMarks {
            meshes: self.meshes.len(),
            materials: self.materials.len(),
            textures: self.textures.len(),
        }
    }

    /// Drops every resource registered after `marks` was taken.
    pub fn rollback(&mut self, marks: TableMarks) {
        let dropped = self.marks();
        self.meshes.truncate(marks.meshes);
        self.materials.truncate(marks.materials);
        self.textures.truncate(marks.textures);
        log::debug!("rolled resource tables back from {dropped:?} to {marks:?}");
    }

    /// Sets the `time` uniform of every programmable material.
    pub fn sync_time(&mut self, t: f32) {
        for material in self.materials.iter_mut() {
            if let Some(time) = material.time_mut() {
                *time = t;
            }
        }
    }

    /**
     * Tones the scene down for a lit sky: emissive channels drop to 30% and rough
     * surfaces get 0.2 rougher, capped at 1.
     */
    pub fn apply_daylight(&mut self) {
        let mut touched = 0;
        for material in self.materials.iter_mut() {
            let mut changed = false;
            if let Some(intensity) = material.emissive_intensity_mut() {
                *intensity *= 0.3;
                changed = true;
            }
            if let Some(roughness) = material.roughness_mut() {
                *roughness = (*roughness + 0.2).min(1.0);
                changed = true;
            }
            if changed {
                touched += 1;
            }
        }
        log::info!("daylight applied to {touched} of {} materials", self.materials.len());
    }
}

#[cfg(test)]
mod tests {
    use crate::data_structures::material::{
        BasicMaterial, Color, Shading, ShaderUniforms, StandardMaterial, BlendMode,
    };

    use super::*;

    #[test]
    fn daylight_dims_glow_and_roughens_surfaces() {
        let mut ctx = SceneContext::new(3);
        let rough = ctx.add_material(Material::standard(
            "rough",
            StandardMaterial {
                roughness: 0.9,
                emissive_intensity: 0.5,
                ..Default::default()
            },
        ));
        let flat = ctx.add_material(Material::new(
            "flat",
            Shading::Basic(BasicMaterial {
                color: Color::WHITE,
                opacity: 1.0,
                transparent: false,
            }),
        ));
        ctx.apply_daylight();

        let Shading::Standard(m) = &ctx.material(rough).unwrap().shading else {
            panic!("standard material expected");
        };
        assert_eq!(m.roughness, 1.0);
        assert!((m.emissive_intensity - 0.15).abs() < 1e-6);
        assert_eq!(ctx.material(flat).unwrap().shading, Shading::Basic(BasicMaterial {
            color: Color::WHITE,
            opacity: 1.0,
            transparent: false,
        }));
    }

    #[test]
    fn rollback_drops_later_resources_only() {
        let mut ctx = SceneContext::new(3);
        let kept = ctx.add_material(Material::standard("kept", StandardMaterial::default()));
        let marks = ctx.marks();
        ctx.add_material(Material::standard("dropped", StandardMaterial::default()));
        ctx.rollback(marks);
        assert_eq!(ctx.marks(), marks);
        assert_eq!(ctx.materials().len(), 1);
        assert!(ctx.material(kept).is_some());
    }

    #[test]
    fn time_reaches_every_programmable_material() {
        let mut ctx = SceneContext::new(3);
        let id = ctx.add_material(Material::programmable(
            "flow",
            ShaderUniforms::AirFlow {
                time: 0.0,
                color: Color::CYAN,
                opacity: 0.6,
            },
            BlendMode::Additive,
        ));
        ctx.sync_time(2.25);
        assert_eq!(ctx.material(id).unwrap().uniforms().unwrap().time(), 2.25);
    }
}
