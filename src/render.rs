//! Render composition and batching.
//!
//! [`Render::collect`] flattens the scene tree into draw batches for the render
//! collaborator. Drawables sharing a mesh and a material are merged into one
//! [`Instanced`] batch carrying a packed per-instance transform each. Batches are
//! split into an opaque pass and a blended pass; programmable and transparent
//! materials go to the blended one.
//!
//! World transforms must be current, see
//! [`Node::update_world_transform_all`](crate::data_structures::scene_graph::Node::update_world_transform_all).

use std::collections::HashMap;

use log::warn;

use crate::{
    context::SceneContext,
    data_structures::{
        instance::InstanceRaw, material::MaterialId, mesh::MeshId, scene_graph::Node,
    },
};

/// One mesh drawn with one material at many transforms.
#[derive(Clone, Debug, PartialEq)]
pub struct Instanced {
    pub mesh: MeshId,
    pub material: MaterialId,
    pub instances: Vec<InstanceRaw>,
}

impl Instanced {
    /// Instance buffer contents, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Render {
    pub opaque: Vec<Instanced>,
    pub transparent: Vec<Instanced>,
}

#[derive(Default)]
struct Batcher {
    render: Render,
    opaque: HashMap<(MeshId, MaterialId), usize>,
    transparent: HashMap<(MeshId, MaterialId), usize>,
}

impl Batcher {
    fn push(&mut self, mesh: MeshId, material: MaterialId, blended: bool, raw: InstanceRaw) {
        let (lookup, batches) = if blended {
            (&mut self.transparent, &mut self.render.transparent)
        } else {
            (&mut self.opaque, &mut self.render.opaque)
        };
        let slot = *lookup.entry((mesh, material)).or_insert_with(|| {
            batches.push(Instanced {
                mesh,
                material,
                instances: Vec::new(),
            });
            batches.len() - 1
        });
        batches[slot].instances.push(raw);
    }
}

impl Render {
    /// Batches every visible drawable under the context root.
    pub fn collect(ctx: &SceneContext) -> Render {
        let mut batcher = Batcher::default();
        let mut skipped = 0usize;
        collect_node(ctx, &ctx.root, &mut batcher, &mut skipped);
        if skipped > 0 {
            warn!("{skipped} drawables reference missing meshes or materials and were skipped");
        }
        batcher.render
    }

    pub fn batch_count(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }

    pub fn instance_count(&self) -> usize {
        self.opaque
            .iter()
            .chain(self.transparent.iter())
            .map(|b| b.instances.len())
            .sum()
    }
}

fn collect_node(ctx: &SceneContext, node: &Node, batcher: &mut Batcher, skipped: &mut usize) {
    if !node.visible {
        return;
    }
    if let Some(drawable) = node.drawable {
        match (ctx.mesh(drawable.mesh), ctx.material(drawable.material)) {
            (Some(_), Some(material)) => batcher.push(
                drawable.mesh,
                drawable.material,
                material.is_transparent(),
                node.world_transform().to_raw(),
            ),
            _ => *skipped += 1,
        }
    }
    for child in node.get_children() {
        collect_node(ctx, child, batcher, skipped);
    }
}

#[cfg(test)]
mod tests {
    use crate::data_structures::material::{BlendMode, Material, ShaderUniforms, StandardMaterial};
    use crate::primitives::solids::cuboid;

    use super::*;

    #[test]
    fn shared_mesh_and_material_merge_into_one_batch() {
        let mut ctx = SceneContext::new(1);
        let mesh = ctx.add_mesh(cuboid(1.0, 1.0, 1.0));
        let solid = ctx.add_material(Material::standard("solid", StandardMaterial::default()));
        let glow = ctx.add_material(Material::programmable(
            "glow",
            ShaderUniforms::AirFlow {
                time: 0.0,
                color: crate::data_structures::material::Color::CYAN,
                opacity: 0.6,
            },
            BlendMode::Additive,
        ));
        ctx.root.add_child(Node::mesh(mesh, solid).at(1.0, 0.0, 0.0));
        ctx.root.add_child(Node::mesh(mesh, solid).at(2.0, 0.0, 0.0));
        ctx.root.add_child(Node::mesh(mesh, glow));
        let mut hidden = Node::mesh(mesh, solid);
        hidden.visible = false;
        ctx.root.add_child(hidden);
        ctx.root.update_world_transform_all();

        let render = Render::collect(&ctx);
        assert_eq!(render.opaque.len(), 1);
        assert_eq!(render.opaque[0].instances.len(), 2);
        assert_eq!(render.opaque[0].instances[1].translation(), [2.0, 0.0, 0.0]);
        assert_eq!(render.transparent.len(), 1);
        assert_eq!(render.instance_count(), 3);
    }
}
