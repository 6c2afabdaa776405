//! The assembled defense base.
//!
//! [`DefenseBase::build`] synthesizes the material sets, builds one template per part
//! family, replicates the templates around their rings and attaches the resulting
//! layers under the context root:
//!
//! | layer           | contents                                   |
//! |-----------------|--------------------------------------------|
//! | `ground`        | the ground plane                           |
//! | `ultraFans`     | tilted outer fans, then vertical inner fans |
//! | `dome`          | hemispherical shield layers                |
//! | `sprayers`      | particle sprayers                          |
//! | `turrets`       | anti-air turrets                           |
//! | `magneticGrids` | one magnet per inner fan, rebuildable      |
//!
//! Every layer is built detached and only attached once all of them succeeded, and
//! the resource tables are rolled back on error, so a failed build leaves the context
//! untouched. The returned value keeps absolute paths to
//! every animated node plus the per-turret state.

use std::f32::consts::PI;

use log::{info, warn};

use crate::{
    animation::state::TurretState,
    assembly::ring::{Aim, Orientation, replicate, ring_slots},
    config::BaseConfig,
    context::SceneContext,
    data_structures::scene_graph::{Node, NodePath},
    error::{BuildError, Result},
    flow::TerrainProvider,
    parts::{
        dome::build_dome_layer,
        fan::{FanAnchors, TILT_TARGET_HEIGHT, build_inner_fan, build_outer_fan},
        ground::build_ground,
        magnet::{build_magnet, place_before},
        materials::{
            FanMaterials, MagnetMaterials, SprayerMaterials, SurfaceTextures, TurretMaterials,
            ground_material,
        },
        sprayer::{SprayerAnchors, build_sprayer, spray_particles},
        turret::{TurretAnchors, build_turret},
    },
};

pub const GROUND: &str = "ground";
pub const FANS: &str = "ultraFans";
pub const DOME: &str = "dome";
pub const SPRAYERS: &str = "sprayers";
pub const TURRETS: &str = "turrets";
pub const MAGNETIC_GRIDS: &str = "magneticGrids";

const LAYERS: [&str; 6] = [GROUND, FANS, DOME, SPRAYERS, TURRETS, MAGNETIC_GRIDS];

/// Outer fans aim at a point 30% of the way in along their spoke.
const FAN_AIM_FRACTION: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FanKind {
    Outer,
    Inner,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TurretInstance {
    /// Absolute path of the turret root.
    pub root: NodePath,
    /// Anchors relative to `root`.
    pub anchors: TurretAnchors,
    pub state: TurretState,
}

impl TurretInstance {
    pub fn path(&self, anchor: &NodePath) -> NodePath {
        self.root.join(anchor)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FanInstance {
    pub root: NodePath,
    pub kind: FanKind,
    pub anchors: FanAnchors,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DomeLayerInstance {
    pub root: NodePath,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SprayerInstance {
    pub root: NodePath,
    pub anchors: SprayerAnchors,
}

#[derive(Clone, Debug)]
pub struct MagneticGrids {
    pub materials: MagnetMaterials,
    /// Roots of the current magnet systems.
    pub systems: Vec<NodePath>,
    template: Node,
}

#[derive(Debug)]
pub struct DefenseBase {
    config: BaseConfig,
    pub turrets: Vec<TurretInstance>,
    pub fans: Vec<FanInstance>,
    pub dome: Vec<DomeLayerInstance>,
    pub sprayers: Vec<SprayerInstance>,
    pub magnets: MagneticGrids,
}

/// Layer built but not yet attached, with paths relative to the layer node.
struct Staged<T> {
    layer: Node,
    items: Vec<(NodePath, T)>,
}

impl<T> Staged<T> {
    fn new(name: &str) -> Self {
        Self {
            layer: Node::group(name),
            items: Vec::new(),
        }
    }

    fn push(&mut self, node: Node, item: T) {
        let index = self.layer.add_child(node);
        self.items.push((NodePath::root().child(index), item));
    }

    /// Attaches the layer under `root` and makes every item path absolute.
    fn attach(self, root: &mut Node) -> Vec<(NodePath, T)> {
        let at = NodePath::root().child(root.add_child(self.layer));
        self.items
            .into_iter()
            .map(|(path, item)| (at.join(&path), item))
            .collect()
    }
}

impl DefenseBase {
    /// Builds every layer into `ctx`. On error neither the scene tree nor the resource
    /// tables keep anything from this call.
    pub fn build(
        ctx: &mut SceneContext,
        config: &BaseConfig,
        terrain: Option<&dyn TerrainProvider>,
    ) -> Result<Self> {
        let marks = ctx.marks();
        let built = Self::assemble(ctx, config, terrain);
        if let Err(e) = &built {
            warn!("defense base build failed: {e}");
            ctx.rollback(marks);
        }
        built
    }

    fn assemble(
        ctx: &mut SceneContext,
        config: &BaseConfig,
        terrain: Option<&dyn TerrainProvider>,
    ) -> Result<Self> {
        for name in LAYERS {
            if ctx.root.get_children().iter().any(|c| c.name() == Some(name)) {
                return Err(BuildError::DuplicateInstance(name.to_string()));
            }
        }
        let dome = &config.dome;
        if !(dome.base_radius > 0.0 && dome.base_radius.is_finite() && dome.spacing.is_finite()) {
            return Err(BuildError::InvalidLayout(format!(
                "dome radius {} with spacing {}",
                dome.base_radius, dome.spacing
            )));
        }

        let textures = SurfaceTextures::synthesize(ctx, &config.textures)?;

        let ground_mat = ground_material(ctx, &config.textures)?;
        let mut ground = Staged::<()>::new(GROUND);
        ground.push(build_ground(ctx, config.ground_size, ground_mat), ());

        let fans = Self::stage_fans(ctx, config, terrain)?;
        let domes = Self::stage_dome(ctx, config);
        let sprayers = Self::stage_sprayers(ctx, config, &textures, terrain)?;
        let turrets = Self::stage_turrets(ctx, config, &textures, terrain)?;

        let magnet_materials = MagnetMaterials::create(ctx);
        let magnet_template = build_magnet(ctx, &magnet_materials);

        ground.attach(&mut ctx.root);
        let fans: Vec<FanInstance> = fans
            .attach(&mut ctx.root)
            .into_iter()
            .map(|(root, (kind, anchors))| FanInstance { root, kind, anchors })
            .collect();
        let dome: Vec<DomeLayerInstance> = domes
            .attach(&mut ctx.root)
            .into_iter()
            .map(|(root, index)| DomeLayerInstance { root, index })
            .collect();
        let sprayers: Vec<SprayerInstance> = sprayers
            .attach(&mut ctx.root)
            .into_iter()
            .map(|(root, anchors)| SprayerInstance { root, anchors })
            .collect();
        let turrets: Vec<TurretInstance> = turrets
            .attach(&mut ctx.root)
            .into_iter()
            .map(|(root, (anchors, state))| TurretInstance { root, anchors, state })
            .collect();

        let mut base = Self {
            config: config.clone(),
            turrets,
            fans,
            dome,
            sprayers,
            magnets: MagneticGrids {
                materials: magnet_materials,
                systems: Vec::new(),
                template: magnet_template,
            },
        };
        base.rebuild_magnetic_grids(ctx)?;
        info!(
            "defense base built: {} turrets, {} fans, {} dome layers, {} sprayers, {} magnets",
            base.turrets.len(),
            base.fans.len(),
            base.dome.len(),
            base.sprayers.len(),
            base.magnets.systems.len()
        );
        Ok(base)
    }

    fn stage_fans(
        ctx: &mut SceneContext,
        config: &BaseConfig,
        terrain: Option<&dyn TerrainProvider>,
    ) -> Result<Staged<(FanKind, FanAnchors)>> {
        let materials = FanMaterials::create(ctx);
        let mut staged = Staged::new(FANS);

        let (outer, outer_anchors) = build_outer_fan(ctx, &materials, config.outer_fans.radius)?;
        let aim = Aim::Inward {
            fraction: FAN_AIM_FRACTION,
            height: TILT_TARGET_HEIGHT,
        };
        let slots = ring_slots(&config.outer_fans, Orientation::Facing(aim), terrain)?;
        for fan in replicate(&outer, &slots, "outerFan") {
            staged.push(fan, (FanKind::Outer, outer_anchors.clone()));
        }

        let (inner, inner_anchors) = build_inner_fan(ctx, &materials)?;
        let slots = ring_slots(&config.inner_fans, Orientation::Upright, terrain)?;
        for fan in replicate(&inner, &slots, "innerFan") {
            staged.push(fan, (FanKind::Inner, inner_anchors.clone()));
        }
        info!(
            "fans staged: {} outer at r={}, {} inner at r={}",
            config.outer_fans.count,
            config.outer_fans.radius,
            config.inner_fans.count,
            config.inner_fans.radius
        );
        Ok(staged)
    }

    fn stage_dome(ctx: &mut SceneContext, config: &BaseConfig) -> Staged<usize> {
        let dome = &config.dome;
        let mut staged = Staged::new(DOME);
        for i in 0..dome.layers {
            let radius = dome.base_radius + i as f32 * dome.spacing;
            staged.push(build_dome_layer(ctx, i, radius, dome.segments), i);
        }
        staged
    }

    fn stage_sprayers(
        ctx: &mut SceneContext,
        config: &BaseConfig,
        textures: &SurfaceTextures,
        terrain: Option<&dyn TerrainProvider>,
    ) -> Result<Staged<SprayerAnchors>> {
        let materials = SprayerMaterials::create(ctx, textures, &config.textures)?;
        let (template, anchors) = build_sprayer(ctx, &materials)?;
        let slots = ring_slots(&config.sprayers, Orientation::Upright, terrain)?;
        let mut staged = Staged::new(SPRAYERS);
        for (i, mut sprayer) in replicate(&template, &slots, "sprayer").into_iter().enumerate() {
            // every sprayer after the first gets its own particle cloud
            if i > 0 {
                let cloud = spray_particles(&mut ctx.rng);
                let cloud = ctx.add_mesh(cloud);
                if let Some(drawable) = sprayer
                    .get_mut(&anchors.spray)
                    .and_then(|spray| spray.drawable.as_mut())
                {
                    drawable.mesh = cloud;
                }
            }
            staged.push(sprayer, anchors.clone());
        }
        Ok(staged)
    }

    fn stage_turrets(
        ctx: &mut SceneContext,
        config: &BaseConfig,
        textures: &SurfaceTextures,
        terrain: Option<&dyn TerrainProvider>,
    ) -> Result<Staged<(TurretAnchors, TurretState)>> {
        let materials = TurretMaterials::create(ctx, textures);
        let (template, anchors) = build_turret(ctx, &materials)?;
        let missile_rest = anchors
            .missiles
            .first()
            .and_then(|path| template.get(path))
            .map(|missile| missile.transform.position)
            .ok_or_else(|| BuildError::MissingAnchor("missile".to_string()))?;

        let slots = ring_slots(&config.turrets, Orientation::Fixed { offset: PI }, terrain)?;
        let mut staged = Staged::new(TURRETS);
        for (slot, turret) in slots.iter().zip(replicate(&template, &slots, "turret")) {
            let state = TurretState::new(slot.angle, missile_rest, &config.animation);
            staged.push(turret, (anchors.clone(), state));
        }
        info!(
            "{} turrets staged at r={}",
            config.turrets.count, config.turrets.radius
        );
        Ok(staged)
    }

    /**
     * Replaces the magnetic grid layer with a fresh one derived from the current inner
     * fan positions. The old layer node is removed before the new one goes in at the
     * same child index, so paths to the other layers stay valid.
     */
    pub fn rebuild_magnetic_grids(&mut self, ctx: &mut SceneContext) -> Result<()> {
        ctx.root.update_world_transform_all();
        let mut layer = Node::group(MAGNETIC_GRIDS);
        let mut relative = Vec::new();
        for fan in self.fans.iter().filter(|f| f.kind == FanKind::Inner) {
            let Some(node) = ctx.root.get(&fan.root) else {
                warn!("inner fan at {:?} is gone, no magnet placed", fan.root);
                continue;
            };
            let position = node.world_transform().position;
            let Some(transform) =
                place_before(position, self.config.magnet_offset, self.config.magnet_min_distance)
            else {
                continue;
            };
            let mut system = self
                .magnets
                .template
                .clone()
                .named(&format!("magnet_{}", relative.len()));
            system.transform = transform;
            relative.push(NodePath::root().child(layer.add_child(system)));
        }

        let existing = ctx
            .root
            .get_children()
            .iter()
            .position(|c| c.name() == Some(MAGNETIC_GRIDS));
        let index = match existing {
            Some(index) => {
                ctx.root.remove_child(index);
                ctx.root.insert_child(index, layer)
            }
            None => ctx.root.add_child(layer),
        };
        let at = NodePath::root().child(index);
        self.magnets.systems = relative.iter().map(|path| at.join(path)).collect();
        info!("magnetic grids rebuilt with {} systems", self.magnets.systems.len());
        Ok(())
    }

    pub fn config(&self) -> &BaseConfig {
        &self.config
    }

    /// Absolute path of the layer called `name`, if attached.
    pub fn layer_path(ctx: &SceneContext, name: &str) -> Option<NodePath> {
        ctx.root
            .get_children()
            .iter()
            .position(|c| c.name() == Some(name))
            .map(|i| NodePath::root().child(i))
    }
}
