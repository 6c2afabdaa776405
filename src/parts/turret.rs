//! The anti-air turret.
//!
//! Hierarchy of the returned root (scaled 1.5):
//!
//! ```text
//! turret
//! ├── baseGroup                 platform and energy ring
//! ├── mainBody                  core, energy strips, side armor
//! ├── weaponPods
//! │   └── podPivot_{0,1}        pivot at the pod mount
//! │       └── pod               housing, tube rack, targeting
//! ├── topMissileLaunchers
//! │   └── missileCell_{r}_{c}   2 rows x 3 columns
//! │       └── missile_{r}_{c}   the part that launches
//! └── gunPivot
//!     └── mainGuns              twin guns and the targeting head
//! ```

use std::f32::consts::{FRAC_PI_2, PI};

use cgmath::{Euler, Rad, Vector3};

use crate::{
    context::SceneContext,
    data_structures::scene_graph::{Node, NodePath, Transform},
    error::Result,
    parts::{materials::TurretMaterials, solid, spoke},
    primitives::solids::{circle, cone, cuboid, cylinder, ring, torus},
};

pub const BASE: &str = "baseGroup";
pub const WEAPON_PODS: &str = "weaponPods";
pub const MAIN_GUNS: &str = "mainGuns";
pub const GUN_PIVOT: &str = "gunPivot";
pub const LAUNCHERS: &str = "topMissileLaunchers";

pub const MISSILE_ROWS: usize = 2;
pub const MISSILE_COLUMNS: usize = 3;
pub const MISSILE_CELLS: usize = MISSILE_ROWS * MISSILE_COLUMNS;
pub const WEAPON_POD_COUNT: usize = 2;

pub const TURRET_SCALE: f32 = 1.5;

pub fn cell_name(row: usize, col: usize) -> String {
    format!("missileCell_{row}_{col}")
}

pub fn missile_name(row: usize, col: usize) -> String {
    format!("missile_{row}_{col}")
}

pub fn pod_pivot_name(side: usize) -> String {
    format!("podPivot_{side}")
}

/// Slot of a missile cell in per-turret state, `row * 3 + col`.
pub fn cell_index(row: usize, col: usize) -> usize {
    row * MISSILE_COLUMNS + col
}

/// Paths, relative to the turret root, of every node the animation driver moves.
#[derive(Clone, Debug, PartialEq)]
pub struct TurretAnchors {
    pub base: NodePath,
    pub weapon_pods: NodePath,
    /// Pod pivots, one per side.
    pub pods: Vec<NodePath>,
    pub main_guns: NodePath,
    pub gun_pivot: NodePath,
    pub launchers: NodePath,
    /// Missile groups indexed by [`cell_index`].
    pub missiles: Vec<NodePath>,
}

impl TurretAnchors {
    /// Looks every anchor up by name; fails on a missing or duplicated name.
    pub fn resolve(turret: &Node) -> Result<Self> {
        let anchors = turret.anchors()?;
        let pods = (0..WEAPON_POD_COUNT)
            .map(|side| anchors.require(&pod_pivot_name(side)))
            .collect::<Result<Vec<_>>>()?;
        let mut missiles = Vec::with_capacity(MISSILE_CELLS);
        for row in 0..MISSILE_ROWS {
            for col in 0..MISSILE_COLUMNS {
                anchors.require(&cell_name(row, col))?;
                missiles.push(anchors.require(&missile_name(row, col))?);
            }
        }
        Ok(Self {
            base: anchors.require(BASE)?,
            weapon_pods: anchors.require(WEAPON_PODS)?,
            pods,
            main_guns: anchors.require(MAIN_GUNS)?,
            gun_pivot: anchors.require(GUN_PIVOT)?,
            launchers: anchors.require(LAUNCHERS)?,
            missiles,
        })
    }
}

/// Builds one unplaced turret and resolves its anchors.
pub fn build_turret(ctx: &mut SceneContext, m: &TurretMaterials) -> Result<(Node, TurretAnchors)> {
    let mut gun_pivot = Node::group(GUN_PIVOT);
    gun_pivot.add_child(main_guns(ctx, m));

    let turret = Node::group("turret")
        .with_child(base_group(ctx, m))
        .with_child(main_body(ctx, m))
        .with_child(weapon_pods(ctx, m))
        .with_child(missile_launchers(ctx, m))
        .with_child(gun_pivot)
        .scaled(TURRET_SCALE);
    let anchors = TurretAnchors::resolve(&turret)?;
    Ok((turret, anchors))
}

fn base_group(ctx: &mut SceneContext, m: &TurretMaterials) -> Node {
    Node::group(BASE)
        .with_child(solid(ctx, cylinder(5.0, 5.5, 2.0, 8, 1, false), m.armor))
        .with_child(solid(ctx, torus(5.2, 0.1, 16, 32), m.energy).rotated(FRAC_PI_2, 0.0, 0.0))
}

fn main_body(ctx: &mut SceneContext, m: &TurretMaterials) -> Node {
    let mut body = Node::group("mainBody");
    body.add_child(solid(ctx, cuboid(8.0, 4.0, 6.0), m.armor).at(0.0, 3.0, 0.0));

    let strip = solid(ctx, cuboid(7.8, 0.1, 0.1), m.energy);
    for i in 0..3 {
        let y = 2.0 + i as f32;
        body.add_child(strip.clone().at(0.0, y, 3.1));
        body.add_child(strip.clone().at(0.0, y, -3.1));
    }

    let stripe = solid(ctx, cuboid(0.8, 3.0, 0.1), m.plasma);
    let mut pattern = Node::default();
    for i in 0..3 {
        pattern.add_child(stripe.clone().at(-2.0 + i as f32 * 2.0, 0.0, 0.0));
    }
    let plate = solid(ctx, cuboid(8.2, 4.2, 0.5), m.tech).with_child(pattern);
    for z in [3.3, -3.3] {
        body.add_child(plate.clone().at(0.0, 3.0, z));
    }
    body
}

/// One pod at its own origin: housing, energy grid, tube rack and targeting head.
fn weapon_pod(ctx: &mut SceneContext, m: &TurretMaterials) -> Node {
    let mut pod = Node::default();
    pod.add_child(solid(ctx, cuboid(3.0, 5.0, 4.0), m.armor));

    let cell = solid(ctx, cuboid(0.8, 0.8, 0.1), m.energy);
    let mut grid = Node::default();
    for i in 0..3 {
        for j in 0..2 {
            grid.add_child(cell.clone().at(j as f32 - 0.5, i as f32 * 1.5 - 1.5, 2.1));
        }
    }
    pod.add_child(grid);

    let mut assembly = Node::default();
    assembly.add_child(solid(ctx, cylinder(0.3, 0.35, 5.0, 6, 1, false), m.metal).rotated(FRAC_PI_2, 0.0, 0.0));
    let plasma_ring = solid(ctx, torus(0.4, 0.05, 6, 12), m.plasma);
    for r in 0..4 {
        assembly.add_child(
            plasma_ring
                .clone()
                .at(0.0, 0.0, -1.5 + r as f32)
                .rotated(0.0, PI / 6.0, 0.0),
        );
    }
    assembly.add_child(solid(ctx, cylinder(0.2, 0.2, 4.8, 6, 1, false), m.energy).rotated(FRAC_PI_2, 0.0, 0.0));
    let mut rack = Node::default();
    for row in 0..2 {
        for col in 0..3 {
            rack.add_child(assembly.clone().at(row as f32 - 0.5, col as f32 * 1.4 - 1.4, 1.0));
        }
    }
    pod.add_child(rack);

    let mut targeting = Node::default().at(0.0, 2.0, 2.5);
    targeting.add_child(solid(ctx, cuboid(2.8, 0.8, 1.0), m.tech));
    let sight = solid(ctx, ring(0.3, 0.4, 16), m.energy).rotated(FRAC_PI_2, 0.0, 0.0);
    for x in [-1.0, 1.0] {
        targeting.add_child(sight.clone().at(x, 0.0, 0.6));
    }
    pod.add_child(targeting);
    pod
}

fn weapon_pods(ctx: &mut SceneContext, m: &TurretMaterials) -> Node {
    let pod = weapon_pod(ctx, m);
    let mut pods = Node::group(WEAPON_PODS);
    for side in 0..WEAPON_POD_COUNT {
        let sign = if side == 0 { -1.0 } else { 1.0 };
        let mounted = pod.clone().at(5.5 * sign, 3.0, 0.0).rotated(0.0, -sign * PI / 12.0, 0.0);
        pods.add_child(mounted.into_pivot(&pod_pivot_name(side)));
    }
    pods
}

fn main_guns(ctx: &mut SceneContext, m: &TurretMaterials) -> Node {
    let mut mount = Node::default();
    mount.add_child(solid(ctx, cuboid(2.0, 2.5, 3.0), m.armor));
    mount.add_child(
        solid(ctx, cylinder(0.4, 0.45, 8.0, 8, 1, false), m.metal)
            .at(0.0, 0.0, 4.0)
            .rotated(FRAC_PI_2, 0.0, 0.0),
    );
    mount.add_child(
        solid(ctx, cylinder(0.6, 0.6, 6.0, 8, 1, false), m.tech)
            .at(0.0, 0.0, 3.0)
            .rotated(FRAC_PI_2, 0.0, 0.0),
    );
    let glow_ring = solid(ctx, torus(0.65, 0.05, 8, 16), m.barrel_glow).rotated(FRAC_PI_2, 0.0, 0.0);
    for r in 0..4 {
        mount.add_child(glow_ring.clone().at(0.0, 0.0, 1.0 + r as f32 * 1.5));
    }
    let pipe = solid(ctx, cylinder(0.15, 0.15, 4.0, 6, 1, false), m.coolant).rotated(FRAC_PI_2, 0.0, 0.0);
    for i in 0..3 {
        let angle = spoke(i, 3);
        mount.add_child(pipe.clone().at(angle.cos() * 0.7, angle.sin() * 0.7, 2.0));
    }

    let mut guns = Node::group(MAIN_GUNS);
    for x in [-2.0, 2.0] {
        guns.add_child(mount.clone().at(x, 4.0, 2.0));
    }

    let mut targeting = Node::default();
    targeting.add_child(
        solid(ctx, cylinder(0.3, 0.4, 1.5, 8, 1, false), m.scope)
            .at(0.0, 4.5, 3.0)
            .rotated(FRAC_PI_2, 0.0, 0.0),
    );
    let sensor = solid(ctx, cuboid(0.8, 0.4, 1.0), m.tech);
    let lens = solid(ctx, circle(0.15, 8), m.lens).rotated(0.0, FRAC_PI_2, 0.0);
    for x in [-1.2f32, 1.2] {
        let side = sensor
            .clone()
            .at(x, 4.5, 2.8)
            .with_child(lens.clone().at(0.4 * x.signum(), 0.0, 0.0));
        targeting.add_child(side);
    }
    guns.add_child(targeting);
    guns
}

fn missile(ctx: &mut SceneContext, m: &TurretMaterials) -> Node {
    let mut missile = Node::default().at(0.0, 0.6, 0.0);
    missile.add_child(solid(ctx, cylinder(0.25, 0.25, 2.0, 8, 1, false), m.metal));
    missile.add_child(solid(ctx, cone(0.25, 0.5, 8), m.tech).at(0.0, 1.25, 0.0));
    let fin = solid(ctx, cuboid(0.4, 0.6, 0.05), m.metal);
    for i in 0..4 {
        let angle = spoke(i, 4);
        let mut stabilizer = fin.clone();
        // pushed out along its own turned X axis
        stabilizer.transform = Transform {
            position: Vector3::new(0.25 * angle.cos(), -0.7, -0.25 * angle.sin()),
            rotation: Euler::new(Rad(0.0), Rad(angle), Rad(0.0)),
            ..Default::default()
        };
        missile.add_child(stabilizer);
    }
    missile
}

fn missile_launchers(ctx: &mut SceneContext, m: &TurretMaterials) -> Node {
    let mut launchers = Node::group(LAUNCHERS);
    launchers.add_child(solid(ctx, cuboid(6.0, 1.0, 4.0), m.armor).at(0.0, 6.0, 0.0));

    let light = solid(ctx, cuboid(0.4, 0.3, 0.3), m.panel_light);
    let mut panel = solid(ctx, cuboid(5.8, 0.2, 0.8), m.tech);
    for j in 0..3 {
        panel.add_child(light.clone().at(-2.0 + j as f32 * 2.0, 0.0, 0.0));
    }
    for z in [1.5, -1.5] {
        launchers.add_child(panel.clone().at(0.0, 6.1, z));
    }

    let cell_base = solid(ctx, cylinder(0.4, 0.4, 1.2, 8, 1, false), m.tech);
    let missile = missile(ctx, m);
    let cell_ring = solid(ctx, torus(0.45, 0.05, 8, 16), m.plasma)
        .at(0.0, 0.2, 0.0)
        .rotated(FRAC_PI_2, 0.0, 0.0);
    for row in 0..MISSILE_ROWS {
        for col in 0..MISSILE_COLUMNS {
            let z = if row == 0 { 0.8 } else { -0.8 };
            let cell = Node::group(&cell_name(row, col))
                .at(-2.0 + col as f32 * 2.0, 6.6, z)
                .with_child(cell_base.clone())
                .with_child(missile.clone().named(&missile_name(row, col)))
                .with_child(cell_ring.clone());
            launchers.add_child(cell);
        }
    }
    launchers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_indices_cover_every_slot_once() {
        let mut seen = vec![false; MISSILE_CELLS];
        for row in 0..MISSILE_ROWS {
            for col in 0..MISSILE_COLUMNS {
                let i = cell_index(row, col);
                assert!(!seen[i]);
                seen[i] = true;
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn renamed_anchor_fails_resolution() {
        let mut turret = Node::group("turret")
            .with_child(Node::group(BASE))
            .with_child(Node::group(WEAPON_PODS));
        turret.get_children_mut()[1].name = Some("pods".to_string());
        assert!(TurretAnchors::resolve(&turret).is_err());
    }
}
