use std::collections::HashSet;

use bastion::{
    BuildError, Vector3,
    assembly::base::{self as layers, DefenseBase},
    config::{DomeConfig, RingLayout},
    context::SceneContext,
    data_structures::scene_graph::{Node, NodePath},
    parts::{
        dome::layer_name,
        fan::FanAnchors,
        sprayer::PARTICLE_COUNT,
        turret::{
            GUN_PIVOT, MISSILE_CELLS, TURRET_SCALE, TurretAnchors, cell_index, missile_name,
        },
    },
};

use crate::common::test_utils::{assert_close, build_base, small_config};

mod common;

#[test]
fn layers_attach_in_order() {
    let (ctx, _) = build_base(&small_config());
    let names: Vec<_> = ctx.root.get_children().iter().map(|c| c.name()).collect();
    assert_eq!(
        names,
        [
            Some(layers::GROUND),
            Some(layers::FANS),
            Some(layers::DOME),
            Some(layers::SPRAYERS),
            Some(layers::TURRETS),
            Some(layers::MAGNETIC_GRIDS),
        ]
    );
}

#[test]
fn turret_anchors_resolve_in_the_scene() {
    let (ctx, base) = build_base(&small_config());
    for turret in &base.turrets {
        let node = ctx.root.get(&turret.root).unwrap();
        assert_eq!(node.transform.scale, Vector3::new(TURRET_SCALE, TURRET_SCALE, TURRET_SCALE));
        assert_eq!(TurretAnchors::resolve(node).unwrap(), turret.anchors);
        assert_eq!(turret.anchors.missiles.len(), MISSILE_CELLS);
        assert_eq!(turret.state.cells.len(), MISSILE_CELLS);
    }
}

#[test]
fn turret_with_a_repeated_anchor_name_is_rejected() {
    let (ctx, base) = build_base(&small_config());
    let turret = &base.turrets[0];
    let mut copy = ctx.root.get(&turret.root).unwrap().clone();
    copy.get_mut(&turret.anchors.base)
        .unwrap()
        .add_child(Node::group(GUN_PIVOT));
    assert_eq!(
        TurretAnchors::resolve(&copy),
        Err(BuildError::DuplicateAnchor(GUN_PIVOT.to_string()))
    );
}

#[test]
fn missile_anchors_follow_row_major_order() {
    let (ctx, base) = build_base(&small_config());
    let turret = &base.turrets[0];
    let node = ctx.root.get(&turret.root).unwrap();
    for row in 0..2 {
        for col in 0..3 {
            let path = &turret.anchors.missiles[cell_index(row, col)];
            let missile = node.get(path).unwrap();
            assert_eq!(missile.name(), Some(missile_name(row, col).as_str()));
        }
    }
}

#[test]
fn weapon_pods_swing_about_their_mounts() {
    let (ctx, base) = build_base(&small_config());
    let turret = &base.turrets[0];
    let node = ctx.root.get(&turret.root).unwrap();
    for (side, pivot) in turret.anchors.pods.iter().enumerate() {
        let pivot = node.get(pivot).unwrap();
        let sign = if side == 0 { -1.0 } else { 1.0 };
        assert_eq!(pivot.transform.position, Vector3::new(5.5 * sign, 3.0, 0.0));
        let pod = &pivot.get_children()[0];
        assert_eq!(pod.transform.position, Vector3::new(0.0, 0.0, 0.0));
        assert_close(pod.transform.rotation.y.0, -sign * std::f32::consts::PI / 12.0, "pod yaw");
    }
}

#[test]
fn every_fan_has_blades_and_air_flow() {
    let (ctx, base) = build_base(&small_config());
    assert_eq!(base.fans.len(), 48);
    for fan in &base.fans {
        let node = ctx.root.get(&fan.root).unwrap();
        assert_eq!(FanAnchors::resolve(node).unwrap(), fan.anchors);
        let air = node.get(&fan.anchors.air_flow).unwrap();
        assert!(air.drawable.is_some());
    }
}

#[test]
fn dome_layers_grow_outward() {
    let (ctx, base) = build_base(&small_config());
    assert_eq!(base.dome.len(), 3);
    let mut previous = 0.0;
    for layer in &base.dome {
        let node = ctx.root.get(&layer.root).unwrap();
        assert_eq!(node.name(), Some(layer_name(layer.index).as_str()));
        let mesh = ctx.mesh(node.drawable.unwrap().mesh).unwrap();
        let radius = mesh
            .vertices()
            .iter()
            .map(|v| v.position[1])
            .fold(0.0f32, f32::max);
        assert!(radius > previous);
        previous = radius;
    }
    assert_close(previous, 176.0, "outermost radius");
}

#[test]
fn each_sprayer_owns_its_particle_cloud() {
    let (ctx, base) = build_base(&small_config());
    assert_eq!(base.sprayers.len(), 24);
    let mut meshes = HashSet::new();
    for sprayer in &base.sprayers {
        let spray = ctx
            .root
            .get(&sprayer.root.join(&sprayer.anchors.spray))
            .unwrap();
        let mesh_id = spray.drawable.unwrap().mesh;
        assert_eq!(ctx.mesh(mesh_id).unwrap().vertex_count(), PARTICLE_COUNT);
        meshes.insert(mesh_id);
    }
    assert_eq!(meshes.len(), 24);
}

#[test]
fn magnets_sit_inside_every_inner_fan() {
    let (ctx, base) = build_base(&small_config());
    assert_eq!(base.magnets.systems.len(), 24);
    for (i, path) in base.magnets.systems.iter().enumerate() {
        let system = ctx.root.get(path).unwrap();
        assert_eq!(system.name(), Some(format!("magnet_{i}").as_str()));
        let p = system.transform.position;
        assert_close((p.x * p.x + p.z * p.z).sqrt(), 133.0, "magnet radius");
    }
}

#[test]
fn rebuilding_magnets_replaces_the_layer_in_place() {
    let (mut ctx, mut base) = build_base(&small_config());
    let nodes = ctx.root.count();
    let layer_count = ctx.root.get_children().len();
    let index = DefenseBase::layer_path(&ctx, layers::MAGNETIC_GRIDS).unwrap();

    base.rebuild_magnetic_grids(&mut ctx).unwrap();
    base.rebuild_magnetic_grids(&mut ctx).unwrap();

    assert_eq!(ctx.root.count(), nodes);
    assert_eq!(ctx.root.get_children().len(), layer_count);
    assert_eq!(DefenseBase::layer_path(&ctx, layers::MAGNETIC_GRIDS), Some(index.clone()));
    let layer = ctx.root.get(&index).unwrap();
    assert_eq!(layer.get_children().len(), base.magnets.systems.len());
    assert!(
        base.magnets
            .systems
            .iter()
            .all(|p| p.indices()[0] == index.indices()[0])
    );
}

#[test]
fn second_build_into_the_same_scene_is_rejected() {
    let config = small_config();
    let (mut ctx, _) = build_base(&config);
    let nodes = ctx.root.count();
    let marks = ctx.marks();
    let err = DefenseBase::build(&mut ctx, &config, None).unwrap_err();
    assert_eq!(err, BuildError::DuplicateInstance(layers::GROUND.to_string()));
    assert_eq!(ctx.root.count(), nodes);
    assert_eq!(ctx.marks(), marks);
}

#[test]
fn bad_layouts_leave_the_scene_untouched() {
    let broken_dome = small_config().with_dome(DomeConfig {
        layers: 3,
        base_radius: 0.0,
        spacing: 3.0,
        segments: 8,
    });
    let mut ctx = SceneContext::new(1);
    assert!(matches!(
        DefenseBase::build(&mut ctx, &broken_dome, None),
        Err(BuildError::InvalidLayout(_))
    ));
    assert!(ctx.root.get_children().is_empty());

    let no_turrets = small_config().with_turrets(RingLayout::new(0, 220.0, 5.0));
    let mut ctx = SceneContext::new(1);
    let empty = ctx.marks();
    assert!(matches!(
        DefenseBase::build(&mut ctx, &no_turrets, None),
        Err(BuildError::InvalidLayout(_))
    ));
    assert!(ctx.root.get_children().is_empty());
    // fans, dome and sprayers had registered meshes and materials before the turrets failed
    assert_eq!(ctx.marks(), empty);
    assert!(ctx.meshes().is_empty() && ctx.materials().is_empty() && ctx.textures().is_empty());
}

#[test]
fn turret_clones_share_meshes() {
    let config = small_config();
    let (ctx, base) = build_base(&config);
    let drawables = |path: &NodePath| {
        let mut ids = Vec::new();
        ctx.root.get(path).unwrap().walk(&mut |n| {
            if let Some(d) = n.drawable {
                ids.push(d);
            }
        });
        ids
    };
    assert_eq!(drawables(&base.turrets[0].root), drawables(&base.turrets[11].root));
}
