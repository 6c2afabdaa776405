//! Ventilation fans.
//!
//! Outer fans stand on a plate and lean their vent toward the dome; the assembler
//! then turns the whole fan to face its target. Inner fans blow straight up through
//! a twisted, tapering air column. Both expose their spinning blade group and the
//! air-flow mesh as anchors.

use std::f32::consts::FRAC_PI_2;

use cgmath::{Vector2, Vector3};

use crate::{
    context::SceneContext,
    data_structures::scene_graph::{Node, NodePath},
    error::Result,
    parts::{materials::FanMaterials, solid, spoke},
    primitives::{
        solids::{cuboid, cylinder, ring, torus},
        sweep::{Bevel, CatmullRom, extrude, spiral_taper, tube},
    },
};

pub const BLADES: &str = "blades";
pub const AIR_FLOW: &str = "airFlow";

/// Height of the air column above a fan.
pub const AIR_FLOW_HEIGHT: f32 = 45.0;
/// Height of the point outer fans lean toward.
pub const TILT_TARGET_HEIGHT: f32 = 60.0;

const BLADE_BEVEL: Bevel = Bevel {
    thickness: 0.1,
    size: 0.1,
};

#[derive(Clone, Debug, PartialEq)]
pub struct FanAnchors {
    pub blades: NodePath,
    pub air_flow: NodePath,
}

impl FanAnchors {
    pub fn resolve(fan: &Node) -> Result<Self> {
        let anchors = fan.anchors()?;
        Ok(Self {
            blades: anchors.require(BLADES)?,
            air_flow: anchors.require(AIR_FLOW)?,
        })
    }
}

/// Lean of an outer fan on a ring of `radius`, toward a point 60 up and 70% of the way in.
pub fn tilt_angle(radius: f32) -> f32 {
    TILT_TARGET_HEIGHT.atan2(radius * 0.7)
}

/// Symmetric blade outline with a pointed root at the hub.
fn blade_outline(half_width: f32, shoulder: f32) -> Vec<Vector2<f32>> {
    vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(half_width, shoulder),
        Vector2::new(half_width, 4.0),
        Vector2::new(-half_width, 4.0),
        Vector2::new(-half_width, shoulder),
        Vector2::new(0.0, 0.0),
    ]
}

/// Bent air tube: rises 45 while drifting a quarter of that forward.
fn curved_air_flow() -> CatmullRom {
    let points = (0..6)
        .map(|i| {
            let t = i as f32 / 5.0;
            Vector3::new(0.0, AIR_FLOW_HEIGHT * t, AIR_FLOW_HEIGHT * 0.25 * t.powf(1.2))
        })
        .collect();
    CatmullRom::new(points)
}

/// Builds one tilted perimeter fan for a ring of `radius`.
pub fn build_outer_fan(
    ctx: &mut SceneContext,
    m: &FanMaterials,
    radius: f32,
) -> Result<(Node, FanAnchors)> {
    let lean = FRAC_PI_2 - tilt_angle(radius);

    let base = Node::default()
        .with_child(solid(ctx, cuboid(8.0, 1.0, 8.0), m.body))
        .with_child(solid(ctx, cuboid(4.0, 8.0, 4.0), m.body).at(0.0, 4.0, 0.0).rotated(lean, 0.0, 0.0))
        .with_child(
            solid(ctx, ring(3.5, 3.7, 32), m.body)
                .at(0.0, 0.51, 0.0)
                .rotated(-FRAC_PI_2, 0.0, 0.0),
        );

    let mut grill = Node::default().at(0.0, 0.0, 1.3);
    grill.add_child(solid(ctx, torus(4.8, 0.15, 16, 32), m.body));
    grill.add_child(solid(ctx, torus(2.0, 0.15, 16, 32), m.body));
    let bar = solid(ctx, cuboid(0.15, 4.8, 0.15), m.body);
    for j in 0..6 {
        grill.add_child(bar.clone().rotated(0.0, 0.0, spoke(j, 6)));
    }

    let blade = solid(ctx, extrude(&blade_outline(1.5, 0.8), 0.2, Some(BLADE_BEVEL)), m.body);
    let mut blades = Node::group(BLADES);
    for j in 0..4 {
        blades.add_child(Node::default().rotated(0.0, spoke(j, 4), 0.0).with_child(blade.clone()));
    }

    let air_flow = solid(ctx, tube(&curved_air_flow(), 40, 2.0, 12), m.air_flow)
        .named(AIR_FLOW)
        .at(0.0, 0.0, 2.0);

    let vent = Node::default()
        .at(0.0, 8.0, 0.0)
        .rotated(lean, 0.0, 0.0)
        .with_child(solid(ctx, cylinder(5.0, 5.0, 2.5, 16, 1, false), m.body))
        .with_child(grill)
        .with_child(blades)
        .with_child(air_flow);

    let fan = Node::group("outerFan").with_child(base).with_child(vent);
    let anchors = FanAnchors::resolve(&fan)?;
    Ok((fan, anchors))
}

/// Builds one vertical inner fan.
pub fn build_inner_fan(ctx: &mut SceneContext, m: &FanMaterials) -> Result<(Node, FanAnchors)> {
    let mut grill = Node::default().at(0.0, 5.0, 0.0).rotated(FRAC_PI_2, 0.0, 0.0);
    grill.add_child(solid(ctx, torus(5.8, 0.2, 16, 32), m.body));
    grill.add_child(solid(ctx, torus(3.0, 0.2, 16, 32), m.body));
    let bar = solid(ctx, cuboid(0.2, 5.8, 0.2), m.body);
    for j in 0..8 {
        grill.add_child(bar.clone().rotated(0.0, 0.0, spoke(j, 8)));
    }

    let blade = solid(ctx, extrude(&blade_outline(2.0, 0.5), 0.2, Some(BLADE_BEVEL)), m.body)
        .rotated(FRAC_PI_2, 0.0, 0.0);
    let mut blades = Node::group(BLADES).at(0.0, 5.0, 0.0);
    for j in 0..6 {
        blades.add_child(Node::default().rotated(0.0, spoke(j, 6), 0.0).with_child(blade.clone()));
    }

    let mut column = cylinder(2.5, 0.4, AIR_FLOW_HEIGHT, 16, 30, true);
    spiral_taper(&mut column, AIR_FLOW_HEIGHT);
    let air_flow = solid(ctx, column, m.air_flow).named(AIR_FLOW).at(0.0, 6.0, 0.0);

    let fan = Node::group("innerFan")
        .with_child(solid(ctx, cylinder(4.0, 5.0, 2.0, 8, 1, false), m.body))
        .with_child(solid(ctx, cylinder(6.0, 6.0, 4.0, 16, 1, false), m.body).at(0.0, 3.0, 0.0))
        .with_child(grill)
        .with_child(blades)
        .with_child(air_flow)
        .with_child(
            solid(ctx, torus(5.9, 0.2, 16, 32), m.body)
                .at(0.0, 5.0, 0.0)
                .rotated(FRAC_PI_2, 0.0, 0.0),
        );
    let anchors = FanAnchors::resolve(&fan)?;
    Ok((fan, anchors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_fans_lean_less_on_wider_rings() {
        assert!(tilt_angle(300.0) < tilt_angle(180.0));
        assert!((tilt_angle(180.0) - (60.0f32).atan2(126.0)).abs() < 1e-6);
    }

    #[test]
    fn air_tube_curve_ends_forward_of_its_start() {
        let curve = curved_air_flow();
        let top = curve.point(1.0);
        assert!((top.y - AIR_FLOW_HEIGHT).abs() < 1e-3);
        assert!((top.z - AIR_FLOW_HEIGHT * 0.25).abs() < 1e-3);
    }
}
