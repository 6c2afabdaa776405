//! Placement of replicated structures around a circle.
//!
//! Slot `i` of `N` sits at angle `2πi/N`, at `(r cos θ, h(x, z) + lift, r sin θ)`
//! where `h` comes from the optional terrain provider.

use std::f32::consts::TAU;

use cgmath::{Euler, Rad, Vector3};

use crate::{
    config::RingLayout,
    data_structures::scene_graph::{Node, Transform},
    error::{BuildError, Result},
    flow::TerrainProvider,
};

/// What a slot's instance points at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Aim {
    /// A fixed point in the layer's frame.
    Point(Vector3<f32>),
    /// Toward `(fraction·r cos θ, height, fraction·r sin θ)`, a point on the slot's own
    /// spoke pulled toward the center.
    Inward { fraction: f32, height: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Orientation {
    /// No rotation.
    Upright,
    /// `rotation.y = θ + offset`.
    Fixed { offset: f32 },
    /// Local +Z aimed at a target.
    Facing(Aim),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    pub index: usize,
    pub angle: f32,
    /// Position and rotation; scale is left to the replicated structure.
    pub transform: Transform,
}

pub fn slot_angle(index: usize, count: usize) -> f32 {
    TAU * index as f32 / count as f32
}

fn validate(layout: &RingLayout) -> Result<()> {
    if layout.count == 0 {
        return Err(BuildError::InvalidLayout("ring needs at least one slot".to_string()));
    }
    if !layout.radius.is_finite() || layout.radius < 0.0 {
        return Err(BuildError::InvalidLayout(format!(
            "ring radius must be finite and non-negative, got {}",
            layout.radius
        )));
    }
    if !layout.height.is_finite() {
        return Err(BuildError::InvalidLayout(format!(
            "ring height must be finite, got {}",
            layout.height
        )));
    }
    Ok(())
}

/// Computes every slot of `layout`. Terrain heights that are not finite count as 0.
pub fn ring_slots(
    layout: &RingLayout,
    orientation: Orientation,
    terrain: Option<&dyn TerrainProvider>,
) -> Result<Vec<Slot>> {
    validate(layout)?;
    let r = layout.radius;
    let slots = (0..layout.count)
        .map(|index| {
            let angle = slot_angle(index, layout.count);
            let (x, z) = (r * angle.cos(), r * angle.sin());
            let ground = terrain.map_or(0.0, |t| t.height_at(x, z));
            let ground = if ground.is_finite() {
                ground
            } else {
                log::warn!("terrain height at ({x}, {z}) is not finite, using 0");
                0.0
            };
            let mut transform = Transform {
                position: Vector3::new(x, ground + layout.height, z),
                ..Default::default()
            };
            match orientation {
                Orientation::Upright => {}
                Orientation::Fixed { offset } => {
                    transform.rotation = Euler::new(Rad(0.0), Rad(angle + offset), Rad(0.0));
                }
                Orientation::Facing(aim) => {
                    let target = match aim {
                        Aim::Point(p) => p,
                        Aim::Inward { fraction, height } => {
                            Vector3::new(fraction * x, height, fraction * z)
                        }
                    };
                    transform.look_at(target);
                }
            }
            Slot {
                index,
                angle,
                transform,
            }
        })
        .collect();
    Ok(slots)
}

/// Clones `template` into every slot, naming copies `{prefix}_{index}`.
pub fn replicate(template: &Node, slots: &[Slot], prefix: &str) -> Vec<Node> {
    slots
        .iter()
        .map(|slot| {
            let mut instance = template.clone().named(&format!("{prefix}_{}", slot.index));
            instance.transform.position = slot.transform.position;
            instance.transform.rotation = slot.transform.rotation;
            instance
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;

    #[test]
    fn empty_ring_is_rejected() {
        let layout = RingLayout::new(0, 10.0, 0.0);
        assert!(matches!(
            ring_slots(&layout, Orientation::Upright, None),
            Err(BuildError::InvalidLayout(_))
        ));
    }

    #[test]
    fn nan_radius_is_rejected() {
        let layout = RingLayout::new(4, f32::NAN, 0.0);
        assert!(ring_slots(&layout, Orientation::Upright, None).is_err());
    }

    #[test]
    fn fixed_orientation_adds_offset_to_the_slot_angle() {
        let layout = RingLayout::new(4, 10.0, 0.0);
        let slots = ring_slots(&layout, Orientation::Fixed { offset: PI }, None).expect("valid ring");
        for slot in slots {
            assert!((slot.transform.rotation.y.0 - (slot.angle + PI)).abs() < 1e-6);
        }
    }

    #[test]
    fn replicas_keep_template_scale() {
        let template = Node::group("turret").scaled(1.5);
        let slots = ring_slots(&RingLayout::new(3, 5.0, 1.0), Orientation::Upright, None).expect("valid ring");
        let copies = replicate(&template, &slots, "turret");
        assert_eq!(copies.len(), 3);
        assert_eq!(copies[2].name(), Some("turret_2"));
        assert!(copies.iter().all(|c| c.transform.scale == Vector3::new(1.5, 1.5, 1.5)));
    }
}
