//! Resolved node transforms.
//!
//! An [`Instance`] is a translation, rotation and scale triple. Node-local Euler
//! transforms are converted into instances and multiplied down the tree
//! (`parent * local`) to get world transforms. [`InstanceRaw`] is the packed form a
//! renderer uploads per draw.

use std::ops::Mul;

use cgmath::{Matrix3, Matrix4, One, Quaternion, SquareMatrix, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Instance {
    /// No translation, no rotation, unit scale.
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_raw(&self) -> InstanceRaw {
        let model = self.to_matrix();
        InstanceRaw {
            model: model.into(),
            normal: Matrix3::from(self.rotation).into(),
            handedness: model.determinant().signum(),
        }
    }

    /// Maps a point from this instance's local frame into its parent frame.
    pub fn transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        self.position + self.rotation * scale_by(self.scale, point)
    }

    fn compose(&self, rhs: &Instance) -> Instance {
        Instance {
            position: self.transform_point(rhs.position),
            rotation: self.rotation * rhs.rotation,
            scale: scale_by(self.scale, rhs.scale),
        }
    }
}

fn scale_by(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x * b.x, a.y * b.y, a.z * b.z)
}

impl Mul<Instance> for Instance {
    type Output = Self;

    fn mul(self, rhs: Instance) -> Self::Output {
        self.compose(&rhs)
    }
}

impl<'a, 'b> Mul<&'b Instance> for &'a Instance {
    type Output = Instance;

    fn mul(self, rhs: &'b Instance) -> Self::Output {
        self.compose(rhs)
    }
}

impl From<Vector3<f32>> for Instance {
    fn from(position: Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * Packed world transform: model matrix, rotation-only normal matrix and the sign of the
 * model determinant (negative when a mirrored scale flips winding).
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
    pub handedness: f32,
}

impl InstanceRaw {
    pub fn translation(&self) -> [f32; 3] {
        let [x, y, z, _] = self.model[3];
        [x, y, z]
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Rad, Rotation3};

    use super::*;

    #[test]
    fn parent_rotation_and_scale_apply_to_child_offset() {
        let parent = Instance {
            position: Vector3::new(10.0, 0.0, 0.0),
            rotation: Quaternion::from_angle_y(Rad(std::f32::consts::FRAC_PI_2)),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        let child = Instance::from(Vector3::new(1.0, 0.0, 0.0));
        let world = &parent * &child;
        // +X rotated a quarter turn about Y points to -Z
        assert!((world.position - Vector3::new(10.0, 0.0, -2.0)).magnitude() < 1e-5);
        assert_eq!(world.scale, Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn raw_translation_matches_position() {
        let instance = Instance::from(Vector3::new(1.0, 2.0, 3.0));
        let raw = instance.to_raw();
        assert_eq!(raw.translation(), [1.0, 2.0, 3.0]);
        assert_eq!(raw.handedness, 1.0);
    }
}
