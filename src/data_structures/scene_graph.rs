//! Scene graph and hierarchical scene organization.
//!
//! A [`Node`] owns its children outright, so the tree can never contain cycles and
//! dropping a node drops its subtree. Each node keeps a local [`Transform`] (Euler
//! rotation, applied X then Y then Z like the shading collaborator expects) and a
//! cached world [`Instance`] refreshed by [`Node::update_world_transforms`].
//!
//! Nodes are addressed by [`NodePath`], the child indices from some root. Builders
//! name the sub-nodes that animation needs, collect them once with
//! [`Node::anchors`] and keep the resulting paths, so no string lookup happens per
//! frame.

use std::collections::HashMap;

use cgmath::{Euler, InnerSpace, Matrix3, Quaternion, Rad, Rotation3, Vector3, Zero};
use log::warn;

use crate::{
    data_structures::{instance::Instance, material::MaterialId, mesh::MeshId},
    error::{BuildError, Result},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Euler<Rad<f32>>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Euler::new(Rad(0.0), Rad(0.0), Rad(0.0)),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn quaternion(&self) -> Quaternion<f32> {
        Quaternion::from_angle_x(self.rotation.x)
            * Quaternion::from_angle_y(self.rotation.y)
            * Quaternion::from_angle_z(self.rotation.z)
    }

    pub fn to_instance(&self) -> Instance {
        Instance {
            position: self.position,
            rotation: self.quaternion(),
            scale: self.scale,
        }
    }

    /**
     * Rotates so that local +Z points at `target`, with +Y kept as close to world up as
     * possible. `target` is expressed in the parent's frame.
     *
     * Returns `false` and leaves the rotation untouched when the target coincides with
     * the position.
     */
    pub fn look_at(&mut self, target: Vector3<f32>) -> bool {
        let up = Vector3::unit_y();
        let mut z = target - self.position;
        if !(z.magnitude2() > f32::EPSILON) {
            warn!(
                "look_at target {:?} coincides with position {:?}, rotation kept",
                target, self.position
            );
            return false;
        }
        z = z.normalize();
        let mut x = up.cross(z);
        if x.magnitude2() < f32::EPSILON {
            // looking straight up or down: nudge off the pole
            z.z += 0.0001;
            z = z.normalize();
            x = up.cross(z);
        }
        let x = x.normalize();
        let y = z.cross(x);
        self.rotation = euler_xyz(&Matrix3::from_cols(x, y, z));
        true
    }
}

/// Decomposes a pure rotation matrix into X-then-Y-then-Z Euler angles.
fn euler_xyz(m: &Matrix3<f32>) -> Euler<Rad<f32>> {
    // row/column naming, cgmath stores columns
    let m11 = m.x.x;
    let m12 = m.y.x;
    let m13 = m.z.x;
    let m22 = m.y.y;
    let m23 = m.z.y;
    let m32 = m.y.z;
    let m33 = m.z.z;

    let y = m13.clamp(-1.0, 1.0).asin();
    let (x, z) = if m13.abs() < 0.999_999_9 {
        ((-m23).atan2(m33), (-m12).atan2(m11))
    } else {
        (m32.atan2(m22), 0.0)
    };
    Euler::new(Rad(x), Rad(y), Rad(z))
}

/// Mesh and material a node draws with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Drawable {
    pub mesh: MeshId,
    pub material: MaterialId,
}

/// Child indices from some root down to a node. The empty path is the root itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn join(&self, rest: &NodePath) -> Self {
        Self(self.0.iter().chain(rest.0.iter()).copied().collect())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// Named sub-nodes of one structure, keyed by name, relative to its root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Anchors(HashMap<String, NodePath>);

impl Anchors {
    pub fn get(&self, name: &str) -> Option<&NodePath> {
        self.0.get(name)
    }

    /// Like [`Anchors::get`] but a missing name is a construction error.
    pub fn require(&self, name: &str) -> Result<NodePath> {
        self.0
            .get(name)
            .cloned()
            .ok_or_else(|| BuildError::MissingAnchor(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Transform,
    pub visible: bool,
    pub drawable: Option<Drawable>,
    children: Vec<Node>,
    world: Instance,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            name: None,
            transform: Transform::default(),
            visible: true,
            drawable: None,
            children: Vec::new(),
            world: Instance::default(),
        }
    }
}

impl Node {
    /// An empty grouping node.
    pub fn group(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn mesh(mesh: MeshId, material: MaterialId) -> Self {
        Self {
            drawable: Some(Drawable { mesh, material }),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Euler::new(Rad(x), Rad(y), Rad(z));
        self
    }

    pub fn scaled(mut self, s: f32) -> Self {
        self.transform.scale = Vector3::new(s, s, s);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Appends a child and returns its index.
    pub fn add_child(&mut self, child: Node) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    pub fn get_children(&self) -> &[Node] {
        &self.children
    }

    pub fn get_children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    pub fn remove_child(&mut self, index: usize) -> Option<Node> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }

    /// Inserts at `index`, clamped to the child count. Returns the actual index.
    pub fn insert_child(&mut self, index: usize, child: Node) -> usize {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
        index
    }

    pub fn get(&self, path: &NodePath) -> Option<&Node> {
        let mut node = self;
        for &i in path.indices() {
            node = node.children.get(i)?;
        }
        Some(node)
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        let mut node = self;
        for &i in path.indices() {
            node = node.children.get_mut(i)?;
        }
        Some(node)
    }

    /// Path to the first node (pre-order) carrying `name`, the root included.
    pub fn find(&self, name: &str) -> Option<NodePath> {
        if self.name() == Some(name) {
            return Some(NodePath::root());
        }
        self.children.iter().enumerate().find_map(|(i, child)| {
            child
                .find(name)
                .map(|rest| NodePath::root().child(i).join(&rest))
        })
    }

    /**
     * Collects every named descendant (the root itself excluded) into an [`Anchors`]
     * table. Two descendants sharing a name is a construction error.
     */
    pub fn anchors(&self) -> Result<Anchors> {
        let mut table = HashMap::new();
        self.collect_anchors(&NodePath::root(), &mut table)?;
        Ok(Anchors(table))
    }

    fn collect_anchors(&self, at: &NodePath, table: &mut HashMap<String, NodePath>) -> Result<()> {
        for (i, child) in self.children.iter().enumerate() {
            let path = at.child(i);
            if let Some(name) = child.name() {
                if table.insert(name.to_string(), path.clone()).is_some() {
                    return Err(BuildError::DuplicateAnchor(name.to_string()));
                }
            }
            child.collect_anchors(&path, table)?;
        }
        Ok(())
    }

    /**
     * Interposes a pivot: the returned node sits where `self` was and `self` becomes
     * its only child at the local origin. Rotating the pivot then swings the part
     * about that point instead of about the part's own parent.
     */
    pub fn into_pivot(mut self, pivot_name: &str) -> Node {
        let mut pivot = Node::group(pivot_name);
        pivot.transform.position = self.transform.position;
        self.transform.position = Vector3::zero();
        pivot.children.push(self);
        pivot
    }

    pub fn world_transform(&self) -> &Instance {
        &self.world
    }

    pub fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.transform.to_instance();
        let world = self.world;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    pub fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Instance::default());
    }

    /// Pre-order visit of the subtree.
    pub fn walk(&self, visit: &mut dyn FnMut(&Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Number of nodes in the subtree, this one included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Rotation;

    use super::*;

    #[test]
    fn look_at_points_local_z_at_target() {
        let mut transform = Transform {
            position: Vector3::new(10.0, 0.0, 0.0),
            ..Default::default()
        };
        let target = Vector3::new(0.0, 5.0, 3.0);
        assert!(transform.look_at(target));
        let forward = transform.quaternion().rotate_vector(Vector3::unit_z());
        let expected = (target - transform.position).normalize();
        assert!((forward - expected).magnitude() < 1e-4);
    }

    #[test]
    fn look_at_own_position_is_ignored() {
        let mut transform = Transform::default();
        let before = transform.rotation;
        assert!(!transform.look_at(Vector3::zero()));
        assert_eq!(transform.rotation, before);
    }

    #[test]
    fn paths_reach_nested_nodes() {
        let root = Node::group("root").with_child(
            Node::group("a")
                .with_child(Node::group("b"))
                .with_child(Node::group("c")),
        );
        let path = root.find("c").unwrap_or_default();
        assert_eq!(path.indices(), &[0, 1]);
        assert_eq!(root.get(&path).and_then(Node::name), Some("c"));
        assert_eq!(root.count(), 4);
    }

    #[test]
    fn shared_names_at_different_depths_collide() {
        let part = Node::group("t")
            .with_child(Node::group("gunPivot"))
            .with_child(Node::group("body").with_child(Node::group("gunPivot")));
        assert_eq!(
            part.anchors().err(),
            Some(BuildError::DuplicateAnchor("gunPivot".to_string()))
        );
    }
}
