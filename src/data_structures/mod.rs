//! Engine data structures: meshes, materials, textures, scene graph and instances.
//!
//! - `mesh` holds generated vertex/index data and particle clouds
//! - `material` holds shading bundles and typed shader uniforms
//! - `texture` wraps synthesized RGBA rasters with sampling hints
//! - `instance` holds resolved transforms and their packed raw form
//! - `scene_graph` enables hierarchical scene organization

pub mod instance;
pub mod material;
pub mod mesh;
pub mod scene_graph;
pub mod texture;
