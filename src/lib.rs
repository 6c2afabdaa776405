//! bastion
//!
//! Procedural construction and animation of a 3D defense base: turrets, fans, a
//! layered dome shield, sprayers and magnetic grids, textured with rasters
//! synthesized from gradient noise. The crate produces an in-memory scene tree and
//! draw batches; a rendering host owns the surface, camera and lights.
//!
//! High-level modules
//! - `noise`: seeded 2D gradient noise and fractal sums
//! - `synthesis`: procedural texture generators
//! - `primitives`: parametric mesh generators
//! - `data_structures`: scene graph, meshes, materials, textures, instances
//! - `parts`: builders for each mechanical sub-assembly
//! - `assembly`: ring placement and the composed base
//! - `animation`: the per-frame driver, tweens and turret state
//! - `context`: the resource tables and scene root handed to every builder
//! - `config`: layout and animation constants
//! - `render`: batching the tree for the rendering host
//! - `flow`: the frame loop and collaborator traits
//!

pub mod animation;
pub mod assembly;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod noise;
pub mod parts;
pub mod primitives;
pub mod render;
pub mod synthesis;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use error::{BuildError, Result};
