//! Scene assembly: ring placement and the composed defense base.
//!
//! - `ring` computes evenly spaced slots and replicates a template into them
//! - `base` builds every layer and keeps the handles the animation driver needs

pub mod base;
pub mod ring;
