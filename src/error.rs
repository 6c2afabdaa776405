//! Error taxonomy for scene construction.
//!
//! Construction failures are fatal to the structure being built: a builder that
//! returns an error never leaves a partially assembled node tree behind. Per-frame
//! animation problems are not represented here; the driver logs and skips them.

use thiserror::Error;

use crate::animation::state::CellState;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// A raster was requested with a zero width or height.
    #[error("invalid texture dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Two anchor nodes inside one structure carry the same name.
    #[error("anchor name `{0}` is used more than once in the same structure")]
    DuplicateAnchor(String),

    /// An anchor the animation driver depends on was not attached.
    #[error("required anchor `{0}` is missing")]
    MissingAnchor(String),

    /// Two layers or instances were registered under the same name.
    #[error("instance `{0}` already exists")]
    DuplicateInstance(String),

    /// Ring or dome parameters that cannot produce a valid placement.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// Missile cells only move `ready -> firing -> ready`.
    #[error("illegal missile cell transition {from:?} -> {to:?}")]
    IllegalTransition { from: CellState, to: CellState },
}

pub type Result<T> = std::result::Result<T, BuildError>;
