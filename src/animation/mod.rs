//! Per-frame animation.
//!
//! The [`driver::AnimationDriver`] is the only thing that mutates the assembled scene
//! after construction. It reads the global time `t` (seconds), the per-instance state
//! kept in [`state`] and moves the anchored nodes it was handed at build time.
//!
//! - `tween` interpolates one-shot launches with an easing curve
//! - `state` holds turret aim tracking and the missile cell state machine
//! - `driver` applies every channel once per frame

pub mod driver;
pub mod state;
pub mod tween;
