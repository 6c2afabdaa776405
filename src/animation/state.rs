//! Per-turret animation state.
//!
//! This is the only state carried from one frame to the next: the aim angles, the
//! last launch time and one [`MissileCell`] per launcher slot. Everything else the
//! driver computes from the absolute time.

use std::f32::consts::PI;

use cgmath::Vector3;
use rand::Rng;

use crate::{
    animation::tween::{Easing, Tween},
    config::AnimationConfig,
    error::{BuildError, Result},
    parts::turret::MISSILE_CELLS,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellState {
    Ready,
    Firing { started_at: f64 },
}

/// One launcher slot: `Ready -> Firing -> Ready`, nothing else.
#[derive(Clone, Debug, PartialEq)]
pub struct MissileCell {
    state: CellState,
    rest: Vector3<f32>,
    launch: Option<Tween>,
}

impl MissileCell {
    /// A ready cell whose missile rests at `rest` in its parent's frame.
    pub fn new(rest: Vector3<f32>) -> Self {
        Self {
            state: CellState::Ready,
            rest,
            launch: None,
        }
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == CellState::Ready
    }

    pub fn rest(&self) -> Vector3<f32> {
        self.rest
    }

    pub fn launch(&self) -> Option<&Tween> {
        self.launch.as_ref()
    }

    /// Starts a launch rising `height` over `duration` seconds.
    pub fn fire(&mut self, now: f64, height: f32, duration: f64) -> Result<()> {
        let to = CellState::Firing { started_at: now };
        if !self.is_ready() {
            return Err(BuildError::IllegalTransition {
                from: self.state,
                to,
            });
        }
        let apex = self.rest + Vector3::new(0.0, height, 0.0);
        self.launch = Some(Tween::new(self.rest, apex, now, duration, Easing::QuadraticOut));
        self.state = to;
        Ok(())
    }

    /// Ends a launch; the missile is back at rest.
    pub fn land(&mut self) -> Result<()> {
        if self.is_ready() {
            return Err(BuildError::IllegalTransition {
                from: CellState::Ready,
                to: CellState::Ready,
            });
        }
        self.launch = None;
        self.state = CellState::Ready;
        Ok(())
    }

    /// Missile position at `t`: on the launch curve while firing, at rest otherwise.
    pub fn position(&self, t: f64) -> Vector3<f32> {
        match &self.launch {
            Some(tween) => tween.sample(t),
            None => self.rest,
        }
    }

    pub fn launch_finished(&self, t: f64) -> bool {
        self.launch.as_ref().is_some_and(|tween| tween.is_finished(t))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TurretState {
    /// Ring slot angle of the turret.
    pub base_angle: f32,
    pub current_angle: f32,
    pub target_angle: f32,
    pub rotation_speed: f32,
    /// Time of the latest launch on any cell, `None` before the first one.
    pub last_shot_time: Option<f64>,
    pub shot_interval: f64,
    pub cells: Vec<MissileCell>,
}

impl TurretState {
    /// Resting aim is half a turn from the slot angle.
    pub fn new(base_angle: f32, missile_rest: Vector3<f32>, config: &AnimationConfig) -> Self {
        let rest_aim = base_angle + PI;
        Self {
            base_angle,
            current_angle: rest_aim,
            target_angle: rest_aim,
            rotation_speed: config.rotation_speed,
            last_shot_time: None,
            shot_interval: config.shot_interval,
            cells: vec![MissileCell::new(missile_rest); MISSILE_CELLS],
        }
    }

    /// Picks a new target within `spread` of the resting aim.
    pub fn retarget(&mut self, rng: &mut impl Rng, spread: f32) {
        let offset = (rng.random::<f32>() - 0.5) * 2.0 * spread;
        self.target_angle = self.base_angle + PI + offset;
    }

    /**
     * Turns one `rotation_speed` step toward the target. Once the remaining gap is at
     * most one step the angle stays put. Returns the current angle.
     */
    pub fn step_aim(&mut self) -> f32 {
        let diff = self.target_angle - self.current_angle;
        if diff.abs() > self.rotation_speed {
            self.current_angle += diff.signum() * self.rotation_speed;
        }
        self.current_angle
    }

    /// Whether the shot interval since the last launch has passed at `t`.
    pub fn interval_elapsed(&self, t: f64) -> bool {
        self.last_shot_time
            .is_none_or(|last| t - last > self.shot_interval)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn firing_cell_cannot_fire_again() {
        let mut cell = MissileCell::new(Vector3::new(0.0, 0.6, 0.0));
        cell.fire(1.0, 20.0, 1.0).expect("ready cell fires");
        let err = cell.fire(1.5, 20.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            BuildError::IllegalTransition {
                from: CellState::Firing { started_at: 1.0 },
                to: CellState::Firing { started_at: 1.5 },
            }
        );
        cell.land().expect("firing cell lands");
        assert!(cell.is_ready());
        assert!(cell.land().is_err());
    }

    #[test]
    fn aim_converges_then_holds() {
        let mut state = TurretState::new(0.0, Vector3::new(0.0, 0.6, 0.0), &AnimationConfig::default());
        state.target_angle = state.current_angle + 0.5;
        let mut gap = (state.target_angle - state.current_angle).abs();
        while gap > state.rotation_speed {
            state.step_aim();
            let next = (state.target_angle - state.current_angle).abs();
            assert!(next < gap);
            gap = next;
        }
        let settled = state.current_angle;
        for _ in 0..10 {
            assert_eq!(state.step_aim(), settled);
        }
    }

    #[test]
    fn retarget_stays_within_the_spread() {
        let config = AnimationConfig::default();
        let mut state = TurretState::new(1.0, Vector3::new(0.0, 0.0, 0.0), &config);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            state.retarget(&mut rng, config.aim_spread);
            assert!((state.target_angle - (1.0 + PI)).abs() <= config.aim_spread + 1e-5);
        }
    }
}
