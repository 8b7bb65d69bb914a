// Ball marker, requested-direction state, and the per-tick impulse step.
use bevy::prelude::*;
use bevy_rapier3d::prelude::ExternalImpulse;

use crate::plugins::core_sim::{GameConfig, SimSet};
use crate::plugins::force::ForceDirection;
use crate::plugins::lane::LaneSession;

#[derive(Component)]
pub struct Ball;

/// Direction currently held for the player-controlled ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallController {
    pub entity: Entity,
    pub requested: Option<ForceDirection>,
}

impl BallController {
    pub fn new(entity: Entity) -> Self {
        Self { entity, requested: None }
    }

    /// Last write wins; repeating the held direction changes nothing.
    pub fn start_force(&mut self, direction: ForceDirection) {
        self.requested = Some(direction);
    }

    pub fn stop_force(&mut self) {
        self.requested = None;
    }

    /// Impulse to apply this tick, if a direction is held.
    pub fn impulse(&self, strength: f32) -> Option<Vec3> {
        self.requested.map(|d| d.vector() * strength)
    }
}

pub struct BallPlugin;
impl Plugin for BallPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, apply_ball_force.in_set(SimSet::Movement));
    }
}

fn apply_ball_force(
    session: Res<LaneSession>,
    cfg: Res<GameConfig>,
    mut q_ball: Query<&mut ExternalImpulse, With<Ball>>,
) {
    let Some(ball) = session.ball() else { return; };
    let Some(impulse) = ball.impulse(cfg.impulse_strength) else { return; };
    let Ok(mut ext) = q_ball.get_mut(ball.entity) else { return; };
    // Rapier clears the impulse after each step, so this is the impulse for this tick only.
    ext.impulse = impulse;
}
