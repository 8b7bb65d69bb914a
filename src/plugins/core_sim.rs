use bevy::prelude::*;
use bevy::time::Fixed;
use bevy_rapier3d::prelude::PhysicsSet;

/// Fixed gameplay tick rate.
pub const TICK_HZ: f64 = 60.0;

// Core simulation timing & shared gameplay configuration.
#[derive(Resource, Default, Debug)]
pub struct SimState {
    pub tick: u64,
    pub elapsed_seconds: f32,
}
impl SimState {
    pub fn advance_fixed(&mut self) {
        self.tick += 1;
        self.elapsed_seconds = ticks_to_seconds(self.tick);
    }
}

pub fn ticks_to_seconds(ticks: u64) -> f32 {
    (ticks as f64 / TICK_HZ) as f32
}

/// Tunables read by the ball and pin systems every fixed tick.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GameConfig {
    /// Linear impulse applied to the ball per tick while a direction is held.
    pub impulse_strength: f32,
    /// Minimum cosine between a pin's live and initial up axis to count as upright.
    pub fall_threshold: f32,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self { impulse_strength: 0.1, fall_threshold: 0.9 }
    }
}

/// Ordering of gameplay work inside one fixed tick. `Clock` and `Movement` run in
/// `FixedUpdate` ahead of the physics step; `Evaluation` runs in `FixedPostUpdate`
/// once Rapier has written body poses back.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Clock,
    Movement,
    Evaluation,
}

pub struct CoreSimPlugin;
impl Plugin for CoreSimPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimState::default())
            .init_resource::<GameConfig>() // respect pre-inserted GameConfig (e.g. from --impulse)
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .configure_sets(
                FixedUpdate,
                (SimSet::Clock, SimSet::Movement.before(PhysicsSet::SyncBackend)).chain(),
            )
            .configure_sets(FixedPostUpdate, SimSet::Evaluation.after(PhysicsSet::Writeback))
            .add_systems(FixedUpdate, tick_state.in_set(SimSet::Clock));
    }
}

fn tick_state(mut sim: ResMut<SimState>) {
    sim.advance_fixed();
}
