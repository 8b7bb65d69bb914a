// Scoreboard & round timer driven by round events, derived game phase, and reset handling.

use bevy::prelude::*;

use crate::plugins::core_sim::ticks_to_seconds;
use crate::plugins::lane::{LanePhase, LaneRequest, LaneSession};
use crate::plugins::round::{GameOver, PinFell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    Loading,
    Playing,
    RoundOver,
}

pub fn game_phase(session: &LaneSession, score: &Scoreboard) -> GamePhase {
    match session.phase() {
        LanePhase::Unloaded => GamePhase::Idle,
        LanePhase::Loading => GamePhase::Loading,
        LanePhase::Loaded if score.game_over => GamePhase::RoundOver,
        LanePhase::Loaded => GamePhase::Playing,
    }
}

#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct Scoreboard {
    pub pins_felled: u32,
    pub started_tick: Option<u64>,
    pub finished_tick: Option<u64>,
    pub game_over: bool,
}

impl Scoreboard {
    /// First fall starts the clock.
    pub fn record_pin_fell(&mut self, tick: u64) {
        self.pins_felled += 1;
        self.started_tick.get_or_insert(tick);
    }

    pub fn record_game_over(&mut self, tick: u64) {
        self.game_over = true;
        self.finished_tick = Some(tick);
    }

    /// Seconds on the clock: zero before the first fall, frozen after game over.
    pub fn elapsed_seconds(&self, now_tick: u64) -> f32 {
        let Some(start) = self.started_tick else { return 0.0; };
        let end = self.finished_tick.unwrap_or(now_tick);
        ticks_to_seconds(end.saturating_sub(start))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub struct GameStatePlugin;
impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Scoreboard>()
            .add_systems(Update, (track_round_events, reset_on_key).chain());
    }
}

fn track_round_events(
    mut score: ResMut<Scoreboard>,
    mut ev_fell: EventReader<PinFell>,
    mut ev_game_over: EventReader<GameOver>,
) {
    // Falls before game over, so the last pin is counted before the clock stops.
    for ev in ev_fell.read() {
        score.record_pin_fell(ev.tick);
    }
    for ev in ev_game_over.read() {
        score.record_game_over(ev.tick);
    }
}

fn reset_on_key(
    keys: Res<ButtonInput<KeyCode>>,
    mut score: ResMut<Scoreboard>,
    mut requests: EventWriter<LaneRequest>,
) {
    if !(score.game_over && keys.just_pressed(KeyCode::KeyR)) {
        return;
    }
    request_reset(&mut score, &mut requests);
}

/// Presentation-side reset: rebuild the lane and zero score/timer.
pub fn request_reset(score: &mut Scoreboard, requests: &mut EventWriter<LaneRequest>) {
    score.clear();
    requests.send(LaneRequest::Reset);
}
