// Round-state evaluation: aggregates pin trackers into PinFell / GameOver events.
use bevy::prelude::*;

use crate::plugins::core_sim::{GameConfig, SimSet, SimState};
use crate::plugins::lane::LaneSession;
use crate::plugins::pins::{live_up, Pin, PinTracker};

/// Emitted once per pin, on the tick it is first judged fallen.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PinFell {
    pub pin: Entity,
    pub name: String,
    pub tick: u64,
}

/// Emitted once per lane lifetime, when every pin is down.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOver {
    pub tick: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RoundState {
    pub pins_felled: u32,
    pub all_down: bool,
    pub game_over_signaled: bool,
}

/// What one evaluation pass produced, in emission order.
#[derive(Debug, Default, PartialEq)]
pub struct RoundOutcome {
    /// Indices into the pin slice of pins that fell this tick.
    pub fallen: Vec<usize>,
    pub game_over: bool,
}

/// One tick of evaluation. `live_up` yields the world up axis of a pin, or `None`
/// when the pin has no transform this tick (that pin is skipped).
pub fn evaluate_round(
    pins: &mut [PinTracker],
    round: &mut RoundState,
    threshold: f32,
    mut live_up: impl FnMut(Entity) -> Option<Vec3>,
) -> RoundOutcome {
    let mut outcome = RoundOutcome::default();

    for (i, pin) in pins.iter_mut().enumerate() {
        if pin.has_fallen {
            continue;
        }
        let Some(up) = live_up(pin.entity) else { continue; };
        if pin.observe(up, threshold) {
            outcome.fallen.push(i);
        }
    }
    round.pins_felled = pins.iter().filter(|p| p.has_fallen).count() as u32;

    // An empty lane has nothing to knock over.
    round.all_down = !pins.is_empty() && pins.iter().all(|p| p.has_fallen);
    if round.all_down {
        if !round.game_over_signaled {
            round.game_over_signaled = true;
            outcome.game_over = true;
        }
    } else {
        round.game_over_signaled = false;
    }
    outcome
}

pub struct RoundPlugin;
impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PinFell>()
            .add_event::<GameOver>()
            .add_systems(FixedPostUpdate, evaluate_pins.in_set(SimSet::Evaluation));
    }
}

fn evaluate_pins(
    mut session: ResMut<LaneSession>,
    cfg: Res<GameConfig>,
    sim: Res<SimState>,
    q_pins: Query<(&Transform, Option<&Parent>), With<Pin>>,
    q_parents: Query<&GlobalTransform>,
    mut ev_fell: EventWriter<PinFell>,
    mut ev_game_over: EventWriter<GameOver>,
) {
    let Some(lane) = session.lane_mut() else { return; };
    let outcome = evaluate_round(&mut lane.pins, &mut lane.round, cfg.fall_threshold, |e| {
        let (local, parent) = q_pins.get(e).ok()?;
        Some(live_up(parent.and_then(|p| q_parents.get(p.get()).ok()), local))
    });

    for &i in &outcome.fallen {
        let pin = &lane.pins[i];
        info!("PIN fell name={} tick={} felled={}/{}", pin.name, sim.tick, lane.round.pins_felled, lane.pins.len());
        ev_fell.send(PinFell { pin: pin.entity, name: pin.name.clone(), tick: sim.tick });
    }
    if outcome.game_over {
        info!("ROUND game_over tick={} t={:.2}s", sim.tick, sim.elapsed_seconds);
        ev_game_over.send(GameOver { tick: sim.tick });
    }
}
