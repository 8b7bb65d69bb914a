#![allow(dead_code)]
use bevy::prelude::*;
use roll_a_ball::prelude::*;

/// Headless app with the fixed-tick gameplay plugins but no lane loading.
pub fn gameplay_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(CoreSimPlugin)
        .init_resource::<LaneSession>()
        .add_plugins(BallPlugin)
        .add_plugins(RoundPlugin);
    app
}

/// Spawn unparented pins with the given up axes and publish a lane that owns them.
pub fn publish_lane(app: &mut App, ball: bool, pin_ups: &[Vec3]) -> (Option<Entity>, Vec<Entity>) {
    let world = app.world_mut();
    let root = world.spawn(LaneRoot).id();
    let ball_entity = ball.then(|| {
        world
            .spawn((Ball, bevy_rapier3d::prelude::ExternalImpulse::default()))
            .id()
    });
    let mut pins = Vec::new();
    let mut trackers = Vec::new();
    for (i, up) in pin_ups.iter().enumerate() {
        let rot = Quat::from_rotation_arc(Vec3::Y, up.normalize());
        let e = world
            .spawn((Pin, Transform::from_rotation(rot)))
            .id();
        trackers.push(PinTracker::new(e, format!("pin{}", i + 1), *up));
        pins.push(e);
    }
    let mut session = world.resource_mut::<LaneSession>();
    let ticket = session.begin_load().expect("session should be unloaded");
    session
        .publish(ticket, Lane::new(root, ball_entity.map(BallController::new), trackers))
        .expect("fresh ticket publishes");
    (ball_entity, pins)
}

/// Up axis whose cosine with world Y is `d`.
pub fn up_with_dot(d: f32) -> Vec3 {
    Vec3::new((1.0 - d * d).max(0.0).sqrt(), d, 0.0)
}

pub fn set_pin_up(app: &mut App, pin: Entity, up: Vec3) {
    let rot = Quat::from_rotation_arc(Vec3::Y, up.normalize());
    app.world_mut()
        .entity_mut(pin)
        .insert(Transform::from_rotation(rot));
}

/// One fixed step: movement in `FixedUpdate`, evaluation in `FixedPostUpdate`.
pub fn tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
    app.world_mut().run_schedule(FixedPostUpdate);
}

/// Every event of type `E` still buffered in the world.
pub fn all_events<E: Event + Clone>(app: &App) -> Vec<E> {
    let events = app.world().resource::<Events<E>>();
    let mut reader = events.get_reader();
    reader.read(events).cloned().collect()
}
