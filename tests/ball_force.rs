mod common;

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ExternalImpulse, PhysicsSet};
use common::*;
use roll_a_ball::prelude::*;

fn impulse(app: &App, ball: Entity) -> Vec3 {
    app.world().get::<ExternalImpulse>(ball).unwrap().impulse
}

fn clear_impulse(app: &mut App, ball: Entity) {
    app.world_mut().get_mut::<ExternalImpulse>(ball).unwrap().impulse = Vec3::ZERO;
}

#[test]
fn last_started_direction_is_applied() {
    let mut app = gameplay_app();
    let (ball, _) = publish_lane(&mut app, true, &[Vec3::Y]);
    let ball = ball.unwrap();
    let strength = app.world().resource::<GameConfig>().impulse_strength;

    {
        let mut session = app.world_mut().resource_mut::<LaneSession>();
        session.start_force(ForceDirection::Right);
        session.start_force(ForceDirection::Up);
    }
    tick(&mut app);
    assert!(impulse(&app, ball).abs_diff_eq(Vec3::new(0.0, 0.0, -strength), 1e-6));
}

#[test]
fn stop_force_halts_impulses() {
    let mut app = gameplay_app();
    let (ball, _) = publish_lane(&mut app, true, &[Vec3::Y]);
    let ball = ball.unwrap();

    app.world_mut().resource_mut::<LaneSession>().start_force(ForceDirection::Left);
    tick(&mut app);
    assert!(impulse(&app, ball).x < 0.0);

    app.world_mut().resource_mut::<LaneSession>().stop_force();
    clear_impulse(&mut app, ball);
    for _ in 0..3 { tick(&mut app); }
    assert_eq!(impulse(&app, ball), Vec3::ZERO);
}

#[test]
fn impulse_uses_configured_strength() {
    let mut app = gameplay_app();
    app.insert_resource(GameConfig { impulse_strength: 0.2, fall_threshold: 0.9 });
    let (ball, _) = publish_lane(&mut app, true, &[]);
    let ball = ball.unwrap();

    app.world_mut().resource_mut::<LaneSession>().start_force(ForceDirection::Down);
    tick(&mut app);
    assert!(impulse(&app, ball).abs_diff_eq(Vec3::new(0.0, 0.0, 0.2), 1e-6));
}

#[test]
fn lane_without_ball_ignores_input() {
    let mut app = gameplay_app();
    publish_lane(&mut app, false, &[Vec3::Y]);
    app.world_mut().resource_mut::<LaneSession>().start_force(ForceDirection::Up);
    tick(&mut app);
    assert!(app.world().resource::<LaneSession>().ball().is_none());
}

#[derive(Resource, Default)]
struct SyncedImpulse(Vec3);

#[test]
fn impulse_is_written_before_physics_sync() {
    let mut app = gameplay_app();
    let (ball, _) = publish_lane(&mut app, true, &[]);
    let ball = ball.unwrap();
    app.init_resource::<SyncedImpulse>().add_systems(
        FixedUpdate,
        (move |q: Query<&ExternalImpulse>, mut seen: ResMut<SyncedImpulse>| {
            if let Ok(ext) = q.get(ball) {
                seen.0 = ext.impulse;
            }
        })
        .in_set(PhysicsSet::SyncBackend),
    );

    app.world_mut().resource_mut::<LaneSession>().start_force(ForceDirection::Right);
    tick(&mut app);
    assert!(app.world().resource::<SyncedImpulse>().0.x > 0.0);
}
