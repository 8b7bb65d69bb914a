mod common;

use bevy::input::mouse::MouseWheel;
use bevy::input::touch::Touches;
use bevy::prelude::*;
use common::*;
use roll_a_ball::plugins::controls::DirectionButton;
use roll_a_ball::prelude::*;

/// Headless controls with a loaded lane. Input is driven by hand since there is no InputPlugin.
fn controls_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .init_resource::<LaneSession>()
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<Touches>()
        .add_event::<MouseWheel>()
        .add_event::<LaneRequest>()
        .add_plugins(ControlsPlugin);
    publish_lane(&mut app, true, &[Vec3::Y]);
    // Settle the freshly spawned arrow buttons before any input.
    app.update();
    app
}

/// One frame of keyboard input: previous just-states are cleared first.
fn keys(app: &mut App, f: impl FnOnce(&mut ButtonInput<KeyCode>)) {
    let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    input.clear();
    f(&mut input);
    app.update();
}

fn set_button(app: &mut App, dir: ForceDirection, interaction: Interaction) {
    let mut q = app.world_mut().query::<(Entity, &DirectionButton)>();
    let entity = q
        .iter(app.world())
        .find_map(|(e, b)| (b.0 == dir).then_some(e))
        .expect("arrow button spawned");
    app.world_mut().entity_mut(entity).insert(interaction);
    app.update();
}

fn requested(app: &App) -> Option<ForceDirection> {
    app.world().resource::<LaneSession>().ball().and_then(|b| b.requested)
}

#[test]
fn latest_key_press_wins() {
    let mut app = controls_app();
    keys(&mut app, |k| k.press(KeyCode::ArrowRight));
    assert_eq!(requested(&app), Some(ForceDirection::Right));
    keys(&mut app, |k| k.press(KeyCode::ArrowUp));
    assert_eq!(requested(&app), Some(ForceDirection::Up));
}

#[test]
fn releasing_the_active_key_falls_back_to_a_held_one() {
    let mut app = controls_app();
    keys(&mut app, |k| k.press(KeyCode::ArrowRight));
    keys(&mut app, |k| k.press(KeyCode::ArrowUp));
    keys(&mut app, |k| k.release(KeyCode::ArrowUp));
    assert_eq!(requested(&app), Some(ForceDirection::Right));
}

#[test]
fn releasing_every_key_stops() {
    let mut app = controls_app();
    keys(&mut app, |k| k.press(KeyCode::KeyD));
    keys(&mut app, |k| k.press(KeyCode::KeyW));
    keys(&mut app, |k| {
        k.release(KeyCode::KeyW);
        k.release(KeyCode::KeyD);
    });
    assert_eq!(requested(&app), None);
}

#[test]
fn releasing_an_inactive_key_keeps_force() {
    let mut app = controls_app();
    keys(&mut app, |k| k.press(KeyCode::ArrowRight));
    keys(&mut app, |k| k.press(KeyCode::ArrowUp));
    keys(&mut app, |k| k.release(KeyCode::ArrowRight));
    assert_eq!(requested(&app), Some(ForceDirection::Up));
}

#[test]
fn held_arrow_button_survives_key_release() {
    let mut app = controls_app();
    keys(&mut app, |k| k.press(KeyCode::ArrowUp));
    set_button(&mut app, ForceDirection::Left, Interaction::Pressed);
    assert_eq!(requested(&app), Some(ForceDirection::Left));

    keys(&mut app, |k| k.release(KeyCode::ArrowUp));
    assert_eq!(requested(&app), Some(ForceDirection::Left));

    set_button(&mut app, ForceDirection::Left, Interaction::None);
    assert_eq!(requested(&app), None);
}

#[test]
fn releasing_another_button_keeps_force() {
    let mut app = controls_app();
    set_button(&mut app, ForceDirection::Down, Interaction::Pressed);
    set_button(&mut app, ForceDirection::Right, Interaction::Hovered);
    assert_eq!(requested(&app), Some(ForceDirection::Down));
}
