// Player input: four hold-to-push arrow buttons, keyboard equivalents,
// and pinch / mouse-wheel lane rescaling.
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::plugins::force::ForceDirection;
use crate::plugins::lane::{LaneRequest, LaneSession};

const BUTTON_SIZE: f32 = 75.0;
/// Scale change per wheel line.
const WHEEL_STEP: f32 = 0.1;

#[derive(Component)]
pub struct DirectionButton(pub ForceDirection);

pub struct ControlsPlugin;
impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_direction_buttons)
            .add_systems(Update, (direction_button_input, keyboard_force_input, rescale_input));
    }
}

fn spawn_direction_buttons(mut commands: Commands) {
    commands
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                bottom: Val::Px(16.0),
                left: Val::Px(16.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                ..default()
            },
            ..default()
        })
        .with_children(|pad| {
            row(pad, &[ForceDirection::Up]);
            row(pad, &[ForceDirection::Left, ForceDirection::Right]);
            row(pad, &[ForceDirection::Down]);
        });
}

fn row(pad: &mut ChildBuilder, dirs: &[ForceDirection]) {
    pad.spawn(NodeBundle {
        style: Style { column_gap: Val::Px(BUTTON_SIZE), ..default() },
        ..default()
    })
    .with_children(|r| {
        for &dir in dirs {
            r.spawn((
                ButtonBundle {
                    style: Style {
                        width: Val::Px(BUTTON_SIZE),
                        height: Val::Px(BUTTON_SIZE),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    background_color: BackgroundColor(Color::srgba(0.1, 0.3, 0.9, 0.7)),
                    ..default()
                },
                DirectionButton(dir),
            ))
            .with_children(|b| {
                b.spawn(TextBundle::from_section(
                    dir.label(),
                    TextStyle { font_size: 36.0, color: Color::WHITE, ..default() },
                ));
            });
        }
    });
}

/// Press-and-hold: pressing starts the force, any release stops it.
fn direction_button_input(
    mut session: ResMut<LaneSession>,
    q_buttons: Query<(&Interaction, &DirectionButton), Changed<Interaction>>,
) {
    for (interaction, button) in &q_buttons {
        match *interaction {
            Interaction::Pressed => session.start_force(button.0),
            Interaction::Hovered | Interaction::None => {
                if session.ball().and_then(|b| b.requested) == Some(button.0) {
                    session.stop_force();
                }
            }
        }
    }
}

/// Keyboard equivalent of the arrow pad: the latest press wins.
fn keyboard_force_input(keys: Res<ButtonInput<KeyCode>>, mut session: ResMut<LaneSession>) {
    for dir in ForceDirection::ALL {
        if keys.any_just_pressed(dir.keys()) {
            session.start_force(dir);
        }
    }
    // Releasing some other key leaves the force alone; a held arrow button may own it.
    let Some(current) = session.ball().and_then(|b| b.requested) else { return; };
    if !keys.any_just_released(current.keys()) {
        return;
    }
    // Fall back to any direction still held, otherwise stop.
    match ForceDirection::ALL.into_iter().find(|d| keys.any_pressed(d.keys())) {
        Some(dir) => session.start_force(dir),
        None => session.stop_force(),
    }
}

/// Combined scale factor for one frame of pinch + wheel input, if any.
pub fn frame_scale_factor(pinch: Option<(f32, f32)>, wheel_lines: f32) -> Option<f32> {
    let mut factor = 1.0;
    if let Some((prev, cur)) = pinch {
        if prev > f32::EPSILON {
            factor *= cur / prev;
        }
    }
    if wheel_lines != 0.0 {
        factor *= (1.0 + WHEEL_STEP * wheel_lines).max(0.1);
    }
    ((factor - 1.0).abs() > 1e-4).then_some(factor)
}

fn rescale_input(
    touches: Res<Touches>,
    mut wheel: EventReader<MouseWheel>,
    mut requests: EventWriter<LaneRequest>,
) {
    let active: Vec<_> = touches.iter().take(3).collect();
    let pinch = if active.len() == 2 {
        let prev = active[0].previous_position().distance(active[1].previous_position());
        let cur = active[0].position().distance(active[1].position());
        Some((prev, cur))
    } else {
        None
    };
    let lines: f32 = wheel
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / 40.0,
        })
        .sum();
    if let Some(factor) = frame_scale_factor(pinch, lines) {
        requests.send(LaneRequest::Rescale(factor));
    }
}
