// HUD text (pins / timer) and the win dialog shown on game over.
use bevy::prelude::*;

use crate::plugins::core_sim::SimState;
use crate::plugins::game_state::{game_phase, request_reset, GamePhase, Scoreboard};
use crate::plugins::lane::{LaneRequest, LaneSession};

#[derive(Component)]
pub struct Hud;

#[derive(Component)]
struct WinDialog;
#[derive(Component)]
struct PlayAgainButton;
#[derive(Component)]
struct DismissButton;

/// Set once the player dismisses the dialog for the current round.
#[derive(Resource, Default)]
struct DialogDismissed(bool);

pub struct HudPlugin;
impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogDismissed>()
            .add_systems(Startup, spawn_hud)
            .add_systems(Update, (update_hud, show_win_dialog, win_dialog_buttons).chain());
    }
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle { font_size: 22.0, color: Color::WHITE, ..default() },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(8.0),
            ..default()
        }),
        Hud,
    ));
}

pub fn hud_line(phase: GamePhase, score: &Scoreboard, total_pins: usize, now_tick: u64) -> String {
    match phase {
        GamePhase::Idle => String::new(),
        GamePhase::Loading => "Loading lane...".to_string(),
        GamePhase::Playing | GamePhase::RoundOver => format!(
            "Pins: {}/{}  Time: {:.1}s",
            score.pins_felled,
            total_pins,
            score.elapsed_seconds(now_tick)
        ),
    }
}

fn update_hud(
    sim: Res<SimState>,
    session: Res<LaneSession>,
    score: Res<Scoreboard>,
    mut q_text: Query<&mut Text, With<Hud>>,
) {
    let Ok(mut text) = q_text.get_single_mut() else { return; };
    let total = session.lane().map(|l| l.pins.len()).unwrap_or(0);
    let line = hud_line(game_phase(&session, &score), &score, total, sim.tick);
    if text.sections[0].value != line {
        text.sections[0].value = line;
    }
}

fn show_win_dialog(
    mut commands: Commands,
    sim: Res<SimState>,
    score: Res<Scoreboard>,
    dismissed: Res<DialogDismissed>,
    q_dialog: Query<Entity, With<WinDialog>>,
) {
    if !score.game_over || dismissed.0 || !q_dialog.is_empty() {
        return;
    }
    let elapsed = score.elapsed_seconds(sim.tick);
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(12.0),
                    ..default()
                },
                background_color: BackgroundColor(Color::srgba(0.02, 0.02, 0.05, 0.6)),
                ..default()
            },
            WinDialog,
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "You Win!",
                TextStyle { font_size: 48.0, color: Color::srgb(0.95, 0.95, 1.0), ..default() },
            ));
            parent.spawn(TextBundle::from_section(
                format!("Time: {elapsed:.2}s"),
                TextStyle { font_size: 26.0, color: Color::srgb(0.85, 0.85, 0.90), ..default() },
            ));
            dialog_button(parent, "Play Again", Color::srgb(0.15, 0.55, 0.25), PlayAgainButton);
            dialog_button(parent, "Ok", Color::srgb(0.25, 0.25, 0.30), DismissButton);
        });
}

fn dialog_button<T: Component>(parent: &mut ChildBuilder, label: &str, base_color: Color, marker: T) {
    parent
        .spawn((
            ButtonBundle {
                style: Style {
                    width: Val::Px(200.0),
                    height: Val::Px(46.0),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    ..default()
                },
                background_color: BackgroundColor(base_color),
                ..default()
            },
            marker,
        ))
        .with_children(|b| {
            b.spawn(TextBundle::from_section(
                label,
                TextStyle { font_size: 26.0, color: Color::srgb(0.95, 0.95, 1.0), ..default() },
            ));
        });
}

fn win_dialog_buttons(
    mut commands: Commands,
    mut score: ResMut<Scoreboard>,
    mut dismissed: ResMut<DialogDismissed>,
    mut requests: EventWriter<LaneRequest>,
    q_buttons: Query<(&Interaction, Option<&PlayAgainButton>, Option<&DismissButton>), (Changed<Interaction>, With<Button>)>,
    q_dialog: Query<Entity, With<WinDialog>>,
) {
    // A new round (reset from anywhere) re-arms the dialog.
    if !score.game_over {
        dismissed.0 = false;
        for e in &q_dialog {
            commands.entity(e).despawn_recursive();
        }
        return;
    }
    for (interaction, play_again, dismiss) in &q_buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        if play_again.is_some() {
            request_reset(&mut score, &mut requests);
        } else if dismiss.is_some() {
            dismissed.0 = true;
        } else {
            continue;
        }
        for e in &q_dialog {
            commands.entity(e).despawn_recursive();
        }
    }
}
