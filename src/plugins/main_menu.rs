// Main menu plugin: the idle screen. Play requests a lane load, Quit exits.
// Hides itself once Play is pressed.

use bevy::prelude::*;
use crate::plugins::lane::{LanePhase, LaneRequest, LaneSession};

#[derive(Component)]
struct MenuRoot;
#[derive(Component)]
struct PlayButton;
#[derive(Component)]
struct QuitButton;

pub struct MainMenuPlugin;
impl Plugin for MainMenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_main_menu)
            .add_systems(Update, menu_button_system);
    }
}

fn spawn_main_menu(mut commands: Commands) {
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(14.0),
                    ..default()
                },
                background_color: BackgroundColor(Color::srgba(0.02, 0.02, 0.05, 0.75)),
                // Above the direction pad.
                z_index: ZIndex::Global(10),
                ..default()
            },
            MenuRoot,
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "Roll A Ball",
                TextStyle { font_size: 56.0, color: Color::srgb(0.95, 0.95, 1.0), ..default() },
            ));
            parent.spawn(
                TextBundle::from_section(
                    "Hold an arrow to push the ball. Knock down every pin.",
                    TextStyle { font_size: 22.0, color: Color::srgb(0.75, 0.75, 0.80), ..default() },
                )
                .with_style(Style { margin: UiRect::all(Val::Px(4.0)), ..default() }),
            );
            spawn_button(parent, "Play", Color::srgb(0.15, 0.55, 0.25), PlayButton);
            spawn_button(parent, "Quit", Color::srgb(0.55, 0.15, 0.15), QuitButton);
        });
}

fn spawn_button<T: Component>(parent: &mut ChildBuilder, label: &str, base_color: Color, marker: T) {
    parent
        .spawn((
            ButtonBundle {
                style: Style {
                    width: Val::Px(240.0),
                    height: Val::Px(52.0),
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
                TextStyle { font_size: 30.0, color: Color::srgb(0.95, 0.95, 1.0), ..default() },
            ));
        });
}

fn menu_button_system(
    mut commands: Commands,
    session: Res<LaneSession>,
    mut requests: EventWriter<LaneRequest>,
    mut exit: EventWriter<AppExit>,
    q_buttons: Query<(&Interaction, Option<&PlayButton>, Option<&QuitButton>), (Changed<Interaction>, With<Button>)>,
    q_root: Query<Entity, With<MenuRoot>>,
) {
    let Ok(root) = q_root.get_single() else { return; };
    // Lane started by other means (e.g. --skip-menu): menu is no longer needed.
    if session.phase() != LanePhase::Unloaded {
        commands.entity(root).despawn_recursive();
        return;
    }
    for (interaction, play, quit) in &q_buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        if play.is_some() {
            requests.send(LaneRequest::Load);
            commands.entity(root).despawn_recursive();
        } else if quit.is_some() {
            exit.send(AppExit::Success);
        }
    }
}
