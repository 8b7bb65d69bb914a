use std::path::PathBuf;

use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use clap::Parser;

use roll_a_ball::prelude::*;

/// Push a ball into a rack of pins.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Lane definition file (RON).
    #[arg(long)]
    lane: Option<PathBuf>,
    /// Impulse applied to the ball per tick while a direction is held.
    #[arg(long)]
    impulse: Option<f32>,
    /// Cosine tolerance before a pin counts as fallen.
    #[arg(long)]
    threshold: Option<f32>,
    /// Load the lane immediately instead of showing the menu.
    #[arg(long)]
    skip_menu: bool,
    /// Draw Rapier collider outlines.
    #[arg(long)]
    debug_physics: bool,
    /// Log frame-time diagnostics.
    #[arg(long)]
    diagnostics: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut game = GameConfig::default();
    if let Some(v) = cli.impulse { game.impulse_strength = v; }
    if let Some(v) = cli.threshold { game.fall_threshold = v; }
    let mut lane = LaneConfig { autoload: cli.skip_menu, ..default() };
    if let Some(path) = cli.lane { lane.path = path; }

    let mut app = App::new();
    app.insert_resource(ClearColor(Color::srgb(0.52, 0.80, 0.92)))
        .insert_resource(Msaa::Sample4)
        .insert_resource(game)
        .insert_resource(lane)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window { title: "Roll A Ball".into(), ..default() }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .add_plugins(CoreSimPlugin)   // fixed tick + gameplay config
        .add_plugins(LanePlugin)      // anchor, load / reset / rescale
        .add_plugins(BallPlugin)      // held-direction impulses
        .add_plugins(RoundPlugin)     // pin fall + game over events
        .add_plugins(GameStatePlugin) // scoreboard & timer
        .add_plugins(ScenePlugin)     // camera, light, floor
        .add_plugins(HudPlugin)
        .add_plugins(ControlsPlugin);
    if !cli.skip_menu {
        app.add_plugins(MainMenuPlugin);
    }
    if cli.debug_physics {
        app.add_plugins(RapierDebugRenderPlugin::default());
    }
    if cli.diagnostics {
        app.add_plugins((FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin::default()));
    }
    app.run();
}
