use roll_a_ball::prelude::*;
use bevy::prelude::*;

// Helper to build a minimal app (no assets/scene) for deterministic fixed tick tests.
fn build_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(CoreSimPlugin); // provides tick_state system in FixedUpdate
    app
}

#[test]
fn ticks_advance() {
    let mut app = build_app();
    // Directly run FixedUpdate schedule 5 times (bypasses time driver).
    for _ in 0..5 { app.world_mut().run_schedule(FixedUpdate); }
    let sim = app.world().get_resource::<SimState>().unwrap();
    assert_eq!(sim.tick, 5, "expected tick to be 5 after 5 fixed steps");
    assert!((sim.elapsed_seconds - (5.0 / 60.0)).abs() < 1e-6);
}

#[test]
fn default_game_config() {
    let app = build_app();
    let cfg = app.world().get_resource::<GameConfig>().unwrap();
    assert!((cfg.fall_threshold - 0.9).abs() < 1e-6);
    assert!(cfg.impulse_strength > 0.0);
}

#[test]
fn pre_inserted_config_is_respected() {
    let mut app = App::new();
    app.insert_resource(GameConfig { impulse_strength: 0.2, fall_threshold: 0.8 })
        .add_plugins(MinimalPlugins)
        .add_plugins(CoreSimPlugin);
    let cfg = app.world().resource::<GameConfig>();
    assert_eq!(cfg.impulse_strength, 0.2);
    assert_eq!(cfg.fall_threshold, 0.8);
}
