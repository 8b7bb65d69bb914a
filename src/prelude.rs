//! Convenience re-exports for frequently used types & plugins.
pub use crate::plugins::core_sim::{CoreSimPlugin, GameConfig, SimSet, SimState, TICK_HZ};
pub use crate::plugins::force::ForceDirection;
pub use crate::plugins::ball::{Ball, BallController, BallPlugin};
pub use crate::plugins::pins::{Pin, PinTracker};
pub use crate::plugins::round::{GameOver, PinFell, RoundPlugin, RoundState};
pub use crate::plugins::lane::{
    Lane, LaneAnchor, LaneConfig, LaneDef, LaneLoadError, LanePhase, LanePlugin, LaneRequest, LaneRoot,
    LaneSession,
};
pub use crate::plugins::game_state::{GamePhase, GameStatePlugin, Scoreboard};
pub use crate::plugins::hud::{Hud, HudPlugin};
pub use crate::plugins::controls::ControlsPlugin;
pub use crate::plugins::main_menu::MainMenuPlugin;
pub use crate::plugins::scene::ScenePlugin;
