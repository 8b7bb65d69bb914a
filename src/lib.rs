//! Library entry for integration tests & external tooling.
//! Exposes plugin modules and a prelude for common types.

pub mod plugins {
    pub mod core_sim;
    pub mod force;
    pub mod ball;
    pub mod pins;
    pub mod round;
    pub mod lane;
    pub mod game_state;
    pub mod hud;
    pub mod controls;
    pub mod main_menu;
    pub mod scene;
}
pub mod prelude;
