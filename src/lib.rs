pub mod classic;
pub mod collision;
pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod logging;
pub mod phase;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
