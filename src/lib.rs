pub mod config;
pub mod driver;
pub mod error;
pub mod food;
pub mod game;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod score;
pub mod simulation;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
pub mod wallet;
