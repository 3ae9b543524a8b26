pub mod engine;
pub mod game_flow;
