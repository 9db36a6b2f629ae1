//! Maze Escape - rules core for a timed maze-escape game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision, clock, pursuit agent, game state)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `highscores`: Persisted leaderboard

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Seconds on the clock at the start of a run (5 minutes)
    pub const START_SECONDS: f32 = 300.0;
    /// Gradual time drains at most this many seconds per second of play
    pub const GRADUAL_RATE: f32 = 25.0;

    /// Grid tile width in pixels
    pub const TILE: f32 = 32.0;

    /// Score awarded per whole second left on the clock
    pub const SCORE_PER_SECOND: i32 = 1000;
    /// The one legal non-zero bonus value
    pub const BONUS_AMOUNT: i32 = 201_823;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_SIZE: f32 = 16.0;
    pub const INVISIBILITY_SECONDS: f32 = 10.0;

    /// Pursuit agent defaults
    pub const AGENT_SPEED: f32 = 100.0;
    pub const AGENT_SIZE: f32 = 32.0;
    /// Side length of the square capture reach, centered on the agent
    pub const REACH_SIZE: f32 = 48.0;
}
