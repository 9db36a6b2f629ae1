//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - No global state; the session owns the clock and the registry
//! - No rendering, input or platform dependencies

pub mod agent;
pub mod clock;
pub mod collision;
pub mod error;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;

pub use agent::{AgentState, Direction, PursuitAgent, Trackable, parse_path};
pub use clock::{CountdownClock, format_clock};
pub use collision::{Collider, CollisionRegistry};
pub use error::RuleError;
pub use player::Player;
pub use rect::Rect;
pub use state::{
    Bonus, EventCounters, GameEvent, GamePhase, GameSession, LossReason, MazeLayout, Progress,
    ProgressFlag,
};
pub use tick::{TickInput, tick};
