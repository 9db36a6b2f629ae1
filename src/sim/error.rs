//! Rule violations surfaced by the simulation
//!
//! None of these are runtime conditions a player can trigger. They mark
//! programmer errors at the boundary where raw values enter the sim.

use thiserror::Error;

use super::state::GamePhase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("game phase {0} is outside the legal range [0, 4]")]
    PhaseOutOfRange(i32),
    #[error("illegal phase transition {from:?} -> {to:?}")]
    IllegalTransition { from: GamePhase, to: GamePhase },
    #[error("bonus must be 0 or {expected} (got {got})")]
    InvalidBonus { got: i32, expected: i32 },
    #[error("unknown path step {step:?} at index {index}")]
    InvalidPathStep { step: char, index: usize },
}
