//! Pursuit agent: a patrolling entity that catches visible targets in reach
//!
//! The agent walks an authored path one tile at a time. Each path step moves
//! it exactly one `TILE` in a direction; `move_num` indexes the current step
//! and `next_tile_distance` is what is left of it. When the path runs out the
//! agent enters `Restarting` and picks the path up from the start on the next
//! update.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::CollisionRegistry;
use super::error::RuleError;
use super::rect::Rect;
use crate::consts::{AGENT_SIZE, TILE};

/// Grid direction of a single path step or movement request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    U,
    D,
    L,
    R,
}

impl Direction {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'U' => Some(Direction::U),
            'D' => Some(Direction::D),
            'L' => Some(Direction::L),
            'R' => Some(Direction::R),
            _ => None,
        }
    }

    /// Unit vector, +y is up
    pub fn delta(&self) -> Vec2 {
        match self {
            Direction::U => Vec2::Y,
            Direction::D => Vec2::NEG_Y,
            Direction::L => Vec2::NEG_X,
            Direction::R => Vec2::X,
        }
    }
}

/// Parse an authored path such as `"RRRDDLLLUU"`. Whitespace is ignored.
pub fn parse_path(s: &str) -> Result<Vec<Direction>, RuleError> {
    s.chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(index, step)| {
            Direction::from_char(step).ok_or(RuleError::InvalidPathStep { step, index })
        })
        .collect()
}

/// Anything the agent can try to catch
pub trait Trackable {
    fn hitbox(&self) -> &Rect;

    /// Seconds of invisibility remaining
    fn invisibility_left(&self) -> f32;

    fn is_visible(&self) -> bool {
        self.invisibility_left() <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    /// Walking the authored path
    Patrolling,
    /// Path exhausted, restarts on the next update
    Restarting,
    /// No path to follow
    Idle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PursuitAgent {
    hitbox: Rect,
    /// Capture area, kept centered on the hitbox
    reach_rectangle: Rect,
    speed: f32,
    path: Vec<Direction>,
    /// Index of the current path step
    move_num: usize,
    /// Distance left before the next grid node
    next_tile_distance: f32,
    state: AgentState,
}

impl PursuitAgent {
    /// Agent with its hitbox's bottom-left corner at `start`
    pub fn new(start: Vec2, path: Vec<Direction>, speed: f32, reach_size: f32) -> Self {
        let hitbox = Rect::new(start.x, start.y, AGENT_SIZE, AGENT_SIZE);
        let state = if path.is_empty() {
            AgentState::Idle
        } else {
            AgentState::Patrolling
        };
        Self {
            hitbox,
            reach_rectangle: Rect::centered(hitbox.center(), reach_size),
            speed,
            path,
            move_num: 0,
            next_tile_distance: TILE,
            state,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.hitbox.position()
    }

    pub fn hitbox(&self) -> &Rect {
        &self.hitbox
    }

    /// Live capture area. Owned by the agent; read-only for callers.
    pub fn reach_rectangle(&self) -> &Rect {
        &self.reach_rectangle
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn move_num(&self) -> usize {
        self.move_num
    }

    pub fn next_tile_distance(&self) -> f32 {
        self.next_tile_distance
    }

    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Back to the first step with a full tile ahead
    pub fn restart_path(&mut self) {
        self.move_num = 0;
        self.next_tile_distance = TILE;
        self.state = if self.path.is_empty() {
            AgentState::Idle
        } else {
            AgentState::Patrolling
        };
    }

    /// Teleport to `start` and restart the path (level transitions, new runs)
    pub fn reset_to(&mut self, start: Vec2) {
        self.hitbox.x = start.x;
        self.hitbox.y = start.y;
        self.restart_path();
        self.sync_reach();
    }

    /// True iff `target` is visible and its hitbox overlaps the reach
    pub fn can_reach<T: Trackable + ?Sized>(&self, target: &T) -> bool {
        target.is_visible() && self.reach_rectangle.overlaps(target.hitbox())
    }

    /// Advance one frame along the path, then check for a capture.
    ///
    /// Returns true if `target` is within reach after moving.
    pub fn update<T: Trackable + ?Sized>(
        &mut self,
        dt: f32,
        registry: &CollisionRegistry,
        target: &T,
    ) -> bool {
        if self.state == AgentState::Restarting {
            self.restart_path();
        }
        if self.state == AgentState::Patrolling {
            self.advance(self.speed * dt, registry);
        }
        self.sync_reach();
        self.can_reach(target)
    }

    /// Spend up to `budget` distance walking the path. Stops early if the
    /// next slice of movement is blocked or the path runs out.
    fn advance(&mut self, budget: f32, registry: &CollisionRegistry) {
        let mut budget = budget;
        while budget > 0.0 {
            let Some(dir) = self.path.get(self.move_num).copied() else {
                self.state = AgentState::Restarting;
                return;
            };

            let step = budget.min(self.next_tile_distance);
            let delta = dir.delta() * step;
            if !registry.safe_to_move(delta.x, delta.y, &self.hitbox) {
                log::debug!("Agent blocked at step {} ({:?})", self.move_num, dir);
                return;
            }
            self.hitbox.x += delta.x;
            self.hitbox.y += delta.y;
            self.next_tile_distance -= step;
            budget -= step;

            if self.next_tile_distance <= 0.0 {
                self.move_num += 1;
                self.next_tile_distance = TILE;
                if self.move_num >= self.path.len() {
                    self.state = AgentState::Restarting;
                    return;
                }
            }
        }
    }

    fn sync_reach(&mut self) {
        self.reach_rectangle.set_center(self.hitbox.center());
    }
}
