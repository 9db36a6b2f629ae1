//! The player entity
//!
//! Movement is always gated by the collision registry; a blocked or frozen
//! move reports zero distance.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::agent::{Direction, Trackable};
use super::collision::CollisionRegistry;
use super::rect::Rect;
use crate::consts::{PLAYER_SIZE, PLAYER_SPEED};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    hitbox: Rect,
    speed: f32,
    invisibility_left: f32,
    frozen: bool,
}

impl Player {
    /// Player with its hitbox's bottom-left corner at `start`
    pub fn new(start: Vec2) -> Self {
        Self {
            hitbox: Rect::new(start.x, start.y, PLAYER_SIZE, PLAYER_SIZE),
            speed: PLAYER_SPEED,
            invisibility_left: 0.0,
            frozen: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.hitbox.position()
    }

    pub fn teleport(&mut self, pos: Vec2) {
        self.hitbox.x = pos.x;
        self.hitbox.y = pos.y;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Hide for at least `seconds`. Never shortens an active invisibility.
    pub fn make_invisible(&mut self, seconds: f32) {
        self.invisibility_left = self.invisibility_left.max(seconds);
    }

    /// Count down timed effects
    pub fn tick(&mut self, dt: f32) {
        if self.invisibility_left > 0.0 {
            self.invisibility_left = (self.invisibility_left - dt).max(0.0);
        }
    }

    /// Try to move one frame's worth in `dir`. Returns the distance moved.
    pub fn move_in(&mut self, dir: Direction, dt: f32, registry: &CollisionRegistry) -> f32 {
        if self.frozen {
            return 0.0;
        }
        let distance = self.speed * dt;
        let delta = dir.delta() * distance;
        if !registry.safe_to_move(delta.x, delta.y, &self.hitbox) {
            return 0.0;
        }
        self.hitbox.x += delta.x;
        self.hitbox.y += delta.y;
        distance
    }
}

impl Trackable for Player {
    fn hitbox(&self) -> &Rect {
        &self.hitbox
    }

    fn invisibility_left(&self) -> f32 {
        self.invisibility_left
    }
}
