//! Static collision geometry
//!
//! The registry is the only owner of impassable map rectangles. Map data is
//! trusted: colliders are stored verbatim, with no dedup or validation.

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// A piece of authored map geometry, optionally named so it can be removed
/// later (doors, exits, spikes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    #[serde(default)]
    pub name: Option<String>,
    pub rect: Rect,
}

impl Collider {
    pub fn new(rect: Rect) -> Self {
        Self { name: None, rect }
    }

    pub fn named(name: impl Into<String>, rect: Rect) -> Self {
        Self {
            name: Some(name.into()),
            rect,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollisionRegistry {
    colliders: Vec<Collider>,
}

impl CollisionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all geometry with the supplied map colliders
    pub fn init<I>(&mut self, map_colliders: I)
    where
        I: IntoIterator<Item = Collider>,
    {
        self.colliders.clear();
        self.colliders.extend(map_colliders);
        log::debug!("Collision registry loaded {} colliders", self.colliders.len());
    }

    /// True iff `hitbox` shifted by (dx, dy) overlaps no stored rectangle
    pub fn safe_to_move(&self, dx: f32, dy: f32, hitbox: &Rect) -> bool {
        let moved = hitbox.translated(dx, dy);
        !self.colliders.iter().any(|c| c.rect.overlaps(&moved))
    }

    /// Remove the first collider named exactly `name`. Missing names are ignored.
    pub fn remove_collision_by_name(&mut self, name: &str) -> Option<Collider> {
        let idx = self
            .colliders
            .iter()
            .position(|c| c.name.as_deref() == Some(name))?;
        log::info!("Removed collider '{}'", name);
        Some(self.colliders.remove(idx))
    }

    pub fn world_collision(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}
