//! Collision detection between the player and vehicles
//!
//! Plain axis-aligned box overlap on inset hit-boxes. Touching edges count as
//! a hit. Processed hits are spaced by a cooldown.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameSession;
use crate::consts::COLLISION_COOLDOWN_MS;

/// Axis-aligned box in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Rect {
    /// Box of `width`×`height` starting `inset` px inside the corner at `origin`
    pub fn inset(origin: Vec2, inset: f32, width: f32, height: f32) -> Self {
        let left = origin.x + inset;
        let top = origin.y + inset;
        Self {
            left,
            right: left + width,
            top,
            bottom: top + height,
        }
    }

    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionCheck {
    /// Paused, over, or the player is returning
    Skipped,
    /// Within the cooldown of the previous hit
    CoolingDown,
    Clear,
    Hit { vehicle_id: u32 },
}

/// Test the player against every vehicle at `now_ms`.
///
/// Only reports; the caller applies the consequences.
pub fn check_collisions(session: &GameSession, now_ms: u64) -> CollisionCheck {
    if !session.is_active() || session.player.returning {
        return CollisionCheck::Skipped;
    }
    if let Some(last) = session.last_collision_ms {
        if now_ms.saturating_sub(last) < COLLISION_COOLDOWN_MS {
            return CollisionCheck::CoolingDown;
        }
    }

    let player = session.player.hitbox();
    session
        .vehicles
        .iter()
        .find(|v| player.overlaps(&v.hitbox()))
        .map_or(CollisionCheck::Clear, |v| CollisionCheck::Hit { vehicle_id: v.id })
}
