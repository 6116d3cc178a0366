//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must be pure and deterministic:
//! - Virtual millisecond clock only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod controller;
pub mod crossing;
pub mod ledger;
pub mod light;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod traffic;

pub use collision::{CollisionCheck, Rect, check_collisions};
pub use crossing::{MoveVerdict, is_in_crosswalk};
pub use light::{LightPhase, TrafficLight};
pub use scheduler::{Deferred, Scheduler, Task};
pub use snapshot::Snapshot;
pub use state::{
    Crosswalk, GameEvent, GameSession, Heading, MoveDirection, Player, Vehicle, Viewport, Warning,
};
pub use tick::{Game, TickInput, tick};
pub use traffic::kmh_to_px_per_tick;
