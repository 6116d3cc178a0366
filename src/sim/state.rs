//! Game session and core simulation types
//!
//! One `GameSession` holds every piece of mutable state. Subsystems receive it
//! by reference; nothing else owns game data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::light::{LightPhase, TrafficLight};
use crate::consts::*;
use crate::difficulty::{DifficultySettings, GameStats, Tier};

/// Viewport dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Y of the start line
    pub fn start_y(&self) -> f32 {
        self.height - PLAYER_START_OFFSET
    }

    /// Centre line of the road
    pub fn road_center_y(&self) -> f32 {
        self.height / 2.0
    }

    /// Vertical centre of `lane` when the road has `lanes` lanes
    pub fn lane_y(&self, lane: u32, lanes: u32) -> f32 {
        self.road_center_y() + (lane as f32 - (lanes as f32 - 1.0) / 2.0) * LANE_SPACING
    }
}

/// Directional input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Vehicle heading. All traffic drives left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    #[default]
    Right,
}

/// Why the player was stopped or hurt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    NotOnCrosswalk,
    LightNotRed,
    VehicleHit,
}

impl Warning {
    pub fn message(&self) -> &'static str {
        match self {
            Warning::NotOnCrosswalk => "Use the crosswalk!",
            Warning::LightNotRed => "Wait for the red light!",
            Warning::VehicleHit => "Watch out for vehicles!",
        }
    }
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LightChanged(LightPhase),
    VehicleSpawned { id: u32, lane: u32 },
    Fault(Warning),
    LifeLost { lives: f32 },
    Crossed { points: u64, score: u64 },
    DifficultyChanged { from: Tier, to: Tier },
    GameOver { score: u64 },
    Paused(bool),
    AiModeChanged(bool),
    Reset,
}

/// The pedestrian
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the sprite
    pub pos: Vec2,
    pub moving_up: bool,
    /// Being sent back to the start line; input is ignored meanwhile
    pub returning: bool,
}

impl Player {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            moving_up: false,
            returning: false,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + PLAYER_SIZE / 2.0
    }

    pub fn hitbox(&self) -> Rect {
        Rect::inset(self.pos, PLAYER_HITBOX_INSET, PLAYER_HITBOX_SIZE, PLAYER_HITBOX_SIZE)
    }
}

/// A vehicle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u32,
    /// Top-left corner of the sprite
    pub pos: Vec2,
    pub lane: u32,
    /// Displacement per move tick
    pub speed: f32,
    pub heading: Heading,
}

impl Vehicle {
    pub fn hitbox(&self) -> Rect {
        Rect::inset(
            self.pos,
            VEHICLE_HITBOX_INSET,
            VEHICLE_HITBOX_WIDTH,
            VEHICLE_HITBOX_HEIGHT,
        )
    }
}

/// The band where crossing is legal on red
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crosswalk {
    pub center_x: f32,
}

impl Crosswalk {
    pub fn width(&self) -> f32 {
        CROSSWALK_WIDTH
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Bumped on every reset; stale async results compare against it
    pub epoch: u64,
    pub viewport: Viewport,
    pub score: u64,
    /// Lives counted in halves (8 = 4 lives)
    pub half_lives: u8,
    pub game_over: bool,
    pub paused: bool,
    pub difficulty: Tier,
    pub stats: GameStats,
    pub ai_mode: bool,
    pub player: Player,
    /// Active vehicles (sorted by id)
    pub vehicles: Vec<Vehicle>,
    pub light: TrafficLight,
    pub crosswalk: Crosswalk,
    pub warning: Option<Warning>,
    /// Last processed collision
    pub last_collision_ms: Option<u64>,
    /// Last collision or illegal crossing (crossing bonus is timed from here)
    pub last_fault_ms: u64,
    /// Last difficulty evaluation
    pub last_evaluation_ms: Option<u64>,
    next_id: u32,
}

impl GameSession {
    pub fn new(viewport: Viewport, player_age: u32) -> Self {
        Self {
            epoch: 0,
            viewport,
            score: 0,
            half_lives: START_HALF_LIVES,
            game_over: false,
            paused: false,
            difficulty: Tier::MIN,
            stats: GameStats {
                player_age,
                ..GameStats::default()
            },
            ai_mode: false,
            player: Player::at(Self::start_position(&viewport)),
            vehicles: Vec::new(),
            light: TrafficLight::default(),
            crosswalk: Crosswalk {
                center_x: viewport.width / 2.0,
            },
            warning: None,
            last_collision_ms: None,
            last_fault_ms: 0,
            last_evaluation_ms: None,
            next_id: 1,
        }
    }

    pub fn start_position(viewport: &Viewport) -> Vec2 {
        Vec2::new(PLAYER_START_X, viewport.start_y())
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Lives as displayed (half steps)
    pub fn lives(&self) -> f32 {
        self.half_lives as f32 / 2.0
    }

    /// Timers only run while this holds
    pub fn is_active(&self) -> bool {
        !self.paused && !self.game_over && self.half_lives > 0
    }

    /// Settings of the current tier
    pub fn settings(&self) -> &'static DifficultySettings {
        self.difficulty.settings()
    }

    /// Lanes on the road right now
    pub fn lane_count(&self) -> u32 {
        if self.ai_mode {
            self.stats.lane_count
        } else {
            self.settings().lane_count
        }
    }

    /// Speed given to newly spawned vehicles
    pub fn spawn_speed_kmh(&self) -> f32 {
        if self.ai_mode {
            self.stats.vehicle_speed_kmh
        } else {
            self.settings().vehicle_speed_kmh
        }
    }

    /// Spawn cadence for the current tier and mode
    pub fn spawn_interval_ms(&self) -> u64 {
        if self.ai_mode {
            AI_SPAWN_INTERVAL_MS
        } else {
            self.settings().spawn_interval_ms
        }
    }

    /// Put the player back on the start line, keeping `x`
    pub fn send_player_to_start(&mut self, x: f32) {
        self.player.pos = Vec2::new(x, self.viewport.start_y());
        self.player.moving_up = false;
    }
}
