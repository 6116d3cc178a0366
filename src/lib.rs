//! Safe Crossing - an arcade "cross the road safely" game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scheduler, traffic, rules, game state)
//! - `difficulty`: Data-driven tier table and score-based rules
//! - `predictor`: Contract for the external difficulty predictor
//! - `persistence`: Durable score mirror
//! - `highscores`: Score record sink / leaderboard
//! - `settings`: Session configuration

pub mod difficulty;
pub mod highscores;
pub mod persistence;
pub mod predictor;
pub mod settings;
pub mod sim;

pub use difficulty::{DifficultySettings, GameStats, Tier};
pub use highscores::{HighScores, ScoreRecord, ScoreSink};
pub use predictor::{DifficultyPredictor, PredictionRequest, PredictionResponse, PredictorError};
pub use settings::GameConfig;
pub use sim::{Game, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Vehicle movement cadence (~60 Hz)
    pub const MOVE_INTERVAL_MS: u64 = 16;
    /// Collision check cadence
    pub const COLLISION_INTERVAL_MS: u64 = 100;
    /// Minimum time between two processed collisions
    pub const COLLISION_COOLDOWN_MS: u64 = 1000;
    /// Fixed spawn interval while AI mode drives difficulty
    pub const AI_SPAWN_INTERVAL_MS: u64 = 2500;
    /// Debounce after a score change before difficulty is evaluated
    pub const DIFFICULTY_DEBOUNCE_MS: u64 = 1000;
    /// Floor between two difficulty evaluations
    pub const DIFFICULTY_FLOOR_MS: u64 = 5000;
    /// How long a warning stays visible
    pub const WARNING_DURATION_MS: u64 = 2000;

    /// Hard cap on live vehicles
    pub const MAX_VEHICLES: usize = 1000;
    /// Vehicles spawn this far left of the viewport
    pub const SPAWN_X: f32 = -100.0;
    /// Minimum same-lane gap at spawn time
    pub const SPAWN_CLEARANCE: f32 = 200.0;
    /// Vehicles are culled once this far outside the viewport
    pub const CULL_MARGIN: f32 = 200.0;
    /// Vehicles hold on red while further than this before the crosswalk centre
    pub const STOP_DISTANCE: f32 = 100.0;
    /// Vertical spacing between lane centres
    pub const LANE_SPACING: f32 = 20.0;

    /// Crosswalk width (constant across repositioning)
    pub const CROSSWALK_WIDTH: f32 = 200.0;
    /// Crosswalk centre is kept inside this fraction band of the viewport width
    pub const CROSSWALK_MIN_FRAC: f32 = 0.2;
    pub const CROSSWALK_MAX_FRAC: f32 = 0.8;

    /// Player sprite is a square of this size
    pub const PLAYER_SIZE: f32 = 60.0;
    /// Distance covered by one directional move
    pub const PLAYER_STEP: f32 = 20.0;
    /// Starting x coordinate
    pub const PLAYER_START_X: f32 = 550.0;
    /// Start line sits this far above the bottom edge
    pub const PLAYER_START_OFFSET: f32 = 150.0;
    /// A crossing completes once the player is above this y
    pub const CROSSING_TOP_Y: f32 = 100.0;

    /// Hit-box insets (player 40x40, vehicle 80x20)
    pub const PLAYER_HITBOX_INSET: f32 = 10.0;
    pub const PLAYER_HITBOX_SIZE: f32 = 40.0;
    pub const VEHICLE_HITBOX_INSET: f32 = 10.0;
    pub const VEHICLE_HITBOX_WIDTH: f32 = 80.0;
    pub const VEHICLE_HITBOX_HEIGHT: f32 = 20.0;

    /// Delay before the player is put back after an illegal move
    pub const FAULT_RETURN_DELAY_MS: u64 = 100;
    /// Delay before the player is put back after a collision
    pub const COLLISION_RETURN_DELAY_MS: u64 = 200;
    /// How long the returning state lasts once relocated after a collision
    pub const COLLISION_RETURN_HOLD_MS: u64 = 100;
    /// Delay before the player is put back after a successful crossing
    pub const CROSSING_RETURN_DELAY_MS: u64 = 200;
    /// How long the returning state lasts once relocated after a crossing
    pub const CROSSING_RETURN_HOLD_MS: u64 = 200;

    /// Base award for a completed crossing
    pub const CROSSING_POINTS: u64 = 100;

    /// Lives at session start (decremented in half steps)
    pub const START_HALF_LIVES: u8 = 8;
}
