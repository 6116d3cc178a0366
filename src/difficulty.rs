//! Difficulty tiers and score-driven rules
//!
//! Ten static tiers fix lane count, vehicle speed, spawn cadence and light
//! timings. `GameStats` is the feature vector shared with the predictor.

use serde::{Deserialize, Serialize};

/// A difficulty tier in `1..=10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Tier(u8);

impl Tier {
    pub const MIN: Tier = Tier(1);
    pub const MAX: Tier = Tier(10);

    /// Clamp any integer into the tier range
    pub fn clamped(value: i64) -> Self {
        Tier(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Move one tier toward `target` (no-op when equal)
    pub fn step_toward(self, target: Tier) -> Tier {
        match self.0.cmp(&target.0) {
            std::cmp::Ordering::Less => Tier(self.0 + 1),
            std::cmp::Ordering::Greater => Tier(self.0 - 1),
            std::cmp::Ordering::Equal => self,
        }
    }

    /// Static settings for this tier
    pub fn settings(self) -> &'static DifficultySettings {
        &TIERS[(self.0 - 1) as usize]
    }
}

impl Default for Tier {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<i64> for Tier {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&value) {
            Ok(Tier(value as u8))
        } else {
            Err(format!("tier {} outside {}..={}", value, Self::MIN, Self::MAX))
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.0
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-tier tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultySettings {
    pub lane_count: u32,
    pub vehicle_speed_kmh: f32,
    pub spawn_interval_ms: u64,
    pub red_ms: u64,
    pub green_ms: u64,
    pub yellow_ms: u64,
    /// Not read by the rules; kept as a tunable
    pub traffic_density: f32,
}

impl DifficultySettings {
    /// Full red→green→yellow cycle length
    pub fn cycle_ms(&self) -> u64 {
        self.red_ms + self.green_ms + self.yellow_ms
    }
}

const fn tier(
    lane_count: u32,
    vehicle_speed_kmh: f32,
    spawn_interval_ms: u64,
    red_ms: u64,
    green_ms: u64,
    yellow_ms: u64,
    traffic_density: f32,
) -> DifficultySettings {
    DifficultySettings {
        lane_count,
        vehicle_speed_kmh,
        spawn_interval_ms,
        red_ms,
        green_ms,
        yellow_ms,
        traffic_density,
    }
}

/// Tier table, index 0 is tier 1
pub const TIERS: [DifficultySettings; 10] = [
    tier(2, 20.0, 2000, 6000, 4000, 2000, 0.3),
    tier(2, 50.0, 1900, 5000, 4000, 2000, 0.4),
    tier(4, 80.0, 1800, 4000, 3500, 1500, 0.5),
    tier(4, 120.0, 1700, 3000, 3000, 1500, 0.6),
    tier(4, 140.0, 1600, 3000, 2500, 1500, 0.7),
    tier(6, 160.0, 1500, 2000, 2000, 1000, 0.8),
    tier(6, 180.0, 1400, 1000, 1000, 2000, 0.85),
    tier(6, 200.0, 1300, 1000, 1000, 1000, 0.9),
    tier(6, 200.0, 1200, 1000, 1000, 1000, 0.95),
    tier(6, 200.0, 1000, 1000, 1000, 1000, 1.0),
];

/// Rule-based tier: one tier per 100 points
pub fn score_based_difficulty(score: u64) -> Tier {
    Tier::clamped((score / 100) as i64 + 1)
}

/// Feature vector exchanged with the predictor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub player_age: u32,
    pub target_crossing_time_sec: f32,
    pub vehicle_speed_kmh: f32,
    pub lane_count: u32,
    pub attempt_count: u32,
}

impl Default for GameStats {
    fn default() -> Self {
        Self {
            player_age: 3,
            target_crossing_time_sec: 6.0,
            vehicle_speed_kmh: 25.0,
            lane_count: 2,
            attempt_count: 1,
        }
    }
}

impl GameStats {
    /// Recompute the score-derived fields, keeping age and attempts
    pub fn recomputed(&self, score: u64) -> Self {
        let score = score as f32;
        Self {
            vehicle_speed_kmh: (25.0 + score / 50.0).min(80.0),
            lane_count: (2 + 2 * (score / 300.0).floor() as u32).min(6),
            target_crossing_time_sec: (6.0 + score / 200.0).max(6.0),
            ..*self
        }
    }
}
