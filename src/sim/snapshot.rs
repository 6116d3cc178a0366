//! Read-only view handed to the presentation layer each frame

use serde::Serialize;

use super::light::LightPhase;
use super::state::{GameSession, Player, Vehicle};
use crate::difficulty::{GameStats, Tier};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub time_ms: u64,
    pub player: Player,
    pub vehicles: Vec<Vehicle>,
    pub light_phase: LightPhase,
    pub countdown_secs: Option<u32>,
    pub light_remaining_ms: u64,
    pub lane_count: u32,
    pub crosswalk_center_x: f32,
    pub crosswalk_width: f32,
    pub score: u64,
    pub lives: f32,
    pub difficulty: Tier,
    pub stats: GameStats,
    pub warning: Option<&'static str>,
    pub paused: bool,
    pub game_over: bool,
    pub ai_mode: bool,
}

impl Snapshot {
    pub fn capture(session: &GameSession, now_ms: u64) -> Self {
        Self {
            time_ms: now_ms,
            player: session.player,
            vehicles: session.vehicles.clone(),
            light_phase: session.light.phase,
            countdown_secs: session.light.countdown_secs,
            light_remaining_ms: session.light.remaining_ms(now_ms),
            lane_count: session.lane_count(),
            crosswalk_center_x: session.crosswalk.center_x,
            crosswalk_width: session.crosswalk.width(),
            score: session.score,
            lives: session.lives(),
            difficulty: session.difficulty,
            stats: session.stats,
            warning: session.warning.map(|w| w.message()),
            paused: session.paused,
            game_over: session.game_over,
            ai_mode: session.ai_mode,
        }
    }
}
