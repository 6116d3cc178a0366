//! Lives, score and attempts bookkeeping

use super::state::GameSession;
use crate::consts::START_HALF_LIVES;
use crate::difficulty::{GameStats, Tier};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifeLoss {
    pub lives_left: f32,
    /// This loss ended the game
    pub game_over: bool,
}

/// Take half a life (floored at zero) and count the attempt
pub fn lose_life(session: &mut GameSession) -> LifeLoss {
    let was_over = session.game_over;
    session.half_lives = session.half_lives.saturating_sub(1);
    if session.half_lives == 0 {
        session.game_over = true;
    }
    session.stats.attempt_count += 1;
    LifeLoss {
        lives_left: session.lives(),
        game_over: session.game_over && !was_over,
    }
}

/// Add `points`, returning the new total
pub fn add_score(session: &mut GameSession, points: u64) -> u64 {
    session.score = session.score.saturating_add(points);
    session.score
}

/// Back to a fresh session; bumps the epoch
pub fn reset(session: &mut GameSession) {
    session.epoch += 1;
    session.half_lives = START_HALF_LIVES;
    session.score = 0;
    session.game_over = false;
    session.difficulty = Tier::MIN;
    session.stats = GameStats {
        player_age: session.stats.player_age,
        ..GameStats::default()
    };
    session.ai_mode = false;
}
