//! Crossing rules
//!
//! Stepping up inside the road band is only legal from the crosswalk while the
//! light is red. Reaching the far side from the crosswalk scores a crossing.

use rand::Rng;

use super::state::{GameSession, Warning};
use crate::consts::*;

/// Is a player centred at `player_center_x` on the crosswalk
#[inline]
pub fn is_in_crosswalk(player_center_x: f32, crosswalk_center_x: f32) -> bool {
    (player_center_x - crosswalk_center_x).abs() < CROSSWALK_WIDTH / 2.0
}

/// Vertical range (top, bottom) where upward moves are policed, one step of
/// tolerance included
pub fn road_band(viewport_height: f32, lanes: u32) -> (f32, f32) {
    let center = viewport_height / 2.0;
    let top = center - lanes as f32;
    let bottom = center + lanes as f32 * 30.0;
    (top - PLAYER_STEP, bottom + PLAYER_STEP)
}

/// Result of checking an upward move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveVerdict {
    /// Outside the road band or returning: nothing to police
    Unchecked,
    Legal,
    Fault(Warning),
}

/// Judge an upward move from the player's current position
pub fn check_upward_move(session: &GameSession) -> MoveVerdict {
    let (top, bottom) = road_band(session.viewport.height, session.lane_count());
    let y = session.player.pos.y;
    if y < top || y > bottom || session.player.returning {
        return MoveVerdict::Unchecked;
    }

    if !is_in_crosswalk(session.player.center_x(), session.crosswalk.center_x) {
        MoveVerdict::Fault(Warning::NotOnCrosswalk)
    } else if !session.light.is_red() {
        MoveVerdict::Fault(Warning::LightNotRed)
    } else {
        MoveVerdict::Legal
    }
}

/// Has the player made it across
pub fn has_crossed(session: &GameSession) -> bool {
    session.player.pos.y < CROSSING_TOP_Y
        && is_in_crosswalk(session.player.center_x(), session.crosswalk.center_x)
        && !session.player.returning
}

/// Points for a crossing: base plus a bonus for beating the target time
pub fn crossing_award(target_crossing_time_sec: f32, elapsed_ms: u64) -> u64 {
    let target_ms = (target_crossing_time_sec * 1000.0) as i64;
    let bonus = ((target_ms - elapsed_ms as i64).max(0)) / 100;
    CROSSING_POINTS + bonus as u64
}

/// Move the crosswalk to a random spot in the middle of the viewport
pub fn reposition_crosswalk(session: &mut GameSession, rng: &mut impl Rng) {
    let min = session.viewport.width * CROSSWALK_MIN_FRAC;
    let max = session.viewport.width * CROSSWALK_MAX_FRAC;
    session.crosswalk.center_x = min + rng.random::<f32>() * (max - min);
}
