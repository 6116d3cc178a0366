//! Difficulty feedback loop
//!
//! Score changes are debounced (1s) and evaluations are spaced at least 5s
//! apart. Each evaluation refreshes `GameStats` from the score, then either asks
//! the predictor (AI mode) or applies the score rule directly. Predictor
//! answers arrive later as a deferred event and are dropped if the session was
//! reset in between.

use super::scheduler::{Deferred, Scheduler};
use super::state::GameSession;
use crate::consts::{DIFFICULTY_DEBOUNCE_MS, DIFFICULTY_FLOOR_MS};
use crate::difficulty::{Tier, score_based_difficulty};
use crate::predictor::{DifficultyPredictor, PredictionRequest, PredictorError};

/// What an evaluation did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// Too soon after the previous one; re-queued for when the floor expires
    Throttled { retry_at_ms: u64 },
    /// Predictor asked; answer pending
    Requested,
    /// Score rule applied
    Applied { from: Tier, to: Tier },
}

/// What a predictor answer did
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    /// Session was reset since the call
    Stale,
    Applied { from: Tier, to: Tier },
    /// Predictor failed; moved one step toward the score rule
    FellBack { from: Tier, to: Tier, error: PredictorError },
}

fn is_evaluation(event: &Deferred) -> bool {
    matches!(event, Deferred::EvaluateDifficulty)
}

/// Restart the debounce window (score changed)
pub fn debounce(scheduler: &mut Scheduler) {
    scheduler.cancel(is_evaluation);
    scheduler.defer(DIFFICULTY_DEBOUNCE_MS, Deferred::EvaluateDifficulty);
}

/// Run one evaluation at the scheduler's current time
pub fn evaluate(
    session: &mut GameSession,
    scheduler: &mut Scheduler,
    predictor: &mut dyn DifficultyPredictor,
    latency_ms: u64,
) -> Evaluation {
    let now = scheduler.now_ms();
    if let Some(last) = session.last_evaluation_ms {
        let elapsed = now.saturating_sub(last);
        if elapsed < DIFFICULTY_FLOOR_MS {
            let wait = DIFFICULTY_FLOOR_MS - elapsed;
            scheduler.cancel(is_evaluation);
            scheduler.defer(wait, Deferred::EvaluateDifficulty);
            return Evaluation::Throttled {
                retry_at_ms: now + wait,
            };
        }
    }
    session.last_evaluation_ms = Some(now);
    session.stats = session.stats.recomputed(session.score);

    if session.ai_mode {
        let request = PredictionRequest::from(&session.stats);
        let result = predictor
            .predict(&request)
            .and_then(|response| response.into_difficulty());
        log::debug!("Prediction requested for {:?}", request);
        scheduler.defer(
            latency_ms,
            Deferred::PredictionReady {
                epoch: session.epoch,
                score: session.score,
                request,
                result,
            },
        );
        return Evaluation::Requested;
    }

    let from = session.difficulty;
    let to = score_based_difficulty(session.score);
    session.difficulty = to;
    Evaluation::Applied { from, to }
}

/// Apply a predictor answer captured under `epoch` with `score`
pub fn apply_prediction(
    session: &mut GameSession,
    epoch: u64,
    score: u64,
    result: Result<f64, PredictorError>,
) -> PredictionOutcome {
    if epoch != session.epoch {
        log::debug!(
            "Dropping prediction from epoch {} (now {})",
            epoch,
            session.epoch
        );
        return PredictionOutcome::Stale;
    }

    let from = session.difficulty;
    match result {
        Ok(predicted) => {
            let to = Tier::clamped(predicted.round() as i64);
            if to != from {
                session.difficulty = to;
            }
            PredictionOutcome::Applied { from, to }
        }
        Err(error) => {
            log::warn!("Difficulty prediction failed: {}", error);
            let to = from.step_toward(score_based_difficulty(score));
            session.difficulty = to;
            PredictionOutcome::FellBack { from, to, error }
        }
    }
}
