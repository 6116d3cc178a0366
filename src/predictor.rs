//! External difficulty predictor contract
//!
//! The predictor maps a `GameStats` feature vector to a (possibly fractional,
//! possibly out-of-range) difficulty. Every failure is recoverable: the
//! controller falls back to the score rule.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::difficulty::{GameStats, score_based_difficulty};

/// Predictor failures. None of these ever reach the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictorError {
    #[error("predictor unavailable: {0}")]
    Unavailable(String),
    #[error("predictor reported failure")]
    Rejected,
    #[error("malformed predictor payload: {0}")]
    Malformed(String),
}

/// Request body, captured at call time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "edad_jugador")]
    pub player_age: u32,
    #[serde(rename = "tiempo_cruce")]
    pub target_crossing_time_sec: f32,
    #[serde(rename = "velocidad_vehiculos")]
    pub vehicle_speed_kmh: f32,
    #[serde(rename = "num_carriles")]
    pub lane_count: u32,
    #[serde(rename = "num_intentos")]
    pub attempt_count: u32,
}

impl From<&GameStats> for PredictionRequest {
    fn from(stats: &GameStats) -> Self {
        Self {
            player_age: stats.player_age,
            target_crossing_time_sec: stats.target_crossing_time_sec,
            vehicle_speed_kmh: stats.vehicle_speed_kmh,
            lane_count: stats.lane_count,
            attempt_count: stats.attempt_count,
        }
    }
}

/// Response body. Failure responses usually carry no `difficulty`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
}

impl PredictionResponse {
    /// Parse a raw payload
    pub fn from_json(payload: &str) -> Result<Self, PredictorError> {
        serde_json::from_str(payload).map_err(|e| PredictorError::Malformed(e.to_string()))
    }

    /// A successful prediction of `difficulty`
    pub fn predicted(difficulty: f64) -> Self {
        Self {
            success: true,
            difficulty: Some(difficulty),
        }
    }

    /// A non-success response
    pub fn rejected() -> Self {
        Self {
            success: false,
            difficulty: None,
        }
    }

    /// Collapse into the predicted value, treating non-success, a missing
    /// value and non-finite numbers as failures
    pub fn into_difficulty(self) -> Result<f64, PredictorError> {
        if !self.success {
            return Err(PredictorError::Rejected);
        }
        match self.difficulty {
            None => Err(PredictorError::Malformed("success without difficulty".into())),
            Some(d) if !d.is_finite() => Err(PredictorError::Malformed(format!(
                "difficulty {} is not finite",
                d
            ))),
            Some(d) => Ok(d),
        }
    }
}

/// Anything that can turn stats into a predicted difficulty
pub trait DifficultyPredictor {
    fn predict(&mut self, request: &PredictionRequest) -> Result<PredictionResponse, PredictorError>;
}

/// Shared predictor the host keeps a handle to
impl<P: DifficultyPredictor> DifficultyPredictor for std::rc::Rc<std::cell::RefCell<P>> {
    fn predict(&mut self, request: &PredictionRequest) -> Result<PredictionResponse, PredictorError> {
        self.borrow_mut().predict(request)
    }
}

/// Used when no predictor is wired up
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflinePredictor;

impl DifficultyPredictor for OfflinePredictor {
    fn predict(&mut self, _request: &PredictionRequest) -> Result<PredictionResponse, PredictorError> {
        Err(PredictorError::Unavailable("no predictor configured".into()))
    }
}

/// Replays canned results in order; unavailable once drained
#[derive(Debug, Clone, Default)]
pub struct ScriptedPredictor {
    results: VecDeque<Result<PredictionResponse, PredictorError>>,
    requests: Vec<PredictionRequest>,
}

impl ScriptedPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: Result<PredictionResponse, PredictorError>) -> &mut Self {
        self.results.push_back(result);
        self
    }

    pub fn push_difficulty(&mut self, difficulty: f64) -> &mut Self {
        self.push(Ok(PredictionResponse::predicted(difficulty)))
    }

    /// Requests seen so far
    pub fn requests(&self) -> &[PredictionRequest] {
        &self.requests
    }
}

impl DifficultyPredictor for ScriptedPredictor {
    fn predict(&mut self, request: &PredictionRequest) -> Result<PredictionResponse, PredictorError> {
        self.requests.push(*request);
        self.results
            .pop_front()
            .unwrap_or_else(|| Err(PredictorError::Unavailable("script exhausted".into())))
    }
}

/// Local stand-in for the remote model.
///
/// Maps the feature vector back onto the tier scale: faster traffic and more
/// lanes push the estimate up, repeated attempts pull it down.
#[derive(Debug, Clone, Copy, Default)]
pub struct RulePredictor;

impl DifficultyPredictor for RulePredictor {
    fn predict(&mut self, request: &PredictionRequest) -> Result<PredictionResponse, PredictorError> {
        // Invert the stats rule: speed = 25 + score/50
        let implied_score = ((request.vehicle_speed_kmh - 25.0).max(0.0) * 50.0) as u64;
        let base = score_based_difficulty(implied_score).get() as f64;
        let lanes = (request.lane_count as f64 - 2.0) * 0.25;
        let struggle = (request.attempt_count.saturating_sub(1) as f64 * 0.1).min(2.0);
        Ok(PredictionResponse::predicted(base + lanes - struggle))
    }
}
