//! Traffic light state machine
//!
//! red → green → yellow → red, forever. Each phase arms exactly one timer,
//! sized from the tier active when the phase begins. Pedestrians may cross on
//! red (vehicles hold).

use serde::{Deserialize, Serialize};

use super::scheduler::{Scheduler, Task};
use super::state::GameSession;
use crate::difficulty::DifficultySettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightPhase {
    #[default]
    Red,
    Green,
    Yellow,
}

impl LightPhase {
    pub fn next(self) -> Self {
        match self {
            LightPhase::Red => LightPhase::Green,
            LightPhase::Green => LightPhase::Yellow,
            LightPhase::Yellow => LightPhase::Red,
        }
    }

    pub fn duration_ms(self, settings: &DifficultySettings) -> u64 {
        match self {
            LightPhase::Red => settings.red_ms,
            LightPhase::Green => settings.green_ms,
            LightPhase::Yellow => settings.yellow_ms,
        }
    }
}

/// Light state as shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrafficLight {
    pub phase: LightPhase,
    /// Whole seconds of red, set on entering red
    pub countdown_secs: Option<u32>,
    pub phase_started_ms: u64,
    pub phase_duration_ms: u64,
}

impl TrafficLight {
    /// Enter `phase` at `now_ms`; returns how long it lasts
    pub fn enter(&mut self, phase: LightPhase, settings: &DifficultySettings, now_ms: u64) -> u64 {
        let duration = phase.duration_ms(settings);
        self.phase = phase;
        self.phase_started_ms = now_ms;
        self.phase_duration_ms = duration;
        self.countdown_secs = match phase {
            LightPhase::Red => Some((duration / 1000) as u32),
            _ => None,
        };
        duration
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        (self.phase_started_ms + self.phase_duration_ms).saturating_sub(now_ms)
    }

    pub fn is_red(&self) -> bool {
        self.phase == LightPhase::Red
    }
}

/// (Re)start the current phase with its full duration
pub fn start(session: &mut GameSession, scheduler: &mut Scheduler) {
    let phase = session.light.phase;
    let duration = session
        .light
        .enter(phase, session.difficulty.settings(), scheduler.now_ms());
    scheduler.arm_once(Task::Light, duration);
}

/// Timer expired: move to the next phase and arm its timer
pub fn on_timer(session: &mut GameSession, scheduler: &mut Scheduler) -> LightPhase {
    let next = session.light.phase.next();
    let duration = session
        .light
        .enter(next, session.difficulty.settings(), scheduler.now_ms());
    scheduler.arm_once(Task::Light, duration);
    next
}

/// Stop scheduling; the phase itself is kept
pub fn suspend(scheduler: &mut Scheduler) {
    scheduler.disarm(Task::Light);
}
