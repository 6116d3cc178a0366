//! Session driver
//!
//! `Game` owns the session, the scheduler and the external collaborators, and
//! dispatches every due task in order. The host feeds input and elapsed time.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{CollisionCheck, check_collisions};
use super::controller::{self, Evaluation, PredictionOutcome};
use super::crossing::{self, MoveVerdict};
use super::ledger;
use super::light;
use super::scheduler::{Deferred, Fired, Scheduler, Task};
use super::snapshot::Snapshot;
use super::state::{GameEvent, GameSession, MoveDirection, Player, Viewport, Warning};
use super::traffic::{self, SpawnOutcome};
use crate::consts::*;
use crate::difficulty::Tier;
use crate::highscores::{NullSink, ScoreRecord, ScoreSink, now_timestamp};
use crate::persistence::{MemoryScoreStore, ScoreStore};
use crate::predictor::{DifficultyPredictor, OfflinePredictor};
use crate::settings::{ConfigError, GameConfig};

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional moves, applied in order
    pub moves: Vec<MoveDirection>,
    /// Pause toggle
    pub pause: bool,
    /// AI mode toggle
    pub toggle_ai: bool,
    /// Leave to the menu (resets the session)
    pub return_to_menu: bool,
}

/// Apply `input`, then advance the game by `dt_ms`
pub fn tick(game: &mut Game, input: &TickInput, dt_ms: u64) {
    if input.return_to_menu {
        game.return_to_menu();
    }
    if input.pause {
        game.toggle_pause();
    }
    if input.toggle_ai {
        game.toggle_ai_mode();
    }
    for &dir in &input.moves {
        game.move_player(dir);
    }
    game.advance(dt_ms);
}

/// A running game session with its collaborators
pub struct Game {
    session: GameSession,
    scheduler: Scheduler,
    rng: Pcg32,
    config: GameConfig,
    predictor: Box<dyn DifficultyPredictor>,
    store: Box<dyn ScoreStore>,
    sink: Box<dyn ScoreSink>,
    events: Vec<GameEvent>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("session", &self.session)
            .field("scheduler", &self.scheduler)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Session with no predictor, an in-memory score mirror and no record sink
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_parts(
            config,
            Box::new(OfflinePredictor),
            Box::new(MemoryScoreStore::new()),
            Box::new(NullSink),
        )
    }

    pub fn with_parts(
        config: GameConfig,
        predictor: Box<dyn DifficultyPredictor>,
        store: Box<dyn ScoreStore>,
        sink: Box<dyn ScoreSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let viewport = Viewport {
            width: config.viewport_width,
            height: config.viewport_height,
        };
        let mut session = GameSession::new(viewport, config.player_age);
        session.ai_mode = config.ai_mode;

        match store.load() {
            Ok(Some(score)) => {
                log::info!("Seeding score {} from store", score);
                session.score = score;
            }
            Ok(None) => {}
            Err(e) => log::warn!("Score store unreadable: {}", e),
        }

        let mut game = Self {
            session,
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            config,
            predictor,
            store,
            sink,
            events: Vec::new(),
        };
        log::info!("Session started (seed {})", seed);
        game.sync_tasks();
        controller::debounce(&mut game.scheduler);
        Ok(game)
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.session, self.scheduler.now_ms())
    }

    /// Events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run every task due within the next `dt_ms`
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.scheduler.now_ms() + dt_ms;
        while let Some(fired) = self.scheduler.pop_due(until) {
            match fired {
                Fired::Task(task) => self.run_task(task),
                Fired::Event(event) => self.run_deferred(event),
            }
        }
        self.scheduler.settle(until);
    }

    // --- Input surface ---

    pub fn move_player(&mut self, dir: MoveDirection) {
        if !self.session.is_active() || self.session.player.returning {
            return;
        }

        let viewport = self.session.viewport;
        match dir {
            MoveDirection::Up => {
                self.session.player.moving_up = true;
                if let MoveVerdict::Fault(warning) = crossing::check_upward_move(&self.session) {
                    self.fault(warning);
                    return;
                }
                let player = &mut self.session.player;
                player.pos.y = (player.pos.y - PLAYER_STEP).max(0.0);
            }
            MoveDirection::Down => {
                let player = &mut self.session.player;
                player.moving_up = false;
                player.pos.y = (player.pos.y + PLAYER_STEP).min(viewport.height - PLAYER_SIZE);
            }
            MoveDirection::Left => {
                let player = &mut self.session.player;
                player.pos.x = (player.pos.x - PLAYER_STEP).max(0.0);
            }
            MoveDirection::Right => {
                let player = &mut self.session.player;
                player.pos.x = (player.pos.x + PLAYER_STEP).min(viewport.width - PLAYER_SIZE);
            }
        }

        if crossing::has_crossed(&self.session) {
            self.complete_crossing();
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.session.game_over {
            return;
        }
        self.session.paused = !self.session.paused;
        log::info!(
            "{}",
            if self.session.paused { "Paused" } else { "Resumed" }
        );
        self.events.push(GameEvent::Paused(self.session.paused));
        self.sync_tasks();
        if !self.session.paused {
            controller::debounce(&mut self.scheduler);
        }
    }

    pub fn toggle_ai_mode(&mut self) {
        self.session.ai_mode = !self.session.ai_mode;
        log::info!("AI mode {}", if self.session.ai_mode { "on" } else { "off" });
        self.events.push(GameEvent::AiModeChanged(self.session.ai_mode));
        self.sync_tasks();
        controller::debounce(&mut self.scheduler);
    }

    /// Throw the session away and start over
    pub fn reset_game(&mut self) {
        ledger::reset(&mut self.session);
        let session = &mut self.session;
        session.paused = false;
        session.vehicles.clear();
        session.player = Player::at(GameSession::start_position(&session.viewport));
        session.light = light::TrafficLight::default();
        session.crosswalk.center_x = session.viewport.width / 2.0;
        session.warning = None;
        session.last_collision_ms = None;
        session.last_fault_ms = self.scheduler.now_ms();
        session.last_evaluation_ms = None;

        // In-flight predictions stay queued; the epoch check discards them
        self.scheduler
            .cancel(|e| !matches!(e, Deferred::PredictionReady { .. }));
        self.scheduler.disarm_all();

        if let Err(e) = self.store.clear() {
            log::warn!("Failed to clear stored score: {}", e);
        }

        log::info!("Game reset (epoch {})", self.session.epoch);
        self.events.push(GameEvent::Reset);
        self.sync_tasks();
        controller::debounce(&mut self.scheduler);
    }

    /// Menu navigation itself is the host's business
    pub fn return_to_menu(&mut self) {
        self.reset_game();
    }

    // --- Task dispatch ---

    fn run_task(&mut self, task: Task) {
        match task {
            Task::Light => {
                let phase = light::on_timer(&mut self.session, &mut self.scheduler);
                self.events.push(GameEvent::LightChanged(phase));
            }
            Task::Spawn => match traffic::spawn_vehicle(&mut self.session, &mut self.rng) {
                SpawnOutcome::Spawned { id, lane } => {
                    log::debug!("Spawned vehicle {} in lane {}", id, lane);
                    self.events.push(GameEvent::VehicleSpawned { id, lane });
                }
                SpawnOutcome::LaneBlocked { lane } => {
                    log::trace!("Spawn skipped, lane {} occupied", lane);
                }
                SpawnOutcome::AtCapacity => {
                    log::debug!("Spawn skipped, {} vehicles on the road", MAX_VEHICLES);
                }
            },
            Task::Move => {
                traffic::move_vehicles(&mut self.session);
            }
            Task::Collision => {
                let now = self.scheduler.now_ms();
                if let CollisionCheck::Hit { vehicle_id } = check_collisions(&self.session, now) {
                    log::debug!("Player hit by vehicle {}", vehicle_id);
                    self.session.last_collision_ms = Some(now);
                    self.session.last_fault_ms = now;
                    self.raise_warning(Warning::VehicleHit);
                    self.lose_life();
                    let x = self.session.player.pos.x;
                    self.scheduler.defer(
                        COLLISION_RETURN_DELAY_MS,
                        Deferred::Relocate {
                            x,
                            hold_ms: COLLISION_RETURN_HOLD_MS,
                        },
                    );
                }
            }
        }
    }

    fn run_deferred(&mut self, event: Deferred) {
        match event {
            Deferred::Relocate { x, hold_ms } => {
                self.session.send_player_to_start(x);
                if hold_ms == 0 {
                    self.session.player.returning = false;
                } else {
                    self.session.player.returning = true;
                    self.scheduler.defer(hold_ms, Deferred::EndReturn);
                }
            }
            Deferred::EndReturn => {
                self.session.player.returning = false;
            }
            Deferred::ClearWarning => {
                self.session.warning = None;
            }
            Deferred::EvaluateDifficulty => {
                if !self.session.is_active() {
                    log::debug!("Skipping difficulty evaluation while inactive");
                    return;
                }
                let eval = controller::evaluate(
                    &mut self.session,
                    &mut self.scheduler,
                    self.predictor.as_mut(),
                    self.config.predictor_latency_ms,
                );
                if let Evaluation::Applied { from, to } = eval {
                    self.on_difficulty(from, to);
                }
            }
            Deferred::PredictionReady {
                epoch,
                score,
                request: _,
                result,
            } => match controller::apply_prediction(&mut self.session, epoch, score, result) {
                PredictionOutcome::Stale => {}
                PredictionOutcome::Applied { from, to }
                | PredictionOutcome::FellBack { from, to, .. } => self.on_difficulty(from, to),
            },
        }
    }

    // --- Rules glue ---

    fn fault(&mut self, warning: Warning) {
        let now = self.scheduler.now_ms();
        log::debug!("Illegal crossing: {:?}", warning);
        self.session.last_fault_ms = now;
        self.raise_warning(warning);
        self.events.push(GameEvent::Fault(warning));
        self.lose_life();
        self.session.player.returning = true;
        let x = self.session.player.pos.x;
        self.scheduler
            .defer(FAULT_RETURN_DELAY_MS, Deferred::Relocate { x, hold_ms: 0 });
    }

    fn complete_crossing(&mut self) {
        let now = self.scheduler.now_ms();
        let elapsed = now.saturating_sub(self.session.last_fault_ms);
        let points = crossing::crossing_award(self.session.stats.target_crossing_time_sec, elapsed);
        let score = self.update_score(points);
        log::info!("Crossed for {} points (score {})", points, score);
        self.events.push(GameEvent::Crossed { points, score });

        crossing::reposition_crosswalk(&mut self.session, &mut self.rng);
        self.session.player.returning = true;
        self.scheduler.defer(
            CROSSING_RETURN_DELAY_MS,
            Deferred::Relocate {
                x: PLAYER_START_X,
                hold_ms: CROSSING_RETURN_HOLD_MS,
            },
        );
    }

    fn update_score(&mut self, points: u64) -> u64 {
        let score = ledger::add_score(&mut self.session, points);
        if let Err(e) = self.store.save(score) {
            log::warn!("Failed to mirror score: {}", e);
        }
        controller::debounce(&mut self.scheduler);
        score
    }

    fn lose_life(&mut self) {
        let loss = ledger::lose_life(&mut self.session);
        self.events.push(GameEvent::LifeLost {
            lives: loss.lives_left,
        });
        if loss.game_over {
            let score = self.session.score;
            log::info!("Game over with score {}", score);
            self.events.push(GameEvent::GameOver { score });
            if let Some(name) = &self.config.player_name {
                if score > 0 {
                    self.sink.submit(ScoreRecord {
                        player_name: name.clone(),
                        score,
                        timestamp: now_timestamp(),
                    });
                }
            }
            self.sync_tasks();
        }
    }

    fn raise_warning(&mut self, warning: Warning) {
        self.session.warning = Some(warning);
        self.scheduler
            .cancel(|e| matches!(e, Deferred::ClearWarning));
        self.scheduler
            .defer(WARNING_DURATION_MS, Deferred::ClearWarning);
    }

    fn on_difficulty(&mut self, from: Tier, to: Tier) {
        if from != to {
            log::info!("Difficulty {} -> {}", from, to);
            self.events.push(GameEvent::DifficultyChanged { from, to });
            self.sync_tasks();
        }
    }

    /// Start or stop the timed tasks to match the session state.
    /// Safe to call repeatedly; never duplicates a timer.
    fn sync_tasks(&mut self) {
        if !self.session.is_active() {
            light::suspend(&mut self.scheduler);
            for task in [Task::Spawn, Task::Move, Task::Collision] {
                self.scheduler.disarm(task);
            }
            return;
        }
        if !self.scheduler.is_armed(Task::Light) {
            light::start(&mut self.session, &mut self.scheduler);
        }
        self.scheduler
            .arm_periodic(Task::Spawn, self.session.spawn_interval_ms());
        self.scheduler.arm_periodic(Task::Move, MOVE_INTERVAL_MS);
        self.scheduler
            .arm_periodic(Task::Collision, COLLISION_INTERVAL_MS);
    }

    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::highscores::HighScores;
    use crate::predictor::ScriptedPredictor;
    use crate::sim::light::LightPhase;
    use crate::sim::state::{Heading, Vehicle};

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(7),
            ..GameConfig::default()
        }
    }

    fn game() -> Game {
        Game::new(config()).unwrap()
    }

    fn parked_vehicle(game: &mut Game, x: f32, y: f32) {
        let id = game.session_mut().next_entity_id();
        game.session_mut().vehicles.push(Vehicle {
            id,
            pos: Vec2::new(x, y),
            lane: 0,
            speed: 0.0,
            heading: Heading::Right,
        });
    }

    #[test]
    fn test_new_game_arms_every_task() {
        let g = game();
        for task in [Task::Light, Task::Spawn, Task::Move, Task::Collision] {
            assert!(g.scheduler().is_armed(task), "{:?} not armed", task);
        }
        assert_eq!(g.scheduler().due_ms(Task::Light), Some(6000));
        assert_eq!(g.scheduler().interval_ms(Task::Spawn), Some(2000));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let cfg = GameConfig {
            viewport_width: 0.0,
            ..config()
        };
        assert!(Game::new(cfg).is_err());
    }

    #[test]
    fn test_light_cycles_and_vehicles_spawn() {
        let mut g = game();
        g.advance(6000);
        assert_eq!(g.session().light.phase, LightPhase::Green);
        g.advance(4000);
        assert_eq!(g.session().light.phase, LightPhase::Yellow);
        g.advance(2000);
        assert_eq!(g.session().light.phase, LightPhase::Red);
        assert!(!g.session().vehicles.is_empty());

        let events = g.drain_events();
        assert!(events.contains(&GameEvent::LightChanged(LightPhase::Green)));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::VehicleSpawned { .. })));
        assert!(g.drain_events().is_empty());
    }

    #[test]
    fn test_up_on_green_is_a_fault() {
        let mut g = game();
        g.advance(6000);
        g.session_mut().player.pos = Vec2::new(610.0, 450.0);
        g.move_player(MoveDirection::Up);

        assert_eq!(g.session().warning, Some(Warning::LightNotRed));
        assert_eq!(g.session().lives(), 3.5);
        assert!(g.session().player.returning);
        // Position untouched until the relocation fires
        assert_eq!(g.session().player.pos.y, 450.0);

        g.advance(FAULT_RETURN_DELAY_MS);
        assert_eq!(g.session().player.pos, Vec2::new(610.0, 650.0));
        assert!(!g.session().player.returning);
    }

    #[test]
    fn test_input_ignored_while_returning() {
        let mut g = game();
        g.session_mut().player.pos = Vec2::new(100.0, 450.0);
        g.move_player(MoveDirection::Up);
        assert!(g.session().player.returning);

        g.move_player(MoveDirection::Left);
        g.move_player(MoveDirection::Up);
        assert_eq!(g.session().player.pos, Vec2::new(100.0, 450.0));
        assert_eq!(g.session().lives(), 3.5);
    }

    #[test]
    fn test_warning_clears_after_two_seconds() {
        let mut g = game();
        g.session_mut().player.pos = Vec2::new(100.0, 450.0);
        g.move_player(MoveDirection::Up);
        g.advance(WARNING_DURATION_MS - 1);
        assert!(g.session().warning.is_some());
        g.advance(1);
        assert_eq!(g.session().warning, None);
    }

    #[test]
    fn test_collision_cooldown() {
        let mut g = game();
        // Before the stop line, so red keeps it parked on the start line
        parked_vehicle(&mut g, 500.0, 650.0);

        g.advance(100);
        assert_eq!(g.session().lives(), 3.5);
        assert_eq!(g.session().warning, Some(Warning::VehicleHit));
        assert_eq!(g.session().last_fault_ms, 100);

        g.advance(950);
        assert_eq!(g.session().lives(), 3.5);

        g.advance(50);
        assert_eq!(g.session().lives(), 3.0);
    }

    #[test]
    fn test_collision_relocates_with_hold() {
        let mut g = game();
        g.session_mut().player.pos = Vec2::new(300.0, 380.0);
        parked_vehicle(&mut g, 280.0, 380.0);

        g.advance(100);
        assert!(!g.session().player.returning);
        g.advance(200);
        assert_eq!(g.session().player.pos, Vec2::new(300.0, 650.0));
        assert!(g.session().player.returning);
        g.advance(100);
        assert!(!g.session().player.returning);
    }

    #[test]
    fn test_pause_stops_tasks_and_resume_restarts_light() {
        let mut g = game();
        g.advance(1000);
        g.toggle_pause();
        for task in [Task::Light, Task::Spawn, Task::Move, Task::Collision] {
            assert!(!g.scheduler().is_armed(task));
        }

        g.advance(20_000);
        assert!(g.session().vehicles.is_empty());
        assert_eq!(g.session().light.phase, LightPhase::Red);

        g.move_player(MoveDirection::Left);
        assert_eq!(g.session().player.pos.x, PLAYER_START_X);

        g.toggle_pause();
        assert_eq!(g.scheduler().due_ms(Task::Light), Some(21_000 + 6000));
        assert_eq!(g.scheduler().due_ms(Task::Spawn), Some(21_000 + 2000));
    }

    fn ai_game(predictor: Rc<RefCell<ScriptedPredictor>>) -> Game {
        let cfg = GameConfig {
            ai_mode: true,
            ..config()
        };
        Game::with_parts(
            cfg,
            Box::new(predictor),
            Box::new(MemoryScoreStore::new()),
            Box::new(NullSink),
        )
        .unwrap()
    }

    #[test]
    fn test_no_evaluation_while_paused() {
        let predictor = Rc::new(RefCell::new(ScriptedPredictor::new()));
        predictor.borrow_mut().push_difficulty(4.0);
        let mut g = ai_game(predictor.clone());

        g.toggle_pause();
        g.advance(2000);
        assert!(predictor.borrow().requests().is_empty());
        assert_eq!(g.session().difficulty, Tier::MIN);

        // Resuming re-arms the evaluation that was skipped
        g.toggle_pause();
        g.advance(DIFFICULTY_DEBOUNCE_MS);
        assert_eq!(predictor.borrow().requests().len(), 1);
        assert_eq!(g.session().difficulty.get(), 4);
    }

    #[test]
    fn test_no_evaluation_after_game_over() {
        let predictor = Rc::new(RefCell::new(ScriptedPredictor::new()));
        let mut g = ai_game(predictor.clone());
        for _ in 0..START_HALF_LIVES {
            g.session_mut().player.pos = Vec2::new(100.0, 450.0);
            g.move_player(MoveDirection::Up);
            g.advance(FAULT_RETURN_DELAY_MS);
        }
        assert!(g.session().game_over);

        g.advance(10_000);
        assert!(predictor.borrow().requests().is_empty());
    }

    #[test]
    fn test_repeated_sync_never_duplicates_timers() {
        let mut g = game();
        g.toggle_ai_mode();
        g.toggle_ai_mode();
        g.advance(2000);
        let spawned = g
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::VehicleSpawned { .. }))
            .count();
        assert!(spawned <= 1);
    }

    #[test]
    fn test_game_over_submits_record() {
        let sink = Rc::new(RefCell::new(HighScores::new()));
        let cfg = GameConfig {
            player_name: Some("ana".into()),
            ..config()
        };
        let mut g = Game::with_parts(
            cfg,
            Box::new(OfflinePredictor),
            Box::new(MemoryScoreStore::new()),
            Box::new(sink.clone()),
        )
        .unwrap();
        g.session_mut().score = 300;

        for _ in 0..START_HALF_LIVES {
            g.session_mut().player.pos = Vec2::new(100.0, 450.0);
            g.move_player(MoveDirection::Up);
            g.advance(FAULT_RETURN_DELAY_MS);
        }

        assert!(g.session().game_over);
        assert_eq!(g.session().lives(), 0.0);
        assert!(!g.scheduler().is_armed(Task::Light));
        assert!(!g.scheduler().is_armed(Task::Collision));
        assert_eq!(sink.borrow().top_score(), Some(300));
        assert_eq!(sink.borrow().entries[0].player_name, "ana");

        let over = g
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(over, 1);

        // Game over ignores pause and movement
        g.toggle_pause();
        assert!(!g.session().paused);
        g.move_player(MoveDirection::Left);
        assert_eq!(g.session().player.pos.x, 100.0);
    }

    #[test]
    fn test_game_over_without_name_submits_nothing() {
        let sink = Rc::new(RefCell::new(HighScores::new()));
        let mut g = Game::with_parts(
            config(),
            Box::new(OfflinePredictor),
            Box::new(MemoryScoreStore::new()),
            Box::new(sink.clone()),
        )
        .unwrap();
        g.session_mut().score = 300;
        for _ in 0..START_HALF_LIVES {
            g.session_mut().player.pos = Vec2::new(100.0, 450.0);
            g.move_player(MoveDirection::Up);
            g.advance(FAULT_RETURN_DELAY_MS);
        }
        assert!(g.session().game_over);
        assert!(sink.borrow().is_empty());
    }

    #[test]
    fn test_reset_restores_fresh_session() {
        let mut g = game();
        g.advance(7000);
        g.session_mut().score = 450;
        g.session_mut().player.pos = Vec2::new(100.0, 450.0);
        g.move_player(MoveDirection::Up);
        let epoch = g.session().epoch;

        g.reset_game();
        let s = g.session();
        assert_eq!(s.epoch, epoch + 1);
        assert_eq!(s.score, 0);
        assert_eq!(s.lives(), 4.0);
        assert_eq!(s.difficulty, Tier::MIN);
        assert!(s.vehicles.is_empty());
        assert_eq!(s.warning, None);
        assert_eq!(s.light.phase, LightPhase::Red);
        assert_eq!(s.player.pos, Vec2::new(550.0, 650.0));
        assert!(!s.player.returning);

        // The stale relocation was cancelled along with the warning timer
        assert!(!g.scheduler().has_pending(|e| matches!(e, Deferred::Relocate { .. })));
        assert_eq!(g.scheduler().due_ms(Task::Light), Some(7000 + 6000));
    }

    #[test]
    fn test_tick_applies_input_then_time() {
        let mut g = game();
        let input = TickInput {
            moves: vec![MoveDirection::Right, MoveDirection::Right],
            ..TickInput::default()
        };
        tick(&mut g, &input, MOVE_INTERVAL_MS);
        assert_eq!(g.session().player.pos.x, PLAYER_START_X + 2.0 * PLAYER_STEP);
        assert_eq!(g.now_ms(), MOVE_INTERVAL_MS);

        tick(
            &mut g,
            &TickInput {
                pause: true,
                ..TickInput::default()
            },
            MOVE_INTERVAL_MS,
        );
        assert!(g.session().paused);
    }
}
