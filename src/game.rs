use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::{EngineConfig, SpeedTier};
use crate::error::EngineError;
use crate::food::spawn_food;
use crate::grid::{Cell, GridBounds};
use crate::selector::{MoveSelector, Tier};
use crate::snake::Body;

/// Current high-level session state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

/// Why a session was re-initialised.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResetReason {
    Player,
    StallTimeout,
    Resize,
    GameOver,
}

/// Result of one [`GameState::tick`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TickOutcome {
    pub applied_move: Option<Cell>,
    pub tier: Tier,
    pub status: String,
    pub vision_path: Vec<Cell>,
    pub ate_food: bool,
    pub game_over: bool,
    /// Set when the stall timeout re-initialised the session this tick.
    pub stall_reset: bool,
}

/// Complete mutable state for one autonomous session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub body: Body,
    pub food: Cell,
    pub score: u32,
    pub high_score: u32,
    pub speed: SpeedTier,
    pub status: GameStatus,
    pub tick_count: u64,
    tier: Tier,
    vision_path: Vec<Cell>,
    stall_started_at: Option<Instant>,
    requested_length: usize,
    start_length: usize,
    stall_timeout: Duration,
    bounds: GridBounds,
    selector: MoveSelector,
    rng: StdRng,
}

impl GameState {
    /// Starts a session seeded from system entropy.
    #[must_use]
    pub fn initialize(bounds: GridBounds, config: &EngineConfig) -> Self {
        Self::with_rng(bounds, config, StdRng::from_entropy())
    }

    /// Starts a deterministic session for tests and reproducible runs.
    #[must_use]
    pub fn initialize_with_seed(bounds: GridBounds, config: &EngineConfig, seed: u64) -> Self {
        Self::with_rng(bounds, config, StdRng::seed_from_u64(seed))
    }

    /// Starts a session sized to a terminal of `columns` x `rows`.
    pub fn for_terminal(
        columns: u16,
        rows: u16,
        config: &EngineConfig,
        seed: Option<u64>,
    ) -> Result<Self, EngineError> {
        let bounds = GridBounds::from_terminal(columns, rows)?;
        Ok(match seed {
            Some(seed) => Self::initialize_with_seed(bounds, config, seed),
            None => Self::initialize(bounds, config),
        })
    }

    fn with_rng(bounds: GridBounds, config: &EngineConfig, mut rng: StdRng) -> Self {
        let start_length = fitted_start_length(bounds, config.start_length);
        let body = Body::horizontal(bounds.center(), start_length);
        let food = spawn_food(&mut rng, bounds, &body);

        Self {
            body,
            food,
            score: 0,
            high_score: 0,
            speed: config.speed,
            status: GameStatus::Playing,
            tick_count: 0,
            tier: Tier::Ready,
            vision_path: Vec::new(),
            stall_started_at: None,
            requested_length: config.start_length,
            start_length,
            stall_timeout: config.stall_timeout(),
            bounds,
            selector: MoveSelector::new(bounds),
            rng,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Tier chosen on the most recent tick.
    #[must_use]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Human-readable status for display.
    #[must_use]
    pub fn status_line(&self) -> String {
        self.tier.to_string()
    }

    /// Route planned on the most recent tick.
    #[must_use]
    pub fn vision_path(&self) -> &[Cell] {
        &self.vision_path
    }

    /// Highest score reachable from the starting length.
    #[must_use]
    pub fn theoretical_max_score(&self) -> usize {
        self.bounds.area().saturating_sub(self.start_length)
    }

    #[must_use]
    pub fn selector(&self) -> &MoveSelector {
        &self.selector
    }

    /// Advances the simulation by one decision. `now` drives the stall
    /// timer.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.status != GameStatus::Playing {
            return self.idle_outcome();
        }

        self.tick_count += 1;
        let decision = self.selector.choose(&self.body, self.food);
        if !decision.tier.same_kind(self.tier) {
            debug!(from = %self.tier, to = %decision.tier, tick = self.tick_count, "tier changed");
        }
        self.tier = decision.tier;
        self.vision_path = decision.vision_path;

        if self.stall_expired(now) {
            self.reset_with(ResetReason::StallTimeout);
            return TickOutcome {
                stall_reset: true,
                ..self.idle_outcome()
            };
        }

        let Some(next) = decision.next else {
            self.status = GameStatus::GameOver;
            self.record_high_score();
            info!(score = self.score, length = self.body.len(), "no free move, game over");
            return self.idle_outcome();
        };

        // A fallback food cell can sit under the body; it is not edible there.
        let ate_food = next == self.food && !self.body.occupies(self.food);
        self.body.advance(next, ate_food);
        if ate_food {
            self.score += 1;
        }
        if ate_food || self.body.occupies(self.food) {
            self.food = spawn_food(&mut self.rng, self.bounds, &self.body);
        }

        TickOutcome {
            applied_move: Some(next),
            tier: self.tier,
            status: self.status_line(),
            vision_path: self.vision_path.clone(),
            ate_food,
            game_over: false,
            stall_reset: false,
        }
    }

    /// Re-initialises body, food and score, keeping the high score.
    pub fn reset(&mut self) {
        self.reset_with(ResetReason::Player);
    }

    /// Applies new playable bounds, resetting when they differ. Returns
    /// whether a reset happened.
    pub fn resize(&mut self, bounds: GridBounds) -> bool {
        if bounds == self.bounds {
            return false;
        }

        self.bounds = bounds;
        self.selector = MoveSelector::new(bounds);
        self.reset_with(ResetReason::Resize);
        true
    }

    /// Toggles between playing and paused; no effect after game over.
    /// Time spent paused does not count toward the stall timeout.
    pub fn toggle_pause(&mut self) {
        self.stall_started_at = None;
        self.status = match self.status {
            GameStatus::Playing => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Playing,
            GameStatus::GameOver => GameStatus::GameOver,
        };
    }

    /// Resets after game over; returns false when the session is still live.
    pub fn restart_if_over(&mut self) -> bool {
        if self.status != GameStatus::GameOver {
            return false;
        }
        self.reset_with(ResetReason::GameOver);
        true
    }

    fn reset_with(&mut self, reason: ResetReason) {
        self.record_high_score();
        info!(?reason, score = self.score, high_score = self.high_score, "session reset");

        self.start_length = fitted_start_length(self.bounds, self.requested_length);
        self.body = Body::horizontal(self.bounds.center(), self.start_length);
        self.food = spawn_food(&mut self.rng, self.bounds, &self.body);
        self.score = 0;
        self.tick_count = 0;
        self.tier = Tier::Ready;
        self.vision_path.clear();
        self.stall_started_at = None;
        self.selector.clear_history();
        self.status = match self.status {
            GameStatus::Paused => GameStatus::Paused,
            GameStatus::Playing | GameStatus::GameOver => GameStatus::Playing,
        };
    }

    fn record_high_score(&mut self) {
        if self.score > self.high_score {
            info!(score = self.score, previous = self.high_score, "new high score");
            self.high_score = self.score;
        }
    }

    /// Updates the stall timer for the current tier and reports whether the
    /// continuous stall has outlasted the timeout.
    fn stall_expired(&mut self, now: Instant) -> bool {
        if !self.tier.is_stalling() {
            self.stall_started_at = None;
            return false;
        }

        match self.stall_started_at {
            None => {
                self.stall_started_at = Some(now);
                false
            }
            Some(started) => now.saturating_duration_since(started) > self.stall_timeout,
        }
    }

    fn idle_outcome(&self) -> TickOutcome {
        TickOutcome {
            applied_move: None,
            tier: self.tier,
            status: self.status_line(),
            vision_path: self.vision_path.clone(),
            ate_food: false,
            game_over: self.status == GameStatus::GameOver,
            stall_reset: false,
        }
    }
}

/// Clamps the requested start length so the horizontal start body fits
/// between the centre column and the left wall.
fn fitted_start_length(bounds: GridBounds, requested: usize) -> usize {
    let room = usize::try_from(bounds.center().col - bounds.left() + 1).unwrap_or(1);
    requested.clamp(1, room.max(1))
}
