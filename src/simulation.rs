use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{GridSize, SimulationConfig};
use crate::food::spawn_position;
use crate::input::Direction;
use crate::snake::{Position, Snake};

/// Why a game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Termination {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, so no food can spawn. Counts as a win.
    GridFilled,
}

impl Termination {
    #[must_use]
    pub fn is_win(self) -> bool {
        matches!(self, Self::GridFilled)
    }
}

/// Authoritative state of one game.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SnakeState {
    pub snake: Snake,
    pub facing: Direction,
    /// `None` only once the grid is filled.
    pub food: Option<Position>,
    pub alive: bool,
    pub termination: Option<Termination>,
    pub score: u32,
    pub interval_ms: u64,
}

impl SnakeState {
    /// Builds the start-of-game state, spawning food away from the snake.
    #[must_use]
    pub fn initial(config: &SimulationConfig, rng: &mut StdRng) -> Self {
        let (x, y) = config.start;
        let snake = Snake::new(Position::new(x, y));
        let food = spawn_position(rng, config.grid_size, &snake);

        let mut state = Self {
            snake,
            facing: Direction::Right,
            food,
            alive: true,
            termination: None,
            score: 0,
            interval_ms: config.initial_interval_ms,
        };

        if state.food.is_none() {
            state.alive = false;
            state.termination = Some(Termination::GridFilled);
        }

        state
    }
}

/// Immutable copy of the state handed to rendering and scoring.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub grid: GridSize,
    pub body: Vec<Position>,
    pub food: Option<Position>,
    pub facing: Direction,
    pub alive: bool,
    pub termination: Option<Termination>,
    pub score: u32,
    pub interval_ms: u64,
}

/// Result of one `step` call.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StepOutcome {
    pub snapshot: Snapshot,
    /// Points earned on this step; zero unless food was eaten.
    pub score_delta: u32,
    pub ate_food: bool,
    /// True when the step interval changed and the driver must be re-armed.
    pub interval_changed: bool,
    /// Set only on the step that ended the game.
    pub terminated: Option<Termination>,
}

/// Owns a `SnakeState` and advances it one cell per `step`.
#[derive(Debug, Clone)]
pub struct SnakeSimulation {
    config: SimulationConfig,
    state: SnakeState,
    rng: StdRng,
}

impl SnakeSimulation {
    /// Creates a simulation seeded from OS entropy.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic simulation for tests and reproducible runs.
    #[must_use]
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SimulationConfig, mut rng: StdRng) -> Self {
        let state = SnakeState::initial(&config, &mut rng);
        Self { config, state, rng }
    }

    /// Wraps an explicitly constructed state, e.g. a mid-game scenario.
    #[must_use]
    pub fn from_state(config: SimulationConfig, state: SnakeState, seed: u64) -> Self {
        Self {
            config,
            state,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.state.alive
    }

    /// Copies the current state for read-only consumers.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.config.grid_size,
            body: self.state.snake.segments().copied().collect(),
            food: self.state.food,
            facing: self.state.facing,
            alive: self.state.alive,
            termination: self.state.termination,
            score: self.state.score,
            interval_ms: self.state.interval_ms,
        }
    }

    /// Replaces the state with a fresh game.
    pub fn reset(&mut self) {
        self.state = SnakeState::initial(&self.config, &mut self.rng);
    }

    /// Advances the game by one cell.
    ///
    /// `pending` becomes the new facing unless it reverses the current one.
    /// Terminal states are left untouched.
    pub fn step(&mut self, pending: Direction) -> StepOutcome {
        if !self.state.alive {
            return self.outcome(false, 0, false, None);
        }

        if !pending.is_reversal_of(self.state.facing) {
            self.state.facing = pending;
        }

        let next_head = self.state.snake.head().offset(self.state.facing);
        if !next_head.is_within_bounds(self.config.grid_size) {
            return self.terminate(Termination::WallCollision);
        }

        let ate_food = self.state.food == Some(next_head);
        if self.state.snake.collides_with(next_head, ate_food) {
            return self.terminate(Termination::SelfCollision);
        }

        self.state.snake.advance(next_head, ate_food);
        if !ate_food {
            return self.outcome(false, 0, false, None);
        }

        let previous_score = self.state.score;
        self.state.score = previous_score.saturating_add(self.config.points_per_food);
        let score_delta = self.state.score - previous_score;

        let previous_interval = self.state.interval_ms;
        self.state.interval_ms = previous_interval
            .saturating_sub(self.config.interval_decrement_ms)
            .max(self.config.min_interval_ms);
        let interval_changed = self.state.interval_ms != previous_interval;

        self.state.food = spawn_position(&mut self.rng, self.config.grid_size, &self.state.snake);
        if self.state.food.is_none() {
            self.state.alive = false;
            self.state.termination = Some(Termination::GridFilled);
            return self.outcome(true, score_delta, interval_changed, Some(Termination::GridFilled));
        }

        self.outcome(true, score_delta, interval_changed, None)
    }

    fn terminate(&mut self, reason: Termination) -> StepOutcome {
        self.state.alive = false;
        self.state.termination = Some(reason);
        self.outcome(false, 0, false, Some(reason))
    }

    fn outcome(
        &self,
        ate_food: bool,
        score_delta: u32,
        interval_changed: bool,
        terminated: Option<Termination>,
    ) -> StepOutcome {
        StepOutcome {
            snapshot: self.snapshot(),
            score_delta,
            ate_food,
            interval_changed,
            terminated,
        }
    }
}
