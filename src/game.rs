use std::collections::VecDeque;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::driver::StepDriver;
use crate::input::{GameInput, InputController};
use crate::score::{HighScoreStore, ScoreTracker};
use crate::simulation::{SnakeSimulation, Snapshot, StepOutcome, Termination};
use crate::wallet::{short_address, WalletEvent, WalletSession, WalletStatus};

const MAX_NOTICES: usize = 3;

/// Current high-level gameplay phase, derived from the owned parts.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    /// Fresh session, waiting for the first confirm.
    Start,
    Running,
    Paused,
    Over(Termination),
}

/// Whether the outer loop keeps running.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Control {
    Continue,
    Quit,
}

/// One play session: simulation, input slot, driver, scores and wallet.
pub struct GameSession {
    simulation: SnakeSimulation,
    input: InputController,
    driver: StepDriver,
    scores: ScoreTracker,
    store: Box<dyn HighScoreStore>,
    wallet: WalletSession,
    notices: VecDeque<String>,
    started: bool,
}

impl GameSession {
    /// Wires a session around `simulation`, reading the stored high score once.
    #[must_use]
    pub fn new(
        simulation: SnakeSimulation,
        store: Box<dyn HighScoreStore>,
        wallet: WalletSession,
    ) -> Self {
        let (high_score, load_error) = match store.load() {
            Ok(score) => (score, None),
            Err(error) => {
                warn!(%error, "failed to load high score, starting from 0");
                (0, Some(error))
            }
        };

        let driver = StepDriver::new(simulation.state().interval_ms);
        let mut session = Self {
            simulation,
            input: InputController::new(),
            driver,
            scores: ScoreTracker::new(high_score),
            store,
            wallet,
            notices: VecDeque::new(),
            started: false,
        };

        if let Some(error) = load_error {
            session.push_notice(format!("High score unavailable: {error}"));
        }

        if session.wallet.status() == &WalletStatus::Unavailable {
            session.push_notice("No wallet provider found. Install one to show your balance.");
        }

        info!(
            high_score,
            grid_width = session.simulation.config().grid_size.width,
            grid_height = session.simulation.config().grid_size.height,
            "session created"
        );
        session
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if let Some(reason) = self.simulation.state().termination {
            return Phase::Over(reason);
        }

        if !self.started {
            return Phase::Start;
        }

        if self.driver.is_paused() {
            Phase::Paused
        } else {
            Phase::Running
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.simulation.snapshot()
    }

    #[must_use]
    pub fn simulation(&self) -> &SnakeSimulation {
        &self.simulation
    }

    #[must_use]
    pub fn scores(&self) -> &ScoreTracker {
        &self.scores
    }

    #[must_use]
    pub fn store(&self) -> &dyn HighScoreStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn wallet(&self) -> &WalletSession {
        &self.wallet
    }

    #[must_use]
    pub fn driver(&self) -> &StepDriver {
        &self.driver
    }

    #[must_use]
    pub fn input(&self) -> &InputController {
        &self.input
    }

    /// User-facing messages, oldest first.
    pub fn notices(&self) -> impl Iterator<Item = &str> {
        self.notices.iter().map(String::as_str)
    }

    /// Routes one input event. Invalid or redundant requests are ignored.
    pub fn handle_input(&mut self, input: GameInput, now: Instant) -> Control {
        match input {
            GameInput::Direction(direction) => {
                if self.started && !self.simulation.is_terminal() {
                    self.input.request(direction);
                }
            }
            GameInput::Pause => self.toggle_pause(now),
            GameInput::Reset => self.reset(now),
            GameInput::ToggleWallet => self.toggle_wallet(),
            GameInput::Confirm => match self.phase() {
                Phase::Start => self.start(now),
                Phase::Over(_) => self.reset(now),
                Phase::Running | Phase::Paused => {}
            },
            GameInput::Quit => return Control::Quit,
        }

        Control::Continue
    }

    /// Begins stepping from the start screen.
    pub fn start(&mut self, now: Instant) {
        if self.started || self.simulation.is_terminal() {
            return;
        }

        self.started = true;
        self.driver.arm(now, self.simulation.state().interval_ms);
        info!("game started");
    }

    /// Swaps in a fresh game and starts it right away.
    ///
    /// Steps run to completion inside `tick`, so the swap never overlaps one.
    pub fn reset(&mut self, now: Instant) {
        self.simulation.reset();
        self.input.clear();
        self.scores.reset_session();
        self.started = true;
        self.driver.cancel();
        if !self.simulation.is_terminal() {
            self.driver.arm(now, self.simulation.state().interval_ms);
        }
        info!("game reset");
    }

    fn toggle_pause(&mut self, now: Instant) {
        if self.driver.is_paused() {
            if self.driver.resume(now) {
                info!("game resumed");
            }
        } else if self.driver.pause() {
            info!("game paused");
        }
    }

    /// Runs one step when the driver says one is due.
    pub fn tick(&mut self, now: Instant) -> Option<StepOutcome> {
        if !self.driver.poll(now) {
            return None;
        }

        let direction = self
            .input
            .take()
            .unwrap_or(self.simulation.state().facing);
        let outcome = self.simulation.step(direction);

        if outcome.ate_food {
            debug!(
                score = outcome.snapshot.score,
                interval_ms = outcome.snapshot.interval_ms,
                length = outcome.snapshot.body.len(),
                "food eaten"
            );
        }

        if let Some(high_score) = self.scores.apply(outcome.score_delta) {
            self.persist_high_score(high_score);
        }

        if outcome.interval_changed {
            self.driver.rearm(now, outcome.snapshot.interval_ms);
        }

        if let Some(reason) = outcome.terminated {
            self.driver.cancel();
            info!(
                ?reason,
                score = outcome.snapshot.score,
                length = outcome.snapshot.body.len(),
                "game over"
            );
        }

        Some(outcome)
    }

    /// Applies pending account switches reported by the wallet provider.
    pub fn poll_wallet(&mut self) {
        match self.wallet.poll() {
            Some(WalletEvent::AccountChanged(address)) => {
                self.push_notice(format!("Account changed: {}", short_address(&address)));
            }
            Some(WalletEvent::Disconnected) => self.push_notice("Wallet disconnected"),
            None => {}
        }
    }

    fn toggle_wallet(&mut self) {
        if self.wallet.address().is_some() {
            self.wallet.disconnect();
            self.push_notice("Wallet disconnected");
            return;
        }

        let notice = match self.wallet.connect() {
            Ok(WalletStatus::Connected { address, .. }) => {
                format!("Wallet connected: {}", short_address(address))
            }
            Ok(_) => return,
            Err(error) => {
                warn!(%error, "wallet connection failed");
                format!("Connection error: {error}")
            }
        };
        self.push_notice(notice);
    }

    fn persist_high_score(&mut self, high_score: u32) {
        match self.store.save(high_score) {
            Ok(()) => debug!(high_score, "high score saved"),
            Err(error) => {
                warn!(%error, high_score, "failed to save high score");
                self.push_notice(format!("Failed to save high score: {error}"));
            }
        }
    }

    fn push_notice(&mut self, notice: impl Into<String>) {
        let notice = notice.into();
        if self.notices.back() == Some(&notice) {
            return;
        }

        if self.notices.len() == MAX_NOTICES {
            let _ = self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }
}
