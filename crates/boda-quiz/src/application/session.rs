//! Real-time driver for a [`QuizGame`].
//!
//! The session owns a single background task that ticks the countdown once
//! a second and, once a question is closed, waits out the pause before
//! advancing. The task lives in the session's [`ScheduledTasks`], so
//! dropping the session stops it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use boda_core::error::DomainError;
use boda_core::timer::ScheduledTasks;
use tokio::sync::Notify;
use tracing::{debug, info};

use crate::domain::game::{QuizGame, QuizPhase, TimerStep};

const TICK: Duration = Duration::from_secs(1);

/// A quiz game plus the task that moves it along in time.
#[derive(Debug)]
pub struct QuizSession {
    game: Arc<Mutex<QuizGame>>,
    wake: Arc<Notify>,
    tasks: ScheduledTasks,
}

impl QuizSession {
    /// Wraps `game`; nothing runs until [`Self::start`].
    #[must_use]
    pub fn new(game: QuizGame) -> Self {
        Self {
            game: Arc::new(Mutex::new(game)),
            wake: Arc::new(Notify::new()),
            tasks: ScheduledTasks::new(),
        }
    }

    /// Starts the game and its countdown.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the game is in `Intro`.
    pub fn start(&mut self) -> Result<(), DomainError> {
        lock(&self.game).start()?;
        if self.tasks.pending() == 0 {
            self.tasks
                .spawn(drive(Arc::clone(&self.game), Arc::clone(&self.wake)));
        }
        self.wake.notify_one();
        info!("quiz started");
        Ok(())
    }

    /// Locks in `option` for the current question.
    ///
    /// Returns `false` if the question was already closed.
    ///
    /// # Errors
    ///
    /// See [`QuizGame::answer`].
    pub fn answer(&self, option: usize) -> Result<bool, DomainError> {
        let mut game = lock(&self.game);
        let accepted = game.answer(option)?;
        if accepted {
            info!(
                question = game.cursor(),
                option,
                score = game.score(),
                "quiz answer locked"
            );
            self.wake.notify_one();
        }
        Ok(accepted)
    }

    /// Runs `f` against the current game state.
    pub fn read<R>(&self, f: impl FnOnce(&QuizGame) -> R) -> R {
        f(&lock(&self.game))
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.read(QuizGame::phase)
    }

    /// Whether the driver task is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.tasks.pending() > 0
    }

    /// Stops the driver; the game freezes where it is.
    pub fn shutdown(&mut self) {
        self.tasks.cancel_all();
    }
}

fn lock(game: &Mutex<QuizGame>) -> MutexGuard<'_, QuizGame> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn drive(game: Arc<Mutex<QuizGame>>, wake: Arc<Notify>) {
    loop {
        let step = lock(&game).next_timer();
        match step {
            TimerStep::Idle => {
                if lock(&game).phase() != QuizPhase::Intro {
                    debug!("quiz driver finished");
                    return;
                }
                wake.notified().await;
            }
            TimerStep::Tick => {
                tokio::select! {
                    () = tokio::time::sleep(TICK) => {
                        let mut game = lock(&game);
                        if game.tick() {
                            info!(question = game.cursor(), "quiz question timed out");
                        }
                    }
                    () = wake.notified() => {}
                }
            }
            TimerStep::Advance(delay) => {
                tokio::time::sleep(delay).await;
                let mut game = lock(&game);
                if let Ok(QuizPhase::Result) = game.advance() {
                    info!(
                        score = game.score(),
                        total = game.total(),
                        percentage = game.percentage(),
                        "quiz finished"
                    );
                }
            }
        }
    }
}
