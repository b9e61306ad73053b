//! The quiz state machine.
//!
//! `QuizGame` knows nothing about real time. It is told when a second has
//! passed ([`QuizGame::tick`]) and when the post-answer pause is over
//! ([`QuizGame::advance`]), and it reports through [`QuizGame::next_timer`]
//! what its driver should wait for next.

use std::time::Duration;

use boda_core::error::DomainError;
use serde::Serialize;

use super::question::Question;
use crate::settings::QuizSettings;

/// Coarse phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    /// The visitor already sent a result; terminal.
    AlreadyPlayed,
    /// Waiting for the player to start.
    Intro,
    /// A question is on screen.
    Playing,
    /// All questions answered.
    Result,
}

/// How the current question was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "option", rename_all = "snake_case")]
pub enum AnswerLock {
    /// The player picked this option.
    Selected(usize),
    /// The countdown ran out.
    TimedOut,
}

/// What the driver should wait for next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStep {
    /// Nothing is running; wait to be woken.
    Idle,
    /// The countdown is running; tick after one second.
    Tick,
    /// The current question is closed; advance after the delay.
    Advance(Duration),
}

/// Countdown and pause lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizTiming {
    /// Countdown per question, in whole seconds.
    pub seconds_per_question: u32,
    /// Pause after an explicit answer.
    pub answer_delay: Duration,
    /// Pause after a timeout.
    pub timeout_delay: Duration,
}

impl From<&QuizSettings> for QuizTiming {
    fn from(settings: &QuizSettings) -> Self {
        Self {
            seconds_per_question: settings.seconds_per_question,
            answer_delay: settings.answer_delay(),
            timeout_delay: settings.timeout_delay(),
        }
    }
}

/// One play-through of the quiz.
#[derive(Debug, Clone)]
pub struct QuizGame {
    questions: Vec<Question>,
    timing: QuizTiming,
    phase: QuizPhase,
    cursor: usize,
    score: u32,
    time_left: u32,
    lock: Option<AnswerLock>,
}

impl QuizGame {
    /// Creates a game, in `AlreadyPlayed` if the visitor has played before
    /// and in `Intro` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if there are no questions, a
    /// question is malformed, or the countdown is zero.
    pub fn new(
        questions: Vec<Question>,
        timing: QuizTiming,
        already_played: bool,
    ) -> Result<Self, DomainError> {
        if questions.is_empty() {
            return Err(DomainError::Validation("quiz has no questions".into()));
        }
        if timing.seconds_per_question == 0 {
            return Err(DomainError::Validation(
                "countdown must be at least one second".into(),
            ));
        }
        for question in &questions {
            question.validate()?;
        }
        Ok(Self {
            questions,
            timing,
            phase: if already_played {
                QuizPhase::AlreadyPlayed
            } else {
                QuizPhase::Intro
            },
            cursor: 0,
            score: 0,
            time_left: timing.seconds_per_question,
            lock: None,
        })
    }

    /// Resets cursor, score and countdown and shows the first question.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the game is in `Intro`.
    pub fn start(&mut self) -> Result<(), DomainError> {
        if self.phase != QuizPhase::Intro {
            return Err(DomainError::InvalidState(format!(
                "cannot start quiz from {:?}",
                self.phase
            )));
        }
        self.phase = QuizPhase::Playing;
        self.cursor = 0;
        self.score = 0;
        self.time_left = self.timing.seconds_per_question;
        self.lock = None;
        Ok(())
    }

    /// Locks in `option` for the current question.
    ///
    /// Returns `false`, changing nothing, if the question is already closed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` outside `Playing` and
    /// `DomainError::Validation` if `option` does not exist.
    pub fn answer(&mut self, option: usize) -> Result<bool, DomainError> {
        if self.phase != QuizPhase::Playing {
            return Err(DomainError::InvalidState(format!(
                "cannot answer from {:?}",
                self.phase
            )));
        }
        let question = &self.questions[self.cursor];
        if option >= question.options.len() {
            return Err(DomainError::Validation(format!(
                "option {option} does not exist; question has {}",
                question.options.len()
            )));
        }
        if self.lock.is_some() {
            return Ok(false);
        }
        if question.is_correct(option) {
            self.score += 1;
        }
        self.lock = Some(AnswerLock::Selected(option));
        Ok(true)
    }

    /// Counts one second down.
    ///
    /// Returns `true` when this tick ran the countdown out, closing the
    /// question as unanswered.
    pub fn tick(&mut self) -> bool {
        if !self.is_timer_running() {
            return false;
        }
        self.time_left -= 1;
        if self.time_left == 0 {
            self.lock = Some(AnswerLock::TimedOut);
            return true;
        }
        false
    }

    /// Moves past the closed question to the next one, or to `Result`
    /// after the last.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless a question is closed.
    pub fn advance(&mut self) -> Result<QuizPhase, DomainError> {
        if self.phase != QuizPhase::Playing || self.lock.is_none() {
            return Err(DomainError::InvalidState(
                "no closed question to advance past".into(),
            ));
        }
        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
            self.lock = None;
            self.time_left = self.timing.seconds_per_question;
        } else {
            self.phase = QuizPhase::Result;
        }
        Ok(self.phase)
    }

    /// What the driver should wait for next.
    #[must_use]
    pub fn next_timer(&self) -> TimerStep {
        match (self.phase, self.lock) {
            (QuizPhase::Playing, None) => TimerStep::Tick,
            (QuizPhase::Playing, Some(AnswerLock::Selected(_))) => {
                TimerStep::Advance(self.timing.answer_delay)
            }
            (QuizPhase::Playing, Some(AnswerLock::TimedOut)) => {
                TimerStep::Advance(self.timing.timeout_delay)
            }
            _ => TimerStep::Idle,
        }
    }

    /// Whether the countdown is running.
    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.phase == QuizPhase::Playing && self.lock.is_none() && self.time_left > 0
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// Index of the question on screen.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The question on screen.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.cursor]
    }

    /// Correct answers so far.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seconds left on the countdown.
    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// How the current question was closed, if it was.
    #[must_use]
    pub fn lock(&self) -> Option<AnswerLock> {
        self.lock
    }

    /// Number of questions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Score as a percentage of the total, rounded half up.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        let total = u64::try_from(self.questions.len()).unwrap_or(u64::MAX);
        let scaled = (u64::from(self.score) * 200 + total) / (2 * total);
        u32::try_from(scaled).unwrap_or(100)
    }
}
