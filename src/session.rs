//! Round state machine.
//!
//! One `Session` instance lives for the whole page. All mutation goes
//! through the entry points below; the glue layer owns the actual interval
//! timer and calls `tick` once per second, so this module stays pure and
//! runs under native `cargo test`.
//!
//! Phases: `Idle` (no round) -> `Active` (input accepted, countdown running)
//! -> `Submitting` (awaiting the server) or `Expired` (timed out with no
//! mark) -> back to `Idle` via `advance_round`. Every transition out of
//! `Active` is first-wins: a submit racing the final tick leaves exactly one
//! winner and the loser's entry point reports an error the caller ignores.

use crate::brush::Brush;
use crate::color::Color;

/// Seconds remaining at or below which the countdown enters its advisory
/// "low time" visual state.
pub const LOW_TIME_THRESHOLD: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Submitting,
    Expired,
}

/// Outcome of one countdown tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Tick {
    /// Session was not `Active`; nothing happened. Makes a stale interval
    /// callback racing a submit or skip harmless.
    Ignored,
    Continue { time_left: u32, low_time: bool },
    /// Reached zero with a mark on the canvas: the session moved itself to
    /// `Submitting` and the caller must send the drawing.
    AutoSubmit(SubmitTicket),
    /// Reached zero with a blank canvas: moved to `Expired`, never contacts
    /// the server.
    Expired,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmitTicket {
    pub session_id: String,
    pub time_spent: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundError {
    /// `begin_round` before a prompt was loaded.
    NoPrompt,
    /// `begin_round` while a round is already underway.
    RoundInProgress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// Submit while not `Active` (double submit, or racing a timeout).
    NotActive,
    /// Submit with a blank canvas; rejected before any network is touched.
    NothingDrawn,
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    session_id: Option<String>,
    prompt: Option<String>,
    time_limit: u32,
    time_left: u32,
    accepting_input: bool,
    has_marked: bool,
    pub brush: Brush,
    pub color: Color,
    /// Base brush size in pixels, user-adjustable, always >= 1.
    pub brush_size: u32,
}

impl Session {
    pub fn new() -> Session {
        Session {
            phase: Phase::Idle,
            session_id: None,
            prompt: None,
            time_limit: 0,
            time_left: 0,
            accepting_input: false,
            has_marked: false,
            brush: Brush::Normal,
            color: Color::BLACK,
            brush_size: 5,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    pub fn accepting_input(&self) -> bool {
        self.accepting_input
    }

    pub fn has_marked(&self) -> bool {
        self.has_marked
    }

    /// Store the server-issued round. Only meaningful while `Idle`; a prompt
    /// arriving mid-round (stale fetch) is dropped.
    pub fn load_prompt(&mut self, session_id: String, prompt: String, time_limit: u32) {
        if self.phase != Phase::Idle {
            return;
        }
        self.session_id = Some(session_id);
        self.prompt = Some(prompt);
        self.time_limit = time_limit;
        self.time_left = time_limit;
    }

    /// Explicit start action: `Idle -> Active`.
    pub fn begin_round(&mut self) -> Result<(), RoundError> {
        if self.phase != Phase::Idle {
            return Err(RoundError::RoundInProgress);
        }
        if self.session_id.is_none() || self.prompt.is_none() {
            return Err(RoundError::NoPrompt);
        }
        self.phase = Phase::Active;
        self.accepting_input = true;
        self.time_left = self.time_limit;
        Ok(())
    }

    /// Record that at least one segment was committed this round.
    pub fn mark_drawn(&mut self) {
        if self.accepting_input {
            self.has_marked = true;
        }
    }

    /// One second elapsed. Never drives `time_left` negative; the zero
    /// transition fires exactly once because it also leaves `Active`.
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::Active {
            return Tick::Ignored;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            return Tick::Continue {
                time_left: self.time_left,
                low_time: self.time_left <= LOW_TIME_THRESHOLD,
            };
        }
        if self.has_marked {
            Tick::AutoSubmit(self.enter_submitting())
        } else {
            self.phase = Phase::Expired;
            self.accepting_input = false;
            Tick::Expired
        }
    }

    /// Explicit user submit: `Active -> Submitting`. Rejected without any
    /// state change when nothing was drawn.
    pub fn try_submit(&mut self) -> Result<SubmitTicket, SubmitError> {
        if self.phase != Phase::Active {
            return Err(SubmitError::NotActive);
        }
        if !self.has_marked {
            return Err(SubmitError::NothingDrawn);
        }
        Ok(self.enter_submitting())
    }

    fn enter_submitting(&mut self) -> SubmitTicket {
        self.phase = Phase::Submitting;
        self.accepting_input = false;
        SubmitTicket {
            // Invariant: begin_round required a session id.
            session_id: self.session_id.clone().unwrap_or_default(),
            time_spent: self.time_limit.saturating_sub(self.time_left),
        }
    }

    /// Skip action, permitted only while `Active`. Takes the same exit as a
    /// timeout; the caller confirms with the user and cancels the countdown.
    pub fn skip(&mut self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        self.phase = Phase::Expired;
        self.accepting_input = false;
        true
    }

    /// The completion request failed. Drop back to `Active` so the user can
    /// resubmit manually; the countdown stays cancelled and input stays
    /// closed, so the round neither advances nor resumes drawing.
    pub fn submission_failed(&mut self) {
        if self.phase == Phase::Submitting {
            self.phase = Phase::Active;
        }
    }

    /// The user cleared the canvas: a round-boundary reset of the mark flag.
    pub fn canvas_cleared(&mut self) {
        self.has_marked = false;
    }

    /// Round boundary: reset transient state and return to `Idle`. Brush,
    /// color and size persist across rounds.
    pub fn advance_round(&mut self) {
        self.phase = Phase::Idle;
        self.session_id = None;
        self.prompt = None;
        self.time_limit = 0;
        self.time_left = 0;
        self.accepting_input = false;
        self.has_marked = false;
    }
}

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}
