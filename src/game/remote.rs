//! Online play against a server-side session.
//!
//! ```text
//! SelectingSession ─▶ AwaitingSequence ─▶ Playing ─▶ Capturing ─▶ Submitting
//!        │                   │               ▲                        │
//!        ▼                   ▼               │                        ▼
//!  Ended(NoSessions)  Ended(NoSequence)      └──── WaitingForNextRound
//!                                                   │
//!                               Ended(GameOver | Finished | NoSequence)
//! ```
//!
//! The device never learns about a new round on its own: the player presses
//! `S1` in the wait loop and the session is fetched once per press.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use embedded_hal_async::delay::DelayNs;

use crate::config::{MAX_LISTED_SESSIONS, NOTICE_HOLD_MS, SELECT_POLL_MS};
use crate::console::Console;
use crate::error::ErrorKind;
use crate::keymap::{Answer, Key};
use crate::net::{HttpTransport, SessionClient, SessionSnapshot, SessionStatus, SessionSummary};
use crate::tone::{Buzzer, Sequence, Tone};
use crate::ui::presenter::NOTICE_ROW;
use crate::ui::{KeySource, Screen};

/// Row used for the error notices that replace the screen.
const ERROR_ROW: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteState {
    InProgress,
    GameOver,
}

/// The device's cached copy of the session it joined.
///
/// The id is fixed at selection; everything else follows the last fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteGameSession {
    id: String,
    nickname: String,
    completed: bool,
    state: RemoteState,
    sequence: Vec<i64>,
}

impl RemoteGameSession {
    pub fn selected(summary: SessionSummary) -> Self {
        Self {
            id: summary.id,
            nickname: summary.nickname,
            completed: false,
            state: RemoteState::InProgress,
            sequence: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn state(&self) -> RemoteState {
        self.state
    }

    /// Tones of the current round, dropping elements that map to none.
    pub fn current_sequence(&self) -> Sequence {
        remote_sequence(&self.sequence)
    }

    /// Adopt a fresh snapshot from the server.
    pub fn refresh(&mut self, snapshot: SessionSnapshot) {
        self.state = if snapshot.is_game_over() {
            RemoteState::GameOver
        } else {
            RemoteState::InProgress
        };
        self.completed = snapshot.completed;
        self.sequence = snapshot.sequence;
    }
}

/// Map server elements onto tones; unknown elements are skipped.
pub fn remote_sequence(values: &[i64]) -> Sequence {
    let tones = values
        .iter()
        .filter_map(|v| {
            let tone = u16::try_from(*v).ok().and_then(Tone::from_remote);
            if tone.is_none() {
                warn!("Remote: skipping sequence element {}", *v);
            }
            tone
        })
        .collect();
    Sequence::from_tones(tones)
}

/// How an online run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteOutcome {
    /// Nothing to join (or the list could not be fetched).
    NoSessions,
    /// The session had no sequence to play.
    NoSequence,
    /// The server reported `game_over`.
    GameOver,
    /// The status endpoint reported the session finished.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemotePhase {
    SelectingSession,
    AwaitingSequence,
    Playing(Sequence),
    Capturing(Sequence),
    Submitting(Vec<Answer>),
    WaitingForNextRound,
    Ended(RemoteOutcome),
}

/// Footer under the session list; mentions sessions that did not fit.
fn session_list_footer(hidden: usize) -> String {
    if hidden == 0 {
        String::from("Press key to select")
    } else {
        format!("Press key (+{} more)", hidden)
    }
}

/// Wait-loop wording for a failed check.
fn check_failure_text(error: ErrorKind) -> &'static str {
    match error {
        ErrorKind::ServerError(_) => "Server error",
        _ => "Connection Error",
    }
}

pub struct RemoteGame<'a, K, S, B, D, T> {
    console: &'a mut Console<K, S, B, D>,
    client: &'a mut SessionClient<T>,
    session: Option<RemoteGameSession>,
}

impl<'a, K, S, B, D, T> RemoteGame<'a, K, S, B, D, T>
where
    K: KeySource,
    S: Screen,
    B: Buzzer,
    D: DelayNs,
    T: HttpTransport,
{
    pub fn new(console: &'a mut Console<K, S, B, D>, client: &'a mut SessionClient<T>) -> Self {
        Self {
            console,
            client,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&RemoteGameSession> {
        self.session.as_ref()
    }

    async fn show_error(&mut self, error: ErrorKind) {
        self.console
            .notice(error.message(), ERROR_ROW, NOTICE_HOLD_MS)
            .await;
    }

    fn draw_session_list(&mut self, sessions: &[SessionSummary], hidden: usize) {
        let footer = session_list_footer(hidden);
        self.console.screen.numbered_list(
            "Select a game:",
            sessions.iter().map(|s| s.nickname.as_str()),
            &footer,
        );
    }

    /// List joinable sessions and let the player pick one with `S1`..`Sn`.
    ///
    /// A failed request is shown first and then treated like an empty list:
    /// either way the result is `EmptyResult`.
    pub async fn select_session(&mut self) -> Result<RemoteGameSession, ErrorKind> {
        let mut sessions = match self.client.list_sessions().await {
            Ok(sessions) => sessions,
            Err(e) => {
                self.show_error(e).await;
                Vec::new()
            }
        };
        if sessions.is_empty() {
            info!("Remote: no sessions");
            self.console
                .notice("No games found", ERROR_ROW, NOTICE_HOLD_MS)
                .await;
            return Err(ErrorKind::EmptyResult);
        }
        let hidden = sessions.len().saturating_sub(MAX_LISTED_SESSIONS);
        sessions.truncate(MAX_LISTED_SESSIONS);
        self.draw_session_list(&sessions, hidden);

        let index = loop {
            let Some(key) = self.console.keys.scan().await else {
                self.console.pause(SELECT_POLL_MS).await;
                continue;
            };
            match key.choice(sessions.len()) {
                Some(n) => break n - 1,
                None => {
                    self.show_error(ErrorKind::InvalidKey).await;
                    self.draw_session_list(&sessions, hidden);
                }
            }
        };

        let chosen = RemoteGameSession::selected(sessions.swap_remove(index));
        info!("Remote: selected session {}", chosen.id());
        let text = format!("Selected: {}", chosen.nickname());
        self.console.notice(&text, NOTICE_ROW, NOTICE_HOLD_MS).await;
        Ok(chosen)
    }

    /// Fetch the session and return its sequence.
    ///
    /// A failed request is shown and then counts as no sequence.
    pub async fn await_sequence(&mut self) -> Result<Sequence, ErrorKind> {
        let id = self
            .session
            .as_ref()
            .map(|s| String::from(s.id()))
            .ok_or(ErrorKind::EmptyResult)?;
        let snapshot = match self.client.fetch_session(&id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.show_error(e).await;
                return Err(ErrorKind::EmptyResult);
            }
        };
        let session = self.session.as_mut().ok_or(ErrorKind::EmptyResult)?;
        session.refresh(snapshot);
        let sequence = session.current_sequence();
        if sequence.is_empty() {
            return Err(ErrorKind::EmptyResult);
        }
        Ok(sequence)
    }

    /// Announce and play the round's tones.
    pub async fn play(&mut self, sequence: &Sequence) {
        self.console.screen.clear();
        self.console.screen.text("Playing...", 0, 0);
        debug!("Remote: playing {} tones", sequence.len());
        self.console.tones.play_sequence(sequence.tones()).await;
        self.console.screen.clear();
    }

    fn draw_capture_prompt(&mut self, entered: usize, length: usize) {
        self.console.screen.clear();
        self.console.screen.text("Enter sequence:", 0, 0);
        if entered > 0 {
            self.draw_progress(entered, length);
        }
    }

    fn draw_progress(&mut self, entered: usize, length: usize) {
        let progress = format!("{}/{}", entered, length);
        self.console.screen.line(&progress, 10);
    }

    /// Collect `length` answers from keys `S5`..`S11`.
    pub async fn capture(&mut self, length: usize) -> Vec<Answer> {
        let mut answers = Vec::with_capacity(length);
        self.draw_capture_prompt(0, length);

        while answers.len() < length {
            let Some(key) = self.console.keys.scan().await else {
                continue;
            };
            match Answer::from_key(key) {
                Some(answer) => {
                    answers.push(answer);
                    debug!("Remote: answer {}", answer.value());
                    self.draw_progress(answers.len(), length);
                }
                None => {
                    self.show_error(ErrorKind::InvalidKey).await;
                    self.draw_capture_prompt(answers.len(), length);
                }
            }
        }
        answers
    }

    /// Send one tone per answer. Failures are shown and otherwise ignored.
    pub async fn submit(&mut self, answers: &[Answer]) {
        let Some(id) = self.session.as_ref().map(|s| String::from(s.id())) else {
            return;
        };
        let tones: Vec<Tone> = answers.iter().map(|a| a.tone()).collect();
        let text = match self.client.submit(&id, &tones).await {
            Ok(()) => {
                info!("Remote: sent {} tones", tones.len());
                "Result sent!"
            }
            Err(ErrorKind::ServerError(_)) => "Error sending result",
            Err(_) => "Send Error",
        };
        self.console.overlay(text, NOTICE_ROW, NOTICE_HOLD_MS).await;
    }

    fn draw_waiting(&mut self) {
        self.console.screen.clear();
        self.console.screen.text("Waiting for new round", 0, 0);
        self.console.screen.text("Press 1 to check status", 0, 10);
    }

    /// Poll the keypad until a status check moves the run on.
    pub async fn wait_for_next_round(&mut self) -> RemotePhase {
        let Some(id) = self.session.as_ref().map(|s| String::from(s.id())) else {
            return RemotePhase::Ended(RemoteOutcome::NoSequence);
        };
        self.draw_waiting();

        loop {
            match self.console.keys.scan().await {
                Some(Key::S1) => {}
                Some(_) => continue,
                None => {
                    self.console.pause(SELECT_POLL_MS).await;
                    continue;
                }
            }

            info!("Remote: checking status");
            match self.check_round(&id).await {
                Ok(Some(next)) => return next,
                Ok(None) => {}
                Err(e) if e.is_recoverable() => {
                    self.console
                        .overlay(check_failure_text(e), NOTICE_ROW, NOTICE_HOLD_MS)
                        .await;
                }
                Err(_) => return RemotePhase::Ended(RemoteOutcome::NoSequence),
            }
            self.draw_waiting();
        }
    }

    /// One manual status check. `Ok(None)` means keep waiting; an
    /// unrecoverable error ends the run.
    async fn check_round(&mut self, id: &str) -> Result<Option<RemotePhase>, ErrorKind> {
        let snapshot = self.client.fetch_session(id).await?;
        let session = self.session.as_mut().ok_or(ErrorKind::EmptyResult)?;
        session.refresh(snapshot);

        if session.state() == RemoteState::GameOver {
            self.console.notice("Game Over", 0, NOTICE_HOLD_MS).await;
            return Ok(Some(RemotePhase::Ended(RemoteOutcome::GameOver)));
        }
        if !session.is_completed() {
            let sequence = session.current_sequence();
            if sequence.is_empty() {
                return Err(ErrorKind::EmptyResult);
            }
            info!("Remote: new round, {} tones", sequence.len());
            return Ok(Some(RemotePhase::Playing(sequence)));
        }

        match self.client.session_status(id).await? {
            SessionStatus::Finished => {
                self.console.notice("Game finished", 0, NOTICE_HOLD_MS).await;
                Ok(Some(RemotePhase::Ended(RemoteOutcome::Finished)))
            }
            SessionStatus::InProgress => Ok(None),
        }
    }

    /// Do one phase's work and return the next phase.
    pub async fn step(&mut self, phase: RemotePhase) -> RemotePhase {
        match phase {
            RemotePhase::SelectingSession => match self.select_session().await {
                Ok(session) => {
                    self.session = Some(session);
                    RemotePhase::AwaitingSequence
                }
                Err(e) => {
                    debug!("Remote: selection ended: {}", e.message());
                    RemotePhase::Ended(RemoteOutcome::NoSessions)
                }
            },
            RemotePhase::AwaitingSequence => match self.await_sequence().await {
                Ok(sequence) => RemotePhase::Playing(sequence),
                Err(e) => {
                    debug!("Remote: no sequence: {}", e.message());
                    RemotePhase::Ended(RemoteOutcome::NoSequence)
                }
            },
            RemotePhase::Playing(sequence) => {
                self.play(&sequence).await;
                RemotePhase::Capturing(sequence)
            }
            RemotePhase::Capturing(sequence) => {
                RemotePhase::Submitting(self.capture(sequence.len()).await)
            }
            RemotePhase::Submitting(answers) => {
                self.submit(&answers).await;
                RemotePhase::WaitingForNextRound
            }
            RemotePhase::WaitingForNextRound => self.wait_for_next_round().await,
            RemotePhase::Ended(outcome) => RemotePhase::Ended(outcome),
        }
    }

    /// Join a session and play its rounds until it ends.
    pub async fn run(mut self) -> RemoteOutcome {
        info!("Remote: game start");
        self.console.screen.clear();

        let mut phase = RemotePhase::SelectingSession;
        let outcome = loop {
            phase = match phase {
                RemotePhase::Ended(outcome) => break outcome,
                other => self.step(other).await,
            };
        };
        info!("Remote: {:?}", outcome);
        self.console.screen.clear();
        outcome
    }
}
