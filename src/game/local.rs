//! Offline play.
//!
//! ```text
//! MenuVisible ──S1──▶ Playing ──▶ Capturing ──▶ Evaluating ──┐
//!      ▲  │                                                  │
//!      │  └──S2──▶ Ended(Quit)          lives > 0 ◀──────────┤
//!      └─────────────────────────────────────────────────────┘
//!                                       lives == 0 ──▶ Ended(GameOver)
//! ```
//!
//! Capture has no timeout and no cancel key: once a round starts the
//! player has to enter the full sequence.

use alloc::vec::Vec;

use embedded_hal_async::delay::DelayNs;
use rand::RngCore;

use crate::config::{
    FAREWELL_HOLD_MS, INVALID_KEY_HOLD_MS, KEY_ACCEPT_PAUSE_MS, PRE_PLAYBACK_PAUSE_MS,
    ROUND_REWARD, SCREEN_WIDTH, STARTING_LIVES, VERDICT_HOLD_MS,
};
use crate::console::Console;
use crate::keymap::Key;
use crate::tone::{sequence_len, Buzzer, Sequence, Tone};
use crate::ui::presenter::{FOOTER_ROW, VERDICT_ROW};
use crate::ui::{KeySource, Screen};

/// Lives and score of one local game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameSession {
    lives: u8,
    score: u32,
    running: bool,
}

/// Result of comparing one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::with_progress(STARTING_LIVES, 0)
    }

    /// A session that already has some lives lost or points earned.
    pub fn with_progress(lives: u8, score: u32) -> Self {
        Self {
            lives,
            score,
            running: true,
        }
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Rounds are still being played.
    pub fn is_active(&self) -> bool {
        self.running && self.lives > 0
    }

    /// Length of the next sequence.
    pub fn sequence_len(&self) -> usize {
        sequence_len(self.score)
    }

    /// Score one round: a full match earns [`ROUND_REWARD`], anything else
    /// costs a life. Never both.
    pub fn evaluate(&mut self, correct: &Sequence, entered: &[Tone]) -> Verdict {
        if correct.matches(entered) {
            self.score += ROUND_REWARD;
            Verdict::Correct
        } else {
            self.lives = self.lives.saturating_sub(1);
            Verdict::Incorrect
        }
    }

    /// Player chose to leave.
    pub fn stop(&mut self) {
        self.running = false;
    }
}

/// How a local game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LocalOutcome {
    /// Player pressed exit in the menu.
    Quit { score: u32 },
    /// Lives ran out.
    GameOver { score: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalState {
    MenuVisible,
    Playing(Sequence),
    Capturing(Sequence),
    Evaluating { correct: Sequence, entered: Vec<Tone> },
    Ended(LocalOutcome),
}

pub struct LocalGame<'a, K, S, B, D, R> {
    console: &'a mut Console<K, S, B, D>,
    rng: &'a mut R,
    session: GameSession,
    menu_visible: bool,
}

impl<'a, K, S, B, D, R> LocalGame<'a, K, S, B, D, R>
where
    K: KeySource,
    S: Screen,
    B: Buzzer,
    D: DelayNs,
    R: RngCore,
{
    pub fn new(console: &'a mut Console<K, S, B, D>, rng: &'a mut R) -> Self {
        Self::resume(console, rng, GameSession::new())
    }

    /// Continue from an existing session.
    pub fn resume(console: &'a mut Console<K, S, B, D>, rng: &'a mut R, session: GameSession) -> Self {
        Self {
            console,
            rng,
            session,
            menu_visible: true,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Fresh sequence for the current score.
    pub fn generate_sequence(&mut self) -> Sequence {
        Sequence::generate(self.session.score(), self.rng)
    }

    /// Announce and play `sequence`. Blocks for the whole playback.
    pub async fn play_sequence(&mut self, sequence: &Sequence) {
        self.console.screen.clear();
        self.console.screen.text("Playing song...", 0, 0);
        debug!("Local: playing {} tones", sequence.len());
        self.console.pause(PRE_PLAYBACK_PAUSE_MS).await;
        self.console.tones.play_sequence(sequence.tones()).await;
        self.console.screen.clear();
    }

    /// Collect `length` tone keys. Other keys are rejected with a message
    /// and do not count.
    pub async fn capture_input(&mut self, length: usize) -> Vec<Tone> {
        self.console.screen.clear_body();
        self.console.screen.text("Your turn!", 0, 0);
        self.console.screen.begin_echo();

        let mut entered = Vec::with_capacity(length);
        while entered.len() < length {
            let Some(key) = self.console.keys.scan().await else {
                continue;
            };
            match key.local_tone() {
                Some(tone) => {
                    entered.push(tone);
                    self.console.screen.echo_key(key);
                    self.console.pause(KEY_ACCEPT_PAUSE_MS).await;
                }
                None => self.reject_key(key).await,
            }
        }
        entered
    }

    async fn reject_key(&mut self, key: Key) {
        debug!("Local: rejected key {}", key.number());
        let screen = &mut self.console.screen;
        screen.clear_area(0, FOOTER_ROW, SCREEN_WIDTH, 10);
        screen.text("Invalid key!", 0, FOOTER_ROW);
        self.console.pause(INVALID_KEY_HOLD_MS).await;
        self.console
            .screen
            .clear_area(0, FOOTER_ROW, SCREEN_WIDTH, 10);
    }

    /// Score the round, show what was entered, then bring the menu back.
    pub async fn evaluate(&mut self, correct: &Sequence, entered: &[Tone]) -> Verdict {
        let entries: Vec<(Key, bool)> = entered
            .iter()
            .zip(correct.tones())
            .filter_map(|(e, c)| Key::for_tone(*e).map(|key| (key, e == c)))
            .collect();

        let verdict = self.session.evaluate(correct, entered);
        info!(
            "Local: {:?}, lives={} score={}",
            verdict,
            self.session.lives(),
            self.session.score()
        );

        self.console.screen.verdict(&entries);
        let text = match verdict {
            Verdict::Correct => "Correct!",
            Verdict::Incorrect => "Incorrect!",
        };
        self.console.screen.text(text, 0, VERDICT_ROW);
        self.console.pause(VERDICT_HOLD_MS).await;

        self.console.screen.clear();
        self.console
            .screen
            .header(self.session.lives(), self.session.score());
        self.menu_visible = true;
        self.console.screen.game_menu(true);
        verdict
    }

    /// Do one state's work and return the next state.
    pub async fn step(&mut self, state: LocalState) -> LocalState {
        match state {
            LocalState::MenuVisible => {
                if !self.session.is_active() {
                    return self.ended();
                }
                self.console
                    .screen
                    .header(self.session.lives(), self.session.score());
                self.console.screen.game_menu(self.menu_visible);

                match self.console.keys.scan().await {
                    Some(Key::S1) => {
                        self.menu_visible = false;
                        let sequence = self.generate_sequence();
                        info!("Local: new round, {} tones", sequence.len());
                        LocalState::Playing(sequence)
                    }
                    Some(Key::S2) if self.menu_visible => {
                        self.session.stop();
                        self.ended()
                    }
                    _ => LocalState::MenuVisible,
                }
            }
            LocalState::Playing(sequence) => {
                self.play_sequence(&sequence).await;
                LocalState::Capturing(sequence)
            }
            LocalState::Capturing(sequence) => {
                let entered = self.capture_input(sequence.len()).await;
                LocalState::Evaluating {
                    correct: sequence,
                    entered,
                }
            }
            LocalState::Evaluating { correct, entered } => {
                self.evaluate(&correct, &entered).await;
                if self.session.is_active() {
                    LocalState::MenuVisible
                } else {
                    self.ended()
                }
            }
            LocalState::Ended(outcome) => LocalState::Ended(outcome),
        }
    }

    fn ended(&self) -> LocalState {
        let score = self.session.score();
        if self.session.lives() == 0 {
            LocalState::Ended(LocalOutcome::GameOver { score })
        } else {
            LocalState::Ended(LocalOutcome::Quit { score })
        }
    }

    /// Play until the player quits or runs out of lives.
    pub async fn run(mut self) -> LocalOutcome {
        info!("Local: game start");
        self.console.screen.clear();

        let mut state = LocalState::MenuVisible;
        let outcome = loop {
            state = match state {
                LocalState::Ended(outcome) => break outcome,
                other => self.step(other).await,
            };
        };

        let farewell = match outcome {
            LocalOutcome::GameOver { .. } => "Game Over!",
            LocalOutcome::Quit { .. } => "Thanks for playing!",
        };
        info!("Local: {:?}", outcome);
        self.console.notice(farewell, 0, FAREWELL_HOLD_MS).await;
        outcome
    }
}
