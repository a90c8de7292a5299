//! Application-wide constants and compile-time configuration.
//!
//! All gameplay rules, timing parameters, API paths and hardware pin
//! assignments live here so they can be tuned in one place.

use crate::tone::Tone;

// Tones

/// The tone palette: C4, D4, E4, F4, G4, A4, B4.
pub const PALETTE: [Tone; 7] = [
    Tone::from_hz(262),
    Tone::from_hz(294),
    Tone::from_hz(330),
    Tone::from_hz(349),
    Tone::from_hz(392),
    Tone::from_hz(440),
    Tone::from_hz(494),
];

/// How long a single tone sounds during playback (ms).
pub const TONE_DURATION_MS: u32 = 500;

/// Silence after each tone during playback (ms).
pub const TONE_GAP_MS: u32 = 300;

/// Pause between "Playing song..." and the first tone (ms).
pub const PRE_PLAYBACK_PAUSE_MS: u32 = 1000;

/// Buzzer PWM duty cycle while a tone sounds (percent).
pub const BUZZER_DUTY_PERCENT: u8 = 10;

// Gameplay

/// Lives at the start of a local game.
pub const STARTING_LIVES: u8 = 3;

/// Points awarded for a correctly repeated sequence.
pub const ROUND_REWARD: u32 = 10;

/// Length of the first sequence.
pub const BASE_SEQUENCE_LEN: usize = 3;

/// Every `SCORE_STEP` points add one tone to the sequence.
pub const SCORE_STEP: u32 = 10;

// Keypad
//
// The 4x4 matrix is labelled S1..S16 row-major:
//
//   S1  S2  S3  S4     menu / control keys
//   S5  S6  S7  S8     S5..S11 are the seven tone keys
//   S9  S10 S11 S12
//   S13 S14 S15 S16

/// Rows in the key matrix.
pub const KEYPAD_ROWS: usize = 4;

/// Columns in the key matrix.
pub const KEYPAD_COLS: usize = 4;

/// First key label that maps to a tone (S5 -> palette[0]).
pub const FIRST_TONE_KEY: u8 = 5;

/// Offset between a remote answer key and its 1-based answer value (S5 -> 1).
pub const ANSWER_OFFSET: u8 = 4;

/// Debounce hold after a detected key press (ms).
pub const KEY_DEBOUNCE_MS: u32 = 300;

/// Settle time after driving a matrix row before sampling columns (µs).
pub const KEYPAD_ROW_SETTLE_US: u32 = 10;

/// Pause after accepting a tone key during capture (ms).
pub const KEY_ACCEPT_PAUSE_MS: u32 = 300;

/// Idle time between polls while waiting for a session choice (ms).
pub const SELECT_POLL_MS: u32 = 100;

// Screen (128x64 monochrome OLED)

pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;

/// Vertical distance between text rows (px).
pub const LINE_HEIGHT: i32 = 10;

/// Horizontal pitch of echoed key labels (px).
pub const KEY_ECHO_PITCH: i32 = 16;

/// Session rows that fit between the title and the footer.
pub const MAX_LISTED_SESSIONS: usize = 4;

/// Entries shown on the high score screen.
pub const HIGH_SCORE_ROWS: usize = 5;

// Message hold times (ms)

pub const INVALID_KEY_HOLD_MS: u32 = 1000;
pub const VERDICT_HOLD_MS: u32 = 2000;
pub const FAREWELL_HOLD_MS: u32 = 3000;
pub const NOTICE_HOLD_MS: u32 = 2000;
pub const HIGH_SCORE_HOLD_MS: u32 = 5000;

// Server API

/// Base URL of the scoring server. Override at build time with
/// `TONEPAD_SERVER_URL=https://...`.
pub const SERVER_URL: &str = match option_env!("TONEPAD_SERVER_URL") {
    Some(url) => url,
    None => "http://192.168.4.1:3000",
};

pub const PATH_IN_PROGRESS: &str = "/api/games/in-progress";
pub const PATH_GAME: &str = "/api/game";
pub const PATH_GAME_UPDATE: &str = "/api/game/update";
pub const PATH_GAME_STATUS: &str = "/api/game/status";
pub const PATH_HIGH_SCORES: &str = "/api/highscores";

/// `gameState` value that ends an online game.
pub const GAME_STATE_OVER: &str = "game_over";

/// `status` value reported once a session is finished.
pub const STATUS_FINISHED: &str = "finished";

// Wi-Fi

pub const WIFI_SSID: &str = match option_env!("TONEPAD_WIFI_SSID") {
    Some(ssid) => ssid,
    None => "tonepad",
};

pub const WIFI_PASSWORD: &str = match option_env!("TONEPAD_WIFI_PASSWORD") {
    Some(password) => password,
    None => "",
};

/// Join attempts before the device falls back to offline play.
pub const WIFI_JOIN_ATTEMPTS: u8 = 5;

// GPIO pin assignments (Raspberry Pi Pico W)
//
// These are logical names; the actual `embassy_rp::peripherals::*` are
// picked in `main.rs`.  Adjust for your own wiring.
//
//   Keypad rows (out)   → GP6, GP7, GP8, GP9
//   Keypad cols (in)    → GP10, GP11, GP12, GP14 (pull-down)
//   Buzzer (PWM6 B)     → GP13
//   I²C0 SDA            → GP4
//   I²C0 SCL            → GP5
//   CYW43 (PIO0 SPI)    → GP23, GP24, GP25, GP29

/// RP2040 system clock used for PWM divider math (Hz).
pub const SYS_CLOCK_HZ: u32 = 125_000_000;
