//! tonepad: a "Simon says" memory game for a 4×4 keypad, a 128×64 OLED and
//! a piezo buzzer, with an online mode played against a scoring server.
//!
//! Everything here is hardware-independent and runs on the host: the game
//! state machines, key and tone mapping, screen layout and the HTTP
//! contracts. The firmware binary (`src/main.rs`, `embedded` feature) only
//! wires board drivers into the traits defined below.
//!
//! Usage: `cargo test` for the host suite,
//! `cargo run --release --features embedded --target thumbv6m-none-eabi`
//! to flash a Pico W through probe-rs.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod app;
pub mod config;
pub mod console;
pub mod error;
pub mod game;
pub mod high_score;
pub mod keymap;
pub mod net;
pub mod tone;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use app::{Activity, App, MenuItem};
pub use console::Console;
pub use error::{ErrorKind, TransportError};
pub use keymap::{Answer, Key};
pub use tone::{Buzzer, Sequence, Tone, ToneBoard};
