//! Pico W drivers behind the library's collaborator traits.

pub mod buzzer;
pub mod display;
pub mod wifi;
