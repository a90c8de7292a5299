//! User interface subsystem - OLED screen + key matrix.
//!
//! ## Components
//!
//! - **Keypad**: 4×4 matrix scanned row by row with a debounce hold
//!   ([`keypad::MatrixKeypad`])
//! - **Display**: 128×64 monochrome OLED drawn with `embedded-graphics`
//!   ([`display::GraphicsScreen`])
//! - **Presenter**: game-level views on top of a [`Screen`], remembering
//!   what it last drew so unchanged views are not redrawn
//!
//! Game code only sees the two traits below, so it runs unchanged against
//! the board drivers and the recording fakes used in tests.

pub mod display;
pub mod input_logic;
pub mod keypad;
pub mod presenter;

pub use presenter::Presenter;

use crate::keymap::Key;

/// How text is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ink {
    /// Lit glyphs on a dark background.
    Normal,
    /// Dark glyphs on a lit box (used to flag wrong entries).
    Inverted,
}

/// Drawing primitives the presenter needs.
///
/// Coordinates are pixels from the top-left corner; `y` is the top of the
/// text row. Nothing reaches the panel until [`Screen::show`].
pub trait Screen {
    /// Blank the whole frame.
    fn clear(&mut self);

    /// Blank a rectangle.
    fn clear_area(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Draw one line of text.
    fn text(&mut self, text: &str, x: i32, y: i32, ink: Ink);

    /// Draw a small heart (one life) with its left edge at `x`.
    fn heart(&mut self, x: i32, y: i32);

    /// Push the frame to the panel.
    fn show(&mut self);
}

/// Source of key presses.
///
/// One call scans the keypad once and returns at most one debounced key;
/// `None` means nothing was pressed during this scan.
#[allow(async_fn_in_trait)]
pub trait KeySource {
    async fn scan(&mut self) -> Option<Key>;
}
