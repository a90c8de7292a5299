//! Game views on top of a [`Screen`].
//!
//! The presenter owns the screen and remembers the last header, game menu
//! and main menu it drew. Asking for the same view again is a no-op; any
//! clear that touches a view's region forgets it so the next request
//! redraws. No game rules live here.

use core::fmt::Write;

use crate::config::{KEY_ECHO_PITCH, LINE_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::keymap::Key;
use crate::ui::{Ink, Screen};

/// Top band: hearts on the left, score on the right.
const HEADER_HEIGHT: i32 = 10;

/// Where the game menu and the entry rows start.
pub const BODY_TOP: i32 = 20;

/// Height of the body band cleared between phases.
pub const BODY_HEIGHT: u32 = SCREEN_HEIGHT - BODY_TOP as u32;

/// Row used for transient error messages.
pub const FOOTER_ROW: i32 = 50;

/// Row used for round verdicts ("Correct!").
pub const VERDICT_ROW: i32 = 30;

/// Row used for one-line notices ("Result sent!").
pub const NOTICE_ROW: i32 = 40;

/// X where the score text starts.
const SCORE_X: i32 = 64;

/// Horizontal distance between hearts.
const HEART_PITCH: i32 = 8;

/// Menu shown between local rounds.
const GAME_MENU: [&str; 2] = ["1: New Song", "2: Exit"];

/// What the header shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderState {
    pub lives: u8,
    pub score: u32,
}

/// Left-to-right cursor for echoing entered keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct EchoCursor {
    x: i32,
    y: i32,
}

impl EchoCursor {
    const fn start() -> Self {
        Self { x: 0, y: BODY_TOP }
    }

    /// Current slot, then move on (wrapping to the next row past the edge).
    fn advance(&mut self) -> (i32, i32) {
        let slot = (self.x, self.y);
        self.x += KEY_ECHO_PITCH;
        if self.x > SCREEN_WIDTH as i32 {
            self.x = 0;
            self.y += LINE_HEIGHT;
        }
        slot
    }
}

pub struct Presenter<S> {
    screen: S,
    header: Option<HeaderState>,
    game_menu: Option<bool>,
    main_menu: Option<usize>,
    echo: EchoCursor,
}

impl<S: Screen> Presenter<S> {
    pub fn new(screen: S) -> Self {
        Self {
            screen,
            header: None,
            game_menu: None,
            main_menu: None,
            echo: EchoCursor::start(),
        }
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Last header drawn, if it is still on screen.
    pub fn last_header(&self) -> Option<HeaderState> {
        self.header
    }

    fn forget_all(&mut self) {
        self.header = None;
        self.game_menu = None;
        self.main_menu = None;
    }

    fn forget_region(&mut self, y: i32, height: u32) {
        let bottom = y + height as i32;
        if y < HEADER_HEIGHT {
            self.header = None;
        }
        if y < BODY_TOP + 2 * LINE_HEIGHT && bottom > BODY_TOP {
            self.game_menu = None;
        }
        self.main_menu = None;
    }

    pub fn clear(&mut self) {
        self.screen.clear();
        self.screen.show();
        self.forget_all();
    }

    pub fn clear_area(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.screen.clear_area(x, y, width, height);
        self.screen.show();
        self.forget_region(y, height);
    }

    /// Clear the body band below the header.
    pub fn clear_body(&mut self) {
        self.clear_area(0, BODY_TOP, SCREEN_WIDTH, BODY_HEIGHT);
    }

    /// Draw one line of text and show it.
    pub fn text(&mut self, text: &str, x: i32, y: i32) {
        self.screen.text(text, x, y, Ink::Normal);
        self.screen.show();
    }

    /// Replace one text row with `text`.
    pub fn line(&mut self, text: &str, y: i32) {
        self.screen.clear_area(0, y, SCREEN_WIDTH, LINE_HEIGHT as u32);
        self.forget_region(y, LINE_HEIGHT as u32);
        self.text(text, 0, y);
    }

    /// Clear the screen and show a single message at `y`.
    pub fn message(&mut self, text: &str, y: i32) {
        self.screen.clear();
        self.forget_all();
        self.text(text, 0, y);
    }

    /// Hearts for lives and the score. Redraws only when either changed.
    pub fn header(&mut self, lives: u8, score: u32) -> bool {
        let state = HeaderState { lives, score };
        if self.header == Some(state) {
            return false;
        }

        self.screen
            .clear_area(0, 0, SCREEN_WIDTH, HEADER_HEIGHT as u32);
        for i in 0..i32::from(lives) {
            self.screen.heart(2 + i * HEART_PITCH, 2);
        }
        let mut score_text: heapless::String<20> = heapless::String::new();
        let _ = write!(score_text, "Score: {}", score);
        self.screen.text(&score_text, SCORE_X, 0, Ink::Normal);
        self.screen.show();

        self.header = Some(state);
        true
    }

    /// The between-rounds menu, or an empty body when hidden.
    pub fn game_menu(&mut self, visible: bool) -> bool {
        if self.game_menu == Some(visible) {
            return false;
        }

        if visible {
            for (row, item) in GAME_MENU.iter().enumerate() {
                self.screen
                    .text(item, 0, BODY_TOP + row as i32 * LINE_HEIGHT, Ink::Normal);
            }
        } else {
            self.screen
                .clear_area(0, BODY_TOP, SCREEN_WIDTH, BODY_HEIGHT);
        }
        self.screen.show();

        self.game_menu = Some(visible);
        true
    }

    /// Top-level menu; the selected row is marked with `"> "`.
    pub fn main_menu(&mut self, items: &[&str], selected: usize) -> bool {
        if self.main_menu == Some(selected) {
            return false;
        }

        self.screen.clear();
        self.header = None;
        self.game_menu = None;
        for (row, item) in items.iter().enumerate() {
            let y = row as i32 * LINE_HEIGHT;
            if row == selected {
                let mut marked: heapless::String<24> = heapless::String::new();
                let _ = write!(marked, "> {}", item);
                self.screen.text(&marked, 0, y, Ink::Normal);
            } else {
                self.screen.text(item, 10, y, Ink::Normal);
            }
        }
        self.screen.show();

        self.main_menu = Some(selected);
        true
    }

    /// Start echoing entered keys at the top of the body.
    pub fn begin_echo(&mut self) {
        self.echo = EchoCursor::start();
    }

    /// Echo one accepted key in the next slot.
    pub fn echo_key(&mut self, key: Key) {
        let (x, y) = self.echo.advance();
        self.screen.text(&key.label(), x, y, Ink::Normal);
        self.screen.show();
    }

    /// Show the entered keys, inverting the wrong ones.
    pub fn verdict(&mut self, entries: &[(Key, bool)]) {
        self.screen
            .clear_area(0, BODY_TOP, SCREEN_WIDTH, BODY_HEIGHT);
        self.game_menu = None;

        let mut cursor = EchoCursor::start();
        for (key, correct) in entries {
            let (x, y) = cursor.advance();
            let ink = if *correct { Ink::Normal } else { Ink::Inverted };
            self.screen.text(&key.label(), x, y, ink);
        }
        self.screen.show();
    }

    /// Numbered list of names under a title, with a footer hint.
    pub fn numbered_list<'a, I>(&mut self, title: &str, names: I, footer: &str)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.screen.clear();
        self.forget_all();
        self.screen.text(title, 0, 0, Ink::Normal);
        for (i, name) in names.into_iter().enumerate() {
            let mut row: heapless::String<32> = heapless::String::new();
            let _ = write!(row, "{}: {}", i + 1, name);
            self.screen
                .text(&row, 0, LINE_HEIGHT + i as i32 * LINE_HEIGHT, Ink::Normal);
        }
        self.screen.text(footer, 0, FOOTER_ROW, Ink::Normal);
        self.screen.show();
    }
}
