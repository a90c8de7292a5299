//! Key labels and the two key → tone translation layers.
//!
//! The keypad reports logical labels `S1`..`S16`. Which labels mean what
//! depends on the context:
//!
//! - menus use `S1`..`S4` (and `S1`..`Sn` to pick a listed session);
//! - local play maps tone keys straight onto the palette:
//!   `palette[key - 5]` for `S5`..`S11`;
//! - online play stores an [`Answer`] per key, whose 1-based answer value is
//!   `key - 4`, and translates it back through `palette[key - 5]` before
//!   sending.
//!
//! The layers are separate types so they cannot be mixed up.

use core::fmt;

use crate::config::{ANSWER_OFFSET, FIRST_TONE_KEY, KEYPAD_COLS, KEYPAD_ROWS, PALETTE};
use crate::tone::Tone;

/// Number of keys on the matrix.
pub const KEY_COUNT: u8 = (KEYPAD_ROWS * KEYPAD_COLS) as u8;

/// Last key label that maps to a tone.
pub const LAST_TONE_KEY: u8 = FIRST_TONE_KEY + PALETTE.len() as u8 - 1;

/// A logical key label, `S1`..`S16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Key(u8);

impl Key {
    pub const S1: Key = Key(1);
    pub const S2: Key = Key(2);
    pub const S3: Key = Key(3);
    pub const S4: Key = Key(4);

    /// Key with label number `n`, if it exists on the matrix.
    pub const fn new(n: u8) -> Option<Key> {
        if n >= 1 && n <= KEY_COUNT {
            Some(Key(n))
        } else {
            None
        }
    }

    /// Key at a matrix position (row-major).
    pub fn at(row: usize, col: usize) -> Option<Key> {
        if row < KEYPAD_ROWS && col < KEYPAD_COLS {
            Key::new((row * KEYPAD_COLS + col + 1) as u8)
        } else {
            None
        }
    }

    /// The numeric suffix of the label.
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Screen label, e.g. `"S7"`.
    pub fn label(self) -> heapless::String<4> {
        let mut s = heapless::String::new();
        let _ = fmt::write(&mut s, format_args!("S{}", self.0));
        s
    }

    /// Local mode: the tone this key plays, `palette[key - 5]`.
    pub fn local_tone(self) -> Option<Tone> {
        self.0
            .checked_sub(FIRST_TONE_KEY)
            .and_then(|index| PALETTE.get(usize::from(index)))
            .copied()
    }

    /// Local mode, reverse direction: the key that plays `tone`.
    pub fn for_tone(tone: Tone) -> Option<Key> {
        tone.palette_index()
            .and_then(|index| Key::new(FIRST_TONE_KEY + index as u8))
    }

    /// Menu mode: 1-based choice this key selects among `count` entries.
    pub fn choice(self, count: usize) -> Option<usize> {
        let n = usize::from(self.0);
        (n <= count).then_some(n)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Online mode: one captured answer.
///
/// Valid only for keys `S5`..`S11`. The answer value is the 1-based
/// position the player picked (`S5` → 1); the tone sent to the server is
/// `palette[key - 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Answer {
    key: Key,
}

impl Answer {
    pub fn from_key(key: Key) -> Option<Answer> {
        (FIRST_TONE_KEY..=LAST_TONE_KEY)
            .contains(&key.number())
            .then_some(Answer { key })
    }

    /// Rebuild an answer from its 1-based value.
    pub fn from_value(value: u8) -> Option<Answer> {
        value
            .checked_add(ANSWER_OFFSET)
            .and_then(Key::new)
            .and_then(Answer::from_key)
    }

    /// 1-based answer value, `key - 4`.
    pub fn value(self) -> u8 {
        self.key.number() - ANSWER_OFFSET
    }

    /// Tone transmitted for this answer, `palette[key - 5]`.
    pub fn tone(self) -> Tone {
        PALETTE[usize::from(self.key.number() - FIRST_TONE_KEY)]
    }
}
