//! 4×4 key matrix scanning with debouncing.
//!
//! Rows are outputs, columns are inputs with pull-downs. A scan drives each
//! row high in turn and samples the columns; the first closed contact wins.
//! After a hit the scanner holds for [`KEY_DEBOUNCE_MS`] before reporting,
//! so one physical press yields one key per scan.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::config::{KEYPAD_COLS, KEYPAD_ROWS, KEYPAD_ROW_SETTLE_US, KEY_DEBOUNCE_MS};
use crate::keymap::Key;
use crate::ui::KeySource;

pub struct MatrixKeypad<O, I, D> {
    rows: [O; KEYPAD_ROWS],
    cols: [I; KEYPAD_COLS],
    delay: D,
}

impl<O, I, D> MatrixKeypad<O, I, D>
where
    O: OutputPin,
    I: InputPin,
    D: DelayNs,
{
    pub fn new(mut rows: [O; KEYPAD_ROWS], cols: [I; KEYPAD_COLS], delay: D) -> Self {
        for row in rows.iter_mut() {
            let _ = row.set_low();
        }
        Self { rows, cols, delay }
    }
}

impl<O, I, D> KeySource for MatrixKeypad<O, I, D>
where
    O: OutputPin,
    I: InputPin,
    D: DelayNs,
{
    async fn scan(&mut self) -> Option<Key> {
        for (r, row) in self.rows.iter_mut().enumerate() {
            let _ = row.set_high();
            self.delay.delay_us(KEYPAD_ROW_SETTLE_US).await;

            for (c, col) in self.cols.iter_mut().enumerate() {
                // A pin read error counts as "not pressed".
                if col.is_high().unwrap_or(false) {
                    self.delay.delay_ms(KEY_DEBOUNCE_MS).await;
                    let _ = row.set_low();
                    let key = Key::at(r, c);
                    if let Some(key) = key {
                        debug!("Keypad: {}", key.number());
                    }
                    return key;
                }
            }

            let _ = row.set_low();
        }
        None
    }
}
