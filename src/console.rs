//! The device collaborators a game mode drives.
//!
//! A `Console` bundles the key source, the presenter, the tone board and a
//! delay. Each mode borrows it for one run; nothing else touches the
//! hardware meanwhile, so there is no locking.

use embedded_hal_async::delay::DelayNs;

use crate::tone::{Buzzer, ToneBoard};
use crate::ui::{KeySource, Presenter, Screen};

pub struct Console<K, S, B, D> {
    pub(crate) keys: K,
    pub(crate) screen: Presenter<S>,
    pub(crate) tones: ToneBoard<B, D>,
    pub(crate) delay: D,
}

impl<K, S, B, D> Console<K, S, B, D>
where
    K: KeySource,
    S: Screen,
    B: Buzzer,
    D: DelayNs,
{
    pub fn new(keys: K, screen: Presenter<S>, tones: ToneBoard<B, D>, delay: D) -> Self {
        Self {
            keys,
            screen,
            tones,
            delay,
        }
    }

    pub fn presenter(&self) -> &Presenter<S> {
        &self.screen
    }

    /// Block for `ms` milliseconds.
    pub async fn pause(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }

    /// Clear the screen, show `text` at row `y` and hold it.
    pub async fn notice(&mut self, text: &str, y: i32, hold_ms: u32) {
        self.screen.message(text, y);
        self.pause(hold_ms).await;
    }

    /// Show `text` on row `y` without clearing the rest, and hold it.
    pub async fn overlay(&mut self, text: &str, y: i32, hold_ms: u32) {
        self.screen.line(text, y);
        self.pause(hold_ms).await;
    }
}
