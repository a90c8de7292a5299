//! Leaderboard screen.

use alloc::format;
use alloc::vec::Vec;

use embedded_hal_async::delay::DelayNs;

use crate::config::{HIGH_SCORE_HOLD_MS, HIGH_SCORE_ROWS, LINE_HEIGHT, NOTICE_HOLD_MS};
use crate::console::Console;
use crate::error::ErrorKind;
use crate::net::{HttpTransport, ScoreEntry, SessionClient};
use crate::tone::Buzzer;
use crate::ui::{KeySource, Screen};

const MESSAGE_ROW: i32 = 20;

/// `"<rank>. <name> - <points>"`, rank 1-based.
pub fn score_line(rank: usize, entry: &ScoreEntry) -> alloc::string::String {
    format!("{}. {} - {}", rank, entry.name, entry.points)
}

pub struct HighScoreBoard<'a, K, S, B, D, T> {
    console: &'a mut Console<K, S, B, D>,
    client: &'a mut SessionClient<T>,
}

impl<'a, K, S, B, D, T> HighScoreBoard<'a, K, S, B, D, T>
where
    K: KeySource,
    S: Screen,
    B: Buzzer,
    D: DelayNs,
    T: HttpTransport,
{
    pub fn new(console: &'a mut Console<K, S, B, D>, client: &'a mut SessionClient<T>) -> Self {
        Self { console, client }
    }

    /// Fetch the leaderboard, reporting a failure on screen.
    async fn fetch(&mut self) -> Vec<ScoreEntry> {
        match self.client.high_scores().await {
            Ok(scores) => scores,
            Err(e) => {
                let text = match e {
                    ErrorKind::ServerError(_) => "Server error",
                    _ => "Connection Error",
                };
                self.console.overlay(text, MESSAGE_ROW, NOTICE_HOLD_MS).await;
                Vec::new()
            }
        }
    }

    /// Show up to five entries. Returns how many were shown.
    pub async fn show(mut self) -> usize {
        self.console.screen.message("Fetching scores...", 0);
        let scores = self.fetch().await;

        if scores.is_empty() {
            self.console
                .notice("No results found", MESSAGE_ROW, NOTICE_HOLD_MS)
                .await;
            return 0;
        }

        let shown = scores.len().min(HIGH_SCORE_ROWS);
        info!("High scores: {} entries, showing {}", scores.len(), shown);
        self.console.screen.message("High Scores:", 0);
        for (i, entry) in scores.iter().take(shown).enumerate() {
            let row = LINE_HEIGHT + i as i32 * LINE_HEIGHT;
            self.console.screen.text(&score_line(i + 1, entry), 0, row);
        }
        self.console.pause(HIGH_SCORE_HOLD_MS).await;
        shown
    }
}
