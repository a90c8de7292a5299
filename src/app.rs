//! Top-level menu that launches each mode.
//!
//! `S1` moves the cursor up, `S2` down (both wrap) and `S3` starts the
//! highlighted entry. Every mode hands control back here when it ends.

use embedded_hal_async::delay::DelayNs;
use rand::RngCore;

use crate::config::NOTICE_HOLD_MS;
use crate::console::Console;
use crate::game::{LocalGame, LocalOutcome, RemoteGame, RemoteOutcome};
use crate::high_score::HighScoreBoard;
use crate::keymap::Key;
use crate::net::{HttpTransport, SessionClient};
use crate::tone::Buzzer;
use crate::ui::input_logic::{select_next, select_prev};
use crate::ui::{KeySource, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    NewGame,
    OnlineGame,
    HighScore,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::NewGame, MenuItem::OnlineGame, MenuItem::HighScore];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::NewGame => "New Game",
            MenuItem::OnlineGame => "Online Game",
            MenuItem::HighScore => "High Score",
        }
    }
}

/// What a confirmed menu entry did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    Local(LocalOutcome),
    Remote(RemoteOutcome),
    /// Number of leaderboard rows shown.
    HighScores(usize),
    /// A network entry was picked without a connection.
    Offline,
}

pub struct App<K, S, B, D, T, R> {
    console: Console<K, S, B, D>,
    client: Option<SessionClient<T>>,
    rng: R,
    selected: usize,
}

impl<K, S, B, D, T, R> App<K, S, B, D, T, R>
where
    K: KeySource,
    S: Screen,
    B: Buzzer,
    D: DelayNs,
    T: HttpTransport,
    R: RngCore,
{
    /// `client` is `None` when the device has no network.
    pub fn new(console: Console<K, S, B, D>, client: Option<SessionClient<T>>, rng: R) -> Self {
        Self {
            console,
            client,
            rng,
            selected: 0,
        }
    }

    pub fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.selected]
    }

    pub fn is_online(&self) -> bool {
        self.client.is_some()
    }

    pub fn console(&self) -> &Console<K, S, B, D> {
        &self.console
    }

    /// Draw the menu, handle one scan, and run a mode if one was confirmed.
    pub async fn step(&mut self) -> Option<Activity> {
        let labels = MenuItem::ALL.map(MenuItem::label);
        self.console.screen.main_menu(&labels, self.selected);

        match self.console.keys.scan().await? {
            Key::S1 => {
                self.selected = select_prev(self.selected, MenuItem::ALL.len());
                None
            }
            Key::S2 => {
                self.selected = select_next(self.selected, MenuItem::ALL.len());
                None
            }
            Key::S3 => {
                let item = self.selected();
                info!("Menu: {:?}", item);
                let activity = self.launch(item).await;
                info!("Menu: back from {:?}", activity);
                Some(activity)
            }
            _ => None,
        }
    }

    /// Run one mode to completion.
    pub async fn launch(&mut self, item: MenuItem) -> Activity {
        match item {
            MenuItem::NewGame => {
                let outcome = LocalGame::new(&mut self.console, &mut self.rng).run().await;
                Activity::Local(outcome)
            }
            MenuItem::OnlineGame => match self.client.as_mut() {
                Some(client) => {
                    Activity::Remote(RemoteGame::new(&mut self.console, client).run().await)
                }
                None => self.offline_notice().await,
            },
            MenuItem::HighScore => match self.client.as_mut() {
                Some(client) => {
                    Activity::HighScores(HighScoreBoard::new(&mut self.console, client).show().await)
                }
                None => self.offline_notice().await,
            },
        }
    }

    async fn offline_notice(&mut self) -> Activity {
        warn!("Menu: network entry picked while offline");
        self.console
            .notice("Wi-Fi not connected", 20, NOTICE_HOLD_MS)
            .await;
        Activity::Offline
    }

    /// Serve the menu forever.
    pub async fn run(mut self) -> ! {
        loop {
            self.step().await;
        }
    }
}
