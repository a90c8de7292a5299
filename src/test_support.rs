//! Recording fakes for the device collaborators.
//!
//! Every fake is a cheap handle around shared state, so a test can move one
//! clone into the code under test and keep another to inspect afterwards.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;

use crate::console::Console;
use crate::error::TransportError;
use crate::keymap::Key;
use crate::net::{HttpResponse, HttpTransport};
use crate::tone::{Buzzer, Tone, ToneBoard};
use crate::ui::{Ink, KeySource, Presenter, Screen};

/// Delay that returns immediately and adds up what was asked for.
#[derive(Clone, Default)]
pub struct CountingDelay {
    ns: Rc<Cell<u64>>,
}

impl CountingDelay {
    pub fn total_ms(&self) -> u64 {
        self.ns.get() / 1_000_000
    }
}

impl DelayNs for CountingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.ns.set(self.ns.get() + u64::from(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.ns.set(self.ns.get() + u64::from(us) * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.ns.set(self.ns.get() + u64::from(ms) * 1_000_000);
    }
}

#[derive(Default)]
struct BuzzerLog {
    played: Vec<Tone>,
    sounding: bool,
}

#[derive(Clone, Default)]
pub struct RecordingBuzzer {
    log: Rc<RefCell<BuzzerLog>>,
}

impl RecordingBuzzer {
    /// Every tone started, in order.
    pub fn played(&self) -> Vec<Tone> {
        self.log.borrow().played.clone()
    }

    pub fn is_sounding(&self) -> bool {
        self.log.borrow().sounding
    }
}

impl Buzzer for RecordingBuzzer {
    fn sound(&mut self, tone: Tone) {
        let mut log = self.log.borrow_mut();
        log.played.push(tone);
        log.sounding = true;
    }

    fn silence(&mut self) {
        self.log.borrow_mut().sounding = false;
    }
}

/// One call made on a [`RecordingScreen`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Draw {
    Clear,
    ClearArea { x: i32, y: i32, width: u32, height: u32 },
    Text { text: String, x: i32, y: i32, ink: Ink },
    Heart { x: i32, y: i32 },
    Show,
}

impl Draw {
    pub fn is_text(&self, expected: &str) -> bool {
        matches!(self, Draw::Text { text, .. } if text == expected)
    }
}

#[derive(Clone, Default)]
pub struct RecordingScreen {
    draws: Rc<RefCell<Vec<Draw>>>,
}

impl RecordingScreen {
    pub fn draws(&self) -> Vec<Draw> {
        self.draws.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Draw) -> bool) -> usize {
        self.draws.borrow().iter().filter(|d| pred(d)).count()
    }

    /// Some text call contained `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.draws
            .borrow()
            .iter()
            .any(|d| matches!(d, Draw::Text { text, .. } if text.contains(needle)))
    }

    pub fn texts_at(&self) -> Vec<(String, i32, i32)> {
        self.draws
            .borrow()
            .iter()
            .filter_map(|d| match d {
                Draw::Text { text, x, y, .. } => Some((text.clone(), *x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Position of the first text equal to `text`.
    pub fn position_of(&self, text: &str) -> Option<usize> {
        self.draws.borrow().iter().position(|d| d.is_text(text))
    }
}

impl Screen for RecordingScreen {
    fn clear(&mut self) {
        self.draws.borrow_mut().push(Draw::Clear);
    }

    fn clear_area(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.draws
            .borrow_mut()
            .push(Draw::ClearArea { x, y, width, height });
    }

    fn text(&mut self, text: &str, x: i32, y: i32, ink: Ink) {
        self.draws.borrow_mut().push(Draw::Text {
            text: text.to_string(),
            x,
            y,
            ink,
        });
    }

    fn heart(&mut self, x: i32, y: i32) {
        self.draws.borrow_mut().push(Draw::Heart { x, y });
    }

    fn show(&mut self) {
        self.draws.borrow_mut().push(Draw::Show);
    }
}

/// Keypad that replays a script of scans.
#[derive(Clone, Default)]
pub struct ScriptedKeys {
    script: Rc<RefCell<VecDeque<Option<Key>>>>,
}

impl ScriptedKeys {
    /// `0` stands for a scan with nothing pressed, `n` for key `Sn`.
    pub fn from_labels(labels: &[u8]) -> Self {
        let script = labels.iter().map(|n| Key::new(*n)).collect();
        Self {
            script: Rc::new(RefCell::new(script)),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.borrow().len()
    }
}

impl KeySource for ScriptedKeys {
    async fn scan(&mut self) -> Option<Key> {
        match self.script.borrow_mut().pop_front() {
            Some(key) => key,
            None => panic!("key script exhausted"),
        }
    }
}

/// Labels of the keys that play `tones` in local mode.
pub fn keys_for(tones: &[Tone]) -> Vec<u8> {
    tones
        .iter()
        .map(|t| Key::for_tone(*t).map(Key::number).unwrap_or(0))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

type Reply = Result<HttpResponse, TransportError>;

#[derive(Default)]
struct Routes {
    routes: Vec<(String, VecDeque<Reply>)>,
    requests: Vec<Request>,
}

/// HTTP fake. Replies are queued per URL suffix; the last queued reply of a
/// route is repeated for every further request.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Rc<RefCell<Routes>>,
}

impl FakeTransport {
    fn push(&self, suffix: &str, reply: Reply) {
        let mut state = self.state.borrow_mut();
        match state.routes.iter_mut().find(|(s, _)| s == suffix) {
            Some((_, queue)) => queue.push_back(reply),
            None => state
                .routes
                .push((suffix.to_string(), VecDeque::from([reply]))),
        }
    }

    pub fn respond(&self, suffix: &str, status: u16, body: &str) {
        self.push(suffix, Ok(HttpResponse::new(status, body.as_bytes())));
    }

    pub fn fail(&self, suffix: &str, error: TransportError) {
        self.push(suffix, Err(error));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.borrow().requests.clone()
    }

    fn reply(&self, method: Method, url: &str, body: Option<&[u8]>) -> Reply {
        let mut state = self.state.borrow_mut();
        state.requests.push(Request {
            method,
            url: url.to_string(),
            body: body.map(|b| String::from_utf8_lossy(b).into_owned()),
        });
        let Some((_, queue)) = state
            .routes
            .iter_mut()
            .rev()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
        else {
            panic!("no route for {}", url);
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

impl HttpTransport for FakeTransport {
    async fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        self.reply(Method::Get, url, None)
    }

    async fn post_json(&mut self, url: &str, body: &[u8]) -> Result<HttpResponse, TransportError> {
        self.reply(Method::Post, url, Some(body))
    }
}

pub type TestConsole = Console<ScriptedKeys, RecordingScreen, RecordingBuzzer, CountingDelay>;

/// A console wired to fakes, plus handles on each fake.
pub struct Rig {
    pub console: TestConsole,
    pub keys: ScriptedKeys,
    pub screen: RecordingScreen,
    pub buzzer: RecordingBuzzer,
    pub delay: CountingDelay,
}

/// Build a console whose keypad replays `labels` (see
/// [`ScriptedKeys::from_labels`]). Tone board and console share one delay
/// counter.
pub fn rig(labels: &[u8]) -> Rig {
    let keys = ScriptedKeys::from_labels(labels);
    let screen = RecordingScreen::default();
    let buzzer = RecordingBuzzer::default();
    let delay = CountingDelay::default();
    let console = Console::new(
        keys.clone(),
        Presenter::new(screen.clone()),
        ToneBoard::new(buzzer.clone(), delay.clone()),
        delay.clone(),
    );
    Rig {
        console,
        keys,
        screen,
        buzzer,
        delay,
    }
}
