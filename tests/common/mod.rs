//! Fakes shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal_async::delay::DelayNs;

use tonepad::net::{HttpResponse, HttpTransport};
use tonepad::ui::display::FrameBuffer;
use tonepad::ui::KeySource;
use tonepad::{Buzzer, Key, Tone, TransportError};

/// Delay that does not wait.
#[derive(Clone, Copy, Default)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

/// Keys from a script; `0` is an idle scan.
#[derive(Clone)]
pub struct Script(Rc<RefCell<VecDeque<u8>>>);

impl Script {
    pub fn new(labels: &[u8]) -> Self {
        Self(Rc::new(RefCell::new(labels.iter().copied().collect())))
    }

    pub fn is_done(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl KeySource for Script {
    async fn scan(&mut self) -> Option<Key> {
        let label = self.0.borrow_mut().pop_front().expect("key script exhausted");
        Key::new(label)
    }
}

#[derive(Clone, Default)]
pub struct Tones(Rc<RefCell<Vec<Tone>>>);

impl Tones {
    pub fn played(&self) -> Vec<Tone> {
        self.0.borrow().clone()
    }
}

impl Buzzer for Tones {
    fn sound(&mut self, tone: Tone) {
        self.0.borrow_mut().push(tone);
    }

    fn silence(&mut self) {}
}

/// 128×64 one-bit frame that counts presents.
pub struct Frame {
    pixels: [[bool; 128]; 64],
    pub presents: usize,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            pixels: [[false; 128]; 64],
            presents: 0,
        }
    }
}

impl Frame {
    pub fn lit_in_rows(&self, rows: std::ops::Range<usize>) -> usize {
        self.pixels[rows].iter().flatten().filter(|p| **p).count()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(128, 64)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if (0..128).contains(&point.x) && (0..64).contains(&point.y) {
                self.pixels[point.y as usize][point.x as usize] = color.is_on();
            }
        }
        Ok(())
    }
}

impl FrameBuffer for Frame {
    fn present(&mut self) {
        self.presents += 1;
    }
}

/// Canned server: one reply per URL suffix, plus a log of what was sent.
#[derive(Clone, Default)]
pub struct Server {
    replies: Rc<RefCell<Vec<(String, VecDeque<(u16, String)>)>>>,
    pub posts: Rc<RefCell<Vec<(String, String)>>>,
}

impl Server {
    /// Queue a reply; the last one for a suffix repeats.
    pub fn reply(&self, suffix: &str, status: u16, body: &str) {
        let mut replies = self.replies.borrow_mut();
        match replies.iter_mut().find(|(s, _)| s == suffix) {
            Some((_, queue)) => queue.push_back((status, body.to_string())),
            None => replies.push((suffix.to_string(), VecDeque::from([(status, body.to_string())]))),
        }
    }

    fn answer(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut replies = self.replies.borrow_mut();
        let Some((_, queue)) = replies.iter_mut().find(|(s, _)| url.ends_with(s.as_str())) else {
            return Err(TransportError::Connect);
        };
        let (status, body) = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        };
        Ok(HttpResponse::new(status, body.into_bytes()))
    }
}

impl HttpTransport for Server {
    async fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        self.answer(url)
    }

    async fn post_json(&mut self, url: &str, body: &[u8]) -> Result<HttpResponse, TransportError> {
        self.posts
            .borrow_mut()
            .push((url.to_string(), String::from_utf8_lossy(body).into_owned()));
        self.answer(url)
    }
}
