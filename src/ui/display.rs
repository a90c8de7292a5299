//! Monochrome OLED rendering with `embedded-graphics`.
//!
//! [`GraphicsScreen`] implements [`Screen`] for any binary-colour draw
//! target that can also push its buffer to the panel ([`FrameBuffer`]).
//! The board wires an SSD1306 in buffered-graphics mode; tests use
//! `MockDisplay`.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

use crate::config::LINE_HEIGHT;
use crate::ui::{Ink, Screen};

/// Glyph width of the UI font (px).
pub const CHAR_WIDTH: u32 = 6;

/// A binary draw target with an explicit flush.
pub trait FrameBuffer: DrawTarget<Color = BinaryColor> {
    /// Send the buffered frame to the panel.
    fn present(&mut self);
}

pub struct GraphicsScreen<D> {
    target: D,
}

impl<D: FrameBuffer> GraphicsScreen<D> {
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &D {
        &self.target
    }
}

fn text_style(color: BinaryColor) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(color)
        .build()
}

/// Outline of the heart glyph, relative to its anchor.
const HEART: [(i32, i32); 8] = [
    (0, 0),
    (1, -1),
    (2, -1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 2),
    (0, 1),
];

impl<D: FrameBuffer> Screen for GraphicsScreen<D> {
    fn clear(&mut self) {
        let _ = self.target.clear(BinaryColor::Off);
    }

    fn clear_area(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let area = Rectangle::new(Point::new(x, y), Size::new(width, height));
        let _ = self.target.fill_solid(&area, BinaryColor::Off);
    }

    fn text(&mut self, text: &str, x: i32, y: i32, ink: Ink) {
        let origin = Point::new(x, y);
        let color = match ink {
            Ink::Normal => BinaryColor::On,
            Ink::Inverted => {
                let width = text.chars().count() as u32 * CHAR_WIDTH;
                let area = Rectangle::new(origin, Size::new(width, LINE_HEIGHT as u32));
                let _ = self.target.fill_solid(&area, BinaryColor::On);
                BinaryColor::Off
            }
        };
        let _ = Text::with_baseline(text, origin, text_style(color), Baseline::Top)
            .draw(&mut self.target);
    }

    fn heart(&mut self, x: i32, y: i32) {
        let pixels = HEART
            .iter()
            .map(|(dx, dy)| Pixel(Point::new(x + dx, y + dy), BinaryColor::On));
        let _ = self.target.draw_iter(pixels);
    }

    fn show(&mut self) {
        self.target.present();
    }
}
