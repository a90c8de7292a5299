//! SSD1306 OLED on I2C0.

use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use tonepad::ui::display::FrameBuffer;

type Driver = Ssd1306<
    I2CInterface<I2c<'static, I2C0, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// Buffered SSD1306; drawing goes to RAM until [`FrameBuffer::present`].
pub struct OledPanel {
    driver: Driver,
}

impl OledPanel {
    /// Initialise the panel and blank it.
    pub fn new(i2c: I2c<'static, I2C0, Blocking>) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let mut driver = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        if driver.init().is_err() {
            defmt::warn!("OLED init failed");
        }
        driver.clear_buffer();
        let _ = driver.flush();
        Self { driver }
    }
}

impl OriginDimensions for OledPanel {
    fn size(&self) -> Size {
        self.driver.size()
    }
}

impl DrawTarget for OledPanel {
    type Color = BinaryColor;
    type Error = <Driver as DrawTarget>::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.driver.draw_iter(pixels)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.driver.fill_solid(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.driver.clear(color)
    }
}

impl FrameBuffer for OledPanel {
    fn present(&mut self) {
        let _ = self.driver.flush();
    }
}
