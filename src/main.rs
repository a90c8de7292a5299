//! tonepad firmware for the Raspberry Pi Pico W.
//!
//! Wires the keypad, OLED, buzzer and Wi-Fi into the library's traits and
//! hands control to the main menu. Pin assignments are listed in
//! `tonepad::config`.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Delay;
use embedded_alloc::LlffHeap as Heap;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use {defmt_rtt as _, panic_probe as _};

use tonepad::config::SERVER_URL;
use tonepad::net::SessionClient;
use tonepad::ui::display::GraphicsScreen;
use tonepad::ui::keypad::MatrixKeypad;
use tonepad::ui::Presenter;
use tonepad::{App, Console, ToneBoard};

mod board;

use board::buzzer::PwmBuzzer;
use board::display::OledPanel;
use board::wifi::{self, WifiParts};

// Heap for JSON bodies, sequences and screen strings
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 48KB
const HEAP_SIZE: usize = 48 * 1024;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("tonepad starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    let mut rng = SmallRng::seed_from_u64(RoscRng.next_u64());

    // Keypad: rows driven, columns pulled down
    let rows = [
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::Low),
    ];
    let cols = [
        Input::new(p.PIN_10, Pull::Down),
        Input::new(p.PIN_11, Pull::Down),
        Input::new(p.PIN_12, Pull::Down),
        Input::new(p.PIN_14, Pull::Down),
    ];
    let keypad = MatrixKeypad::new(rows, cols, Delay);

    // OLED on I2C0 (SCL GP5, SDA GP4)
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let screen = GraphicsScreen::new(OledPanel::new(i2c));

    // Buzzer on PWM slice 6, channel B
    let pwm = Pwm::new_output_b(p.PWM_SLICE6, p.PIN_13, PwmConfig::default());
    let tones = ToneBoard::new(PwmBuzzer::new(pwm), Delay);

    info!("Peripherals initialized");

    let parts = WifiParts {
        pwr: p.PIN_23,
        dio: p.PIN_24,
        cs: p.PIN_25,
        clk: p.PIN_29,
        pio: p.PIO0,
        dma: p.DMA_CH0,
    };
    let client = wifi::start(spawner, parts, rng.next_u64())
        .await
        .map(|transport| SessionClient::new(transport, SERVER_URL));
    if client.is_none() {
        warn!("No network, online modes disabled");
    }

    let console = Console::new(keypad, Presenter::new(screen), tones, Delay);
    App::new(console, client, rng).run().await
}

fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
