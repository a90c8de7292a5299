//! CYW43 Wi-Fi, the network stack and an HTTP(S) transport on top.
//!
//! The radio firmware and CLM blobs are flashed separately with probe-rs:
//!
//! ```text
//! probe-rs download 43439A0.bin     --binary-format bin --chip RP2040 --base-address 0x10100000
//! probe-rs download 43439A0_clm.bin --binary-format bin --chip RP2040 --base-address 0x10140000
//! ```

use alloc::vec::Vec;

use cyw43::JoinOptions;
use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_time::{with_timeout, Duration, Timer};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use reqwless::client::{HttpClient, TlsConfig, TlsVerify};
use reqwless::headers::ContentType;
use reqwless::request::{Method, RequestBuilder};
use static_cell::StaticCell;

use tonepad::config::{WIFI_JOIN_ATTEMPTS, WIFI_PASSWORD, WIFI_SSID};
use tonepad::net::{HttpResponse, HttpTransport};
use tonepad::TransportError;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Flash addresses of the radio blobs.
const FIRMWARE_ADDR: usize = 0x1010_0000;
const FIRMWARE_LEN: usize = 230_321;
const CLM_ADDR: usize = 0x1014_0000;
const CLM_LEN: usize = 4_752;

const DHCP_TIMEOUT: Duration = Duration::from_secs(15);

const RESPONSE_BUFFER: usize = 4096;
const TLS_READ_BUFFER: usize = 16_640;
const TLS_WRITE_BUFFER: usize = 4096;

type TcpState = TcpClientState<1, 1024, 1024>;

static STATE: StaticCell<cyw43::State> = StaticCell::new();
static RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();
static TCP_STATE: StaticCell<TcpState> = StaticCell::new();
static RESPONSE_BUF: StaticCell<[u8; RESPONSE_BUFFER]> = StaticCell::new();
static TLS_READ_BUF: StaticCell<[u8; TLS_READ_BUFFER]> = StaticCell::new();
static TLS_WRITE_BUF: StaticCell<[u8; TLS_WRITE_BUFFER]> = StaticCell::new();

/// Peripherals owned by the radio.
pub struct WifiParts {
    pub pwr: PIN_23,
    pub dio: PIN_24,
    pub cs: PIN_25,
    pub clk: PIN_29,
    pub pio: PIO0,
    pub dma: DMA_CH0,
}

#[embassy_executor::task]
async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Bring up the radio and try to join the configured network.
///
/// Returns `None` when the network could not be joined or no address was
/// obtained; the device then runs offline.
pub async fn start(spawner: Spawner, parts: WifiParts, seed: u64) -> Option<WifiTransport> {
    // SAFETY: the blobs are flashed at these addresses and never written
    // at runtime.
    let firmware = unsafe { core::slice::from_raw_parts(FIRMWARE_ADDR as *const u8, FIRMWARE_LEN) };
    let clm = unsafe { core::slice::from_raw_parts(CLM_ADDR as *const u8, CLM_LEN) };

    let pwr = Output::new(parts.pwr, Level::Low);
    let cs = Output::new(parts.cs, Level::High);
    let mut pio = Pio::new(parts.pio, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        parts.dio,
        parts.clk,
        parts.dma,
    );

    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, firmware).await;
    unwrap!(spawner.spawn(cyw43_task(runner)));

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let (stack, runner) = embassy_net::new(
        net_device,
        NetConfig::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );
    unwrap!(spawner.spawn(net_task(runner)));

    let mut joined = false;
    for attempt in 1..=WIFI_JOIN_ATTEMPTS {
        info!("Wi-Fi: joining '{}' (attempt {})", WIFI_SSID, attempt);
        let options = if WIFI_PASSWORD.is_empty() {
            JoinOptions::new_open()
        } else {
            JoinOptions::new(WIFI_PASSWORD.as_bytes())
        };
        match control.join(WIFI_SSID, options).await {
            Ok(()) => {
                joined = true;
                break;
            }
            Err(_) => {
                warn!("Wi-Fi: join attempt {} failed", attempt);
                Timer::after(Duration::from_secs(1)).await;
            }
        }
    }
    if !joined {
        warn!("Wi-Fi: giving up, running offline");
        return None;
    }

    if with_timeout(DHCP_TIMEOUT, stack.wait_config_up()).await.is_err() {
        warn!("Wi-Fi: no DHCP lease, running offline");
        return None;
    }
    if let Some(config) = stack.config_v4() {
        info!("Wi-Fi: up, address {}", config.address);
    }

    Some(WifiTransport {
        stack,
        tcp_state: TCP_STATE.init(TcpState::new()),
        response: RESPONSE_BUF.init([0; RESPONSE_BUFFER]),
        tls_read: TLS_READ_BUF.init([0; TLS_READ_BUFFER]),
        tls_write: TLS_WRITE_BUF.init([0; TLS_WRITE_BUFFER]),
        rng: SmallRng::seed_from_u64(seed ^ 0x5a5a_5a5a),
    })
}

fn map_error(error: reqwless::Error) -> TransportError {
    warn!("HTTP: {:?}", error);
    match error {
        reqwless::Error::Dns => TransportError::Dns,
        reqwless::Error::BufferTooSmall => TransportError::BufferOverflow,
        reqwless::Error::Network(_) => TransportError::Io,
        _ => TransportError::Connect,
    }
}

/// One connection per request; buffers are reused between requests.
pub struct WifiTransport {
    stack: Stack<'static>,
    tcp_state: &'static TcpState,
    response: &'static mut [u8; RESPONSE_BUFFER],
    tls_read: &'static mut [u8; TLS_READ_BUFFER],
    tls_write: &'static mut [u8; TLS_WRITE_BUFFER],
    rng: SmallRng,
}

impl WifiTransport {
    fn ensure_link(&self) -> Result<(), TransportError> {
        if self.stack.is_link_up() && self.stack.is_config_up() {
            Ok(())
        } else {
            Err(TransportError::NoLink)
        }
    }
}

impl HttpTransport for WifiTransport {
    async fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        self.ensure_link()?;
        let tcp = TcpClient::new(self.stack, self.tcp_state);
        let dns = DnsSocket::new(self.stack);
        let tls = TlsConfig::new(
            self.rng.next_u64(),
            &mut self.tls_read[..],
            &mut self.tls_write[..],
            TlsVerify::None,
        );
        let mut client = HttpClient::new_with_tls(&tcp, &dns, tls);

        let mut request = client.request(Method::GET, url).await.map_err(map_error)?;
        let response = request
            .send(&mut self.response[..])
            .await
            .map_err(map_error)?;
        let status = response.status.0;
        let body = response.body().read_to_end().await.map_err(map_error)?;
        Ok(HttpResponse::new(status, Vec::from(&body[..])))
    }

    async fn post_json(&mut self, url: &str, body: &[u8]) -> Result<HttpResponse, TransportError> {
        self.ensure_link()?;
        let tcp = TcpClient::new(self.stack, self.tcp_state);
        let dns = DnsSocket::new(self.stack);
        let tls = TlsConfig::new(
            self.rng.next_u64(),
            &mut self.tls_read[..],
            &mut self.tls_write[..],
            TlsVerify::None,
        );
        let mut client = HttpClient::new_with_tls(&tcp, &dns, tls);

        let mut request = client
            .request(Method::POST, url)
            .await
            .map_err(map_error)?
            .body(body)
            .content_type(ContentType::ApplicationJson);
        let response = request
            .send(&mut self.response[..])
            .await
            .map_err(map_error)?;
        let status = response.status.0;
        let reply = response.body().read_to_end().await.map_err(map_error)?;
        Ok(HttpResponse::new(status, Vec::from(&reply[..])))
    }
}
