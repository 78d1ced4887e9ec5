//! PanTilt Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  UartTransport   ServoAdapter   LogEventSink   Esp32Clock      │
//! │  (Transport)     (Actuator)     (EventSink)    (TimePort)      │
//! │  WiFi STA        HTTP server ──▶ QueryHandler                  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │        ReceiverService (pure logic, one mutex)         │    │
//! │  │  parse · actuator · interval stats · stress episode    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use pantilt::adapters::hardware::ServoAdapter;
use pantilt::adapters::http;
use pantilt::adapters::log_sink::LogEventSink;
use pantilt::adapters::time::Esp32Clock;
use pantilt::adapters::uart::UartTransport;
use pantilt::adapters::wifi::{self, WifiCredentials};
use pantilt::app::ingest::ingest_once;
use pantilt::app::service::{self, ReceiverService};
use pantilt::config::SystemConfig;
use pantilt::drivers::servo::{ServoDriver, ServoTiming};
use pantilt::error::CommsError;
use pantilt::serial::line::LineReader;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PanTilt v{}                          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    let config = SystemConfig::default();
    config.validate().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 3. Servos (LEDC, 14-bit) ──────────────────────────────
    let timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default()
            .frequency(Hertz(config.servo_pwm_hz))
            .resolution(Resolution::Bits14),
    )?;
    let timing = ServoTiming::from_config(&config);
    let pan = LedcDriver::new(peripherals.ledc.channel0, &timer, peripherals.pins.gpio18)?;
    let tilt = LedcDriver::new(peripherals.ledc.channel1, &timer, peripherals.pins.gpio19)?;
    let mut hw = ServoAdapter::new(
        ServoDriver::new(pan, timing),
        ServoDriver::new(tilt, timing),
    );

    // ── 4. Command link (UART0, the USB bridge) ───────────────
    let uart = UartDriver::new(
        peripherals.uart0,
        peripherals.pins.gpio1,
        peripherals.pins.gpio3,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::new().baudrate(Hertz(config.serial_baud)),
    )?;
    let mut reader = LineReader::new(UartTransport::new(uart));

    // ── 5. Receiver service ───────────────────────────────────
    let shared = ReceiverService::new(&config).shared();
    let mut sink = LogEventSink::new();
    service::lock(&shared).start(&mut hw, &mut sink);

    // ── 6. Network + query server (best-effort) ───────────────
    let wifi_link = match WifiCredentials::from_build_env() {
        Some(Ok(creds)) => match wifi::join(peripherals.modem, sysloop, nvs, &creds) {
            Ok(w) => Some(w),
            Err(e) => {
                error!("WiFi join failed: {}", e);
                None
            }
        },
        Some(Err(e)) => {
            error!("WiFi credentials rejected: {}", e);
            None
        }
        None => {
            warn!("WIFI_SSID not set at build time; query server disabled");
            None
        }
    };
    let _server = match &wifi_link {
        Some(_) => match http::serve(shared.clone(), config.http_port) {
            Ok(s) => Some(s),
            Err(e) => {
                error!("Query server failed to start: {}", e);
                None
            }
        },
        None => None,
    };

    info!("System ready. Entering control loop.");

    // ── 7. Control loop ───────────────────────────────────────
    let clock = Esp32Clock::new();
    loop {
        if let Err(e) = ingest_once(&mut reader, &shared, &clock, &mut hw, &mut sink) {
            warn!("{}: {:?}", CommsError::SerialReadFailed, e);
        }
        FreeRtos::delay_ms(config.loop_delay_ms);
    }
}
