//! RoomCtl Firmware: Main Entry Point
//!
//! Hexagonal architecture with a fixed-cadence control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          LogEventSink      MonotonicClock     │
//! │  (Sensor+Actuator+Alert)  (EventSink)       (Clock)            │
//! │  UartLink (bridge)                                             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Smoke override · FSM · Thermal · Lighting             │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  TickPacer (50 ms) · Watchdog                                  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The disarm code and its HMAC key are baked in at build time from
//! `ROOMCTL_DISARM_CODE` and `ROOMCTL_DISARM_KEY`.
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_svc::hal::delay::FreeRtos;
use log::info;

use roomctl::adapters::hardware::HardwareAdapter;
use roomctl::adapters::log_sink::LogEventSink;
use roomctl::adapters::time::MonotonicClock;
use roomctl::adapters::uart::{CODE_LEN, DisarmVerifier, UartLink};
use roomctl::app::commands::AppCommand;
use roomctl::app::service::AppService;
use roomctl::config::ThresholdConfig;
use roomctl::drivers::button::PanelButton;
use roomctl::drivers::hw_init;
use roomctl::drivers::watchdog::Watchdog;
use roomctl::error::Error;
use roomctl::pins;
use roomctl::scheduler::TickPacer;
use roomctl::sensors::SensorHub;
use roomctl::sensors::humidity::HumiditySensor;
use roomctl::sensors::presence::PresenceSensor;
use roomctl::sensors::smoke::SmokeSensor;
use roomctl::sensors::temperature::TemperatureSensor;

const WATCHDOG_TIMEOUT_MS: u32 = 5_000;

const DISARM_CODE: &str = match option_env!("ROOMCTL_DISARM_CODE") {
    Some(code) => code,
    None => "1234",
};

const DISARM_KEY: &str = match option_env!("ROOMCTL_DISARM_KEY") {
    Some(key) => key,
    None => "roomctl-factory-key",
};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RoomCtl v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    hw_init::init_peripherals()?;
    let watchdog = Watchdog::new(WATCHDOG_TIMEOUT_MS);

    // ── 2. Config and core ────────────────────────────────────
    let config = ThresholdConfig::default();
    let mut service = AppService::new(config.clone()).map_err(Error::from)?;

    // ── 3. Adapters ───────────────────────────────────────────
    let code: [u8; CODE_LEN] = DISARM_CODE
        .as_bytes()
        .try_into()
        .map_err(|_| anyhow!("disarm code must be {} bytes", CODE_LEN))?;
    if !code.iter().all(u8::is_ascii_digit) {
        return Err(anyhow!("disarm code must be digits"));
    }
    let link = UartLink::new(DisarmVerifier::new(&code, DISARM_KEY.as_bytes()));

    let hub = SensorHub::new(
        TemperatureSensor::new(pins::TEMP_ADC_CHANNEL),
        SmokeSensor::new(pins::SMOKE_ADC_CHANNEL),
        PresenceSensor::new(pins::PIR_GPIO, pins::DOOR_REED_GPIO),
        HumiditySensor::new(),
        &config,
    );
    let mut hw = HardwareAdapter::new(
        hub,
        PanelButton::new(pins::ARM_BUTTON_GPIO),
        link,
        MonotonicClock::new(),
    );
    let mut sink = LogEventSink::new();

    // ── 4. Start ──────────────────────────────────────────────
    service.start(&mut hw, &mut sink);
    let mut pacer = TickPacer::new(config.loop_period_ms, hw.now_ms());
    info!("control loop: {} ms period", pacer.period_ms());

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        let now = hw.now_ms();
        service.tick(now, &mut hw, &mut sink);

        hw.service_outputs(now);
        if hw.take_reset_request() {
            service.handle_command(AppCommand::ResetSmoke, &mut hw, &mut sink);
        }

        watchdog.feed();
        let wait_ms = pacer.wait_ms(hw.now_ms());
        FreeRtos::delay_ms(wait_ms.min(u64::from(u32::MAX)) as u32);
    }
}
