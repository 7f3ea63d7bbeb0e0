//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces a [`SensorSnapshot`] each
//! tick that gets written into `ControllerContext.sensors`.  Command
//! inputs (arm, disarm) are not sensors; the hardware adapter fills those
//! fields in after the hub has sampled.

pub mod daylight;
pub mod humidity;
pub mod presence;
pub mod smoke;
pub mod temperature;

use log::{info, warn};

use crate::config::ThresholdConfig;
use crate::error::SensorError;
use crate::fsm::context::SensorSnapshot;
use humidity::HumiditySensor;
use presence::PresenceSensor;
use smoke::SmokeSensor;
use temperature::TemperatureSensor;

/// Consecutive failed smoke conversions before the hub reports full
/// scale.  Shorter runs hold the last good count.
pub const SMOKE_FAIL_LIMIT: u8 = 3;

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub {
    pub temperature: TemperatureSensor,
    pub smoke: SmokeSensor,
    pub presence: PresenceSensor,
    pub humidity: HumiditySensor,
    sunset_hour: u8,
    sunrise_hour: u8,
    last_temperature_c: f32,
    last_humidity_pct: f32,
    last_smoke_raw: u16,
    smoke_fail_streak: u8,
    temperature_faulted: bool,
    smoke_faulted: bool,
    humidity_faulted: bool,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(
        temperature: TemperatureSensor,
        smoke: SmokeSensor,
        presence: PresenceSensor,
        humidity: HumiditySensor,
        config: &ThresholdConfig,
    ) -> Self {
        Self {
            temperature,
            smoke,
            presence,
            humidity,
            sunset_hour: config.sunset_hour,
            sunrise_hour: config.sunrise_hour,
            last_temperature_c: config.initial_temperature_c,
            last_humidity_pct: 0.0,
            last_smoke_raw: 0,
            smoke_fail_streak: 0,
            temperature_faulted: false,
            smoke_faulted: false,
            humidity_faulted: false,
        }
    }

    /// Read every sensor and return a unified snapshot.
    ///
    /// Individual read failures are logged once per fault episode and the
    /// previous good value is retained.  Smoke is held the same way for
    /// up to [`SMOKE_FAIL_LIMIT`] consecutive failures, then reports full
    /// scale.  A single flaky sensor must not stall the control loop.
    pub fn read_all(&mut self, hour: Option<u8>) -> SensorSnapshot {
        let temperature = self.temperature.read();
        let temperature_c = match temperature {
            Ok(t) => t,
            Err(_) => self.last_temperature_c,
        };
        note_fault(&mut self.temperature_faulted, "temperature", temperature.err());
        self.last_temperature_c = temperature_c;

        let smoke = self.smoke.read();
        let smoke_raw = match smoke {
            Ok(raw) => {
                self.smoke_fail_streak = 0;
                self.last_smoke_raw = raw;
                raw
            }
            Err(_) => {
                self.smoke_fail_streak = self.smoke_fail_streak.saturating_add(1);
                if self.smoke_fail_streak >= SMOKE_FAIL_LIMIT {
                    smoke::ADC_FULL_SCALE
                } else {
                    self.last_smoke_raw
                }
            }
        };
        note_fault(&mut self.smoke_faulted, "smoke", smoke.err());

        let humidity = self.humidity.poll();
        match humidity {
            Ok(Some(pct)) => self.last_humidity_pct = pct,
            Ok(None) | Err(_) => {}
        }
        note_fault(&mut self.humidity_faulted, "humidity", humidity.err());

        SensorSnapshot {
            motion: self.presence.motion(),
            door_open: self.presence.door_open(),
            temperature_c,
            smoke_raw,
            humidity_pct: self.last_humidity_pct,
            after_sunset: daylight::is_after_sunset(hour, self.sunset_hour, self.sunrise_hour),
            arm_requested: false,
            disarm_code_valid: false,
        }
    }
}

/// Log the first failure of an episode and its recovery.
fn note_fault(faulted: &mut bool, name: &str, err: Option<SensorError>) {
    match (err, *faulted) {
        (Some(e), false) => {
            warn!("{} sensor: {}, holding last value", name, e);
            *faulted = true;
        }
        (None, true) => {
            info!("{} sensor recovered", name);
            *faulted = false;
        }
        _ => {}
    }
}
