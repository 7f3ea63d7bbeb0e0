//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART0 / USB-CDC in production).
//! Telemetry is rendered as one compact JSON object per line so the
//! bridge or a host script can scrape it from the console.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::context::Notice;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => match serde_json::to_string(t) {
                Ok(json) => info!("TELEM | {}", json),
                Err(e) => warn!("TELEM | encode failed: {}", e),
            },
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {:?} -> {:?}", from, to);
            }
            AppEvent::Started(mode) => {
                info!("START | initial_mode={:?}", mode);
            }
            AppEvent::AlertFailed { alert, error: e } => {
                warn!("ALERT | {:?} not delivered: {}", alert, e);
            }
            AppEvent::Notice(notice) => log_notice(*notice),
        }
    }
}

fn log_notice(notice: Notice) {
    match notice {
        Notice::Armed => info!("SEC | armed"),
        Notice::IntrusionDetected => warn!("SEC | intrusion detected"),
        Notice::Disarmed { from } => info!("SEC | disarmed from {:?}", from),
        Notice::SirenTimeout => info!("SEC | siren timed out"),
        Notice::SmokeDetected => error!("SMOKE | override engaged"),
        Notice::SmokeStillActive => error!("SMOKE | still active"),
        Notice::SmokeCleared => info!("SMOKE | cleared"),
        Notice::SmokeResetRejected { clear_ticks } => {
            warn!("SMOKE | reset rejected, clear for {} ticks", clear_ticks)
        }
    }
}
