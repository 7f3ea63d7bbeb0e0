//! UART link to the Wi-Fi bridge.
//!
//! Outbound: one `ALERT:<message>` line per alert, CR/LF terminated,
//! behind a token bucket so a stuck emergency cannot saturate the bridge.
//!
//! Inbound: disarm codes arrive as 4-byte frames.  CR or LF discards a
//! partial frame.  Codes are never compared directly: the link holds only
//! an HMAC-SHA256 tag of the configured code and verifies each frame
//! against it in constant time.  Anything that does not verify is
//! rejected.
//!
//! A `T` at the start of a frame opens a time line instead,
//! `TIME:<unix seconds>` up to CR/LF, which the hardware adapter uses to
//! set the wall clock.  Disarm codes are digits, so the two never clash.

use core::fmt::Write;
use core::time::Duration;

use burster::Limiter;
use heapless::String;
use log::{info, warn};

use crate::app::ports::AlertPort;
use crate::drivers::hw_init;
use crate::error::CommsError;
use crate::fsm::context::Alert;

pub const CODE_LEN: usize = 4;
pub const ALERT_PREFIX: &str = "ALERT:";
pub const MAX_ALERT_LINE: usize = 48;
pub const TIME_PREFIX: &[u8] = b"TIME:";
const MAX_TIME_LINE: usize = 24;

/// Alerts allowed per second, and the burst size.
const ALERT_RATE: u64 = 2;

/// Render an alert line.
pub fn format_alert(alert: Alert) -> Result<String<MAX_ALERT_LINE>, CommsError> {
    let mut line = String::new();
    write!(line, "{}{}\r\n", ALERT_PREFIX, alert.message()).map_err(|_| CommsError::LineTooLong)?;
    Ok(line)
}

// ───────────────────────────────────────────────────────────────
// Inbound framing and disarm verification
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Code([u8; CODE_LEN]),
    /// Unix seconds from a well-formed `TIME:` line.
    TimeSync(u64),
}

#[derive(Debug, Default)]
enum TimeLine {
    #[default]
    Idle,
    Open(heapless::Vec<u8, MAX_TIME_LINE>),
    /// Too long; skip to the terminator.
    Overflowed,
}

/// Splits the inbound stream into code frames and time lines.
#[derive(Debug, Default)]
pub struct LinkFramer {
    buf: [u8; CODE_LEN],
    len: usize,
    line: TimeLine,
}

impl LinkFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte.  Returns a frame once `CODE_LEN` code bytes, or a
    /// whole time line, have arrived.
    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        let eol = byte == b'\r' || byte == b'\n';

        match &mut self.line {
            TimeLine::Idle => {}
            TimeLine::Open(line) if !eol => {
                if line.push(byte).is_err() {
                    self.line = TimeLine::Overflowed;
                }
                return None;
            }
            TimeLine::Overflowed if !eol => return None,
            _ => {
                return match core::mem::take(&mut self.line) {
                    TimeLine::Open(line) => parse_time_line(&line).map(Frame::TimeSync),
                    _ => None,
                };
            }
        }

        if eol {
            self.len = 0;
            return None;
        }
        if self.len == 0 && byte == TIME_PREFIX[0] {
            self.line = heapless::Vec::from_slice(&[byte]).map_or(TimeLine::Overflowed, TimeLine::Open);
            return None;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        if self.len == CODE_LEN {
            self.len = 0;
            return Some(Frame::Code(self.buf));
        }
        None
    }
}

/// `TIME:<digits>` to Unix seconds.
pub fn parse_time_line(line: &[u8]) -> Option<u64> {
    let digits = line.strip_prefix(TIME_PREFIX)?;
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    core::str::from_utf8(digits).ok()?.parse().ok()
}

/// Holds only the HMAC tag of the disarm code.
pub struct DisarmVerifier {
    key: &'static [u8],
    tag: [u8; 32],
}

impl DisarmVerifier {
    pub fn new(code: &[u8; CODE_LEN], key: &'static [u8]) -> Self {
        Self {
            key,
            tag: hmac_sha256::HMAC::mac(code, key),
        }
    }

    pub fn verify(&self, frame: &[u8; CODE_LEN]) -> bool {
        hmac_sha256::HMAC::verify(frame, self.key, &self.tag)
    }
}

// ───────────────────────────────────────────────────────────────
// Link
// ───────────────────────────────────────────────────────────────

pub struct UartLink {
    framer: LinkFramer,
    verifier: DisarmVerifier,
    limiter: burster::TokenBucket<fn() -> Duration>,
    time_sync: Option<u64>,
}

impl UartLink {
    pub fn new(verifier: DisarmVerifier) -> Self {
        Self::with_time_provider(verifier, platform_now)
    }

    pub fn with_time_provider(verifier: DisarmVerifier, now: fn() -> Duration) -> Self {
        Self {
            framer: LinkFramer::new(),
            verifier,
            limiter: burster::TokenBucket::new_with_time_provider(ALERT_RATE, ALERT_RATE, now),
            time_sync: None,
        }
    }

    /// Feed received bytes.  `true` if any complete code frame verified.
    /// The latest time line is kept for [`take_time_sync`](Self::take_time_sync).
    pub fn accept_bytes(&mut self, bytes: &[u8]) -> bool {
        let mut valid = false;
        for &byte in bytes {
            match self.framer.push(byte) {
                Some(Frame::Code(code)) => {
                    if self.verifier.verify(&code) {
                        info!("disarm: code accepted");
                        valid = true;
                    } else {
                        warn!("disarm: code rejected");
                    }
                }
                Some(Frame::TimeSync(secs)) => self.time_sync = Some(secs),
                None => {}
            }
        }
        valid
    }

    /// Unix seconds from the last time line, once.
    pub fn take_time_sync(&mut self) -> Option<u64> {
        self.time_sync.take()
    }

    /// Drain the UART receive buffer without blocking.  `true` if a
    /// valid disarm code arrived.
    pub fn poll(&mut self) -> bool {
        let mut buf = [0u8; 32];
        let mut valid = false;
        loop {
            let n = hw_init::uart_read(&mut buf);
            if n == 0 {
                break;
            }
            valid |= self.accept_bytes(&buf[..n]);
        }
        valid
    }
}

impl AlertPort for UartLink {
    fn send_alert(&mut self, alert: Alert) -> Result<(), CommsError> {
        if self.limiter.try_consume(1).is_err() {
            return Err(CommsError::RateLimited);
        }
        let line = format_alert(alert)?;
        hw_init::uart_write(line.as_bytes())
    }
}

#[cfg(target_os = "espidf")]
fn platform_now() -> Duration {
    // SAFETY: esp_timer_get_time reads the monotonic high-res timer.
    let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
    Duration::from_micros(us.max(0) as u64)
}

#[cfg(not(target_os = "espidf"))]
fn platform_now() -> Duration {
    use std::time::Instant;
    static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
    START.get_or_init(Instant::now).elapsed()
}
