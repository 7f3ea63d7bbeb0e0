//! Monotonic clock adapter.
//!
//! - **`target_os = "espidf"`**: `esp_timer_get_time()` for uptime and
//!   `gettimeofday` + `localtime_r` for the wall-clock hour, honouring
//!   the `TZ` environment variable.  The RTC is set with `settimeofday`
//!   from `TIME:` lines the bridge sends over the UART.
//! - **`not(target_os = "espidf")`**: `std::time::Instant`; the hour is
//!   UTC, counted from the last sync.

use crate::app::ports::Clock;
use crate::error::CommsError;

/// Anything before 2020-01-01 means the wall clock was never set.
const EPOCH_2020: u64 = 1_577_836_800;

pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
    /// Unix seconds at the last sync, and when it arrived.
    #[cfg(not(target_os = "espidf"))]
    wall: Option<(u64, std::time::Instant)>,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
            #[cfg(not(target_os = "espidf"))]
            wall: None,
        }
    }

    /// Set the wall clock to `epoch_secs` (Unix seconds, UTC).
    #[cfg(target_os = "espidf")]
    pub fn set_wall_clock(&mut self, epoch_secs: u64) -> Result<(), CommsError> {
        use esp_idf_svc::sys::{settimeofday, time_t, timeval};

        let secs = checked_epoch(epoch_secs)?;
        let tv = timeval {
            tv_sec: secs as time_t,
            tv_usec: 0,
        };
        // SAFETY: tv is a valid timeval; timezone argument may be null.
        if unsafe { settimeofday(&tv, core::ptr::null()) } != 0 {
            return Err(CommsError::BadTimeSync);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn set_wall_clock(&mut self, epoch_secs: u64) -> Result<(), CommsError> {
        checked_epoch(epoch_secs)?;
        self.wall = Some((epoch_secs, std::time::Instant::now()));
        Ok(())
    }
}

fn checked_epoch(epoch_secs: u64) -> Result<i64, CommsError> {
    i64::try_from(epoch_secs)
        .ok()
        .filter(|_| epoch_secs >= EPOCH_2020)
        .ok_or(CommsError::BadTimeSync)
}

impl Clock for MonotonicClock {
    #[cfg(target_os = "espidf")]
    fn now_ms(&self) -> u64 {
        // SAFETY: esp_timer_get_time reads the monotonic high-res timer.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }).max(0) as u64 / 1_000
    }

    #[cfg(not(target_os = "espidf"))]
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    #[cfg(target_os = "espidf")]
    fn current_hour(&self) -> Option<u8> {
        use esp_idf_svc::sys::{gettimeofday, localtime_r, time_t, timeval, tm};

        let mut tv = timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        // SAFETY: tv is a valid out-pointer; timezone argument may be null.
        if unsafe { gettimeofday(&mut tv, core::ptr::null_mut()) } != 0 {
            return None;
        }
        if (tv.tv_sec as i64) < EPOCH_2020 as i64 {
            return None;
        }
        let secs = tv.tv_sec as time_t;
        // SAFETY: tm is plain data; localtime_r fills it or returns null.
        let mut local: tm = unsafe { core::mem::zeroed() };
        if unsafe { localtime_r(&secs, &mut local) }.is_null() {
            return None;
        }
        u8::try_from(local.tm_hour).ok().filter(|h| *h < 24)
    }

    #[cfg(not(target_os = "espidf"))]
    fn current_hour(&self) -> Option<u8> {
        let (epoch, at) = self.wall?;
        let secs = epoch + at.elapsed().as_secs();
        u8::try_from(secs / 3_600 % 24).ok()
    }
}
