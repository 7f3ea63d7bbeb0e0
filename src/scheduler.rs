//! Fixed-cadence tick pacing.
//!
//! ```text
//!  boundary      boundary      boundary
//!     │─ work ─┐    │─ work ──────┼──┐   │
//!     │        └ sleep ┘          │  └ overrun: resync to now
//!     ▼             ▼             ▼      ▼
//! ```
//!
//! The main loop asks the pacer how long to sleep after each tick.  The
//! next boundary advances by exactly one period so jitter does not
//! accumulate.  If a tick runs past its boundary the pacer counts an
//! overrun and re-anchors on the current time instead of trying to catch
//! up with a burst of back-to-back ticks.

use log::warn;

pub struct TickPacer {
    period_ms: u64,
    next_boundary_ms: u64,
    overruns: u32,
}

impl TickPacer {
    /// Start pacing with the first boundary one period after `now_ms`.
    pub fn new(period_ms: u32, now_ms: u64) -> Self {
        let period_ms = u64::from(period_ms.max(1));
        Self {
            period_ms,
            next_boundary_ms: now_ms + period_ms,
            overruns: 0,
        }
    }

    /// Milliseconds to sleep before the next tick, given the time the
    /// current tick finished.  Returns 0 on an overrun.
    pub fn wait_ms(&mut self, now_ms: u64) -> u64 {
        if now_ms <= self.next_boundary_ms {
            let wait = self.next_boundary_ms - now_ms;
            self.next_boundary_ms += self.period_ms;
            return wait;
        }

        self.overruns = self.overruns.saturating_add(1);
        warn!(
            "tick overrun: {} ms late (total {})",
            now_ms - self.next_boundary_ms,
            self.overruns
        );
        self.next_boundary_ms = now_ms + self.period_ms;
        0
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Ticks that finished after their boundary since startup.
    pub fn overruns(&self) -> u32 {
        self.overruns
    }
}
