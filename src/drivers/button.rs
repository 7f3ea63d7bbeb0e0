//! Polled, debounced panel button with short and long press detection.
//!
//! ## Hardware
//!
//! Active-low momentary switch with the internal pull-up.  The main loop
//! samples the level every control tick (50 ms), which is already longer
//! than contact bounce, so a level must simply hold for [`DEBOUNCE_MS`]
//! before it counts.
//!
//! ## Gesture detection
//!
//! | Gesture     | Condition                          | Event        |
//! |-------------|------------------------------------|--------------|
//! | Short press | Released before `LONG_PRESS_MS`    | `ShortPress` |
//! | Long press  | Held for `LONG_PRESS_MS`, fires once while held | `LongPress`  |

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

pub const DEBOUNCE_MS: u64 = 40;
pub const LONG_PRESS_MS: u64 = 3_000;

#[cfg(not(target_os = "espidf"))]
static SIM_BUTTON_PRESSED: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_button_pressed(pressed: bool) {
    SIM_BUTTON_PRESSED.store(pressed, Ordering::Relaxed);
}

/// Button events emitted after gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    ShortPress,
    LongPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    Debounce { since_ms: u64 },
    Pressed { since_ms: u64 },
    /// Long press already reported; wait for release.
    Held,
}

pub struct PanelButton {
    gpio: i32,
    state: GestureState,
}

impl PanelButton {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            state: GestureState::Idle,
        }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Sample the pin and run the gesture machine.
    pub fn poll(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        let pressed = self.is_pressed_hw();
        self.update(pressed, now_ms)
    }

    /// Gesture machine over an already-sampled level.
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> Option<ButtonEvent> {
        match self.state {
            GestureState::Idle => {
                if pressed {
                    self.state = GestureState::Debounce { since_ms: now_ms };
                }
                None
            }

            GestureState::Debounce { since_ms } => {
                if !pressed {
                    self.state = GestureState::Idle;
                } else if now_ms.saturating_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = GestureState::Pressed { since_ms };
                }
                None
            }

            GestureState::Pressed { since_ms } => {
                if !pressed {
                    self.state = GestureState::Idle;
                    return Some(ButtonEvent::ShortPress);
                }
                if now_ms.saturating_sub(since_ms) >= LONG_PRESS_MS {
                    self.state = GestureState::Held;
                    return Some(ButtonEvent::LongPress);
                }
                None
            }

            GestureState::Held => {
                if !pressed {
                    self.state = GestureState::Idle;
                }
                None
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn is_pressed_hw(&self) -> bool {
        !crate::drivers::hw_init::gpio_read(self.gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_pressed_hw(&self) -> bool {
        SIM_BUTTON_PRESSED.load(Ordering::Relaxed)
    }
}
