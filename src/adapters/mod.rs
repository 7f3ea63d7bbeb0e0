//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                 |
//! |------------|----------------|-----------------------------|
//! | `hardware` | SensorPort     | ESP32 ADC, GPIO, I2C        |
//! |            | ActuatorPort   | ESP32 LEDC PWM, GPIO        |
//! |            | AlertPort      | via `uart`                  |
//! | `log_sink` | EventSink      | Serial log output           |
//! | `time`     | Clock          | ESP32 system timer, RTC     |
//! | `uart`     | AlertPort      | Wi-Fi bridge UART           |

pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod uart;
