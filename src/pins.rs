//! GPIO / peripheral pin assignments for the room controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Analog inputs (ADC1)
// ---------------------------------------------------------------------------

/// TMP36 temperature sensor output.  ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 1;
pub const TEMP_ADC_CHANNEL: u32 = 0;

/// MQ-2 smoke sensor analog output.  ADC1 channel 1 (GPIO 2 on ESP32-S3).
pub const SMOKE_ADC_GPIO: i32 = 2;
pub const SMOKE_ADC_CHANNEL: u32 = 1;

// ---------------------------------------------------------------------------
// Digital inputs
// ---------------------------------------------------------------------------

/// HC-SR501 PIR output.  HIGH = motion.
pub const PIR_GPIO: i32 = 6;
/// Door reed switch with internal pull-up, active-low.
/// LOW = door open, HIGH = closed.
pub const DOOR_REED_GPIO: i32 = 7;
/// Momentary arm button, active-low with pull-up.
pub const ARM_BUTTON_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Digital outputs
// ---------------------------------------------------------------------------

/// Heating relay, HIGH = energised.
pub const HVAC_HEAT_GPIO: i32 = 8;
/// Cooling relay, HIGH = energised.
pub const HVAC_COOL_GPIO: i32 = 9;
/// Electric strike driver, HIGH = locked.
pub const STRIKE_GPIO: i32 = 10;
/// Siren driver transistor, HIGH = sounding.
pub const SIREN_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// PWM outputs (LEDC)
// ---------------------------------------------------------------------------

pub const FAN_PWM_GPIO: i32 = 12;
pub const LED_STRIP_PWM_GPIO: i32 = 13;

/// Fan MOSFET frequency, above audible range.
pub const FAN_PWM_FREQ_HZ: u32 = 25_000;
/// LED strip frequency, flicker-free.
pub const LED_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// I²C bus (SHT31 humidity sensor)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;
pub const I2C_PORT: i32 = 0;
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// UART link to the Wi-Fi bridge
// ---------------------------------------------------------------------------

pub const BRIDGE_UART_PORT: i32 = 1;
pub const BRIDGE_UART_TX_GPIO: i32 = 17;
pub const BRIDGE_UART_RX_GPIO: i32 = 18;
pub const BRIDGE_UART_BAUD: i32 = 9_600;
