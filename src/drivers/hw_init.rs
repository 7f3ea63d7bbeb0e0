//! One-shot hardware peripheral initialization and raw register helpers.
//!
//! Configures ADC channels, GPIO directions, LEDC timers/channels, the
//! I²C master and the bridge UART using raw ESP-IDF sys calls.  Called
//! once from `main()` before the control loop starts.  On host builds
//! the write helpers are no-ops that always succeed, so drivers can be
//! exercised in tests without hardware.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::{error, info};

#[cfg(target_os = "espidf")]
use crate::error::{CommsError, SensorError};
use crate::error::{ActuatorError, Error};
#[cfg(target_os = "espidf")]
use crate::pins;

pub const LEDC_CH_FAN: u32 = 0;
pub const LEDC_CH_LED_STRIP: u32 = 1;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), Error> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_ledc()?;
        init_i2c()?;
        init_uart()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), Error> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t, what: &'static str) -> Result<(), Error> {
    if ret == ESP_OK as esp_err_t {
        Ok(())
    } else {
        error!("hw_init: {} failed (rc={})", what, ret);
        Err(Error::Init(what))
    }
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), Error> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    check(
        unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) },
        "ADC1 unit",
    )?;

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for channel in [pins::TEMP_ADC_CHANNEL, pins::SMOKE_ADC_CHANNEL] {
        check(
            unsafe { adc_oneshot_config_channel(ADC1_HANDLE, channel, &chan_cfg) },
            "ADC1 channel",
        )?;
    }

    info!("hw_init: ADC1 configured (CH0=temp, CH1=smoke)");
    Ok(())
}

/// Read an ADC1 channel and scale the 12-bit conversion to the 10-bit
/// range the thresholds are specified in.
#[cfg(target_os = "espidf")]
pub fn adc1_read_10bit(channel: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: ADC1_HANDLE is written once during init_adc() before the
    // control loop starts; only the main loop reads it afterwards.
    let ret = unsafe { adc_oneshot_read(ADC1_HANDLE, channel, &mut raw) };
    if ret != ESP_OK as esp_err_t {
        return Err(SensorError::AdcReadFailed);
    }
    Ok((raw.clamp(0, 4095) as u16) >> 2)
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), Error> {
    // PIR has a push-pull output; reed and button need the pull-up.
    let inputs = [
        (pins::PIR_GPIO, gpio_pullup_t_GPIO_PULLUP_DISABLE),
        (pins::DOOR_REED_GPIO, gpio_pullup_t_GPIO_PULLUP_ENABLE),
        (pins::ARM_BUTTON_GPIO, gpio_pullup_t_GPIO_PULLUP_ENABLE),
    ];

    for (pin, pull_up) in inputs {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: pull_up,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        check(unsafe { gpio_config(&cfg) }, "GPIO input")?;
    }

    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: read-only register access on an already-configured input.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), Error> {
    let outputs = [
        pins::HVAC_HEAT_GPIO,
        pins::HVAC_COOL_GPIO,
        pins::STRIKE_GPIO,
        pins::SIREN_GPIO,
    ];

    for pin in outputs {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        check(unsafe { gpio_config(&cfg) }, "GPIO output")?;
        // Relays, strike and siren all start de-energised.
        check(unsafe { gpio_set_level(pin, 0) }, "GPIO output level")?;
    }

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    // SAFETY: pin was configured as an output in init_gpio_outputs();
    // only the main loop writes outputs.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret == ESP_OK as esp_err_t {
        Ok(())
    } else {
        Err(ActuatorError::GpioWriteFailed)
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) -> Result<(), ActuatorError> {
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), Error> {
    let timers = [
        (ledc_timer_t_LEDC_TIMER_0, pins::FAN_PWM_FREQ_HZ),
        (ledc_timer_t_LEDC_TIMER_1, pins::LED_PWM_FREQ_HZ),
    ];
    for (timer_num, freq_hz) in timers {
        let cfg = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num,
            duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
            freq_hz,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        check(unsafe { ledc_timer_config(&cfg) }, "LEDC timer")?;
    }

    let channels = [
        (LEDC_CH_FAN, ledc_timer_t_LEDC_TIMER_0, pins::FAN_PWM_GPIO),
        (LEDC_CH_LED_STRIP, ledc_timer_t_LEDC_TIMER_1, pins::LED_STRIP_PWM_GPIO),
    ];
    for (channel, timer_sel, gpio_num) in channels {
        let cfg = ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel,
            gpio_num,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        check(unsafe { ledc_channel_config(&cfg) }, "LEDC channel")?;
    }

    info!("hw_init: LEDC configured (fan=CH0, strip=CH1)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) -> Result<(), ActuatorError> {
    // SAFETY: channel configured in init_ledc(); main loop is the only writer.
    let ret = unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        if ret != ESP_OK as esp_err_t {
            ret
        } else {
            ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel)
        }
    };
    if ret == ESP_OK as esp_err_t {
        Ok(())
    } else {
        Err(ActuatorError::PwmWriteFailed)
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) -> Result<(), ActuatorError> {
    Ok(())
}

// ── I²C master ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
const I2C_TIMEOUT_TICKS: TickType_t = 2;

#[cfg(target_os = "espidf")]
unsafe fn init_i2c() -> Result<(), Error> {
    let mut cfg = i2c_config_t {
        mode: i2c_mode_t_I2C_MODE_MASTER,
        sda_io_num: pins::I2C_SDA_GPIO,
        scl_io_num: pins::I2C_SCL_GPIO,
        sda_pullup_en: true,
        scl_pullup_en: true,
        ..Default::default()
    };
    cfg.__bindgen_anon_1.master.clk_speed = pins::I2C_FREQ_HZ;

    check(unsafe { i2c_param_config(pins::I2C_PORT, &cfg) }, "I2C config")?;
    check(
        unsafe { i2c_driver_install(pins::I2C_PORT, i2c_mode_t_I2C_MODE_MASTER, 0, 0, 0) },
        "I2C driver",
    )?;
    info!("hw_init: I2C master on port {}", pins::I2C_PORT);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn i2c_write(addr: u8, bytes: &[u8]) -> Result<(), SensorError> {
    // SAFETY: driver installed in init_i2c(); buffer outlives the call.
    let ret = unsafe {
        i2c_master_write_to_device(
            pins::I2C_PORT,
            addr,
            bytes.as_ptr(),
            bytes.len(),
            I2C_TIMEOUT_TICKS,
        )
    };
    if ret == ESP_OK as esp_err_t {
        Ok(())
    } else {
        Err(SensorError::BusReadFailed)
    }
}

#[cfg(target_os = "espidf")]
pub fn i2c_read(addr: u8, buf: &mut [u8]) -> Result<(), SensorError> {
    // SAFETY: driver installed in init_i2c(); buffer outlives the call.
    let ret = unsafe {
        i2c_master_read_from_device(
            pins::I2C_PORT,
            addr,
            buf.as_mut_ptr(),
            buf.len(),
            I2C_TIMEOUT_TICKS,
        )
    };
    if ret == ESP_OK as esp_err_t {
        Ok(())
    } else {
        Err(SensorError::BusReadFailed)
    }
}

// ── UART (bridge link) ────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_uart() -> Result<(), Error> {
    let cfg = uart_config_t {
        baud_rate: pins::BRIDGE_UART_BAUD,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    check(
        unsafe { uart_driver_install(pins::BRIDGE_UART_PORT, 256, 256, 0, core::ptr::null_mut(), 0) },
        "UART driver",
    )?;
    check(
        unsafe { uart_param_config(pins::BRIDGE_UART_PORT, &cfg) },
        "UART config",
    )?;
    check(
        unsafe {
            uart_set_pin(
                pins::BRIDGE_UART_PORT,
                pins::BRIDGE_UART_TX_GPIO,
                pins::BRIDGE_UART_RX_GPIO,
                -1,
                -1,
            )
        },
        "UART pins",
    )?;
    info!("hw_init: bridge UART{} at {} baud", pins::BRIDGE_UART_PORT, pins::BRIDGE_UART_BAUD);
    Ok(())
}

/// Non-blocking read of whatever the bridge has sent.  Returns the number
/// of bytes placed in `buf`.
#[cfg(target_os = "espidf")]
pub fn uart_read(buf: &mut [u8]) -> usize {
    // SAFETY: driver installed in init_uart(); zero-tick timeout never blocks.
    let n = unsafe {
        uart_read_bytes(
            pins::BRIDGE_UART_PORT,
            buf.as_mut_ptr().cast(),
            buf.len() as u32,
            0,
        )
    };
    n.max(0) as usize
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_read(_buf: &mut [u8]) -> usize {
    0
}

#[cfg(target_os = "espidf")]
pub fn uart_write(bytes: &[u8]) -> Result<(), CommsError> {
    // SAFETY: driver installed in init_uart(); the driver copies into its
    // TX ring buffer before returning.
    let n = unsafe { uart_write_bytes(pins::BRIDGE_UART_PORT, bytes.as_ptr().cast(), bytes.len()) };
    if n == bytes.len() as i32 {
        Ok(())
    } else {
        Err(CommsError::UartWriteFailed)
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_write(_bytes: &[u8]) -> Result<(), crate::error::CommsError> {
    Ok(())
}
