//! One-shot hardware peripheral initialization and raw pin helpers.
//!
//! Configures the ADC1 oneshot unit and the decoder / display GPIO outputs
//! using raw ESP-IDF sys calls.  Called once from `main()` before the
//! control loop starts.  On the host every helper is a simulation stub.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::{InitError, SensorError};
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), InitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), InitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), InitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(InitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in 0..=pins::MAX_ADC_CHANNEL {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), u32::from(channel), &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(InitError::AdcInitFailed(ret));
        }
    }

    info!("hw_init: ADC1 configured (CH0-3=moisture, CH4=reference)");
    Ok(())
}

/// Read one ADC1 channel, scaled from 12 to 10 bits.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u8) -> Result<u16, SensorError> {
    if channel > pins::MAX_ADC_CHANNEL {
        return Err(SensorError::UnknownInput(channel));
    }
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), u32::from(channel), &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok((raw.max(0) as u16) >> pins::ADC_TO_CALIBRATION_SHIFT)
}

// Simulated ADC: one injectable 10-bit value per wired channel.
#[cfg(not(target_os = "espidf"))]
static SIM_ADC: [core::sync::atomic::AtomicU16; pins::MAX_ADC_CHANNEL as usize + 1] =
    [const { core::sync::atomic::AtomicU16::new(512) }; pins::MAX_ADC_CHANNEL as usize + 1];

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: u8, raw: u16) {
    if let Some(slot) = SIM_ADC.get(usize::from(channel)) {
        slot.store(raw.min(1023), core::sync::atomic::Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u8) -> Result<u16, SensorError> {
    SIM_ADC
        .get(usize::from(channel))
        .map(|slot| slot.load(core::sync::atomic::Ordering::Relaxed))
        .ok_or(SensorError::UnknownInput(channel))
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), InitError> {
    let output_pins = [
        pins::DECODER_A0_GPIO,
        pins::DECODER_A1_GPIO,
        pins::DECODER_A2_GPIO,
        pins::DECODER_ENABLE_GPIO,
        pins::DISPLAY_ENABLE_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(InitError::GpioConfigFailed(ret));
        }
        // Everything starts powered down.
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured (decoder, display enable)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    log::trace!("gpio(sim): {} <- {}", pin, u8::from(high));
}
