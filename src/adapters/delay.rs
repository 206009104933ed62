//! Blocking delay adapter.
//!
//! Implements [`DelayNs`] for the settle and pump windows.  On target
//! millisecond waits go through FreeRTOS `vTaskDelay` (the control task
//! yields for the whole window) and sub-millisecond waits spin on the ROM
//! `ets_delay_us`.  On the host both map to `std::thread::sleep`.

use embedded_hal::delay::DelayNs;

#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::{Ets, FreeRtos};

#[derive(Debug, Default, Clone, Copy)]
pub struct BlockingDelay;

impl BlockingDelay {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl DelayNs for BlockingDelay {
    fn delay_ns(&mut self, ns: u32) {
        Ets::delay_us(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        Ets::delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for BlockingDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(core::time::Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(core::time::Duration::from_millis(u64::from(ms)));
    }
}
