//! Low-power sleep between duty cycles.
//!
//! The controller spends almost all of its life asleep.  [`LightSleep`]
//! implements the [`SleepPort`] with ESP-IDF light sleep and a timer
//! wake-up; RAM and peripherals are retained, so the control loop simply
//! resumes after each quantum.  The per-call bound keeps every individual
//! sleep short enough that a hung wake-up is noticed within seconds.

use log::debug;

use crate::app::ports::SleepPort;

/// Longest single light-sleep request.
pub const DEFAULT_SLEEP_QUANTUM_MS: u32 = 8000;

pub struct LightSleep {
    quantum_ms: u32,
    slept_ms: u64,
}

impl Default for LightSleep {
    fn default() -> Self {
        Self::new(DEFAULT_SLEEP_QUANTUM_MS)
    }
}

impl LightSleep {
    pub fn new(quantum_ms: u32) -> Self {
        Self {
            quantum_ms: quantum_ms.max(1),
            slept_ms: 0,
        }
    }

    /// Total time requested asleep since boot.
    pub fn slept_ms(&self) -> u64 {
        self.slept_ms
    }

    #[cfg(target_os = "espidf")]
    fn enter(&mut self, ms: u32) {
        use esp_idf_svc::sys::{ESP_OK, esp_light_sleep_start, esp_sleep_enable_timer_wakeup};

        // SAFETY: called from the single control task; the timer wake-up
        // source is re-armed before every sleep.
        unsafe {
            esp_sleep_enable_timer_wakeup(u64::from(ms) * 1000);
            let ret = esp_light_sleep_start();
            if ret != ESP_OK as i32 {
                log::warn!("light sleep rejected (rc={}), blocking instead", ret);
                std::thread::sleep(core::time::Duration::from_millis(u64::from(ms)));
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn enter(&mut self, ms: u32) {
        std::thread::sleep(core::time::Duration::from_millis(u64::from(ms)));
    }
}

impl SleepPort for LightSleep {
    fn max_sleep_ms(&self) -> u32 {
        self.quantum_ms
    }

    fn sleep_ms(&mut self, ms: u32) {
        let ms = ms.min(self.quantum_ms);
        debug!("sleep: {} ms", ms);
        self.enter(ms);
        self.slept_ms += u64::from(ms);
    }
}
