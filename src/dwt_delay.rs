use cortex_m::peripheral::{DCB, DWT};
use embedded_hal::blocking::delay::{DelayMs, DelayUs};

/// Longest single busy-wait, half the counter range so a wrapped `CYCCNT` is never ambiguous
const MAX_WAIT_CYCLES: u32 = u32::MAX / 2;

/// Busy-wait delay on the DWT cycle counter.
///
/// Accuracy is bounded by the core clock, not by a timer prescaler, and the
/// counter keeps running while interrupts are served, so time spent in
/// handlers counts towards the delay.
pub struct DwtDelay {
    cycles_per_us: u32,
}

impl DwtDelay {
    /// Enables trace, zeroes `CYCCNT` and starts it.
    pub fn new(dcb: &mut DCB, dwt: &mut DWT, sysclk_hz: u32) -> Self {
        dcb.enable_trace();
        // Cortex-M7 keeps the DWT behind a lock
        DWT::unlock();
        dwt.set_cycle_count(0);
        dwt.enable_cycle_counter();

        Self {
            cycles_per_us: sysclk_hz / 1_000_000,
        }
    }

    pub fn cycles_per_us(&self) -> u32 {
        self.cycles_per_us
    }

    pub fn delay_cycles(&self, cycles: u64) {
        let mut remaining = cycles;
        while remaining > 0 {
            let wait = remaining.min(MAX_WAIT_CYCLES as u64) as u32;
            let start = DWT::cycle_count();
            while elapsed(start, DWT::cycle_count()) < wait {}
            remaining -= wait as u64;
        }
    }
}

/// Cycles between two `CYCCNT` readings, across one wrap.
pub fn elapsed(start: u32, now: u32) -> u32 {
    now.wrapping_sub(start)
}

pub fn us_to_cycles(us: u32, cycles_per_us: u32) -> u64 {
    us as u64 * cycles_per_us as u64
}

pub fn ms_to_cycles(ms: u32, cycles_per_us: u32) -> u64 {
    us_to_cycles(ms, cycles_per_us) * 1_000
}

macro_rules! dwt_delays {
    ($($t:ty),+) => {
        $(
            impl DelayUs<$t> for DwtDelay {
                fn delay_us(&mut self, us: $t) {
                    self.delay_cycles(us_to_cycles(u32::from(us), self.cycles_per_us));
                }
            }

            impl DelayMs<$t> for DwtDelay {
                fn delay_ms(&mut self, ms: $t) {
                    self.delay_cycles(ms_to_cycles(u32::from(ms), self.cycles_per_us));
                }
            }
        )+
    }
}

dwt_delays!(u8, u16, u32);
