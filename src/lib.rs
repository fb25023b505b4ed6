#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod dwt_delay;
pub mod lps22hb;
pub mod registers;
pub mod sample;

pub use config::Config;
pub use lps22hb::{Address, Error, Lps22hb};
pub use sample::Sample;

#[cfg(feature = "firmware")]
mod firmware {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use defmt_rtt as _; // global logger
    use panic_probe as _;
    use stm32f4xx_hal as _;

    static COUNT: AtomicUsize = AtomicUsize::new(0);

    // log sequence number, not time
    defmt::timestamp!("{=usize}", {
        // NOTE(no-CAS) `timestamps` runs with interrupts disabled
        let n = COUNT.load(Ordering::Relaxed);
        COUNT.store(n + 1, Ordering::Relaxed);
        n
    });
}

/// Parks the core on a breakpoint; called when the sensor cannot be set up.
#[cfg(feature = "firmware")]
pub fn exit() -> ! {
    loop {
        cortex_m::asm::bkpt();
    }
}
