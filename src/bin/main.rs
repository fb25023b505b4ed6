#![no_main]
#![no_std]

use lps22hb_rs as _; // global logger + panicking-behavior + memory layout

#[rtic::app(device = stm32f4xx_hal::pac, peripherals = true)]
mod app {
    use embedded_hal::blocking::delay::DelayMs;
    use lps22hb_rs::config::{
        Config, FifoMode, LowPassFilter, OutputDataRate, RegisterAccess,
    };
    use lps22hb_rs::dwt_delay::DwtDelay;
    use lps22hb_rs::lps22hb::{Address, Lps22hb};
    use stm32f4xx_hal::i2c::I2c;
    use stm32f4xx_hal::pac::I2C1;
    use stm32f4xx_hal::prelude::*;

    type Sensor = Lps22hb<I2c<I2C1>>;

    const SENSOR_ADDRESS: Address = Address::Sa0Low;

    const SENSOR_CONFIG: Config = Config {
        odr: OutputDataRate::Hz25,
        lpf: LowPassFilter::OdrDiv9,
        block_data_update: true,
        fifo_mode: FifoMode::Stream,
        register_access: RegisterAccess::AutoIncrement,
        reference_pressure: 0.0,
        pressure_offset: 0.0,
    };

    /// Poll period, several samples accumulate in the FIFO in between
    const POLL_PERIOD_MS: u32 = 200;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        sensor: Sensor,
        delay: DwtDelay,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut core: cortex_m::Peripherals = cx.core;
        let device: stm32f4xx_hal::pac::Peripherals = cx.device;

        let rcc = device.RCC.constrain();
        let clocks = rcc.cfgr.use_hse(25.MHz()).sysclk(96.MHz()).freeze();

        let mut delay = DwtDelay::new(&mut core.DCB, &mut core.DWT, clocks.sysclk().raw());
        defmt::debug!("DWT delay at {=u32} cycles/us", delay.cycles_per_us());

        let gpiob = device.GPIOB.split();
        let i2c = I2c::new(device.I2C1, (gpiob.pb8, gpiob.pb9), 400.kHz(), &clocks);

        // boot time after power-up
        delay.delay_ms(5u32);

        let mut sensor = Lps22hb::new(i2c, SENSOR_ADDRESS);
        if let Err(e) = sensor.init(&SENSOR_CONFIG) {
            defmt::error!("Sensor setup failed: {}", defmt::Debug2Format(&e));
            lps22hb_rs::exit();
        }
        if sensor.dump_registers().is_err() {
            defmt::warn!("Register dump failed.");
        }

        defmt::debug!("Init done.");
        (Shared {}, Local { sensor, delay }, init::Monotonics())
    }

    #[idle(local = [sensor, delay])]
    fn idle(cx: idle::Context) -> ! {
        let sensor: &mut Sensor = cx.local.sensor;
        let delay: &mut DwtDelay = cx.local.delay;
        loop {
            if let Some(sample) = sensor.read_data() {
                defmt::info!(
                    "pressure: {=f32} hPa, temperature: {=f32} degC",
                    sample.pressure,
                    sample.temperature
                );
            }
            delay.delay_ms(POLL_PERIOD_MS);
        }
    }
}
