//! LPS22HB barometric pressure and temperature sensor over I2C.
//!
//! The driver owns its bus and remembers the FIFO mode and register access
//! strategy applied by the last successful [`Lps22hb::init`]. Reads never
//! block: when the device has nothing new, they return `None`.

use core::fmt::Debug;

use embedded_hal::blocking::i2c::{Write, WriteRead};
use heapless::Vec;

use crate::config::{hpa_16_bytes, hpa_24_bytes, Config, FifoMode, RegisterAccess};
use crate::registers::{
    Register, DEVICE_ID, FIFO_DEPTH, FIFO_LEVEL_MASK, P_DA, SAMPLE_LEN, SWRESET, T_DA,
};
use crate::sample::{decode_pressure, decode_temperature, RawSample, Sample};

#[cfg(feature = "defmt")]
use defmt::{debug, error, info, warn, Debug2Format};

// Stub macros when defmt is not available
#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! error {
    ($($arg:tt)*) => {{}};
}

/// Longest payload of a single register write (`REF_P_XL..=REF_P_H`).
pub const MAX_WRITE_LEN: usize = 3;

const FIFO_BUFFER_LEN: usize = FIFO_DEPTH * SAMPLE_LEN;

/// 7-bit slave address, selected by the SA0 pin.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    Sa0Low = 0x5C,
    Sa0High = 0x5D,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// Bus transaction failed
    I2c(E),
    /// `WHO_AM_I` returned something other than [`DEVICE_ID`]
    InvalidDevice(u8),
    /// Write payload longer than [`MAX_WRITE_LEN`]
    BufferOverflow,
}

pub struct Lps22hb<I2C> {
    i2c: I2C,
    address: u8,
    fifo_mode: FifoMode,
    access: RegisterAccess,
}

impl<I2C> Lps22hb<I2C> {
    /// Creates an uninitialized driver; mode and access start at the power-on defaults.
    pub fn new(i2c: I2C, address: Address) -> Self {
        Self {
            i2c,
            address: address as u8,
            fifo_mode: FifoMode::Bypass,
            access: RegisterAccess::AutoIncrement,
        }
    }

    pub fn i2c(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Releases the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn fifo_mode(&self) -> FifoMode {
        self.fifo_mode
    }

    pub fn register_access(&self) -> RegisterAccess {
        self.access
    }
}

impl<I2C, E> Lps22hb<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: Debug,
{
    /// Reads `buffer.len()` consecutive registers starting at `reg`.
    pub fn read_register(&mut self, reg: Register, buffer: &mut [u8]) -> Result<(), Error<E>> {
        self.read_with(self.access, reg.addr(), buffer)
    }

    /// Writes `data` to consecutive registers starting at `reg`.
    pub fn write_register(&mut self, reg: Register, data: &[u8]) -> Result<(), Error<E>> {
        self.write_with(self.access, reg.addr(), data)
    }

    fn read_with(
        &mut self,
        access: RegisterAccess,
        addr: u8,
        buffer: &mut [u8],
    ) -> Result<(), Error<E>> {
        match access {
            RegisterAccess::AutoIncrement => self
                .i2c
                .write_read(self.address, &[addr], buffer)
                .map_err(Error::I2c),
            RegisterAccess::PerByte => {
                for (offset, byte) in buffer.iter_mut().enumerate() {
                    self.i2c
                        .write_read(
                            self.address,
                            &[addr.wrapping_add(offset as u8)],
                            core::slice::from_mut(byte),
                        )
                        .map_err(Error::I2c)?;
                }
                Ok(())
            }
        }
    }

    fn write_with(&mut self, access: RegisterAccess, addr: u8, data: &[u8]) -> Result<(), Error<E>> {
        if data.len() > MAX_WRITE_LEN {
            return Err(Error::BufferOverflow);
        }

        match access {
            RegisterAccess::AutoIncrement => self.write_frame(addr, data),
            RegisterAccess::PerByte => {
                // no rollback, earlier bytes stay written
                for (offset, byte) in data.iter().enumerate() {
                    self.write_frame(addr.wrapping_add(offset as u8), core::slice::from_ref(byte))?;
                }
                Ok(())
            }
        }
    }

    fn write_frame(&mut self, addr: u8, data: &[u8]) -> Result<(), Error<E>> {
        let mut frame: Vec<u8, { MAX_WRITE_LEN + 1 }> = Vec::new();
        frame.push(addr).map_err(|_| Error::BufferOverflow)?;
        frame
            .extend_from_slice(data)
            .map_err(|_| Error::BufferOverflow)?;
        self.i2c.write(self.address, &frame).map_err(Error::I2c)
    }

    pub fn who_am_i(&mut self) -> Result<u8, Error<E>> {
        let mut id = [0u8];
        self.read_register(Register::WhoAmI, &mut id)?;
        Ok(id[0])
    }

    /// Checks the identity and applies `config`.
    ///
    /// Any failure aborts the sequence; registers written so far keep their
    /// new values and the stored mode is left untouched, so recover by calling
    /// `init` again. Calling it twice with the same `config` issues the same
    /// transactions both times.
    pub fn init(&mut self, config: &Config) -> Result<(), Error<E>> {
        info!("Initializing LPS22HB...");

        match self.configure(config) {
            Ok(()) => {
                self.fifo_mode = config.fifo_mode;
                self.access = config.register_access;
                info!(
                    "LPS22HB initialized, fifo: {}, access: {}",
                    self.fifo_mode, self.access
                );
                Ok(())
            }
            Err(e) => {
                error!("LPS22HB initialization failed: {}", Debug2Format(&e));
                Err(e)
            }
        }
    }

    fn configure(&mut self, config: &Config) -> Result<(), Error<E>> {
        // auto-increment is on after a soft reset, whatever was configured before
        const ACCESS: RegisterAccess = RegisterAccess::AutoIncrement;

        let id = self.who_am_i()?;
        if id != DEVICE_ID {
            return Err(Error::InvalidDevice(id));
        }

        self.write_with(ACCESS, Register::CtrlReg2.addr(), &[SWRESET])?;

        self.write_with(
            ACCESS,
            Register::RpdsL.addr(),
            &hpa_16_bytes(config.pressure_offset),
        )?;
        self.write_with(
            ACCESS,
            Register::RefPXl.addr(),
            &hpa_24_bytes(config.reference_pressure),
        )?;

        self.write_with(ACCESS, Register::FifoCtrl.addr(), &[config.fifo_ctrl()])?;
        self.write_with(ACCESS, Register::CtrlReg1.addr(), &[config.ctrl_reg1()])?;

        // reading LPFP_RES resets the low-pass filter
        let mut scratch = [0u8];
        self.read_with(ACCESS, Register::LpfpRes.addr(), &mut scratch)?;

        self.write_with(ACCESS, Register::CtrlReg2.addr(), &[config.ctrl_reg2()])
    }

    /// Sets the pressure interrupt threshold, 1/16 hPa resolution.
    pub fn set_pressure_threshold(&mut self, hpa: f32) -> Result<(), Error<E>> {
        self.write_register(Register::ThsPL, &hpa_16_bytes(hpa))
    }

    pub fn try_is_data_ready(&mut self) -> Result<bool, Error<E>> {
        let mut status = [0u8];
        self.read_register(Register::Status, &mut status)?;
        Ok(status[0] & (P_DA | T_DA) == P_DA | T_DA)
    }

    /// Both pressure and temperature hold a new sample. A bus error counts as not ready.
    #[allow(unused_variables)] // only logged
    pub fn is_data_ready(&mut self) -> bool {
        match self.try_is_data_ready() {
            Ok(ready) => ready,
            Err(e) => {
                warn!("LPS22HB status read failed: {}", Debug2Format(&e));
                false
            }
        }
    }

    /// Number of samples waiting in the FIFO.
    pub fn fifo_level(&mut self) -> Result<usize, Error<E>> {
        let mut status = [0u8];
        self.read_register(Register::FifoStatus, &mut status)?;
        Ok(((status[0] & FIFO_LEVEL_MASK) as usize).min(FIFO_DEPTH))
    }

    pub fn try_read_bypass(&mut self) -> Result<Option<Sample>, Error<E>> {
        if !self.try_is_data_ready()? {
            return Ok(None);
        }

        let mut raw: RawSample = [0; SAMPLE_LEN];
        self.read_register(Register::PressOutXl, &mut raw)?;
        Ok(Some(Sample::decode(&raw)))
    }

    /// Drains the FIFO and returns the mean of its samples.
    pub fn try_read_stream(&mut self) -> Result<Option<Sample>, Error<E>> {
        let count = self.fifo_level()?;
        if count == 0 {
            return Ok(None);
        }

        let mut buffer = [0u8; FIFO_BUFFER_LEN];
        let raw = &mut buffer[..count * SAMPLE_LEN];
        match self.access {
            // the output address wraps from TEMP_OUT_H back to PRESS_OUT_XL
            RegisterAccess::AutoIncrement => self.read_register(Register::PressOutXl, raw)?,
            RegisterAccess::PerByte => {
                for block in raw.chunks_exact_mut(SAMPLE_LEN) {
                    self.read_register(Register::PressOutXl, block)?;
                }
            }
        }

        Ok(Sample::mean(raw))
    }

    pub fn try_read_data(&mut self) -> Result<Option<Sample>, Error<E>> {
        match self.fifo_mode {
            FifoMode::Bypass => self.try_read_bypass(),
            FifoMode::Stream => self.try_read_stream(),
        }
    }

    /// Latest sample, or `None` when nothing new is available or the bus failed.
    pub fn read_bypass(&mut self) -> Option<Sample> {
        let result = self.try_read_bypass();
        self.discard_error(result)
    }

    /// Mean of the buffered samples, or `None` when the FIFO is empty or the bus failed.
    pub fn read_stream(&mut self) -> Option<Sample> {
        let result = self.try_read_stream();
        self.discard_error(result)
    }

    /// Reads according to the FIFO mode applied by [`init`](Self::init).
    pub fn read_data(&mut self) -> Option<Sample> {
        let result = self.try_read_data();
        self.discard_error(result)
    }

    /// Pressure in hPa.
    pub fn read_pressure(&mut self) -> Option<f32> {
        let result = self.try_read_pressure();
        self.discard_error(result)
    }

    /// Temperature in °C.
    pub fn read_temperature(&mut self) -> Option<f32> {
        let result = self.try_read_temperature();
        self.discard_error(result)
    }

    pub fn try_read_pressure(&mut self) -> Result<Option<f32>, Error<E>> {
        if !self.try_is_data_ready()? {
            return Ok(None);
        }

        let mut raw = [0u8; 3];
        self.read_register(Register::PressOutXl, &mut raw)?;
        Ok(Some(decode_pressure(&raw)))
    }

    pub fn try_read_temperature(&mut self) -> Result<Option<f32>, Error<E>> {
        if !self.try_is_data_ready()? {
            return Ok(None);
        }

        let mut raw = [0u8; 2];
        self.read_register(Register::TempOutL, &mut raw)?;
        Ok(Some(decode_temperature(&raw)))
    }

    #[allow(unused_variables)] // only logged
    fn discard_error<T>(&self, result: Result<Option<T>, Error<E>>) -> Option<T> {
        result.unwrap_or_else(|e| {
            warn!("LPS22HB read failed: {}", Debug2Format(&e));
            None
        })
    }

    /// Logs every register that can be read without side effects.
    pub fn dump_registers(&mut self) -> Result<(), Error<E>> {
        for reg in Register::ALL.iter().copied() {
            if reg.read_has_side_effects() {
                continue;
            }

            let mut value = [0u8];
            self.read_register(reg, &mut value)?;
            debug!(
                "{=str}({=u8:#x}) = {=u8:#x}",
                reg.name(),
                reg.addr(),
                value[0]
            );
        }
        Ok(())
    }
}
