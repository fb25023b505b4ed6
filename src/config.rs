use byteorder::{ByteOrder, LittleEndian};

use crate::registers;
pub use crate::registers::{FifoMode, LowPassFilter, OutputDataRate};

/// LSB of the 16-bit offset and threshold registers, in hPa.
pub const HPA_PER_LSB_16: f32 = 1.0 / 16.0;
/// LSB of the 24-bit reference and output pressure registers, in hPa.
pub const HPA_PER_LSB_24: f32 = 1.0 / 4096.0;

const I24_MIN: i32 = -0x80_0000;
const I24_MAX: i32 = 0x7F_FFFF;

/// How multi-byte register blocks are transferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterAccess {
    /// One transaction per block, the device increments the address (`IF_ADD_INC` set)
    AutoIncrement,
    /// One single-byte transaction per register (`IF_ADD_INC` cleared)
    PerByte,
}

/// Sensor settings applied by [`Lps22hb::init`](crate::lps22hb::Lps22hb::init).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub odr: OutputDataRate,
    pub lpf: LowPassFilter,
    /// Output registers are not updated until both MSB and LSB have been read
    pub block_data_update: bool,
    pub fifo_mode: FifoMode,
    pub register_access: RegisterAccess,
    /// Reference pressure in hPa
    pub reference_pressure: f32,
    /// Pressure offset in hPa
    pub pressure_offset: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            odr: OutputDataRate::Hz10,
            lpf: LowPassFilter::Disabled,
            block_data_update: true,
            fifo_mode: FifoMode::Bypass,
            register_access: RegisterAccess::AutoIncrement,
            reference_pressure: 0.0,
            pressure_offset: 0.0,
        }
    }
}

impl Config {
    /// `CTRL_REG1` payload.
    pub fn ctrl_reg1(&self) -> u8 {
        let mut value = (self.odr as u8) << registers::ODR_LOC | (self.lpf as u8) << registers::LPF_LOC;
        if self.block_data_update {
            value |= registers::BDU;
        }
        value
    }

    /// `CTRL_REG2` payload written as the last initialization step.
    pub fn ctrl_reg2(&self) -> u8 {
        let mut value = 0;
        if self.fifo_mode != FifoMode::Bypass {
            value |= registers::FIFO_EN;
        }
        if self.register_access == RegisterAccess::AutoIncrement {
            value |= registers::IF_ADD_INC;
        }
        value
    }

    /// `FIFO_CTRL` payload, watermark left at zero.
    pub fn fifo_ctrl(&self) -> u8 {
        (self.fifo_mode as u8) << registers::FIFO_MODE_LOC
    }
}

/// Signed 1/16 hPa encoding used by `RPDS` and `THS_P`.
pub fn encode_hpa_16(hpa: f32) -> i16 {
    // float to int `as` casts saturate
    libm::roundf(hpa / HPA_PER_LSB_16) as i16
}

pub fn decode_hpa_16(raw: i16) -> f32 {
    raw as f32 * HPA_PER_LSB_16
}

/// Signed 1/4096 hPa encoding used by `REF_P`, clamped to 24 bits.
pub fn encode_hpa_24(hpa: f32) -> i32 {
    let raw = libm::roundf(hpa / HPA_PER_LSB_24) as i32;
    raw.clamp(I24_MIN, I24_MAX)
}

pub fn decode_hpa_24(raw: i32) -> f32 {
    raw as f32 * HPA_PER_LSB_24
}

/// Little-endian payload for a 16-bit 1/16 hPa register pair.
pub fn hpa_16_bytes(hpa: f32) -> [u8; 2] {
    let mut buf = [0u8; 2];
    LittleEndian::write_i16(&mut buf, encode_hpa_16(hpa));
    buf
}

/// Little-endian payload for the 24-bit 1/4096 hPa reference register.
pub fn hpa_24_bytes(hpa: f32) -> [u8; 3] {
    let mut buf = [0u8; 3];
    LittleEndian::write_i24(&mut buf, encode_hpa_24(hpa));
    buf
}
