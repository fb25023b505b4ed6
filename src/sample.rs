use byteorder::{ByteOrder, LittleEndian};

use crate::config::HPA_PER_LSB_24;
use crate::registers::SAMPLE_LEN;

/// LSB per °C of `TEMP_OUT`.
const TEMPERATURE_SENSITIVITY: f32 = 100.0;

/// One `PRESS_OUT_XL..=TEMP_OUT_H` block as read from the device.
pub type RawSample = [u8; SAMPLE_LEN];

/// A decoded measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// hPa
    pub pressure: f32,
    /// °C
    pub temperature: f32,
}

/// Sign-extends the 24-bit little-endian two's-complement pressure word.
pub fn raw_pressure(bytes: &[u8]) -> i32 {
    LittleEndian::read_i24(&bytes[..3])
}

pub fn raw_temperature(bytes: &[u8]) -> i16 {
    LittleEndian::read_i16(&bytes[..2])
}

pub fn decode_pressure(bytes: &[u8]) -> f32 {
    raw_pressure(bytes) as f32 * HPA_PER_LSB_24
}

pub fn decode_temperature(bytes: &[u8]) -> f32 {
    raw_temperature(bytes) as f32 / TEMPERATURE_SENSITIVITY
}

impl Sample {
    /// Decodes a 5-byte output block.
    pub fn decode(raw: &[u8]) -> Self {
        Self {
            pressure: decode_pressure(&raw[..3]),
            temperature: decode_temperature(&raw[3..SAMPLE_LEN]),
        }
    }

    /// Averages consecutive 5-byte blocks, pressure and temperature accumulated separately.
    ///
    /// Returns `None` when `raw` holds no complete block; a trailing partial block is ignored.
    pub fn mean(raw: &[u8]) -> Option<Self> {
        let mut count = 0u32;
        let mut pressure = 0.0f32;
        let mut temperature = 0.0f32;

        for block in raw.chunks_exact(SAMPLE_LEN) {
            let sample = Self::decode(block);
            pressure += sample.pressure;
            temperature += sample.temperature;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            pressure: pressure / count as f32,
            temperature: temperature / count as f32,
        })
    }
}
