/// Expected content of `WHO_AM_I`.
pub const DEVICE_ID: u8 = 0xB1;

/// Hardware FIFO depth in samples.
pub const FIFO_DEPTH: usize = 32;

/// Bytes per output sample: 3 pressure + 2 temperature.
pub const SAMPLE_LEN: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    InterruptCfg,
    ThsPL,
    ThsPH,
    WhoAmI,
    CtrlReg1,
    CtrlReg2,
    CtrlReg3,
    FifoCtrl,
    RefPXl,
    RefPL,
    RefPH,
    RpdsL,
    RpdsH,
    ResConf,
    IntSource,
    FifoStatus,
    Status,
    PressOutXl,
    PressOutL,
    PressOutH,
    TempOutL,
    TempOutH,
    LpfpRes,
}

impl Register {
    pub const ALL: [Register; 23] = [
        Self::InterruptCfg,
        Self::ThsPL,
        Self::ThsPH,
        Self::WhoAmI,
        Self::CtrlReg1,
        Self::CtrlReg2,
        Self::CtrlReg3,
        Self::FifoCtrl,
        Self::RefPXl,
        Self::RefPL,
        Self::RefPH,
        Self::RpdsL,
        Self::RpdsH,
        Self::ResConf,
        Self::IntSource,
        Self::FifoStatus,
        Self::Status,
        Self::PressOutXl,
        Self::PressOutL,
        Self::PressOutH,
        Self::TempOutL,
        Self::TempOutH,
        Self::LpfpRes,
    ];

    pub fn addr(self) -> u8 {
        match self {
            Self::InterruptCfg => 0x0B,
            Self::ThsPL => 0x0C,
            Self::ThsPH => 0x0D,
            Self::WhoAmI => 0x0F,
            Self::CtrlReg1 => 0x10,
            Self::CtrlReg2 => 0x11,
            Self::CtrlReg3 => 0x12,
            Self::FifoCtrl => 0x14,
            Self::RefPXl => 0x15,
            Self::RefPL => 0x16,
            Self::RefPH => 0x17,
            Self::RpdsL => 0x18,
            Self::RpdsH => 0x19,
            Self::ResConf => 0x1A,
            Self::IntSource => 0x25,
            Self::FifoStatus => 0x26,
            Self::Status => 0x27,
            Self::PressOutXl => 0x28,
            Self::PressOutL => 0x29,
            Self::PressOutH => 0x2A,
            Self::TempOutL => 0x2B,
            Self::TempOutH => 0x2C,
            Self::LpfpRes => 0x33,
        }
    }

    /// Reading pops the FIFO or resets the low-pass filter.
    pub fn read_has_side_effects(self) -> bool {
        matches!(
            self,
            Self::PressOutXl
                | Self::PressOutL
                | Self::PressOutH
                | Self::TempOutL
                | Self::TempOutH
                | Self::LpfpRes
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::InterruptCfg => "INTERRUPT_CFG",
            Self::ThsPL => "THS_P_L",
            Self::ThsPH => "THS_P_H",
            Self::WhoAmI => "WHO_AM_I",
            Self::CtrlReg1 => "CTRL_REG1",
            Self::CtrlReg2 => "CTRL_REG2",
            Self::CtrlReg3 => "CTRL_REG3",
            Self::FifoCtrl => "FIFO_CTRL",
            Self::RefPXl => "REF_P_XL",
            Self::RefPL => "REF_P_L",
            Self::RefPH => "REF_P_H",
            Self::RpdsL => "RPDS_L",
            Self::RpdsH => "RPDS_H",
            Self::ResConf => "RES_CONF",
            Self::IntSource => "INT_SOURCE",
            Self::FifoStatus => "FIFO_STATUS",
            Self::Status => "STATUS",
            Self::PressOutXl => "PRESS_OUT_XL",
            Self::PressOutL => "PRESS_OUT_L",
            Self::PressOutH => "PRESS_OUT_H",
            Self::TempOutL => "TEMP_OUT_L",
            Self::TempOutH => "TEMP_OUT_H",
            Self::LpfpRes => "LPFP_RES",
        }
    }
}

/* CTRL_REG1
 * B7   B6   B5   B4   B3      B2       B1   B0
 * 0    ODR2 ODR1 ODR0 EN_LPFP LPFP_CFG BDU  SIM
 */
pub const ODR_LOC: u8 = 4;
pub const LPF_LOC: u8 = 2;
pub const BDU: u8 = 1 << 1;

/* CTRL_REG2
 * B7   B6      B5          B4         B3      B2      B1  B0
 * BOOT FIFO_EN STOP_ON_FTH IF_ADD_INC I2C_DIS SWRESET 0   ONE_SHOT
 */
pub const FIFO_EN: u8 = 1 << 6;
pub const IF_ADD_INC: u8 = 1 << 4;
pub const SWRESET: u8 = 1 << 2;

/* FIFO_CTRL
 * B7     B6     B5     B4   ..  B0
 * F_MODE2 F_MODE1 F_MODE0 WTM4 .. WTM0
 */
pub const FIFO_MODE_LOC: u8 = 5;

/* FIFO_STATUS
 * B7      B6  B5 .. B0
 * FTH_FIFO OVR FSS5 .. FSS0
 */
pub const FIFO_LEVEL_MASK: u8 = 0x3F;

/* STATUS
 * B5   B4   B1   B0
 * T_OR P_OR T_DA P_DA
 */
pub const P_DA: u8 = 1 << 0;
pub const T_DA: u8 = 1 << 1;

/// Output data rate, `CTRL_REG1[6:4]`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDataRate {
    PowerDown = 0,
    Hz1 = 1,
    Hz10 = 2,
    Hz25 = 3,
    Hz50 = 4,
    Hz75 = 5,
}

/// Low-pass filter selection, `CTRL_REG1[3:2]` (`EN_LPFP`, `LPFP_CFG`).
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LowPassFilter {
    /// Filter off, bandwidth ODR/2
    Disabled = 0b00,
    OdrDiv9 = 0b10,
    OdrDiv20 = 0b11,
}

/// FIFO mode selector, `FIFO_CTRL[7:5]`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoMode {
    Bypass = 0b000,
    Stream = 0b010,
}
