//! Register configuration templates and FIFO timing
//!
//! The device is configured from ordered per-bank tables of
//! [`RegisterConfig`] entries. Each entry names the bits that must be set and
//! the bits that must be cleared in one register. The same tables drive both
//! the initial configuration pass and the periodic verification performed
//! while streaming.
//!
//! Only two groups of entries change at runtime:
//! - the FIFO watermark (`FIFO_CONFIG2`/`FIFO_CONFIG3`), derived from the per-cycle
//!   sample count computed by [`FifoTiming`]
//! - the clock input (`INTF_CONFIG1`, `INTF_CONFIG5`), selected by [`ClockInput`]
//!
//! # Example
//!
//! ```
//! use iim42652::{ClockInput, FifoTiming, RegisterTables};
//!
//! let timing = FifoTiming::from_rate_hz(1000);
//! assert_eq!(timing.samples(), 32);
//! assert_eq!(timing.empty_interval_us(), 1000);
//!
//! let tables = RegisterTables::new(ClockInput::Internal, timing.samples());
//! assert!(tables.iter().all(|r| r.set_bits & r.clear_bits == 0));
//! ```

use crate::fifo::{FIFO_FRAME_SIZE, FIFO_MAX_SAMPLES, FIFO_SAMPLE_DT_NS};
use crate::registers::{Register, bank0, bank1, bank2, bits};

/// Default desired output rate in Hz
pub const DEFAULT_OUTPUT_RATE_HZ: u32 = 400;

/// One register's required bit pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterConfig {
    /// Register the pattern applies to
    pub reg: Register,
    /// Bits that must read back as 1
    pub set_bits: u8,
    /// Bits that must read back as 0
    pub clear_bits: u8,
}

impl RegisterConfig {
    /// Create an entry
    ///
    /// # Panics
    ///
    /// Panics if `set_bits` and `clear_bits` overlap. In a `const` table this is a
    /// compile error.
    #[must_use]
    pub const fn new(reg: Register, set_bits: u8, clear_bits: u8) -> Self {
        assert!(
            set_bits & clear_bits == 0,
            "set and clear bits overlap"
        );
        Self {
            reg,
            set_bits,
            clear_bits,
        }
    }

    /// Apply the pattern to a register value
    #[must_use]
    pub const fn apply(&self, value: u8) -> u8 {
        (value & !self.clear_bits) | self.set_bits
    }

    /// Check that a register value satisfies the pattern
    #[must_use]
    pub const fn matches(&self, value: u8) -> bool {
        (value & self.set_bits) == self.set_bits && (value & self.clear_bits) == 0
    }
}

/// Source of the device's sample clock
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockInput {
    /// Internal RC/PLL clock
    #[default]
    Internal,
    /// External reference clock on pin 9 (CLKIN)
    External {
        /// Reference frequency in Hz (nominally 32768)
        frequency_hz: f32,
    },
}

impl ClockInput {
    /// Create from an optional frequency, treating zero as "no clock input"
    #[must_use]
    pub fn from_frequency(frequency_hz: f32) -> Self {
        if frequency_hz > 0.0 {
            Self::External { frequency_hz }
        } else {
            Self::Internal
        }
    }

    /// Whether an external clock drives the device
    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(self, Self::External { .. })
    }

    /// Whether an external frequency is usable
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::External { frequency_hz } => frequency_hz.is_finite() && frequency_hz > 0.0,
            Self::Internal => true,
        }
    }

    /// Factor converting raw FIFO timestamp deltas to microseconds
    ///
    /// With `TMST_RES = 0` the delta needs scaling by 32.768/f<sub>CLKIN</sub> (kHz)
    /// when an RTC clock is used, and by 32/30 on the internal clock.
    #[must_use]
    pub fn timestamp_scale(&self) -> f32 {
        match *self {
            Self::External { frequency_hz } => 32768.0 / frequency_hz,
            Self::Internal => 32.0 / 30.0,
        }
    }
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Identifier stamped on every published batch
    pub device_id: u32,
    /// Desired output (FIFO drain) rate in Hz
    pub output_rate_hz: u32,
    /// Sample clock source
    pub clock_input: ClockInput,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_id: 0,
            output_rate_hz: DEFAULT_OUTPUT_RATE_HZ,
            clock_input: ClockInput::Internal,
        }
    }
}

/// FIFO drain interval and per-cycle sample count
///
/// The interval is kept in nanoseconds so that `samples * 31.25 us` stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoTiming {
    samples: u8,
    empty_interval_ns: u32,
}

impl FifoTiming {
    /// Derive timing from a desired output rate
    ///
    /// The desired period is rounded to the nearest whole number of FIFO sample
    /// periods (at least one), clamped to [`FIFO_MAX_SAMPLES`], and the interval is
    /// recomputed from the final sample count. A rate of zero selects the longest
    /// interval.
    #[must_use]
    pub const fn from_rate_hz(rate_hz: u32) -> Self {
        let max = FIFO_MAX_SAMPLES as u32;
        let periods = if rate_hz == 0 {
            max
        } else {
            let period_ns = 1_000_000_000 / rate_hz;
            let rounded = (period_ns + FIFO_SAMPLE_DT_NS / 2) / FIFO_SAMPLE_DT_NS;
            if rounded == 0 { 1 } else { rounded }
        };
        let samples = if periods > max { max } else { periods };

        Self {
            samples: samples as u8,
            empty_interval_ns: samples * FIFO_SAMPLE_DT_NS,
        }
    }

    /// Frames drained per cycle
    #[must_use]
    pub const fn samples(&self) -> u8 {
        self.samples
    }

    /// Drain interval in nanoseconds
    #[must_use]
    pub const fn empty_interval_ns(&self) -> u32 {
        self.empty_interval_ns
    }

    /// Drain interval in whole microseconds
    #[must_use]
    pub const fn empty_interval_us(&self) -> u32 {
        self.empty_interval_ns / 1000
    }

    /// Drain rate in Hz
    #[must_use]
    pub fn rate_hz(&self) -> f32 {
        1e9 / self.empty_interval_ns as f32
    }

    /// FIFO watermark in bytes
    #[must_use]
    pub const fn watermark_bytes(&self) -> u16 {
        self.samples as u16 * FIFO_FRAME_SIZE as u16
    }
}

/// Duration of `samples` FIFO sample periods in whole microseconds
#[must_use]
pub const fn samples_to_us(samples: u8) -> u32 {
    samples as u32 * FIFO_SAMPLE_DT_NS / 1000
}

const BANK0_LEN: usize = 18;
const BANK1_LEN: usize = 2;
const BANK2_LEN: usize = 1;

const BANK0_TEMPLATE: [RegisterConfig; BANK0_LEN] = [
    RegisterConfig::new(
        bank0::INT_CONFIG,
        bits::int_config::INT1_MODE | bits::int_config::INT1_DRIVE_CIRCUIT | bits::int_config::INT1_POLARITY,
        0,
    ),
    RegisterConfig::new(
        bank0::FIFO_CONFIG,
        bits::fifo_config::FIFO_MODE_STOP_ON_FULL_SET,
        bits::fifo_config::FIFO_MODE_STOP_ON_FULL_CLEAR,
    ),
    RegisterConfig::new(
        bank0::INTF_CONFIG0,
        bits::intf_config0::FIFO_COUNT_ENDIAN
            | bits::intf_config0::SENSOR_DATA_ENDIAN
            | bits::intf_config0::UI_SIFS_CFG_DISABLE_I2C,
        bits::intf_config0::FIFO_COUNT_REC,
    ),
    // clock input, patched at runtime
    RegisterConfig::new(bank0::INTF_CONFIG1, 0, bits::intf_config1::RTC_MODE),
    RegisterConfig::new(
        bank0::PWR_MGMT0,
        bits::pwr_mgmt0::GYRO_MODE_LOW_NOISE | bits::pwr_mgmt0::ACCEL_MODE_LOW_NOISE,
        0,
    ),
    RegisterConfig::new(
        bank0::GYRO_CONFIG0,
        bits::gyro_config0::GYRO_ODR_32KHZ_SET,
        bits::gyro_config0::GYRO_FS_SEL_2000_DPS_CLEAR | bits::gyro_config0::GYRO_ODR_32KHZ_CLEAR,
    ),
    RegisterConfig::new(
        bank0::ACCEL_CONFIG0,
        bits::accel_config0::ACCEL_ODR_32KHZ_SET,
        bits::accel_config0::ACCEL_FS_SEL_16G_CLEAR | bits::accel_config0::ACCEL_ODR_32KHZ_CLEAR,
    ),
    RegisterConfig::new(bank0::GYRO_CONFIG1, 0, bits::gyro_config1::GYRO_UI_FILT_ORD),
    RegisterConfig::new(
        bank0::GYRO_ACCEL_CONFIG0,
        0,
        bits::gyro_accel_config0::ACCEL_UI_FILT_BW | bits::gyro_accel_config0::GYRO_UI_FILT_BW,
    ),
    RegisterConfig::new(bank0::ACCEL_CONFIG1, 0, bits::accel_config1::ACCEL_UI_FILT_ORD),
    RegisterConfig::new(
        bank0::TMST_CONFIG,
        bits::tmst_config::TMST_DELTA_EN | bits::tmst_config::TMST_EN,
        bits::tmst_config::TMST_RES,
    ),
    RegisterConfig::new(
        bank0::FIFO_CONFIG1,
        bits::fifo_config1::FIFO_RESUME_PARTIAL_RD
            | bits::fifo_config1::FIFO_WM_GT_TH
            | bits::fifo_config1::FIFO_HIRES_EN
            | bits::fifo_config1::FIFO_TEMP_EN
            | bits::fifo_config1::FIFO_GYRO_EN
            | bits::fifo_config1::FIFO_ACCEL_EN,
        bits::fifo_config1::FIFO_TMST_FSYNC_EN,
    ),
    // watermark, patched at runtime
    RegisterConfig::new(bank0::FIFO_CONFIG2, 0, 0),
    RegisterConfig::new(bank0::FIFO_CONFIG3, 0, 0),
    RegisterConfig::new(
        bank0::INT_CONFIG0,
        bits::int_config0::FIFO_THS_INT_CLEAR_SET,
        bits::int_config0::FIFO_THS_INT_CLEAR_CLEAR,
    ),
    RegisterConfig::new(bank0::INT_CONFIG1, 0, bits::int_config1::INT_ASYNC_RESET),
    RegisterConfig::new(
        bank0::INT_SOURCE0,
        bits::int_source0::FIFO_THS_INT1_EN,
        bits::int_source0::UI_DRDY_INT1_EN,
    ),
    RegisterConfig::new(
        bank0::SIGNAL_PATH_RESET,
        0,
        bits::signal_path_reset::ABORT_AND_RESET,
    ),
];

const BANK1_TEMPLATE: [RegisterConfig; BANK1_LEN] = [
    RegisterConfig::new(
        bank1::GYRO_CONFIG_STATIC2,
        0,
        bits::gyro_config_static2::GYRO_AAF_DIS | bits::gyro_config_static2::GYRO_NF_DIS,
    ),
    // clock input, patched at runtime
    RegisterConfig::new(
        bank1::INTF_CONFIG5,
        bits::intf_config5::PIN9_FUNCTION_RESET_SET,
        bits::intf_config5::PIN9_FUNCTION_RESET_CLEAR,
    ),
];

const BANK2_TEMPLATE: [RegisterConfig; BANK2_LEN] = [RegisterConfig::new(
    bank2::ACCEL_CONFIG_STATIC2,
    0,
    bits::accel_config_static2::ACCEL_AAF_DIS,
)];

/// Per-bank register configuration tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterTables {
    bank0: [RegisterConfig; BANK0_LEN],
    bank1: [RegisterConfig; BANK1_LEN],
    bank2: [RegisterConfig; BANK2_LEN],
}

impl RegisterTables {
    /// Build the tables for a clock source and per-cycle sample count
    #[must_use]
    pub fn new(clock_input: ClockInput, watermark_samples: u8) -> Self {
        let mut tables = Self {
            bank0: BANK0_TEMPLATE,
            bank1: BANK1_TEMPLATE,
            bank2: BANK2_TEMPLATE,
        };
        tables.configure_clock_input(clock_input);
        tables.configure_watermark(watermark_samples);
        tables
    }

    /// Patch the watermark entries for `samples` frames
    pub fn configure_watermark(&mut self, samples: u8) {
        let threshold = u16::from(samples) * FIFO_FRAME_SIZE as u16;

        for r in &mut self.bank0 {
            if r.reg == bank0::FIFO_CONFIG2 {
                // FIFO_WM[7:0]
                let set = (threshold & 0xFF) as u8;
                *r = RegisterConfig::new(r.reg, set, !set);
            } else if r.reg == bank0::FIFO_CONFIG3 {
                // FIFO_WM[11:8]
                let set = ((threshold >> 8) & 0x0F) as u8;
                *r = RegisterConfig::new(r.reg, set, !set);
            }
        }
    }

    /// Patch the clock input entries
    pub fn configure_clock_input(&mut self, clock_input: ClockInput) {
        let external = clock_input.is_external();

        for r in &mut self.bank0 {
            if r.reg == bank0::INTF_CONFIG1 {
                *r = if external {
                    RegisterConfig::new(r.reg, bits::intf_config1::RTC_MODE, 0)
                } else {
                    RegisterConfig::new(r.reg, 0, bits::intf_config1::RTC_MODE)
                };
            }
        }

        for r in &mut self.bank1 {
            if r.reg == bank1::INTF_CONFIG5 {
                *r = if external {
                    RegisterConfig::new(
                        r.reg,
                        bits::intf_config5::PIN9_FUNCTION_CLKIN_SET,
                        bits::intf_config5::PIN9_FUNCTION_CLKIN_CLEAR,
                    )
                } else {
                    RegisterConfig::new(
                        r.reg,
                        bits::intf_config5::PIN9_FUNCTION_RESET_SET,
                        bits::intf_config5::PIN9_FUNCTION_RESET_CLEAR,
                    )
                };
            }
        }
    }

    /// Bank 0 entries
    #[must_use]
    pub const fn bank0(&self) -> &[RegisterConfig] {
        &self.bank0
    }

    /// All entries, bank 0 first
    pub fn iter(&self) -> impl Iterator<Item = &RegisterConfig> {
        self.bank0.iter().chain(self.bank1.iter()).chain(self.bank2.iter())
    }

    /// Find the entry for a register
    #[must_use]
    pub fn find(&self, reg: Register) -> Option<&RegisterConfig> {
        self.iter().find(|r| r.reg == reg)
    }
}

/// Round-robin position over the three configuration banks
///
/// Every periodic check verifies one entry per bank; advancing walks each bank
/// independently so the whole table is covered after `max(bank len)` checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CheckCursor {
    bank0: usize,
    bank1: usize,
    bank2: usize,
}

impl CheckCursor {
    /// Entries to verify at the current position
    #[must_use]
    pub fn current(&self, tables: &RegisterTables) -> [RegisterConfig; 3] {
        [
            tables.bank0[self.bank0 % BANK0_LEN],
            tables.bank1[self.bank1 % BANK1_LEN],
            tables.bank2[self.bank2 % BANK2_LEN],
        ]
    }

    /// Move to the next entry in every bank
    pub fn advance(&mut self) {
        self.bank0 = (self.bank0 + 1) % BANK0_LEN;
        self.bank1 = (self.bank1 + 1) % BANK1_LEN;
        self.bank2 = (self.bank2 + 1) % BANK2_LEN;
    }
}
