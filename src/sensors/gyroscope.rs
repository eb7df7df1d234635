//! Gyroscope FIFO resolution
//!
//! The gyroscope runs at ±2000 dps. The 20-bit FIFO field carries 19
//! significant bits at 131 LSB/dps; the 16-bit fallback is the register pair at
//! 32768/2000 LSB/dps.

use core::f32::consts::PI;

/// Representation of gyroscope samples in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroResolution {
    /// 19-bit data divided down from the 20-bit field
    #[default]
    Extended,
    /// 16-bit data from the high:low register pair
    Reduced,
}

impl GyroResolution {
    /// Degrees per second per LSB
    #[must_use]
    pub const fn dps_per_lsb(self) -> f32 {
        match self {
            Self::Extended => 1.0 / 131.0,
            Self::Reduced => 2000.0 / 32768.0,
        }
    }

    /// Scale from raw counts to rad/s
    #[must_use]
    pub fn scale(self) -> f32 {
        self.dps_per_lsb() * PI / 180.0
    }

    /// Divisor applied to the 20-bit field in extended mode
    pub(crate) const fn extended_shift_divisor() -> i32 {
        2
    }
}
