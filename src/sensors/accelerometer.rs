//! Accelerometer FIFO resolution
//!
//! The accelerometer runs at ±16 g. In high-resolution FIFO mode the
//! 20-bit field carries 18 significant bits (the two lowest are always zero)
//! at 8192 LSB/g. When a batch would not fit in 16 bits the decoder falls back
//! to the 16-bit register pair at 2048 LSB/g.

/// Standard gravity in m/s²
pub const ONE_G: f32 = 9.80665;

/// Representation of accelerometer samples in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelResolution {
    /// 18-bit data divided down from the 20-bit field
    #[default]
    Extended,
    /// 16-bit data from the high:low register pair
    Reduced,
}

impl AccelResolution {
    /// Sensitivity in LSB/g
    #[must_use]
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::Extended => 8192.0,
            Self::Reduced => 2048.0,
        }
    }

    /// Scale from raw counts to m/s²
    #[must_use]
    pub fn scale(self) -> f32 {
        ONE_G / self.sensitivity()
    }

    /// Divisor applied to the 20-bit field in extended mode
    pub(crate) const fn extended_shift_divisor() -> i32 {
        4
    }
}
