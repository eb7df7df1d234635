#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod device;
pub mod fifo;
pub mod health;
pub mod interface;
pub mod interrupt;
pub mod registers;
pub mod scheduler;
pub mod sensors;

// Re-export main types
pub use config::{ClockInput, Config, FifoTiming, RegisterConfig, RegisterTables};
pub use device::{Iim42652, ImuDriver, State};
pub use fifo::parser::{DecodeError, DecodedFifo, FifoDecoder};
pub use fifo::{FIFO_FRAME_SIZE, FIFO_MAX_SAMPLES, FIFO_SIZE, FifoFrame, FifoHeader, FifoSnapshot};
pub use health::{Diagnostics, FailureTracker, Fault, HealthCounters};
pub use interface::SpiInterface;
pub use interrupt::{DataReadyLatch, DataReadyPin, NoDataReady};
pub use registers::Register;
pub use scheduler::Scheduler;
pub use sensors::{AccelFifo, AccelResolution, FifoPublisher, GyroFifo, GyroResolution, SensorFifo};

/// Expected value of `WHO_AM_I` register
pub const WHO_AM_I_VALUE: u8 = 0x6F;

/// Register bank identifiers
///
/// The bank is selected through `REG_BANK_SEL` (0x76), which is mapped into
/// every bank at the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bank {
    /// Bank 0 - Primary configuration, interrupt and FIFO registers
    Bank0 = 0,
    /// Bank 1 - Gyroscope static filters and interface pin functions
    Bank1 = 1,
    /// Bank 2 - Accelerometer static filters
    Bank2 = 2,
    /// Bank 3 - Clock divider
    Bank3 = 3,
    /// Bank 4 - APEX and offset user registers
    Bank4 = 4,
}

impl Bank {
    /// Decode the `BANK_SEL` field of `REG_BANK_SEL`
    #[must_use]
    pub const fn from_bank_sel(value: u8) -> Option<Self> {
        match value & 0x07 {
            0 => Some(Self::Bank0),
            1 => Some(Self::Bank1),
            2 => Some(Self::Bank2),
            3 => Some(Self::Bank3),
            4 => Some(Self::Bank4),
            _ => None,
        }
    }
}

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Invalid `WHO_AM_I` register value (contains the actual value read)
    InvalidDevice(u8),
    /// Invalid configuration parameter
    InvalidConfig,
    /// FIFO overflowed (full flag set or byte count at capacity); the FIFO was flushed
    FifoOverflow,
    /// FIFO held no complete frame
    FifoEmpty,
    /// FIFO contents could not be decoded
    Decode(DecodeError),
    /// A configured register no longer holds its required bits
    RegisterMismatch {
        /// Bank of the offending register
        bank: Bank,
        /// Register address
        address: u8,
        /// Value that was read back
        value: u8,
    },
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
