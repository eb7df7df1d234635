//! Data-ready interrupt plumbing
//!
//! The IIM-42652 raises INT1 when the FIFO reaches its watermark. The
//! interrupt handler does no bus I/O. It stores the current time in a
//! [`DataReadyLatch`] and asks the scheduler to run the driver. The driver
//! takes the stored time on its next FIFO read and uses it as the sample
//! timestamp.
//!
//! # Example
//!
//! ```ignore
//! static DRDY: DataReadyLatch = DataReadyLatch::new();
//!
//! #[interrupt]
//! fn EXTI0() {
//!     DRDY.latch(monotonic_us());
//!     imu_task::spawn().ok();
//! }
//! ```

#[cfg(target_has_atomic = "64")]
use core::sync::atomic::{AtomicU64, Ordering};

/// Timestamp shared between the interrupt handler and the driver
///
/// A value of zero means "no pending interrupt". Taking the value resets it to
/// zero in a single exchange.
#[derive(Debug)]
pub struct DataReadyLatch {
    #[cfg(target_has_atomic = "64")]
    timestamp: AtomicU64,
    #[cfg(not(target_has_atomic = "64"))]
    timestamp: critical_section::Mutex<core::cell::Cell<u64>>,
}

impl Default for DataReadyLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl DataReadyLatch {
    /// Create an empty latch
    #[must_use]
    pub const fn new() -> Self {
        Self {
            #[cfg(target_has_atomic = "64")]
            timestamp: AtomicU64::new(0),
            #[cfg(not(target_has_atomic = "64"))]
            timestamp: critical_section::Mutex::new(core::cell::Cell::new(0)),
        }
    }

    /// Record the time of a data-ready edge (interrupt context)
    pub fn latch(&self, timestamp_us: u64) {
        #[cfg(target_has_atomic = "64")]
        self.timestamp.store(timestamp_us, Ordering::Release);

        #[cfg(not(target_has_atomic = "64"))]
        critical_section::with(|cs| self.timestamp.borrow(cs).set(timestamp_us));
    }

    /// Fetch and clear the latched time
    ///
    /// Returns `None` if no edge was latched since the last call.
    pub fn take(&self) -> Option<u64> {
        #[cfg(target_has_atomic = "64")]
        let timestamp = self.timestamp.swap(0, Ordering::AcqRel);

        #[cfg(not(target_has_atomic = "64"))]
        let timestamp = critical_section::with(|cs| self.timestamp.borrow(cs).replace(0));

        (timestamp != 0).then_some(timestamp)
    }

    /// Discard any latched time
    pub fn clear(&self) {
        let _ = self.take();
    }
}

/// Data-ready interrupt line
///
/// Implemented by the platform glue around the GPIO/EXTI peripheral wired to
/// INT1. The handler installed by the platform must call
/// [`DataReadyLatch::latch`] and schedule the driver, nothing else.
pub trait DataReadyPin {
    /// Error type
    type Error;

    /// Arm the interrupt on the falling edge
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be configured; the driver then
    /// falls back to polling.
    fn enable_falling_edge(&mut self) -> Result<(), Self::Error>;

    /// Disarm the interrupt
    fn disable(&mut self);
}

/// No data-ready line: the driver always polls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoDataReady;

impl DataReadyPin for NoDataReady {
    type Error = ();

    fn enable_falling_edge(&mut self) -> Result<(), Self::Error> {
        Err(())
    }

    fn disable(&mut self) {}
}
