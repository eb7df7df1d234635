//! Fault counters and failure escalation

use core::fmt;

use crate::config::{ClockInput, FifoTiming};

/// Consecutive failures tolerated before a full reset
pub const FAILURE_THRESHOLD: u8 = 10;

/// Countable fault and recovery events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// A software reset was issued
    Reset,
    /// A configured register failed verification
    BadRegister,
    /// A bus transfer failed or returned unusable data
    BadTransfer,
    /// The FIFO held no complete record
    FifoEmpty,
    /// The FIFO overflowed
    FifoOverflow,
    /// The FIFO was flushed
    FifoReset,
    /// The measured sample interval was out of tolerance
    TimestampError,
    /// An expected data-ready interrupt did not arrive in time
    DrdyMissed,
}

impl Fault {
    /// All faults in display order
    pub const ALL: [Self; 8] = [
        Self::Reset,
        Self::BadRegister,
        Self::BadTransfer,
        Self::FifoEmpty,
        Self::FifoOverflow,
        Self::FifoReset,
        Self::TimestampError,
        Self::DrdyMissed,
    ];

    /// Short name for diagnostics
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::BadRegister => "bad register",
            Self::BadTransfer => "bad transfer",
            Self::FifoEmpty => "FIFO empty",
            Self::FifoOverflow => "FIFO overflow",
            Self::FifoReset => "FIFO reset",
            Self::TimestampError => "FIFO timestamp error",
            Self::DrdyMissed => "DRDY missed",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Monotonic per-fault event counters
///
/// Counters saturate instead of wrapping and are never cleared while the
/// session lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HealthCounters {
    counts: [u32; Fault::ALL.len()],
}

impl HealthCounters {
    /// Count one occurrence
    pub fn record(&mut self, fault: Fault) {
        let count = &mut self.counts[fault.index()];
        *count = count.saturating_add(1);
    }

    /// Occurrences so far
    #[must_use]
    pub const fn get(&self, fault: Fault) -> u32 {
        self.counts[fault.index()]
    }

    /// Error count stamped on published batches
    ///
    /// Sum of register, transfer, empty and overflow faults.
    #[must_use]
    pub const fn error_count(&self) -> u32 {
        self.get(Fault::BadRegister)
            .saturating_add(self.get(Fault::BadTransfer))
            .saturating_add(self.get(Fault::FifoEmpty))
            .saturating_add(self.get(Fault::FifoOverflow))
    }
}

/// Consecutive failure counter with a fixed escalation threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FailureTracker {
    failures: u8,
}

impl FailureTracker {
    /// Current count
    #[must_use]
    pub const fn count(&self) -> u8 {
        self.failures
    }

    /// A cycle succeeded
    pub fn record_success(&mut self) {
        self.failures = self.failures.saturating_sub(1);
    }

    /// A cycle failed; returns `true` once the threshold is exceeded
    pub fn record_failure(&mut self) -> bool {
        self.failures = self.failures.saturating_add(1);
        self.failures > FAILURE_THRESHOLD
    }

    /// Forget all failures
    pub fn clear(&mut self) {
        self.failures = 0;
    }
}

/// Printable view of counters and timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    /// Fault counters
    pub counters: HealthCounters,
    /// Current drain timing
    pub timing: FifoTiming,
    /// Clock source
    pub clock_input: ClockInput,
    /// Consecutive failures
    pub failures: u8,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "FIFO empty interval: {} us ({:.1} Hz), {} samples",
            self.timing.empty_interval_us(),
            self.timing.rate_hz(),
            self.timing.samples()
        )?;

        if let ClockInput::External { frequency_hz } = self.clock_input {
            writeln!(f, "Clock input: {frequency_hz:.0} Hz")?;
        }

        for fault in Fault::ALL {
            writeln!(f, "{}: {}", fault.name(), self.counters.get(fault))?;
        }

        write!(f, "consecutive failures: {}", self.failures)
    }
}
