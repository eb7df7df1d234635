//! FIFO acquisition state machine
//!
//! [`Iim42652`] owns the register interface, the scheduler and the publisher
//! for one sensor. The platform calls [`Iim42652::run`] whenever the scheduler
//! fires; every call performs one bounded step and requests the next one.
//!
//! ```text
//! RESET -> WAIT_FOR_RESET -> CONFIGURE -> FIFO_RESET -> FIFO_READ -+
//!   ^            |               |                        ^       |
//!   +- timeout --+---- timeout --+                        +-------+
//!   ^                                                             |
//!   +------------- persistent failure / register mismatch --------+
//! ```
//!
//! # Example
//!
//! ```ignore
//! static DRDY: DataReadyLatch = DataReadyLatch::new();
//!
//! let interface = SpiInterface::new(spi_device);
//! let mut imu = Iim42652::new(interface, scheduler, publisher, &DRDY, Config::default())
//!     .with_data_ready(int1_pin);
//! imu.init()?;
//!
//! // in the scheduled task
//! imu.run();
//! ```

use core::fmt;

use device_driver::RegisterInterface;

use crate::config::{CheckCursor, Config, FifoTiming, RegisterConfig, RegisterTables, samples_to_us};
use crate::fifo::parser::{DecodeError, FifoDecoder};
use crate::fifo::{FIFO_FRAME_SIZE, FIFO_SIZE, FifoSnapshot};
use crate::health::{Diagnostics, FailureTracker, Fault, HealthCounters};
use crate::interrupt::{DataReadyLatch, DataReadyPin, NoDataReady};
use crate::registers::{Iim42652Registers, Register, bank0};
use crate::scheduler::Scheduler;
use crate::sensors::{FifoPublisher, SensorFifo};
use crate::{Bank, Error, WHO_AM_I_VALUE};

/// Wait after the soft reset command (at least 1 ms is required)
const RESET_SETTLE_US: u32 = 2_000;
/// Poll period while waiting for reset or configuration
const RESET_POLL_US: u32 = 100_000;
/// Give up on a reset or configuration attempt after this long
const RESET_TIMEOUT_US: u64 = 1_000_000;
/// Gyro startup time; accel needs 10 ms from sleep
const STARTUP_SETTLE_US: u32 = 30_000;
/// Delay between a successful configuration and the FIFO flush
const CONFIGURE_DONE_US: u32 = 1_000;
/// Backup poll while waiting for the first data-ready interrupt
const DRDY_WATCHDOG_US: u32 = 100_000;
/// Maximum time between configuration checks
const CONFIG_CHECK_PERIOD_US: u64 = 100_000;
/// `WHO_AM_I` attempts made by [`Iim42652::probe`]
const PROBE_ATTEMPTS: usize = 3;

/// `PWR_MGMT0` mode value for low-noise operation
const MODE_LOW_NOISE: u8 = 0b11;

/// Acquisition state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Issue a software reset
    Reset,
    /// Wait for the reset to complete
    WaitForReset,
    /// Write and verify the register tables
    Configure,
    /// Flush the FIFO and arm the data-ready interrupt
    FifoReset,
    /// Drain the FIFO every cycle
    FifoRead,
}

/// Capability interface used by a driver registry
pub trait ImuDriver {
    /// Error type returned by `init`
    type Error;

    /// Identify the device and start acquisition
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be identified.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Run one scheduled step
    fn step(&mut self);

    /// Stop acquisition; the interrupt is disabled first
    fn teardown(&mut self);

    /// Write diagnostics
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    fn describe(&self, out: &mut dyn fmt::Write) -> fmt::Result;
}

/// IIM-42652 FIFO acquisition driver
pub struct Iim42652<'a, I, S, P, D = NoDataReady> {
    device: Iim42652Registers<I>,
    scheduler: S,
    publisher: P,
    drdy: D,
    latch: &'a DataReadyLatch,
    config: Config,
    timing: FifoTiming,
    tables: RegisterTables,
    decoder: FifoDecoder,
    state: State,
    current_bank: Option<Bank>,
    reset_timestamp: u64,
    last_config_check: u64,
    check_cursor: CheckCursor,
    data_ready_enabled: bool,
    failures: FailureTracker,
    counters: HealthCounters,
    temperature: f32,
}

impl<'a, I, S, P> Iim42652<'a, I, S, P, NoDataReady>
where
    I: RegisterInterface<AddressType = u8>,
    S: Scheduler,
    P: FifoPublisher,
{
    /// Create a polling driver
    ///
    /// Nothing is sent to the device until [`init`](Self::init).
    pub fn new(
        interface: I,
        scheduler: S,
        publisher: P,
        latch: &'a DataReadyLatch,
        config: Config,
    ) -> Self {
        let timing = FifoTiming::from_rate_hz(config.output_rate_hz);

        Self {
            device: Iim42652Registers::new(interface),
            scheduler,
            publisher,
            drdy: NoDataReady,
            latch,
            config,
            timing,
            tables: RegisterTables::new(config.clock_input, timing.samples()),
            decoder: FifoDecoder::new(config.clock_input),
            state: State::Reset,
            current_bank: None,
            reset_timestamp: 0,
            last_config_check: 0,
            check_cursor: CheckCursor::default(),
            data_ready_enabled: false,
            failures: FailureTracker::default(),
            counters: HealthCounters::default(),
            temperature: f32::NAN,
        }
    }

    /// Use a data-ready interrupt line
    ///
    /// The line's handler must latch into the same [`DataReadyLatch`] passed to
    /// [`new`](Self::new).
    pub fn with_data_ready<D: DataReadyPin>(self, drdy: D) -> Iim42652<'a, I, S, P, D> {
        Iim42652 {
            device: self.device,
            scheduler: self.scheduler,
            publisher: self.publisher,
            drdy,
            latch: self.latch,
            config: self.config,
            timing: self.timing,
            tables: self.tables,
            decoder: self.decoder,
            state: self.state,
            current_bank: self.current_bank,
            reset_timestamp: self.reset_timestamp,
            last_config_check: self.last_config_check,
            check_cursor: self.check_cursor,
            data_ready_enabled: self.data_ready_enabled,
            failures: self.failures,
            counters: self.counters,
            temperature: self.temperature,
        }
    }
}

impl<I, S, P, D> Iim42652<'_, I, S, P, D>
where
    I: RegisterInterface<AddressType = u8>,
    S: Scheduler,
    P: FifoPublisher,
    D: DataReadyPin,
{
    /// Identify the device and schedule a full reset
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an unusable external clock
    /// frequency, or an error if communication fails or `WHO_AM_I` never
    /// reads 0x6F.
    pub fn init(&mut self) -> Result<(), Error<I::Error>> {
        if !self.config.clock_input.is_valid() {
            return Err(Error::InvalidConfig);
        }
        self.probe()?;
        self.reset();
        Ok(())
    }

    /// Check `WHO_AM_I`, recovering from a stale bank selection
    ///
    /// Makes up to three attempts. After a wrong value `REG_BANK_SEL` is read
    /// and, if it does not report bank 0, bank 0 is selected unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] with the last value read, or a bus
    /// error.
    pub fn probe(&mut self) -> Result<(), Error<I::Error>> {
        let mut who_am_i = 0;

        for _ in 0..PROBE_ATTEMPTS {
            who_am_i = self.read_who_am_i()?;
            if who_am_i == WHO_AM_I_VALUE {
                return Ok(());
            }

            #[cfg(feature = "defmt")]
            defmt::debug!("IIM42652: unexpected WHO_AM_I 0x{:02x}", who_am_i);

            let bank_sel = self.device.reg_bank_sel().read()?.bank_sel();
            if Bank::from_bank_sel(bank_sel) != Some(Bank::Bank0) {
                #[cfg(feature = "defmt")]
                defmt::debug!("IIM42652: wrong register bank {}, forcing bank 0", bank_sel);

                self.write_bank_sel(Bank::Bank0)?;
            }
        }

        Err(Error::InvalidDevice(who_am_i))
    }

    /// Force a full reset cycle
    ///
    /// Disables the data-ready interrupt, cancels every schedule and runs the
    /// RESET state as soon as possible.
    pub fn reset(&mut self) {
        self.state = State::Reset;
        self.data_ready_interrupt_disable();
        self.scheduler.cancel_all();
        self.scheduler.schedule_now();
    }

    /// Change the desired output rate
    ///
    /// Recomputes the drain interval and watermark and forces a reset so the
    /// new watermark is written.
    pub fn set_output_rate(&mut self, rate_hz: u32) {
        self.config.output_rate_hz = rate_hz;
        self.timing = FifoTiming::from_rate_hz(rate_hz);
        self.tables.configure_watermark(self.timing.samples());
        self.reset();
    }

    /// Stop acquisition
    ///
    /// The interrupt is disabled before anything else so a late edge cannot
    /// schedule more work.
    pub fn stop(&mut self) {
        self.data_ready_interrupt_disable();
        self.scheduler.cancel_all();
    }

    /// Stop acquisition and return the owned capabilities
    pub fn release(mut self) -> (I, S, P, D) {
        self.stop();
        let Self {
            device,
            scheduler,
            publisher,
            drdy,
            ..
        } = self;
        (device.interface, scheduler, publisher, drdy)
    }

    /// Run one step of the state machine
    pub fn run(&mut self) {
        let now = self.scheduler.now_us();

        match self.state {
            State::Reset => {
                self.counters.record(Fault::Reset);

                // A lost command shows up as a reset timeout
                if self.soft_reset().is_err() {
                    self.counters.record(Fault::BadTransfer);
                }

                self.reset_timestamp = now;
                self.failures.clear();
                self.state = State::WaitForReset;
                self.scheduler.schedule_after(RESET_SETTLE_US);
            }

            State::WaitForReset => {
                if self.reset_complete().unwrap_or(false) && self.wake_sensors().is_ok() {
                    self.state = State::Configure;
                    self.scheduler.schedule_after(STARTUP_SETTLE_US);
                } else {
                    if now.saturating_sub(self.reset_timestamp) > RESET_TIMEOUT_US {
                        #[cfg(feature = "defmt")]
                        defmt::debug!("IIM42652: reset failed, retrying");

                        self.state = State::Reset;
                    }
                    self.scheduler.schedule_after(RESET_POLL_US);
                }
            }

            State::Configure => {
                if self.configure().is_ok() {
                    self.state = State::FifoReset;
                    self.scheduler.schedule_after(CONFIGURE_DONE_US);
                } else {
                    if now.saturating_sub(self.reset_timestamp) > RESET_TIMEOUT_US {
                        #[cfg(feature = "defmt")]
                        defmt::debug!("IIM42652: configure failed, resetting");

                        self.state = State::Reset;
                    } else {
                        #[cfg(feature = "defmt")]
                        defmt::debug!("IIM42652: configure failed, retrying");
                    }
                    self.scheduler.schedule_after(RESET_POLL_US);
                }
            }

            State::FifoReset => {
                self.state = State::FifoRead;

                if self.fifo_reset().is_err() {
                    self.counters.record(Fault::BadTransfer);
                }

                if self.drdy.enable_falling_edge().is_ok() {
                    self.data_ready_enabled = true;
                    self.scheduler.schedule_after(DRDY_WATCHDOG_US);
                } else {
                    self.data_ready_enabled = false;
                    let interval = self.timing.empty_interval_us();
                    self.scheduler.schedule_on_interval(interval, interval);
                }
            }

            State::FifoRead => self.fifo_read_cycle(now),
        }
    }

    fn fifo_read_cycle(&mut self, now: u64) {
        let interval_us = self.timing.empty_interval_us();
        let nominal = self.timing.samples();
        let mut timestamp_sample = now;
        let mut samples = 0;

        if self.data_ready_enabled {
            match self.latch.take() {
                Some(drdy) if now < drdy.saturating_add(u64::from(interval_us)) => {
                    timestamp_sample = drdy;
                    samples = nominal;
                }
                _ => self.counters.record(Fault::DrdyMissed),
            }

            // push the backup schedule back
            self.scheduler.schedule_after(interval_us.saturating_mul(2));
        }

        if samples == 0 {
            samples = self.poll_fifo_samples();
        }

        let mut success = false;
        if samples == nominal {
            match self.fifo_read(timestamp_sample, samples) {
                Ok(()) => {
                    success = true;
                    self.failures.record_success();
                }
                Err(Error::Bus(_))
                | Err(Error::Decode(
                    DecodeError::InvalidAccelSample
                    | DecodeError::InvalidGyroSample
                    | DecodeError::InvalidTemperature
                    | DecodeError::NonFiniteTemperature,
                )) => self.counters.record(Fault::BadTransfer),
                // counted where detected
                Err(_) => {}
            }
        }

        if !success && self.failures.record_failure() {
            #[cfg(feature = "defmt")]
            defmt::debug!("IIM42652: full reset because things are failing consistently");

            self.reset();
            return;
        }

        // check configuration registers periodically or immediately following any failure
        if !success || now.saturating_sub(self.last_config_check) > CONFIG_CHECK_PERIOD_US {
            let entries = self.check_cursor.current(&self.tables);
            if entries.iter().all(|r| self.register_check(r).is_ok()) {
                self.last_config_check = now;
                self.check_cursor.advance();
            } else {
                self.counters.record(Fault::BadRegister);
                self.reset();
            }
        }
    }

    /// Poll the FIFO count and decide how many records to read now
    ///
    /// Returns the nominal sample count when a read should happen in this cycle
    /// and reschedules the interval timer when the FIFO holds more or fewer
    /// records than expected.
    fn poll_fifo_samples(&mut self) -> u8 {
        let count = match self.fifo_read_count() {
            Ok(count) => count,
            Err(_) => {
                self.counters.record(Fault::BadTransfer);
                return 0;
            }
        };

        if count >= FIFO_SIZE {
            if self.fifo_reset().is_err() {
                self.counters.record(Fault::BadTransfer);
            }
            self.counters.record(Fault::FifoOverflow);
            return 0;
        }

        if count == 0 {
            self.counters.record(Fault::FifoEmpty);
            return 0;
        }

        let interval_us = self.timing.empty_interval_us();
        let nominal = self.timing.samples();
        // count < FIFO_SIZE, at most 102 records
        let available = (usize::from(count) / FIFO_FRAME_SIZE) as u8;

        if available > nominal {
            // read the nominal count now and run again once the next full set is due
            let extra = available - nominal;
            let phase_us = if nominal > extra {
                samples_to_us(nominal - extra)
            } else {
                0
            };
            self.scheduler.schedule_on_interval(interval_us, phase_us);
            nominal
        } else if available < nominal {
            // wait for the shortfall
            self.scheduler
                .schedule_on_interval(interval_us, samples_to_us(nominal - available));
            available
        } else {
            nominal
        }
    }

    /// Burst read and decode up to `samples` records, then publish
    ///
    /// # Errors
    ///
    /// Returns a bus error, [`Error::FifoOverflow`] (the FIFO was flushed),
    /// [`Error::FifoEmpty`] or [`Error::Decode`]. Overflow, empty and timestamp
    /// faults are counted here.
    pub fn fifo_read(&mut self, timestamp_sample: u64, samples: u8) -> Result<(), Error<I::Error>> {
        let mut snapshot = FifoSnapshot::new();

        self.select_bank(Bank::Bank0)?;
        let buffer = snapshot.buffer_mut(usize::from(samples));
        let size_bits = (buffer.len() * 8) as u32;
        self.device
            .interface
            .read_register(bank0::INT_STATUS.address, size_bits, buffer)?;

        if snapshot.fifo_full() || snapshot.count_bytes() >= FIFO_SIZE {
            self.counters.record(Fault::FifoOverflow);
            self.fifo_reset()?;
            return Err(Error::FifoOverflow);
        }

        if snapshot.available_samples() == 0 {
            self.counters.record(Fault::FifoEmpty);
            return Err(Error::FifoEmpty);
        }

        let decoded = self
            .decoder
            .decode(snapshot.frames(usize::from(samples)))
            .map_err(Error::Decode)?;

        if decoded.timestamp_error {
            self.counters.record(Fault::TimestampError);
        }

        self.temperature = decoded.temperature;

        let dt = decoded.dt();
        let error_count = self.counters.error_count();
        let timestamp = self.scheduler.now_us();

        let accel = SensorFifo {
            timestamp_sample,
            timestamp,
            device_id: self.config.device_id,
            dt,
            scale: decoded.accel_resolution.scale(),
            samples: decoded.accel,
            error_count,
            temperature: decoded.temperature,
        };
        self.publisher.publish_accel(&accel);

        let gyro = SensorFifo {
            timestamp_sample,
            timestamp,
            device_id: self.config.device_id,
            dt,
            scale: decoded.gyro_resolution.scale(),
            samples: decoded.gyro,
            error_count,
            temperature: decoded.temperature,
        };
        self.publisher.publish_gyro(&gyro);

        Ok(())
    }

    /// Read the FIFO byte count
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fifo_read_count(&mut self) -> Result<u16, Error<I::Error>> {
        let mut buffer = [0u8; 2];
        self.select_bank(Bank::Bank0)?;
        self.device
            .interface
            .read_register(bank0::FIFO_COUNTH.address, 16, &mut buffer)?;
        Ok(u16::from_be_bytes(buffer))
    }

    /// Flush the FIFO
    ///
    /// Counts a FIFO reset and discards any latched data-ready time.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fifo_reset(&mut self) -> Result<(), Error<I::Error>> {
        self.counters.record(Fault::FifoReset);

        let result = self.select_bank(Bank::Bank0).and_then(|()| {
            self.device
                .signal_path_reset()
                .modify(|w| w.set_fifo_flush(true))
                .map_err(Error::Bus)
        });

        self.latch.clear();
        result
    }

    /// Write every table entry, then verify all of them
    ///
    /// # Errors
    ///
    /// Returns a bus error, or [`Error::RegisterMismatch`] for the first entry
    /// that did not verify.
    pub fn configure(&mut self) -> Result<(), Error<I::Error>> {
        let tables = self.tables.clone();

        // first set and clear all configured register bits
        for r in tables.iter() {
            self.register_apply(r)?;
        }

        // now check that all are configured
        let mut result = Ok(());
        for r in tables.iter() {
            if let Err(e) = self.register_check(r) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// Verify one table entry
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegisterMismatch`] if a required bit is clear or a
    /// forbidden bit is set.
    pub fn register_check(&mut self, entry: &RegisterConfig) -> Result<(), Error<I::Error>> {
        let value = self.register_read(entry.reg)?;

        if entry.matches(value) {
            Ok(())
        } else {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "IIM42652: 0x{:02x}: 0x{:02x} (set 0x{:02x}, clear 0x{:02x})",
                entry.reg.address,
                value,
                entry.set_bits,
                entry.clear_bits
            );

            Err(Error::RegisterMismatch {
                bank: entry.reg.bank,
                address: entry.reg.address,
                value,
            })
        }
    }

    /// Select a register bank
    ///
    /// Skipped if `bank` is already selected. A failed write leaves the
    /// selection unknown so the next access selects again.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn select_bank(&mut self, bank: Bank) -> Result<(), Error<I::Error>> {
        if self.current_bank != Some(bank) {
            self.write_bank_sel(bank)?;
        }
        Ok(())
    }

    fn write_bank_sel(&mut self, bank: Bank) -> Result<(), Error<I::Error>> {
        match self.device.reg_bank_sel().write(|w| {
            w.set_bank_sel(bank as u8);
        }) {
            Ok(()) => {
                self.current_bank = Some(bank);
                Ok(())
            }
            Err(e) => {
                self.current_bank = None;
                Err(Error::Bus(e))
            }
        }
    }

    /// Read a banked register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn register_read(&mut self, reg: Register) -> Result<u8, Error<I::Error>> {
        let mut buffer = [0u8; 1];
        self.select_bank(reg.bank)?;
        self.device
            .interface
            .read_register(reg.address, 8, &mut buffer)?;
        Ok(buffer[0])
    }

    /// Write a banked register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn register_write(&mut self, reg: Register, value: u8) -> Result<(), Error<I::Error>> {
        self.select_bank(reg.bank)?;
        self.device
            .interface
            .write_register(reg.address, 8, &[value])?;
        Ok(())
    }

    /// Set and clear bits, writing only if the value changes
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn register_set_and_clear_bits(
        &mut self,
        reg: Register,
        set_bits: u8,
        clear_bits: u8,
    ) -> Result<(), Error<I::Error>> {
        // Set wins where the masks overlap
        self.register_apply(&RegisterConfig {
            reg,
            set_bits,
            clear_bits: clear_bits & !set_bits,
        })
    }

    /// Bring one register in line with its configured pattern
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn register_apply(&mut self, entry: &RegisterConfig) -> Result<(), Error<I::Error>> {
        let orig = self.register_read(entry.reg)?;
        let value = entry.apply(orig);

        if orig != value {
            self.register_write(entry.reg, value)?;
        }
        Ok(())
    }

    /// Read the `WHO_AM_I` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_who_am_i(&mut self) -> Result<u8, Error<I::Error>> {
        self.select_bank(Bank::Bank0)?;
        let reg = self.device.who_am_i().read()?;
        Ok(reg.who_am_i())
    }

    fn soft_reset(&mut self) -> Result<(), Error<I::Error>> {
        self.select_bank(Bank::Bank0)?;
        self.device.device_config().write(|w| {
            w.set_soft_reset_config(true);
        })?;
        // REG_BANK_SEL returns to its reset value
        self.current_bank = None;
        Ok(())
    }

    fn reset_complete(&mut self) -> Result<bool, Error<I::Error>> {
        if self.read_who_am_i()? != WHO_AM_I_VALUE {
            return Ok(false);
        }
        if self.register_read(bank0::DEVICE_CONFIG)? != 0x00 {
            return Ok(false);
        }
        Ok(self.device.int_status().read()?.reset_done_int())
    }

    fn wake_sensors(&mut self) -> Result<(), Error<I::Error>> {
        self.select_bank(Bank::Bank0)?;
        self.device.pwr_mgmt_0().write(|w| {
            w.set_gyro_mode(MODE_LOW_NOISE);
            w.set_accel_mode(MODE_LOW_NOISE);
        })?;
        Ok(())
    }

    fn data_ready_interrupt_disable(&mut self) {
        self.drdy.disable();
        self.data_ready_enabled = false;
    }

    /// Snapshot of counters and timing
    #[must_use]
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            counters: self.counters,
            timing: self.timing,
            clock_input: self.config.clock_input,
            failures: self.failures.count(),
        }
    }

    /// Write a human-readable status report
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn print_status<W: fmt::Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "{}", self.diagnostics())
    }
}

impl<I, S, P, D> Iim42652<'_, I, S, P, D> {
    /// Current state
    pub const fn state(&self) -> State {
        self.state
    }

    /// Active configuration
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Drain timing derived from the output rate
    pub const fn timing(&self) -> FifoTiming {
        self.timing
    }

    /// Register tables in use
    pub const fn tables(&self) -> &RegisterTables {
        &self.tables
    }

    /// Fault counters
    pub const fn counters(&self) -> &HealthCounters {
        &self.counters
    }

    /// Consecutive failures since the last reset
    pub const fn failure_count(&self) -> u8 {
        self.failures.count()
    }

    /// Last known bank selection, `None` if unknown
    pub const fn current_bank(&self) -> Option<Bank> {
        self.current_bank
    }

    /// Whether the data-ready interrupt drives the reads
    pub const fn data_ready_enabled(&self) -> bool {
        self.data_ready_enabled
    }

    /// Last decoded die temperature in °C, NaN before the first read
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }
}

impl<I, S, P, D> ImuDriver for Iim42652<'_, I, S, P, D>
where
    I: RegisterInterface<AddressType = u8>,
    S: Scheduler,
    P: FifoPublisher,
    D: DataReadyPin,
{
    type Error = Error<I::Error>;

    fn init(&mut self) -> Result<(), Self::Error> {
        Iim42652::init(self)
    }

    fn step(&mut self) {
        self.run();
    }

    fn teardown(&mut self) {
        self.stop();
    }

    fn describe(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        self.print_status(out)
    }
}
