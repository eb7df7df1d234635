//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use iim42652::{
    AccelFifo, Config, DataReadyLatch, DataReadyPin, FifoFrame, FifoHeader, FifoPublisher,
    GyroFifo, Iim42652, NoDataReady, Scheduler, State,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Scheduler request recorded by [`MockScheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleCall {
    /// `schedule_after`
    After(u32),
    /// `schedule_on_interval`
    OnInterval {
        /// Period
        interval_us: u32,
        /// Delay before the first run
        phase_us: u32,
    },
    /// `schedule_now`
    Now,
    /// `cancel_all`
    CancelAll,
}

#[derive(Debug, Default)]
struct SchedulerState {
    now_us: u64,
    calls: Vec<ScheduleCall>,
}

/// Scheduler with a manually driven clock
#[derive(Debug, Clone, Default)]
pub struct MockScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

#[allow(dead_code)]
impl MockScheduler {
    /// Set the current time
    pub fn set_now(&self, now_us: u64) {
        self.state.borrow_mut().now_us = now_us;
    }

    /// Move the clock forward
    pub fn advance(&self, us: u64) {
        self.state.borrow_mut().now_us += us;
    }

    /// Current time
    pub fn now(&self) -> u64 {
        self.state.borrow().now_us
    }

    /// Every request so far
    pub fn calls(&self) -> Vec<ScheduleCall> {
        self.state.borrow().calls.clone()
    }

    /// Most recent request
    pub fn last_call(&self) -> Option<ScheduleCall> {
        self.state.borrow().calls.last().copied()
    }

    /// Forget recorded requests
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }
}

impl Scheduler for MockScheduler {
    fn now_us(&self) -> u64 {
        self.state.borrow().now_us
    }

    fn schedule_after(&mut self, delay_us: u32) {
        self.state.borrow_mut().calls.push(ScheduleCall::After(delay_us));
    }

    fn schedule_on_interval(&mut self, interval_us: u32, phase_us: u32) {
        self.state.borrow_mut().calls.push(ScheduleCall::OnInterval {
            interval_us,
            phase_us,
        });
    }

    fn schedule_now(&mut self) {
        self.state.borrow_mut().calls.push(ScheduleCall::Now);
    }

    fn cancel_all(&mut self) {
        self.state.borrow_mut().calls.push(ScheduleCall::CancelAll);
    }
}

#[derive(Debug, Default)]
struct PublisherState {
    accel: Vec<AccelFifo>,
    gyro: Vec<GyroFifo>,
}

/// Publisher recording every batch
#[derive(Debug, Clone, Default)]
pub struct MockPublisher {
    state: Rc<RefCell<PublisherState>>,
}

#[allow(dead_code)]
impl MockPublisher {
    /// Accelerometer batches in publish order
    pub fn accel(&self) -> Vec<AccelFifo> {
        self.state.borrow().accel.clone()
    }

    /// Gyroscope batches in publish order
    pub fn gyro(&self) -> Vec<GyroFifo> {
        self.state.borrow().gyro.clone()
    }

    /// Number of accelerometer batches
    pub fn accel_count(&self) -> usize {
        self.state.borrow().accel.len()
    }
}

impl FifoPublisher for MockPublisher {
    fn publish_accel(&mut self, fifo: &AccelFifo) {
        self.state.borrow_mut().accel.push(fifo.clone());
    }

    fn publish_gyro(&mut self, fifo: &GyroFifo) {
        self.state.borrow_mut().gyro.push(fifo.clone());
    }
}

#[derive(Debug, Default)]
struct PinState {
    fail_enable: bool,
    enabled: bool,
    enable_calls: usize,
    disable_calls: usize,
}

/// Data-ready line with a switchable enable result
#[derive(Debug, Clone, Default)]
pub struct MockPin {
    state: Rc<RefCell<PinState>>,
}

#[allow(dead_code)]
impl MockPin {
    /// Make `enable_falling_edge` fail
    pub fn fail_enable(&self, fail: bool) {
        self.state.borrow_mut().fail_enable = fail;
    }

    /// Whether the edge interrupt is armed
    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    /// Times `enable_falling_edge` was called
    pub fn enable_calls(&self) -> usize {
        self.state.borrow().enable_calls
    }

    /// Times `disable` was called
    pub fn disable_calls(&self) -> usize {
        self.state.borrow().disable_calls
    }
}

impl DataReadyPin for MockPin {
    type Error = ();

    fn enable_falling_edge(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.enable_calls += 1;
        if state.fail_enable {
            return Err(());
        }
        state.enabled = true;
        Ok(())
    }

    fn disable(&mut self) {
        let mut state = self.state.borrow_mut();
        state.disable_calls += 1;
        state.enabled = false;
    }
}

/// Driver type used throughout the tests
pub type MockDriver<D = NoDataReady> =
    Iim42652<'static, MockInterface, MockScheduler, MockPublisher, D>;

/// Shared handles to the mocks owned by a driver
#[derive(Clone)]
pub struct Harness {
    /// Register interface
    pub interface: MockInterface,
    /// Clock and schedule log
    pub scheduler: MockScheduler,
    /// Published batches
    pub publisher: MockPublisher,
    /// Data-ready latch
    pub latch: &'static DataReadyLatch,
}

/// Leak a latch so the driver can borrow it for `'static`
pub fn new_latch() -> &'static DataReadyLatch {
    Box::leak(Box::new(DataReadyLatch::new()))
}

/// Create a polling mock driver for testing
/// Returns (driver, harness) where the harness shares state with the driver
pub fn create_mock_driver(config: Config) -> (MockDriver, Harness) {
    let harness = Harness {
        interface: MockInterface::new(),
        scheduler: MockScheduler::default(),
        publisher: MockPublisher::default(),
        latch: new_latch(),
    };

    let driver = Iim42652::new(
        harness.interface.clone(),
        harness.scheduler.clone(),
        harness.publisher.clone(),
        harness.latch,
        config,
    );

    (driver, harness)
}

/// Create a mock driver with a data-ready line
#[allow(dead_code)]
pub fn create_drdy_driver(config: Config) -> (MockDriver<MockPin>, Harness, MockPin) {
    let (driver, harness) = create_mock_driver(config);
    let pin = MockPin::default();
    (driver.with_data_ready(pin.clone()), harness, pin)
}

/// Configuration with a fixed output rate
pub fn config_with_rate(output_rate_hz: u32) -> Config {
    Config {
        device_id: 7,
        output_rate_hz,
        ..Config::default()
    }
}

/// Run `init()` and step through until FIFO_READ
pub fn bring_up<D: DataReadyPin>(driver: &mut MockDriver<D>, harness: &Harness) {
    driver.init().expect("init failed");

    for _ in 0..4 {
        driver.run();
        harness.scheduler.advance(1);
    }

    assert_eq!(driver.state(), State::FifoRead);
}

/// Split a 20-bit value into its MSB, LSB and low nibble
fn split_20bit(value: i32) -> (u8, u8, u8) {
    let raw = (value as u32) & 0xF_FFFF;
    ((raw >> 12) as u8, (raw >> 4) as u8, (raw & 0x0F) as u8)
}

/// Build a valid high-resolution record from raw 20-bit values
pub fn frame(accel: [i32; 3], gyro: [i32; 3], temperature: i16, timestamp_delta: u16) -> FifoFrame {
    let mut bytes = [0u8; 20];
    bytes[0] = FifoHeader::VALID_WITH_TIMESTAMP.0;

    for axis in 0..3 {
        let (msb, lsb, accel_nibble) = split_20bit(accel[axis]);
        bytes[1 + axis * 2] = msb;
        bytes[2 + axis * 2] = lsb;

        let (msb, lsb, gyro_nibble) = split_20bit(gyro[axis]);
        bytes[7 + axis * 2] = msb;
        bytes[8 + axis * 2] = lsb;

        bytes[17 + axis] = (accel_nibble << 4) | gyro_nibble;
    }

    bytes[13..15].copy_from_slice(&temperature.to_be_bytes());
    bytes[15..17].copy_from_slice(&timestamp_delta.to_be_bytes());

    FifoFrame(bytes)
}

/// A quiet record: small values, 25 °C, no timestamp delta
pub fn quiet_frame() -> FifoFrame {
    frame([400, -800, 1200], [40, 80, -120], 0, 0)
}

/// `count` copies of [`quiet_frame`]
pub fn quiet_frames(count: usize) -> Vec<FifoFrame> {
    vec![quiet_frame(); count]
}

/// Assert that two floating point values are approximately equal
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}
