//! Integration tests for failure escalation and recovery

use crate::common::*;
use iim42652::registers::{bank0, bank1};
use iim42652::{Bank, Fault, State};

fn bad_temperature_frames(count: usize) -> Vec<iim42652::FifoFrame> {
    vec![frame([0, 0, 0], [0, 0, 0], i16::MIN, 0); count]
}

#[test]
fn test_persistent_failures_force_reset() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    bring_up(&mut driver, &harness);

    for cycle in 1..=10 {
        harness.interface.push_fifo_frames(&bad_temperature_frames(32));
        driver.run();
        assert_eq!(driver.failure_count(), cycle);
        assert_eq!(driver.state(), State::FifoRead);
    }
    assert_eq!(driver.counters().get(Fault::BadTransfer), 10);
    assert_eq!(harness.publisher.accel_count(), 0);

    harness.scheduler.clear_calls();
    harness.interface.push_fifo_frames(&bad_temperature_frames(32));
    driver.run();

    assert_eq!(driver.state(), State::Reset);
    assert_eq!(
        harness.scheduler.calls(),
        [ScheduleCall::CancelAll, ScheduleCall::Now]
    );

    // The RESET step forgets the failures
    driver.run();
    assert_eq!(driver.failure_count(), 0);
    assert_eq!(driver.state(), State::WaitForReset);
    assert_eq!(driver.counters().get(Fault::Reset), 2);
}

#[test]
fn test_success_pays_back_one_failure() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    bring_up(&mut driver, &harness);

    for _ in 0..3 {
        driver.run();
    }
    assert_eq!(driver.failure_count(), 3);

    harness.interface.push_fifo_frames(&quiet_frames(32));
    driver.run();
    assert_eq!(driver.failure_count(), 2);
}

#[test]
fn test_bus_error_counts_bad_transfer() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    bring_up(&mut driver, &harness);

    harness.interface.push_fifo_frames(&quiet_frames(32));
    harness.interface.fail_next_read();
    driver.run();

    assert_eq!(driver.counters().get(Fault::BadTransfer), 1);
    assert_eq!(driver.counters().get(Fault::FifoEmpty), 0);
    assert_eq!(driver.failure_count(), 1);
    assert_eq!(harness.publisher.accel_count(), 0);
}

#[test]
fn test_missing_timestamp_is_a_failure_only() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    bring_up(&mut driver, &harness);

    let mut record = quiet_frame();
    // Drop the ODR timestamp flag
    record.0[0] &= !(1 << 3);
    harness.interface.push_fifo_frames(&vec![record; 32]);
    driver.run();

    assert_eq!(driver.failure_count(), 1);
    assert_eq!(driver.counters().get(Fault::BadTransfer), 0);
    assert_eq!(harness.publisher.accel_count(), 0);
}

#[test]
fn test_register_mismatch_after_failure_resets() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    bring_up(&mut driver, &harness);

    // First bank 0 entry in the round-robin check
    harness
        .interface
        .set_register(Bank::Bank0, bank0::INT_CONFIG.address, 0x00);
    driver.run();

    assert_eq!(driver.counters().get(Fault::BadRegister), 1);
    assert_eq!(driver.state(), State::Reset);
}

#[test]
fn test_periodic_check_catches_mismatch() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    bring_up(&mut driver, &harness);

    harness
        .interface
        .set_register(Bank::Bank1, bank1::GYRO_CONFIG_STATIC2.address, 0xFF);

    // A good read before the check is due leaves it alone
    harness.interface.push_fifo_frames(&quiet_frames(32));
    driver.run();
    assert_eq!(driver.state(), State::FifoRead);
    assert_eq!(driver.counters().get(Fault::BadRegister), 0);

    harness.scheduler.advance(100_001);
    harness.interface.push_fifo_frames(&quiet_frames(32));
    driver.run();

    assert_eq!(harness.publisher.accel_count(), 2);
    assert_eq!(driver.counters().get(Fault::BadRegister), 1);
    assert_eq!(driver.state(), State::Reset);
}

#[test]
fn test_periodic_check_walks_the_tables() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    bring_up(&mut driver, &harness);

    // One full lap over the 18 bank 0 entries
    for _ in 0..18 {
        harness.scheduler.advance(100_001);
        harness.interface.push_fifo_frames(&quiet_frames(32));
        driver.run();
        assert_eq!(driver.state(), State::FifoRead);
    }
    assert_eq!(driver.counters().get(Fault::BadRegister), 0);

    // Back at the first bank 0 entry
    harness
        .interface
        .set_register(Bank::Bank0, bank0::INT_CONFIG.address, 0x00);
    harness.scheduler.advance(100_001);
    harness.interface.push_fifo_frames(&quiet_frames(32));
    driver.run();
    assert_eq!(driver.state(), State::Reset);
}

#[test]
fn test_reset_timeout_retries() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    harness.interface.set_reset_done_on_soft_reset(false);
    driver.init().unwrap();

    driver.run();
    assert_eq!(driver.state(), State::WaitForReset);

    driver.run();
    assert_eq!(driver.state(), State::WaitForReset);
    assert_eq!(harness.scheduler.last_call(), Some(ScheduleCall::After(100_000)));

    harness.scheduler.advance(1_000_001);
    driver.run();
    assert_eq!(driver.state(), State::Reset);
    assert_eq!(harness.scheduler.last_call(), Some(ScheduleCall::After(100_000)));

    driver.run();
    assert_eq!(driver.counters().get(Fault::Reset), 2);
}

#[test]
fn test_configure_retries_then_resets() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    harness.interface.set_stuck(Bank::Bank0, bank0::INT_CONFIG.address);
    driver.init().unwrap();

    driver.run();
    driver.run();
    assert_eq!(driver.state(), State::Configure);

    driver.run();
    assert_eq!(driver.state(), State::Configure);
    assert_eq!(harness.scheduler.last_call(), Some(ScheduleCall::After(100_000)));
    // Configuration mismatches are not counted as bad registers
    assert_eq!(driver.counters().get(Fault::BadRegister), 0);

    harness.scheduler.advance(1_000_001);
    driver.run();
    assert_eq!(driver.state(), State::Reset);
}

#[test]
fn test_recovery_after_reset() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    bring_up(&mut driver, &harness);

    driver.reset();
    for _ in 0..4 {
        driver.run();
    }
    assert_eq!(driver.state(), State::FifoRead);

    harness.interface.push_fifo_frames(&quiet_frames(32));
    driver.run();
    assert_eq!(harness.publisher.accel_count(), 1);
    assert_eq!(driver.counters().get(Fault::Reset), 2);
}
