//! Tests for register tables and configuration

use crate::common::*;
use iim42652::registers::{bank0, bank1, bits};
use iim42652::{Bank, ClockInput, Config, RegisterTables, State};

#[test]
fn test_configure_writes_every_entry() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    bring_up(&mut driver, &harness);

    let tables = driver.tables().clone();
    for entry in tables.iter() {
        let value = harness
            .interface
            .get_register(entry.reg.bank, entry.reg.address);

        assert!(
            entry.matches(value),
            "bank {:?} 0x{:02x} = 0x{:02x}",
            entry.reg.bank,
            entry.reg.address,
            value
        );
    }
}

#[test]
fn test_configure_reports_first_mismatch() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    harness.interface.set_stuck(Bank::Bank0, bank0::FIFO_CONFIG.address);
    harness.interface.set_stuck(Bank::Bank1, bank1::INTF_CONFIG5.address);

    match driver.configure() {
        Err(iim42652::Error::RegisterMismatch { bank, address, .. }) => {
            assert_eq!(bank, Bank::Bank0);
            assert_eq!(address, bank0::FIFO_CONFIG.address);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_watermark_matches_sample_count() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    bring_up(&mut driver, &harness);

    // 32 records of 20 bytes
    let low = harness
        .interface
        .get_register(Bank::Bank0, bank0::FIFO_CONFIG2.address);
    let high = harness
        .interface
        .get_register(Bank::Bank0, bank0::FIFO_CONFIG3.address);
    assert_eq!((u16::from(high) << 8) | u16::from(low), 640);
}

#[test]
fn test_external_clock_selects_clkin() {
    let config = Config {
        clock_input: ClockInput::External {
            frequency_hz: 32768.0,
        },
        ..config_with_rate(1000)
    };
    let (mut driver, harness) = create_mock_driver(config);
    bring_up(&mut driver, &harness);

    let intf_config1 = harness
        .interface
        .get_register(Bank::Bank0, bank0::INTF_CONFIG1.address);
    assert_ne!(intf_config1 & bits::intf_config1::RTC_MODE, 0);

    let intf_config5 = harness
        .interface
        .get_register(Bank::Bank1, bank1::INTF_CONFIG5.address);
    let clkin = driver.tables().find(bank1::INTF_CONFIG5).unwrap();
    assert!(clkin.matches(intf_config5));
    assert_eq!(clkin.set_bits, bits::intf_config5::PIN9_FUNCTION_CLKIN_SET);
}

#[test]
fn test_internal_clock_keeps_rtc_mode_off() {
    let tables = RegisterTables::new(ClockInput::Internal, 8);
    let entry = tables.find(bank0::INTF_CONFIG1).unwrap();
    assert_eq!(entry.set_bits, 0);
    assert_eq!(entry.clear_bits, bits::intf_config1::RTC_MODE);
}

#[test]
fn test_wake_sensors_before_configure() {
    let (mut driver, harness) = create_mock_driver(config_with_rate(1000));
    driver.init().unwrap();
    driver.run();
    driver.run();

    assert_eq!(driver.state(), State::Configure);
    let pwr = harness
        .interface
        .get_register(Bank::Bank0, bank0::PWR_MGMT0.address);
    assert_eq!(pwr & 0x0F, 0x0F);
    assert_eq!(harness.scheduler.last_call(), Some(ScheduleCall::After(30_000)));
}
