//! Common test utilities and mock implementations

pub mod test_utils;

pub use mock_interface::Operation;
pub use test_utils::{
    Harness, ScheduleCall, assert_float_eq, bring_up, config_with_rate, create_drdy_driver,
    create_mock_driver, frame, quiet_frame, quiet_frames,
};
