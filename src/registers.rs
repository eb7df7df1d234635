//! Register definitions for the IIM-42652
//!
//! The IIM-42652 uses a bank-switching architecture: addresses 0x00-0x7F have
//! different meanings depending on the bank selected via `REG_BANK_SEL` (0x76).
//! `REG_BANK_SEL` itself is reachable from every bank.
//!
//! ## Bank Architecture
//! - **Bank 0**: Configuration, interrupt, FIFO and sensor data
//! - **Bank 1**: Gyroscope static filters, interface pin functions
//! - **Bank 2**: Accelerometer static filters
//!
//! Two views are provided:
//! - [`Register`] constants in [`bank0`], [`bank1`] and [`bank2`] plus the bit
//!   masks in [`bits`], used by the table-driven configuration engine.
//! - A `device-driver` register block ([`Iim42652Registers`]) with typed field
//!   access for the handful of registers the state machine touches directly.

use crate::Bank;

/// A register address qualified by the bank it lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register {
    /// Bank that must be selected before accessing the register
    pub bank: Bank,
    /// Register address within the bank
    pub address: u8,
}

impl Register {
    /// Create a banked register address
    #[must_use]
    pub const fn new(bank: Bank, address: u8) -> Self {
        Self { bank, address }
    }
}

/// Bank 0 register addresses
pub mod bank0 {
    use super::Register;
    use crate::Bank;

    /// DEVICE_CONFIG - soft reset and SPI mode
    pub const DEVICE_CONFIG: Register = Register::new(Bank::Bank0, 0x11);
    /// INT_CONFIG - INT1/INT2 pin electrical configuration
    pub const INT_CONFIG: Register = Register::new(Bank::Bank0, 0x14);
    /// FIFO_CONFIG - FIFO mode
    pub const FIFO_CONFIG: Register = Register::new(Bank::Bank0, 0x16);
    /// INT_STATUS - interrupt status, first byte of the FIFO burst read
    pub const INT_STATUS: Register = Register::new(Bank::Bank0, 0x2D);
    /// FIFO_COUNTH - FIFO byte count high byte
    pub const FIFO_COUNTH: Register = Register::new(Bank::Bank0, 0x2E);
    /// FIFO_COUNTL - FIFO byte count low byte
    pub const FIFO_COUNTL: Register = Register::new(Bank::Bank0, 0x2F);
    /// FIFO_DATA - FIFO read port
    pub const FIFO_DATA: Register = Register::new(Bank::Bank0, 0x30);
    /// SIGNAL_PATH_RESET - FIFO flush and signal path resets
    pub const SIGNAL_PATH_RESET: Register = Register::new(Bank::Bank0, 0x4B);
    /// INTF_CONFIG0 - data endianness, FIFO count format, serial interface
    pub const INTF_CONFIG0: Register = Register::new(Bank::Bank0, 0x4C);
    /// INTF_CONFIG1 - clock input mode
    pub const INTF_CONFIG1: Register = Register::new(Bank::Bank0, 0x4D);
    /// PWR_MGMT0 - accel/gyro power modes
    pub const PWR_MGMT0: Register = Register::new(Bank::Bank0, 0x4E);
    /// GYRO_CONFIG0 - gyro full scale and ODR
    pub const GYRO_CONFIG0: Register = Register::new(Bank::Bank0, 0x4F);
    /// ACCEL_CONFIG0 - accel full scale and ODR
    pub const ACCEL_CONFIG0: Register = Register::new(Bank::Bank0, 0x50);
    /// GYRO_CONFIG1 - gyro UI filter order
    pub const GYRO_CONFIG1: Register = Register::new(Bank::Bank0, 0x51);
    /// GYRO_ACCEL_CONFIG0 - UI filter bandwidths
    pub const GYRO_ACCEL_CONFIG0: Register = Register::new(Bank::Bank0, 0x52);
    /// ACCEL_CONFIG1 - accel UI filter order
    pub const ACCEL_CONFIG1: Register = Register::new(Bank::Bank0, 0x53);
    /// TMST_CONFIG - timestamp configuration
    pub const TMST_CONFIG: Register = Register::new(Bank::Bank0, 0x54);
    /// FIFO_CONFIG1 - FIFO packet contents
    pub const FIFO_CONFIG1: Register = Register::new(Bank::Bank0, 0x5F);
    /// FIFO_CONFIG2 - FIFO watermark bits 7:0
    pub const FIFO_CONFIG2: Register = Register::new(Bank::Bank0, 0x60);
    /// FIFO_CONFIG3 - FIFO watermark bits 11:8
    pub const FIFO_CONFIG3: Register = Register::new(Bank::Bank0, 0x61);
    /// INT_CONFIG0 - interrupt clear behaviour
    pub const INT_CONFIG0: Register = Register::new(Bank::Bank0, 0x63);
    /// INT_CONFIG1 - interrupt pulse and async reset
    pub const INT_CONFIG1: Register = Register::new(Bank::Bank0, 0x64);
    /// INT_SOURCE0 - INT1 sources
    pub const INT_SOURCE0: Register = Register::new(Bank::Bank0, 0x65);
    /// WHO_AM_I - device identification
    pub const WHO_AM_I: Register = Register::new(Bank::Bank0, 0x75);
    /// REG_BANK_SEL - register bank selection (mapped into all banks)
    pub const REG_BANK_SEL: Register = Register::new(Bank::Bank0, 0x76);
}

/// Bank 1 register addresses
pub mod bank1 {
    use super::Register;
    use crate::Bank;

    /// GYRO_CONFIG_STATIC2 - gyro anti-alias and notch filter disables
    pub const GYRO_CONFIG_STATIC2: Register = Register::new(Bank::Bank1, 0x0B);
    /// INTF_CONFIG5 - pin 9 function
    pub const INTF_CONFIG5: Register = Register::new(Bank::Bank1, 0x7B);
}

/// Bank 2 register addresses
pub mod bank2 {
    use super::Register;
    use crate::Bank;

    /// ACCEL_CONFIG_STATIC2 - accel anti-alias filter disable
    pub const ACCEL_CONFIG_STATIC2: Register = Register::new(Bank::Bank2, 0x03);
}

/// Named bit masks, one module per register
#[allow(missing_docs)]
pub mod bits {
    pub mod device_config {
        pub const SOFT_RESET_CONFIG: u8 = 1 << 0;
    }

    pub mod int_config {
        /// Latched mode
        pub const INT1_MODE: u8 = 1 << 2;
        /// Push-pull
        pub const INT1_DRIVE_CIRCUIT: u8 = 1 << 1;
        /// Active high
        pub const INT1_POLARITY: u8 = 1 << 0;
    }

    pub mod fifo_config {
        /// FIFO_MODE = 0b10: stop-on-full
        pub const FIFO_MODE_STOP_ON_FULL_SET: u8 = 1 << 7;
        pub const FIFO_MODE_STOP_ON_FULL_CLEAR: u8 = 1 << 6;
    }

    pub mod int_status {
        pub const UI_FSYNC_INT: u8 = 1 << 6;
        pub const PLL_RDY_INT: u8 = 1 << 5;
        pub const RESET_DONE_INT: u8 = 1 << 4;
        pub const DATA_RDY_INT: u8 = 1 << 3;
        pub const FIFO_THS_INT: u8 = 1 << 2;
        pub const FIFO_FULL_INT: u8 = 1 << 1;
        pub const AGC_RDY_INT: u8 = 1 << 0;
    }

    pub mod signal_path_reset {
        pub const ABORT_AND_RESET: u8 = 1 << 3;
        pub const TMST_STROBE: u8 = 1 << 2;
        pub const FIFO_FLUSH: u8 = 1 << 1;
    }

    pub mod intf_config0 {
        /// FIFO count reported in records instead of bytes
        pub const FIFO_COUNT_REC: u8 = 1 << 6;
        pub const FIFO_COUNT_ENDIAN: u8 = 1 << 5;
        pub const SENSOR_DATA_ENDIAN: u8 = 1 << 4;
        /// UI_SIFS_CFG = 0b11
        pub const UI_SIFS_CFG_DISABLE_I2C: u8 = (1 << 1) | (1 << 0);
    }

    pub mod intf_config1 {
        /// RTC clock input required
        pub const RTC_MODE: u8 = 1 << 2;
    }

    pub mod pwr_mgmt0 {
        /// GYRO_MODE = 0b11
        pub const GYRO_MODE_LOW_NOISE: u8 = (1 << 3) | (1 << 2);
        /// ACCEL_MODE = 0b11
        pub const ACCEL_MODE_LOW_NOISE: u8 = (1 << 1) | (1 << 0);
    }

    pub mod gyro_config0 {
        /// GYRO_FS_SEL = 0b000
        pub const GYRO_FS_SEL_2000_DPS_CLEAR: u8 = (1 << 7) | (1 << 6) | (1 << 5);
        /// GYRO_ODR = 0b0001
        pub const GYRO_ODR_32KHZ_SET: u8 = 1 << 0;
        pub const GYRO_ODR_32KHZ_CLEAR: u8 = (1 << 3) | (1 << 2) | (1 << 1);
    }

    pub mod accel_config0 {
        /// ACCEL_FS_SEL = 0b000
        pub const ACCEL_FS_SEL_16G_CLEAR: u8 = (1 << 7) | (1 << 6) | (1 << 5);
        /// ACCEL_ODR = 0b0001
        pub const ACCEL_ODR_32KHZ_SET: u8 = 1 << 0;
        pub const ACCEL_ODR_32KHZ_CLEAR: u8 = (1 << 3) | (1 << 2) | (1 << 1);
    }

    pub mod gyro_config1 {
        pub const GYRO_UI_FILT_ORD: u8 = (1 << 3) | (1 << 2);
    }

    pub mod gyro_accel_config0 {
        pub const ACCEL_UI_FILT_BW: u8 = 0xF0;
        pub const GYRO_UI_FILT_BW: u8 = 0x0F;
    }

    pub mod accel_config1 {
        pub const ACCEL_UI_FILT_ORD: u8 = (1 << 4) | (1 << 3);
    }

    pub mod tmst_config {
        pub const TMST_TO_REGS_EN: u8 = 1 << 4;
        /// 0: 1 us resolution
        pub const TMST_RES: u8 = 1 << 3;
        pub const TMST_DELTA_EN: u8 = 1 << 2;
        pub const TMST_FSYNC_EN: u8 = 1 << 1;
        pub const TMST_EN: u8 = 1 << 0;
    }

    pub mod fifo_config1 {
        pub const FIFO_RESUME_PARTIAL_RD: u8 = 1 << 6;
        pub const FIFO_WM_GT_TH: u8 = 1 << 5;
        pub const FIFO_HIRES_EN: u8 = 1 << 4;
        pub const FIFO_TMST_FSYNC_EN: u8 = 1 << 3;
        pub const FIFO_TEMP_EN: u8 = 1 << 2;
        pub const FIFO_GYRO_EN: u8 = 1 << 1;
        pub const FIFO_ACCEL_EN: u8 = 1 << 0;
    }

    pub mod int_config0 {
        /// FIFO_THS_INT_CLEAR = 0b10: clear on FIFO data 1 byte read
        pub const FIFO_THS_INT_CLEAR_SET: u8 = 1 << 3;
        pub const FIFO_THS_INT_CLEAR_CLEAR: u8 = 1 << 2;
    }

    pub mod int_config1 {
        pub const INT_ASYNC_RESET: u8 = 1 << 4;
    }

    pub mod int_source0 {
        pub const UI_DRDY_INT1_EN: u8 = 1 << 3;
        pub const FIFO_THS_INT1_EN: u8 = 1 << 2;
    }

    pub mod gyro_config_static2 {
        pub const GYRO_AAF_DIS: u8 = 1 << 1;
        pub const GYRO_NF_DIS: u8 = 1 << 0;
    }

    pub mod intf_config5 {
        /// PIN9_FUNCTION = 0b10: CLKIN
        pub const PIN9_FUNCTION_CLKIN_SET: u8 = 1 << 2;
        pub const PIN9_FUNCTION_CLKIN_CLEAR: u8 = 1 << 1;
        /// PIN9_FUNCTION = 0b00: INT2 (reset value)
        pub const PIN9_FUNCTION_RESET_SET: u8 = 0;
        pub const PIN9_FUNCTION_RESET_CLEAR: u8 = (1 << 2) | (1 << 1);
    }

    pub mod accel_config_static2 {
        pub const ACCEL_AAF_DIS: u8 = 1 << 0;
    }
}

device_driver::create_device!(
    device_name: Iim42652Registers,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        // ==================== BANK 0 REGISTERS ====================
        // Only registers the state machine accesses with typed fields.

        /// DEVICE_CONFIG - Device Configuration (Bank 0, 0x11)
        register DeviceConfig {
            const ADDRESS = 0x11;
            const SIZE_BITS = 8;

            /// Software reset (self clearing)
            soft_reset_config: bool = 0,
            reserved_3_1: uint = 1..4,
            /// SPI mode (0: mode 0/3, 1: mode 1/2)
            spi_mode: bool = 4,
            reserved_7_5: uint = 5..8,
        },

        /// INT_STATUS - Interrupt Status (Bank 0, 0x2D), cleared on read
        register IntStatus {
            const ADDRESS = 0x2D;
            const SIZE_BITS = 8;

            /// AGC ready
            agc_rdy_int: bool = 0,
            /// FIFO full
            fifo_full_int: bool = 1,
            /// FIFO threshold reached
            fifo_ths_int: bool = 2,
            /// UI data ready
            data_rdy_int: bool = 3,
            /// Software reset complete
            reset_done_int: bool = 4,
            /// PLL ready
            pll_rdy_int: bool = 5,
            /// UI FSYNC
            ui_fsync_int: bool = 6,
            reserved_7: uint = 7..8,
        },

        /// SIGNAL_PATH_RESET - Signal Path Reset (Bank 0, 0x4B)
        register SignalPathReset {
            const ADDRESS = 0x4B;
            const SIZE_BITS = 8;

            reserved_0: uint = 0..1,
            /// Flush FIFO (self clearing)
            fifo_flush: bool = 1,
            /// Strobe timestamp into TMST registers
            tmst_strobe: bool = 2,
            /// Abort signal path and reset
            abort_and_reset: bool = 3,
            reserved_4: uint = 4..5,
            /// DMP memory reset
            dmp_mem_reset: bool = 5,
            /// DMP init
            dmp_init: bool = 6,
            reserved_7: uint = 7..8,
        },

        /// PWR_MGMT0 - Power Management 0 (Bank 0, 0x4E)
        register PwrMgmt0 {
            const ADDRESS = 0x4E;
            const SIZE_BITS = 8;

            /// Accelerometer mode (0: off, 2: low power, 3: low noise)
            accel_mode: uint = 0..2,
            /// Gyroscope mode (0: off, 1: standby, 3: low noise)
            gyro_mode: uint = 2..4,
            /// RC oscillator kept on when sensors are off
            idle: bool = 4,
            /// Temperature sensor disable
            temp_dis: bool = 5,
            reserved_7_6: uint = 6..8,
        },

        /// WHO_AM_I - Device ID Register (Bank 0, 0x75)
        /// Expected value: 0x6F
        register WhoAmI {
            const ADDRESS = 0x75;
            const SIZE_BITS = 8;

            /// Device ID (should read 0x6F)
            who_am_i: uint = 0..8,
        },

        /// REG_BANK_SEL - Register Bank Selection (all banks, 0x76)
        register RegBankSel {
            const ADDRESS = 0x76;
            const SIZE_BITS = 8;

            /// Bank selection (0-4)
            bank_sel: uint = 0..3,
            reserved_7_3: uint = 3..8,
        },
    }
);
