//! FIFO frame layout and transfer buffer
//!
//! The IIM-42652 has a 2048-byte FIFO. With accel, gyro, temperature,
//! timestamp and high-resolution enabled every record is a 20-byte
//! "packet 4":
//!
//! | Bytes    | Content                                               |
//! |----------|-------------------------------------------------------|
//! | `0`      | Header                                                |
//! | `1..7`   | Accel X, Y, Z (bits 19:12, 11:4 of each axis)         |
//! | `7..13`  | Gyro X, Y, Z (bits 19:12, 11:4 of each axis)          |
//! | `13..15` | Temperature                                           |
//! | `15..17` | Timestamp delta                                       |
//! | `17..20` | Extension bytes, accel bits 3:0 in 7:4, gyro in 3:0   |
//!
//! A drain reads `INT_STATUS`, `FIFO_COUNTH`, `FIFO_COUNTL` and then the FIFO
//! data port in a single burst starting at `INT_STATUS`, into a
//! [`FifoSnapshot`].

pub mod parser;

/// FIFO size in bytes
pub const FIFO_SIZE: u16 = 2048;

/// Size of one FIFO record in bytes
pub const FIFO_FRAME_SIZE: usize = 20;

/// Maximum number of records drained per cycle
pub const FIFO_MAX_SAMPLES: usize = 32;

/// FIFO sample period at the 32 kHz base rate, in nanoseconds
pub const FIFO_SAMPLE_DT_NS: u32 = 31_250;

/// FIFO sample period at the 32 kHz base rate, in microseconds
pub const FIFO_SAMPLE_DT_US: f32 = 31.25;

/// Bytes preceding the FIFO records in a snapshot (status and count)
const SNAPSHOT_HEADER_SIZE: usize = 3;

const SNAPSHOT_SIZE: usize = SNAPSHOT_HEADER_SIZE + FIFO_MAX_SAMPLES * FIFO_FRAME_SIZE;

/// Raw 20-bit value marking an invalid accel or gyro sample
pub const INVALID_SAMPLE_20BIT: i32 = -524_288;

/// Raw temperature value marking an invalid sample
pub const INVALID_TEMPERATURE: i16 = -32768;

/// FIFO record header byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoHeader(pub u8);

impl FifoHeader {
    const MSG: u8 = 1 << 7;
    const ACCEL: u8 = 1 << 6;
    const GYRO: u8 = 1 << 5;
    const HIRES_20: u8 = 1 << 4;
    const TIMESTAMP_ODR: u8 = 1 << 3;
    const ODR_ACCEL: u8 = 1 << 1;
    const ODR_GYRO: u8 = 1 << 0;

    /// Header of a valid accel+gyro high-resolution record with an ODR timestamp
    pub const VALID_WITH_TIMESTAMP: Self =
        Self(Self::ACCEL | Self::GYRO | Self::HIRES_20 | Self::TIMESTAMP_ODR);

    /// The FIFO is empty and this record is padding
    #[must_use]
    pub const fn is_empty_message(self) -> bool {
        self.0 & Self::MSG != 0
    }

    /// Record contains accelerometer data
    #[must_use]
    pub const fn has_accel(self) -> bool {
        self.0 & Self::ACCEL != 0
    }

    /// Record contains gyroscope data
    #[must_use]
    pub const fn has_gyro(self) -> bool {
        self.0 & Self::GYRO != 0
    }

    /// Record carries extended 20-bit data
    #[must_use]
    pub const fn is_high_resolution(self) -> bool {
        self.0 & Self::HIRES_20 != 0
    }

    /// `HEADER_TIMESTAMP_FSYNC` reports an ODR timestamp
    #[must_use]
    pub const fn has_timestamp(self) -> bool {
        self.0 & Self::TIMESTAMP_ODR != 0
    }

    /// Accel ODR changed for this record
    #[must_use]
    pub const fn accel_odr_differs(self) -> bool {
        self.0 & Self::ODR_ACCEL != 0
    }

    /// Gyro ODR changed for this record
    #[must_use]
    pub const fn gyro_odr_differs(self) -> bool {
        self.0 & Self::ODR_GYRO != 0
    }

    /// Record is a genuine accel+gyro high-resolution sample
    ///
    /// With `FIFO_ACCEL_EN` and `FIFO_GYRO_EN` the header is `0b0111_xx00`.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !self.is_empty_message()
            && self.has_accel()
            && self.has_gyro()
            && self.is_high_resolution()
            && !self.accel_odr_differs()
            && !self.gyro_odr_differs()
    }
}

/// Combine a high:low register pair
#[must_use]
pub const fn combine(msb: u8, lsb: u8) -> i16 {
    i16::from_be_bytes([msb, lsb])
}

/// Reassemble an extended 20-bit value from its three fragments
///
/// `nibble` supplies bits 3:0. The result is sign extended from bit 19.
#[must_use]
pub const fn reassemble_20bit(msb: u8, lsb: u8, nibble: u8) -> i32 {
    let value = ((msb as u32) << 12) | ((lsb as u32) << 4) | (nibble as u32 & 0x0F);
    ((value << 12) as i32) >> 12
}

/// One 20-byte FIFO record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoFrame(pub [u8; FIFO_FRAME_SIZE]);

impl FifoFrame {
    const ACCEL: usize = 1;
    const GYRO: usize = 7;
    const TEMP: usize = 13;
    const TIMESTAMP: usize = 15;
    const EXT: usize = 17;

    /// Record header
    #[must_use]
    pub const fn header(&self) -> FifoHeader {
        FifoHeader(self.0[0])
    }

    /// Extended 20-bit accel value for `axis` (0 = X, 1 = Y, 2 = Z)
    #[must_use]
    pub const fn accel_raw20(&self, axis: usize) -> i32 {
        let i = Self::ACCEL + axis * 2;
        reassemble_20bit(self.0[i], self.0[i + 1], (self.0[Self::EXT + axis] & 0xF0) >> 4)
    }

    /// Extended 20-bit gyro value for `axis`
    #[must_use]
    pub const fn gyro_raw20(&self, axis: usize) -> i32 {
        let i = Self::GYRO + axis * 2;
        reassemble_20bit(self.0[i], self.0[i + 1], self.0[Self::EXT + axis] & 0x0F)
    }

    /// Accel value for `axis` from the 16-bit register pair only
    #[must_use]
    pub const fn accel_raw16(&self, axis: usize) -> i16 {
        let i = Self::ACCEL + axis * 2;
        combine(self.0[i], self.0[i + 1])
    }

    /// Gyro value for `axis` from the 16-bit register pair only
    #[must_use]
    pub const fn gyro_raw16(&self, axis: usize) -> i16 {
        let i = Self::GYRO + axis * 2;
        combine(self.0[i], self.0[i + 1])
    }

    /// Raw temperature
    #[must_use]
    pub const fn temperature_raw(&self) -> i16 {
        combine(self.0[Self::TEMP], self.0[Self::TEMP + 1])
    }

    /// Raw timestamp delta to the previous record
    #[must_use]
    pub const fn timestamp_delta(&self) -> u16 {
        u16::from_be_bytes([self.0[Self::TIMESTAMP], self.0[Self::TIMESTAMP + 1]])
    }
}

/// Status, byte count and records captured by one burst read
///
/// Created fresh for every drain and handed to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FifoSnapshot {
    buffer: [u8; SNAPSHOT_SIZE],
    len: usize,
}

impl Default for FifoSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl FifoSnapshot {
    /// Create an empty snapshot
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0; SNAPSHOT_SIZE],
            len: 0,
        }
    }

    /// Number of bytes a burst for `samples` records transfers
    #[must_use]
    pub fn transfer_len(samples: usize) -> usize {
        let data = (samples * FIFO_FRAME_SIZE).min(usize::from(FIFO_SIZE));
        (SNAPSHOT_HEADER_SIZE + data).min(SNAPSHOT_SIZE)
    }

    /// Receive buffer for a burst read of `samples` records
    pub fn buffer_mut(&mut self, samples: usize) -> &mut [u8] {
        self.len = Self::transfer_len(samples);
        &mut self.buffer[..self.len]
    }

    /// `INT_STATUS` at the time of the read
    #[must_use]
    pub const fn int_status(&self) -> u8 {
        self.buffer[0]
    }

    /// The FIFO full interrupt was pending
    #[must_use]
    pub const fn fifo_full(&self) -> bool {
        self.int_status() & crate::registers::bits::int_status::FIFO_FULL_INT != 0
    }

    /// FIFO byte count at the time of the read
    #[must_use]
    pub const fn count_bytes(&self) -> u16 {
        u16::from_be_bytes([self.buffer[1], self.buffer[2]])
    }

    /// Complete records reported present in the FIFO
    #[must_use]
    pub const fn available_samples(&self) -> usize {
        self.count_bytes() as usize / FIFO_FRAME_SIZE
    }

    /// The first `min(samples, available, captured)` records
    pub fn frames(&self, samples: usize) -> impl Iterator<Item = FifoFrame> + '_ {
        let n = samples.min(self.available_samples());
        self.buffer[SNAPSHOT_HEADER_SIZE..self.len.max(SNAPSHOT_HEADER_SIZE)]
            .chunks_exact(FIFO_FRAME_SIZE)
            .take(n)
            .filter_map(|chunk| chunk.try_into().ok().map(FifoFrame))
    }
}
