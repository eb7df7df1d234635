//! FIFO record decoding
//!
//! Turns the records of one [`FifoSnapshot`](super::FifoSnapshot) into an
//! accelerometer and a gyroscope sample set.
//!
//! Only records with a valid header (see [`FifoHeader::is_valid`]) contribute;
//! padding and ODR-change records are skipped. Any invalid sample, invalid
//! temperature or missing timestamp aborts the whole decode.
//!
//! Each sensor starts a batch in extended resolution. If any axis of any
//! record does not fit in 16 bits after the extension shift, that sensor's
//! whole batch switches to the 16-bit register pairs, earlier records
//! included, and stays there for the rest of the batch.
//!
//! # Example
//!
//! ```
//! use iim42652::{ClockInput, FifoDecoder, FifoFrame, DecodeError};
//!
//! let decoder = FifoDecoder::new(ClockInput::Internal);
//! let padding = FifoFrame([0x80; 20]);
//! assert_eq!(decoder.decode([padding]), Err(DecodeError::NoValidSamples));
//! ```

use super::{
    FIFO_MAX_SAMPLES, FIFO_SAMPLE_DT_US, FifoFrame, INVALID_SAMPLE_20BIT, INVALID_TEMPERATURE,
};
use crate::config::ClockInput;
use crate::sensors::{AccelResolution, GyroResolution};

/// Temperature sensitivity in LSB/°C
pub const TEMPERATURE_SENSITIVITY: f32 = 132.48;

/// Temperature at a raw reading of zero, in °C
pub const TEMPERATURE_OFFSET: f32 = 25.0;

/// Allowed deviation of the measured sample interval from nominal
const TIMESTAMP_TOLERANCE: f32 = 0.01;

/// Reasons a FIFO read is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// An accelerometer axis held the invalid sample marker
    InvalidAccelSample,
    /// A gyroscope axis held the invalid sample marker
    InvalidGyroSample,
    /// Temperature held the invalid sample marker
    InvalidTemperature,
    /// A valid record had no ODR timestamp
    MissingTimestamp,
    /// No record had a valid header
    NoValidSamples,
    /// Averaged temperature was not finite
    NonFiniteTemperature,
}

/// Result of decoding one FIFO read
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFifo {
    /// Accelerometer samples, Y and Z negated
    pub accel: heapless::Vec<[i16; 3], FIFO_MAX_SAMPLES>,
    /// Gyroscope samples, Y and Z negated
    pub gyro: heapless::Vec<[i16; 3], FIFO_MAX_SAMPLES>,
    /// Representation of `accel`
    pub accel_resolution: AccelResolution,
    /// Representation of `gyro`
    pub gyro_resolution: GyroResolution,
    /// Averaged die temperature in °C
    pub temperature: f32,
    /// Averaged measured sample interval in microseconds, when within 1% of
    /// nominal
    pub measured_dt: Option<f32>,
    /// The measured interval was outside tolerance and was discarded
    pub timestamp_error: bool,
}

impl DecodedFifo {
    /// Number of valid records decoded
    #[must_use]
    pub fn samples(&self) -> usize {
        self.accel.len()
    }

    /// Sample interval to publish with, measured if trusted, else nominal
    #[must_use]
    pub fn dt(&self) -> f32 {
        self.measured_dt.unwrap_or(FIFO_SAMPLE_DT_US)
    }
}

/// FIFO record decoder
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoDecoder {
    /// Raw timestamp delta to microseconds
    timestamp_scale: f32,
}

impl FifoDecoder {
    /// Create a decoder for the given clock source
    #[must_use]
    pub fn new(clock_input: ClockInput) -> Self {
        Self {
            timestamp_scale: clock_input.timestamp_scale(),
        }
    }

    /// Factor applied to raw timestamp deltas
    #[must_use]
    pub const fn timestamp_scale(&self) -> f32 {
        self.timestamp_scale
    }

    /// Decode up to [`FIFO_MAX_SAMPLES`] records
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if a valid record carries an invalid marker or
    /// no timestamp, if no record is valid, or if the temperature average is
    /// not finite. No partial result is produced.
    pub fn decode<F>(&self, frames: F) -> Result<DecodedFifo, DecodeError>
    where
        F: IntoIterator<Item = FifoFrame>,
    {
        let mut valid: heapless::Vec<FifoFrame, FIFO_MAX_SAMPLES> = heapless::Vec::new();
        let mut accel_resolution = AccelResolution::Extended;
        let mut gyro_resolution = GyroResolution::Extended;
        let mut temperature_sum = 0.0f32;
        let mut timestamp_interval_sum = 0.0f32;

        for frame in frames.into_iter().take(FIFO_MAX_SAMPLES) {
            let header = frame.header();
            if !header.is_valid() {
                continue;
            }

            let accel = axes(|axis| frame.accel_raw20(axis));
            if accel.contains(&INVALID_SAMPLE_20BIT) {
                return Err(DecodeError::InvalidAccelSample);
            }
            if accel_resolution == AccelResolution::Extended
                && exceeds_i16(accel, AccelResolution::extended_shift_divisor())
            {
                accel_resolution = AccelResolution::Reduced;
            }

            let gyro = axes(|axis| frame.gyro_raw20(axis));
            if gyro.contains(&INVALID_SAMPLE_20BIT) {
                return Err(DecodeError::InvalidGyroSample);
            }
            if gyro_resolution == GyroResolution::Extended
                && exceeds_i16(gyro, GyroResolution::extended_shift_divisor())
            {
                gyro_resolution = GyroResolution::Reduced;
            }

            let temperature = frame.temperature_raw();
            if temperature == INVALID_TEMPERATURE {
                return Err(DecodeError::InvalidTemperature);
            }
            temperature_sum += f32::from(temperature);

            if !header.has_timestamp() {
                #[cfg(feature = "defmt")]
                defmt::debug!("IIM42652: FIFO header timestamp missing");
                return Err(DecodeError::MissingTimestamp);
            }
            timestamp_interval_sum += f32::from(frame.timestamp_delta()) * self.timestamp_scale;

            if valid.push(frame).is_err() {
                break;
            }
        }

        if valid.is_empty() {
            return Err(DecodeError::NoValidSamples);
        }

        let count = valid.len() as f32;

        let temperature = (temperature_sum / count) / TEMPERATURE_SENSITIVITY + TEMPERATURE_OFFSET;
        if !temperature.is_finite() {
            return Err(DecodeError::NonFiniteTemperature);
        }

        let mut measured_dt = None;
        let mut timestamp_error = false;
        if timestamp_interval_sum > 0.0 {
            let dt_avg = timestamp_interval_sum / count;
            if dt_avg < FIFO_SAMPLE_DT_US * (1.0 - TIMESTAMP_TOLERANCE)
                || dt_avg > FIFO_SAMPLE_DT_US * (1.0 + TIMESTAMP_TOLERANCE)
            {
                timestamp_error = true;
            } else {
                measured_dt = Some(dt_avg);
            }
        }

        // One resolution per batch: a switch applies to every record, earlier
        // ones included.
        let accel = valid
            .iter()
            .map(|frame| {
                to_vehicle_frame(axes(|axis| match accel_resolution {
                    AccelResolution::Extended => {
                        frame.accel_raw20(axis) / AccelResolution::extended_shift_divisor()
                    }
                    AccelResolution::Reduced => i32::from(frame.accel_raw16(axis)),
                }))
            })
            .collect();

        let gyro = valid
            .iter()
            .map(|frame| {
                to_vehicle_frame(axes(|axis| match gyro_resolution {
                    GyroResolution::Extended => {
                        frame.gyro_raw20(axis) / GyroResolution::extended_shift_divisor()
                    }
                    GyroResolution::Reduced => i32::from(frame.gyro_raw16(axis)),
                }))
            })
            .collect();

        Ok(DecodedFifo {
            accel,
            gyro,
            accel_resolution,
            gyro_resolution,
            temperature,
            measured_dt,
            timestamp_error,
        })
    }
}

fn axes(f: impl Fn(usize) -> i32) -> [i32; 3] {
    [f(0), f(1), f(2)]
}

/// Whether any shifted axis would reach the `i16` limits
fn exceeds_i16(raw: [i32; 3], divisor: i32) -> bool {
    raw.iter().any(|v| {
        let shifted = v / divisor;
        shifted >= i32::from(i16::MAX) || shifted <= i32::from(i16::MIN)
    })
}

/// Sensor frame (x forward, y left, z up) to x forward, y right, z down
fn to_vehicle_frame([x, y, z]: [i32; 3]) -> [i16; 3] {
    // Values were range checked or come from 16-bit pairs
    let clamp = |v: i32| v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
    [clamp(x), clamp(y).saturating_neg(), clamp(z).saturating_neg()]
}
