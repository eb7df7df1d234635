//! Output sample batches
//!
//! Every drain produces one accelerometer batch and one gyroscope batch with
//! the same layout. Samples are kept in raw counts; multiplying by
//! [`SensorFifo::scale`] yields SI units (m/s² or rad/s). A batch uses a
//! single scale for all of its samples.

pub mod accelerometer;
pub mod gyroscope;

// Re-export main types
pub use accelerometer::AccelResolution;
pub use gyroscope::GyroResolution;

use crate::fifo::{FIFO_MAX_SAMPLES, FIFO_SAMPLE_DT_US};

/// A batch of 3-axis samples drained from the FIFO
#[derive(Debug, Clone, PartialEq)]
pub struct SensorFifo {
    /// Time the first sample of the batch arrived (scheduler time base, us)
    pub timestamp_sample: u64,
    /// Time the batch was decoded (scheduler time base, us)
    pub timestamp: u64,
    /// Identifier of the producing device
    pub device_id: u32,
    /// Time between consecutive samples in microseconds
    pub dt: f32,
    /// Factor converting raw counts to SI units
    pub scale: f32,
    /// Raw samples in vehicle frame (x forward, y right, z down)
    pub samples: heapless::Vec<[i16; 3], FIFO_MAX_SAMPLES>,
    /// Accumulated bus, register and FIFO error count
    pub error_count: u32,
    /// Die temperature in °C averaged over the batch
    pub temperature: f32,
}

/// Accelerometer batch
pub type AccelFifo = SensorFifo;

/// Gyroscope batch
pub type GyroFifo = SensorFifo;

impl Default for SensorFifo {
    fn default() -> Self {
        Self {
            timestamp_sample: 0,
            timestamp: 0,
            device_id: 0,
            dt: FIFO_SAMPLE_DT_US,
            scale: 1.0,
            samples: heapless::Vec::new(),
            error_count: 0,
            temperature: f32::NAN,
        }
    }
}

impl SensorFifo {
    /// Number of samples in the batch
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the batch holds no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample `index` converted to SI units
    #[must_use]
    pub fn sample_si(&self, index: usize) -> Option<[f32; 3]> {
        self.samples.get(index).map(|[x, y, z]| {
            [
                f32::from(*x) * self.scale,
                f32::from(*y) * self.scale,
                f32::from(*z) * self.scale,
            ]
        })
    }
}

/// Downstream consumer of finished batches
///
/// Called from the worker context once per successful drain, accelerometer
/// first.
pub trait FifoPublisher {
    /// Publish an accelerometer batch
    fn publish_accel(&mut self, fifo: &AccelFifo);

    /// Publish a gyroscope batch
    fn publish_gyro(&mut self, fifo: &GyroFifo);
}

impl<T: FifoPublisher + ?Sized> FifoPublisher for &mut T {
    fn publish_accel(&mut self, fifo: &AccelFifo) {
        (**self).publish_accel(fifo);
    }

    fn publish_gyro(&mut self, fifo: &GyroFifo) {
        (**self).publish_gyro(fifo);
    }
}
