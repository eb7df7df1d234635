//! Scheduling capability used by the driver
//!
//! The driver never blocks or spins: every wait is expressed as a request to
//! run [`ImuDriver::step`](crate::ImuDriver::step) again later. The platform
//! provides the timer (an RTOS work queue, an embassy task with a ticker, a
//! hardware timer interrupt) by implementing [`Scheduler`].
//!
//! All times are in microseconds on one monotonic time base that is also used
//! for the data-ready latch.

/// Deferred execution of the driver's step function
///
/// Requests replace each other: a new request cancels the previous periodic
/// or one-shot schedule.
pub trait Scheduler {
    /// Current monotonic time in microseconds
    fn now_us(&self) -> u64;

    /// Run once after `delay_us`
    fn schedule_after(&mut self, delay_us: u32);

    /// Run every `interval_us`, first after `phase_us`
    fn schedule_on_interval(&mut self, interval_us: u32, phase_us: u32);

    /// Run as soon as possible
    fn schedule_now(&mut self);

    /// Drop every pending schedule
    fn cancel_all(&mut self);
}

impl<T: Scheduler + ?Sized> Scheduler for &mut T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }

    fn schedule_after(&mut self, delay_us: u32) {
        (**self).schedule_after(delay_us);
    }

    fn schedule_on_interval(&mut self, interval_us: u32, phase_us: u32) {
        (**self).schedule_on_interval(interval_us, phase_us);
    }

    fn schedule_now(&mut self) {
        (**self).schedule_now();
    }

    fn cancel_all(&mut self) {
        (**self).cancel_all();
    }
}
