//! Timer abstraction providing the pacing delays of the emulator and the
//! monotonic clock the scheduler and the odometer integrate over.

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait DimTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
    /// Monotonic time since an arbitrary origin, in milliseconds.
    fn now_ms(&self) -> u64;
}
