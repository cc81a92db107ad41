//! Playback pacing.
//!
//! Simulated time is independent of wall clock time. Sessions only pause
//! between steps so that a live display can follow. A zero period or
//! [NoPacing] runs as fast as possible without changing any result.

use embedded_hal::delay::DelayNs;

/// Delay provider that returns immediately.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoPacing;

impl DelayNs for NoPacing {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Delay provider that blocks the current thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct ThreadPacing;

impl DelayNs for ThreadPacing {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns.into()))
    }
}

/// Pauses a session for fractions of a playback period.
#[derive(Clone, Debug)]
pub struct Pacer<D> {
    delay: D,
    period_ms: u32,
}

impl Pacer<NoPacing> {
    pub fn headless() -> Self {
        Self::new(NoPacing, 0)
    }
}

impl<D: DelayNs> Pacer<D> {
    /// # Args
    /// * `delay` - Delay provider.
    /// * `period_ms` - Pause after a full simulation step in milliseconds.
    pub fn new(delay: D, period_ms: u32) -> Self {
        Self { delay, period_ms }
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Pause for half a period, after an intermediate step.
    pub fn step(&mut self) {
        if self.period_ms > 1 {
            self.delay.delay_ms(self.period_ms / 2);
        }
    }

    /// Pause for a full period, after simulated time advanced.
    pub fn wait(&mut self) {
        if self.period_ms > 0 {
            self.delay.delay_ms(self.period_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Count(u64);

    impl DelayNs for Count {
        fn delay_ns(&mut self, ns: u32) {
            self.0 += ns as u64;
        }
    }

    #[test]
    fn periods() {
        let mut pacer = Pacer::new(Count::default(), 10);
        pacer.step();
        assert_eq!(pacer.delay.0, 5_000_000);
        pacer.wait();
        assert_eq!(pacer.delay.0, 15_000_000);
    }

    #[test]
    fn headless() {
        let mut pacer = Pacer::new(Count::default(), 0);
        pacer.step();
        pacer.wait();
        assert_eq!(pacer.delay.0, 0);
        Pacer::headless().wait();
    }
}
