use crate::frame::{BATCH_SIZE, SAMPLE_RATE};
use std::{
    thread,
    time::{Duration, Instant},
};

/// Wall-clock time covered by one batch of audio. Integer division matches
/// the millisecond resolution the audio timeline is tracked at.
pub const BATCH_PERIOD_MS: u64 = (1000 * BATCH_SIZE / SAMPLE_RATE) as u64;

pub trait Clock {
    /// Milliseconds since some fixed origin.
    fn now_ms(&self) -> u64;

    fn sleep(&mut self, duration: Duration);
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacerState {
    Running,
    Stopping,
    Stopped,
}

/// Keeps the loop in step with audio playback by tracking where on the
/// audio timeline the loop should be and sleeping until wall-clock time
/// catches up. Falling behind is tolerated: the loop never skips batches to
/// catch up, it just lags.
pub struct Pacer {
    state: PacerState,
    start_ms: u64,
    expected_ms: u64,
}

impl Pacer {
    pub fn start<C: Clock>(clock: &C) -> Self {
        Self {
            state: PacerState::Running,
            start_ms: clock.now_ms(),
            expected_ms: 0,
        }
    }

    pub fn state(&self) -> PacerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PacerState::Running
    }

    /// Advance the audio timeline by one batch and sleep until the wall
    /// clock reaches it. Returns the requested sleep, which is zero when
    /// running behind.
    pub fn tick<C: Clock>(&mut self, clock: &mut C) -> Duration {
        self.expected_ms += BATCH_PERIOD_MS;
        let actual_ms = clock.now_ms().saturating_sub(self.start_ms);
        let sleep_ms = self.expected_ms.saturating_sub(actual_ms);
        if actual_ms > self.expected_ms {
            log::trace!(
                "{}ms behind the audio timeline",
                actual_ms - self.expected_ms
            );
        }
        let duration = Duration::from_millis(sleep_ms);
        clock.sleep(duration);
        duration
    }

    pub fn stop(&mut self) {
        if self.state == PacerState::Running {
            self.state = PacerState::Stopping;
        }
    }

    /// Release external resources and enter the final state. `release` runs
    /// at most once no matter how many times this is called.
    pub fn finish<F: FnOnce()>(&mut self, release: F) {
        self.stop();
        if self.state == PacerState::Stopping {
            release();
            self.state = PacerState::Stopped;
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// Clock that only moves when told to, or when slept on.
    #[derive(Default)]
    pub struct ScriptedClock {
        pub now_ms: u64,
        pub sleeps: Vec<Duration>,
        /// Added to the clock after each sleep, simulating the time taken to
        /// process a batch.
        pub work_ms: u64,
    }

    impl Clock for ScriptedClock {
        fn now_ms(&self) -> u64 {
            self.now_ms
        }

        fn sleep(&mut self, duration: Duration) {
            self.sleeps.push(duration);
            self.now_ms += duration.as_millis() as u64 + self.work_ms;
        }
    }

    #[test]
    fn batch_period() {
        assert_eq!(BATCH_PERIOD_MS, 10);
    }

    #[test]
    fn sleeps_for_whole_period_when_work_is_free() {
        let mut clock = ScriptedClock {
            now_ms: 1234,
            ..Default::default()
        };
        let mut pacer = Pacer::start(&clock);
        for _ in 0..5 {
            assert_eq!(
                pacer.tick(&mut clock),
                Duration::from_millis(BATCH_PERIOD_MS)
            );
        }
        assert_eq!(clock.now_ms, 1234 + 5 * BATCH_PERIOD_MS);
    }

    #[test]
    fn sleeps_for_remainder_of_period() {
        let mut clock = ScriptedClock::default();
        let mut pacer = Pacer::start(&clock);
        clock.now_ms += 3;
        assert_eq!(pacer.tick(&mut clock), Duration::from_millis(7));
    }

    #[test]
    fn never_sleeps_negative_or_catches_up() {
        let mut clock = ScriptedClock {
            work_ms: 25,
            ..Default::default()
        };
        let mut pacer = Pacer::start(&clock);
        clock.now_ms += 25;
        let sleeps = (0..4).map(|_| pacer.tick(&mut clock)).collect::<Vec<_>>();
        assert_eq!(sleeps, vec![Duration::ZERO; 4]);
        // one sleep request per tick even when behind
        assert_eq!(clock.sleeps.len(), 4);
    }

    #[test]
    fn state_transitions() {
        let clock = ScriptedClock::default();
        let mut pacer = Pacer::start(&clock);
        assert_eq!(pacer.state(), PacerState::Running);
        pacer.stop();
        assert_eq!(pacer.state(), PacerState::Stopping);
        let mut releases = 0;
        pacer.finish(|| releases += 1);
        pacer.finish(|| releases += 1);
        assert_eq!(pacer.state(), PacerState::Stopped);
        assert_eq!(releases, 1);
    }
}
