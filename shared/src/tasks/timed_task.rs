use crate::{tasks::easing::Easing, tick_diff, Tick};

/// Work that completes a fixed number of ticks after it starts.
#[derive(Clone, Debug)]
pub struct TimedTask<T> {
    pub start: Tick,
    pub duration: u16,
    pub easing: Easing,
    pub payload: T,
}

impl<T> TimedTask<T> {
    /// Longest duration whose completion is still visible through the
    /// wrapping tick counter. Longer durations are clamped to it.
    pub const MAX_DURATION: u16 = i16::MAX as u16;

    pub fn new(start: Tick, duration: u16, easing: Easing, payload: T) -> Self {
        Self {
            start,
            duration: duration.min(Self::MAX_DURATION),
            easing,
            payload,
        }
    }

    fn elapsed(&self, now: Tick) -> u16 {
        tick_diff(self.start, now).max(0) as u16
    }

    /// Eased progress at `now`, in `[0, 1]`.
    pub fn progress(&self, now: Tick) -> f32 {
        if self.duration == 0 {
            return 1.0;
        }
        let linear = f32::from(self.elapsed(now)) / f32::from(self.duration);
        self.easing.apply(linear)
    }

    pub fn is_complete(&self, now: Tick) -> bool {
        self.elapsed(now) >= self.duration
    }
}
