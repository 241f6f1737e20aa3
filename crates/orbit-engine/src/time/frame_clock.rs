use std::time::Instant;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds elapsed since the clock was created or last reset.
    pub ticks: f32,

    /// Seconds elapsed since the previous tick. Not clamped.
    pub dt: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is passed through as measured. Consumers that animate with
/// closed-form functions of `ticks` do not accumulate error across stalls, so
/// a long pause shows up as a single large `dt` instead of being hidden.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock whose baseline is `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last: start,
            frame_index: 0,
        }
    }

    /// Resets the clock baseline; `ticks` restarts from zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last);
        let ticks = now.saturating_duration_since(self.start);
        self.last = now;

        let ft = FrameTime {
            ticks: ticks.as_secs_f32(),
            dt: dt.as_secs_f32(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn ticks_are_seconds_since_start() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let ft = clock.tick_at(start + Duration::from_millis(1500));
        assert!((ft.ticks - 1.5).abs() < 1e-6);
        assert!((ft.dt - 1.5).abs() < 1e-6);
    }

    #[test]
    fn dt_is_not_clamped_after_a_stall() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        clock.tick_at(start + Duration::from_millis(16));
        let ft = clock.tick_at(start + Duration::from_secs(10));
        assert!((ft.dt - 9.984).abs() < 1e-4);
        assert!((ft.ticks - 10.0).abs() < 1e-6);
    }

    #[test]
    fn frame_index_increments() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        assert_eq!(clock.tick_at(start).frame_index, 0);
        assert_eq!(clock.tick_at(start + Duration::from_millis(1)).frame_index, 1);
        assert_eq!(clock.tick_at(start + Duration::from_millis(2)).frame_index, 2);
    }

    #[test]
    fn earlier_instant_saturates_to_zero() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::starting_at(start);

        let ft = clock.tick_at(start - Duration::from_millis(500));
        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.ticks, 0.0);
    }
}
