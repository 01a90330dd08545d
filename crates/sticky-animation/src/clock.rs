use web_time::Instant;

/// Monotonic frame time source for hosts that drive animations from wall time.
///
/// Animations consume plain nanosecond timestamps, so tests can feed a
/// synthetic timeline instead of using this clock.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Nanoseconds elapsed since the clock was created.
    pub fn frame_time_nanos(&self) -> u64 {
        let elapsed = self.origin.elapsed().as_nanos();
        u64::try_from(elapsed).unwrap_or(u64::MAX)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
