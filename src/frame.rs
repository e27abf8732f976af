use instant::Instant;

/// Timing handed to every live task once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Seconds since the clock started, at the start of this frame.
    pub time: f32,
}

impl FrameTime {
    pub fn new(dt: f32, time: f32) -> Self {
        Self { dt, time }
    }

    /// Zero-length frame used to run a freshly issued task up to its first
    /// suspension point.
    pub fn prime(time: f32) -> Self {
        Self { dt: 0.0, time }
    }
}

/// Monotonic frame clock.
///
/// `tick` measures wall time between calls; `step` advances by a fixed delta
/// for deterministic pumping.
#[derive(Debug)]
pub struct FrameClock {
    last_instant: Instant,
    time: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_instant: Instant::now(),
            time: 0.0,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        self.step(dt.as_secs_f32())
    }

    pub fn step(&mut self, dt: f32) -> FrameTime {
        let frame = FrameTime::new(dt, self.time);
        self.time += dt;
        frame
    }
}
