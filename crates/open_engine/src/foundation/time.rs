//! Time management utilities

use std::time::{Duration, Instant};

/// Number of frames averaged by [`FrameTimeEstimator`]
pub const FRAME_WINDOW: usize = 10;

/// Frame duration (milliseconds) assumed before any frame has been measured
pub const DEFAULT_FRAME_ESTIMATE_MS: u32 = 50;

/// High-precision timer for frame timing
#[derive(Debug, Clone)]
pub struct Timer {
    last_frame: Instant,
    delta: Duration,
    total: Duration,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            total: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Restart measuring from now without counting a frame
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now.duration_since(self.last_frame);
        self.total += self.delta;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Instant of the last update (or creation)
    pub fn last_frame(&self) -> Instant {
        self.last_frame
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the time since the last frame in whole milliseconds
    pub fn delta_millis(&self) -> u32 {
        u32::try_from(self.delta.as_millis()).unwrap_or(u32::MAX)
    }

    /// Get the total elapsed time in seconds since timer creation
    pub fn total_time(&self) -> f32 {
        self.total.as_secs_f32()
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Rolling average of the last [`FRAME_WINDOW`] frame durations
///
/// The ring buffer starts filled with a seed value so the first estimates are
/// usable before any frame has been measured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTimeEstimator {
    samples: [u32; FRAME_WINDOW],
    index: usize,
}

impl Default for FrameTimeEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_ESTIMATE_MS)
    }
}

impl FrameTimeEstimator {
    /// Create an estimator with every slot set to `seed_ms`
    pub fn new(seed_ms: u32) -> Self {
        Self {
            samples: [seed_ms; FRAME_WINDOW],
            index: 0,
        }
    }

    /// Integer average of the window in milliseconds
    pub fn approx(&self) -> u32 {
        let sum: u64 = self.samples.iter().map(|&s| u64::from(s)).sum();
        // The average of u32 samples always fits in u32
        u32::try_from(sum / FRAME_WINDOW as u64).unwrap_or(u32::MAX)
    }

    /// Store a measured frame duration, overwriting the oldest slot
    pub fn record(&mut self, millis: u32) {
        self.samples[self.index] = millis;
        self.index = (self.index + 1) % FRAME_WINDOW;
    }

    /// Refill the window with `seed_ms`
    pub fn reset(&mut self, seed_ms: u32) {
        *self = Self::new(seed_ms);
    }
}
