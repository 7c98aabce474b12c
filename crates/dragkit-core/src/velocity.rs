#![forbid(unsafe_code)]

//! Pointer velocity estimation over a short sample window.
//!
//! [`VelocityRing`] keeps the last few timestamped pointer positions in a
//! fixed array and reports the average velocity across the span from the
//! oldest to the newest sample. Averaging over several samples smooths out
//! per-event jitter without allocating per sample.

use crate::geometry::Point;

/// Number of samples kept by default.
pub const DEFAULT_HISTORY: usize = 5;

/// A pointer position at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocitySample {
    pub point: Point,
    /// Seconds since an arbitrary fixed epoch (usually the drag start).
    pub time_secs: f64,
}

impl VelocitySample {
    /// Create a sample.
    #[must_use]
    pub const fn new(point: Point, time_secs: f64) -> Self {
        Self { point, time_secs }
    }
}

/// Bounded ring of the most recent `N` samples.
#[derive(Debug, Clone)]
pub struct VelocityRing<const N: usize = DEFAULT_HISTORY> {
    samples: [VelocitySample; N],
    /// Index of the oldest sample.
    head: usize,
    len: usize,
}

impl<const N: usize> Default for VelocityRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> VelocityRing<N> {
    /// Create an empty ring. Fails to compile for `N == 0`.
    #[must_use]
    pub const fn new() -> Self {
        const { assert!(N > 0, "velocity ring needs at least one slot") };
        Self {
            samples: [VelocitySample {
                point: Point::ZERO,
                time_secs: 0.0,
            }; N],
            head: 0,
            len: 0,
        }
    }

    /// Drop all samples and start over from `sample`.
    pub fn reset(&mut self, sample: VelocitySample) {
        self.samples[0] = sample;
        self.head = 0;
        self.len = 1;
    }

    /// Append a sample, evicting the oldest once full.
    pub fn push(&mut self, sample: VelocitySample) {
        if self.len < N {
            self.samples[(self.head + self.len) % N] = sample;
            self.len += 1;
        } else {
            self.samples[self.head] = sample;
            self.head = (self.head + 1) % N;
        }
    }

    /// Number of samples held.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the ring holds no samples.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The oldest retained sample.
    #[must_use]
    pub fn oldest(&self) -> Option<VelocitySample> {
        (self.len > 0).then(|| self.samples[self.head])
    }

    /// The most recent sample.
    #[must_use]
    pub fn newest(&self) -> Option<VelocitySample> {
        (self.len > 0).then(|| self.samples[(self.head + self.len - 1) % N])
    }

    /// Average velocity from the oldest to the newest sample, in units/s.
    ///
    /// Zero when fewer than two samples span a positive time.
    #[must_use]
    pub fn velocity(&self) -> Point {
        let (Some(oldest), Some(newest)) = (self.oldest(), self.newest()) else {
            return Point::ZERO;
        };
        let dt = newest.time_secs - oldest.time_secs;
        if !dt.is_finite() || dt <= 0.0 {
            return Point::ZERO;
        }
        let delta = newest.point - oldest.point;
        let velocity = Point::new(delta.x / dt, delta.y / dt);
        if velocity.is_finite() {
            velocity
        } else {
            Point::ZERO
        }
    }

    /// Velocity as seen at `now_secs`: zero if the newest sample is older
    /// than `stale_after_secs`, i.e. the pointer stopped before this moment.
    #[must_use]
    pub fn velocity_at(&self, now_secs: f64, stale_after_secs: f64) -> Point {
        match self.newest() {
            Some(newest) if now_secs - newest.time_secs <= stale_after_secs => self.velocity(),
            _ => Point::ZERO,
        }
    }
}
