//! Raw input events
//!
//! An observation records one trigger of the detection grid: when it fired
//! and where. Observations are immutable once created; the engine only ever
//! reads them through the bucketing function.

use std::fmt;

/// Sentinel timestamp marking the end of an observation stream.
pub const END_OF_STREAM: i64 = i64::MAX;

/// One detected event: a timestamp plus a location on the detection grid
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    /// Milliseconds since the detector was switched on
    pub time: i64,

    /// Horizontal location of the event
    pub x: f64,

    /// Vertical location of the event
    pub y: f64,
}

impl Observation {
    /// Create an observation at `(x, y)` recorded at `time`.
    pub fn new(time: i64, x: f64, y: f64) -> Self {
        Self { time, x, y }
    }

    /// Create the end-of-stream sentinel.
    pub fn end_of_stream() -> Self {
        Self {
            time: END_OF_STREAM,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Check whether this observation is the end-of-stream sentinel.
    #[inline]
    pub fn is_end_of_stream(&self) -> bool {
        self.time == END_OF_STREAM
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Observation({}, {}, {})", self.time, self.x, self.y)
    }
}
