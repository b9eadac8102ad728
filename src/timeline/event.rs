use chrono::TimeDelta;

use crate::foundation::core::{FrameIndex, secs_f64};

/// A payload scheduled at an offset from the start of a timeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event<T> {
    /// Position on the timeline, measured from its start. Never negative.
    pub offset: TimeDelta,
    /// Data carried by the event.
    pub payload: T,
}

impl<T> Event<T> {
    /// Schedule `payload` at `offset`.
    pub fn new(offset: TimeDelta, payload: T) -> Self {
        Self { offset, payload }
    }
}

/// The timeline state observed at one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample<T> {
    /// Tick index (also the output frame index).
    pub index: FrameIndex,
    /// Tick offset from the start of the timeline (`index * rate`).
    pub at: TimeDelta,
    /// Payload of the event that is current at this tick.
    pub payload: T,
    /// `true` only on the tick where `payload` became the current event.
    pub became_active: bool,
}

impl<T> Sample<T> {
    /// [`at`](Self::at) in seconds.
    pub fn at_secs(&self) -> f64 {
        secs_f64(self.at)
    }
}
