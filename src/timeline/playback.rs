use std::iter::FusedIterator;

use chrono::TimeDelta;

use crate::{
    foundation::core::{FrameIndex, Rate},
    foundation::error::{ReelError, ReelResult},
    timeline::event::{Event, Sample},
};

/// Resamples a sorted event sequence onto the fixed-rate tick grid
/// `0, rate, 2*rate, ... <= duration`.
///
/// Usage is `new` -> [`import`](Self::import) -> [`play`](Self::play). `play` consumes the
/// timeline, so replaying requires building (and importing into) a fresh one.
#[derive(Clone, Debug)]
pub struct EventTimeline<T> {
    rate: Rate,
    duration: TimeDelta,
    ticks: u64,
    events: Vec<Event<T>>,
}

impl<T> EventTimeline<T> {
    /// Create an empty timeline covering `[0, duration]`.
    pub fn new(rate: Rate, duration: TimeDelta) -> ReelResult<Self> {
        let ticks = rate.tick_count(duration)?;
        Ok(Self {
            rate,
            duration,
            ticks,
            events: Vec::new(),
        })
    }

    /// Replace the event sequence.
    ///
    /// Events must be non-empty, have non-negative offsets and be sorted ascending by offset.
    /// Unsorted input is rejected rather than re-sorted, so the caller's order is the order
    /// in which events become current.
    pub fn import(&mut self, events: Vec<Event<T>>) -> ReelResult<()> {
        validate_events(&events)?;
        self.events = events;
        Ok(())
    }

    /// Sampling interval.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Covered duration.
    pub fn duration(&self) -> TimeDelta {
        self.duration
    }

    /// Number of samples [`play`](Self::play) will produce.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Imported events, in offset order.
    pub fn events(&self) -> &[Event<T>] {
        &self.events
    }

    /// Start playback. The first event is current from tick 0.
    pub fn play(self) -> ReelResult<Playback<T>> {
        if self.events.is_empty() {
            return Err(ReelError::invalid_input(
                "event timeline has no imported events",
            ));
        }
        Ok(Playback {
            rate: self.rate,
            ticks: self.ticks,
            events: self.events,
            current: 0,
            next_tick: 0,
        })
    }
}

fn validate_events<T>(events: &[Event<T>]) -> ReelResult<()> {
    if events.is_empty() {
        return Err(ReelError::invalid_input("event sequence must be non-empty"));
    }
    if let Some((i, e)) = events
        .iter()
        .enumerate()
        .find(|(_, e)| e.offset < TimeDelta::zero())
    {
        return Err(ReelError::malformed_events(format!(
            "event {i} has negative offset {}",
            e.offset
        )));
    }
    for (i, pair) in events.windows(2).enumerate() {
        if pair[0].offset > pair[1].offset {
            return Err(ReelError::malformed_events(format!(
                "event {} at {} comes after event {} at {}",
                i,
                pair[0].offset,
                i + 1,
                pair[1].offset
            )));
        }
    }
    Ok(())
}

/// Lazy, finite, non-restartable sequence of [`Sample`]s.
///
/// Events live in an immutable arena; `current` is a cursor into it. Everything before the
/// cursor stays inspectable through [`activated`](Self::activated) while iterating.
///
/// At tick `t` the next pending event becomes current only if `t > offset` (strict), and at
/// most one event is promoted per tick. Once no events are pending every remaining tick
/// holds the last event with `became_active = false`.
#[derive(Clone, Debug)]
pub struct Playback<T> {
    rate: Rate,
    ticks: u64,
    events: Vec<Event<T>>,
    current: usize,
    next_tick: u64,
}

impl<T> Playback<T> {
    /// The event that is current as of the last produced sample.
    pub fn current(&self) -> &Event<T> {
        &self.events[self.current]
    }

    /// Events that have been current so far, in activation order (including the current one).
    pub fn activated(&self) -> &[Event<T>] {
        &self.events[..=self.current]
    }

    /// Events that have not become current yet.
    pub fn pending(&self) -> &[Event<T>] {
        &self.events[self.current + 1..]
    }

    /// Samples still to be produced.
    pub fn remaining_ticks(&self) -> u64 {
        self.ticks - self.next_tick
    }

    /// Sampling interval.
    pub fn rate(&self) -> Rate {
        self.rate
    }
}

impl<T: Clone> Iterator for Playback<T> {
    type Item = Sample<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_tick >= self.ticks {
            return None;
        }
        let k = self.next_tick;
        self.next_tick += 1;
        let at = self.rate.tick_at(k);

        let mut became_active = k == 0;
        if let Some(front) = self.events.get(self.current + 1)
            && at > front.offset
        {
            self.current += 1;
            became_active = true;
        }

        Some(Sample {
            index: FrameIndex(k),
            at,
            payload: self.events[self.current].payload.clone(),
            became_active,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining_ticks()).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl<T: Clone> ExactSizeIterator for Playback<T> {}

impl<T: Clone> FusedIterator for Playback<T> {}

#[cfg(test)]
#[path = "../../tests/unit/timeline/playback.rs"]
mod tests;
