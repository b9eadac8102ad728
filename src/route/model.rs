use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    foundation::core::{Rate, duration_nanos, secs_f64},
    foundation::error::{ReelError, ReelResult},
    route::waypoint::Waypoint,
    timeline::event::Event,
    timeline::playback::{EventTimeline, Playback},
    track,
};

/// A recorded route: a non-empty, timestamp-sorted waypoint set.
///
/// Immutable after construction. [`Route::play`] can be called any number of times; each call
/// builds a fresh [`EventTimeline`].
#[derive(Clone, Debug)]
pub struct Route {
    waypoints: Vec<Waypoint>,
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
    duration: TimeDelta,
}

impl Route {
    /// Build a route from waypoints in any order.
    ///
    /// Waypoints are stable-sorted by timestamp, so equal timestamps keep their input order.
    #[tracing::instrument(skip(waypoints), fields(count = waypoints.len()))]
    pub fn new(mut waypoints: Vec<Waypoint>) -> ReelResult<Self> {
        waypoints.sort_by_key(|w| w.timestamp);
        let (Some(first), Some(last)) = (waypoints.first(), waypoints.last()) else {
            return Err(ReelError::invalid_input(
                "route needs at least one waypoint",
            ));
        };
        let (start, stop) = (first.timestamp, last.timestamp);

        let duration = stop - start;
        duration_nanos(duration)?;
        tracing::debug!(%start, %stop, %duration, "route built");

        Ok(Self {
            waypoints,
            start,
            stop,
            duration,
        })
    }

    /// Load a route from a KML or JSON track, chosen by file extension.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        Self::new(track::read_waypoints_path(path)?)
    }

    /// Load a route from a KML file.
    pub fn from_kml_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        Self::new(track::kml::read_kml_path(path)?)
    }

    /// Load a route from a JSON waypoint list.
    pub fn from_json_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        Self::new(track::json::read_waypoints_json_path(path)?)
    }

    /// Earliest waypoint timestamp.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Latest waypoint timestamp.
    pub fn stop(&self) -> DateTime<Utc> {
        self.stop
    }

    /// `stop - start`.
    pub fn duration(&self) -> TimeDelta {
        self.duration
    }

    /// Waypoints sorted by timestamp.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of waypoints (always at least one).
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// One event per waypoint, offset from [`Route::start`].
    pub fn events(&self) -> Vec<Event<&Waypoint>> {
        self.waypoints
            .iter()
            .map(|w| Event::new(w.timestamp - self.start, w))
            .collect()
    }

    /// Number of samples [`Route::play`] produces at `rate`.
    pub fn tick_count(&self, rate: Rate) -> ReelResult<u64> {
        rate.tick_count(self.duration)
    }

    /// Resample the route onto the tick grid `0, rate, 2*rate, ... <= duration`.
    pub fn play(&self, rate: Rate) -> ReelResult<Playback<&Waypoint>> {
        let mut timeline = EventTimeline::new(rate, self.duration)?;
        timeline.import(self.events())?;
        timeline.play()
    }

    /// Serializable overview of the route.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            waypoints: self.waypoints.len(),
            start: self.start,
            stop: self.stop,
            duration_secs: secs_f64(self.duration),
        }
    }
}

/// Overview printed by `routereel inspect`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RouteSummary {
    /// Number of waypoints.
    pub waypoints: usize,
    /// Earliest timestamp.
    pub start: DateTime<Utc>,
    /// Latest timestamp.
    pub stop: DateTime<Utc>,
    /// Route duration in seconds.
    pub duration_secs: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/route/model.rs"]
mod tests;
