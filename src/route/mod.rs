//! Recorded routes and their projection onto a timeline.

pub(crate) mod model;
pub(crate) mod waypoint;
