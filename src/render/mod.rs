//! Frame rendering: map images per active waypoint, one output frame per tick.

pub(crate) mod frame;
pub(crate) mod map;
pub(crate) mod session;
pub(crate) mod sink;
