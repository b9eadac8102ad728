//! Track readers that turn recorded routes into [`Waypoint`] sets.

use std::path::Path;

use crate::{
    foundation::error::{ReelError, ReelResult},
    route::waypoint::Waypoint,
};

pub(crate) mod json;
pub(crate) mod kml;

/// Read waypoints from a `.kml` or `.json` file.
pub fn read_waypoints_path(path: impl AsRef<Path>) -> ReelResult<Vec<Waypoint>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("kml") => kml::read_kml_path(path),
        Some("json") => json::read_waypoints_json_path(path),
        _ => Err(ReelError::parse(format!(
            "unsupported track format '{}' (expected .kml or .json)",
            path.display()
        ))),
    }
}
