use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::error::{ReelError, ReelResult},
    route::waypoint::Waypoint,
};

/// Parse a JSON array of waypoints.
pub fn read_waypoints_json<R: Read>(r: R) -> ReelResult<Vec<Waypoint>> {
    serde_json::from_reader(r).map_err(|e| ReelError::parse(format!("parse waypoint JSON: {e}")))
}

/// Parse a JSON waypoint file on disk.
pub fn read_waypoints_json_path(path: impl AsRef<Path>) -> ReelResult<Vec<Waypoint>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open waypoint JSON '{}'", path.display()))?;
    read_waypoints_json(BufReader::new(f))
}

/// Write waypoints as a pretty-printed JSON array.
pub fn write_waypoints_json<W: Write>(w: W, waypoints: &[Waypoint]) -> ReelResult<()> {
    let mut w = BufWriter::new(w);
    serde_json::to_writer_pretty(&mut w, waypoints).context("serialize waypoint JSON")?;
    w.flush().context("flush waypoint JSON")?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/track/json.rs"]
mod tests;
