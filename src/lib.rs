//! routereel turns a recorded route into a frame-per-tick map animation.
//!
//! # Pipeline overview
//!
//! 1. **Load**: a KML or JSON track becomes a set of [`Waypoint`]s
//! 2. **Route**: [`Route::new`] sorts them and derives start, stop and duration
//! 3. **Resample**: [`Route::play`] maps the waypoints onto the tick grid
//!    `0, rate, 2*rate, ... <= duration` and yields one [`Sample`] per tick
//! 4. **Render** (optional): [`RouteRenderer`] fetches a map image from a [`MapSource`] whenever
//!    the active waypoint changes and pushes one frame per tick into a [`FrameSink`]
//!
//! Steps 2 and 3 are pure: no IO, no ambient state, and no errors once a [`Playback`] exists.
//!
//! ```
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use routereel::{Rate, Route, Waypoint};
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
//! let route = Route::new(vec![
//!     Waypoint::new(t0, "walk.png", 35.69, 139.70),
//!     Waypoint::new(t0 + TimeDelta::seconds(2), "train.png", 35.68, 139.77),
//!     Waypoint::new(t0 + TimeDelta::seconds(4), "bus.png", 35.66, 139.75),
//! ])
//! .unwrap();
//!
//! let icons: Vec<(&str, bool)> = route
//!     .play(Rate::ONE_SECOND)
//!     .unwrap()
//!     .map(|s| (s.payload.icon_ref.as_str(), s.became_active))
//!     .collect();
//! // A waypoint becomes current on the first tick strictly after its offset, so the
//! // waypoint at 4s (the last tick) is never shown.
//! assert_eq!(
//!     icons,
//!     [
//!         ("walk.png", true),
//!         ("walk.png", false),
//!         ("walk.png", false),
//!         ("train.png", true),
//!         ("train.png", false),
//!     ]
//! );
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod render;
mod route;
mod timeline;

/// Track readers (KML, JSON).
pub mod track;

pub use foundation::core::{FrameIndex, Rate};
pub use foundation::error::{ReelError, ReelResult};
pub use render::frame::{FrameRGBA, decode_frame};
pub use render::map::{MapRequest, MapSource, StaticMapClient, StaticMapOpts};
pub use render::session::{RenderOpts, RenderStats, RouteRenderer};
pub use render::sink::{FrameSink, InMemorySink, PngDirSink, SinkConfig};
pub use route::model::{Route, RouteSummary};
pub use route::waypoint::Waypoint;
pub use timeline::event::{Event, Sample};
pub use timeline::playback::{EventTimeline, Playback};
pub use track::json::{read_waypoints_json, read_waypoints_json_path, write_waypoints_json};
pub use track::kml::{parse_kml, read_kml_path};
pub use track::read_waypoints_path;
