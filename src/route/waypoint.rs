use chrono::{DateTime, Utc};

/// One recorded position of a route.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Waypoint {
    /// When the position was recorded.
    pub timestamp: DateTime<Utc>,
    /// Icon (marker style) reference, usually a URL.
    pub icon_ref: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Waypoint {
    /// Build a waypoint.
    pub fn new(
        timestamp: DateTime<Utc>,
        icon_ref: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            timestamp,
            icon_ref: icon_ref.into(),
            latitude,
            longitude,
        }
    }
}
