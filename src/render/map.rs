use std::time::Duration;

use anyhow::Context;
use reqwest::Url;

use crate::{
    foundation::error::{ReelError, ReelResult},
    route::waypoint::Waypoint,
};

/// What to draw: a map centered on a position with one marker icon.
#[derive(Clone, Debug, PartialEq)]
pub struct MapRequest {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Marker icon reference.
    pub icon_ref: String,
}

impl MapRequest {
    /// Request for the position and icon of `wp`.
    pub fn for_waypoint(wp: &Waypoint) -> Self {
        Self {
            latitude: wp.latitude,
            longitude: wp.longitude,
            icon_ref: wp.icon_ref.clone(),
        }
    }

    pub(crate) fn key(&self) -> MapKey {
        MapKey {
            latitude: self.latitude.to_bits(),
            longitude: self.longitude.to_bits(),
            icon_ref: self.icon_ref.clone(),
        }
    }
}

/// Hashable identity of a [`MapRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct MapKey {
    latitude: u64,
    longitude: u64,
    icon_ref: String,
}

/// Produces encoded map images (PNG, JPEG, ...) for a request.
pub trait MapSource {
    /// Fetch or draw the image for `req`.
    fn fetch(&mut self, req: &MapRequest) -> ReelResult<Vec<u8>>;
}

impl<M: MapSource + ?Sized> MapSource for &mut M {
    fn fetch(&mut self, req: &MapRequest) -> ReelResult<Vec<u8>> {
        (**self).fetch(req)
    }
}

/// Options for [`StaticMapClient`].
#[derive(Clone, Debug)]
pub struct StaticMapOpts {
    /// Static map endpoint.
    pub endpoint: String,
    /// API key sent as the `key` query parameter. Omitted when empty.
    pub api_key: String,
    /// Zoom level.
    pub zoom: u8,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for StaticMapOpts {
    fn default() -> Self {
        Self {
            endpoint: "https://maps.googleapis.com/maps/api/staticmap".to_owned(),
            api_key: String::new(),
            zoom: 17,
            width: 400,
            height: 400,
            timeout: Duration::from_secs(30),
        }
    }
}

impl StaticMapOpts {
    /// Default options with `api_key` set.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

/// Blocking HTTP client for a Google-style static map API.
///
/// One `GET` per [`MapSource::fetch`]; failures are returned as [`ReelError::Fetch`] without
/// retrying.
pub struct StaticMapClient {
    opts: StaticMapOpts,
    endpoint: Url,
    client: reqwest::blocking::Client,
}

impl StaticMapClient {
    /// Validate `opts` and build the HTTP client.
    pub fn new(opts: StaticMapOpts) -> ReelResult<Self> {
        if opts.width == 0 || opts.height == 0 {
            return Err(ReelError::invalid_input(
                "static map width/height must be non-zero",
            ));
        }
        let endpoint = Url::parse(&opts.endpoint).map_err(|e| {
            ReelError::invalid_input(format!("bad static map endpoint '{}': {e}", opts.endpoint))
        })?;
        let client = reqwest::blocking::Client::builder()
            .timeout(opts.timeout)
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            opts,
            endpoint,
            client,
        })
    }

    /// Options this client was built with.
    pub fn opts(&self) -> &StaticMapOpts {
        &self.opts
    }

    /// Full request URL for `req`, including the API key.
    pub fn request_url(&self, req: &MapRequest) -> Url {
        let center = format!("{},{}", req.latitude, req.longitude);
        let markers = if req.icon_ref.is_empty() {
            center.clone()
        } else {
            format!("icon:{}|{center}", req.icon_ref)
        };

        let mut url = self.endpoint.clone();
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("center", &center)
                .append_pair("zoom", &self.opts.zoom.to_string())
                .append_pair(
                    "size",
                    &format!("{}x{}", self.opts.width, self.opts.height),
                );
            if !self.opts.api_key.is_empty() {
                q.append_pair("key", &self.opts.api_key);
            }
            q.append_pair("markers", &markers);
        }
        url
    }
}

impl MapSource for StaticMapClient {
    #[tracing::instrument(skip(self, req), fields(lat = req.latitude, lon = req.longitude))]
    fn fetch(&mut self, req: &MapRequest) -> ReelResult<Vec<u8>> {
        let url = self.request_url(req);
        // Errors carry the URL, which carries the key.
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ReelError::fetch(format!("static map request: {}", e.without_url())))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ReelError::fetch(format!(
                "static map request returned {status}"
            )));
        }
        let bytes = resp
            .bytes()
            .map_err(|e| ReelError::fetch(format!("read static map body: {}", e.without_url())))?;
        tracing::debug!(bytes = bytes.len(), "fetched static map");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/map.rs"]
mod tests;
