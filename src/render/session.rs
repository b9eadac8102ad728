use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    foundation::core::{FrameIndex, Rate},
    foundation::error::{ReelError, ReelResult},
    render::frame::{FrameRGBA, decode_frame},
    render::map::{MapKey, MapRequest, MapSource},
    render::sink::{FrameSink, SinkConfig},
    route::model::Route,
    route::waypoint::Waypoint,
};

/// Options for [`RouteRenderer`].
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Reuse an already fetched image when a newly active waypoint has the same position and
    /// icon, instead of fetching it again.
    pub reuse_fetched: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            reuse_fetched: true,
        }
    }
}

/// Counters from one [`RouteRenderer::render`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Frames pushed to the sink (one per tick).
    pub frames: u64,
    /// Images requested from the map source.
    pub fetches: u64,
    /// Activations served from previously fetched images.
    pub reused: u64,
}

/// Turns a route into frames: one frame per tick, a new map image whenever the active
/// waypoint changes, and the previous image repeated otherwise.
pub struct RouteRenderer<M> {
    source: M,
    opts: RenderOpts,
    fetched: HashMap<MapKey, Arc<FrameRGBA>>,
}

impl<M: MapSource> RouteRenderer<M> {
    /// Render with images from `source`.
    pub fn new(source: M, opts: RenderOpts) -> Self {
        Self {
            source,
            opts,
            fetched: HashMap::new(),
        }
    }

    /// The map source.
    pub fn source(&self) -> &M {
        &self.source
    }

    /// Consume the renderer and return its map source.
    pub fn into_source(self) -> M {
        self.source
    }

    /// Render every tick of `route` at `rate` into `sink`.
    ///
    /// Frame `i` of the sink corresponds to elapsed route time `i * rate`.
    ///
    /// A failed fetch or push stops the render at that tick and returns the error without
    /// calling `sink.end()`; frames already pushed stay in the sink.
    #[tracing::instrument(skip_all, fields(waypoints = route.waypoint_count(), %rate))]
    pub fn render(
        &mut self,
        route: &Route,
        rate: Rate,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<RenderStats> {
        let playback = route.play(rate)?;
        sink.begin(SinkConfig {
            frames: route.tick_count(rate)?,
            rate,
        })?;

        let mut stats = RenderStats::default();
        let mut shown: Option<Arc<FrameRGBA>> = None;
        for sample in playback {
            let idx = sample.index;
            let frame = match shown.take() {
                Some(frame) if !sample.became_active => frame,
                _ => self
                    .frame_for(sample.payload, &mut stats)
                    .inspect_err(|e| render_stopped(idx, e))?,
            };
            sink.push_frame(idx, &frame).inspect_err(|e| render_stopped(idx, e))?;
            stats.frames += 1;
            shown = Some(frame);
        }

        sink.end()?;
        tracing::info!(
            frames = stats.frames,
            fetches = stats.fetches,
            reused = stats.reused,
            "route rendered"
        );
        Ok(stats)
    }

    fn frame_for(
        &mut self,
        wp: &Waypoint,
        stats: &mut RenderStats,
    ) -> ReelResult<Arc<FrameRGBA>> {
        let req = MapRequest::for_waypoint(wp);
        let key = req.key();
        if self.opts.reuse_fetched
            && let Some(frame) = self.fetched.get(&key)
        {
            tracing::debug!(lat = req.latitude, lon = req.longitude, "reusing map image");
            stats.reused += 1;
            return Ok(Arc::clone(frame));
        }

        let bytes = self.source.fetch(&req)?;
        stats.fetches += 1;
        let frame = Arc::new(decode_frame(&bytes)?);
        if self.opts.reuse_fetched {
            self.fetched.insert(key, Arc::clone(&frame));
        }
        Ok(frame)
    }
}

fn render_stopped(idx: FrameIndex, err: &ReelError) {
    tracing::warn!(frame = idx.0, error = %err, "render stopped");
}

#[cfg(test)]
#[path = "../../tests/unit/render/session.rs"]
mod tests;
