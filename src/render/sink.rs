use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::core::{FrameIndex, Rate},
    foundation::error::{ReelError, ReelResult},
    render::frame::FrameRGBA,
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Number of frames that will be pushed (one per tick).
    pub frames: u64,
    /// Elapsed route time between two frames.
    pub rate: Rate,
}

/// Sink contract for consuming rendered frames in tick order.
///
/// Ordering contract: `push_frame` is called exactly once per tick, in strictly increasing
/// `FrameIndex` order starting at 0, including ticks where the map did not change.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ReelResult<()>;
}

/// Holds every tick's frame in memory, e.g. to check a render without touching disk.
///
/// Each `begin` starts a fresh capture.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// An empty sink; nothing is captured until `begin`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick count and rate announced by the renderer, once `begin` ran.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// `(tick, frame)` pairs as they were pushed.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// The frame pushed for tick `idx`.
    pub fn frame(&self, idx: FrameIndex) -> Option<&FrameRGBA> {
        self.frames
            .iter()
            .find_map(|(i, f)| (*i == idx).then_some(f))
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// The render ended and delivered exactly the announced number of ticks.
    pub fn is_complete(&self) -> bool {
        self.ended
            && self
                .cfg
                .is_some_and(|cfg| cfg.frames == self.frames.len() as u64)
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        *self = Self {
            cfg: Some(cfg),
            ..Self::default()
        };
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes every frame as `<dir>/<zero-padded index>.png`.
#[derive(Debug)]
pub struct PngDirSink {
    dir: PathBuf,
    digits: usize,
    last_idx: Option<FrameIndex>,
    written: u64,
}

impl PngDirSink {
    /// Frame files go into `dir`, which is created on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            digits: 4,
            last_idx: None,
            written: 0,
        }
    }

    /// Minimum number of digits in frame file names (default 4).
    pub fn with_digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file written for `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(idx.file_name(self.digits, "png"))
    }

    /// Frames written since the last `begin`.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngDirSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        self.last_idx = None;
        self.written = 0;
        tracing::debug!(dir = %self.dir.display(), frames = cfg.frames, "png sink ready");
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(ReelError::render(format!(
                "frames must be pushed in increasing order (got {} after {})",
                idx.0, last.0
            )));
        }
        frame.validate()?;

        let path = self.frame_path(idx);
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;

        self.last_idx = Some(idx);
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        tracing::info!(dir = %self.dir.display(), frames = self.written, "wrote frames");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;
