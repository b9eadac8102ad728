//! Fixed-rate resampling of offset-tagged event sequences.

pub(crate) mod event;
pub(crate) mod playback;
