/// Convenience result type used across routereel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy.
///
/// The timeline and route core only produce [`ReelError::InvalidInput`] and
/// [`ReelError::MalformedEventSequence`], and only at construction time. Once a
/// [`crate::Playback`] exists, iterating it cannot fail.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid caller-provided input (empty waypoint set, non-positive rate, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Events handed to an [`crate::EventTimeline`] are not sorted by offset.
    #[error("malformed event sequence: {0}")]
    MalformedEventSequence(String),

    /// A track file could not be parsed into waypoints.
    #[error("parse error: {0}")]
    Parse(String),

    /// A map image could not be fetched.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Frame decoding or sink contract errors.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`ReelError::MalformedEventSequence`] value.
    pub fn malformed_events(msg: impl Into<String>) -> Self {
        Self::MalformedEventSequence(msg.into())
    }

    /// Build a [`ReelError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`ReelError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`ReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
