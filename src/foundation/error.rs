/// Convenience result type used across spritecap.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Error taxonomy for the capture pipeline.
///
/// Only [`CaptureError::Precondition`] and [`CaptureError::Concurrency`] abort a run at entry.
/// Everything else is isolated to the frame or angle that produced it.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    /// Invalid settings or plan values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing model, clip or action before (or during) a capture.
    #[error("precondition error: {0}")]
    Precondition(String),

    /// A capture run is already in progress.
    #[error("concurrency error: {0}")]
    Concurrency(String),

    /// A frame bitmap failed to materialize.
    #[error("decode error: {0}")]
    Decode(String),

    /// A render or decode wait did not complete in time.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The render device reported a failure.
    #[error("render error: {0}")]
    Render(String),

    /// A whole angle's pipeline failed.
    #[error("angle '{label}' capture failed: {source}")]
    AngleCapture {
        /// Label of the failed angle.
        label: String,
        /// Underlying failure.
        #[source]
        source: Box<CaptureError>,
    },

    /// No frames were collected for an angle, or the atlas could not be produced.
    #[error("composition error: {0}")]
    Composition(String),

    /// The run was cancelled through its cancel token.
    #[error("capture cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptureError {
    /// Build a [`CaptureError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CaptureError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`CaptureError::Concurrency`] value.
    pub fn concurrency(msg: impl Into<String>) -> Self {
        Self::Concurrency(msg.into())
    }

    /// Build a [`CaptureError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CaptureError::Timeout`] value.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Build a [`CaptureError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CaptureError::Composition`] value.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    /// Wrap `source` as the failure of the angle labelled `label`.
    pub fn angle(label: impl Into<String>, source: CaptureError) -> Self {
        Self::AngleCapture {
            label: label.into(),
            source: Box::new(source),
        }
    }

    /// `true` when the error only invalidates the frame being sampled.
    pub fn is_frame_local(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
