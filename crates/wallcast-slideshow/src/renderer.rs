use async_trait::async_trait;
use thiserror::Error;

use wallcast_core::Record;

/// Errors surfaced by a display backend.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render failed: {0}")]
    Failed(String),
}

/// Display backend for the wall.
///
/// Implementations must be `Send + Sync` so the slideshow can hold them
/// across await points. A render failure is logged and skipped by the
/// caller; one bad record must not stop the rotation.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Put a single record on the wall, replacing whatever is shown.
    async fn render(&self, record: &Record) -> Result<(), RenderError>;

    /// Surface a user-visible error message (e.g. the initial fetch failed).
    async fn show_error(&self, message: &str);
}

/// Best-effort media prefetch seam. Fire-and-forget.
pub trait Preloader: Send + Sync {
    fn preload(&self, location: &str);
}

/// Used when prefetch is disabled in config.
pub struct NoopPreloader;

impl Preloader for NoopPreloader {
    fn preload(&self, _location: &str) {}
}
