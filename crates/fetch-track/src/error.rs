//! Errors surfaced by tracked calls.

/// Error type for tracked call operations.
///
/// Clone-able so the shared call state can hand out copies to every
/// handle observing the call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CallError {
    /// The underlying remote call failed.
    #[error("remote call failed: {0}")]
    Remote(String),

    /// The tracking task stopped before the call settled.
    #[error("tracked call aborted before settling")]
    Aborted,
}
