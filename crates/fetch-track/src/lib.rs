//! Tracked asynchronous calls for view-layer data fetching.
//!
//! This crate provides:
//! - `TrackedCall` - Spawn a fetch and observe its value and pending state
//! - `DataRef` / `PendingRef` - Cheap read handles for the view layer
//! - `TrackOptions` - Eager vs lazy readiness behavior
//! - `CallError` - Errors surfaced by a tracked call

mod call;
mod error;
mod options;

pub use call::*;
pub use error::*;
pub use options::*;
