//! Two-call fetch patterns - Reference workload.
//!
//! Demonstrates three ways a view layer can issue a pair of remote calls:
//! - Parallel, with the first call blocking view readiness
//! - Parallel, with the raw tracked-call handles exposed
//! - Sequential, with the second call starting after the first resolves

mod orchestrator;
mod source;

pub use orchestrator::*;
pub use source::*;
