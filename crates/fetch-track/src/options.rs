//! Options controlling when a tracked call blocks view readiness.

/// Configuration recognized when spawning a tracked call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackOptions {
    /// Force resolution before the view is treated as ready.
    pub server: bool,
    /// Allow the view to render before the call resolves.
    pub lazy: bool,
}

impl TrackOptions {
    /// Create options with explicit flags.
    pub fn new(server: bool, lazy: bool) -> Self {
        Self { server, lazy }
    }

    /// Options that force resolution before readiness.
    pub fn eager() -> Self {
        Self {
            server: true,
            lazy: false,
        }
    }

    /// Check whether readiness must wait for the call to settle.
    pub fn blocks_readiness(&self) -> bool {
        self.server || !self.lazy
    }
}

impl Default for TrackOptions {
    fn default() -> Self {
        Self {
            server: false,
            lazy: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_lazy() {
        let opts = TrackOptions::default();
        assert!(!opts.server);
        assert!(opts.lazy);
        assert!(!opts.blocks_readiness());
    }

    #[test]
    fn test_eager_options_block_readiness() {
        let opts = TrackOptions::eager();
        assert!(opts.server);
        assert!(!opts.lazy);
        assert!(opts.blocks_readiness());
    }

    #[test]
    fn test_either_flag_blocks_readiness() {
        assert!(TrackOptions::new(false, false).blocks_readiness());
        assert!(TrackOptions::new(true, true).blocks_readiness());
        assert!(!TrackOptions::new(false, true).blocks_readiness());
    }
}
