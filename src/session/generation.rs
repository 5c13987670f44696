// Request generation guard.
//
// Every request captures the generation current at issue time; a reset bumps
// it, so anything issued before the reset no longer matches and its response
// is dropped.

/// Monotonically increasing counter identifying the current session epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestGeneration {
    current: u64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value to attach to a request being issued now.
    pub fn begin_request(&self) -> u64 {
        self.current
    }

    /// Start a new epoch; every outstanding request becomes stale.
    pub fn invalidate(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.current
    }

    pub fn current(&self) -> u64 {
        self.current
    }
}
