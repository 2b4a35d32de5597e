/// Counts outstanding asynchronous loads (level JSON, textures on the JS side).
///
/// Gameplay starts once every load that began has finished. If nothing was
/// ever requested the tracker is ready immediately.
#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    pending: u32,
    completed: bool,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the start of a load.
    pub fn begin(&mut self) {
        self.pending += 1;
    }

    /// Register the end of a load. Extra calls are ignored.
    pub fn finish(&mut self) {
        if self.pending == 0 {
            log::warn!("loading: finish() without a matching begin()");
            return;
        }
        self.pending -= 1;
        if self.pending == 0 {
            log::info!("loading: all loads finished");
        }
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    pub fn is_done(&self) -> bool {
        self.pending == 0
    }

    /// Returns `true` exactly once: the first time it is called with no
    /// outstanding loads. Used to fire the load-complete signal.
    pub fn take_completion(&mut self) -> bool {
        if self.completed || !self.is_done() {
            return false;
        }
        self.completed = true;
        true
    }

    /// Whether the load-complete signal has already fired.
    pub fn has_completed(&self) -> bool {
        self.completed
    }
}
