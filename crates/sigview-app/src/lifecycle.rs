//! Run-loop lifecycle
//!
//! Pure state machine for the frame loop: Running until a quit
//! request or fatal device loss, then ShuttingDown until teardown has
//! run, then Terminated. Transitions report whether they fired so
//! one-shot side effects (the fatal notification, teardown) run
//! exactly once regardless of which exit path was taken.

/// Frame-loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Normal frames are produced
    Running,
    /// An exit was requested; teardown is pending
    ShuttingDown,
    /// Teardown has run
    Terminated,
}

impl Lifecycle {
    pub fn new() -> Self {
        Lifecycle::Running
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Lifecycle::Running)
    }

    /// Leave the Running state.
    ///
    /// Returns true only on the first call, so the caller can gate
    /// one-shot notifications on it.
    pub fn begin_shutdown(&mut self) -> bool {
        if let Lifecycle::Running = self {
            *self = Lifecycle::ShuttingDown;
            true
        } else {
            false
        }
    }

    /// Mark teardown complete.
    ///
    /// Returns true only the first time; teardown must not repeat.
    pub fn finish(&mut self) -> bool {
        if let Lifecycle::Terminated = self {
            false
        } else {
            *self = Lifecycle::Terminated;
            true
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_path() {
        let mut state = Lifecycle::new();
        assert!(state.is_running());

        assert!(state.begin_shutdown());
        assert_eq!(state, Lifecycle::ShuttingDown);
        assert!(!state.is_running());

        assert!(state.finish());
        assert_eq!(state, Lifecycle::Terminated);
    }

    #[test]
    fn test_shutdown_fires_once() {
        let mut state = Lifecycle::new();

        // First device-loss (or quit) transitions and reports it;
        // any repeat must not re-trigger the notification.
        assert!(state.begin_shutdown());
        assert!(!state.begin_shutdown());
        assert!(!state.begin_shutdown());
    }

    #[test]
    fn test_teardown_runs_once() {
        let mut state = Lifecycle::new();
        state.begin_shutdown();

        assert!(state.finish());
        assert!(!state.finish());
    }

    #[test]
    fn test_teardown_without_explicit_shutdown() {
        // The window system can end the loop without a prior quit
        // event; teardown still runs exactly once.
        let mut state = Lifecycle::new();
        assert!(state.finish());
        assert!(!state.finish());
        assert!(!state.begin_shutdown());
    }
}
