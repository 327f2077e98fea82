use std::cell::Cell;

/// Exclusive in-progress marker for top-level relay invocations.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: Cell<bool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the marker, or `None` if an invocation is already in progress.
    pub fn enter(&self) -> Option<GuardLock<'_>> {
        if self.entered.replace(true) {
            return None;
        }
        Some(GuardLock { guard: self })
    }

    pub fn is_entered(&self) -> bool {
        self.entered.get()
    }
}

/// Releases the marker when dropped, on every exit path.
#[derive(Debug)]
pub struct GuardLock<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardLock<'_> {
    fn drop(&mut self) {
        self.guard.entered.set(false);
    }
}
