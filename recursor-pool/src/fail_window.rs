use std::collections::VecDeque;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

/// Number of past outcomes a [`FailWindow`] remembers.
pub const FAIL_HISTORY_LENGTH: usize = 25;

/// A fixed-capacity FIFO of a recursor's last [`FAIL_HISTORY_LENGTH`] outcomes,
/// paired with the popcount of that FIFO.
///
/// The window never grows or shrinks: every push is paired with a pop. The
/// FIFO's own mutual exclusion is what keeps `fail_count` consistent with the
/// window's contents; nothing outside a single `FailWindow` shares its lock,
/// so concurrent `register_result` calls on different recursors never
/// contend with each other.
pub struct FailWindow {
    window: Mutex<VecDeque<bool>>,
    fail_count: AtomicI32,
}

impl FailWindow {
    /// Makes a window pre-filled with `false` (no failures yet).
    #[must_use]
    pub fn new() -> Self {
        Self {
            window: Mutex::new(std::iter::repeat(false).take(FAIL_HISTORY_LENGTH).collect()),
            fail_count: AtomicI32::new(0),
        }
    }

    /// Pops the oldest outcome, pushes `was_error`, and returns the updated
    /// fail count.
    pub fn register_result(&self, was_error: bool) -> i32 {
        let oldest = {
            let mut window = self.window.lock().unwrap_or_else(|poison| poison.into_inner());
            let oldest = window
                .pop_front()
                .expect("fail window is fixed capacity and never empty");
            window.push_back(was_error);
            oldest
        };
        let delta = i32::from(was_error) - i32::from(oldest);
        self.fail_count.fetch_add(delta, Ordering::SeqCst) + delta
    }

    #[must_use]
    pub fn fail_count(&self) -> i32 {
        self.fail_count.load(Ordering::SeqCst)
    }
}

impl Default for FailWindow {
    fn default() -> Self {
        Self::new()
    }
}
