use crate::fail_window::FailWindow;
use crate::{PoolError, RecursorPool, WorkResult};
use rand::seq::SliceRandom;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Failures observed at the current preferred recursor before preference
/// shifts to the next one.
const FAIL_HISTORY_THRESHOLD: i32 = 5;

#[derive(Clone, Copy, Debug)]
pub struct RetrySettings {
    pub retry_count: u32,
    pub retry_delay: Duration,
}

struct RecursorEntry {
    name: String,
    fail_window: FailWindow,
}

/// Adaptive-preference recursor pool.
///
/// Upstream order is randomized once, at construction. Every traversal
/// starts at `preferred_index mod len`; a failure observed at that starting
/// position (not at any fallback visited later in the same traversal)
/// shifts preference to the next upstream once its fail count crosses
/// [`FAIL_HISTORY_THRESHOLD`].
pub struct SmartRecursorPool {
    recursors: Vec<RecursorEntry>,
    preferred_index: AtomicU64,
    retry_settings: RetrySettings,
}

impl SmartRecursorPool {
    #[must_use]
    pub fn new(mut recursors: Vec<String>, retry_settings: RetrySettings) -> Self {
        recursors.shuffle(&mut rand::thread_rng());
        let recursors: Vec<RecursorEntry> = recursors
            .into_iter()
            .map(|name| RecursorEntry {
                name,
                fail_window: FailWindow::new(),
            })
            .collect();
        if let Some(first) = recursors.first() {
            log::info!("recursor pool: starting preference: {}", first.name);
        }
        Self {
            recursors,
            preferred_index: AtomicU64::new(0),
            retry_settings,
        }
    }

    /// Runs `work` against `name` up to `retry_count` times, sleeping
    /// `retry_delay` between attempts (never after the last one).
    fn perform_retry_logic(&self, work: &dyn Fn(&str) -> WorkResult, name: &str) -> WorkResult {
        if self.retry_settings.retry_count == 0 {
            return work(name);
        }
        let mut result = work(name);
        for attempt in 1..self.retry_settings.retry_count {
            if result.is_ok() {
                return result;
            }
            log::error!(
                "dns request error for recursor {name} - retry [{attempt}/{count}] with delay of {delay:?}",
                count = self.retry_settings.retry_count,
                delay = self.retry_settings.retry_delay,
            );
            std::thread::sleep(self.retry_settings.retry_delay);
            result = work(name);
        }
        result
    }

    fn register_result(&self, index: usize, was_error: bool) -> i32 {
        self.recursors[index].fail_window.register_result(was_error)
    }

    fn shift_preference(&self) {
        let len = self.recursors.len() as u64;
        if len == 0 {
            return;
        }
        let new_index = self.preferred_index.fetch_add(1, Ordering::SeqCst) + 1;
        let name = &self.recursors[(new_index % len) as usize].name;
        log::info!("recursor pool: shifting preference to {name}");
    }
}

impl RecursorPool for SmartRecursorPool {
    fn perform_strategically(&self, work: &dyn Fn(&str) -> WorkResult) -> Result<(), PoolError> {
        let len = self.recursors.len();
        if len == 0 {
            return Err(PoolError::NoRecursorResponse);
        }
        let len = len as u64;
        // Each traversal takes its own snapshot of the preferred index, so a
        // concurrent shift never causes this traversal to skip or repeat an
        // upstream.
        let offset = self.preferred_index.load(Ordering::SeqCst);
        for i in 0..len {
            let index = ((offset + i) % len) as usize;
            let name = self.recursors[index].name.clone();
            if self.perform_retry_logic(work, &name).is_ok() {
                self.register_result(index, false);
                return Ok(());
            }
            let failures = self.register_result(index, true);
            if i == 0 && failures >= FAIL_HISTORY_THRESHOLD {
                self.shift_preference();
            }
        }
        Err(PoolError::NoRecursorResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn settings(retry_count: u32) -> RetrySettings {
        RetrySettings {
            retry_count,
            retry_delay: Duration::from_millis(0),
        }
    }

    #[test]
    fn empty_pool_fails_immediately() {
        let pool = SmartRecursorPool::new(vec![], settings(0));
        let result = pool.perform_strategically(&|_name| Ok(()));
        assert!(matches!(result, Err(PoolError::NoRecursorResponse)));
    }

    #[test]
    fn window_saturation_at_the_preferred_recursor_shifts_preference() {
        let pool = SmartRecursorPool::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            settings(0),
        );
        // Drive the pool's internal shuffle out of the picture: read back
        // whichever name landed at index 0 and fail only that one.
        let failing_name = pool.recursors[0].name.clone();
        let succeeding_name = pool.recursors[1].name.clone();

        for _ in 0..4 {
            let result = pool.perform_strategically(&|name| {
                if name == failing_name {
                    Err("boom".into())
                } else {
                    Ok(())
                }
            });
            assert!(result.is_ok());
            assert_eq!(0, pool.preferred_index.load(Ordering::SeqCst));
        }
        // Fifth traversal pushes the fail count at the preferred recursor to
        // 5 and shifts preference away from it.
        let result = pool.perform_strategically(&|name| {
            if name == failing_name {
                Err("boom".into())
            } else {
                Ok(())
            }
        });
        assert!(result.is_ok());
        assert_eq!(1, pool.preferred_index.load(Ordering::SeqCst));
        let _ = succeeding_name;
    }

    #[test]
    fn failures_at_fallback_positions_never_shift_preference() {
        let pool = SmartRecursorPool::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            settings(0),
        );
        let preferred_name = pool.recursors[0].name.clone();
        let last_name = pool.recursors[2].name.clone();

        for _ in 0..20 {
            let result = pool.perform_strategically(&|name| {
                if name == last_name {
                    Err("boom".into())
                } else {
                    Ok(())
                }
            });
            assert!(result.is_ok());
        }
        assert_eq!(0, pool.preferred_index.load(Ordering::SeqCst));
        let _ = preferred_name;
    }

    #[test]
    fn retry_count_zero_is_a_single_attempt() {
        let pool = SmartRecursorPool::new(vec!["a".to_string()], settings(0));
        let attempts = AtomicUsize::new(0);
        let result = pool.perform_strategically(&|_name| {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err("boom".into())
        });
        assert!(matches!(result, Err(PoolError::NoRecursorResponse)));
        assert_eq!(1, attempts.load(Ordering::SeqCst));
    }

    #[test]
    fn retries_up_to_retry_count_and_short_circuits_on_success() {
        let pool = SmartRecursorPool::new(vec!["a".to_string()], settings(3));
        let attempts = AtomicUsize::new(0);
        let result = pool.perform_strategically(&|_name| {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 2 {
                Ok(())
            } else {
                Err("boom".into())
            }
        });
        assert!(result.is_ok());
        assert_eq!(2, attempts.load(Ordering::SeqCst));
    }

    #[test]
    fn retry_exhaustion_registers_exactly_one_failure_per_traversal() {
        let pool = SmartRecursorPool::new(vec!["a".to_string()], settings(3));
        let result = pool.perform_strategically(&|_name| Err("boom".into()));
        assert!(matches!(result, Err(PoolError::NoRecursorResponse)));
        assert_eq!(1, pool.recursors[0].fail_window.fail_count());
    }

    #[test]
    fn retry_delay_sleeps_between_attempts_but_not_after_the_last() {
        let pool = SmartRecursorPool::new(
            vec!["a".to_string()],
            RetrySettings {
                retry_count: 3,
                retry_delay: Duration::from_millis(10),
            },
        );
        let start = std::time::Instant::now();
        let result = pool.perform_strategically(&|_name| Err("boom".into()));
        let elapsed = start.elapsed();
        assert!(matches!(result, Err(PoolError::NoRecursorResponse)));
        assert!(elapsed >= Duration::from_millis(20));
        assert!(elapsed < Duration::from_millis(200));
    }
}
