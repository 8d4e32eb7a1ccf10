//! [![unsafe forbidden](https://gitlab.com/leonhard-llc/ops/-/raw/main/unsafe-forbidden.svg)](https://github.com/rust-secure-code/safety-dance/)
//!
//! # recursor-pool
//!
//! Chooses which upstream recursive DNS server answers a forwarded query,
//! with failover across a configured list and two selection strategies.
//!
//! ## Use Cases
//! - Forward non-authoritative DNS queries to a fleet of upstream recursors
//!   with automatic failover.
//! - Shift query traffic away from a misbehaving upstream without taking it
//!   out of rotation permanently.
//!
//! ## Features
//! - `forbid(unsafe_code)`
//! - `serial` strategy: fixed order, no retries, no history.
//! - `smart` strategy: randomized starting order, bounded retries per
//!   upstream, and adaptive preference based on a rolling failure window.
//!
//! ## Limitations
//! - No caching of recursor responses.
//! - No dynamic reconfiguration: the recursor list is fixed at construction.
//!
//! ## Example
//! ```
//! use recursor_pool::{new_recursor_pool, RetrySettings};
//! use std::time::Duration;
//!
//! let pool = new_recursor_pool(
//!     vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()],
//!     "smart",
//!     RetrySettings { retry_count: 2, retry_delay: Duration::from_millis(50) },
//! );
//! let result = pool.perform_strategically(&|_name| Ok(()));
//! assert!(result.is_ok());
//! ```
#![forbid(unsafe_code)]

mod fail_window;
mod serial;
mod smart;

pub use fail_window::{FailWindow, FAIL_HISTORY_LENGTH};
pub use serial::SerialRecursorPool;
pub use smart::{RetrySettings, SmartRecursorPool};

use std::fmt;

/// Selection tag that builds a [`SmartRecursorPool`].
pub const SMART_SELECTION: &str = "smart";
/// Selection tag that builds a [`SerialRecursorPool`]. Also the fallback for
/// any selection string other than [`SMART_SELECTION`].
pub const SERIAL_SELECTION: &str = "serial";

/// The result a `work` callback reports back to the pool. The pool never
/// inspects the error value; only whether the call succeeded matters.
pub type WorkResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PoolError {
    /// Every upstream was tried (and, for the smart pool, retried) without
    /// success, or the pool has no upstreams configured.
    NoRecursorResponse,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::NoRecursorResponse => write!(f, "no response from recursors"),
        }
    }
}

impl std::error::Error for PoolError {}

/// A pool of upstream recursive DNS servers, queried via [`Self::perform_strategically`].
pub trait RecursorPool: Send + Sync {
    /// Calls `work` with an upstream name, trying upstreams according to the
    /// pool's strategy, until one call succeeds.
    ///
    /// # Errors
    /// Returns [`PoolError::NoRecursorResponse`] if every upstream was tried
    /// without success, or if the pool has no upstreams.
    fn perform_strategically(&self, work: &dyn Fn(&str) -> WorkResult) -> Result<(), PoolError>;
}

/// Builds a [`RecursorPool`] for `selection` (`"smart"` or `"serial"`;
/// anything else falls back to `"serial"`).
#[must_use]
pub fn new_recursor_pool(
    recursors: Vec<String>,
    selection: &str,
    retry_settings: RetrySettings,
) -> Box<dyn RecursorPool> {
    if selection == SMART_SELECTION {
        Box::new(SmartRecursorPool::new(recursors, retry_settings))
    } else {
        Box::new(SerialRecursorPool::new(recursors))
    }
}
