//! Overflow policies for the shared job queue
//!
//! When the bounded queue is full at enqueue time, the logger's policy
//! decides whether the producer waits, the oldest queued job is replaced,
//! or the new job is dropped. Every loss is counted.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Policy for handling a full queue, fixed per logger at construction
///
/// # Example
///
/// ```
/// use async_log_engine::OverflowPolicy;
///
/// // Default behavior: wait for space, lose nothing
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::Block);
///
/// // Never stall the caller, keep the freshest messages
/// let policy = OverflowPolicy::OverrunOldest;
/// assert!(!policy.may_block());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Block until space is available
    ///
    /// Zero message loss, but the caller stalls for as long as the queue
    /// stays full. A logger-level block timeout can bound the wait.
    #[default]
    Block,

    /// Replace the oldest undelivered job with the new one
    ///
    /// Never blocks. The queue's overrun counter increments per replacement.
    OverrunOldest,

    /// Drop the new job when the queue is full
    ///
    /// Never blocks. The queue's discard counter increments per rejection.
    DiscardNew,
}

impl OverflowPolicy {
    /// Whether enqueueing under this policy can stall the producer
    pub fn may_block(&self) -> bool {
        matches!(self, OverflowPolicy::Block)
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::OverrunOldest => write!(f, "OverrunOldest"),
            OverflowPolicy::DiscardNew => write!(f, "DiscardNew"),
        }
    }
}

/// Callback type for overflow notifications
///
/// Called when jobs are lost to overflow. The parameter is the queue's
/// running overrun or discard count, depending on the policy.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Callback receiving errors raised on worker threads
///
/// Worker-side failures cannot propagate to the thread that logged the
/// record, so they are delivered here instead.
pub type ErrorHandler = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Whether the `nth` occurrence (zero-based) of a recurring condition
/// should be reported: the first one, then every 1000th
#[inline]
pub(crate) fn should_alert(nth: u64) -> bool {
    nth == 0 || (nth + 1) % 1000 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_default() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::Block);
    }

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(OverflowPolicy::Block.to_string(), "Block");
        assert_eq!(OverflowPolicy::OverrunOldest.to_string(), "OverrunOldest");
        assert_eq!(OverflowPolicy::DiscardNew.to_string(), "DiscardNew");
    }

    #[test]
    fn test_may_block() {
        assert!(OverflowPolicy::Block.may_block());
        assert!(!OverflowPolicy::OverrunOldest.may_block());
        assert!(!OverflowPolicy::DiscardNew.may_block());
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&OverflowPolicy::OverrunOldest).unwrap();
        assert_eq!(json, "\"OverrunOldest\"");
        let parsed: OverflowPolicy = serde_json::from_str("\"DiscardNew\"").unwrap();
        assert_eq!(parsed, OverflowPolicy::DiscardNew);
    }

    #[test]
    fn test_should_alert_cadence() {
        assert!(should_alert(0));
        assert!(!should_alert(1));
        assert!(!should_alert(998));
        assert!(should_alert(999));
        assert!(should_alert(1999));
    }
}
