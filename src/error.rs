//! Error types used by the checked dispatch paths.
//!
//! The crate has exactly one recoverable failure: asking an unbound
//! [`Invoker`](crate::Invoker) to dispatch through the checked path
//! ([`try_invoke`](crate::Invoker::try_invoke)). Everything else is either a
//! compile-time rejection (receiver/method type mismatches) or a documented
//! panic on the unchecked path.
//!
//! [`CallError`] provides helper methods (`as_label`, `as_message`) for
//! logging/metrics.

use thiserror::Error;

/// # Errors produced by checked invoker dispatch.
///
/// Returned by [`try_invoke`](crate::Invoker::try_invoke); the unchecked
/// [`invoke`](crate::Invoker::invoke) panics in the same situations, and
/// [`invoke_safe`](crate::Invoker::invoke_safe) substitutes a default value.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallError {
    /// The invoker has no bound target.
    #[error("invoker is not bound to a callable")]
    Unbound,
}

impl CallError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use bindcast::CallError;
    ///
    /// assert_eq!(CallError::Unbound.as_label(), "invoke_unbound");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CallError::Unbound => "invoke_unbound",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CallError::Unbound => "dispatch attempted on an unbound invoker".to_string(),
        }
    }
}
