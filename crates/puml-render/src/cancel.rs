//! Cooperative cancellation for one render cycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::RenderError;

/// Shared cancellation flag, polled at defined points.
///
/// Cancellation is cooperative: a check only prevents *starting* the next
/// unit of work, it never interrupts an export mid-flight. Checks happen at
/// block construction, at the start of image generation, and at the start
/// of each page render. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the cycle.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Poll the flag.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Cancelled`] when cancellation has been
    /// requested.
    pub fn check(&self) -> Result<(), RenderError> {
        if self.is_cancelled() {
            tracing::debug!("render cycle cancelled");
            return Err(RenderError::cancelled());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_passes_check() {
        let token = CancelToken::new();

        assert!(!token.is_cancelled());
        assert!(token.check().is_ok());
    }

    #[test]
    fn test_cancelled_token_fails_check() {
        let token = CancelToken::new();
        token.cancel();

        assert!(token.is_cancelled());
        assert!(matches!(
            token.check(),
            Err(RenderError::Cancelled { source: None })
        ));
    }

    #[test]
    fn test_clones_share_the_flag() {
        let token = CancelToken::new();
        let clone = token.clone();

        clone.cancel();

        assert!(token.is_cancelled());
    }
}
