//! Thread-affinity verification for observation delivery.
//!
//! Fetchgrid's contract is single-threaded and cooperative: a result set
//! delivers its change notifications on the thread that started the
//! observation, and the controller applies view mutations on that same
//! thread without suspension. This module provides [`ThreadAffinity`], which
//! records the observing thread and verifies later calls against it.
//!
//! Two levels of checking are provided:
//!
//! - [`ThreadAffinity::debug_assert_same_thread`]: only active in debug
//!   builds. Used liberally on the delivery path for zero-cost release
//!   performance.
//! - [`ThreadAffinity::assert_same_thread`]: always active. Use for critical
//!   operations where the check must survive into release builds.
//!
//! # Example
//!
//! ```
//! use fetchgrid_core::ThreadAffinity;
//!
//! struct Observer {
//!     affinity: ThreadAffinity,
//! }
//!
//! impl Observer {
//!     fn new() -> Self {
//!         Self { affinity: ThreadAffinity::current() }
//!     }
//!
//!     fn deliver(&self) {
//!         // Panic in debug builds if called from another thread
//!         self.affinity.debug_assert_same_thread();
//!         // ... apply view mutations ...
//!     }
//! }
//! ```

use std::thread::ThreadId;

/// Thread affinity tracker for observation objects.
///
/// Records the thread on which observation was started and provides methods
/// to verify that delivery and view mutation occur on the same thread.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Assert that we are on the same thread as the affinity.
    ///
    /// This always runs (debug and release builds).
    ///
    /// # Panics
    ///
    /// Panics with a descriptive message if called from a different thread.
    #[inline]
    pub fn assert_same_thread(&self) {
        self.assert_same_thread_with_msg("observation accessed from wrong thread")
    }

    /// Assert that we are on the same thread, with a custom message.
    ///
    /// # Panics
    ///
    /// Panics if called from a different thread.
    pub fn assert_same_thread_with_msg(&self, msg: &str) {
        if !self.is_same_thread() {
            self.panic_wrong_thread(msg);
        }
    }

    /// Debug-only assertion that we are on the same thread.
    ///
    /// This is a no-op in release builds.
    #[inline]
    pub fn debug_assert_same_thread(&self) {
        #[cfg(debug_assertions)]
        self.assert_same_thread();
    }

    /// Debug-only assertion with a custom message.
    #[inline]
    pub fn debug_assert_same_thread_with_msg(&self, msg: &str) {
        #[cfg(debug_assertions)]
        self.assert_same_thread_with_msg(msg);
        #[cfg(not(debug_assertions))]
        let _ = msg;
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, msg: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let current_id = current.id();

        panic!(
            "\n\
            ══════════════════════════════════════════════════════════════════\n\
            THREAD AFFINITY VIOLATION\n\
            ══════════════════════════════════════════════════════════════════\n\
            \n\
            {msg}\n\
            \n\
            Observation was started on thread: {:?}\n\
            Current thread: \"{current_name}\" (ID: {current_id:?})\n\
            \n\
            Change delivery and view mutation must stay on the thread that\n\
            started the observation. Move store mutations to that thread, or\n\
            marshal them there before touching the store.\n\
            \n\
            ══════════════════════════════════════════════════════════════════",
            self.thread_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_affinity_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        // Should not panic
        affinity.assert_same_thread();
        affinity.debug_assert_same_thread();
    }

    #[test]
    fn test_affinity_different_thread() {
        let affinity = ThreadAffinity::current();

        let result = Arc::new(AtomicBool::new(false));
        let result_clone = result.clone();

        let handle = std::thread::spawn(move || {
            result_clone.store(!affinity.is_same_thread(), Ordering::SeqCst);
        });

        handle.join().unwrap();
        assert!(
            result.load(Ordering::SeqCst),
            "is_same_thread() should return false from different thread"
        );
    }

    #[test]
    fn test_affinity_panic_on_wrong_thread() {
        let affinity = ThreadAffinity::current();

        let result = std::thread::spawn(move || {
            affinity.assert_same_thread();
        })
        .join();

        assert!(result.is_err(), "Expected thread to panic with affinity violation");
    }

    #[test]
    fn test_affinity_default_and_copy() {
        let affinity1 = ThreadAffinity::default();
        let affinity2 = affinity1;
        assert_eq!(affinity1.thread_id(), affinity2.thread_id());
        assert!(affinity2.is_same_thread());
    }
}
