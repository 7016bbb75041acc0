//! Pull-to-refresh control.
//!
//! A [`RefreshControl`] pairs a caller-supplied action with the refreshing
//! state the host UI displays. The controller owns at most one;
//! [`attach_refresh_control`](crate::ListController::attach_refresh_control)
//! returns the control so the caller can customize it further, and attaching
//! again replaces the previous control wholesale.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// The action invoked when the refresh gesture fires.
pub type RefreshAction = Arc<dyn Fn() + Send + Sync>;

/// A pull-to-refresh affordance wired to a caller-supplied action.
pub struct RefreshControl {
    action: RefreshAction,
    refreshing: AtomicBool,
    title: Mutex<Option<String>>,
}

impl RefreshControl {
    /// Creates a control wired to the given action.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            action: Arc::new(action),
            refreshing: AtomicBool::new(false),
            title: Mutex::new(None),
        }
    }

    /// Fires the refresh gesture: enters the refreshing state and invokes
    /// the action. The host calls this; the action (or the caller) ends the
    /// refreshing state with [`end_refreshing`](Self::end_refreshing) once
    /// new data is in.
    pub fn trigger(&self) {
        self.refreshing.store(true, Ordering::SeqCst);
        (self.action)();
    }

    /// Enters the refreshing state without invoking the action.
    pub fn begin_refreshing(&self) {
        self.refreshing.store(true, Ordering::SeqCst);
    }

    /// Leaves the refreshing state.
    pub fn end_refreshing(&self) {
        self.refreshing.store(false, Ordering::SeqCst);
    }

    /// `true` while a refresh is in progress.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst)
    }

    /// Sets the title displayed next to the refresh affordance.
    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.lock() = Some(title.into());
    }

    /// The displayed title, if one was set.
    pub fn title(&self) -> Option<String> {
        self.title.lock().clone()
    }
}

impl fmt::Debug for RefreshControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshControl")
            .field("refreshing", &self.is_refreshing())
            .field("title", &self.title())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_trigger_invokes_action_and_sets_state() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let control = RefreshControl::new(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!control.is_refreshing());
        control.trigger();
        assert!(control.is_refreshing());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        control.end_refreshing();
        assert!(!control.is_refreshing());
    }

    #[test]
    fn test_begin_refreshing_does_not_invoke_action() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let control = RefreshControl::new(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        control.begin_refreshing();
        assert!(control.is_refreshing());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_title_customization() {
        let control = RefreshControl::new(|| {});
        assert_eq!(control.title(), None);
        control.set_title("Checking for updates…");
        assert_eq!(control.title(), Some("Checking for updates…".to_string()));
    }
}
