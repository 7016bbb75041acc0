//! Contextual long-press menu actions.
//!
//! A controller can carry a set of [`MenuAction`]s made available on
//! long-press over a row. Whether a given action is enabled for a given row
//! is decided by the observer's
//! [`can_perform`](crate::ListChangeObserver::can_perform) predicate
//! (default: all enabled); the contextual-menu host consumes the filtered
//! set via [`context_menu_actions`](crate::ListController::context_menu_actions).

/// A contextual action available on long-press over a row.
///
/// The `id` is what the enablement predicate and the menu host dispatch on;
/// the `title` is what gets displayed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MenuAction {
    id: String,
    title: String,
}

impl MenuAction {
    /// Creates a menu action.
    ///
    /// # Example
    ///
    /// ```
    /// use fetchgrid::MenuAction;
    ///
    /// let delete = MenuAction::new("delete", "Delete");
    /// assert_eq!(delete.id(), "delete");
    /// assert_eq!(delete.title(), "Delete");
    /// ```
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into() }
    }

    /// The action's stable identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The action's display title.
    pub fn title(&self) -> &str {
        &self.title
    }
}
