//! The grid/list view collaborator contract.
//!
//! [`GridView`] is the mutation surface the controller drives: incremental
//! row updates bracketed in an atomic begin/end scope. Cell content, layout,
//! and rendering are out of scope; they belong to the concrete view.
//!
//! [`RecordingView`] is a bookkeeping implementation used by tests and demos:
//! it tracks per-section row counts, logs every call, and panics when a
//! mutation arrives outside a begin/end scope, which makes batch-atomicity
//! violations loud.

use crate::path::IndexPath;

/// The list/grid view's incremental mutation surface.
///
/// The controller calls `begin_updates` when a change batch starts, one
/// mutation per change event, and `end_updates` when the batch is done. All
/// calls arrive on the observing thread.
pub trait GridView {
    /// Opens an atomic update scope.
    fn begin_updates(&mut self);

    /// Commits the atomic update scope.
    fn end_updates(&mut self);

    /// Inserts a row at the given path.
    fn insert_row(&mut self, at: IndexPath);

    /// Deletes the row at the given path.
    fn delete_row(&mut self, at: IndexPath);

    /// Reloads the row at the given path in place.
    fn reload_row(&mut self, at: IndexPath);

    /// Moves a row between paths. `to` is in final post-batch coordinates.
    fn move_row(&mut self, from: IndexPath, to: IndexPath);
}

/// One recorded view call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMutation {
    BeginUpdates,
    EndUpdates,
    Insert(IndexPath),
    Delete(IndexPath),
    Reload(IndexPath),
    Move(IndexPath, IndexPath),
}

/// A [`GridView`] double that records calls and tracks row counts.
///
/// Mutations outside a begin/end scope panic: the view's internal model and
/// the query results would diverge, which is exactly the inconsistency fault
/// the batch protocol exists to prevent.
#[derive(Debug, Default)]
pub struct RecordingView {
    mutations: Vec<ViewMutation>,
    /// Row count per section.
    rows: Vec<usize>,
    update_depth: usize,
}

impl RecordingView {
    /// Creates an empty view with no sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a view with the given per-section row counts.
    pub fn with_rows(rows: Vec<usize>) -> Self {
        Self { mutations: Vec::new(), rows, update_depth: 0 }
    }

    /// Every call recorded so far, in order.
    pub fn mutations(&self) -> &[ViewMutation] {
        &self.mutations
    }

    /// The number of sections the view currently models.
    pub fn section_count(&self) -> usize {
        self.rows.len()
    }

    /// The row count of a section (0 for unknown sections).
    pub fn row_count(&self, section: usize) -> usize {
        self.rows.get(section).copied().unwrap_or(0)
    }

    /// `true` while inside a begin/end scope.
    pub fn is_updating(&self) -> bool {
        self.update_depth > 0
    }

    /// Clears the recorded call log (row counts are kept).
    pub fn clear_log(&mut self) {
        self.mutations.clear();
    }

    fn assert_in_update(&self, call: &str) {
        assert!(
            self.update_depth > 0,
            "{call} outside begin_updates/end_updates scope"
        );
    }

    fn section_mut(&mut self, section: usize) -> &mut usize {
        if section >= self.rows.len() {
            self.rows.resize(section + 1, 0);
        }
        &mut self.rows[section]
    }
}

impl GridView for RecordingView {
    fn begin_updates(&mut self) {
        self.update_depth += 1;
        self.mutations.push(ViewMutation::BeginUpdates);
    }

    fn end_updates(&mut self) {
        assert!(self.update_depth > 0, "end_updates without begin_updates");
        self.update_depth -= 1;
        self.mutations.push(ViewMutation::EndUpdates);
    }

    fn insert_row(&mut self, at: IndexPath) {
        self.assert_in_update("insert_row");
        *self.section_mut(at.section()) += 1;
        self.mutations.push(ViewMutation::Insert(at));
    }

    fn delete_row(&mut self, at: IndexPath) {
        self.assert_in_update("delete_row");
        let rows = self.section_mut(at.section());
        assert!(*rows > 0, "delete_row from empty section {}", at.section());
        *rows -= 1;
        self.mutations.push(ViewMutation::Delete(at));
    }

    fn reload_row(&mut self, at: IndexPath) {
        self.assert_in_update("reload_row");
        self.mutations.push(ViewMutation::Reload(at));
    }

    fn move_row(&mut self, from: IndexPath, to: IndexPath) {
        self.assert_in_update("move_row");
        if from.section() != to.section() {
            let source = self.section_mut(from.section());
            assert!(*source > 0, "move_row from empty section {}", from.section());
            *source -= 1;
            *self.section_mut(to.section()) += 1;
        }
        self.mutations.push(ViewMutation::Move(from, to));
    }
}
