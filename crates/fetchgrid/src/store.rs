//! Store abstraction: result sets, change events, and the query layer contract.
//!
//! This module defines the seam between the controller and the host
//! persistence layer. The controller consumes an "observed result set", a
//! live, ordered, sectioned view over query results, and must not assume any
//! concrete implementation beyond that contract.
//!
//! # Change batches
//!
//! A result set brackets its change events: [`ResultSetSignals::batch_began`]
//! fires before any change of a batch, each change is delivered through
//! [`ResultSetSignals::changed`], and [`ResultSetSignals::batch_ended`] fires
//! after the last one. Consumers must apply the corresponding view mutations
//! atomically between the two brackets, or the view and the result set
//! diverge. Per-change order within a batch is arbitrary.

use fetchgrid_core::Signal;
use thiserror::Error;

use crate::path::IndexPath;
use crate::query::Query;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur when executing a query against a store.
///
/// Initial-query execution failure is recoverable at the application level:
/// the controller reports it through an observer hook and stays empty rather
/// than panicking or holding a partially populated result set.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The query named an entity the store does not serve.
    #[error("unknown entity '{requested}' (store serves '{available}')")]
    UnknownEntity {
        /// The entity the query asked for.
        requested: String,
        /// The entity the store serves.
        available: String,
    },

    /// The store failed to execute the query.
    #[error("query execution failed: {0}")]
    Execution(String),
}

/// A single row-level change reported by an observed result set.
///
/// Each variant carries the affected item and the relevant index path(s):
/// one path for insert/delete/update, old and new paths for move.
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeEvent<T> {
    /// A row appeared at `at`.
    Insert {
        /// The inserted item.
        item: T,
        /// The destination path of the row.
        at: IndexPath,
    },
    /// The row at `at` disappeared.
    Delete {
        /// The removed item.
        item: T,
        /// The path the row occupied.
        at: IndexPath,
    },
    /// The row at `at` changed content without changing position.
    Update {
        /// The updated item.
        item: T,
        /// The path of the changed row.
        at: IndexPath,
    },
    /// The row moved from `from` to `to`.
    ///
    /// `to` is expressed in final post-batch coordinates.
    Move {
        /// The moved item.
        item: T,
        /// The path the row occupied before the batch.
        from: IndexPath,
        /// The path the row occupies after the batch.
        to: IndexPath,
    },
}

/// Discriminant of a [`ChangeEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Insert,
    Delete,
    Update,
    Move,
}

impl<T> ChangeEvent<T> {
    /// Returns the affected item.
    pub fn item(&self) -> &T {
        match self {
            Self::Insert { item, .. }
            | Self::Delete { item, .. }
            | Self::Update { item, .. }
            | Self::Move { item, .. } => item,
        }
    }

    /// Returns the event's discriminant.
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Insert { .. } => ChangeKind::Insert,
            Self::Delete { .. } => ChangeKind::Delete,
            Self::Update { .. } => ChangeKind::Update,
            Self::Move { .. } => ChangeKind::Move,
        }
    }
}

/// Collection of signals emitted by an observed result set.
///
/// Controllers connect to these to stay synchronized with the query results.
/// Result sets must emit `batch_began` before the first `changed` of a batch
/// and `batch_ended` after the last one, even for single-change batches.
pub struct ResultSetSignals<T> {
    /// Emitted before the changes of a batch.
    pub batch_began: Signal<()>,
    /// Emitted once per row-level change within a batch.
    pub changed: Signal<ChangeEvent<T>>,
    /// Emitted after the last change of a batch.
    pub batch_ended: Signal<()>,
}

impl<T> Default for ResultSetSignals<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultSetSignals<T> {
    /// Creates a new set of result-set signals.
    pub fn new() -> Self {
        Self {
            batch_began: Signal::new(),
            changed: Signal::new(),
            batch_ended: Signal::new(),
        }
    }

    /// Emits a properly bracketed batch.
    ///
    /// Fires `batch_began`, delivers every event through `changed`, then
    /// fires `batch_ended`. Does nothing for an empty event list.
    pub fn emit_batch(&self, events: &[ChangeEvent<T>]) {
        if events.is_empty() {
            return;
        }
        self.batch_began.emit(&());
        for event in events {
            self.changed.emit(event);
        }
        self.batch_ended.emit(&());
    }
}

/// A live, ordered, sectioned view over the results of a query.
///
/// The result set is owned exclusively by its controller. It keeps its row
/// content current with the underlying store and reports every row-level
/// change through its [`signals`](ResultSet::signals). Inside a batch the
/// result set already reflects the final state; the row/section counts are
/// authoritative again as soon as `batch_ended` fires.
pub trait ResultSet<T> {
    /// Returns the number of sections.
    fn section_count(&self) -> usize;

    /// Returns the number of rows in the given section.
    ///
    /// Out-of-range sections have zero rows.
    fn row_count(&self, section: usize) -> usize;

    /// Returns the item at the given path, if the path is in range.
    fn item(&self, at: &IndexPath) -> Option<T>;

    /// Returns the total number of rows across all sections.
    fn total_count(&self) -> usize {
        (0..self.section_count()).map(|s| self.row_count(s)).sum()
    }

    /// Returns the signals this result set emits changes on.
    fn signals(&self) -> &ResultSetSignals<T>;

    /// Stops observation.
    ///
    /// Idempotent. After this returns, the result set emits no further
    /// signals. Dropping a result set implies the same.
    fn stop_observing(&self);
}

/// The persistence/query layer collaborator.
///
/// Supplies executable queries producing observed result sets. Passed to the
/// controller explicitly rather than reached through ambient global state.
pub trait StoreContext<T> {
    /// The concrete result set this store produces.
    type ResultSet: ResultSet<T>;

    /// Executes the query, producing a live result set.
    ///
    /// On failure no observation is started; the error describes why.
    fn execute(&self, query: &Query<T>) -> StoreResult<Self::ResultSet>;
}
