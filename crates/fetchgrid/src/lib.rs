//! Fetchgrid: live query results driving a sectioned grid view.
//!
//! Fetchgrid binds a store query to a grid- or list-style view and keeps the
//! two consistent: the store reports row-level changes (insert, delete,
//! update, move), and a [`ListController`] translates each one into the
//! minimal view mutation inside an atomic begin/end update scope. The
//! design is observer-driven: the controller never polls and never
//! reloads wholesale when an incremental path exists.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐ execute ┌─────────────┐ signals ┌────────────────┐
//! │StoreContext│────────▶│  ResultSet  │────────▶│ ListController │
//! └────────────┘         └─────────────┘         └───────┬────────┘
//!       ▲                                                │ mutations
//!       │ QueryDescriptor → Query                ┌───────▼────────┐
//!       └── caller configures ──────────────────▶│    GridView    │
//!                                                └────────────────┘
//! ```
//!
//! - [`QueryDescriptor`] declares what to fetch: entity, filter predicate,
//!   sort descriptors, optional cache name and customization hook.
//! - [`StoreContext`] executes queries and hands back observed
//!   [`ResultSet`]s; [`MemoryStore`] is the in-crate reference
//!   implementation.
//! - [`ListController`] owns the result set, drives a [`GridView`], and
//!   exposes per-change hooks through [`ListChangeObserver`]. It also
//!   carries the screen-level extras: a long-press contextual menu
//!   ([`MenuAction`]) and a pull-to-refresh affordance ([`RefreshControl`]).
//!
//! Everything is dependency-injected; there are no ambient globals. The
//! observation contract is single-threaded and cooperative: change
//! delivery happens synchronously on the thread that configured the
//! controller, verified in debug builds via
//! [`fetchgrid_core::ThreadAffinity`].
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use fetchgrid::prelude::*;
//!
//! let store = Arc::new(MemoryStore::<i64>::new("Score"));
//! let mut controller = ListController::new(store.clone(), RecordingView::new());
//! controller.configure(
//!     QueryDescriptor::for_entity_named("Score")
//!         .sort(SortDescriptor::ascending_by_key("value", |n: &i64| *n)),
//! );
//!
//! store.insert(42);
//! assert_eq!(controller.row_count(0), 1);
//! ```

pub mod controller;
pub mod memory;
pub mod menu;
pub mod path;
pub mod query;
pub mod refresh;
pub mod store;
pub mod view;

pub use controller::{ListChangeObserver, ListController};
pub use memory::{MemoryResultSet, MemoryStore};
pub use menu::MenuAction;
pub use path::IndexPath;
pub use query::{EntityRef, Predicate, Query, QueryCustomizer, QueryDescriptor, SortDescriptor};
pub use refresh::{RefreshAction, RefreshControl};
pub use store::{
    ChangeEvent, ChangeKind, ResultSet, ResultSetSignals, StoreContext, StoreError, StoreResult,
};
pub use view::{GridView, RecordingView, ViewMutation};

/// Convenience glob import for the common surface.
pub mod prelude {
    pub use crate::controller::{ListChangeObserver, ListController};
    pub use crate::memory::MemoryStore;
    pub use crate::menu::MenuAction;
    pub use crate::path::IndexPath;
    pub use crate::query::{Query, QueryDescriptor, SortDescriptor};
    pub use crate::refresh::RefreshControl;
    pub use crate::store::{ChangeEvent, ResultSet, StoreContext, StoreError};
    pub use crate::view::{GridView, RecordingView};
}
