//! The list controller: binds a grid view to a live store query.
//!
//! [`ListController`] owns a query descriptor, materializes an observed
//! result set from it through an injected [`StoreContext`], and translates
//! every change the result set reports into the corresponding minimal
//! [`GridView`] mutation, bracketed in an atomic update scope. Subclass-style
//! customization goes through [`ListChangeObserver`], a capability trait with
//! default no-op methods that the concrete screen implements.
//!
//! # Lifecycle
//!
//! Unconfigured → Configured (result set live) → Reconfigured (old result
//! set torn down, new one started) → Disposed (observation released on
//! drop). There are no other states: a failed initial fetch leaves the
//! controller Unconfigured-equivalent and reports through
//! [`ListChangeObserver::fetch_failed`] instead of returning an error.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fetchgrid::{
//!     ListController, MemoryStore, QueryDescriptor, RecordingView, SortDescriptor,
//! };
//!
//! let store = Arc::new(MemoryStore::<i64>::new("Score"));
//! store.insert(10);
//!
//! let mut controller = ListController::new(store.clone(), RecordingView::new());
//! controller.configure(
//!     QueryDescriptor::for_entity_named("Score")
//!         .sort(SortDescriptor::ascending_by_key("value", |n: &i64| *n)),
//! );
//!
//! assert_eq!(controller.row_count(0), 1);
//! store.insert(5); // view receives one Insert at row 0
//! assert_eq!(controller.row_count(0), 2);
//! ```

use std::sync::Arc;

use fetchgrid_core::logging::targets;
use fetchgrid_core::{ConnectionGuard, ThreadAffinity};
use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::menu::MenuAction;
use crate::path::IndexPath;
use crate::query::QueryDescriptor;
use crate::refresh::RefreshControl;
use crate::store::{ChangeEvent, ResultSet, StoreContext, StoreError};
use crate::view::GridView;

/// Per-change customization hooks for a list screen.
///
/// All methods default to no-ops; implement only what the screen needs.
/// There is no base implementation to call through to.
pub trait ListChangeObserver<T>: Send + Sync {
    /// Called after a row was inserted into the view at `at`.
    fn row_inserted(&self, _item: &T, _at: IndexPath) {}

    /// Called after the row at `at` was deleted from the view.
    fn row_deleted(&self, _item: &T, _at: IndexPath) {}

    /// Called after the row at `at` was reloaded in place.
    fn row_updated(&self, _item: &T, _at: IndexPath) {}

    /// Called after a row moved from `from` to `to`.
    fn row_moved(&self, _item: &T, _from: IndexPath, _to: IndexPath) {}

    /// Called when initial query execution fails.
    ///
    /// The controller stays functional-but-empty; re-invoking
    /// [`ListController::configure`] is the caller's retry path.
    fn fetch_failed(&self, _error: &StoreError) {}

    /// Decides, per action and per row, whether a contextual-menu action is
    /// enabled. Default: all enabled.
    fn can_perform(&self, _action: &MenuAction, _at: IndexPath) -> bool {
        true
    }
}

/// The default observer: every hook is a no-op, every action enabled.
struct NoopObserver;

impl<T> ListChangeObserver<T> for NoopObserver {}

/// Shared state reachable from the signal slots.
struct ControllerInner<T, V> {
    view: Mutex<V>,
    observer: RwLock<Arc<dyn ListChangeObserver<T>>>,
    affinity: ThreadAffinity,
}

impl<T, V: GridView> ControllerInner<T, V> {
    fn on_batch_began(&self) {
        self.affinity.debug_assert_same_thread_with_msg(
            "change batch delivered off the observing thread",
        );
        tracing::trace!(target: targets::CONTROLLER, "batch began");
        self.view.lock().begin_updates();
    }

    fn on_change(&self, event: &ChangeEvent<T>) {
        self.affinity.debug_assert_same_thread_with_msg(
            "change event delivered off the observing thread",
        );
        let observer = self.observer.read().clone();
        match event {
            ChangeEvent::Insert { item, at } => {
                tracing::trace!(target: targets::CONTROLLER, at = %at, "insert row");
                self.view.lock().insert_row(*at);
                observer.row_inserted(item, *at);
            }
            ChangeEvent::Delete { item, at } => {
                tracing::trace!(target: targets::CONTROLLER, at = %at, "delete row");
                self.view.lock().delete_row(*at);
                observer.row_deleted(item, *at);
            }
            ChangeEvent::Update { item, at } => {
                tracing::trace!(target: targets::CONTROLLER, at = %at, "reload row");
                self.view.lock().reload_row(*at);
                observer.row_updated(item, *at);
            }
            ChangeEvent::Move { item, from, to } => {
                tracing::trace!(target: targets::CONTROLLER, from = %from, to = %to, "move row");
                self.view.lock().move_row(*from, *to);
                observer.row_moved(item, *from, *to);
            }
        }
    }

    fn on_batch_ended(&self) {
        self.affinity.debug_assert_same_thread_with_msg(
            "change batch delivered off the observing thread",
        );
        tracing::trace!(target: targets::CONTROLLER, "batch ended");
        self.view.lock().end_updates();
    }
}

/// RAII guards keeping the result-set connections alive.
///
/// Dropping these severs delivery before the result set itself is stopped,
/// so a half-torn-down controller can never receive an event.
struct ObservationGuards<T> {
    _batch_began: ConnectionGuard<()>,
    _changed: ConnectionGuard<ChangeEvent<T>>,
    _batch_ended: ConnectionGuard<()>,
}

/// Binds a grid-style view to a live store query.
///
/// The controller owns its result set exclusively; the store context and the
/// view are supplied at construction (dependency injection, no ambient
/// globals). See the [module documentation](self) for the lifecycle.
pub struct ListController<T, S, V>
where
    S: StoreContext<T>,
{
    context: Arc<S>,
    descriptor: Option<QueryDescriptor<T>>,
    result_set: Option<S::ResultSet>,
    guards: Option<ObservationGuards<T>>,
    inner: Arc<ControllerInner<T, V>>,
    menu: Vec<MenuAction>,
    refresh: Option<Arc<RefreshControl>>,
}

impl<T, S, V> ListController<T, S, V>
where
    T: 'static,
    S: StoreContext<T>,
    V: GridView + Send + 'static,
{
    /// Creates an unconfigured controller over the given store context and
    /// view. Call [`configure`](Self::configure) before first use.
    pub fn new(context: Arc<S>, view: V) -> Self {
        Self {
            context,
            descriptor: None,
            result_set: None,
            guards: None,
            inner: Arc::new(ControllerInner {
                view: Mutex::new(view),
                observer: RwLock::new(Arc::new(NoopObserver)),
                affinity: ThreadAffinity::current(),
            }),
            menu: Vec::new(),
            refresh: None,
        }
    }

    /// Sets the observer at construction time.
    pub fn with_observer(self, observer: Arc<dyn ListChangeObserver<T>>) -> Self {
        self.set_observer(observer);
        self
    }

    /// Replaces the change observer.
    pub fn set_observer(&self, observer: Arc<dyn ListChangeObserver<T>>) {
        *self.inner.observer.write() = observer;
    }

    /// Configures the controller: builds the query from the descriptor,
    /// executes it, and starts observing the resulting result set.
    ///
    /// On execution failure the error is reported through
    /// [`ListChangeObserver::fetch_failed`] and the controller is left with
    /// no result set (never partially populated), and this call never
    /// panics or returns the error.
    ///
    /// Configuring while a result set is live performs a full
    /// stop-then-restart: observation on the prior result set is severed
    /// before the new query runs, so two result sets can never interleave
    /// events into the same view.
    pub fn configure(&mut self, descriptor: QueryDescriptor<T>) {
        self.inner.affinity.debug_assert_same_thread_with_msg(
            "configure called off the observing thread",
        );
        self.teardown_observation();

        let query = descriptor.build();
        tracing::debug!(
            target: targets::CONTROLLER,
            entity = %query.entity(),
            "configuring controller"
        );
        self.descriptor = Some(descriptor);

        match self.context.execute(&query) {
            Ok(result_set) => self.start_observing(result_set),
            Err(error) => {
                tracing::warn!(
                    target: targets::CONTROLLER,
                    error = %error,
                    "initial query execution failed"
                );
                let observer = self.inner.observer.read().clone();
                observer.fetch_failed(&error);
            }
        }
    }

    fn start_observing(&mut self, result_set: S::ResultSet) {
        let inner = Arc::clone(&self.inner);
        let batch_began = result_set
            .signals()
            .batch_began
            .connect_scoped(move |_| inner.on_batch_began());

        let inner = Arc::clone(&self.inner);
        let changed = result_set
            .signals()
            .changed
            .connect_scoped(move |event| inner.on_change(event));

        let inner = Arc::clone(&self.inner);
        let batch_ended = result_set
            .signals()
            .batch_ended
            .connect_scoped(move |_| inner.on_batch_ended());

        self.guards = Some(ObservationGuards {
            _batch_began: batch_began,
            _changed: changed,
            _batch_ended: batch_ended,
        });
        self.result_set = Some(result_set);
    }

    /// `true` once a result set is live.
    pub fn is_configured(&self) -> bool {
        self.result_set.is_some()
    }

    /// The configured descriptor, if any.
    pub fn descriptor(&self) -> Option<&QueryDescriptor<T>> {
        self.descriptor.as_ref()
    }

    /// The live result set's section count; 0 while unconfigured.
    pub fn section_count(&self) -> usize {
        self.result_set.as_ref().map_or(0, |rs| rs.section_count())
    }

    /// The live result set's row count for a section; 0 while unconfigured.
    pub fn row_count(&self, section: usize) -> usize {
        self.result_set.as_ref().map_or(0, |rs| rs.row_count(section))
    }

    /// The item at a path, if configured and in range.
    pub fn item(&self, at: &IndexPath) -> Option<T> {
        self.result_set.as_ref().and_then(|rs| rs.item(at))
    }

    /// Locks and returns the view.
    ///
    /// Do not hold the guard across store mutations: change delivery locks
    /// the view to apply mutations.
    pub fn view(&self) -> MutexGuard<'_, V> {
        self.inner.view.lock()
    }

    // -------------------------------------------------------------------------
    // Contextual menu
    // -------------------------------------------------------------------------

    /// Registers the set of contextual actions available on long-press over
    /// a row, replacing any previous registration.
    pub fn add_context_menu(&mut self, actions: Vec<MenuAction>) {
        self.menu = actions;
    }

    /// The registered actions enabled for the given row, filtered through
    /// the observer's [`can_perform`](ListChangeObserver::can_perform)
    /// predicate. Empty when no menu is registered.
    pub fn context_menu_actions(&self, at: IndexPath) -> Vec<MenuAction> {
        let observer = self.inner.observer.read().clone();
        self.menu
            .iter()
            .filter(|action| observer.can_perform(action, at))
            .cloned()
            .collect()
    }

    // -------------------------------------------------------------------------
    // Pull to refresh
    // -------------------------------------------------------------------------

    /// Attaches a pull-to-refresh affordance wired to the given action and
    /// returns the control for further customization.
    ///
    /// Attaching when a control is already attached replaces it: exactly one
    /// control stays active, wired to the most recent action.
    pub fn attach_refresh_control<F>(&mut self, action: F) -> Arc<RefreshControl>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let control = Arc::new(RefreshControl::new(action));
        if self.refresh.replace(Arc::clone(&control)).is_some() {
            tracing::debug!(target: targets::CONTROLLER, "replaced refresh control");
        }
        control
    }

    /// Detaches the refresh control. No-op when none is attached.
    pub fn detach_refresh_control(&mut self) {
        self.refresh = None;
    }

    /// The attached refresh control, if any.
    pub fn refresh_control(&self) -> Option<&Arc<RefreshControl>> {
        self.refresh.as_ref()
    }
}

impl<T, S, V> ListController<T, S, V>
where
    S: StoreContext<T>,
{
    /// Severs delivery, then stops the result set. Order matters: the guards
    /// go first so a stop that races a pending emission cannot reach a
    /// half-torn-down controller.
    fn teardown_observation(&mut self) {
        self.guards = None;
        if let Some(result_set) = self.result_set.take() {
            result_set.stop_observing();
            tracing::debug!(target: targets::CONTROLLER, "stopped observation");
        }
    }
}

impl<T, S, V> Drop for ListController<T, S, V>
where
    S: StoreContext<T>,
{
    fn drop(&mut self) {
        self.teardown_observation();
    }
}
