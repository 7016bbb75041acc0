//! In-memory reference store.
//!
//! [`MemoryStore`] is a single-entity [`StoreContext`] implementation that
//! keeps its live result sets current the way a fetched-results layer does:
//! every store mutation opens a batch on each affected result set, delivers
//! the minimal row-level change, and closes the batch. It exists to exercise
//! the controller against a working collaborator; it is not a persistence
//! engine.
//!
//! All result sets produced by this store have a single section (section 0).
//!
//! # Example
//!
//! ```
//! use fetchgrid::{MemoryStore, QueryDescriptor, SortDescriptor, StoreContext, ResultSet};
//!
//! let store = MemoryStore::new("Item");
//! store.insert(3u32);
//! store.insert(1u32);
//!
//! let query = QueryDescriptor::<u32>::for_entity_named("Item")
//!     .sort(SortDescriptor::ascending_by_key("value", |n: &u32| *n))
//!     .build();
//! let results = store.execute(&query).unwrap();
//! assert_eq!(results.row_count(0), 2);
//! assert_eq!(results.item(&fetchgrid::IndexPath::new(0, 0)), Some(1));
//! ```

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use fetchgrid_core::logging::targets;
use parking_lot::{Mutex, RwLock};

use crate::path::IndexPath;
use crate::query::{EntityRef, Query};
use crate::store::{ChangeEvent, ResultSet, ResultSetSignals, StoreContext, StoreError, StoreResult};

/// A single-entity, in-memory store that maintains live result sets.
///
/// Mutations go through the store's API (`insert`, `remove_at`, `update_at`,
/// ...); each one recomputes the minimal row change for every live result set
/// and delivers it as a bracketed batch. Mutating items behind the store's
/// back is the caller bug the result-set contract does not defend against.
pub struct MemoryStore<T> {
    entity: EntityRef,
    items: RwLock<Vec<T>>,
    live: Mutex<Vec<Weak<LiveState<T>>>>,
}

impl<T: Clone + PartialEq + 'static> MemoryStore<T> {
    /// Creates an empty store serving the named entity.
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity: EntityRef::named(entity_name),
            items: RwLock::new(Vec::new()),
            live: Mutex::new(Vec::new()),
        }
    }

    /// Creates a store seeded with items.
    pub fn with_items(entity_name: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            entity: EntityRef::named(entity_name),
            items: RwLock::new(items),
            live: Mutex::new(Vec::new()),
        }
    }

    /// Returns the entity this store serves.
    pub fn entity(&self) -> &EntityRef {
        &self.entity
    }

    /// Returns the number of stored items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Inserts one item, notifying live result sets.
    pub fn insert(&self, item: T) {
        self.items.write().push(item.clone());
        for state in self.live_states() {
            let events: Vec<_> = state.apply_insert(&item).into_iter().collect();
            state.signals.emit_batch(&events);
        }
    }

    /// Inserts several items, delivering one batch per live result set.
    pub fn insert_many(&self, items: Vec<T>) {
        self.items.write().extend(items.iter().cloned());
        for state in self.live_states() {
            let events: Vec<_> =
                items.iter().filter_map(|item| state.apply_insert(item)).collect();
            state.signals.emit_batch(&events);
        }
    }

    /// Removes the item at the given store position, notifying live result
    /// sets. Returns the removed item, or `None` when out of range.
    pub fn remove_at(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.items.write();
            if index < items.len() { Some(items.remove(index)) } else { None }
        }?;
        for state in self.live_states() {
            let events: Vec<_> = state.apply_remove(&removed).into_iter().collect();
            state.signals.emit_batch(&events);
        }
        Some(removed)
    }

    /// Removes every item matching the predicate, delivering one batch per
    /// live result set. Returns the number of removed items.
    pub fn remove_where(&self, predicate: impl Fn(&T) -> bool) -> usize {
        let removed: Vec<T> = {
            let mut items = self.items.write();
            let mut kept = Vec::with_capacity(items.len());
            let mut removed = Vec::new();
            for item in items.drain(..) {
                if predicate(&item) {
                    removed.push(item);
                } else {
                    kept.push(item);
                }
            }
            *items = kept;
            removed
        };
        for state in self.live_states() {
            let events: Vec<_> =
                removed.iter().filter_map(|item| state.apply_remove(item)).collect();
            state.signals.emit_batch(&events);
        }
        removed.len()
    }

    /// Mutates the item at the given store position in place, notifying live
    /// result sets with an update, move, insert, or delete depending on how
    /// the change affects each query. Returns `false` when out of range.
    pub fn update_at(&self, index: usize, mutate: impl FnOnce(&mut T)) -> bool {
        let (old, new) = {
            let mut items = self.items.write();
            let Some(slot) = items.get_mut(index) else {
                return false;
            };
            let old = slot.clone();
            mutate(slot);
            (old, slot.clone())
        };
        for state in self.live_states() {
            let events: Vec<_> = state.apply_update(&old, &new).into_iter().collect();
            state.signals.emit_batch(&events);
        }
        true
    }

    /// Snapshot of the current items in store order.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.read().clone()
    }

    /// Upgrades the live result-set list, pruning dead or stopped entries.
    fn live_states(&self) -> Vec<Arc<LiveState<T>>> {
        let mut live = self.live.lock();
        live.retain(|weak| weak.upgrade().is_some_and(|state| !state.is_stopped()));
        live.iter().filter_map(Weak::upgrade).collect()
    }
}

impl<T: Clone + PartialEq + 'static> StoreContext<T> for MemoryStore<T> {
    type ResultSet = MemoryResultSet<T>;

    fn execute(&self, query: &Query<T>) -> StoreResult<MemoryResultSet<T>> {
        if query.entity() != &self.entity {
            return Err(StoreError::UnknownEntity {
                requested: query.entity().name().to_string(),
                available: self.entity.name().to_string(),
            });
        }

        let mut rows: Vec<T> =
            self.items.read().iter().filter(|item| query.matches(item)).cloned().collect();
        rows.sort_by(|a, b| query.compare(a, b));

        tracing::debug!(
            target: targets::MEMORY,
            entity = %self.entity,
            rows = rows.len(),
            cache_name = query.cache_name(),
            "executed query"
        );

        let state = Arc::new(LiveState {
            query: query.clone(),
            rows: RwLock::new(rows),
            signals: ResultSetSignals::new(),
            stopped: AtomicBool::new(false),
        });
        self.live.lock().push(Arc::downgrade(&state));
        Ok(MemoryResultSet { state })
    }
}

/// Live maintenance state shared between the store and a result set.
struct LiveState<T> {
    query: Query<T>,
    /// Materialized rows in query sort order. Single section.
    rows: RwLock<Vec<T>>,
    signals: ResultSetSignals<T>,
    stopped: AtomicBool,
}

impl<T: Clone + PartialEq> LiveState<T> {
    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Stable insertion point: after any run of equal-sorting rows.
    fn insertion_point(rows: &[T], query: &Query<T>, item: &T) -> usize {
        rows.partition_point(|row| query.compare(row, item) != CmpOrdering::Greater)
    }

    fn apply_insert(&self, item: &T) -> Option<ChangeEvent<T>> {
        if !self.query.matches(item) {
            return None;
        }
        let mut rows = self.rows.write();
        let at = Self::insertion_point(&rows, &self.query, item);
        rows.insert(at, item.clone());
        Some(ChangeEvent::Insert { item: item.clone(), at: IndexPath::new(0, at) })
    }

    fn apply_remove(&self, item: &T) -> Option<ChangeEvent<T>> {
        let mut rows = self.rows.write();
        let at = rows.iter().position(|row| row == item)?;
        rows.remove(at);
        Some(ChangeEvent::Delete { item: item.clone(), at: IndexPath::new(0, at) })
    }

    fn apply_update(&self, old: &T, new: &T) -> Option<ChangeEvent<T>> {
        let mut rows = self.rows.write();
        let was_at = rows.iter().position(|row| row == old);
        let now_matches = self.query.matches(new);

        match (was_at, now_matches) {
            // Still in the set: reposition under the sort order.
            (Some(from), true) => {
                rows.remove(from);
                let to = Self::insertion_point(&rows, &self.query, new);
                rows.insert(to, new.clone());
                if to == from {
                    Some(ChangeEvent::Update { item: new.clone(), at: IndexPath::new(0, from) })
                } else {
                    Some(ChangeEvent::Move {
                        item: new.clone(),
                        from: IndexPath::new(0, from),
                        to: IndexPath::new(0, to),
                    })
                }
            }
            // Fell out of the filter.
            (Some(from), false) => {
                rows.remove(from);
                Some(ChangeEvent::Delete { item: old.clone(), at: IndexPath::new(0, from) })
            }
            // Entered the filter.
            (None, true) => {
                let at = Self::insertion_point(&rows, &self.query, new);
                rows.insert(at, new.clone());
                Some(ChangeEvent::Insert { item: new.clone(), at: IndexPath::new(0, at) })
            }
            (None, false) => None,
        }
    }
}

/// The observed result set produced by [`MemoryStore`].
///
/// Single-section; owned exclusively by its controller. Dropping it stops
/// observation.
pub struct MemoryResultSet<T> {
    state: Arc<LiveState<T>>,
}

impl<T> std::fmt::Debug for MemoryResultSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryResultSet").finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq> ResultSet<T> for MemoryResultSet<T> {
    fn section_count(&self) -> usize {
        1
    }

    fn row_count(&self, section: usize) -> usize {
        if section == 0 { self.state.rows.read().len() } else { 0 }
    }

    fn item(&self, at: &IndexPath) -> Option<T> {
        if at.section() != 0 {
            return None;
        }
        self.state.rows.read().get(at.row()).cloned()
    }

    fn signals(&self) -> &ResultSetSignals<T> {
        &self.state.signals
    }

    fn stop_observing(&self) {
        self.state.stopped.store(true, Ordering::SeqCst);
    }
}

impl<T> Drop for MemoryResultSet<T> {
    fn drop(&mut self) {
        self.state.stopped.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryDescriptor, SortDescriptor};
    use parking_lot::Mutex as PMutex;
    use std::sync::Arc;

    #[derive(Clone, PartialEq, Debug)]
    struct Item {
        name: String,
        order: i64,
    }

    fn item(name: &str, order: i64) -> Item {
        Item { name: name.to_string(), order }
    }

    fn by_order() -> SortDescriptor<Item> {
        SortDescriptor::ascending_by_key("order", |i: &Item| i.order)
    }

    fn collect_events(
        results: &MemoryResultSet<Item>,
    ) -> Arc<PMutex<Vec<ChangeEvent<Item>>>> {
        let events = Arc::new(PMutex::new(Vec::new()));
        let events_clone = events.clone();
        results.signals().changed.connect(move |event| {
            events_clone.lock().push(event.clone());
        });
        events
    }

    #[test]
    fn test_execute_filters_and_sorts() {
        let store = MemoryStore::with_items(
            "Item",
            vec![item("c", 3), item("a", 1), item("x", -1), item("b", 2)],
        );
        let query = QueryDescriptor::<Item>::for_entity_named("Item")
            .filter(|i| i.order > 0)
            .sort(by_order())
            .build();

        let results = store.execute(&query).unwrap();
        assert_eq!(results.section_count(), 1);
        assert_eq!(results.row_count(0), 3);
        assert_eq!(results.total_count(), 3);
        assert_eq!(results.item(&IndexPath::new(0, 0)), Some(item("a", 1)));
        assert_eq!(results.item(&IndexPath::new(0, 2)), Some(item("c", 3)));
        assert_eq!(results.item(&IndexPath::new(1, 0)), None);
    }

    #[test]
    fn test_execute_rejects_unknown_entity() {
        let store = MemoryStore::<Item>::new("Item");
        let query = QueryDescriptor::<Item>::for_entity_named("Order").build();
        let err = store.execute(&query).unwrap_err();
        assert!(matches!(err, StoreError::UnknownEntity { .. }));
    }

    #[test]
    fn test_insert_emits_at_sorted_position() {
        let store = MemoryStore::with_items("Item", vec![item("a", 1), item("c", 3)]);
        let query =
            QueryDescriptor::<Item>::for_entity_named("Item").sort(by_order()).build();
        let results = store.execute(&query).unwrap();
        let events = collect_events(&results);

        store.insert(item("b", 2));

        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            ChangeEvent::Insert { item: item("b", 2), at: IndexPath::new(0, 1) }
        );
        assert_eq!(results.row_count(0), 3);
    }

    #[test]
    fn test_insert_outside_filter_is_silent() {
        let store = MemoryStore::<Item>::new("Item");
        let query = QueryDescriptor::<Item>::for_entity_named("Item")
            .filter(|i| i.order > 0)
            .sort(by_order())
            .build();
        let results = store.execute(&query).unwrap();
        let events = collect_events(&results);

        store.insert(item("hidden", -1));

        assert!(events.lock().is_empty());
        assert_eq!(results.row_count(0), 0);
    }

    #[test]
    fn test_remove_emits_delete() {
        let store = MemoryStore::with_items("Item", vec![item("a", 1), item("b", 2)]);
        let query =
            QueryDescriptor::<Item>::for_entity_named("Item").sort(by_order()).build();
        let results = store.execute(&query).unwrap();
        let events = collect_events(&results);

        assert_eq!(store.remove_at(0), Some(item("a", 1)));

        let events = events.lock();
        assert_eq!(
            events[0],
            ChangeEvent::Delete { item: item("a", 1), at: IndexPath::new(0, 0) }
        );
        assert_eq!(results.row_count(0), 1);
    }

    #[test]
    fn test_update_in_place_emits_update() {
        let store = MemoryStore::with_items("Item", vec![item("a", 1), item("b", 2)]);
        let query =
            QueryDescriptor::<Item>::for_entity_named("Item").sort(by_order()).build();
        let results = store.execute(&query).unwrap();
        let events = collect_events(&results);

        store.update_at(0, |i| i.name = "renamed".to_string());

        let events = events.lock();
        assert_eq!(
            events[0],
            ChangeEvent::Update { item: item("renamed", 1), at: IndexPath::new(0, 0) }
        );
    }

    #[test]
    fn test_update_changing_sort_key_emits_move() {
        let store =
            MemoryStore::with_items("Item", vec![item("a", 1), item("b", 2), item("c", 3)]);
        let query =
            QueryDescriptor::<Item>::for_entity_named("Item").sort(by_order()).build();
        let results = store.execute(&query).unwrap();
        let events = collect_events(&results);

        // "a" jumps past "c"
        store.update_at(0, |i| i.order = 9);

        let events = events.lock();
        assert_eq!(
            events[0],
            ChangeEvent::Move {
                item: item("a", 9),
                from: IndexPath::new(0, 0),
                to: IndexPath::new(0, 2),
            }
        );
        assert_eq!(results.item(&IndexPath::new(0, 2)), Some(item("a", 9)));
    }

    #[test]
    fn test_update_flipping_predicate_membership() {
        let store = MemoryStore::with_items("Item", vec![item("a", 1), item("b", -2)]);
        let query = QueryDescriptor::<Item>::for_entity_named("Item")
            .filter(|i| i.order > 0)
            .sort(by_order())
            .build();
        let results = store.execute(&query).unwrap();
        let events = collect_events(&results);

        // "a" falls out of the filter
        store.update_at(0, |i| i.order = -1);
        // "b" enters it
        store.update_at(1, |i| i.order = 5);

        let events = events.lock();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ChangeEvent::Delete { .. }));
        assert_eq!(
            events[1],
            ChangeEvent::Insert { item: item("b", 5), at: IndexPath::new(0, 0) }
        );
        assert_eq!(results.row_count(0), 1);
    }

    #[test]
    fn test_insert_many_delivers_single_batch() {
        let store = MemoryStore::<Item>::new("Item");
        let query =
            QueryDescriptor::<Item>::for_entity_named("Item").sort(by_order()).build();
        let results = store.execute(&query).unwrap();

        let batches = Arc::new(PMutex::new(0usize));
        let batches_clone = batches.clone();
        results.signals().batch_began.connect(move |_| *batches_clone.lock() += 1);

        store.insert_many(vec![item("a", 1), item("b", 2), item("c", 3)]);

        assert_eq!(*batches.lock(), 1);
        assert_eq!(results.row_count(0), 3);
    }

    #[test]
    fn test_stopped_result_set_receives_nothing() {
        let store = MemoryStore::<Item>::new("Item");
        let query = QueryDescriptor::<Item>::for_entity_named("Item").build();
        let results = store.execute(&query).unwrap();
        let events = collect_events(&results);

        results.stop_observing();
        store.insert(item("a", 1));

        assert!(events.lock().is_empty());
        // The live list prunes the stopped entry on the next mutation.
        store.insert(item("b", 2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_where_batches_deletes() {
        let store = MemoryStore::with_items(
            "Item",
            vec![item("a", 1), item("b", 2), item("c", 3), item("d", 4)],
        );
        let query =
            QueryDescriptor::<Item>::for_entity_named("Item").sort(by_order()).build();
        let results = store.execute(&query).unwrap();
        let events = collect_events(&results);

        let removed = store.remove_where(|i| i.order % 2 == 0);

        assert_eq!(removed, 2);
        let events = events.lock();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind() == crate::store::ChangeKind::Delete));
        assert_eq!(results.row_count(0), 2);
    }
}
