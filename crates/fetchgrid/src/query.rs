//! Query descriptors: entity, filter, sort, and cache configuration.
//!
//! A [`QueryDescriptor`] is the builder a screen hands to its controller; it
//! describes which entity to observe, an optional filter predicate, the sort
//! order, and an optional result-cache name. [`QueryDescriptor::build`]
//! produces the executable [`Query`] that a [`StoreContext`] runs.
//!
//! [`StoreContext`]: crate::StoreContext
//!
//! # Example
//!
//! ```
//! use fetchgrid::{QueryDescriptor, SortDescriptor};
//!
//! #[derive(Clone, PartialEq)]
//! struct Item { name: String, order: i64 }
//!
//! let descriptor = QueryDescriptor::<Item>::for_entity_named("Item")
//!     .filter(|item| item.order >= 0)
//!     .sort(SortDescriptor::ascending_by_key("order", |item: &Item| item.order))
//!     .cache_name("items-by-order");
//! let query = descriptor.build();
//! assert_eq!(query.entity().name(), "Item");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Identifies the entity a query runs against, by type or by name string.
///
/// Typed references use the short type name (the final path segment), so
/// `EntityRef::of::<my_app::Item>()` matches `EntityRef::named("Item")`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityRef {
    name: String,
}

impl EntityRef {
    /// Creates an entity reference from a Rust type.
    pub fn of<T: 'static>() -> Self {
        let full = std::any::type_name::<T>();
        // Strip the module path for readability and name-based matching
        let short = full.rsplit("::").next().unwrap_or(full);
        Self { name: short.to_string() }
    }

    /// Creates an entity reference by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the entity name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A filter predicate over items of type `T`.
///
/// Returns `true` if the item belongs in the result set.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A pure transformation applied to the built query before execution.
pub type QueryCustomizer<T> = Arc<dyn Fn(Query<T>) -> Query<T> + Send + Sync>;

type CompareFn<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// A single ordering criterion: a named key, a direction, and a comparator.
///
/// Several descriptors apply in order with lexicographic tie-breaking.
pub struct SortDescriptor<T> {
    key: String,
    ascending: bool,
    compare: CompareFn<T>,
}

impl<T> SortDescriptor<T> {
    /// Creates an ascending sort on an extracted key.
    ///
    /// # Example
    ///
    /// ```
    /// use fetchgrid::SortDescriptor;
    ///
    /// let by_len = SortDescriptor::ascending_by_key("len", |s: &String| s.len());
    /// assert!(by_len.is_ascending());
    /// ```
    pub fn ascending_by_key<K, F>(key: impl Into<String>, extract: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            ascending: true,
            compare: Arc::new(move |a, b| extract(a).cmp(&extract(b))),
        }
    }

    /// Creates a descending sort on an extracted key.
    pub fn descending_by_key<K, F>(key: impl Into<String>, extract: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            ascending: false,
            compare: Arc::new(move |a, b| extract(b).cmp(&extract(a))),
        }
    }

    /// Creates a sort from an explicit comparator.
    ///
    /// The comparator is used as given; `ascending` is descriptive only.
    pub fn with_comparator<F>(key: impl Into<String>, ascending: bool, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            ascending,
            compare: Arc::new(compare),
        }
    }

    /// Returns the key name this descriptor sorts on.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns `true` if this descriptor sorts ascending.
    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    /// Compares two items under this descriptor.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.compare)(a, b)
    }
}

impl<T> Clone for SortDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            ascending: self.ascending,
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<T> fmt::Debug for SortDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortDescriptor")
            .field("key", &self.key)
            .field("ascending", &self.ascending)
            .finish()
    }
}

/// The built, executable query: entity, optional filter, sort order, and an
/// optional result-cache name.
///
/// Pure value type; executing it is the store's job.
pub struct Query<T> {
    entity: EntityRef,
    predicate: Option<Predicate<T>>,
    sort: Vec<SortDescriptor<T>>,
    cache_name: Option<String>,
}

impl<T> Query<T> {
    /// Returns the entity this query runs against.
    pub fn entity(&self) -> &EntityRef {
        &self.entity
    }

    /// Returns the result-cache name, if any.
    pub fn cache_name(&self) -> Option<&str> {
        self.cache_name.as_deref()
    }

    /// Returns the sort descriptors in application order.
    pub fn sort_descriptors(&self) -> &[SortDescriptor<T>] {
        &self.sort
    }

    /// Returns `true` if the item passes the filter predicate.
    ///
    /// A query without a predicate matches everything.
    pub fn matches(&self, item: &T) -> bool {
        self.predicate.as_ref().is_none_or(|p| p(item))
    }

    /// Compares two items under the query's sort order.
    ///
    /// Descriptors apply lexicographically; without descriptors everything
    /// compares equal (store order is preserved).
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        for descriptor in &self.sort {
            match descriptor.compare(a, b) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }

    /// Replaces the entity reference. Intended for customization functions.
    pub fn with_entity(mut self, entity: EntityRef) -> Self {
        self.entity = entity;
        self
    }

    /// Replaces the filter predicate. Intended for customization functions.
    pub fn with_filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Appends a sort descriptor. Intended for customization functions.
    pub fn with_sort(mut self, descriptor: SortDescriptor<T>) -> Self {
        self.sort.push(descriptor);
        self
    }

    /// Replaces the cache name. Intended for customization functions.
    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = Some(name.into());
        self
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity.clone(),
            predicate: self.predicate.clone(),
            sort: self.sort.clone(),
            cache_name: self.cache_name.clone(),
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("entity", &self.entity)
            .field("filtered", &self.predicate.is_some())
            .field("sort", &self.sort)
            .field("cache_name", &self.cache_name)
            .finish()
    }
}

/// Builder for a [`Query`].
///
/// A controller expects exactly one descriptor to be configured per instance;
/// configuring none leaves it non-functional, configuring again replaces the
/// previous observation wholesale.
pub struct QueryDescriptor<T> {
    entity: EntityRef,
    predicate: Option<Predicate<T>>,
    sort: Vec<SortDescriptor<T>>,
    cache_name: Option<String>,
    customize: Option<QueryCustomizer<T>>,
}

impl<T> QueryDescriptor<T> {
    /// Creates a descriptor for the entity matching the Rust type `T`.
    pub fn for_entity() -> Self
    where
        T: 'static,
    {
        Self::with_entity_ref(EntityRef::of::<T>())
    }

    /// Creates a descriptor for a named entity.
    pub fn for_entity_named(name: impl Into<String>) -> Self {
        Self::with_entity_ref(EntityRef::named(name))
    }

    fn with_entity_ref(entity: EntityRef) -> Self {
        Self {
            entity,
            predicate: None,
            sort: Vec::new(),
            cache_name: None,
            customize: None,
        }
    }

    /// Sets the filter predicate.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Appends a sort descriptor.
    pub fn sort(mut self, descriptor: SortDescriptor<T>) -> Self {
        self.sort.push(descriptor);
        self
    }

    /// Sets the result-cache name.
    pub fn cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = Some(name.into());
        self
    }

    /// Sets a pure customization function applied to the built query before
    /// execution.
    ///
    /// The function receives the query built from this descriptor and returns
    /// the query to execute; it must not have side effects.
    pub fn customize<F>(mut self, customize: F) -> Self
    where
        F: Fn(Query<T>) -> Query<T> + Send + Sync + 'static,
    {
        self.customize = Some(Arc::new(customize));
        self
    }

    /// Returns the entity this descriptor targets.
    pub fn entity(&self) -> &EntityRef {
        &self.entity
    }

    /// Builds the executable query, applying the customization function last.
    pub fn build(&self) -> Query<T> {
        let query = Query {
            entity: self.entity.clone(),
            predicate: self.predicate.clone(),
            sort: self.sort.clone(),
            cache_name: self.cache_name.clone(),
        };
        match &self.customize {
            Some(customize) => customize(query),
            None => query,
        }
    }
}

impl<T> fmt::Debug for QueryDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDescriptor")
            .field("entity", &self.entity)
            .field("filtered", &self.predicate.is_some())
            .field("sort", &self.sort)
            .field("cache_name", &self.cache_name)
            .field("customized", &self.customize.is_some())
            .finish()
    }
}
