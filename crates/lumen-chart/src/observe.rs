//! Observation layer: explicit publish/subscribe between mutable chart inputs
//! and the charts that draw them.
//!
//! Anything that can change implements [`Observable`] by owning a
//! [`Notifier`]. Subscribers implement [`ChangeObserver`] and are held weakly,
//! so a notifier never keeps a chart alive. [`CollectionDeepObserver`] watches
//! whole collections plus every item inside them and reduces all of that to a
//! single "something changed" callback.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::HashMap;

/// Identity of one subscriber. Subscribing the same id twice is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Membership change of an observed collection.
pub struct CollectionChange {
    /// Items that joined the collection.
    pub added: Vec<Rc<dyn Observable>>,
    /// Items that left the collection.
    pub removed: Vec<Rc<dyn Observable>>,
}

impl fmt::Debug for CollectionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionChange")
            .field("added", &self.added.len())
            .field("removed", &self.removed.len())
            .finish()
    }
}

/// A property of an observed item changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyChange {
    pub property: &'static str,
}

/// Receiver side of the observation layer.
pub trait ChangeObserver {
    /// Items were added to or removed from an observed collection.
    fn on_items_changed(&self, change: &CollectionChange);

    /// A property on an observed item changed.
    fn on_item_property_changed(&self, change: &PropertyChange);
}

/// Something that raises change notifications.
pub trait Observable {
    fn notifier(&self) -> &Notifier;
}

/// Subscriber list of one observable.
#[derive(Default)]
pub struct Notifier {
    observers: RefCell<Vec<(ObserverId, Weak<dyn ChangeObserver>)>>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber. Returns `false` if `id` was already subscribed.
    pub fn subscribe(&self, id: ObserverId, observer: Weak<dyn ChangeObserver>) -> bool {
        let mut observers = self.observers.borrow_mut();
        if observers.iter().any(|(existing, _)| *existing == id) {
            return false;
        }
        observers.push((id, observer));
        true
    }

    /// Remove a subscriber. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Number of live subscribers.
    pub fn observer_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|(_, observer)| observer.strong_count() > 0)
            .count()
    }

    pub fn notify_items_changed(&self, change: &CollectionChange) {
        for observer in self.live_observers() {
            observer.on_items_changed(change);
        }
    }

    pub fn notify_property_changed(&self, property: &'static str) {
        let change = PropertyChange { property };
        for observer in self.live_observers() {
            observer.on_item_property_changed(&change);
        }
    }

    // Snapshot so callbacks are free to subscribe or unsubscribe.
    fn live_observers(&self) -> Vec<Rc<dyn ChangeObserver>> {
        let mut observers = self.observers.borrow_mut();
        observers.retain(|(_, observer)| observer.strong_count() > 0);
        observers
            .iter()
            .filter_map(|(_, observer)| observer.upgrade())
            .collect()
    }
}

// =============================================================================
// Collections
// =============================================================================

/// Ordered collection that reports membership changes.
///
/// Items are shared (`Rc<T>`) so callers can keep a handle and mutate an item
/// after inserting it.
pub struct ObservableCollection<T> {
    items: RefCell<Vec<Rc<T>>>,
    notifier: Notifier,
}

impl<T> Default for ObservableCollection<T> {
    fn default() -> Self {
        Self {
            items: RefCell::new(Vec::new()),
            notifier: Notifier::new(),
        }
    }
}

impl<T> fmt::Debug for ObservableCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableCollection")
            .field("len", &self.items.borrow().len())
            .field("notifier", &self.notifier)
            .finish()
    }
}

impl<T: Observable + 'static> ObservableCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection without raising notifications.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: RefCell::new(items.into_iter().map(Rc::new).collect()),
            notifier: Notifier::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rc<T>> {
        self.items.borrow().get(index).cloned()
    }

    /// Clone of the current item handles.
    pub fn snapshot(&self) -> Vec<Rc<T>> {
        self.items.borrow().clone()
    }

    /// Index of an item by identity.
    pub fn position(&self, item: &Rc<T>) -> Option<usize> {
        self.items
            .borrow()
            .iter()
            .position(|existing| Rc::ptr_eq(existing, item))
    }

    pub fn push(&self, item: impl Into<Rc<T>>) {
        let item = item.into();
        self.items.borrow_mut().push(item.clone());
        self.emit(vec![item], Vec::new());
    }

    /// Insert at `index`, clamped to the current length.
    pub fn insert(&self, index: usize, item: impl Into<Rc<T>>) {
        let item = item.into();
        {
            let mut items = self.items.borrow_mut();
            let index = index.min(items.len());
            items.insert(index, item.clone());
        }
        self.emit(vec![item], Vec::new());
    }

    /// Append many items with a single notification.
    pub fn extend<I>(&self, items: I)
    where
        I: IntoIterator,
        I::Item: Into<Rc<T>>,
    {
        let added: Vec<Rc<T>> = items.into_iter().map(Into::into).collect();
        if added.is_empty() {
            return;
        }
        self.items.borrow_mut().extend(added.iter().cloned());
        self.emit(added, Vec::new());
    }

    pub fn remove(&self, index: usize) -> Option<Rc<T>> {
        let removed = {
            let mut items = self.items.borrow_mut();
            if index >= items.len() {
                return None;
            }
            items.remove(index)
        };
        self.emit(Vec::new(), vec![removed.clone()]);
        Some(removed)
    }

    /// Swap the item at `index`, returning the previous one.
    pub fn replace(&self, index: usize, item: impl Into<Rc<T>>) -> Option<Rc<T>> {
        let item = item.into();
        let old = {
            let mut items = self.items.borrow_mut();
            let slot = items.get_mut(index)?;
            std::mem::replace(slot, item.clone())
        };
        self.emit(vec![item], vec![old.clone()]);
        Some(old)
    }

    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.items.borrow_mut());
        if removed.is_empty() {
            return;
        }
        self.emit(Vec::new(), removed);
    }

    fn emit(&self, added: Vec<Rc<T>>, removed: Vec<Rc<T>>) {
        let change = CollectionChange {
            added: added
                .into_iter()
                .map(|item| item as Rc<dyn Observable>)
                .collect(),
            removed: removed
                .into_iter()
                .map(|item| item as Rc<dyn Observable>)
                .collect(),
        };
        self.notifier.notify_items_changed(&change);
    }
}

impl<T> Observable for ObservableCollection<T> {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

// =============================================================================
// Deep observer
// =============================================================================

/// Observes collections and every item inside them.
///
/// Membership changes move item subscriptions to the new members before the
/// callback runs. Items present several times are subscribed once and only
/// released when their last occurrence leaves.
pub struct CollectionDeepObserver {
    id: ObserverId,
    this: Weak<CollectionDeepObserver>,
    on_change: Box<dyn Fn()>,
    collections: RefCell<Vec<Weak<dyn Observable>>>,
    items: RefCell<HashMap<usize, TrackedItem>>,
    disposed: Cell<bool>,
}

struct TrackedItem {
    item: Weak<dyn Observable>,
    occurrences: usize,
}

impl fmt::Debug for CollectionDeepObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionDeepObserver")
            .field("id", &self.id)
            .field("collections", &self.collections.borrow().len())
            .field("items", &self.items.borrow().len())
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

impl CollectionDeepObserver {
    pub fn new(on_change: impl Fn() + 'static) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            id: ObserverId::next(),
            this: this.clone(),
            on_change: Box::new(on_change),
            collections: RefCell::new(Vec::new()),
            items: RefCell::new(HashMap::default()),
            disposed: Cell::new(false),
        })
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Number of distinct items currently subscribed to.
    pub fn tracked_items(&self) -> usize {
        self.items.borrow().len()
    }

    /// Start observing a collection and its current items.
    pub fn observe<T: Observable + 'static>(&self, collection: &Rc<ObservableCollection<T>>) {
        if self.disposed.get() {
            return;
        }
        if collection.notifier().subscribe(self.id, self.weak_observer()) {
            let weak: Weak<dyn Observable> = Rc::downgrade(collection) as Weak<dyn Observable>;
            self.collections.borrow_mut().push(weak);
            for item in collection.snapshot() {
                self.track(item);
            }
        }
    }

    /// Stop observing a collection and release its items.
    pub fn unobserve<T: Observable + 'static>(&self, collection: &Rc<ObservableCollection<T>>) {
        if !collection.notifier().unsubscribe(self.id) {
            return;
        }
        let key = Rc::as_ptr(collection) as *const () as usize;
        self.collections
            .borrow_mut()
            .retain(|weak| weak_key(weak) != key);
        for item in collection.snapshot() {
            self.untrack(&(item as Rc<dyn Observable>));
        }
    }

    /// Release every subscription. Later notifications are ignored.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        for collection in self.collections.borrow_mut().drain(..) {
            if let Some(collection) = collection.upgrade() {
                collection.notifier().unsubscribe(self.id);
            }
        }
        for (_, tracked) in self.items.borrow_mut().drain() {
            if let Some(item) = tracked.item.upgrade() {
                item.notifier().unsubscribe(self.id);
            }
        }
    }

    fn weak_observer(&self) -> Weak<dyn ChangeObserver> {
        self.this.clone() as Weak<dyn ChangeObserver>
    }

    fn track(&self, item: Rc<dyn Observable>) {
        let key = item_key(&item);
        let mut items = self.items.borrow_mut();
        if let Some(tracked) = items.get_mut(&key) {
            tracked.occurrences += 1;
            return;
        }
        item.notifier().subscribe(self.id, self.weak_observer());
        items.insert(
            key,
            TrackedItem {
                item: Rc::downgrade(&item),
                occurrences: 1,
            },
        );
    }

    fn untrack(&self, item: &Rc<dyn Observable>) {
        let key = item_key(item);
        let mut items = self.items.borrow_mut();
        let Some(tracked) = items.get_mut(&key) else {
            return;
        };
        tracked.occurrences -= 1;
        if tracked.occurrences == 0 {
            items.remove(&key);
            item.notifier().unsubscribe(self.id);
        }
    }
}

impl ChangeObserver for CollectionDeepObserver {
    fn on_items_changed(&self, change: &CollectionChange) {
        if self.disposed.get() {
            return;
        }
        for item in &change.removed {
            self.untrack(item);
        }
        for item in &change.added {
            self.track(item.clone());
        }
        (self.on_change)();
    }

    fn on_item_property_changed(&self, _change: &PropertyChange) {
        if self.disposed.get() {
            return;
        }
        (self.on_change)();
    }
}

impl Drop for CollectionDeepObserver {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn item_key(item: &Rc<dyn Observable>) -> usize {
    Rc::as_ptr(item) as *const () as usize
}

fn weak_key(weak: &Weak<dyn Observable>) -> usize {
    weak.as_ptr() as *const () as usize
}
