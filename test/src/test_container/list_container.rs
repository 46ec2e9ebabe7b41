use std::{
    ops::Range,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
};

use serde_json::{json, Value};

use gridsync_shared::{
    ConstantProperty, Container, Indexed, Item, ItemSetChange, ItemSetChangeListener,
    ItemSetChangeNotifier, ListenerError, ListenerId, Listeners, ObservableProperty, Property,
    PropertysetItem,
};

/// One row of a ListContainer. `name` and `value` are observable, `static`
/// never changes and cannot be observed.
pub struct TestRow {
    id: u64,
    item: Arc<PropertysetItem>,
    name: Arc<ObservableProperty>,
    value: Arc<ObservableProperty>,
}

impl TestRow {
    fn new(id: u64) -> Self {
        let name = Arc::new(ObservableProperty::new(format!("item {}", id)));
        let value = Arc::new(ObservableProperty::new(id));
        let item = PropertysetItem::new();
        item.add_property("name", name.clone());
        item.add_property("value", value.clone());
        item.add_property("static", Arc::new(ConstantProperty::new(json!({ "id": id }))));

        Self {
            id,
            item: Arc::new(item),
            name,
            value,
        }
    }

    fn listener_count(&self) -> usize {
        self.name.listener_count() + self.value.listener_count()
    }
}

/// An indexed, observable in-memory container with `u64` item ids.
///
/// Every mutation that changes the row order announces itself to attached
/// ItemSetChangeListeners, the way a real data source would.
#[derive(Default)]
pub struct ListContainer {
    rows: RwLock<Vec<TestRow>>,
    listeners: Listeners<dyn ItemSetChangeListener>,
    indexed_reads: AtomicUsize,
}

impl ListContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A container holding the ids `0..count`
    pub fn with_items(count: u64) -> Arc<Self> {
        let container = Self::new();
        container.rows_mut().extend((0..count).map(TestRow::new));
        Arc::new(container)
    }

    // Structural changes

    /// Inserts the ids in `item_ids` at `index`, announced as one change
    pub fn insert_items(&self, index: usize, item_ids: Range<u64>) {
        let count = item_ids.clone().count();
        {
            let mut rows = self.rows_mut();
            let tail = rows.split_off(index);
            rows.extend(item_ids.map(TestRow::new));
            rows.extend(tail);
        }
        self.fire(ItemSetChange::ItemAdd {
            first_index: index,
            count,
        });
    }

    /// Appends one id to the end of the container
    pub fn add_item(&self, item_id: u64) {
        let index = self.size();
        self.insert_items(index, item_id..item_id + 1);
    }

    /// Removes `count` rows starting at `index`, announced as one change
    pub fn remove_items(&self, index: usize, count: usize) {
        self.rows_mut().drain(index..index + count);
        self.fire(ItemSetChange::ItemRemove {
            first_index: index,
            count,
        });
    }

    /// Removes one id wherever it is. Returns false if it is not present.
    pub fn remove_item(&self, item_id: u64) -> bool {
        let Some(index) = self.index_of(item_id) else {
            return false;
        };
        self.remove_items(index, 1);
        true
    }

    /// Replaces the whole content, announced as an opaque change
    pub fn replace_all(&self, item_ids: Range<u64>) {
        *self.rows_mut() = item_ids.map(TestRow::new).collect();
        self.fire_unstructured();
    }

    /// Reorders rows in place, announced as an opaque change
    pub fn reverse(&self) {
        self.rows_mut().reverse();
        self.fire_unstructured();
    }

    pub fn fire_unstructured(&self) {
        self.fire(ItemSetChange::Unstructured);
    }

    // Content changes

    pub fn set_name(&self, item_id: u64, name: &str) {
        if let Some(property) = self.property_of(item_id, |row| row.name.clone()) {
            property.set_value(Value::from(name)).ok();
        }
    }

    pub fn set_value<V: Into<Value>>(&self, item_id: u64, value: V) {
        if let Some(property) = self.property_of(item_id, |row| row.value.clone()) {
            property.set_value(value.into()).ok();
        }
    }

    // Inspection

    pub fn index_of(&self, item_id: u64) -> Option<usize> {
        self.rows().iter().position(|row| row.id == item_id)
    }

    pub fn item_id_at(&self, index: usize) -> Option<u64> {
        self.rows().get(index).map(|row| row.id)
    }

    /// Number of ItemSetChangeListeners attached to the container
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of listeners attached to the observable properties of one row
    pub fn property_listener_count(&self, item_id: u64) -> usize {
        self.rows()
            .iter()
            .find(|row| row.id == item_id)
            .map(TestRow::listener_count)
            .unwrap_or(0)
    }

    /// Ids of every row that has at least one property listener attached
    pub fn observed_item_ids(&self) -> Vec<u64> {
        self.rows()
            .iter()
            .filter(|row| row.listener_count() > 0)
            .map(|row| row.id)
            .collect()
    }

    /// Number of window lookups served through indexed access
    pub fn indexed_reads(&self) -> usize {
        self.indexed_reads.load(Ordering::Relaxed)
    }

    fn property_of(
        &self,
        item_id: u64,
        select: impl Fn(&TestRow) -> Arc<ObservableProperty>,
    ) -> Option<Arc<ObservableProperty>> {
        self.rows().iter().find(|row| row.id == item_id).map(select)
    }

    fn fire(&self, change: ItemSetChange) {
        let listeners = self.listeners.try_snapshot().unwrap_or_default();
        for listener in listeners {
            listener.item_set_change(&change);
        }
    }

    fn rows(&self) -> RwLockReadGuard<'_, Vec<TestRow>> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn rows_mut(&self) -> RwLockWriteGuard<'_, Vec<TestRow>> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Container<u64> for ListContainer {
    fn size(&self) -> usize {
        self.rows().len()
    }

    fn item_ids(&self) -> Vec<u64> {
        self.rows().iter().map(|row| row.id).collect()
    }

    fn item(&self, item_id: &u64) -> Option<Arc<dyn Item>> {
        self.rows()
            .iter()
            .find(|row| row.id == *item_id)
            .map(|row| row.item.clone() as Arc<dyn Item>)
    }

    fn as_indexed(&self) -> Option<&dyn Indexed<u64>> {
        Some(self)
    }

    fn as_item_set_change_notifier(&self) -> Option<&dyn ItemSetChangeNotifier> {
        Some(self)
    }
}

impl Indexed<u64> for ListContainer {
    fn item_ids_in_range(&self, start_index: usize, count: usize) -> Vec<u64> {
        self.indexed_reads.fetch_add(1, Ordering::Relaxed);
        self.rows()
            .iter()
            .skip(start_index)
            .take(count)
            .map(|row| row.id)
            .collect()
    }
}

impl ItemSetChangeNotifier for ListContainer {
    fn add_item_set_change_listener(
        &self,
        listener: Arc<dyn ItemSetChangeListener>,
    ) -> Result<(), ListenerError> {
        self.listeners.try_add(listener)
    }

    fn remove_item_set_change_listener(
        &self,
        listener_id: ListenerId,
    ) -> Result<bool, ListenerError> {
        self.listeners.try_remove(listener_id)
    }
}
