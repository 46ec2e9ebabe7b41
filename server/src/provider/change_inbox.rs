use std::{
    mem,
    sync::{RwLock, RwLockWriteGuard},
};

use indexmap::IndexSet;

use gridsync_shared::{DataProviderMessage, ItemId};

/// A structural change to the backing collection, waiting to be sent
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowChange {
    Insert { index: usize, count: usize },
    Remove { index: usize, count: usize },
}

impl RowChange {
    pub fn to_message(&self) -> DataProviderMessage {
        match *self {
            RowChange::Insert { index, count } => {
                DataProviderMessage::InsertRowData { index, count }
            }
            RowChange::Remove { index, count } => {
                DataProviderMessage::RemoveRowData { index, count }
            }
        }
    }
}

/// Changes announced by the backing collection and its items, collected
/// between engine operations. Listeners held by the collection write here;
/// the owning DataProvider drains it.
pub struct ChangeInbox<I: ItemId> {
    row_changes: Vec<RowChange>,
    updated_item_ids: IndexSet<I>,
    reset_pending: bool,
}

impl<I: ItemId> ChangeInbox<I> {
    pub fn new() -> Self {
        Self {
            row_changes: Vec::new(),
            updated_item_ids: IndexSet::new(),
            reset_pending: false,
        }
    }

    // Structural changes

    pub fn insert_row_data(&mut self, index: usize, count: usize) {
        self.row_changes.push(RowChange::Insert { index, count });
    }

    pub fn remove_row_data(&mut self, index: usize, count: usize) {
        self.row_changes.push(RowChange::Remove { index, count });
    }

    pub fn trigger_reset(&mut self) {
        self.reset_pending = true;
    }

    pub fn take_row_changes(&mut self) -> Vec<RowChange> {
        mem::take(&mut self.row_changes)
    }

    pub fn take_reset(&mut self) -> bool {
        mem::take(&mut self.reset_pending)
    }

    /// Whether an index change or a reset is waiting
    pub fn has_structural_changes(&self) -> bool {
        !self.row_changes.is_empty() || self.reset_pending
    }

    // Content changes

    /// Marks a whole row as changed. Returns false if it already was.
    pub fn mark_updated(&mut self, item_id: I) -> bool {
        self.updated_item_ids.insert(item_id)
    }

    pub fn updated_item_ids(&self) -> impl Iterator<Item = &I> {
        self.updated_item_ids.iter()
    }

    pub fn take_updated_item_ids(&mut self) -> IndexSet<I> {
        mem::take(&mut self.updated_item_ids)
    }

    // Misc

    pub fn is_empty(&self) -> bool {
        self.row_changes.is_empty() && self.updated_item_ids.is_empty() && !self.reset_pending
    }

    pub fn clear(&mut self) {
        self.row_changes.clear();
        self.updated_item_ids.clear();
        self.reset_pending = false;
    }
}

impl<I: ItemId> Default for ChangeInbox<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Locks the inbox for writing. A panic in another holder cannot leave the
/// inbox half-updated, so a poisoned lock is used as is.
pub fn lock_inbox<I: ItemId>(inbox: &RwLock<ChangeInbox<I>>) -> RwLockWriteGuard<'_, ChangeInbox<I>> {
    match inbox.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
