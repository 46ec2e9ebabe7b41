use std::sync::{RwLock, Weak};

use log::debug;

use gridsync_shared::{ItemId, ItemSetChange, ItemSetChangeListener, Listener, ListenerId};

use super::change_inbox::{lock_inbox, ChangeInbox};

/// Listens to structural changes of the backing collection on behalf of a
/// DataProvider. Changes are queued, never sent immediately, so the provider
/// can decide at the end of the response cycle whether they still matter.
pub struct ContainerListener<I: ItemId> {
    id: ListenerId,
    inbox: Weak<RwLock<ChangeInbox<I>>>,
}

impl<I: ItemId> ContainerListener<I> {
    pub fn new(inbox: Weak<RwLock<ChangeInbox<I>>>) -> Self {
        Self {
            id: ListenerId::next(),
            inbox,
        }
    }
}

impl<I: ItemId> Listener for ContainerListener<I> {
    fn id(&self) -> ListenerId {
        self.id
    }
}

impl<I: ItemId> ItemSetChangeListener for ContainerListener<I> {
    fn item_set_change(&self, change: &ItemSetChange) {
        let Some(inbox) = self.inbox.upgrade() else {
            // the provider is gone, nothing left to notify
            return;
        };
        let mut inbox = lock_inbox(&inbox);

        match *change {
            ItemSetChange::ItemAdd { first_index, count } => {
                inbox.insert_row_data(first_index, count);
            }
            ItemSetChange::ItemRemove { first_index, count } => {
                inbox.remove_row_data(first_index, count);
            }
            ItemSetChange::Unstructured => {
                debug!("ContainerListener: unstructured item set change, scheduling reset");
                inbox.trigger_reset();
            }
        }
    }
}
