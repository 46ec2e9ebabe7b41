use std::sync::{Arc, RwLock, Weak};

use log::warn;

use gridsync_shared::{Item, ItemId, Listener, ListenerId, Property, ValueChangeListener};

use crate::provider::change_inbox::{lock_inbox, ChangeInbox};

/// Marks a whole row as changed whenever any of its properties change
struct RowChangeListener<I: ItemId> {
    id: ListenerId,
    item_id: I,
    inbox: Weak<RwLock<ChangeInbox<I>>>,
}

impl<I: ItemId> Listener for RowChangeListener<I> {
    fn id(&self) -> ListenerId {
        self.id
    }
}

impl<I: ItemId> ValueChangeListener for RowChangeListener<I> {
    fn value_change(&self) {
        let Some(inbox) = self.inbox.upgrade() else {
            return;
        };
        lock_inbox(&inbox).mark_updated(self.item_id.clone());
    }
}

/// The live subscription to every observable property of one active item.
///
/// One listener instance is shared by all of the item's properties, since any
/// change means the entire row must be re-evaluated. The properties are
/// snapshotted on creation and exactly those are detached on release, even
/// if the item's property set has changed in between.
pub struct ChangeSubscription<I: ItemId> {
    item_id: I,
    listener: Arc<RowChangeListener<I>>,
    attached_properties: Vec<Arc<dyn Property>>,
}

impl<I: ItemId> ChangeSubscription<I> {
    pub(crate) fn new(
        item_id: I,
        item: Option<&dyn Item>,
        inbox: Weak<RwLock<ChangeInbox<I>>>,
    ) -> Self {
        let listener = Arc::new(RowChangeListener {
            id: ListenerId::next(),
            item_id: item_id.clone(),
            inbox,
        });

        let mut attached_properties = Vec::new();
        if let Some(item) = item {
            for property_id in item.property_ids() {
                let Some(property) = item.property(&property_id) else {
                    continue;
                };
                let Some(notifier) = property.as_notifier() else {
                    continue;
                };
                if let Err(error) = notifier.add_value_change_listener(listener.clone()) {
                    warn!(
                        "ChangeSubscription: could not observe property `{}` of item {:?}: {}",
                        property_id, item_id, error
                    );
                    continue;
                }
                attached_properties.push(property);
            }
        }

        Self {
            item_id,
            listener,
            attached_properties,
        }
    }

    /// Number of properties this subscription is attached to
    pub fn attached_count(&self) -> usize {
        self.attached_properties.len()
    }

    /// Detaches from every property attached on creation. Releasing twice,
    /// or releasing a subscription that attached to nothing, does nothing.
    pub fn release(&mut self) {
        let listener_id = self.listener.id();
        for property in self.attached_properties.drain(..) {
            let Some(notifier) = property.as_notifier() else {
                continue;
            };
            if let Err(error) = notifier.remove_value_change_listener(listener_id) {
                warn!(
                    "ChangeSubscription: could not detach from a property of item {:?}: {}",
                    self.item_id, error
                );
            }
        }
    }
}

impl<I: ItemId> Drop for ChangeSubscription<I> {
    fn drop(&mut self) {
        self.release();
    }
}
