use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, RwLock, Weak},
    time::Duration,
};

use log::trace;
use serde_json::Value;

use gridsync_shared::{Container, DataGenerator, Item, ItemId, KeyMapper, RowData, ROW_KEY};

use crate::provider::change_inbox::ChangeInbox;

use super::change_subscription::ChangeSubscription;

/// Whether the client still holds an active item
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActiveState {
    Active,
    /// The client reported the row as evicted. It is released on the next
    /// window serve unless that serve includes it again.
    DropRequested,
}

struct ActiveItem<I: ItemId> {
    subscription: ChangeSubscription<I>,
    state: ActiveState,
}

/// Tracks the items currently cached by the client, owning one change
/// subscription and one row key for each of them
pub struct ActiveItemHandler<I: ItemId> {
    active_items: HashMap<I, ActiveItem<I>>,
    key_mapper: KeyMapper<I>,
    inbox: Weak<RwLock<ChangeInbox<I>>>,
}

impl<I: ItemId> ActiveItemHandler<I> {
    pub(crate) fn new(inbox: &Arc<RwLock<ChangeInbox<I>>>, key_recycle_timeout: Duration) -> Self {
        Self {
            active_items: HashMap::new(),
            key_mapper: KeyMapper::new(key_recycle_timeout),
            inbox: Arc::downgrade(inbox),
        }
    }

    /// Keys and subscribes to every item that is not active yet, and settles pending
    /// drop requests: items present in `item_ids` stay active, the rest are
    /// returned so the caller can release them through every generator.
    pub(crate) fn add_active_items(
        &mut self,
        container: &dyn Container<I>,
        item_ids: &[I],
    ) -> Vec<I> {
        for item_id in item_ids {
            if self.active_items.contains_key(item_id) {
                continue;
            }
            // keyed on activation, so rows in the gap of a spanning window
            // have a key even before their data is sent
            self.key_mapper.key(item_id);
            let item = container.item(item_id);
            let subscription =
                ChangeSubscription::new(item_id.clone(), item.as_deref(), self.inbox.clone());
            self.active_items.insert(
                item_id.clone(),
                ActiveItem {
                    subscription,
                    state: ActiveState::Active,
                },
            );
        }

        let incoming: HashSet<&I> = item_ids.iter().collect();
        let mut confirmed_drops = Vec::new();
        for (item_id, active_item) in self.active_items.iter_mut() {
            if active_item.state != ActiveState::DropRequested {
                continue;
            }
            if incoming.contains(item_id) {
                trace!("ActiveItemHandler: drop of {:?} cancelled, row requested again", item_id);
                active_item.state = ActiveState::Active;
            } else {
                confirmed_drops.push(item_id.clone());
            }
        }
        confirmed_drops
    }

    /// Marks an active item as dropped by the client. Returns false, and does
    /// nothing, if the item is not active.
    pub(crate) fn drop_active_item(&mut self, item_id: &I) -> bool {
        let Some(active_item) = self.active_items.get_mut(item_id) else {
            return false;
        };
        active_item.state = ActiveState::DropRequested;
        true
    }

    /// A copy of the ids of every active item
    pub fn active_item_ids(&self) -> HashSet<I> {
        self.active_items.keys().cloned().collect()
    }

    pub fn is_active(&self, item_id: &I) -> bool {
        self.active_items.contains_key(item_id)
    }

    pub fn active_state(&self, item_id: &I) -> Option<ActiveState> {
        self.active_items.get(item_id).map(|active_item| active_item.state)
    }

    /// Number of properties the item's subscription observes, if it is active
    pub fn attached_property_count(&self, item_id: &I) -> Option<usize> {
        self.active_items
            .get(item_id)
            .map(|active_item| active_item.subscription.attached_count())
    }

    pub fn len(&self) -> usize {
        self.active_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_items.is_empty()
    }

    pub fn key_mapper(&self) -> &KeyMapper<I> {
        &self.key_mapper
    }

    fn remove_listener(&mut self, item_id: &I) {
        // a forced reset may already have released the subscription
        if let Some(mut active_item) = self.active_items.remove(item_id) {
            active_item.subscription.release();
        }
    }
}

impl<I: ItemId> DataGenerator<I> for ActiveItemHandler<I> {
    fn generate_data(&mut self, item_id: &I, _item: &dyn Item, row_data: &mut RowData) {
        let key = self.key_mapper.key(item_id);
        row_data.insert(ROW_KEY.to_string(), Value::String(key));
    }

    fn destroy_data(&mut self, item_id: &I) {
        self.key_mapper.remove(item_id);
        self.remove_listener(item_id);
    }
}
