use std::{fmt::Debug, hash::Hash, sync::Arc};

use super::{item::Item, listener::ItemSetChangeNotifier};

/// Identity of an item in a container. It is never sent to the client.
pub trait ItemId: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T: Clone + Eq + Hash + Debug + Send + Sync + 'static> ItemId for T {}

/// An ordered collection of items
pub trait Container<I: ItemId>: Send + Sync {
    fn size(&self) -> usize;

    /// Every item id, in collection order
    fn item_ids(&self) -> Vec<I>;

    fn item(&self, item_id: &I) -> Option<Arc<dyn Item>>;

    /// Random access capability, if the container has it
    fn as_indexed(&self) -> Option<&dyn Indexed<I>> {
        None
    }

    /// Structural change notification capability, if the container has it
    fn as_item_set_change_notifier(&self) -> Option<&dyn ItemSetChangeNotifier> {
        None
    }
}

/// Random access into a container
pub trait Indexed<I: ItemId>: Send + Sync {
    /// Up to `count` item ids starting at `start_index`, in collection order
    fn item_ids_in_range(&self, start_index: usize, count: usize) -> Vec<I>;
}

/// Fetches the ids of `count` items starting at `start_index`. Containers
/// without random access are enumerated in full and sliced, which is O(n).
pub fn item_ids_in_range<I: ItemId>(
    container: &dyn Container<I>,
    start_index: usize,
    count: usize,
) -> Vec<I> {
    if let Some(indexed) = container.as_indexed() {
        return indexed.item_ids_in_range(start_index, count);
    }

    container
        .item_ids()
        .into_iter()
        .skip(start_index)
        .take(count)
        .collect()
}
