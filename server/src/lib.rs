//! # Gridsync Server
//! Serves windows of a server-held collection to a virtual-scrolling client,
//! keeping the rows that client caches in sync with structural and content
//! changes made to the collection.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub mod shared {
    pub use gridsync_shared::{
        item_ids_in_range, row_key, ConstantProperty, Container, DataGenerator,
        DataProviderMessage, DataRequest, Indexed, Item, ItemId, ItemSetChange,
        ItemSetChangeListener, ItemSetChangeNotifier, KeyMapper, Listener, ListenerError,
        ListenerId, ObservableProperty, Property, PropertyError, PropertyValueGenerator,
        PropertysetItem, Range, RowData, RowKey, ValueChangeListener, ValueChangeNotifier,
        ROW_DATA, ROW_KEY,
    };
}

mod active;
mod error;
mod provider;

pub use active::{
    active_item_handler::{ActiveItemHandler, ActiveState},
    change_subscription::ChangeSubscription,
};
pub use error::DataProviderError;
pub use provider::{
    change_inbox::{ChangeInbox, RowChange},
    data_generators::{DataGenerators, GeneratorKey},
    data_provider::DataProvider,
    data_provider_config::DataProviderConfig,
};
