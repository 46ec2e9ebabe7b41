//! # Gridsync Shared
//! Common functionality shared between the gridsync server and its clients:
//! row keys, index ranges, wire messages, row payloads, and the traits a
//! backing collection implements to be served.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod container;
mod generator;
mod key_generator;
mod key_mapper;
mod messages;
mod range;
mod row_data;

pub use container::{
    container::{item_ids_in_range, Container, Indexed, ItemId},
    error::{ListenerError, PropertyError},
    item::{Item, PropertysetItem},
    listener::{
        ItemSetChange, ItemSetChangeListener, ItemSetChangeNotifier, Listener, ListenerId,
        Listeners, ValueChangeListener, ValueChangeNotifier,
    },
    property::{ConstantProperty, ObservableProperty, Property},
};
pub use generator::{
    data_generator::DataGenerator, property_value_generator::PropertyValueGenerator,
};
pub use key_generator::KeyGenerator;
pub use key_mapper::{KeyMapper, RowKey};
pub use messages::{DataProviderMessage, DataRequest};
pub use range::{Range, RangeError};
pub use row_data::{row_key, RowData, ROW_DATA, ROW_KEY};
