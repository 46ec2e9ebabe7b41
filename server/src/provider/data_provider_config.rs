use std::{default::Default, time::Duration};

/// Contains Config properties which will be used by a DataProvider
#[derive(Clone, Debug)]
pub struct DataProviderConfig {
    /// Number of rows pushed to the client together with a size reset, before
    /// it has asked for anything
    pub initial_page_size: usize,
    /// How long a retired row key is held back before it may be handed to
    /// another item
    pub key_recycle_timeout: Duration,
}

impl Default for DataProviderConfig {
    fn default() -> Self {
        Self {
            initial_page_size: 40,
            key_recycle_timeout: Duration::from_secs(60),
        }
    }
}
