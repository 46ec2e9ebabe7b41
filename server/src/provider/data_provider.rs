use std::{
    collections::HashSet,
    mem,
    sync::{Arc, RwLock},
};

use indexmap::IndexSet;
use log::{debug, info, trace, warn};

use gridsync_shared::{
    item_ids_in_range, Container, DataGenerator, DataProviderMessage, DataRequest, Item, ItemId,
    KeyMapper, Listener, ListenerError, ListenerId, Range, RowData,
};

use crate::{
    active::active_item_handler::ActiveItemHandler, DataGenerators, DataProviderConfig,
    DataProviderError, GeneratorKey,
};

use super::{
    change_inbox::{lock_inbox, ChangeInbox},
    container_listener::ContainerListener,
};

/// Serves windows of a backing container to one virtual-scrolling client and
/// keeps the rows that client holds up to date.
///
/// Structural and content changes are never sent as they happen. They are
/// collected and sent by `before_client_response`, which the session calls
/// once per response cycle; `take_messages` then yields the batch to put on
/// the wire.
pub struct DataProvider<I: ItemId> {
    config: DataProviderConfig,
    container: Arc<dyn Container<I>>,
    inbox: Arc<RwLock<ChangeInbox<I>>>,
    container_listener: Option<ListenerId>,
    active_item_handler: ActiveItemHandler<I>,
    data_generators: DataGenerators<I>,
    // Messages of the current cycle, in the order their changes happened
    cycle_messages: Vec<DataProviderMessage>,
    // Flushed batches, waiting to be taken
    outgoing_messages: Vec<DataProviderMessage>,
    // Cycle flags
    refresh_cache: bool,
    reset_triggered: bool,
    initial_sent: bool,
    attached: bool,
}

impl<I: ItemId> DataProvider<I> {
    /// Create a new DataProvider serving the given container. If the
    /// container announces structural changes but attaching to it fails, the
    /// provider still works and logs a warning; use `try_new` to fail instead.
    pub fn new(container: Arc<dyn Container<I>>, config: DataProviderConfig) -> Self {
        let mut provider = Self::unattached(container, config);
        match provider.attach_container_listener() {
            Ok(listener_id) => provider.container_listener = listener_id,
            Err(error) => {
                warn!("DataProvider: structural changes will not be tracked: {}", error);
            }
        }
        provider
    }

    /// Create a new DataProvider, failing if it cannot attach to the container
    pub fn try_new(
        container: Arc<dyn Container<I>>,
        config: DataProviderConfig,
    ) -> Result<Self, DataProviderError> {
        let mut provider = Self::unattached(container, config);
        provider.container_listener = provider.attach_container_listener()?;
        Ok(provider)
    }

    fn unattached(container: Arc<dyn Container<I>>, config: DataProviderConfig) -> Self {
        let inbox = Arc::new(RwLock::new(ChangeInbox::new()));
        let active_item_handler = ActiveItemHandler::new(&inbox, config.key_recycle_timeout);

        Self {
            config,
            container,
            inbox,
            container_listener: None,
            active_item_handler,
            data_generators: DataGenerators::new(),
            cycle_messages: Vec::new(),
            outgoing_messages: Vec::new(),
            refresh_cache: false,
            reset_triggered: false,
            initial_sent: false,
            attached: true,
        }
    }

    fn attach_container_listener(&self) -> Result<Option<ListenerId>, ListenerError> {
        let Some(notifier) = self.container.as_item_set_change_notifier() else {
            info!("DataProvider: container does not announce structural changes");
            return Ok(None);
        };
        let listener = Arc::new(ContainerListener::new(Arc::downgrade(&self.inbox)));
        let listener_id = listener.id();
        notifier.add_item_set_change_listener(listener)?;
        info!("DataProvider: attached to container of {} items", self.container.size());
        Ok(Some(listener_id))
    }

    // Requests

    /// Handles a request from the client. Requests reaching a detached
    /// provider are logged and dropped.
    pub fn receive_request(&mut self, request: DataRequest) {
        if let Err(error) = self.try_receive_request(request) {
            warn!("DataProvider: ignoring request: {}", error);
        }
    }

    /// Handles a request from the client, failing if the provider is detached
    pub fn try_receive_request(&mut self, request: DataRequest) -> Result<(), DataProviderError> {
        if !self.attached {
            return Err(DataProviderError::Detached {
                operation: "handle requests",
            });
        }
        match request {
            DataRequest::RequestRows {
                first_row,
                number_of_rows,
                first_cached_row_index,
                cache_size,
            } => {
                self.request_rows(first_row, number_of_rows, first_cached_row_index, cache_size);
            }
            DataRequest::DropRows { row_keys } => {
                self.drop_rows(&row_keys);
            }
        }
        Ok(())
    }

    /// Serves `number_of_rows` rows starting at `first_row`. The client's
    /// cached window is trusted, so rows it already holds are not sent again.
    pub fn request_rows(
        &mut self,
        first_row: usize,
        number_of_rows: usize,
        first_cached_row_index: usize,
        cache_size: usize,
    ) {
        if !self.attached {
            warn!("DataProvider: detached, not serving rows");
            return;
        }
        self.process_inbox();

        if self.reset_triggered {
            // the client is about to discard everything, the reset page replaces this
            debug!(
                "DataProvider: reset pending, not serving rows {}..{}",
                first_row,
                first_row.saturating_add(number_of_rows)
            );
            return;
        }

        self.push_row_data(first_row, number_of_rows, first_cached_row_index, cache_size);
    }

    /// Marks the rows behind `row_keys` as evicted by the client. Unknown
    /// keys are ignored, they may have been retired already.
    pub fn drop_rows(&mut self, row_keys: &[String]) {
        if !self.attached {
            warn!("DataProvider: detached, ignoring dropped rows");
            return;
        }
        self.process_inbox();

        for row_key in row_keys {
            let Some(item_id) = self.active_item_handler.key_mapper().get(row_key).cloned() else {
                debug!("DataProvider: client dropped unknown row key `{}`", row_key);
                continue;
            };
            self.active_item_handler.drop_active_item(&item_id);
        }
    }

    // Response cycle

    /// Collects every change since the previous cycle into one batch of
    /// outgoing messages. Call once per response cycle; `initial` forces a
    /// full reset, as on the first response to a new client.
    pub fn before_client_response(&mut self, initial: bool) {
        if !self.attached {
            return;
        }
        self.process_inbox();

        let mut updated_item_ids = lock_inbox(&self.inbox).take_updated_item_ids();
        let mut batch = Vec::new();

        if initial || !self.initial_sent || self.reset_triggered {
            // the client has nothing cached, queued index changes are meaningless
            self.cycle_messages.clear();
            // the client discards every key on reset, and the first page
            // carries current values
            updated_item_ids.clear();
            let item_ids = self.active_item_handler.active_item_ids();
            self.internal_drop_items(item_ids);

            let size = self.container.size();
            info!("DataProvider: resetting client to {} rows", size);
            batch.push(DataProviderMessage::ResetDataAndSize { size });

            let number_of_rows = self.config.initial_page_size.min(size);
            self.push_row_data(0, number_of_rows, 0, 0);
            self.initial_sent = true;
        } else if self.refresh_cache {
            updated_item_ids.extend(self.active_item_handler.active_item_ids());
        }

        batch.append(&mut self.cycle_messages);
        if let Some(update) = self.internal_update_rows(&updated_item_ids) {
            batch.push(update);
        }

        if !batch.is_empty() {
            debug!(
                "DataProvider: flushing {} messages, {} active items",
                batch.len(),
                self.active_item_handler.len()
            );
        }
        self.outgoing_messages.append(&mut batch);

        // Clear all changes
        self.refresh_cache = false;
        self.reset_triggered = false;
    }

    /// Takes every message flushed so far, in send order
    pub fn take_messages(&mut self) -> Vec<DataProviderMessage> {
        mem::take(&mut self.outgoing_messages)
    }

    /// Whether the next response cycle has something to send. Updates of
    /// items the client no longer holds do not count; an active item that
    /// vanished from the container still does.
    pub fn is_dirty(&self) -> bool {
        if !self.attached {
            return false;
        }
        if !self.initial_sent
            || self.refresh_cache
            || self.reset_triggered
            || !self.cycle_messages.is_empty()
        {
            return true;
        }
        let inbox = lock_inbox(&self.inbox);
        inbox.has_structural_changes()
            || inbox
                .updated_item_ids()
                .any(|item_id| self.active_item_handler.is_active(item_id))
    }

    // Content changes

    /// Schedules a content update for one item. It is sent on the next
    /// cycle if the client still holds the item by then.
    pub fn update_row_data(&self, item_id: &I) {
        lock_inbox(&self.inbox).mark_updated(item_id.clone());
    }

    /// Schedules a re-send of every row the client holds
    pub fn refresh_cache(&mut self) {
        self.refresh_cache = true;
    }

    // Generators

    /// Adds a generator to the end of the pipeline. The row key is always
    /// stamped before any added generator runs.
    pub fn add_data_generator(&mut self, generator: Box<dyn DataGenerator<I>>) -> GeneratorKey {
        self.data_generators.add(generator)
    }

    /// Removes a generator. Unknown keys are ignored.
    pub fn remove_data_generator(&mut self, key: &GeneratorKey) -> Option<Box<dyn DataGenerator<I>>> {
        self.data_generators.remove(key)
    }

    // Accessors

    pub fn key_mapper(&self) -> &KeyMapper<I> {
        self.active_item_handler.key_mapper()
    }

    pub fn active_items(&self) -> &ActiveItemHandler<I> {
        &self.active_item_handler
    }

    /// A copy of the ids of every item the client is believed to hold
    pub fn active_item_ids(&self) -> HashSet<I> {
        self.active_item_handler.active_item_ids()
    }

    pub fn config(&self) -> &DataProviderConfig {
        &self.config
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    // Lifecycle

    /// Releases every active item and stops listening to the container
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }

        let item_ids = self.active_item_handler.active_item_ids();
        info!("DataProvider: detaching, releasing {} active items", item_ids.len());
        self.internal_drop_items(item_ids);

        if let Some(listener_id) = self.container_listener.take() {
            if let Some(notifier) = self.container.as_item_set_change_notifier() {
                if let Err(error) = notifier.remove_item_set_change_listener(listener_id) {
                    warn!("DataProvider: could not detach from container: {}", error);
                }
            }
        }

        lock_inbox(&self.inbox).clear();
        self.cycle_messages.clear();
        self.refresh_cache = false;
        self.reset_triggered = false;
        self.attached = false;
    }

    // Private

    /// Moves what the listeners collected into the current cycle
    fn process_inbox(&mut self) {
        let (reset, row_changes) = {
            let mut inbox = lock_inbox(&self.inbox);
            (inbox.take_reset(), inbox.take_row_changes())
        };

        for row_change in row_changes {
            self.cycle_messages.push(row_change.to_message());
        }

        if reset {
            // indices can no longer be trusted, drop everything tied to them
            let item_ids = self.active_item_handler.active_item_ids();
            info!(
                "DataProvider: unstructured container change, releasing {} active items",
                item_ids.len()
            );
            self.internal_drop_items(item_ids);
            self.cycle_messages.clear();
            self.reset_triggered = true;
        }
    }

    fn push_row_data(
        &mut self,
        first_row: usize,
        number_of_rows: usize,
        first_cached_row_index: usize,
        cache_size: usize,
    ) {
        let new_range = Range::with_length(first_row, number_of_rows);
        let cached = Range::with_length(first_cached_row_index, cache_size);
        let mut full_range = new_range;
        if !cached.is_empty() {
            full_range = new_range.combine_with(&cached);
        }
        let container = self.container.clone();
        let full_range = full_range.restrict_to(&Range::with_length(0, container.size()));

        let item_ids = item_ids_in_range(container.as_ref(), full_range.start(), full_range.length());
        let loaded = Range::with_length(full_range.start(), item_ids.len());

        // Scrolling forward, the client keeps its cache and extends it up to
        // the new window, so send everything after the cached rows
        let mut first_to_send = new_range.start();
        if !cached.is_empty() && new_range.start() > cached.start() {
            first_to_send = cached.end().min(new_range.end());
        }
        let send_range = Range::between(first_to_send, new_range.end()).restrict_to(&loaded);

        let mut rows = Vec::with_capacity(send_range.length());
        for index in send_range.iter() {
            let item_id = &item_ids[index - loaded.start()];
            let Some(item) = container.item(item_id) else {
                warn!(
                    "DataProvider: item {:?} at index {} vanished, sending rows up to it",
                    item_id, index
                );
                break;
            };
            rows.push(self.row_data(item_id, item.as_ref()));
        }

        if !rows.is_empty() {
            trace!(
                "DataProvider: sending {} rows starting at {}",
                rows.len(),
                send_range.start()
            );
            self.cycle_messages.push(DataProviderMessage::SetRowData {
                first_index: send_range.start(),
                rows,
            });
        }

        let confirmed_drops = self
            .active_item_handler
            .add_active_items(container.as_ref(), &item_ids);
        self.internal_drop_items(confirmed_drops);
    }

    fn row_data(&mut self, item_id: &I, item: &dyn Item) -> RowData {
        let mut row_data = RowData::new();
        self.active_item_handler.generate_data(item_id, item, &mut row_data);
        self.data_generators.generate_data(item_id, item, &mut row_data);
        row_data
    }

    fn internal_update_rows(&mut self, item_ids: &IndexSet<I>) -> Option<DataProviderMessage> {
        if item_ids.is_empty() {
            return None;
        }

        let container = self.container.clone();
        let mut rows = Vec::new();
        for item_id in item_ids {
            if !self.active_item_handler.is_active(item_id) {
                trace!("DataProvider: {:?} changed but is no longer active", item_id);
                continue;
            }
            if let Some(item) = container.item(item_id) {
                rows.push(self.row_data(item_id, item.as_ref()));
            }
        }

        if rows.is_empty() {
            return None;
        }
        Some(DataProviderMessage::UpdateRowData { rows })
    }

    /// Tells every generator that the client no longer holds these items
    fn internal_drop_items<C: IntoIterator<Item = I>>(&mut self, item_ids: C) {
        for item_id in item_ids {
            self.active_item_handler.destroy_data(&item_id);
            self.data_generators.destroy_data(&item_id);
        }
    }
}

impl<I: ItemId> Drop for DataProvider<I> {
    fn drop(&mut self) {
        self.detach();
    }
}
