use crate::{Item, ItemId, RowData};

/// Contributes fields to the payload of every row sent to the client
pub trait DataGenerator<I: ItemId>: Send {
    /// Called every time a row payload for `item_id` is built
    fn generate_data(&mut self, item_id: &I, item: &dyn Item, row_data: &mut RowData);

    /// Called once the client no longer holds `item_id`, so any state kept
    /// for it can be released
    fn destroy_data(&mut self, _item_id: &I) {}
}
