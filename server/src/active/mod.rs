pub mod active_item_handler;
pub mod change_subscription;
