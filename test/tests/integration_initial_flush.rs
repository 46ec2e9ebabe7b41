//! Integration tests for the first response cycle of a DataProvider: the
//! reset message and the default first page that follows it.

use serde_json::json;

use gridsync_server::DataProviderConfig;
use gridsync_shared::{row_key, DataProviderMessage, ROW_DATA};
use gridsync_test::{
    assert_keys_match_active, assert_subscription_parity, init_logger, provider_for,
    provider_with_config, ListContainer, TestClient,
};

fn set_row_data(message: &DataProviderMessage) -> (usize, usize) {
    match message {
        DataProviderMessage::SetRowData { first_index, rows } => (*first_index, rows.len()),
        other => panic!("expected setRowData, got {:?}", other),
    }
}

#[test]
fn empty_collection_sends_only_reset() {
    init_logger();
    let container = ListContainer::with_items(0);
    let mut provider = provider_for(&container);

    provider.before_client_response(true);
    let messages = provider.take_messages();

    assert_eq!(messages, vec![DataProviderMessage::ResetDataAndSize { size: 0 }]);
    assert!(provider.active_item_ids().is_empty());
}

#[test]
fn hundred_items_send_reset_and_first_page() {
    init_logger();
    let container = ListContainer::with_items(100);
    let mut provider = provider_for(&container);

    provider.before_client_response(true);
    let messages = provider.take_messages();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], DataProviderMessage::ResetDataAndSize { size: 100 });
    assert_eq!(set_row_data(&messages[1]), (0, 40));

    let mut active: Vec<u64> = provider.active_item_ids().into_iter().collect();
    active.sort_unstable();
    assert_eq!(active, (0..40).collect::<Vec<u64>>());
    assert_subscription_parity!(provider, container);
    assert_keys_match_active!(provider);
}

#[test]
fn first_page_rows_carry_key_and_values() {
    init_logger();
    let container = ListContainer::with_items(3);
    let mut provider = provider_for(&container);

    provider.before_client_response(true);
    let messages = provider.take_messages();

    let DataProviderMessage::SetRowData { rows, .. } = &messages[1] else {
        panic!("expected setRowData, got {:?}", messages[1]);
    };
    for (index, row) in rows.iter().enumerate() {
        let key = row_key(row).expect("row should carry a key");
        assert_eq!(provider.key_mapper().get(key), Some(&(index as u64)));
        assert_eq!(
            row[ROW_DATA],
            json!({
                "name": format!("item {}", index),
                "value": index,
                "static": { "id": index },
            })
        );
    }
}

#[test]
fn first_page_is_bounded_by_collection_size() {
    init_logger();
    let container = ListContainer::with_items(10);
    let mut provider = provider_for(&container);

    provider.before_client_response(true);
    let messages = provider.take_messages();

    assert_eq!(set_row_data(&messages[1]), (0, 10));
}

#[test]
fn first_page_size_is_configurable() {
    init_logger();
    let container = ListContainer::with_items(100);
    let config = DataProviderConfig {
        initial_page_size: 5,
        ..Default::default()
    };
    let mut provider = provider_with_config(&container, config);

    provider.before_client_response(true);
    let messages = provider.take_messages();

    assert_eq!(set_row_data(&messages[1]), (0, 5));
    assert_eq!(provider.active_item_ids().len(), 5);
}

#[test]
fn first_cycle_resets_without_initial_flag() {
    init_logger();
    let container = ListContainer::with_items(50);
    let mut provider = provider_for(&container);
    let mut client = TestClient::new();

    let messages = client.sync(&mut provider);

    assert_eq!(messages[0], DataProviderMessage::ResetDataAndSize { size: 50 });
    assert_eq!(client.size(), 50);
    assert_eq!(client.cached_count(), 40);
}

#[test]
fn structural_changes_before_first_cycle_are_folded_into_reset() {
    init_logger();
    let container = ListContainer::with_items(20);
    let mut provider = provider_for(&container);

    container.insert_items(5, 100..103);
    container.remove_items(0, 1);
    provider.before_client_response(true);
    let messages = provider.take_messages();

    let names: Vec<&str> = messages.iter().map(DataProviderMessage::name).collect();
    assert_eq!(names, vec!["resetDataAndSize", "setRowData"]);
    assert_eq!(messages[0], DataProviderMessage::ResetDataAndSize { size: 22 });
}

#[test]
fn repeated_initial_cycle_releases_rows_the_client_discarded() {
    init_logger();
    let container = ListContainer::with_items(100);
    let mut provider = provider_for(&container);
    let mut first = TestClient::new();
    first.sync(&mut provider);
    provider.request_rows(50, 40, 0, 40);
    first.sync(&mut provider);
    assert_eq!(provider.active_item_ids().len(), 90);
    let stale_key = first.key_at(70).unwrap().to_string();

    container.set_value(5, "changed");
    let mut second = TestClient::new();
    provider.before_client_response(true);
    let messages = provider.take_messages();
    second.apply_all(&messages);

    let names: Vec<&str> = messages.iter().map(DataProviderMessage::name).collect();
    assert_eq!(names, vec!["resetDataAndSize", "setRowData"]);
    assert_eq!(second.value_at(5, "value"), Some(&json!("changed")));

    let mut active: Vec<u64> = provider.active_item_ids().into_iter().collect();
    active.sort_unstable();
    assert_eq!(active, (0..40).collect::<Vec<u64>>());
    assert_eq!(second.cached_count(), 40);
    assert_eq!(provider.key_mapper().get(&stale_key), None);
    assert_eq!(container.property_listener_count(70), 0);
    assert_subscription_parity!(provider, container);
    assert_keys_match_active!(provider);

    container.set_value(70, "unseen");
    assert!(!provider.is_dirty());
    assert!(second.sync(&mut provider).is_empty());
}

#[test]
fn flushed_batch_wire_format() {
    init_logger();
    let container = ListContainer::with_items(1);
    let mut provider = provider_for(&container);

    provider.before_client_response(true);
    let value = serde_json::to_value(provider.take_messages()).unwrap();

    assert_eq!(
        value,
        json!([
            { "type": "resetDataAndSize", "size": 1 },
            {
                "type": "setRowData",
                "firstIndex": 0,
                "rows": [{
                    "k": "0",
                    "d": { "name": "item 0", "value": 0, "static": { "id": 0 } },
                }],
            },
        ])
    );
}
