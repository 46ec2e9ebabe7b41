use serde::{Deserialize, Serialize};

use crate::RowData;

/// Messages sent from the server to the client. Within one response cycle
/// they are ordered: reset, then structural changes in the order they
/// happened, then row data, then content updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DataProviderMessage {
    /// The client must discard every cached row and key
    ResetDataAndSize { size: usize },
    /// `count` rows were inserted starting at `index`
    InsertRowData { index: usize, count: usize },
    /// `count` rows were removed starting at `index`
    RemoveRowData { index: usize, count: usize },
    /// A contiguous window of rows starting at `first_index`
    SetRowData { first_index: usize, rows: Vec<RowData> },
    /// Content updates for rows the client already holds, identified by key
    UpdateRowData { rows: Vec<RowData> },
}

impl DataProviderMessage {
    pub fn name(&self) -> &'static str {
        match self {
            DataProviderMessage::ResetDataAndSize { .. } => "resetDataAndSize",
            DataProviderMessage::InsertRowData { .. } => "insertRowData",
            DataProviderMessage::RemoveRowData { .. } => "removeRowData",
            DataProviderMessage::SetRowData { .. } => "setRowData",
            DataProviderMessage::UpdateRowData { .. } => "updateRowData",
        }
    }
}

/// Requests sent from the client to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DataRequest {
    /// Asks for a window of rows, reporting the window the client currently
    /// holds in its cache
    RequestRows {
        first_row: usize,
        number_of_rows: usize,
        first_cached_row_index: usize,
        cache_size: usize,
    },
    /// Reports rows the client has evicted from its cache
    DropRows { row_keys: Vec<String> },
}
