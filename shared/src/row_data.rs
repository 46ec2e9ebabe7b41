use serde_json::{Map, Value};

/// The payload of one row as sent to the client: an insertion-ordered JSON
/// object that every registered generator contributes fields to.
pub type RowData = Map<String, Value>;

/// Field holding the row's key
pub const ROW_KEY: &str = "k";

/// Field holding the row's property values
pub const ROW_DATA: &str = "d";

/// Reads the row key stamped into a payload, if any
pub fn row_key(row: &RowData) -> Option<&str> {
    row.get(ROW_KEY).and_then(Value::as_str)
}
