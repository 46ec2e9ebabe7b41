use serde_json::{Map, Value};

use crate::{DataGenerator, Item, ItemId, RowData, ROW_DATA};

/// Writes the value of every property of an item into the row's data object,
/// keyed by property id
#[derive(Default)]
pub struct PropertyValueGenerator {
    property_ids: Option<Vec<String>>,
}

impl PropertyValueGenerator {
    /// Emits every property of each item
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits only the given properties, in the given order
    pub fn with_properties<S: Into<String>>(property_ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            property_ids: Some(property_ids.into_iter().map(Into::into).collect()),
        }
    }
}

impl<I: ItemId> DataGenerator<I> for PropertyValueGenerator {
    fn generate_data(&mut self, _item_id: &I, item: &dyn Item, row_data: &mut RowData) {
        let property_ids = match &self.property_ids {
            Some(property_ids) => property_ids.clone(),
            None => item.property_ids(),
        };

        let mut data = Map::new();
        for property_id in property_ids {
            let value = item
                .property(&property_id)
                .map(|property| property.value())
                .unwrap_or(Value::Null);
            data.insert(property_id, value);
        }
        row_data.insert(ROW_DATA.to_string(), Value::Object(data));
    }
}
