use std::sync::{Arc, RwLock};

use super::property::Property;

/// A row of the backing collection, exposing its fields by id
pub trait Item: Send + Sync {
    /// Ids of the item's properties, in declaration order
    fn property_ids(&self) -> Vec<String>;

    fn property(&self, property_id: &str) -> Option<Arc<dyn Property>>;
}

/// An item whose set of properties can change at runtime
#[derive(Default)]
pub struct PropertysetItem {
    properties: RwLock<Vec<(String, Arc<dyn Property>)>>,
}

impl PropertysetItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of `add_property`
    pub fn with_property<P: Property + 'static>(self, property_id: &str, property: P) -> Self {
        self.add_property(property_id, Arc::new(property));
        self
    }

    /// Adds a property. Returns false if the id is already taken.
    pub fn add_property(&self, property_id: &str, property: Arc<dyn Property>) -> bool {
        let mut properties = match self.properties.write() {
            Ok(properties) => properties,
            Err(poisoned) => poisoned.into_inner(),
        };
        if properties.iter().any(|(id, _)| id == property_id) {
            return false;
        }
        properties.push((property_id.to_string(), property));
        true
    }

    pub fn remove_property(&self, property_id: &str) -> Option<Arc<dyn Property>> {
        let mut properties = match self.properties.write() {
            Ok(properties) => properties,
            Err(poisoned) => poisoned.into_inner(),
        };
        let index = properties.iter().position(|(id, _)| id == property_id)?;
        Some(properties.remove(index).1)
    }
}

impl Item for PropertysetItem {
    fn property_ids(&self) -> Vec<String> {
        let properties = match self.properties.read() {
            Ok(properties) => properties,
            Err(poisoned) => poisoned.into_inner(),
        };
        properties.iter().map(|(id, _)| id.clone()).collect()
    }

    fn property(&self, property_id: &str) -> Option<Arc<dyn Property>> {
        let properties = match self.properties.read() {
            Ok(properties) => properties,
            Err(poisoned) => poisoned.into_inner(),
        };
        properties
            .iter()
            .find(|(id, _)| id == property_id)
            .map(|(_, property)| property.clone())
    }
}
