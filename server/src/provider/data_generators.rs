use gridsync_shared::{DataGenerator, Item, ItemId, RowData};

/// Handle to a generator registered with a DataProvider, used to remove it
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorKey(u64);

/// The ordered pipeline of generators that builds each row payload
pub struct DataGenerators<I: ItemId> {
    generators: Vec<(GeneratorKey, Box<dyn DataGenerator<I>>)>,
    next_key: u64,
}

impl<I: ItemId> DataGenerators<I> {
    pub fn new() -> Self {
        Self {
            generators: Vec::new(),
            next_key: 0,
        }
    }

    /// Appends a generator to the end of the pipeline
    pub fn add(&mut self, generator: Box<dyn DataGenerator<I>>) -> GeneratorKey {
        let key = GeneratorKey(self.next_key);
        self.next_key += 1;
        self.generators.push((key, generator));
        key
    }

    /// Removes a generator. Unknown keys are ignored.
    pub fn remove(&mut self, key: &GeneratorKey) -> Option<Box<dyn DataGenerator<I>>> {
        let index = self.generators.iter().position(|(k, _)| k == key)?;
        Some(self.generators.remove(index).1)
    }

    pub fn contains(&self, key: &GeneratorKey) -> bool {
        self.generators.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn generate_data(&mut self, item_id: &I, item: &dyn Item, row_data: &mut RowData) {
        for (_, generator) in self.generators.iter_mut() {
            generator.generate_data(item_id, item, row_data);
        }
    }

    pub fn destroy_data(&mut self, item_id: &I) {
        for (_, generator) in self.generators.iter_mut() {
            generator.destroy_data(item_id);
        }
    }
}

impl<I: ItemId> Default for DataGenerators<I> {
    fn default() -> Self {
        Self::new()
    }
}
