use std::{collections::HashMap, fmt, str::FromStr, time::Duration};

use log::warn;

use crate::{ItemId, KeyGenerator};

/// The opaque token a client uses to refer to a row. Rendered on the wire as
/// a decimal string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowKey(u32);

impl RowKey {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for RowKey {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<RowKey> for u32 {
    fn from(key: RowKey) -> Self {
        key.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RowKey {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(RowKey)
    }
}

/// Bidirectional mapping between item identities and the short-lived string
/// keys handed to the client. Each live identity has exactly one key and each
/// live key resolves to exactly one identity. Retired keys may be handed out
/// again once the generator's recycle timeout passes.
pub struct KeyMapper<I: ItemId> {
    generator: KeyGenerator<RowKey>,
    id_to_key: HashMap<I, RowKey>,
    key_to_id: HashMap<RowKey, I>,
}

impl<I: ItemId> KeyMapper<I> {
    pub fn new(recycle_timeout: Duration) -> Self {
        Self {
            generator: KeyGenerator::new(recycle_timeout),
            id_to_key: HashMap::new(),
            key_to_id: HashMap::new(),
        }
    }

    /// Returns the key of `item_id`, allocating one if it has none yet
    pub fn key(&mut self, item_id: &I) -> String {
        if let Some(key) = self.id_to_key.get(item_id) {
            return key.to_string();
        }

        // the counter can wrap around onto a key that is still live
        let mut key = self.generator.generate();
        while self.key_to_id.contains_key(&key) {
            warn!("KeyMapper: key {} is still live, skipping it", key);
            key = self.generator.generate();
        }

        self.id_to_key.insert(item_id.clone(), key);
        self.key_to_id.insert(key, item_id.clone());
        key.to_string()
    }

    /// Resolves a key back to its identity. Unknown, malformed and retired
    /// keys resolve to `None`.
    pub fn get(&self, key: &str) -> Option<&I> {
        let row_key = RowKey::from_str(key).ok()?;
        self.key_to_id.get(&row_key)
    }

    /// Retires the mapping of `item_id`, returning the key it held
    pub fn remove(&mut self, item_id: &I) -> Option<String> {
        let key = self.id_to_key.remove(item_id)?;
        self.key_to_id.remove(&key);
        self.generator.recycle_key(&key);
        Some(key.to_string())
    }

    /// Retires every mapping
    pub fn remove_all(&mut self) {
        for (_, key) in self.id_to_key.drain() {
            self.generator.recycle_key(&key);
        }
        self.key_to_id.clear();
    }

    pub fn contains_id(&self, item_id: &I) -> bool {
        self.id_to_key.contains_key(item_id)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.id_to_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_key.is_empty()
    }
}
