use std::{
    collections::VecDeque,
    marker::PhantomData,
    time::{Duration, Instant},
};

/// Hands out unique keys from a monotonically increasing counter. Keys given
/// back through `recycle_key` become available again only once
/// `recycle_timeout` has passed, in the order they were recycled.
pub struct KeyGenerator<K: From<u32> + Into<u32> + Copy> {
    recycled_keys: VecDeque<(u32, Instant)>,
    recycle_timeout: Duration,
    next_new_key: u32,
    phantom: PhantomData<K>,
}

impl<K: From<u32> + Into<u32> + Copy> KeyGenerator<K> {
    pub fn new(recycle_timeout: Duration) -> Self {
        Self {
            recycled_keys: VecDeque::new(),
            recycle_timeout,
            next_new_key: 0,
            phantom: PhantomData,
        }
    }

    /// Get a new, unused key
    pub fn generate(&mut self) -> K {
        if let Some((_, recycled_at)) = self.recycled_keys.front() {
            if recycled_at.elapsed() >= self.recycle_timeout {
                if let Some((key, _)) = self.recycled_keys.pop_front() {
                    return K::from(key);
                }
            }
        }

        let key = self.next_new_key;
        self.next_new_key = self.next_new_key.wrapping_add(1);
        K::from(key)
    }

    /// Recycle a used key, freeing it up
    pub fn recycle_key(&mut self, key: &K) {
        let key_u32: u32 = (*key).into();
        self.recycled_keys.push_back((key_u32, Instant::now()));
    }

    /// Number of recycled keys still waiting for their timeout to pass
    pub fn recycled_count(&self) -> usize {
        self.recycled_keys.len()
    }
}
