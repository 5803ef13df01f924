use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use super::Storage;

// cloning yields a second handle onto the same slots, the way two windows
// share one session store
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.slots.lock() {
            Ok(slots) => slots.get(key).cloned(),
            Err(err) => {
                tracing::error!("reading slot {} failed: {:?}", key, err);
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) {
        match self.slots.lock() {
            Ok(mut slots) => {
                slots.insert(key.to_string(), value.to_string());
            }
            Err(err) => tracing::error!("writing slot {} failed: {:?}", key, err),
        }
    }

    fn remove_item(&self, key: &str) {
        match self.slots.lock() {
            Ok(mut slots) => {
                slots.remove(key);
            }
            Err(err) => tracing::error!("removing slot {} failed: {:?}", key, err),
        }
    }
}
