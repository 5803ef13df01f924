use std::{collections::HashMap, fmt};

use serde_json::Value;

use crate::{
    entry::{cart_key, CartEntry, DownloadStatus},
    persist::{parse_cart, stringify_cart},
    storage::Storage,
};

// the durable user cart and the transient cart handed to the download window
pub const DEFAULT_CART: &str = "cart";
pub const DOWNLOAD_CART: &str = "download";

// In-memory mirror of one persisted storage slot. Every mutating operation
// reloads the slot first to pick up writes from other windows, applies the
// change, and persists. The mirror can still go stale the moment another
// writer persists; callers needing freshness call restore().
pub struct DataCart {
    name: String,
    contents: HashMap<String, CartEntry>,
    store: Option<Box<dyn Storage>>,
    subscribers: Vec<Box<dyn FnMut(bool)>>,
}

impl DataCart {
    pub fn exists(name: &str, store: &impl Storage) -> bool {
        store.get_item(name).is_some()
    }

    pub fn open(name: &str, store: impl Storage + 'static) -> DataCart {
        let mut cart = Self::bind(name, Some(Box::new(store)));
        match cart.store.as_ref().and_then(|store| store.get_item(name)) {
            Some(content) => cart.contents = parse_cart(&content),
            // a never-used cart is not an error; initialize the slot like
            // create would
            None => cart.save(),
        }

        cart
    }

    // resets the slot unconditionally; prior contents are discarded
    pub fn create(name: &str, store: impl Storage + 'static) -> DataCart {
        let cart = Self::bind(name, Some(Box::new(store)));
        cart.save();
        cart
    }

    // scratch cart without a backing store; mutations stay purely in memory
    pub fn detached(name: &str) -> DataCart {
        Self::bind(name, None)
    }

    fn bind(name: &str, store: Option<Box<dyn Storage>>) -> DataCart {
        DataCart {
            name: name.to_string(),
            contents: HashMap::new(),
            store,
            subscribers: Vec::new(),
        }
    }

    pub fn add_item(&mut self, entry: CartEntry) {
        if entry.resource_id.is_empty() || entry.file_path.is_empty() {
            tracing::warn!("rejecting cart entry without identity: {:?}", entry);
            return;
        }

        self.restore();
        self.contents.insert(entry.key(), entry);
        self.save();
        self.emit();
    }

    pub fn add_metadata(&mut self, resource_id: &str, metadata: &Value) -> bool {
        match CartEntry::from_metadata(resource_id, metadata) {
            Some(entry) => {
                self.add_item(entry);
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&mut self, resource_id: &str, file_path: &str) -> bool {
        self.restore();
        if self
            .contents
            .remove(&cart_key(resource_id, file_path))
            .is_none()
        {
            return false;
        }

        self.save();
        self.emit();
        true
    }

    pub fn find_item(&self, resource_id: &str, file_path: &str) -> Option<&CartEntry> {
        self.contents.get(&cart_key(resource_id, file_path))
    }

    // returns true if the entry existed; a missing entry is never created
    pub fn mark_downloaded(
        &mut self,
        resource_id: &str,
        file_path: &str,
        downloaded: bool,
    ) -> bool {
        self.restore();

        let status = if downloaded {
            DownloadStatus::Downloaded
        } else {
            DownloadStatus::NotDownloaded
        };

        match self.contents.get_mut(&cart_key(resource_id, file_path)) {
            Some(entry) => {
                entry.download_status = status;
                self.save();
                self.emit();
                true
            }
            None => false,
        }
    }

    // This cart is the source of truth: for every entry of `other` found here
    // by identity key, this cart's download status is copied onto it, and with
    // `mark_in_cart` its membership flag is set either way. Only the in-memory
    // entries of `other` change; nothing is persisted on either side. Returns
    // how many of the entries of `other` are marked downloaded afterwards.
    pub fn update_status_of(&self, other: &mut DataCart, mark_in_cart: bool) -> usize {
        let mut downloaded = 0;
        for entry in other.contents.values_mut() {
            match self.contents.get(&entry.key()) {
                Some(mine) => {
                    entry.download_status = mine.download_status;
                    if mark_in_cart {
                        entry.in_cart = true;
                    }
                }
                None if mark_in_cart => entry.in_cart = false,
                None => {}
            }

            if entry.is_downloaded() {
                downloaded += 1;
            }
        }

        downloaded
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn count_downloaded(&self) -> usize {
        self.contents
            .values()
            .filter(|entry| entry.is_downloaded())
            .count()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CartEntry> {
        self.contents.values()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn save(&self) {
        if let Some(store) = &self.store {
            store.set_item(&self.name, &stringify_cart(&self.contents));
        }
    }

    pub fn restore(&mut self) {
        let store = match &self.store {
            Some(store) => store,
            // a detached cart has nothing to reload from
            None => return,
        };

        self.contents = match store.get_item(&self.name) {
            Some(content) => parse_cart(&content),
            None => HashMap::new(),
        };
    }

    // deletes the slot; the in-memory mirror stays untouched
    pub fn forget(&self) {
        if let Some(store) = &self.store {
            store.remove_item(&self.name);
        }
    }

    // notification stays local to this instance; a cart in another window
    // sharing the slot sees nothing until it reloads
    pub fn watch_for_changes(&mut self, subscriber: impl FnMut(bool) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn emit(&mut self) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(true);
        }
    }
}

impl fmt::Debug for DataCart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataCart")
            .field("name", &self.name)
            .field("contents", &self.contents)
            .finish()
    }
}
