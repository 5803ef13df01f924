use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
};

use crate::error::CartError;

use super::Storage;

// one file per slot under a root directory; replacements go through a staging
// file and a rename so readers never observe a partial blob
#[derive(Clone, Debug)]
pub struct FileStorage {
    root: PathBuf,
    stage: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CartError> {
        let root = root.into();
        let stage = root.join(".stage");
        fs::create_dir_all(&stage)?;

        Ok(Self { root, stage })
    }

    // the durable store surviving restarts, the counterpart of the
    // session-scoped MemoryStorage
    pub fn durable() -> Result<Self, CartError> {
        let data_dir = match dirs::data_local_dir() {
            Some(it) => it,
            None => return Err(CartError::StorageDirUnresolved),
        };

        Self::new(data_dir.join("datacart/carts"))
    }

    fn slot_file(&self, key: &str) -> PathBuf {
        self.root.join(escape_slot_name(key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.slot_file(key)) {
            Ok(content) => Some(content),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                tracing::error!("reading slot {} failed: {:?}", key, err);
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) {
        let staged = self.stage.join(escape_slot_name(key));
        if let Err(err) = fs::write(&staged, value) {
            tracing::error!("staging slot {} failed: {:?}", key, err);
            return;
        }

        if let Err(err) = fs::rename(&staged, self.slot_file(key)) {
            tracing::error!("replacing slot {} failed: {:?}", key, err);
        }
    }

    fn remove_item(&self, key: &str) {
        match fs::remove_file(self.slot_file(key)) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => tracing::error!("removing slot {} failed: {:?}", key, err),
        }
    }
}

fn escape_slot_name(key: &str) -> String {
    key.replace('%', "%0025%").replace('/', "%002F%")
}
