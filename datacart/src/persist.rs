use std::collections::HashMap;

use crate::entry::CartEntry;

pub fn stringify_cart(contents: &HashMap<String, CartEntry>) -> String {
    match serde_json::to_string(contents) {
        Ok(it) => it,
        Err(err) => {
            tracing::error!("serializing cart content failed: {:?}", err);
            "{}".to_string()
        }
    }
}

// malformed content heals to an empty cart instead of surfacing a parse error
pub fn parse_cart(content: &str) -> HashMap<String, CartEntry> {
    let mut contents: HashMap<String, CartEntry> = match serde_json::from_str(content) {
        Ok(it) => it,
        Err(err) => {
            tracing::warn!("parsing cart content failed, resetting to empty: {:?}", err);
            return HashMap::new();
        }
    };

    for (key, entry) in contents.iter_mut() {
        if !entry.resource_id.is_empty() {
            continue;
        }

        // older blobs carry the identity only in the key
        if let Some((resource_id, file_path)) = key.split_once('/') {
            entry.resource_id = resource_id.to_string();
            if entry.file_path.is_empty() {
                entry.file_path = file_path.to_string();
            }
        }
    }

    contents
}
