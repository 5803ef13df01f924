use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// plain concatenation; a "/" inside the resource id is an accepted collision risk
pub fn cart_key(resource_id: &str, file_path: &str) -> String {
    format!("{}/{}", resource_id, file_path)
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "String", into = "String")]
pub enum DownloadStatus {
    #[default]
    NotDownloaded,
    Downloaded,
}

impl DownloadStatus {
    pub fn is_downloaded(&self) -> bool {
        *self == DownloadStatus::Downloaded
    }

    pub fn is_not_downloaded(&self) -> bool {
        !self.is_downloaded()
    }
}

impl From<String> for DownloadStatus {
    fn from(value: String) -> Self {
        if value == "downloaded" {
            DownloadStatus::Downloaded
        } else {
            DownloadStatus::NotDownloaded
        }
    }
}

impl From<DownloadStatus> for String {
    fn from(value: DownloadStatus) -> Self {
        match value {
            DownloadStatus::Downloaded => "downloaded".to_string(),
            DownloadStatus::NotDownloaded => String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    #[serde(default)]
    pub resource_id: String,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "DownloadStatus::is_not_downloaded")]
    pub download_status: DownloadStatus,
    // reconciliation flag written onto foreign listings; never persisted
    #[serde(skip)]
    pub in_cart: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CartEntry {
    pub fn new(resource_id: &str, file_path: &str) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            file_path: file_path.to_string(),
            ..Default::default()
        }
    }

    pub fn with_url(resource_id: &str, file_path: &str, download_url: &str) -> Self {
        Self {
            download_url: Some(download_url.to_string()),
            ..Self::new(resource_id, file_path)
        }
    }

    pub fn from_metadata(resource_id: &str, metadata: &Value) -> Option<Self> {
        let file_path = match metadata.get("filePath").and_then(Value::as_str) {
            Some(it) => it,
            None => {
                tracing::warn!("rejecting file record without filePath: {}", metadata);
                return None;
            }
        };

        let download_url = match metadata.get("downloadURL").and_then(Value::as_str) {
            Some(it) => it,
            None => {
                tracing::warn!("rejecting file record without downloadURL: {}", file_path);
                return None;
            }
        };

        let mut entry = Self::with_url(resource_id, file_path, download_url);
        if let Value::Object(fields) = metadata {
            for (name, value) in fields {
                if matches!(
                    name.as_str(),
                    "resourceId" | "filePath" | "downloadURL" | "downloadUrl" | "downloadStatus"
                        | "inCart"
                ) {
                    continue;
                }

                entry.extra.insert(name.clone(), value.clone());
            }
        }

        Some(entry)
    }

    pub fn key(&self) -> String {
        cart_key(&self.resource_id, &self.file_path)
    }

    pub fn is_downloaded(&self) -> bool {
        self.download_status.is_downloaded()
    }
}
