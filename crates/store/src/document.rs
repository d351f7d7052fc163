//! Whole-document JSON persistence.
//!
//! Every collection is one file under the data directory; `load` reads
//! and parses the whole file, `save` rewrites it completely. There is
//! no partial update and no merge at this layer. Each collection also
//! carries one async writer gate: repositories hold it across their
//! load-modify-save sequence so two writers to the same collection
//! cannot silently drop each other's changes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

const COLLECTION_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Customers,
    Interactions,
    Compliance,
    Products,
    Dashboard,
}

impl Collection {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Customers => "customers.json",
            Self::Interactions => "interactions.json",
            Self::Compliance => "compliance.json",
            Self::Products => "products.json",
            Self::Dashboard => "dashboard.json",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Customers => 0,
            Self::Interactions => 1,
            Self::Compliance => 2,
            Self::Products => 3,
            Self::Dashboard => 4,
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection `{0}` does not exist yet")]
    NotFound(Collection),
    #[error("could not access collection `{collection}`: {source}")]
    Io { collection: Collection, source: std::io::Error },
    #[error("could not decode collection `{collection}`: {source}")]
    Decode { collection: Collection, source: serde_json::Error },
    #[error("could not encode collection `{collection}`: {source}")]
    Encode { collection: Collection, source: serde_json::Error },
}

#[derive(Clone)]
pub struct DocumentStore {
    data_dir: PathBuf,
    gates: Arc<[Mutex<()>; COLLECTION_COUNT]>,
}

impl DocumentStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), gates: Arc::new(Default::default()) }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Writer gate for one collection. Hold the guard across a whole
    /// load-modify-save sequence; plain reads do not need it.
    pub fn gate(&self, collection: Collection) -> &Mutex<()> {
        &self.gates[collection.index()]
    }

    pub async fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<T, StoreError> {
        let path = self.path(collection);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(collection));
            }
            Err(source) => return Err(StoreError::Io { collection, source }),
        };

        serde_json::from_str(&raw).map_err(|source| StoreError::Decode { collection, source })
    }

    pub async fn save<T: Serialize>(
        &self,
        collection: Collection,
        document: &T,
    ) -> Result<(), StoreError> {
        let encoded = serde_json::to_string_pretty(document)
            .map_err(|source| StoreError::Encode { collection, source })?;

        tokio::fs::write(self.path(collection), encoded)
            .await
            .map_err(|source| StoreError::Io { collection, source })
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }
}
