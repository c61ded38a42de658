use crate::errors::StoreError;
use crate::models::{Account, ChannelMessage};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    path::PathBuf,
    sync::Mutex,
};
use tokio::fs;
use tracing::debug;

pub const ACCOUNTS_KEY: &str = "vitali_v3_core";
pub const CHANNEL_KEY: &str = "vitali_global_comm";

/// Whole-document persistence of the account array.
///
/// `Ok(None)` means nothing has been stored yet.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn load_accounts(&self) -> Result<Option<Vec<Account>>, StoreError>;
    async fn save_accounts(&self, accounts: &[Account]) -> Result<(), StoreError>;
}

/// Whole-document persistence of the shared channel log.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn load_messages(&self) -> Result<Option<Vec<ChannelMessage>>, StoreError>;
    async fn save_messages(&self, messages: &[ChannelMessage]) -> Result<(), StoreError>;
}

/// A backing store for both blobs that can be wiped as a whole.
#[async_trait]
pub trait Storage: AccountRepository + MessageRepository {
    async fn clear(&self) -> Result<(), StoreError>;
}

fn decode<T: DeserializeOwned>(key: &'static str, bytes: &[u8]) -> Result<T, StoreError> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::Corrupt { key, source })
}

fn encode<T: Serialize + ?Sized>(key: &'static str, value: &T) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec_pretty(value).map_err(|source| StoreError::Encode { key, source })
}

/// Stores each blob as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn read<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, StoreError> {
        match fs::read(self.path_for(key)).await {
            Ok(bytes) => decode(key, &bytes).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> Result<(), StoreError> {
        let payload = encode(key, value)?;
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.path_for(key), payload).await?;
        debug!(key, "persisted blob");
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for JsonFileStore {
    async fn load_accounts(&self) -> Result<Option<Vec<Account>>, StoreError> {
        self.read(ACCOUNTS_KEY).await
    }

    async fn save_accounts(&self, accounts: &[Account]) -> Result<(), StoreError> {
        self.write(ACCOUNTS_KEY, accounts).await
    }
}

#[async_trait]
impl MessageRepository for JsonFileStore {
    async fn load_messages(&self) -> Result<Option<Vec<ChannelMessage>>, StoreError> {
        self.read(CHANNEL_KEY).await
    }

    async fn save_messages(&self, messages: &[ChannelMessage]) -> Result<(), StoreError> {
        self.write(CHANNEL_KEY, messages).await
    }
}

#[async_trait]
impl Storage for JsonFileStore {
    async fn clear(&self) -> Result<(), StoreError> {
        for key in [ACCOUNTS_KEY, CHANNEL_KEY] {
            match fs::remove_file(self.path_for(key)).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

/// Keeps the serialized blobs in memory, keyed like the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<&'static str, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw text under a key, bypassing serialization.
    pub fn put_raw(&self, key: &'static str, raw: impl Into<String>) {
        self.lock().insert(key, raw.into());
    }

    pub fn raw(&self, key: &'static str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<&'static str, String>> {
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, StoreError> {
        match self.raw(key) {
            Some(raw) => decode(key, raw.as_bytes()).map(Some),
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> Result<(), StoreError> {
        let payload = encode(key, value)?;
        self.put_raw(key, String::from_utf8_lossy(&payload).into_owned());
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn load_accounts(&self) -> Result<Option<Vec<Account>>, StoreError> {
        self.read(ACCOUNTS_KEY)
    }

    async fn save_accounts(&self, accounts: &[Account]) -> Result<(), StoreError> {
        self.write(ACCOUNTS_KEY, accounts)
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn load_messages(&self) -> Result<Option<Vec<ChannelMessage>>, StoreError> {
        self.read(CHANNEL_KEY)
    }

    async fn save_messages(&self, messages: &[ChannelMessage]) -> Result<(), StoreError> {
        self.write(CHANNEL_KEY, messages)
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn clear(&self) -> Result<(), StoreError> {
        self.lock().clear();
        Ok(())
    }
}
