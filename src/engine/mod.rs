use serde_derive::{Deserialize, Serialize};
use slog::Logger;

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

mod batch;
mod memory;
mod sledkv;

use crate::{Result, StoreConfig};
pub use batch::Batch;
pub use memory::MemoryStore;
pub use sledkv::SledStore;

/// Key-value storage backend.
///
/// All operations block the calling thread until the engine returns. After
/// [`Store::close`] every data operation fails with
/// [`StoreError::StorageClosed`](crate::StoreError::StorageClosed).
pub trait Store: Send + Sync {
    /// Insert or overwrite the value of a key.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;
    /// Get the value of a key, failing with `KeyNotFound` if it is absent.
    fn get(&self, key: &[u8]) -> Result<Vec<u8>>;
    /// Remove a key. Removing an absent key is not an error.
    fn delete(&self, key: &[u8]) -> Result<()>;
    /// Return an empty batch that this store can apply.
    fn new_batch(&self) -> Batch;
    /// Apply all operations of the batch atomically, in recorded order.
    fn apply_batch(&self, batch: Batch) -> Result<()>;
    /// Call `visitor` for every key starting with `prefix`, in ascending key
    /// order.
    fn seek(&self, prefix: &[u8], visitor: &mut dyn FnMut(&[u8], &[u8])) -> Result<()>;
    /// Release the engine.
    fn close(&self) -> Result<()>;
}

/// The engine behind a store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineKind {
    /// On-disk engine, see [`SledStore`].
    #[serde(rename = "sled", alias = "leveldb")]
    Sled,
    /// See [`MemoryStore`].
    #[serde(rename = "inmemory")]
    Memory,
}

impl EngineKind {
    /// Names accepted by `from_str`.
    pub const NAMES: &'static [&'static str] = &["sled", "leveldb", "inmemory"];

    fn name(self) -> &'static str {
        match self {
            EngineKind::Sled => "sled",
            EngineKind::Memory => "inmemory",
        }
    }
}

impl Display for EngineKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s {
            "sled" | "leveldb" => Ok(EngineKind::Sled),
            "inmemory" => Ok(EngineKind::Memory),
            x => Err(format!("unknown engine: {}", x)),
        }
    }
}

/// Open the store described by `cfg`.
pub fn open_store<LOG>(cfg: &StoreConfig, log: LOG) -> Result<Box<dyn Store>>
where
    LOG: Into<Option<Logger>>,
{
    Ok(match cfg.engine {
        EngineKind::Sled => Box::new(SledStore::with_logger(&cfg.sled, log)?),
        EngineKind::Memory => Box::new(MemoryStore::with_logger(log)),
    })
}
