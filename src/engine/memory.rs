use slog::Logger;

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::batch::{Batch, Op};
use super::Store;
use crate::get_logger;
use crate::{Result, StoreError};

type Map = BTreeMap<Vec<u8>, Vec<u8>>;

/// Store key-value pairs in an ordered in-memory map.
///
/// Nothing is persisted; closing the store drops the data.
pub struct MemoryStore {
    map: RwLock<Option<Map>>,
    log: Logger,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> MemoryStore {
        Self::with_logger(None)
    }

    /// Create an empty store logging to `log`.
    pub fn with_logger<LOG>(log: LOG) -> MemoryStore
    where
        LOG: Into<Option<Logger>>,
    {
        let log = get_logger(&mut log.into());
        info!(log, "opened in-memory store");
        MemoryStore {
            map: RwLock::new(Some(Map::new())),
            log,
        }
    }

    // A panicking visitor never runs under the lock, so a poisoned map is
    // still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Option<Map>> {
        self.map.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Map>> {
        self.map.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut map = self.write();
        let map = map.as_mut().ok_or(StoreError::StorageClosed)?;
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let map = self.read();
        let map = map.as_ref().ok_or(StoreError::StorageClosed)?;
        map.get(key).cloned().ok_or(StoreError::KeyNotFound)
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let mut map = self.write();
        let map = map.as_mut().ok_or(StoreError::StorageClosed)?;
        map.remove(key);
        Ok(())
    }

    fn new_batch(&self) -> Batch {
        Batch::memory()
    }

    fn apply_batch(&self, batch: Batch) -> Result<()> {
        let ops = batch.into_memory()?;
        let mut map = self.write();
        let map = map.as_mut().ok_or(StoreError::StorageClosed)?;
        debug!(self.log, "applying batch of {} operations", ops.len());
        for op in ops {
            match op {
                Op::Put(k, v) => {
                    map.insert(k, v);
                }
                Op::Delete(k) => {
                    map.remove(&k);
                }
            }
        }
        Ok(())
    }

    fn seek(&self, prefix: &[u8], visitor: &mut dyn FnMut(&[u8], &[u8])) -> Result<()> {
        let pairs: Vec<(Vec<u8>, Vec<u8>)> = {
            let map = self.read();
            let map = map.as_ref().ok_or(StoreError::StorageClosed)?;
            map.range(prefix.to_vec()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        };
        debug!(self.log, "seek {:?}: {} pairs", prefix, pairs.len());
        for (k, v) in pairs.iter() {
            visitor(k, v);
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        if self.write().take().is_some() {
            info!(self.log, "closed in-memory store");
        }
        Ok(())
    }
}
