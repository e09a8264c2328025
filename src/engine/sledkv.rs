extern crate sled;

use sled::Db;
use slog::Logger;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use super::batch::Batch;
use super::Store;
use crate::get_logger;
use crate::{Result, SledOptions, StoreError};

/// Store key-value pairs on disk with the `sled` engine.
///
/// Example:
///
/// ``` rust
/// # use ledgerkv::{SledOptions, SledStore, Store};
/// # use tempfile::TempDir;
/// let temp_dir = TempDir::new().unwrap();
/// let store = SledStore::open(&SledOptions::new(temp_dir.path())).unwrap();
/// store.put(b"key", b"value").unwrap();
/// assert_eq!(store.get(b"key").unwrap(), b"value".to_vec());
/// store.close().unwrap();
/// ```
pub struct SledStore {
    db: RwLock<Option<Db>>,
    path: PathBuf,
    log: Logger,
}

impl SledStore {
    /// Open or create the database in the configured data directory.
    pub fn open(opts: &SledOptions) -> Result<SledStore> {
        Self::with_logger(opts, None)
    }

    /// Like `open`, logging to `log`.
    pub fn with_logger<LOG>(opts: &SledOptions, log: LOG) -> Result<SledStore>
    where
        LOG: Into<Option<Logger>>,
    {
        let log = get_logger(&mut log.into());
        let path = opts.data_directory_path.clone();
        if path.as_os_str().is_empty() {
            let cause = io::Error::new(io::ErrorKind::InvalidInput, "empty data directory path");
            return Err(StoreError::StorageUnavailable {
                path,
                cause: cause.into(),
            });
        }

        let db = match sled::Config::new().path(&path).open() {
            Ok(db) => db,
            Err(cause) => return Err(StoreError::StorageUnavailable { path, cause }),
        };
        info!(log, "opened sled store at {:?}", path);

        Ok(SledStore {
            db: RwLock::new(Some(db)),
            path,
            log,
        })
    }

    /// The data directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // The handle is reference counted; holding a clone keeps the engine alive
    // until the running operation returns, even across `close`.
    fn db(&self) -> Result<Db> {
        let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
        db.clone().ok_or(StoreError::StorageClosed)
    }
}

impl Store for SledStore {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.db()?.insert(key, value)?;
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        match self.db()?.get(key)? {
            Some(v) => Ok(v.to_vec()),
            None => Err(StoreError::KeyNotFound),
        }
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.db()?.remove(key)?;
        Ok(())
    }

    fn new_batch(&self) -> Batch {
        Batch::sled()
    }

    fn apply_batch(&self, batch: Batch) -> Result<()> {
        let len = batch.len();
        let batch = batch.into_sled()?;
        self.db()?.apply_batch(batch)?;
        debug!(self.log, "applied batch of {} operations", len);
        Ok(())
    }

    fn seek(&self, prefix: &[u8], visitor: &mut dyn FnMut(&[u8], &[u8])) -> Result<()> {
        let db = self.db()?;
        let mut visited = 0;
        // The iterator is dropped on every way out, including `?` and a
        // panicking visitor.
        for item in db.scan_prefix(prefix) {
            let (k, v) = item?;
            visitor(&*k, &*v);
            visited += 1;
        }
        debug!(self.log, "seek {:?}: {} pairs", prefix, visited);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let db = self
            .db
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(db) = db {
            db.flush()?;
            info!(self.log, "closed sled store at {:?}", self.path);
        }
        Ok(())
    }
}
