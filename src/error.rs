use std::path::PathBuf;

use crate::engine::EngineKind;

/// Errors shared by every store backend.
///
/// Each backend maps its engine-specific outcomes onto these kinds, so
/// callers never match on an engine error directly.
#[derive(Debug, Fail)]
pub enum StoreError {
    /// No value is stored under the requested key.
    #[fail(display = "key not found")]
    KeyNotFound,
    /// The engine failed to read or write.
    #[fail(display = "storage I/O error: {}", _0)]
    StorageIo(#[cause] sled::Error),
    /// The batch was created by a store of another engine.
    #[fail(
        display = "invalid batch type: expect {} batch, but found {} batch",
        expected, found
    )]
    InvalidBatchType {
        /// The engine of the store the batch was applied to.
        expected: EngineKind,
        /// The engine that created the batch.
        found: EngineKind,
    },
    /// The backing location could not be opened, locked or created.
    #[fail(display = "storage unavailable at {:?}: {}", path, cause)]
    StorageUnavailable {
        /// The data directory.
        path: PathBuf,
        /// The engine error.
        #[cause]
        cause: sled::Error,
    },
    /// The store has been closed.
    #[fail(display = "storage closed")]
    StorageClosed,
}

impl StoreError {
    /// Whether this is [`StoreError::KeyNotFound`].
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::KeyNotFound => true,
            _ => false,
        }
    }
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::StorageIo(err)
    }
}
