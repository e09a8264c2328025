use super::EngineKind;
use crate::{Result, StoreError};

/// A set of put/delete operations applied atomically by
/// [`Store::apply_batch`](crate::Store::apply_batch).
///
/// Only a store can create a batch, and the batch only fits stores of the
/// same engine.
///
/// ``` rust
/// # use ledgerkv::{MemoryStore, Store};
/// let store = MemoryStore::new();
/// let mut batch = store.new_batch();
/// batch.put(b"a", b"1");
/// batch.delete(b"a");
/// store.apply_batch(batch).unwrap();
/// assert!(store.get(b"a").unwrap_err().is_not_found());
/// ```
#[derive(Debug)]
pub struct Batch {
    ops: Ops,
    len: usize,
}

#[derive(Debug)]
enum Ops {
    Sled(sled::Batch),
    Memory(Vec<Op>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Op {
    Put(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

impl Batch {
    pub(crate) fn sled() -> Batch {
        Batch {
            ops: Ops::Sled(sled::Batch::default()),
            len: 0,
        }
    }

    pub(crate) fn memory() -> Batch {
        Batch {
            ops: Ops::Memory(Vec::new()),
            len: 0,
        }
    }

    /// The engine this batch belongs to.
    pub fn engine(&self) -> EngineKind {
        match self.ops {
            Ops::Sled(_) => EngineKind::Sled,
            Ops::Memory(_) => EngineKind::Memory,
        }
    }

    /// Record a put.
    pub fn put(&mut self, key: &[u8], value: &[u8]) {
        match self.ops {
            Ops::Sled(ref mut b) => b.insert(key, value),
            Ops::Memory(ref mut v) => v.push(Op::Put(key.to_vec(), value.to_vec())),
        }
        self.len += 1;
    }

    /// Record a delete.
    pub fn delete(&mut self, key: &[u8]) {
        match self.ops {
            Ops::Sled(ref mut b) => b.remove(key),
            Ops::Memory(ref mut v) => v.push(Op::Delete(key.to_vec())),
        }
        self.len += 1;
    }

    /// Number of recorded operations.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no operation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn into_sled(self) -> Result<sled::Batch> {
        match self.ops {
            Ops::Sled(b) => Ok(b),
            Ops::Memory(_) => Err(mismatch(EngineKind::Sled, EngineKind::Memory)),
        }
    }

    pub(crate) fn into_memory(self) -> Result<Vec<Op>> {
        match self.ops {
            Ops::Memory(v) => Ok(v),
            Ops::Sled(_) => Err(mismatch(EngineKind::Memory, EngineKind::Sled)),
        }
    }
}

fn mismatch(expected: EngineKind, found: EngineKind) -> StoreError {
    StoreError::InvalidBatchType { expected, found }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut batch = Batch::memory();
        assert!(batch.is_empty());
        batch.put(b"a", b"1");
        batch.put(b"b", b"2");
        batch.delete(b"a");
        assert_eq!(batch.len(), 3);
        assert_eq!(
            batch.into_memory().unwrap(),
            vec![
                Op::Put(b"a".to_vec(), b"1".to_vec()),
                Op::Put(b"b".to_vec(), b"2".to_vec()),
                Op::Delete(b"a".to_vec()),
            ]
        );
    }

    #[test]
    fn engine_tag() {
        let mut batch = Batch::sled();
        batch.put(b"k", b"v");
        assert_eq!(batch.engine(), EngineKind::Sled);
        assert_eq!(batch.len(), 1);
        match batch.into_memory() {
            Err(StoreError::InvalidBatchType { expected, found }) => {
                assert_eq!(expected, EngineKind::Memory);
                assert_eq!(found, EngineKind::Sled);
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(Batch::memory().into_sled().is_err());
    }
}
