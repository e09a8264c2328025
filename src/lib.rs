#![deny(missing_docs)]
//! A pluggable key-value store adapter.
//!
//! Every backend implements the [`Store`] trait, so ledger code can be
//! written against the trait and the engine picked at startup from a
//! [`StoreConfig`].

extern crate failure;
#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate slog;

use slog::{Drain, Logger};

mod config;
mod engine;
mod error;

pub use config::{ConfigError, SledOptions, StoreConfig};
pub use engine::{open_store, Batch, EngineKind, MemoryStore, SledStore, Store};
pub use error::StoreError;

/// Store Result
pub type Result<T> = std::result::Result<T, StoreError>;

/// Take the given logger, or build one forwarding to the `log` facade.
pub(crate) fn get_logger(log: &mut Option<Logger>) -> Logger {
    match log.take() {
        Some(log) => log,
        None => Logger::root(slog_stdlog::StdLog.fuse(), o!()),
    }
}
