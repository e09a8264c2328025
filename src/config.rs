extern crate ron;
extern crate serde_json;

use serde_derive::{Deserialize, Serialize};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::EngineKind;

/// Options of the on-disk store.
///
/// Engine tuning is left at the engine defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SledOptions {
    /// Where the engine keeps its files.
    #[serde(rename = "DataDirectoryPath")]
    pub data_directory_path: PathBuf,
}

impl SledOptions {
    /// Options for the given data directory.
    pub fn new(dir: impl AsRef<Path>) -> SledOptions {
        SledOptions {
            data_directory_path: dir.as_ref().to_owned(),
        }
    }
}

/// Which store to open, and how.
///
/// In RON:
///
/// ``` text
/// (Type: sled, SledOptions: (DataDirectoryPath: "./chains/main"))
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// The engine.
    #[serde(rename = "Type")]
    pub engine: EngineKind,
    /// Used by the `sled` engine only.
    #[serde(rename = "SledOptions", default)]
    pub sled: SledOptions,
}

/// Failure to load a [`StoreConfig`].
#[derive(Debug, Fail)]
pub enum ConfigError {
    /// The file could not be read.
    #[fail(display = "failed to read {:?}: {}", _0, _1)]
    Io(PathBuf, #[cause] io::Error),
    /// Bad JSON.
    #[fail(display = "bad json config: {}", _0)]
    Json(#[cause] serde_json::Error),
    /// Bad RON.
    #[fail(display = "bad ron config: {}", _0)]
    Ron(#[cause] ron::de::Error),
}

impl StoreConfig {
    /// Configuration of an on-disk store in `dir`.
    pub fn new(engine: EngineKind, dir: impl AsRef<Path>) -> StoreConfig {
        StoreConfig {
            engine,
            sled: SledOptions::new(dir),
        }
    }

    /// Read a configuration file: `*.json` as JSON, anything else as RON.
    pub fn load(path: impl AsRef<Path>) -> Result<StoreConfig, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_owned(), e))?;
        if path.extension() == Some("json".as_ref()) {
            Self::from_json(&text)
        } else {
            Self::from_ron(&text)
        }
    }

    /// Parse a JSON configuration.
    pub fn from_json(text: &str) -> Result<StoreConfig, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Json)
    }

    /// Parse a RON configuration.
    pub fn from_ron(text: &str) -> Result<StoreConfig, ConfigError> {
        ron::de::from_str(text).map_err(ConfigError::Ron)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn json() {
        let cfg = StoreConfig::from_json(
            r#"{"Type": "leveldb", "SledOptions": {"DataDirectoryPath": "/tmp/chain"}}"#,
        )
        .unwrap();
        assert_eq!(cfg, StoreConfig::new(EngineKind::Sled, "/tmp/chain"));

        let cfg = StoreConfig::from_json(r#"{"Type": "inmemory"}"#).unwrap();
        assert_eq!(cfg.engine, EngineKind::Memory);
        assert_eq!(cfg.sled, SledOptions::default());
    }

    #[test]
    fn ron() {
        let cfg =
            StoreConfig::from_ron(r#"(Type: sled, SledOptions: (DataDirectoryPath: "db"))"#)
                .unwrap();
        assert_eq!(cfg, StoreConfig::new(EngineKind::Sled, "db"));
    }

    #[test]
    fn load_by_extension() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("store.json");
        fs::write(&json, r#"{"Type": "inmemory"}"#).unwrap();
        assert_eq!(StoreConfig::load(&json).unwrap().engine, EngineKind::Memory);

        let ron = dir.path().join("store.ron");
        fs::write(&ron, r#"(Type: inmemory)"#).unwrap();
        assert_eq!(StoreConfig::load(&ron).unwrap().engine, EngineKind::Memory);

        match StoreConfig::load(dir.path().join("missing.ron")) {
            Err(ConfigError::Io(..)) => {}
            other => panic!("unexpected: {:?}", other),
        }
        match StoreConfig::from_json(r#"{"Type": "rocksdb"}"#) {
            Err(ConfigError::Json(_)) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }
}
