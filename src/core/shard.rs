// Shard file loading and object-database path layout.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::{Error, ErrorKind};

/// Contents of one shard file. A missing file is `Absent`, which every
/// downstream consumer treats exactly like a shard with zero records.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ShardData {
    Absent,
    Loaded(Vec<u8>),
}

impl ShardData {
    pub fn bytes(&self) -> &[u8] {
        match self {
            ShardData::Absent => &[],
            ShardData::Loaded(bytes) => bytes,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ShardData::Absent)
    }
}

/// Reads one shard fully into memory. Not-found is not an error; any
/// other I/O failure is reported with the path attached rather than
/// swallowed into an empty result.
pub fn load_shard(path: impl AsRef<Path>) -> Result<ShardData, Error> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => Ok(ShardData::Loaded(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "shard file absent");
            Ok(ShardData::Absent)
        }
        Err(err) => Err(Error::new(read_error_kind(&err))
            .with_message("failed to read shard")
            .with_path(path)
            .with_source(err)),
    }
}

fn read_error_kind(err: &io::Error) -> ErrorKind {
    match err.kind() {
        io::ErrorKind::PermissionDenied => ErrorKind::Permission,
        _ => ErrorKind::Io,
    }
}

/// Fixed on-disk layout of the object database under a witness data
/// directory: `<root>/blockchain/object_database/<space>/<type>`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: data_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_database(&self) -> PathBuf {
        self.root.join("blockchain").join("object_database")
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.object_database().join("1").join("2")
    }

    pub fn name_mappings_path(&self) -> PathBuf {
        self.object_database().join("1").join("3")
    }

    pub fn balances_path(&self) -> PathBuf {
        self.object_database().join("2").join("5")
    }
}
