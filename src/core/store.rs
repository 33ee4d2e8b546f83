// Load pipeline: shard files -> frames -> records -> immutable Index.
//
// Loading is synchronous and all-or-nothing; no index is queryable
// until every shard has been read to completion. Malformed records are
// counted and skipped, absent files are empty shards, and only I/O
// failures other than not-found abort a load.
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::core::decode::decode_record;
use crate::core::error::Error;
use crate::core::index::{Index, IndexBuilder, ScanStats, ShardStats};
use crate::core::scan::Scanner;
use crate::core::shard::{self, StoreLayout};

/// Handle over the object database. Holds the current `Index` behind an
/// `Arc`; `snapshot` hands it out for lock-free reads and `reload`
/// swaps in a freshly built one. Readers holding an older snapshot are
/// unaffected by a reload, and a failed reload leaves the previous
/// index in place.
pub struct ObjectStore {
    layout: StoreLayout,
    current: RwLock<Arc<Index>>,
}

impl ObjectStore {
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let layout = StoreLayout::new(data_dir);
        let index = load_index(&layout)?;
        Ok(Self {
            layout,
            current: RwLock::new(Arc::new(index)),
        })
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn snapshot(&self) -> Arc<Index> {
        match self.current.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn reload(&self) -> Result<Arc<Index>, Error> {
        let index = Arc::new(load_index(&self.layout)?);
        match self.current.write() {
            Ok(mut slot) => *slot = index.clone(),
            Err(poisoned) => *poisoned.into_inner() = index.clone(),
        }
        Ok(index)
    }
}

/// Runs the full load-scan-decode-index pipeline over all three shards.
pub fn load_index(layout: &StoreLayout) -> Result<Index, Error> {
    let mut builder = IndexBuilder::new();
    let stats = ScanStats {
        accounts: load_shard_into(&mut builder, &layout.accounts_path(), "accounts")?,
        name_mappings: load_shard_into(&mut builder, &layout.name_mappings_path(), "names")?,
        balances: load_shard_into(&mut builder, &layout.balances_path(), "balances")?,
    };
    let index = builder.finish(stats);
    info!(
        accounts = index.account_count(),
        names = index.name_count(),
        balances = index.balance_count(),
        "object database indexed"
    );
    Ok(index)
}

fn load_shard_into(
    builder: &mut IndexBuilder,
    path: &Path,
    label: &str,
) -> Result<ShardStats, Error> {
    let shard = shard::load_shard(path)?;
    if shard.is_absent() {
        info!(shard = label, path = %path.display(), "shard absent, treated as empty");
        return Ok(ShardStats::default());
    }

    let bytes = shard.bytes();
    let mut stats = ShardStats {
        bytes: bytes.len() as u64,
        ..ShardStats::default()
    };
    for frame in Scanner::new(bytes) {
        stats.frames += 1;
        if frame.is_truncated() {
            stats.truncated += 1;
        }
        match decode_record(&frame) {
            Some(record) => {
                stats.decoded += 1;
                builder.insert(record);
            }
            None => {
                stats.rejected += 1;
                debug!(
                    shard = label,
                    offset = frame.offset,
                    marker = frame.marker.as_str(),
                    declared_len = frame.declared_len,
                    "rejected frame"
                );
            }
        }
    }
    info!(
        shard = label,
        bytes = stats.bytes,
        frames = stats.frames,
        decoded = stats.decoded,
        rejected = stats.rejected,
        "shard scanned"
    );
    Ok(stats)
}
