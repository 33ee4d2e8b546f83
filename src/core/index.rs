// Immutable lookup index over decoded records, plus per-shard scan
// counters.
use std::collections::HashMap;

use serde::Serialize;

use crate::core::decode::Record;
use crate::core::object::{Account, Balance, ObjectId};

/// Counters for one shard's scan. `rejected` counts frames whose body
/// failed to decode; `truncated` counts frames whose declared size ran
/// past the end of the buffer, always a subset of `rejected`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ShardStats {
    pub bytes: u64,
    pub frames: u64,
    pub decoded: u64,
    pub rejected: u64,
    pub truncated: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ScanStats {
    pub accounts: ShardStats,
    pub name_mappings: ShardStats,
    pub balances: ShardStats,
}

/// Single-pass builder. Accounts and name mappings are keyed maps with
/// last-writer-wins on duplicates; balances accumulate per owner in
/// insertion order.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    accounts: HashMap<ObjectId, Account>,
    names: HashMap<String, ObjectId>,
    balances: HashMap<ObjectId, Vec<Balance>>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: Record) {
        match record {
            Record::Account(account) => {
                self.accounts.insert(account.id, account);
            }
            Record::NameMapping(mapping) => {
                self.names.insert(mapping.name, mapping.account_id);
            }
            Record::Balance(balance) => {
                self.balances.entry(balance.owner_id).or_default().push(balance);
            }
        }
    }

    pub fn finish(self, stats: ScanStats) -> Index {
        Index {
            accounts: self.accounts,
            names: self.names,
            balances: self.balances,
            stats,
        }
    }
}

/// Built once per load, never mutated afterwards; safe to share across
/// threads behind an `Arc` without locking.
#[derive(Debug, Default)]
pub struct Index {
    accounts: HashMap<ObjectId, Account>,
    names: HashMap<String, ObjectId>,
    balances: HashMap<ObjectId, Vec<Balance>>,
    stats: ScanStats,
}

impl Index {
    /// Resolves name to id to account; `None` when either hop misses,
    /// never a partial result.
    pub fn account_by_name(&self, name: &str) -> Option<&Account> {
        let id = self.names.get(name)?;
        self.accounts.get(id)
    }

    pub fn account_by_id(&self, id: &ObjectId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// Empty slice for an unknown owner, never an error.
    pub fn balances(&self, owner_id: &ObjectId) -> &[Balance] {
        self.balances
            .get(owner_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    pub fn balance_count(&self) -> usize {
        self.balances.values().map(Vec::len).sum()
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }
}
