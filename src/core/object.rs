// Typed records reconstructed from object-database shards.
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

pub const ACCOUNT_SPACE_ID: u8 = 1;
pub const ACCOUNT_TYPE_ID: u8 = 2;
pub const ASSET_SPACE_ID: u8 = 1;
pub const ASSET_TYPE_ID: u8 = 3;

/// Composite object key. The `(space_id, type_id)` pair determines
/// which decoder applies; `instance_id` is unique within a shard.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ObjectId {
    pub space_id: u8,
    pub type_id: u8,
    pub instance_id: u64,
}

impl ObjectId {
    pub fn new(space_id: u8, type_id: u8, instance_id: u64) -> Self {
        Self {
            space_id,
            type_id,
            instance_id,
        }
    }

    /// Account-space id (`1.2.{instance}`).
    pub fn account(instance_id: u64) -> Self {
        Self::new(ACCOUNT_SPACE_ID, ACCOUNT_TYPE_ID, instance_id)
    }

    /// Asset-space id (`1.3.{instance}`).
    pub fn asset(instance_id: u64) -> Self {
        Self::new(ASSET_SPACE_ID, ASSET_TYPE_ID, instance_id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.space_id, self.type_id, self.instance_id)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseObjectIdError;

impl fmt::Display for ParseObjectIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object id must have the form space.type.instance")
    }
}

impl std::error::Error for ParseObjectIdError {}

impl FromStr for ObjectId {
    type Err = ParseObjectIdError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut parts = text.splitn(3, '.');
        let space_id = parts
            .next()
            .and_then(|part| part.parse::<u8>().ok())
            .ok_or(ParseObjectIdError)?;
        let type_id = parts
            .next()
            .and_then(|part| part.parse::<u8>().ok())
            .ok_or(ParseObjectIdError)?;
        let instance_id = parts
            .next()
            .and_then(|part| part.parse::<u64>().ok())
            .ok_or(ParseObjectIdError)?;
        Ok(Self::new(space_id, type_id, instance_id))
    }
}

/// Account record. `name` is set only when the name heuristic finds a
/// plausible length-prefixed string after the id prefix; an account
/// without a name is a valid decoded state. The key fields are part of
/// the upstream model but are not recoverable from the shard format,
/// so decoders leave them unset.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Account {
    pub id: ObjectId,
    pub name: Option<String>,
    pub owner_key: Option<String>,
    pub active_key: Option<String>,
    pub memo_key: Option<String>,
}

impl Account {
    pub fn new(id: ObjectId, name: Option<String>) -> Self {
        Self {
            id,
            name,
            owner_key: None,
            active_key: None,
            memo_key: None,
        }
    }
}

/// Name-to-account mapping; many names may resolve to one account.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct NameMapping {
    pub name: String,
    pub account_id: ObjectId,
}

/// Balance record. Duplicates for the same `(owner_id, asset_id)` pair
/// are preserved as separate entries.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Balance {
    pub id: ObjectId,
    pub owner_id: ObjectId,
    pub asset_id: ObjectId,
    pub amount: u64,
}
