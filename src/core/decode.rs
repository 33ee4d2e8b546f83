// Tolerant per-record decoders, dispatched on the frame marker.
//
// Decoders are pure functions over a body slice. Malformed input of any
// kind (short buffer, invalid length prefix, non-printable name bytes)
// yields `None`; nothing here panics or allocates beyond the record it
// returns.

use serde::Serialize;

use crate::core::object::{Account, Balance, NameMapping, ObjectId};
use crate::core::scan::{Frame, RecordMarker};

const OBJECT_ID_PREFIX_LEN: usize = 10;
const BALANCE_BODY_LEN: usize = 34;
// Exclusive upper bound on a plausible length-prefixed name.
const MAX_NAME_LEN: usize = 1000;

/// Decoded record, keyed by the marker that routed its body here.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Account(Account),
    NameMapping(NameMapping),
    Balance(Balance),
}

impl Record {
    pub fn marker(&self) -> RecordMarker {
        match self {
            Record::Account(_) => RecordMarker::Account,
            Record::NameMapping(_) => RecordMarker::NameMapping,
            Record::Balance(_) => RecordMarker::Balance,
        }
    }
}

/// A frame whose declared size ran past the buffer has no trustworthy
/// body; it is rejected here before any per-kind decoding.
pub fn decode_record(frame: &Frame<'_>) -> Option<Record> {
    if frame.is_truncated() {
        return None;
    }
    match frame.marker {
        RecordMarker::Account => decode_account(frame.body).map(Record::Account),
        RecordMarker::NameMapping => decode_name_mapping(frame.body).map(Record::NameMapping),
        RecordMarker::Balance => decode_balance(frame.body).map(Record::Balance),
    }
}

/// Body layout: `[space_id u8][type_id u8][instance_id u64 LE]`, then
/// opaque serialized fields from which only the name is recoverable.
pub fn decode_account(body: &[u8]) -> Option<Account> {
    let id = decode_object_id(body)?;
    let name = find_name(body, OBJECT_ID_PREFIX_LEN).map(|(name, _)| name);
    Some(Account::new(id, name))
}

/// Body layout: object-id prefix, then the name heuristic, then an
/// 8-byte LE account instance immediately after the name bytes. There
/// is no resynchronization between name and id, so a misfired name
/// candidate also corrupts the account id; the decode only fails
/// outright when the trailing id bytes are missing.
pub fn decode_name_mapping(body: &[u8]) -> Option<NameMapping> {
    decode_object_id(body)?;
    let (name, name_end) = find_name(body, OBJECT_ID_PREFIX_LEN)?;
    if body.len() < name_end + 8 {
        return None;
    }
    let account_id = ObjectId::account(read_u64(body, name_end));
    Some(NameMapping { name, account_id })
}

/// Fixed 34-byte minimum body: own object id, then owner instance,
/// asset instance, and amount as LE u64 fields. Owner and asset ids are
/// composed with the fixed 1.2 / 1.3 space conventions.
pub fn decode_balance(body: &[u8]) -> Option<Balance> {
    if body.len() < BALANCE_BODY_LEN {
        return None;
    }
    let id = decode_object_id(body)?;
    Some(Balance {
        id,
        owner_id: ObjectId::account(read_u64(body, 10)),
        asset_id: ObjectId::asset(read_u64(body, 18)),
        amount: read_u64(body, 26),
    })
}

fn decode_object_id(body: &[u8]) -> Option<ObjectId> {
    if body.len() < OBJECT_ID_PREFIX_LEN {
        return None;
    }
    Some(ObjectId::new(body[0], body[1], read_u64(body, 2)))
}

/// Best-effort name recovery. Scans forward in 4-byte steps for the
/// first position where a LE u32 length `L` satisfies `0 < L < 1000`,
/// fits in the body, and prefixes `L` bytes of printable ASCII
/// (0x20..=0x7E). The format has no structural field markers, so data
/// that merely looks like a valid length+string pair before the real
/// name wins the scan; callers must treat the result as a heuristic,
/// not a structural guarantee. Returns the name and the offset just
/// past its last byte.
fn find_name(body: &[u8], start: usize) -> Option<(String, usize)> {
    let mut offset = start;
    while offset + 4 <= body.len() {
        let len = read_u32(body, offset) as usize;
        if len > 0 && len < MAX_NAME_LEN && offset + 4 + len <= body.len() {
            let candidate = &body[offset + 4..offset + 4 + len];
            if candidate.iter().all(|byte| (0x20..=0x7E).contains(byte)) {
                let name = String::from_utf8(candidate.to_vec()).ok()?;
                return Some((name, offset + 4 + len));
            }
        }
        offset += 4;
    }
    None
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(word)
}

fn read_u64(buf: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_le_bytes(word)
}
