//! Purpose: Define the stable public Rust API boundary for chainview.
//! Exports: Record types, scanner, decoders, index, and store pipeline.
//! Role: Public, additive-only surface; hides internal module layout.
//! Invariants: This module is the only public path to scanner primitives.
//! Invariants: Internal modules remain private and are not directly exposed.

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::decode::{Record, decode_account, decode_balance, decode_name_mapping, decode_record};
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::index::{Index, IndexBuilder, ScanStats, ShardStats};
pub use crate::core::object::{Account, Balance, NameMapping, ObjectId, ParseObjectIdError};
pub use crate::core::scan::{DEFAULT_PREAMBLE_LEN, Frame, RecordMarker, Scanner};
pub use crate::core::shard::{ShardData, StoreLayout, load_shard};
pub use crate::core::store::{ObjectStore, load_index};
