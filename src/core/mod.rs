// Core modules implementing shard scanning, decoding, indexing, and
// error modeling.
pub mod decode;
pub mod error;
pub mod index;
pub mod object;
pub mod scan;
pub mod shard;
pub mod store;
