//! Cache module for verification code storage
//!
//! Codes live in process memory keyed by `login_cell_phone_number:{phone}`.
//! Expiry is enforced on read; a background sweeper evicts expired entries so
//! memory stays bounded by the number of live codes.

pub mod memory_cache;

pub use memory_cache::{InMemoryCodeCache, LOGIN_CODE_KEY_PREFIX};
