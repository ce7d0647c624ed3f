//! Local name → id storage.
//!
//! This module provides the `CacheStore`, a single JSON file mapping the
//! names callers chose for users, teams, challenges and flags to the ids
//! CTFd assigned them. Every operation re-reads the file and every mutation
//! rewrites it whole, so edits made between calls are always observed.
//!
//! There is no locking: two processes mutating the same file race and the
//! last write wins.

pub mod manager;

pub use manager::CacheStore;
