//! Core library for managing CTFd entities by name.
//!
//! CTFd assigns numeric ids to every user, team, challenge and flag. This crate
//! lets callers address those entities by the names they chose, keeping a small
//! JSON document that maps each name to its remote id.
//!
//! - `api`: authenticated request dispatch against the CTFd REST API
//! - `cache`: the name → id store persisted on disk
//! - `ctfd`: the async entity operations (`CtfdApi`)
//! - `blocking`: the same operations for synchronous callers
//! - `config`: explicit configuration resolved from the environment
//! - `models`: cache records and request payloads

pub mod api;
pub mod blocking;
pub mod cache;
pub mod config;
pub mod ctfd;
pub mod error;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use blocking::BlockingCtfdApi;
pub use cache::CacheStore;
pub use config::Config;
pub use ctfd::CtfdApi;
pub use error::{Error, Result};
pub use models::{
    CacheDocument, ChallengeState, EntityKind, FlagOptions, IdRecord, NewChallenge, UserRecord,
    UserRole,
};
