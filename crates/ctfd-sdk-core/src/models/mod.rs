//! Data models for the cache document and CTFd request payloads.
//!
//! - `EntityKind`: the four collections a name can live in
//! - `IdRecord`, `UserRecord`, `CacheDocument`: what gets persisted locally
//! - Payload types: the JSON bodies sent to `/users`, `/teams`, `/challenges`,
//!   `/flags` and `/teams/{id}/members`

pub mod payload;
pub mod record;

pub use payload::{
    ChallengeState, CreatedResponse, FlagOptions, FlagPayload, FlagUpdatePayload, MemberPayload,
    NewChallenge, TeamPayload, UserPayload, UserRole,
};
pub use record::{CacheDocument, EntityKind, IdRecord, UserRecord};
