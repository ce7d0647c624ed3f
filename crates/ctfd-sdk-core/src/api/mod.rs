//! Request dispatch for the CTFd REST API.
//!
//! `ApiClient` owns the host, the admin token and the HTTP connection pool.
//! Every call goes through one `request` function which builds the
//! `/api/v1` URL, injects the `Authorization: Token ...` header and treats
//! anything but 200/201 as a failure.

pub mod client;
pub mod error;

pub use client::{ApiClient, API_PREFIX};
pub use error::ApiError;
