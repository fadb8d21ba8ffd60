//! # taskmaster-store
//!
//! The task store and its backing stores.
//!
//! [`store::TaskStore`] owns the authoritative in-memory task collection and
//! synchronizes it with one of two durable backends behind the
//! [`backend::TaskBackend`] trait:
//!
//! - [`local::LocalStore`] — on-device SQLite key-value storage holding the
//!   serialized collection under a fixed per-user key
//! - [`remote::RemoteStore`] — hosted relational API reached over
//!   authenticated HTTPS (PostgREST-style filters)
//!
//! The remote variant is gated behind a signed-in [`auth::Session`] obtained
//! from [`auth::AuthClient`].

#![deny(unsafe_code)]

pub mod auth;
pub mod backend;
pub mod errors;
pub mod local;
pub mod remote;
pub mod store;

pub use auth::{AuthClient, Session};
pub use backend::{NewTask, TaskBackend};
pub use errors::{Result, StoreError};
pub use local::LocalStore;
pub use remote::RemoteStore;
pub use store::TaskStore;
