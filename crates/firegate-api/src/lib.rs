//! Async client for the access-control portal's session-based door API.
//!
//! [`PortalClient`] signs in, lists doors and issues the bulk
//! lock/unlock commands. It performs exactly one HTTP round-trip per call
//! and never retries; `firegate-core` owns the retry and polling policy.

pub mod error;
pub mod models;
pub mod portal;
pub mod transport;

pub use error::Error;
pub use models::{DoorRecord, SessionId};
pub use portal::{Endpoint, PortalClient, PortalPaths};
pub use transport::{TlsMode, TransportConfig};
