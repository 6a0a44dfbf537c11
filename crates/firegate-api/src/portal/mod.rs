// Portal API client and endpoint modules.

pub mod auth;
pub mod client;
pub mod doors;

pub use client::{Endpoint, PortalClient, PortalPaths};
