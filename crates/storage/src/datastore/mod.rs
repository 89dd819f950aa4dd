//! Cloud Datastore v1 REST protocol support.
//!
//! `wire` holds the serde models of the request/response shapes, `client`
//! the HTTP plumbing. The mapping between books and entities lives in the
//! datastore backend module.

pub mod client;
pub mod wire;

pub use client::DatastoreClient;
