//! Constants resolution engine
//!
//! This crate joins the namespace catalog with the versioning index and
//! implements the central resolution algorithm: given a table path, a run
//! number, a variation name and a query mode (latest / as-of-time /
//! by-version), pick the single correct assignment.
//!
//! The [`Database`] is the in-process engine. The [`Provider`] trait is
//! the boundary consumed by integration adapters; [`MemoryProvider`]
//! implements it over a `Database` and maintains the bounded error report
//! the boundary contract requires.

#![warn(clippy::all)]

pub mod config;
pub mod connection;
pub mod database;
pub mod locks;
pub mod provider;
pub mod request;
pub mod resolver;

pub use config::DatabaseConfig;
pub use connection::ConnectionDescriptor;
pub use database::{ConstantsData, ConstantsRecord, Database, NewAssignment};
pub use locks::AdvisoryLocks;
pub use provider::{MemoryProvider, Provider};
pub use request::ConstantsRequest;
pub use resolver::QueryMode;
