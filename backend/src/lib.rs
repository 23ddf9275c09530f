//! Shared to-do list backend.
//!
//! Hexagonal layout: [`domain`] holds entities, services and port traits;
//! [`inbound`] adapts HTTP requests onto the services; [`outbound`] provides
//! PostgreSQL, in-memory and credential adapters for the ports.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;
