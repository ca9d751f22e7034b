// hutch-api: Async Rust client for the RabbitMQ management HTTP API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod paths;
pub mod transport;

mod admin;
mod bindings;
mod connections;
mod exchanges;
mod queues;
mod system;
mod users;
mod vhosts;

pub use auth::Credentials;
pub use client::{Client, ClientConfig};
pub use error::Error;
pub use paths::Endpoint;
pub use transport::{TlsMode, TransportConfig};
