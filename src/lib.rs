//! # Eureka Client
//!
//! A client for the Netflix Eureka REST registry protocol: register a
//! service instance, renew its lease with heartbeats, query the
//! registry, and deregister on shutdown.
//!
//! ## Features
//!
//! - **Multi-server failover**: base URLs are tried in order; transport
//!   failures (connect, DNS, timeout) fall through to the next server
//! - **XML wire fidelity**: the Eureka XML schema round-trips exactly,
//!   including the attribute/text split on port elements
//! - **URL normalization**: base URLs are canonicalized to the
//!   `/eureka/v2` API root
//! - **Connection pooling**: keep-alive reuse with a bounded
//!   per-request timeout
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eureka_client::EurekaClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EurekaClient::new(
//!         ["https://eureka-1.example.com", "https://eureka-2.example.com"],
//!         "my-app",
//!         "10.5.0.50",
//!         8080,
//!     )?;
//!
//!     let handle = client.register("10.5.0.50".parse()?, 90, false).await?;
//!     println!("registered as {}", handle.id);
//!
//!     client.heartbeat().await?;
//!
//!     for app in client.get_all_applications().await?.applications {
//!         println!("{}: {} instances", app.name, app.instances.len());
//!     }
//!
//!     client.unregister().await?;
//!     Ok(())
//! }
//! ```
//!
//! Periodic heartbeating is the caller's responsibility: run
//! [`EurekaClient::heartbeat`] on a timer, re-register on
//! [`EurekaError::InstanceNotFound`], and call
//! [`EurekaClient::unregister`] on shutdown.
//!
//! ## Registry-level access
//!
//! ```rust,no_run
//! use eureka_client::RegistryClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = RegistryClient::new(["https://eureka.example.com"])?;
//! let apps = registry.get_by_vip("billing").await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod model;
mod registry;
mod url;

pub use client::{EurekaClient, InstanceHandle};
pub use config::{RegistryConfig, RegistryConfigBuilder};
pub use error::{EurekaError, Result};
pub use model::{
    Application, Applications, DataCenterInfo, Instance, InstanceStatus, LeaseInfo, Port,
    DEFAULT_DATA_CENTER,
};
pub use registry::RegistryClient;
pub use crate::url::{normalize_base_url, DEFAULT_BASE_PATH};

// Re-export common types
pub use http::StatusCode;

/// Prelude for common imports.
///
/// ```
/// use eureka_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{EurekaClient, InstanceHandle};
    pub use crate::config::{RegistryConfig, RegistryConfigBuilder};
    pub use crate::error::{EurekaError, Result};
    pub use crate::model::{Application, Applications, Instance, InstanceStatus, LeaseInfo, Port};
    pub use crate::registry::RegistryClient;
    pub use http::StatusCode;
}
