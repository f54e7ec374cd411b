//! Product store access for the catalog query layer.
//!
//! This crate provides:
//! - `ProductStore` - The store contract the resolver queries
//! - `HttpProductStore` - The public HTTP API with per-endpoint timeout/retry
//! - `InMemoryStore` - The same list semantics over fixture data
//! - `Endpoint` - Endpoint paths and transport defaults
//! - `RetryPolicy` / `TimeoutConfig` - Transport policies

mod endpoint;
mod error;
mod http;
mod memory;
mod retry;
mod store;
mod timeout;
pub mod wire;

pub use endpoint::*;
pub use error::*;
pub use http::*;
pub use memory::*;
pub use retry::*;
pub use store::*;
pub use timeout::*;
