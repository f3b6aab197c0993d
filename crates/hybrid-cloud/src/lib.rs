//! Hybrid Cloud - circuit breaking, SSE streaming, retry, and per-provider
//! request shaping for every cloud inference backend.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod breaker;
pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod providers;
pub mod registry;
pub mod sse;

pub use breaker::CircuitBreaker;
pub use client::{generate_with_retry, has_any_provider, preferred_provider, CloudProviderClient, StreamBox};
pub use config::ProviderConfig;
pub use error::{CloudError, CloudResult};
pub use message::{Message, MessageRole};
pub use providers::{AnthropicClient, GoogleClient, OpenAiCompatClient, PrivateCloudClient};
pub use registry::CircuitBreakerRegistry;
