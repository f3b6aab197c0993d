//! Concrete provider clients.

mod anthropic;
mod google;
mod openai_compat;
mod private_cloud;

pub use anthropic::AnthropicClient;
pub use google::GoogleClient;
pub use openai_compat::OpenAiCompatClient;
pub use private_cloud::PrivateCloudClient;
