//! Image editing providers.

mod chat;

pub use chat::{ChatEditProvider, ChatEditProviderBuilder, DEFAULT_MODEL};
