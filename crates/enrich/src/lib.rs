//! AI enrichment for customer communications.
//!
//! The gateway wraps a chat-completion provider behind the [`ChatClient`]
//! trait and degrades gracefully: a missing API key or a failing provider
//! never fails the caller, it just produces a static fallback message.
//!
//! # Key Types
//!
//! - [`Enricher`] - prompt/context composition with graceful degradation
//! - [`ChatClient`] - provider seam, scripted in tests
//! - [`OpenAiChatClient`] - OpenAI-compatible chat-completion client

pub mod client;
pub mod gateway;

pub use client::{ChatClient, ChatMessage, EnrichError, OpenAiChatClient};
pub use gateway::{Enricher, NO_PROVIDER_MESSAGE, PROVIDER_FAILED_MESSAGE};
