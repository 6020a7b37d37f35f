//! Core domain for the paintd services: deterministic pricing, contact
//! submissions, automation batch types, and application configuration.
//!
//! Everything in this crate is I/O-free. The HTTP surfaces and the
//! outbound integrations live in the sibling crates.

pub mod automation;
pub mod config;
pub mod contact;
pub mod pricing;

pub use automation::{AutomationStep, StepOutcome};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use contact::{submission_id, ContactRecord};
pub use pricing::{price_quote, QuoteRequest, QuoteResult};
