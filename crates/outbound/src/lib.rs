//! Outbound side channels: transactional email, task queuing, analytics.
//!
//! Email is the only channel whose failure a caller may care about; the queue
//! and analytics sinks are best-effort by contract and swallow their own
//! failures. Every capability is a single-method trait so tests can drop in
//! a no-op or recording implementation.

pub mod analytics;
pub mod email;
pub mod queue;

pub use analytics::{AnalyticsEvent, AnalyticsSink, MemoryAnalytics, NoopAnalytics, TracingAnalytics};
pub use email::{EmailError, EmailMessage, Mailer, NoopMailer, ResendMailer};
pub use queue::{HttpQueue, NoopQueue, QueueError, QueuedTask, TaskQueue};
