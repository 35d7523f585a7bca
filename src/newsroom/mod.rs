//! Scheduled content generation for the Tongass News backend.
//!
//! One cycle, nominally every four hours, goes through here:
//!
//! - [`schedule`] - pick the slot's two categories from the clock
//! - [`prompt`] - assemble the system and per-cycle user prompts
//! - [`gateway`] - make the single chat-completion call
//! - [`draft`] - the untrusted payload shapes as parsed
//! - [`validate`] - sanitize and bound every field, item by item
//! - [`cycle`] - orchestrate the above and the freshness bookkeeping
//!
//! The external cron scheduler owns the cadence; nothing in here retries,
//! queues, or sleeps.

mod cycle;
mod draft;
mod gateway;
mod prompt;
mod schedule;
mod validate;

pub use cycle::{run_cycle, CycleOutcome};
pub use draft::{DraftAdvisory, DraftArticle, DraftPayload, DraftTicker};
pub use gateway::{ContentGateway, GatewayError};
pub use prompt::{cycle_prompt, SYSTEM_PROMPT};
pub use schedule::{categories_for, slot};
pub use validate::{validate_advisory, validate_article, validate_ticker, DraftError};
