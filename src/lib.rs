//! Self-updating news backend for a Southeast Alaska regional news site.
//!
//! An external scheduler calls `POST /update-content` every four hours. Each
//! call runs one generation cycle: pick the slot's two categories, ask the
//! chat-completion gateway for articles, an advisory, and tickers, validate
//! every field of the untrusted payload, and store what passed. Freshness
//! bookkeeping rides along with each cycle: stale alerts and tickers are
//! deactivated, old articles are deleted. Read endpoints serve the rows.

pub mod config;
pub mod newsroom;
pub mod server;
pub mod storage;
pub mod util;
