//! # Review Triage
//!
//! Turns a shop's customer-feedback webhook into a triaged, enriched
//! review document: extraction, quality gating, relevancy gating, AI
//! enrichment, persistence, and notification fan-out.
//!
//! ```text
//! Webhook → extract → quality gate → relevancy gate → enrich → persist → notify
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use review_triage::Config;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! println!("Listening on {}", config.socket_addr());
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Purpose |
//! |---------|---------|
//! | `mock` | In-memory model/store/notifier backends for tests |
//!
//! ## Modules
//!
//! - [`config`] - Environment-backed configuration
//! - [`model`] - External sentiment/zero-shot/chat-completion adapter
//! - [`classify`] - Toxicity, sentiment, and relevancy classifiers
//! - [`quality`] - Weighted quality scoring and the accept/reject gate
//! - [`enrich`] - AI-generated category, summary, and suggested reply
//! - [`store`] - Shop directory and review persistence
//! - [`notify`] - Push/chat notification fan-out
//! - [`pipeline`] - The fixed-order orchestrator tying every stage together
//! - [`http`] - The webhook and health/readiness surface

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod classify;
pub mod config;
pub mod document;
pub mod enrich;
pub mod extract;
pub mod http;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod quality;
pub mod resources;
pub mod store;
pub mod text;
pub mod validate;

pub use config::{Config, ConfigError};
pub use document::ReviewDocument;
pub use model::{HttpModelClient, ModelClient, ModelError};
pub use notify::{HttpNotifier, NotifyError, Notifier};
pub use pipeline::{Pipeline, PipelineError};
pub use store::{MongoReviewStore, ReviewStore, Shop, StoreError};

#[cfg(any(test, feature = "mock"))]
pub use model::MockModelClient;
#[cfg(any(test, feature = "mock"))]
pub use notify::MockNotifier;
#[cfg(any(test, feature = "mock"))]
pub use store::MockReviewStore;
