//! Service Availability Checker Library
//!
//! This library probes the sites of named services concurrently, deduplicates
//! probes of the same URL across services, and reports per-service availability.

pub mod cache;
pub mod checker;
pub mod config;
pub mod engine;
pub mod errors;
pub mod loader;
pub mod model;
pub mod output;
pub mod probe;
pub mod render;
pub mod retry;
pub mod status;

pub use cache::ResultCache;
pub use config::CheckConfig;
pub use engine::CheckEngine;
pub use errors::{CheckerError, Result};
pub use loader::SourceLoader;
pub use model::{CheckReport, ProbeOutcome, Service, SiteReport};
pub use output::{CheckEvent, OutputSink};
pub use probe::{HttpProber, Prober};
pub use render::Renderer;
pub use status::{Classification, StatusCategory, classify};
