//! Bounded-text translation pipeline: chunking, sequential remote calls, and
//! lossless reassembly.

pub mod chunker;
mod client;
mod language;
mod service;
mod types;

pub use client::TranslationClient;
pub use service::{TranslationApi, TranslationService};
pub use types::{TranslationError, TranslationOutcome};
