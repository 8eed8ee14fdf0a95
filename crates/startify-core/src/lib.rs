//! Shared domain types, configuration, and store contracts for Startify.
//!
//! Everything the idea-processing pipeline passes between stages lives here so
//! the persistence collaborator (`startify-db`) and the pipeline crate agree on
//! one set of shapes without depending on each other.

pub mod app_config;
pub mod config;
pub mod content;
pub mod idea;
pub mod investors;
pub mod job;
pub mod memory;
pub mod research;
pub mod store;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use content::{GeneratedContent, PitchSections};
pub use idea::{Entity, StructuredIdea, DEFAULT_AUDIENCE, DEFAULT_INDUSTRY};
pub use investors::{builtin_investor_pool, load_investor_pool, InvestorProfile, InvestorsFile};
pub use job::{Job, JobStatus, OutputKind, OutputRecord};
pub use memory::MemoryStore;
pub use research::{Competitor, InvestorMatch, MarketInsights, ResearchResult};
pub use store::{CacheStore, JobStore, StoreError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read investors file {path}: {source}")]
    InvestorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse investors file: {0}")]
    InvestorsFileParse(#[from] serde_yaml::Error),

    #[error("investor pool validation failed: {0}")]
    Validation(String),
}
