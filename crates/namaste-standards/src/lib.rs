#![deny(unsafe_code)]

pub mod canonical;
pub mod config;
pub mod error;
pub mod loaders;
pub mod paths;

pub use crate::canonical::{SystemFileTable, SystemUriTable};
pub use crate::config::{
    ConceptMapMeta, FallbackConfig, JobConfig, MatchingConfig, ResolutionConfig,
    TerminologyConfig,
};
pub use crate::error::StandardsError;
pub use crate::loaders::{load_code_system, load_concept_map, read_json};
