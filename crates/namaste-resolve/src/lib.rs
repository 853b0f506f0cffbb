//! Runtime terminology resolution.
//!
//! A [`ResolutionEngine`] answers CodeSystem retrieval, concept search and
//! code translation by trying an authoritative [`TerminologyStore`] first and
//! static fallback documents second. Results come back structured
//! ([`response`]) and can be projected into FHIR resources ([`render`]).

#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod fallback;
pub mod memory;
pub mod render;
pub mod response;
pub mod store;
pub mod strategy;

pub use engine::ResolutionEngine;
pub use error::{ResolveError, Result, StoreError};
pub use fallback::FallbackFiles;
pub use memory::{ImportOutcome, ImportReport, MemoryStore};
pub use response::{ConceptHit, LookupResult, TranslateResult, TranslationMatch};
pub use store::{StoredSystem, TerminologyStore};
pub use strategy::{FallbackTier, ResolverTier, StoreTier};
