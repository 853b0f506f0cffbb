//! Offline NAMASTE → ICD-11 matcher.
//!
//! Pipeline, leaves first: [`score`] → [`synonyms`] / [`keywords`] →
//! [`engine`] (ranking) → [`materialize`] (dual CSV + ConceptMap).

#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod keywords;
pub mod materialize;
pub mod score;
pub mod synonyms;

pub use engine::{MatchJob, MatchingEngine, ScoredTarget};
pub use error::{MapError, Result};
pub use keywords::DomainKeywordSet;
pub use materialize::{
    AssemblyContext, DualCsv, JobSummary, Materializer, assemble_concept_map, clean_candidates,
    machine_name, write_dual_csv,
};
pub use score::{edit_similarity, hybrid_similarity, term_overlap_similarity};
pub use synonyms::SynonymTable;
