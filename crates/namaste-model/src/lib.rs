//! Terminology data model shared by the offline matcher and the runtime
//! resolution engine.

#![deny(unsafe_code)]

pub mod candidate;
pub mod code_system;
pub mod concept_map;
mod lenient;

pub use candidate::{MapType, MappingCandidate};
pub use code_system::{CODE_SYSTEM_RESOURCE, CodeSystem, Concept};
pub use concept_map::{
    CONCEPT_MAP_RESOURCE, ConceptMap, Element, Group, Relationship, TargetEntry,
};
