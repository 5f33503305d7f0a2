//! Persona catalog: the doctor profiles a representative can practise against.
//!
//! Eight personas ship bundled as TOML; a configured directory can replace
//! them. Lookups of unknown ids fail with [`Error::PersonaNotFound`](crate::error::Error).

pub mod catalog;
pub mod registry;
pub mod types;

pub use catalog::PersonaCatalog;
pub use registry::PersonaRegistry;
pub use types::{BehavioralTriggers, KnowledgeLevel, Persona};
