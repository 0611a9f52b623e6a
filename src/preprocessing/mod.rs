//! Everything that happens to user input before a prompt is built:
//! task selection and upload text extraction.

pub mod cleaner;
pub mod router;

pub use cleaner::{Cleaner, ExtractionError};
pub use router::{AuxField, TaskKind};
