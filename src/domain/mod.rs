//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod parser;
pub mod xml;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use parser::CrossSectionParser;
pub use xml::{NodeValue, XmlNode, COMMENT_TAG};
