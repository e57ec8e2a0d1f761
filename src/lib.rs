//! Convert BOLSIG+ electron-collision cross-section files into CTML/XML
//! documents for plasma chemistry codes.
//!
//! Two independent pieces do the work:
//! - [`domain::CrossSectionParser`] reads the keyword-structured text format
//!   into typed [`domain::Process`] records.
//! - [`domain::XmlNode`] is a small write-only tree that serializes to
//!   indented markup.
//!
//! [`application::services::ConversionService`] maps records onto the tree
//! and handles file I/O; the `bolsig2ctml` binary wraps it in a CLI.
//!
//! ```no_run
//! use bolsig2ctml::domain::parser;
//!
//! let content = std::fs::read_to_string("Cross section.txt").unwrap();
//! let processes = parser::parse(&content).unwrap();
//! println!("{} processes", processes.len());
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
