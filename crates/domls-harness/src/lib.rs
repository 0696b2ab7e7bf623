//! DOM load/save and XPath extraction pipeline.
//!
//! The pipeline has four components layered over a pluggable
//! [`dom_engine_traits::DomEngine`]:
//!
//! - [`loader`] turns a file path into a parsed document;
//! - [`import`] merges parsed content into an existing document via a
//!   staging fragment, by either of two equivalent strategies;
//! - [`query`] evaluates an XPath expression as an ordered snapshot of
//!   element nodes;
//! - [`report`] serializes matches to a sink behind an error-handler
//!   callback.
//!
//! [`driver`] sequences them, times each phase and maps every failure
//! to a process exit through [`error::HarnessError`].

pub mod config;
pub mod driver;
pub mod error;
pub mod import;
pub mod loader;
pub mod query;
pub mod report;

pub use config::{Backend, ContextStrategy, Mode, RunConfig};
pub use driver::RunReport;
pub use error::{
    HarnessError, ImportError, LoadError, QueryError, Result, SerializationError,
};
pub use import::ImportStrategy;
pub use report::Severity;
