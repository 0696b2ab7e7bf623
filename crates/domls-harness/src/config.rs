//! Run configuration.
//!
//! Everything the original programs hard-wired as compile-time
//! constants (engine choice, run mode, query context case, print and
//! pretty switches) is an explicit runtime value here, carried in a
//! [`RunConfig`] that is passed into the pipeline rather than read from
//! globals.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use dom_engine_traits::ParserOptions;

/// Which DOM engine backs the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// quick-xml arena engine; full DOM support, no XPath
    Quick,
    /// xrust engine; DOM support plus XPath ~1.0
    Xrust,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Quick => "quick-xml",
            Backend::Xrust => "xrust",
        }
    }
}

/// What the run exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Load a file, run both fragment import strategies, compare them
    Import,
    /// Load a file, evaluate an XPath expression, report the matches
    Query,
}

/// Which node an XPath evaluation uses as its context
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContextStrategy {
    /// The document element of the loaded document
    DocumentElement,
    /// The root element, detached from the document first
    DetachedRoot,
    /// The detached root appended to a fresh fragment, fragment as context
    DetachedFragment,
}

/// Complete configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub backend: Backend,
    pub mode: Mode,
    pub file: PathBuf,
    /// XPath expression; required in query mode
    pub expression: Option<String>,
    pub context: ContextStrategy,
    /// Serialize query matches to stdout
    pub print_results: bool,
    pub pretty: bool,
    pub namespace_aware: bool,
    pub validate_if_schema: bool,
}

impl RunConfig {
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            namespace_aware: self.namespace_aware,
            validate_if_schema: self.validate_if_schema,
        }
    }
}
