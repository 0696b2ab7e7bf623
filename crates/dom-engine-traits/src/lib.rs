//! Core trait abstractions for DOM engines.
//!
//! This crate defines the traits a DOM implementation must provide to be
//! driven by the harness: tree access and mutation ([`DomEngine`]) and
//! optional XPath snapshot evaluation ([`XPathSupport`]).

pub mod error;
pub mod tree;
pub mod xpath;

pub use error::{Error, Result};
pub use tree::{structurally_equal, DomEngine, NodeKind, ParserOptions, SerializeConfig};
pub use xpath::XPathSupport;
