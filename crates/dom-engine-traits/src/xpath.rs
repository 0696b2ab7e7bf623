//! XPath capability trait

use crate::error::Result;
use crate::tree::DomEngine;

/// Trait for engines that can evaluate XPath expressions.
///
/// Evaluation uses ordered snapshot semantics: the result sequence is
/// fully materialized, in document order, before it is returned. Later
/// mutation of the source tree does not affect a returned snapshot's
/// membership.
///
/// Engines without an XPath feature set still implement this trait and
/// answer every evaluation with [`crate::Error::Unsupported`], the same
/// way requesting an XPath feature from a plain DOM implementation fails
/// at runtime rather than at selection time.
pub trait XPathSupport: DomEngine {
    /// Evaluate `expr` with `context` as the context node and return the
    /// matching nodes as a snapshot. Expressions producing atomic values
    /// are rejected, as only node snapshots are meaningful here.
    fn evaluate_snapshot(&mut self, context: &Self::Node, expr: &str) -> Result<Vec<Self::Node>>;

    /// The XPath version this engine supports, for logs.
    fn xpath_version(&self) -> &'static str;
}
