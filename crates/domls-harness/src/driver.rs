//! Run driver.
//!
//! Sequences the pipeline for the two run modes, timing every phase
//! with a monotonic clock and collecting the figures in a [`RunReport`]
//! that can be emitted as JSON.

use std::io::Write;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dom_engine_traits::{structurally_equal, DomEngine, SerializeConfig, XPathSupport};

use crate::config::{Mode, RunConfig};
use crate::error::{HarnessError, QueryError, Result};
use crate::import::{self, ImportStrategy};
use crate::report::{report_nodes, stderr_error_handler};
use crate::{loader, query};

/// One timed phase of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub name: String,
    pub duration_ms: u64,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub engine: String,
    pub mode: Mode,
    pub file: String,
    pub timestamp: DateTime<Utc>,
    pub phases: Vec<PhaseTiming>,
    /// Elements matched (query mode) or fragment children (import mode)
    pub matched: Option<usize>,
    /// Nodes written to the sink, when printing was requested
    pub written: Option<usize>,
}

impl RunReport {
    fn new(engine: &str, mode: Mode, config: &RunConfig) -> Self {
        Self {
            engine: engine.to_string(),
            mode,
            file: config.file.display().to_string(),
            timestamp: Utc::now(),
            phases: Vec::new(),
            matched: None,
            written: None,
        }
    }

    fn phase(&mut self, name: &str, duration: Duration) {
        self.phases.push(PhaseTiming {
            name: name.to_string(),
            duration_ms: duration.as_millis() as u64,
        });
    }

    /// Generate a JSON report
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Import mode: load the file, run both import strategies against the
/// loaded document and check the resulting fragments are structurally
/// identical.
pub fn run_import<E: DomEngine>(engine: &mut E, config: &RunConfig) -> Result<RunReport> {
    let mut report = RunReport::new(engine.engine_name(), Mode::Import, config);

    let started = Instant::now();
    let doc = loader::load(engine, &config.file)?;
    let parse_time = started.elapsed();
    println!("Finish parsing in {} ms", parse_time.as_millis());
    report.phase("parse", parse_time);

    let source_xml = std::fs::read_to_string(&config.file)?;

    let started = Instant::now();
    let by_context =
        import::import_fragment(engine, &doc, &source_xml, ImportStrategy::ContextParse)?;
    let context_time = started.elapsed();
    println!(
        "Context-parse import finished in {} ms",
        context_time.as_millis()
    );
    report.phase("import-context-parse", context_time);

    let started = Instant::now();
    let by_manual = import::import_fragment(engine, &doc, &source_xml, ImportStrategy::Manual)?;
    let manual_time = started.elapsed();
    println!("Manual import finished in {} ms", manual_time.as_millis());
    report.phase("import-manual", manual_time);

    if !structurally_equal(engine, &by_context, &by_manual) {
        return Err(HarnessError::StrategyMismatch);
    }
    let count = engine.children(&by_context).len();
    println!("Import strategies agree on {count} top-level node(s)");
    report.matched = Some(count);

    Ok(report)
}

/// Query mode: load the file, evaluate the expression against the
/// configured context and optionally serialize the matches to stdout.
pub fn run_query<E: XPathSupport>(engine: &mut E, config: &RunConfig) -> Result<RunReport> {
    let mut stdout = std::io::stdout().lock();
    run_query_to(engine, config, &mut stdout)
}

/// Same as [`run_query`], with an explicit sink for the serialized
/// matches.
pub fn run_query_to<E: XPathSupport, W: Write>(
    engine: &mut E,
    config: &RunConfig,
    sink: &mut W,
) -> Result<RunReport> {
    let expr = config
        .expression
        .as_deref()
        .ok_or_else(|| QueryError::InvalidExpression("no expression given".to_string()))?;
    let mut report = RunReport::new(engine.engine_name(), Mode::Query, config);

    let started = Instant::now();
    let doc = loader::load(engine, &config.file)?;
    let parse_time = started.elapsed();
    println!("Finish parsing in {} ms", parse_time.as_millis());
    report.phase("parse", parse_time);

    let context = query::prepare_context(engine, &doc, config.context)?;
    for (prefix, uri) in engine.namespaces_in_scope(&context) {
        if prefix.is_empty() {
            println!("in-scope namespace: xmlns=\"{uri}\"");
        } else {
            println!("in-scope namespace: xmlns:{prefix}=\"{uri}\"");
        }
    }

    let started = Instant::now();
    let matches = query::evaluate_elements(engine, &context, expr)?;
    let query_time = started.elapsed();
    println!(
        "Found {} element(s) in {} ms",
        matches.len(),
        query_time.as_millis()
    );
    report.phase("query", query_time);
    report.matched = Some(matches.len());

    if config.print_results {
        let serialize_config = SerializeConfig {
            encoding: "UTF-8".to_string(),
            pretty: config.pretty,
        };
        let mut handler = stderr_error_handler;
        let written = report_nodes(engine, &matches, sink, &serialize_config, &mut handler)?;
        report.written = Some(written);
    }

    Ok(report)
}
