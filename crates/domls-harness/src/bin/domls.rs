//! DOM load/save and XPath test harness CLI.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dom_engine_traits::XPathSupport;
use domls_harness::{
    driver, Backend, ContextStrategy, HarnessError, Mode, Result, RunConfig, RunReport,
};
use quickxml_adapter::QuickXmlEngine;
use xrust_adapter::XrustEngine;

#[derive(Parser, Debug)]
#[command(name = "domls", about = "DOM load/save and XPath test harness")]
struct Cli {
    /// XML file to load
    file: PathBuf,

    /// XPath expression (query mode)
    expression: Option<String>,

    /// DOM engine to use
    #[arg(long, value_enum, default_value_t = Backend::Xrust)]
    engine: Backend,

    /// What to exercise
    #[arg(long, value_enum, default_value_t = Mode::Query)]
    mode: Mode,

    /// Evaluation context for query mode
    #[arg(long, value_enum, default_value_t = ContextStrategy::DocumentElement)]
    context: ContextStrategy,

    /// Serialize matches to stdout
    #[arg(long)]
    print: bool,

    /// Indent serialized output when the engine can
    #[arg(long)]
    pretty: bool,

    /// Disable namespace tracking in the parser
    #[arg(long)]
    no_namespaces: bool,

    /// Validate when the engine has a schema available
    #[arg(long)]
    validate_if_schema: bool,

    /// Emit the run report as JSON on success
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = RunConfig {
        backend: cli.engine,
        mode: cli.mode,
        file: cli.file,
        expression: cli.expression,
        context: cli.context,
        print_results: cli.print,
        pretty: cli.pretty,
        namespace_aware: !cli.no_namespaces,
        validate_if_schema: cli.validate_if_schema,
    };

    println!(
        "domls: engine {} / {:?} mode / file {}",
        config.backend.as_str(),
        config.mode,
        config.file.display()
    );

    let outcome = match config.backend {
        Backend::Quick => {
            let mut engine = QuickXmlEngine::new(config.parser_options());
            run(&mut engine, &config)
        }
        Backend::Xrust => {
            let mut engine = XrustEngine::new(config.parser_options());
            run(&mut engine, &config)
        }
    };

    match outcome {
        Ok(report) => {
            if cli.json {
                println!("{}", report.to_json());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log_failure(&err);
            ExitCode::FAILURE
        }
    }
}

fn run<E: XPathSupport>(engine: &mut E, config: &RunConfig) -> Result<RunReport> {
    match config.mode {
        Mode::Import => driver::run_import(engine, config),
        Mode::Query => driver::run_query(engine, config),
    }
}

/// One distinguishing line per error category; loader failures get the
/// explicit no-document message since nothing was ever produced.
fn log_failure(err: &HarnessError) {
    match err {
        HarnessError::Load(e) => {
            eprintln!("Failed to load the document!");
            eprintln!("load error: {e}");
        }
        HarnessError::Import(e) => eprintln!("import error: {e}"),
        HarnessError::Query(e) => eprintln!("query error: {e}"),
        HarnessError::Serialization(e) => eprintln!("serialization error: {e}"),
        HarnessError::StrategyMismatch => {
            eprintln!("import error: strategies produced different fragments")
        }
        HarnessError::Io(e) => eprintln!("IO error: {e}"),
    }
}
