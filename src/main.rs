//! nuspec-update - Dependency and release-notes updater for NuGet manifests
//!
//! Lists the dependencies declared in `.nuspec` files and, given
//! `--package` and `--to`, rewrites every declaration of that package and
//! prepends a release-notes entry.

use clap::Parser;
use nuspec_update::cli::CliArgs;
use nuspec_update::logging;
use nuspec_update::orchestrator::Orchestrator;
use nuspec_update::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose);

    // Run the main logic and handle errors
    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    tracing::debug!(
        "nuspec-update v{} target={} dry_run={}",
        env!("CARGO_PKG_VERSION"),
        args.path.display(),
        args.dry_run
    );

    let orchestrator = Orchestrator::new(args.clone())?;
    let result = orchestrator.run();

    let formatter = create_formatter(OutputConfig::from_args(&args));

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    // The only place per-manifest failures reach stderr; JSON carries them itself
    if !args.json && !args.quiet {
        for error in &result.errors {
            eprintln!("Error: {}", error);
        }
    }

    if result.has_errors() {
        // Partial success - some manifests failed
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
