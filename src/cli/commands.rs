use std::path::Path;

use crate::app::{FeedFailure, PipelineError, Result};
use crate::config::RunConfig;
use crate::manifest;
use crate::pipeline::{Pipeline, RunReport};

/// Write a sample manifest so there is something to run against.
pub fn init_manifest(path: &Path) -> Result<()> {
    manifest::write_default_manifest(path)?;
    println!(
        "Wrote sample manifest to {}. Edit it and run again.",
        path.display()
    );
    Ok(())
}

/// Run the pipeline with `config` and report the result.
pub async fn run_pipeline(config: &RunConfig) -> Result<RunReport> {
    let pipeline = Pipeline::with_http(&config.fetch)?;

    match pipeline.run(config).await {
        Ok(report) => {
            print_report(&report);
            Ok(report)
        }
        Err(e) => {
            if let PipelineError::AllFeedsFailed { failures } = &e {
                print_failures(failures);
            }
            Err(e)
        }
    }
}

fn print_report(report: &RunReport) {
    println!(
        "Wrote {} items from {}/{} feeds to {} ({})",
        report.items,
        report.feeds_succeeded,
        report.feeds_total,
        report.destination.display(),
        report.format
    );
    print_failures(&report.failures);
}

fn print_failures(failures: &[FeedFailure]) {
    if failures.is_empty() {
        return;
    }

    eprintln!("{} feeds failed:", failures.len());
    for failure in failures {
        eprintln!("  ! {} - {}", failure.descriptor().display_label(), failure);
    }
}
