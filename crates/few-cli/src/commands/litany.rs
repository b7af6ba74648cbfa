//! `few litany`

use colored::Colorize;

use few_core::{LitanyOutcome, SyncEngine};
use few_fs::NormalizedPath;

use super::{print_init, print_json, print_package};
use crate::error::{CliError, Result};

/// Materialize every declared package; fails if any package failed.
pub fn run_litany(engine: &SyncEngine, root: &NormalizedPath, json: bool) -> Result<()> {
    if !json {
        println!("{} Reciting few.litany.yaml...", "=>".blue().bold());
    }
    let report = engine.litany(root)?;

    if json {
        print_json(&report)?;
    } else {
        print_init(&report.init);
        if report.outcomes.is_empty() {
            println!("{} No words declared.", "OK".green().bold());
        }
        for outcome in &report.outcomes {
            match outcome {
                LitanyOutcome::Synced(package) => print_package(package),
                LitanyOutcome::Failed { token, error, .. } => {
                    println!("{} {}: {}", "FAILED".red().bold(), token.cyan(), error);
                }
            }
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        return Err(CliError::user(format!(
            "{} of {} packages failed to sync",
            failed,
            report.outcomes.len()
        )));
    }
    Ok(())
}
