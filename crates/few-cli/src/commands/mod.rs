//! Command implementations for few-cli

pub mod listen;
pub mod litany;

pub use listen::{run_listen_init, run_listen_package};
pub use litany::run_litany;

use colored::Colorize;
use serde::Serialize;

use few_core::{CacheStatus, InitReport, PackageReport};

use crate::error::Result;

/// Print `report` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub(crate) fn print_init(report: &InitReport) {
    for action in &report.actions {
        println!("   {} {}", "+".green(), action);
    }
}

pub(crate) fn print_package(report: &PackageReport) {
    let how = match &report.cache {
        CacheStatus::Cloned => "cloned".green(),
        CacheStatus::Updated => "updated".green(),
        CacheStatus::Stale { .. } => "stale".yellow(),
    };
    println!(
        "{} {} ({}, {} files) -> {}",
        "OK".green().bold(),
        report.name.cyan(),
        how,
        report.files,
        report.path.dimmed()
    );
    for warning in &report.warnings {
        println!("   {} {}", "!".yellow(), warning);
    }
}
