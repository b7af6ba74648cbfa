//! `few listen` and `few listen <package>`

use colored::Colorize;

use few_core::SyncEngine;
use few_fs::NormalizedPath;

use super::{print_init, print_json, print_package};
use crate::error::Result;

/// Initialize the project without adding a package.
pub fn run_listen_init(engine: &SyncEngine, root: &NormalizedPath, json: bool) -> Result<()> {
    let report = engine.listen_init(root)?;
    if json {
        return print_json(&report);
    }

    if report.is_noop() {
        println!("{} Project already initialized.", "OK".green().bold());
    } else {
        println!("{} Initializing project...", "=>".blue().bold());
        print_init(&report);
        println!("{} Project initialized.", "OK".green().bold());
    }
    Ok(())
}

/// Declare `token` in the manifest and materialize it.
pub fn run_listen_package(
    engine: &SyncEngine,
    root: &NormalizedPath,
    token: &str,
    json: bool,
) -> Result<()> {
    if !json {
        println!("{} Listening for {}...", "=>".blue().bold(), token.cyan());
    }
    let report = engine.listen_package(root, token)?;
    if json {
        return print_json(&report);
    }

    print_init(&report.init);
    if report.package.manifest_updated {
        println!(
            "   {} added '{}' to few.litany.yaml",
            "+".green(),
            report.package.token
        );
    }
    print_package(&report.package);
    Ok(())
}
