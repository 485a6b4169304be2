//! Tips command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use treeline_git::import_path;

/// Run the tips command.
pub async fn run(path: PathBuf) -> Result<()> {
    let import = import_path(&path, Default::default())
        .with_context(|| format!("Failed to import {}", path.display()))?;

    let tips = import.repo.tips();
    println!("{} {} tip(s)", "→".blue(), tips.len());

    for handle in tips {
        let Some(commit) = import.repo.get(handle) else {
            continue;
        };
        let names: Vec<&str> = import
            .repo
            .branches()
            .chain(import.repo.tags())
            .filter(|(_, h)| *h == handle)
            .map(|(name, _)| name)
            .collect();

        println!();
        println!(
            "{} {} {}",
            commit.id.short().yellow(),
            commit.timestamp.format("%Y-%m-%d %H:%M"),
            names.join(", ").cyan()
        );
        println!(
            "  {} files, {} bytes",
            commit.snapshot.len(),
            commit.snapshot.byte_size()
        );
        let listing = commit.snapshot.as_list_string();
        for line in listing.lines() {
            println!("  {}", line);
        }
    }

    Ok(())
}
