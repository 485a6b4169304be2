//! Import command implementation.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;
use treeline_core::{Import, ImportOptions};
use treeline_git::{import_path, import_url};

/// Run the import command.
pub async fn run(
    path: PathBuf,
    url: Option<String>,
    config: Option<PathBuf>,
    no_metadata: bool,
    timeout: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut options = match config {
        Some(config) => ImportOptions::load(&config)
            .with_context(|| format!("Failed to load options from {}", config.display()))?,
        None => ImportOptions::default(),
    };
    if no_metadata {
        options.attach_metadata = false;
    }
    debug!("Import options: {:?}", options);

    let source = url.clone().unwrap_or_else(|| path.display().to_string());
    if !json {
        println!("{} Importing {}", "→".blue(), source);
    }

    let start = Instant::now();
    let task = tokio::task::spawn_blocking(move || match url {
        Some(url) => import_url(&url, &path, options),
        None => import_path(&path, options),
    });

    let joined = match timeout {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), task).await {
            Ok(joined) => joined,
            Err(_) => {
                eprintln!("{} Import timed out after {}s", "✗".red(), secs);
                // The blocking import cannot be cancelled; exit without waiting for it.
                std::process::exit(1);
            }
        },
        None => task.await,
    };
    let import = joined
        .map_err(|e| anyhow!("Import task failed: {}", e))?
        .with_context(|| format!("Failed to import {}", source))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&import.report)?);
        return Ok(());
    }
    print_summary(&import, start.elapsed());

    Ok(())
}

fn print_summary(import: &Import, elapsed: Duration) {
    let report = &import.report;

    println!();
    println!(
        "{} Imported {} commits in {:.2}s",
        "✓".green(),
        report.commits.to_string().green(),
        elapsed.as_secs_f64()
    );
    println!("  Root commits: {}", report.root_commits);
    println!("  Merge commits: {}", report.merge_commits);
    println!("  Branches: {}", report.branches.join(", ").cyan());
    println!("  Tags: {}", report.tags.join(", ").cyan());

    if !report.skipped_refs.is_empty() {
        println!();
        println!(
            "{} Skipped {} reference(s) not pointing at a commit:",
            "⚠".yellow(),
            report.skipped_refs.len()
        );
        for name in &report.skipped_refs {
            println!("  {}", name);
        }
    }
}
