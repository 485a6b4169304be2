//! Log command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use treeline_core::ImportOptions;
use treeline_git::{import_repository, GitRepository};

/// Run the log command.
pub async fn run(path: PathBuf, branch: Option<String>, limit: usize) -> Result<()> {
    let repo = GitRepository::open(&path)
        .with_context(|| format!("Failed to open repository at {}", path.display()))?;
    let branch = branch
        .or_else(|| repo.head_branch())
        .context("HEAD is not on a branch; pass --branch")?;

    let import = import_repository(&repo, ImportOptions::default())?;
    let Some(head) = import.repo.branch(&branch) else {
        eprintln!("{} Branch not found: {}", "✗".red(), branch);
        return Ok(());
    };

    let log = import.repo.first_parent_log(head);
    println!("{} {} ({} commits)", "→".blue(), branch.bold(), log.len());
    println!();

    for handle in log.iter().take(limit) {
        let Some(commit) = import.repo.get(*handle) else {
            continue;
        };
        let subject = commit
            .tags
            .short_message()
            .unwrap_or_else(|| commit.message.lines().next().unwrap_or(""));
        let marker = if commit.is_merge() { "M" } else { " " };

        println!(
            "{} {} {} {}",
            commit.id.short().yellow(),
            marker.magenta(),
            commit.timestamp.format("%Y-%m-%d %H:%M"),
            subject
        );
        if let Some(author) = commit.tags.author() {
            println!("    {}", author.dimmed());
        }
    }

    if log.len() > limit {
        println!();
        println!("  ... and {} more (use --limit to see more)", log.len() - limit);
    }

    Ok(())
}
