//! ledgit command-line interface.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use ledgit::{
    AsciiTreeRenderer, CommitDiff, Error, FileChange, Repository, RunKind, Settings, TreeRenderer,
};

/// ledgit - a minimal content-addressable version control tool
#[derive(Parser)]
#[command(name = "ledgit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run as if started in this directory
    #[arg(short = 'C', long = "repo", global = true, value_name = "DIR")]
    repo: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty repository
    Init {
        /// Store objects zlib-compressed
        #[arg(long)]
        compress: bool,
    },
    /// Stage a file
    Add {
        /// File to stage
        file: PathBuf,
    },
    /// Record the staged files as a new commit
    Commit {
        /// Commit message
        message: String,
    },
    /// Show commit history, newest first
    Log {
        /// Number of commits to show
        #[arg(short = 'n', long = "max-count")]
        limit: Option<usize>,
    },
    /// Show a commit and its changes against its parent
    Show {
        /// Full or abbreviated commit digest
        commit: String,
    },
    /// Draw the ancestry chain as a tree
    Tree,
    /// List staged files
    Status,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let base = match cli.repo {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Init { compress } => init(&base, compress),
        Commands::Add { file } => add(&base, &file),
        Commands::Commit { message } => commit(&base, &message),
        Commands::Log { limit } => log(&base, limit, &mut io::stdout().lock()),
        Commands::Show { commit } => show(&base, &commit, &mut io::stdout().lock()),
        Commands::Tree => tree(&base),
        Commands::Status => status(&base),
    }
}

fn open(base: &Path) -> Result<Repository> {
    Repository::discover(base).context("Failed to find repository")
}

fn init(base: &Path, compress: bool) -> Result<()> {
    let settings = Settings {
        compression: compress,
        ..Settings::default()
    };
    match Repository::init_with(base, settings) {
        Ok(repo) => {
            println!(
                "Initialized empty repository in {}",
                repo.ledgit_dir().display()
            );
            Ok(())
        }
        Err(Error::AlreadyInitialized(dir)) => {
            println!("Repository already initialized at {}", dir.display());
            Ok(())
        }
        Err(e) => Err(e).context("Failed to initialize repository"),
    }
}

fn add(base: &Path, file: &Path) -> Result<()> {
    let repo = open(base)?;
    let base = base
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", base.display()))?;

    let digest = repo
        .add(base.join(file))
        .with_context(|| format!("Failed to add {}", file.display()))?;
    println!("Added {} ({})", file.display(), digest.yellow());
    Ok(())
}

fn commit(base: &Path, message: &str) -> Result<()> {
    let repo = open(base)?;
    let digest = repo.commit(message).context("Failed to commit")?;
    println!("Committed {}", digest.yellow());
    Ok(())
}

fn print_message(out: &mut impl Write, message: &str) -> io::Result<()> {
    for line in message.lines() {
        writeln!(out, "    {}", line)?;
    }
    Ok(())
}

fn log(base: &Path, limit: Option<usize>, out: &mut impl Write) -> Result<()> {
    let repo = open(base)?;
    if repo.head().is_none() {
        writeln!(out, "{}", "No commits yet".dimmed())?;
        return Ok(());
    }

    for (shown, commit) in repo.log().take(limit.unwrap_or(usize::MAX)).enumerate() {
        let commit = commit.context("Failed to read history")?;
        if shown > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{} {}", "commit".yellow(), commit.digest().yellow())?;
        writeln!(out, "Date: {}", commit.timestamp())?;
        writeln!(out)?;
        print_message(out, commit.message())?;
    }
    Ok(())
}

fn show(base: &Path, rev: &str, out: &mut impl Write) -> Result<()> {
    let repo = open(base)?;
    let commit = match repo.resolve(rev).and_then(|digest| repo.get_commit(&digest)) {
        Ok(commit) => commit,
        Err(e) if e.is_not_found() => anyhow::bail!("commit not found: {}", rev),
        Err(e) => return Err(e).with_context(|| format!("Failed to read commit {}", rev)),
    };

    let digest = *commit.digest();
    let diff = repo
        .diff_commit(commit)
        .with_context(|| format!("Failed to diff commit {}", digest.short()))?;
    print_commit_diff(out, &diff)?;
    Ok(())
}

fn print_commit_diff(out: &mut impl Write, diff: &CommitDiff) -> io::Result<()> {
    let commit = diff.commit();
    writeln!(out, "{} {}", "commit".yellow(), commit.digest().yellow())?;
    writeln!(out, "Date: {}", commit.timestamp())?;
    writeln!(out)?;
    print_message(out, commit.message())?;
    writeln!(out)?;

    match diff.parent() {
        Some(parent) => writeln!(out, "Parent: {}", parent)?,
        None => writeln!(out, "{}", "first commit, no parent".dimmed())?,
    }

    for file in diff.files() {
        writeln!(out)?;
        match file.change() {
            FileChange::New { .. } => {
                writeln!(out, "{} {}", "new file:".green().bold(), file.path())?;
            }
            FileChange::Binary => {
                writeln!(out, "{}", format!("--- {}", file.path()).bold())?;
                writeln!(out, "{}", format!("+++ {}", file.path()).bold())?;
                writeln!(out, "binary files differ")?;
            }
            FileChange::Modified { runs } => {
                writeln!(out, "{}", format!("--- {}", file.path()).bold())?;
                writeln!(out, "{}", format!("+++ {}", file.path()).bold())?;
                for run in runs {
                    for line in run.lines() {
                        let text = format!("{}{}", run.kind.marker(), line);
                        match run.kind {
                            RunKind::Added => writeln!(out, "{}", text.green())?,
                            RunKind::Removed => writeln!(out, "{}", text.red())?,
                            RunKind::Unchanged => writeln!(out, "{}", text)?,
                        }
                    }
                }
            }
        }
    }

    let stats = diff.stats();
    writeln!(out)?;
    writeln!(
        out,
        "{} new, {} modified, {} insertions(+), {} deletions(-)",
        stats.new_files, stats.modified_files, stats.lines_added, stats.lines_removed
    )
}

fn tree(base: &Path) -> Result<()> {
    let repo = open(base)?;
    let ancestry = repo.ancestry().context("Failed to read history")?;
    if ancestry.is_empty() {
        println!("{}", "No commits found".dimmed());
        return Ok(());
    }
    print!("{}", AsciiTreeRenderer.render(&ancestry.to_indented_text()));
    Ok(())
}

fn status(base: &Path) -> Result<()> {
    let repo = open(base)?;
    let staged = repo.staged().context("Failed to read index")?;
    if staged.is_empty() {
        println!("{}", "Nothing staged".dimmed());
        return Ok(());
    }

    println!("Staged for commit:");
    for entry in &staged {
        println!("  {} {}", entry.digest().short().yellow(), entry.path());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn repo_with_commits(count: usize) -> (TempDir, Repository) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        for i in 0..count {
            fs::write(temp.path().join("a.txt"), format!("version {}\n", i)).unwrap();
            repo.add("a.txt").unwrap();
            repo.commit(&format!("commit {}", i)).unwrap();
        }
        (temp, repo)
    }

    fn run_log(temp: &TempDir, limit: Option<usize>) -> String {
        let mut out = Vec::new();
        log(temp.path(), limit, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_log_empty_repository() {
        let (temp, _repo) = repo_with_commits(0);
        assert!(run_log(&temp, None).contains("No commits yet"));
        assert!(run_log(&temp, Some(0)).contains("No commits yet"));
    }

    #[test]
    fn test_log_zero_limit_with_commits_prints_nothing() {
        let (temp, _repo) = repo_with_commits(2);
        assert_eq!(run_log(&temp, Some(0)), "");

        let output = run_log(&temp, Some(1));
        assert!(output.contains("commit 1"));
        assert!(!output.contains("commit 0"));
        assert!(!output.contains("No commits yet"));
    }

    #[test]
    fn test_show_unknown_commit() {
        let (temp, _repo) = repo_with_commits(1);
        let err = show(temp.path(), &"0".repeat(40), &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), format!("commit not found: {}", "0".repeat(40)));
    }

    #[test]
    fn test_show_missing_blob_is_not_reported_as_missing_commit() {
        let (temp, repo) = repo_with_commits(2);
        let head = repo.head().unwrap();
        let blob = *repo.get_commit(&head).unwrap().files()[0].digest();
        fs::remove_file(repo.object_store().object_path(&blob)).unwrap();

        let err = show(temp.path(), &head.to_hex(), &mut Vec::new()).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.starts_with(&format!("Failed to diff commit {}", head.short())));
        assert!(!message.contains("commit not found"));
    }

    #[test]
    fn test_show_prints_changed_lines() {
        let (temp, repo) = repo_with_commits(2);
        let head = repo.head().unwrap();

        let mut out = Vec::new();
        show(temp.path(), &head.to_hex(), &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("-version 0"));
        assert!(output.contains("+version 1"));
        assert!(output.contains("0 new, 1 modified, 1 insertions(+), 1 deletions(-)"));
    }
}
