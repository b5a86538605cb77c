use crate::error::DraftError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command as GitCommand;

/// Read-only access to the staged state of a working copy.
pub trait StagedChangeProvider {
    /// Unified diff of everything staged under `repo`. Empty diff is `EmptyChangeSet`.
    fn staged_diff(&self, repo: &Path) -> Result<String, DraftError>;

    /// Staged file paths joined onto `repo`, in git's reporting order.
    fn staged_files(&self, repo: &Path) -> Result<Vec<PathBuf>, DraftError>;

    /// Content of `file` as it sits in the index, not the working tree.
    fn indexed_content(&self, file: &Path) -> Result<String, DraftError>;
}

/// Shells out to the `git` binary on `PATH`, one process per query.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCli;

impl StagedChangeProvider for GitCli {
    fn staged_diff(&self, repo: &Path) -> Result<String, DraftError> {
        let diff = git_output(repo, &["--no-pager", "diff", "--staged", "--relative"])?;
        if diff.trim().is_empty() {
            return Err(DraftError::EmptyChangeSet);
        }
        Ok(diff)
    }

    // `--relative` scopes both queries to `repo` and reports names relative to it,
    // so joining onto `repo` holds when it is a subdirectory of the work tree.
    fn staged_files(&self, repo: &Path) -> Result<Vec<PathBuf>, DraftError> {
        let output = git_output(
            repo,
            &["-c", "core.quotePath=false", "diff", "--staged", "--relative", "--name-only"],
        )?;
        let files = parse_name_only(repo, &output);

        log::info!("Scanning {} staged file(s):", files.len());
        for file in &files {
            log::info!("- {}", file.display());
        }

        Ok(files)
    }

    fn indexed_content(&self, file: &Path) -> Result<String, DraftError> {
        let dir = file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = file.file_name().ok_or_else(|| DraftError::ToolInvocation {
            command: "git show".to_string(),
            detail: format!("{} does not name a file", file.display()),
        })?;

        // `:./name` resolves against the working directory, `:name` against the top level.
        let spec = format!(":./{}", name.to_string_lossy());
        git_output(dir, &["show", &spec])
    }
}

/// Run a git command in `dir` and capture stdout as String.
pub fn git_output(dir: &Path, args: &[&str]) -> Result<String, DraftError> {
    let command = format!("git {}", args.join(" "));
    log::debug!("Running {command} in {}", dir.display());

    if !dir.is_dir() {
        return Err(DraftError::ToolInvocation {
            command,
            detail: format!("directory {} does not exist", dir.display()),
        });
    }

    let output = GitCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| DraftError::ToolInvocation {
            command: command.clone(),
            detail: format!("could not start git: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = if stderr.is_empty() {
            format!("exited with status {:?}", output.status.code())
        } else {
            stderr
        };
        return Err(DraftError::ToolInvocation { command, detail });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Turn `--name-only` output into absolute paths: trimmed, no blanks, no repeats.
fn parse_name_only(repo: &Path, output: &str) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| seen.insert(*l))
        .map(|l| repo.join(l))
        .collect()
}
