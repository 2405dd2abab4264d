//! Committed file content from git HEAD, used as the original text.

use git2::Repository;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for git operations
#[derive(Debug, Error)]
pub enum GitError {
    /// File is not in a git repository
    #[error("Not a git repository")]
    NotARepo,
    /// File is not tracked (untracked/new file)
    #[error("File is not tracked")]
    NotTracked,
    /// File does not exist in HEAD
    #[error("File does not exist in HEAD")]
    NotInHead,
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),
}

fn absolute(path: &Path) -> PathBuf {
    let abs_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    // Canonicalize to resolve symlinks (important on macOS where /var -> /private/var)
    abs_path.canonicalize().unwrap_or(abs_path)
}

/// Repository containing `path` and the path relative to its workdir.
fn locate(path: &Path) -> Result<(Repository, PathBuf), GitError> {
    let abs_path = absolute(path);
    let repo = Repository::discover(&abs_path).map_err(|_| GitError::NotARepo)?;
    let workdir = repo.workdir().ok_or(GitError::NotARepo)?;
    let relative = abs_path
        .strip_prefix(workdir)
        .map_err(|_| GitError::NotARepo)?
        .to_path_buf();
    Ok((repo, relative))
}

/// Check if a file is inside a git repository
pub fn is_git_available(path: &Path) -> bool {
    Repository::discover(absolute(path)).is_ok()
}

/// Check if a file exists in the HEAD commit
pub fn is_file_tracked(path: &Path) -> bool {
    get_head_content(path).is_ok()
}

/// Get the content of a file from HEAD
pub fn get_head_content(path: &Path) -> Result<String, GitError> {
    let (repo, relative) = locate(path)?;

    // No HEAD means no commits yet, so nothing is tracked
    let head = repo.head().map_err(|_| GitError::NotTracked)?;
    let tree = head.peel_to_commit()?.tree()?;

    let entry = tree.get_path(&relative).map_err(|_| {
        if path.exists() {
            GitError::NotTracked
        } else {
            GitError::NotInHead
        }
    })?;

    let blob = repo.find_blob(entry.id())?;
    let content = std::str::from_utf8(blob.content())
        .map_err(|_| GitError::Git(git2::Error::from_str("Invalid UTF-8 content")))?;

    Ok(content.to_string())
}
