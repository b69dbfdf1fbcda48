//! Confinement checks for user supplied file paths
//!
//! A path is accepted only when it is non-empty, carries no `..` anywhere in
//! the raw string, and resolves to a location inside the working directory or
//! one of the directories listed in `CONDUCTOR_ALLOWED_PATHS`.

use crate::{ConductorError, Result};
use std::path::{Component, Path, PathBuf};

/// Environment variable extending the allow-list
pub const ALLOWED_PATHS_ENV: &str = "CONDUCTOR_ALLOWED_PATHS";

/// Validates paths against a working directory and an allow-list
#[derive(Debug, Clone)]
pub struct PathValidator {
    roots: Vec<PathBuf>,
}

impl PathValidator {
    /// Build a validator rooted at `cwd` plus `allowed` directories
    ///
    /// Relative entries in `allowed` are ignored.
    pub fn new(cwd: impl Into<PathBuf>, allowed: impl IntoIterator<Item = PathBuf>) -> Self {
        let cwd = cwd.into();
        let mut roots = vec![resolve(&cwd)];
        roots.extend(
            allowed
                .into_iter()
                .filter(|dir| dir.is_absolute())
                .map(|dir| resolve(&normalize(&dir))),
        );
        Self { roots }
    }

    /// Build a validator from the process working directory and environment
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| ConductorError::io("failed to determine working directory", e))?;
        let allowed = std::env::var_os(ALLOWED_PATHS_ENV)
            .map(|value| parse_allowed_paths(&value))
            .unwrap_or_default();
        Ok(Self::new(cwd, allowed))
    }

    /// Directories a path may live under
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Validate `path` and return its resolved absolute form
    pub fn validate(&self, path: &str) -> Result<PathBuf> {
        if path.trim().is_empty() {
            return Err(ConductorError::invalid_path("path must not be empty"));
        }
        if path.contains("..") {
            return Err(ConductorError::invalid_path(
                "path must not contain '..' segments",
            ));
        }

        let candidate = Path::new(path);
        let absolute = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            // Roots[0] is always the working directory
            self.roots[0].join(candidate)
        };
        let real = resolve(&normalize(&absolute));

        if self.roots.iter().any(|root| real.starts_with(root)) {
            Ok(real)
        } else {
            tracing::debug!(roots = self.roots.len(), "path outside allowed roots");
            Err(ConductorError::invalid_path(format!(
                "path must be inside the working directory or a directory listed in {ALLOWED_PATHS_ENV}"
            )))
        }
    }
}

/// Validate `path` against the process working directory and environment
pub fn validate_path(path: &str) -> Result<PathBuf> {
    PathValidator::from_env()?.validate(path)
}

/// Split an allow-list value on the platform separator and on `;`
pub fn parse_allowed_paths(value: &std::ffi::OsStr) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .flat_map(|entry| {
            entry
                .to_string_lossy()
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Drop `.` components without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Resolve symlinks through the deepest existing ancestor
///
/// A target that does not exist yet keeps its unresolved tail.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(real) = path.canonicalize() {
        return real;
    }
    let mut tail = Vec::new();
    let mut current = path;
    while let Some(parent) = current.parent() {
        if let Some(name) = current.file_name() {
            tail.push(name.to_os_string());
        }
        if let Ok(real) = parent.canonicalize() {
            let mut resolved = real;
            for part in tail.iter().rev() {
                resolved.push(part);
            }
            return resolved;
        }
        current = parent;
    }
    path.to_path_buf()
}
