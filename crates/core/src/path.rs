// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolve paths referenced by a script relative to the script itself

use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolves processor and data-file references against the directory that
/// contains the script, never against the process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    base_dir: PathBuf,
}

impl PathResolver {
    /// Resolver for a script path given relative to the current directory
    pub fn for_script(script_path: &Path) -> io::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::with_cwd(&cwd, script_path))
    }

    /// Resolver for a script path given relative to `cwd`
    pub fn with_cwd(cwd: &Path, script_path: &Path) -> Self {
        let script = normalize(&cwd.join(script_path));
        let base_dir = match script.parent() {
            Some(parent) => parent.to_path_buf(),
            None => script,
        };
        Self { base_dir }
    }

    /// Directory the script lives in
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Absolute location of a path referenced by the script
    pub fn resolve(&self, reference: impl AsRef<Path>) -> PathBuf {
        normalize(&self.base_dir.join(reference))
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. The filesystem is not consulted.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
