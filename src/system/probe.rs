//! Host inspection done once at startup: tool presence and privilege level.

use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Look `program` up in every directory of `path_var` (a `PATH`-style list).
pub fn find_in_path(program: &str, path_var: &str) -> Option<PathBuf> {
    env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

/// Returns the subset of `tools` not found on the current `PATH`.
pub fn missing_tools<'a, I>(tools: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let path_var = env::var("PATH").unwrap_or_default();
    missing_tools_in(tools, &path_var)
}

/// Same as [`missing_tools`] against an explicit search path.
pub fn missing_tools_in<'a, I>(tools: I, path_var: &str) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    tools
        .into_iter()
        .filter(|tool| match find_in_path(tool, path_var) {
            Some(found) => {
                debug!("Found {} at {}", tool, found.display());
                false
            },
            None => {
                debug!("{} not found on PATH", tool);
                true
            },
        })
        .map(str::to_string)
        .collect()
}

/// Whether the process runs with an effective uid of root.
#[cfg(unix)]
pub fn is_elevated() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
pub fn is_elevated() -> bool {
    false
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match path.metadata() {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
