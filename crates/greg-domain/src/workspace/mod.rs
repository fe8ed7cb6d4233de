use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use camino::{Utf8Path, Utf8PathBuf};
use ignore::overrides::{Override, OverrideBuilder};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::manifest::{read_manifest, PackageManifest, MANIFEST_FILE};
use crate::WorkspaceError;

/// Directory names holding installed dependencies; never treated as workspace members.
pub const DEPENDENCY_DIRS: [&str; 1] = ["node_modules"];

/// A workspace member discovered from a `package.json` on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageEntry {
    manifest_path: PathBuf,
    root: PathBuf,
    dir: Utf8PathBuf,
}

impl PackageEntry {
    /// Directory relative to the workspace root, `/`-separated (`.` for the root itself).
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    #[must_use]
    pub fn absolute_dir(&self) -> PathBuf {
        if self.dir == "." {
            self.root.clone()
        } else {
            self.root.join(self.dir.as_std_path())
        }
    }

    /// Reads the package's own manifest. Not cached: each call hits the disk.
    ///
    /// # Errors
    ///
    /// Returns a manifest error when `package.json` cannot be read or parsed.
    pub fn read_manifest(&self) -> Result<PackageManifest, WorkspaceError> {
        read_manifest(&self.manifest_path)
    }
}

/// Walks upward from `start` to the nearest directory holding a `package.json`.
///
/// # Errors
///
/// Returns [`WorkspaceError::RootNotFound`] when neither `start` nor any of
/// its ancestors contains one.
pub fn discover_workspace_root(start: &Path) -> Result<PathBuf, WorkspaceError> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(MANIFEST_FILE).is_file() {
            debug!(root = %dir.display(), "workspace root found");
            return Ok(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    Err(WorkspaceError::RootNotFound {
        start: start.to_path_buf(),
    })
}

/// Expands workspace patterns into the package manifests they select.
///
/// Each pattern names package directories relative to `root` using gitignore
/// glob syntax; a leading `!` excludes directories matched by earlier
/// patterns. Anything below a [`DEPENDENCY_DIRS`] directory is skipped even
/// when a pattern reaches into it. Wildcards do not descend into dot-directories;
/// a dot-directory is only walked when a pattern spells its name out.
/// Symlinked directories are followed. Entries come back sorted by directory.
///
/// # Errors
///
/// Returns [`WorkspaceError::InvalidPattern`] when a pattern is not a valid glob.
pub fn enumerate_packages(
    root: &Path,
    patterns: &[String],
) -> Result<Vec<PackageEntry>, WorkspaceError> {
    if patterns.is_empty() {
        debug!("no workspace patterns declared");
        return Ok(Vec::new());
    }
    let matcher = manifest_matcher(root, patterns)?;
    let named_hidden = hidden_segments(patterns);

    let mut packages = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(is_dependency_dir(entry.file_name())
                    || is_unnamed_hidden(entry.file_name(), &named_hidden))
        });
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable workspace path");
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != MANIFEST_FILE {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if is_dependency_path(relative) || !matcher.matched(relative, false).is_whitelist() {
            continue;
        }
        let Some(dir) = package_dir(relative) else {
            warn!(
                path = %entry.path().display(),
                "skipping package with a non UTF-8 path"
            );
            continue;
        };
        packages.push(PackageEntry {
            manifest_path: entry.path().to_path_buf(),
            root: root.to_path_buf(),
            dir,
        });
    }
    packages.sort_by(|a, b| a.dir.cmp(&b.dir));
    packages.dedup_by(|a, b| a.dir == b.dir);
    debug!(count = packages.len(), "enumerated workspace packages");
    Ok(packages)
}

/// True when any component of `path` is a dependency install directory.
#[must_use]
pub fn is_dependency_path(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => is_dependency_dir(name),
        _ => false,
    })
}

fn is_dependency_dir(name: &OsStr) -> bool {
    DEPENDENCY_DIRS.iter().any(|dir| name == *dir)
}

/// Dot-prefixed segments written literally in the patterns, e.g. `.config` in `.config/*`.
fn hidden_segments(patterns: &[String]) -> BTreeSet<String> {
    patterns
        .iter()
        .flat_map(|pattern| pattern.trim().trim_start_matches('!').split('/'))
        .filter(|segment| segment.starts_with('.') && *segment != "." && *segment != "..")
        .map(str::to_string)
        .collect()
}

fn is_unnamed_hidden(name: &OsStr, named: &BTreeSet<String>) -> bool {
    match name.to_str() {
        Some(name) => name.starts_with('.') && !named.contains(name),
        None => false,
    }
}

fn manifest_matcher(root: &Path, patterns: &[String]) -> Result<Override, WorkspaceError> {
    let mut builder = OverrideBuilder::new(root);
    for pattern in patterns {
        let glob = manifest_glob(pattern);
        builder
            .add(&glob)
            .map_err(|source| WorkspaceError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
    }
    builder
        .build()
        .map_err(|source| WorkspaceError::InvalidPattern {
            pattern: patterns.join(", "),
            source,
        })
}

/// `packages/*` -> `packages/*/package.json`, `!packages/x` -> `!packages/x/package.json`.
fn manifest_glob(pattern: &str) -> String {
    let (negated, body) = match pattern.trim().strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, pattern.trim()),
    };
    let mut body = body;
    while let Some(rest) = body.strip_prefix("./") {
        body = rest;
    }
    let body = body.trim_end_matches('/');
    let glob = if body.is_empty() || body == "." {
        format!("/{MANIFEST_FILE}")
    } else {
        format!("{body}/{MANIFEST_FILE}")
    };
    if negated {
        format!("!{glob}")
    } else {
        glob
    }
}

fn package_dir(relative_manifest: &Path) -> Option<Utf8PathBuf> {
    let parent = relative_manifest.parent()?;
    let mut parts = Vec::new();
    for component in parent.components() {
        if let Component::Normal(name) = component {
            parts.push(name.to_str()?);
        }
    }
    if parts.is_empty() {
        Some(Utf8PathBuf::from("."))
    } else {
        Some(Utf8PathBuf::from(parts.join("/")))
    }
}
