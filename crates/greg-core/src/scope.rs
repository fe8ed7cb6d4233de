use std::collections::BTreeSet;
use std::path::Path;

use greg_domain::PackageEntry;

/// Package directories selected with `--scope`; empty selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSet {
    dirs: BTreeSet<String>,
}

impl ScopeSet {
    /// Normalises raw `--scope` values against the workspace `root`.
    ///
    /// Entries are compared verbatim after normalisation: no globbing, no
    /// prefix matching, no symlink resolution.
    pub fn new<I, S>(root: &Path, raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dirs = raw
            .into_iter()
            .map(|entry| normalize_scope(root, entry.as_ref()))
            .collect();
        Self { dirs }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    #[must_use]
    pub fn contains(&self, package: &PackageEntry) -> bool {
        self.is_empty() || self.dirs.contains(package.dir().as_str())
    }
}

/// Splits `packages` into (in scope, out of scope), preserving order.
#[must_use]
pub fn apply_scope<'a>(
    packages: &'a [PackageEntry],
    scope: &ScopeSet,
) -> (Vec<&'a PackageEntry>, Vec<&'a PackageEntry>) {
    packages.iter().partition(|package| scope.contains(package))
}

fn normalize_scope(root: &Path, raw: &str) -> String {
    let raw = raw.trim();
    let path = Path::new(raw);
    let relative = if path.is_absolute() {
        match path.strip_prefix(root) {
            Ok(rest) => rest.to_string_lossy().replace('\\', "/"),
            Err(_) => return raw.trim_end_matches('/').to_string(),
        }
    } else {
        raw.replace('\\', "/")
    };
    let mut value = relative.as_str();
    while let Some(rest) = value.strip_prefix("./") {
        value = rest;
    }
    let value = value.trim_end_matches('/');
    if value.is_empty() || value == "." {
        ".".to_string()
    } else {
        value.to_string()
    }
}
