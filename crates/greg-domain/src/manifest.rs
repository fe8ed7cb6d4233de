use std::{fs, path::Path};

use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Deserialize};

use crate::WorkspaceError;

pub const MANIFEST_FILE: &str = "package.json";

/// The workspace-level `package.json`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RootManifest {
    #[serde(default)]
    workspaces: Option<Workspaces>,
}

/// `workspaces` is either a plain pattern list or yarn's `{ "packages": [...] }` form.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Workspaces {
    Patterns(Vec<String>),
    Config {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl RootManifest {
    /// Workspace glob patterns in declaration order.
    #[must_use]
    pub fn workspace_patterns(&self) -> &[String] {
        match &self.workspaces {
            Some(Workspaces::Patterns(patterns) | Workspaces::Config { packages: patterns }) => {
                patterns.as_slice()
            }
            None => &[],
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    scripts: Option<IndexMap<String, String>>,
}

impl PackageManifest {
    #[must_use]
    pub fn declares_script(&self, name: &str) -> bool {
        self.scripts
            .as_ref()
            .is_some_and(|scripts| scripts.contains_key(name))
    }

    /// Declared script names in manifest order.
    pub fn script_names(&self) -> impl Iterator<Item = &str> {
        self.scripts
            .iter()
            .flat_map(|scripts| scripts.keys())
            .map(String::as_str)
    }
}

/// Reads and parses a JSON manifest at `path`.
///
/// # Errors
///
/// Returns [`WorkspaceError::ManifestUnreadable`] when the file cannot be read
/// and [`WorkspaceError::ManifestMalformed`] when it is not valid JSON or does
/// not have the expected shape.
pub fn read_manifest<T: DeserializeOwned>(path: &Path) -> Result<T, WorkspaceError> {
    let contents =
        fs::read_to_string(path).map_err(|source| WorkspaceError::ManifestUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&contents).map_err(|source| WorkspaceError::ManifestMalformed {
        path: path.to_path_buf(),
        source,
    })
}
