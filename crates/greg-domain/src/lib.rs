#![deny(clippy::all)]

pub mod error;
pub mod manifest;
pub mod workspace;

pub use error::WorkspaceError;
pub use manifest::{read_manifest, PackageManifest, RootManifest, MANIFEST_FILE};
pub use workspace::{
    discover_workspace_root, enumerate_packages, is_dependency_path, PackageEntry,
    DEPENDENCY_DIRS,
};
