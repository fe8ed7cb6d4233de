use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("no package.json found in {} or any parent directory", .start.display())]
    RootNotFound { start: PathBuf },
    #[error("failed to read {}", .path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", .path.display())]
    ManifestMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid workspace pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },
}
