use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderCoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse XML in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
    #[error("failed to launch {app}: {source}")]
    Launch {
        app: String,
        #[source]
        source: std::io::Error,
    },
}
