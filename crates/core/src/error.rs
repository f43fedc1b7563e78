use std::path::PathBuf;

/// Errors loading a knowledge base.
///
/// These are the only errors in the workspace's core: evaluating rules
/// never fails.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    /// The file could not be read.
    #[error("cannot read knowledge base {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a valid knowledge base.
    #[error("invalid knowledge base: {0}")]
    Parse(#[from] serde_json::Error),
}
